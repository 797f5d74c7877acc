// Report generation — plain-text serialization of bucketing results.

pub mod terminal;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{DateTime, Local};

use crate::pipeline::FinalAssignment;

/// Width of the separator rule between report records.
const RULE_WIDTH: usize = 50;

/// Render assignments as plain display text, one line per comment.
pub fn render(assignments: &[FinalAssignment]) -> String {
    assignments
        .iter()
        .map(|a| format!("{} -> {}", a.comment.text, a.themes.join(", ")))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Serialize assignments into the downloadable report format.
///
/// Deterministic given the same assignments — one record per comment:
///
/// ```text
/// Comment: <text>
/// Assigned Theme(s): <theme or comma-joined themes>
/// --------------------------------------------------
/// ```
pub fn serialize(assignments: &[FinalAssignment]) -> String {
    let mut out = String::new();
    for a in assignments {
        out.push_str(&format!(
            "Comment: {}\nAssigned Theme(s): {}\n{}\n",
            a.comment.text,
            a.themes.join(", "),
            "-".repeat(RULE_WIDTH)
        ));
    }
    out
}

/// Build the report filename from the generation timestamp.
pub fn report_filename(timestamp: &DateTime<Local>) -> String {
    format!(
        "evp_bucketing_output_{}.txt",
        timestamp.format("%Y%m%d%H%M%S")
    )
}

/// Write the report into `dir`, returning the path written. The timestamp
/// in the filename is taken at generation time.
pub fn save_report(assignments: &[FinalAssignment], dir: &Path) -> Result<PathBuf> {
    let path = dir.join(report_filename(&Local::now()));
    std::fs::write(&path, serialize(assignments))
        .with_context(|| format!("Failed to write report to {}", path.display()))?;
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::comments::Comment;

    fn assignment(index: usize, text: &str, themes: &[&str]) -> FinalAssignment {
        FinalAssignment {
            comment: Comment {
                text: text.to_string(),
                original_index: index,
            },
            themes: themes.iter().map(|t| t.to_string()).collect(),
        }
    }

    #[test]
    fn test_serialize_record_format() {
        let assignments = vec![assignment(0, "great benefits", &["Financial Security"])];
        let report = serialize(&assignments);

        let expected = format!(
            "Comment: great benefits\nAssigned Theme(s): Financial Security\n{}\n",
            "-".repeat(50)
        );
        assert_eq!(report, expected);
    }

    #[test]
    fn test_serialize_joins_multiple_themes() {
        let assignments = vec![assignment(0, "x", &["A", "B"])];
        let report = serialize(&assignments);
        assert!(report.contains("Assigned Theme(s): A, B\n"));
    }

    #[test]
    fn test_serialize_is_deterministic() {
        let assignments = vec![
            assignment(0, "one", &["A"]),
            assignment(1, "two", &["B"]),
        ];
        assert_eq!(serialize(&assignments), serialize(&assignments));
    }

    #[test]
    fn test_render_one_line_per_comment() {
        let assignments = vec![
            assignment(0, "one", &["A"]),
            assignment(1, "two", &["B", "C"]),
        ];
        let rendered = render(&assignments);
        let lines: Vec<&str> = rendered.lines().collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[1], "two -> B, C");
    }

    #[test]
    fn test_report_filename_pattern() {
        let timestamp = "2025-06-01T09:30:05+00:00"
            .parse::<DateTime<Local>>()
            .unwrap();
        let name = report_filename(&timestamp);

        assert!(name.starts_with("evp_bucketing_output_"));
        assert!(name.ends_with(".txt"));
        let digits = name
            .trim_start_matches("evp_bucketing_output_")
            .trim_end_matches(".txt");
        assert_eq!(digits.len(), 14);
        assert!(digits.chars().all(|c| c.is_ascii_digit()));
    }
}
