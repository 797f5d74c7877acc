// Comment parsing — raw submission text to ordered, index-tagged comments.

use serde::Serialize;

/// A single employee comment, tagged with its position in the submission.
///
/// The index is what lets the matched and unmatched subsets take different
/// paths through the pipeline and still be re-threaded into input order at
/// the end.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Comment {
    pub text: String,
    pub original_index: usize,
}

/// Split a raw multi-line submission into comments.
///
/// One comment per line. Surrounding whitespace is trimmed and blank lines
/// are dropped; indices count surviving comments, not raw lines.
pub fn parse_comments(raw: &str) -> Vec<Comment> {
    raw.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .enumerate()
        .map(|(original_index, line)| Comment {
            text: line.to_string(),
            original_index,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_trims_and_indexes() {
        let comments = parse_comments("  first comment  \nsecond comment\n");
        assert_eq!(comments.len(), 2);
        assert_eq!(comments[0].text, "first comment");
        assert_eq!(comments[0].original_index, 0);
        assert_eq!(comments[1].text, "second comment");
        assert_eq!(comments[1].original_index, 1);
    }

    #[test]
    fn test_parse_drops_blank_lines() {
        let comments = parse_comments("one\n\n   \ntwo\n\n");
        assert_eq!(comments.len(), 2);
        assert_eq!(comments[0].original_index, 0);
        assert_eq!(comments[1].original_index, 1);
        assert_eq!(comments[1].text, "two");
    }

    #[test]
    fn test_parse_empty_input() {
        assert!(parse_comments("").is_empty());
        assert!(parse_comments("  \n\t\n").is_empty());
    }

    #[test]
    fn test_parse_windows_line_endings() {
        let comments = parse_comments("one\r\ntwo\r\n");
        assert_eq!(comments.len(), 2);
        assert_eq!(comments[0].text, "one");
        assert_eq!(comments[1].text, "two");
    }
}
