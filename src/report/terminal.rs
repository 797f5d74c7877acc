// Colored terminal output for bucketing results and the pillar registry.
//
// This module handles all terminal-specific formatting. Plain serialization
// for the report file lives in the parent module.

use colored::Colorize;

use crate::discovery::UNKNOWN_THEME;
use crate::pillars::PILLARS;
use crate::pipeline::FinalAssignment;

/// Display per-comment results with a matched/discovered summary.
///
/// `pillar_names` drives the coloring: themes in the registry render green,
/// discovered themes cyan, and the unknown fallback yellow.
pub fn display_results(assignments: &[FinalAssignment], pillar_names: &[String]) {
    if assignments.is_empty() {
        println!("No comments to display.");
        return;
    }

    println!(
        "\n{}",
        format!("=== EVP Theme Mapping ({} comments) ===", assignments.len()).bold()
    );
    println!();

    for assignment in assignments {
        let themes = assignment
            .themes
            .iter()
            .map(|theme| colorize_theme(theme, pillar_names).to_string())
            .collect::<Vec<_>>()
            .join(", ");
        println!("  {}", assignment.comment.text);
        println!("    -> {themes}");
    }

    println!();

    let matched = assignments
        .iter()
        .filter(|a| a.themes.iter().any(|t| pillar_names.contains(t)))
        .count();
    let unknown = assignments
        .iter()
        .filter(|a| a.themes.iter().any(|t| t == UNKNOWN_THEME))
        .count();
    // Curated labels may shadow pillar names, so the buckets can overlap
    let discovered = assignments.len().saturating_sub(matched + unknown);

    println!("  {} {} matched a pillar", "+".green(), matched);
    if discovered > 0 {
        println!("  {} {} assigned an emerging theme", "*".cyan(), discovered);
    }
    if unknown > 0 {
        println!("  {} {} could not be themed", "~".yellow(), unknown);
    }
}

/// Display the pillar taxonomy.
pub fn display_pillars() {
    println!(
        "\n{}",
        format!("=== EVP Pillar Registry ({} pillars) ===", PILLARS.len()).bold()
    );
    println!();

    for (i, pillar) in PILLARS.iter().enumerate() {
        println!("  {:>2}. {}", i + 1, pillar.name.bold());
        println!("      {}", pillar.description.dimmed());
    }
    println!();
}

/// Colorize a theme by its provenance.
fn colorize_theme(theme: &str, pillar_names: &[String]) -> colored::ColoredString {
    if pillar_names.iter().any(|name| name == theme) {
        theme.green()
    } else if theme == UNKNOWN_THEME {
        theme.yellow()
    } else {
        theme.cyan()
    }
}
