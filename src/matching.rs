// Pillar matching — cosine similarity against the registry with a tunable
// confidence threshold.
//
// The matcher is a pure function of its inputs: no model access, no side
// effects. Embeddings come in, an assignment comes out, and the same inputs
// always produce the same assignment.

use serde::Serialize;

use crate::pillars::EmbeddedPillars;

/// Default operating point for single-best-pillar matching.
pub const DEFAULT_SINGLE_THRESHOLD: f64 = 0.3;

/// Default operating point for multi-pillar matching.
pub const DEFAULT_MULTI_THRESHOLD: f64 = 0.45;

/// How many pillars a comment may be assigned to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchMode {
    /// The single best pillar, if it clears the threshold
    Single,
    /// Every pillar that clears the threshold
    Multi,
}

/// The matcher's verdict for one comment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum Assignment {
    /// Pillar names whose similarity exceeded the threshold (never empty)
    Matched(Vec<String>),
    /// No pillar cleared the threshold; the comment goes to theme discovery
    Unmatched,
}

/// Cosine similarity between two embedding vectors, in [-1, 1].
///
/// Returns 0.0 for empty, mismatched-dimension, or zero-magnitude inputs.
/// The full range is kept (no clamping) so anti-correlated vectors sit as
/// far from the threshold as they should.
pub fn cosine_similarity(a: &[f64], b: &[f64]) -> f64 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }

    let dot: f64 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let mag_a: f64 = a.iter().map(|x| x * x).sum::<f64>().sqrt();
    let mag_b: f64 = b.iter().map(|x| x * x).sum::<f64>().sqrt();

    let denom = mag_a * mag_b;
    if denom < f64::EPSILON {
        0.0
    } else {
        dot / denom
    }
}

/// Decide which pillars (if any) a comment belongs to.
///
/// A pillar matches only when its similarity is strictly above `threshold`.
/// In single mode, equal maxima resolve to the lowest registry index, so the
/// outcome never depends on iteration incidentals.
pub fn match_comment(
    comment_embedding: &[f64],
    pillars: &EmbeddedPillars,
    mode: MatchMode,
    threshold: f64,
) -> Assignment {
    match mode {
        MatchMode::Single => {
            let mut best: Option<(usize, f64)> = None;
            for (idx, embedding) in pillars.embeddings.iter().enumerate() {
                let similarity = cosine_similarity(comment_embedding, embedding);
                // Strict > keeps the first-declared pillar on ties
                if best.is_none_or(|(_, s)| similarity > s) {
                    best = Some((idx, similarity));
                }
            }
            match best {
                Some((idx, similarity)) if similarity > threshold => {
                    Assignment::Matched(vec![pillars.names[idx].clone()])
                }
                _ => Assignment::Unmatched,
            }
        }
        MatchMode::Multi => {
            let names: Vec<String> = pillars
                .embeddings
                .iter()
                .enumerate()
                .filter(|&(_, embedding)| {
                    cosine_similarity(comment_embedding, embedding) > threshold
                })
                .map(|(idx, _)| pillars.names[idx].clone())
                .collect();

            if names.is_empty() {
                Assignment::Unmatched
            } else {
                Assignment::Matched(names)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pillars(entries: &[(&str, Vec<f64>)]) -> EmbeddedPillars {
        EmbeddedPillars {
            names: entries.iter().map(|(n, _)| n.to_string()).collect(),
            embeddings: entries.iter().map(|(_, e)| e.clone()).collect(),
        }
    }

    #[test]
    fn test_cosine_identical() {
        let sim = cosine_similarity(&[1.0, 2.0, 3.0], &[1.0, 2.0, 3.0]);
        assert!((sim - 1.0).abs() < 1e-10);
    }

    #[test]
    fn test_cosine_proportional() {
        // Same direction, different magnitudes
        let sim = cosine_similarity(&[1.0, 2.0, 3.0], &[2.0, 4.0, 6.0]);
        assert!((sim - 1.0).abs() < 1e-10);
    }

    #[test]
    fn test_cosine_orthogonal() {
        let sim = cosine_similarity(&[1.0, 0.0], &[0.0, 1.0]);
        assert!(sim.abs() < 1e-10);
    }

    #[test]
    fn test_cosine_opposite_is_negative() {
        // The full [-1, 1] range survives — no clamping
        let sim = cosine_similarity(&[1.0, 0.0], &[-1.0, 0.0]);
        assert!((sim + 1.0).abs() < 1e-10);
    }

    #[test]
    fn test_cosine_degenerate_inputs() {
        assert_eq!(cosine_similarity(&[], &[]), 0.0);
        assert_eq!(cosine_similarity(&[1.0, 2.0], &[1.0, 2.0, 3.0]), 0.0);
        assert_eq!(cosine_similarity(&[0.0, 0.0], &[1.0, 2.0]), 0.0);
    }

    #[test]
    fn test_single_mode_picks_best_pillar() {
        let p = pillars(&[
            ("A", vec![1.0, 0.0]),
            ("B", vec![0.0, 1.0]),
        ]);
        let assignment = match_comment(&[0.1, 0.9], &p, MatchMode::Single, 0.3);
        assert_eq!(assignment, Assignment::Matched(vec!["B".to_string()]));
    }

    #[test]
    fn test_single_mode_tie_resolves_to_first_declared() {
        let p = pillars(&[
            ("First", vec![1.0, 0.0]),
            ("Second", vec![1.0, 0.0]),
        ]);
        let assignment = match_comment(&[1.0, 0.0], &p, MatchMode::Single, 0.3);
        assert_eq!(assignment, Assignment::Matched(vec!["First".to_string()]));
    }

    #[test]
    fn test_single_mode_below_threshold_is_unmatched() {
        let p = pillars(&[("A", vec![1.0, 0.0])]);
        let assignment = match_comment(&[0.0, 1.0], &p, MatchMode::Single, 0.3);
        assert_eq!(assignment, Assignment::Unmatched);
    }

    #[test]
    fn test_threshold_is_strict() {
        // Similarity exactly equal to the threshold does not match
        let p = pillars(&[("A", vec![1.0, 0.0])]);
        let assignment = match_comment(&[1.0, 0.0], &p, MatchMode::Single, 1.0);
        assert_eq!(assignment, Assignment::Unmatched);
    }

    #[test]
    fn test_multi_mode_returns_all_above_threshold() {
        let p = pillars(&[
            ("A", vec![1.0, 0.0]),
            ("B", vec![1.0, 0.1]),
            ("C", vec![0.0, 1.0]),
        ]);
        match match_comment(&[1.0, 0.0], &p, MatchMode::Multi, 0.5) {
            Assignment::Matched(names) => {
                assert_eq!(names, vec!["A".to_string(), "B".to_string()]);
            }
            Assignment::Unmatched => panic!("Expected a multi-match"),
        }
    }

    #[test]
    fn test_multi_mode_empty_set_is_unmatched() {
        let p = pillars(&[("A", vec![1.0, 0.0])]);
        let assignment = match_comment(&[0.0, 1.0], &p, MatchMode::Multi, 0.3);
        assert_eq!(assignment, Assignment::Unmatched);
    }

    #[test]
    fn test_raising_threshold_never_grows_multi_match() {
        let p = pillars(&[
            ("A", vec![1.0, 0.0]),
            ("B", vec![0.7, 0.7]),
            ("C", vec![0.0, 1.0]),
        ]);
        let comment = [1.0, 0.2];

        let mut previous = usize::MAX;
        for threshold in [0.0, 0.3, 0.45, 0.7, 0.9, 0.99] {
            let size = match match_comment(&comment, &p, MatchMode::Multi, threshold) {
                Assignment::Matched(names) => names.len(),
                Assignment::Unmatched => 0,
            };
            assert!(
                size <= previous,
                "Matched set grew from {previous} to {size} at threshold {threshold}"
            );
            previous = size;
        }
    }

    #[test]
    fn test_match_is_deterministic() {
        let p = pillars(&[
            ("A", vec![0.6, 0.8]),
            ("B", vec![0.8, 0.6]),
        ]);
        let comment = [0.5, 0.5];
        let first = match_comment(&comment, &p, MatchMode::Single, 0.3);
        let second = match_comment(&comment, &p, MatchMode::Single, 0.3);
        assert_eq!(first, second);
    }
}
