// The bucketing pipeline: match comments to pillars, discover themes in the
// remainder, and reassemble everything into submission order.

use anyhow::Result;
use serde::Serialize;
use tracing::info;

use crate::comments::Comment;
use crate::discovery::{self, traits::CommentClusterer, LabelPolicy};
use crate::embedding::traits::TextEmbedder;
use crate::matching::{self, Assignment, MatchMode};
use crate::pillars::EmbeddedPillars;

/// A comment with its final theme assignment — either pillar names from
/// matching or a discovered/fallback label. Never empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FinalAssignment {
    pub comment: Comment,
    pub themes: Vec<String>,
}

/// Tunables for one bucketing run.
pub struct BucketOptions {
    pub mode: MatchMode,
    pub threshold: f64,
    pub min_cluster_size: usize,
    pub label_policy: LabelPolicy,
}

impl Default for BucketOptions {
    fn default() -> Self {
        Self {
            mode: MatchMode::Single,
            threshold: matching::DEFAULT_SINGLE_THRESHOLD,
            min_cluster_size: 3,
            label_policy: LabelPolicy::Keyword,
        }
    }
}

/// Run the full pipeline over one submission.
///
/// Every input comment appears in exactly one result, and the results come
/// back in submission order regardless of which path each comment took.
/// Unmatched comments reuse the embeddings computed for matching — they are
/// not re-encoded for discovery.
pub async fn run(
    embedder: &dyn TextEmbedder,
    pillars: &EmbeddedPillars,
    comments: &[Comment],
    clusterer: &dyn CommentClusterer,
    options: &BucketOptions,
) -> Result<Vec<FinalAssignment>> {
    if comments.is_empty() {
        anyhow::bail!("No comments to bucket");
    }

    let texts: Vec<String> = comments.iter().map(|c| c.text.clone()).collect();
    let embeddings = embedder.embed_batch(&texts).await?;

    let mut matched: Vec<FinalAssignment> = Vec::new();
    let mut unmatched_comments: Vec<Comment> = Vec::new();
    let mut unmatched_embeddings: Vec<Vec<f64>> = Vec::new();

    for (comment, embedding) in comments.iter().zip(&embeddings) {
        match matching::match_comment(embedding, pillars, options.mode, options.threshold) {
            Assignment::Matched(names) => matched.push(FinalAssignment {
                comment: comment.clone(),
                themes: names,
            }),
            Assignment::Unmatched => {
                unmatched_comments.push(comment.clone());
                unmatched_embeddings.push(embedding.clone());
            }
        }
    }

    info!(
        total = comments.len(),
        matched = matched.len(),
        unmatched = unmatched_comments.len(),
        "Pillar matching complete"
    );

    let discovered = discovery::discover(
        unmatched_comments,
        &unmatched_embeddings,
        clusterer,
        &options.label_policy,
        options.min_cluster_size,
    );

    Ok(assemble(matched, discovered))
}

/// Merge matched and discovered results back into submission order.
///
/// An index-keyed merge, not a concatenation — matched and unmatched
/// comments interleave freely in the input.
pub fn assemble(
    matched: Vec<FinalAssignment>,
    discovered: Vec<FinalAssignment>,
) -> Vec<FinalAssignment> {
    let mut all: Vec<FinalAssignment> = matched.into_iter().chain(discovered).collect();
    all.sort_by_key(|a| a.comment.original_index);
    all
}
