// Clusterer trait — swap-ready abstraction over the grouping step.
//
// Like the embedder trait, this isolates the one piece of discovery that can
// fail or be swapped out. The default implementation is deterministic
// k-means; tests substitute failing or fixed-output clusterers.

use anyhow::Result;

/// Trait for grouping comment embeddings into topics.
///
/// Returns one topic id per input embedding, in input order. Ids are dense
/// from 0 and carry no meaning beyond identity — labeling happens
/// downstream.
pub trait CommentClusterer: Send + Sync {
    fn cluster(&self, embeddings: &[Vec<f64>]) -> Result<Vec<usize>>;
}
