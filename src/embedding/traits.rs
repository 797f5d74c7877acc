// Text embedder trait — the swap-ready abstraction.
//
// The default implementation runs all-MiniLM-L6-v2 locally via ONNX. Tests
// substitute a deterministic stub so the pipeline can be exercised without
// model files on disk.

use anyhow::Result;
use async_trait::async_trait;

/// Trait for encoding text into fixed-dimension embedding vectors.
///
/// Implementations must be deterministic: for a fixed loaded model, the same
/// text always maps to the same vector. Everything downstream (threshold
/// matching, clustering) leans on that.
#[async_trait]
pub trait TextEmbedder: Send + Sync {
    /// Encode a single text.
    async fn embed(&self, text: &str) -> Result<Vec<f64>>;

    /// Encode multiple texts, returning vectors in input order.
    /// Default implementation calls `embed` sequentially — implementations
    /// can override with true batch inference, which must produce the same
    /// vectors as the sequential form.
    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f64>>> {
        let mut vectors = Vec::with_capacity(texts.len());
        for text in texts {
            vectors.push(self.embed(text).await?);
        }
        Ok(vectors)
    }
}
