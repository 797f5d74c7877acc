// Sentence embeddings — the semantic backbone of pillar matching and theme
// discovery.

pub mod download;
pub mod onnx;
pub mod traits;

/// Embedding dimension for all-MiniLM-L6-v2.
pub const EMBEDDING_DIM: usize = 384;
