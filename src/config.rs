use std::env;
use std::path::PathBuf;

use anyhow::Result;

/// Central configuration loaded from environment variables.
///
/// The .env file is loaded automatically at startup via dotenvy. Per-run
/// tunables (threshold, match mode) are CLI flags, not environment state.
pub struct Config {
    /// Directory containing the ONNX embedding model files
    pub model_dir: PathBuf,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn load() -> Result<Self> {
        let model_dir = env::var("CORNERSTONE_MODEL_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| crate::embedding::download::default_model_dir());

        Ok(Self { model_dir })
    }

    /// Check that the embedding model files exist.
    /// Call this before any operation that needs to encode text.
    pub fn require_model(&self) -> Result<()> {
        if !crate::embedding::download::model_files_present(&self.model_dir) {
            anyhow::bail!(
                "Embedding model files not found in {}\n\
                 Run `cornerstone download-model` to download them.",
                self.model_dir.display()
            );
        }
        Ok(())
    }
}
