//! Text-to-vector embedding pipeline.
//!
//! Provides the [`EmbeddingProvider`] trait and a local implementation using
//! all-MiniLM-L6-v2 (384 dimensions, L2-normalized). The provider is created
//! via [`create_provider`] from configuration, and [`encode_matrix`] turns a
//! whole collection into a row-per-text matrix.

pub mod local;

use anyhow::Result;
use indicatif::{ProgressBar, ProgressStyle};
use ndarray::Array2;

use crate::error::SearchError;

/// Number of dimensions in the embedding vectors (all-MiniLM-L6-v2).
pub const EMBEDDING_DIM: usize = 384;

/// Trait for embedding text into vectors.
///
/// Implementations are deterministic: the same text always yields the same
/// vector. All methods are synchronous — callers in async contexts should use
/// `tokio::task::spawn_blocking`.
pub trait EmbeddingProvider: Send + Sync {
    /// Embed a single text string into a vector.
    fn encode(&self, text: &str) -> Result<Vec<f32>>;

    /// Embed a batch of text strings. Implementations may override for batched inference.
    fn encode_batch(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>> {
        texts.iter().map(|t| self.encode(t)).collect()
    }

    /// Return the number of dimensions this provider produces.
    fn dimensions(&self) -> usize {
        EMBEDDING_DIM
    }
}

/// Create an embedding provider from config.
///
/// Currently only `"local"` is supported (ONNX Runtime + all-MiniLM-L6-v2).
/// Returns [`SearchError::ModelLoad`] if model files are missing or unusable —
/// run `verse-finder model download` first.
pub fn create_provider(
    config: &crate::config::EmbeddingConfig,
) -> Result<Box<dyn EmbeddingProvider>, SearchError> {
    match config.provider.as_str() {
        "local" => {
            let provider = local::LocalEmbeddingProvider::new(config)?;
            Ok(Box::new(provider))
        }
        other => Err(SearchError::ModelLoad(format!(
            "unknown embedding provider: {other}. Supported: local"
        ))),
    }
}

/// Encode `texts` in batches into an `(N, D)` matrix, row `i` for `texts[i]`.
pub fn encode_matrix(
    provider: &dyn EmbeddingProvider,
    texts: &[&str],
    batch_size: usize,
    show_progress: bool,
) -> Result<Array2<f32>, SearchError> {
    let dim = provider.dimensions();
    let mut flat = Vec::with_capacity(texts.len() * dim);

    let pb = if show_progress {
        let pb = ProgressBar::new(texts.len() as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("  {bar:40.cyan/blue} {pos}/{len} ({eta})")
                .map_err(|e| SearchError::Encode(e.to_string()))?
                .progress_chars("##-"),
        );
        pb
    } else {
        ProgressBar::hidden()
    };

    for chunk in texts.chunks(batch_size.max(1)) {
        let vectors = provider
            .encode_batch(chunk)
            .map_err(|e| SearchError::Encode(format!("{e:#}")))?;
        if vectors.len() != chunk.len() {
            return Err(SearchError::Encode(format!(
                "provider returned {} vectors for {} texts",
                vectors.len(),
                chunk.len()
            )));
        }
        for v in vectors {
            if v.len() != dim {
                return Err(SearchError::Encode(format!(
                    "expected {dim} dimensions, got {}",
                    v.len()
                )));
            }
            flat.extend_from_slice(&v);
        }
        pb.inc(chunk.len() as u64);
    }
    pb.finish_and_clear();

    Array2::from_shape_vec((texts.len(), dim), flat)
        .map_err(|e| SearchError::Encode(e.to_string()))
}
