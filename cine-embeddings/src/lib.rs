//! CineGraph Embeddings - text to vector conversion for semantic movie search.
//!
//! Two providers sit behind the [`EmbeddingModel`] trait:
//!
//! - **OpenAI**: calls an OpenAI-compatible `/embeddings` endpoint, one request per text
//! - **Hash**: deterministic feature-hashing vectors computed locally with blake3,
//!   for offline runs and tests
//!
//! # Usage
//!
//! ```rust,no_run
//! use cine_embeddings::{build_model, EmbeddingConfig, Provider};
//!
//! # async fn demo() -> cine_embeddings::Result<()> {
//! let config = EmbeddingConfig {
//!     provider: Provider::OpenAi,
//!     api_key: std::env::var("OPENAI_API_KEY").ok(),
//!     ..EmbeddingConfig::default()
//! };
//! let model = build_model(&config)?;
//!
//! let vector = model.embed("space opera").await?;
//! assert_eq!(vector.len(), model.dimension());
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

mod error;
mod hash;
mod model;
mod openai;

pub use error::{EmbeddingError, Result};
pub use hash::HashEmbedder;
pub use model::{build_model, EmbedFuture, EmbeddingConfig, EmbeddingModel, Provider};
pub use openai::OpenAiEmbedder;

/// Default OpenAI-compatible API base URL.
pub const DEFAULT_ENDPOINT: &str = "https://api.openai.com/v1";

/// Default request timeout for embedding calls, in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constants() {
        assert_eq!(DEFAULT_ENDPOINT, "https://api.openai.com/v1");
        assert_eq!(DEFAULT_TIMEOUT_SECS, 30);
    }
}
