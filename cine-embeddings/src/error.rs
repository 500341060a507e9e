//! Error types for cine-embeddings.

use thiserror::Error;

/// Result type alias for cine-embeddings operations.
pub type Result<T> = std::result::Result<T, EmbeddingError>;

/// Errors that can occur while producing embeddings.
#[derive(Error, Debug)]
pub enum EmbeddingError {
    /// The provider needs an API key and none was configured.
    #[error("Missing API key for {provider} embeddings (set OPENAI_API_KEY or [embeddings].api_key)")]
    MissingApiKey {
        /// Provider that required the key.
        provider: String,
    },

    /// Invalid provider configuration.
    #[error("Invalid embedding configuration: {message}")]
    ConfigError {
        /// Description of the configuration error.
        message: String,
    },

    /// The request never produced an HTTP response.
    #[error("Network error calling {url}: {source}")]
    Network {
        /// Endpoint that was called.
        url: String,
        /// Underlying client error.
        #[source]
        source: reqwest::Error,
    },

    /// The API answered with a non-success status.
    #[error("Embedding API returned {status}: {message}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Response body.
        message: String,
    },

    /// The API answered successfully but the body was not usable.
    #[error("Malformed embedding response: {message}")]
    MalformedResponse {
        /// What was wrong with the body.
        message: String,
    },

    /// A vector did not have the configured dimension.
    #[error("Embedding dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch {
        /// Configured dimension.
        expected: usize,
        /// Length of the returned vector.
        actual: usize,
    },

    /// Empty input provided.
    #[error("Empty input: cannot embed an empty string")]
    EmptyInput,
}
