//! Embedding model trait and provider configuration.

use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::str::FromStr;

use crate::error::{EmbeddingError, Result};
use crate::hash::HashEmbedder;
use crate::openai::OpenAiEmbedder;
use crate::{DEFAULT_ENDPOINT, DEFAULT_TIMEOUT_SECS};

/// Future returned by [`EmbeddingModel::embed`].
pub type EmbedFuture<'a> = Pin<Box<dyn Future<Output = Result<Vec<f32>>> + Send + 'a>>;

/// Trait for embedding models that convert text to fixed-length vectors.
///
/// Callers only see `embed(text) -> vector`, so batching, retries or rate
/// limiting can be added inside an implementation without touching them.
///
/// # Example
///
/// ```ignore
/// use cine_embeddings::{EmbedFuture, EmbeddingModel};
///
/// struct Constant;
///
/// impl EmbeddingModel for Constant {
///     fn embed<'a>(&'a self, _text: &'a str) -> EmbedFuture<'a> {
///         Box::pin(async { Ok(vec![1.0, 0.0, 0.0]) })
///     }
///
///     fn dimension(&self) -> usize {
///         3
///     }
///
///     fn model_name(&self) -> &str {
///         "constant"
///     }
/// }
/// ```
pub trait EmbeddingModel: Send + Sync {
    /// Generate an embedding vector for the given text.
    fn embed<'a>(&'a self, text: &'a str) -> EmbedFuture<'a>;

    /// Generate embeddings for multiple texts.
    ///
    /// Default implementation awaits `embed` once per text, in order, and
    /// stops at the first failure.
    fn embed_batch<'a>(
        &'a self,
        texts: &'a [&'a str],
    ) -> Pin<Box<dyn Future<Output = Result<Vec<Vec<f32>>>> + Send + 'a>> {
        Box::pin(async move {
            let mut vectors = Vec::with_capacity(texts.len());
            for text in texts.iter().copied() {
                vectors.push(self.embed(text).await?);
            }
            Ok(vectors)
        })
    }

    /// Get the dimension of the embedding vectors.
    fn dimension(&self) -> usize;

    /// Get the model name/identifier.
    fn model_name(&self) -> &str;
}

/// Which embedding backend to use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Provider {
    /// OpenAI-compatible HTTP API.
    #[default]
    OpenAi,
    /// Local deterministic hashing, no network.
    Hash,
}

impl Provider {
    /// Lowercase identifier used in config files and flags.
    pub fn as_str(&self) -> &'static str {
        match self {
            Provider::OpenAi => "openai",
            Provider::Hash => "hash",
        }
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Provider {
    type Err = EmbeddingError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "openai" => Ok(Provider::OpenAi),
            "hash" => Ok(Provider::Hash),
            other => Err(EmbeddingError::ConfigError {
                message: format!("unknown provider '{}' (expected openai or hash)", other),
            }),
        }
    }
}

/// Explicit embedding configuration; nothing is read from process globals here.
#[derive(Clone, PartialEq)]
pub struct EmbeddingConfig {
    /// Backend to use.
    pub provider: Provider,
    /// Credential for the HTTP provider.
    pub api_key: Option<String>,
    /// Model identifier sent to the API.
    pub model: String,
    /// API base URL override.
    pub endpoint: Option<String>,
    /// Expected vector length.
    pub dimension: usize,
    /// Per-request timeout in seconds.
    pub timeout_secs: u64,
}

impl EmbeddingConfig {
    /// API base URL, falling back to the public OpenAI endpoint.
    pub fn endpoint(&self) -> &str {
        self.endpoint.as_deref().unwrap_or(DEFAULT_ENDPOINT)
    }
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            provider: Provider::OpenAi,
            api_key: None,
            model: "text-embedding-3-small".to_string(),
            endpoint: None,
            dimension: 1536,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl fmt::Debug for EmbeddingConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EmbeddingConfig")
            .field("provider", &self.provider)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("model", &self.model)
            .field("endpoint", &self.endpoint())
            .field("dimension", &self.dimension)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

/// Construct the model selected by `config.provider`.
pub fn build_model(config: &EmbeddingConfig) -> Result<Box<dyn EmbeddingModel>> {
    if config.dimension == 0 {
        return Err(EmbeddingError::ConfigError {
            message: "dimension must be greater than zero".to_string(),
        });
    }

    tracing::debug!(?config, "building embedding model");
    match config.provider {
        Provider::OpenAi => Ok(Box::new(OpenAiEmbedder::new(config)?)),
        Provider::Hash => Ok(Box::new(HashEmbedder::new(config.dimension))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_parse() {
        assert_eq!("openai".parse::<Provider>().unwrap(), Provider::OpenAi);
        assert_eq!("HASH".parse::<Provider>().unwrap(), Provider::Hash);
        assert!("candle".parse::<Provider>().is_err());
    }

    #[test]
    fn test_debug_redacts_api_key() {
        let config = EmbeddingConfig {
            api_key: Some("sk-secret".to_string()),
            ..EmbeddingConfig::default()
        };
        let debug = format!("{:?}", config);
        assert!(!debug.contains("sk-secret"));
        assert!(debug.contains("<redacted>"));
        assert!(debug.contains("https://api.openai.com/v1"));
    }

    #[test]
    fn test_build_model_requires_key_for_openai() {
        let err = build_model(&EmbeddingConfig::default()).err().unwrap();
        assert!(matches!(err, EmbeddingError::MissingApiKey { .. }));
    }

    #[test]
    fn test_build_hash_model() {
        let config = EmbeddingConfig {
            provider: Provider::Hash,
            dimension: 16,
            ..EmbeddingConfig::default()
        };
        let model = build_model(&config).unwrap();
        assert_eq!(model.dimension(), 16);
        assert_eq!(model.model_name(), "hash-16");
    }

    #[test]
    fn test_zero_dimension_rejected() {
        let config = EmbeddingConfig {
            provider: Provider::Hash,
            dimension: 0,
            ..EmbeddingConfig::default()
        };
        assert!(matches!(
            build_model(&config),
            Err(EmbeddingError::ConfigError { .. })
        ));
    }
}
