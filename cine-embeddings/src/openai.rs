//! OpenAI-compatible embeddings client.

use std::time::Duration;

use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::error::{EmbeddingError, Result};
use crate::model::{EmbedFuture, EmbeddingConfig, EmbeddingModel};

#[derive(Serialize)]
struct EmbeddingRequest<'a> {
    model: &'a str,
    input: &'a str,
}

#[derive(Deserialize)]
struct EmbeddingResponse {
    data: Vec<EmbeddingData>,
}

#[derive(Deserialize)]
struct EmbeddingData {
    embedding: Vec<f32>,
}

/// Client for `POST {endpoint}/embeddings`.
///
/// Each call sends a single input and waits for the response. There is no
/// retry; the first failure is returned to the caller.
pub struct OpenAiEmbedder {
    client: Client,
    api_key: String,
    model: String,
    url: String,
    dimension: usize,
}

impl OpenAiEmbedder {
    /// Create a client from configuration. Fails without an API key.
    pub fn new(config: &EmbeddingConfig) -> Result<Self> {
        let api_key = config
            .api_key
            .clone()
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| EmbeddingError::MissingApiKey {
                provider: "openai".to_string(),
            })?;

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| EmbeddingError::ConfigError {
                message: e.to_string(),
            })?;

        Ok(Self {
            client,
            api_key,
            model: config.model.clone(),
            url: format!("{}/embeddings", config.endpoint().trim_end_matches('/')),
            dimension: config.dimension,
        })
    }

    async fn request(&self, text: &str) -> Result<Vec<f32>> {
        if text.trim().is_empty() {
            return Err(EmbeddingError::EmptyInput);
        }

        tracing::debug!(model = %self.model, chars = text.len(), "requesting embedding");

        let resp = self
            .client
            .post(&self.url)
            .bearer_auth(&self.api_key)
            .json(&EmbeddingRequest {
                model: &self.model,
                input: text,
            })
            .send()
            .await
            .map_err(|source| EmbeddingError::Network {
                url: self.url.clone(),
                source,
            })?;

        let status = resp.status();
        if !status.is_success() {
            let message = resp.text().await.unwrap_or_default();
            return Err(EmbeddingError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let body: EmbeddingResponse =
            resp.json()
                .await
                .map_err(|e| EmbeddingError::MalformedResponse {
                    message: e.to_string(),
                })?;

        let embedding = body
            .data
            .into_iter()
            .next()
            .map(|d| d.embedding)
            .ok_or_else(|| EmbeddingError::MalformedResponse {
                message: "response contained no embeddings".to_string(),
            })?;

        if embedding.len() != self.dimension {
            return Err(EmbeddingError::DimensionMismatch {
                expected: self.dimension,
                actual: embedding.len(),
            });
        }

        Ok(embedding)
    }
}

impl EmbeddingModel for OpenAiEmbedder {
    fn embed<'a>(&'a self, text: &'a str) -> EmbedFuture<'a> {
        Box::pin(self.request(text))
    }

    fn dimension(&self) -> usize {
        self.dimension
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}
