//! OpenAI embeddings provider.
//!
//! Speaks `/v1/embeddings`; one request per batch.

use crate::embeddings::provider::EmbeddingProvider;
use helper_core::error::redact;
use helper_core::{AppError, AppResult};
use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Serialize)]
struct EmbeddingRequest<'a> {
    model: &'a str,
    input: &'a [String],
}

#[derive(Debug, Deserialize)]
struct EmbeddingResponse {
    data: Vec<EmbeddingData>,
}

#[derive(Debug, Deserialize)]
struct EmbeddingData {
    embedding: Vec<f32>,
    #[serde(default)]
    index: usize,
}

/// Client for OpenAI (or compatible) embeddings.
pub struct OpenAiProvider {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
    model: String,
    dimensions: usize,
}

impl std::fmt::Debug for OpenAiProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenAiProvider")
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .field("dimensions", &self.dimensions)
            .finish_non_exhaustive()
    }
}

impl OpenAiProvider {
    /// Create a new provider. `base_url` should include the `/v1` prefix.
    pub fn new(
        base_url: &str,
        api_key: &str,
        model: &str,
        dimensions: usize,
        timeout: Duration,
    ) -> AppResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AppError::Embedding(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
            model: model.to_string(),
            dimensions,
        })
    }

    fn scrub(&self, message: String) -> String {
        redact(&message, Some(&self.api_key))
    }

    /// Order by `index` so results line up with the input texts.
    fn into_vectors(mut response: EmbeddingResponse) -> Vec<Vec<f32>> {
        response.data.sort_by_key(|d| d.index);
        response.data.into_iter().map(|d| d.embedding).collect()
    }
}

#[async_trait::async_trait]
impl EmbeddingProvider for OpenAiProvider {
    fn provider_name(&self) -> &str {
        "openai"
    }

    fn model_name(&self) -> &str {
        &self.model
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }

    async fn embed_batch(&self, texts: &[String]) -> AppResult<Vec<Vec<f32>>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        tracing::debug!(model = %self.model, batch = texts.len(), "Requesting OpenAI embeddings");

        let url = format!("{}/embeddings", self.base_url);
        let request = EmbeddingRequest {
            model: &self.model,
            input: texts,
        };

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                AppError::Embedding(self.scrub(format!("Failed to send request to OpenAI: {}", e)))
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(AppError::Embedding(self.scrub(format!(
                "OpenAI API error ({}): {}",
                status, error_text
            ))));
        }

        let body: EmbeddingResponse = response.json().await.map_err(|e| {
            AppError::Embedding(self.scrub(format!("Failed to parse OpenAI response: {}", e)))
        })?;

        Ok(Self::into_vectors(body))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_format() {
        let texts = vec!["setup".to_string(), "scoring".to_string()];
        let request = EmbeddingRequest {
            model: "text-embedding-3-small",
            input: &texts,
        };
        let json = serde_json::to_value(&request).unwrap();

        assert_eq!(json["model"], "text-embedding-3-small");
        assert_eq!(json["input"][1], "scoring");
    }

    #[test]
    fn test_response_reordered_by_index() {
        let body: EmbeddingResponse = serde_json::from_str(
            r#"{"object":"list","data":[
                {"object":"embedding","index":1,"embedding":[0.0,1.0]},
                {"object":"embedding","index":0,"embedding":[1.0,0.0]}
            ],"model":"text-embedding-3-small"}"#,
        )
        .unwrap();

        let vectors = OpenAiProvider::into_vectors(body);
        assert_eq!(vectors, vec![vec![1.0, 0.0], vec![0.0, 1.0]]);
    }

    #[test]
    fn test_debug_hides_key() {
        let provider = OpenAiProvider::new(
            "https://api.openai.com/v1/",
            "sk-secret",
            "text-embedding-3-small",
            1536,
            Duration::from_secs(5),
        )
        .unwrap();

        assert_eq!(provider.base_url, "https://api.openai.com/v1");
        assert!(!format!("{:?}", provider).contains("sk-secret"));
    }

    #[tokio::test]
    async fn test_unreachable_endpoint_is_embedding_error() {
        let provider = OpenAiProvider::new(
            "http://127.0.0.1:9/v1",
            "sk-secret",
            "text-embedding-3-small",
            1536,
            Duration::from_secs(2),
        )
        .unwrap();

        let err = provider.embed("hello").await.unwrap_err();
        assert!(matches!(err, AppError::Embedding(_)));
        assert!(!err.to_string().contains("sk-secret"));
    }
}
