//! Placeholder for an embedding provider that could not be configured.

use crate::embeddings::provider::EmbeddingProvider;
use helper_core::{AppError, AppResult};

/// Fails every request with the reason the real provider was not built.
#[derive(Debug, Clone)]
pub struct UnavailableProvider {
    provider: String,
    model: String,
    dimensions: usize,
    reason: String,
}

impl UnavailableProvider {
    pub fn new(
        provider: impl Into<String>,
        model: impl Into<String>,
        dimensions: usize,
        reason: impl Into<String>,
    ) -> Self {
        Self {
            provider: provider.into(),
            model: model.into(),
            dimensions,
            reason: reason.into(),
        }
    }
}

#[async_trait::async_trait]
impl EmbeddingProvider for UnavailableProvider {
    fn provider_name(&self) -> &str {
        &self.provider
    }

    fn model_name(&self) -> &str {
        &self.model
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }

    async fn embed_batch(&self, _texts: &[String]) -> AppResult<Vec<Vec<f32>>> {
        Err(AppError::Embedding(self.reason.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_embed_fails_with_reason() {
        let provider = UnavailableProvider::new("openai", "text-embedding-3-small", 1536, "no key");
        assert_eq!(provider.dimensions(), 1536);

        let err = provider.embed("setup").await.unwrap_err();
        assert_eq!(err.to_string(), "Embedding error: no key");
    }
}
