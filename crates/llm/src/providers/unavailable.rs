//! Placeholder client for a provider that could not be configured.

use crate::client::{LlmClient, LlmRequest, LlmResponse};
use helper_core::{AppError, AppResult};

/// Fails every completion with the reason the real client was not built.
///
/// Lets the service start without credentials and report the problem per
/// request instead.
#[derive(Debug, Clone)]
pub struct UnavailableClient {
    provider: String,
    reason: String,
}

impl UnavailableClient {
    pub fn new(provider: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            provider: provider.into(),
            reason: reason.into(),
        }
    }
}

#[async_trait::async_trait]
impl LlmClient for UnavailableClient {
    fn provider_name(&self) -> &str {
        &self.provider
    }

    async fn complete(&self, _request: &LlmRequest) -> AppResult<LlmResponse> {
        Err(AppError::Llm(self.reason.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_every_call_fails_with_reason() {
        let client = UnavailableClient::new("openai", "OPENAI_API_KEY is not set");
        assert_eq!(client.provider_name(), "openai");

        let err = client
            .complete(&LlmRequest::new("hi", "gpt-4-1106-preview"))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Llm(_)));
        assert!(err.to_string().contains("OPENAI_API_KEY"));
    }
}
