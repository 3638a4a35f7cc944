//! Question answering over a session's index.

use super::context::build_context;
use crate::embeddings::{embed_query, EmbeddingProvider};
use crate::session::Session;
use helper_core::{AppConfig, AppError, AppResult};
use helper_llm::{LlmClient, LlmRequest};
use helper_prompt::{build_qa_prompt, PromptTemplate};
use std::sync::Arc;

/// Answers are generated deterministically.
const ANSWER_TEMPERATURE: f32 = 0.0;

/// Retrieval and generation knobs.
#[derive(Debug, Clone, PartialEq)]
pub struct AnswerSettings {
    pub model: String,
    pub max_tokens: Option<u32>,
    pub top_k: usize,
    pub max_context_chars: usize,
}

impl AnswerSettings {
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            model: config.llm.model.clone(),
            max_tokens: config.llm.max_tokens,
            top_k: config.retrieval.top_k,
            max_context_chars: config.retrieval.max_context_chars,
        }
    }
}

impl Default for AnswerSettings {
    fn default() -> Self {
        Self::from_config(&AppConfig::default())
    }
}

/// Retrieves the most relevant chunks and asks the model to answer from them.
pub struct Answerer {
    llm: Arc<dyn LlmClient>,
    embedder: Arc<dyn EmbeddingProvider>,
    template: PromptTemplate,
    settings: AnswerSettings,
}

impl Answerer {
    pub fn new(
        llm: Arc<dyn LlmClient>,
        embedder: Arc<dyn EmbeddingProvider>,
        template: PromptTemplate,
        settings: AnswerSettings,
    ) -> Self {
        Self {
            llm,
            embedder,
            template,
            settings,
        }
    }

    pub fn settings(&self) -> &AnswerSettings {
        &self.settings
    }

    /// Answer `question` from `session`'s document. The model's text is
    /// returned unchanged.
    pub async fn answer(&self, session: &Session, question: &str) -> AppResult<String> {
        let question = question.trim();
        if question.is_empty() {
            return Err(AppError::InvalidInput(
                "Query must not be empty".to_string(),
            ));
        }

        let query_embedding = embed_query(self.embedder.as_ref(), question).await?;
        let hits = session
            .index()
            .search(&query_embedding, self.settings.top_k)?;

        tracing::info!(
            session_id = %session.id(),
            "Retrieved {} chunks (top score: {:.3})",
            hits.len(),
            hits.first().map(|h| h.score).unwrap_or(0.0)
        );

        let context = build_context(&hits, self.settings.max_context_chars);
        let prompt = build_qa_prompt(&self.template, &context, question)?;

        let mut request = LlmRequest::new(prompt, self.settings.model.clone())
            .with_temperature(ANSWER_TEMPERATURE);
        if let Some(max_tokens) = self.settings.max_tokens {
            request = request.with_max_tokens(max_tokens);
        }

        let response = self.llm.complete(&request).await?;

        tracing::debug!(
            session_id = %session.id(),
            "Answer generated by {} ({} tokens)",
            self.llm.provider_name(),
            response.usage.total_tokens
        );

        Ok(response.content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chunk::Chunk;
    use crate::embeddings::providers::MockProvider;
    use crate::index::MemoryIndex;
    use crate::session::SessionStore;
    use helper_llm::{LlmResponse, LlmUsage};
    use std::sync::Mutex;

    /// Echoes the prompt back so tests can inspect it.
    #[derive(Default)]
    struct EchoLlm {
        requests: Mutex<Vec<LlmRequest>>,
    }

    #[async_trait::async_trait]
    impl LlmClient for EchoLlm {
        fn provider_name(&self) -> &str {
            "echo"
        }

        async fn complete(&self, request: &LlmRequest) -> AppResult<LlmResponse> {
            self.requests.lock().unwrap().push(request.clone());
            Ok(LlmResponse {
                content: request.prompt.clone(),
                model: request.model.clone(),
                usage: LlmUsage::default(),
            })
        }
    }

    struct FailingLlm;

    #[async_trait::async_trait]
    impl LlmClient for FailingLlm {
        fn provider_name(&self) -> &str {
            "failing"
        }

        async fn complete(&self, _request: &LlmRequest) -> AppResult<LlmResponse> {
            Err(AppError::Llm("request timed out".to_string()))
        }
    }

    const TEXTS: [&str; 3] = [
        "Each player places two settlements and two roads during setup.",
        "The robber moves whenever a seven is rolled.",
        "The first player to reach ten victory points wins the game.",
    ];

    async fn session(store: &SessionStore, embedder: &MockProvider) -> Arc<Session> {
        let chunks: Vec<Chunk> = TEXTS
            .iter()
            .enumerate()
            .map(|(i, t)| Chunk::new(1, i as u32, t.to_string(), (0, t.len()), "recursive"))
            .collect();
        let texts: Vec<String> = TEXTS.iter().map(|t| t.to_string()).collect();
        let embeddings = embedder.embed_batch(&texts).await.unwrap();
        let index = MemoryIndex::build(chunks, embeddings, embedder.dimensions()).unwrap();
        store.create("catan.pdf", Box::new(index))
    }

    fn settings(top_k: usize) -> AnswerSettings {
        AnswerSettings {
            top_k,
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_prompt_built_from_retrieved_chunks_only() {
        let store = SessionStore::new();
        let session = session(&store, &MockProvider::new(256)).await;
        let llm = Arc::new(EchoLlm::default());
        let answerer = Answerer::new(
            llm.clone(),
            Arc::new(MockProvider::new(256)),
            PromptTemplate::builtin_qa(),
            settings(1),
        );

        let prompt = answerer
            .answer(&session, "  How many victory points win the game?  ")
            .await
            .unwrap();

        assert!(prompt.contains("ten victory points"));
        assert!(!prompt.contains("robber"));
        assert!(prompt.ends_with("Question: How many victory points win the game?\nHelpful Answer:"));

        let requests = llm.requests.lock().unwrap();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].temperature, Some(0.0));
        assert_eq!(requests[0].model, "gpt-4-1106-preview");
    }

    #[tokio::test]
    async fn test_every_request_uses_zero_temperature() {
        let store = SessionStore::new();
        let session = session(&store, &MockProvider::new(256)).await;
        let llm = Arc::new(EchoLlm::default());
        let answerer = Answerer::new(
            llm.clone(),
            Arc::new(MockProvider::new(256)),
            PromptTemplate::builtin_qa(),
            AnswerSettings {
                model: "llama3.2".to_string(),
                max_tokens: Some(256),
                ..settings(2)
            },
        );

        answerer.answer(&session, "Who goes first?").await.unwrap();
        answerer.answer(&session, "When does the robber move?").await.unwrap();

        let requests = llm.requests.lock().unwrap();
        assert_eq!(requests.len(), 2);
        for request in requests.iter() {
            assert_eq!(request.temperature, Some(0.0));
            assert_eq!(request.max_tokens, Some(256));
        }
    }

    #[tokio::test]
    async fn test_context_capped() {
        let store = SessionStore::new();
        let session = session(&store, &MockProvider::new(256)).await;
        let answerer = Answerer::new(
            Arc::new(EchoLlm::default()),
            Arc::new(MockProvider::new(256)),
            PromptTemplate::new("bare", "{{context}}|{{question}}"),
            AnswerSettings {
                max_context_chars: 70,
                ..settings(3)
            },
        );

        let prompt = answerer.answer(&session, "robber seven").await.unwrap();
        let (context, _) = prompt.split_once('|').unwrap();
        assert!(context.chars().count() <= 70);
        assert!(context.contains("robber"));
    }

    #[tokio::test]
    async fn test_blank_question_rejected() {
        let store = SessionStore::new();
        let session = session(&store, &MockProvider::new(256)).await;
        let llm = Arc::new(EchoLlm::default());
        let answerer = Answerer::new(
            llm.clone(),
            Arc::new(MockProvider::new(256)),
            PromptTemplate::builtin_qa(),
            settings(4),
        );

        let err = answerer.answer(&session, " \n ").await.unwrap_err();
        assert!(matches!(err, AppError::InvalidInput(_)));
        assert!(llm.requests.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_llm_failure_propagates() {
        let store = SessionStore::new();
        let session = session(&store, &MockProvider::new(256)).await;
        let answerer = Answerer::new(
            Arc::new(FailingLlm),
            Arc::new(MockProvider::new(256)),
            PromptTemplate::builtin_qa(),
            settings(4),
        );

        let err = answerer.answer(&session, "Who starts?").await.unwrap_err();
        assert_eq!(err.kind(), helper_core::ErrorKind::Processing);
    }
}
