//! Document sessions and retrieval-augmented answering.
//!
//! Upload a PDF, get a session; ask questions answered from that document's
//! content; delete the session when done. Everything lives in memory.

pub mod chunk;
pub mod embeddings;
pub mod index;
pub mod ingest;
pub mod rag;
pub mod session;

#[cfg(any(test, feature = "test-fixtures"))]
pub mod fixtures;

#[cfg(test)]
mod tests;

// Re-export commonly used types
pub use chunk::{Chunk, ChunkConfig, ChunkPipeline};
pub use embeddings::{create_provider, EmbeddingProvider};
pub use index::{MemoryIndex, ScoredChunk, VectorIndex};
pub use ingest::{Page, PdfExtractor, TextExtractor, Upload};
pub use rag::{AnswerSettings, Answerer};
pub use session::{Session, SessionId, SessionInfo, SessionStore};

use helper_core::{AppConfig, AppError, AppResult};
use embeddings::providers::UnavailableProvider;
use helper_llm::{create_client, LlmClient, ProviderType, UnavailableClient};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// The session lifecycle: ingest, index, answer, delete.
pub struct KnowledgeService {
    extractor: Arc<dyn TextExtractor>,
    embedder: Arc<dyn EmbeddingProvider>,
    pipeline: ChunkPipeline,
    answerer: Answerer,
    sessions: SessionStore,
    batch_size: usize,
}

impl KnowledgeService {
    /// Build a service from configuration with the real providers.
    ///
    /// A provider that only fails for want of an API key is replaced by a
    /// stand-in that reports the problem on each request, so the service
    /// still starts.
    pub fn from_config(config: &AppConfig) -> AppResult<Self> {
        let api_key = config.api_key.as_deref();
        let llm_needs_key = ProviderType::parse(&config.llm.provider)
            .is_some_and(|provider| provider.requires_api_key());

        let llm = match create_client(
            &config.llm.provider,
            config.llm.endpoint.as_deref(),
            api_key,
            Duration::from_secs(config.llm.timeout_secs),
        ) {
            Ok(client) => client,
            Err(e) if llm_needs_key && api_key.is_none() => {
                tracing::warn!("LLM provider unavailable: {}", e);
                Arc::new(UnavailableClient::new(&config.llm.provider, e.to_string()))
            }
            Err(e) => return Err(e),
        };

        let embedder = match create_provider(&config.embedding, api_key) {
            Ok(provider) => provider,
            Err(e) if api_key.is_none() => {
                tracing::warn!("Embedding provider unavailable: {}", e);
                Arc::new(UnavailableProvider::new(
                    &config.embedding.provider,
                    &config.embedding.model,
                    config.embedding.dimensions,
                    e.to_string(),
                ))
            }
            Err(e) => return Err(e),
        };

        Self::new(config, Arc::new(PdfExtractor::new()), embedder, llm)
    }

    /// Build a service around explicit collaborators.
    pub fn new(
        config: &AppConfig,
        extractor: Arc<dyn TextExtractor>,
        embedder: Arc<dyn EmbeddingProvider>,
        llm: Arc<dyn LlmClient>,
    ) -> AppResult<Self> {
        let template = helper_prompt::resolve_template(config.prompt.template_path.as_deref())?;
        let pipeline = ChunkPipeline::new(ChunkConfig::try_from(&config.chunking)?);
        let answerer = Answerer::new(
            llm,
            Arc::clone(&embedder),
            template,
            AnswerSettings::from_config(config),
        );

        tracing::debug!(
            extractor = extractor.name(),
            embedder = embedder.provider_name(),
            "Knowledge service ready"
        );

        Ok(Self {
            extractor,
            embedder,
            pipeline,
            answerer,
            sessions: SessionStore::new(),
            batch_size: config.embedding.batch_size,
        })
    }

    pub fn sessions(&self) -> &SessionStore {
        &self.sessions
    }

    /// Ingest an upload into a new session.
    ///
    /// The session is registered only after its index is complete, so a
    /// failure at any step leaves nothing behind.
    pub async fn upload(&self, upload: Upload) -> AppResult<SessionInfo> {
        let start = Instant::now();
        upload.validate()?;

        tracing::info!(
            "Processing upload '{}' ({} bytes)",
            upload.filename,
            upload.bytes.len()
        );

        let Upload {
            filename, bytes, ..
        } = upload;

        let pages = self.extractor.extract(bytes).await?;
        let chunks = self.pipeline.process(&pages)?;

        if chunks.is_empty() {
            return Err(AppError::InvalidInput(
                "document contains no extractable text".to_string(),
            ));
        }

        let texts: Vec<String> = chunks.iter().map(|c| c.text.clone()).collect();
        let embeddings =
            embeddings::embed_all(self.embedder.as_ref(), &texts, self.batch_size).await?;
        let index = MemoryIndex::build(chunks, embeddings, self.embedder.dimensions())?;

        let session = self.sessions.create(filename, Box::new(index));
        let info = session.info();

        tracing::info!(
            session_id = %info.session_id,
            "Indexed '{}': {} pages, {} chunks in {:.2}s",
            info.filename,
            pages.len(),
            info.chunk_count,
            start.elapsed().as_secs_f64()
        );

        Ok(info)
    }

    /// Answer a question from a session's document.
    pub async fn chat(&self, session_id: &str, query: &str) -> AppResult<String> {
        let session = self.sessions.get(session_id)?;
        self.answerer.answer(&session, query).await
    }

    pub fn session_info(&self, session_id: &str) -> AppResult<SessionInfo> {
        Ok(self.sessions.get(session_id)?.info())
    }

    pub fn delete_session(&self, session_id: &str) -> AppResult<()> {
        self.sessions.delete(session_id)
    }
}
