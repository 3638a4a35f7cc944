//! Chunking pipeline orchestrator.

use super::{
    splitters::{ChunkSplitter, RecursiveSplitter, SemanticSplitter},
    Chunk,
};
use crate::ingest::Page;
use helper_core::config::{ChunkStrategy, ChunkingConfig};
use helper_core::{AppError, AppResult};

/// Configuration for the chunking pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChunkConfig {
    /// Maximum chunk size in characters
    pub chunk_size: usize,

    /// Characters shared with the previous chunk on the same page
    pub overlap: usize,

    /// Which splitter to use
    pub strategy: ChunkStrategy,
}

impl ChunkConfig {
    pub fn new(chunk_size: usize, overlap: usize, strategy: ChunkStrategy) -> AppResult<Self> {
        if chunk_size == 0 {
            return Err(AppError::Config(
                "chunk_size must be greater than zero".to_string(),
            ));
        }
        if overlap >= chunk_size {
            return Err(AppError::Config(format!(
                "chunk_overlap ({}) must be smaller than chunk_size ({})",
                overlap, chunk_size
            )));
        }

        Ok(Self {
            chunk_size,
            overlap,
            strategy,
        })
    }
}

impl Default for ChunkConfig {
    fn default() -> Self {
        Self {
            chunk_size: 1000,
            overlap: 200,
            strategy: ChunkStrategy::Recursive,
        }
    }
}

impl TryFrom<&ChunkingConfig> for ChunkConfig {
    type Error = AppError;

    fn try_from(settings: &ChunkingConfig) -> AppResult<Self> {
        Self::new(settings.chunk_size, settings.chunk_overlap, settings.strategy)
    }
}

/// Splits pages into positioned chunks.
pub struct ChunkPipeline {
    config: ChunkConfig,
    splitter: Box<dyn ChunkSplitter>,
}

impl ChunkPipeline {
    /// Create a new pipeline with configuration.
    pub fn new(config: ChunkConfig) -> Self {
        let splitter: Box<dyn ChunkSplitter> = match config.strategy {
            ChunkStrategy::Recursive => Box::new(RecursiveSplitter::default()),
            ChunkStrategy::Semantic => Box::new(SemanticSplitter),
        };

        Self { config, splitter }
    }

    pub fn config(&self) -> &ChunkConfig {
        &self.config
    }

    /// Chunk every page in order. Positions run across the whole document;
    /// chunks never span a page boundary.
    pub fn process(&self, pages: &[Page]) -> AppResult<Vec<Chunk>> {
        let mut chunks = Vec::new();

        for page in pages {
            let spans = self.splitter.split(&page.text, &self.config)?;

            for span in spans {
                let position = chunks.len() as u32;
                chunks.push(Chunk::new(
                    page.number,
                    position,
                    span.text,
                    (span.start, span.end),
                    self.splitter.name(),
                ));
            }
        }

        tracing::info!(
            "Chunking complete: {} chunks from {} pages using {}",
            chunks.len(),
            pages.len(),
            self.splitter.name()
        );

        Ok(chunks)
    }
}
