//! Page-aware chunking for extracted document text.
//!
//! This module provides:
//! - A recursive separator splitter that guarantees overlap between neighbours
//! - A semantic splitter built on the `text-splitter` crate
//! - Chunk metadata (page, character range, content hash, splitter)

mod metadata;
mod pipeline;
pub mod splitters;

pub use pipeline::{ChunkConfig, ChunkPipeline};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A contiguous span of document text with its origin.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Chunk {
    /// Unique identifier (UUID v4)
    pub id: String,

    /// Chunk position in the document (0-indexed, across pages)
    pub position: u32,

    /// Chunk text content
    pub text: String,

    /// Metadata about the chunk's origin
    pub metadata: ChunkMetadata,
}

/// Where a chunk came from and how it was cut.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChunkMetadata {
    /// Originating page (1-indexed)
    pub page: u32,

    /// Character range within the page text
    pub char_range: (usize, usize),

    /// Character count
    pub char_count: usize,

    /// SHA-256 hash of chunk text
    pub hash: String,

    /// Timestamp when chunk was created
    pub created_at: DateTime<Utc>,

    /// Splitter used ("recursive" | "text-splitter")
    pub splitter_used: String,
}

impl Chunk {
    /// Create a new chunk with generated ID and timestamp.
    pub fn new(
        page: u32,
        position: u32,
        text: String,
        char_range: (usize, usize),
        splitter_used: &str,
    ) -> Self {
        let id = uuid::Uuid::new_v4().to_string();
        let char_count = text.chars().count();
        let hash = metadata::calculate_hash(&text);

        Self {
            id,
            position,
            text,
            metadata: ChunkMetadata {
                page,
                char_range,
                char_count,
                hash,
                created_at: Utc::now(),
                splitter_used: splitter_used.to_string(),
            },
        }
    }
}
