//! Splitter implementations wrapper module.

mod recursive;
mod semantic;

pub use recursive::{RecursiveSplitter, DEFAULT_SEPARATORS};
pub use semantic::SemanticSplitter;

use crate::chunk::ChunkConfig;
use helper_core::AppResult;

/// A piece of page text with its character range in that page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextSpan {
    pub text: String,
    pub start: usize,
    pub end: usize,
}

impl TextSpan {
    pub fn new(text: impl Into<String>, start: usize, end: usize) -> Self {
        Self {
            text: text.into(),
            start,
            end,
        }
    }

    fn from_chars(chars: &[char], start: usize, end: usize) -> Self {
        Self::new(chars[start..end].iter().collect::<String>(), start, end)
    }
}

/// Trait for chunk splitters.
pub trait ChunkSplitter: Send + Sync {
    /// Name recorded in chunk metadata
    fn name(&self) -> &'static str;

    /// Split one page of text into spans.
    fn split(&self, text: &str, config: &ChunkConfig) -> AppResult<Vec<TextSpan>>;
}
