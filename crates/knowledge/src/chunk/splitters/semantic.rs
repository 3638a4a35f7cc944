//! Semantic splitter using the text-splitter crate.

use super::{ChunkSplitter, TextSpan};
use crate::chunk::ChunkConfig;
use helper_core::{AppError, AppResult};
use text_splitter::{ChunkConfig as SplitterConfig, TextSplitter};

/// Splits on the highest semantic level that fits (sentences, then words).
#[derive(Debug, Clone, Copy, Default)]
pub struct SemanticSplitter;

impl ChunkSplitter for SemanticSplitter {
    fn name(&self) -> &'static str {
        "text-splitter"
    }

    fn split(&self, text: &str, config: &ChunkConfig) -> AppResult<Vec<TextSpan>> {
        let splitter_config = SplitterConfig::new(config.chunk_size)
            .with_overlap(config.overlap)
            .map_err(|e| AppError::Ingest(format!("Invalid splitter configuration: {}", e)))?;
        let splitter = TextSplitter::new(splitter_config);

        let mut spans = Vec::new();
        let mut char_offset = 0;
        let mut byte_offset = 0;

        for (offset, chunk_text) in splitter.chunk_indices(text) {
            if chunk_text.trim().is_empty() {
                continue;
            }

            // Offsets are increasing, so count only the new prefix.
            char_offset += text[byte_offset..offset].chars().count();
            byte_offset = offset;

            let start = char_offset;
            let end = start + chunk_text.chars().count();
            spans.push(TextSpan::new(chunk_text, start, end));
        }

        tracing::debug!(
            "Text splitter created {} chunks from {} bytes",
            spans.len(),
            text.len()
        );

        Ok(spans)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use helper_core::config::ChunkStrategy;

    fn config(size: usize, overlap: usize) -> ChunkConfig {
        ChunkConfig::new(size, overlap, ChunkStrategy::Semantic).unwrap()
    }

    #[test]
    fn test_text_splitter_basic() {
        let text = "Each turn, roll two dice. ".repeat(100);
        let spans = SemanticSplitter.split(&text, &config(200, 40)).unwrap();

        assert!(spans.len() > 1);
        for span in &spans {
            assert!(!span.text.is_empty());
            assert!(span.text.chars().count() <= 200);
        }
    }

    #[test]
    fn test_char_ranges_match_text() {
        let text = "Gamedex é um aplicativo 🎮 com acentuação: ã, õ, ç. ".repeat(30);
        let chars: Vec<char> = text.chars().collect();

        let spans = SemanticSplitter.split(&text, &config(120, 20)).unwrap();
        assert!(!spans.is_empty());

        for span in spans {
            let expected: String = chars[span.start..span.end].iter().collect();
            assert_eq!(span.text, expected);
        }
    }

    #[test]
    fn test_text_splitter_with_overlap() {
        let text = "a".repeat(500);
        let spans = SemanticSplitter.split(&text, &config(100, 20)).unwrap();

        assert!(spans.len() > 1);
    }
}
