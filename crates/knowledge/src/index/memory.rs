//! Brute-force in-memory index.

use super::{cosine_similarity, ScoredChunk, VectorIndex};
use crate::chunk::Chunk;
use helper_core::{AppError, AppResult};

struct Entry {
    chunk: Chunk,
    embedding: Vec<f32>,
}

/// Holds every chunk with its embedding and scans them all per query.
pub struct MemoryIndex {
    entries: Vec<Entry>,
    dimensions: usize,
}

impl MemoryIndex {
    /// Build an index from chunks and their embeddings.
    ///
    /// Fails without producing anything if the inputs disagree in count or
    /// any embedding has the wrong length.
    pub fn build(
        chunks: Vec<Chunk>,
        embeddings: Vec<Vec<f32>>,
        dimensions: usize,
    ) -> AppResult<Self> {
        if chunks.len() != embeddings.len() {
            return Err(AppError::Index(format!(
                "{} chunks but {} embeddings",
                chunks.len(),
                embeddings.len()
            )));
        }

        if let Some((i, _)) = embeddings
            .iter()
            .enumerate()
            .find(|(_, e)| e.len() != dimensions)
        {
            return Err(AppError::Index(format!(
                "Embedding {} has {} dimensions, expected {}",
                i,
                embeddings[i].len(),
                dimensions
            )));
        }

        let entries = chunks
            .into_iter()
            .zip(embeddings)
            .map(|(chunk, embedding)| Entry { chunk, embedding })
            .collect::<Vec<_>>();

        tracing::debug!("Built in-memory index with {} chunks", entries.len());

        Ok(Self {
            entries,
            dimensions,
        })
    }
}

impl VectorIndex for MemoryIndex {
    fn search(&self, query_embedding: &[f32], top_k: usize) -> AppResult<Vec<ScoredChunk>> {
        if query_embedding.len() != self.dimensions {
            return Err(AppError::Index(format!(
                "Query has {} dimensions, index expects {}",
                query_embedding.len(),
                self.dimensions
            )));
        }

        let mut scored: Vec<(usize, f32)> = self
            .entries
            .iter()
            .enumerate()
            .map(|(i, e)| (i, cosine_similarity(query_embedding, &e.embedding)))
            .collect();

        // Highest score first; ties keep document order
        scored.sort_by(|a, b| b.1.total_cmp(&a.1).then(a.0.cmp(&b.0)));

        Ok(scored
            .into_iter()
            .take(top_k)
            .map(|(i, score)| ScoredChunk {
                chunk: self.entries[i].chunk.clone(),
                score,
            })
            .collect())
    }

    fn len(&self) -> usize {
        self.entries.len()
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chunk(position: u32, text: &str) -> Chunk {
        Chunk::new(1, position, text.to_string(), (0, text.len()), "recursive")
    }

    fn index() -> MemoryIndex {
        MemoryIndex::build(
            vec![chunk(0, "setup"), chunk(1, "trading"), chunk(2, "scoring")],
            vec![vec![1.0, 0.0], vec![0.6, 0.8], vec![0.0, 1.0]],
            2,
        )
        .unwrap()
    }

    #[test]
    fn test_search_orders_by_score() {
        let hits = index().search(&[0.0, 1.0], 2).unwrap();

        let texts: Vec<&str> = hits.iter().map(|h| h.chunk.text.as_str()).collect();
        assert_eq!(texts, vec!["scoring", "trading"]);
        assert!(hits[0].score >= hits[1].score);
    }

    #[test]
    fn test_top_k_larger_than_index() {
        let hits = index().search(&[1.0, 0.0], 10).unwrap();
        assert_eq!(hits.len(), 3);
        assert_eq!(hits[0].chunk.text, "setup");
    }

    #[test]
    fn test_ties_keep_document_order() {
        let index = MemoryIndex::build(
            vec![chunk(0, "first"), chunk(1, "second")],
            vec![vec![1.0, 0.0], vec![1.0, 0.0]],
            2,
        )
        .unwrap();

        let hits = index.search(&[1.0, 0.0], 2).unwrap();
        assert_eq!(hits[0].chunk.position, 0);
        assert_eq!(hits[1].chunk.position, 1);
    }

    #[test]
    fn test_build_rejects_mismatched_inputs() {
        assert!(MemoryIndex::build(vec![chunk(0, "a")], vec![], 2).is_err());
        assert!(MemoryIndex::build(vec![chunk(0, "a")], vec![vec![1.0]], 2).is_err());
    }

    #[test]
    fn test_query_dimension_checked() {
        assert!(matches!(
            index().search(&[1.0, 0.0, 0.0], 2),
            Err(AppError::Index(_))
        ));
    }

    #[test]
    fn test_len() {
        let index = index();
        assert_eq!(index.len(), 3);
        assert!(!index.is_empty());
        assert_eq!(index.dimensions(), 2);
    }
}
