//! Context assembly for the QA prompt.

use crate::index::ScoredChunk;

/// Placed between retrieved chunks.
pub const CHUNK_SEPARATOR: &str = "\n\n";

/// Join retrieved chunk texts, best first, without exceeding `max_chars`.
///
/// Chunks are taken whole until the next one would not fit. A first chunk
/// longer than the cap is cut at `max_chars` characters.
pub fn build_context(hits: &[ScoredChunk], max_chars: usize) -> String {
    let mut context = String::new();
    let mut used = 0;

    for hit in hits {
        let text = hit.chunk.text.as_str();
        let len = text.chars().count();
        let sep = if context.is_empty() { 0 } else { CHUNK_SEPARATOR.len() };

        if used + sep + len > max_chars {
            if context.is_empty() {
                context.extend(text.chars().take(max_chars));
            }
            break;
        }

        if sep > 0 {
            context.push_str(CHUNK_SEPARATOR);
        }
        context.push_str(text);
        used += sep + len;
    }

    context
}
