//! Recursive separator splitter.
//!
//! Cuts at the last paragraph break that fits, then line break, then space,
//! and finally anywhere. Sizes are counted in characters, not bytes.
//!
//! Every chunk after the first on a page starts at a word boundary at least
//! `overlap` characters before the end of the previous chunk, so neighbours
//! always share at least `overlap` characters.

use super::{ChunkSplitter, TextSpan};
use crate::chunk::ChunkConfig;
use helper_core::AppResult;

/// Separators in priority order. The empty separator means a hard cut.
pub const DEFAULT_SEPARATORS: [&str; 4] = ["\n\n", "\n", " ", ""];

#[derive(Debug, Clone)]
pub struct RecursiveSplitter {
    separators: Vec<Vec<char>>,
}

impl RecursiveSplitter {
    pub fn with_separators(separators: &[&str]) -> Self {
        Self {
            separators: separators.iter().map(|s| s.chars().collect()).collect(),
        }
    }

    /// Pick where the chunk starting at `start` ends (exclusive). The
    /// trimmed chunk has to reach past `min_end`.
    fn find_cut(&self, chars: &[char], start: usize, limit: usize, min_end: usize) -> usize {
        for sep in &self.separators {
            if sep.is_empty() {
                return limit;
            }

            let Some(last) = limit.checked_sub(sep.len()) else {
                continue;
            };

            for i in (start + 1..=last).rev() {
                if chars[i..i + sep.len()] == sep[..] {
                    // Earlier occurrences only give shorter chunks.
                    if trim_end(chars, start, i) > min_end {
                        return i + sep.len();
                    }
                    break;
                }
            }
        }

        limit
    }
}

impl Default for RecursiveSplitter {
    fn default() -> Self {
        Self::with_separators(&DEFAULT_SEPARATORS)
    }
}

impl ChunkSplitter for RecursiveSplitter {
    fn name(&self) -> &'static str {
        "recursive"
    }

    fn split(&self, text: &str, config: &ChunkConfig) -> AppResult<Vec<TextSpan>> {
        let chars: Vec<char> = text.chars().collect();
        let len = chars.len();

        let mut spans = Vec::new();
        let mut prev_end: Option<usize> = None;
        let mut start = skip_whitespace(&chars, 0);

        while start < len {
            let limit = (start + config.chunk_size).min(len);
            let min_end = prev_end.unwrap_or(start).max(start + config.overlap);
            let cut = if limit == len {
                len
            } else {
                self.find_cut(&chars, start, limit, min_end)
            };
            let end = trim_end(&chars, start, cut);

            let pushed = end > start && prev_end.map_or(true, |p| end > p);
            if pushed {
                spans.push(TextSpan::from_chars(&chars, start, end));
                prev_end = Some(end);
            }

            if cut >= len {
                break;
            }

            start = if pushed {
                next_start(&chars, start, end, config.overlap)
            } else {
                skip_whitespace(&chars, cut)
            };
        }

        tracing::debug!(
            "Recursive splitter created {} chunks from {} chars",
            spans.len(),
            len
        );

        Ok(spans)
    }
}

fn skip_whitespace(chars: &[char], mut i: usize) -> usize {
    while i < chars.len() && chars[i].is_whitespace() {
        i += 1;
    }
    i
}

fn trim_end(chars: &[char], start: usize, mut end: usize) -> usize {
    while end > start && chars[end - 1].is_whitespace() {
        end -= 1;
    }
    end
}

fn is_word_start(chars: &[char], i: usize) -> bool {
    i > 0 && !chars[i].is_whitespace() && chars[i - 1].is_whitespace()
}

/// Latest word start in `(start, end - overlap]`, or a hard position when
/// the window has none.
fn next_start(chars: &[char], start: usize, end: usize, overlap: usize) -> usize {
    let target = end.saturating_sub(overlap);
    if target <= start {
        return start + 1;
    }

    (start + 1..=target)
        .rev()
        .find(|&i| is_word_start(chars, i))
        .unwrap_or(target)
}
