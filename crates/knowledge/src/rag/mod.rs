//! RAG (Retrieval-Augmented Generation) answering.
//!
//! Answers a question about one session's document using only the chunks
//! retrieved from that session's index.

mod answer;
mod context;

pub use answer::{AnswerSettings, Answerer};
pub use context::{build_context, CHUNK_SEPARATOR};
