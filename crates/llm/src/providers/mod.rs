//! Concrete LLM provider implementations.

pub mod ollama;
pub mod openai;
pub mod unavailable;

pub use ollama::OllamaClient;
pub use openai::OpenAiClient;
pub use unavailable::UnavailableClient;
