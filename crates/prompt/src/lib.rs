//! Prompt system for the Board Game Helper service.
//!
//! This crate provides:
//! - The built-in question-answering template
//! - Handlebars template rendering
//! - Loading and validating template override files

pub mod builder;
pub mod loader;
pub mod types;

// Re-export main types
pub use builder::build_qa_prompt;
pub use loader::{load_template, resolve_template, validate_template};
pub use types::{PromptTemplate, QaVariables, QA_TEMPLATE};
