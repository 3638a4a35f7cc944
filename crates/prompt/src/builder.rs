//! Prompt builder for rendering templates.

use crate::types::{PromptTemplate, QaVariables};
use helper_core::{AppError, AppResult};
use handlebars::Handlebars;
use serde::Serialize;

/// Render a QA prompt from retrieved context and the user's question.
///
/// # Example
/// ```
/// use helper_prompt::{build_qa_prompt, PromptTemplate};
///
/// let prompt = build_qa_prompt(
///     &PromptTemplate::builtin_qa(),
///     "The game supports 2-4 players.",
///     "How many players?",
/// ).unwrap();
/// assert!(prompt.contains("Question: How many players?"));
/// ```
pub fn build_qa_prompt(
    template: &PromptTemplate,
    context: &str,
    question: &str,
) -> AppResult<String> {
    tracing::debug!(
        "Building prompt '{}' ({} context chars)",
        template.id,
        context.chars().count()
    );

    render_template(&template.template, &QaVariables { context, question })
}

/// Render a Handlebars template with variables.
pub(crate) fn render_template<T: Serialize>(template: &str, variables: &T) -> AppResult<String> {
    let mut handlebars = Handlebars::new();

    // Disable HTML escaping for plain text
    handlebars.register_escape_fn(handlebars::no_escape);

    handlebars
        .register_template_string("prompt", template)
        .map_err(|e| AppError::Prompt(format!("Failed to register template: {}", e)))?;

    handlebars
        .render("prompt", variables)
        .map_err(|e| AppError::Prompt(format!("Failed to render template: {}", e)))
}
