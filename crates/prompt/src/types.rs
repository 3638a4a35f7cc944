//! Prompt types.

use serde::Serialize;

/// Built-in question-answering template.
///
/// The model must stay inside the retrieved context and say it doesn't know
/// otherwise.
pub const QA_TEMPLATE: &str = "You are a helpful board game assistant. Use the following pieces of context to answer the question at the end. If you don't know the answer from the context provided, just say that you don't know, don't try to make up an answer.

{{context}}

Question: {{question}}
Helpful Answer:";

/// Placeholders every QA template has to reference.
pub const REQUIRED_VARIABLES: [&str; 2] = ["context", "question"];

/// A named handlebars template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptTemplate {
    /// Identifier used in logs ("builtin.qa" or the file it came from)
    pub id: String,

    /// Template source with Handlebars syntax
    pub template: String,
}

impl PromptTemplate {
    /// Wrap template source under an id. Use the loader to validate it.
    pub fn new(id: impl Into<String>, template: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            template: template.into(),
        }
    }

    /// The built-in board game QA template.
    pub fn builtin_qa() -> Self {
        Self::new("builtin.qa", QA_TEMPLATE)
    }
}

impl Default for PromptTemplate {
    fn default() -> Self {
        Self::builtin_qa()
    }
}

/// Variables rendered into a QA template.
#[derive(Debug, Clone, Serialize)]
pub struct QaVariables<'a> {
    /// Retrieved chunk texts, already joined
    pub context: &'a str,

    /// The user's question
    pub question: &'a str,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_mentions_decline() {
        let template = PromptTemplate::default();
        assert_eq!(template.id, "builtin.qa");
        assert!(template.template.contains("just say that you don't know"));
        for var in REQUIRED_VARIABLES {
            assert!(template.template.contains(&format!("{{{{{}}}}}", var)));
        }
    }
}
