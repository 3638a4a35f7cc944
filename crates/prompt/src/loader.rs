//! Prompt loader for template override files.

use crate::types::{PromptTemplate, REQUIRED_VARIABLES};
use helper_core::{AppError, AppResult};
use std::path::Path;

/// Resolve the QA template: the file at `path` when given, else the built-in.
pub fn resolve_template(path: Option<&Path>) -> AppResult<PromptTemplate> {
    match path {
        Some(path) => load_template(path),
        None => Ok(PromptTemplate::builtin_qa()),
    }
}

/// Load a Handlebars QA template from a file.
///
/// # Example
/// ```no_run
/// use helper_prompt::load_template;
/// use std::path::Path;
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let template = load_template(Path::new("prompts/qa.hbs"))?;
/// println!("Loaded prompt: {}", template.id);
/// # Ok(())
/// # }
/// ```
pub fn load_template(path: &Path) -> AppResult<PromptTemplate> {
    tracing::debug!("Loading prompt template from: {:?}", path);

    if !path.exists() {
        return Err(AppError::Config(format!(
            "Prompt template not found: {:?}",
            path
        )));
    }

    let contents = std::fs::read_to_string(path).map_err(|e| {
        AppError::Config(format!("Failed to read prompt template {:?}: {}", path, e))
    })?;

    let template = PromptTemplate::new(path.display().to_string(), contents);
    validate_template(&template)?;

    tracing::info!("Loaded prompt template: {}", template.id);

    Ok(template)
}

/// Validate a template: it must compile and reference every required variable.
pub fn validate_template(template: &PromptTemplate) -> AppResult<()> {
    if template.template.trim().is_empty() {
        return Err(AppError::Config(
            "Prompt template cannot be empty".to_string(),
        ));
    }

    handlebars::Template::compile(&template.template).map_err(|e| {
        AppError::Config(format!(
            "Prompt template {} does not compile: {}",
            template.id, e
        ))
    })?;

    for var in REQUIRED_VARIABLES {
        if !template.template.contains(&format!("{{{{{}}}}}", var)) {
            return Err(AppError::Config(format!(
                "Prompt template {} must reference {{{{{}}}}}",
                template.id, var
            )));
        }
    }

    Ok(())
}
