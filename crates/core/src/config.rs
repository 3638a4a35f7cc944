//! Configuration management for the Board Game Helper service.
//!
//! This module handles loading and merging configuration from multiple sources:
//! - Built-in defaults
//! - A YAML config file (`HELPER_CONFIG`, or `./helper.yaml` when present)
//! - Environment variables
//! - Command-line flags
//!
//! Later sources win over earlier ones.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{AppError, AppResult};

/// Config file picked up from the working directory when `HELPER_CONFIG` is unset.
pub const DEFAULT_CONFIG_FILE: &str = "helper.yaml";

/// Environment variable holding the provider credential.
pub const API_KEY_ENV: &str = "OPENAI_API_KEY";

/// Providers understood by both the completion and embedding factories.
pub const KNOWN_LLM_PROVIDERS: [&str; 2] = ["openai", "ollama"];

/// Embedding providers; `mock` is deterministic and offline.
pub const KNOWN_EMBEDDING_PROVIDERS: [&str; 3] = ["openai", "ollama", "mock"];

/// Main application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// HTTP listener settings
    pub server: ServerConfig,

    /// Completion model settings
    pub llm: LlmSettings,

    /// Embedding model settings
    pub embedding: EmbeddingSettings,

    /// Chunk size/overlap
    pub chunking: ChunkingConfig,

    /// Retrieval settings for the query answerer
    pub retrieval: RetrievalConfig,

    /// Prompt template override
    pub prompt: PromptConfig,

    /// Logging settings
    pub logging: LoggingConfig,

    /// API key for the provider (never serialized back out)
    #[serde(skip)]
    pub api_key: Option<String>,

    /// File the YAML layer was read from, if any
    #[serde(skip)]
    pub config_file: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Upper bound for an upload request body, in bytes
    pub max_upload_bytes: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
            max_upload_bytes: 50 * 1024 * 1024,
        }
    }
}

/// Completion provider configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmSettings {
    /// "openai" or "ollama"
    pub provider: String,
    pub model: String,
    /// Custom base URL; provider default when unset
    pub endpoint: Option<String>,
    pub max_tokens: Option<u32>,
    /// Per-request timeout applied to the provider HTTP client
    pub timeout_secs: u64,
}

impl Default for LlmSettings {
    fn default() -> Self {
        Self {
            provider: "openai".to_string(),
            model: "gpt-4-1106-preview".to_string(),
            endpoint: None,
            max_tokens: None,
            timeout_secs: 60,
        }
    }
}

/// Embedding provider configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EmbeddingSettings {
    /// "openai", "ollama" or "mock"
    pub provider: String,
    pub model: String,
    /// Expected vector length; responses of any other length are rejected
    pub dimensions: usize,
    pub endpoint: Option<String>,
    /// Texts per embedding request
    pub batch_size: usize,
    pub timeout_secs: u64,
}

impl Default for EmbeddingSettings {
    fn default() -> Self {
        Self {
            provider: "openai".to_string(),
            model: "text-embedding-3-small".to_string(),
            dimensions: 1536,
            endpoint: None,
            batch_size: 100,
            timeout_secs: 60,
        }
    }
}

/// Splitter selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChunkStrategy {
    /// Separator-priority splitter with a guaranteed overlap
    Recursive,
    /// `text-splitter` semantic levels
    Semantic,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ChunkingConfig {
    /// Maximum chunk length in characters
    pub chunk_size: usize,
    /// Characters shared with the previous chunk
    pub chunk_overlap: usize,
    pub strategy: ChunkStrategy,
}

impl Default for ChunkingConfig {
    fn default() -> Self {
        Self {
            chunk_size: 1000,
            chunk_overlap: 200,
            strategy: ChunkStrategy::Recursive,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RetrievalConfig {
    /// Chunks retrieved per question
    pub top_k: usize,
    /// Cap on the context handed to the model, in characters
    pub max_context_chars: usize,
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            top_k: 4,
            max_context_chars: 8000,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PromptConfig {
    /// Handlebars file replacing the built-in QA template
    pub template_path: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: Option<String>,
    pub color: bool,
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: None,
            color: true,
            json: false,
        }
    }
}

impl AppConfig {
    /// Load configuration from the config file and environment variables.
    ///
    /// Environment variables:
    /// - `HELPER_CONFIG`: Path to a YAML config file
    /// - `HELPER_HOST` / `HELPER_PORT`: Listener address
    /// - `HELPER_LLM_PROVIDER` / `HELPER_LLM_MODEL`: Completion provider
    /// - `HELPER_EMBEDDING_PROVIDER` / `HELPER_EMBEDDING_MODEL`: Embedding provider
    /// - `HELPER_TOP_K`: Retrieved chunks per question
    /// - `OPENAI_API_KEY`: Provider credential
    /// - `OLLAMA_URL`: Ollama base URL for both providers when set to ollama
    /// - `RUST_LOG`: Log level
    /// - `NO_COLOR`: Disable colored output
    ///
    /// # Example
    /// ```no_run
    /// use helper_core::config::AppConfig;
    ///
    /// let config = AppConfig::load().expect("Failed to load config");
    /// println!("Listening on {}:{}", config.server.host, config.server.port);
    /// ```
    pub fn load() -> AppResult<Self> {
        let explicit = std::env::var("HELPER_CONFIG").ok().map(PathBuf::from);
        Self::load_from(explicit.as_deref())
    }

    /// Load configuration using an explicit config file path.
    ///
    /// An explicit path must exist; the implicit `./helper.yaml` is optional.
    pub fn load_from(config_file: Option<&Path>) -> AppResult<Self> {
        let mut config = match config_file {
            Some(path) => {
                if !path.exists() {
                    return Err(AppError::Config(format!(
                        "Config file does not exist: {:?}",
                        path
                    )));
                }
                Self::from_yaml_file(path)?
            }
            None => {
                let implicit = PathBuf::from(DEFAULT_CONFIG_FILE);
                if implicit.exists() {
                    Self::from_yaml_file(&implicit)?
                } else {
                    Self::default()
                }
            }
        };

        config.apply_env();
        Ok(config)
    }

    /// Parse a YAML config file. Missing sections fall back to defaults.
    pub fn from_yaml_file(path: &Path) -> AppResult<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| {
            AppError::Config(format!("Failed to read config file {:?}: {}", path, e))
        })?;

        let mut config = Self::from_yaml_str(&contents).map_err(|e| {
            AppError::Config(format!("Failed to parse config file {:?}: {}", path, e))
        })?;
        config.config_file = Some(path.to_path_buf());

        tracing::debug!("Loaded config file {:?}", path);
        Ok(config)
    }

    /// Parse configuration from a YAML string.
    pub fn from_yaml_str(contents: &str) -> AppResult<Self> {
        if contents.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(contents)?)
    }

    /// Environment variables override the YAML layer.
    fn apply_env(&mut self) {
        if let Ok(host) = std::env::var("HELPER_HOST") {
            self.server.host = host;
        }

        if let Some(port) = std::env::var("HELPER_PORT")
            .ok()
            .and_then(|p| p.parse::<u16>().ok())
        {
            self.server.port = port;
        }

        if let Ok(provider) = std::env::var("HELPER_LLM_PROVIDER") {
            self.llm.provider = provider;
        }

        if let Ok(model) = std::env::var("HELPER_LLM_MODEL") {
            self.llm.model = model;
        }

        if let Ok(provider) = std::env::var("HELPER_EMBEDDING_PROVIDER") {
            self.embedding.provider = provider;
        }

        if let Ok(model) = std::env::var("HELPER_EMBEDDING_MODEL") {
            self.embedding.model = model;
        }

        if let Some(top_k) = std::env::var("HELPER_TOP_K")
            .ok()
            .and_then(|k| k.parse::<usize>().ok())
        {
            self.retrieval.top_k = top_k;
        }

        if let Ok(url) = std::env::var("OLLAMA_URL") {
            if self.llm.provider == "ollama" && self.llm.endpoint.is_none() {
                self.llm.endpoint = Some(url.clone());
            }
            if self.embedding.provider == "ollama" && self.embedding.endpoint.is_none() {
                self.embedding.endpoint = Some(url);
            }
        }

        self.api_key = std::env::var(API_KEY_ENV).ok().filter(|k| !k.is_empty());

        if let Ok(level) = std::env::var("RUST_LOG") {
            self.logging.level = Some(level);
        }

        if std::env::var("NO_COLOR").is_ok() {
            self.logging.color = false;
        }
    }

    /// Apply CLI overrides to the configuration.
    ///
    /// CLI flags take precedence over environment variables and the config file.
    pub fn with_overrides(
        mut self,
        host: Option<String>,
        port: Option<u16>,
        log_level: Option<String>,
        verbose: bool,
        no_color: bool,
    ) -> Self {
        if let Some(host) = host {
            self.server.host = host;
        }

        if let Some(port) = port {
            self.server.port = port;
        }

        if let Some(log_level) = log_level {
            self.logging.level = Some(log_level);
        }

        if verbose {
            // Verbose mode implies debug logging
            if self.logging.level.is_none() {
                self.logging.level = Some("debug".to_string());
            }
        }

        if no_color {
            self.logging.color = false;
        }

        self
    }

    /// Whether any configured provider needs the credential.
    pub fn requires_api_key(&self) -> bool {
        self.llm.provider == "openai" || self.embedding.provider == "openai"
    }

    /// Validate the merged configuration.
    ///
    /// A missing API key is deliberately not an error: it only fails at request
    /// time, so startup merely warns about it.
    pub fn validate(&self) -> AppResult<()> {
        if !KNOWN_LLM_PROVIDERS.contains(&self.llm.provider.as_str()) {
            return Err(AppError::Config(format!(
                "Unknown LLM provider: {}. Supported: {}",
                self.llm.provider,
                KNOWN_LLM_PROVIDERS.join(", ")
            )));
        }

        if !KNOWN_EMBEDDING_PROVIDERS.contains(&self.embedding.provider.as_str()) {
            return Err(AppError::Config(format!(
                "Unknown embedding provider: {}. Supported: {}",
                self.embedding.provider,
                KNOWN_EMBEDDING_PROVIDERS.join(", ")
            )));
        }

        if self.server.port == 0 {
            return Err(AppError::Config("Port must be non-zero".to_string()));
        }

        if self.chunking.chunk_size == 0 {
            return Err(AppError::Config("chunk_size must be positive".to_string()));
        }

        if self.chunking.chunk_overlap >= self.chunking.chunk_size {
            return Err(AppError::Config(format!(
                "chunk_overlap ({}) must be smaller than chunk_size ({})",
                self.chunking.chunk_overlap, self.chunking.chunk_size
            )));
        }

        if self.retrieval.top_k == 0 {
            return Err(AppError::Config("top_k must be at least 1".to_string()));
        }

        if self.embedding.dimensions == 0 || self.embedding.batch_size == 0 {
            return Err(AppError::Config(
                "embedding dimensions and batch_size must be positive".to_string(),
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.server.port, 8000);
        assert_eq!(config.llm.provider, "openai");
        assert_eq!(config.llm.model, "gpt-4-1106-preview");
        assert_eq!(config.embedding.model, "text-embedding-3-small");
        assert_eq!(config.chunking.chunk_size, 1000);
        assert_eq!(config.chunking.chunk_overlap, 200);
        assert_eq!(config.retrieval.top_k, 4);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let yaml = "server:\n  port: 9100\nretrieval:\n  top_k: 6\n";
        let config = AppConfig::from_yaml_str(yaml).unwrap();
        assert_eq!(config.server.port, 9100);
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.retrieval.top_k, 6);
        assert_eq!(config.chunking.chunk_overlap, 200);
    }

    #[test]
    fn test_yaml_file_recorded() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("helper.yaml");
        std::fs::write(&path, "chunking:\n  strategy: semantic\n").unwrap();

        let config = AppConfig::from_yaml_file(&path).unwrap();
        assert_eq!(config.chunking.strategy, ChunkStrategy::Semantic);
        assert_eq!(config.config_file.as_deref(), Some(path.as_path()));
    }

    #[test]
    fn test_explicit_missing_file_is_error() {
        let temp = TempDir::new().unwrap();
        let missing = temp.path().join("nope.yaml");
        assert!(AppConfig::load_from(Some(&missing)).is_err());
    }

    #[test]
    fn test_invalid_yaml_is_error() {
        assert!(AppConfig::from_yaml_str("server: [unclosed").is_err());
    }

    #[test]
    fn test_with_overrides() {
        let config = AppConfig::default().with_overrides(
            Some("127.0.0.1".to_string()),
            Some(9000),
            None,
            true,
            true,
        );

        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 9000);
        assert_eq!(config.logging.level, Some("debug".to_string()));
        assert!(!config.logging.color);
    }

    #[test]
    fn test_validate_unknown_provider() {
        let mut config = AppConfig::default();
        config.llm.provider = "unknown".to_string();
        assert!(config.validate().is_err());

        let mut config = AppConfig::default();
        config.embedding.provider = "unknown".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_overlap_must_be_smaller() {
        let mut config = AppConfig::default();
        config.chunking.chunk_overlap = 1000;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_top_k() {
        let mut config = AppConfig::default();
        config.retrieval.top_k = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_missing_api_key_is_not_an_error() {
        let mut config = AppConfig::default();
        config.api_key = None;
        assert!(config.requires_api_key());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_ollama_does_not_require_key() {
        let mut config = AppConfig::default();
        config.llm.provider = "ollama".to_string();
        config.embedding.provider = "mock".to_string();
        assert!(!config.requires_api_key());
    }
}
