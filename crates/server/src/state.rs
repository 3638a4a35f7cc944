//! Shared application state.

use helper_core::AppConfig;
use helper_knowledge::KnowledgeService;
use std::sync::Arc;

/// Cheap to clone; every handler sees the same service and session store.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<Inner>,
}

struct Inner {
    config: AppConfig,
    service: KnowledgeService,
}

impl AppState {
    pub fn new(config: AppConfig, service: KnowledgeService) -> Self {
        Self {
            inner: Arc::new(Inner { config, service }),
        }
    }

    pub fn config(&self) -> &AppConfig {
        &self.inner.config
    }

    pub fn service(&self) -> &KnowledgeService {
        &self.inner.service
    }
}
