use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use super::types::{CompletionRequest, LLMResponse, ProviderAdapter, ProviderError};
use crate::config::Backend;

pub struct LLMRouter {
    default_backend: Backend,
    providers: HashMap<Backend, Arc<dyn ProviderAdapter>>,
}

impl LLMRouter {
    pub fn new(default_backend: Backend) -> Self {
        Self {
            default_backend,
            providers: HashMap::new(),
        }
    }

    pub fn default_backend(&self) -> Backend {
        self.default_backend
    }

    pub fn register_provider(&mut self, backend: Backend, adapter: Arc<dyn ProviderAdapter>) {
        self.providers.insert(backend, adapter);
    }

    pub fn has_provider(&self, backend: Backend) -> bool {
        self.providers.contains_key(&backend)
    }

    pub fn complete(&self, request: CompletionRequest) -> Result<LLMResponse, ProviderError> {
        let backend = request.backend.unwrap_or(self.default_backend);
        let adapter = self.providers.get(&backend).ok_or_else(|| {
            ProviderError::new("provider_missing", &format!("backend not registered: {}", backend), false)
        })?;
        adapter.complete(request)
    }
}

impl fmt::Debug for LLMRouter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut backends: Vec<&str> = self.providers.keys().map(|b| b.as_str()).collect();
        backends.sort_unstable();
        f.debug_struct("LLMRouter")
            .field("default_backend", &self.default_backend)
            .field("providers", &backends)
            .finish()
    }
}
