use std::sync::Arc;

use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use crate::config::{env_lookup, selected_backend, AgentConfig, Backend, BackendConfig};
use crate::error::SetupError;
use crate::llm::{LLMRouter, OpenAIAdapter};

/// Installs the fmt subscriber; `RUST_LOG` overrides `default_filter`.
pub fn init_tracing(default_filter: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .try_init();
}

/// Router for the backend named by `API_HOST`, with every other fully configured backend registered too.
pub fn build_llm_router(cfg: &AgentConfig) -> Result<LLMRouter, SetupError> {
    let selected = selected_backend(env_lookup)?;
    build_llm_router_with(selected, cfg, env_lookup)
}

pub fn build_llm_router_with<F>(selected: Backend, cfg: &AgentConfig, lookup: F) -> Result<LLMRouter, SetupError>
where
    F: Fn(&str) -> Option<String>,
{
    let mut router = LLMRouter::new(selected);

    for backend in Backend::ALL {
        let backend_cfg = match BackendConfig::resolve(backend, &lookup) {
            Ok(backend_cfg) => backend_cfg,
            Err(err) if backend == selected => return Err(err.into()),
            Err(err) => {
                debug!(backend = %backend, reason = %err, "skipping backend");
                continue;
            }
        };
        if backend == selected {
            info!(backend = %backend, model = %backend_cfg.model, base_url = %backend_cfg.base_url, "using backend");
        }
        let adapter = OpenAIAdapter::new(backend_cfg, cfg.temperature)
            .map_err(|source| SetupError::Client { backend, source })?;
        router.register_provider(backend, Arc::new(adapter));
    }

    Ok(router)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ConfigError;

    #[test]
    fn selected_backend_must_be_configured() {
        let err = build_llm_router_with(Backend::OpenAI, &AgentConfig::default(), |_| None).unwrap_err();
        assert!(matches!(
            err,
            SetupError::Config(ConfigError::MissingVar {
                backend: Backend::OpenAI,
                var: "OPENAI_API_KEY"
            })
        ));
    }

    #[test]
    fn registers_every_configured_backend() {
        let lookup = |key: &str| match key {
            "GITHUB_TOKEN" => Some("ghp".to_string()),
            _ => None,
        };
        let router = build_llm_router_with(Backend::Ollama, &AgentConfig::default(), lookup).unwrap();
        assert_eq!(router.default_backend(), Backend::Ollama);
        assert!(router.has_provider(Backend::Ollama));
        assert!(router.has_provider(Backend::Github));
        assert!(!router.has_provider(Backend::Azure));
        assert!(!router.has_provider(Backend::OpenAI));
    }
}
