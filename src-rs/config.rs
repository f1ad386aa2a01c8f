use std::env;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

pub const GITHUB_BASE_URL: &str = "https://models.github.ai/inference";
pub const OPENAI_BASE_URL: &str = "https://api.openai.com/v1";
pub const OLLAMA_DEFAULT_ENDPOINT: &str = "http://localhost:11434/v1";

const GITHUB_DEFAULT_MODEL: &str = "openai/gpt-4o";
const OLLAMA_DEFAULT_MODEL: &str = "llama3.1:latest";
const OPENAI_DEFAULT_MODEL: &str = "gpt-4o";

/// Chat-completion backend, selected with `API_HOST`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    Azure,
    Github,
    Ollama,
    #[serde(rename = "openai")]
    OpenAI,
}

impl Backend {
    pub const ALL: [Backend; 4] = [Backend::Azure, Backend::Github, Backend::Ollama, Backend::OpenAI];

    pub fn as_str(&self) -> &'static str {
        match self {
            Backend::Azure => "azure",
            Backend::Github => "github",
            Backend::Ollama => "ollama",
            Backend::OpenAI => "openai",
        }
    }
}

impl Default for Backend {
    fn default() -> Self {
        Backend::Github
    }
}

impl fmt::Display for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Backend {
    type Err = ConfigError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_lowercase().as_str() {
            "azure" => Ok(Backend::Azure),
            "github" => Ok(Backend::Github),
            "ollama" => Ok(Backend::Ollama),
            "openai" => Ok(Backend::OpenAI),
            _ => Err(ConfigError::UnknownBackend(raw.to_string())),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AuthStyle {
    Bearer,
    /// Azure key auth uses an `api-key` header instead of a bearer token.
    ApiKeyHeader,
    None,
}

/// Everything needed to talk to one OpenAI-compatible endpoint.
#[derive(Clone, Debug, PartialEq)]
pub struct BackendConfig {
    pub backend: Backend,
    pub base_url: String,
    pub model: String,
    pub api_key: Option<String>,
    pub auth: AuthStyle,
}

impl BackendConfig {
    /// Reads `API_HOST` and the selected backend's variables from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        let backend = selected_backend(env_lookup)?;
        Self::resolve(backend, env_lookup)
    }

    /// Strategy lookup for a single backend. `lookup` returns `None` for unset or blank values.
    pub fn resolve<F>(backend: Backend, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let require = |var: &'static str| lookup(var).ok_or(ConfigError::MissingVar { backend, var });

        match backend {
            Backend::Azure => {
                let endpoint = require("AZURE_OPENAI_ENDPOINT")?;
                let model = require("AZURE_OPENAI_CHAT_DEPLOYMENT")?;
                let (api_key, auth) = match lookup("AZURE_OPENAI_API_KEY") {
                    Some(key) => (key, AuthStyle::ApiKeyHeader),
                    None => (require("AZURE_OPENAI_AD_TOKEN")?, AuthStyle::Bearer),
                };
                Ok(Self {
                    backend,
                    base_url: format!("{}/openai/v1", endpoint.trim_end_matches('/')),
                    model,
                    api_key: Some(api_key),
                    auth,
                })
            }
            Backend::Github => Ok(Self {
                backend,
                base_url: GITHUB_BASE_URL.to_string(),
                model: lookup("GITHUB_MODEL").unwrap_or_else(|| GITHUB_DEFAULT_MODEL.to_string()),
                api_key: Some(require("GITHUB_TOKEN")?),
                auth: AuthStyle::Bearer,
            }),
            Backend::Ollama => Ok(Self {
                backend,
                base_url: lookup("OLLAMA_ENDPOINT").unwrap_or_else(|| OLLAMA_DEFAULT_ENDPOINT.to_string()),
                model: lookup("OLLAMA_MODEL").unwrap_or_else(|| OLLAMA_DEFAULT_MODEL.to_string()),
                api_key: None,
                auth: AuthStyle::None,
            }),
            Backend::OpenAI => Ok(Self {
                backend,
                base_url: OPENAI_BASE_URL.to_string(),
                model: lookup("OPENAI_MODEL").unwrap_or_else(|| OPENAI_DEFAULT_MODEL.to_string()),
                api_key: Some(require("OPENAI_API_KEY")?),
                auth: AuthStyle::Bearer,
            }),
        }
    }
}

pub fn selected_backend<F>(lookup: F) -> Result<Backend, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup("API_HOST") {
        Some(raw) => raw.parse(),
        None => Ok(Backend::default()),
    }
}

pub fn env_lookup(key: &str) -> Option<String> {
    match env::var(key) {
        Ok(value) if !value.trim().is_empty() => Some(value.trim().to_string()),
        _ => None,
    }
}

#[derive(Clone, Debug)]
pub struct AgentConfig {
    /// Overrides the backend's configured model when set.
    pub model: Option<String>,
    pub max_iterations: usize,
    pub temperature: f64,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            model: None,
            max_iterations: 10,
            temperature: 0.3,
        }
    }
}

impl AgentConfig {
    /// Replaces zero values with defaults.
    pub fn normalized(mut self) -> Self {
        let defaults = Self::default();
        if self.max_iterations == 0 {
            self.max_iterations = defaults.max_iterations;
        }
        if self.temperature == 0.0 {
            self.temperature = defaults.temperature;
        }
        if matches!(self.model.as_deref(), Some(m) if m.trim().is_empty()) {
            self.model = None;
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn api_host_defaults_to_github() {
        let backend = selected_backend(lookup_from(&[])).unwrap();
        assert_eq!(backend, Backend::Github);
    }

    #[test]
    fn api_host_is_case_insensitive() {
        let backend = selected_backend(lookup_from(&[("API_HOST", "Ollama")])).unwrap();
        assert_eq!(backend, Backend::Ollama);
    }

    #[test]
    fn unknown_api_host_is_rejected() {
        let err = selected_backend(lookup_from(&[("API_HOST", "bedrock")])).unwrap_err();
        assert_eq!(err, ConfigError::UnknownBackend("bedrock".to_string()));
    }

    #[test]
    fn github_requires_token() {
        let err = BackendConfig::resolve(Backend::Github, lookup_from(&[])).unwrap_err();
        assert_eq!(
            err,
            ConfigError::MissingVar {
                backend: Backend::Github,
                var: "GITHUB_TOKEN"
            }
        );
    }

    #[test]
    fn github_uses_default_model() {
        let cfg = BackendConfig::resolve(Backend::Github, lookup_from(&[("GITHUB_TOKEN", "ghp")])).unwrap();
        assert_eq!(cfg.base_url, GITHUB_BASE_URL);
        assert_eq!(cfg.model, "openai/gpt-4o");
        assert_eq!(cfg.api_key.as_deref(), Some("ghp"));
        assert_eq!(cfg.auth, AuthStyle::Bearer);
    }

    #[test]
    fn ollama_needs_no_credentials() {
        let cfg = BackendConfig::resolve(Backend::Ollama, lookup_from(&[("OLLAMA_MODEL", "qwen3:8b")])).unwrap();
        assert_eq!(cfg.base_url, OLLAMA_DEFAULT_ENDPOINT);
        assert_eq!(cfg.model, "qwen3:8b");
        assert_eq!(cfg.api_key, None);
        assert_eq!(cfg.auth, AuthStyle::None);
    }

    #[test]
    fn azure_prefers_api_key_header() {
        let cfg = BackendConfig::resolve(
            Backend::Azure,
            lookup_from(&[
                ("AZURE_OPENAI_ENDPOINT", "https://example.openai.azure.com/"),
                ("AZURE_OPENAI_CHAT_DEPLOYMENT", "gpt-4o-mini"),
                ("AZURE_OPENAI_API_KEY", "k"),
                ("AZURE_OPENAI_AD_TOKEN", "t"),
            ]),
        )
        .unwrap();
        assert_eq!(cfg.base_url, "https://example.openai.azure.com/openai/v1");
        assert_eq!(cfg.model, "gpt-4o-mini");
        assert_eq!(cfg.auth, AuthStyle::ApiKeyHeader);
        assert_eq!(cfg.api_key.as_deref(), Some("k"));
    }

    #[test]
    fn azure_falls_back_to_bearer_token() {
        let cfg = BackendConfig::resolve(
            Backend::Azure,
            lookup_from(&[
                ("AZURE_OPENAI_ENDPOINT", "https://example.openai.azure.com"),
                ("AZURE_OPENAI_CHAT_DEPLOYMENT", "gpt-4o"),
                ("AZURE_OPENAI_AD_TOKEN", "t"),
            ]),
        )
        .unwrap();
        assert_eq!(cfg.auth, AuthStyle::Bearer);
        assert_eq!(cfg.api_key.as_deref(), Some("t"));
    }

    #[test]
    fn azure_without_credentials_names_token_var() {
        let err = BackendConfig::resolve(
            Backend::Azure,
            lookup_from(&[
                ("AZURE_OPENAI_ENDPOINT", "https://example.openai.azure.com"),
                ("AZURE_OPENAI_CHAT_DEPLOYMENT", "gpt-4o"),
            ]),
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::MissingVar { var: "AZURE_OPENAI_AD_TOKEN", .. }));
    }

    #[test]
    fn agent_config_zero_values_take_defaults() {
        let cfg = AgentConfig {
            model: Some("  ".to_string()),
            max_iterations: 0,
            temperature: 0.0,
        }
        .normalized();
        assert_eq!(cfg.max_iterations, 10);
        assert_eq!(cfg.temperature, 0.3);
        assert_eq!(cfg.model, None);
    }
}
