use thiserror::Error;

use crate::config::Backend;
use crate::llm::ProviderError;

/// Failures while resolving a backend from the environment.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("unknown API_HOST value: {0}")]
    UnknownBackend(String),

    #[error("{backend} backend selected but {var} is not set")]
    MissingVar { backend: Backend, var: &'static str },
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ToolError {
    #[error("invalid tool name")]
    InvalidName,

    #[error("schema name {schema} does not match tool {name}")]
    SchemaMismatch { name: String, schema: String },

    #[error("tool already registered: {0}")]
    Duplicate(String),

    #[error("tool registry lock poisoned")]
    Lock,
}

/// Errors raised when the review workflow is driven out of protocol.
#[derive(Error, Debug)]
pub enum WorkflowError {
    #[error("coordinator is {state}; cannot accept {event}")]
    InvalidState { state: String, event: &'static str },

    #[error("no pending review request with id {0}")]
    UnknownRequest(String),

    #[error("agent {agent} failed: {source}")]
    Agent {
        agent: String,
        #[source]
        source: ProviderError,
    },
}

#[derive(Error, Debug)]
pub enum SetupError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("failed to build {backend} client: {source}")]
    Client {
        backend: Backend,
        #[source]
        source: ProviderError,
    },
}
