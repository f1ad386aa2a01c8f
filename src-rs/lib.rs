pub mod agent;
pub mod config;
pub mod error;
pub mod helpers;
pub mod result;

#[path = "llm/lib.rs"]
pub mod llm;
#[path = "tools/lib.rs"]
pub mod tools;
#[path = "workflow/lib.rs"]
pub mod workflow;
#[path = "runs/lib.rs"]
pub mod runs;
#[path = "api/lib.rs"]
pub mod api;

pub use agent::{Agent, ChatAgent};
pub use config::{AgentConfig, Backend, BackendConfig};
pub use error::{ConfigError, SetupError, ToolError, WorkflowError};
pub use result::AgentRunResponse;
pub use workflow::ReviewWorkflow;
