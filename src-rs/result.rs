use serde::{Deserialize, Serialize};

use crate::llm::Message;

/// Outcome of one agent run.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct AgentRunResponse {
    /// Messages produced during the run, tool traffic included.
    pub messages: Vec<Message>,
    /// Text of the final assistant message.
    pub text: String,
}

impl AgentRunResponse {
    pub fn from_text(text: impl Into<String>) -> Self {
        let text = text.into();
        Self {
            messages: vec![Message::assistant(text.clone())],
            text,
        }
    }
}
