use std::fmt;

use serde::{Deserialize, Serialize};

use crate::llm::Message;
use crate::result::AgentRunResponse;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Participant {
    Drafter,
    Finisher,
}

/// One agent turn as delivered to the coordinator.
#[derive(Clone, Debug, PartialEq)]
pub struct AgentTurn {
    pub response: AgentRunResponse,
    /// Request messages plus everything the agent produced, when the driver has it.
    pub full_conversation: Option<Vec<Message>>,
}

#[derive(Clone, Debug, PartialEq)]
pub enum AgentOutput {
    Drafter(AgentTurn),
    Finisher(AgentTurn),
}

/// Draft awaiting an external decision. Immutable once emitted.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ReviewRequest {
    pub prompt: String,
    pub draft_text: String,
    pub conversation: Vec<Message>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PendingReview {
    pub request_id: String,
    pub request: ReviewRequest,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedbackAnswer {
    pub request_id: String,
    pub text: String,
}

impl FeedbackAnswer {
    pub fn new(request_id: &str, text: &str) -> Self {
        Self {
            request_id: request_id.to_string(),
            text: text.to_string(),
        }
    }
}

/// Message to forward to an agent.
#[derive(Clone, Debug, PartialEq)]
pub struct AgentRequest {
    pub target: Participant,
    pub messages: Vec<Message>,
    pub should_respond: bool,
}

#[derive(Clone, Debug, PartialEq)]
pub enum CoordinatorAction {
    /// Suspend until the matching [`FeedbackAnswer`] arrives.
    RequestReview(PendingReview),
    /// Final workflow output.
    Output(String),
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum CoordinatorState {
    AwaitingDraft,
    AwaitingFeedback { request_id: String },
    Terminal,
}

impl fmt::Display for CoordinatorState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CoordinatorState::AwaitingDraft => f.write_str("awaiting draft"),
            CoordinatorState::AwaitingFeedback { request_id } => write!(f, "awaiting feedback for {}", request_id),
            CoordinatorState::Terminal => f.write_str("terminal"),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum WorkflowEvent {
    ReviewRequested(PendingReview),
    Output { text: String },
}
