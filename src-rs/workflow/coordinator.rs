//! Routing node between the drafter, an external reviewer and the finisher.
//!
//! The coordinator does no I/O. It turns agent output into either a review
//! request or the final output, and turns the reviewer's answer into the next
//! message for one of the agents.

use tracing::info;
use uuid::Uuid;

use super::types::{
    AgentOutput, AgentRequest, AgentTurn, CoordinatorAction, CoordinatorState, FeedbackAnswer, Participant,
    PendingReview, ReviewRequest,
};
use crate::error::WorkflowError;
use crate::llm::Message;

pub const REVIEW_PROMPT: &str = "Review the draft from the writer and provide a short directional note \
(tone tweaks, must-have detail, target audience, etc.). Keep it under 30 words.";
pub const EMPTY_DRAFT_PLACEHOLDER: &str = "No draft text was produced.";
pub const EMPTY_OUTPUT_PLACEHOLDER: &str = "No final text was produced.";
pub const APPROVE_KEYWORD: &str = "approve";
pub const APPROVAL_MESSAGE: &str = "The draft is approved as-is.";
pub const NO_GUIDANCE_PLACEHOLDER: &str = "No specific guidance provided.";

pub fn revision_instruction(note: &str) -> String {
    let guidance = if note.is_empty() { NO_GUIDANCE_PLACEHOLDER } else { note };
    format!(
        "A human reviewer shared the following guidance:\n{}\n\n\
         Rewrite the draft from the previous assistant message into a polished final version. \
         Keep the response under 120 words and reflect any requested tone adjustments.",
        guidance
    )
}

#[derive(Debug)]
pub struct Coordinator {
    state: CoordinatorState,
    pending: Option<PendingReview>,
}

impl Default for Coordinator {
    fn default() -> Self {
        Self::new()
    }
}

impl Coordinator {
    pub fn new() -> Self {
        Self {
            state: CoordinatorState::AwaitingDraft,
            pending: None,
        }
    }

    pub fn state(&self) -> &CoordinatorState {
        &self.state
    }

    pub fn pending(&self) -> Option<&PendingReview> {
        self.pending.as_ref()
    }

    pub fn on_agent_output(&mut self, output: AgentOutput) -> Result<CoordinatorAction, WorkflowError> {
        if self.state != CoordinatorState::AwaitingDraft {
            return Err(WorkflowError::InvalidState {
                state: self.state.to_string(),
                event: "agent output",
            });
        }

        match output {
            AgentOutput::Finisher(turn) => {
                let text = turn.response.text.trim();
                let text = if text.is_empty() { EMPTY_OUTPUT_PLACEHOLDER } else { text };
                info!("finisher produced final output");
                self.state = CoordinatorState::Terminal;
                Ok(CoordinatorAction::Output(text.to_string()))
            }
            AgentOutput::Drafter(turn) => {
                let draft_text = draft_text(&turn);
                let conversation = match turn.full_conversation {
                    Some(full) => full,
                    None => turn.response.messages,
                };
                let pending = PendingReview {
                    request_id: Uuid::new_v4().to_string(),
                    request: ReviewRequest {
                        prompt: REVIEW_PROMPT.to_string(),
                        draft_text,
                        conversation,
                    },
                };
                info!(request_id = %pending.request_id, "requesting review of draft");
                self.state = CoordinatorState::AwaitingFeedback {
                    request_id: pending.request_id.clone(),
                };
                self.pending = Some(pending.clone());
                Ok(CoordinatorAction::RequestReview(pending))
            }
        }
    }

    /// Consumes the outstanding review request and builds the next agent request.
    pub fn on_feedback(&mut self, answer: FeedbackAnswer) -> Result<AgentRequest, WorkflowError> {
        let pending = match &self.pending {
            Some(pending) if pending.request_id == answer.request_id => pending,
            Some(_) => return Err(WorkflowError::UnknownRequest(answer.request_id)),
            None => {
                return Err(WorkflowError::InvalidState {
                    state: self.state.to_string(),
                    event: "feedback",
                })
            }
        };

        let note = answer.text.trim();
        let mut messages = pending.request.conversation.clone();
        let request = if note.to_lowercase() == APPROVE_KEYWORD {
            info!(request_id = %answer.request_id, "draft approved");
            messages.push(Message::user(APPROVAL_MESSAGE));
            AgentRequest {
                target: Participant::Finisher,
                messages,
                should_respond: true,
            }
        } else {
            info!(request_id = %answer.request_id, "revision requested");
            messages.push(Message::user(revision_instruction(note)));
            AgentRequest {
                target: Participant::Drafter,
                messages,
                should_respond: true,
            }
        };

        self.pending = None;
        self.state = CoordinatorState::AwaitingDraft;
        Ok(request)
    }
}

fn draft_text(turn: &AgentTurn) -> String {
    let text = turn.response.text.trim();
    if text.is_empty() {
        EMPTY_DRAFT_PLACEHOLDER.to_string()
    } else {
        text.to_string()
    }
}
