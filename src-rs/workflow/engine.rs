use std::sync::Arc;

use tracing::debug;

use super::coordinator::Coordinator;
use super::types::{
    AgentOutput, AgentRequest, AgentTurn, CoordinatorAction, CoordinatorState, FeedbackAnswer, Participant,
    PendingReview, WorkflowEvent,
};
use crate::agent::ChatAgent;
use crate::error::WorkflowError;
use crate::llm::Message;

pub fn topic_prompt(topic: &str) -> String {
    format!("Write a short piece about: {}", topic.trim())
}

/// Single-threaded driver for writer -> coordinator -> writer/editor -> coordinator.
///
/// Each call runs agents until the coordinator either asks for review or
/// produces output, then returns. Between calls the run is suspended for as
/// long as the caller likes.
pub struct ReviewWorkflow {
    drafter: Arc<dyn ChatAgent>,
    finisher: Arc<dyn ChatAgent>,
    coordinator: Coordinator,
    revisions: u32,
    started: bool,
}

impl ReviewWorkflow {
    pub fn new(drafter: Arc<dyn ChatAgent>, finisher: Arc<dyn ChatAgent>) -> Self {
        Self {
            drafter,
            finisher,
            coordinator: Coordinator::new(),
            revisions: 0,
            started: false,
        }
    }

    pub fn state(&self) -> &CoordinatorState {
        self.coordinator.state()
    }

    pub fn pending(&self) -> Option<&PendingReview> {
        self.coordinator.pending()
    }

    /// Number of times the drafter was asked to revise.
    pub fn revisions(&self) -> u32 {
        self.revisions
    }

    pub fn start(&mut self, topic: &str) -> Result<WorkflowEvent, WorkflowError> {
        if self.started {
            return Err(WorkflowError::InvalidState {
                state: self.coordinator.state().to_string(),
                event: "start",
            });
        }
        self.started = true;
        self.dispatch(AgentRequest {
            target: Participant::Drafter,
            messages: vec![Message::user(topic_prompt(topic))],
            should_respond: true,
        })
    }

    pub fn send_feedback(&mut self, request_id: &str, answer: &str) -> Result<WorkflowEvent, WorkflowError> {
        let next = self.coordinator.on_feedback(FeedbackAnswer::new(request_id, answer))?;
        if next.target == Participant::Drafter {
            self.revisions += 1;
        }
        self.dispatch(next)
    }

    fn dispatch(&mut self, request: AgentRequest) -> Result<WorkflowEvent, WorkflowError> {
        let agent = match request.target {
            Participant::Drafter => self.drafter.clone(),
            Participant::Finisher => self.finisher.clone(),
        };
        debug!(agent = agent.name(), messages = request.messages.len(), "dispatching to agent");

        let response = agent
            .run(request.messages.clone())
            .map_err(|source| WorkflowError::Agent {
                agent: agent.name().to_string(),
                source,
            })?;

        let mut full_conversation = request.messages;
        full_conversation.extend(response.messages.iter().cloned());
        let turn = AgentTurn {
            response,
            full_conversation: Some(full_conversation),
        };
        let output = match request.target {
            Participant::Drafter => AgentOutput::Drafter(turn),
            Participant::Finisher => AgentOutput::Finisher(turn),
        };

        match self.coordinator.on_agent_output(output)? {
            CoordinatorAction::RequestReview(pending) => Ok(WorkflowEvent::ReviewRequested(pending)),
            CoordinatorAction::Output(text) => Ok(WorkflowEvent::Output { text }),
        }
    }
}
