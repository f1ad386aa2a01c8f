pub mod agents;
pub mod coordinator;
pub mod engine;
pub mod pipeline;
pub mod types;

pub use coordinator::Coordinator;
pub use engine::ReviewWorkflow;
pub use pipeline::{is_approved, needs_editing, ContentPipeline, PipelineReport, PublishPath, ReviewResult};
pub use types::{
    AgentOutput, AgentRequest, AgentTurn, CoordinatorAction, CoordinatorState, FeedbackAnswer, Participant,
    PendingReview, ReviewRequest, WorkflowEvent,
};
