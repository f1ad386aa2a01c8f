use anyhow::{anyhow, Result};
use draft_review_rs::api::RunView;
use draft_review_rs::runs::RunStatus;
use draft_review_rs::workflow::{PendingReview, WorkflowEvent};

/// Where a session stands after each call.
#[derive(Clone, Debug, PartialEq)]
pub enum Step {
    Review(PendingReview),
    Final(String),
}

impl From<WorkflowEvent> for Step {
    fn from(event: WorkflowEvent) -> Self {
        match event {
            WorkflowEvent::ReviewRequested(pending) => Step::Review(pending),
            WorkflowEvent::Output { text } => Step::Final(text),
        }
    }
}

impl TryFrom<RunView> for Step {
    type Error = anyhow::Error;

    fn try_from(view: RunView) -> Result<Self> {
        if let Some(pending) = view.review {
            return Ok(Step::Review(pending));
        }
        match view.run.status {
            RunStatus::Completed => Ok(Step::Final(view.run.output.unwrap_or_default())),
            RunStatus::Failed => Err(anyhow!(view.run.error.unwrap_or_else(|| "run failed".to_string()))),
            status => Err(anyhow!("run {} is {:?} with no pending review", view.run.id, status)),
        }
    }
}

#[derive(Clone, Debug)]
pub struct HistoryEntry {
    pub draft: String,
    pub feedback: String,
}
