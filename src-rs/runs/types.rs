use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunStatus {
    Drafting,
    AwaitingFeedback,
    Completed,
    Failed,
}

impl RunStatus {
    pub fn is_finished(&self) -> bool {
        matches!(self, RunStatus::Completed | RunStatus::Failed)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RunRecord {
    pub id: String,
    pub topic: String,
    pub status: RunStatus,
    pub draft: Option<String>,
    pub pending_request_id: Option<String>,
    pub output: Option<String>,
    pub error: Option<String>,
    pub revisions: u32,
    pub created_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
}

/// Field changes applied by [`super::RunStore::update`]; `None` leaves a field alone.
#[derive(Clone, Debug, Default)]
pub struct RunUpdate {
    pub status: Option<RunStatus>,
    pub draft: Option<String>,
    /// `Some(None)` clears the pending request.
    pub pending_request_id: Option<Option<String>>,
    pub output: Option<String>,
    pub error: Option<String>,
    pub revisions: Option<u32>,
}
