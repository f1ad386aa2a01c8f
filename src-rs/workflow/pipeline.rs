//! Writer -> reviewer -> (editor) -> publisher -> summarizer, routed on the
//! reviewer's score. No human in the loop; one call runs the whole chain.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::agent::ChatAgent;
use crate::error::WorkflowError;
use crate::llm::Message;

/// Scores at or above this go straight to the publisher.
pub const APPROVAL_THRESHOLD: i64 = 80;

/// Structured verdict the reviewer is asked to return as JSON.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewResult {
    pub score: i64,
    pub feedback: String,
    pub clarity: i64,
    pub completeness: i64,
    pub accuracy: i64,
    pub structure: i64,
}

impl ReviewResult {
    pub fn parse(text: &str) -> Option<Self> {
        serde_json::from_str(text.trim()).ok()
    }
}

/// True only for a well-formed review scoring below the threshold.
pub fn needs_editing(review_text: &str) -> bool {
    ReviewResult::parse(review_text)
        .map(|review| review.score < APPROVAL_THRESHOLD)
        .unwrap_or(false)
}

/// An unreadable review counts as approval.
pub fn is_approved(review_text: &str) -> bool {
    ReviewResult::parse(review_text)
        .map(|review| review.score >= APPROVAL_THRESHOLD)
        .unwrap_or(true)
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PublishPath {
    Direct,
    Edited,
}

#[derive(Clone, Debug, Serialize)]
pub struct PipelineReport {
    pub draft: String,
    pub review_text: String,
    pub review: Option<ReviewResult>,
    pub path: PublishPath,
    pub edited: Option<String>,
    pub published: String,
    pub summary: String,
}

pub struct ContentPipeline {
    writer: Arc<dyn ChatAgent>,
    reviewer: Arc<dyn ChatAgent>,
    editor: Arc<dyn ChatAgent>,
    publisher: Arc<dyn ChatAgent>,
    summarizer: Arc<dyn ChatAgent>,
}

impl ContentPipeline {
    pub fn new(
        writer: Arc<dyn ChatAgent>,
        reviewer: Arc<dyn ChatAgent>,
        editor: Arc<dyn ChatAgent>,
        publisher: Arc<dyn ChatAgent>,
        summarizer: Arc<dyn ChatAgent>,
    ) -> Self {
        Self {
            writer,
            reviewer,
            editor,
            publisher,
            summarizer,
        }
    }

    /// Each agent sees the whole conversation so far, starting from `request`.
    pub fn run(&self, request: &str) -> Result<PipelineReport, WorkflowError> {
        let mut conversation = vec![Message::user(request)];

        let draft = step(&self.writer, &mut conversation)?;
        let review_text = step(&self.reviewer, &mut conversation)?;
        let review = ReviewResult::parse(&review_text);

        let (path, edited) = if needs_editing(&review_text) {
            info!(score = review.as_ref().map(|r| r.score), "review below threshold, editing");
            (PublishPath::Edited, Some(step(&self.editor, &mut conversation)?))
        } else {
            if review.is_none() {
                debug!("review was not valid JSON, treating as approved");
            }
            info!(score = review.as_ref().map(|r| r.score), "review approved");
            (PublishPath::Direct, None)
        };

        let published = step(&self.publisher, &mut conversation)?;
        let summary = step(&self.summarizer, &mut conversation)?;

        Ok(PipelineReport {
            draft,
            review_text,
            review,
            path,
            edited,
            published,
            summary,
        })
    }
}

fn step(agent: &Arc<dyn ChatAgent>, conversation: &mut Vec<Message>) -> Result<String, WorkflowError> {
    debug!(agent = agent.name(), messages = conversation.len(), "pipeline step");
    let response = agent
        .run(conversation.clone())
        .map_err(|source| WorkflowError::Agent {
            agent: agent.name().to_string(),
            source,
        })?;
    conversation.extend(response.messages);
    Ok(response.text)
}
