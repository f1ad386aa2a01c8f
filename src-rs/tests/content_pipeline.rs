use std::sync::{Arc, Mutex};

use draft_review_rs::llm::{Message, ProviderError, Role};
use draft_review_rs::workflow::{ContentPipeline, PublishPath};
use draft_review_rs::{AgentRunResponse, ChatAgent, WorkflowError};

/// Replies with a fixed text and records the conversation it was handed.
struct Recorder {
    name: &'static str,
    reply: String,
    seen: Mutex<Vec<Vec<Message>>>,
}

impl Recorder {
    fn new(name: &'static str, reply: &str) -> Arc<Self> {
        Arc::new(Self {
            name,
            reply: reply.to_string(),
            seen: Mutex::new(Vec::new()),
        })
    }

    fn calls(&self) -> usize {
        self.seen.lock().unwrap().len()
    }
}

impl ChatAgent for Recorder {
    fn name(&self) -> &str {
        self.name
    }

    fn run(&self, messages: Vec<Message>) -> Result<AgentRunResponse, ProviderError> {
        self.seen.lock().unwrap().push(messages);
        Ok(AgentRunResponse::from_text(self.reply.clone()))
    }
}

struct Broken;

impl ChatAgent for Broken {
    fn name(&self) -> &str {
        "Reviewer"
    }

    fn run(&self, _messages: Vec<Message>) -> Result<AgentRunResponse, ProviderError> {
        Err(ProviderError::new("rate_limit", "slow down", true))
    }
}

struct Crew {
    writer: Arc<Recorder>,
    reviewer: Arc<Recorder>,
    editor: Arc<Recorder>,
    publisher: Arc<Recorder>,
    summarizer: Arc<Recorder>,
}

impl Crew {
    fn with_review(review: &str) -> Self {
        Self {
            writer: Recorder::new("Writer", "Bikes are great."),
            reviewer: Recorder::new("Reviewer", review),
            editor: Recorder::new("Editor", "Bikes are great, and cheap."),
            publisher: Recorder::new("Publisher", "# Bikes\nBikes are great."),
            summarizer: Recorder::new("Summarizer", "Published one piece on bikes."),
        }
    }

    fn pipeline(&self) -> ContentPipeline {
        ContentPipeline::new(
            self.writer.clone(),
            self.reviewer.clone(),
            self.editor.clone(),
            self.publisher.clone(),
            self.summarizer.clone(),
        )
    }
}

fn review(score: i64) -> String {
    format!(
        r#"{{"score": {}, "feedback": "add numbers", "clarity": 80, "completeness": 60, "accuracy": 85, "structure": 70}}"#,
        score
    )
}

#[test]
fn high_score_publishes_directly() {
    let crew = Crew::with_review(&review(92));
    let report = crew.pipeline().run("Write about bikes").unwrap();

    assert_eq!(report.path, PublishPath::Direct);
    assert_eq!(report.review.as_ref().map(|r| r.score), Some(92));
    assert_eq!(report.edited, None);
    assert_eq!(report.published, "# Bikes\nBikes are great.");
    assert_eq!(report.summary, "Published one piece on bikes.");
    assert_eq!(crew.editor.calls(), 0);

    // writer, reviewer, publisher each appended one reply before the summarizer ran
    let summarizer_saw = &crew.summarizer.seen.lock().unwrap()[0];
    assert_eq!(summarizer_saw.len(), 4);
    assert_eq!(summarizer_saw[0], Message::user("Write about bikes"));
}

#[test]
fn low_score_goes_through_the_editor() {
    let crew = Crew::with_review(&review(79));
    let report = crew.pipeline().run("Write about bikes").unwrap();

    assert_eq!(report.path, PublishPath::Edited);
    assert_eq!(report.edited.as_deref(), Some("Bikes are great, and cheap."));
    assert_eq!(crew.editor.calls(), 1);
    assert_eq!(crew.publisher.calls(), 1);

    let editor_saw = &crew.editor.seen.lock().unwrap()[0];
    assert_eq!(editor_saw.len(), 3);
    assert_eq!(editor_saw[2].role, Role::Assistant);
    assert_eq!(editor_saw[2].content, review(79));

    let publisher_saw = &crew.publisher.seen.lock().unwrap()[0];
    assert_eq!(publisher_saw.last().map(|m| m.content.as_str()), Some("Bikes are great, and cheap."));
}

#[test]
fn free_text_review_counts_as_approval() {
    let crew = Crew::with_review("Looks good to me, ship it.");
    let report = crew.pipeline().run("Write about bikes").unwrap();

    assert_eq!(report.path, PublishPath::Direct);
    assert!(report.review.is_none());
    assert_eq!(report.review_text, "Looks good to me, ship it.");
    assert_eq!(crew.editor.calls(), 0);
    assert_eq!(crew.summarizer.calls(), 1);
}

#[test]
fn agent_failure_stops_the_chain() {
    let crew = Crew::with_review("unused");
    let pipeline = ContentPipeline::new(
        crew.writer.clone(),
        Arc::new(Broken),
        crew.editor.clone(),
        crew.publisher.clone(),
        crew.summarizer.clone(),
    );

    let err = pipeline.run("Write about bikes").unwrap_err();
    match err {
        WorkflowError::Agent { agent, source } => {
            assert_eq!(agent, "Reviewer");
            assert_eq!(source.code, "rate_limit");
        }
        other => panic!("unexpected error: {}", other),
    }
    assert_eq!(crew.publisher.calls(), 0);
}
