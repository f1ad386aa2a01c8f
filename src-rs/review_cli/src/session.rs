use std::sync::Arc;

use anyhow::{anyhow, Result};
use draft_review_rs::config::AgentConfig;
use draft_review_rs::llm::LLMRouter;
use draft_review_rs::workflow::agents::build_review_workflow;
use draft_review_rs::workflow::ReviewWorkflow;

use crate::client::HTTPClient;
use crate::models::Step;

/// One review run at a time, driven either in-process or through the server.
pub trait ReviewSession {
    fn start(&mut self, topic: &str) -> Result<Step>;
    fn feedback(&mut self, request_id: &str, answer: &str) -> Result<Step>;
}

pub struct LocalSession {
    router: Arc<LLMRouter>,
    config: AgentConfig,
    workflow: Option<ReviewWorkflow>,
}

impl LocalSession {
    pub fn new(router: Arc<LLMRouter>, config: AgentConfig) -> Self {
        Self {
            router,
            config,
            workflow: None,
        }
    }
}

impl ReviewSession for LocalSession {
    fn start(&mut self, topic: &str) -> Result<Step> {
        let workflow = self
            .workflow
            .insert(build_review_workflow(self.router.clone(), self.config.clone()));
        Ok(workflow.start(topic)?.into())
    }

    fn feedback(&mut self, request_id: &str, answer: &str) -> Result<Step> {
        let workflow = self.workflow.as_mut().ok_or_else(|| anyhow!("no run in progress"))?;
        Ok(workflow.send_feedback(request_id, answer)?.into())
    }
}

pub struct RemoteSession {
    client: HTTPClient,
    run_id: Option<String>,
}

impl RemoteSession {
    pub fn new(client: HTTPClient) -> Self {
        Self { client, run_id: None }
    }
}

impl ReviewSession for RemoteSession {
    fn start(&mut self, topic: &str) -> Result<Step> {
        let view = self.client.create_run(topic)?;
        self.run_id = Some(view.run.id.clone());
        Step::try_from(view)
    }

    fn feedback(&mut self, request_id: &str, answer: &str) -> Result<Step> {
        let run_id = self.run_id.as_deref().ok_or_else(|| anyhow!("no run in progress"))?;
        let view = self.client.send_feedback(run_id, request_id, answer)?;
        Step::try_from(view)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use draft_review_rs::config::Backend;
    use draft_review_rs::llm::{CompletionRequest, LLMResponse, ProviderAdapter, ProviderError};

    use super::*;

    struct Canned(Mutex<Vec<&'static str>>);

    impl ProviderAdapter for Canned {
        fn complete(&self, _request: CompletionRequest) -> Result<LLMResponse, ProviderError> {
            let mut replies = self.0.lock().unwrap();
            let content = if replies.is_empty() { "" } else { replies.remove(0) };
            Ok(LLMResponse {
                content: content.to_string(),
                tool_calls: Vec::new(),
                raw: None,
            })
        }
    }

    fn local(replies: Vec<&'static str>) -> LocalSession {
        let mut router = LLMRouter::new(Backend::Ollama);
        router.register_provider(Backend::Ollama, Arc::new(Canned(Mutex::new(replies))));
        LocalSession::new(Arc::new(router), AgentConfig::default())
    }

    #[test]
    fn local_session_runs_draft_then_final() {
        let mut session = local(vec!["Cats are great.", "Cats are truly great."]);
        let pending = match session.start("cats").unwrap() {
            Step::Review(pending) => pending,
            other => panic!("expected review, got {:?}", other),
        };
        assert_eq!(pending.request.draft_text, "Cats are great.");

        let step = session.feedback(&pending.request_id, "approve").unwrap();
        assert_eq!(step, Step::Final("Cats are truly great.".to_string()));
    }

    #[test]
    fn feedback_without_run_is_an_error() {
        let mut session = local(vec![]);
        assert!(session.feedback("req", "approve").is_err());
    }
}
