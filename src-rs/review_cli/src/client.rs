use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use draft_review_rs::api::{CreateRunRequest, FeedbackRequest, RunView};
use reqwest::blocking::{Client, RequestBuilder, Response};

// Drafting runs a full model call before the server answers.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(180);

pub struct HTTPClient {
    pub base_url: String,
    pub token: Option<String>,
    client: Client,
}

impl HTTPClient {
    pub fn new(base_url: &str, token: Option<String>) -> Result<Self> {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .context("building http client")?;
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            token,
            client,
        })
    }

    pub fn create_run(&self, topic: &str) -> Result<RunView> {
        let url = format!("{}/runs", self.base_url);
        let req = self.client.post(url).json(&CreateRunRequest {
            topic: topic.to_string(),
        });
        decode(self.authorized(req).send()?)
    }

    pub fn send_feedback(&self, run_id: &str, request_id: &str, answer: &str) -> Result<RunView> {
        let url = format!("{}/runs/{}/feedback", self.base_url, run_id);
        let req = self.client.post(url).json(&FeedbackRequest {
            request_id: request_id.to_string(),
            answer: answer.to_string(),
        });
        decode(self.authorized(req).send()?)
    }

    fn authorized(&self, req: RequestBuilder) -> RequestBuilder {
        match &self.token {
            Some(token) => req.bearer_auth(token),
            None => req,
        }
    }
}

fn decode(resp: Response) -> Result<RunView> {
    let status = resp.status();
    if status.is_success() {
        return resp.json::<RunView>().context("decoding run");
    }
    let body = resp.text().unwrap_or_default();
    let message = serde_json::from_str::<serde_json::Value>(&body)
        .ok()
        .and_then(|v| v.get("error").and_then(|e| e.as_str()).map(str::to_string))
        .unwrap_or(body);
    Err(anyhow!("http {}: {}", status.as_u16(), message))
}
