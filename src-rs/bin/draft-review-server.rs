use std::env;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use draft_review_rs::api::{AppState, ReviewServer, WorkflowFactory};
use draft_review_rs::config::{env_lookup, AgentConfig};
use draft_review_rs::helpers::{build_llm_router, init_tracing};
use draft_review_rs::runs::RunStore;
use draft_review_rs::workflow::agents::build_review_workflow;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    init_tracing("info");

    let port = env::var("PORT")
        .ok()
        .and_then(|raw| raw.parse::<u16>().ok())
        .unwrap_or(8080);

    let config = AgentConfig::default();
    let router = Arc::new(build_llm_router(&config).context("configuring chat backend")?);

    let runs = match env::var("RUNS_FILE") {
        Ok(path) if !path.trim().is_empty() => {
            info!(path = %path, "persisting runs");
            RunStore::open(PathBuf::from(path))
        }
        _ => RunStore::new(None),
    };

    let factory: WorkflowFactory = Arc::new(move || build_review_workflow(router.clone(), config.clone()));
    let token = env_lookup("REVIEW_TOKEN");
    if token.is_some() {
        info!("bearer token required on /runs");
    }
    let state = AppState::new(runs, factory).with_token(token);
    let server = ReviewServer::new(port, state);
    server.start().await
}
