mod cli;
mod client;
mod models;
mod repl;
mod render;
mod session;

use std::sync::Arc;

use anyhow::Context;
use draft_review_rs::config::AgentConfig;
use draft_review_rs::helpers::{build_llm_router, init_tracing};

use client::HTTPClient;
use repl::REPL;
use session::{LocalSession, RemoteSession, ReviewSession};

fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    let config = cli::parse_config();
    init_tracing(if config.debug { "debug" } else { "warn" });

    let session: Box<dyn ReviewSession> = match &config.remote {
        Some(url) => Box::new(RemoteSession::new(HTTPClient::new(url, config.token.clone())?)),
        None => {
            let agent_config = AgentConfig {
                model: config.model.clone(),
                temperature: config.temperature,
                ..AgentConfig::default()
            };
            let router = build_llm_router(&agent_config).context("configuring chat backend")?;
            Box::new(LocalSession::new(Arc::new(router), agent_config))
        }
    };

    let mut repl = REPL::new(config, session);
    repl.run();
    Ok(())
}
