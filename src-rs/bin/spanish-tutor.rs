use std::env;
use std::sync::Arc;

use anyhow::Context;
use draft_review_rs::agent::Agent;
use draft_review_rs::config::AgentConfig;
use draft_review_rs::helpers::{build_llm_router, init_tracing};

const INSTRUCTIONS: &str = "You are a Spanish tutor. Help the user learn Spanish. ONLY respond in Spanish.";

const DEFAULT_PROMPT: &str = "hi how are you?";

fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    init_tracing("warn");

    let args: Vec<String> = env::args().skip(1).collect();
    let prompt = if args.is_empty() {
        DEFAULT_PROMPT.to_string()
    } else {
        args.join(" ")
    };

    let config = AgentConfig::default();
    let router = Arc::new(build_llm_router(&config).context("configuring chat backend")?);
    let agent = Agent::new("Spanish tutor", INSTRUCTIONS, config, router);

    let result = agent.execute(&prompt)?;
    println!("{}", result.text);
    Ok(())
}
