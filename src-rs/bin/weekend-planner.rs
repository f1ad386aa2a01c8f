use std::env;
use std::sync::Arc;

use anyhow::Context;
use draft_review_rs::agent::Agent;
use draft_review_rs::config::AgentConfig;
use draft_review_rs::helpers::{build_llm_router, init_tracing};
use draft_review_rs::tools::register_weekend_tools;

const INSTRUCTIONS: &str = "You help users plan their weekends and choose the best activities for the given weather. \
If an activity would be unpleasant in the weather, don't suggest it. \
Include the date of the weekend in your response.";

const DEFAULT_PROMPT: &str = "hii what can I do this weekend in Seattle?";

fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    init_tracing("warn,draft_review_rs::tools=info");

    let args: Vec<String> = env::args().skip(1).collect();
    let prompt = if args.is_empty() {
        DEFAULT_PROMPT.to_string()
    } else {
        args.join(" ")
    };

    let config = AgentConfig::default();
    let router = Arc::new(build_llm_router(&config).context("configuring chat backend")?);
    let agent = Agent::new("Weekend Planner", INSTRUCTIONS, config, router);
    register_weekend_tools(&agent.tools)?;

    let result = agent.execute(&prompt)?;
    println!("{}", result.text);
    Ok(())
}
