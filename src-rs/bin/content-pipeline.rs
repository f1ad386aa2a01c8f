use std::env;
use std::sync::Arc;

use anyhow::Context;
use draft_review_rs::config::AgentConfig;
use draft_review_rs::helpers::{build_llm_router, init_tracing};
use draft_review_rs::workflow::agents::build_content_pipeline;
use draft_review_rs::workflow::PublishPath;

const DEFAULT_PROMPT: &str = "Write a short article about the benefits of cycling to work.";

fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    init_tracing("warn,draft_review_rs::workflow=info");

    let args: Vec<String> = env::args().skip(1).collect();
    let prompt = if args.is_empty() {
        DEFAULT_PROMPT.to_string()
    } else {
        args.join(" ")
    };

    let config = AgentConfig::default();
    let router = Arc::new(build_llm_router(&config).context("configuring chat backend")?);
    let pipeline = build_content_pipeline(router, config);

    let report = pipeline.run(&prompt)?;
    let path = match report.path {
        PublishPath::Direct => "direct approval",
        PublishPath::Edited => "edited",
    };
    match &report.review {
        Some(review) => println!("Review score: {} ({})", review.score, path),
        None => println!("Review was not structured ({})", path),
    }
    println!("\n----- Published -----\n{}", report.published);
    println!("\n----- Report -----\n{}", report.summary);
    Ok(())
}
