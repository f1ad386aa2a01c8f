use std::io::{self, Write};

use draft_review_rs::workflow::PendingReview;

use crate::cli::CLIConfig;
use crate::models::HistoryEntry;

pub fn banner(cfg: &CLIConfig) {
    println!("Draft Review CLI");
    match &cfg.remote {
        Some(url) => println!("Mode: remote ({})", url),
        None => println!("Mode: local  Temp: {:.2}", cfg.temperature),
    }
    println!("Type /help for commands.");
}

pub fn prompt(label: &str) {
    print!("{}", label);
    let _ = io::stdout().flush();
}

pub fn help() {
    println!("Commands:");
    println!("  /help                  Show commands");
    println!("  /exit | /quit          Exit");
    println!("  /history               Show drafts and feedback from this session");
    println!("  /config                Show current config");
    println!("At the feedback prompt, type 'approve' to accept the draft or 'exit' to quit.");
}

pub fn draft(pending: &PendingReview) {
    println!("\n----- Writer draft -----");
    println!("{}", pending.request.draft_text.trim());
    println!("\n{}", pending.request.prompt);
    println!("Provide guidance for the editor (or 'approve' to accept the draft).");
}

pub fn final_output(text: &str) {
    println!("\n===== Final output =====");
    println!("{}", text.trim());
    println!("Workflow complete.");
}

pub fn config(cfg: &CLIConfig) {
    println!("config:");
    println!("  mode: {}", cfg.mode());
    if let Some(url) = &cfg.remote {
        println!("  remote: {}", url);
    }
    if let Some(model) = &cfg.model {
        println!("  model: {}", model);
    }
    println!("  temp: {:.2}", cfg.temperature);
    println!("  debug: {}", cfg.debug);
}

pub fn history(items: &[HistoryEntry]) {
    if items.is_empty() {
        println!("no history");
        return;
    }
    for (idx, entry) in items.iter().enumerate() {
        println!("[{}] draft> {}", idx + 1, entry.draft);
        println!("[{}] you> {}", idx + 1, entry.feedback);
    }
}

pub fn info(msg: &str) {
    println!("{}", msg);
}

pub fn error(msg: &str) {
    eprintln!("error: {}", msg);
}
