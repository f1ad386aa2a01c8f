use clap::Parser;

/// Draft a short piece with a writer agent, review it, and let an editor finish it.
#[derive(Parser, Clone, Debug)]
#[command(name = "review-cli", version)]
pub struct CLIConfig {
    /// Review server URL. Without it the workflow runs in-process.
    #[arg(long, env = "REVIEW_REMOTE_URL")]
    pub remote: Option<String>,

    /// Bearer token sent to the review server.
    #[arg(long, env = "REVIEW_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// Topic to start with instead of prompting for one.
    #[arg(long)]
    pub topic: Option<String>,

    /// Model override for in-process runs.
    #[arg(long, env = "REVIEW_MODEL")]
    pub model: Option<String>,

    #[arg(long, default_value_t = 0.3)]
    pub temperature: f64,

    /// Verbose logging to stderr.
    #[arg(long)]
    pub debug: bool,
}

impl CLIConfig {
    pub fn mode(&self) -> &'static str {
        if self.remote.is_some() {
            "remote"
        } else {
            "local"
        }
    }
}

pub fn parse_config() -> CLIConfig {
    CLIConfig::parse()
}
