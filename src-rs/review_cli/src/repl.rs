use std::io;

use crate::cli::CLIConfig;
use crate::models::{HistoryEntry, Step};
use crate::render;
use crate::session::ReviewSession;

enum Flow {
    Continue,
    Exit,
}

pub struct REPL {
    pub config: CLIConfig,
    pub session: Box<dyn ReviewSession>,
    pub history: Vec<HistoryEntry>,
}

impl REPL {
    pub fn new(config: CLIConfig, session: Box<dyn ReviewSession>) -> Self {
        Self {
            config,
            session,
            history: Vec::new(),
        }
    }

    pub fn run(&mut self) {
        render::banner(&self.config);
        let mut first_topic = self.config.topic.take();
        loop {
            let topic = match first_topic.take() {
                Some(topic) => topic,
                None => {
                    render::info("\nWhat would you like the writer to create content about?");
                    match read_line("Topic: ") {
                        Some(line) => line,
                        None => break,
                    }
                }
            };
            if topic.is_empty() {
                continue;
            }
            if topic.starts_with('/') {
                if self.handle_command(&topic) {
                    break;
                }
                continue;
            }
            if topic.eq_ignore_ascii_case("exit") {
                break;
            }
            if let Flow::Exit = self.review(&topic) {
                render::info("Exiting...");
                break;
            }
        }
    }

    fn review(&mut self, topic: &str) -> Flow {
        let mut step = match self.session.start(topic) {
            Ok(step) => step,
            Err(err) => {
                render::error(&format!("{:#}", err));
                return Flow::Continue;
            }
        };

        loop {
            let pending = match step {
                Step::Final(text) => {
                    render::final_output(&text);
                    return Flow::Continue;
                }
                Step::Review(pending) => pending,
            };

            render::draft(&pending);
            let answer = loop {
                let line = match read_line("Human feedback: ") {
                    Some(line) => line,
                    None => return Flow::Exit,
                };
                if line.starts_with('/') {
                    if self.handle_command(&line) {
                        return Flow::Exit;
                    }
                    continue;
                }
                break line;
            };
            if answer.eq_ignore_ascii_case("exit") {
                return Flow::Exit;
            }

            self.history.push(HistoryEntry {
                draft: pending.request.draft_text.clone(),
                feedback: answer.clone(),
            });
            step = match self.session.feedback(&pending.request_id, &answer) {
                Ok(next) => next,
                Err(err) => {
                    render::error(&format!("{:#}", err));
                    return Flow::Continue;
                }
            };
        }
    }

    /// Returns true when the user asked to quit.
    fn handle_command(&mut self, line: &str) -> bool {
        let cmd = line.split_whitespace().next().unwrap_or("").trim_start_matches('/');
        match cmd {
            "exit" | "quit" => return true,
            "help" => render::help(),
            "history" => render::history(&self.history),
            "config" => render::config(&self.config),
            _ => render::info("unknown command, type /help"),
        }
        false
    }
}

/// `None` on EOF or a read failure.
fn read_line(label: &str) -> Option<String> {
    render::prompt(label);
    let mut line = String::new();
    match io::stdin().read_line(&mut line) {
        Ok(0) | Err(_) => None,
        Ok(_) => Some(line.trim().to_string()),
    }
}
