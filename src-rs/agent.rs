use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, info, warn};

use crate::config::AgentConfig;
use crate::error::ToolError;
use crate::llm::{CompletionRequest, LLMRouter, Message, ProviderError};
use crate::result::AgentRunResponse;
use crate::tools::{ToolHandler, ToolRegistry, ToolSchema};

/// Anything the workflow engine can hand a conversation to.
pub trait ChatAgent: Send + Sync {
    fn name(&self) -> &str;
    fn run(&self, messages: Vec<Message>) -> Result<AgentRunResponse, ProviderError>;
}

pub struct Agent {
    pub name: String,
    pub instructions: String,
    pub config: AgentConfig,
    pub router: Arc<LLMRouter>,
    pub tools: ToolRegistry,
    pub response_format: Option<Value>,
}

impl Agent {
    pub fn new(name: &str, instructions: &str, config: AgentConfig, router: Arc<LLMRouter>) -> Self {
        let resolved_name = if name.is_empty() { "agent" } else { name };
        let instructions = if instructions.is_empty() {
            "You are a helpful assistant."
        } else {
            instructions
        };
        Self {
            name: resolved_name.to_string(),
            instructions: instructions.to_string(),
            config: config.normalized(),
            router,
            tools: ToolRegistry::new(),
            response_format: None,
        }
    }

    /// Asks the backend for a JSON object reply.
    pub fn with_json_output(mut self) -> Self {
        self.response_format = Some(serde_json::json!({"type": "json_object"}));
        self
    }

    pub fn add_tool(&mut self, name: &str, handler: ToolHandler, schema: ToolSchema) -> Result<(), ToolError> {
        self.tools.register(name, handler, schema)
    }

    /// Runs a single user prompt.
    pub fn execute(&self, input: &str) -> Result<AgentRunResponse, ProviderError> {
        self.run(vec![Message::user(input)])
    }

    fn run_loop(&self, conversation: Vec<Message>) -> Result<AgentRunResponse, ProviderError> {
        let mut messages = Vec::with_capacity(conversation.len() + 1);
        messages.push(Message::system(self.instructions.clone()));
        messages.extend(conversation);
        let mut produced = Vec::new();

        let tool_schemas = if self.tools.count() > 0 {
            Some(self.tools.get_schemas())
        } else {
            None
        };

        for iteration in 0..self.config.max_iterations {
            debug!(agent = %self.name, iteration, messages = messages.len(), "agent step");
            let request = CompletionRequest {
                messages: messages.clone(),
                tools: tool_schemas.clone(),
                temperature: Some(self.config.temperature),
                model: self.config.model.clone(),
                backend: None,
                response_format: self.response_format.clone(),
            };
            let response = self.router.complete(request)?;

            if response.tool_calls.is_empty() {
                let reply = Message::assistant(response.content.clone());
                produced.push(reply);
                return Ok(AgentRunResponse {
                    messages: produced,
                    text: response.content,
                });
            }

            let mut assistant = Message::assistant(response.content.clone());
            assistant.tool_calls = response.tool_calls.clone();
            messages.push(assistant.clone());
            produced.push(assistant);

            for call in response.tool_calls {
                info!(agent = %self.name, tool = %call.name, "calling tool");
                let result = self.tools.execute(&call.name, call.args.clone());
                let content = if result.success {
                    render_value(result.output)
                } else {
                    let err = result.error.unwrap_or_else(|| "unknown error".to_string());
                    warn!(agent = %self.name, tool = %call.name, error = %err, "tool failed");
                    format!("error: {}", err)
                };
                let reply = Message::tool(&call.id, content);
                messages.push(reply.clone());
                produced.push(reply);
            }
        }

        Err(ProviderError::new(
            "max_iterations",
            &format!("{} reached {} iterations without a final answer", self.name, self.config.max_iterations),
            false,
        ))
    }
}

impl ChatAgent for Agent {
    fn name(&self) -> &str {
        &self.name
    }

    fn run(&self, messages: Vec<Message>) -> Result<AgentRunResponse, ProviderError> {
        self.run_loop(messages)
    }
}

fn render_value(value: Option<Value>) -> String {
    match value {
        Some(Value::String(text)) => text,
        Some(val) => val.to_string(),
        None => String::new(),
    }
}
