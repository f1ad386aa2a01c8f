use std::time::Duration;

use reqwest::blocking::Client;
use serde_json::{json, Value};
use tracing::{debug, warn};

use super::types::{CompletionRequest, LLMResponse, Message, ProviderAdapter, ProviderError, Role, ToolCall};
use crate::config::{AuthStyle, BackendConfig};
use crate::tools::ToolSchema;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

/// Chat-completions client shared by every backend; they all speak the OpenAI wire format.
pub struct OpenAIAdapter {
    cfg: BackendConfig,
    temperature: f64,
    client: Client,
}

impl OpenAIAdapter {
    pub fn new(cfg: BackendConfig, temperature: f64) -> Result<Self, ProviderError> {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|err| ProviderError::new("client_error", &err.to_string(), false))?;
        Ok(Self {
            cfg,
            temperature,
            client,
        })
    }
}

impl ProviderAdapter for OpenAIAdapter {
    fn complete(&self, request: CompletionRequest) -> Result<LLMResponse, ProviderError> {
        let model = request.model.clone().unwrap_or_else(|| self.cfg.model.clone());
        let temperature = request.temperature.unwrap_or(self.temperature);
        let mut payload = build_payload(&model, &request.messages, request.tools.as_ref(), temperature);
        if let Some(format) = request.response_format {
            payload["response_format"] = format;
        }

        debug!(
            backend = %self.cfg.backend,
            model = %model,
            messages = request.messages.len(),
            "sending chat completion"
        );
        send_request(&self.client, &self.cfg, &payload).map_err(|err| {
            warn!(backend = %self.cfg.backend, code = %err.code, "chat completion failed");
            err
        })
    }
}

pub(crate) fn build_payload(
    model: &str,
    messages: &[Message],
    tools: Option<&Vec<ToolSchema>>,
    temperature: f64,
) -> Value {
    let wire: Vec<Value> = messages.iter().map(wire_message).collect();

    let mut payload = json!({
        "model": model,
        "messages": wire,
        "temperature": temperature,
    });

    if let Some(tools) = tools {
        if !tools.is_empty() {
            let declarations: Vec<Value> = tools
                .iter()
                .map(|tool| {
                    json!({
                        "type": "function",
                        "function": {
                            "name": tool.name,
                            "description": tool.description,
                            "parameters": tool.parameters.clone().unwrap_or_else(|| json!({"type": "object", "properties": {}})),
                        }
                    })
                })
                .collect();
            payload["tools"] = Value::Array(declarations);
        }
    }

    payload
}

fn wire_message(msg: &Message) -> Value {
    let mut out = json!({
        "role": msg.role.as_str(),
        "content": msg.content,
    });
    if msg.role == Role::Assistant && !msg.tool_calls.is_empty() {
        let calls: Vec<Value> = msg
            .tool_calls
            .iter()
            .map(|call| {
                json!({
                    "id": call.id,
                    "type": "function",
                    "function": {
                        "name": call.name,
                        "arguments": call.args.to_string(),
                    }
                })
            })
            .collect();
        out["tool_calls"] = Value::Array(calls);
    }
    if let Some(id) = &msg.tool_call_id {
        out["tool_call_id"] = json!(id);
    }
    out
}

fn send_request(client: &Client, cfg: &BackendConfig, payload: &Value) -> Result<LLMResponse, ProviderError> {
    let endpoint = format!("{}/chat/completions", cfg.base_url.trim_end_matches('/'));
    let mut builder = client
        .post(endpoint)
        .header("Content-Type", "application/json")
        .json(payload);
    builder = match (cfg.auth, cfg.api_key.as_deref()) {
        (AuthStyle::Bearer, Some(key)) => builder.bearer_auth(key),
        (AuthStyle::ApiKeyHeader, Some(key)) => builder.header("api-key", key),
        _ => builder,
    };

    let resp = builder
        .send()
        .map_err(|err| ProviderError::new("network_error", &err.to_string(), true))?;

    let status = resp.status();
    let body = resp.text().unwrap_or_default();
    if status.is_client_error() || status.is_server_error() {
        return Err(classify_failure(status.as_u16(), &body));
    }

    let raw: Value =
        serde_json::from_str(&body).map_err(|_| ProviderError::new("parse_error", "invalid json", false))?;
    let (content, tool_calls) = parse_response(&raw);
    Ok(LLMResponse {
        content,
        tool_calls,
        raw: Some(raw),
    })
}

pub(crate) fn classify_failure(status: u16, body: &str) -> ProviderError {
    let lowered = body.to_lowercase();
    match status {
        401 | 403 => ProviderError::new("auth_error", body, false),
        429 => ProviderError::new("rate_limit", body, true),
        _ if lowered.contains("quota") => ProviderError::new("rate_limit", body, true),
        500..=599 => ProviderError::new("server_error", body, true),
        _ => ProviderError::new("api_error", body, false),
    }
}

pub(crate) fn parse_response(raw: &Value) -> (String, Vec<ToolCall>) {
    let mut tool_calls = Vec::new();

    let message = match raw
        .get("choices")
        .and_then(|v| v.as_array())
        .and_then(|list| list.first())
        .and_then(|choice| choice.get("message"))
    {
        Some(message) => message,
        None => return (String::new(), tool_calls),
    };

    // content is null when the model only calls tools
    let text = message
        .get("content")
        .and_then(|v| v.as_str())
        .unwrap_or("")
        .to_string();

    if let Some(calls) = message.get("tool_calls").and_then(|v| v.as_array()) {
        for (idx, call) in calls.iter().enumerate() {
            let function = match call.get("function") {
                Some(function) => function,
                None => continue,
            };
            let name = function.get("name").and_then(|v| v.as_str()).unwrap_or("");
            let args = match function.get("arguments") {
                Some(Value::String(encoded)) => {
                    serde_json::from_str(encoded).unwrap_or_else(|_| Value::String(encoded.clone()))
                }
                Some(other) => other.clone(),
                None => json!({}),
            };
            let id = call
                .get("id")
                .and_then(|v| v.as_str())
                .map(str::to_string)
                .unwrap_or_else(|| format!("call_{}", idx));
            tool_calls.push(ToolCall {
                id,
                name: name.to_string(),
                args,
            });
        }
    }

    (text, tool_calls)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn payload_carries_tools_as_functions() {
        let tools = vec![ToolSchema {
            name: "get_weather".to_string(),
            description: "weather".to_string(),
            parameters: None,
        }];
        let payload = build_payload("gpt-4o", &[Message::user("hi")], Some(&tools), 0.3);
        assert_eq!(payload["model"], "gpt-4o");
        assert_eq!(payload["messages"][0]["role"], "user");
        assert_eq!(payload["tools"][0]["type"], "function");
        assert_eq!(payload["tools"][0]["function"]["name"], "get_weather");
        assert_eq!(payload["tools"][0]["function"]["parameters"]["type"], "object");
    }

    #[test]
    fn payload_omits_empty_tool_list() {
        let payload = build_payload("m", &[Message::system("s")], Some(&Vec::new()), 0.5);
        assert!(payload.get("tools").is_none());
    }

    #[test]
    fn payload_encodes_tool_round_trip_messages() {
        let mut assistant = Message::assistant("");
        assistant.tool_calls.push(ToolCall {
            id: "call_1".to_string(),
            name: "get_weather".to_string(),
            args: json!({"city": "Seattle"}),
        });
        let payload = build_payload("m", &[assistant, Message::tool("call_1", "{}")], None, 0.3);
        let call = &payload["messages"][0]["tool_calls"][0];
        assert_eq!(call["id"], "call_1");
        assert_eq!(call["function"]["arguments"], "{\"city\":\"Seattle\"}");
        assert_eq!(payload["messages"][1]["role"], "tool");
        assert_eq!(payload["messages"][1]["tool_call_id"], "call_1");
    }

    #[test]
    fn parses_text_response() {
        let raw = json!({
            "choices": [{"message": {"role": "assistant", "content": "Hello there"}}]
        });
        let (text, calls) = parse_response(&raw);
        assert_eq!(text, "Hello there");
        assert!(calls.is_empty());
    }

    #[test]
    fn parses_tool_calls_with_null_content() {
        let raw = json!({
            "choices": [{"message": {
                "role": "assistant",
                "content": null,
                "tool_calls": [{
                    "id": "call_abc",
                    "type": "function",
                    "function": {"name": "get_activities", "arguments": "{\"city\":\"Seattle\",\"date\":\"2025-06-07\"}"}
                }]
            }}]
        });
        let (text, calls) = parse_response(&raw);
        assert_eq!(text, "");
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].id, "call_abc");
        assert_eq!(calls[0].name, "get_activities");
        assert_eq!(calls[0].args["date"], "2025-06-07");
    }

    #[test]
    fn missing_choices_yield_empty_response() {
        let (text, calls) = parse_response(&json!({"error": "nope"}));
        assert!(text.is_empty());
        assert!(calls.is_empty());
    }

    #[test]
    fn classifies_http_failures() {
        assert_eq!(classify_failure(401, "").code, "auth_error");
        assert_eq!(classify_failure(429, "").code, "rate_limit");
        assert_eq!(classify_failure(400, "Quota exceeded").code, "rate_limit");
        assert_eq!(classify_failure(503, "").code, "server_error");
        assert!(classify_failure(503, "").retryable);
        assert_eq!(classify_failure(404, "").code, "api_error");
    }
}
