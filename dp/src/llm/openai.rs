//! OpenAI-compatible API client implementation
//!
//! Uses Chat Completions with `response_format: json_schema`. Structured
//! outputs require an object at the root, so array schemas are wrapped in
//! `{"items": ...}` on the way out and unwrapped on the way back.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::{Value, json};
use std::time::Duration;
use tracing::{debug, info};

use super::retry::send_with_retry;
use super::{CompletionRequest, CompletionResponse, LlmClient, LlmError, StopReason, TokenUsage};
use crate::config::LlmConfig;

/// Key holding a wrapped root array
const WRAPPED_KEY: &str = "items";

/// OpenAI API client
pub struct OpenAIClient {
    model: String,
    api_key: String,
    base_url: String,
    http: Client,
    max_retries: u32,
    timeout: Duration,
}

fn is_array_schema(schema: &Value) -> bool {
    schema.get("type").and_then(Value::as_str) == Some("array")
}

/// Wrap a root array schema so it is acceptable as a structured output
fn wrap_schema(schema: &Value) -> Value {
    if is_array_schema(schema) {
        json!({
            "type": "object",
            "properties": {WRAPPED_KEY: schema},
            "required": [WRAPPED_KEY],
        })
    } else {
        schema.clone()
    }
}

/// Undo [`wrap_schema`] on the returned text
///
/// The payload is cut out of the provider's text as-is, so a rejected
/// response keeps the model's own bytes. Text that does not parse, or lacks
/// the wrapper, is passed through for the response validator to judge.
fn unwrap_content(content: String) -> String {
    match serde_json::from_str::<Value>(&content) {
        Ok(Value::Object(mut map)) if map.len() == 1 && map.contains_key(WRAPPED_KEY) => {
            let Some(inner) = map.remove(WRAPPED_KEY) else {
                return content;
            };
            wrapped_slice(&content, &inner).unwrap_or_else(|| inner.to_string())
        }
        _ => content,
    }
}

/// Locate the wrapped value's own text inside `content`
fn wrapped_slice(content: &str, inner: &Value) -> Option<String> {
    let key = format!("\"{}\"", WRAPPED_KEY);
    let after_key = content.find(&key)? + key.len();
    let rest = content[after_key..].trim_start().strip_prefix(':')?;
    let end = rest.rfind('}')?;
    let slice = rest[..end].trim();
    (serde_json::from_str::<Value>(slice).ok()? == *inner).then(|| slice.to_string())
}

impl OpenAIClient {
    pub fn from_config(config: &LlmConfig) -> Result<Self, LlmError> {
        debug!(model = %config.model(), "OpenAIClient::from_config: called");
        let api_key = config.api_key().map_err(|e| LlmError::Config(e.to_string()))?;
        let timeout = Duration::from_millis(config.timeout_ms);
        let http = Client::builder().timeout(timeout).build().map_err(LlmError::Network)?;

        Ok(Self {
            model: config.model().to_string(),
            api_key,
            base_url: config.base_url().to_string(),
            http,
            max_retries: config.max_retries,
            timeout,
        })
    }

    fn build_request_body(&self, request: &CompletionRequest) -> Value {
        debug!(%self.model, %request.max_tokens, "OpenAIClient::build_request_body: called");

        // Reasoning models take max_completion_tokens instead of max_tokens
        let uses_completion_tokens =
            self.model.starts_with("gpt-5") || self.model.starts_with("o1") || self.model.starts_with("o3");

        let mut body = json!({
            "model": self.model,
            "messages": [
                {"role": "system", "content": request.system_prompt},
                {"role": "user", "content": request.prompt},
            ],
            "response_format": {
                "type": "json_schema",
                "json_schema": {
                    "name": "response",
                    "schema": wrap_schema(&request.response_schema),
                    "strict": false,
                },
            },
        });

        if uses_completion_tokens {
            body["max_completion_tokens"] = json!(request.max_tokens);
        } else {
            body["max_tokens"] = json!(request.max_tokens);
        }

        body
    }

    fn parse_response(&self, api_response: OpenAIResponse, wrapped: bool) -> CompletionResponse {
        let choice = api_response.choices.into_iter().next();
        let (content, stop_reason) = match choice {
            Some(c) => (
                c.message.content,
                c.finish_reason
                    .as_deref()
                    .map(StopReason::from_openai)
                    .unwrap_or(StopReason::EndTurn),
            ),
            None => (None, StopReason::Other),
        };

        let content = if wrapped { content.map(unwrap_content) } else { content };

        CompletionResponse {
            content,
            stop_reason,
            usage: api_response
                .usage
                .map(|u| TokenUsage {
                    input_tokens: u.prompt_tokens,
                    output_tokens: u.completion_tokens,
                })
                .unwrap_or_default(),
        }
    }
}

#[async_trait]
impl LlmClient for OpenAIClient {
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, LlmError> {
        debug!(%self.model, "OpenAIClient::complete: called");
        let url = format!("{}/v1/chat/completions", self.base_url);
        let body = self.build_request_body(&request);
        let wrapped = is_array_schema(&request.response_schema);

        let response = send_with_retry(
            || {
                self.http
                    .post(&url)
                    .header("Authorization", format!("Bearer {}", self.api_key))
                    .header("content-type", "application/json")
                    .json(&body)
            },
            self.max_retries,
            self.timeout,
        )
        .await?;

        let api_response: OpenAIResponse = response.json().await?;
        let parsed = self.parse_response(api_response, wrapped);
        info!(
            model = %self.model,
            input_tokens = parsed.usage.input_tokens,
            output_tokens = parsed.usage.output_tokens,
            "OpenAI completion finished"
        );
        Ok(parsed)
    }
}

#[derive(Debug, Deserialize)]
struct OpenAIResponse {
    #[serde(default)]
    choices: Vec<OpenAIChoice>,
    usage: Option<OpenAIUsage>,
}

#[derive(Debug, Deserialize)]
struct OpenAIChoice {
    message: OpenAIMessage,
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OpenAIMessage {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OpenAIUsage {
    prompt_tokens: u64,
    completion_tokens: u64,
}
