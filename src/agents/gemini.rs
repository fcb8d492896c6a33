use super::{ChatBackend, ChatFailure, ChatMessage, LlmReply, MessageRole};
use color_eyre::Result;
use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use std::thread::sleep;
use std::time::Duration;
use tracing::warn;

const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);
const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

// Transient server errors get a short bounded retry before giving up.
const RETRY_DELAYS_MS: [u64; 3] = [200, 500, 1000];

#[derive(Debug, Serialize)]
struct ChatRequest {
    message: String,
    history: Vec<WireMessage>,
    system: String,
    tools: Vec<ToolSchema>,
}

#[derive(Debug, Serialize)]
struct WireMessage {
    role: &'static str,
    content: String,
}

#[derive(Debug, Serialize)]
struct ToolSchema {
    name: &'static str,
    description: &'static str,
    parameters: Value,
}

fn generate_image_tool() -> ToolSchema {
    ToolSchema {
        name: "generate_image",
        description: "Generates an image from an English-language description.",
        parameters: json!({
            "type": "object",
            "properties": {
                "prompt": { "type": "string" }
            },
            "required": ["prompt"]
        }),
    }
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    success: bool,
    message: Option<String>,
    error: Option<String>,
    image: Option<String>,
    tool_call: Option<WireToolCall>,
}

#[derive(Debug, Deserialize)]
struct WireToolCall {
    name: String,
    #[serde(default)]
    arguments: Value,
}

/// Blocking client for the remote chat-completion endpoint.
pub struct GeminiClient {
    endpoint: String,
    api_key: String,
    client: Client,
}

impl GeminiClient {
    pub fn new(endpoint: &str, api_key: &str) -> Result<Self> {
        let client = Client::builder()
            .connect_timeout(CONNECT_TIMEOUT)
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        Ok(Self {
            endpoint: endpoint.to_string(),
            api_key: api_key.to_string(),
            client,
        })
    }

    fn build_request(system: &str, history: &[ChatMessage], message: &str) -> ChatRequest {
        let history = history
            .iter()
            .filter_map(|entry| {
                let role = match entry.role {
                    MessageRole::User => "user",
                    MessageRole::Assistant => "assistant",
                    // The system instruction travels in its own field.
                    MessageRole::System => return None,
                };
                Some(WireMessage { role, content: entry.content.clone() })
            })
            .collect();

        ChatRequest {
            message: message.to_string(),
            history,
            system: system.to_string(),
            tools: vec![generate_image_tool()],
        }
    }

    fn into_reply(payload: ChatResponse) -> LlmReply {
        if let Some(tool_call) = payload.tool_call {
            return LlmReply::ToolCall {
                name: tool_call.name,
                arguments: tool_call.arguments,
            };
        }
        if !payload.success {
            // Soft application-level failure: the error text still reaches
            // the user as a normal assistant message.
            let text = payload
                .error
                .unwrap_or_else(|| ChatFailure::ModelUnavailable.user_message().to_string());
            return LlmReply::Text(text);
        }
        let text = payload.message.unwrap_or_default();
        if let Some(image) = payload.image {
            return LlmReply::Image { text, image };
        }
        LlmReply::Text(text)
    }
}

impl ChatBackend for GeminiClient {
    fn chat(
        &self,
        system: &str,
        history: &[ChatMessage],
        message: &str,
    ) -> Result<LlmReply, ChatFailure> {
        let request = Self::build_request(system, history, message);

        let mut last_failure = ChatFailure::NetworkFailure;
        for (attempt, delay) in RETRY_DELAYS_MS.iter().enumerate() {
            let response = self
                .client
                .post(&self.endpoint)
                .bearer_auth(&self.api_key)
                .json(&request)
                .send();

            match response {
                Ok(response) => {
                    let status = response.status();
                    if status.is_success() {
                        let payload: ChatResponse = response.json().map_err(|error| {
                            warn!(%error, "chat response was not valid JSON");
                            ChatFailure::NetworkFailure
                        })?;
                        return Ok(Self::into_reply(payload));
                    }
                    match status.as_u16() {
                        429 => return Err(ChatFailure::RateLimited),
                        401 | 403 => return Err(ChatFailure::Unauthorized),
                        404 => return Err(ChatFailure::ModelUnavailable),
                        code if code >= 500 => {
                            warn!(code, attempt, "chat endpoint error, retrying");
                            last_failure = ChatFailure::ModelUnavailable;
                        }
                        _ => return Err(ChatFailure::NetworkFailure),
                    }
                }
                Err(error) => {
                    warn!(%error, attempt, "chat request error");
                    last_failure = ChatFailure::NetworkFailure;
                }
            }

            if attempt < RETRY_DELAYS_MS.len() - 1 {
                sleep(Duration::from_millis(*delay));
            }
        }

        Err(last_failure)
    }
}
