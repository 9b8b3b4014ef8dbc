use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::config::LlmConfig;
use crate::error::BackendError;

/// One chat message in a completion request.
#[derive(Debug, Clone, Serialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system".to_string(),
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }
}

/// Response format requested from the backend.
#[derive(Debug, Clone)]
pub enum ResponseMode {
    /// Schema-constrained JSON (may be rejected by some backends).
    JsonSchema(Value),
    /// Free JSON object, the degraded fallback.
    JsonObject,
}

/// A completed backend call.
#[derive(Debug, Clone)]
pub struct BackendReply {
    pub text: String,
    /// Total tokens reported by the backend, when available.
    pub tokens_used: Option<u64>,
}

/// The summarization collaborator: a bounded-context model reached
/// through call-and-response completions. Mockable in tests.
#[allow(async_fn_in_trait)]
pub trait SummaryBackend {
    async fn complete(
        &self,
        messages: &[ChatMessage],
        mode: &ResponseMode,
    ) -> Result<BackendReply, BackendError>;
}

/// OpenAI-compatible chat-completions client (works against local
/// servers exposing the same API).
pub struct OpenAiClient {
    client: Client,
    config: LlmConfig,
}

impl OpenAiClient {
    pub fn new(config: LlmConfig) -> Self {
        Self {
            client: Client::new(),
            config,
        }
    }

    fn response_format(mode: &ResponseMode) -> Value {
        match mode {
            ResponseMode::JsonSchema(schema) => json!({
                "type": "json_schema",
                "json_schema": {"name": "meeting_summary", "schema": schema}
            }),
            ResponseMode::JsonObject => json!({"type": "json_object"}),
        }
    }
}

impl SummaryBackend for OpenAiClient {
    async fn complete(
        &self,
        messages: &[ChatMessage],
        mode: &ResponseMode,
    ) -> Result<BackendReply, BackendError> {
        let request = CompletionRequest {
            model: self.config.model.clone(),
            messages: messages.to_vec(),
            temperature: Some(self.config.temperature),
            max_tokens: Some(self.config.max_tokens),
            response_format: Some(Self::response_format(mode)),
        };

        let response = self
            .client
            .post(format!("{}/chat/completions", self.config.base_url))
            .bearer_auth(&self.config.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| BackendError::Request(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            // A 400 complaining about the response format means the
            // backend cannot do schema-constrained output.
            if status == reqwest::StatusCode::BAD_REQUEST
                && matches!(mode, ResponseMode::JsonSchema(_))
                && (body.contains("response_format") || body.contains("json_schema"))
            {
                return Err(BackendError::SchemaRejected);
            }
            return Err(BackendError::Request(format!("{} - {}", status, body)));
        }

        let completion: CompletionResponse = response
            .json()
            .await
            .map_err(|e| BackendError::Response(e.to_string()))?;

        let text = completion
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .unwrap_or_default();

        Ok(BackendReply {
            text,
            tokens_used: completion.usage.map(|u| u.total_tokens),
        })
    }
}

#[derive(Debug, Serialize)]
struct CompletionRequest {
    model: String,
    messages: Vec<ChatMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_format: Option<Value>,
}

#[derive(Debug, Deserialize)]
struct CompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
    #[serde(default)]
    usage: Option<Usage>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    #[serde(default)]
    content: String,
}

#[derive(Debug, Deserialize)]
struct Usage {
    #[serde(default)]
    total_tokens: u64,
}
