//! Mistral chat-completions provider.
//!
//! A thin `reqwest` client for `POST /v1/chat/completions`. The base URL is
//! overridable so tests and proxies can point it at a local endpoint; any
//! OpenAI-compatible server that honours `response_format: json_object`
//! works unchanged.

use super::{ChatFuture, ChatMessage, CompletionRequest, LlmError, LlmProvider};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

const API_KEY_VAR: &str = "MISTRAL_API_KEY";

pub struct MistralProvider {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
    timeout_secs: u64,
}

impl MistralProvider {
    pub const DEFAULT_BASE_URL: &'static str = "https://api.mistral.ai";

    /// Build a provider with an explicit API key and per-call timeout.
    pub fn new(api_key: impl Into<String>, timeout_secs: u64) -> Result<Self, LlmError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| LlmError::Transport(e.to_string()))?;

        Ok(Self {
            client,
            api_key: api_key.into(),
            base_url: Self::DEFAULT_BASE_URL.to_string(),
            timeout_secs,
        })
    }

    /// Build a provider from the `MISTRAL_API_KEY` environment variable.
    pub fn from_env(timeout_secs: u64) -> Result<Self, LlmError> {
        let api_key = std::env::var(API_KEY_VAR)
            .ok()
            .filter(|k| !k.is_empty())
            .ok_or(LlmError::MissingApiKey { var: API_KEY_VAR })?;
        Self::new(api_key, timeout_secs)
    }

    /// Point the provider at a different endpoint (proxy, local server, test).
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

// ── Wire types ───────────────────────────────────────────────────────────

#[derive(Serialize)]
struct ApiRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    temperature: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_format: Option<ResponseFormat>,
}

#[derive(Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    kind: &'static str,
}

#[derive(Deserialize)]
struct ApiResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    content: String,
}

impl LlmProvider for MistralProvider {
    fn chat(&self, request: CompletionRequest) -> ChatFuture<'_> {
        Box::pin(async move {
            let body = ApiRequest {
                model: &request.model,
                messages: &request.messages,
                temperature: request.temperature,
                max_tokens: request.max_tokens,
                response_format: request
                    .json_object
                    .then_some(ResponseFormat { kind: "json_object" }),
            };

            debug!(
                model = %request.model,
                json_object = request.json_object,
                "sending chat completion"
            );

            let response = self
                .client
                .post(format!("{}/v1/chat/completions", self.base_url))
                .bearer_auth(&self.api_key)
                .json(&body)
                .send()
                .await
                .map_err(|e| {
                    if e.is_timeout() {
                        LlmError::Timeout {
                            secs: self.timeout_secs,
                        }
                    } else {
                        LlmError::Transport(e.to_string())
                    }
                })?;

            let status = response.status();
            if !status.is_success() {
                let message = response.text().await.unwrap_or_default();
                return Err(LlmError::Api {
                    status: status.as_u16(),
                    message: truncate_for_log(&message, 300),
                });
            }

            let parsed: ApiResponse = response
                .json()
                .await
                .map_err(|e| LlmError::Transport(format!("decoding response body: {e}")))?;

            parsed
                .choices
                .into_iter()
                .next()
                .map(|c| c.message.content)
                .ok_or(LlmError::EmptyCompletion)
        })
    }

    fn name(&self) -> &'static str {
        "mistral"
    }
}

/// Keep API error bodies readable in logs and error messages.
fn truncate_for_log(s: &str, max: usize) -> String {
    if s.len() <= max {
        s.to_string()
    } else {
        let mut end = max;
        while !s.is_char_boundary(end) {
            end -= 1;
        }
        format!("{}…", &s[..end])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_env_without_key_is_missing_api_key() {
        // Guard against the variable leaking in from the test environment.
        if std::env::var(API_KEY_VAR).is_ok() {
            println!("SKIP — {API_KEY_VAR} is set");
            return;
        }
        let err = MistralProvider::from_env(30)
            .err()
            .expect("from_env must fail without a key");
        match err {
            LlmError::MissingApiKey { var } => assert_eq!(var, API_KEY_VAR),
            other => panic!("expected MissingApiKey, got {other:?}"),
        }
    }

    #[test]
    fn request_serialises_json_object_format() {
        let messages = vec![ChatMessage::user("extract")];
        let body = ApiRequest {
            model: "mistral-large-latest",
            messages: &messages,
            temperature: 0.0,
            max_tokens: None,
            response_format: Some(ResponseFormat {
                kind: "json_object",
            }),
        };
        let json = serde_json::to_value(&body).expect("serialises");
        assert_eq!(json["response_format"]["type"], "json_object");
        assert!(json.get("max_tokens").is_none());
    }

    #[test]
    fn truncation_respects_char_boundaries() {
        let s = "ééééé"; // 2 bytes per char
        let t = truncate_for_log(s, 3);
        assert!(t.starts_with('é'));
        assert!(t.ends_with('…'));
    }
}
