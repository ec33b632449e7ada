//! LLM provider seam: message types, the provider trait, and implementations.
//!
//! The pipeline issues exactly two call shapes — a free-text classification
//! call and a JSON-object-constrained extraction call — and everything it
//! needs from a backend fits in one method. Keeping the trait this small
//! means a scripted [`MockProvider`] can stand in for the real service in
//! every pipeline test, and swapping backends never touches pipeline code.

pub mod mistral;
pub mod mock;

pub use mistral::MistralProvider;
pub use mock::MockProvider;

use serde::{Deserialize, Serialize};
use std::future::Future;
use std::pin::Pin;
use thiserror::Error;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }
}

/// A single chat-completion request.
///
/// `json_object` selects the JSON-constrained response format used by the
/// structured-extraction call; the classification call leaves it off.
#[derive(Clone, Debug)]
pub struct CompletionRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    pub temperature: f32,
    pub max_tokens: Option<usize>,
    pub json_object: bool,
}

/// Transport- and API-level failures from a provider.
///
/// These are mapped to [`crate::ExtractError`] (or absorbed, for the
/// classification stage) by the pipeline — providers never decide policy.
#[derive(Debug, Error)]
pub enum LlmError {
    #[error("request failed: {0}")]
    Transport(String),

    #[error("request timed out after {secs}s")]
    Timeout { secs: u64 },

    #[error("API error (HTTP {status}): {message}")]
    Api { status: u16, message: String },

    /// The response parsed but contained no completion choices.
    #[error("empty completion: response contained no choices")]
    EmptyCompletion,

    #[error("missing API key: set {var}")]
    MissingApiKey { var: &'static str },
}

/// Boxed completion future, so the trait stays object-safe and providers can
/// live behind `Arc<dyn LlmProvider>` in the config.
pub type ChatFuture<'a> = Pin<Box<dyn Future<Output = Result<String, LlmError>> + Send + 'a>>;

/// A chat-completion backend.
pub trait LlmProvider: Send + Sync {
    /// Send one completion request and return the assistant's reply text.
    fn chat(&self, request: CompletionRequest) -> ChatFuture<'_>;

    fn name(&self) -> &'static str;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn message_constructors_set_roles() {
        assert_eq!(ChatMessage::system("a").role, Role::System);
        assert_eq!(ChatMessage::user("b").role, Role::User);
    }

    #[test]
    fn role_serialises_lowercase() {
        let msg = ChatMessage::user("hi");
        let json = serde_json::to_value(&msg).expect("serialises");
        assert_eq!(json["role"], "user");
    }

    #[test]
    fn provider_is_object_safe() {
        fn assert_dyn(_: &dyn LlmProvider) {}
        let mock = MockProvider::default();
        assert_dyn(&mock);
    }
}
