//! Test-only mock LLM provider.
//!
//! Scripted responses are consumed in order; once exhausted, the default
//! response is returned. Every request is recorded so tests can assert on
//! what the pipeline actually sent — model, prompt content, truncation,
//! and JSON-mode flag.

use super::{ChatFuture, CompletionRequest, LlmError, LlmProvider};
use std::sync::{Arc, Mutex};

#[derive(Debug, Clone)]
pub struct MockProvider {
    responses: Arc<Mutex<Vec<String>>>,
    pub default_response: String,
    pub fail_chat: bool,
    /// Every request received, in call order.
    pub requests: Arc<Mutex<Vec<CompletionRequest>>>,
}

impl Default for MockProvider {
    fn default() -> Self {
        Self {
            responses: Arc::new(Mutex::new(Vec::new())),
            default_response: "mock response".into(),
            fail_chat: false,
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }
}

impl MockProvider {
    #[must_use]
    pub fn with_responses(responses: Vec<String>) -> Self {
        Self {
            responses: Arc::new(Mutex::new(responses)),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn failing() -> Self {
        Self {
            fail_chat: true,
            ..Self::default()
        }
    }

    /// Snapshot of the requests received so far.
    pub fn recorded_requests(&self) -> Vec<CompletionRequest> {
        self.requests.lock().unwrap().clone()
    }
}

impl LlmProvider for MockProvider {
    fn chat(&self, request: CompletionRequest) -> ChatFuture<'_> {
        Box::pin(async move {
            self.requests.lock().unwrap().push(request);
            if self.fail_chat {
                return Err(LlmError::Transport("mock LLM error".into()));
            }
            let mut responses = self.responses.lock().unwrap();
            if responses.is_empty() {
                Ok(self.default_response.clone())
            } else {
                Ok(responses.remove(0))
            }
        })
    }

    fn name(&self) -> &'static str {
        "mock"
    }
}
