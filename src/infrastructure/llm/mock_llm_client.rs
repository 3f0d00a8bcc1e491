use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::application::ports::{LlmClient, LlmClientError};

/// Scripted stand-in for the generative API, used by the integration tests.
/// Queued replies are returned in order; once the queue drains, the default
/// reply repeats.
pub struct MockLlmClient {
    default_reply: String,
    queued: Mutex<VecDeque<String>>,
    fail: bool,
}

impl MockLlmClient {
    pub fn new(default_reply: impl Into<String>) -> Self {
        Self {
            default_reply: default_reply.into(),
            queued: Mutex::new(VecDeque::new()),
            fail: false,
        }
    }

    /// A client whose every call fails with an upstream error.
    pub fn failing() -> Self {
        Self {
            default_reply: String::new(),
            queued: Mutex::new(VecDeque::new()),
            fail: true,
        }
    }

    pub fn enqueue(&self, reply: impl Into<String>) {
        self.queued
            .lock()
            .expect("mock reply queue poisoned")
            .push_back(reply.into());
    }
}

#[async_trait]
impl LlmClient for MockLlmClient {
    async fn generate(&self, _prompt: &str) -> Result<String, LlmClientError> {
        if self.fail {
            return Err(LlmClientError::ApiRequestFailed(
                "mock upstream failure".to_string(),
            ));
        }

        let queued = self
            .queued
            .lock()
            .expect("mock reply queue poisoned")
            .pop_front();
        Ok(queued.unwrap_or_else(|| self.default_reply.clone()))
    }
}
