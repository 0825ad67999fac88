//! Shared test helpers for agent loop tests.

use rustedreact_core::error::ProviderError;
use rustedreact_core::provider::{Provider, ProviderRequest, ProviderResponse, Usage};
use std::collections::VecDeque;
use std::sync::Mutex;

/// A mock provider that returns a sequence of scripted replies.
///
/// Each call to `complete` returns the next reply in the queue. Once the
/// queue is drained the `repeat` reply is returned if set; otherwise it
/// panics, since the test made more calls than it scripted.
pub struct ScriptedProvider {
    replies: Mutex<VecDeque<Result<String, ProviderError>>>,
    repeat: Option<String>,
    requests: Mutex<Vec<ProviderRequest>>,
}

impl ScriptedProvider {
    pub fn new<'a>(replies: impl IntoIterator<Item = &'a str>) -> Self {
        Self::with_results(replies.into_iter().map(|r| Ok(r.to_string())).collect())
    }

    pub fn with_results(replies: Vec<Result<String, ProviderError>>) -> Self {
        Self {
            replies: Mutex::new(replies.into()),
            repeat: None,
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Return `reply` on every call.
    pub fn repeating(reply: &str) -> Self {
        Self {
            repeat: Some(reply.to_string()),
            ..Self::with_results(vec![])
        }
    }

    pub fn call_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    /// Every request received so far, in order.
    pub fn requests(&self) -> Vec<ProviderRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl Provider for ScriptedProvider {
    fn name(&self) -> &str {
        "scripted_mock"
    }

    async fn complete(&self, request: ProviderRequest) -> Result<ProviderResponse, ProviderError> {
        let call = {
            let mut requests = self.requests.lock().unwrap();
            requests.push(request);
            requests.len()
        };

        let reply = match self.replies.lock().unwrap().pop_front() {
            Some(reply) => reply,
            None => match &self.repeat {
                Some(text) => Ok(text.clone()),
                None => panic!("ScriptedProvider: no more replies (call #{call})"),
            },
        };

        reply.map(|content| ProviderResponse {
            content,
            usage: Some(Usage {
                prompt_tokens: 10,
                completion_tokens: 5,
                total_tokens: 15,
            }),
            model: "mock-model".into(),
        })
    }
}

/// A provider whose completion never resolves.
pub struct HangingProvider;

#[async_trait::async_trait]
impl Provider for HangingProvider {
    fn name(&self) -> &str {
        "hanging_mock"
    }

    async fn complete(&self, _request: ProviderRequest) -> Result<ProviderResponse, ProviderError> {
        std::future::pending().await
    }
}
