//! Scripted in-memory provider for tests.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::Value;

use super::{LlmError, ModelProvider, ModelReply, ModelRequest, ToolCall};

/// Replays queued replies in order and records every request it receives.
/// Once the queue is empty every call fails with `EmptyContent`.
#[derive(Default)]
pub struct ScriptedProvider {
    replies: Mutex<VecDeque<Result<ModelReply, LlmError>>>,
    requests: Mutex<Vec<ModelRequest>>,
}

impl ScriptedProvider {
    pub fn new(replies: Vec<Result<ModelReply, LlmError>>) -> Arc<Self> {
        Arc::new(Self {
            replies: Mutex::new(replies.into()),
            requests: Mutex::new(Vec::new()),
        })
    }

    pub fn replying_json(value: Value) -> Arc<Self> {
        Self::new(vec![Ok(json_reply(value))])
    }

    pub fn requests(&self) -> Vec<ModelRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

pub fn json_reply(value: Value) -> ModelReply {
    ModelReply::Text(value.to_string())
}

pub fn tool_call(name: &str, args: Value) -> ModelReply {
    ModelReply::ToolCall(ToolCall {
        name: name.to_string(),
        args,
    })
}

#[async_trait]
impl ModelProvider for ScriptedProvider {
    async fn generate(&self, request: &ModelRequest) -> Result<ModelReply, LlmError> {
        self.requests.lock().unwrap().push(request.clone());
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(Err(LlmError::EmptyContent))
    }
}
