//! Scripted invoker
//!
//! Replays a fixed sequence of responses and records every request it
//! receives. Useful for dry runs and tests of code built on the engine.

use super::ServiceInvoker;
use crate::error::{Error, Result};
use crate::request::ServiceRequest;
use crate::types::JsonValue;
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::Mutex;

/// Invoker answering from a queue of canned results
#[derive(Debug)]
pub struct ScriptedInvoker {
    endpoint: String,
    responses: Mutex<VecDeque<Result<JsonValue>>>,
    requests: Mutex<Vec<ServiceRequest>>,
}

impl ScriptedInvoker {
    /// Create an invoker with no scripted responses
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            responses: Mutex::new(VecDeque::new()),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Queue a successful response
    #[must_use]
    pub fn respond(self, response: JsonValue) -> Self {
        self.push(Ok(response));
        self
    }

    /// Queue a failure
    #[must_use]
    pub fn fail(self, error: Error) -> Self {
        self.push(Err(error));
        self
    }

    /// Requests received so far, in order
    pub fn requests(&self) -> Vec<ServiceRequest> {
        self.requests
            .lock()
            .map(|r| r.clone())
            .unwrap_or_default()
    }

    /// Number of calls received so far
    pub fn calls(&self) -> usize {
        self.requests.lock().map(|r| r.len()).unwrap_or_default()
    }

    fn push(&self, result: Result<JsonValue>) {
        if let Ok(mut responses) = self.responses.lock() {
            responses.push_back(result);
        }
    }
}

#[async_trait]
impl ServiceInvoker for ScriptedInvoker {
    fn endpoint(&self) -> String {
        self.endpoint.clone()
    }

    async fn invoke(&self, request: &ServiceRequest) -> Result<JsonValue> {
        if let Ok(mut requests) = self.requests.lock() {
            requests.push(request.clone());
        }

        let next = self
            .responses
            .lock()
            .map_err(|_| Error::Other("scripted invoker lock poisoned".to_string()))?
            .pop_front();

        next.unwrap_or_else(|| {
            Err(Error::Other(format!(
                "no scripted response left for {}",
                request.operation
            )))
        })
    }
}
