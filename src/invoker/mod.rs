//! Service invokers
//!
//! The single seam between the paging engine and the network. An invoker
//! performs exactly one call per request and reports either the response
//! body or a failure; it never loops over pages.

mod http;
mod scripted;

pub use http::HttpInvoker;
pub use scripted::ScriptedInvoker;

use crate::error::Result;
use crate::request::ServiceRequest;
use crate::types::JsonValue;
use async_trait::async_trait;

/// Performs one service call
#[async_trait]
pub trait ServiceInvoker: Send + Sync {
    /// Endpoint the invoker talks to, used in failure messages
    fn endpoint(&self) -> String;

    /// Send one request and return the parsed response
    async fn invoke(&self, request: &ServiceRequest) -> Result<JsonValue>;
}

#[async_trait]
impl<T: ServiceInvoker + ?Sized> ServiceInvoker for std::sync::Arc<T> {
    fn endpoint(&self) -> String {
        (**self).endpoint()
    }

    async fn invoke(&self, request: &ServiceRequest) -> Result<JsonValue> {
        (**self).invoke(request).await
    }
}
