//! Request building
//!
//! Maps an invocation context plus the current loop cursor onto a service
//! request. Builders are called once per page, so the cursor field always
//! reflects the paginator's cursor rather than the caller's original input.

use crate::context::InvocationContext;
use crate::error::Result;
use crate::loader::OperationDefinition;
use crate::types::{JsonObject, JsonValue, Method};

/// One request to a service operation
#[derive(Debug, Clone, PartialEq)]
pub struct ServiceRequest {
    /// Service name (e.g. "cloudwatch")
    pub service: String,
    /// Operation name (e.g. "DescribeAnomalyDetectors")
    pub operation: String,
    /// HTTP method
    pub method: Method,
    /// Path relative to the service endpoint
    pub path: String,
    /// Optional operation target header value
    pub target: Option<String>,
    /// Request fields
    pub params: JsonObject,
}

impl ServiceRequest {
    /// Create a request with no fields
    pub fn new(service: impl Into<String>, operation: impl Into<String>) -> Self {
        Self {
            service: service.into(),
            operation: operation.into(),
            method: Method::default(),
            path: "/".to_string(),
            target: None,
            params: JsonObject::new(),
        }
    }

    /// Set a request field
    #[must_use]
    pub fn with_param(mut self, name: impl Into<String>, value: impl Into<JsonValue>) -> Self {
        self.params.insert(name.into(), value.into());
        self
    }

    /// Get a request field
    pub fn param(&self, name: &str) -> Option<&JsonValue> {
        self.params.get(name)
    }
}

/// Builds the request for one page
pub trait RequestBuilder: Send + Sync {
    /// Build a request from the context and the current cursor
    fn build(&self, context: &InvocationContext, cursor: Option<&str>) -> Result<ServiceRequest>;
}

impl<F> RequestBuilder for F
where
    F: Fn(&InvocationContext, Option<&str>) -> Result<ServiceRequest> + Send + Sync,
{
    fn build(&self, context: &InvocationContext, cursor: Option<&str>) -> Result<ServiceRequest> {
        self(context, cursor)
    }
}

/// Request builder driven by a declarative operation definition
#[derive(Debug, Clone)]
pub struct DefinitionRequestBuilder {
    service: String,
    definition: OperationDefinition,
}

impl DefinitionRequestBuilder {
    /// Create a builder for one operation of a service
    pub fn new(service: impl Into<String>, definition: OperationDefinition) -> Self {
        Self {
            service: service.into(),
            definition,
        }
    }
}

impl RequestBuilder for DefinitionRequestBuilder {
    fn build(&self, context: &InvocationContext, cursor: Option<&str>) -> Result<ServiceRequest> {
        let def = &self.definition;
        let mut params = JsonObject::new();

        for (name, value) in context.params() {
            if value.is_null() {
                continue;
            }
            params.insert(def.request_field(name).to_string(), value.clone());
        }

        if let Some(pagination) = &def.pagination {
            match cursor.filter(|c| !c.is_empty()) {
                Some(cursor) => {
                    params.insert(
                        pagination.input_token.clone(),
                        JsonValue::String(cursor.to_string()),
                    );
                }
                None => {
                    params.remove(&pagination.input_token);
                }
            }
        }

        Ok(ServiceRequest {
            service: self.service.clone(),
            operation: def.name.clone(),
            method: def.method,
            path: def.path.clone(),
            target: def.target.clone(),
            params,
        })
    }
}
