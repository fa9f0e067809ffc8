//! JSON-over-HTTP invoker

use super::ServiceInvoker;
use crate::error::{Error, Result};
use crate::http::{HttpClient, HttpClientConfig, RequestConfig};
use crate::loader::ServiceDefinition;
use crate::request::ServiceRequest;
use crate::types::{JsonObject, JsonValue};
use async_trait::async_trait;
use std::time::Duration;

/// Header carrying the operation target for JSON-protocol services
pub const TARGET_HEADER: &str = "X-Amz-Target";

/// Invoker sending requests to a JSON HTTP endpoint
#[derive(Debug)]
pub struct HttpInvoker {
    client: HttpClient,
    endpoint: String,
}

impl HttpInvoker {
    /// Create an invoker from a configured client
    pub fn new(client: HttpClient, endpoint: impl Into<String>) -> Self {
        Self {
            client,
            endpoint: endpoint.into(),
        }
    }

    /// Create an invoker for a service definition, optionally pointing it at
    /// a different endpoint
    pub fn for_service(def: &ServiceDefinition, endpoint_override: Option<&str>) -> Result<Self> {
        let endpoint = endpoint_override
            .unwrap_or(&def.base_url)
            .trim_end_matches('/')
            .to_string();
        url::Url::parse(&endpoint)?;

        let config = HttpClientConfig::builder()
            .base_url(&endpoint)
            .timeout(Duration::from_secs(def.http.timeout_secs))
            .max_retries(def.http.max_retries)
            .headers(&def.headers)
            .build();

        Ok(Self::new(HttpClient::with_config(config)?, endpoint))
    }

    fn request_config(request: &ServiceRequest) -> RequestConfig {
        let mut config = RequestConfig::new();
        if let Some(target) = &request.target {
            config = config.header(TARGET_HEADER, target);
        }

        if request.method.uses_query() {
            for (key, value) in &request.params {
                config = config.query(key, query_value(value));
            }
        } else {
            config = config.json(JsonValue::Object(request.params.clone()));
        }
        config
    }
}

#[async_trait]
impl ServiceInvoker for HttpInvoker {
    fn endpoint(&self) -> String {
        self.endpoint.clone()
    }

    async fn invoke(&self, request: &ServiceRequest) -> Result<JsonValue> {
        let response = self
            .client
            .request(
                request.method.into(),
                &request.path,
                Self::request_config(request),
            )
            .await?;

        let body = response.text().await?;
        parse_body(&body)
    }
}

/// Query string form of a parameter value
fn query_value(value: &JsonValue) -> String {
    match value {
        JsonValue::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Parse a response body; an empty body is an empty object
fn parse_body(body: &str) -> Result<JsonValue> {
    if body.trim().is_empty() {
        return Ok(JsonValue::Object(JsonObject::new()));
    }
    serde_json::from_str(body).map_err(Error::from)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_body() {
        assert_eq!(parse_body("").unwrap(), json!({}));
        assert_eq!(parse_body("  \n").unwrap(), json!({}));
        assert_eq!(parse_body(r#"{"a":1}"#).unwrap(), json!({"a": 1}));
        assert!(matches!(
            parse_body("<html>").unwrap_err(),
            Error::JsonParse(_)
        ));
    }

    #[test]
    fn test_query_value() {
        assert_eq!(query_value(&json!("abc")), "abc");
        assert_eq!(query_value(&json!(5)), "5");
        assert_eq!(query_value(&json!(true)), "true");
        assert_eq!(query_value(&json!(["a", "b"])), r#"["a","b"]"#);
    }
}
