//! Loader types
//!
//! Declarative service and operation definition types for YAML parsing.

use crate::context::InvocationContextBuilder;
use crate::error::{Error, Result};
use crate::pagination::{CursorPaginator, NoPaginator, Paginator};
use crate::types::{JsonObject, JsonValue, Method, ParamType};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

// ============================================================================
// Service Definition
// ============================================================================

/// Top-level service definition
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct ServiceDefinition {
    /// Service name (e.g. "cloudwatch")
    pub name: String,
    /// Human-readable title (e.g. "Amazon CloudWatch")
    #[serde(default)]
    pub title: Option<String>,
    /// Service endpoint
    pub base_url: String,
    /// Headers sent with every request
    #[serde(default)]
    pub headers: HashMap<String, String>,
    /// HTTP client configuration
    #[serde(default)]
    pub http: HttpDefinition,
    /// Operation definitions
    pub operations: Vec<OperationDefinition>,
}

impl ServiceDefinition {
    /// Display name of the service
    pub fn display_name(&self) -> &str {
        self.title.as_deref().unwrap_or(&self.name)
    }

    /// Find an operation by operation name or command name (case-insensitive)
    pub fn operation(&self, name: &str) -> Result<&OperationDefinition> {
        self.operations
            .iter()
            .find(|op| {
                op.name.eq_ignore_ascii_case(name)
                    || op
                        .command
                        .as_deref()
                        .is_some_and(|c| c.eq_ignore_ascii_case(name))
            })
            .ok_or_else(|| Error::OperationNotFound {
                service: self.name.clone(),
                operation: name.to_string(),
            })
    }
}

// ============================================================================
// HTTP Definition
// ============================================================================

/// HTTP client configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct HttpDefinition {
    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
    /// Maximum retries
    #[serde(default = "default_retries")]
    pub max_retries: u32,
}

impl Default for HttpDefinition {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout(),
            max_retries: default_retries(),
        }
    }
}

fn default_timeout() -> u64 {
    30
}

fn default_retries() -> u32 {
    3
}

// ============================================================================
// Operation Definition
// ============================================================================

/// A single service operation
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct OperationDefinition {
    /// Operation name (e.g. "DetachVolume")
    pub name: String,
    /// Command alias (e.g. "Dismount-EC2Volume")
    #[serde(default)]
    pub command: Option<String>,
    /// Description
    #[serde(default)]
    pub description: Option<String>,
    /// HTTP method
    #[serde(default)]
    pub method: Method,
    /// Path relative to the service endpoint
    #[serde(default = "default_path")]
    pub path: String,
    /// Operation target header value
    #[serde(default)]
    pub target: Option<String>,
    /// Whether the operation changes state and needs confirmation
    #[serde(default)]
    pub mutating: bool,
    /// Default select rule (identity when absent)
    #[serde(default)]
    pub default_select: Option<String>,
    /// Parameter echoed by the legacy pass-thru switch
    #[serde(default)]
    pub pass_thru_param: Option<String>,
    /// Parameter identifying the target in confirmation prompts
    #[serde(default)]
    pub confirm_param: Option<String>,
    /// Cursor pagination, absent for single-result operations
    #[serde(default)]
    pub pagination: Option<PaginationDefinition>,
    /// Declared parameters
    #[serde(default)]
    pub parameters: Vec<ParameterDefinition>,
    /// Top-level response fields accepted by field-select rules
    #[serde(default)]
    pub output_fields: Vec<String>,
}

fn default_path() -> String {
    "/".to_string()
}

impl OperationDefinition {
    /// Create a minimal operation definition
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            command: None,
            description: None,
            method: Method::default(),
            path: default_path(),
            target: None,
            mutating: false,
            default_select: None,
            pass_thru_param: None,
            confirm_param: None,
            pagination: None,
            parameters: Vec::new(),
            output_fields: Vec::new(),
        }
    }

    /// Name shown to users: the command alias when present
    pub fn display_name(&self) -> &str {
        self.command.as_deref().unwrap_or(&self.name)
    }

    /// Find a declared parameter
    pub fn parameter(&self, name: &str) -> Option<&ParameterDefinition> {
        self.parameters.iter().find(|p| p.name == name)
    }

    /// Request field a parameter maps to
    pub fn request_field<'a>(&'a self, name: &'a str) -> &'a str {
        self.parameter(name)
            .and_then(|p| p.request_field.as_deref())
            .unwrap_or(name)
    }

    /// Declared parameter that feeds the request's cursor field
    pub fn cursor_param(&self) -> Option<&str> {
        let pagination = self.pagination.as_ref()?;
        let param = self.parameters.iter().find(|p| {
            p.request_field
                .as_deref()
                .unwrap_or(&p.name)
                .eq_ignore_ascii_case(&pagination.input_token)
        });
        Some(param.map_or(pagination.input_token.as_str(), |p| p.name.as_str()))
    }

    /// Paginator matching this operation
    pub fn paginator(&self) -> Box<dyn Paginator> {
        match &self.pagination {
            Some(p) => Box::new(CursorPaginator::new(&p.output_token)),
            None => Box::new(NoPaginator),
        }
    }

    /// Context builder pre-loaded with this operation's output settings
    pub fn context_builder(&self) -> InvocationContextBuilder {
        let mut builder = InvocationContextBuilder::new(&self.name)
            .output_fields(self.output_fields.iter().cloned());
        if !self.parameters.is_empty() {
            builder = builder.declared_params(self.parameters.iter().map(|p| p.name.clone()));
        }
        if let Some(default) = &self.default_select {
            builder = builder.default_select(default);
        }
        if let Some(param) = &self.pass_thru_param {
            builder = builder.pass_thru_param(param);
        }
        if let Some(param) = self.cursor_param() {
            builder = builder.cursor_param(param);
        }
        builder
    }

    /// Bind raw parameters: reject unknown names, coerce string values to
    /// the declared type, and check required parameters.
    ///
    /// Operations without declared parameters accept anything unchanged.
    pub fn bind(&self, raw: JsonObject) -> Result<JsonObject> {
        if self.parameters.is_empty() {
            return Ok(raw);
        }

        let mut bound = JsonObject::new();
        for (name, value) in raw {
            let param = self
                .parameters
                .iter()
                .find(|p| p.name.eq_ignore_ascii_case(&name))
                .ok_or_else(|| {
                    Error::invalid_parameter(
                        &name,
                        format!("not a parameter of {}", self.display_name()),
                    )
                })?;
            let value = param.coerce(value)?;
            bound.insert(param.name.clone(), value);
        }

        for param in self.parameters.iter().filter(|p| p.required) {
            if bound.get(&param.name).map_or(true, JsonValue::is_null) {
                return Err(Error::missing_parameter(&param.name));
            }
        }

        Ok(bound)
    }
}

// ============================================================================
// Pagination Definition
// ============================================================================

/// Cursor token field names
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct PaginationDefinition {
    /// Request field carrying the cursor
    #[serde(default = "default_token")]
    pub input_token: String,
    /// Response field (dot path) carrying the next cursor
    #[serde(default = "default_token")]
    pub output_token: String,
}

fn default_token() -> String {
    "NextToken".to_string()
}

impl PaginationDefinition {
    /// Create a pagination definition
    pub fn new(input_token: impl Into<String>, output_token: impl Into<String>) -> Self {
        Self {
            input_token: input_token.into(),
            output_token: output_token.into(),
        }
    }
}

impl Default for PaginationDefinition {
    fn default() -> Self {
        Self::new(default_token(), default_token())
    }
}

// ============================================================================
// Parameter Definition
// ============================================================================

/// A declared operation parameter
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct ParameterDefinition {
    /// Parameter name as the caller writes it
    pub name: String,
    /// Request field name when it differs (e.g. MaxResult -> MaxResults)
    #[serde(default)]
    pub request_field: Option<String>,
    /// Declared type
    #[serde(rename = "type", default)]
    pub param_type: ParamType,
    /// Whether the parameter must be bound
    #[serde(default)]
    pub required: bool,
    /// Description
    #[serde(default)]
    pub description: Option<String>,
}

impl ParameterDefinition {
    /// Create an optional string parameter
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            request_field: None,
            param_type: ParamType::String,
            required: false,
            description: None,
        }
    }

    /// Map to a different request field
    #[must_use]
    pub fn with_request_field(mut self, field: impl Into<String>) -> Self {
        self.request_field = Some(field.into());
        self
    }

    /// Set the declared type
    #[must_use]
    pub fn with_type(mut self, param_type: ParamType) -> Self {
        self.param_type = param_type;
        self
    }

    /// Mark as required
    #[must_use]
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Coerce a value to the declared type.
    ///
    /// Non-string values must already have the right shape; string values
    /// from the command line are parsed.
    pub fn coerce(&self, value: JsonValue) -> Result<JsonValue> {
        let invalid = |message: String| Error::invalid_parameter(&self.name, message);

        match (self.param_type, value) {
            (_, JsonValue::Null) => Ok(JsonValue::Null),
            (ParamType::String, JsonValue::String(s)) => Ok(JsonValue::String(s)),
            (ParamType::String, other @ (JsonValue::Number(_) | JsonValue::Bool(_))) => {
                Ok(JsonValue::String(other.to_string()))
            }
            (ParamType::Integer, JsonValue::String(s)) => s
                .trim()
                .parse::<i64>()
                .map(JsonValue::from)
                .map_err(|_| invalid(format!("'{s}' is not an integer"))),
            (ParamType::Integer, JsonValue::Number(n)) if n.is_i64() || n.is_u64() => {
                Ok(JsonValue::Number(n))
            }
            (ParamType::Number, JsonValue::String(s)) => s
                .trim()
                .parse::<f64>()
                .ok()
                .and_then(serde_json::Number::from_f64)
                .map(JsonValue::Number)
                .ok_or_else(|| invalid(format!("'{s}' is not a number"))),
            (ParamType::Number, JsonValue::Number(n)) => Ok(JsonValue::Number(n)),
            (ParamType::Boolean, JsonValue::String(s)) => match s.trim().to_lowercase().as_str() {
                "true" | "1" | "yes" => Ok(JsonValue::Bool(true)),
                "false" | "0" | "no" => Ok(JsonValue::Bool(false)),
                _ => Err(invalid(format!("'{s}' is not a boolean"))),
            },
            (ParamType::Boolean, JsonValue::Bool(b)) => Ok(JsonValue::Bool(b)),
            (ParamType::List, JsonValue::String(s)) => {
                if s.trim_start().starts_with('[') {
                    let parsed: JsonValue = serde_json::from_str(&s)
                        .map_err(|e| invalid(format!("invalid JSON list: {e}")))?;
                    Ok(parsed)
                } else {
                    Ok(JsonValue::Array(
                        s.split(',')
                            .map(str::trim)
                            .filter(|item| !item.is_empty())
                            .map(|item| JsonValue::String(item.to_string()))
                            .collect(),
                    ))
                }
            }
            (ParamType::List, JsonValue::Array(items)) => Ok(JsonValue::Array(items)),
            (ParamType::Object, JsonValue::String(s)) => {
                let parsed: JsonValue = serde_json::from_str(&s)
                    .map_err(|e| invalid(format!("invalid JSON object: {e}")))?;
                if parsed.is_object() {
                    Ok(parsed)
                } else {
                    Err(invalid("expected a JSON object".to_string()))
                }
            }
            (ParamType::Object, JsonValue::Object(map)) => Ok(JsonValue::Object(map)),
            (expected, other) => Err(invalid(format!(
                "expected {expected:?}, got {other}"
            ))),
        }
    }
}
