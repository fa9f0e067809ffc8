//! Projection rules
//!
//! Parsing of select strings and resolution of the active rule from the
//! caller's select / pass-thru configuration.

use crate::error::{Error, Result};
use crate::types::JsonValue;
use regex::Regex;
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;
use tracing::warn;

/// Select string that returns the whole response
pub const IDENTITY_RULE: &str = "*";

/// Prefix marking a parameter-echo select string
pub const ECHO_PREFIX: char = '^';

/// Valid parameter name: `MetricName`, `instance_id`
static PARAM_NAME_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").unwrap());

/// Valid field path: `Attachment`, `Attachment.State`
static FIELD_PATH_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*(?:\.[A-Za-z_][A-Za-z0-9_]*)*$").unwrap()
});

/// Rule deciding what an invocation yields downstream
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProjectionRule {
    /// Emit the whole response for each page
    Identity,
    /// Emit a named sub-value of each response (dot path for nested fields)
    Field(String),
    /// Emit one of the caller's input parameters once, after paging completes
    Echo(String),
}

impl ProjectionRule {
    /// Parse a select string (`*`, `Field`, `Field.Nested`, `^Param`)
    pub fn parse(rule: &str) -> Result<Self> {
        let trimmed = rule.trim();
        if trimmed.is_empty() {
            return Err(Error::invalid_select(rule, "select rule cannot be empty"));
        }

        if trimmed == IDENTITY_RULE {
            return Ok(Self::Identity);
        }

        if let Some(param) = trimmed.strip_prefix(ECHO_PREFIX) {
            if param.is_empty() {
                return Err(Error::invalid_select(
                    rule,
                    "a parameter name must follow '^'",
                ));
            }
            if !PARAM_NAME_REGEX.is_match(param) {
                return Err(Error::invalid_select(
                    rule,
                    format!("'{param}' is not a valid parameter name"),
                ));
            }
            return Ok(Self::Echo(param.to_string()));
        }

        if !FIELD_PATH_REGEX.is_match(trimmed) {
            return Err(Error::invalid_select(
                rule,
                format!("'{trimmed}' is not a valid field name"),
            ));
        }

        Ok(Self::Field(trimmed.to_string()))
    }

    /// Create a field-select rule
    pub fn field(path: impl Into<String>) -> Self {
        Self::Field(path.into())
    }

    /// Create a parameter-echo rule
    pub fn echo(param: impl Into<String>) -> Self {
        Self::Echo(param.into())
    }

    /// Check if this rule echoes an input parameter
    pub fn is_echo(&self) -> bool {
        matches!(self, Self::Echo(_))
    }

    /// Name of the echoed parameter, if any
    pub fn echo_param(&self) -> Option<&str> {
        match self {
            Self::Echo(param) => Some(param),
            _ => None,
        }
    }

    /// Apply the rule to one response.
    ///
    /// Pure function of the response. Echo rules never look at responses and
    /// always return `None`; a missing or null field also returns `None`.
    pub fn select(&self, response: &JsonValue) -> Option<JsonValue> {
        match self {
            Self::Identity => Some(response.clone()),
            Self::Field(path) => select_field(response, path)
                .filter(|value| !value.is_null())
                .cloned(),
            Self::Echo(_) => None,
        }
    }
}

impl fmt::Display for ProjectionRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Identity => write!(f, "{IDENTITY_RULE}"),
            Self::Field(path) => write!(f, "{path}"),
            Self::Echo(param) => write!(f, "{ECHO_PREFIX}{param}"),
        }
    }
}

impl FromStr for ProjectionRule {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

/// Look up a dot-separated field path inside a JSON object
pub fn select_field<'a>(value: &'a JsonValue, path: &str) -> Option<&'a JsonValue> {
    let mut current = value;
    for part in path.split('.') {
        match current {
            JsonValue::Object(map) => {
                current = map.get(part)?;
            }
            _ => return None,
        }
    }
    Some(current)
}

/// Caller-supplied output configuration for one invocation
#[derive(Debug, Clone, Default)]
pub struct SelectionConfig {
    /// Explicit select rule, if the caller bound one
    pub select: Option<String>,
    /// Legacy pass-thru switch
    pub pass_thru: bool,
    /// Operation default rule (e.g. `AnomalyDetectors`, `*`)
    pub default_select: Option<String>,
    /// Parameter echoed by the pass-thru switch
    pub pass_thru_param: Option<String>,
}

impl SelectionConfig {
    /// Create a selection config with an operation default
    pub fn new(default_select: impl Into<String>) -> Self {
        Self {
            default_select: Some(default_select.into()),
            ..Default::default()
        }
    }

    /// Set the explicit select rule
    #[must_use]
    pub fn with_select(mut self, select: impl Into<String>) -> Self {
        self.select = Some(select.into());
        self
    }

    /// Set the pass-thru switch and the parameter it echoes
    #[must_use]
    pub fn with_pass_thru(mut self, pass_thru: bool) -> Self {
        self.pass_thru = pass_thru;
        self
    }

    /// Set the parameter echoed by pass-thru
    #[must_use]
    pub fn with_pass_thru_param(mut self, param: impl Into<String>) -> Self {
        self.pass_thru_param = Some(param.into());
        self
    }

    /// Resolve the active rule.
    ///
    /// Explicit select wins, then pass-thru, then the operation default
    /// (identity when the operation declares none). Select together with
    /// pass-thru is rejected.
    pub fn resolve(&self) -> Result<ProjectionRule> {
        if let Some(select) = &self.select {
            if self.pass_thru {
                let suggested = self
                    .pass_thru_param
                    .clone()
                    .unwrap_or_else(|| "ParameterName".to_string());
                return Err(Error::ConflictingSelection { suggested });
            }
            return ProjectionRule::parse(select);
        }

        if self.pass_thru {
            let param = self.pass_thru_param.as_ref().ok_or_else(|| {
                Error::config("Pass-thru is not supported by this operation")
            })?;
            warn!(
                "Pass-thru is deprecated, use select '{ECHO_PREFIX}{param}' instead"
            );
            return Ok(ProjectionRule::Echo(param.clone()));
        }

        match &self.default_select {
            Some(default) => ProjectionRule::parse(default),
            None => Ok(ProjectionRule::Identity),
        }
    }
}
