//! Invocation context types
//!
//! The resolved, read-only input to one invocation.

use crate::error::{Error, Result};
use crate::projection::{ProjectionRule, SelectionConfig};
use crate::types::{JsonObject, JsonValue};
use std::collections::HashSet;

/// Fully resolved input for a single invocation.
///
/// Built once through [`InvocationContextBuilder`]; there are no mutating
/// accessors.
#[derive(Debug, Clone)]
pub struct InvocationContext {
    operation: String,
    params: JsonObject,
    rule: ProjectionRule,
    starting_cursor: Option<String>,
    manual_control: bool,
    force: bool,
}

impl InvocationContext {
    /// Start building a context for an operation
    pub fn builder(operation: impl Into<String>) -> InvocationContextBuilder {
        InvocationContextBuilder::new(operation)
    }

    /// Operation name
    pub fn operation(&self) -> &str {
        &self.operation
    }

    /// All bound parameters
    pub fn params(&self) -> &JsonObject {
        &self.params
    }

    /// One bound parameter; null values count as unbound
    pub fn param(&self, name: &str) -> Option<&JsonValue> {
        self.params.get(name).filter(|v| !v.is_null())
    }

    /// Resolved projection rule
    pub fn rule(&self) -> &ProjectionRule {
        &self.rule
    }

    /// Cursor the first request starts from
    pub fn starting_cursor(&self) -> Option<&str> {
        self.starting_cursor.as_deref()
    }

    /// True when the caller takes control of paging (one call only)
    pub fn manual_control(&self) -> bool {
        self.manual_control
    }

    /// True when confirmation prompts are bypassed
    pub fn force(&self) -> bool {
        self.force
    }
}

/// Builder for [`InvocationContext`]
#[derive(Debug, Clone)]
pub struct InvocationContextBuilder {
    operation: String,
    params: JsonObject,
    selection: SelectionConfig,
    starting_cursor: Option<String>,
    cursor_supplied: bool,
    cursor_param: Option<String>,
    no_auto_iteration: bool,
    force: bool,
    declared_params: Option<HashSet<String>>,
    output_fields: Option<HashSet<String>>,
}

impl InvocationContextBuilder {
    /// Create a builder for an operation
    pub fn new(operation: impl Into<String>) -> Self {
        Self {
            operation: operation.into(),
            params: JsonObject::new(),
            selection: SelectionConfig::default(),
            starting_cursor: None,
            cursor_supplied: false,
            cursor_param: None,
            no_auto_iteration: false,
            force: false,
            declared_params: None,
            output_fields: None,
        }
    }

    /// Bind one parameter
    #[must_use]
    pub fn param(mut self, name: impl Into<String>, value: impl Into<JsonValue>) -> Self {
        self.params.insert(name.into(), value.into());
        self
    }

    /// Bind a set of parameters
    #[must_use]
    pub fn params(mut self, params: JsonObject) -> Self {
        self.params.extend(params);
        self
    }

    /// Explicit select rule
    #[must_use]
    pub fn select(mut self, rule: impl Into<String>) -> Self {
        self.selection.select = Some(rule.into());
        self
    }

    /// Optional explicit select rule
    #[must_use]
    pub fn select_opt(mut self, rule: Option<String>) -> Self {
        self.selection.select = rule;
        self
    }

    /// Legacy pass-thru switch
    #[must_use]
    pub fn pass_thru(mut self, pass_thru: bool) -> Self {
        self.selection.pass_thru = pass_thru;
        self
    }

    /// Operation default select rule
    #[must_use]
    pub fn default_select(mut self, rule: impl Into<String>) -> Self {
        self.selection.default_select = Some(rule.into());
        self
    }

    /// Parameter echoed by the pass-thru switch
    #[must_use]
    pub fn pass_thru_param(mut self, param: impl Into<String>) -> Self {
        self.selection.pass_thru_param = Some(param.into());
        self
    }

    /// Supply a starting cursor. Supplying one, even `None` or empty,
    /// switches paging to manual control.
    #[must_use]
    pub fn starting_cursor(mut self, cursor: Option<String>) -> Self {
        self.starting_cursor = cursor.filter(|c| !c.is_empty());
        self.cursor_supplied = true;
        self
    }

    /// Parameter that carries a caller-supplied cursor. Binding it counts
    /// as supplying a starting cursor unless one was given explicitly.
    #[must_use]
    pub fn cursor_param(mut self, param: impl Into<String>) -> Self {
        self.cursor_param = Some(param.into());
        self
    }

    /// Opt out of auto-iteration
    #[must_use]
    pub fn no_auto_iteration(mut self, no_auto_iteration: bool) -> Self {
        self.no_auto_iteration = no_auto_iteration;
        self
    }

    /// Bypass confirmation prompts
    #[must_use]
    pub fn force(mut self, force: bool) -> Self {
        self.force = force;
        self
    }

    /// Parameter names the operation declares; enables echo validation
    #[must_use]
    pub fn declared_params<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.declared_params = Some(names.into_iter().map(Into::into).collect());
        self
    }

    /// Response fields the operation declares; enables field validation
    #[must_use]
    pub fn output_fields<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let fields: HashSet<String> = names.into_iter().map(Into::into).collect();
        self.output_fields = (!fields.is_empty()).then_some(fields);
        self
    }

    /// Resolve the projection rule and freeze the context
    pub fn build(self) -> Result<InvocationContext> {
        if self.operation.is_empty() {
            return Err(Error::config("Operation name cannot be empty"));
        }

        let rule = self.selection.resolve()?;
        self.check_rule(&rule)?;

        let (starting_cursor, cursor_supplied) = match self.bound_cursor() {
            Some(cursor) if !self.cursor_supplied => {
                (Some(cursor).filter(|c| !c.is_empty()), true)
            }
            _ => (self.starting_cursor, self.cursor_supplied),
        };

        Ok(InvocationContext {
            operation: self.operation,
            params: self.params,
            rule,
            starting_cursor,
            manual_control: self.no_auto_iteration || cursor_supplied,
            force: self.force,
        })
    }

    /// Cursor bound through the cursor parameter, matched case-insensitively
    fn bound_cursor(&self) -> Option<String> {
        let name = self.cursor_param.as_deref()?;
        let (_, value) = self
            .params
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))?;
        match value {
            JsonValue::Null => None,
            JsonValue::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }

    fn check_rule(&self, rule: &ProjectionRule) -> Result<()> {
        match rule {
            ProjectionRule::Echo(param) => {
                if let Some(declared) = &self.declared_params {
                    if !declared.contains(param) {
                        return Err(Error::invalid_select(
                            rule.to_string(),
                            format!("'{param}' is not a parameter of {}", self.operation),
                        ));
                    }
                }
            }
            ProjectionRule::Field(path) => {
                if let Some(fields) = &self.output_fields {
                    let head = path.split('.').next().unwrap_or(path);
                    if !fields.contains(head) {
                        return Err(Error::invalid_select(
                            rule.to_string(),
                            format!("'{head}' is not a field of the {} response", self.operation),
                        ));
                    }
                }
            }
            ProjectionRule::Identity => {}
        }
        Ok(())
    }
}
