//! Engine types
//!
//! Operation descriptors, configuration, history and run summaries.

use crate::confirm::target_text;
use crate::context::InvocationContext;
use crate::loader::{OperationDefinition, ServiceDefinition};
use crate::pagination::{NoPaginator, Paginator};
use crate::request::{DefinitionRequestBuilder, RequestBuilder};
use crate::types::JsonValue;
use std::collections::VecDeque;

/// Everything the engine needs to know about one operation
pub struct Operation {
    /// Operation name (e.g. "DetachVolume")
    pub name: String,
    /// Service name
    pub service: String,
    /// Command alias used in confirmation prompts
    pub command: Option<String>,
    /// Whether the operation needs confirmation
    pub mutating: bool,
    /// Parameter identifying the confirmation target
    pub confirm_param: Option<String>,
    /// Per-page request builder
    pub builder: Box<dyn RequestBuilder>,
    /// Cursor extraction strategy
    pub paginator: Box<dyn Paginator>,
}

impl Operation {
    /// Create a single-result, non-mutating operation around a builder
    pub fn new(
        service: impl Into<String>,
        name: impl Into<String>,
        builder: impl RequestBuilder + 'static,
    ) -> Self {
        Self {
            name: name.into(),
            service: service.into(),
            command: None,
            mutating: false,
            confirm_param: None,
            builder: Box::new(builder),
            paginator: Box::new(NoPaginator),
        }
    }

    /// Build an operation from its declarative definition
    pub fn from_definition(service: &ServiceDefinition, def: &OperationDefinition) -> Self {
        Self {
            name: def.name.clone(),
            service: service.name.clone(),
            command: def.command.clone(),
            mutating: def.mutating,
            confirm_param: def.confirm_param.clone(),
            builder: Box::new(DefinitionRequestBuilder::new(&service.name, def.clone())),
            paginator: def.paginator(),
        }
    }

    /// Use a different paginator
    #[must_use]
    pub fn with_paginator(mut self, paginator: impl Paginator + 'static) -> Self {
        self.paginator = Box::new(paginator);
        self
    }

    /// Mark as mutating, identified by `confirm_param` in prompts
    #[must_use]
    pub fn mutating(mut self, confirm_param: Option<&str>) -> Self {
        self.mutating = true;
        self.confirm_param = confirm_param.map(str::to_string);
        self
    }

    /// Set the command alias
    #[must_use]
    pub fn with_command(mut self, command: impl Into<String>) -> Self {
        self.command = Some(command.into());
        self
    }

    /// Action label for prompts: `Command (Operation)`
    pub fn action(&self) -> String {
        match &self.command {
            Some(command) => format!("{command} ({})", self.name),
            None => self.name.clone(),
        }
    }

    /// Target label for prompts, e.g. `InstanceId='i-123'`
    pub fn confirmation_target(&self, context: &InvocationContext) -> String {
        let param = self.confirm_param.as_deref();
        target_text(param, param.and_then(|p| context.param(p)))
    }
}

impl std::fmt::Debug for Operation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Operation")
            .field("name", &self.name)
            .field("service", &self.service)
            .field("command", &self.command)
            .field("mutating", &self.mutating)
            .field("paginated", &self.paginator.is_paginated())
            .finish_non_exhaustive()
    }
}

/// Engine configuration
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Number of invocations kept in history (0 disables history)
    pub history_capacity: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            history_capacity: 10,
        }
    }
}

impl EngineConfig {
    /// Create a new engine config
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set history capacity
    #[must_use]
    pub fn with_history_capacity(mut self, capacity: usize) -> Self {
        self.history_capacity = capacity;
        self
    }
}

/// One recorded invocation
#[derive(Debug, Clone, PartialEq)]
pub struct HistoryEntry {
    /// Operation name
    pub operation: String,
    /// Last response received from the service, if any
    pub last_response: Option<JsonValue>,
    /// Error text when the invocation failed
    pub error: Option<String>,
}

/// Bounded record of recent invocations, newest last
#[derive(Debug, Clone)]
pub struct InvocationHistory {
    capacity: usize,
    entries: VecDeque<HistoryEntry>,
}

impl InvocationHistory {
    /// Create an empty history
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            entries: VecDeque::with_capacity(capacity),
        }
    }

    /// Record an entry, dropping the oldest when full
    pub fn record(&mut self, entry: HistoryEntry) {
        if self.capacity == 0 {
            return;
        }
        while self.entries.len() >= self.capacity {
            self.entries.pop_front();
        }
        self.entries.push_back(entry);
    }

    /// Most recent entry
    pub fn last(&self) -> Option<&HistoryEntry> {
        self.entries.back()
    }

    /// Last service response of the most recent invocation
    pub fn last_response(&self) -> Option<&JsonValue> {
        self.last().and_then(|e| e.last_response.as_ref())
    }

    /// Entries, oldest first
    pub fn entries(&self) -> impl Iterator<Item = &HistoryEntry> {
        self.entries.iter()
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Drop all entries
    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

/// Statistics from one invocation
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InvocationSummary {
    /// Service calls made
    pub calls: u32,
    /// Pages received
    pub pages: u32,
    /// Values written to the sink
    pub emitted: usize,
    /// Cursor left when the loop stopped (set under manual control)
    pub last_cursor: Option<String>,
    /// True when confirmation was declined
    pub skipped: bool,
    /// Duration in milliseconds
    pub duration_ms: u64,
}

impl InvocationSummary {
    /// Summary of an invocation that never ran
    pub fn skipped() -> Self {
        Self {
            skipped: true,
            ..Default::default()
        }
    }
}
