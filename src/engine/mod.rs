//! Execution engine module
//!
//! Runs one invocation end to end.
//!
//! # Overview
//!
//! The engine module provides:
//! - `Engine` - Confirmation, the paging loop and output projection
//! - `Operation` - Request builder and paginator for one operation
//! - `InvocationHistory` - Last responses of recent invocations
//! - `InvocationSummary` - Calls, pages and emitted values of a run

mod types;

pub use types::{
    EngineConfig, HistoryEntry, InvocationHistory, InvocationSummary, Operation,
};

use crate::confirm::{AutoConfirm, ConfirmationGate, Confirmer};
use crate::context::InvocationContext;
use crate::error::Result;
use crate::invoker::ServiceInvoker;
use crate::pagination::paginate;
use crate::projection::OutputProjector;
use crate::sink::OutputSink;
use crate::types::JsonValue;
use std::time::Instant;
use tracing::info;

/// Invocation engine
pub struct Engine<I: ServiceInvoker> {
    /// Service invoker
    invoker: I,
    /// Confirmation source for mutating operations
    confirmer: Box<dyn Confirmer>,
    /// Engine configuration
    config: EngineConfig,
    /// Recent invocations
    history: InvocationHistory,
}

impl<I: ServiceInvoker> Engine<I> {
    /// Create an engine that confirms every mutating operation
    pub fn new(invoker: I) -> Self {
        let config = EngineConfig::default();
        Self {
            invoker,
            confirmer: Box::new(AutoConfirm),
            history: InvocationHistory::new(config.history_capacity),
            config,
        }
    }

    /// Set the confirmation source
    #[must_use]
    pub fn with_confirmer(mut self, confirmer: impl Confirmer + 'static) -> Self {
        self.confirmer = Box::new(confirmer);
        self
    }

    /// Set engine configuration
    #[must_use]
    pub fn with_config(mut self, config: EngineConfig) -> Self {
        self.history = InvocationHistory::new(config.history_capacity);
        self.config = config;
        self
    }

    /// Get the invoker
    pub fn invoker(&self) -> &I {
        &self.invoker
    }

    /// Get the configuration
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Get the invocation history
    pub fn history(&self) -> &InvocationHistory {
        &self.history
    }

    /// Run one invocation, writing projected values to `sink`.
    ///
    /// A declined confirmation returns a skipped summary without calling the
    /// service. Echo rules still page through every response before emitting
    /// the echoed parameter.
    pub async fn run(
        &mut self,
        operation: &Operation,
        context: &InvocationContext,
        sink: &mut dyn OutputSink,
    ) -> Result<InvocationSummary> {
        let start = Instant::now();

        let target = operation.confirmation_target(context);
        let action = operation.action();
        let gate = ConfirmationGate::new(self.confirmer.as_ref());
        if !gate.should_proceed(operation.mutating, context.force(), &target, &action)? {
            info!("Skipped {action}: not confirmed");
            return Ok(InvocationSummary::skipped());
        }

        info!(
            service = %operation.service,
            operation = %operation.name,
            select = %context.rule(),
            "Starting invocation"
        );

        let mut projector = OutputProjector::new(context, &mut *sink);
        let mut last_response: Option<JsonValue> = None;

        let result = paginate(
            &self.invoker,
            operation.builder.as_ref(),
            operation.paginator.as_ref(),
            context,
            |page| {
                last_response = Some(page.payload.clone());
                projector.on_page(&page.payload)
            },
        )
        .await;
        let result = result.and_then(|state| {
            projector.finish()?;
            Ok(state)
        });
        let emitted = projector.emitted();

        self.history.record(HistoryEntry {
            operation: operation.name.clone(),
            last_response,
            error: result.as_ref().err().map(ToString::to_string),
        });

        let state = result?;
        let summary = InvocationSummary {
            calls: state.calls,
            pages: state.pages,
            emitted,
            last_cursor: state.cursor,
            skipped: false,
            duration_ms: start.elapsed().as_millis() as u64,
        };

        info!(
            "Completed {}: {} calls, {} values in {}ms",
            operation.name, summary.calls, summary.emitted, summary.duration_ms
        );

        Ok(summary)
    }

    /// Run one invocation and collect the emitted values
    pub async fn run_collect(
        &mut self,
        operation: &Operation,
        context: &InvocationContext,
    ) -> Result<Vec<JsonValue>> {
        let mut values = Vec::new();
        self.run(operation, context, &mut values).await?;
        Ok(values)
    }
}

impl<I: ServiceInvoker + std::fmt::Debug> std::fmt::Debug for Engine<I> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Engine")
            .field("invoker", &self.invoker)
            .field("config", &self.config)
            .field("history", &self.history.len())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests;
