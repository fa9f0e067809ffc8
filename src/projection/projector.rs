//! Output projector
//!
//! Applies the resolved rule to each page and forwards the results to a sink.

use super::rules::ProjectionRule;
use crate::context::InvocationContext;
use crate::error::Result;
use crate::sink::OutputSink;
use crate::types::JsonValue;
use tracing::debug;

/// Binds a context's projection rule to an output sink
pub struct OutputProjector<'a> {
    context: &'a InvocationContext,
    sink: &'a mut dyn OutputSink,
    emitted: usize,
}

impl<'a> OutputProjector<'a> {
    /// Create a projector for a context
    pub fn new(context: &'a InvocationContext, sink: &'a mut dyn OutputSink) -> Self {
        Self {
            context,
            sink,
            emitted: 0,
        }
    }

    /// Active rule
    pub fn rule(&self) -> &ProjectionRule {
        self.context.rule()
    }

    /// Project one page. Echo rules ignore pages entirely.
    pub fn on_page(&mut self, response: &JsonValue) -> Result<()> {
        let rule = self.context.rule();
        if rule.is_echo() {
            return Ok(());
        }

        match rule.select(response) {
            Some(value) => self.emit(value),
            None => {
                debug!("Select '{rule}' matched nothing in this page");
                Ok(())
            }
        }
    }

    /// Finish the invocation. Echo rules emit their parameter here, once.
    pub fn finish(&mut self) -> Result<()> {
        if let ProjectionRule::Echo(param) = self.context.rule() {
            if let Some(value) = self.context.param(param) {
                let value = value.clone();
                return self.emit(value);
            }
            debug!("Echoed parameter '{param}' was not bound, nothing to emit");
        }
        Ok(())
    }

    /// Number of values emitted so far
    pub fn emitted(&self) -> usize {
        self.emitted
    }

    fn emit(&mut self, value: JsonValue) -> Result<()> {
        self.sink.emit(value)?;
        self.emitted += 1;
        Ok(())
    }
}
