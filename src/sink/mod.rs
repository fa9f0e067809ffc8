//! Output sink module
//!
//! Destinations for projected values. A sink receives every emitted value in
//! order and makes no other assumptions about the caller.
//!
//! # Sinks
//!
//! - `Vec<JsonValue>` - collect in memory
//! - `ChannelSink` - forward over a tokio channel
//! - `JsonLinesSink` - write JSON documents to any `Write`

mod writers;

pub use writers::{ChannelSink, JsonLinesSink};

use crate::error::Result;
use crate::types::JsonValue;

/// Receives projected values in emission order
pub trait OutputSink: Send {
    /// Accept one emitted value
    fn emit(&mut self, value: JsonValue) -> Result<()>;
}

impl OutputSink for Vec<JsonValue> {
    fn emit(&mut self, value: JsonValue) -> Result<()> {
        self.push(value);
        Ok(())
    }
}
