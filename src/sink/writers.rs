//! Sink implementations

use super::OutputSink;
use crate::error::{Error, Result};
use crate::types::JsonValue;
use std::io::Write;
use tokio::sync::mpsc::UnboundedSender;

// ============================================================================
// Channel Sink
// ============================================================================

/// Forwards every emitted value to a tokio unbounded channel
#[derive(Debug, Clone)]
pub struct ChannelSink {
    sender: UnboundedSender<JsonValue>,
}

impl ChannelSink {
    /// Create a sink over an existing sender
    pub fn new(sender: UnboundedSender<JsonValue>) -> Self {
        Self { sender }
    }
}

impl OutputSink for ChannelSink {
    fn emit(&mut self, value: JsonValue) -> Result<()> {
        self.sender
            .send(value)
            .map_err(|_| Error::output("output channel closed"))
    }
}

// ============================================================================
// JSON Lines Sink
// ============================================================================

/// Writes emitted values as JSON documents
///
/// Compact mode writes one document per line. With `enumerate` set, arrays are
/// unrolled so each element becomes its own document, the way a shell
/// pipeline unrolls collections.
pub struct JsonLinesSink<W: Write + Send> {
    writer: W,
    pretty: bool,
    enumerate: bool,
    written: usize,
}

impl<W: Write + Send> JsonLinesSink<W> {
    /// Create a compact, enumerating sink
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            pretty: false,
            enumerate: true,
            written: 0,
        }
    }

    /// Pretty-print documents
    #[must_use]
    pub fn with_pretty(mut self, pretty: bool) -> Self {
        self.pretty = pretty;
        self
    }

    /// Unroll arrays into their elements
    #[must_use]
    pub fn with_enumerate(mut self, enumerate: bool) -> Self {
        self.enumerate = enumerate;
        self
    }

    /// Number of documents written so far
    pub fn written(&self) -> usize {
        self.written
    }

    /// Consume the sink and return the writer
    pub fn into_inner(self) -> W {
        self.writer
    }

    fn write_document(&mut self, value: &JsonValue) -> Result<()> {
        if self.pretty {
            serde_json::to_writer_pretty(&mut self.writer, value)?;
        } else {
            serde_json::to_writer(&mut self.writer, value)?;
        }
        self.writer.write_all(b"\n")?;
        self.written += 1;
        Ok(())
    }
}

impl<W: Write + Send> OutputSink for JsonLinesSink<W> {
    fn emit(&mut self, value: JsonValue) -> Result<()> {
        match value {
            JsonValue::Array(items) if self.enumerate => {
                for item in &items {
                    self.write_document(item)?;
                }
            }
            other => self.write_document(&other)?,
        }
        self.writer.flush()?;
        Ok(())
    }
}
