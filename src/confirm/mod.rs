//! Confirmation gate for mutating operations
//!
//! Mutating operations ask a [`Confirmer`] before the first call unless the
//! caller passed `force`. A declined confirmation is not an error: the
//! invocation simply does nothing.

use crate::error::{Error, Result};
use crate::types::JsonValue;
use std::io::{BufRead, Write};
use std::sync::Mutex;
use tracing::debug;

/// Decides whether an action on a target may proceed
pub trait Confirmer: Send + Sync {
    /// Ask for confirmation of `action` against `target`
    fn confirm(&self, target: &str, action: &str) -> Result<bool>;
}

/// Always confirms
#[derive(Debug, Clone, Copy, Default)]
pub struct AutoConfirm;

impl Confirmer for AutoConfirm {
    fn confirm(&self, _target: &str, _action: &str) -> Result<bool> {
        Ok(true)
    }
}

/// Always declines
#[derive(Debug, Clone, Copy, Default)]
pub struct DenyAll;

impl Confirmer for DenyAll {
    fn confirm(&self, _target: &str, _action: &str) -> Result<bool> {
        Ok(false)
    }
}

/// Interactive y/N prompt
///
/// Writes the prompt to `output` and reads one line from `input`. Anything
/// other than `y`/`yes` (case-insensitive) declines, including end of input.
pub struct PromptConfirmer<R, W> {
    io: Mutex<(R, W)>,
}

impl<R, W> PromptConfirmer<R, W>
where
    R: BufRead + Send,
    W: Write + Send,
{
    /// Create a prompt over a reader and a writer
    pub fn new(input: R, output: W) -> Self {
        Self {
            io: Mutex::new((input, output)),
        }
    }

    /// Recover the reader and writer
    pub fn into_inner(self) -> (R, W) {
        match self.io.into_inner() {
            Ok(io) => io,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

impl PromptConfirmer<std::io::BufReader<std::io::Stdin>, std::io::Stderr> {
    /// Prompt on stderr, read from stdin
    pub fn stdio() -> Self {
        Self::new(std::io::BufReader::new(std::io::stdin()), std::io::stderr())
    }
}

impl<R, W> Confirmer for PromptConfirmer<R, W>
where
    R: BufRead + Send,
    W: Write + Send,
{
    fn confirm(&self, target: &str, action: &str) -> Result<bool> {
        let mut guard = self
            .io
            .lock()
            .map_err(|_| Error::Other("confirmation prompt lock poisoned".to_string()))?;
        let (input, output) = &mut *guard;

        writeln!(output, "Confirm")?;
        writeln!(output, "Are you sure you want to perform this action?")?;
        writeln!(
            output,
            "Performing the operation \"{action}\" on target \"{target}\"."
        )?;
        write!(output, "[Y] Yes  [N] No  (default is \"N\"): ")?;
        output.flush()?;

        let mut answer = String::new();
        input.read_line(&mut answer)?;
        let answer = answer.trim().to_lowercase();
        Ok(answer == "y" || answer == "yes")
    }
}

impl<R, W> std::fmt::Debug for PromptConfirmer<R, W> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PromptConfirmer").finish_non_exhaustive()
    }
}

/// Gate in front of mutating operations
#[derive(Clone, Copy)]
pub struct ConfirmationGate<'a> {
    confirmer: &'a dyn Confirmer,
}

impl std::fmt::Debug for ConfirmationGate<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConfirmationGate").finish_non_exhaustive()
    }
}

impl<'a> ConfirmationGate<'a> {
    /// Create a gate asking `confirmer`
    pub fn new(confirmer: &'a dyn Confirmer) -> Self {
        Self { confirmer }
    }

    /// Whether the invocation may proceed.
    ///
    /// Non-mutating operations and `force` never prompt.
    pub fn should_proceed(
        &self,
        mutating: bool,
        force: bool,
        target: &str,
        action: &str,
    ) -> Result<bool> {
        if !mutating || force {
            return Ok(true);
        }
        let confirmed = self.confirmer.confirm(target, action)?;
        if !confirmed {
            debug!(action = %action, resource = %target, "Confirmation declined");
        }
        Ok(confirmed)
    }
}

/// Target text for a prompt: `Name='value'` when the parameter is bound
pub fn target_text(param: Option<&str>, value: Option<&JsonValue>) -> String {
    match (param, value) {
        (Some(name), Some(JsonValue::String(s))) => format!("{name}='{s}'"),
        (Some(name), Some(v)) => format!("{name}='{v}'"),
        (Some(name), None) => format!("{name}=''"),
        (None, _) => String::new(),
    }
}
