//! Failure classification
//!
//! Recognises name-resolution (DNS) failures in an invoker error and
//! re-wraps them with the endpoint and operation that could not be reached.
//! Everything else passes through untouched. Nothing here retries or
//! suppresses an error.

use crate::error::Error;
use std::error::Error as StdError;

/// Lower-cased fragments of resolver error messages across platforms
const NAME_RESOLUTION_MARKERS: &[&str] = &[
    "dns error",
    "failed to lookup address",
    "name or service not known",
    "nodename nor servname",
    "no such host is known",
    "temporary failure in name resolution",
    "name resolution",
];

/// A host name could not be resolved.
///
/// Invokers that detect the condition themselves can return this (wrapped
/// in [`Error::transport`]) instead of relying on message matching.
#[derive(Debug, Clone, thiserror::Error)]
#[error("failed to resolve host '{host}'")]
pub struct NameResolutionFailure {
    /// Host that failed to resolve
    pub host: String,
}

impl NameResolutionFailure {
    /// Create a failure for a host
    pub fn new(host: impl Into<String>) -> Self {
        Self { host: host.into() }
    }
}

/// Check whether an error is, or is caused by, a name-resolution failure.
///
/// Only transport-level errors are inspected; service responses (HTTP status
/// errors) never count even if their body mentions DNS.
pub fn is_name_resolution_failure(error: &Error) -> bool {
    match error {
        Error::NameResolution { .. } => true,
        Error::Http(_) | Error::Transport { .. } => {
            let mut current: Option<&(dyn StdError + 'static)> = Some(error);
            while let Some(err) = current {
                if err.is::<NameResolutionFailure>() || mentions_name_resolution(err) {
                    return true;
                }
                current = err.source();
            }
            false
        }
        _ => false,
    }
}

/// Enrich a name-resolution failure with the endpoint and operation.
///
/// Any other error is returned unchanged; an already-classified error is not
/// wrapped twice.
pub fn classify(error: Error, endpoint: &str, operation: &str) -> Error {
    if matches!(error, Error::NameResolution { .. }) || !is_name_resolution_failure(&error) {
        return error;
    }

    Error::NameResolution {
        endpoint: endpoint.to_string(),
        operation: operation.to_string(),
        message: root_cause(&error),
        source: Box::new(error),
    }
}

fn mentions_name_resolution(err: &(dyn StdError + 'static)) -> bool {
    let message = err.to_string().to_lowercase();
    NAME_RESOLUTION_MARKERS
        .iter()
        .any(|marker| message.contains(marker))
}

/// Message of the innermost error in the chain
fn root_cause(error: &Error) -> String {
    let mut current: &(dyn StdError + 'static) = error;
    while let Some(next) = current.source() {
        current = next;
    }
    current.to_string()
}
