//! Invocation context module
//!
//! Turns already-bound parameters and output/paging switches into an
//! immutable [`InvocationContext`]. Selection conflicts are detected here,
//! before any service call can happen.

mod types;

pub use types::{InvocationContext, InvocationContextBuilder};
