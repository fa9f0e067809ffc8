//! CLI module
//!
//! Command-line interface for invoking service operations.
//!
//! # Commands
//!
//! - `invoke` - Run one operation, following pagination
//! - `list` - List built-in services
//! - `operations` - List the operations of a service
//! - `validate` - Validate a service definition file

mod commands;
mod runner;

pub use commands::{Cli, Commands, OutputFormat};
pub use runner::{collect_params, InvokeArgs, Runner};
