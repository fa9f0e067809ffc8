// Allow common clippy pedantic lints that aren't critical for this codebase
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_lossless)]
#![allow(clippy::too_many_lines)]
#![allow(clippy::ref_option)]
#![allow(clippy::unused_self)]
#![allow(clippy::struct_excessive_bools)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::items_after_statements)]
#![allow(clippy::unnecessary_wraps)]
#![allow(clippy::match_same_arms)]
#![allow(clippy::match_wildcard_for_single_variants)]
#![allow(clippy::needless_pass_by_value)]
#![allow(clippy::unused_async)]

//! # paged-invoke
//!
//! A small engine for invoking paged service API operations.
//!
//! ## Features
//!
//! - **Pagination**: follows continuation cursors until exhausted, or stops
//!   after one page when the caller takes manual control
//! - **Output projection**: `*` for whole responses, a field name, or
//!   `^Param` to echo an input parameter
//! - **Failure classification**: DNS failures are reported with the endpoint
//!   and operation that could not be reached
//! - **Declarative operations**: service and operation definitions in YAML
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use paged_invoke::{load_service, Engine, HttpInvoker, Operation, Result};
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let service = load_service("cloudwatch")?;
//!     let def = service.operation("Get-CWAnomalyDetector")?;
//!
//!     let context = def
//!         .context_builder()
//!         .param("MetricName", "CPUUtilization")
//!         .build()?;
//!
//!     let mut engine = Engine::new(HttpInvoker::for_service(&service, None)?);
//!     let detectors = engine
//!         .run_collect(&Operation::from_definition(&service, def), &context)
//!         .await?;
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                        Engine::run                              │
//! │  ConfirmationGate → paginate → OutputProjector → OutputSink     │
//! └─────────────────────────────────────────────────────────────────┘
//!                                │
//! ┌──────────┬───────────┬───────┴───────┬───────────┬─────────────┐
//! │ Context  │  Request  │   Paginate    │  Invoker  │   Failure   │
//! ├──────────┼───────────┼───────────────┼───────────┼─────────────┤
//! │ Select   │ Rename    │ Cursor        │ HTTP      │ DNS         │
//! │ Cursor   │ Null guard│ Single result │ Scripted  │ enrichment  │
//! │ Force    │ Cursor fld│ Manual control│ Retry     │             │
//! └──────────┴───────────┴───────────────┴───────────┴─────────────┘
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::doc_markdown)]
#![allow(missing_docs)]

// ============================================================================
// Module declarations
// ============================================================================

/// Error types
pub mod error;

/// Common types and type aliases
pub mod types;

/// Invocation context
pub mod context;

/// Select rules and the output projector
pub mod projection;

/// Output sinks
pub mod sink;

/// Pagination strategies and the paging loop
pub mod pagination;

/// Name-resolution failure classification
pub mod failure;

/// Per-page request building
pub mod request;

/// Service invokers
pub mod invoker;

/// HTTP client with retry and backoff
pub mod http;

/// Confirmation for mutating operations
pub mod confirm;

/// Main execution engine
pub mod engine;

/// YAML loader for service definitions
pub mod loader;

/// Built-in service definitions
pub mod services;

/// Command-line interface
pub mod cli;

// ============================================================================
// Re-exports
// ============================================================================

pub use error::{Error, Result};
pub use types::*;

// Re-export commonly used types
pub use context::{InvocationContext, InvocationContextBuilder};
pub use engine::{Engine, EngineConfig, InvocationSummary, Operation};
pub use invoker::{HttpInvoker, ServiceInvoker};
pub use loader::{load_service, load_service_from_str, OperationDefinition, ServiceDefinition};
pub use projection::ProjectionRule;
pub use sink::OutputSink;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");
