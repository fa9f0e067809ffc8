//! YAML Loader module
//!
//! Parse service definitions from YAML files.
//!
//! # Overview
//!
//! The loader module provides:
//! - `ServiceDefinition` - Endpoint, headers and operations of one service
//! - `OperationDefinition` - Request shape, pagination and output settings
//! - YAML parsing with validation
//! - Parameter binding (required checks and type coercion)

mod parser;
mod types;

pub use parser::{load_service, load_service_from_str};
pub use types::{
    HttpDefinition, OperationDefinition, PaginationDefinition, ParameterDefinition,
    ServiceDefinition,
};
