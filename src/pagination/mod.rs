//! Pagination module
//!
//! Supports: Cursor, and single-result operations
//!
//! # Overview
//!
//! The pagination module provides a unified interface for paged service
//! operations. Each strategy extracts the continuation cursor from responses;
//! [`paginate`] drives the request/response loop.

mod driver;
mod strategies;
mod types;

pub use driver::paginate;
pub use strategies::{CursorPaginator, NoPaginator};
pub use types::{NextPage, Page, PaginationState, Paginator};
