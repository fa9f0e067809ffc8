//! Pagination strategy implementations
//!
//! Each strategy handles a specific pagination pattern.

use super::types::Paginator;
use crate::projection::select_field;
use serde_json::Value;

// ============================================================================
// Cursor Pagination
// ============================================================================

/// Cursor-based pagination (e.g. `NextToken`, `nextToken`, `Marker`)
///
/// Reads the next cursor from a dot path in the response body. A missing,
/// null or empty value ends paging.
#[derive(Debug, Clone)]
pub struct CursorPaginator {
    /// Dot path of the cursor in the response
    pub cursor_path: String,
}

impl CursorPaginator {
    /// Create a new cursor paginator
    pub fn new(cursor_path: impl Into<String>) -> Self {
        Self {
            cursor_path: cursor_path.into(),
        }
    }
}

impl Paginator for CursorPaginator {
    fn next_token(&self, body: &Value) -> Option<String> {
        match select_field(body, &self.cursor_path)? {
            Value::String(s) if !s.is_empty() => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        }
    }
}

// ============================================================================
// No Pagination
// ============================================================================

/// No pagination - single request
#[derive(Debug, Clone, Default)]
pub struct NoPaginator;

impl Paginator for NoPaginator {
    fn next_token(&self, _body: &Value) -> Option<String> {
        None
    }

    fn is_paginated(&self) -> bool {
        false
    }
}
