//! Pagination types

use serde_json::Value;

/// One page of results returned by a single service call
#[derive(Debug, Clone, PartialEq)]
pub struct Page {
    /// Full response payload
    pub payload: Value,
    /// Continuation cursor, absent or empty on the last page
    pub next_token: Option<String>,
}

impl Page {
    /// Create a page
    pub fn new(payload: Value, next_token: Option<String>) -> Self {
        Self {
            payload,
            next_token,
        }
    }

    /// Whether the service reported more pages
    pub fn has_more(&self) -> bool {
        self.next_token.as_deref().is_some_and(|t| !t.is_empty())
    }
}

/// Result of processing a response
#[derive(Debug, Clone, PartialEq)]
pub enum NextPage {
    /// Continue from this cursor
    Continue {
        /// Cursor for the next request
        cursor: String,
    },
    /// Pagination is complete
    Done,
}

impl NextPage {
    /// Create a continuation from a cursor; empty cursors finish paging
    pub fn from_token(token: Option<String>) -> Self {
        match token {
            Some(cursor) if !cursor.is_empty() => Self::Continue { cursor },
            _ => Self::Done,
        }
    }

    /// Check if pagination is done
    pub fn is_done(&self) -> bool {
        matches!(self, Self::Done)
    }

    /// Check if there are more pages
    pub fn is_continue(&self) -> bool {
        matches!(self, Self::Continue { .. })
    }
}

/// Tracks pagination state during iteration
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PaginationState {
    /// Service calls made
    pub calls: u32,
    /// Pages handed to the page callback
    pub pages: u32,
    /// Current cursor value (terminal cursor once the loop ends)
    pub cursor: Option<String>,
    /// Is pagination complete?
    pub done: bool,
}

impl PaginationState {
    /// Create state starting from a cursor
    pub fn starting_at(cursor: Option<&str>) -> Self {
        Self {
            cursor: cursor.filter(|c| !c.is_empty()).map(str::to_string),
            ..Default::default()
        }
    }

    /// Mark pagination as complete
    pub fn mark_done(&mut self) {
        self.done = true;
    }

    /// Set cursor; an empty cursor clears it
    pub fn set_cursor(&mut self, cursor: Option<String>) {
        self.cursor = cursor.filter(|c| !c.is_empty());
    }
}

/// Core trait for pagination strategies
pub trait Paginator: Send + Sync {
    /// Extract the continuation cursor from a response
    fn next_token(&self, body: &Value) -> Option<String>;

    /// Whether the operation pages at all
    fn is_paginated(&self) -> bool {
        true
    }

    /// Turn a response into a page
    fn page(&self, body: Value) -> Page {
        let next_token = if self.is_paginated() {
            self.next_token(&body)
        } else {
            None
        };
        Page::new(body, next_token)
    }

    /// Process a page and decide whether to fetch another
    fn process_page(&self, page: &Page, state: &mut PaginationState) -> NextPage {
        state.pages += 1;
        state.set_cursor(page.next_token.clone());
        let next = NextPage::from_token(state.cursor.clone());
        if next.is_done() {
            state.mark_done();
        }
        next
    }
}
