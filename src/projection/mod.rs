//! Output projection module
//!
//! Decides what an invocation yields to its caller.
//!
//! # Select rules
//!
//! - `*` - the whole response, once per page
//! - `Field` or `Field.Nested` - a sub-value of each response; pages where
//!   it is absent emit nothing
//! - `^Param` - the caller's own input parameter, emitted once after paging
//!
//! A legacy pass-thru switch maps to `^<pass-thru parameter>` and cannot be
//! combined with an explicit rule.

mod projector;
mod rules;

pub use projector::OutputProjector;
pub use rules::{
    select_field, ProjectionRule, SelectionConfig, ECHO_PREFIX, IDENTITY_RULE,
};
