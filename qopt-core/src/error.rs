//! Structured error taxonomy surfaced by the optimizer (spec §7).
//!
//! Internal consistency violations (pattern arity mismatches, misuse of
//! `Memo::add_group_expression`) are programming errors in the rule
//! library and are expected to be caught by `debug_assert!`/`panic!`
//! close to the violation; this enum exists for the subset of failures
//! that must be reported to a caller rather than aborted on.

use crate::memo::GroupId;

#[derive(thiserror::Error, Debug)]
pub enum OptimizerError {
    /// `add_group_expression` was called with both a concrete `group_id`
    /// and `check_duplicate = true`, or a rule's `apply` was invoked with
    /// a binding that its own `check` rejected.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// Extraction reached a group with no physical expression.
    #[error("no physical plan found for group {0:?}")]
    NoPlanFound(GroupId),

    /// A pattern's child count did not match the operator's children
    /// during matching; indicates a bug in a rule's `Pattern`.
    #[error("pattern arity mismatch: expected {expected} children, found {found}")]
    PatternArityMismatch { expected: usize, found: usize },

    /// The catalog failed to resolve a dataset referenced by a `Get`.
    #[error("catalog lookup failed for dataset `{0}`")]
    CatalogLookupFailed(String, #[source] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, OptimizerError>;
