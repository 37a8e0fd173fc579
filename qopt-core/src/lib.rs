//! Representation-agnostic memo, pattern matcher, and rule engine.
//!
//! This crate has no idea what a scan or a join is. It provides the
//! generic machinery — `Memo`, `Pattern`, `Rule`, and the driver that
//! turns a logical operator tree into a physical one by running rules to
//! a fixpoint — parameterized over a concrete `NodeKind`/`NodeAttributes`
//! pair supplied by a representation crate such as `qopt-plan`.

pub mod context;
pub mod driver;
pub mod error;
pub mod memo;
pub mod node;
pub mod pattern;
pub mod rule;
#[cfg(test)]
mod testkit;

pub use context::{Catalog, Configuration, OptimizerContext, StaticConfiguration};
pub use error::{OptimizerError, Result};
pub use memo::{Group, GroupExpression, GroupId, Memo};
pub use node::{NodeAttributes, NodeKind, Operator};
pub use pattern::{match_group, Pattern};
pub use rule::{Rule, RulePhase, IMPLEMENTATION_DELIMITER};
