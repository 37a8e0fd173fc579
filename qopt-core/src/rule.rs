//! The rule trait and promise ordering (spec §4.3).

use crate::context::OptimizerContext;
use crate::node::{NodeAttributes, NodeKind, Operator};
use crate::pattern::Pattern;

/// A rule's phase. Rewrite and transformation rules are logical-to-logical
/// and always run before any implementation rule (spec §4.3, "Promise
/// ordering").
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum RulePhase {
    Rewrite,
    Transformation,
    Implementation,
}

impl RulePhase {
    pub fn is_logical(self) -> bool {
        !matches!(self, RulePhase::Implementation)
    }
}

/// Every rewrite/transformation rule's promise is strictly greater than
/// this constant; every implementation rule's promise is strictly less
/// than it. The driver always exhausts rewrites and transformations
/// before implementation.
pub const IMPLEMENTATION_DELIMITER: i32 = 1_000;

/// An immutable rewrite or implementation rule: a structural pattern, a
/// promise (priority), and a check/apply pair (spec §3, "Rule").
///
/// Rules are stateless; the rule library is a fixed set constructed once.
pub trait Rule<T: NodeKind, A: NodeAttributes>: Send + Sync {
    fn name(&self) -> &'static str;

    fn phase(&self) -> RulePhase;

    /// Integer priority; higher wins ties within a phase.
    fn promise(&self) -> i32;

    fn pattern(&self) -> &Pattern<T>;

    /// Whether `apply` should be invoked for this binding. A `false`
    /// result is a negative match, not an error — it is silently skipped
    /// by the driver (spec §7).
    fn check(&self, binding: &Operator<T, A>, ctx: &OptimizerContext<T, A>) -> bool;

    /// Rewrite `binding` into a new operator tree. Only called when
    /// `check` returned `true` for the same binding.
    fn apply(&self, binding: &Operator<T, A>, ctx: &OptimizerContext<T, A>) -> Operator<T, A>;
}
