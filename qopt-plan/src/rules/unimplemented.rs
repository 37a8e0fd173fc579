//! Rules documented in the source this optimizer is modeled on but never
//! wired into a rule set there either, kept here for parity rather than
//! silently dropped.

use qopt_core::context::OptimizerContext;
use qopt_core::pattern::Pattern;
use qopt_core::rule::{Rule, RulePhase};

use crate::operator::{OperatorData, OperatorKind, PlanOperator};

/// Intended to pull a UDF call out of a filter predicate and turn it into
/// a lateral cross-apply, so the UDF runs once per row instead of once
/// per predicate evaluation. The rule this was grounded on checks
/// `join_type` on a `LogicalFilter` binding, which has no `join_type`
/// field and can never be satisfied — it was never reachable there
/// either. `check` always returns `false` here for the same reason;
/// `apply` is unreachable and not implemented.
pub struct PullUdfFromFilterToCrossApply;

impl Rule<OperatorKind, OperatorData> for PullUdfFromFilterToCrossApply {
    fn name(&self) -> &'static str {
        "PullUdfFromFilterToCrossApply"
    }

    fn phase(&self) -> RulePhase {
        RulePhase::Rewrite
    }

    fn promise(&self) -> i32 {
        i32::MIN
    }

    fn pattern(&self) -> &Pattern<OperatorKind> {
        static PATTERN: std::sync::OnceLock<Pattern<OperatorKind>> = std::sync::OnceLock::new();
        PATTERN.get_or_init(|| Pattern::exact(OperatorKind::LogicalFilter, vec![Pattern::Any]))
    }

    fn check(&self, _binding: &PlanOperator, _ctx: &OptimizerContext<OperatorKind, OperatorData>) -> bool {
        false
    }

    fn apply(&self, _binding: &PlanOperator, _ctx: &OptimizerContext<OperatorKind, OperatorData>) -> PlanOperator {
        unreachable!("check always returns false")
    }
}
