//! The single transformation rule: logical-to-logical, but (unlike a
//! rewrite) not always preferred — it widens the search space rather
//! than normalizing it (spec §4.3).

use qopt_core::context::OptimizerContext;
use qopt_core::pattern::Pattern;
use qopt_core::rule::{Rule, RulePhase};

use crate::build;
use crate::operator::{JoinType, OperatorData, OperatorKind, PlanOperator};

use super::promise;

/// `Join(lhs, rhs)` -> `Join(rhs, lhs)` for inner joins only; lateral
/// joins are not commutative (the right side depends on the left).
pub struct LogicalInnerJoinCommutativity;

impl Rule<OperatorKind, OperatorData> for LogicalInnerJoinCommutativity {
    fn name(&self) -> &'static str {
        "LogicalInnerJoinCommutativity"
    }

    fn phase(&self) -> RulePhase {
        RulePhase::Transformation
    }

    fn promise(&self) -> i32 {
        promise::LOGICAL_INNER_JOIN_COMMUTATIVITY
    }

    fn pattern(&self) -> &Pattern<OperatorKind> {
        static PATTERN: std::sync::OnceLock<Pattern<OperatorKind>> = std::sync::OnceLock::new();
        PATTERN.get_or_init(|| {
            Pattern::exact(
                OperatorKind::LogicalJoin(JoinType::Inner),
                vec![Pattern::Any, Pattern::Any],
            )
        })
    }

    fn check(&self, binding: &PlanOperator, _ctx: &OptimizerContext<OperatorKind, OperatorData>) -> bool {
        matches!(&binding.attributes, OperatorData::Join(join) if join.join_type == JoinType::Inner)
    }

    fn apply(&self, binding: &PlanOperator, _ctx: &OptimizerContext<OperatorKind, OperatorData>) -> PlanOperator {
        let OperatorData::Join(join) = &binding.attributes else {
            unreachable!("check guarantees a LogicalJoin binding");
        };
        let lhs = binding.children[0].clone();
        let rhs = binding.children[1].clone();
        build::logical_join(join.join_type, join.predicate.clone(), join.project.clone(), rhs, lhs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use qopt_core::context::StaticConfiguration;
    use qopt_core::memo::Memo;

    #[test]
    fn swaps_join_children() {
        let memo = Memo::new();
        let config = StaticConfiguration::new();
        let ctx = OptimizerContext::new(&memo, &config);

        let lhs = build::logical_get("a", false, "a", None, vec![]);
        let rhs = build::logical_get("b", false, "b", None, vec![]);
        let binding = build::logical_join(JoinType::Inner, None, vec![], lhs.clone(), rhs.clone());

        let rule = LogicalInnerJoinCommutativity;
        assert!(rule.check(&binding, &ctx));
        let after = rule.apply(&binding, &ctx);
        assert_eq!(after.children[0], rhs);
        assert_eq!(after.children[1], lhs);
    }

    #[test]
    fn rejects_lateral_join() {
        let memo = Memo::new();
        let config = StaticConfiguration::new();
        let ctx = OptimizerContext::new(&memo, &config);

        let lhs = build::logical_get("a", false, "a", None, vec![]);
        let rhs = build::logical_function_scan(crate::expr::Expr::tuple_value("a", "f"));
        let binding = build::logical_join(JoinType::Lateral, None, vec![], lhs, rhs);

        let rule = LogicalInnerJoinCommutativity;
        assert!(!rule.check(&binding, &ctx));
    }
}
