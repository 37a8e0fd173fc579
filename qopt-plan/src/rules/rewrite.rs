//! Rewrite rules: logical to logical, always preferred when applicable
//! (spec §4.3 table).

use qopt_core::context::OptimizerContext;
use qopt_core::pattern::Pattern;
use qopt_core::rule::{Rule, RulePhase};

use crate::build;
use crate::expr::extract_pushdown_predicate;
use crate::operator::{OperatorData, OperatorKind, PlanOperator};

use super::promise;

/// `Filter(Get)` -> `Get` with the pushdown fragment absorbed, wrapped in
/// a residual `Filter` if anything doesn't push down. Only applicable
/// when the `Get`'s dataset is a video and the predicate restricts
/// `<alias>.id`.
pub struct EmbedFilterIntoGet;

impl Rule<OperatorKind, OperatorData> for EmbedFilterIntoGet {
    fn name(&self) -> &'static str {
        "EmbedFilterIntoGet"
    }

    fn phase(&self) -> RulePhase {
        RulePhase::Rewrite
    }

    fn promise(&self) -> i32 {
        promise::EMBED_FILTER_INTO_GET
    }

    fn pattern(&self) -> &Pattern<OperatorKind> {
        static PATTERN: std::sync::OnceLock<Pattern<OperatorKind>> = std::sync::OnceLock::new();
        PATTERN.get_or_init(|| {
            Pattern::exact(
                OperatorKind::LogicalFilter,
                vec![Pattern::leaf(OperatorKind::LogicalGet)],
            )
        })
    }

    fn check(&self, binding: &PlanOperator, _ctx: &OptimizerContext<OperatorKind, OperatorData>) -> bool {
        let OperatorData::Filter(filter) = &binding.attributes else {
            return false;
        };
        let OperatorData::Get(get) = &binding.children[0].attributes else {
            return false;
        };
        if !get.is_video {
            return false;
        }
        let (pushdown, _) = extract_pushdown_predicate(&filter.predicate, &get.alias, "id");
        pushdown.is_some()
    }

    fn apply(&self, binding: &PlanOperator, _ctx: &OptimizerContext<OperatorKind, OperatorData>) -> PlanOperator {
        let OperatorData::Filter(filter) = &binding.attributes else {
            unreachable!("check guarantees a LogicalFilter binding");
        };
        let OperatorData::Get(get) = &binding.children[0].attributes else {
            unreachable!("check guarantees a LogicalGet child");
        };
        let (pushdown, remaining) = extract_pushdown_predicate(&filter.predicate, &get.alias, "id");
        let Some(pushdown) = pushdown else {
            return binding.clone();
        };
        let new_get = build::logical_get(
            get.dataset.clone(),
            get.is_video,
            get.alias.clone(),
            Some(pushdown),
            get.target_list.clone(),
        );
        match remaining {
            Some(remaining) => build::logical_filter(remaining, new_get),
            None => new_get,
        }
    }
}

/// `Project(Get)` -> `Get` carrying the project's target list.
pub struct EmbedProjectIntoGet;

impl Rule<OperatorKind, OperatorData> for EmbedProjectIntoGet {
    fn name(&self) -> &'static str {
        "EmbedProjectIntoGet"
    }

    fn phase(&self) -> RulePhase {
        RulePhase::Rewrite
    }

    fn promise(&self) -> i32 {
        promise::EMBED_PROJECT_INTO_GET
    }

    fn pattern(&self) -> &Pattern<OperatorKind> {
        static PATTERN: std::sync::OnceLock<Pattern<OperatorKind>> = std::sync::OnceLock::new();
        PATTERN.get_or_init(|| {
            Pattern::exact(
                OperatorKind::LogicalProject,
                vec![Pattern::leaf(OperatorKind::LogicalGet)],
            )
        })
    }

    fn check(&self, _binding: &PlanOperator, _ctx: &OptimizerContext<OperatorKind, OperatorData>) -> bool {
        true
    }

    fn apply(&self, binding: &PlanOperator, _ctx: &OptimizerContext<OperatorKind, OperatorData>) -> PlanOperator {
        let OperatorData::Project(project) = &binding.attributes else {
            unreachable!("pattern guarantees a LogicalProject binding");
        };
        let OperatorData::Get(get) = &binding.children[0].attributes else {
            unreachable!("pattern guarantees a LogicalGet child");
        };
        build::logical_get(
            get.dataset.clone(),
            get.is_video,
            get.alias.clone(),
            get.predicate.clone(),
            project.target_list.clone(),
        )
    }
}

/// `Filter(DerivedGet(Any))` -> `DerivedGet` with the filter's predicate
/// absorbed. Unlike `EmbedFilterIntoGet`, a derived get's child is opaque
/// (pattern `Any`), so this rule does not restrict or decompose the
/// predicate.
pub struct EmbedFilterIntoDerivedGet;

impl Rule<OperatorKind, OperatorData> for EmbedFilterIntoDerivedGet {
    fn name(&self) -> &'static str {
        "EmbedFilterIntoDerivedGet"
    }

    fn phase(&self) -> RulePhase {
        RulePhase::Rewrite
    }

    fn promise(&self) -> i32 {
        promise::EMBED_FILTER_INTO_DERIVED_GET
    }

    fn pattern(&self) -> &Pattern<OperatorKind> {
        static PATTERN: std::sync::OnceLock<Pattern<OperatorKind>> = std::sync::OnceLock::new();
        PATTERN.get_or_init(|| {
            Pattern::exact(
                OperatorKind::LogicalFilter,
                vec![Pattern::exact(
                    OperatorKind::LogicalQueryDerivedGet,
                    vec![Pattern::Any],
                )],
            )
        })
    }

    fn check(&self, _binding: &PlanOperator, _ctx: &OptimizerContext<OperatorKind, OperatorData>) -> bool {
        true
    }

    fn apply(&self, binding: &PlanOperator, _ctx: &OptimizerContext<OperatorKind, OperatorData>) -> PlanOperator {
        let OperatorData::Filter(filter) = &binding.attributes else {
            unreachable!("pattern guarantees a LogicalFilter binding");
        };
        let derived = &binding.children[0];
        let OperatorData::DerivedGet(get) = &derived.attributes else {
            unreachable!("pattern guarantees a LogicalQueryDerivedGet child");
        };
        build::logical_query_derived_get(
            get.alias.clone(),
            Some(filter.predicate.clone()),
            get.target_list.clone(),
            derived.children[0].clone(),
        )
    }
}

/// `Project(DerivedGet(Any))` -> `DerivedGet` with the project's target
/// list absorbed.
pub struct EmbedProjectIntoDerivedGet;

impl Rule<OperatorKind, OperatorData> for EmbedProjectIntoDerivedGet {
    fn name(&self) -> &'static str {
        "EmbedProjectIntoDerivedGet"
    }

    fn phase(&self) -> RulePhase {
        RulePhase::Rewrite
    }

    fn promise(&self) -> i32 {
        promise::EMBED_PROJECT_INTO_DERIVED_GET
    }

    fn pattern(&self) -> &Pattern<OperatorKind> {
        static PATTERN: std::sync::OnceLock<Pattern<OperatorKind>> = std::sync::OnceLock::new();
        PATTERN.get_or_init(|| {
            Pattern::exact(
                OperatorKind::LogicalProject,
                vec![Pattern::exact(
                    OperatorKind::LogicalQueryDerivedGet,
                    vec![Pattern::Any],
                )],
            )
        })
    }

    fn check(&self, _binding: &PlanOperator, _ctx: &OptimizerContext<OperatorKind, OperatorData>) -> bool {
        true
    }

    fn apply(&self, binding: &PlanOperator, _ctx: &OptimizerContext<OperatorKind, OperatorData>) -> PlanOperator {
        let OperatorData::Project(project) = &binding.attributes else {
            unreachable!("pattern guarantees a LogicalProject binding");
        };
        let derived = &binding.children[0];
        let OperatorData::DerivedGet(get) = &derived.attributes else {
            unreachable!("pattern guarantees a LogicalQueryDerivedGet child");
        };
        build::logical_query_derived_get(
            get.alias.clone(),
            get.predicate.clone(),
            project.target_list.clone(),
            derived.children[0].clone(),
        )
    }
}

/// `Filter(Sample(Get))` -> `Sample(Filter(Get))`.
pub struct PushdownFilterThroughSample;

impl Rule<OperatorKind, OperatorData> for PushdownFilterThroughSample {
    fn name(&self) -> &'static str {
        "PushdownFilterThroughSample"
    }

    fn phase(&self) -> RulePhase {
        RulePhase::Rewrite
    }

    fn promise(&self) -> i32 {
        promise::PUSHDOWN_FILTER_THROUGH_SAMPLE
    }

    fn pattern(&self) -> &Pattern<OperatorKind> {
        static PATTERN: std::sync::OnceLock<Pattern<OperatorKind>> = std::sync::OnceLock::new();
        PATTERN.get_or_init(|| {
            Pattern::exact(
                OperatorKind::LogicalFilter,
                vec![Pattern::exact(
                    OperatorKind::LogicalSample,
                    vec![Pattern::leaf(OperatorKind::LogicalGet)],
                )],
            )
        })
    }

    fn check(&self, _binding: &PlanOperator, _ctx: &OptimizerContext<OperatorKind, OperatorData>) -> bool {
        true
    }

    fn apply(&self, binding: &PlanOperator, _ctx: &OptimizerContext<OperatorKind, OperatorData>) -> PlanOperator {
        let OperatorData::Filter(filter) = &binding.attributes else {
            unreachable!("pattern guarantees a LogicalFilter binding");
        };
        let sample = &binding.children[0];
        let OperatorData::Sample(sample_data) = &sample.attributes else {
            unreachable!("pattern guarantees a LogicalSample child");
        };
        let get = sample.children[0].clone();
        build::logical_sample(
            sample_data.sample_freq,
            build::logical_filter(filter.predicate.clone(), get),
        )
    }
}

/// `Project(Sample(Get))` -> `Sample(Project(Get))`.
pub struct PushdownProjectThroughSample;

impl Rule<OperatorKind, OperatorData> for PushdownProjectThroughSample {
    fn name(&self) -> &'static str {
        "PushdownProjectThroughSample"
    }

    fn phase(&self) -> RulePhase {
        RulePhase::Rewrite
    }

    fn promise(&self) -> i32 {
        promise::PUSHDOWN_PROJECT_THROUGH_SAMPLE
    }

    fn pattern(&self) -> &Pattern<OperatorKind> {
        static PATTERN: std::sync::OnceLock<Pattern<OperatorKind>> = std::sync::OnceLock::new();
        PATTERN.get_or_init(|| {
            Pattern::exact(
                OperatorKind::LogicalProject,
                vec![Pattern::exact(
                    OperatorKind::LogicalSample,
                    vec![Pattern::leaf(OperatorKind::LogicalGet)],
                )],
            )
        })
    }

    fn check(&self, _binding: &PlanOperator, _ctx: &OptimizerContext<OperatorKind, OperatorData>) -> bool {
        true
    }

    fn apply(&self, binding: &PlanOperator, _ctx: &OptimizerContext<OperatorKind, OperatorData>) -> PlanOperator {
        let OperatorData::Project(project) = &binding.attributes else {
            unreachable!("pattern guarantees a LogicalProject binding");
        };
        let sample = &binding.children[0];
        let OperatorData::Sample(sample_data) = &sample.attributes else {
            unreachable!("pattern guarantees a LogicalSample child");
        };
        let get = sample.children[0].clone();
        build::logical_sample(
            sample_data.sample_freq,
            build::logical_project(project.target_list.clone(), get),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expr::{CompareOp, Expr, Value};
    use qopt_core::context::StaticConfiguration;
    use qopt_core::memo::Memo;

    fn ctx<'a>(memo: &'a Memo<OperatorKind, OperatorData>, config: &'a StaticConfiguration) -> OptimizerContext<'a, OperatorKind, OperatorData> {
        OptimizerContext::new(memo, config)
    }

    #[test]
    fn embed_filter_into_get_absorbs_simple_range_predicate() {
        let memo = Memo::new();
        let config = StaticConfiguration::new();
        let predicate = Expr::compare(CompareOp::Lt, Expr::tuple_value("v", "id"), Expr::constant(Value::int(10)));
        let get = build::logical_get("v", true, "v", None, vec![]);
        let binding = build::logical_filter(predicate.clone(), get);

        let rule = EmbedFilterIntoGet;
        assert!(rule.check(&binding, &ctx(&memo, &config)));
        let after = rule.apply(&binding, &ctx(&memo, &config));
        let OperatorData::Get(get) = &after.attributes else {
            panic!("expected LogicalGet, got {:?}", after.kind);
        };
        assert_eq!(get.predicate, Some(predicate));
    }

    #[test]
    fn embed_filter_into_get_rejects_non_video() {
        let memo = Memo::new();
        let config = StaticConfiguration::new();
        let predicate = Expr::compare(CompareOp::Lt, Expr::tuple_value("t", "id"), Expr::constant(Value::int(10)));
        let get = build::logical_get("t", false, "t", None, vec![]);
        let binding = build::logical_filter(predicate, get);

        let rule = EmbedFilterIntoGet;
        assert!(!rule.check(&binding, &ctx(&memo, &config)));
    }

    #[test]
    fn embed_filter_into_get_keeps_residual_for_two_column_predicate() {
        let memo = Memo::new();
        let config = StaticConfiguration::new();
        let id_pred = Expr::compare(CompareOp::Lt, Expr::tuple_value("v", "id"), Expr::constant(Value::int(10)));
        let other_pred = Expr::compare(CompareOp::Gt, Expr::tuple_value("v", "score"), Expr::constant(Value::int(0)));
        let predicate = Expr::and(id_pred.clone(), other_pred.clone());
        let get = build::logical_get("v", true, "v", None, vec![]);
        let binding = build::logical_filter(predicate, get);

        let rule = EmbedFilterIntoGet;
        assert!(rule.check(&binding, &ctx(&memo, &config)));
        let after = rule.apply(&binding, &ctx(&memo, &config));
        assert_eq!(after.kind, OperatorKind::LogicalFilter);
        let OperatorData::Filter(filter) = &after.attributes else {
            panic!("expected residual LogicalFilter");
        };
        assert_eq!(filter.predicate, other_pred);
        let OperatorData::Get(get) = &after.children[0].attributes else {
            panic!("expected LogicalGet child");
        };
        assert_eq!(get.predicate, Some(id_pred));
    }

    #[test]
    fn pushdown_filter_through_sample_swaps_order() {
        let memo = Memo::new();
        let config = StaticConfiguration::new();
        let predicate = Expr::compare(CompareOp::Lt, Expr::tuple_value("v", "id"), Expr::constant(Value::int(10)));
        let get = build::logical_get("v", true, "v", None, vec![]);
        let sample = build::logical_sample(5, get);
        let binding = build::logical_filter(predicate.clone(), sample);

        let rule = PushdownFilterThroughSample;
        let after = rule.apply(&binding, &ctx(&memo, &config));
        assert_eq!(after.kind, OperatorKind::LogicalSample);
        assert_eq!(after.children[0].kind, OperatorKind::LogicalFilter);
        let OperatorData::Filter(filter) = &after.children[0].attributes else {
            panic!("expected LogicalFilter under the sample");
        };
        assert_eq!(filter.predicate, predicate);
    }

    /// Spec §8, end-to-end scenario 2: `Project([id, data], Get(V))` ->
    /// `Get(V, target_list=[id, data])`.
    #[test]
    fn embed_project_into_get_carries_target_list_onto_the_get() {
        let memo = Memo::new();
        let config = StaticConfiguration::new();
        let target_list = vec![Expr::tuple_value("v", "id"), Expr::tuple_value("v", "data")];
        let get = build::logical_get("v", true, "v", None, vec![]);
        let binding = build::logical_project(target_list.clone(), get);

        let rule = EmbedProjectIntoGet;
        assert!(rule.check(&binding, &ctx(&memo, &config)));
        let after = rule.apply(&binding, &ctx(&memo, &config));
        assert_eq!(after.kind, OperatorKind::LogicalGet);
        let OperatorData::Get(get) = &after.attributes else {
            panic!("expected LogicalGet, got {:?}", after.kind);
        };
        assert_eq!(get.target_list, target_list);
    }

    #[test]
    fn embed_project_into_get_preserves_an_existing_predicate() {
        let memo = Memo::new();
        let config = StaticConfiguration::new();
        let predicate = Expr::compare(CompareOp::Lt, Expr::tuple_value("v", "id"), Expr::constant(Value::int(10)));
        let get = build::logical_get("v", true, "v", Some(predicate.clone()), vec![]);
        let binding = build::logical_project(vec![Expr::tuple_value("v", "id")], get);

        let rule = EmbedProjectIntoGet;
        let after = rule.apply(&binding, &ctx(&memo, &config));
        let OperatorData::Get(get) = &after.attributes else {
            panic!("expected LogicalGet");
        };
        assert_eq!(get.predicate, Some(predicate));
    }

    #[test]
    fn pushdown_project_through_sample_swaps_order() {
        let memo = Memo::new();
        let config = StaticConfiguration::new();
        let target_list = vec![Expr::tuple_value("v", "id"), Expr::tuple_value("v", "data")];
        let get = build::logical_get("v", true, "v", None, vec![]);
        let sample = build::logical_sample(5, get);
        let binding = build::logical_project(target_list.clone(), sample);

        let rule = PushdownProjectThroughSample;
        let after = rule.apply(&binding, &ctx(&memo, &config));
        assert_eq!(after.kind, OperatorKind::LogicalSample);
        let OperatorData::Sample(sample_data) = &after.attributes else {
            panic!("expected LogicalSample");
        };
        assert_eq!(sample_data.sample_freq, 5);
        assert_eq!(after.children[0].kind, OperatorKind::LogicalProject);
        let OperatorData::Project(project) = &after.children[0].attributes else {
            panic!("expected LogicalProject under the sample");
        };
        assert_eq!(project.target_list, target_list);
    }
}
