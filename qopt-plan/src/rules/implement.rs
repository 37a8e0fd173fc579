//! Implementation rules: one per logical kind, each producing the
//! corresponding physical operator (spec §4.3 mapping table). Every rule
//! here has promise `check` always `true` except the join rules, which
//! additionally discriminate on `join_type`.

use qopt_core::context::OptimizerContext;
use qopt_core::pattern::Pattern;
use qopt_core::rule::{Rule, RulePhase};

use crate::build;
use crate::expr::extract_equi_join_keys;
use crate::operator::{JoinType, OperatorData, OperatorKind, PlanOperator};

use super::promise;

macro_rules! always_true_check {
    () => {
        fn check(&self, _binding: &PlanOperator, _ctx: &OptimizerContext<OperatorKind, OperatorData>) -> bool {
            true
        }
    };
}

pub struct LogicalGetToSeqScan;

impl Rule<OperatorKind, OperatorData> for LogicalGetToSeqScan {
    fn name(&self) -> &'static str {
        "LogicalGetToSeqScan"
    }

    fn phase(&self) -> RulePhase {
        RulePhase::Implementation
    }

    fn promise(&self) -> i32 {
        promise::LOGICAL_GET_TO_SEQSCAN
    }

    fn pattern(&self) -> &Pattern<OperatorKind> {
        static PATTERN: std::sync::OnceLock<Pattern<OperatorKind>> = std::sync::OnceLock::new();
        PATTERN.get_or_init(|| Pattern::leaf(OperatorKind::LogicalGet))
    }

    always_true_check!();

    fn apply(&self, binding: &PlanOperator, ctx: &OptimizerContext<OperatorKind, OperatorData>) -> PlanOperator {
        let OperatorData::Get(get) = &binding.attributes else {
            unreachable!("pattern guarantees a LogicalGet binding");
        };
        let storage = build::storage_plan(
            get.dataset.clone(),
            get.is_video,
            ctx.batch_mem_size(),
            get.predicate.clone(),
        );
        build::seq_scan(get.target_list.clone(), get.alias.clone(), None, storage)
    }
}

pub struct LogicalSampleToUniformSample;

impl Rule<OperatorKind, OperatorData> for LogicalSampleToUniformSample {
    fn name(&self) -> &'static str {
        "LogicalSampleToUniformSample"
    }

    fn phase(&self) -> RulePhase {
        RulePhase::Implementation
    }

    fn promise(&self) -> i32 {
        promise::LOGICAL_SAMPLE_TO_UNIFORMSAMPLE
    }

    fn pattern(&self) -> &Pattern<OperatorKind> {
        static PATTERN: std::sync::OnceLock<Pattern<OperatorKind>> = std::sync::OnceLock::new();
        PATTERN.get_or_init(|| Pattern::exact(OperatorKind::LogicalSample, vec![Pattern::Any]))
    }

    always_true_check!();

    fn apply(&self, binding: &PlanOperator, _ctx: &OptimizerContext<OperatorKind, OperatorData>) -> PlanOperator {
        let OperatorData::Sample(sample) = &binding.attributes else {
            unreachable!("pattern guarantees a LogicalSample binding");
        };
        build::uniform_sample_plan(sample.sample_freq, binding.children[0].clone())
    }
}

pub struct LogicalDerivedGetToPhysical;

impl Rule<OperatorKind, OperatorData> for LogicalDerivedGetToPhysical {
    fn name(&self) -> &'static str {
        "LogicalDerivedGetToPhysical"
    }

    fn phase(&self) -> RulePhase {
        RulePhase::Implementation
    }

    fn promise(&self) -> i32 {
        promise::LOGICAL_DERIVED_GET_TO_PHYSICAL
    }

    fn pattern(&self) -> &Pattern<OperatorKind> {
        static PATTERN: std::sync::OnceLock<Pattern<OperatorKind>> = std::sync::OnceLock::new();
        PATTERN.get_or_init(|| Pattern::exact(OperatorKind::LogicalQueryDerivedGet, vec![Pattern::Any]))
    }

    always_true_check!();

    fn apply(&self, binding: &PlanOperator, _ctx: &OptimizerContext<OperatorKind, OperatorData>) -> PlanOperator {
        let OperatorData::DerivedGet(get) = &binding.attributes else {
            unreachable!("pattern guarantees a LogicalQueryDerivedGet binding");
        };
        build::seq_scan(
            get.target_list.clone(),
            get.alias.clone(),
            get.predicate.clone(),
            binding.children[0].clone(),
        )
    }
}

pub struct LogicalUnionToPhysical;

impl Rule<OperatorKind, OperatorData> for LogicalUnionToPhysical {
    fn name(&self) -> &'static str {
        "LogicalUnionToPhysical"
    }

    fn phase(&self) -> RulePhase {
        RulePhase::Implementation
    }

    fn promise(&self) -> i32 {
        promise::LOGICAL_UNION_TO_PHYSICAL
    }

    fn pattern(&self) -> &Pattern<OperatorKind> {
        static PATTERN: std::sync::OnceLock<Pattern<OperatorKind>> = std::sync::OnceLock::new();
        PATTERN.get_or_init(|| Pattern::exact(OperatorKind::LogicalUnion, vec![Pattern::Any, Pattern::Any]))
    }

    always_true_check!();

    fn apply(&self, binding: &PlanOperator, _ctx: &OptimizerContext<OperatorKind, OperatorData>) -> PlanOperator {
        let OperatorData::Union(union) = &binding.attributes else {
            unreachable!("pattern guarantees a LogicalUnion binding");
        };
        build::union_plan(union.all, binding.children[0].clone(), binding.children[1].clone())
    }
}

pub struct LogicalOrderByToPhysical;

impl Rule<OperatorKind, OperatorData> for LogicalOrderByToPhysical {
    fn name(&self) -> &'static str {
        "LogicalOrderByToPhysical"
    }

    fn phase(&self) -> RulePhase {
        RulePhase::Implementation
    }

    fn promise(&self) -> i32 {
        promise::LOGICAL_ORDERBY_TO_PHYSICAL
    }

    fn pattern(&self) -> &Pattern<OperatorKind> {
        static PATTERN: std::sync::OnceLock<Pattern<OperatorKind>> = std::sync::OnceLock::new();
        PATTERN.get_or_init(|| Pattern::exact(OperatorKind::LogicalOrderBy, vec![Pattern::Any]))
    }

    always_true_check!();

    fn apply(&self, binding: &PlanOperator, _ctx: &OptimizerContext<OperatorKind, OperatorData>) -> PlanOperator {
        let OperatorData::OrderBy(order_by) = &binding.attributes else {
            unreachable!("pattern guarantees a LogicalOrderBy binding");
        };
        build::order_by_plan(order_by.orderby_list.clone(), binding.children[0].clone())
    }
}

pub struct LogicalLimitToPhysical;

impl Rule<OperatorKind, OperatorData> for LogicalLimitToPhysical {
    fn name(&self) -> &'static str {
        "LogicalLimitToPhysical"
    }

    fn phase(&self) -> RulePhase {
        RulePhase::Implementation
    }

    fn promise(&self) -> i32 {
        promise::LOGICAL_LIMIT_TO_PHYSICAL
    }

    fn pattern(&self) -> &Pattern<OperatorKind> {
        static PATTERN: std::sync::OnceLock<Pattern<OperatorKind>> = std::sync::OnceLock::new();
        PATTERN.get_or_init(|| Pattern::exact(OperatorKind::LogicalLimit, vec![Pattern::Any]))
    }

    always_true_check!();

    fn apply(&self, binding: &PlanOperator, _ctx: &OptimizerContext<OperatorKind, OperatorData>) -> PlanOperator {
        let OperatorData::Limit(limit) = &binding.attributes else {
            unreachable!("pattern guarantees a LogicalLimit binding");
        };
        build::limit_plan(limit.limit_count, binding.children[0].clone())
    }
}

pub struct LogicalFunctionScanToPhysical;

impl Rule<OperatorKind, OperatorData> for LogicalFunctionScanToPhysical {
    fn name(&self) -> &'static str {
        "LogicalFunctionScanToPhysical"
    }

    fn phase(&self) -> RulePhase {
        RulePhase::Implementation
    }

    fn promise(&self) -> i32 {
        promise::LOGICAL_FUNCTION_SCAN_TO_PHYSICAL
    }

    fn pattern(&self) -> &Pattern<OperatorKind> {
        static PATTERN: std::sync::OnceLock<Pattern<OperatorKind>> = std::sync::OnceLock::new();
        PATTERN.get_or_init(|| Pattern::leaf(OperatorKind::LogicalFunctionScan))
    }

    always_true_check!();

    fn apply(&self, binding: &PlanOperator, _ctx: &OptimizerContext<OperatorKind, OperatorData>) -> PlanOperator {
        let OperatorData::FunctionScan(scan) = &binding.attributes else {
            unreachable!("pattern guarantees a LogicalFunctionScan binding");
        };
        build::function_scan_plan(scan.func_expr.clone())
    }
}

pub struct LogicalLateralJoinToPhysical;

impl Rule<OperatorKind, OperatorData> for LogicalLateralJoinToPhysical {
    fn name(&self) -> &'static str {
        "LogicalLateralJoinToPhysical"
    }

    fn phase(&self) -> RulePhase {
        RulePhase::Implementation
    }

    fn promise(&self) -> i32 {
        promise::LOGICAL_LATERAL_JOIN_TO_PHYSICAL
    }

    fn pattern(&self) -> &Pattern<OperatorKind> {
        static PATTERN: std::sync::OnceLock<Pattern<OperatorKind>> = std::sync::OnceLock::new();
        PATTERN.get_or_init(|| {
            Pattern::exact(
                OperatorKind::LogicalJoin(JoinType::Lateral),
                vec![Pattern::Any, Pattern::leaf(OperatorKind::LogicalFunctionScan)],
            )
        })
    }

    fn check(&self, binding: &PlanOperator, _ctx: &OptimizerContext<OperatorKind, OperatorData>) -> bool {
        matches!(&binding.attributes, OperatorData::Join(join) if join.join_type == JoinType::Lateral)
    }

    fn apply(&self, binding: &PlanOperator, _ctx: &OptimizerContext<OperatorKind, OperatorData>) -> PlanOperator {
        let OperatorData::Join(join) = &binding.attributes else {
            unreachable!("check guarantees a LogicalJoin binding");
        };
        build::lateral_join_plan(
            join.predicate.clone(),
            join.project.clone(),
            binding.children[0].clone(),
            binding.children[1].clone(),
        )
    }
}

/// `Join(Dummy, Dummy)` for inner joins, split into a build side (the
/// left child, hashed on its join keys) and a probe side (the right
/// child). The dummy children's group ids are used to look up each
/// side's visible aliases so `extract_equi_join_keys` can orient the
/// predicate's conjuncts.
pub struct LogicalJoinToPhysicalHashJoin;

impl Rule<OperatorKind, OperatorData> for LogicalJoinToPhysicalHashJoin {
    fn name(&self) -> &'static str {
        "LogicalJoinToPhysicalHashJoin"
    }

    fn phase(&self) -> RulePhase {
        RulePhase::Implementation
    }

    fn promise(&self) -> i32 {
        promise::LOGICAL_JOIN_TO_PHYSICAL_HASH_JOIN
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

    fn apply(&self, binding: &PlanOperator, ctx: &OptimizerContext<OperatorKind, OperatorData>) -> PlanOperator {
        let OperatorData::Join(join) = &binding.attributes else {
            unreachable!("check guarantees a LogicalJoin binding");
        };
        let lhs = &binding.children[0];
        let rhs = &binding.children[1];
        let lhs_group = lhs
            .attributes
            .as_dummy_group()
            .expect("a join rule's children are always Any-bound dummies");
        let rhs_group = rhs
            .attributes
            .as_dummy_group()
            .expect("a join rule's children are always Any-bound dummies");
        let lhs_aliases = ctx.memo.get_group(lhs_group).aliases.clone();
        let rhs_aliases = ctx.memo.get_group(rhs_group).aliases.clone();
        let (lhs_keys, rhs_keys, residual) =
            extract_equi_join_keys(join.predicate.as_ref(), &lhs_aliases, &rhs_aliases);

        let build = build::hash_join_build(join.join_type, lhs_keys, lhs.clone());
        build::hash_join_probe(join.join_type, rhs_keys, residual, join.project.clone(), build, rhs.clone())
    }
}

pub struct LogicalCreateMaterializedViewToPhysical;

impl Rule<OperatorKind, OperatorData> for LogicalCreateMaterializedViewToPhysical {
    fn name(&self) -> &'static str {
        "LogicalCreateMaterializedViewToPhysical"
    }

    fn phase(&self) -> RulePhase {
        RulePhase::Implementation
    }

    fn promise(&self) -> i32 {
        promise::LOGICAL_MATERIALIZED_VIEW_TO_PHYSICAL
    }

    fn pattern(&self) -> &Pattern<OperatorKind> {
        static PATTERN: std::sync::OnceLock<Pattern<OperatorKind>> = std::sync::OnceLock::new();
        PATTERN.get_or_init(|| Pattern::exact(OperatorKind::LogicalCreateMaterializedView, vec![Pattern::Any]))
    }

    always_true_check!();

    fn apply(&self, binding: &PlanOperator, _ctx: &OptimizerContext<OperatorKind, OperatorData>) -> PlanOperator {
        let OperatorData::CreateMaterializedView(view) = &binding.attributes else {
            unreachable!("pattern guarantees a LogicalCreateMaterializedView binding");
        };
        build::create_materialized_view_plan(
            view.view.clone(),
            view.col_list.clone(),
            view.if_not_exists,
            binding.children[0].clone(),
        )
    }
}

pub struct LogicalFilterToPhysical;

impl Rule<OperatorKind, OperatorData> for LogicalFilterToPhysical {
    fn name(&self) -> &'static str {
        "LogicalFilterToPhysical"
    }

    fn phase(&self) -> RulePhase {
        RulePhase::Implementation
    }

    fn promise(&self) -> i32 {
        promise::LOGICAL_FILTER_TO_PHYSICAL
    }

    fn pattern(&self) -> &Pattern<OperatorKind> {
        static PATTERN: std::sync::OnceLock<Pattern<OperatorKind>> = std::sync::OnceLock::new();
        PATTERN.get_or_init(|| Pattern::exact(OperatorKind::LogicalFilter, vec![Pattern::Any]))
    }

    always_true_check!();

    fn apply(&self, binding: &PlanOperator, _ctx: &OptimizerContext<OperatorKind, OperatorData>) -> PlanOperator {
        let OperatorData::Filter(filter) = &binding.attributes else {
            unreachable!("pattern guarantees a LogicalFilter binding");
        };
        build::predicate_plan(filter.predicate.clone(), binding.children[0].clone())
    }
}

pub struct LogicalProjectToPhysical;

impl Rule<OperatorKind, OperatorData> for LogicalProjectToPhysical {
    fn name(&self) -> &'static str {
        "LogicalProjectToPhysical"
    }

    fn phase(&self) -> RulePhase {
        RulePhase::Implementation
    }

    fn promise(&self) -> i32 {
        promise::LOGICAL_PROJECT_TO_PHYSICAL
    }

    fn pattern(&self) -> &Pattern<OperatorKind> {
        static PATTERN: std::sync::OnceLock<Pattern<OperatorKind>> = std::sync::OnceLock::new();
        PATTERN.get_or_init(|| Pattern::exact(OperatorKind::LogicalProject, vec![Pattern::Any]))
    }

    always_true_check!();

    fn apply(&self, binding: &PlanOperator, _ctx: &OptimizerContext<OperatorKind, OperatorData>) -> PlanOperator {
        let OperatorData::Project(project) = &binding.attributes else {
            unreachable!("pattern guarantees a LogicalProject binding");
        };
        build::project_plan(project.target_list.clone(), binding.children[0].clone())
    }
}

pub struct LogicalShowToPhysical;

impl Rule<OperatorKind, OperatorData> for LogicalShowToPhysical {
    fn name(&self) -> &'static str {
        "LogicalShowToPhysical"
    }

    fn phase(&self) -> RulePhase {
        RulePhase::Implementation
    }

    fn promise(&self) -> i32 {
        promise::LOGICAL_SHOW_TO_PHYSICAL
    }

    fn pattern(&self) -> &Pattern<OperatorKind> {
        static PATTERN: std::sync::OnceLock<Pattern<OperatorKind>> = std::sync::OnceLock::new();
        PATTERN.get_or_init(|| Pattern::leaf(OperatorKind::LogicalShow))
    }

    always_true_check!();

    fn apply(&self, binding: &PlanOperator, _ctx: &OptimizerContext<OperatorKind, OperatorData>) -> PlanOperator {
        let OperatorData::Show(show) = &binding.attributes else {
            unreachable!("pattern guarantees a LogicalShow binding");
        };
        build::show_info_plan(show.show_type.clone())
    }
}

pub struct LogicalCreateToPhysical;

impl Rule<OperatorKind, OperatorData> for LogicalCreateToPhysical {
    fn name(&self) -> &'static str {
        "LogicalCreateToPhysical"
    }

    fn phase(&self) -> RulePhase {
        RulePhase::Implementation
    }

    fn promise(&self) -> i32 {
        promise::LOGICAL_CREATE_TO_PHYSICAL
    }

    fn pattern(&self) -> &Pattern<OperatorKind> {
        static PATTERN: std::sync::OnceLock<Pattern<OperatorKind>> = std::sync::OnceLock::new();
        PATTERN.get_or_init(|| Pattern::leaf(OperatorKind::LogicalCreate))
    }

    always_true_check!();

    fn apply(&self, binding: &PlanOperator, _ctx: &OptimizerContext<OperatorKind, OperatorData>) -> PlanOperator {
        let OperatorData::Create(create) = &binding.attributes else {
            unreachable!("pattern guarantees a LogicalCreate binding");
        };
        build::create_plan(create.table.clone(), create.column_list.clone(), create.if_not_exists)
    }
}

pub struct LogicalRenameToPhysical;

impl Rule<OperatorKind, OperatorData> for LogicalRenameToPhysical {
    fn name(&self) -> &'static str {
        "LogicalRenameToPhysical"
    }

    fn phase(&self) -> RulePhase {
        RulePhase::Implementation
    }

    fn promise(&self) -> i32 {
        promise::LOGICAL_RENAME_TO_PHYSICAL
    }

    fn pattern(&self) -> &Pattern<OperatorKind> {
        static PATTERN: std::sync::OnceLock<Pattern<OperatorKind>> = std::sync::OnceLock::new();
        PATTERN.get_or_init(|| Pattern::leaf(OperatorKind::LogicalRename))
    }

    always_true_check!();

    fn apply(&self, binding: &PlanOperator, _ctx: &OptimizerContext<OperatorKind, OperatorData>) -> PlanOperator {
        let OperatorData::Rename(rename) = &binding.attributes else {
            unreachable!("pattern guarantees a LogicalRename binding");
        };
        build::rename_plan(rename.old_table.clone(), rename.new_name.clone())
    }
}

pub struct LogicalDropToPhysical;

impl Rule<OperatorKind, OperatorData> for LogicalDropToPhysical {
    fn name(&self) -> &'static str {
        "LogicalDropToPhysical"
    }

    fn phase(&self) -> RulePhase {
        RulePhase::Implementation
    }

    fn promise(&self) -> i32 {
        promise::LOGICAL_DROP_TO_PHYSICAL
    }

    fn pattern(&self) -> &Pattern<OperatorKind> {
        static PATTERN: std::sync::OnceLock<Pattern<OperatorKind>> = std::sync::OnceLock::new();
        PATTERN.get_or_init(|| Pattern::leaf(OperatorKind::LogicalDrop))
    }

    always_true_check!();

    fn apply(&self, binding: &PlanOperator, _ctx: &OptimizerContext<OperatorKind, OperatorData>) -> PlanOperator {
        let OperatorData::Drop(drop) = &binding.attributes else {
            unreachable!("pattern guarantees a LogicalDrop binding");
        };
        build::drop_plan(drop.table_refs.clone(), drop.if_exists)
    }
}

pub struct LogicalCreateUdfToPhysical;

impl Rule<OperatorKind, OperatorData> for LogicalCreateUdfToPhysical {
    fn name(&self) -> &'static str {
        "LogicalCreateUdfToPhysical"
    }

    fn phase(&self) -> RulePhase {
        RulePhase::Implementation
    }

    fn promise(&self) -> i32 {
        promise::LOGICAL_CREATE_UDF_TO_PHYSICAL
    }

    fn pattern(&self) -> &Pattern<OperatorKind> {
        static PATTERN: std::sync::OnceLock<Pattern<OperatorKind>> = std::sync::OnceLock::new();
        PATTERN.get_or_init(|| Pattern::leaf(OperatorKind::LogicalCreateUdf))
    }

    always_true_check!();

    fn apply(&self, binding: &PlanOperator, _ctx: &OptimizerContext<OperatorKind, OperatorData>) -> PlanOperator {
        let OperatorData::CreateUdf(udf) = &binding.attributes else {
            unreachable!("pattern guarantees a LogicalCreateUdf binding");
        };
        build::create_udf_plan(
            udf.name.clone(),
            udf.if_not_exists,
            udf.inputs.clone(),
            udf.outputs.clone(),
            udf.impl_path.clone(),
            udf.udf_type.clone(),
        )
    }
}

pub struct LogicalDropUdfToPhysical;

impl Rule<OperatorKind, OperatorData> for LogicalDropUdfToPhysical {
    fn name(&self) -> &'static str {
        "LogicalDropUdfToPhysical"
    }

    fn phase(&self) -> RulePhase {
        RulePhase::Implementation
    }

    fn promise(&self) -> i32 {
        promise::LOGICAL_DROP_UDF_TO_PHYSICAL
    }

    fn pattern(&self) -> &Pattern<OperatorKind> {
        static PATTERN: std::sync::OnceLock<Pattern<OperatorKind>> = std::sync::OnceLock::new();
        PATTERN.get_or_init(|| Pattern::leaf(OperatorKind::LogicalDropUdf))
    }

    always_true_check!();

    fn apply(&self, binding: &PlanOperator, _ctx: &OptimizerContext<OperatorKind, OperatorData>) -> PlanOperator {
        let OperatorData::DropUdf(udf) = &binding.attributes else {
            unreachable!("pattern guarantees a LogicalDropUdf binding");
        };
        build::drop_udf_plan(udf.name.clone(), udf.if_exists)
    }
}

pub struct LogicalInsertToPhysical;

impl Rule<OperatorKind, OperatorData> for LogicalInsertToPhysical {
    fn name(&self) -> &'static str {
        "LogicalInsertToPhysical"
    }

    fn phase(&self) -> RulePhase {
        RulePhase::Implementation
    }

    fn promise(&self) -> i32 {
        promise::LOGICAL_INSERT_TO_PHYSICAL
    }

    fn pattern(&self) -> &Pattern<OperatorKind> {
        static PATTERN: std::sync::OnceLock<Pattern<OperatorKind>> = std::sync::OnceLock::new();
        PATTERN.get_or_init(|| Pattern::leaf(OperatorKind::LogicalInsert))
    }

    always_true_check!();

    fn apply(&self, binding: &PlanOperator, _ctx: &OptimizerContext<OperatorKind, OperatorData>) -> PlanOperator {
        let OperatorData::Insert(insert) = &binding.attributes else {
            unreachable!("pattern guarantees a LogicalInsert binding");
        };
        build::insert_plan(insert.table.clone(), insert.column_list.clone(), insert.value_list.clone())
    }
}

/// Resolves `executor.batch_mem_size` the same way `LogicalGetToSeqScan`
/// does, defaulting to 30mb.
pub struct LogicalLoadToPhysical;

impl Rule<OperatorKind, OperatorData> for LogicalLoadToPhysical {
    fn name(&self) -> &'static str {
        "LogicalLoadToPhysical"
    }

    fn phase(&self) -> RulePhase {
        RulePhase::Implementation
    }

    fn promise(&self) -> i32 {
        promise::LOGICAL_LOAD_TO_PHYSICAL
    }

    fn pattern(&self) -> &Pattern<OperatorKind> {
        static PATTERN: std::sync::OnceLock<Pattern<OperatorKind>> = std::sync::OnceLock::new();
        PATTERN.get_or_init(|| Pattern::leaf(OperatorKind::LogicalLoadData))
    }

    always_true_check!();

    fn apply(&self, binding: &PlanOperator, ctx: &OptimizerContext<OperatorKind, OperatorData>) -> PlanOperator {
        let OperatorData::LoadData(load) = &binding.attributes else {
            unreachable!("pattern guarantees a LogicalLoadData binding");
        };
        build::load_data_plan(
            load.table.clone(),
            load.path.clone(),
            ctx.batch_mem_size(),
            load.column_list.clone(),
            load.file_options.clone(),
        )
    }
}

pub struct LogicalUploadToPhysical;

impl Rule<OperatorKind, OperatorData> for LogicalUploadToPhysical {
    fn name(&self) -> &'static str {
        "LogicalUploadToPhysical"
    }

    fn phase(&self) -> RulePhase {
        RulePhase::Implementation
    }

    fn promise(&self) -> i32 {
        promise::LOGICAL_UPLOAD_TO_PHYSICAL
    }

    fn pattern(&self) -> &Pattern<OperatorKind> {
        static PATTERN: std::sync::OnceLock<Pattern<OperatorKind>> = std::sync::OnceLock::new();
        PATTERN.get_or_init(|| Pattern::leaf(OperatorKind::LogicalUpload))
    }

    always_true_check!();

    fn apply(&self, binding: &PlanOperator, _ctx: &OptimizerContext<OperatorKind, OperatorData>) -> PlanOperator {
        let OperatorData::Upload(upload) = &binding.attributes else {
            unreachable!("pattern guarantees a LogicalUpload binding");
        };
        build::upload_plan(upload.path.clone(), upload.video_blob.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expr::{CompareOp, Expr};
    use qopt_core::context::StaticConfiguration;
    use qopt_core::memo::Memo;
    use qopt_core::node::Operator;

    fn ctx<'a>(memo: &'a Memo<OperatorKind, OperatorData>, config: &'a StaticConfiguration) -> OptimizerContext<'a, OperatorKind, OperatorData> {
        OptimizerContext::new(memo, config)
    }

    #[test]
    fn get_to_seq_scan_wraps_storage_plan_with_default_batch_mem_size() {
        let memo = Memo::new();
        let config = StaticConfiguration::new();
        let binding = build::logical_get("videos", true, "v", None, vec![]);

        let rule = LogicalGetToSeqScan;
        let after = rule.apply(&binding, &ctx(&memo, &config));
        assert_eq!(after.kind, OperatorKind::SeqScan);
        let OperatorData::Storage(storage) = &after.children[0].attributes else {
            panic!("expected a StoragePlan child");
        };
        assert_eq!(storage.batch_mem_size, 30_000_000);
    }

    #[test]
    fn get_to_seq_scan_honors_configured_batch_mem_size() {
        let memo = Memo::new();
        let config = StaticConfiguration::new().with("executor", "batch_mem_size", 1024);
        let binding = build::logical_get("videos", true, "v", None, vec![]);

        let rule = LogicalGetToSeqScan;
        let after = rule.apply(&binding, &ctx(&memo, &config));
        let OperatorData::Storage(storage) = &after.children[0].attributes else {
            panic!("expected a StoragePlan child");
        };
        assert_eq!(storage.batch_mem_size, 1024);
    }

    #[test]
    fn join_to_hash_join_orients_keys_by_side() {
        let mut memo = Memo::new();
        let config = StaticConfiguration::new();

        let lhs_expr = qopt_core::memo::GroupExpression::new(
            OperatorKind::LogicalGet,
            OperatorData::Get(crate::operator::GetData {
                dataset: "a".into(),
                is_video: false,
                alias: "a".into(),
                predicate: None,
                target_list: vec![],
            }),
            vec![],
        );
        let lhs_expr = memo.add_group_expression(lhs_expr, None, false).unwrap();
        let rhs_expr = qopt_core::memo::GroupExpression::new(
            OperatorKind::LogicalGet,
            OperatorData::Get(crate::operator::GetData {
                dataset: "b".into(),
                is_video: false,
                alias: "b".into(),
                predicate: None,
                target_list: vec![],
            }),
            vec![],
        );
        let rhs_expr = memo.add_group_expression(rhs_expr, None, false).unwrap();

        let equi = Expr::compare(
            CompareOp::Eq,
            Expr::tuple_value("b", "id"),
            Expr::tuple_value("a", "id"),
        );
        let non_equi = Expr::compare(
            CompareOp::Gt,
            Expr::tuple_value("a", "score"),
            Expr::constant(crate::expr::Value::int(0)),
        );
        let predicate = Expr::and(equi, non_equi.clone());
        let binding = Operator::new(
            OperatorKind::LogicalJoin(JoinType::Inner),
            OperatorData::Join(crate::operator::JoinData {
                join_type: JoinType::Inner,
                predicate: Some(predicate),
                project: vec![],
            }),
            vec![Operator::dummy(lhs_expr.group_id), Operator::dummy(rhs_expr.group_id)],
        );

        let rule = LogicalJoinToPhysicalHashJoin;
        assert!(rule.check(&binding, &ctx(&memo, &config)));
        let after = rule.apply(&binding, &ctx(&memo, &config));
        assert_eq!(after.kind, OperatorKind::HashJoinProbe);
        let OperatorData::HashJoinProbe(probe) = &after.attributes else {
            panic!("expected a HashJoinProbePlan");
        };
        assert_eq!(probe.keys, vec![Expr::tuple_value("b", "id")]);
        assert_eq!(probe.predicate, Some(non_equi), "probe predicate must be the non-equi residual, not the full join predicate");
        let OperatorData::HashJoinBuild(build_data) = &after.children[0].attributes else {
            panic!("expected a HashJoinBuildPlan");
        };
        assert_eq!(build_data.keys, vec![Expr::tuple_value("a", "id")]);
    }
}
