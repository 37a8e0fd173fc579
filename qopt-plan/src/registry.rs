//! The fixed rule set (spec §9, "compile-time, not registration
//! side-effect"): one `Vec` built once, shared by the rewrite/
//! transformation exploration pass and the implementation pass.
//! `PullUdfFromFilterToCrossApply` is deliberately not included.

use qopt_core::rule::Rule;

use crate::operator::{OperatorData, OperatorKind};
use crate::rules::{implement, rewrite, transform};

pub fn rule_set() -> Vec<Box<dyn Rule<OperatorKind, OperatorData>>> {
    vec![
        Box::new(rewrite::EmbedFilterIntoGet),
        Box::new(rewrite::EmbedProjectIntoGet),
        Box::new(rewrite::EmbedFilterIntoDerivedGet),
        Box::new(rewrite::EmbedProjectIntoDerivedGet),
        Box::new(rewrite::PushdownFilterThroughSample),
        Box::new(rewrite::PushdownProjectThroughSample),
        Box::new(transform::LogicalInnerJoinCommutativity),
        Box::new(implement::LogicalGetToSeqScan),
        Box::new(implement::LogicalSampleToUniformSample),
        Box::new(implement::LogicalDerivedGetToPhysical),
        Box::new(implement::LogicalUnionToPhysical),
        Box::new(implement::LogicalOrderByToPhysical),
        Box::new(implement::LogicalLimitToPhysical),
        Box::new(implement::LogicalFunctionScanToPhysical),
        Box::new(implement::LogicalLateralJoinToPhysical),
        Box::new(implement::LogicalJoinToPhysicalHashJoin),
        Box::new(implement::LogicalCreateMaterializedViewToPhysical),
        Box::new(implement::LogicalFilterToPhysical),
        Box::new(implement::LogicalProjectToPhysical),
        Box::new(implement::LogicalShowToPhysical),
        Box::new(implement::LogicalCreateToPhysical),
        Box::new(implement::LogicalRenameToPhysical),
        Box::new(implement::LogicalDropToPhysical),
        Box::new(implement::LogicalCreateUdfToPhysical),
        Box::new(implement::LogicalDropUdfToPhysical),
        Box::new(implement::LogicalInsertToPhysical),
        Box::new(implement::LogicalLoadToPhysical),
        Box::new(implement::LogicalUploadToPhysical),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_logical_kind_has_an_implementation_rule() {
        let rules = rule_set();
        let implementation_count = rules
            .iter()
            .filter(|r| r.phase() == qopt_core::rule::RulePhase::Implementation)
            .count();
        assert_eq!(implementation_count, 21);
    }
}
