//! The optimizer driver: insert, explore, implement, extract (spec §4.4).
//!
//! This module is representation-agnostic: it knows nothing about scans,
//! filters, or joins, only the `NodeKind`/`NodeAttributes` contract and
//! the `Rule` trait. `qopt-plan` supplies the concrete operator/expression
//! model and rule set and calls these functions to drive an optimization.

use tracing::{debug, trace};

use crate::context::{Configuration, OptimizerContext};
use crate::error::OptimizerError;
use crate::memo::{GroupExpression, GroupId, Memo};
use crate::node::{NodeAttributes, NodeKind, Operator};
use crate::pattern::match_group;
use crate::rule::{Rule, RulePhase};

/// Insert an operator tree into the memo leaves-first, returning the
/// group id of its root (spec §4.4 step 1, and reused whenever a rule's
/// output contains brand-new sub-trees that must be deduplicated against
/// the memo rather than attached to a known group).
pub fn insert_plan<T: NodeKind, A: NodeAttributes>(
    memo: &mut Memo<T, A>,
    op: &Operator<T, A>,
) -> GroupId {
    if let Some(group_id) = op.attributes.as_dummy_group() {
        return group_id;
    }
    let children: Vec<GroupId> = op.children.iter().map(|c| insert_plan(memo, c)).collect();
    let expr = GroupExpression::new(op.kind.clone(), op.attributes.clone(), children);
    let inserted = memo
        .add_group_expression(expr, None, true)
        .expect("inserting with check_duplicate=true and group_id=None never errors");
    inserted.group_id
}

/// Insert a rule's output as an additional logical expression of
/// `group_id` (the group the rule's binding was drawn from). New
/// sub-trees inside `op` are deduplicated via `insert_plan`; dummy
/// children resolve directly to the group id they stand in for. Returns
/// whether a new group expression was actually added — `false` means the
/// rewrite produced something already present in the memo, so the driver
/// makes no change (spec §7, §8 idempotence).
fn insert_rewrite_root<T: NodeKind, A: NodeAttributes>(
    memo: &mut Memo<T, A>,
    group_id: GroupId,
    op: &Operator<T, A>,
) -> bool {
    let children: Vec<GroupId> = op.children.iter().map(|c| insert_plan(memo, c)).collect();
    let candidate = GroupExpression::new(op.kind.clone(), op.attributes.clone(), children);
    if memo.find_duplicate(&candidate).is_some() {
        return false;
    }
    memo.add_group_expression(candidate, Some(group_id), false)
        .expect("inserting with an explicit group_id and check_duplicate=false never errors");
    true
}

/// Run every rule in `rules` whose phase is logical (`Rewrite` or
/// `Transformation`) against the memo to a fixpoint (spec §4.4 step 2).
///
/// Rules are tried in descending promise order (ties broken by their
/// position in `rules`) against every logical expression of every group,
/// in ascending group id order, repeating full passes until no pass adds
/// a new group expression.
pub fn explore<T: NodeKind, A: NodeAttributes>(
    memo: &mut Memo<T, A>,
    rules: &[Box<dyn Rule<T, A>>],
    config: &dyn Configuration,
) -> Result<(), OptimizerError> {
    let mut ordered: Vec<&Box<dyn Rule<T, A>>> =
        rules.iter().filter(|r| r.phase().is_logical()).collect();
    ordered.sort_by(|a, b| b.promise().cmp(&a.promise()));

    loop {
        let mut changed = false;
        for group_id in memo.group_ids() {
            for rule in &ordered {
                let bindings = match_group(rule.pattern(), group_id, memo)?;
                for binding in bindings {
                    let ctx = OptimizerContext::new(memo, config);
                    if !rule.check(&binding, &ctx) {
                        continue;
                    }
                    let rewritten = rule.apply(&binding, &ctx);
                    if rewritten == binding {
                        // "If a rule's apply returns its input unchanged,
                        // the driver makes no memo change" (spec §7).
                        continue;
                    }
                    if insert_rewrite_root(memo, group_id, &rewritten) {
                        changed = true;
                        trace!(rule = rule.name(), group = %group_id, "rewrite applied");
                    }
                }
            }
        }
        if !changed {
            break;
        }
    }
    debug!(groups = memo.group_ids().len(), "rewrite/transformation phase reached fixpoint");
    Ok(())
}

/// Replay the same loop restricted to implementation rules; physical
/// expressions are attached to their source group (spec §4.4 step 3).
pub fn implement<T: NodeKind, A: NodeAttributes>(
    memo: &mut Memo<T, A>,
    rules: &[Box<dyn Rule<T, A>>],
    config: &dyn Configuration,
) -> Result<(), OptimizerError> {
    let mut ordered: Vec<&Box<dyn Rule<T, A>>> = rules
        .iter()
        .filter(|r| r.phase() == RulePhase::Implementation)
        .collect();
    ordered.sort_by(|a, b| b.promise().cmp(&a.promise()));

    loop {
        let mut changed = false;
        for group_id in memo.group_ids() {
            for rule in &ordered {
                let bindings = match_group(rule.pattern(), group_id, memo)?;
                for binding in bindings {
                    let ctx = OptimizerContext::new(memo, config);
                    if !rule.check(&binding, &ctx) {
                        continue;
                    }
                    let physical = rule.apply(&binding, &ctx);
                    let children: Vec<GroupId> = physical
                        .children
                        .iter()
                        .map(|c| insert_plan(memo, c))
                        .collect();
                    let candidate = GroupExpression::new(
                        physical.kind.clone(),
                        physical.attributes.clone(),
                        children,
                    );
                    if memo.find_duplicate(&candidate).is_some() {
                        continue;
                    }
                    memo.add_physical_expression(candidate, group_id);
                    changed = true;
                    trace!(rule = rule.name(), group = %group_id, "implementation applied");
                }
            }
        }
        if !changed {
            break;
        }
    }
    debug!("implementation phase reached fixpoint");
    Ok(())
}

/// For `group_id`, select its sole physical expression (cost function is
/// identity — first match wins given the fixed rule set) and recursively
/// extract its children (spec §4.4 step 4).
pub fn extract<T: NodeKind, A: NodeAttributes>(
    memo: &Memo<T, A>,
    group_id: GroupId,
) -> Result<Operator<T, A>, OptimizerError> {
    let group = memo.get_group(group_id);
    let expr = group
        .physical_exprs
        .first()
        .ok_or(OptimizerError::NoPlanFound(group_id))?;
    let mut children = Vec::with_capacity(expr.children.len());
    for child in &expr.children {
        children.push(extract(memo, *child)?);
    }
    Ok(Operator::new(expr.kind.clone(), expr.attributes.clone(), children))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::StaticConfiguration;
    use crate::pattern::Pattern;
    use crate::rule::IMPLEMENTATION_DELIMITER;
    use crate::testkit::{Attrs, Kind};

    /// Rewrites a `Leaf` tagged `"old"` into one tagged `"new"`; stops
    /// matching once applied, so `explore` reaches a fixpoint after one
    /// pass adds the new tag.
    struct RenameOldLeaf;

    impl Rule<Kind, Attrs> for RenameOldLeaf {
        fn name(&self) -> &'static str {
            "RenameOldLeaf"
        }
        fn phase(&self) -> RulePhase {
            RulePhase::Rewrite
        }
        fn promise(&self) -> i32 {
            IMPLEMENTATION_DELIMITER + 1
        }
        fn pattern(&self) -> &Pattern<Kind> {
            static PATTERN: std::sync::OnceLock<Pattern<Kind>> = std::sync::OnceLock::new();
            PATTERN.get_or_init(|| Pattern::leaf(Kind::Leaf))
        }
        fn check(&self, binding: &Operator<Kind, Attrs>, _ctx: &crate::context::OptimizerContext<Kind, Attrs>) -> bool {
            binding.attributes.tag == "old"
        }
        fn apply(&self, _binding: &Operator<Kind, Attrs>, _ctx: &crate::context::OptimizerContext<Kind, Attrs>) -> Operator<Kind, Attrs> {
            Operator::leaf(Kind::Leaf, Attrs::new("new"))
        }
    }

    /// Implements every `Leaf` as a `Physical` node, unconditionally.
    struct LeafToPhysical;

    impl Rule<Kind, Attrs> for LeafToPhysical {
        fn name(&self) -> &'static str {
            "LeafToPhysical"
        }
        fn phase(&self) -> RulePhase {
            RulePhase::Implementation
        }
        fn promise(&self) -> i32 {
            0
        }
        fn pattern(&self) -> &Pattern<Kind> {
            static PATTERN: std::sync::OnceLock<Pattern<Kind>> = std::sync::OnceLock::new();
            PATTERN.get_or_init(|| Pattern::leaf(Kind::Leaf))
        }
        fn check(&self, _binding: &Operator<Kind, Attrs>, _ctx: &crate::context::OptimizerContext<Kind, Attrs>) -> bool {
            true
        }
        fn apply(&self, binding: &Operator<Kind, Attrs>, _ctx: &crate::context::OptimizerContext<Kind, Attrs>) -> Operator<Kind, Attrs> {
            Operator::leaf(Kind::Physical, Attrs::new(binding.attributes.tag))
        }
    }

    fn leaf(tag: &'static str) -> Operator<Kind, Attrs> {
        Operator::leaf(Kind::Leaf, Attrs::new(tag))
    }

    #[test]
    fn inserting_the_same_plan_twice_produces_identical_memo_state() {
        let mut memo: Memo<Kind, Attrs> = Memo::new();
        let plan = Operator::new(Kind::Unary, Attrs::new("u"), vec![leaf("t1")]);
        let first = insert_plan(&mut memo, &plan);
        let groups_after_first = memo.group_ids();
        let second = insert_plan(&mut memo, &plan);
        assert_eq!(first, second);
        assert_eq!(memo.group_ids(), groups_after_first);
        assert_eq!(memo.get_group(first).logical_exprs.len(), 1);
    }

    #[test]
    fn explore_reaches_a_fixpoint_and_a_second_call_adds_nothing() {
        let mut memo: Memo<Kind, Attrs> = Memo::new();
        let root = insert_plan(&mut memo, &leaf("old"));
        let rules: Vec<Box<dyn Rule<Kind, Attrs>>> = vec![Box::new(RenameOldLeaf)];
        let config = StaticConfiguration::new();

        explore(&mut memo, &rules, &config).unwrap();
        assert_eq!(memo.get_group(root).logical_exprs.len(), 2);

        explore(&mut memo, &rules, &config).unwrap();
        assert_eq!(memo.get_group(root).logical_exprs.len(), 2);
    }

    #[test]
    fn implement_attaches_a_physical_expression_to_the_source_group() {
        let mut memo: Memo<Kind, Attrs> = Memo::new();
        let root = insert_plan(&mut memo, &leaf("t1"));
        let rules: Vec<Box<dyn Rule<Kind, Attrs>>> = vec![Box::new(LeafToPhysical)];
        let config = StaticConfiguration::new();

        implement(&mut memo, &rules, &config).unwrap();
        assert_eq!(memo.get_group(root).physical_exprs.len(), 1);
        assert_eq!(memo.get_group(root).physical_exprs[0].kind, Kind::Physical);
    }

    #[test]
    fn extract_fails_with_no_plan_found_when_a_group_has_no_physical_expression() {
        let mut memo: Memo<Kind, Attrs> = Memo::new();
        let root = insert_plan(&mut memo, &leaf("t1"));
        let err = extract(&memo, root).unwrap_err();
        assert!(matches!(err, OptimizerError::NoPlanFound(group) if group == root));
    }

    /// Implements `Unary` by wrapping its child group opaquely, exercising
    /// `extract`'s recursion into an already-implemented child group.
    struct UnaryToPhysical;

    impl Rule<Kind, Attrs> for UnaryToPhysical {
        fn name(&self) -> &'static str {
            "UnaryToPhysical"
        }
        fn phase(&self) -> RulePhase {
            RulePhase::Implementation
        }
        fn promise(&self) -> i32 {
            0
        }
        fn pattern(&self) -> &Pattern<Kind> {
            static PATTERN: std::sync::OnceLock<Pattern<Kind>> = std::sync::OnceLock::new();
            PATTERN.get_or_init(|| Pattern::exact(Kind::Unary, vec![Pattern::Any]))
        }
        fn check(&self, _binding: &Operator<Kind, Attrs>, _ctx: &crate::context::OptimizerContext<Kind, Attrs>) -> bool {
            true
        }
        fn apply(&self, binding: &Operator<Kind, Attrs>, _ctx: &crate::context::OptimizerContext<Kind, Attrs>) -> Operator<Kind, Attrs> {
            Operator::new(Kind::Physical, Attrs::new("unary"), vec![binding.children[0].clone()])
        }
    }

    #[test]
    fn extract_recursively_builds_the_physical_tree() {
        let mut memo: Memo<Kind, Attrs> = Memo::new();
        let root = insert_plan(&mut memo, &Operator::new(Kind::Unary, Attrs::new("u"), vec![leaf("t1")]));
        let rules: Vec<Box<dyn Rule<Kind, Attrs>>> = vec![Box::new(LeafToPhysical), Box::new(UnaryToPhysical)];
        let config = StaticConfiguration::new();
        implement(&mut memo, &rules, &config).unwrap();

        let physical = extract(&memo, root).unwrap();
        assert_eq!(physical.kind, Kind::Physical);
        assert_eq!(physical.children[0].kind, Kind::Physical);
        assert_eq!(physical.children[0].attributes.tag, "t1");
    }
}
