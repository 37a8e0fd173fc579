//! The memo: the unit of equivalence the optimizer rewrites against
//! (spec §4.1).
//!
//! This is a deliberately simple memo — no cost model, no winners, no
//! group merging. A group is a bag of logically-equivalent group
//! expressions; a group expression is one operator node whose children are
//! group ids. Deduplication is by a content fingerprint over
//! (kind, attributes, children).

use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::hash::{Hash, Hasher};

use itertools::Itertools;
use tracing::trace;

use crate::error::OptimizerError;
use crate::node::{NodeAttributes, NodeKind};

/// A dense, monotonically-assigned group identifier. `GroupId::UNDEFINED`
/// is the sentinel meaning "no group yet" used by `add_group_expression`.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
pub struct GroupId(pub usize);

impl GroupId {
    pub const UNDEFINED: GroupId = GroupId(usize::MAX);

    pub fn is_defined(self) -> bool {
        self != Self::UNDEFINED
    }
}

impl std::fmt::Display for GroupId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if *self == Self::UNDEFINED {
            write!(f, "g?")
        } else {
            write!(f, "g{}", self.0)
        }
    }
}

/// One operator node after insertion into the memo: the operator's kind
/// and attributes, its children as group ids, and the id of the group it
/// was inserted into.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct GroupExpression<T: NodeKind, A: NodeAttributes> {
    pub kind: T,
    pub attributes: A,
    pub children: Vec<GroupId>,
    pub group_id: GroupId,
}

impl<T: NodeKind, A: NodeAttributes> GroupExpression<T, A> {
    /// A fresh, not-yet-inserted group expression (`group_id` is
    /// `UNDEFINED` until `Memo::add_group_expression` assigns one).
    pub fn new(kind: T, attributes: A, children: Vec<GroupId>) -> Self {
        Self {
            kind,
            attributes,
            children,
            group_id: GroupId::UNDEFINED,
        }
    }

    fn fingerprint(&self) -> u64 {
        let mut hasher = std::collections::hash_map::DefaultHasher::new();
        self.kind.hash(&mut hasher);
        self.attributes.hash(&mut hasher);
        self.children.hash(&mut hasher);
        hasher.finish()
    }
}

/// An equivalence class of group expressions, all producing the same rows.
pub struct Group<T: NodeKind, A: NodeAttributes> {
    pub id: GroupId,
    pub logical_exprs: Vec<GroupExpression<T, A>>,
    pub physical_exprs: Vec<GroupExpression<T, A>>,
    /// Table aliases visible to expressions in this group: the union of
    /// children's aliases plus, for alias-introducing operators, their own
    /// alias (spec §3, Group invariants).
    pub aliases: Vec<String>,
}

impl<T: NodeKind, A: NodeAttributes> Group<T, A> {
    fn new(id: GroupId, aliases: Vec<String>) -> Self {
        Self {
            id,
            logical_exprs: Vec::new(),
            physical_exprs: Vec::new(),
            aliases,
        }
    }

}

/// Maps group id to group, plus a content-hash index from expression
/// fingerprint to group expression, used to deduplicate sub-trees and
/// assign stable group ids (spec §4.1).
pub struct Memo<T: NodeKind, A: NodeAttributes> {
    groups: HashMap<GroupId, Group<T, A>>,
    fingerprint_index: HashMap<u64, GroupExpression<T, A>>,
    next_group_id: usize,
}

impl<T: NodeKind, A: NodeAttributes> Default for Memo<T, A> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: NodeKind, A: NodeAttributes> Memo<T, A> {
    pub fn new() -> Self {
        Self {
            groups: HashMap::new(),
            fingerprint_index: HashMap::new(),
            next_group_id: 0,
        }
    }

    /// Look up an existing group expression with the same fingerprint as
    /// `expr`, ignoring `expr.group_id`.
    pub fn find_duplicate(&self, expr: &GroupExpression<T, A>) -> Option<&GroupExpression<T, A>> {
        self.fingerprint_index.get(&expr.fingerprint())
    }

    fn own_aliases_for(&self, attributes: &A, children: &[GroupId]) -> Vec<String> {
        let mut aliases = Vec::new();
        for child in children {
            aliases.extend(self.groups[child].aliases.iter().cloned());
        }
        aliases.extend(attributes.own_aliases());
        aliases
    }

    /// Add a group expression to the memo (spec §4.1).
    ///
    /// `group_id` and `check_duplicate` are mutually exclusive: passing a
    /// concrete `group_id` while also asking to check for duplicates is a
    /// caller bug and returns `InvalidArgument`.
    pub fn add_group_expression(
        &mut self,
        mut expr: GroupExpression<T, A>,
        group_id: Option<GroupId>,
        check_duplicate: bool,
    ) -> Result<GroupExpression<T, A>, OptimizerError> {
        if group_id.is_some() && check_duplicate {
            return Err(OptimizerError::InvalidArgument(
                "group_id and check_duplicate are mutually exclusive".to_string(),
            ));
        }

        if check_duplicate {
            if let Some(existing) = self.find_duplicate(&expr) {
                trace!(fingerprint_hit = true, kind = %expr.kind, "deduplicated group expression");
                return Ok(existing.clone());
            }
        }

        let target_group = match group_id {
            Some(id) => id,
            None => {
                let id = GroupId(self.next_group_id);
                self.next_group_id += 1;
                let aliases = self.own_aliases_for(&expr.attributes, &expr.children);
                self.groups.insert(id, Group::new(id, aliases));
                trace!(group = %id, "created new group");
                id
            }
        };

        expr.group_id = target_group;
        self.fingerprint_index
            .insert(expr.fingerprint(), expr.clone());
        let group = self
            .groups
            .get_mut(&target_group)
            .expect("target group must already exist");
        if expr.kind.is_dummy() {
            unreachable!("dummy expressions must never be inserted into the memo");
        }
        group.logical_exprs.push(expr.clone());
        Ok(expr)
    }

    /// Attach a physical expression to `group_id` (produced by an
    /// implementation rule). Unlike `add_group_expression`, physical
    /// expressions are always attached to a known source group.
    pub fn add_physical_expression(
        &mut self,
        mut expr: GroupExpression<T, A>,
        group_id: GroupId,
    ) -> GroupExpression<T, A> {
        expr.group_id = group_id;
        self.fingerprint_index
            .insert(expr.fingerprint(), expr.clone());
        let group = self
            .groups
            .get_mut(&group_id)
            .expect("target group must already exist");
        group.physical_exprs.push(expr.clone());
        expr
    }

    pub fn get_group(&self, group_id: GroupId) -> &Group<T, A> {
        self.groups
            .get(&group_id)
            .expect("group id must exist in the memo")
    }

    /// All group ids currently in the memo, in ascending (insertion) order
    /// for deterministic driver iteration.
    pub fn group_ids(&self) -> Vec<GroupId> {
        let mut ids: Vec<GroupId> = self.groups.keys().copied().collect();
        ids.sort();
        ids
    }

    /// Remove every logical and physical expression of `group_id` from the
    /// fingerprint index and clear the group. The group id remains
    /// allocated but empty.
    pub fn erase_group(&mut self, group_id: GroupId) {
        let group = self
            .groups
            .get_mut(&group_id)
            .expect("group id must exist in the memo");
        for expr in group.logical_exprs.drain(..).chain(group.physical_exprs.drain(..)) {
            let fp = expr.fingerprint();
            if let Entry::Occupied(entry) = self.fingerprint_index.entry(fp) {
                if entry.get().group_id == group_id {
                    entry.remove();
                }
            }
        }
        trace!(group = %group_id, "erased group");
    }

    /// For each logical expression in the group, the cartesian product of
    /// recursively enumerated plans of each child group — every
    /// materialized logical tree the group represents. Used for
    /// debugging/`EXPLAIN` (spec §4.1).
    pub fn enumerate_logical_plans(
        &self,
        group_id: GroupId,
    ) -> Vec<crate::node::Operator<T, A>> {
        let group = self.get_group(group_id);
        let mut plans = Vec::new();
        for expr in &group.logical_exprs {
            if expr.children.is_empty() {
                plans.push(crate::node::Operator::new(
                    expr.kind.clone(),
                    expr.attributes.clone(),
                    Vec::new(),
                ));
                continue;
            }
            let child_plan_sets: Vec<Vec<crate::node::Operator<T, A>>> = expr
                .children
                .iter()
                .map(|child| self.enumerate_logical_plans(*child))
                .collect();
            if child_plan_sets.iter().any(|set| set.is_empty()) {
                continue;
            }
            for combo in child_plan_sets.into_iter().multi_cartesian_product() {
                plans.push(crate::node::Operator::new(
                    expr.kind.clone(),
                    expr.attributes.clone(),
                    combo,
                ));
            }
        }
        plans
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testkit::{AliasingAttrs, Attrs, Kind};

    #[test]
    fn add_group_expression_creates_a_fresh_group_without_a_group_id() {
        let mut memo: Memo<Kind, Attrs> = Memo::new();
        let expr = GroupExpression::new(Kind::Leaf, Attrs::new("t1"), vec![]);
        let inserted = memo.add_group_expression(expr, None, false).unwrap();
        assert_eq!(inserted.group_id, GroupId(0));
        assert_eq!(memo.get_group(GroupId(0)).logical_exprs.len(), 1);
    }

    #[test]
    fn check_duplicate_returns_the_existing_expression_instead_of_inserting() {
        let mut memo: Memo<Kind, Attrs> = Memo::new();
        let expr = GroupExpression::new(Kind::Leaf, Attrs::new("t1"), vec![]);
        let first = memo
            .add_group_expression(expr.clone(), None, true)
            .unwrap();
        let second = memo.add_group_expression(expr, None, true).unwrap();
        assert_eq!(first.group_id, second.group_id);
        assert_eq!(memo.get_group(first.group_id).logical_exprs.len(), 1);
    }

    #[test]
    fn group_id_and_check_duplicate_together_is_an_invalid_argument() {
        let mut memo: Memo<Kind, Attrs> = Memo::new();
        let expr = GroupExpression::new(Kind::Leaf, Attrs::new("t1"), vec![]);
        let err = memo
            .add_group_expression(expr, Some(GroupId(0)), true)
            .unwrap_err();
        assert!(matches!(err, OptimizerError::InvalidArgument(_)));
    }

    #[test]
    fn find_duplicate_ignores_the_candidate_group_id() {
        let mut memo: Memo<Kind, Attrs> = Memo::new();
        let inserted = memo
            .add_group_expression(GroupExpression::new(Kind::Leaf, Attrs::new("t1"), vec![]), None, false)
            .unwrap();
        let mut candidate = GroupExpression::new(Kind::Leaf, Attrs::new("t1"), vec![]);
        candidate.group_id = GroupId(41);
        let found = memo.find_duplicate(&candidate).unwrap();
        assert_eq!(found.group_id, inserted.group_id);
    }

    #[test]
    fn erase_group_clears_the_group_and_its_fingerprint_entries() {
        let mut memo: Memo<Kind, Attrs> = Memo::new();
        let inserted = memo
            .add_group_expression(GroupExpression::new(Kind::Leaf, Attrs::new("t1"), vec![]), None, false)
            .unwrap();
        memo.erase_group(inserted.group_id);
        assert!(memo.get_group(inserted.group_id).logical_exprs.is_empty());
        assert!(memo.find_duplicate(&inserted).is_none());
    }

    #[test]
    fn own_aliases_for_combines_child_aliases_with_the_operators_own() {
        let mut memo: Memo<Kind, AliasingAttrs> = Memo::new();
        let leaf = memo
            .add_group_expression(GroupExpression::new(Kind::Leaf, AliasingAttrs::new("t1"), vec![]), None, false)
            .unwrap();
        let unary = memo
            .add_group_expression(
                GroupExpression::new(Kind::Unary, AliasingAttrs::new("derived"), vec![leaf.group_id]),
                None,
                false,
            )
            .unwrap();
        assert_eq!(memo.get_group(unary.group_id).aliases, vec!["t1", "derived"]);
    }

    #[test]
    fn enumerate_logical_plans_is_the_cartesian_product_of_child_plans() {
        let mut memo: Memo<Kind, Attrs> = Memo::new();
        let left = memo
            .add_group_expression(GroupExpression::new(Kind::Leaf, Attrs::new("l"), vec![]), None, false)
            .unwrap();
        let right_group = {
            let r1 = memo
                .add_group_expression(GroupExpression::new(Kind::Leaf, Attrs::new("r1"), vec![]), None, false)
                .unwrap();
            memo.add_group_expression(GroupExpression::new(Kind::Leaf, Attrs::new("r2"), vec![]), Some(r1.group_id), false)
                .unwrap();
            r1.group_id
        };
        let parent = memo
            .add_group_expression(
                GroupExpression::new(Kind::Binary, Attrs::new("join"), vec![left.group_id, right_group]),
                None,
                false,
            )
            .unwrap();

        let plans = memo.enumerate_logical_plans(parent.group_id);
        assert_eq!(plans.len(), 2);
        let tags: Vec<&str> = plans.iter().map(|p| p.children[1].attributes.tag).collect();
        assert!(tags.contains(&"r1"));
        assert!(tags.contains(&"r2"));
    }

    #[test]
    fn group_ids_are_returned_in_ascending_order() {
        let mut memo: Memo<Kind, Attrs> = Memo::new();
        memo.add_group_expression(GroupExpression::new(Kind::Leaf, Attrs::new("a"), vec![]), None, false)
            .unwrap();
        memo.add_group_expression(GroupExpression::new(Kind::Leaf, Attrs::new("b"), vec![]), None, false)
            .unwrap();
        assert_eq!(memo.group_ids(), vec![GroupId(0), GroupId(1)]);
    }
}
