//! Structural pattern language and bottom-up matcher (spec §4.2).
//!
//! A pattern never carries attributes — matching is kind plus children
//! only. `Pattern::Any` is the wildcard ("Any"/"Dummy" in spec §3): it
//! matches any operator kind and does not recurse, binding the matched
//! child opaquely as a [`crate::node::Operator::dummy`] that carries the
//! child's group id. `Pattern::Exact` matches a specific kind and
//! recurses into its own child patterns against the corresponding child
//! group.

use itertools::Itertools;

use crate::error::OptimizerError;
use crate::memo::{GroupId, Memo};
use crate::node::{NodeAttributes, NodeKind, Operator};

#[derive(Clone, Debug)]
pub enum Pattern<T: NodeKind> {
    /// Match any operator kind without expanding into its children; binds
    /// an opaque `Operator::dummy(group_id)`.
    Any,
    /// Match operators of exactly `kind`, recursing into `children`.
    Exact { kind: T, children: Vec<Pattern<T>> },
}

impl<T: NodeKind> Pattern<T> {
    pub fn exact(kind: T, children: Vec<Pattern<T>>) -> Self {
        Pattern::Exact { kind, children }
    }

    pub fn leaf(kind: T) -> Self {
        Pattern::exact(kind, Vec::new())
    }
}

/// Match `pattern` against every logical expression of `group_id`,
/// returning one binding per successful match. A binding is a freshly
/// materialized operator tree (spec §4.2): attributes intact, children
/// either recursively bound operators (for `Exact` child patterns) or
/// opaque dummies (for `Any` child patterns).
pub fn match_group<T: NodeKind, A: NodeAttributes>(
    pattern: &Pattern<T>,
    group_id: GroupId,
    memo: &Memo<T, A>,
) -> Result<Vec<Operator<T, A>>, OptimizerError> {
    let Pattern::Exact { kind, children } = pattern else {
        // A bare `Any` at the root of a rule's pattern makes no sense (every
        // rule's top pattern names the operator kind it rewrites) and is
        // rejected by rule construction, not here.
        return Ok(vec![Operator::dummy(group_id)]);
    };

    let group = memo.get_group(group_id);
    let mut bindings = Vec::new();
    for expr in &group.logical_exprs {
        if &expr.kind != kind {
            continue;
        }
        if expr.children.len() != children.len() {
            return Err(OptimizerError::PatternArityMismatch {
                expected: children.len(),
                found: expr.children.len(),
            });
        }
        let mut child_binding_sets = Vec::with_capacity(children.len());
        for (child_pattern, child_group) in children.iter().zip(expr.children.iter()) {
            child_binding_sets.push(match_group(child_pattern, *child_group, memo)?);
        }
        if child_binding_sets.iter().any(|set| set.is_empty()) {
            continue;
        }
        if children.is_empty() {
            bindings.push(Operator::new(expr.kind.clone(), expr.attributes.clone(), Vec::new()));
        } else {
            for combo in child_binding_sets.into_iter().multi_cartesian_product() {
                bindings.push(Operator::new(expr.kind.clone(), expr.attributes.clone(), combo));
            }
        }
    }
    Ok(bindings)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memo::GroupExpression;
    use crate::testkit::{Attrs, Kind};

    fn insert(memo: &mut Memo<Kind, Attrs>, kind: Kind, tag: &'static str, children: Vec<GroupId>) -> GroupId {
        memo.add_group_expression(GroupExpression::new(kind, Attrs::new(tag), children), None, false)
            .unwrap()
            .group_id
    }

    #[test]
    fn any_pattern_binds_an_opaque_dummy_without_recursing() {
        let mut memo = Memo::new();
        let leaf = insert(&mut memo, Kind::Leaf, "t1", vec![]);
        let bindings = match_group(&Pattern::Any, leaf, &memo).unwrap();
        assert_eq!(bindings.len(), 1);
        assert!(bindings[0].is_dummy());
        assert_eq!(bindings[0].attributes.as_dummy_group(), Some(leaf));
    }

    #[test]
    fn exact_pattern_recurses_into_matching_children() {
        let mut memo = Memo::new();
        let leaf = insert(&mut memo, Kind::Leaf, "t1", vec![]);
        let unary = insert(&mut memo, Kind::Unary, "u", vec![leaf]);

        let pattern = Pattern::exact(Kind::Unary, vec![Pattern::leaf(Kind::Leaf)]);
        let bindings = match_group(&pattern, unary, &memo).unwrap();
        assert_eq!(bindings.len(), 1);
        assert_eq!(bindings[0].kind, Kind::Unary);
        assert_eq!(bindings[0].children[0].kind, Kind::Leaf);
        assert_eq!(bindings[0].children[0].attributes.tag, "t1");
    }

    #[test]
    fn non_matching_kind_produces_no_bindings() {
        let mut memo = Memo::new();
        let leaf = insert(&mut memo, Kind::Leaf, "t1", vec![]);
        let pattern = Pattern::leaf(Kind::Unary);
        assert!(match_group(&pattern, leaf, &memo).unwrap().is_empty());
    }

    #[test]
    fn arity_mismatch_is_an_error_not_an_empty_result() {
        let mut memo = Memo::new();
        let leaf = insert(&mut memo, Kind::Leaf, "t1", vec![]);
        let unary = insert(&mut memo, Kind::Unary, "u", vec![leaf]);
        let pattern = Pattern::leaf(Kind::Unary);
        let err = match_group(&pattern, unary, &memo).unwrap_err();
        assert!(matches!(err, OptimizerError::PatternArityMismatch { expected: 0, found: 1 }));
    }

    #[test]
    fn multiple_logical_expressions_produce_multiple_bindings() {
        let mut memo = Memo::new();
        let a = insert(&mut memo, Kind::Leaf, "a", vec![]);
        let b = {
            let first = insert(&mut memo, Kind::Leaf, "b1", vec![]);
            memo.add_group_expression(
                GroupExpression::new(Kind::Leaf, Attrs::new("b2"), vec![]),
                Some(first),
                false,
            )
            .unwrap();
            first
        };
        let parent = insert(&mut memo, Kind::Binary, "join", vec![a, b]);

        let pattern = Pattern::exact(Kind::Binary, vec![Pattern::Any, Pattern::Any]);
        let bindings = match_group(&pattern, parent, &memo).unwrap();
        assert_eq!(bindings.len(), 1);

        let pattern_exact = Pattern::exact(
            Kind::Binary,
            vec![Pattern::leaf(Kind::Leaf), Pattern::leaf(Kind::Leaf)],
        );
        let bindings = match_group(&pattern_exact, parent, &memo).unwrap();
        assert_eq!(bindings.len(), 2);
        let right_tags: Vec<&str> = bindings.iter().map(|b| b.children[1].attributes.tag).collect();
        assert!(right_tags.contains(&"b1"));
        assert!(right_tags.contains(&"b2"));
    }
}
