//! A minimal concrete `NodeKind`/`NodeAttributes` pair for this crate's own
//! tests. `qopt-core` has no operator model of its own (that's `qopt-plan`'s
//! job), so memo/pattern/driver tests need a toy representation to exercise
//! against rather than reaching across the crate boundary.

#![cfg(test)]

use crate::memo::GroupId;
use crate::node::{NodeAttributes, NodeKind};

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum Kind {
    Leaf,
    Unary,
    Binary,
    /// Stands in for a physical kind an implementation rule produces.
    Physical,
    Dummy,
}

impl std::fmt::Display for Kind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Kind::Leaf => "Leaf",
            Kind::Unary => "Unary",
            Kind::Binary => "Binary",
            Kind::Physical => "Physical",
            Kind::Dummy => "Dummy",
        };
        write!(f, "{s}")
    }
}

impl NodeKind for Kind {
    fn dummy() -> Self {
        Kind::Dummy
    }
}

/// A tag plus an opaque payload: `tag` distinguishes otherwise-identical
/// leaves (e.g. two different table names), `dummy_group` is only set for
/// dummy nodes.
#[derive(Clone, PartialEq, Eq, Hash, Debug)]
pub struct Attrs {
    pub tag: &'static str,
    dummy_group: Option<GroupId>,
}

impl Attrs {
    pub fn new(tag: &'static str) -> Self {
        Self { tag, dummy_group: None }
    }
}

impl NodeAttributes for Attrs {
    fn dummy(group_id: GroupId) -> Self {
        Self { tag: "dummy", dummy_group: Some(group_id) }
    }

    fn as_dummy_group(&self) -> Option<GroupId> {
        self.dummy_group
    }
}

/// `Attrs` whose `own_aliases` contributes `tag` itself, standing in for
/// alias-introducing kinds like `LogicalGet`.
#[derive(Clone, PartialEq, Eq, Hash, Debug)]
pub struct AliasingAttrs {
    pub tag: &'static str,
    dummy_group: Option<GroupId>,
}

impl AliasingAttrs {
    pub fn new(tag: &'static str) -> Self {
        Self { tag, dummy_group: None }
    }
}

impl NodeAttributes for AliasingAttrs {
    fn own_aliases(&self) -> Vec<String> {
        vec![self.tag.to_string()]
    }

    fn dummy(group_id: GroupId) -> Self {
        Self { tag: "dummy", dummy_group: Some(group_id) }
    }

    fn as_dummy_group(&self) -> Option<GroupId> {
        self.dummy_group
    }
}
