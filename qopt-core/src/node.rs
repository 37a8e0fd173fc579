//! The generic operator/expression shape the memo and pattern matcher are
//! built over (spec §3, "Operator" / "GroupExpression").
//!
//! `qopt-core` does not know the concrete set of operator kinds a
//! representation uses (scans, filters, joins, ...); it only needs a kind
//! tag it can compare for pattern matching and an attribute payload it can
//! hash for deduplication. Concrete representations (e.g. `qopt-plan`)
//! supply both via the `NodeKind` and `NodeAttributes` traits below.

use std::fmt;
use std::hash::Hash;

use crate::memo::GroupId;

/// The tag half of an operator: a value from a closed, representation-specific
/// enum (`LogicalGet`, `SeqScan`, ...). Every node kind set must designate one
/// variant as the "dummy" placeholder used by the pattern matcher to bind an
/// opaque child without expanding it (spec §3, `Dummy`).
pub trait NodeKind: Clone + Eq + Hash + fmt::Debug + fmt::Display + Send + Sync + 'static {
    /// The sentinel kind used for opaque, unexpanded pattern children.
    fn dummy() -> Self;

    /// Whether this kind is the dummy sentinel.
    fn is_dummy(&self) -> bool {
        self == &Self::dummy()
    }
}

/// The attribute half of an operator (predicates, target lists, join kinds,
/// aliases, ...). Attributes are opaque to the memo and pattern matcher
/// except for two hooks they need: which table aliases an operator
/// contributes to its group (spec §3, Group invariants), and how to
/// construct/recognize the payload of a dummy (opaque, group-id-carrying)
/// node.
pub trait NodeAttributes: Clone + Eq + Hash + fmt::Debug + Send + Sync + 'static {
    /// Table aliases this operator itself contributes (in addition to
    /// whatever its children already carry). Empty for everything except
    /// `LogicalGet`/`LogicalQueryDerivedGet`-equivalent kinds.
    fn own_aliases(&self) -> Vec<String> {
        Vec::new()
    }

    /// Construct the attribute payload for a dummy node that opaquely
    /// stands in for `group_id`.
    fn dummy(group_id: GroupId) -> Self;

    /// If this is a dummy node's attribute payload, the group id it
    /// stands in for.
    fn as_dummy_group(&self) -> Option<GroupId>;
}

/// A materialized operator tree: a node carrying its own attributes plus
/// fully materialized children. Used for the input logical plan, for rule
/// bindings, for rule outputs, and for the extracted physical plan.
/// Equality/hashing is structural (kind + attributes + children), matching
/// the Operator equality rule in spec §3.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Operator<T: NodeKind, A: NodeAttributes> {
    pub kind: T,
    pub attributes: A,
    pub children: Vec<Operator<T, A>>,
}

impl<T: NodeKind, A: NodeAttributes> Operator<T, A> {
    pub fn new(kind: T, attributes: A, children: Vec<Operator<T, A>>) -> Self {
        Self {
            kind,
            attributes,
            children,
        }
    }

    pub fn leaf(kind: T, attributes: A) -> Self {
        Self::new(kind, attributes, Vec::new())
    }

    /// An opaque node standing in for an existing memo group, used by rule
    /// bindings/outputs for children the rule does not inspect or rewrite.
    pub fn dummy(group_id: GroupId) -> Self {
        Self::leaf(T::dummy(), A::dummy(group_id))
    }

    pub fn is_dummy(&self) -> bool {
        self.kind.is_dummy()
    }
}

impl<T: NodeKind, A: NodeAttributes> fmt::Display for Operator<T, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}(", self.kind)?;
        for (i, child) in self.children.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", child)?;
        }
        write!(f, ")")
    }
}
