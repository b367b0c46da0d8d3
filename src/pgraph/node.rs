//! Node kinds and their canonicalization keys.

use crate::registry::{ModuleId, OptionValue};
use crate::structures::atom::Atom;
use crate::structures::literal::{Lit, Literal};

/// What a leaf (atomic) node stands for.
#[derive(Clone, PartialEq, Eq, Hash, Debug)]
pub enum AtomKind<M: ModuleId> {
    /// "Module `m` is included in the resolved instance set."
    Module(M),

    /// "Module `m`'s option at `index` takes `value`."
    OptionValue(M, usize, OptionValue),

    /// The single constant-false atom, forced false unconditionally when
    /// the trunk is built. Pinning an inviable optuple's node true literal
    /// to imply this one's true literal is what turns "inviable" into an
    /// ordinary trunk-level contradiction.
    Contradiction,
}

/// The shape of a pgraph node.
///
/// Every node has two literals (`node[true]`, `node[false]`); what each
/// variant's construction wires between those literals and its operands'
/// literals is documented on the corresponding [`Pgraph`](super::Pgraph)
/// constructor, not here --- this type only records enough to hash-cons.
#[derive(Clone, PartialEq, Eq, Hash, Debug)]
pub enum NodeKind<M: ModuleId> {
    Leaf(AtomKind<M>),
    And(Vec<Atom>),
    Not(Atom),
    Implies(Atom, Atom),
    AtMostOne(Vec<Atom>),
    Equivalent(Atom, Atom),
}

impl<M: ModuleId> NodeKind<M> {
    /// Normalizes operand order so logically-identical constructions
    /// (`And(a, b)` vs `And(b, a)`) hash-cons to the same node.
    pub(super) fn canonicalize(mut self) -> Self {
        match &mut self {
            NodeKind::And(operands) | NodeKind::AtMostOne(operands) => {
                operands.sort_unstable();
                operands.dedup();
            }
            NodeKind::Equivalent(a, b) if b < a => std::mem::swap(a, b),
            _ => {}
        }
        self
    }
}

/// Per-polarity bookkeeping attached to one literal of one node.
#[derive(Clone, Default, Debug)]
pub struct LiteralRecord {
    /// A resolution-order hint; lower levels are grouped and resolved
    /// first. `None` for literals that never head a branch on their own
    /// (most compound-node literals).
    pub level: Option<u32>,

    /// Literals this literal directly implies, with the reason each edge
    /// was added for.
    pub implies: Vec<(Lit, super::reason::Why)>,

    /// Neglast groups this literal is a member of --- establishing this
    /// literal counts toward closing out each of them.
    pub neglasts: Vec<super::neglast::NeglastId>,
}

/// A single hash-consed node: its shape, plus the two literals' records.
#[derive(Clone, Debug)]
pub struct NodeRecord<M: ModuleId> {
    pub kind: NodeKind<M>,
    pub false_literal: LiteralRecord,
    pub true_literal: LiteralRecord,
}

impl<M: ModuleId> NodeRecord<M> {
    pub(super) fn new(kind: NodeKind<M>) -> Self {
        NodeRecord {
            kind,
            false_literal: LiteralRecord::default(),
            true_literal: LiteralRecord::default(),
        }
    }

    pub fn literal(&self, polarity: bool) -> &LiteralRecord {
        if polarity {
            &self.true_literal
        } else {
            &self.false_literal
        }
    }

    pub fn literal_mut(&mut self, polarity: bool) -> &mut LiteralRecord {
        if polarity {
            &mut self.true_literal
        } else {
            &mut self.false_literal
        }
    }
}

/// Convenience for building a [`Lit`] against a node id.
pub fn lit(atom: Atom, polarity: bool) -> Lit {
    Lit::new(atom, polarity)
}
