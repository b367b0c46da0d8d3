/*!
The hash-consed propositional graph discovery lowers a module universe into,
and the trunk-and-branch solver in [`crate::solver`] propagates over.

A node is built once per distinct (canonicalized) [`NodeKind`]; building the
same shape again returns the existing [`Atom`]. Every implication a
constructor wires between literals is recorded with a [`Why`] tag in the
shared reason arena, so [`crate::rgraph`] can later explain any literal's
truth value as a chain of these edges.
*/

pub mod neglast;
pub mod node;
pub mod reason;

/// Resolution-order levels, lowest resolved first. Lower bands are biased
/// towards by [`crate::context::lowering`] so a solve tries the "obvious"
/// assignment (the requested module, its options' declared defaults, an
/// interface's first-registered provider) before anything else.
pub mod levels {
    /// The initial module and any module directly forced by it.
    pub const MODULE: u32 = 0;
    /// An option's declared default value.
    pub const OPTION_DEFAULT: u32 = 1;
    /// An interface's first-registered (default) provider.
    pub const PROVIDER_DEFAULT: u32 = 2;
    /// Everything else: non-default option values, non-default providers.
    pub const OTHER: u32 = 3;
}

use std::collections::HashMap;

use crate::registry::{ModuleId, OptionValue};
use crate::structures::atom::Atom;
use crate::structures::literal::{Lit, Literal};

pub use neglast::{Neglast, NeglastId};
pub use node::{lit, AtomKind, LiteralRecord, NodeKind, NodeRecord};
pub use reason::{Reason, ReasonId, Why};

pub struct Pgraph<M: ModuleId> {
    nodes: Vec<NodeRecord<M>>,
    cache: HashMap<NodeKind<M>, Atom>,
    reasons: Vec<Reason>,
    neglasts: Vec<Neglast>,
}

impl<M: ModuleId> Default for Pgraph<M> {
    fn default() -> Self {
        Pgraph {
            nodes: Vec::new(),
            cache: HashMap::new(),
            reasons: Vec::new(),
            neglasts: Vec::new(),
        }
    }
}

impl<M: ModuleId> Pgraph<M> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn node(&self, atom: Atom) -> &NodeRecord<M> {
        &self.nodes[atom.index()]
    }

    fn node_mut(&mut self, atom: Atom) -> &mut NodeRecord<M> {
        &mut self.nodes[atom.index()]
    }

    pub fn reason(&self, id: ReasonId) -> &Reason {
        &self.reasons[id.0 as usize]
    }

    pub fn neglast(&self, id: NeglastId) -> &Neglast {
        &self.neglasts[id.0 as usize]
    }

    pub fn literal_record(&self, literal: Lit) -> &LiteralRecord {
        self.node(literal.atom()).literal(literal.polarity())
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    fn intern(&mut self, kind: NodeKind<M>) -> Atom {
        let kind = kind.canonicalize();
        if let Some(&atom) = self.cache.get(&kind) {
            return atom;
        }
        let atom = Atom::from_index(self.nodes.len());
        self.nodes.push(NodeRecord::new(kind.clone()));
        self.cache.insert(kind, atom);
        atom
    }

    fn push_reason(&mut self, reason: Reason) -> ReasonId {
        let id = ReasonId(self.reasons.len() as u32);
        self.reasons.push(reason);
        id
    }

    /// Records a reason not tied to a direct `cause => effect` edge ---
    /// used by the solver when a [`Neglast`] forces a literal dynamically,
    /// rather than by a constructor wiring a static edge.
    pub fn record(&mut self, reason: Reason) -> ReasonId {
        self.push_reason(reason)
    }

    pub fn all_neglast_ids(&self) -> Vec<NeglastId> {
        (0..self.neglasts.len() as u32).map(NeglastId).collect()
    }

    /// Wires `cause => effect`, recording `why` in the shared reason arena.
    ///
    /// Low-level: most callers go through a node constructor, but
    /// [`crate::context::lowering`] also calls this directly for
    /// user-declared `constrain`/`provides` edges and for asserting the
    /// initial module.
    pub fn add_implication(&mut self, cause: Lit, effect: Lit, why: Why) -> ReasonId {
        let id = self.push_reason(Reason::direct(cause, effect, why));
        self.node_mut(cause.atom())
            .literal_mut(cause.polarity())
            .implies
            .push((effect, id));
        id
    }

    fn wire_implies(&mut self, a: Lit, b: Lit, fwd: Why, contra: Why) {
        self.add_implication(a, b, fwd);
        self.add_implication(!b, !a, contra);
    }

    pub fn leaf(&mut self, kind: AtomKind<M>) -> Atom {
        self.intern(NodeKind::Leaf(kind))
    }

    pub fn module_atom(&mut self, module: M) -> Atom {
        self.leaf(AtomKind::Module(module))
    }

    pub fn option_value_atom(&mut self, module: M, index: usize, value: OptionValue) -> Atom {
        self.leaf(AtomKind::OptionValue(module, index, value))
    }

    /// The single constant-false atom. Its false literal is established as
    /// an axiom when the trunk is built; wiring anything to imply its true
    /// literal is how that thing is pinned impossible.
    pub fn contradiction_atom(&mut self) -> Atom {
        self.leaf(AtomKind::Contradiction)
    }

    /// `Not(operand)`: a fresh node whose literals mirror `operand`'s, in
    /// reverse.
    pub fn not(&mut self, operand: Atom) -> Atom {
        let node = self.intern(NodeKind::Not(operand));
        self.wire_implies(lit(node, true), lit(operand, false), Why::NotFlip, Why::NotFlip);
        self.wire_implies(lit(node, false), lit(operand, true), Why::NotFlip, Why::NotFlip);
        node
    }

    /// `Implies(a, b)`: `a[true] => b[true]`; `b[false] => a[false]`.
    pub fn implies(&mut self, a: Atom, b: Atom) -> Atom {
        let node = self.intern(NodeKind::Implies(a, b));
        self.wire_implies(
            lit(a, true),
            lit(b, true),
            Why::ImpliesForward,
            Why::ImpliesContrapositive,
        );
        node
    }

    /// `Equivalent(a, b)`: symmetric implication in both directions.
    pub fn equivalent(&mut self, a: Atom, b: Atom) -> Atom {
        let node = self.intern(NodeKind::Equivalent(a, b));
        self.wire_implies(
            lit(a, true),
            lit(b, true),
            Why::EquivalentForward,
            Why::EquivalentForward,
        );
        self.wire_implies(
            lit(b, true),
            lit(a, true),
            Why::EquivalentBackward,
            Why::EquivalentBackward,
        );
        node
    }

    /// `AtMostOne(operands)`: any operand true directly excludes every
    /// other operand. Does not force a value to be chosen --- callers that
    /// need "exactly one" add their own default/fallback edge.
    pub fn at_most_one(&mut self, operands: Vec<Atom>) -> Atom {
        let node = self.intern(NodeKind::AtMostOne(operands.clone()));
        for &a in &operands {
            for &b in &operands {
                if a != b {
                    self.add_implication(lit(a, true), lit(b, false), Why::AtMostOneExcludes);
                }
            }
        }
        node
    }

    /// `And(operands)`: the conjunction's true literal directly implies
    /// each operand true. The reverse direction --- all operands true
    /// implies the conjunction true --- is encoded as a single
    /// [`Neglast`] rather than as `n` separate pairwise edges, since it
    /// only ever fires once every other operand has already been decided.
    pub fn and(&mut self, operands: Vec<Atom>) -> Atom {
        let node = self.intern(NodeKind::And(operands.clone()));
        for &operand in &operands {
            self.add_implication(lit(node, true), lit(operand, true), Why::AndTrueImpliesOperand);
        }
        match operands.len() {
            0 => {}
            1 => {
                let only = operands[0];
                self.wire_implies(
                    lit(only, true),
                    lit(node, true),
                    Why::AndFalseForcesLastOperand,
                    Why::AndTrueImpliesOperand,
                );
            }
            _ => {
                let mut members: Vec<Lit> = operands.iter().map(|&o| lit(o, true)).collect();
                members.push(lit(node, false));
                let neglast_id = NeglastId(self.neglasts.len() as u32);
                self.neglasts.push(Neglast {
                    members: members.clone(),
                });
                for member in members {
                    self.node_mut(member.atom())
                        .literal_mut(member.polarity())
                        .neglasts
                        .push(neglast_id);
                }
            }
        }
        node
    }

    /// The node for an optuple: the module atom conjoined with each chosen
    /// option value. Degenerates to the bare module atom for an
    /// option-free module.
    pub fn node_for_optuple(&mut self, module: M, values: &[OptionValue]) -> Atom {
        let module_atom = self.module_atom(module);
        if values.is_empty() {
            return module_atom;
        }
        let mut operands = vec![module_atom];
        for (index, &value) in values.iter().enumerate() {
            operands.push(self.option_value_atom(module, index, value));
        }
        self.and(operands)
    }

    pub fn set_level(&mut self, literal: Lit, level: u32) {
        self.node_mut(literal.atom())
            .literal_mut(literal.polarity())
            .level = Some(level);
    }

    /// Sets `literal`'s level only if it has none yet, or the existing one
    /// is less eager than `level` --- so a higher-priority pass (e.g. the
    /// initial module) is never clobbered by a later, lower-priority one
    /// (e.g. an option's default value).
    pub fn bias_level(&mut self, literal: Lit, level: u32) {
        let current = self.literal_record(literal).level;
        if current.is_none_or(|existing| level < existing) {
            self.set_level(literal, level);
        }
    }

    /// Every true literal biased to exactly `level`, in node-insertion
    /// order --- the candidate generator set for one resolution step.
    pub fn literals_at_level(&self, level: u32) -> Vec<Lit> {
        self.nodes
            .iter()
            .enumerate()
            .filter(|(_, node)| node.true_literal.level == Some(level))
            .map(|(index, _)| lit(Atom::from_index(index), true))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_consing_reuses_equal_leaves() {
        let mut graph: Pgraph<u32> = Pgraph::new();
        let a = graph.module_atom(1);
        let b = graph.module_atom(1);
        assert_eq!(a, b);
        assert_eq!(graph.len(), 1);
    }

    #[test]
    fn and_is_commutative_under_hash_consing() {
        let mut graph: Pgraph<u32> = Pgraph::new();
        let a = graph.module_atom(1);
        let b = graph.module_atom(2);
        let and_ab = graph.and(vec![a, b]);
        let and_ba = graph.and(vec![b, a]);
        assert_eq!(and_ab, and_ba);
    }

    #[test]
    fn and_true_implies_each_operand() {
        let mut graph: Pgraph<u32> = Pgraph::new();
        let a = graph.module_atom(1);
        let b = graph.module_atom(2);
        let conj = graph.and(vec![a, b]);
        let record = graph.literal_record(lit(conj, true));
        let implied: Vec<Atom> = record.implies.iter().map(|(l, _)| l.atom()).collect();
        assert!(implied.contains(&a));
        assert!(implied.contains(&b));
    }

    #[test]
    fn at_most_one_excludes_pairwise() {
        let mut graph: Pgraph<u32> = Pgraph::new();
        let a = graph.module_atom(1);
        let b = graph.module_atom(2);
        let c = graph.module_atom(3);
        graph.at_most_one(vec![a, b, c]);
        let record = graph.literal_record(lit(a, true));
        assert_eq!(record.implies.len(), 2);
    }
}
