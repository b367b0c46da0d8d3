//! Reasons --- a tag explaining *why* one literal implies another, recorded
//! on every edge added to the pgraph so a failed solve can be explained
//! rather than just reported.

use crate::structures::literal::Lit;

/// An integer-handle identity for a recorded [`Reason`], stable for the
/// lifetime of the [`Pgraph`](super::Pgraph) that recorded it.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, PartialOrd, Ord)]
pub struct ReasonId(pub(super) u32);

/// Why a particular literal-to-literal edge exists.
///
/// Each variant names the constructor (or, for the non-`And`/`AtMostOne`
/// tags, the discovery/lowering step) that added the edge; [`crate::rgraph`]
/// renders these into human-readable explanations.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum Why {
    /// `And[true] => operand[true]`.
    AndTrueImpliesOperand,

    /// All-but-one operands proven true and the conjunction proven false
    /// forces the remaining operand false, via a [`Neglast`](super::neglast::Neglast).
    AndFalseForcesLastOperand,

    /// `AtMostOne`: one operand true excludes every other operand.
    AtMostOneExcludes,

    /// `Implies(a, b)` node construction, forward direction.
    ImpliesForward,

    /// `Implies(a, b)` node construction, contrapositive direction.
    ImpliesContrapositive,

    /// `Not(a)` construction: the node's true literal mirrors `a`'s false
    /// literal (and vice versa).
    NotFlip,

    /// `Equivalent(a, b)`, the `a => b` half.
    EquivalentForward,

    /// `Equivalent(a, b)`, the `b => a` half.
    EquivalentBackward,

    /// A module's optuple being enabled forces its chosen option values.
    OptupleImpliesOptionValues,

    /// A module's option values being enabled implies the module itself.
    OptionValueImpliesModule,

    /// A `constrain` call recorded during a module's `init`.
    UserConstraint,

    /// A `provides` call recorded during a module's `init`: the provider
    /// implies the interface module.
    ProvidedBy,

    /// The initial module, asserted true unconditionally to seed discovery
    /// and the trunk.
    InitialModule,

    /// A module's `init` reported the optuple inviable; its node is pinned
    /// false.
    Inviable,

    /// The constant-false atom, established false unconditionally when the
    /// trunk is built.
    ConstantFalseAxiom,

    /// A branch's own generator literal: "assume this holds, and see what
    /// follows."
    BranchGenerator,

    /// A branch died trying to establish its generator, so the generator's
    /// negation is forced into the trunk instead.
    BranchDiedForcesNegation,
}

/// One recorded implication: `cause => outcome`, for the stated reason.
///
/// `antecedents` carries the full supporting set for reasons (like
/// [`Why::AndFalseForcesLastOperand`]) that were only derivable once several
/// other literals were established, so an explanation can cite all of them
/// rather than a single (possibly misleading) cause.
#[derive(Clone, Debug)]
pub struct Reason {
    pub cause: Option<Lit>,
    pub outcome: Lit,
    pub antecedents: Vec<Lit>,
    pub why: Why,
}

impl Reason {
    pub fn direct(cause: Lit, outcome: Lit, why: Why) -> Self {
        Reason {
            cause: Some(cause),
            outcome,
            antecedents: vec![cause],
            why,
        }
    }

    pub fn grouped(antecedents: Vec<Lit>, outcome: Lit, why: Why) -> Self {
        Reason {
            cause: antecedents.first().copied(),
            outcome,
            antecedents,
            why,
        }
    }

    pub fn axiom(outcome: Lit, why: Why) -> Self {
        Reason {
            cause: None,
            outcome,
            antecedents: Vec::new(),
            why,
        }
    }
}
