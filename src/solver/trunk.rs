/*!
The trunk: the set of literals established unconditionally, independent of
any choice a branch might make.

Built once per solve by seeding the initial module and the constant-false
axiom, then closing under direct implications and neglast forcing until a
fixed point (or a contradiction) is reached.
*/

use std::collections::{HashMap, HashSet, VecDeque};

use log::trace;

use crate::misc::log::targets;
use crate::pgraph::node::lit;
use crate::pgraph::{NeglastId, Pgraph, Reason, ReasonId, Why};
use crate::registry::ModuleId;
use crate::structures::atom::Atom;
use crate::structures::literal::{Lit, Literal};
use crate::types::err::SolveError;

/// Literals established unconditionally, and the bookkeeping needed to
/// detect when a [`Neglast`](crate::pgraph::Neglast) fires.
///
/// `facts` deliberately accumulates *both* polarities of a contradictory
/// atom rather than stopping at the first one found (spec §4.3 step 5):
/// this is what lets [`crate::rgraph`] later render the competing
/// implication chains that produced each polarity, instead of reporting
/// only whichever one happened to be discovered first.
pub struct Trunk {
    pub facts: HashMap<Lit, ReasonId>,
    pub neglefts: HashMap<NeglastId, HashSet<Lit>>,

    /// Literals established after their negation was already a fact, in
    /// the order discovered. Non-empty iff the trunk is contradictory.
    pub conflicts: Vec<Lit>,
}

impl Trunk {
    fn add_fact(&mut self, literal: Lit, reason_id: ReasonId, queue: &mut VecDeque<Lit>) {
        if self.facts.contains_key(&literal) {
            return;
        }
        if self.facts.contains_key(&literal.negate()) {
            self.conflicts.push(literal);
        }
        self.facts.insert(literal, reason_id);
        queue.push_back(literal);
    }

    pub fn holds(&self, literal: Lit) -> bool {
        self.facts.contains_key(&literal)
    }

    pub fn decided(&self, atom: Atom) -> bool {
        self.facts.contains_key(&Lit::new(atom, true))
            || self.facts.contains_key(&Lit::new(atom, false))
    }

    /// Processes one established literal's neglast memberships, forcing
    /// and enqueueing the last remaining member of any group it closes out.
    fn close_neglasts<M: ModuleId>(
        &mut self,
        pgraph: &mut Pgraph<M>,
        literal: Lit,
        queue: &mut VecDeque<Lit>,
    ) {
        let groups = pgraph.literal_record(literal).neglasts.clone();
        for group in groups {
            let Some(left) = self.neglefts.get_mut(&group) else {
                continue;
            };
            left.remove(&literal);
            if left.len() == 1 {
                let remaining = *left.iter().next().unwrap();
                let (forced, why) = pgraph.neglast(group).force(remaining);
                let antecedents: Vec<Lit> = pgraph
                    .neglast(group)
                    .members
                    .iter()
                    .copied()
                    .filter(|m| *m != remaining)
                    .collect();
                let reason_id = pgraph.record(Reason::grouped(antecedents, forced, why));
                self.add_fact(forced, reason_id, queue);
            }
        }
    }

    /// Drains `queue`, propagating direct implications and neglast forcing
    /// from each established literal to a fixed point. Never stops early on
    /// a contradiction --- see the struct-level note on `conflicts`.
    fn close<M: ModuleId>(&mut self, pgraph: &mut Pgraph<M>, queue: &mut VecDeque<Lit>) {
        while let Some(established) = queue.pop_front() {
            let implied = pgraph.literal_record(established).implies.clone();
            for (effect, reason_id) in implied {
                self.add_fact(effect, reason_id, queue);
            }
            self.close_neglasts(pgraph, established, queue);
        }
    }

    /// Merges a resolved branch's facts into the trunk, re-closing under
    /// propagation. Used once a resolution level settles on exactly one
    /// live branch. Returns an error (without discarding the trunk) if the
    /// merge turns out to be contradictory --- which the branch's own
    /// strict-diff expansion against this same trunk should already have
    /// ruled out.
    pub fn absorb<M: ModuleId>(
        &mut self,
        pgraph: &mut Pgraph<M>,
        facts: HashMap<Lit, ReasonId>,
    ) -> Result<(), SolveError> {
        let mut queue = VecDeque::new();
        for (literal, reason_id) in facts {
            self.add_fact(literal, reason_id, &mut queue);
        }
        self.close(pgraph, &mut queue);
        match self.conflicts.first() {
            Some(&literal) => Err(SolveError::FundamentalConflict(literal)),
            None => Ok(()),
        }
    }
}

/// Builds the trunk: `initial[true]` and the constant-false axiom, closed
/// under propagation. Infallible --- a contradictory trunk is still
/// returned in full (see `Trunk::conflicts`) so callers can attach a
/// reason-graph explanation; [`solve`](super::resolve::solve) is what
/// turns a non-empty `conflicts` into a [`SolveError`].
pub fn create_trunk<M: ModuleId>(pgraph: &mut Pgraph<M>, initial: Atom) -> Trunk {
    let mut trunk = Trunk {
        facts: HashMap::new(),
        neglefts: HashMap::new(),
        conflicts: Vec::new(),
    };
    for id in pgraph.all_neglast_ids() {
        let members = pgraph.neglast(id).members.clone();
        trunk.neglefts.insert(id, members.into_iter().collect());
    }

    let mut queue = VecDeque::new();

    let contradiction = pgraph.contradiction_atom();
    let contradiction_false = lit(contradiction, false);
    let reason_id = pgraph.record(Reason::axiom(contradiction_false, Why::ConstantFalseAxiom));
    trunk.add_fact(contradiction_false, reason_id, &mut queue);

    let initial_true = lit(initial, true);
    let reason_id = pgraph.record(Reason::axiom(initial_true, Why::InitialModule));
    trunk.add_fact(initial_true, reason_id, &mut queue);

    trunk.close(pgraph, &mut queue);

    trace!(
        target: targets::TRUNK,
        "trunk closed with {} facts, {} conflicts",
        trunk.facts.len(),
        trunk.conflicts.len()
    );
    trunk
}
