/*!
Branches: tentative extensions of the trunk, one per candidate literal at
the level currently being resolved.

Each branch is expanded independently against the (fixed, read-only) trunk
via an explicit-stack, non-recursive walk --- recursion depth would
otherwise track pgraph depth, which a large module universe can make
arbitrarily deep. Branches whose generators turn out to mutually imply each
other are merged (the python original calls this "substitution"); what's
left after merging is resolved in [`super::resolve`].
*/

use std::collections::{HashMap, HashSet};

use slotmap::{new_key_type, SlotMap};

use crate::pgraph::{NeglastId, Pgraph, Reason, ReasonId, Why};
use crate::registry::ModuleId;
use crate::structures::literal::{Lit, Literal};

use super::trunk::Trunk;

new_key_type! {
    /// An integer-handle identity for a branch, stable across merges until
    /// the branch itself is removed.
    pub struct BranchKey;
}

/// A strict delta against a [`Trunk`]: literals, and neglast exclusions,
/// established only within this branch.
#[derive(Default)]
pub struct Diff {
    pub facts: HashMap<Lit, ReasonId>,
    pub negexcls: HashMap<NeglastId, HashSet<Lit>>,
    pub dead: bool,

    /// The literal whose attempted addition first found `dead`, kept so a
    /// failed branch can still be explained by [`crate::rgraph`].
    pub conflict: Option<Lit>,
}

impl Diff {
    fn merge_from(&mut self, other: Diff) {
        for (literal, reason) in other.facts {
            self.facts.entry(literal).or_insert(reason);
        }
        for (group, excl) in other.negexcls {
            self.negexcls.entry(group).or_default().extend(excl);
        }
        if other.dead && !self.dead {
            self.conflict = other.conflict;
        }
        self.dead = self.dead || other.dead;
    }
}

/// A [`Diff`] seeded by a generator literal --- "try assuming this holds".
pub struct Branch {
    pub generator: Lit,
    pub diff: Diff,
}

/// Attempts to add `literal` to `diff`, given `trunk` as the fixed base.
/// Returns `false` (and marks the diff dead) if `literal` contradicts
/// something already established in the trunk or in this diff.
fn try_add<M: ModuleId>(
    trunk: &Trunk,
    diff: &mut Diff,
    literal: Lit,
    reason_id: ReasonId,
    stack: &mut Vec<Lit>,
) -> bool {
    if trunk.holds(literal.negate()) || diff.facts.contains_key(&literal.negate()) {
        diff.dead = true;
        diff.conflict = Some(literal);
        return false;
    }
    if trunk.holds(literal) || diff.facts.contains_key(&literal) {
        return true;
    }
    diff.facts.insert(literal, reason_id);
    stack.push(literal);
    true
}

/// Expands a single branch from its generator literal to a fixed point (or
/// until it dies).
pub fn expand_branch<M: ModuleId>(trunk: &Trunk, pgraph: &mut Pgraph<M>, generator: Lit) -> Diff {
    let mut diff = Diff::default();
    let mut stack = Vec::new();

    let seed_reason = pgraph.record(Reason::axiom(generator, Why::BranchGenerator));
    try_add(trunk, &mut diff, generator, seed_reason, &mut stack);

    while let Some(literal) = stack.pop() {
        if diff.dead {
            break;
        }

        let implied = pgraph.literal_record(literal).implies.clone();
        for (effect, reason_id) in implied {
            if !try_add(trunk, &mut diff, effect, reason_id, &mut stack) {
                break;
            }
        }
        if diff.dead {
            break;
        }

        let groups = pgraph.literal_record(literal).neglasts.clone();
        for group in groups {
            let trunk_left = trunk.neglefts.get(&group).cloned().unwrap_or_default();
            let excl = diff.negexcls.entry(group).or_default();
            excl.insert(literal);
            let open: Vec<Lit> = trunk_left.iter().copied().filter(|m| !excl.contains(m)).collect();
            if open.len() == 1 {
                let remaining = open[0];
                let (forced, why) = pgraph.neglast(group).force(remaining);
                let antecedents: Vec<Lit> = pgraph
                    .neglast(group)
                    .members
                    .iter()
                    .copied()
                    .filter(|m| *m != remaining)
                    .collect();
                let reason_id = pgraph.record(Reason::grouped(antecedents, forced, why));
                if !try_add(trunk, &mut diff, forced, reason_id, &mut stack) {
                    break;
                }
            }
        }
    }

    diff
}

/// Builds one branch per generator literal.
pub fn expand_branches<M: ModuleId>(
    trunk: &Trunk,
    pgraph: &mut Pgraph<M>,
    generators: Vec<Lit>,
) -> SlotMap<BranchKey, Branch> {
    let mut arena = SlotMap::with_key();
    for generator in generators {
        let diff = expand_branch(trunk, pgraph, generator);
        arena.insert(Branch { generator, diff });
    }
    arena
}

/// Merges any two live branches whose generators mutually imply each
/// other --- each is, semantically, trying to establish the same outcome.
pub fn merge_mutual_implications(arena: &mut SlotMap<BranchKey, Branch>) {
    loop {
        let keys: Vec<BranchKey> = arena.keys().collect();
        let mut merged = false;
        'search: for i in 0..keys.len() {
            for j in (i + 1)..keys.len() {
                let (k1, k2) = (keys[i], keys[j]);
                let mutual = {
                    let b1 = &arena[k1];
                    let b2 = &arena[k2];
                    !b1.diff.dead
                        && !b2.diff.dead
                        && b1.diff.facts.contains_key(&b2.generator)
                        && b2.diff.facts.contains_key(&b1.generator)
                };
                if mutual {
                    let absorbed = arena.remove(k2).expect("key just listed");
                    arena[k1].diff.merge_from(absorbed.diff);
                    merged = true;
                    break 'search;
                }
            }
        }
        if !merged {
            break;
        }
    }
}
