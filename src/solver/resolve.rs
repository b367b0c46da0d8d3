/*!
Resolving a pgraph into either a complete trunk (and hence a consistent
instance set) or a [`SolveError`].

Branches are grouped and resolved in ascending [`levels`] order: the
initial module and anything it directly forces first, then each option's
declared default, then each interface's default provider, then everything
else. This is what makes the solver try the "obvious" assignment before
anything else, without making that assignment a hard requirement --- if the
low-level choice turns out to be inconsistent, its branch simply dies and a
higher-numbered level's branches are tried instead on the next pass.
*/

use std::collections::HashMap;

use log::{debug, trace};

use crate::pgraph::{levels, Pgraph, Reason, Why};
use crate::registry::ModuleId;
use crate::structures::atom::Atom;
use crate::structures::literal::{Lit, Literal};
use crate::types::err::SolveError;

use super::branch::{expand_branches, merge_mutual_implications};
use super::trunk::{create_trunk, Trunk};

const LEVELS: [u32; 4] = [
    levels::MODULE,
    levels::OPTION_DEFAULT,
    levels::PROVIDER_DEFAULT,
    levels::OTHER,
];

/// The generator literals eligible for branching at `level`: true-literals
/// biased to exactly that level whose atom the trunk has not yet decided.
pub fn prepare_branches<M: ModuleId>(
    trunk: &Trunk,
    pgraph: &Pgraph<M>,
    level: u32,
) -> Vec<crate::structures::literal::Lit> {
    pgraph
        .literals_at_level(level)
        .into_iter()
        .filter(|literal| !trunk.decided(literal.atom()))
        .collect()
}

/// Resolves one level's generators against the trunk: expands a branch per
/// generator, merges any that mutually imply each other, forces the
/// negation of every branch that died, and merges every surviving branch's
/// tentative facts into the trunk as one combined extension.
///
/// Generators at the same level are independent candidate defaults, not
/// mutually exclusive alternatives (that exclusivity, where it exists ---
/// an option's values, an interface's providers --- is already wired as an
/// explicit `AtMostOne` in the pgraph). So a live branch is merged in
/// directly rather than held back until it is the sole survivor: if two
/// independent defaults turn out to actually conflict, [`Trunk::absorb`]
/// surfaces that as a [`SolveError::FundamentalConflict`] rather than the
/// solver silently deferring both forever.
///
/// Returns `true` if the trunk was extended.
fn resolve_branches<M: ModuleId>(
    trunk: &mut Trunk,
    pgraph: &mut Pgraph<M>,
    level: u32,
) -> Result<bool, SolveError> {
    let generators = prepare_branches(trunk, pgraph, level);
    if generators.is_empty() {
        return Ok(false);
    }

    let generator_count = generators.len();
    let mut arena = expand_branches(trunk, pgraph, generators);
    merge_mutual_implications(&mut arena);

    let mut combined: std::collections::HashMap<Lit, crate::pgraph::ReasonId> =
        std::collections::HashMap::new();
    let mut live_count = 0;
    let mut dead_count = 0;
    for (_, branch) in arena.drain() {
        if branch.diff.dead {
            dead_count += 1;
            let negated = branch.generator.negate();
            let witness = branch.diff.conflict.unwrap_or(branch.generator);
            let reason_id = pgraph.record(Reason::grouped(
                vec![witness],
                negated,
                Why::BranchDiedForcesNegation,
            ));
            combined.entry(negated).or_insert(reason_id);
        } else {
            live_count += 1;
            for (literal, reason_id) in branch.diff.facts {
                combined.entry(literal).or_insert(reason_id);
            }
        }
    }

    trace!(
        target: crate::misc::log::targets::RESOLVE,
        "level {level}: {generator_count} generators, {live_count} live, {dead_count} dead"
    );

    if combined.is_empty() {
        return Ok(false);
    }
    trunk.absorb(pgraph, combined)?;
    Ok(true)
}

/// Repeatedly resolves each level, in order, until no level extends the
/// trunk --- i.e. a fixed point.
pub fn stepwise_resolve<M: ModuleId>(
    trunk: &mut Trunk,
    pgraph: &mut Pgraph<M>,
) -> Result<(), SolveError> {
    loop {
        let mut progressed = false;
        for &level in &LEVELS {
            if resolve_branches(trunk, pgraph, level)? {
                progressed = true;
            }
        }
        if !progressed {
            break;
        }
    }
    Ok(())
}

/// Runs the full solve: builds the trunk from `initial`, resolves level by
/// level to a fixed point, then checks that every discovered module ended
/// up decided --- a module whose inclusion never settled either way would
/// otherwise be silently reported as excluded.
///
/// On failure the trunk built so far is returned alongside the error
/// rather than discarded --- [`crate::rgraph`] explains a `SolveError` by
/// walking exactly this trunk's `facts`.
pub fn solve<M: ModuleId>(
    pgraph: &mut Pgraph<M>,
    initial: Atom,
    module_atoms: &[Atom],
) -> Result<Trunk, (Trunk, SolveError)> {
    let mut trunk = create_trunk(pgraph, initial);
    if let Some(&literal) = trunk.conflicts.first() {
        return Err((trunk, SolveError::FundamentalConflict(literal)));
    }
    if let Err(error) = stepwise_resolve(&mut trunk, pgraph) {
        return Err((trunk, error));
    }
    for &atom in module_atoms {
        if !trunk.decided(atom) {
            let witness = crate::pgraph::node::lit(atom, true);
            return Err((trunk, SolveError::NoConsistentAssignment(witness)));
        }
    }
    debug!(
        target: crate::misc::log::targets::RESOLVE,
        "solve settled with {} trunk facts",
        trunk.facts.len()
    );
    Ok(trunk)
}

/// Every atom the trunk decided, mapped to its established polarity --- the
/// caller-facing result of a successful solve.
pub fn resolved_modules(trunk: &Trunk) -> HashMap<Atom, bool> {
    let mut out = HashMap::new();
    for literal in trunk.facts.keys() {
        out.entry(literal.atom()).or_insert(literal.polarity());
    }
    out
}
