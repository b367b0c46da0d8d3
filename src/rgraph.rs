/*!
The reason graph: explaining *why* a literal holds, or why a solve failed,
by walking the trunk's recorded [`Reason`]s back to an axiom.

Each literal the trunk ever establishes is given exactly one [`ReasonId`] ---
whichever edge first proposed it during `Trunk::close`'s breadth-first
propagation. Walking a literal's `reason.cause` chain backward therefore
retraces the *shortest* chain of implications that produced it: there is
nothing to search, since the search already happened, once, when the trunk
was built.
*/

use std::collections::HashMap;

use log::trace;

use crate::misc::log::targets;
use crate::pgraph::{Pgraph, ReasonId, Why};
use crate::registry::ModuleId;
use crate::structures::literal::{Lit, Literal};
use crate::types::err::RgraphError;

/// One link in an explanation chain: a literal, and the reason it was
/// established.
#[derive(Clone, Debug)]
pub struct Step {
    pub literal: Lit,
    pub why: Why,
    pub antecedents: Vec<Lit>,
}

/// A reason graph built over one trunk's (or merged trunk-plus-branch)
/// facts, ready to explain any of them.
pub struct Rgraph {
    reasons: HashMap<Lit, ReasonId>,
}

impl Rgraph {
    /// Builds an explainer over exactly the literals in `facts` --- usually
    /// a solved or failed [`crate::solver::trunk::Trunk`]'s own `facts` map.
    pub fn build(facts: &HashMap<Lit, ReasonId>) -> Self {
        Rgraph {
            reasons: facts.clone(),
        }
    }

    /// Walks `literal`'s `cause` chain back to an axiom (a reason with no
    /// cause), returning the chain root-first.
    pub fn explain<M: ModuleId>(
        &self,
        pgraph: &Pgraph<M>,
        literal: Lit,
    ) -> Result<Vec<Step>, RgraphError> {
        let mut chain = Vec::new();
        let mut current = literal;
        let mut seen = std::collections::HashSet::new();

        loop {
            let Some(&reason_id) = self.reasons.get(&current) else {
                return Err(RgraphError::NeverEstablished(current));
            };
            if !seen.insert(current) {
                return Err(RgraphError::NoPath);
            }
            let reason = pgraph.reason(reason_id);
            chain.push(Step {
                literal: reason.outcome,
                why: reason.why,
                antecedents: reason.antecedents.clone(),
            });
            match reason.cause {
                Some(cause) => current = cause,
                None => break,
            }
        }

        chain.reverse();
        trace!(target: targets::RGRAPH, "explained {literal} in {} steps", chain.len());
        Ok(chain)
    }

    /// Renders [`Rgraph::explain`]'s chain as human-readable, multi-line
    /// text --- one line per step, root first.
    pub fn render<M: ModuleId>(
        &self,
        pgraph: &Pgraph<M>,
        literal: Lit,
    ) -> Result<String, RgraphError> {
        let chain = self.explain(pgraph, literal)?;
        let mut out = String::new();
        for (index, step) in chain.iter().enumerate() {
            if index > 0 {
                out.push('\n');
            }
            out.push_str(&render_step(step));
        }
        Ok(out)
    }
}

fn render_step(step: &Step) -> String {
    let antecedents: Vec<String> = step.antecedents.iter().map(|lit| lit.to_string()).collect();
    format!(
        "{} ({}): {}",
        step.literal,
        why_text(step.why),
        if antecedents.is_empty() {
            "axiom".to_string()
        } else {
            format!("from {}", antecedents.join(", "))
        }
    )
}

fn why_text(why: Why) -> &'static str {
    match why {
        Why::AndTrueImpliesOperand => "conjunction holds, so each part must",
        Why::AndFalseForcesLastOperand => "every other part already held",
        Why::AtMostOneExcludes => "at most one of these may hold",
        Why::ImpliesForward => "direct implication",
        Why::ImpliesContrapositive => "contrapositive of an implication",
        Why::NotFlip => "negation",
        Why::EquivalentForward => "equivalence, forward",
        Why::EquivalentBackward => "equivalence, backward",
        Why::OptupleImpliesOptionValues => "module included, so some value is selected",
        Why::OptionValueImpliesModule => "a value is selected, so the module is included",
        Why::UserConstraint => "a declared constraint",
        Why::ProvidedBy => "a declared provider",
        Why::InitialModule => "the requested module",
        Why::Inviable => "reported inviable by its own init",
        Why::ConstantFalseAxiom => "the constant-false axiom",
        Why::BranchGenerator => "assumed to explore a branch",
        Why::BranchDiedForcesNegation => "every other assumption led to conflict",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pgraph::node::lit;
    use crate::pgraph::Reason;

    #[test]
    fn explains_a_direct_chain_root_first() {
        let mut graph: Pgraph<u32> = Pgraph::new();
        let a = graph.module_atom(1);
        let b = graph.module_atom(2);
        graph.add_implication(lit(a, true), lit(b, true), Why::UserConstraint);

        let mut facts = HashMap::new();
        let axiom_reason = graph.record(Reason::axiom(lit(a, true), Why::InitialModule));
        facts.insert(lit(a, true), axiom_reason);
        let edge_reason = graph.record(Reason::direct(lit(a, true), lit(b, true), Why::UserConstraint));
        facts.insert(lit(b, true), edge_reason);

        let rgraph = Rgraph::build(&facts);
        let chain = rgraph.explain(&graph, lit(b, true)).unwrap();
        assert_eq!(chain.len(), 2);
        assert_eq!(chain[0].literal, lit(a, true));
        assert_eq!(chain[1].literal, lit(b, true));
    }

    #[test]
    fn never_established_literal_errors() {
        let graph: Pgraph<u32> = Pgraph::new();
        let facts = HashMap::new();
        let rgraph = Rgraph::build(&facts);
        let atom = crate::structures::atom::Atom::from_index(0);
        let err = rgraph.explain(&graph, lit(atom, true)).unwrap_err();
        assert_eq!(err, RgraphError::NeverEstablished(lit(atom, true)));
    }
}
