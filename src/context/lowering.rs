/*!
Lowering: turning the domains and instances discovery accumulated into the
pgraph's nodes and edges.

Three passes, each idempotent and safe to call once discovery has reached a
fixed point:

- [`Context::init_pgraph_domains`] wires each option's at-most-one-value
  constraint and biases resolution towards declared defaults.
- [`Context::init_pgraph_providers`] wires provider selection: at most one
  provider of an interface, at least one if the interface is required, and a
  bias towards the first-registered (default) provider.
- [`Context::init_pgraph_constraints`] wires every recorded `constrain` call
  and pins every inviable optuple false.
*/

use log::trace;

use crate::misc::log::targets;
use crate::pgraph::levels;
use crate::pgraph::node::lit;
use crate::registry::{ModuleId, ModuleRegistry};
use crate::types::err::LoweringError;

use super::{Context, ContextState};

impl<M: ModuleId> Context<M> {
    /// Wires each option's at-most-one-value constraint, biases each
    /// option's declared default value to [`levels::OPTION_DEFAULT`] (every
    /// other discovered value gets [`levels::OTHER`]), and makes the
    /// module's own inclusion equivalent to "some value is selected" for
    /// that option.
    ///
    /// That last edge is what connects a module's inclusion to its options'
    /// values at all: without it, branching a default value true would
    /// establish only the bare option-value literal, never the module
    /// literal it is meant to stand for, and excluding a module would never
    /// cascade to excluding its options' values either.
    pub fn init_pgraph_domains(&mut self, registry: &impl ModuleRegistry<M>) {
        let modules: Vec<M> = self.module_order.iter().copied().collect();
        for module in modules {
            let Some(def) = registry.module(module) else {
                continue;
            };
            let schemas = def.options().to_vec();
            let domain = self.domains.get(&module).expect("module just listed");
            let module_atom = self.pgraph.module_atom(module);
            for (index, schema) in schemas.iter().enumerate() {
                let Some(set) = domain.options.get(index) else {
                    continue;
                };
                if set.is_empty() {
                    continue;
                }
                let atoms: Vec<_> = set
                    .iter()
                    .map(|&value| self.pgraph.option_value_atom(module, index, value))
                    .collect();
                if atoms.len() > 1 {
                    self.pgraph.at_most_one(atoms.clone());
                }
                for (&value, &atom) in set.iter().zip(atoms.iter()) {
                    let level = if value == schema.default {
                        levels::OPTION_DEFAULT
                    } else {
                        levels::OTHER
                    };
                    self.pgraph.bias_level(lit(atom, true), level);
                }

                let negated: Vec<_> = atoms.iter().map(|&a| self.pgraph.not(a)).collect();
                let none_selected = self.pgraph.and(negated);
                let some_selected = self.pgraph.not(none_selected);
                self.pgraph.add_implication(
                    lit(module_atom, true),
                    lit(some_selected, true),
                    crate::pgraph::Why::OptupleImpliesOptionValues,
                );
                self.pgraph.add_implication(
                    lit(some_selected, false),
                    lit(module_atom, false),
                    crate::pgraph::Why::OptupleImpliesOptionValues,
                );
                self.pgraph.add_implication(
                    lit(some_selected, true),
                    lit(module_atom, true),
                    crate::pgraph::Why::OptionValueImpliesModule,
                );
                self.pgraph.add_implication(
                    lit(module_atom, false),
                    lit(some_selected, false),
                    crate::pgraph::Why::OptionValueImpliesModule,
                );
            }
        }
    }

    /// Wires provider selection for every interface any instantiated
    /// optuple's `init` named (via `provides`), plus: at most one provider
    /// active, a bias towards the first-registered provider, and --- if
    /// the interface module was itself instantiated (meaning something
    /// requires it) --- at least one provider active.
    pub fn init_pgraph_providers(&mut self, registry: &impl ModuleRegistry<M>) {
        let optuples: Vec<_> = self.instance_order.clone();
        for optuple in optuples {
            let provides = self.instances[&optuple].provides.clone();
            let optuple_atom = self
                .pgraph
                .node_for_optuple(optuple.module, &optuple.values);
            for interface in provides {
                let interface_atom = self.pgraph.module_atom(interface);
                self.pgraph.add_implication(
                    lit(optuple_atom, true),
                    lit(interface_atom, true),
                    crate::pgraph::Why::ProvidedBy,
                );
            }
        }

        let interfaces: Vec<M> = self.module_order.iter().copied().collect();
        for interface in interfaces {
            let providers = registry.providers_of(interface);
            if providers.is_empty() {
                continue;
            }
            let atoms: Vec<_> = providers
                .iter()
                .map(|&p| self.pgraph.module_atom(p))
                .collect();
            if atoms.len() > 1 {
                self.pgraph.at_most_one(atoms.clone());
            }
            if let Some(&default) = atoms.first() {
                self.pgraph.bias_level(lit(default, true), levels::PROVIDER_DEFAULT);
            }
            for &atom in atoms.iter().skip(1) {
                self.pgraph.bias_level(lit(atom, true), levels::OTHER);
            }

            if self.domains.contains_key(&interface) {
                let negated_providers: Vec<_> =
                    atoms.iter().map(|&a| self.pgraph.not(a)).collect();
                let none_active = self.pgraph.and(negated_providers);
                let interface_atom = self.pgraph.module_atom(interface);
                self.pgraph.add_implication(
                    lit(interface_atom, true),
                    lit(none_active, false),
                    crate::pgraph::Why::ProvidedBy,
                );
                trace!(
                    target: targets::LOWERING,
                    "{interface:?} requires one of {} providers",
                    providers.len()
                );
            }
        }
    }

    /// Biases every discovered module's own inclusion literal (spec §4.1):
    /// a module that is *some* interface's first-registered (default)
    /// provider gets its true literal biased to [`levels::MODULE`]; every
    /// other module gets its false literal biased there instead, so a
    /// module with no constraint forcing it either way is tried excluded
    /// before it is tried included.
    ///
    /// Without this pass a module nobody constrains and nobody provides
    /// through would carry no level on either literal, so it would never
    /// be offered as a branch generator at any level --- stepwise
    /// resolution would reach a fixed point with its node still
    /// undecided, leaving an incomplete solution.
    pub fn init_pgraph_module_levels(&mut self, registry: &impl ModuleRegistry<M>) {
        let modules: Vec<M> = self.module_order.iter().copied().collect();
        for module in modules {
            let Some(def) = registry.module(module) else {
                continue;
            };
            let is_default_provider = def
                .provides()
                .iter()
                .any(|&interface| registry.providers_of(interface).first() == Some(&module));
            let atom = self.pgraph.module_atom(module);
            if is_default_provider {
                self.pgraph.bias_level(lit(atom, true), levels::MODULE);
            } else {
                self.pgraph.bias_level(lit(atom, false), levels::MODULE);
            }
        }
    }

    /// Wires every recorded `constrain` call and pins every inviable
    /// optuple's node false.
    pub fn init_pgraph_constraints(
        &mut self,
        initial: M,
    ) -> Result<(), LoweringError<M>> {
        let contradiction = self.pgraph.contradiction_atom();

        let inviable: Vec<_> = self.inviable.iter().cloned().collect();
        for optuple in inviable {
            let atom = self
                .pgraph
                .node_for_optuple(optuple.module, &optuple.values);
            self.pgraph.add_implication(
                lit(atom, true),
                lit(contradiction, true),
                crate::pgraph::Why::Inviable,
            );
        }

        let optuples: Vec<_> = self.instance_order.clone();
        for optuple in optuples {
            let constraints = self.instances[&optuple].constraints.clone();
            let source_atom = self
                .pgraph
                .node_for_optuple(optuple.module, &optuple.values);
            for constraint in constraints {
                let target_atom = match &constraint.values {
                    Some(values) => self
                        .pgraph
                        .node_for_optuple(constraint.target, values),
                    None => self.pgraph.module_atom(constraint.target),
                };
                self.pgraph.add_implication(
                    lit(source_atom, true),
                    lit(target_atom, constraint.enabled),
                    crate::pgraph::Why::UserConstraint,
                );
            }
        }

        let initial_atom = self.pgraph.module_atom(initial);
        self.pgraph
            .bias_level(lit(initial_atom, true), levels::MODULE);

        self.state = ContextState::Lowered;
        Ok(())
    }

    /// Runs all three lowering passes in the order that keeps every bias
    /// assignment consistent with the others.
    pub fn lower(
        &mut self,
        registry: &impl ModuleRegistry<M>,
        initial: M,
    ) -> Result<(), LoweringError<M>> {
        self.init_pgraph_domains(registry);
        self.init_pgraph_providers(registry);
        self.init_pgraph_module_levels(registry);
        self.init_pgraph_constraints(initial)
    }
}
