/*!
Discovery: draining a FIFO queue of candidate optuples, running each
module's `init` against the one at the front, and growing option domains
(and the queue) as `init` extends them or constrains modules not yet
considered.

Termination relies on two guarantees a well-formed registry gives:
finite initial option domains (so the cartesian product `post_product`
enumerates is finite), and idempotent re-expansion (`post_discover` only
ever enqueues combinations not already queued or instantiated). The
[`instantiation_limit`](crate::config::ConfigOption) config knob is a
backstop against a registry that breaks either guarantee, not a mechanism
this module relies on for ordinary termination.
*/

use log::{debug, trace, warn};

use crate::instance::Instance;
use crate::misc::log::targets;
use crate::registry::{ModuleId, ModuleRegistry};
use crate::structures::optuple::{ModuleDomain, Optuple};
use crate::types::err::DiscoveryError;

use super::{Context, ContextState};

impl<M: ModuleId> Context<M> {
    /// Ensures `module`'s domain exists (seeding it from the registry's
    /// schema on first sight) and enqueues its current product.
    ///
    /// The first time a module is seen, every module registered as one of
    /// its providers is posted too: an interface is only ever required by
    /// naming the interface module itself, so without this a provider with
    /// nothing else depending on it directly would never be instantiated ---
    /// lowering would still build it a bare module atom (from the registry's
    /// `providers_of` listing), but there would be no recorded `Instance` to
    /// return for it if the solver picked it.
    pub fn post(
        &mut self,
        registry: &impl ModuleRegistry<M>,
        module: M,
    ) -> Result<(), DiscoveryError<M>> {
        if !self.domains.contains_key(&module) {
            let def = registry
                .module(module)
                .ok_or(DiscoveryError::UnknownModule(module))?;
            let initial = def
                .options()
                .iter()
                .map(|schema| schema.initial_domain.clone());
            self.domains.insert(module, ModuleDomain::from_initial(initial));
            self.module_order.insert(module);
            trace!(target: targets::DISCOVERY, "posted new module {module:?}");

            for provider in registry.providers_of(module) {
                if provider != module {
                    self.post(registry, provider)?;
                }
            }
        }
        self.post_product(module);
        Ok(())
    }

    /// As [`Context::post`], but first extends `target`'s domain with
    /// `values` if given --- a `constrain` call naming explicit option
    /// values is how a new value can enter a domain the initial schema
    /// never declared.
    fn post_constraint_target(
        &mut self,
        registry: &impl ModuleRegistry<M>,
        target: M,
        values: &Option<Vec<crate::registry::OptionValue>>,
    ) -> Result<(), DiscoveryError<M>> {
        self.post(registry, target)?;
        if let Some(values) = values {
            if let Some(domain) = self.domains.get_mut(&target) {
                for (index, &value) in values.iter().enumerate() {
                    if let Some(set) = domain.options.get_mut(index) {
                        set.insert(value);
                    }
                }
            }
            self.post_discover(target);
        }
        Ok(())
    }

    /// Enqueues every combination of `module`'s current live option domain
    /// that is neither already instantiated nor already queued. Idempotent:
    /// calling it again before the domain changes enqueues nothing new.
    pub fn post_product(&mut self, module: M) {
        let Some(domain) = self.domains.get(&module) else {
            return;
        };
        let mut combinations: Vec<Vec<crate::registry::OptionValue>> = vec![Vec::new()];
        for option in &domain.options {
            let mut next = Vec::with_capacity(combinations.len() * option.len().max(1));
            for prefix in &combinations {
                for value in option.iter() {
                    let mut extended = prefix.clone();
                    extended.push(*value);
                    next.push(extended);
                }
            }
            combinations = next;
        }
        for values in combinations {
            let optuple = Optuple::new(module, values);
            if self.instantiated.contains(&optuple) || self.queued.contains(&optuple) {
                continue;
            }
            self.queued.insert(optuple.clone());
            self.queue.push_back(optuple);
        }
    }

    /// Re-expands `module`'s product after one of its options' domains grew.
    /// Named separately from [`Context::post_product`] because it is
    /// triggered by domain growth during instantiation rather than by a
    /// fresh dependency on the module, even though the operation is the
    /// same idempotent re-expansion.
    pub fn post_discover(&mut self, module: M) {
        self.post_product(module);
    }

    /// Runs one optuple's module `init`, folding the recorded constraints,
    /// provides, and domain extensions back into the context.
    pub fn instantiate(
        &mut self,
        registry: &impl ModuleRegistry<M>,
        optuple: Optuple<M>,
    ) -> Result<(), DiscoveryError<M>> {
        let def = registry
            .module(optuple.module)
            .ok_or(DiscoveryError::UnknownModule(optuple.module))?;

        let mut instance = Instance::new(optuple.clone());
        let outcome = def.init(&mut instance, &optuple.values);

        self.queued.remove(&optuple);
        self.instantiated.insert(optuple.clone());

        match outcome {
            Err(reason) => {
                debug!(target: targets::DISCOVERY, "{optuple} inviable: {reason}");
                self.inviable.insert(optuple);
                return Ok(());
            }
            Ok(()) => {}
        }

        for (index, value) in &instance.domain_extensions {
            if let Some(domain) = self.domains.get_mut(&optuple.module) {
                if let Some(set) = domain.options.get_mut(*index) {
                    if set.insert(*value) {
                        trace!(
                            target: targets::DISCOVERY,
                            "{:?} option {index} domain extended with {value}",
                            optuple.module
                        );
                    }
                }
            }
        }
        if !instance.domain_extensions.is_empty() {
            self.post_discover(optuple.module);
        }

        for constraint in &instance.constraints {
            self.post_constraint_target(registry, constraint.target, &constraint.values)?;
        }
        for provider in &instance.provides {
            if registry.module(*provider).is_none() {
                warn!(
                    target: targets::DISCOVERY,
                    "{:?} reported providing unknown module {:?}", optuple.module, provider
                );
            }
        }

        if self.config.invariant_assertions.value {
            debug_assert!(
                !self.instances.contains_key(&optuple),
                "{optuple} instantiated twice in one resolution"
            );
        }
        self.instance_order.push(optuple.clone());
        self.instances.insert(optuple, instance);
        Ok(())
    }

    /// Drains the instantiation queue to a fixed point, seeding it from
    /// `initial` first.
    pub fn discover_all(
        &mut self,
        registry: &impl ModuleRegistry<M>,
        initial: M,
    ) -> Result<(), DiscoveryError<M>> {
        self.post(registry, initial)?;

        while let Some(optuple) = self.queue.pop_front() {
            if self.instantiated.contains(&optuple) {
                continue;
            }
            if self.instantiation_count() >= self.config.instantiation_limit.value {
                return Err(DiscoveryError::BudgetExhausted);
            }
            self.instantiate(registry, optuple)?;
        }

        self.state = ContextState::Discovered;
        debug!(
            target: targets::DISCOVERY,
            "discovery complete: {} optuples instantiated, {} inviable",
            self.instantiated.len(),
            self.inviable.len()
        );
        Ok(())
    }
}
