/*!
[`Instance`]: the per-optuple recorder a module's `init` reports back to
during discovery.

Unlike the decision-replay design some build-system front ends use ---
forking a node per decision and replaying it as the domain grows --- an
`Instance` is a flat recorder, consumed exactly once by
[`crate::context::discovery`] after `init` returns. Nothing here is kept
once discovery has folded its contents into the pgraph; a module cannot
observe, let alone depend on, the order its own constraints were declared
in.
*/

use crate::registry::{InstanceHandle, ModuleId, OptionValue};
use crate::structures::optuple::Optuple;

/// One `constrain` call recorded during a module's `init`.
#[derive(Clone, Debug)]
pub struct Constraint<M: ModuleId> {
    pub target: M,
    pub values: Option<Vec<OptionValue>>,
    pub enabled: bool,
}

/// The recorded effects of running one module's `init` against one optuple.
#[derive(Clone, Debug)]
pub struct Instance<M: ModuleId> {
    pub optuple: Optuple<M>,
    pub constraints: Vec<Constraint<M>>,
    pub provides: Vec<M>,
    pub domain_extensions: Vec<(usize, OptionValue)>,
}

impl<M: ModuleId> Instance<M> {
    pub fn new(optuple: Optuple<M>) -> Self {
        Instance {
            optuple,
            constraints: Vec::new(),
            provides: Vec::new(),
            domain_extensions: Vec::new(),
        }
    }
}

impl<M: ModuleId> InstanceHandle<M> for Instance<M> {
    fn constrain(&mut self, target: M, values: Option<Vec<OptionValue>>, enabled: bool) {
        self.constraints.push(Constraint {
            target,
            values,
            enabled,
        });
    }

    fn provides(&mut self, target: M) {
        self.provides.push(target);
    }

    fn extend_domain(&mut self, option_index: usize, value: OptionValue) {
        self.domain_extensions.push((option_index, value));
    }
}
