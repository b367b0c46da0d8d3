/*!
A [`Context`] is the per-resolve state: the live option domains discovery
has grown, the optuples it has instantiated (and what each one recorded),
and the pgraph those instances are lowered into.

Mirrors the shape of a database-of-typed-objects context elsewhere in this
crate's lineage: state is grouped by concern into its own small structure
(domains, instances, pgraph) rather than one flat bag of fields, and the
resolve itself is split into small, named procedures across
[`discovery`] and [`lowering`].
*/

pub mod discovery;
pub mod lowering;

use std::collections::{HashMap, HashSet, VecDeque};

use crate::config::Config;
use crate::instance::Instance;
use crate::pgraph::Pgraph;
use crate::registry::ModuleId;
use crate::structures::optuple::{ModuleDomain, OrderedSet, Optuple};

/// What stage of a resolve a [`Context`] is in.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum ContextState {
    /// Discovery has not finished draining the instantiation queue.
    Discovering,

    /// Discovery finished; the pgraph has not yet been built.
    Discovered,

    /// The pgraph has been lowered and is ready to solve.
    Lowered,

    /// A solve has produced a consistent assignment.
    Solved,

    /// A solve determined no consistent assignment exists.
    Unsolvable,
}

/// The per-resolve state threaded through discovery, lowering, and solving.
pub struct Context<M: ModuleId> {
    pub config: Config,
    pub state: ContextState,

    pub domains: HashMap<M, ModuleDomain>,
    /// The order modules were first discovered in --- a plain
    /// `domains.keys()` would iterate in `HashMap`'s randomized per-process
    /// order, which would make pgraph atom interning (and hence
    /// `literals_at_level`'s output) run-to-run nondeterministic.
    pub module_order: OrderedSet<M>,
    pub instantiated: HashSet<Optuple<M>>,
    pub queued: HashSet<Optuple<M>>,
    pub queue: VecDeque<Optuple<M>>,
    pub instances: HashMap<Optuple<M>, Instance<M>>,
    /// The order optuples were successfully instantiated in --- see
    /// `module_order`'s doc comment; the same hash-order hazard applies to
    /// enumerating `instances`.
    pub instance_order: Vec<Optuple<M>>,
    /// Insertion-ordered for the same reason as `module_order`: lowering
    /// enumerates this set to pin each inviable optuple's node false, and
    /// that enumeration order feeds straight into pgraph node interning.
    pub inviable: OrderedSet<Optuple<M>>,

    pub pgraph: Pgraph<M>,
}

impl<M: ModuleId> Context<M> {
    pub fn new(config: Config) -> Self {
        Context {
            config,
            state: ContextState::Discovering,
            domains: HashMap::new(),
            module_order: OrderedSet::new(),
            instantiated: HashSet::new(),
            queued: HashSet::new(),
            queue: VecDeque::new(),
            instances: HashMap::new(),
            instance_order: Vec::new(),
            inviable: OrderedSet::new(),
            pgraph: Pgraph::new(),
        }
    }

    /// Number of optuples instantiated (viable or not) so far --- the
    /// quantity [`Config::instantiation_limit`](crate::config::Config) bounds.
    pub fn instantiation_count(&self) -> usize {
        self.instantiated.len()
    }
}
