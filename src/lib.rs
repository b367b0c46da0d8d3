/*!
`modsolve` resolves a library of declarative build *modules* --- each with
typed options, dependency constraints on other modules, and optional
`provides` relationships --- against an initial module, into a consistent
set of instances.

# Orientation

A caller implements [`registry::ModuleDef`] and [`registry::ModuleRegistry`]
to describe their universe; [`resolve`] does the rest:

1. [`context::discovery`] runs each module's `init` against growing option
   domains until nothing new is discovered.
2. [`context::lowering`] turns the discovered universe into a
   [`pgraph::Pgraph`].
3. [`solver`] resolves the pgraph into a consistent assignment, or a
   [`types::err::SolveError`] with a [`rgraph::Rgraph`] explanation attached.

# Examples

```
use std::collections::HashMap;

use modsolve::registry::{InstanceHandle, ModuleDef, ModuleRegistry, OptionSchema, OptionValue};
use modsolve::resolve;

#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug)]
enum Module {
    App,
    Logging,
}

struct AppModule;

impl ModuleDef<Module> for AppModule {
    fn id(&self) -> Module {
        Module::App
    }
    fn name(&self) -> &str {
        "app"
    }
    fn options(&self) -> &[OptionSchema] {
        &[]
    }
    fn provides(&self) -> &[Module] {
        &[]
    }
    fn init(&self, handle: &mut dyn InstanceHandle<Module>, _values: &[OptionValue]) -> Result<(), String> {
        handle.constrain(Module::Logging, None, true);
        Ok(())
    }
}

struct LoggingModule;

impl ModuleDef<Module> for LoggingModule {
    fn id(&self) -> Module {
        Module::Logging
    }
    fn name(&self) -> &str {
        "logging"
    }
    fn options(&self) -> &[OptionSchema] {
        &[]
    }
    fn provides(&self) -> &[Module] {
        &[]
    }
    fn init(&self, _handle: &mut dyn InstanceHandle<Module>, _values: &[OptionValue]) -> Result<(), String> {
        Ok(())
    }
}

struct Registry {
    app: AppModule,
    logging: LoggingModule,
}

impl ModuleRegistry<Module> for Registry {
    fn module(&self, id: Module) -> Option<&dyn ModuleDef<Module>> {
        match id {
            Module::App => Some(&self.app),
            Module::Logging => Some(&self.logging),
        }
    }
    fn providers_of(&self, _interface: Module) -> Vec<Module> {
        Vec::new()
    }
    fn all_modules(&self) -> Vec<Module> {
        vec![Module::App, Module::Logging]
    }
}

let registry = Registry { app: AppModule, logging: LoggingModule };
let resolved: HashMap<Module, _> = resolve(&registry, Module::App).unwrap();
assert!(resolved.contains_key(&Module::App));
assert!(resolved.contains_key(&Module::Logging));
```
*/

pub mod config;
pub mod context;
pub mod instance;
pub mod misc;
pub mod pgraph;
pub mod registry;
pub mod rgraph;
pub mod solver;
pub mod structures;
pub mod types;

use std::collections::HashMap;
use std::fmt;

pub use config::Config;

use context::Context;
use instance::Instance;
use registry::{ModuleId, ModuleRegistry};
use rgraph::Rgraph;
use types::err::{ErrorKind, SolveError};

/// One instance per module the solver included --- the caller-facing result
/// of a successful [`resolve`].
pub type Resolved<M> = HashMap<M, Instance<M>>;

/// A resolve failure: the underlying [`ErrorKind`], plus --- for solve
/// failures whose witness literal the reason graph can still reach --- a
/// rendered explanation of the chain of reasons that produced it.
#[derive(Debug)]
pub struct ResolveError<M: ModuleId> {
    pub kind: ErrorKind<M>,
    pub explanation: Option<String>,
}

impl<M: ModuleId> fmt::Display for ResolveError<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self.kind)?;
        if let Some(explanation) = &self.explanation {
            write!(f, "\n{explanation}")?;
        }
        Ok(())
    }
}

impl<M: ModuleId> std::error::Error for ResolveError<M> {}

fn wrap<M: ModuleId>(kind: impl Into<ErrorKind<M>>) -> ResolveError<M> {
    ResolveError {
        kind: kind.into(),
        explanation: None,
    }
}

/// Resolves `initial` against `registry` with [`Config::default`].
///
/// See the [crate-level documentation](crate) for a worked example.
pub fn resolve<M: ModuleId>(
    registry: &impl ModuleRegistry<M>,
    initial: M,
) -> Result<Resolved<M>, ResolveError<M>> {
    resolve_with_config(registry, initial, Config::default())
}

/// As [`resolve`], with an explicit [`Config`].
pub fn resolve_with_config<M: ModuleId>(
    registry: &impl ModuleRegistry<M>,
    initial: M,
    config: Config,
) -> Result<Resolved<M>, ResolveError<M>> {
    let mut ctx = Context::new(config);

    ctx.discover_all(registry, initial).map_err(wrap)?;
    ctx.lower(registry, initial).map_err(wrap)?;

    let initial_atom = ctx.pgraph.module_atom(initial);
    let module_atoms: Vec<_> = ctx
        .module_order
        .iter()
        .map(|&module| ctx.pgraph.module_atom(module))
        .collect();

    match solver::solve(&mut ctx.pgraph, initial_atom, &module_atoms) {
        Ok(trunk) => {
            let resolved = solver::resolved_modules(&trunk);
            let mut out: Resolved<M> = HashMap::new();
            let optuples: Vec<_> = ctx.instance_order.clone();
            for optuple in optuples {
                let module_atom = ctx.pgraph.module_atom(optuple.module);
                if resolved.get(&module_atom) != Some(&true) {
                    continue;
                }
                let mut selected = true;
                for (index, &value) in optuple.values.iter().enumerate() {
                    let value_atom = ctx.pgraph.option_value_atom(optuple.module, index, value);
                    if resolved.get(&value_atom) != Some(&true) {
                        selected = false;
                        break;
                    }
                }
                if selected {
                    let instance = ctx.instances.remove(&optuple).expect("key just listed");
                    out.insert(optuple.module, instance);
                }
            }
            Ok(out)
        }
        Err((trunk, error)) => {
            let rgraph = Rgraph::build(&trunk.facts);
            let witness = match error {
                SolveError::FundamentalConflict(literal) => Some(literal),
                SolveError::NoConsistentAssignment(literal) => Some(literal),
                SolveError::UnknownLiteral(_) => None,
            };
            let explanation =
                witness.and_then(|literal| rgraph.render(&ctx.pgraph, literal).ok());
            Err(ResolveError {
                kind: ErrorKind::Solve(error),
                explanation,
            })
        }
    }
}
