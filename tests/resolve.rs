//! End-to-end resolve scenarios, each built from scratch against a tiny
//! in-test registry rather than a shared fixture --- the point of each test
//! is the shape of its own module graph.

mod support {
    use std::collections::HashMap;

    use modsolve::registry::{InstanceHandle, ModuleDef, ModuleId, ModuleRegistry, OptionSchema, OptionValue};

    type InitFn<M> = Box<dyn Fn(&mut dyn InstanceHandle<M>, &[OptionValue]) -> Result<(), String>>;

    /// A [`ModuleDef`] built from plain data plus a closure, so each test can
    /// describe its module graph as a short table rather than a new struct
    /// and `impl` block per module.
    pub struct FnModule<M: ModuleId> {
        pub id: M,
        pub options: Vec<OptionSchema>,
        pub provides: Vec<M>,
        pub init: InitFn<M>,
    }

    impl<M: ModuleId> FnModule<M> {
        pub fn new(
            id: M,
            options: Vec<OptionSchema>,
            provides: Vec<M>,
            init: impl Fn(&mut dyn InstanceHandle<M>, &[OptionValue]) -> Result<(), String> + 'static,
        ) -> Self {
            FnModule {
                id,
                options,
                provides,
                init: Box::new(init),
            }
        }
    }

    impl<M: ModuleId> ModuleDef<M> for FnModule<M> {
        fn id(&self) -> M {
            self.id
        }
        fn name(&self) -> &str {
            "fn-module"
        }
        fn options(&self) -> &[OptionSchema] {
            &self.options
        }
        fn provides(&self) -> &[M] {
            &self.provides
        }
        fn init(&self, handle: &mut dyn InstanceHandle<M>, values: &[OptionValue]) -> Result<(), String> {
            (self.init)(handle, values)
        }
    }

    pub struct FnRegistry<M: ModuleId> {
        pub modules: HashMap<M, FnModule<M>>,
        pub providers: HashMap<M, Vec<M>>,
    }

    impl<M: ModuleId> FnRegistry<M> {
        pub fn new() -> Self {
            FnRegistry {
                modules: HashMap::new(),
                providers: HashMap::new(),
            }
        }

        pub fn with(mut self, module: FnModule<M>) -> Self {
            self.modules.insert(module.id, module);
            self
        }

        pub fn providing(mut self, interface: M, providers: Vec<M>) -> Self {
            self.providers.insert(interface, providers);
            self
        }
    }

    impl<M: ModuleId> ModuleRegistry<M> for FnRegistry<M> {
        fn module(&self, id: M) -> Option<&dyn ModuleDef<M>> {
            self.modules.get(&id).map(|module| module as &dyn ModuleDef<M>)
        }

        fn providers_of(&self, interface: M) -> Vec<M> {
            self.providers.get(&interface).cloned().unwrap_or_default()
        }

        fn all_modules(&self) -> Vec<M> {
            let mut ids: Vec<M> = self.modules.keys().copied().collect();
            ids.sort();
            ids
        }
    }

    pub fn no_options() -> Vec<OptionSchema> {
        Vec::new()
    }

    pub fn ok(_handle: &mut dyn InstanceHandle<impl ModuleId>, _values: &[OptionValue]) -> Result<(), String> {
        Ok(())
    }
}

mod default_value_cascade {
    use modsolve::registry::{InstanceHandle, OptionSchema, OptionValue};
    use modsolve::resolve;

    use super::support::*;

    #[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug)]
    enum Module {
        Conf,
        M1,
        M2,
    }

    /// `conf` constrains `m1(bar=17)`; `m1` forwards its `bar` to `m2(foo=bar)`;
    /// `m2(foo=42)` is inviable. Resolving should pick `bar=17`/`foo=17`, never
    /// touching the inviable default.
    #[test]
    fn cascades_a_constrained_value_through_two_modules() {
        let registry = FnRegistry::new()
            .with(FnModule::new(Module::Conf, no_options(), Vec::new(), |handle, _| {
                handle.constrain(Module::M1, Some(vec![OptionValue::Int(17)]), true);
                Ok(())
            }))
            .with(FnModule::new(
                Module::M1,
                vec![OptionSchema::new("bar", [OptionValue::Int(42)], OptionValue::Int(42))],
                Vec::new(),
                |handle, values| {
                    handle.constrain(Module::M2, Some(vec![values[0]]), true);
                    Ok(())
                },
            ))
            .with(FnModule::new(
                Module::M2,
                vec![OptionSchema::new("foo", [OptionValue::Int(42)], OptionValue::Int(42))],
                Vec::new(),
                |_handle, values| {
                    if values[0] == OptionValue::Int(42) {
                        Err("foo may not be 42".to_string())
                    } else {
                        Ok(())
                    }
                },
            ));

        let resolved = resolve(&registry, Module::Conf).expect("resolve should succeed");

        assert!(resolved.contains_key(&Module::Conf));
        let m1 = resolved.get(&Module::M1).expect("m1 resolved");
        assert_eq!(m1.optuple.values, vec![OptionValue::Int(17)]);
        let m2 = resolved.get(&Module::M2).expect("m2 resolved");
        assert_eq!(m2.optuple.values, vec![OptionValue::Int(17)]);
    }
}

mod inviable_default_cascade {
    use modsolve::registry::{InstanceHandle, OptionSchema, OptionValue};
    use modsolve::resolve;

    use super::support::*;

    #[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug)]
    enum Module {
        Conf,
        M1,
        M2,
    }

    /// `conf` constrains `m1` as a whole (no specific value), so `bar` falls
    /// back to its only domain value, 42, which forwards to an inviable
    /// `m2(foo=42)`. Resolving must fail, and the explanation must name the
    /// inviability as a step in the chain.
    #[test]
    fn a_forced_default_that_lands_on_an_inviable_optuple_fails_with_an_explanation() {
        let registry = FnRegistry::new()
            .with(FnModule::new(Module::Conf, no_options(), Vec::new(), |handle, _| {
                handle.constrain(Module::M1, None, true);
                Ok(())
            }))
            .with(FnModule::new(
                Module::M1,
                vec![OptionSchema::new("bar", [OptionValue::Int(42)], OptionValue::Int(42))],
                Vec::new(),
                |handle, values| {
                    handle.constrain(Module::M2, Some(vec![values[0]]), true);
                    Ok(())
                },
            ))
            .with(FnModule::new(
                Module::M2,
                vec![OptionSchema::new("foo", [OptionValue::Int(42)], OptionValue::Int(42))],
                Vec::new(),
                |_handle, values| {
                    if values[0] == OptionValue::Int(42) {
                        Err("foo may not be 42".to_string())
                    } else {
                        Ok(())
                    }
                },
            ));

        let error = resolve(&registry, Module::Conf).expect_err("resolve should fail");
        let explanation = error.explanation.expect("a fundamental conflict should be explainable");
        assert!(
            explanation.contains("reported inviable by its own init"),
            "explanation did not mention inviability: {explanation}"
        );
    }
}

mod provider_selection {
    use modsolve::registry::InstanceHandle;
    use modsolve::resolve;

    use super::support::*;

    #[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug)]
    enum Module {
        Conf,
        I,
        P1,
        P2,
    }

    /// `conf` requires interface `I`; `P1` is registered first (the
    /// default), `P2` second. With nothing else deciding between them, `P1`
    /// must be the one selected.
    #[test]
    fn the_first_registered_provider_is_selected_by_default() {
        let registry = FnRegistry::new()
            .with(FnModule::new(Module::Conf, no_options(), Vec::new(), |handle, _| {
                handle.constrain(Module::I, None, true);
                Ok(())
            }))
            .with(FnModule::new(Module::I, no_options(), Vec::new(), ok))
            .with(FnModule::new(Module::P1, no_options(), vec![Module::I], |handle, _| {
                handle.provides(Module::I);
                Ok(())
            }))
            .with(FnModule::new(Module::P2, no_options(), vec![Module::I], |handle, _| {
                handle.provides(Module::I);
                Ok(())
            }))
            .providing(Module::I, vec![Module::P1, Module::P2]);

        let resolved = resolve(&registry, Module::Conf).expect("resolve should succeed");

        assert!(resolved.contains_key(&Module::I));
        assert!(resolved.contains_key(&Module::P1));
        assert!(!resolved.contains_key(&Module::P2));
    }
}

mod at_most_one_provider {
    use modsolve::registry::InstanceHandle;
    use modsolve::resolve;

    use super::support::*;

    #[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug)]
    enum Module {
        Conf,
        I,
        P1,
        P2,
    }

    /// `conf` forces `I`, `P1`, and `P2` all included at once, but `P1` and
    /// `P2` both provide `I` and are therefore mutually exclusive. Resolving
    /// must fail with an explanation citing the at-most-one rule.
    #[test]
    fn forcing_two_providers_of_the_same_interface_fails() {
        let registry = FnRegistry::new()
            .with(FnModule::new(Module::Conf, no_options(), Vec::new(), |handle, _| {
                handle.constrain(Module::I, None, true);
                handle.constrain(Module::P1, None, true);
                handle.constrain(Module::P2, None, true);
                Ok(())
            }))
            .with(FnModule::new(Module::I, no_options(), Vec::new(), ok))
            .with(FnModule::new(Module::P1, no_options(), vec![Module::I], |handle, _| {
                handle.provides(Module::I);
                Ok(())
            }))
            .with(FnModule::new(Module::P2, no_options(), vec![Module::I], |handle, _| {
                handle.provides(Module::I);
                Ok(())
            }))
            .providing(Module::I, vec![Module::P1, Module::P2]);

        let error = resolve(&registry, Module::Conf).expect_err("resolve should fail");
        let explanation = error.explanation.expect("a fundamental conflict should be explainable");
        assert!(
            explanation.contains("at most one"),
            "explanation did not mention the at-most-one rule: {explanation}"
        );
    }
}

mod option_domain_extension {
    use modsolve::registry::{InstanceHandle, OptionSchema, OptionValue};
    use modsolve::resolve;

    use super::support::*;

    #[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug)]
    enum Module {
        Conf,
        M,
    }

    /// `m`'s option `x` only declares `{1, 2}`; `conf` constrains
    /// `m(x=3)`, a value outside that initial domain. Discovery must grow
    /// `x`'s live domain to admit 3, and the solve must settle on it.
    #[test]
    fn an_explicit_constraint_extends_the_targeted_option_domain() {
        let registry = FnRegistry::new()
            .with(FnModule::new(Module::Conf, no_options(), Vec::new(), |handle, _| {
                handle.constrain(Module::M, Some(vec![OptionValue::Int(3)]), true);
                Ok(())
            }))
            .with(FnModule::new(
                Module::M,
                vec![OptionSchema::new(
                    "x",
                    [OptionValue::Int(1), OptionValue::Int(2)],
                    OptionValue::Int(1),
                )],
                Vec::new(),
                ok,
            ));

        let resolved = resolve(&registry, Module::Conf).expect("resolve should succeed");

        let m = resolved.get(&Module::M).expect("m resolved");
        assert_eq!(m.optuple.values, vec![OptionValue::Int(3)]);
    }
}

mod unforced_provider_left_excluded {
    use modsolve::registry::InstanceHandle;
    use modsolve::resolve;

    use super::support::*;

    #[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug)]
    enum Module {
        Conf,
        I,
        Preferred,
        Fallback,
    }

    /// A non-default provider carries no bias of its own towards being
    /// included --- it is tried excluded before the default provider is
    /// ever tried included, so with no constraint forcing it either way it
    /// simply never makes it into the result.
    #[test]
    fn a_non_default_provider_with_no_forcing_constraint_is_excluded() {
        let registry = FnRegistry::new()
            .with(FnModule::new(Module::Conf, no_options(), Vec::new(), |handle, _| {
                handle.constrain(Module::I, None, true);
                Ok(())
            }))
            .with(FnModule::new(Module::I, no_options(), Vec::new(), ok))
            .with(FnModule::new(Module::Preferred, no_options(), vec![Module::I], |handle, _| {
                handle.provides(Module::I);
                Ok(())
            }))
            .with(FnModule::new(Module::Fallback, no_options(), vec![Module::I], |handle, _| {
                handle.provides(Module::I);
                Ok(())
            }))
            .providing(Module::I, vec![Module::Preferred, Module::Fallback]);

        let resolved = resolve(&registry, Module::Conf).expect("resolve should succeed");

        assert!(!resolved.contains_key(&Module::Fallback));
    }
}

mod determinism {
    use modsolve::registry::InstanceHandle;
    use modsolve::resolve;

    use super::support::*;

    #[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug)]
    enum Module {
        Conf,
        A,
        B,
    }

    /// Resolving the same registry twice must pick the same modules --- the
    /// solver has no hidden source of nondeterminism to drift across runs.
    #[test]
    fn resolving_twice_yields_the_same_module_set() {
        let registry = FnRegistry::new()
            .with(FnModule::new(Module::Conf, no_options(), Vec::new(), |handle, _| {
                handle.constrain(Module::A, None, true);
                Ok(())
            }))
            .with(FnModule::new(Module::A, no_options(), Vec::new(), |handle, _| {
                handle.constrain(Module::B, None, true);
                Ok(())
            }))
            .with(FnModule::new(Module::B, no_options(), Vec::new(), ok));

        let first: Vec<Module> = {
            let mut keys: Vec<Module> = resolve(&registry, Module::Conf).unwrap().into_keys().collect();
            keys.sort();
            keys
        };
        let second: Vec<Module> = {
            let mut keys: Vec<Module> = resolve(&registry, Module::Conf).unwrap().into_keys().collect();
            keys.sort();
            keys
        };

        assert_eq!(first, second);
        assert_eq!(first, vec![Module::A, Module::B, Module::Conf]);
    }
}
