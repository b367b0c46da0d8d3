use std::collections::HashMap;

use modsolve::registry::{InstanceHandle, ModuleDef, ModuleRegistry, OptionSchema, OptionValue};
use modsolve::resolve;

#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug)]
enum Module {
    App,
    Logging,
    ConsoleLogger,
    FileLogger,
}

struct App;

impl ModuleDef<Module> for App {
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

struct Logging;

impl ModuleDef<Module> for Logging {
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

struct ConsoleLogger;

impl ModuleDef<Module> for ConsoleLogger {
    fn id(&self) -> Module {
        Module::ConsoleLogger
    }
    fn name(&self) -> &str {
        "console-logger"
    }
    fn options(&self) -> &[OptionSchema] {
        &[]
    }
    fn provides(&self) -> &[Module] {
        &[Module::Logging]
    }
    fn init(&self, handle: &mut dyn InstanceHandle<Module>, _values: &[OptionValue]) -> Result<(), String> {
        handle.provides(Module::Logging);
        Ok(())
    }
}

struct FileLogger;

impl ModuleDef<Module> for FileLogger {
    fn id(&self) -> Module {
        Module::FileLogger
    }
    fn name(&self) -> &str {
        "file-logger"
    }
    fn options(&self) -> &[OptionSchema] {
        &[]
    }
    fn provides(&self) -> &[Module] {
        &[Module::Logging]
    }
    fn init(&self, handle: &mut dyn InstanceHandle<Module>, _values: &[OptionValue]) -> Result<(), String> {
        handle.provides(Module::Logging);
        Ok(())
    }
}

struct Registry {
    app: App,
    logging: Logging,
    console_logger: ConsoleLogger,
    file_logger: FileLogger,
    providers: HashMap<Module, Vec<Module>>,
}

impl ModuleRegistry<Module> for Registry {
    fn module(&self, id: Module) -> Option<&dyn ModuleDef<Module>> {
        match id {
            Module::App => Some(&self.app),
            Module::Logging => Some(&self.logging),
            Module::ConsoleLogger => Some(&self.console_logger),
            Module::FileLogger => Some(&self.file_logger),
        }
    }

    fn providers_of(&self, interface: Module) -> Vec<Module> {
        self.providers.get(&interface).cloned().unwrap_or_default()
    }

    fn all_modules(&self) -> Vec<Module> {
        vec![Module::App, Module::Logging, Module::ConsoleLogger, Module::FileLogger]
    }
}

fn main() {
    env_logger::init();

    // `console_logger` is registered first, so it is logging's default
    // provider: nothing in this registry prefers `file_logger`, so resolving
    // `app` should settle on the console one without us naming it anywhere.
    let registry = Registry {
        app: App,
        logging: Logging,
        console_logger: ConsoleLogger,
        file_logger: FileLogger,
        providers: HashMap::from([(Module::Logging, vec![Module::ConsoleLogger, Module::FileLogger])]),
    };

    println!(
        "
Resolving `app` against a registry with two interchangeable logging
providers, `console_logger` (registered first) and `file_logger`."
    );

    let resolved = resolve(&registry, Module::App).expect("this registry has a consistent resolution");

    println!(
        "
Resolve settled on {} modules: {:?}",
        resolved.len(),
        {
            let mut names: Vec<&str> = resolved
                .values()
                .map(|instance| registry.module(instance.optuple.module).expect("resolved module exists").name())
                .collect();
            names.sort();
            names
        }
    );

    assert!(resolved.contains_key(&Module::ConsoleLogger));
    assert!(!resolved.contains_key(&Module::FileLogger));

    println!(
        "
As expected, `console_logger` was selected and `file_logger` was left out ---
the default-provider bias tried the first-registered provider before any
other, and nothing in this registry gave the solver a reason to look
further."
    );
}
