/*!
The registry contract: the traits a caller implements to describe their
universe of modules, and the handle a module's `init` routine uses to report
constraints and provided interfaces back to discovery.

None of this is implemented by the library --- it is the seam a caller's
build-system front end fills in, mirrored against the way the rest of the
library is built from small, named traits (a literal is "anything with an
atom and a polarity"; a module id is "anything a caller can use to name a
module").
*/

use std::fmt::Debug;
use std::hash::Hash;

/// A caller-assigned identifier for a module.
///
/// Any small, cheaply-copied, totally-ordered, hashable type works --- an
/// interned string id, a `u32` index into a caller-side table, or a generated
/// enum. Ordering only needs to be consistent; it is never given semantic
/// weight beyond providing a deterministic iteration order over module sets.
pub trait ModuleId: Copy + Eq + Ord + Hash + Debug {}

impl<T: Copy + Eq + Ord + Hash + Debug> ModuleId for T {}

/// A value a module option may take.
///
/// Kept as a single concrete enum --- rather than a generic trait parameter
/// threaded through every structure --- so a module registry can mix option
/// types freely without the library needing a type-erased value store.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub enum OptionValue {
    Bool(bool),
    Int(i64),
    Str(&'static str),
}

impl std::fmt::Display for OptionValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OptionValue::Bool(b) => write!(f, "{b}"),
            OptionValue::Int(i) => write!(f, "{i}"),
            OptionValue::Str(s) => write!(f, "{s}"),
        }
    }
}

/// The declared schema of a single option: its name, its initially-known
/// domain (insertion-ordered, may grow during discovery), and its default.
#[derive(Clone, Debug)]
pub struct OptionSchema {
    pub name: &'static str,
    pub initial_domain: Vec<OptionValue>,
    pub default: OptionValue,
}

impl OptionSchema {
    pub fn new(
        name: &'static str,
        initial_domain: impl IntoIterator<Item = OptionValue>,
        default: OptionValue,
    ) -> Self {
        OptionSchema {
            name,
            initial_domain: initial_domain.into_iter().collect(),
            default,
        }
    }
}

/// The definition of a single module, as a caller's registry hands it to
/// discovery.
///
/// `Id` is the caller's [`ModuleId`] type; implementors are expected to be
/// cheap to look up by id (the registry itself owns storage and identity,
/// a `ModuleDef` is a borrowed view onto one entry of it).
pub trait ModuleDef<Id: ModuleId> {
    /// This module's own id.
    fn id(&self) -> Id;

    /// A human-readable name, used only in diagnostics.
    fn name(&self) -> &str;

    /// The option schemas, in declaration order. An optuple's value vector
    /// is positional against this slice.
    fn options(&self) -> &[OptionSchema];

    /// Interfaces (other module ids) this module is a registered provider
    /// for. A module with no option of its own can still provide.
    fn provides(&self) -> &[Id];

    /// Run this module's body against one concrete optuple. Implementations
    /// call [`InstanceHandle::constrain`] and [`InstanceHandle::provides`]
    /// to report dependency constraints and chosen providers, and may also
    /// call [`InstanceHandle::extend_domain`] to admit values into an
    /// option's domain that weren't present in its initial schema.
    ///
    /// Returning `Err` marks the optuple as inviable: it is recorded as a
    /// constant-false node in the pgraph rather than aborting discovery.
    fn init(
        &self,
        handle: &mut dyn InstanceHandle<Id>,
        values: &[OptionValue],
    ) -> Result<(), String>;
}

/// A caller's full universe of modules.
pub trait ModuleRegistry<Id: ModuleId> {
    /// Look up a module definition by id.
    fn module(&self, id: Id) -> Option<&dyn ModuleDef<Id>>;

    /// Every module registered as a provider of `interface`, in a
    /// deterministic (e.g. registration) order. The first entry is used as
    /// the default provider when nothing else is constrained.
    fn providers_of(&self, interface: Id) -> Vec<Id>;

    /// All module ids known to the registry, in a deterministic order. Used
    /// only for diagnostics (e.g. validating that every `provides` entry in
    /// `ModuleDef::provides` names a module the registry actually has).
    fn all_modules(&self) -> Vec<Id>;
}

/// The callback surface a module's `init` is given to report back to
/// discovery.
pub trait InstanceHandle<Id: ModuleId> {
    /// Require that `target`, with the given `values` for its own options
    /// if `Some`, be enabled (or disabled, if `enabled` is `false`) whenever
    /// this optuple is enabled.
    ///
    /// `values: None` constrains the target module as a whole (any of its
    /// option values), `values: Some(v)` constrains the specific optuple
    /// `(target, v)`.
    fn constrain(&mut self, target: Id, values: Option<Vec<OptionValue>>, enabled: bool);

    /// Declare that this optuple, if enabled, satisfies the interface
    /// `target` --- i.e. acts as `target`'s provider.
    fn provides(&mut self, target: Id);

    /// Admit `value` into option `option_index`'s live domain, if it is not
    /// already present. A no-op if the value is already in the domain.
    fn extend_domain(&mut self, option_index: usize, value: OptionValue);
}
