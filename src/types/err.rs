/*!
Error types used in the library.

- Most of these are unlikely during ordinary use of a well-formed registry.
- `Inviable` is expected from time to time --- a module's `init` routine
  returning it is simply a report that some optuple can't live, not a bug.
- Others are external --- e.g. [`SolveError::NoConsistentAssignment`]
  highlights that the requested module has no consistent instantiation at
  all, which a caller may want to report rather than treat as a defect.

Names of the error enums --- for the most part --- overlap with corresponding
structs. Each is generic over the caller's own [`ModuleId`](crate::registry::ModuleId)
type, since a module id appears directly in several variants.
*/

use crate::registry::ModuleId;
use crate::structures::literal::Lit;

/// A union of varied error kinds.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum ErrorKind<M: ModuleId> {
    /// An error while discovering optuples from a registry.
    Discovery(DiscoveryError<M>),

    /// An error while lowering the discovered universe into a pgraph.
    Lowering(LoweringError<M>),

    /// An error during trunk/branch solving.
    Solve(SolveError),

    /// An error while building a reason graph explanation.
    Rgraph(RgraphError),

    /// The attempted action could not be completed given the state of the
    /// context (e.g. asking to solve before any discovery has run).
    InvalidState,
}

/// Errors encountered while discovering optuples from a registry.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum DiscoveryError<M: ModuleId> {
    /// A module's `init` callback reported the optuple as inviable.
    Inviable(M, String),

    /// The instantiation queue exceeded the configured budget without
    /// terminating --- most likely a registry whose `init` keeps extending
    /// its own option domain.
    BudgetExhausted,

    /// No provider is registered for the requested interface.
    NoProvider(M),

    /// The registry reported an unknown module id.
    UnknownModule(M),
}

impl<M: ModuleId> From<DiscoveryError<M>> for ErrorKind<M> {
    fn from(e: DiscoveryError<M>) -> Self {
        ErrorKind::Discovery(e)
    }
}

/// Errors encountered while lowering a discovered universe into a pgraph.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum LoweringError<M: ModuleId> {
    /// An option schema declared a default value outside its own initial
    /// domain.
    DefaultNotInDomain(M, usize),

    /// A module's `provides` call named an interface the registry has no
    /// record of it providing.
    UnregisteredProvides(M, M),
}

impl<M: ModuleId> From<LoweringError<M>> for ErrorKind<M> {
    fn from(e: LoweringError<M>) -> Self {
        ErrorKind::Lowering(e)
    }
}

/// Errors during trunk/branch solving. Solver-internal objects (atoms,
/// literals, reasons) have already erased the caller's module id by this
/// point, so this variant is not generic over it.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum SolveError {
    /// A fundamental conflict was found directly in the trunk, with no
    /// branch to blame --- the universe is unconditionally inconsistent.
    /// Carries the literal whose negation was already an established fact.
    FundamentalConflict(Lit),

    /// All remaining branches at some resolution level are dead and none
    /// can be merged into the trunk --- the initial module has no
    /// consistent instantiation. Carries one of the generator literals
    /// whose every branch died.
    NoConsistentAssignment(Lit),

    /// A literal was asked for that the pgraph never constructed.
    UnknownLiteral(Lit),
}

impl<M: ModuleId> From<SolveError> for ErrorKind<M> {
    fn from(e: SolveError) -> Self {
        ErrorKind::Solve(e)
    }
}

/// Errors while building a reason graph explanation.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum RgraphError {
    /// The requested literal was never established, so it has no reasons
    /// to walk.
    NeverEstablished(Lit),

    /// No path of reasons connects the cause to the outcome.
    NoPath,
}

impl<M: ModuleId> From<RgraphError> for ErrorKind<M> {
    fn from(e: RgraphError) -> Self {
        ErrorKind::Rgraph(e)
    }
}
