/*!
Miscelanous items related to [logging](log).

Calls to the log macro are made throughout the library.
These are intended to provide useful information for extending the library
and/or diagnosing why a resolve failed.

Note, no log implementation is provided.
For more details, see [log].
*/

/// Targets to be used within a [log]! macro.
pub mod targets {
    /// Logs related to [discovery](crate::context::discovery)
    pub const DISCOVERY: &str = "discovery";

    /// Logs related to [lowering](crate::context::lowering)
    pub const LOWERING: &str = "lowering";

    /// Logs related to the [pgraph](crate::pgraph)
    pub const PGRAPH: &str = "pgraph";

    /// Logs related to [trunk construction](crate::solver::trunk)
    pub const TRUNK: &str = "trunk";

    /// Logs related to [branch expansion](crate::solver::branch)
    pub const BRANCH: &str = "branch";

    /// Logs related to [branch resolution](crate::solver::resolve)
    pub const RESOLVE: &str = "resolve";

    /// Logs related to the [reason graph](crate::rgraph)
    pub const RGRAPH: &str = "rgraph";
}
