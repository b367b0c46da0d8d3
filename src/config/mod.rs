/*!
Configuration of a resolve.

All configuration is contained within [`Config`]; a context clones the
relevant parts as it is built.
*/

mod config_option;
pub use config_option::ConfigOption;

/// The primary configuration structure.
#[derive(Clone)]
pub struct Config {
    /// An upper bound on the number of optuples the instantiation queue may
    /// drain before discovery gives up and reports
    /// [`DiscoveryError::BudgetExhausted`](crate::types::err::DiscoveryError::BudgetExhausted).
    ///
    /// Finite option domains and idempotent `post_discover` calls guarantee
    /// termination in the well-formed case; this is a backstop against a
    /// misbehaving registry, not a tuning knob for ordinary use.
    pub instantiation_limit: ConfigOption<usize>,

    /// Whether to run the (comparatively expensive) internal consistency
    /// assertions --- hash-consing uniqueness, domain monotonicity,
    /// trunk/branch literal-disjointness --- after each solver phase.
    pub invariant_assertions: ConfigOption<bool>,
}

impl Default for Config {
    /// The default configuration favours catching a misbehaving registry
    /// quickly over squeezing out the last cycle of performance.
    fn default() -> Self {
        Config {
            instantiation_limit: ConfigOption {
                name: "instantiation_limit",
                min: 1,
                max: usize::MAX,
                value: 1_000_000,
            },

            invariant_assertions: ConfigOption {
                name: "invariant_assertions",
                min: false,
                max: true,
                value: cfg!(debug_assertions),
            },
        }
    }
}
