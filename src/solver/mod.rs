/*!
The trunk-and-branch solver: turns a lowered [`crate::pgraph::Pgraph`] into
either a complete, consistent [`trunk::Trunk`] or a
[`crate::types::err::SolveError`].

Three pieces, each in its own module:

- [`trunk`] builds and holds the facts established unconditionally.
- [`branch`] expands one tentative extension of the trunk per candidate
  literal.
- [`resolve`] drives the two above, level by level, to a fixed point.
*/

pub mod branch;
pub mod resolve;
pub mod trunk;

pub use branch::{Branch, BranchKey, Diff};
pub use resolve::{prepare_branches, resolved_modules, solve, stepwise_resolve};
pub use trunk::{create_trunk, Trunk};
