//! Neglast groups --- a constructor-internal device used by [`And`](super::Pgraph::and)
//! to encode "all operands true forces the conjunction true" without O(n^2)
//! pairwise edges.
//!
//! A neglast's `members` are the literals `{operand_1[true], ...,
//! operand_n[true], conjunction[false]}`. As each member is individually
//! established, it closes out one slot; once exactly one member remains
//! open, that member's own negation is forced --- this is a plain n+1-ary
//! clause, just tracked as a group instead of via pairwise watches.

use crate::structures::literal::{Lit, Literal};

use super::reason::Why;

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, PartialOrd, Ord)]
pub struct NeglastId(pub(super) u32);

#[derive(Clone, Debug)]
pub struct Neglast {
    pub members: Vec<Lit>,
}

impl Neglast {
    /// Called once exactly one member of the group remains unestablished.
    /// Returns the literal to force, and why.
    pub fn force(&self, remaining: Lit) -> (Lit, Why) {
        (remaining.negate(), Why::AndFalseForcesLastOperand)
    }
}
