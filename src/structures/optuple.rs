//! Optuples --- a module paired with a candidate value for each of its
//! options --- and the growing per-option domains discovery tracks them
//! against.

use std::collections::HashSet;
use std::hash::Hash;

use crate::registry::{ModuleId, OptionValue};

/// A module together with one concrete value for each of its options, in
/// schema order. Two optuples are the same candidate instance iff they are
/// equal as optuples.
#[derive(Clone, PartialEq, Eq, Hash, Debug)]
pub struct Optuple<M: ModuleId> {
    pub module: M,
    pub values: Vec<OptionValue>,
}

impl<M: ModuleId> Optuple<M> {
    pub fn new(module: M, values: Vec<OptionValue>) -> Self {
        Optuple { module, values }
    }
}

impl<M: ModuleId> std::fmt::Display for Optuple<M> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}(", self.module)?;
        for (i, v) in self.values.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{v}")?;
        }
        write!(f, ")")
    }
}

/// An insertion-ordered set.
///
/// Per-option domains only ever grow during discovery, and the order values
/// were first admitted in feeds directly into level assignment (earlier
/// values get a lower, i.e. more eagerly resolved, branch level) --- a plain
/// `HashSet` would make that order unobservable.
#[derive(Clone, Debug)]
pub struct OrderedSet<T> {
    order: Vec<T>,
    seen: HashSet<T>,
}

impl<T> Default for OrderedSet<T> {
    fn default() -> Self {
        OrderedSet {
            order: Vec::new(),
            seen: HashSet::new(),
        }
    }
}

impl<T: Clone + Eq + Hash> OrderedSet<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts `value`, returning `true` iff it was not already present.
    pub fn insert(&mut self, value: T) -> bool {
        if self.seen.insert(value.clone()) {
            self.order.push(value);
            true
        } else {
            false
        }
    }

    pub fn contains(&self, value: &T) -> bool {
        self.seen.contains(value)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.order.iter()
    }

    /// The position `value` was first inserted at, if present --- used
    /// directly as a branch-level hint.
    pub fn position(&self, value: &T) -> Option<usize> {
        self.order.iter().position(|v| v == value)
    }
}

impl<T: Clone + Eq + Hash> FromIterator<T> for OrderedSet<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut set = Self::new();
        for value in iter {
            set.insert(value);
        }
        set
    }
}

/// The live domain of a single module: one growing [`OrderedSet`] per
/// declared option.
#[derive(Clone, Debug, Default)]
pub struct ModuleDomain {
    pub options: Vec<OrderedSet<OptionValue>>,
}

impl ModuleDomain {
    pub fn from_initial(initial: impl IntoIterator<Item = Vec<OptionValue>>) -> Self {
        ModuleDomain {
            options: initial.into_iter().map(OrderedSet::from_iter).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ordered_set_preserves_first_insertion_order() {
        let mut set: OrderedSet<i32> = OrderedSet::new();
        assert!(set.insert(3));
        assert!(set.insert(1));
        assert!(!set.insert(3));
        assert_eq!(set.iter().copied().collect::<Vec<_>>(), vec![3, 1]);
        assert_eq!(set.position(&1), Some(1));
    }
}
