//! Set algebra over module id sets.
//!
//! Every operation is total: empty sets are valid inputs and nothing here can fail.

use crate::catalog::ModuleId;
use std::collections::BTreeSet;

/// The set of modules a configuration activates.
pub type ModuleSet = BTreeSet<ModuleId>;

/// Returns `true` when every element of `subset` is also in `superset`.
///
/// The empty set is a subset of everything.
pub fn is_subset<T: Ord>(subset: &BTreeSet<T>, superset: &BTreeSet<T>) -> bool {
    subset.iter().all(|value| superset.contains(value))
}

/// Counts the elements of `a` that are missing from `b`.
pub fn difference_size<T: Ord>(a: &BTreeSet<T>, b: &BTreeSet<T>) -> usize {
    a.iter().filter(|value| !b.contains(*value)).count()
}

/// Returns `true` when both sets hold exactly the same elements.
pub fn are_equal<T: Ord>(a: &BTreeSet<T>, b: &BTreeSet<T>) -> bool {
    a.len() == b.len() && is_subset(a, b)
}

/// Collects module ids into a [`ModuleSet`].
pub fn module_set<I, S>(ids: I) -> ModuleSet
where
    I: IntoIterator<Item = S>,
    S: Into<ModuleId>,
{
    ids.into_iter().map(Into::into).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_set_is_subset_of_everything() {
        let empty = ModuleSet::new();
        assert!(is_subset(&empty, &module_set(["base"])));
        assert!(is_subset(&empty, &empty));
    }

    #[test]
    fn subset_requires_every_element() {
        let small = module_set(["base", "head"]);
        let large = module_set(["base", "torso", "head"]);
        assert!(is_subset(&small, &large));
        assert!(!is_subset(&large, &small));
    }

    #[test]
    fn difference_counts_only_missing_elements() {
        let a = module_set(["base", "torso", "arms"]);
        let b = module_set(["base", "head"]);
        assert_eq!(difference_size(&a, &b), 2);
        assert_eq!(difference_size(&b, &a), 1);
        assert_eq!(difference_size(&a, &a), 0);
    }

    #[test]
    fn equality_ignores_insertion_order() {
        let a = module_set(["head", "base"]);
        let b = module_set(["base", "head"]);
        assert!(are_equal(&a, &b));
        assert!(!are_equal(&a, &module_set(["base"])));
        assert!(!are_equal(&module_set(["base"]), &a));
    }
}
