//! Absence-aware ordering and equality primitives.
//!
//! Every container in this crate treats "absent" as a first-class cell
//! state; these helpers compare optional references without unwrapping.

use std::cmp::Ordering;

/// Structural equality over possibly-absent values.
pub fn eq<T: PartialEq>(a: Option<&T>, b: Option<&T>) -> bool {
    match (a, b) {
        (Some(a), Some(b)) => a == b,
        (None, None) => true,
        _ => false,
    }
}

/// Three-way comparison over possibly-absent values; absent sorts first.
pub fn compare<T: Ord>(a: Option<&T>, b: Option<&T>) -> Ordering {
    compare_by(a, b, T::cmp)
}

/// [`compare`] with an explicit comparator.
pub fn compare_by<T>(a: Option<&T>, b: Option<&T>, cmp: fn(&T, &T) -> Ordering) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => cmp(a, b),
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Less,
        (Some(_), None) => Ordering::Greater,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absent_sorts_first() {
        assert_eq!(compare::<u8>(None, None), Ordering::Equal);
        assert_eq!(compare(None, Some(&0u8)), Ordering::Less);
        assert_eq!(compare(Some(&0u8), None), Ordering::Greater);
        assert_eq!(compare(Some(&1u8), Some(&2u8)), Ordering::Less);
    }

    #[test]
    fn eq_requires_matching_presence() {
        assert!(eq::<u8>(None, None));
        assert!(eq(Some(&3u8), Some(&3u8)));
        assert!(!eq(Some(&3u8), None));
        assert!(!eq(Some(&3u8), Some(&4u8)));
    }
}
