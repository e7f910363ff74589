//! Binary search over two-level sublist storage.
//!
//! `SortedList` and `IndexedMap` both keep their elements in a vector of
//! bounded sublists with a Fenwick tree over the sublist lengths. The
//! helpers here resolve keys and global indices to `(sublist, offset)`
//! slots; they are generic over a probe closure so the same code serves
//! bare elements and `(key, value)` pairs.

use ftree::FenwickTree;
use std::cmp::Ordering;

/// Outcome of a sorted-position search.
///
/// `Found(i)` is the global index of an existing element; `InsertAt(i)` is
/// the global index where a missing element belongs. This replaces the
/// classic encoded `-(insertion point) - 1` return with a tagged result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchResult {
    Found(usize),
    InsertAt(usize),
}

impl SearchResult {
    /// The index carried by either variant.
    pub fn index(&self) -> usize {
        match *self {
            SearchResult::Found(i) | SearchResult::InsertAt(i) => i,
        }
    }

    pub fn is_found(&self) -> bool {
        matches!(self, SearchResult::Found(_))
    }

    pub fn found(&self) -> Option<usize> {
        match *self {
            SearchResult::Found(i) => Some(i),
            SearchResult::InsertAt(_) => None,
        }
    }
}

/// Locates the sublist holding an element that compares equal to the probe.
///
/// `cmp_to_probe` orders a stored element against the probe. Returns the
/// candidate sublist and, when a comparison-equal element exists there, its
/// offset. Built on the lower bound so that a probe sitting at the head of
/// a sublist (the slot every split produces) resolves to that sublist, not
/// the one before it. A past-the-end probe clamps to the last sublist for
/// the insertion path.
pub(crate) fn locate<T, F>(sublists: &[Vec<T>], cmp_to_probe: F) -> (usize, Option<usize>)
where
    F: Fn(&T) -> Ordering,
{
    let (s, p) = partition(sublists, |e| cmp_to_probe(e) == Ordering::Less);
    if s == sublists.len() {
        return (sublists.len() - 1, None);
    }
    if cmp_to_probe(&sublists[s][p]) == Ordering::Equal {
        (s, Some(p))
    } else {
        (s, None)
    }
}

/// First slot whose element does not satisfy `below`.
///
/// With `below = |e| e < key` this is the lower bound, with
/// `below = |e| e <= key` the upper bound. Returns `(sublists.len(), 0)`
/// when every element satisfies the predicate.
pub(crate) fn partition<T, F>(sublists: &[Vec<T>], below: F) -> (usize, usize)
where
    F: Fn(&T) -> bool,
{
    let idx = sublists.partition_point(|sublist| sublist.is_empty() || below(&sublist[0]));
    let consider = idx.saturating_sub(1);
    let sublist = &sublists[consider];
    let pos = sublist.partition_point(|e| below(e));
    if pos < sublist.len() {
        (consider, pos)
    } else if consider + 1 < sublists.len() {
        (consider + 1, 0)
    } else {
        (sublists.len(), 0)
    }
}

/// Resolves a global index to a `(sublist, offset)` slot via the Fenwick
/// tree, or `None` past the end.
pub(crate) fn locate_index(
    fenwick: &FenwickTree<usize>,
    sublist_count: usize,
    len: usize,
    index: usize,
) -> Option<(usize, usize)> {
    if index >= len {
        return None;
    }
    let mut low = 0;
    let mut high = sublist_count;
    while low < high {
        let mid = low + (high - low) / 2;
        if fenwick.prefix_sum(mid, 0) <= index {
            low = mid + 1;
        } else {
            high = mid;
        }
    }
    let sublist_idx = low - 1;
    let offset = fenwick.prefix_sum(sublist_idx, 0);
    Some((sublist_idx, index - offset))
}

/// Fenwick tree reconstructed from the current sublist lengths.
pub(crate) fn rebuilt<T>(sublists: &[Vec<T>]) -> FenwickTree<usize> {
    FenwickTree::from_iter(sublists.iter().map(|s| s.len()))
}
