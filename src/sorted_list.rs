//! Duplicate-free ordered sequence with index access and live range views.

use std::cell::{Ref, RefCell};
use std::cmp::Ordering;
use std::collections::hash_map::DefaultHasher;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::rc::Rc;

use ftree::FenwickTree;

use crate::error::{Error, Result};
use crate::search::{self, SearchResult};

const NODE_CAPACITY: usize = 64;

fn natural<E: Ord>(a: &E, b: &E) -> Ordering {
    a.cmp(b)
}

/// An ordered, growable sequence of unique elements.
///
/// Elements are kept sorted under a comparator (natural order by default)
/// and are addressable by index in O(log n). Order-violating positional
/// writes do not exist in the API; the only way in is [`SortedList::insert`].
///
/// Uniqueness is decided in two steps: the comparator narrows the candidate
/// run, then `PartialEq` picks the true match within it. An element that
/// compares equal to existing ones but is `!=` to all of them inserts at
/// the end of that run.
///
/// The list hands out [`SubList`] range views and iterators that share its
/// storage; see the crate docs for the aliasing and fail-fast rules.
pub struct SortedList<E> {
    core: Rc<RefCell<ListCore<E>>>,
}

/// A live range view over a [`SortedList`].
///
/// Holds element bounds (min inclusive, max exclusive, `None` = open) and
/// re-resolves its index window against the current backing storage on
/// every call, so structural edits made through the root or a sibling view
/// are always visible.
pub struct SubList<E> {
    core: Rc<RefCell<ListCore<E>>>,
    min: Option<E>,
    max: Option<E>,
}

/// Fail-fast element iterator; yields clones.
pub struct Iter<E> {
    core: Rc<RefCell<ListCore<E>>>,
    pos: usize,
    end: usize,
    expected: u64,
}

struct ListCore<E> {
    sublists: Vec<Vec<E>>,
    fenwick: FenwickTree<usize>,
    node_capacity: usize,
    cmp: fn(&E, &E) -> Ordering,
    mods: u64,
}

impl<E> ListCore<E> {
    fn new(cmp: fn(&E, &E) -> Ordering) -> Self {
        let mut core = ListCore {
            sublists: Vec::new(),
            fenwick: FenwickTree::new(),
            node_capacity: NODE_CAPACITY,
            cmp,
            mods: 0,
        };
        core.reset();
        core
    }

    fn reset(&mut self) {
        self.sublists = vec![Vec::with_capacity(self.node_capacity)];
        self.fenwick = FenwickTree::new();
        self.fenwick.push(0);
        self.mods += 1;
    }

    fn len(&self) -> usize {
        self.fenwick.prefix_sum(self.sublists.len(), 0)
    }

    fn global_at(&self, index: usize) -> Option<&E> {
        search::locate_index(&self.fenwick, self.sublists.len(), self.len(), index)
            .map(|(s, p)| &self.sublists[s][p])
    }

    fn global_of(&self, slot: (usize, usize)) -> usize {
        self.fenwick.prefix_sum(slot.0, slot.1)
    }

    fn lower_slot(&self, probe: &E) -> (usize, usize) {
        search::partition(&self.sublists, |e| (self.cmp)(e, probe) == Ordering::Less)
    }

    fn upper_slot(&self, probe: &E) -> (usize, usize) {
        search::partition(&self.sublists, |e| (self.cmp)(e, probe) != Ordering::Greater)
    }

    /// Global `[lo, hi)` window of elements comparing equal to the probe.
    fn equal_run(&self, probe: &E) -> (usize, usize) {
        (
            self.global_of(self.lower_slot(probe)),
            self.global_of(self.upper_slot(probe)),
        )
    }

    fn find(&self, probe: &E) -> Option<usize>
    where
        E: PartialEq,
    {
        let (lo, hi) = self.equal_run(probe);
        (lo..hi).find(|&g| self.global_at(g).is_some_and(|e| e == probe))
    }

    fn insert(&mut self, element: E) -> SearchResult
    where
        E: PartialEq,
    {
        let (lo, hi) = self.equal_run(&element);
        if let Some(g) = (lo..hi).find(|&g| self.global_at(g).is_some_and(|e| *e == element)) {
            return SearchResult::Found(g);
        }
        // not an equal member: insert at the end of the run
        let (s, p) = if hi == self.len() {
            let s = self.sublists.len() - 1;
            (s, self.sublists[s].len())
        } else {
            search::locate_index(&self.fenwick, self.sublists.len(), self.len(), hi).unwrap()
        };
        self.sublists[s].insert(p, element);
        self.fenwick.add_at(s, 1);
        self.mods += 1;
        if self.sublists[s].len() > self.node_capacity {
            self.split_sublist(s);
        }
        SearchResult::InsertAt(hi)
    }

    fn split_sublist(&mut self, idx: usize) {
        let sublist = &mut self.sublists[idx];
        let mid = sublist.len() / 2;
        let new_sublist = sublist.split_off(mid);
        self.sublists.insert(idx + 1, new_sublist);
        self.fenwick = search::rebuilt(&self.sublists);
    }

    fn remove_at(&mut self, index: usize) -> E {
        let (s, p) = search::locate_index(&self.fenwick, self.sublists.len(), self.len(), index)
            .expect("index out of bounds");
        let element = self.sublists[s].remove(p);
        self.fenwick.sub_at(s, 1);
        self.mods += 1;
        if self.sublists[s].is_empty() && s > 0 {
            self.sublists.remove(s);
            self.fenwick = search::rebuilt(&self.sublists);
        }
        element
    }

    fn remove_index_range(&mut self, from: usize, to: usize) {
        for g in (from..to).rev() {
            self.remove_at(g);
        }
    }
}

impl<E: Ord> SortedList<E> {
    /// An empty list under natural ordering.
    pub fn new() -> Self {
        Self::with_order(natural::<E>)
    }
}

impl<E> SortedList<E> {
    /// An empty list under an explicit comparator.
    pub fn with_order(cmp: fn(&E, &E) -> Ordering) -> Self {
        SortedList {
            core: Rc::new(RefCell::new(ListCore::new(cmp))),
        }
    }

    pub fn len(&self) -> usize {
        self.core.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&mut self) {
        self.core.borrow_mut().reset();
    }

    pub fn get(&self, index: usize) -> Option<Ref<'_, E>> {
        Ref::filter_map(self.core.borrow(), |c| c.global_at(index)).ok()
    }

    pub fn first(&self) -> Option<Ref<'_, E>> {
        self.get(0)
    }

    pub fn last(&self) -> Option<Ref<'_, E>> {
        let len = self.len();
        if len == 0 { None } else { self.get(len - 1) }
    }

    /// Removes and returns the element at `index`.
    ///
    /// # Panics
    ///
    /// Panics when `index >= len()`.
    pub fn remove_at(&mut self, index: usize) -> E {
        self.core.borrow_mut().remove_at(index)
    }

    pub fn pop_first(&mut self) -> Option<E> {
        if self.is_empty() { None } else { Some(self.remove_at(0)) }
    }

    pub fn pop_last(&mut self) -> Option<E> {
        let len = self.len();
        if len == 0 { None } else { Some(self.remove_at(len - 1)) }
    }

    /// Keeps only the index window `[from, to)`, shrinking the tail first
    /// so the head pass works on stable indices.
    pub fn truncate_to_range(&mut self, from: usize, to: usize) {
        let mut core = self.core.borrow_mut();
        let len = core.len();
        let to = to.min(len);
        let from = from.min(to);
        core.remove_index_range(to, len);
        core.remove_index_range(0, from);
    }

    /// Removes the index window `[from, to)`.
    pub fn truncate_range(&mut self, from: usize, to: usize) {
        let mut core = self.core.borrow_mut();
        let len = core.len();
        let to = to.min(len);
        let from = from.min(to);
        core.remove_index_range(from, to);
    }

    pub fn iter(&self) -> Iter<E> {
        let core = self.core.borrow();
        Iter {
            pos: 0,
            end: core.len(),
            expected: core.mods,
            core: Rc::clone(&self.core),
        }
    }

    pub fn to_vec(&self) -> Vec<E>
    where
        E: Clone,
    {
        let core = self.core.borrow();
        core.sublists.iter().flatten().cloned().collect()
    }

    /// Live view of the elements in `[from, to)`.
    ///
    /// # Panics
    ///
    /// Panics when `from` orders after `to`.
    pub fn sub_list(&self, from: E, to: E) -> SubList<E> {
        let cmp = self.core.borrow().cmp;
        assert!(
            cmp(&from, &to) != Ordering::Greater,
            "range bounds are reversed"
        );
        SubList {
            core: Rc::clone(&self.core),
            min: Some(from),
            max: Some(to),
        }
    }

    /// Live view of the elements strictly before `to`.
    pub fn head_list(&self, to: E) -> SubList<E> {
        SubList {
            core: Rc::clone(&self.core),
            min: None,
            max: Some(to),
        }
    }

    /// Live view of the elements at or after `from`.
    pub fn tail_list(&self, from: E) -> SubList<E> {
        SubList {
            core: Rc::clone(&self.core),
            min: Some(from),
            max: None,
        }
    }

    /// Wrapping sum of the per-element hashes: set-style hashing, which is
    /// insensitive to element positions by construction.
    pub fn set_hash(&self) -> u64
    where
        E: Hash,
    {
        let core = self.core.borrow();
        let mut sum = 0u64;
        for element in core.sublists.iter().flatten() {
            let mut hasher = DefaultHasher::new();
            element.hash(&mut hasher);
            sum = sum.wrapping_add(hasher.finish());
        }
        sum
    }
}

impl<E: PartialEq> SortedList<E> {
    /// Inserts `element` at its sorted position.
    ///
    /// Returns `Found(i)` without mutating when an equal element already
    /// sits at index `i`, or `InsertAt(i)` after inserting at `i`.
    pub fn insert(&mut self, element: E) -> SearchResult {
        self.core.borrow_mut().insert(element)
    }

    /// [`SortedList::insert`] collapsed to "did anything change".
    pub fn add(&mut self, element: E) -> bool {
        !self.insert(element).is_found()
    }

    pub fn contains(&self, element: &E) -> bool {
        self.core.borrow().find(element).is_some()
    }

    pub fn index_of(&self, element: &E) -> Option<usize> {
        self.core.borrow().find(element)
    }

    pub fn remove(&mut self, element: &E) -> Option<E> {
        let mut core = self.core.borrow_mut();
        let g = core.find(element)?;
        Some(core.remove_at(g))
    }

    /// Position-sensitive equality against a slice.
    pub fn eq_as_sequence(&self, other: &[E]) -> bool {
        let core = self.core.borrow();
        core.len() == other.len()
            && core.sublists.iter().flatten().zip(other).all(|(a, b)| a == b)
    }

    /// Position-insensitive equality: same length, every element present.
    pub fn eq_as_set(&self, other: &[E]) -> bool {
        self.len() == other.len() && other.iter().all(|e| self.contains(e))
    }
}

impl<E: Ord> Default for SortedList<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: Ord, const N: usize> From<[E; N]> for SortedList<E> {
    fn from(arr: [E; N]) -> Self {
        let mut list = SortedList::new();
        for element in arr {
            list.insert(element);
        }
        list
    }
}

impl<E: Clone> Clone for SortedList<E> {
    /// Deep copy; existing views keep pointing at the original storage.
    fn clone(&self) -> Self {
        let core = self.core.borrow();
        SortedList {
            core: Rc::new(RefCell::new(ListCore {
                sublists: core.sublists.clone(),
                fenwick: core.fenwick.clone(),
                node_capacity: core.node_capacity,
                cmp: core.cmp,
                mods: 0,
            })),
        }
    }
}

impl<E: PartialEq> PartialEq for SortedList<E> {
    fn eq(&self, other: &Self) -> bool {
        if Rc::ptr_eq(&self.core, &other.core) {
            return true;
        }
        let a = self.core.borrow();
        let b = other.core.borrow();
        a.len() == b.len()
            && a.sublists
                .iter()
                .flatten()
                .zip(b.sublists.iter().flatten())
                .all(|(x, y)| x == y)
    }
}

impl<E: fmt::Debug> fmt::Debug for SortedList<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let core = self.core.borrow();
        f.debug_list().entries(core.sublists.iter().flatten()).finish()
    }
}

impl<E> SubList<E> {
    /// Current `[lo, hi)` global index window; recomputed on every call.
    fn window(&self, core: &ListCore<E>) -> (usize, usize) {
        let lo = self
            .min
            .as_ref()
            .map_or(0, |m| core.global_of(core.lower_slot(m)));
        let hi = self
            .max
            .as_ref()
            .map_or(core.len(), |m| core.global_of(core.lower_slot(m)));
        (lo, hi)
    }

    fn in_range(&self, cmp: fn(&E, &E) -> Ordering, element: &E) -> bool {
        let above_min = self
            .min
            .as_ref()
            .is_none_or(|m| cmp(element, m) != Ordering::Less);
        let below_max = self
            .max
            .as_ref()
            .is_none_or(|m| cmp(element, m) == Ordering::Less);
        above_min && below_max
    }

    pub fn len(&self) -> usize {
        let core = self.core.borrow();
        let (lo, hi) = self.window(&core);
        hi - lo
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// View-relative index access.
    pub fn get(&self, index: usize) -> Option<Ref<'_, E>> {
        let core = self.core.borrow();
        let (lo, hi) = self.window(&core);
        if index >= hi - lo {
            return None;
        }
        Ref::filter_map(core, |c| c.global_at(lo + index)).ok()
    }

    pub fn first(&self) -> Option<Ref<'_, E>> {
        self.get(0)
    }

    pub fn last(&self) -> Option<Ref<'_, E>> {
        let len = self.len();
        if len == 0 { None } else { self.get(len - 1) }
    }

    pub fn iter(&self) -> Iter<E> {
        let core = self.core.borrow();
        let (lo, hi) = self.window(&core);
        Iter {
            pos: lo,
            end: hi,
            expected: core.mods,
            core: Rc::clone(&self.core),
        }
    }

    pub fn to_vec(&self) -> Vec<E>
    where
        E: Clone,
    {
        let core = self.core.borrow();
        let (lo, hi) = self.window(&core);
        (lo..hi).filter_map(|g| core.global_at(g).cloned()).collect()
    }

    /// Narrows this view further. Panics when the new bounds widen or
    /// reverse the current ones.
    pub fn sub_list(&self, from: E, to: E) -> SubList<E> {
        let cmp = self.core.borrow().cmp;
        assert!(cmp(&from, &to) != Ordering::Greater, "range bounds are reversed");
        assert!(
            self.in_range(cmp, &from),
            "sub-range start lies outside this view"
        );
        let max_ok = match (&self.max, &to) {
            (Some(max), to) => cmp(to, max) != Ordering::Greater,
            (None, _) => true,
        };
        assert!(max_ok, "sub-range end lies outside this view");
        SubList {
            core: Rc::clone(&self.core),
            min: Some(from),
            max: Some(to),
        }
    }
}

impl<E: PartialEq> SubList<E> {
    /// Inserts through the view. Elements outside the view's bounds are
    /// rejected with [`Error::KeyOutOfRange`]; the returned indices are
    /// view-relative.
    pub fn insert(&mut self, element: E) -> Result<SearchResult> {
        let mut core = self.core.borrow_mut();
        if !self.in_range(core.cmp, &element) {
            return Err(Error::KeyOutOfRange);
        }
        let lo = self
            .min
            .as_ref()
            .map_or(0, |m| core.global_of(core.lower_slot(m)));
        Ok(match core.insert(element) {
            SearchResult::Found(g) => SearchResult::Found(g - lo),
            SearchResult::InsertAt(g) => SearchResult::InsertAt(g - lo),
        })
    }

    pub fn contains(&self, element: &E) -> bool {
        self.index_of(element).is_some()
    }

    /// View-relative index of `element`, when it lies inside the window.
    pub fn index_of(&self, element: &E) -> Option<usize> {
        let core = self.core.borrow();
        let g = core.find(element)?;
        let (lo, hi) = self.window(&core);
        if g >= lo && g < hi { Some(g - lo) } else { None }
    }

    /// Removes through the view; elements outside the bounds are untouched.
    pub fn remove(&mut self, element: &E) -> Option<E> {
        let mut core = self.core.borrow_mut();
        if !self.in_range(core.cmp, element) {
            return None;
        }
        let g = core.find(element)?;
        Some(core.remove_at(g))
    }
}

impl<E: Clone> Iterator for Iter<E> {
    type Item = E;

    fn next(&mut self) -> Option<E> {
        let core = self.core.borrow();
        assert!(
            core.mods == self.expected,
            "sorted list was structurally modified during iteration"
        );
        if self.pos >= self.end {
            return None;
        }
        let item = core.global_at(self.pos).cloned();
        self.pos += 1;
        item
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.end.saturating_sub(self.pos);
        (remaining, Some(remaining))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_sorted_unique_order() {
        let mut list = SortedList::new();
        for x in [5, 1, 9, 1, 5, 3, 7] {
            list.insert(x);
        }
        assert_eq!(list.to_vec(), vec![1, 3, 5, 7, 9]);
        assert_eq!(list.insert(5), SearchResult::Found(2));
        assert_eq!(list.insert(4), SearchResult::InsertAt(2));
        assert_eq!(list.index_of(&4), Some(2));
        assert_eq!(*list.first().unwrap(), 1);
        assert_eq!(*list.last().unwrap(), 9);
    }

    #[test]
    fn index_key_bijection_holds() {
        let mut list = SortedList::new();
        for x in 0..200 {
            list.insert((x * 37) % 101);
        }
        for i in 0..list.len() {
            let e = *list.get(i).unwrap();
            assert_eq!(list.index_of(&e), Some(i));
        }
    }

    #[test]
    fn comparator_equal_run_resolved_by_eq() {
        // ordered by the first field only; full-pair equality
        fn by_first(a: &(u32, u32), b: &(u32, u32)) -> Ordering {
            a.0.cmp(&b.0)
        }
        let mut list = SortedList::with_order(by_first);
        assert!(!list.insert((1, 1)).is_found());
        assert!(!list.insert((1, 2)).is_found());
        assert!(!list.insert((1, 3)).is_found());
        // an existing member of the run is found, not duplicated
        assert_eq!(list.insert((1, 2)), SearchResult::Found(1));
        assert_eq!(list.len(), 3);
        // a new comparator-equal member lands at the end of the run
        assert_eq!(list.insert((1, 4)), SearchResult::InsertAt(3));
        assert_eq!(list.index_of(&(1, 3)), Some(2));
    }

    #[test]
    fn removal_by_value_and_index() {
        let mut list = SortedList::from([2, 4, 6, 8]);
        assert_eq!(list.remove(&4), Some(4));
        assert_eq!(list.remove(&5), None);
        assert_eq!(list.remove_at(0), 2);
        assert_eq!(list.to_vec(), vec![6, 8]);
        assert_eq!(list.pop_first(), Some(6));
        assert_eq!(list.pop_last(), Some(8));
        assert_eq!(list.pop_first(), None);
    }

    #[test]
    #[should_panic(expected = "index out of bounds")]
    fn remove_at_past_end_panics() {
        let mut list = SortedList::from([1]);
        list.remove_at(1);
    }

    #[test]
    fn truncation_passes() {
        let mut list = SortedList::from([0, 1, 2, 3, 4, 5, 6, 7]);
        list.truncate_to_range(2, 6);
        assert_eq!(list.to_vec(), vec![2, 3, 4, 5]);
        list.truncate_range(1, 3);
        assert_eq!(list.to_vec(), vec![2, 5]);
    }

    #[test]
    fn sub_list_tracks_parent() {
        let mut list = SortedList::from([1, 3, 5, 7]);
        let view = list.sub_list(2, 6);
        assert_eq!(view.to_vec(), vec![3, 5]);
        list.insert(4);
        assert_eq!(view.to_vec(), vec![3, 4, 5]);
        assert_eq!(view.index_of(&5), Some(2));
        assert_eq!(view.index_of(&7), None);
    }

    #[test]
    fn sub_list_write_through() {
        let list = SortedList::from([1, 3, 5, 7]);
        let mut view = list.tail_list(4);
        assert_eq!(view.insert(6), Ok(SearchResult::InsertAt(1)));
        assert_eq!(view.insert(2), Err(Error::KeyOutOfRange));
        assert_eq!(view.remove(&5), Some(5));
        assert_eq!(view.remove(&1), None);
        assert_eq!(list.to_vec(), vec![1, 3, 6, 7]);
    }

    #[test]
    #[should_panic(expected = "sub-range end lies outside this view")]
    fn nested_sub_list_cannot_widen() {
        let list = SortedList::from([1, 2, 3]);
        let view = list.sub_list(1, 2);
        let _ = view.sub_list(1, 3);
    }

    #[test]
    #[should_panic(expected = "structurally modified during iteration")]
    fn iterator_fails_fast() {
        let mut list = SortedList::from([1, 2, 3]);
        let mut iter = list.iter();
        assert_eq!(iter.next(), Some(1));
        list.insert(10);
        iter.next();
    }

    #[test]
    fn split_keeps_order_across_sublists() {
        let mut list = SortedList::new();
        for x in (0..500).rev() {
            list.insert(x);
        }
        assert_eq!(list.len(), 500);
        for i in 0..500 {
            assert_eq!(*list.get(i).unwrap(), i);
        }
    }

    #[test]
    fn sequence_and_set_equality_split() {
        let list = SortedList::from([3, 1, 2]);
        assert!(list.eq_as_sequence(&[1, 2, 3]));
        assert!(!list.eq_as_sequence(&[3, 1, 2]));
        assert!(list.eq_as_set(&[3, 1, 2]));
        assert!(!list.eq_as_set(&[1, 2]));
        let reordered = SortedList::from([2, 3, 1]);
        assert_eq!(list.set_hash(), reordered.set_hash());
    }
}
