//! Sorted, index-addressable map with live range views and fail-fast
//! iteration.
//!
//! Keys and values travel together as `(K, V)` entries in the same
//! two-level storage the sorted list uses, which keeps them in lock-step by
//! construction. Two structural counters (`key_mods`, `val_mods`) drive the
//! fail-fast checks: inserts and removals bump both, value replacement
//! bumps only `val_mods`. All range views share the root's core, so a
//! mutation through any handle is counted exactly once and observed by
//! every live iterator.

use std::borrow::Borrow;
use std::cell::{Ref, RefCell};
use std::collections::hash_map::DefaultHasher;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::rc::Rc;

use ftree::FenwickTree;

use crate::error::{Error, Result};
use crate::search;

const NODE_CAPACITY: usize = 64;

const ITER_CONFLICT: &str = "map was structurally modified during iteration";

/// A sorted map whose entries are also addressable by index.
///
/// Key lookups are O(log n); index lookups are O(log n) through the Fenwick
/// tree over sublist lengths. [`IndexedMap::sub_map`] and friends return
/// live views over the same storage.
pub struct IndexedMap<K, V> {
    core: Rc<RefCell<MapCore<K, V>>>,
}

/// A live, key-bounded view of an [`IndexedMap`].
///
/// Bounds are min-inclusive, max-exclusive, `None` = open. The index window
/// is recomputed against the current backing storage at the start of every
/// operation; nothing is cached. Writes outside the bounds hard-fail
/// through [`SubMap::insert`] and soft-fail through [`SubMap::offer`].
pub struct SubMap<K, V> {
    core: Rc<RefCell<MapCore<K, V>>>,
    min: Option<K>,
    max: Option<K>,
}

struct MapCore<K, V> {
    sublists: Vec<Vec<(K, V)>>,
    fenwick: FenwickTree<usize>,
    node_capacity: usize,
    key_mods: u64,
    val_mods: u64,
}

/// Shared borrow of a map core.
///
/// With `std::borrow::Borrow` in scope for the `K: Borrow<Q>` lookup
/// bounds, a plain `.borrow()` on the `Rc` handle resolves to the trait
/// method on the `Rc` itself; the cell borrow has to be named explicitly.
fn shared<K, V>(core: &Rc<RefCell<MapCore<K, V>>>) -> Ref<'_, MapCore<K, V>> {
    RefCell::borrow(core)
}

impl<K, V> MapCore<K, V> {
    fn new() -> Self {
        let mut core = MapCore {
            sublists: Vec::new(),
            fenwick: FenwickTree::new(),
            node_capacity: NODE_CAPACITY,
            key_mods: 0,
            val_mods: 0,
        };
        core.reset();
        core
    }

    fn reset(&mut self) {
        self.sublists = vec![Vec::with_capacity(self.node_capacity)];
        self.fenwick = FenwickTree::new();
        self.fenwick.push(0);
        self.key_mods += 1;
        self.val_mods += 1;
    }

    fn len(&self) -> usize {
        self.fenwick.prefix_sum(self.sublists.len(), 0)
    }

    fn entry_at(&self, index: usize) -> Option<&(K, V)> {
        search::locate_index(&self.fenwick, self.sublists.len(), self.len(), index)
            .map(|(s, p)| &self.sublists[s][p])
    }

    fn split_sublist(&mut self, idx: usize) {
        let sublist = &mut self.sublists[idx];
        let mid = sublist.len() / 2;
        let new_sublist = sublist.split_off(mid);
        self.sublists.insert(idx + 1, new_sublist);
        self.fenwick = search::rebuilt(&self.sublists);
    }

    fn drop_if_empty(&mut self, idx: usize) {
        if self.sublists[idx].is_empty() && idx > 0 {
            self.sublists.remove(idx);
            self.fenwick = search::rebuilt(&self.sublists);
        }
    }

    fn remove_global(&mut self, index: usize) -> (K, V) {
        let (s, p) = search::locate_index(&self.fenwick, self.sublists.len(), self.len(), index)
            .expect("index out of bounds");
        let entry = self.sublists[s].remove(p);
        self.fenwick.sub_at(s, 1);
        self.key_mods += 1;
        self.val_mods += 1;
        self.drop_if_empty(s);
        entry
    }

    fn set_value_global(&mut self, index: usize, value: V) -> V {
        let (s, p) = search::locate_index(&self.fenwick, self.sublists.len(), self.len(), index)
            .expect("index out of bounds");
        self.val_mods += 1;
        std::mem::replace(&mut self.sublists[s][p].1, value)
    }
}

impl<K: Ord, V> MapCore<K, V> {
    fn locate_key<Q>(&self, key: &Q) -> (usize, Option<usize>)
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        search::locate(&self.sublists, |(k, _)| k.borrow().cmp(key))
    }

    /// Global index of the first entry with key `>= key`.
    fn lower_global<Q>(&self, key: &Q) -> usize
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let slot = search::partition(&self.sublists, |(k, _)| k.borrow() < key);
        self.fenwick.prefix_sum(slot.0, slot.1)
    }

    fn rank_of_key<Q>(&self, key: &Q) -> Option<usize>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let g = self.lower_global(key);
        match self.entry_at(g) {
            Some((k, _)) if k.borrow() == key => Some(g),
            _ => None,
        }
    }

    fn insert(&mut self, key: K, value: V) -> Option<V> {
        let (s, pos) = self.locate_key(&key);
        let sublist = &mut self.sublists[s];
        if let Some(j) = pos {
            self.val_mods += 1;
            Some(std::mem::replace(&mut sublist[j].1, value))
        } else {
            let insert_pos = sublist.partition_point(|(k, _)| *k < key);
            sublist.insert(insert_pos, (key, value));
            self.fenwick.add_at(s, 1);
            self.key_mods += 1;
            self.val_mods += 1;
            if self.sublists[s].len() > self.node_capacity {
                self.split_sublist(s);
            }
            None
        }
    }

    fn remove_key<Q>(&mut self, key: &Q) -> Option<(K, V)>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let (s, pos) = self.locate_key(key);
        let j = pos?;
        let entry = self.sublists[s].remove(j);
        self.fenwick.sub_at(s, 1);
        self.key_mods += 1;
        self.val_mods += 1;
        self.drop_if_empty(s);
        Some(entry)
    }
}

impl<K: Ord, V> IndexedMap<K, V> {
    pub fn new() -> Self {
        IndexedMap {
            core: Rc::new(RefCell::new(MapCore::new())),
        }
    }

    pub fn len(&self) -> usize {
        shared(&self.core).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&mut self) {
        self.core.borrow_mut().reset();
    }

    /// Inserts or replaces; returns the previous value for the key.
    pub fn insert(&mut self, key: K, value: V) -> Option<V> {
        self.core.borrow_mut().insert(key, value)
    }

    /// Inserts only when `key` is absent. The soft-failing counterpart of
    /// [`IndexedMap::insert`]: a present key is a no-op returning `false`.
    pub fn offer(&mut self, key: K, value: V) -> bool {
        let mut core = self.core.borrow_mut();
        if core.locate_key(&key).1.is_some() {
            return false;
        }
        core.insert(key, value);
        true
    }

    pub fn get<Q>(&self, key: &Q) -> Option<Ref<'_, V>>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        Ref::filter_map(shared(&self.core), |c| {
            let (s, pos) = c.locate_key(key);
            pos.map(|j| &c.sublists[s][j].1)
        })
        .ok()
    }

    pub fn get_key_value<Q>(&self, key: &Q) -> Option<Ref<'_, (K, V)>>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        Ref::filter_map(shared(&self.core), |c| {
            let (s, pos) = c.locate_key(key);
            pos.map(|j| &c.sublists[s][j])
        })
        .ok()
    }

    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        shared(&self.core).locate_key(key).1.is_some()
    }

    pub fn remove<Q>(&mut self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.remove_entry(key).map(|(_, v)| v)
    }

    pub fn remove_entry<Q>(&mut self, key: &Q) -> Option<(K, V)>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.core.borrow_mut().remove_key(key)
    }

    pub fn key_at(&self, index: usize) -> Option<Ref<'_, K>> {
        Ref::filter_map(shared(&self.core), |c| c.entry_at(index).map(|(k, _)| k)).ok()
    }

    pub fn value_at(&self, index: usize) -> Option<Ref<'_, V>> {
        Ref::filter_map(shared(&self.core), |c| c.entry_at(index).map(|(_, v)| v)).ok()
    }

    pub fn entry_at(&self, index: usize) -> Option<Ref<'_, (K, V)>> {
        Ref::filter_map(shared(&self.core), |c| c.entry_at(index)).ok()
    }

    /// Replaces the value at `index`, leaving its key in place.
    ///
    /// # Panics
    ///
    /// Panics when `index >= len()`.
    pub fn set_value_at(&mut self, index: usize, value: V) -> V {
        self.core.borrow_mut().set_value_global(index, value)
    }

    pub fn index_of_key<Q>(&self, key: &Q) -> Option<usize>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        shared(&self.core).rank_of_key(key)
    }

    /// Index of the first entry holding `value`; a linear scan.
    pub fn index_of_value(&self, value: &V) -> Option<usize>
    where
        V: PartialEq,
    {
        let core = shared(&self.core);
        core.sublists
            .iter()
            .flatten()
            .position(|(_, v)| v == value)
    }

    /// Removes and returns the entry at `index`.
    ///
    /// # Panics
    ///
    /// Panics when `index >= len()`.
    pub fn remove_at(&mut self, index: usize) -> (K, V) {
        self.core.borrow_mut().remove_global(index)
    }

    pub fn first_key_value(&self) -> Option<Ref<'_, (K, V)>> {
        self.entry_at(0)
    }

    pub fn last_key_value(&self) -> Option<Ref<'_, (K, V)>> {
        let len = self.len();
        if len == 0 { None } else { self.entry_at(len - 1) }
    }

    pub fn pop_first(&mut self) -> Option<(K, V)> {
        if self.is_empty() { None } else { Some(self.remove_at(0)) }
    }

    pub fn pop_last(&mut self) -> Option<(K, V)> {
        let len = self.len();
        if len == 0 { None } else { Some(self.remove_at(len - 1)) }
    }

    /// Keeps only the entries for which `f` returns `true`.
    pub fn retain<F>(&mut self, mut f: F)
    where
        F: FnMut(&K, &mut V) -> bool,
    {
        let mut core = self.core.borrow_mut();
        let mut removed = 0usize;
        for sublist in &mut core.sublists {
            let before = sublist.len();
            sublist.retain_mut(|(k, v)| f(&*k, v));
            removed += before - sublist.len();
        }
        if removed > 0 {
            core.sublists.retain(|s| !s.is_empty());
            if core.sublists.is_empty() {
                let capacity = core.node_capacity;
                core.sublists.push(Vec::with_capacity(capacity));
            }
            core.fenwick = search::rebuilt(&core.sublists);
            core.key_mods += 1;
            core.val_mods += 1;
        }
    }

    pub fn iter(&self) -> Iter<K, V> {
        let core = shared(&self.core);
        Iter {
            pos: 0,
            end: core.len(),
            expected_keys: core.key_mods,
            expected_vals: core.val_mods,
            core: Rc::clone(&self.core),
        }
    }

    pub fn keys(&self) -> Keys<K, V> {
        let core = shared(&self.core);
        Keys {
            pos: 0,
            end: core.len(),
            expected_keys: core.key_mods,
            core: Rc::clone(&self.core),
        }
    }

    pub fn values(&self) -> Values<K, V> {
        let core = shared(&self.core);
        Values {
            pos: 0,
            end: core.len(),
            expected_vals: core.val_mods,
            core: Rc::clone(&self.core),
        }
    }

    /// An entry cursor supporting removal of the last yielded entry.
    pub fn cursor(&self) -> Cursor<K, V> {
        let core = shared(&self.core);
        Cursor {
            pos: 0,
            end: core.len(),
            expected_keys: core.key_mods,
            expected_vals: core.val_mods,
            last: None,
            core: Rc::clone(&self.core),
        }
    }

    /// Live view of the entries with keys in `[from, to)`.
    ///
    /// # Panics
    ///
    /// Panics when `from > to`.
    pub fn sub_map(&self, from: K, to: K) -> SubMap<K, V> {
        assert!(from <= to, "range bounds are reversed");
        SubMap {
            core: Rc::clone(&self.core),
            min: Some(from),
            max: Some(to),
        }
    }

    /// Live view of the entries with keys strictly before `to`.
    pub fn head_map(&self, to: K) -> SubMap<K, V> {
        SubMap {
            core: Rc::clone(&self.core),
            min: None,
            max: Some(to),
        }
    }

    /// Live view of the entries with keys at or after `from`.
    pub fn tail_map(&self, from: K) -> SubMap<K, V> {
        SubMap {
            core: Rc::clone(&self.core),
            min: Some(from),
            max: None,
        }
    }

    /// Order-insensitive hash over the entries, in the classic
    /// sum-of-`hash(k) ^ hash(v)` shape.
    pub fn entry_hash(&self) -> u64
    where
        K: Hash,
        V: Hash,
    {
        let core = shared(&self.core);
        entry_hash_over(core.sublists.iter().flatten())
    }
}

fn entry_hash_over<'a, K: Hash + 'a, V: Hash + 'a>(
    entries: impl Iterator<Item = &'a (K, V)>,
) -> u64 {
    let mut sum = 0u64;
    for (k, v) in entries {
        let mut hk = DefaultHasher::new();
        k.hash(&mut hk);
        let mut hv = DefaultHasher::new();
        v.hash(&mut hv);
        sum = sum.wrapping_add(hk.finish() ^ hv.finish());
    }
    sum
}

impl<K: Ord, V> Default for IndexedMap<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Ord, V, const N: usize> From<[(K, V); N]> for IndexedMap<K, V> {
    fn from(arr: [(K, V); N]) -> Self {
        let mut map = IndexedMap::new();
        for (k, v) in arr {
            map.insert(k, v);
        }
        map
    }
}

impl<K: Ord + Clone, V: Clone> Clone for IndexedMap<K, V> {
    /// Deep copy; existing views keep pointing at the original storage.
    fn clone(&self) -> Self {
        let core = shared(&self.core);
        IndexedMap {
            core: Rc::new(RefCell::new(MapCore {
                sublists: core.sublists.clone(),
                fenwick: core.fenwick.clone(),
                node_capacity: core.node_capacity,
                key_mods: 0,
                val_mods: 0,
            })),
        }
    }
}

impl<K: PartialEq, V: PartialEq> PartialEq for IndexedMap<K, V> {
    fn eq(&self, other: &Self) -> bool {
        if Rc::ptr_eq(&self.core, &other.core) {
            return true;
        }
        let a = shared(&self.core);
        let b = shared(&other.core);
        a.len() == b.len()
            && a.sublists
                .iter()
                .flatten()
                .zip(b.sublists.iter().flatten())
                .all(|(x, y)| x == y)
    }
}

impl<K: fmt::Debug, V: fmt::Debug> fmt::Debug for IndexedMap<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let core = shared(&self.core);
        f.debug_map()
            .entries(core.sublists.iter().flatten().map(|(k, v)| (k, v)))
            .finish()
    }
}

impl<K: Ord, V> SubMap<K, V> {
    /// Current `[lo, hi)` global window; recomputed on every call.
    fn window(&self, core: &MapCore<K, V>) -> (usize, usize) {
        let lo = self.min.as_ref().map_or(0, |m| core.lower_global(m));
        let hi = self.max.as_ref().map_or(core.len(), |m| core.lower_global(m));
        (lo, hi)
    }

    fn in_range<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let above_min = self.min.as_ref().is_none_or(|m| m.borrow() <= key);
        let below_max = self.max.as_ref().is_none_or(|m| key < m.borrow());
        above_min && below_max
    }

    pub fn len(&self) -> usize {
        let core = shared(&self.core);
        let (lo, hi) = self.window(&core);
        hi - lo
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn get<Q>(&self, key: &Q) -> Option<Ref<'_, V>>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        if !self.in_range(key) {
            return None;
        }
        Ref::filter_map(shared(&self.core), |c| {
            let (s, pos) = c.locate_key(key);
            pos.map(|j| &c.sublists[s][j].1)
        })
        .ok()
    }

    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.in_range(key) && shared(&self.core).locate_key(key).1.is_some()
    }

    /// Hard-failing insert: a key outside the view's bounds is
    /// [`Error::KeyOutOfRange`].
    pub fn insert(&mut self, key: K, value: V) -> Result<Option<V>> {
        if !self.in_range(&key) {
            return Err(Error::KeyOutOfRange);
        }
        Ok(self.core.borrow_mut().insert(key, value))
    }

    /// Soft-failing insert-if-absent: out-of-range and present keys are
    /// both no-ops returning `false`.
    pub fn offer(&mut self, key: K, value: V) -> bool {
        if !self.in_range(&key) {
            return false;
        }
        let mut core = self.core.borrow_mut();
        if core.locate_key(&key).1.is_some() {
            return false;
        }
        core.insert(key, value);
        true
    }

    /// Removes through the view; keys outside the bounds are untouched.
    pub fn remove<Q>(&mut self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        if !self.in_range(key) {
            return None;
        }
        self.core.borrow_mut().remove_key(key).map(|(_, v)| v)
    }

    pub fn key_at(&self, index: usize) -> Option<Ref<'_, K>> {
        self.entry_at(index).map(|r| Ref::map(r, |(k, _)| k))
    }

    pub fn value_at(&self, index: usize) -> Option<Ref<'_, V>> {
        self.entry_at(index).map(|r| Ref::map(r, |(_, v)| v))
    }

    /// View-relative index access.
    pub fn entry_at(&self, index: usize) -> Option<Ref<'_, (K, V)>> {
        let core = shared(&self.core);
        let (lo, hi) = self.window(&core);
        if index >= hi - lo {
            return None;
        }
        Ref::filter_map(core, |c| c.entry_at(lo + index)).ok()
    }

    /// Replaces the value at the view-relative `index`.
    ///
    /// # Panics
    ///
    /// Panics when `index >= len()`.
    pub fn set_value_at(&mut self, index: usize, value: V) -> V {
        let mut core = self.core.borrow_mut();
        let (lo, hi) = self.window(&core);
        assert!(index < hi - lo, "index out of bounds");
        core.set_value_global(lo + index, value)
    }

    /// Removes the entry at the view-relative `index`.
    ///
    /// # Panics
    ///
    /// Panics when `index >= len()`.
    pub fn remove_at(&mut self, index: usize) -> (K, V) {
        let mut core = self.core.borrow_mut();
        let (lo, hi) = self.window(&core);
        assert!(index < hi - lo, "index out of bounds");
        core.remove_global(lo + index)
    }

    pub fn index_of_key<Q>(&self, key: &Q) -> Option<usize>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        if !self.in_range(key) {
            return None;
        }
        let core = shared(&self.core);
        let g = core.rank_of_key(key)?;
        let (lo, _) = self.window(&core);
        Some(g - lo)
    }

    pub fn first_key_value(&self) -> Option<Ref<'_, (K, V)>> {
        self.entry_at(0)
    }

    pub fn last_key_value(&self) -> Option<Ref<'_, (K, V)>> {
        let len = self.len();
        if len == 0 { None } else { self.entry_at(len - 1) }
    }

    pub fn iter(&self) -> Iter<K, V> {
        let core = shared(&self.core);
        let (lo, hi) = self.window(&core);
        Iter {
            pos: lo,
            end: hi,
            expected_keys: core.key_mods,
            expected_vals: core.val_mods,
            core: Rc::clone(&self.core),
        }
    }

    pub fn keys(&self) -> Keys<K, V> {
        let core = shared(&self.core);
        let (lo, hi) = self.window(&core);
        Keys {
            pos: lo,
            end: hi,
            expected_keys: core.key_mods,
            core: Rc::clone(&self.core),
        }
    }

    pub fn values(&self) -> Values<K, V> {
        let core = shared(&self.core);
        let (lo, hi) = self.window(&core);
        Values {
            pos: lo,
            end: hi,
            expected_vals: core.val_mods,
            core: Rc::clone(&self.core),
        }
    }

    /// Narrows this view further. Panics when the new bounds widen or
    /// reverse the current ones.
    pub fn sub_map(&self, from: K, to: K) -> SubMap<K, V> {
        assert!(from <= to, "range bounds are reversed");
        assert!(
            self.min.as_ref().is_none_or(|m| *m <= from),
            "sub-range start lies outside this view"
        );
        assert!(
            self.max.as_ref().is_none_or(|m| to <= *m),
            "sub-range end lies outside this view"
        );
        SubMap {
            core: Rc::clone(&self.core),
            min: Some(from),
            max: Some(to),
        }
    }

    /// Snapshot of the visible entries.
    pub fn entries(&self) -> Vec<(K, V)>
    where
        K: Clone,
        V: Clone,
    {
        let core = shared(&self.core);
        let (lo, hi) = self.window(&core);
        (lo..hi).filter_map(|g| core.entry_at(g).cloned()).collect()
    }

    pub fn entry_hash(&self) -> u64
    where
        K: Hash,
        V: Hash,
    {
        let core = shared(&self.core);
        let (lo, hi) = self.window(&core);
        entry_hash_over((lo..hi).filter_map(|g| core.entry_at(g)))
    }
}

impl<K: Ord + PartialEq, V: PartialEq> PartialEq for SubMap<K, V> {
    fn eq(&self, other: &Self) -> bool {
        let a = shared(&self.core);
        let b = shared(&other.core);
        let (alo, ahi) = self.window(&a);
        let (blo, bhi) = other.window(&b);
        ahi - alo == bhi - blo
            && (0..ahi - alo).all(|i| a.entry_at(alo + i) == b.entry_at(blo + i))
    }
}

impl<K: Ord + fmt::Debug, V: fmt::Debug> fmt::Debug for SubMap<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let core = shared(&self.core);
        let (lo, hi) = self.window(&core);
        f.debug_map()
            .entries((lo..hi).filter_map(|g| core.entry_at(g)).map(|(k, v)| (k, v)))
            .finish()
    }
}

// --- Iterators ---

/// Fail-fast entry iterator; checks both structural counters.
pub struct Iter<K, V> {
    core: Rc<RefCell<MapCore<K, V>>>,
    pos: usize,
    end: usize,
    expected_keys: u64,
    expected_vals: u64,
}

/// Fail-fast key iterator; value replacement does not disturb it.
pub struct Keys<K, V> {
    core: Rc<RefCell<MapCore<K, V>>>,
    pos: usize,
    end: usize,
    expected_keys: u64,
}

/// Fail-fast value iterator; also trips on value replacement.
pub struct Values<K, V> {
    core: Rc<RefCell<MapCore<K, V>>>,
    pos: usize,
    end: usize,
    expected_vals: u64,
}

impl<K: Clone, V: Clone> Iterator for Iter<K, V> {
    type Item = (K, V);

    fn next(&mut self) -> Option<(K, V)> {
        let core = shared(&self.core);
        assert!(
            core.key_mods == self.expected_keys && core.val_mods == self.expected_vals,
            "{ITER_CONFLICT}"
        );
        if self.pos >= self.end {
            return None;
        }
        let item = core.entry_at(self.pos).cloned();
        self.pos += 1;
        item
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.end.saturating_sub(self.pos);
        (remaining, Some(remaining))
    }
}

impl<K: Clone, V> Iterator for Keys<K, V> {
    type Item = K;

    fn next(&mut self) -> Option<K> {
        let core = shared(&self.core);
        assert!(core.key_mods == self.expected_keys, "{ITER_CONFLICT}");
        if self.pos >= self.end {
            return None;
        }
        let key = core.entry_at(self.pos).map(|(k, _)| k.clone());
        self.pos += 1;
        key
    }
}

impl<K, V: Clone> Iterator for Values<K, V> {
    type Item = V;

    fn next(&mut self) -> Option<V> {
        let core = shared(&self.core);
        assert!(core.val_mods == self.expected_vals, "{ITER_CONFLICT}");
        if self.pos >= self.end {
            return None;
        }
        let value = core.entry_at(self.pos).map(|(_, v)| v.clone());
        self.pos += 1;
        value
    }
}

/// An entry walk that supports removing the last yielded entry.
///
/// [`Cursor::remove_current`] is valid only immediately after a
/// [`Cursor::next`] whose entry has not already been removed; otherwise it
/// is [`Error::NoCurrentEntry`]. The fail-fast counter check applies to
/// both calls, independent of that state rule.
pub struct Cursor<K, V> {
    core: Rc<RefCell<MapCore<K, V>>>,
    pos: usize,
    end: usize,
    expected_keys: u64,
    expected_vals: u64,
    last: Option<usize>,
}

impl<K: Clone, V: Clone> Cursor<K, V> {
    fn check(&self, core: &MapCore<K, V>) {
        assert!(
            core.key_mods == self.expected_keys && core.val_mods == self.expected_vals,
            "{ITER_CONFLICT}"
        );
    }

    pub fn next(&mut self) -> Option<(K, V)> {
        let core = shared(&self.core);
        self.check(&core);
        if self.pos >= self.end {
            return None;
        }
        let item = core.entry_at(self.pos).cloned();
        self.last = Some(self.pos);
        self.pos += 1;
        item
    }

    pub fn remove_current(&mut self) -> Result<(K, V)> {
        let mut core = self.core.borrow_mut();
        self.check(&core);
        let at = self.last.take().ok_or(Error::NoCurrentEntry)?;
        let entry = core.remove_global(at);
        // resynchronize with our own mutation
        self.expected_keys = core.key_mods;
        self.expected_vals = core.val_mods;
        self.pos = at;
        self.end -= 1;
        Ok(entry)
    }
}
