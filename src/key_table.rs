//! Arbitrary-key addressing over a sparse grid.
//!
//! A [`KeyTable`] pairs a sparse table with two key lists held in strict
//! bijection with the axis indices: `row_keys[i]` is the key of grid row
//! `i`. Keys only need `Eq`, so resolution is a linear scan; writes to an
//! unseen key append a fresh row/column, reads never grow anything.

use std::cell::{Ref, RefCell};
use std::fmt;
use std::rc::Rc;

use crate::error::{Error, Result};
use crate::sparse_table::TableCore;

/// A 2-D table addressed by row and column keys.
pub struct KeyTable<R, C, T> {
    core: Rc<RefCell<KeyCore<R, C, T>>>,
}

/// A live single-row map keyed by the column axis.
///
/// Holds the row index resolved at creation; after a row or column removal
/// at or before that index the view reads other rows' cells — keeping it
/// synchronized is the caller's responsibility.
pub struct RowMap<R, C, T> {
    core: Rc<RefCell<KeyCore<R, C, T>>>,
    row: usize,
}

/// Column counterpart of [`RowMap`].
pub struct ColMap<R, C, T> {
    core: Rc<RefCell<KeyCore<R, C, T>>>,
    col: usize,
}

/// A key-bounded view of a [`KeyTable`].
///
/// Stores four optional *inclusive* key bounds and re-resolves them to
/// index windows on every operation, because rows and columns can be
/// inserted, removed or swapped in the parent between calls. Operations on
/// keys that cannot currently be found inside the window fail; row/column
/// structural changes are unsupported.
pub struct KeySubTable<R, C, T> {
    core: Rc<RefCell<KeyCore<R, C, T>>>,
    from_row: Option<R>,
    to_row: Option<R>,
    from_col: Option<C>,
    to_col: Option<C>,
}

struct KeyCore<R, C, T> {
    grid: TableCore<T>,
    row_keys: Vec<R>,
    col_keys: Vec<C>,
}

impl<R: Eq, C: Eq, T> KeyCore<R, C, T> {
    fn new() -> Self {
        KeyCore {
            grid: TableCore::new(),
            row_keys: Vec::new(),
            col_keys: Vec::new(),
        }
    }

    fn row_index(&self, key: &R) -> Option<usize> {
        self.row_keys.iter().position(|k| k == key)
    }

    fn col_index(&self, key: &C) -> Option<usize> {
        self.col_keys.iter().position(|k| k == key)
    }

    fn ensure_row(&mut self, key: R) -> usize {
        match self.row_index(&key) {
            Some(i) => i,
            None => {
                self.row_keys.push(key);
                self.row_keys.len() - 1
            }
        }
    }

    fn ensure_col(&mut self, key: C) -> usize {
        match self.col_index(&key) {
            Some(i) => i,
            None => {
                self.col_keys.push(key);
                self.col_keys.len() - 1
            }
        }
    }
}

impl<R: Eq, C: Eq, T> KeyTable<R, C, T> {
    pub fn new() -> Self {
        KeyTable {
            core: Rc::new(RefCell::new(KeyCore::new())),
        }
    }

    /// Number of rows, i.e. the number of row keys seen so far.
    pub fn row_count(&self) -> usize {
        self.core.borrow().row_keys.len()
    }

    pub fn col_count(&self) -> usize {
        self.core.borrow().col_keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.row_count() == 0 && self.col_count() == 0
    }

    /// Stores `value` under `(row_key, col_key)`, appending a fresh row
    /// and/or column for keys seen for the first time.
    pub fn put(&mut self, row_key: R, col_key: C, value: T) -> Option<T> {
        let mut core = self.core.borrow_mut();
        let r = core.ensure_row(row_key);
        let c = core.ensure_col(col_key);
        core.grid.set(r, c, Some(value))
    }

    /// Reads never create keys: unknown keys simply hold nothing.
    pub fn get(&self, row_key: &R, col_key: &C) -> Option<Ref<'_, T>> {
        Ref::filter_map(self.core.borrow(), |core| {
            let r = core.row_index(row_key)?;
            let c = core.col_index(col_key)?;
            core.grid.cell(r, c)
        })
        .ok()
    }

    /// Empties the cell; both keys stay on their axes.
    pub fn remove(&mut self, row_key: &R, col_key: &C) -> Option<T> {
        let mut core = self.core.borrow_mut();
        let r = core.row_index(row_key)?;
        let c = core.col_index(col_key)?;
        core.grid.set(r, c, None)
    }

    pub fn contains_row_key(&self, key: &R) -> bool {
        self.core.borrow().row_index(key).is_some()
    }

    pub fn contains_col_key(&self, key: &C) -> bool {
        self.core.borrow().col_index(key).is_some()
    }

    pub fn row_index(&self, key: &R) -> Option<usize> {
        self.core.borrow().row_index(key)
    }

    pub fn col_index(&self, key: &C) -> Option<usize> {
        self.core.borrow().col_index(key)
    }

    pub fn row_keys(&self) -> Vec<R>
    where
        R: Clone,
    {
        self.core.borrow().row_keys.clone()
    }

    pub fn col_keys(&self) -> Vec<C>
    where
        C: Clone,
    {
        self.core.borrow().col_keys.clone()
    }

    /// Inserts an empty keyed row before position `pos`.
    pub fn insert_row(&mut self, pos: usize, key: R) -> Result<()> {
        let mut core = self.core.borrow_mut();
        if core.row_index(&key).is_some() {
            return Err(Error::DuplicateKey);
        }
        let len = core.row_keys.len();
        if pos > len {
            return Err(Error::IndexOutOfBounds { index: pos, len });
        }
        core.row_keys.insert(pos, key);
        core.grid.insert_row(pos);
        Ok(())
    }

    /// Inserts an empty keyed column before position `pos`.
    pub fn insert_col(&mut self, pos: usize, key: C) -> Result<()> {
        let mut core = self.core.borrow_mut();
        if core.col_index(&key).is_some() {
            return Err(Error::DuplicateKey);
        }
        let len = core.col_keys.len();
        if pos > len {
            return Err(Error::IndexOutOfBounds { index: pos, len });
        }
        core.col_keys.insert(pos, key);
        core.grid.insert_col(pos);
        Ok(())
    }

    /// Drops the key and its row, renumbering all later rows. Returns
    /// whether the key existed. Backed row/column maps created earlier are
    /// not adjusted.
    pub fn remove_row(&mut self, key: &R) -> bool {
        let mut core = self.core.borrow_mut();
        match core.row_index(key) {
            Some(i) => {
                core.row_keys.remove(i);
                core.grid.remove_row(i);
                true
            }
            None => false,
        }
    }

    pub fn remove_col(&mut self, key: &C) -> bool {
        let mut core = self.core.borrow_mut();
        match core.col_index(key) {
            Some(i) => {
                core.col_keys.remove(i);
                core.grid.remove_col(i);
                true
            }
            None => false,
        }
    }

    /// Exchanges the rows the two keys address by swapping the keys' axis
    /// slots: each key adopts the other's row content, and the key list
    /// shows the swapped order. An absent key is appended (with an empty
    /// row) before the swap, so swapping against a new key creates it.
    pub fn swap_rows(&mut self, k1: R, k2: R) {
        let mut core = self.core.borrow_mut();
        let i = core.ensure_row(k1);
        let j = core.ensure_row(k2);
        core.row_keys.swap(i, j);
    }

    pub fn swap_cols(&mut self, k1: C, k2: C) {
        let mut core = self.core.borrow_mut();
        let i = core.ensure_col(k1);
        let j = core.ensure_col(k2);
        core.col_keys.swap(i, j);
    }

    /// Live single-row map for `key`, or `None` for an unknown key.
    pub fn row(&self, key: &R) -> Option<RowMap<R, C, T>> {
        let row = self.core.borrow().row_index(key)?;
        Some(RowMap {
            core: Rc::clone(&self.core),
            row,
        })
    }

    /// Live single-column map for `key`, or `None` for an unknown key.
    pub fn col(&self, key: &C) -> Option<ColMap<R, C, T>> {
        let col = self.core.borrow().col_index(key)?;
        Some(ColMap {
            core: Rc::clone(&self.core),
            col,
        })
    }

    /// Key-bounded view; all bounds are inclusive, `None` = open.
    ///
    /// Construction only sanity-checks that the named keys currently exist
    /// and are ordered; every later operation re-resolves them.
    pub fn sub_table(
        &self,
        from_row: Option<R>,
        from_col: Option<C>,
        to_row: Option<R>,
        to_col: Option<C>,
    ) -> Result<KeySubTable<R, C, T>> {
        let view = KeySubTable {
            core: Rc::clone(&self.core),
            from_row,
            to_row,
            from_col,
            to_col,
        };
        view.resolve(&self.core.borrow())?;
        Ok(view)
    }

    pub fn clear(&mut self) {
        let mut core = self.core.borrow_mut();
        core.grid.clear();
        core.row_keys.clear();
        core.col_keys.clear();
    }
}

impl<R: Eq, C: Eq, T> Default for KeyTable<R, C, T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: Eq + Clone, C: Eq + Clone, T: Clone> Clone for KeyTable<R, C, T> {
    /// Deep copy; existing views keep pointing at the original storage.
    fn clone(&self) -> Self {
        let core = self.core.borrow();
        let mut grid = TableCore::new();
        for (r, row) in core.grid.to_rows().into_iter().enumerate() {
            for (c, cell) in row.into_iter().enumerate() {
                grid.set(r, c, cell);
            }
        }
        KeyTable {
            core: Rc::new(RefCell::new(KeyCore {
                grid,
                row_keys: core.row_keys.clone(),
                col_keys: core.col_keys.clone(),
            })),
        }
    }
}

impl<R: Eq, C: Eq, T: PartialEq> PartialEq for KeyTable<R, C, T> {
    fn eq(&self, other: &Self) -> bool {
        if Rc::ptr_eq(&self.core, &other.core) {
            return true;
        }
        let a = self.core.borrow();
        let b = other.core.borrow();
        a.row_keys == b.row_keys && a.col_keys == b.col_keys && a.grid == b.grid
    }
}

impl<R, C, T> fmt::Debug for KeyTable<R, C, T>
where
    R: Eq + fmt::Debug,
    C: Eq + fmt::Debug,
    T: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let core = self.core.borrow();
        let mut map = f.debug_map();
        for (r, rk) in core.row_keys.iter().enumerate() {
            let row: Vec<(&C, Option<&T>)> = core
                .col_keys
                .iter()
                .enumerate()
                .map(|(c, ck)| (ck, core.grid.cell(r, c)))
                .collect();
            map.entry(rk, &row);
        }
        map.finish()
    }
}

impl<R: Eq, C: Eq, T> RowMap<R, C, T> {
    /// Number of occupied cells in this row.
    pub fn len(&self) -> usize {
        let core = self.core.borrow();
        (0..core.col_keys.len())
            .filter(|&c| core.grid.cell(self.row, c).is_some())
            .count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The row index this map was resolved to.
    pub fn index(&self) -> usize {
        self.row
    }

    pub fn get(&self, col_key: &C) -> Option<Ref<'_, T>> {
        Ref::filter_map(self.core.borrow(), |core| {
            let c = core.col_index(col_key)?;
            core.grid.cell(self.row, c)
        })
        .ok()
    }

    pub fn contains_key(&self, col_key: &C) -> bool {
        let core = self.core.borrow();
        core.col_index(col_key)
            .is_some_and(|c| core.grid.cell(self.row, c).is_some())
    }

    /// Writes through to the table, appending an unseen column key.
    pub fn insert(&mut self, col_key: C, value: T) -> Option<T> {
        let mut core = self.core.borrow_mut();
        let c = core.ensure_col(col_key);
        core.grid.set(self.row, c, Some(value))
    }

    pub fn remove(&mut self, col_key: &C) -> Option<T> {
        let mut core = self.core.borrow_mut();
        let c = core.col_index(col_key)?;
        core.grid.set(self.row, c, None)
    }

    /// Snapshot of the occupied `(column key, value)` pairs.
    pub fn to_pairs(&self) -> Vec<(C, T)>
    where
        C: Clone,
        T: Clone,
    {
        let core = self.core.borrow();
        core.col_keys
            .iter()
            .enumerate()
            .filter_map(|(c, ck)| {
                core.grid
                    .cell(self.row, c)
                    .map(|v| (ck.clone(), v.clone()))
            })
            .collect()
    }
}

impl<R: Eq, C: Eq, T> ColMap<R, C, T> {
    /// Number of occupied cells in this column.
    pub fn len(&self) -> usize {
        let core = self.core.borrow();
        (0..core.row_keys.len())
            .filter(|&r| core.grid.cell(r, self.col).is_some())
            .count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The column index this map was resolved to.
    pub fn index(&self) -> usize {
        self.col
    }

    pub fn get(&self, row_key: &R) -> Option<Ref<'_, T>> {
        Ref::filter_map(self.core.borrow(), |core| {
            let r = core.row_index(row_key)?;
            core.grid.cell(r, self.col)
        })
        .ok()
    }

    pub fn contains_key(&self, row_key: &R) -> bool {
        let core = self.core.borrow();
        core.row_index(row_key)
            .is_some_and(|r| core.grid.cell(r, self.col).is_some())
    }

    /// Writes through to the table, appending an unseen row key.
    pub fn insert(&mut self, row_key: R, value: T) -> Option<T> {
        let mut core = self.core.borrow_mut();
        let r = core.ensure_row(row_key);
        core.grid.set(r, self.col, Some(value))
    }

    pub fn remove(&mut self, row_key: &R) -> Option<T> {
        let mut core = self.core.borrow_mut();
        let r = core.row_index(row_key)?;
        core.grid.set(r, self.col, None)
    }

    /// Snapshot of the occupied `(row key, value)` pairs.
    pub fn to_pairs(&self) -> Vec<(R, T)>
    where
        R: Clone,
        T: Clone,
    {
        let core = self.core.borrow();
        core.row_keys
            .iter()
            .enumerate()
            .filter_map(|(r, rk)| {
                core.grid
                    .cell(r, self.col)
                    .map(|v| (rk.clone(), v.clone()))
            })
            .collect()
    }
}

impl<R: Eq, C: Eq, T> KeySubTable<R, C, T> {
    /// Re-resolves the key bounds to half-open index windows
    /// `(row_lo, row_end, col_lo, col_end)` against the current parent.
    fn resolve(&self, core: &KeyCore<R, C, T>) -> Result<(usize, usize, usize, usize)> {
        let row_lo = match &self.from_row {
            Some(k) => core.row_index(k).ok_or(Error::UnknownKey)?,
            None => 0,
        };
        let row_end = match &self.to_row {
            Some(k) => core.row_index(k).ok_or(Error::UnknownKey)? + 1,
            None => core.row_keys.len(),
        };
        let col_lo = match &self.from_col {
            Some(k) => core.col_index(k).ok_or(Error::UnknownKey)?,
            None => 0,
        };
        let col_end = match &self.to_col {
            Some(k) => core.col_index(k).ok_or(Error::UnknownKey)? + 1,
            None => core.col_keys.len(),
        };
        if row_lo >= row_end || col_lo >= col_end {
            // an explicit bound pair that crosses is reversed; a window
            // that is merely empty only happens on an empty open axis
            if self.from_row.is_some() && self.to_row.is_some() && row_lo >= row_end {
                return Err(Error::ReversedBounds);
            }
            if self.from_col.is_some() && self.to_col.is_some() && col_lo >= col_end {
                return Err(Error::ReversedBounds);
            }
        }
        Ok((row_lo, row_end, col_lo, col_end))
    }

    pub fn row_count(&self) -> Result<usize> {
        let core = self.core.borrow();
        let (row_lo, row_end, _, _) = self.resolve(&core)?;
        Ok(row_end.saturating_sub(row_lo))
    }

    pub fn col_count(&self) -> Result<usize> {
        let core = self.core.borrow();
        let (_, _, col_lo, col_end) = self.resolve(&core)?;
        Ok(col_end.saturating_sub(col_lo))
    }

    /// Row keys currently visible through the window.
    pub fn row_keys(&self) -> Result<Vec<R>>
    where
        R: Clone,
    {
        let core = self.core.borrow();
        let (row_lo, row_end, _, _) = self.resolve(&core)?;
        Ok(core.row_keys[row_lo..row_end].to_vec())
    }

    pub fn col_keys(&self) -> Result<Vec<C>>
    where
        C: Clone,
    {
        let core = self.core.borrow();
        let (_, _, col_lo, col_end) = self.resolve(&core)?;
        Ok(core.col_keys[col_lo..col_end].to_vec())
    }

    fn cell_within(
        &self,
        core: &KeyCore<R, C, T>,
        row_key: &R,
        col_key: &C,
    ) -> Result<(usize, usize)> {
        let (row_lo, row_end, col_lo, col_end) = self.resolve(core)?;
        let r = core.row_index(row_key).ok_or(Error::KeyOutOfRange)?;
        let c = core.col_index(col_key).ok_or(Error::KeyOutOfRange)?;
        if r < row_lo || r >= row_end || c < col_lo || c >= col_end {
            return Err(Error::KeyOutOfRange);
        }
        Ok((r, c))
    }

    pub fn get(&self, row_key: &R, col_key: &C) -> Result<Option<Ref<'_, T>>> {
        let core = self.core.borrow();
        let (r, c) = self.cell_within(&core, row_key, col_key)?;
        Ok(Ref::filter_map(core, |k| k.grid.cell(r, c)).ok())
    }

    /// Writes through to the parent. Unlike [`KeyTable::put`], a bounded
    /// view never creates keys: both keys must already sit inside the
    /// window.
    pub fn put(&mut self, row_key: &R, col_key: &C, value: T) -> Result<Option<T>> {
        let mut core = self.core.borrow_mut();
        let (r, c) = self.cell_within(&core, row_key, col_key)?;
        Ok(core.grid.set(r, c, Some(value)))
    }

    pub fn remove(&mut self, row_key: &R, col_key: &C) -> Result<Option<T>> {
        let mut core = self.core.borrow_mut();
        let (r, c) = self.cell_within(&core, row_key, col_key)?;
        Ok(core.grid.set(r, c, None))
    }

    /// Row insertion would desynchronize sibling views; always unsupported.
    pub fn insert_row(&mut self, _pos: usize, _key: R) -> Result<()> {
        Err(Error::Unsupported("row insertion"))
    }

    /// Column insertion would desynchronize sibling views; always
    /// unsupported.
    pub fn insert_col(&mut self, _pos: usize, _key: C) -> Result<()> {
        Err(Error::Unsupported("column insertion"))
    }

    /// Row removal would desynchronize sibling views; always unsupported.
    pub fn remove_row(&mut self, _key: &R) -> Result<()> {
        Err(Error::Unsupported("row removal"))
    }

    /// Column removal would desynchronize sibling views; always
    /// unsupported.
    pub fn remove_col(&mut self, _key: &C) -> Result<()> {
        Err(Error::Unsupported("column removal"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> KeyTable<&'static str, &'static str, i32> {
        let mut table = KeyTable::new();
        table.put("r1", "c1", 10);
        table.put("r2", "c2", 20);
        table
    }

    #[test]
    fn put_get_remove_round_trip() {
        let mut table = sample();
        assert_eq!(*table.get(&"r1", &"c1").unwrap(), 10);
        assert_eq!(table.put("r1", "c1", 11), Some(10));
        assert_eq!(table.remove(&"r1", &"c1"), Some(11));
        assert_eq!(table.get(&"r1", &"c1").map(|r| *r), None);
        // the keys survive the cell removal
        assert!(table.contains_row_key(&"r1"));
        assert_eq!(table.row_count(), 2);
    }

    #[test]
    fn unseen_keys_append_on_write_only() {
        let mut table = sample();
        assert_eq!(table.get(&"r9", &"c1").map(|r| *r), None);
        assert_eq!(table.row_count(), 2);
        table.put("r9", "c1", 90);
        assert_eq!(table.row_keys(), vec!["r1", "r2", "r9"]);
        assert_eq!(table.row_index(&"r9"), Some(2));
    }

    #[test]
    fn swap_rows_exchanges_content_and_key_order() {
        let mut table = sample();
        table.swap_rows("r1", "r2");
        let row = table.row(&"r1").unwrap();
        assert_eq!(row.to_pairs(), vec![("c2", 20)]);
        assert_eq!(table.row_keys(), vec!["r2", "r1"]);
        assert_eq!(*table.get(&"r2", &"c1").unwrap(), 10);
    }

    #[test]
    fn swap_against_absent_key_creates_it() {
        let mut table = sample();
        table.swap_rows("r1", "r3");
        assert_eq!(table.row_keys(), vec!["r3", "r2", "r1"]);
        // r1 took over the freshly created empty row
        assert!(table.row(&"r1").unwrap().is_empty());
        assert_eq!(*table.get(&"r3", &"c1").unwrap(), 10);
    }

    #[test]
    fn insert_row_rejects_duplicates_and_bad_positions() {
        let mut table = sample();
        assert_eq!(table.insert_row(1, "rX"), Ok(()));
        assert_eq!(table.row_keys(), vec!["r1", "rX", "r2"]);
        assert_eq!(*table.get(&"r2", &"c2").unwrap(), 20);
        assert_eq!(table.insert_row(0, "r1"), Err(Error::DuplicateKey));
        assert_eq!(
            table.insert_row(9, "rY"),
            Err(Error::IndexOutOfBounds { index: 9, len: 3 })
        );
    }

    #[test]
    fn remove_row_renumbers() {
        let mut table = sample();
        table.put("r3", "c1", 30);
        assert!(table.remove_row(&"r2"));
        assert!(!table.remove_row(&"r2"));
        assert_eq!(table.row_keys(), vec!["r1", "r3"]);
        assert_eq!(*table.get(&"r3", &"c1").unwrap(), 30);
        assert_eq!(table.row_index(&"r3"), Some(1));
    }

    #[test]
    fn remove_col_renumbers() {
        let mut table = sample();
        assert!(table.remove_col(&"c1"));
        assert_eq!(table.col_keys(), vec!["c2"]);
        assert_eq!(*table.get(&"r2", &"c2").unwrap(), 20);
    }

    #[test]
    fn row_and_col_maps_write_through() {
        let table = sample();
        let mut row = table.row(&"r1").unwrap();
        assert_eq!(row.insert("c2", 12), None);
        assert_eq!(*table.get(&"r1", &"c2").unwrap(), 12);
        assert_eq!(row.remove(&"c1"), Some(10));
        assert_eq!(row.len(), 1);
        // inserting through a row map can grow the column axis
        row.insert("c3", 13);
        assert_eq!(table.col_keys(), vec!["c1", "c2", "c3"]);
        let col = table.col(&"c2").unwrap();
        assert_eq!(col.to_pairs(), vec![("r1", 12), ("r2", 20)]);
        assert!(table.row(&"missing").is_none());
    }

    #[test]
    fn sub_table_checks_bounds_at_construction() {
        let table = sample();
        assert!(table
            .sub_table(Some("r1"), None, Some("r2"), None)
            .is_ok());
        assert_eq!(
            table
                .sub_table(Some("r2"), None, Some("r1"), None)
                .err(),
            Some(Error::ReversedBounds)
        );
        assert_eq!(
            table
                .sub_table(Some("rX"), None, None, None)
                .err(),
            Some(Error::UnknownKey)
        );
    }

    #[test]
    fn sub_table_re_resolves_every_operation() {
        let mut table = sample();
        table.put("r3", "c3", 30);
        let mut view = table
            .sub_table(Some("r1"), None, Some("r2"), None)
            .unwrap();
        assert_eq!(view.row_count(), Ok(2));
        assert_eq!(*view.get(&"r2", &"c2").unwrap().unwrap(), 20);
        assert_eq!(view.get(&"r3", &"c3").err(), Some(Error::KeyOutOfRange));
        // a parent swap moves r3 inside the window
        table.swap_rows("r2", "r3");
        assert_eq!(view.row_keys(), Ok(vec!["r1", "r3", "r2"]));

        // after the swap the window end key r2 sits at index 2
        assert_eq!(view.row_count(), Ok(3));
        assert_eq!(*view.get(&"r3", &"c2").unwrap().unwrap(), 20);
        assert_eq!(view.put(&"r1", &"c1", 11), Ok(Some(10)));
        // removing a bound key breaks the view until it comes back
        table.remove_row(&"r2");
        assert_eq!(view.row_count(), Err(Error::UnknownKey));
    }

    #[test]
    fn sub_table_never_creates_keys() {
        let table = sample();
        let mut view = table.sub_table(None, None, None, None).unwrap();
        assert_eq!(view.put(&"rZ", &"c1", 1), Err(Error::KeyOutOfRange));
        assert_eq!(table.row_count(), 2);
    }

    #[test]
    fn sub_table_rejects_structural_ops() {
        let table = sample();
        let mut view = table.sub_table(None, None, None, None).unwrap();
        assert_eq!(
            view.insert_row(0, "rN"),
            Err(Error::Unsupported("row insertion"))
        );
        assert_eq!(
            view.remove_col(&"c1"),
            Err(Error::Unsupported("column removal"))
        );
    }

    #[test]
    fn equality_and_clone() {
        let a = sample();
        let b = sample();
        assert_eq!(a, b);
        let mut c = a.clone();
        c.put("r1", "c2", 99);
        assert_ne!(a, c);
        assert_eq!(a.get(&"r1", &"c2").map(|r| *r), None);
    }
}
