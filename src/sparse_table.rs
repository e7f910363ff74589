//! A two-dimensional sparse table with live row/column views and
//! rectangular sub-tables.
//!
//! Storage is one entry per row; `None` stands for an all-empty row, and a
//! present row never ends in an empty cell. Every structural mutation runs
//! a cleanup pass restoring that canonical form, so the reported dimensions
//! are always minimal and equality can read the storage directly.

use std::cell::{Ref, RefCell};
use std::fmt;
use std::ops::{Bound, RangeBounds};
use std::rc::Rc;

use crate::error::{Error, Result};
use crate::ord;

/// A sparse 2-D grid addressed by `(row, column)`.
///
/// `get(r, c) == None` is the same thing as "the cell is absent"; the table
/// never stores an explicit empty marker. [`SparseTable::row`],
/// [`SparseTable::col`] and [`SparseTable::sub_table`] return live views
/// over the same storage.
pub struct SparseTable<T> {
    core: Rc<RefCell<TableCore<T>>>,
}

/// A live, fixed-length view of one row.
///
/// Length equals the table's current column count; clearing a cell does not
/// shrink the view, and [`RowView::push`] appends at the current logical
/// end, extending the table.
pub struct RowView<T> {
    core: Rc<RefCell<TableCore<T>>>,
    row: usize,
}

/// Column counterpart of [`RowView`].
pub struct ColView<T> {
    core: Rc<RefCell<TableCore<T>>>,
    col: usize,
}

/// A rectangular view of a [`SparseTable`].
///
/// Translates coordinates by a fixed shift and validates against the
/// optional upper bounds on every call. Row and column insertion/removal
/// would desynchronize sibling views and are rejected as unsupported.
/// Deliberately neither clonable nor serializable.
pub struct SubTable<T> {
    core: Rc<RefCell<TableCore<T>>>,
    shift_row: usize,
    shift_col: usize,
    max_row: Option<usize>,
    max_col: Option<usize>,
}

pub(crate) struct TableCore<T> {
    rows: Vec<Option<Vec<Option<T>>>>,
}

impl<T> TableCore<T> {
    pub(crate) fn new() -> Self {
        TableCore { rows: Vec::new() }
    }

    pub(crate) fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub(crate) fn col_count(&self) -> usize {
        self.rows
            .iter()
            .flatten()
            .map(|row| row.len())
            .max()
            .unwrap_or(0)
    }

    pub(crate) fn cell_count(&self) -> usize {
        self.rows
            .iter()
            .flatten()
            .map(|row| row.iter().flatten().count())
            .sum()
    }

    pub(crate) fn cell(&self, r: usize, c: usize) -> Option<&T> {
        self.rows.get(r)?.as_ref()?.get(c)?.as_ref()
    }

    /// The one write primitive: `None` removes, `Some` stores, and the
    /// cleanup pass keeps the storage canonical either way.
    pub(crate) fn set(&mut self, r: usize, c: usize, value: Option<T>) -> Option<T> {
        match value {
            Some(v) => {
                if r >= self.rows.len() {
                    self.rows.resize_with(r + 1, || None);
                }
                let row = self.rows[r].get_or_insert_with(Vec::new);
                if c >= row.len() {
                    row.resize_with(c + 1, || None);
                }
                row[c].replace(v)
            }
            None => {
                let old = self.rows.get_mut(r)?.as_mut()?.get_mut(c)?.take();
                if old.is_some() {
                    self.trim_row(r);
                    self.trim_tail();
                }
                old
            }
        }
    }

    fn trim_row(&mut self, r: usize) {
        if let Some(slot) = self.rows.get_mut(r) {
            if let Some(row) = slot {
                while row.last().is_some_and(|cell| cell.is_none()) {
                    row.pop();
                }
                if row.is_empty() {
                    *slot = None;
                }
            }
        }
    }

    fn trim_tail(&mut self) {
        while self.rows.last().is_some_and(|row| row.is_none()) {
            self.rows.pop();
        }
    }

    pub(crate) fn insert_row(&mut self, r: usize) {
        // a row inserted at or past the end would be a trailing empty row
        if r < self.rows.len() {
            self.rows.insert(r, None);
        }
    }

    pub(crate) fn insert_col(&mut self, c: usize) {
        for slot in &mut self.rows {
            if let Some(row) = slot {
                if c < row.len() {
                    row.insert(c, None);
                }
            }
        }
    }

    pub(crate) fn remove_row(&mut self, r: usize) {
        if r < self.rows.len() {
            self.rows.remove(r);
            self.trim_tail();
        }
    }

    pub(crate) fn remove_col(&mut self, c: usize) {
        for i in 0..self.rows.len() {
            if let Some(row) = &mut self.rows[i] {
                if c < row.len() {
                    row.remove(c);
                }
            }
            self.trim_row(i);
        }
        self.trim_tail();
    }

    pub(crate) fn swap_rows(&mut self, a: usize, b: usize) {
        if a == b {
            return;
        }
        let need = a.max(b) + 1;
        if need > self.rows.len() {
            self.rows.resize_with(need, || None);
        }
        self.rows.swap(a, b);
        self.trim_tail();
    }

    pub(crate) fn swap_cols(&mut self, a: usize, b: usize) {
        if a == b {
            return;
        }
        let need = a.max(b) + 1;
        for i in 0..self.rows.len() {
            if let Some(row) = &mut self.rows[i] {
                let has_a = row.get(a).is_some_and(|cell| cell.is_some());
                let has_b = row.get(b).is_some_and(|cell| cell.is_some());
                if !has_a && !has_b {
                    continue;
                }
                if row.len() < need {
                    row.resize_with(need, || None);
                }
                row.swap(a, b);
            }
            self.trim_row(i);
        }
        self.trim_tail();
    }

    pub(crate) fn swap_cells(&mut self, r1: usize, c1: usize, r2: usize, c2: usize) {
        if (r1, c1) == (r2, c2) {
            return;
        }
        let a = self.set(r1, c1, None);
        let b = self.set(r2, c2, None);
        self.set(r1, c1, b);
        self.set(r2, c2, a);
    }

    pub(crate) fn clear(&mut self) {
        self.rows.clear();
    }

    pub(crate) fn to_rows(&self) -> Vec<Vec<Option<T>>>
    where
        T: Clone,
    {
        let cols = self.col_count();
        (0..self.rows.len())
            .map(|r| (0..cols).map(|c| self.cell(r, c).cloned()).collect())
            .collect()
    }
}

impl<T: PartialEq> PartialEq for TableCore<T> {
    /// Canonical trimming makes raw storage comparison exact.
    fn eq(&self, other: &Self) -> bool {
        self.rows == other.rows
    }
}

impl<T> SparseTable<T> {
    pub fn new() -> Self {
        SparseTable {
            core: Rc::new(RefCell::new(TableCore::new())),
        }
    }

    /// Number of rows up to and including the last non-empty one.
    pub fn row_count(&self) -> usize {
        self.core.borrow().row_count()
    }

    /// Number of columns up to and including the last non-empty one.
    pub fn col_count(&self) -> usize {
        self.core.borrow().col_count()
    }

    /// Number of occupied cells.
    pub fn cell_count(&self) -> usize {
        self.core.borrow().cell_count()
    }

    pub fn is_empty(&self) -> bool {
        self.row_count() == 0
    }

    pub fn get(&self, r: usize, c: usize) -> Option<Ref<'_, T>> {
        Ref::filter_map(self.core.borrow(), |core| core.cell(r, c)).ok()
    }

    /// Stores `value` at `(r, c)`, growing the table as needed; returns the
    /// previous occupant.
    pub fn put(&mut self, r: usize, c: usize, value: T) -> Option<T> {
        self.core.borrow_mut().set(r, c, Some(value))
    }

    /// [`SparseTable::put`] over an optional value: `None` removes the
    /// cell, because an absent value and an empty cell are the same state.
    pub fn put_opt(&mut self, r: usize, c: usize, value: Option<T>) -> Option<T> {
        self.core.borrow_mut().set(r, c, value)
    }

    pub fn remove(&mut self, r: usize, c: usize) -> Option<T> {
        self.core.borrow_mut().set(r, c, None)
    }

    /// Inserts an empty row before `r`, shifting later rows down.
    pub fn insert_row(&mut self, r: usize) {
        self.core.borrow_mut().insert_row(r);
    }

    /// Inserts an empty column before `c`, shifting later columns right.
    pub fn insert_col(&mut self, c: usize) {
        self.core.borrow_mut().insert_col(c);
    }

    /// Removes row `r`, shifting later rows up.
    pub fn remove_row(&mut self, r: usize) {
        self.core.borrow_mut().remove_row(r);
    }

    /// Removes column `c`, shifting later columns left.
    pub fn remove_col(&mut self, c: usize) {
        self.core.borrow_mut().remove_col(c);
    }

    pub fn swap_rows(&mut self, a: usize, b: usize) {
        self.core.borrow_mut().swap_rows(a, b);
    }

    pub fn swap_cols(&mut self, a: usize, b: usize) {
        self.core.borrow_mut().swap_cols(a, b);
    }

    /// Exchanges two cells; a cell swapped with itself is untouched.
    pub fn swap(&mut self, r1: usize, c1: usize, r2: usize, c2: usize) {
        self.core.borrow_mut().swap_cells(r1, c1, r2, c2);
    }

    /// Live view of row `r`.
    pub fn row(&self, r: usize) -> RowView<T> {
        RowView {
            core: Rc::clone(&self.core),
            row: r,
        }
    }

    /// Live view of column `c`.
    pub fn col(&self, c: usize) -> ColView<T> {
        ColView {
            core: Rc::clone(&self.core),
            col: c,
        }
    }

    /// Live rectangular view of the given row and column ranges.
    ///
    /// # Panics
    ///
    /// Panics when either range is reversed.
    pub fn sub_table(
        &self,
        rows: impl RangeBounds<usize>,
        cols: impl RangeBounds<usize>,
    ) -> SubTable<T> {
        let shift_row = range_start(rows.start_bound());
        let shift_col = range_start(cols.start_bound());
        let max_row = range_end(rows.end_bound());
        let max_col = range_end(cols.end_bound());
        assert!(
            max_row.is_none_or(|m| shift_row <= m) && max_col.is_none_or(|m| shift_col <= m),
            "range bounds are reversed"
        );
        SubTable {
            core: Rc::clone(&self.core),
            shift_row,
            shift_col,
            max_row,
            max_col,
        }
    }

    pub fn clear(&mut self) {
        self.core.borrow_mut().clear();
    }

    /// Snapshot as a dense `row_count() x col_count()` grid.
    pub fn to_rows(&self) -> Vec<Vec<Option<T>>>
    where
        T: Clone,
    {
        self.core.borrow().to_rows()
    }
}

fn range_start(bound: Bound<&usize>) -> usize {
    match bound {
        Bound::Included(&i) => i,
        Bound::Excluded(&i) => i + 1,
        Bound::Unbounded => 0,
    }
}

fn range_end(bound: Bound<&usize>) -> Option<usize> {
    match bound {
        Bound::Included(&i) => Some(i + 1),
        Bound::Excluded(&i) => Some(i),
        Bound::Unbounded => None,
    }
}

impl<T> Default for SparseTable<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone> Clone for SparseTable<T> {
    /// Deep copy; existing views keep pointing at the original storage.
    fn clone(&self) -> Self {
        let core = self.core.borrow();
        SparseTable {
            core: Rc::new(RefCell::new(TableCore {
                rows: core.rows.clone(),
            })),
        }
    }
}

impl<T: PartialEq> PartialEq for SparseTable<T> {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.core, &other.core)
            || *self.core.borrow() == *other.core.borrow()
    }
}

impl<T: fmt::Debug> fmt::Debug for SparseTable<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let core = self.core.borrow();
        let cols = core.col_count();
        let mut list = f.debug_list();
        for r in 0..core.row_count() {
            let row: Vec<Option<&T>> = (0..cols).map(|c| core.cell(r, c)).collect();
            list.entry(&row);
        }
        list.finish()
    }
}

impl<T> RowView<T> {
    /// The table's current column count; cleared cells do not shrink it.
    pub fn len(&self) -> usize {
        self.core.borrow().col_count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn index(&self) -> usize {
        self.row
    }

    pub fn get(&self, i: usize) -> Option<Ref<'_, T>> {
        Ref::filter_map(self.core.borrow(), |core| core.cell(self.row, i)).ok()
    }

    pub fn set(&mut self, i: usize, value: Option<T>) -> Option<T> {
        self.core.borrow_mut().set(self.row, i, value)
    }

    /// Empties the cell at `i` without shrinking the view.
    pub fn clear_at(&mut self, i: usize) -> Option<T> {
        self.set(i, None)
    }

    /// Appends at the current logical end, extending the table by one
    /// column.
    pub fn push(&mut self, value: T) {
        let mut core = self.core.borrow_mut();
        let end = core.col_count();
        core.set(self.row, end, Some(value));
    }

    pub fn to_vec(&self) -> Vec<Option<T>>
    where
        T: Clone,
    {
        let core = self.core.borrow();
        (0..core.col_count())
            .map(|c| core.cell(self.row, c).cloned())
            .collect()
    }
}

impl<T> ColView<T> {
    /// The table's current row count; cleared cells do not shrink it.
    pub fn len(&self) -> usize {
        self.core.borrow().row_count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn index(&self) -> usize {
        self.col
    }

    pub fn get(&self, i: usize) -> Option<Ref<'_, T>> {
        Ref::filter_map(self.core.borrow(), |core| core.cell(i, self.col)).ok()
    }

    pub fn set(&mut self, i: usize, value: Option<T>) -> Option<T> {
        self.core.borrow_mut().set(i, self.col, value)
    }

    /// Empties the cell at `i` without shrinking the view.
    pub fn clear_at(&mut self, i: usize) -> Option<T> {
        self.set(i, None)
    }

    /// Appends at the current logical end, extending the table by one row.
    pub fn push(&mut self, value: T) {
        let mut core = self.core.borrow_mut();
        let end = core.row_count();
        core.set(end, self.col, Some(value));
    }

    pub fn to_vec(&self) -> Vec<Option<T>>
    where
        T: Clone,
    {
        let core = self.core.borrow();
        (0..core.row_count())
            .map(|r| core.cell(r, self.col).cloned())
            .collect()
    }
}

impl<T: fmt::Debug> fmt::Debug for RowView<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let core = self.core.borrow();
        let cells: Vec<Option<&T>> = (0..core.col_count())
            .map(|c| core.cell(self.row, c))
            .collect();
        f.debug_list().entries(cells).finish()
    }
}

impl<T: fmt::Debug> fmt::Debug for ColView<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let core = self.core.borrow();
        let cells: Vec<Option<&T>> = (0..core.row_count())
            .map(|r| core.cell(r, self.col))
            .collect();
        f.debug_list().entries(cells).finish()
    }
}

impl<T: PartialEq> PartialEq for RowView<T> {
    /// Cell-wise comparison of the visible cells; absent cells only match
    /// absent cells.
    fn eq(&self, other: &Self) -> bool {
        let a = self.core.borrow();
        let b = other.core.borrow();
        let cols = a.col_count();
        cols == b.col_count()
            && (0..cols).all(|c| ord::eq(a.cell(self.row, c), b.cell(other.row, c)))
    }
}

impl<T: PartialEq> PartialEq for ColView<T> {
    /// Cell-wise comparison of the visible cells; absent cells only match
    /// absent cells.
    fn eq(&self, other: &Self) -> bool {
        let a = self.core.borrow();
        let b = other.core.borrow();
        let rows = a.row_count();
        rows == b.row_count()
            && (0..rows).all(|r| ord::eq(a.cell(r, self.col), b.cell(r, other.col)))
    }
}

impl<T> SubTable<T> {
    /// Translates a view coordinate, `None` when it crosses an upper bound.
    fn translate(&self, r: usize, c: usize) -> Option<(usize, usize)> {
        let pr = self.shift_row + r;
        let pc = self.shift_col + c;
        if self.max_row.is_some_and(|m| pr >= m) || self.max_col.is_some_and(|m| pc >= m) {
            return None;
        }
        Some((pr, pc))
    }

    fn bounded_len(parent: usize, shift: usize, max: Option<usize>) -> usize {
        max.map_or(parent, |m| m.min(parent)).saturating_sub(shift)
    }

    pub fn row_count(&self) -> usize {
        Self::bounded_len(self.core.borrow().row_count(), self.shift_row, self.max_row)
    }

    pub fn col_count(&self) -> usize {
        Self::bounded_len(self.core.borrow().col_count(), self.shift_col, self.max_col)
    }

    pub fn is_empty(&self) -> bool {
        self.row_count() == 0
    }

    pub fn get(&self, r: usize, c: usize) -> Option<Ref<'_, T>> {
        let (pr, pc) = self.translate(r, c)?;
        Ref::filter_map(self.core.borrow(), |core| core.cell(pr, pc)).ok()
    }

    /// Writes through to the parent. A coordinate at or beyond the view's
    /// bounds is [`Error::IndexOutOfBounds`].
    pub fn put(&mut self, r: usize, c: usize, value: T) -> Result<Option<T>> {
        self.put_opt(r, c, Some(value))
    }

    pub fn put_opt(&mut self, r: usize, c: usize, value: Option<T>) -> Result<Option<T>> {
        let (pr, pc) = self.translate(r, c).ok_or_else(|| {
            if self.max_row.is_some_and(|m| self.shift_row + r >= m) {
                Error::IndexOutOfBounds {
                    index: r,
                    len: self.max_row.unwrap() - self.shift_row,
                }
            } else {
                Error::IndexOutOfBounds {
                    index: c,
                    len: self.max_col.unwrap() - self.shift_col,
                }
            }
        })?;
        Ok(self.core.borrow_mut().set(pr, pc, value))
    }

    /// Removes through the view; coordinates beyond the bounds hold
    /// nothing and yield `None`.
    pub fn remove(&mut self, r: usize, c: usize) -> Option<T> {
        let (pr, pc) = self.translate(r, c)?;
        self.core.borrow_mut().set(pr, pc, None)
    }

    /// Row insertion would shift sibling views; always unsupported.
    pub fn insert_row(&mut self, _r: usize) -> Result<()> {
        Err(Error::Unsupported("row insertion"))
    }

    /// Column insertion would shift sibling views; always unsupported.
    pub fn insert_col(&mut self, _c: usize) -> Result<()> {
        Err(Error::Unsupported("column insertion"))
    }

    /// Row removal would shift sibling views; always unsupported.
    pub fn remove_row(&mut self, _r: usize) -> Result<()> {
        Err(Error::Unsupported("row removal"))
    }

    /// Column removal would shift sibling views; always unsupported.
    pub fn remove_col(&mut self, _c: usize) -> Result<()> {
        Err(Error::Unsupported("column removal"))
    }

    /// A further-restricted view; bounds compose with this view's.
    pub fn sub_table(
        &self,
        rows: impl RangeBounds<usize>,
        cols: impl RangeBounds<usize>,
    ) -> SubTable<T> {
        let shift_row = self.shift_row + range_start(rows.start_bound());
        let shift_col = self.shift_col + range_start(cols.start_bound());
        let max_row = merge_end(self.max_row, self.shift_row, range_end(rows.end_bound()));
        let max_col = merge_end(self.max_col, self.shift_col, range_end(cols.end_bound()));
        assert!(
            max_row.is_none_or(|m| shift_row <= m) && max_col.is_none_or(|m| shift_col <= m),
            "range bounds are reversed"
        );
        SubTable {
            core: Rc::clone(&self.core),
            shift_row,
            shift_col,
            max_row,
            max_col,
        }
    }

    /// Snapshot of the visible rectangle.
    pub fn to_rows(&self) -> Vec<Vec<Option<T>>>
    where
        T: Clone,
    {
        let rows = self.row_count();
        let cols = self.col_count();
        let core = self.core.borrow();
        (0..rows)
            .map(|r| {
                (0..cols)
                    .map(|c| core.cell(self.shift_row + r, self.shift_col + c).cloned())
                    .collect()
            })
            .collect()
    }
}

fn merge_end(own: Option<usize>, shift: usize, inner: Option<usize>) -> Option<usize> {
    match (own, inner.map(|e| shift + e)) {
        (Some(a), Some(b)) => Some(a.min(b)),
        (a, b) => a.or(b),
    }
}

impl<T: PartialEq> PartialEq for SubTable<T> {
    /// Compares the visible rectangles cell by cell.
    fn eq(&self, other: &Self) -> bool {
        let rows = self.row_count();
        let cols = self.col_count();
        if rows != other.row_count() || cols != other.col_count() {
            return false;
        }
        let a = self.core.borrow();
        let b = other.core.borrow();
        (0..rows).all(|r| {
            (0..cols).all(|c| {
                ord::eq(
                    a.cell(self.shift_row + r, self.shift_col + c),
                    b.cell(other.shift_row + r, other.shift_col + c),
                )
            })
        })
    }
}

impl<T: fmt::Debug> fmt::Debug for SubTable<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rows = self.row_count();
        let cols = self.col_count();
        let core = self.core.borrow();
        let mut list = f.debug_list();
        for r in 0..rows {
            let row: Vec<Option<&T>> = (0..cols)
                .map(|c| core.cell(self.shift_row + r, self.shift_col + c))
                .collect();
            list.entry(&row);
        }
        list.finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn put_get_remove_round_trip() {
        let mut table = SparseTable::new();
        assert_eq!(table.put(1, 2, "a"), None);
        assert_eq!(*table.get(1, 2).unwrap(), "a");
        assert_eq!(table.put(1, 2, "b"), Some("a"));
        assert_eq!(table.remove(1, 2), Some("b"));
        assert!(table.get(1, 2).is_none());
        assert_eq!(table.row_count(), 0);
    }

    #[test]
    fn put_opt_none_is_remove() {
        let mut table = SparseTable::new();
        table.put(0, 0, 7);
        assert_eq!(table.put_opt(0, 0, None), Some(7));
        assert!(table.is_empty());
    }

    #[test]
    fn counts_stay_minimal() {
        let mut table = SparseTable::new();
        table.put(4, 6, 'x');
        assert_eq!((table.row_count(), table.col_count()), (5, 7));
        table.remove(4, 6);
        assert_eq!((table.row_count(), table.col_count()), (0, 0));
    }

    #[test]
    fn removing_a_row_shifts_later_rows_up() {
        let mut table = SparseTable::new();
        table.put(0, 0, "x");
        table.put(2, 2, "y");
        table.remove_row(1);
        assert_eq!(table.row_count(), 2);
        assert_eq!(*table.get(1, 2).unwrap(), "y");
    }

    #[test]
    fn inserting_rows_and_cols_shifts_content() {
        let mut table = SparseTable::new();
        table.put(0, 0, 1);
        table.put(1, 1, 2);
        table.insert_row(1);
        assert_eq!(*table.get(0, 0).unwrap(), 1);
        assert_eq!(*table.get(2, 1).unwrap(), 2);
        table.insert_col(0);
        assert_eq!(*table.get(0, 1).unwrap(), 1);
        assert_eq!(*table.get(2, 2).unwrap(), 2);
        // inserting past the end is a trailing empty row, i.e. nothing
        table.insert_row(99);
        assert_eq!(table.row_count(), 3);
    }

    #[test]
    fn removing_a_col_trims_and_collapses() {
        let mut table = SparseTable::new();
        table.put(0, 0, 'a');
        table.put(0, 1, 'b');
        table.put(1, 1, 'c');
        table.remove_col(1);
        assert_eq!(table.col_count(), 1);
        assert_eq!(table.row_count(), 1);
        assert_eq!(*table.get(0, 0).unwrap(), 'a');
    }

    #[test]
    fn swaps() {
        let mut table = SparseTable::new();
        table.put(0, 0, "a");
        table.put(1, 1, "b");
        table.swap_rows(0, 1);
        assert_eq!(*table.get(1, 0).unwrap(), "a");
        assert_eq!(*table.get(0, 1).unwrap(), "b");
        table.swap_cols(0, 1);
        assert_eq!(*table.get(1, 1).unwrap(), "a");
        assert_eq!(*table.get(0, 0).unwrap(), "b");
        table.swap(0, 0, 1, 1);
        assert_eq!(*table.get(0, 0).unwrap(), "a");
        table.swap(0, 0, 0, 0);
        assert_eq!(*table.get(0, 0).unwrap(), "a");
        // swapping against an empty cell moves the occupant
        table.swap(0, 0, 5, 5);
        assert!(table.get(0, 0).is_none());
        assert_eq!(*table.get(5, 5).unwrap(), "a");
    }

    #[test]
    fn swap_rows_beyond_the_end_then_trim() {
        let mut table = SparseTable::new();
        table.put(0, 0, 9);
        table.swap_rows(0, 3);
        assert_eq!(table.row_count(), 4);
        assert_eq!(*table.get(3, 0).unwrap(), 9);
        table.swap_rows(3, 0);
        assert_eq!(table.row_count(), 1);
    }

    #[test]
    fn row_view_is_live_and_fixed_length() {
        let mut table = SparseTable::new();
        table.put(0, 0, 10);
        table.put(1, 2, 20);
        let mut row = table.row(1);
        assert_eq!(row.len(), 3);
        assert_eq!(*row.get(2).unwrap(), 20);
        assert_eq!(row.clear_at(2), Some(20));
        // clearing shrank the table, and the view length follows it
        assert_eq!(row.len(), 1);
        row.set(0, Some(30));
        assert_eq!(*table.get(1, 0).unwrap(), 30);
        row.push(40);
        assert_eq!(*table.get(1, 1).unwrap(), 40);
        assert_eq!(table.col_count(), 2);
    }

    #[test]
    fn col_view_mirrors_row_view() {
        let mut table = SparseTable::new();
        table.put(2, 1, 'z');
        let mut col = table.col(1);
        assert_eq!(col.len(), 3);
        assert_eq!(col.to_vec(), vec![None, None, Some('z')]);
        col.push('w');
        assert_eq!(*table.get(3, 1).unwrap(), 'w');
    }

    #[test]
    fn sub_table_translates_and_bounds() {
        let mut table = SparseTable::new();
        for r in 0..4 {
            for c in 0..4 {
                table.put(r, c, r * 10 + c);
            }
        }
        let mut sub = table.sub_table(1..3, 2..);
        assert_eq!((sub.row_count(), sub.col_count()), (2, 2));
        assert_eq!(*sub.get(0, 0).unwrap(), 12);
        assert_eq!(sub.get(2, 0).map(|r| *r), None);
        assert_eq!(sub.put(1, 1, 99), Ok(Some(23)));
        assert_eq!(*table.get(2, 3).unwrap(), 99);
        assert_eq!(
            sub.put(2, 0, 0),
            Err(Error::IndexOutOfBounds { index: 2, len: 2 })
        );
        assert_eq!(sub.remove(0, 1), Some(13));
        assert_eq!(sub.remove(5, 5), None);
    }

    #[test]
    fn sub_table_rejects_structural_ops() {
        let table: SparseTable<u8> = SparseTable::new();
        let mut sub = table.sub_table(.., ..);
        assert_eq!(sub.insert_row(0), Err(Error::Unsupported("row insertion")));
        assert_eq!(sub.insert_col(0), Err(Error::Unsupported("column insertion")));
        assert_eq!(sub.remove_row(0), Err(Error::Unsupported("row removal")));
        assert_eq!(sub.remove_col(0), Err(Error::Unsupported("column removal")));
    }

    #[test]
    fn nested_sub_tables_compose() {
        let mut table = SparseTable::new();
        for r in 0..6 {
            table.put(r, r, r);
        }
        let outer = table.sub_table(1..5, 1..5);
        let inner = outer.sub_table(1..3, 1..3);
        assert_eq!(*inner.get(0, 0).unwrap(), 2);
        assert_eq!((inner.row_count(), inner.col_count()), (2, 2));
        assert!(inner.get(2, 2).is_none());
    }

    #[test]
    fn view_equality_is_cell_wise() {
        let mut table = SparseTable::new();
        table.put(0, 0, 1);
        table.put(0, 2, 2);
        table.put(1, 0, 1);
        table.put(1, 2, 2);
        table.put(2, 0, 9);
        assert_eq!(table.row(0), table.row(1));
        assert_ne!(table.row(0), table.row(2));
        assert_eq!(table.col(1), table.col(1));
        assert_ne!(table.col(0), table.col(2));
        assert_eq!(table.sub_table(0..1, ..), table.sub_table(1..2, ..));
    }

    #[test]
    fn equality_reads_canonical_storage() {
        let mut a = SparseTable::new();
        let mut b = SparseTable::new();
        a.put(0, 0, 1);
        a.put(3, 3, 2);
        a.remove(3, 3);
        b.put(0, 0, 1);
        assert_eq!(a, b);
        assert_eq!(a.to_rows(), vec![vec![Some(1)]]);
    }
}
