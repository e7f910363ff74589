//! Sorted index-addressable collections and sparse 2-D tables.
//!
//! All four structures keep their storage behind a shared `Rc<RefCell<..>>`
//! core, so sub-views ([`SubList`], [`SubMap`], [`SubTable`],
//! [`KeySubTable`]) and row/column views alias the parent live: writes
//! through a view land in the parent and vice versa. Views store bounds,
//! never cached indices, and re-resolve their window on every call.
//!
//! Iterators snapshot a structural counter at creation and panic when the
//! backing structure was modified behind their back; see [`IndexedMap`]
//! for the exact counter granularity of entry, key and value iterators.
//!
//! Reads hand out [`std::cell::Ref`] guards. Holding one across a mutation
//! of the same structure panics with a `RefCell` borrow error, which is
//! the single-threaded discipline this crate asks of its callers.

pub mod error;
pub mod key_table;
pub mod ord;
pub mod search;
pub mod sorted_list;
pub mod sorted_map;
pub mod sparse_table;

pub use error::{Error, Result};
pub use key_table::{ColMap, KeySubTable, KeyTable, RowMap};
pub use ord::{compare, compare_by, eq};
pub use search::SearchResult;
pub use sorted_list::{SortedList, SubList};
pub use sorted_map::{Cursor, IndexedMap, Keys, SubMap, Values};
pub use sparse_table::{ColView, RowView, SparseTable, SubTable};
