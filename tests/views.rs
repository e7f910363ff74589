//! Aliasing behavior of sub-views and fail-fast iteration, exercised
//! through the public API only.

use tabulae::{Error, IndexedMap, SortedList, SparseTable};

#[test]
fn list_view_aliases_parent_both_ways() {
    let mut list = SortedList::from([10, 20, 30, 40, 50]);
    let mut view = list.sub_list(20, 45);
    assert_eq!(view.to_vec(), vec![20, 30, 40]);

    // write through the view, observe in the parent
    assert!(!view.insert(25).unwrap().is_found());
    assert!(list.contains(&25));
    assert_eq!(list.len(), 6);

    // write through the parent, observe in the view
    list.add(35);
    assert_eq!(view.to_vec(), vec![20, 25, 30, 35, 40]);

    // the view window tracks removals too
    list.remove(&20);
    assert_eq!(view.first().map(|r| *r), Some(25));
}

#[test]
fn list_view_rejects_out_of_range_inserts() {
    let list = SortedList::from([10, 20, 30]);
    let mut view = list.sub_list(10, 25);
    assert_eq!(view.insert(30), Err(Error::KeyOutOfRange));
    assert_eq!(view.insert(5), Err(Error::KeyOutOfRange));
    assert_eq!(list.len(), 3);
}

#[test]
fn nested_list_views_narrow() {
    let list = SortedList::from([1, 2, 3, 4, 5, 6, 7, 8]);
    let outer = list.sub_list(2, 7);
    let inner = outer.sub_list(3, 6);
    assert_eq!(inner.to_vec(), vec![3, 4, 5]);
}

#[test]
#[should_panic]
fn nested_list_view_cannot_widen() {
    let list = SortedList::from([1, 2, 3, 4, 5]);
    let outer = list.sub_list(2, 4);
    let _ = outer.sub_list(1, 4);
}

#[test]
fn map_view_insert_is_hard_and_offer_is_soft() {
    let mut map = IndexedMap::from([(10, "a"), (20, "b"), (30, "c")]);
    let mut view = map.sub_map(10, 25);

    assert_eq!(view.insert(15, "x"), Ok(None));
    assert_eq!(view.insert(30, "y"), Err(Error::KeyOutOfRange));
    assert!(!view.offer(30, "y"));
    assert!(view.offer(12, "z"));

    // the failed writes left the parent untouched
    assert_eq!(map.get(&30).map(|r| *r), Some("c"));
    assert_eq!(map.len(), 5);
    assert_eq!(map.get(&15).map(|r| *r), Some("x"));
}

#[test]
fn map_view_indexed_access_is_view_relative() {
    let mut map = IndexedMap::from([(10, 'a'), (20, 'b'), (30, 'c'), (40, 'd')]);
    let view = map.sub_map(20, 45);
    assert_eq!(view.key_at(0).map(|r| *r), Some(20));
    assert_eq!(view.index_of_key(&30), Some(1));
    assert_eq!(view.key_at(3).map(|r| *r), None);

    // a parent insert below the window shifts nothing view-relative
    map.insert(5, 'e');
    let view = map.sub_map(20, 45);
    assert_eq!(view.key_at(0).map(|r| *r), Some(20));
}

#[test]
fn map_entry_iterator_fails_fast_on_view_mutation() {
    let map = IndexedMap::from([(1, 1), (2, 2), (3, 3), (4, 4)]);
    let mut view = map.sub_map(2, 4);
    let mut iter = map.iter();
    assert!(iter.next().is_some());
    view.remove(&2);
    let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| iter.next()));
    assert!(result.is_err());
}

#[test]
fn key_iterator_survives_value_replacement() {
    let mut map = IndexedMap::from([(1, 10), (2, 20), (3, 30)]);
    let mut keys = map.keys();
    assert_eq!(keys.next(), Some(1));
    map.set_value_at(2, 99);
    assert_eq!(keys.next(), Some(2));
    assert_eq!(keys.next(), Some(3));
    assert_eq!(keys.next(), None);
}

#[test]
#[should_panic(expected = "structurally modified")]
fn value_iterator_fails_fast_on_value_replacement() {
    let mut map = IndexedMap::from([(1, 10), (2, 20), (3, 30)]);
    let mut values = map.values();
    assert_eq!(values.next(), Some(10));
    map.set_value_at(0, 11);
    let _ = values.next();
}

#[test]
fn cursor_drains_the_map() {
    let map = IndexedMap::from([(1, 'a'), (2, 'b'), (3, 'c')]);
    let mut cursor = map.cursor();
    let mut drained = Vec::new();
    while let Some(entry) = cursor.next() {
        drained.push(entry);
        cursor.remove_current().unwrap();
    }
    assert_eq!(drained, vec![(1, 'a'), (2, 'b'), (3, 'c')]);
    assert!(map.is_empty());
}

#[test]
fn cursor_requires_a_fresh_step_before_removal() {
    let map = IndexedMap::from([(1, 'a')]);
    let mut cursor = map.cursor();
    assert_eq!(cursor.remove_current(), Err(Error::NoCurrentEntry));
    cursor.next();
    assert_eq!(cursor.remove_current(), Ok((1, 'a')));
    assert_eq!(cursor.remove_current(), Err(Error::NoCurrentEntry));
}

#[test]
fn row_and_col_views_are_live() {
    let mut table = SparseTable::new();
    table.put(0, 0, 1);
    table.put(1, 1, 2);
    let row = table.row(1);
    let mut col = table.col(1);

    assert_eq!(row.get(1).map(|r| *r), Some(2));
    col.set(0, Some(5));
    assert_eq!(table.get(0, 1).map(|r| *r), Some(5));
    assert_eq!(row.len(), table.col_count());
}

#[test]
fn table_view_translates_and_bounds_writes() {
    let mut table = SparseTable::new();
    for i in 0..5 {
        table.put(i, i, i as i32);
    }
    let mut view = table.sub_table(1..4, 1..4);
    assert_eq!(view.get(0, 0).map(|r| *r), Some(1));
    assert_eq!(view.put(1, 1, 99), Ok(Some(2)));
    assert_eq!(table.get(2, 2).map(|r| *r), Some(99));
    assert!(matches!(
        view.put(3, 0, 7),
        Err(Error::IndexOutOfBounds { .. })
    ));
    assert_eq!(view.insert_row(0), Err(Error::Unsupported("row insertion")));
}
