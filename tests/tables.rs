//! End-to-end behavior of the sparse and key-addressed tables.

use tabulae::{Error, KeyTable, SparseTable};

#[test]
fn dimensions_track_the_extreme_occupied_cell() {
    let mut table = SparseTable::new();
    assert_eq!((table.row_count(), table.col_count()), (0, 0));

    table.put(0, 0, "x");
    table.put(2, 2, "y");
    assert_eq!((table.row_count(), table.col_count()), (3, 3));

    // removing the middle empty row renumbers the last one
    table.remove_row(1);
    assert_eq!((table.row_count(), table.col_count()), (2, 3));
    assert_eq!(table.get(1, 2).map(|r| *r), Some("y"));

    // dropping the extreme cell shrinks both axes
    table.remove(1, 2);
    assert_eq!((table.row_count(), table.col_count()), (1, 1));
    assert_eq!(table.cell_count(), 1);
}

#[test]
fn interior_holes_do_not_shrink_anything() {
    let mut table = SparseTable::new();
    table.put(0, 0, 1);
    table.put(0, 3, 2);
    table.put(3, 0, 3);
    table.remove(0, 0);
    assert_eq!((table.row_count(), table.col_count()), (4, 4));
    assert_eq!(table.cell_count(), 2);
}

#[test]
fn structural_edits_shift_whole_axes() {
    let mut table = SparseTable::new();
    table.put(0, 0, 'a');
    table.put(1, 1, 'b');

    table.insert_row(1);
    assert_eq!(table.get(2, 1).map(|r| *r), Some('b'));
    assert_eq!(table.get(1, 0).map(|r| *r), None);

    table.insert_col(0);
    assert_eq!(table.get(0, 1).map(|r| *r), Some('a'));

    table.remove_col(1);
    assert_eq!(table.get(0, 0).map(|r| *r), None);
    assert_eq!(table.get(2, 1).map(|r| *r), Some('b'));
}

#[test]
fn swapping_into_empty_space_moves_the_content() {
    let mut table = SparseTable::new();
    table.put(0, 0, 7);
    table.swap(0, 0, 4, 4);
    assert_eq!(table.get(0, 0).map(|r| *r), None);
    assert_eq!(table.get(4, 4).map(|r| *r), Some(7));
    assert_eq!(table.row_count(), 5);

    table.swap_rows(4, 0);
    assert_eq!(table.get(0, 4).map(|r| *r), Some(7));
    assert_eq!(table.row_count(), 1);
}

#[test]
fn key_table_swap_exchanges_rows_and_key_order() {
    let mut table = KeyTable::new();
    table.put("r1", "c1", 10);
    table.put("r2", "c2", 20);

    table.swap_rows("r1", "r2");

    // each key now addresses the other's former row
    assert_eq!(*table.get(&"r1", &"c2").unwrap(), 20);
    assert_eq!(*table.get(&"r2", &"c1").unwrap(), 10);
    assert_eq!(table.row_keys(), vec!["r2", "r1"]);
}

#[test]
fn key_table_layers_over_a_positional_grid() {
    let mut table = KeyTable::new();
    table.put("alpha", "x", 1);
    table.put("beta", "y", 2);
    table.put("alpha", "y", 3);

    assert_eq!(table.row_index(&"beta"), Some(1));
    assert_eq!(table.col_index(&"y"), Some(1));

    let row = table.row(&"alpha").unwrap();
    assert_eq!(row.to_pairs(), vec![("x", 1), ("y", 3)]);

    // cell removal keeps the keys; row removal renumbers
    table.remove(&"alpha", &"x");
    assert!(table.contains_col_key(&"x"));
    table.remove_row(&"alpha");
    assert_eq!(table.row_index(&"beta"), Some(0));
    assert_eq!(*table.get(&"beta", &"y").unwrap(), 2);
}

#[test]
fn keyed_view_follows_the_parent() {
    let mut table = KeyTable::new();
    for (i, rk) in ["a", "b", "c", "d"].into_iter().enumerate() {
        table.put(rk, "v", i as i32);
    }
    let mut view = table
        .sub_table(Some("b"), None, Some("c"), None)
        .unwrap();
    assert_eq!(view.row_keys(), Ok(vec!["b", "c"]));
    assert_eq!(view.put(&"b", &"v", 9), Ok(Some(1)));
    assert_eq!(view.put(&"d", &"v", 9), Err(Error::KeyOutOfRange));

    table.insert_row(2, "between").unwrap();
    assert_eq!(view.row_keys(), Ok(vec!["b", "between", "c"]));
    assert_eq!(view.row_count(), Ok(3));

    assert_eq!(
        view.remove_row(&"between"),
        Err(Error::Unsupported("row removal"))
    );
}
