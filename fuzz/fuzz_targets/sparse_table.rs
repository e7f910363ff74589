#![no_main]

use arbitrary::{Arbitrary, Unstructured};
use libfuzzer_sys::fuzz_target;

use std::collections::BTreeMap;
use tabulae::SparseTable as TestTable;

// coordinates are masked to a small grid so ops actually collide
const GRID: usize = 8;

#[derive(Debug, Arbitrary)]
enum Command {
    Put { r: u8, c: u8, value: u8 },
    Get { r: u8, c: u8 },
    Remove { r: u8, c: u8 },
    InsertRow { r: u8 },
    InsertCol { c: u8 },
    RemoveRow { r: u8 },
    RemoveCol { c: u8 },
    SwapRows { a: u8, b: u8 },
    SwapCols { a: u8, b: u8 },
    SwapCells { r1: u8, c1: u8, r2: u8, c2: u8 },
    Row { r: u8 },
    Col { c: u8 },
    Clear,
    Clone,
}

type Model = BTreeMap<(usize, usize), u8>;

fn model_row_count(model: &Model) -> usize {
    model.keys().map(|&(r, _)| r + 1).max().unwrap_or(0)
}

fn model_col_count(model: &Model) -> usize {
    model.keys().map(|&(_, c)| c + 1).max().unwrap_or(0)
}

fn coord(x: u8) -> usize {
    usize::from(x) % GRID
}

fuzz_target!(|data: &[u8]| {
    let mut unstructured = Unstructured::new(data);
    let commands = match Vec::<Command>::arbitrary(&mut unstructured) {
        Ok(c) => c,
        Err(_) => return,
    };

    let mut table: TestTable<u8> = TestTable::new();
    let mut model: Model = Model::new();

    for command in commands {
        if std::env::var("RUST_BACKTRACE").is_ok() {
            println!("{command:?}");
        }

        match command {
            Command::Put { r, c, value } => {
                let (r, c) = (coord(r), coord(c));
                assert_eq!(table.put(r, c, value), model.insert((r, c), value));
            }
            Command::Get { r, c } => {
                let (r, c) = (coord(r), coord(c));
                assert_eq!(table.get(r, c).map(|x| *x), model.get(&(r, c)).copied());
            }
            Command::Remove { r, c } => {
                let (r, c) = (coord(r), coord(c));
                assert_eq!(table.remove(r, c), model.remove(&(r, c)));
            }
            Command::InsertRow { r } => {
                let r = coord(r);
                table.insert_row(r);
                if r < model_row_count(&model) {
                    model = model
                        .iter()
                        .map(|(&(mr, c), &v)| ((if mr >= r { mr + 1 } else { mr }, c), v))
                        .collect();
                }
            }
            Command::InsertCol { c } => {
                let c = coord(c);
                table.insert_col(c);
                model = model
                    .iter()
                    .map(|(&(r, mc), &v)| ((r, if mc >= c { mc + 1 } else { mc }), v))
                    .collect();
            }
            Command::RemoveRow { r } => {
                let r = coord(r);
                table.remove_row(r);
                model = model
                    .iter()
                    .filter(|&(&(mr, _), _)| mr != r)
                    .map(|(&(mr, c), &v)| ((if mr > r { mr - 1 } else { mr }, c), v))
                    .collect();
            }
            Command::RemoveCol { c } => {
                let c = coord(c);
                table.remove_col(c);
                model = model
                    .iter()
                    .filter(|&(&(_, mc), _)| mc != c)
                    .map(|(&(r, mc), &v)| ((r, if mc > c { mc - 1 } else { mc }), v))
                    .collect();
            }
            Command::SwapRows { a, b } => {
                let (a, b) = (coord(a), coord(b));
                table.swap_rows(a, b);
                model = model
                    .iter()
                    .map(|(&(r, c), &v)| {
                        let r = if r == a { b } else if r == b { a } else { r };
                        ((r, c), v)
                    })
                    .collect();
            }
            Command::SwapCols { a, b } => {
                let (a, b) = (coord(a), coord(b));
                table.swap_cols(a, b);
                model = model
                    .iter()
                    .map(|(&(r, c), &v)| {
                        let c = if c == a { b } else if c == b { a } else { c };
                        ((r, c), v)
                    })
                    .collect();
            }
            Command::SwapCells { r1, c1, r2, c2 } => {
                let (r1, c1, r2, c2) = (coord(r1), coord(c1), coord(r2), coord(c2));
                table.swap(r1, c1, r2, c2);
                if (r1, c1) != (r2, c2) {
                    let a = model.remove(&(r1, c1));
                    let b = model.remove(&(r2, c2));
                    if let Some(v) = b {
                        model.insert((r1, c1), v);
                    }
                    if let Some(v) = a {
                        model.insert((r2, c2), v);
                    }
                }
            }
            Command::Row { r } => {
                let r = coord(r);
                let row = table.row(r);
                assert_eq!(row.len(), table.col_count());
                let expected: Vec<_> = (0..table.col_count())
                    .map(|c| model.get(&(r, c)).copied())
                    .collect();
                assert_eq!(row.to_vec(), expected);
            }
            Command::Col { c } => {
                let c = coord(c);
                let col = table.col(c);
                let expected: Vec<_> = (0..table.row_count())
                    .map(|r| model.get(&(r, c)).copied())
                    .collect();
                assert_eq!(col.to_vec(), expected);
            }
            Command::Clear => {
                table.clear();
                model.clear();
                assert!(table.is_empty());
            }
            Command::Clone => {
                let cloned = table.clone();
                assert_eq!(cloned, table);
            }
        }

        // Final consistency check
        assert_eq!(table.row_count(), model_row_count(&model));
        assert_eq!(table.col_count(), model_col_count(&model));
        assert_eq!(table.cell_count(), model.len());
    }
});
