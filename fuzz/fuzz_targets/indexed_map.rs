#![no_main]

use arbitrary::{Arbitrary, Unstructured};
use libfuzzer_sys::fuzz_target;

use std::collections::BTreeMap;
use tabulae::IndexedMap as TestMap;

#[derive(Debug, Arbitrary)]
enum Command {
    Clear,
    ContainsKey { key: u8 },
    FirstKeyValue,
    Get { key: u8 },
    GetKeyValue { key: u8 },
    KeyAt { index: usize },
    ValueAt { index: usize },
    EntryAt { index: usize },
    IndexOfKey { key: u8 },
    Insert { key: u8, value: u8 },
    Offer { key: u8, value: u8 },
    SetValueAt { index: usize, value: u8 },
    IsEmpty,
    Iter,
    Keys,
    Values,
    Cursor,
    LastKeyValue,
    Len,
    PopFirst,
    PopLast,
    RemoveAt { index: usize },
    Remove { key: u8 },
    RemoveEntry { key: u8 },
    Retain { threshold: u8 },
    SubMap { from: u8, to: u8 },
    Clone,
}

fuzz_target!(|data: &[u8]| {
    let mut unstructured = Unstructured::new(data);
    let commands = match Vec::<Command>::arbitrary(&mut unstructured) {
        Ok(c) => c,
        Err(_) => return,
    };

    let mut map: TestMap<u8, u8> = TestMap::new();
    let mut model: BTreeMap<u8, u8> = BTreeMap::new();

    for command in commands {
        if std::env::var("RUST_BACKTRACE").is_ok() {
            println!("{command:?}");
        }

        match command {
            Command::Clear => {
                map.clear();
                model.clear();
                assert_eq!(map.len(), 0);
            }
            Command::ContainsKey { key } => {
                assert_eq!(map.contains_key(&key), model.contains_key(&key));
            }
            Command::FirstKeyValue => {
                assert_eq!(
                    map.first_key_value().map(|r| *r),
                    model.first_key_value().map(|(&k, &v)| (k, v))
                );
            }
            Command::Get { key } => {
                assert_eq!(map.get(&key).map(|r| *r), model.get(&key).copied());
            }
            Command::GetKeyValue { key } => {
                assert_eq!(
                    map.get_key_value(&key).map(|r| *r),
                    model.get_key_value(&key).map(|(&k, &v)| (k, v))
                );
            }
            Command::KeyAt { index } => {
                assert_eq!(
                    map.key_at(index).map(|r| *r),
                    model.keys().nth(index).copied()
                );
            }
            Command::ValueAt { index } => {
                assert_eq!(
                    map.value_at(index).map(|r| *r),
                    model.values().nth(index).copied()
                );
            }
            Command::EntryAt { index } => {
                assert_eq!(
                    map.entry_at(index).map(|r| *r),
                    model.iter().nth(index).map(|(&k, &v)| (k, v))
                );
            }
            Command::IndexOfKey { key } => {
                let expected = if model.contains_key(&key) {
                    Some(model.range(..key).count())
                } else {
                    None
                };
                assert_eq!(map.index_of_key(&key), expected);
            }
            Command::Insert { key, value } => {
                assert_eq!(map.insert(key, value), model.insert(key, value));
            }
            Command::Offer { key, value } => {
                let fresh = !model.contains_key(&key);
                assert_eq!(map.offer(key, value), fresh);
                if fresh {
                    model.insert(key, value);
                }
            }
            Command::SetValueAt { index, value } => {
                if index < model.len() {
                    let key = *model.keys().nth(index).unwrap();
                    let old = model.insert(key, value).unwrap();
                    assert_eq!(map.set_value_at(index, value), old);
                }
            }
            Command::IsEmpty => {
                assert_eq!(map.is_empty(), model.is_empty());
            }
            Command::Iter => {
                assert!(map.iter().eq(model.iter().map(|(&k, &v)| (k, v))));
            }
            Command::Keys => {
                assert!(map.keys().eq(model.keys().copied()));
            }
            Command::Values => {
                assert!(map.values().eq(model.values().copied()));
            }
            Command::Cursor => {
                let mut cursor = map.cursor();
                let mut walked = Vec::new();
                while let Some(entry) = cursor.next() {
                    walked.push(entry);
                }
                let expected: Vec<_> = model.iter().map(|(&k, &v)| (k, v)).collect();
                assert_eq!(walked, expected);
            }
            Command::LastKeyValue => {
                assert_eq!(
                    map.last_key_value().map(|r| *r),
                    model.last_key_value().map(|(&k, &v)| (k, v))
                );
            }
            Command::Len => {
                assert_eq!(map.len(), model.len());
            }
            Command::PopFirst => {
                assert_eq!(map.pop_first(), model.pop_first());
            }
            Command::PopLast => {
                assert_eq!(map.pop_last(), model.pop_last());
            }
            Command::RemoveAt { index } => {
                if index < model.len() {
                    let key = *model.keys().nth(index).unwrap();
                    let value = model.remove(&key).unwrap();
                    assert_eq!(map.remove_at(index), (key, value));
                }
            }
            Command::Remove { key } => {
                assert_eq!(map.remove(&key), model.remove(&key));
            }
            Command::RemoveEntry { key } => {
                assert_eq!(map.remove_entry(&key), model.remove_entry(&key));
            }
            Command::Retain { threshold } => {
                map.retain(|k, _| *k <= threshold);
                model.retain(|k, _| *k <= threshold);
            }
            Command::SubMap { from, to } => {
                if from > to {
                    continue;
                }
                let view = map.sub_map(from, to);
                let expected: Vec<_> = model.range(from..to).map(|(&k, &v)| (k, v)).collect();
                assert_eq!(view.entries(), expected);
                assert_eq!(view.len(), model.range(from..to).count());
            }
            Command::Clone => {
                let cloned = map.clone();
                assert!(cloned.iter().eq(map.iter()));
            }
        }

        // Final consistency check
        let map_contents: Vec<_> = map.iter().collect();
        let model_contents: Vec<_> = model.iter().map(|(&k, &v)| (k, v)).collect();
        assert_eq!(map_contents, model_contents);
    }
});
