//! Property-Based Tests for Store Module
//!
//! Uses proptest to check capacity, ordering, id assignment and
//! cache/store agreement over arbitrary save sequences.

use chrono::{DateTime, Duration, TimeZone, Utc};
use proptest::prelude::*;
use std::collections::HashSet;

use crate::store::{WeatherRecord, WeatherRecordStore};

// == Test Configuration ==
const TEST_MAX_RETAINED: usize = 20;
const TEST_CACHED_LIMITS: [usize; 2] = [5, 10];

fn base_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()
}

// == Strategies ==
/// Generates location keys from a small pool so partitions collide
fn location_strategy() -> impl Strategy<Value = String> {
    prop::sample::select(vec!["10001", "60601", "94103"]).prop_map(str::to_string)
}

/// A save with an optional explicit id and a fetch offset in seconds
#[derive(Debug, Clone)]
struct Save {
    location: String,
    id: Option<u64>,
    offset: i64,
}

fn save_strategy() -> impl Strategy<Value = Save> {
    (
        location_strategy(),
        prop::option::of(1u64..60),
        0i64..10_000,
    )
        .prop_map(|(location, id, offset)| Save {
            location,
            id,
            offset,
        })
}

#[derive(Debug, Clone)]
enum StoreOp {
    Save(Save),
    Latest(String),
    Recent(String, usize),
    ClearCache,
    ClearZip(String),
}

fn store_op_strategy() -> impl Strategy<Value = StoreOp> {
    prop_oneof![
        4 => save_strategy().prop_map(StoreOp::Save),
        1 => location_strategy().prop_map(StoreOp::Latest),
        1 => (location_strategy(), prop::sample::select(vec![1usize, 5, 7, 10, 25]))
            .prop_map(|(location, limit)| StoreOp::Recent(location, limit)),
        1 => Just(StoreOp::ClearCache),
        1 => location_strategy().prop_map(StoreOp::ClearZip),
    ]
}

fn to_record(save: &Save) -> WeatherRecord {
    let at = base_time() + Duration::seconds(save.offset);
    let record = WeatherRecord::new(save.location.clone(), at, at);
    match save.id {
        Some(id) => record.with_id(id),
        None => record,
    }
}

fn new_store() -> WeatherRecordStore {
    WeatherRecordStore::with_capacity(TEST_MAX_RETAINED, &TEST_CACHED_LIMITS)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    // Partition size is min(unique ids saved, capacity) and ordered newest-first
    #[test]
    fn prop_capacity_and_order(saves in prop::collection::vec(save_strategy(), 1..80)) {
        let store = new_store();
        let mut assigned: Vec<(String, u64)> = Vec::new();

        for save in &saves {
            let stored = store.save(to_record(save)).unwrap();
            assigned.push((stored.location.clone(), stored.id.unwrap().0));
        }

        for location in ["10001", "60601", "94103"] {
            let unique: HashSet<u64> = assigned
                .iter()
                .filter(|(loc, _)| loc == location)
                .map(|(_, id)| *id)
                .collect();
            let history = store.history(location);

            prop_assert_eq!(history.len(), unique.len().min(TEST_MAX_RETAINED));
            prop_assert!(
                history.windows(2).all(|pair| pair[0].fetched_at >= pair[1].fetched_at),
                "Partition {} not sorted newest-first",
                location
            );

            let ids: HashSet<_> = history.iter().map(|r| r.id).collect();
            prop_assert_eq!(ids.len(), history.len(), "Duplicate ids in partition");
        }
    }

    // Generated ids never reuse an id already issued or supplied by a caller
    #[test]
    fn prop_generated_ids_unique(explicit in prop::collection::vec(prop::option::of(1u64..60), 1..60)) {
        let store = new_store();
        let mut seen = HashSet::new();

        for (offset, id) in explicit.into_iter().enumerate() {
            let at = base_time() + Duration::seconds(offset as i64);
            let record = WeatherRecord::new("10001", at, at);
            match id {
                Some(id) => {
                    let stored = store.save(record.with_id(id)).unwrap();
                    seen.insert(stored.id.unwrap());
                }
                None => {
                    let stored = store.save(record).unwrap();
                    prop_assert!(seen.insert(stored.id.unwrap()), "Generated id reused");
                }
            }
        }
    }

    // Cached reads always equal a fresh computation from the partition
    #[test]
    fn prop_cache_agrees_with_store(ops in prop::collection::vec(store_op_strategy(), 1..120)) {
        let store = new_store();

        for op in ops {
            match op {
                StoreOp::Save(save) => {
                    store.save(to_record(&save)).unwrap();
                }
                StoreOp::Latest(location) => {
                    let expected = store.history(&location).first().cloned();
                    prop_assert_eq!(store.find_most_recent_by_zip(&location), expected);
                }
                StoreOp::Recent(location, limit) => {
                    let history = store.history(&location);
                    let expected = history[..limit.min(history.len())].to_vec();
                    prop_assert_eq!(store.find_recent_by_zip(&location, limit), expected);
                }
                StoreOp::ClearCache => store.clear_cache(),
                StoreOp::ClearZip(location) => {
                    store.clear_cache_for_zip(&location);
                    prop_assert!(store.find_most_recent_by_zip(&location).is_none());
                }
            }
        }

        for location in ["10001", "60601", "94103"] {
            let history = store.history(&location);
            for limit in TEST_CACHED_LIMITS {
                let expected = history[..limit.min(history.len())].to_vec();
                prop_assert_eq!(store.find_recent_by_zip(location, limit), expected);
            }
        }
    }

    // Range results are exactly the partition records inside the bounds
    #[test]
    fn prop_range_matches_filter(
        saves in prop::collection::vec(save_strategy(), 1..60),
        start in 0i64..10_000,
        width in 0i64..5_000,
    ) {
        let store = new_store();
        for save in &saves {
            store.save(to_record(save)).unwrap();
        }

        let start = base_time() + Duration::seconds(start);
        let end = start + Duration::seconds(width);

        for location in ["10001", "60601", "94103"] {
            let expected: Vec<_> = store
                .history(location)
                .into_iter()
                .filter(|r| r.fetched_at >= start && r.fetched_at <= end)
                .collect();
            let actual = store
                .find_by_location_zip_and_fetched_at_between(location, start, end)
                .unwrap();
            prop_assert_eq!(actual, expected);
        }
    }
}
