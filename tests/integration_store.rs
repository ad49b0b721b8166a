//! Contract tests for the bundled fixture
//!
//! Every property the fixture has to keep for the tests that consume it.

mod fixtures;

use fixtures::helpers;
use itertools::Itertools;
use json_fixtures::baseline::{fingerprint, SizeBaseline};
use json_fixtures::codec::{builtin_codecs, round_trip, Codec, JsonCodec};
use json_fixtures::contract::{check_idempotent, check_records, check_schema, ContractOptions};
use json_fixtures::store::{self, FixtureStore, BUNDLED_NAME, BUNDLED_RECORDS};
use json_fixtures::types::FIELD_NAMES;
use std::collections::HashSet;

#[test]
fn test_indexes_are_contiguous() {
    let store = store::load().unwrap();
    let indexes: Vec<usize> = store.records().iter().map(|r| r.index).collect();
    assert_eq!(indexes, (0..BUNDLED_RECORDS).collect::<Vec<_>>());
}

#[test]
fn test_ids_are_distinct() {
    let store = store::load().unwrap();
    let ids: HashSet<&str> = store.records().iter().map(|r| r.id.as_str()).collect();
    assert_eq!(ids.len(), store.len());
}

#[test]
fn test_schema_is_homogeneous() {
    let violations = check_schema(BUNDLED_NAME, store::bundled_source()).unwrap();
    assert!(violations.is_empty(), "{:#?}", violations);

    let raw: Vec<serde_json::Value> = serde_json::from_str(store::bundled_source()).unwrap();
    let expected: Vec<&str> = FIELD_NAMES.iter().copied().sorted().collect();
    for item in raw.iter() {
        let keys: Vec<&str> = item
            .as_object()
            .unwrap()
            .keys()
            .map(String::as_str)
            .sorted()
            .collect();
        assert_eq!(keys, expected);
    }
}

#[test]
fn test_friends_survive_round_trip() {
    let records = store::load().unwrap().records();
    let codec = JsonCodec::compact();
    let decoded = codec.decode(&codec.encode(records).unwrap()).unwrap();
    for record in decoded.iter() {
        let ids: Vec<u32> = record.friends.iter().map(|f| f.id).collect();
        assert_eq!(ids, vec![0, 1, 2], "friends of record {}", record.index);
    }
}

#[test]
fn test_full_contract() {
    let store = store::load().unwrap();
    let opts = ContractOptions {
        expected_records: Some(BUNDLED_RECORDS),
        ..Default::default()
    };
    let report = check_records(store.name(), store.records(), &opts);
    helpers::assert_clean(&report);
}

#[test]
fn test_load_is_idempotent() {
    let first = store::load().unwrap();
    let second = store::load().unwrap();
    assert!(std::ptr::eq(first, second));

    let violation =
        check_idempotent(|| FixtureStore::from_json(BUNDLED_NAME, store::bundled_source()))
            .unwrap();
    assert_eq!(violation, None);
    assert_eq!(
        &FixtureStore::from_json(BUNDLED_NAME, store::bundled_source()).unwrap(),
        first
    );
}

#[test]
fn test_round_trip_every_codec() {
    let records = store::load().unwrap().records();
    for codec in builtin_codecs() {
        let res = round_trip(codec.as_ref(), records).unwrap();
        assert!(
            res.is_exact(),
            "{} round trip changed record {:?}",
            res.codec,
            res.first_mismatch
        );
        assert_eq!(res.decoded_records, BUNDLED_RECORDS);
    }
}

#[test]
fn test_size_is_stable() {
    let records = store::load().unwrap().records();
    let report = SizeBaseline::bundled().check(records).unwrap();
    assert!(report.is_within(), "{:?}", report);
    // The fixture file is stored in the compact encoding
    let source_len = store::bundled_source().len() as u64;
    assert!(SizeBaseline::bundled().within(source_len));
}

#[test]
fn test_fingerprint_is_stable() {
    let records = store::load().unwrap().records();
    let reloaded = FixtureStore::from_json(BUNDLED_NAME, store::bundled_source()).unwrap();
    assert_eq!(
        fingerprint(records).unwrap(),
        fingerprint(reloaded.records()).unwrap()
    );
}

#[test]
fn test_shared_across_threads() {
    let expected = store::load().unwrap() as *const FixtureStore as usize;
    std::thread::scope(|scope| {
        let handles: Vec<_> = (0..8)
            .map(|worker| {
                scope.spawn(move || {
                    let store = store::load().unwrap();
                    let record = store.get(worker * 90).unwrap();
                    assert_eq!(record.index, worker * 90);
                    store as *const FixtureStore as usize
                })
            })
            .collect();
        for handle in handles {
            assert_eq!(handle.join().unwrap(), expected);
        }
    });
}
