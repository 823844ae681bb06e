#![cfg(feature = "serde")]
//! Serde round-trip tests for OrderedHashMap.

use mapops::ordered::OrderedHashMap;
use rstest::rstest;

// =============================================================================
// Serialization
// =============================================================================

#[rstest]
fn test_serialize_empty_map() {
    let map: OrderedHashMap<String, i32> = OrderedHashMap::new();
    let json = serde_json::to_string(&map).unwrap();
    assert_eq!(json, "{}");
}

#[rstest]
fn test_serialize_follows_insertion_order() {
    let mut map = OrderedHashMap::new();
    map.insert("zebra".to_string(), 1);
    map.insert("apple".to_string(), 2);

    let json = serde_json::to_string(&map).unwrap();
    assert_eq!(json, r#"{"zebra":1,"apple":2}"#);
}

// =============================================================================
// Deserialization
// =============================================================================

#[rstest]
fn test_deserialize_preserves_document_order() {
    let json = r#"{"c": 3, "a": 1, "b": 2}"#;
    let map: OrderedHashMap<String, i32> = serde_json::from_str(json).unwrap();

    assert_eq!(map.len(), 3);
    let keys: Vec<&str> = map.keys().map(|key| key.as_str()).collect();
    assert_eq!(keys, vec!["c", "a", "b"]);
}

#[rstest]
fn test_deserialize_rejects_non_map_input() {
    let result: Result<OrderedHashMap<String, i32>, _> = serde_json::from_str("[1, 2, 3]");
    assert!(result.is_err());
}

// =============================================================================
// Round Trips
// =============================================================================

#[rstest]
fn test_round_trip_preserves_entries_and_order() {
    let mut map = OrderedHashMap::new();
    for n in 0..20 {
        map.insert(format!("key{n}"), n);
    }

    let json = serde_json::to_string(&map).unwrap();
    let restored: OrderedHashMap<String, i32> = serde_json::from_str(&json).unwrap();

    assert_eq!(restored, map);
    let original_keys: Vec<&str> = map.keys().map(|key| key.as_str()).collect();
    let restored_keys: Vec<&str> = restored.keys().map(|key| key.as_str()).collect();
    assert_eq!(restored_keys, original_keys);
}

#[rstest]
fn test_round_trip_with_structured_values() {
    let mut map = OrderedHashMap::new();
    map.insert("xs".to_string(), vec![1, 2, 3]);
    map.insert("ys".to_string(), vec![]);

    let json = serde_json::to_string(&map).unwrap();
    let restored: OrderedHashMap<String, Vec<i32>> = serde_json::from_str(&json).unwrap();

    assert_eq!(restored, map);
}
