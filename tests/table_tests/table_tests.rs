//! Table Tests
//!
//! Tests verify:
//! - Insert-or-overwrite semantics
//! - Idempotent delete
//! - Lookups after mixed sequences
//! - Deterministic print order

use gatekv::table::{jenkins_one_at_a_time, Record, Table};

// =============================================================================
// Basic Operations Tests
// =============================================================================

#[test]
fn test_new_table_is_empty() {
    let table = Table::new();
    assert_eq!(table.len(), 0);
    assert!(table.is_empty());
    assert!(table.snapshot().is_empty());
}

#[test]
fn test_insert_and_search() {
    let mut table = Table::new();

    table.insert("alice", 100);

    let record = table.search("alice").unwrap();
    assert_eq!(record.key, "alice");
    assert_eq!(record.value, 100);
    assert_eq!(record.hash, jenkins_one_at_a_time(b"alice"));
}

#[test]
fn test_search_nonexistent_key() {
    let table = Table::new();
    assert!(table.search("nobody").is_none());
}

#[test]
fn test_insert_overwrites_existing() {
    let mut table = Table::new();

    table.insert("alice", 100);
    table.insert("alice", 250);

    assert_eq!(table.len(), 1);
    assert_eq!(table.search("alice").unwrap().value, 250);
}

// =============================================================================
// Delete Tests
// =============================================================================

#[test]
fn test_delete_removes_record() {
    let mut table = Table::new();

    table.insert("bob", 200);
    let removed = table.delete("bob");

    assert_eq!(removed, Some(Record::new("bob", 200)));
    assert!(table.search("bob").is_none());
    assert!(table.is_empty());
}

#[test]
fn test_delete_absent_key_is_noop() {
    let mut table = Table::new();
    table.insert("alice", 100);

    assert!(table.delete("bob").is_none());

    assert_eq!(table.len(), 1);
    assert_eq!(table.snapshot(), vec![Record::new("alice", 100)]);
}

#[test]
fn test_insert_after_delete() {
    let mut table = Table::new();

    table.insert("carol", 1);
    table.delete("carol");
    table.insert("carol", 2);

    assert_eq!(table.search("carol").unwrap().value, 2);
}

#[test]
fn test_latest_insert_not_followed_by_delete_wins() {
    let mut table = Table::new();
    let ops: &[(&str, Option<u32>)] = &[
        ("a", Some(1)),
        ("b", Some(2)),
        ("a", Some(3)),
        ("b", None),
        ("c", Some(4)),
        ("c", None),
        ("c", Some(5)),
    ];

    for (key, value) in ops {
        match value {
            Some(v) => table.insert(key, *v),
            None => {
                table.delete(key);
            }
        }
    }

    assert_eq!(table.search("a").map(|r| r.value), Some(3));
    assert_eq!(table.search("b"), None);
    assert_eq!(table.search("c").map(|r| r.value), Some(5));
}

// =============================================================================
// Print Order Tests
// =============================================================================

#[test]
fn test_print_order_is_by_hash() {
    let mut table = Table::new();
    for (i, key) in ["zed", "amy", "Richard Garriot", "Sid Meier", "x"].iter().enumerate() {
        table.insert(key, i as u32);
    }

    let snapshot = table.snapshot();
    let hashes: Vec<u32> = snapshot.iter().map(|r| r.hash).collect();
    let mut sorted = hashes.clone();
    sorted.sort();

    assert_eq!(hashes, sorted);
    assert_eq!(snapshot.len(), 5);
}

#[test]
fn test_print_order_is_independent_of_insert_order() {
    let keys = ["one", "two", "three", "four", "five", "six"];

    let mut forward = Table::new();
    for key in keys {
        forward.insert(key, 1);
    }

    let mut backward = Table::new();
    for key in keys.iter().rev() {
        backward.insert(key, 1);
    }

    assert_eq!(forward.snapshot(), backward.snapshot());
}

#[test]
fn test_for_each_matches_snapshot() {
    let mut table = Table::new();
    table.insert("k1", 10);
    table.insert("k2", 20);

    let mut visited = Vec::new();
    table.for_each_in_print_order(|r| visited.push(r.clone()));

    assert_eq!(visited, table.snapshot());
}
