//! End-to-end scenarios exercising the tree through its public API.

use bptree_kv::btree::key::alphabetical_key32;
use bptree_kv::{BTree, BTreeConfig, BufferPool, BufferPoolImpl, DiskManagerImpl, Record};
use rand::seq::SliceRandom;
use rand::thread_rng;
use std::sync::Arc;
use tempfile::tempdir;

fn open_tree(order: usize, pool_capacity: usize, path: &std::path::Path) -> BTree {
    let disk = Arc::new(DiskManagerImpl::open(path).unwrap());
    let pool = Arc::new(BufferPoolImpl::new(disk.clone(), pool_capacity));
    BTree::open(disk, pool, BTreeConfig::new(order)).unwrap()
}

fn rec(k: i32) -> Record {
    Record::new(&format!("item-{k}"), k, k, k as f64)
}

#[test]
fn s1_empty_tree() {
    let dir = tempdir().unwrap();
    let mut tree = open_tree(15, 10, &dir.path().join("s1.db"));

    assert!(tree.search(42).unwrap().is_none());
    assert!(!tree.remove(42).unwrap());
    assert_eq!(tree.compute_tree_depth().unwrap(), 0);
}

#[test]
fn s2_split_at_five_inserts_with_order_two() {
    let dir = tempdir().unwrap();
    let mut tree = open_tree(2, 10, &dir.path().join("s2.db"));

    for k in [10, 20, 30, 40, 50] {
        tree.insert(k, rec(k)).unwrap();
    }

    assert_eq!(tree.compute_tree_depth().unwrap(), 1);

    let all = tree.range_search(i32::MIN, i32::MAX).unwrap();
    let keys: Vec<i32> = all.iter().map(|(k, _)| *k).collect();
    assert_eq!(keys, vec![10, 20, 30, 40, 50]);
}

#[test]
fn s3_remove_triggers_borrow_from_right() {
    let dir = tempdir().unwrap();
    let mut tree = open_tree(2, 10, &dir.path().join("s3.db"));

    for k in [10, 20, 30, 40, 50] {
        tree.insert(k, rec(k)).unwrap();
    }

    assert!(tree.remove(10).unwrap());

    let all = tree.range_search(i32::MIN, i32::MAX).unwrap();
    let keys: Vec<i32> = all.iter().map(|(k, _)| *k).collect();
    assert_eq!(keys, vec![20, 30, 40, 50]);
    assert!(tree.search(10).unwrap().is_none());
}

#[test]
fn s4_prefix_and_char_range_search() {
    let dir = tempdir().unwrap();
    let mut tree = open_tree(15, 10, &dir.path().join("s4.db"));

    for name in ["Apple", "apricot", "Banana"] {
        tree.insert(alphabetical_key32(name), Record::new(name, 0, 0, 0.0))
            .unwrap();
    }

    let ap = tree.prefix_search("ap").unwrap();
    let mut ap_names: Vec<&str> = ap.iter().map(|(_, r)| r.name()).collect();
    ap_names.sort();
    assert_eq!(ap_names, vec!["Apple", "apricot"]);

    let a_range = tree.range_search_by_char('A', 'A').unwrap();
    assert_eq!(a_range.len(), 2);

    let a_to_b = tree.range_search_by_char('a', 'b').unwrap();
    assert_eq!(a_to_b.len(), 3);
}

#[test]
fn s5_bulk_random_insert_then_search_all() {
    let dir = tempdir().unwrap();
    let disk = Arc::new(DiskManagerImpl::open(&dir.path().join("s5.db")).unwrap());
    let pool = Arc::new(BufferPoolImpl::new(disk.clone(), 10));
    let mut tree = BTree::open(disk, pool.clone(), BTreeConfig::default()).unwrap();

    let mut keys: Vec<i32> = (0..10_000i32).collect();
    keys.shuffle(&mut thread_rng());

    for &k in &keys {
        tree.insert(k, rec(k)).unwrap();
    }

    for &k in &keys {
        let found = tree.search(k).unwrap();
        assert_eq!(found.unwrap().protein, k);
    }

    let stats = pool.stats();
    assert!(stats.evictions > 0, "expected evictions with a pool of 10 frames and 10,000 keys");
}

#[test]
fn s6_persistence_across_reopen() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("s6.db");

    let keys = [5, 1, 9, 3, 7, 2, 8, 4, 6];
    {
        let mut tree = open_tree(15, 10, &path);
        for &k in &keys {
            tree.insert(k, rec(k)).unwrap();
        }
        tree.flush().unwrap();
    }

    {
        let tree = open_tree(15, 10, &path);
        for &k in &keys {
            assert_eq!(tree.search(k).unwrap().unwrap().protein, k);
        }
        let all = tree.range_search(i32::MIN, i32::MAX).unwrap();
        let mut sorted_keys: Vec<i32> = keys.to_vec();
        sorted_keys.sort();
        assert_eq!(all.iter().map(|(k, _)| *k).collect::<Vec<_>>(), sorted_keys);
    }
}

#[test]
fn r_invariants_round_trip_and_overwrite() {
    let dir = tempdir().unwrap();
    let mut tree = open_tree(3, 10, &dir.path().join("r.db"));

    tree.insert(1, rec(1)).unwrap();
    assert_eq!(tree.search(1).unwrap().unwrap().protein, 1);

    tree.insert(1, Record::new("item-1b", 99, 99, 9.9)).unwrap();
    assert_eq!(tree.search(1).unwrap().unwrap().protein, 99);

    assert!(tree.remove(1).unwrap());
    assert!(tree.search(1).unwrap().is_none());
    assert!(!tree.remove(1).unwrap());
}

#[test]
fn r5_bloom_toggle_agrees_after_many_ops() {
    let dir = tempdir().unwrap();
    let mut tree = open_tree(3, 10, &dir.path().join("r5.db"));

    for k in (0..200).step_by(3) {
        tree.insert(k, rec(k)).unwrap();
    }
    for k in (0..200).step_by(9) {
        tree.remove(k).unwrap();
    }

    for k in 0..200 {
        assert_eq!(
            tree.search(k).unwrap().map(|r| r.protein),
            tree.search_no_bloom(k).unwrap().map(|r| r.protein)
        );
    }
}

#[test]
fn b1_root_leaf_overflow_yields_two_level_tree() {
    let dir = tempdir().unwrap();
    let mut tree = open_tree(2, 10, &dir.path().join("b1.db"));

    for k in [1, 2, 3, 4, 5] {
        tree.insert(k, rec(k)).unwrap();
    }

    assert_eq!(tree.compute_tree_depth().unwrap(), 1);
}

#[test]
fn b2_deleting_last_key_resets_tree_and_allows_reinsert() {
    let dir = tempdir().unwrap();
    let mut tree = open_tree(15, 10, &dir.path().join("b2.db"));

    tree.insert(1, rec(1)).unwrap();
    assert!(tree.remove(1).unwrap());
    assert!(!tree.has_root());

    tree.insert(2, rec(2)).unwrap();
    assert!(tree.has_root());
    assert_eq!(tree.search(2).unwrap().unwrap().protein, 2);
}

#[test]
fn b4_char_range_swapped_arguments() {
    let dir = tempdir().unwrap();
    let mut tree = open_tree(15, 10, &dir.path().join("b4.db"));

    for name in ["Apple", "Banana", "Cherry"] {
        tree.insert(alphabetical_key32(name), Record::new(name, 0, 0, 0.0))
            .unwrap();
    }

    let forward = tree.range_search_by_char('A', 'C').unwrap();
    let swapped = tree.range_search_by_char('C', 'A').unwrap();
    assert_eq!(forward.len(), swapped.len());
    assert_eq!(forward.len(), 3);
}
