//! Property tests for the engine's quantified invariants.

#![cfg(feature = "full")]

use std::convert::Infallible;
use std::fmt;

use avl_auth_tree::node::Node;
use avl_auth_tree::{AvlConfig, Blake3Labeler, InMemoryNodeStore, Key, Operation, Value, ValueLength};
use proptest::prelude::*;

const KEY_LEN: usize = 2;

fn config() -> AvlConfig {
    AvlConfig::new(KEY_LEN, ValueLength::Fixed(2))
}

fn new_prover() -> InMemoryNodeStore<Blake3Labeler, Infallible> {
    InMemoryNodeStore::new(config(), Blake3Labeler)
}

fn key(bytes: [u8; KEY_LEN]) -> Key {
    // Never generate a sentinel: clamp the first byte away from the
    // extremes so `0x00..` / `0xFF..` is never produced.
    let mut b = bytes;
    if b.iter().all(|&x| x == 0x00) {
        b[0] = 0x01;
    }
    if b.iter().all(|&x| x == 0xFF) {
        b[0] = 0xFE;
    }
    Key::new(b.to_vec())
}

fn val(bytes: [u8; 2]) -> Value {
    Value::new(bytes.to_vec())
}

/// Returns (actual_height, in_order_keys, every_balance_within_one).
fn inspect(node: &avl_auth_tree::node::NodeRef) -> (u8, Vec<Key>, bool) {
    match &**node {
        Node::Leaf(leaf) => (0, vec![leaf.key.clone()], true),
        Node::Internal(inode) => {
            let (left_height, mut left_keys, left_ok) = inspect(&inode.left);
            let (right_height, right_keys, right_ok) = inspect(&inode.right);
            let actual_balance = left_height as i16 - right_height as i16;
            let balance_ok = left_ok && right_ok && actual_balance == inode.balance as i16 && inode.balance.abs() <= 1;
            left_keys.extend(right_keys);
            (1 + left_height.max(right_height), left_keys, balance_ok)
        }
        Node::LabelOnly(_) => panic!("a fully materialized prover tree must never contain a LabelOnly node"),
    }
}

/// Walks the `next_leaf_key` chain starting from the minimum leaf.
fn next_leaf_key_chain(node: &avl_auth_tree::node::NodeRef) -> Vec<Key> {
    fn min_leaf(node: &avl_auth_tree::node::NodeRef) -> (Key, Key) {
        match &**node {
            Node::Leaf(leaf) => (leaf.key.clone(), leaf.next_leaf_key.clone()),
            Node::Internal(inode) => min_leaf(&inode.left),
            Node::LabelOnly(_) => panic!("unexpected LabelOnly"),
        }
    }
    fn find_leaf_by_key<'a>(node: &'a avl_auth_tree::node::NodeRef, target: &Key) -> Option<&'a avl_auth_tree::node::LeafNode> {
        match &**node {
            Node::Leaf(leaf) if leaf.key == *target => Some(leaf),
            Node::Leaf(_) => None,
            Node::Internal(inode) => find_leaf_by_key(&inode.left, target).or_else(|| find_leaf_by_key(&inode.right, target)),
            Node::LabelOnly(_) => None,
        }
    }

    let mut chain = Vec::new();
    let (mut cur_key, mut next) = min_leaf(node);
    chain.push(cur_key.clone());
    while !next.is_positive_infinity() {
        cur_key = next.clone();
        chain.push(cur_key.clone());
        let leaf = find_leaf_by_key(node, &cur_key).expect("next_leaf_key must point at a real leaf");
        next = leaf.next_leaf_key.clone();
    }
    chain
}

proptest! {
    #[test]
    fn balances_and_in_order_traversal_hold_after_random_batches(
        ops in prop::collection::vec((any::<[u8; KEY_LEN]>(), any::<[u8; 2]>(), any::<bool>()), 1..60)
    ) {
        let mut prover = new_prover();
        for (k, v, is_delete) in ops {
            let op = if is_delete {
                Operation::delete(key(k))
            } else {
                Operation::upsert(key(k), val(v))
            };
            prover.apply_one(op).unwrap();
        }

        let (_, keys, balances_ok) = inspect(prover.tree().root());
        prop_assert!(balances_ok, "every internal node's balance must be within [-1, 1] and match actual height difference");

        let mut sorted = keys.clone();
        sorted.sort();
        prop_assert_eq!(keys, sorted, "in-order traversal must yield strictly increasing keys");
    }

    #[test]
    fn next_leaf_key_chain_visits_every_leaf_in_order(
        keys in prop::collection::hash_set(any::<[u8; KEY_LEN]>(), 1..20)
    ) {
        let mut prover = new_prover();
        let mut inserted: Vec<Key> = Vec::new();
        for k in keys {
            let k = key(k);
            if inserted.contains(&k) {
                continue;
            }
            prover.apply_one(Operation::upsert(k.clone(), val([0, 0]))).unwrap();
            inserted.push(k);
        }
        inserted.sort();

        let chain = next_leaf_key_chain(prover.tree().root());
        // The chain always starts at the implicit -infinity leaf's key
        // and walks forward; drop that boundary leaf before comparing.
        let user_chain: Vec<Key> = chain.into_iter().filter(|k| !k.is_negative_infinity()).collect();
        prop_assert_eq!(user_chain, inserted);
    }

    #[test]
    fn no_op_update_on_missing_key_is_idempotent(k in any::<[u8; KEY_LEN]>()) {
        let mut prover = new_prover();
        let digest_before = prover.digest();
        prover.apply_one(Operation::delete(key(k))).unwrap();
        prop_assert_eq!(prover.digest(), digest_before);
    }

    #[test]
    fn reinserting_the_same_value_is_idempotent(k in any::<[u8; KEY_LEN]>(), v in any::<[u8; 2]>()) {
        let mut prover = new_prover();
        prover.apply_one(Operation::upsert(key(k), val(v))).unwrap();
        let digest_after_first = prover.digest();
        prover.apply_one(Operation::upsert(key(k), val(v))).unwrap();
        prop_assert_eq!(prover.digest(), digest_after_first);
    }
}

#[test]
fn long_monotonic_insert_spine_keeps_balance_bounded() {
    let config = AvlConfig::new(4, ValueLength::Fixed(4));
    let mut prover: InMemoryNodeStore<Blake3Labeler, Infallible> = InMemoryNodeStore::new(config, Blake3Labeler);
    for n in 0..1000u32 {
        prover
            .apply_one(Operation::upsert(Key::new(n.to_be_bytes().to_vec()), Value::new(n.to_be_bytes().to_vec())))
            .unwrap();
    }
    let (height, _keys, balances_ok) = inspect(prover.tree().root());
    assert!(balances_ok);
    // A balanced tree over 1000 keys should never approach a linear
    // spine's height.
    assert!((height as u32) < 32);
}

#[derive(Debug)]
struct Rejected;

impl fmt::Display for Rejected {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "rejected")
    }
}

impl std::error::Error for Rejected {}

#[test]
fn aborted_operations_leave_the_tree_untouched() {
    let config = AvlConfig::new(2, ValueLength::Fixed(2));
    let mut prover: InMemoryNodeStore<Blake3Labeler, Rejected> = InMemoryNodeStore::new(config, Blake3Labeler);
    prover.apply_one(Operation::upsert(key([1, 0]), val([9, 9]))).unwrap();
    prover.reset_visited();

    let digest_before = prover.digest();
    let height_before = prover.tree().root_height();

    let err = prover
        .apply_one(Operation::modification(key([2, 0]), |_current| Err(Rejected)))
        .unwrap_err();
    assert!(matches!(err, avl_auth_tree::Error::UpdateRejected(_)));

    assert_eq!(prover.digest(), digest_before);
    assert_eq!(prover.tree().root_height(), height_before);
    assert!(!prover.tree().root().is_visited(), "an aborted operation must not mark the root visited");
}
