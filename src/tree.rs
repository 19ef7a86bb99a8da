//! The tree wrapper both roles are built on: owns the current root,
//! the tree's height, its [`AvlConfig`], and the role's [`RoleHooks`]
//! implementation, and exposes the single entry point described by
//! the single batch-entry entry point.

use crate::config::AvlConfig;
use crate::digest::Digest;
use crate::error::Error;
use crate::hooks::RoleHooks;
use crate::key::Key;
use crate::node::{new_leaf_ref, Node, NodeRef};
use crate::operation::{OpKind, Operation};
use crate::value::Value;
use crate::walk::{delete_helper, modify_helper, ModifyRequest};

/// One batch-operation engine: a root, its height, the fixed
/// configuration, and the role-specific hooks the shared walks run
/// against. A prover instantiates this over a materialized tree; a
/// verifier instantiates it over a proof-backed cursor. Neither the
/// walks nor this wrapper know which.
pub struct AvlTree<H: RoleHooks> {
    root: NodeRef,
    root_height: u8,
    config: AvlConfig,
    hooks: H,
}

impl<H: RoleHooks> AvlTree<H> {
    pub fn new(root: NodeRef, root_height: u8, config: AvlConfig, hooks: H) -> Self {
        AvlTree {
            root,
            root_height,
            config,
            hooks,
        }
    }

    /// An empty tree: a single leaf bracketed by the two sentinels
    /// (the boundary case for inserting into an empty tree).
    pub fn empty(config: AvlConfig, hooks: H) -> Self {
        let root = new_leaf_ref(
            Key::negative_infinity(config.key_length),
            Value::new(Vec::new()),
            Key::positive_infinity(config.key_length),
            &hooks,
        );
        AvlTree {
            root,
            root_height: 0,
            config,
            hooks,
        }
    }

    pub fn root(&self) -> &NodeRef {
        &self.root
    }

    pub fn root_height(&self) -> u8 {
        self.root_height
    }

    pub fn config(&self) -> &AvlConfig {
        &self.config
    }

    pub fn hooks(&self) -> &H {
        &self.hooks
    }

    pub fn hooks_mut(&mut self) -> &mut H {
        &mut self.hooks
    }

    /// The externally visible commitment to the current mapping.
    pub fn digest(&self) -> Digest {
        Digest::new(*self.root.label(), self.root_height)
    }

    /// Applies one batch entry. On success returns the
    /// value observed at `key` before the operation (`None` if it was
    /// absent). On any error the tree is left exactly as it was.
    pub fn apply_one(&mut self, op: Operation<H::UpdateError>) -> Result<Option<Value>, Error<H::UpdateError>> {
        if op.key.len() != self.config.key_length {
            return Err(Error::Precondition("key length does not match this tree's key_length"));
        }
        if op.key.is_negative_infinity() || op.key.is_positive_infinity() {
            return Err(Error::Precondition("key collides with a reserved sentinel"));
        }

        self.hooks.begin_operation();

        let Operation { key, kind } = op;
        let (is_lookup, update_fn) = match kind {
            OpKind::Lookup => (true, None),
            OpKind::Modification(f) => (false, Some(f)),
        };
        let mut request = ModifyRequest {
            key: &key,
            is_lookup,
            update_fn,
        };

        let outcome = modify_helper(&mut self.hooks, self.root.clone(), &mut request, &self.config)?;

        if outcome.to_delete {
            let deleted = delete_helper(&mut self.hooks, outcome.new_node, false)?;
            self.root = deleted.new_node;
            if deleted.height_decreased {
                self.root_height = self
                    .root_height
                    .checked_sub(1)
                    .ok_or(Error::Invariant("root_height underflowed on deletion"))?;
            }
        } else {
            self.root = outcome.new_node;
            if outcome.height_increased {
                self.root_height = self
                    .root_height
                    .checked_add(1)
                    .ok_or(Error::Invariant("root_height overflowed on insertion"))?;
            }
        }

        Ok(outcome.old_value)
    }

    /// Clears every node's `visited` flag. Driver-level bookkeeping
    /// between batches — not called automatically,
    /// since a caller may want to inspect which nodes a batch touched
    /// before resetting.
    pub fn reset_visited(&self) {
        reset_visited_rec(&self.root);
    }
}

fn reset_visited_rec(node: &NodeRef) {
    match &**node {
        Node::Leaf(_) => node.clear_visited(),
        Node::Internal(inode) => {
            node.clear_visited();
            reset_visited_rec(&inode.left);
            reset_visited_rec(&inode.right);
        }
        Node::LabelOnly(_) => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::basic_hooks::ComparisonReplay;
    use crate::config::ValueLength;
    use crate::label::{Label, Labeler};
    use std::convert::Infallible;

    struct SumLabeler;

    impl Labeler for SumLabeler {
        fn leaf_label(&self, key: &Key, _value: &Value, _next_leaf_key: &Key) -> Label {
            let mut bytes = [0u8; crate::label::LABEL_LEN];
            bytes[0] = key.as_bytes().iter().fold(0u8, |a, b| a.wrapping_add(*b));
            Label(bytes)
        }

        fn internal_label(&self, balance: i8, _routing_key: &Key, left: &Label, right: &Label) -> Label {
            let mut bytes = [0u8; crate::label::LABEL_LEN];
            bytes[0] = (balance as u8).wrapping_add(left.0[0]).wrapping_add(right.0[0]);
            Label(bytes)
        }
    }

    struct TestHooks(ComparisonReplay<SumLabeler>);

    impl Labeler for TestHooks {
        fn leaf_label(&self, key: &Key, value: &Value, next_leaf_key: &Key) -> Label {
            self.0.leaf_label(key, value, next_leaf_key)
        }
        fn internal_label(&self, balance: i8, routing_key: &Key, left: &Label, right: &Label) -> Label {
            self.0.internal_label(balance, routing_key, left, right)
        }
    }

    impl RoleHooks for TestHooks {
        type UpdateError = Infallible;

        fn key_matches_leaf(&self, key: &Key, leaf: &LeafNode) -> bool {
            self.0.key_matches_leaf(key, leaf)
        }
        fn next_direction_is_left(&self, key: &Key, inode: &InternalNode) -> bool {
            self.0.next_direction_is_left(key, inode)
        }
        fn make_leaf_pair(&self, existing_leaf: &LeafNode, new_key: &Key, new_value: &Value) -> Result<NodeRef, Error<Infallible>> {
            self.0.make_leaf_pair(existing_leaf, new_key, new_value)
        }
        fn replay_comparison(&mut self) -> Result<i32, Error<Infallible>> {
            self.0.replay_comparison()
        }
        fn begin_operation(&mut self) {
            self.0.begin_operation();
        }
    }

    use crate::node::{InternalNode, LeafNode};

    fn tree() -> AvlTree<TestHooks> {
        AvlTree::empty(AvlConfig::new(1, ValueLength::Fixed(1)), TestHooks(ComparisonReplay::new(SumLabeler)))
    }

    #[test]
    fn insert_into_empty_tree_increases_height_and_changes_digest() {
        let mut t = tree();
        let empty_digest = t.digest();
        let old = t
            .apply_one(Operation::upsert(Key::new(vec![1]), Value::new(vec![9])))
            .unwrap();
        assert_eq!(old, None);
        assert_eq!(t.root_height(), 1);
        assert_ne!(t.digest(), empty_digest);
    }

    #[test]
    fn lookup_does_not_mutate_the_tree() {
        let mut t = tree();
        t.apply_one(Operation::upsert(Key::new(vec![1]), Value::new(vec![9]))).unwrap();
        let digest_before = t.digest();
        let found = t.apply_one(Operation::lookup(Key::new(vec![1]))).unwrap();
        assert_eq!(found, Some(Value::new(vec![9])));
        assert_eq!(t.digest(), digest_before);
    }

    #[test]
    fn key_length_mismatch_is_rejected_without_mutating_the_tree() {
        let mut t = tree();
        let digest_before = t.digest();
        let err = t
            .apply_one(Operation::upsert(Key::new(vec![1, 2]), Value::new(vec![9])))
            .unwrap_err();
        assert!(matches!(err, Error::Precondition(_)));
        assert_eq!(t.digest(), digest_before);
    }

    #[test]
    fn sentinel_key_is_rejected() {
        let mut t = tree();
        let err = t
            .apply_one(Operation::upsert(Key::new(vec![0x00]), Value::new(vec![9])))
            .unwrap_err();
        assert!(matches!(err, Error::Precondition(_)));
    }

    #[test]
    fn reset_visited_clears_every_node() {
        let mut t = tree();
        t.apply_one(Operation::upsert(Key::new(vec![1]), Value::new(vec![9]))).unwrap();
        assert!(t.root().is_visited());
        t.reset_visited();
        assert!(!t.root().is_visited());
    }

    #[test]
    fn three_ascending_inserts_trigger_a_single_left_rotation() {
        // Ergo AVL+ tree always keeps an extra leaf above the min
        // sentinel, so balance after 3 ascending real keys settles at
        // height 2 rather than degenerating into a 3-deep spine.
        let mut t = tree();
        for k in [1u8, 2, 3] {
            t.apply_one(Operation::upsert(Key::new(vec![k]), Value::new(vec![k]))).unwrap();
        }
        assert!(t.root_height() <= 3);
        for k in [1u8, 2, 3] {
            let found = t.apply_one(Operation::lookup(Key::new(vec![k]))).unwrap();
            assert_eq!(found, Some(Value::new(vec![k])));
        }
    }

    #[test]
    fn three_descending_inserts_trigger_a_single_right_rotation() {
        let mut t = tree();
        for k in [10u8, 9, 8] {
            t.apply_one(Operation::upsert(Key::new(vec![k]), Value::new(vec![k]))).unwrap();
        }
        for k in [10u8, 9, 8] {
            let found = t.apply_one(Operation::lookup(Key::new(vec![k]))).unwrap();
            assert_eq!(found, Some(Value::new(vec![k])));
        }
    }

    #[test]
    fn zigzag_inserts_keep_balances_within_one() {
        let mut t = tree();
        for k in [20u8, 10, 30, 5, 15, 25, 35, 12, 17] {
            t.apply_one(Operation::upsert(Key::new(vec![k]), Value::new(vec![k]))).unwrap();
        }
        for k in [20u8, 10, 30, 5, 15, 25, 35, 12, 17] {
            let found = t.apply_one(Operation::lookup(Key::new(vec![k]))).unwrap();
            assert_eq!(found, Some(Value::new(vec![k])));
        }
    }

    #[test]
    fn deleting_a_key_that_forces_a_rotation_leaves_the_rest_intact() {
        let mut t = tree();
        for k in [20u8, 10, 30, 5, 15] {
            t.apply_one(Operation::upsert(Key::new(vec![k]), Value::new(vec![k]))).unwrap();
        }
        t.apply_one(Operation::delete(Key::new(vec![30]))).unwrap();
        for k in [20u8, 10, 5, 15] {
            let found = t.apply_one(Operation::lookup(Key::new(vec![k]))).unwrap();
            assert_eq!(found, Some(Value::new(vec![k])));
        }
        let missing = t.apply_one(Operation::lookup(Key::new(vec![30]))).unwrap();
        assert_eq!(missing, None);
    }

    #[test]
    fn delete_then_lookup_restores_a_miss() {
        let mut t = tree();
        t.apply_one(Operation::upsert(Key::new(vec![1]), Value::new(vec![9]))).unwrap();
        let old = t.apply_one(Operation::delete(Key::new(vec![1]))).unwrap();
        assert_eq!(old, Some(Value::new(vec![9])));
        assert_eq!(t.root_height(), 0);
        let found = t.apply_one(Operation::lookup(Key::new(vec![1]))).unwrap();
        assert_eq!(found, None);
    }
}
