use std::marker::PhantomData;

use crate::basic_hooks::ComparisonReplay;
use crate::error::Error;
use crate::hooks::RoleHooks;
use crate::key::Key;
use crate::label::{Label, Labeler};
use crate::node::{InternalNode, LeafNode, NodeRef};
use crate::value::Value;

/// The verifier's [`RoleHooks`] implementation. Structurally identical
/// to the prover's: both compare keys against routing/leaf keys the
/// same way. What actually distinguishes the verifier is
/// *where its `Node` tree comes from* — [`crate::verifier::ProofCursor`]
/// reconstructs one from a [`crate::proof::Proof`] with gaps left as
/// `LabelOnly`, so a walk that needs to open an unopened subtree fails
/// with [`Error::Protocol`] automatically, the same way it would if a
/// prover implementation had a bug.
pub struct VerifierHooks<L: Labeler, E> {
    inner: ComparisonReplay<L>,
    _update_error: PhantomData<fn() -> E>,
}

impl<L: Labeler, E> VerifierHooks<L, E> {
    pub fn new(labeler: L) -> Self {
        VerifierHooks {
            inner: ComparisonReplay::new(labeler),
            _update_error: PhantomData,
        }
    }

    pub fn labeler(&self) -> &L {
        self.inner.labeler()
    }
}

impl<L: Labeler, E: std::error::Error + Send + Sync + 'static> RoleHooks for VerifierHooks<L, E> {
    type UpdateError = E;

    fn key_matches_leaf(&self, key: &Key, leaf: &LeafNode) -> bool {
        self.inner.key_matches_leaf(key, leaf)
    }

    fn next_direction_is_left(&self, key: &Key, inode: &InternalNode) -> bool {
        self.inner.next_direction_is_left(key, inode)
    }

    fn make_leaf_pair(&self, existing_leaf: &LeafNode, new_key: &Key, new_value: &Value) -> Result<NodeRef, Error<E>> {
        self.inner.make_leaf_pair(existing_leaf, new_key, new_value)
    }

    fn replay_comparison(&mut self) -> Result<i32, Error<E>> {
        self.inner.replay_comparison()
    }

    fn begin_operation(&mut self) {
        self.inner.begin_operation();
    }
}

impl<L: Labeler, E> Labeler for VerifierHooks<L, E> {
    fn leaf_label(&self, key: &Key, value: &Value, next_leaf_key: &Key) -> Label {
        self.inner.leaf_label(key, value, next_leaf_key)
    }

    fn internal_label(&self, balance: i8, routing_key: &Key, left_label: &Label, right_label: &Label) -> Label {
        self.inner.internal_label(balance, routing_key, left_label, right_label)
    }
}
