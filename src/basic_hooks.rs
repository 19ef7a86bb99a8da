//! The [`RoleHooks`] logic that is actually identical between the
//! prover and the verifier: both compare keys against
//! routing keys and leaf keys the same way, and both record the
//! comparison sequence the modify walk makes so the deletion walk can
//! replay it. What differs between the two roles is only *where the
//! `Node` tree they walk over comes from* — a fully materialized tree
//! for the prover, one reconstructed from a proof for the verifier —
//! so that part is left to `crate::prover` and `crate::verifier`.

use std::cell::RefCell;
use std::collections::VecDeque;

use crate::error::Error;
use crate::key::Key;
use crate::label::{Label, Labeler};
use crate::node::{new_internal_ref, new_leaf_ref, InternalNode, LeafNode, NodeRef};
use crate::value::Value;

/// Shared comparison logic plus the replay queue backing
/// `replay_comparison`.
/// `RefCell` gives interior mutability for the queue so
/// `next_direction_is_left` can keep the `&self` signature
/// `RoleHooks` declares — the walk only ever runs single-threaded, so
/// the extra borrow-check bookkeeping is the only cost.
pub(crate) struct ComparisonReplay<L> {
    labeler: L,
    queue: RefCell<VecDeque<i32>>,
}

impl<L: Labeler> ComparisonReplay<L> {
    pub(crate) fn new(labeler: L) -> Self {
        ComparisonReplay {
            labeler,
            queue: RefCell::new(VecDeque::new()),
        }
    }

    pub(crate) fn labeler(&self) -> &L {
        &self.labeler
    }

    pub(crate) fn begin_operation(&mut self) {
        self.queue.borrow_mut().clear();
    }

    pub(crate) fn key_matches_leaf(&self, key: &Key, leaf: &LeafNode) -> bool {
        leaf.key == *key
    }

    pub(crate) fn next_direction_is_left(&self, key: &Key, inode: &InternalNode) -> bool {
        use std::cmp::Ordering::*;
        let ordering = key.cmp(&inode.routing_key);
        let signed = match ordering {
            Less => -1,
            Equal => 0,
            Greater => 1,
        };
        self.queue.borrow_mut().push_back(signed);
        ordering == Less
    }

    pub(crate) fn make_leaf_pair<E>(
        &self,
        existing_leaf: &LeafNode,
        new_key: &Key,
        new_value: &Value,
    ) -> Result<NodeRef, Error<E>> {
        if new_key < &existing_leaf.key {
            return Err(Error::Invariant(
                "make_leaf_pair called with a key not past the existing leaf",
            ));
        }
        // existing_leaf keeps its key but now points at new_key; the
        // new leaf inherits existing_leaf's old next_leaf_key.
        let left = new_leaf_ref(
            existing_leaf.key.clone(),
            existing_leaf.value.clone(),
            new_key.clone(),
            &self.labeler,
        );
        let right = new_leaf_ref(
            new_key.clone(),
            new_value.clone(),
            existing_leaf.next_leaf_key.clone(),
            &self.labeler,
        );
        left.mark_visited();
        right.mark_visited();
        let top = new_internal_ref(0, new_key.clone(), left, right, &self.labeler);
        top.mark_visited();
        Ok(top)
    }

    pub(crate) fn replay_comparison<E>(&mut self) -> Result<i32, Error<E>> {
        self.queue
            .borrow_mut()
            .pop_front()
            .ok_or(Error::Protocol("replay_comparison called with no recorded comparison left"))
    }
}

impl<L: Labeler> Labeler for ComparisonReplay<L> {
    fn leaf_label(&self, key: &Key, value: &Value, next_leaf_key: &Key) -> Label {
        self.labeler.leaf_label(key, value, next_leaf_key)
    }

    fn internal_label(&self, balance: i8, routing_key: &Key, left_label: &Label, right_label: &Label) -> Label {
        self.labeler.internal_label(balance, routing_key, left_label, right_label)
    }
}
