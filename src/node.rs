use std::cell::Cell;
use std::rc::Rc;

use crate::key::Key;
use crate::label::{Label, Labeler};
use crate::value::Value;

/// A leaf: carries the stored `key`/`value` plus the key of the
/// in-order successor leaf, used to make non-membership proofs
/// self-certifying. A rightmost leaf's `next_leaf_key` is the
/// `+infinity` sentinel.
#[derive(Debug)]
pub struct LeafNode {
    pub key: Key,
    pub value: Value,
    pub next_leaf_key: Key,
    pub label: Label,
    visited: Cell<bool>,
}

impl LeafNode {
    pub fn new(key: Key, value: Value, next_leaf_key: Key, labeler: &impl Labeler) -> Self {
        let label = labeler.leaf_label(&key, &value, &next_leaf_key);
        LeafNode {
            key,
            value,
            next_leaf_key,
            label,
            visited: Cell::new(false),
        }
    }

    /// Copy-on-write constructor: produces a fresh leaf sharing every
    /// field from `old` except the ones explicitly overridden.
    pub fn get_new(
        old: &LeafNode,
        new_value: Option<Value>,
        new_next_leaf_key: Option<Key>,
        labeler: &impl Labeler,
    ) -> Self {
        let value = new_value.unwrap_or_else(|| old.value.clone());
        let next_leaf_key = new_next_leaf_key.unwrap_or_else(|| old.next_leaf_key.clone());
        LeafNode::new(old.key.clone(), value, next_leaf_key, labeler)
    }

    /// Same as [`Self::get_new`] but also replaces the key, used by
    /// `change_key_and_value_of_min_node` during hard deletion.
    pub fn get_new_with_key(
        old: &LeafNode,
        new_key: Key,
        new_value: Value,
        labeler: &impl Labeler,
    ) -> Self {
        LeafNode::new(new_key, new_value, old.next_leaf_key.clone(), labeler)
    }
}

/// An internal node: carries the AVL `balance`, the routing key (the
/// minimum key of the right subtree — stored explicitly here per the
/// convention documented in `DESIGN.md`), and the two children.
#[derive(Debug)]
pub struct InternalNode {
    pub balance: i8,
    pub routing_key: Key,
    pub left: NodeRef,
    pub right: NodeRef,
    pub label: Label,
    visited: Cell<bool>,
}

impl InternalNode {
    pub fn new(
        balance: i8,
        routing_key: Key,
        left: NodeRef,
        right: NodeRef,
        labeler: &impl Labeler,
    ) -> Self {
        let label = labeler.internal_label(balance, &routing_key, left.label(), right.label());
        InternalNode {
            balance,
            routing_key,
            left,
            right,
            label,
            visited: Cell::new(false),
        }
    }

    /// Copy-on-write constructor: produces a fresh internal node,
    /// overriding only the fields given as `Some`. Unmodified children
    /// are shared (cheap `Rc` clone), never deep-copied — structural
    /// sharing is load-bearing for proof-side reasoning.
    pub fn get_new(
        old: &InternalNode,
        new_left: Option<NodeRef>,
        new_right: Option<NodeRef>,
        new_balance: Option<i8>,
        new_routing_key: Option<Key>,
        labeler: &impl Labeler,
    ) -> Self {
        let left = new_left.unwrap_or_else(|| old.left.clone());
        let right = new_right.unwrap_or_else(|| old.right.clone());
        let balance = new_balance.unwrap_or(old.balance);
        let routing_key = new_routing_key.unwrap_or_else(|| old.routing_key.clone());
        InternalNode::new(balance, routing_key, left, right, labeler)
    }
}

/// A stub standing in for a subtree the proof does not need to open.
/// Reaching it during a walk is always a protocol error.
#[derive(Debug)]
pub struct LabelOnlyNode {
    pub label: Label,
}

/// Tagged sum standing in for node subclassing. The `LabelOnly` arm
/// only ever reaches the fatal-error branch in the walks.
#[derive(Debug)]
pub enum Node {
    Leaf(LeafNode),
    Internal(InternalNode),
    LabelOnly(LabelOnlyNode),
}

/// Nodes are reference-counted rather than deep-cloned: copy-on-write
/// construction produces new `Node`s that share unmodified children
/// with the old tree, and a single-threaded batch never
/// needs atomic refcounting.
pub type NodeRef = Rc<Node>;

impl Node {
    pub fn label(&self) -> &Label {
        match self {
            Node::Leaf(l) => &l.label,
            Node::Internal(i) => &i.label,
            Node::LabelOnly(s) => &s.label,
        }
    }

    pub fn as_leaf(&self) -> Option<&LeafNode> {
        match self {
            Node::Leaf(l) => Some(l),
            _ => None,
        }
    }

    pub fn as_internal(&self) -> Option<&InternalNode> {
        match self {
            Node::Internal(i) => Some(i),
            _ => None,
        }
    }

    pub fn is_leaf(&self) -> bool {
        matches!(self, Node::Leaf(_))
    }

    /// Marks this node visited: it participated in the batch and must
    /// appear in the emitted proof. Per the cancellation rule, callers
    /// must only do this after the branch that could
    /// still fail has succeeded.
    pub fn mark_visited(&self) {
        let cell = match self {
            Node::Leaf(l) => &l.visited,
            Node::Internal(i) => &i.visited,
            Node::LabelOnly(_) => return,
        };
        cell.set(true);
    }

    /// Resets the visited flag. Used by the prover between batches;
    /// see `AvlTree::reset_visited`.
    pub fn clear_visited(&self) {
        let cell = match self {
            Node::Leaf(l) => &l.visited,
            Node::Internal(i) => &i.visited,
            Node::LabelOnly(_) => return,
        };
        cell.set(false);
    }

    pub fn is_visited(&self) -> bool {
        match self {
            Node::Leaf(l) => l.visited.get(),
            Node::Internal(i) => i.visited.get(),
            Node::LabelOnly(_) => false,
        }
    }
}

pub fn new_leaf_ref(key: Key, value: Value, next_leaf_key: Key, labeler: &impl Labeler) -> NodeRef {
    Rc::new(Node::Leaf(LeafNode::new(key, value, next_leaf_key, labeler)))
}

pub fn new_internal_ref(
    balance: i8,
    routing_key: Key,
    left: NodeRef,
    right: NodeRef,
    labeler: &impl Labeler,
) -> NodeRef {
    Rc::new(Node::Internal(InternalNode::new(
        balance,
        routing_key,
        left,
        right,
        labeler,
    )))
}
