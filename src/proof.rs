//! A proof is exactly the set of nodes a batch visited, serialized as
//! a tree shape with the untouched subtrees collapsed to their label.
//! This is a minimal, non-normative transport connecting the prover
//! and verifier role implementations bundled in this crate — an
//! embedder authenticating over the wire is free to use any encoding
//! that reconstructs the same shape.

use crate::key::Key;
use crate::label::Label;
use crate::node::{InternalNode, LeafNode, Node, NodeRef};
use crate::value::Value;

/// One node of a proof tree: either full contents (the node was
/// visited during the batch the proof covers) or just the label
/// standing in for a subtree the proof does not open.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProofNode {
    Leaf {
        key: Key,
        value: Value,
        next_leaf_key: Key,
    },
    Internal {
        balance: i8,
        routing_key: Key,
        left: Box<ProofNode>,
        right: Box<ProofNode>,
    },
    LabelOnly(Label),
}

/// A proof: the serialized tree shape plus the height of the root it
/// was cut from (needed to reproduce the starting [`crate::digest::Digest`]).
#[derive(Debug, Clone)]
pub struct Proof {
    pub tree: ProofNode,
    pub root_height: u8,
}

impl Proof {
    /// Serializes `root`, opening every node marked visited and
    /// collapsing everything else to its label. Called by the prover
    /// after a batch, before [`crate::tree::AvlTree::reset_visited`].
    pub fn from_root(root: &NodeRef, root_height: u8) -> Proof {
        Proof {
            tree: proof_node_from(root),
            root_height,
        }
    }
}

fn proof_node_from(node: &NodeRef) -> ProofNode {
    if !node.is_visited() {
        return ProofNode::LabelOnly(*node.label());
    }
    match &**node {
        Node::Leaf(LeafNode {
            key, value, next_leaf_key, ..
        }) => ProofNode::Leaf {
            key: key.clone(),
            value: value.clone(),
            next_leaf_key: next_leaf_key.clone(),
        },
        Node::Internal(InternalNode {
            balance,
            routing_key,
            left,
            right,
            ..
        }) => ProofNode::Internal {
            balance: *balance,
            routing_key: routing_key.clone(),
            left: Box::new(proof_node_from(left)),
            right: Box::new(proof_node_from(right)),
        },
        // A LabelOnly node is never itself visited (Node::mark_visited
        // is a no-op on it), so this arm is unreachable in practice,
        // but serializing it as itself keeps the function total.
        Node::LabelOnly(s) => ProofNode::LabelOnly(s.label),
    }
}
