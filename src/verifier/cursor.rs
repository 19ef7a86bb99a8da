use std::rc::Rc;

use crate::config::AvlConfig;
use crate::digest::Digest;
use crate::error::Error;
use crate::label::Labeler;
use crate::node::{InternalNode, LeafNode, Node, NodeRef};
use crate::proof::{Proof, ProofNode};
use crate::tree::AvlTree;

use super::hooks::VerifierHooks;

/// Rejects a proof that does not reproduce the digest the verifier
/// started from. The verifier must never run a walk over an
/// unauthenticated tree.
#[derive(thiserror::Error, Debug, PartialEq, Eq)]
#[error("proof root does not match the expected digest")]
pub struct ProofMismatch;

/// Opens a [`Proof`] against an expected starting [`Digest`], rebuilding
/// just the nodes it contains into a real `Node` tree (unopened
/// subtrees become `LabelOnly` stand-ins, so memory use tracks what the
/// proof actually contains rather than the full tree). On success
/// returns an [`AvlTree`] ready to run the same batch the prover ran.
pub struct ProofCursor;

impl ProofCursor {
    pub fn open<L: Labeler, E: std::error::Error + Send + Sync + 'static>(
        proof: &Proof,
        expected_digest: Digest,
        config: AvlConfig,
        labeler: L,
    ) -> Result<AvlTree<VerifierHooks<L, E>>, ProofMismatch> {
        let hooks = VerifierHooks::new(labeler);
        let root = rebuild(&proof.tree, hooks.labeler());
        let digest = Digest::new(*root.label(), proof.root_height);
        if digest != expected_digest {
            return Err(ProofMismatch);
        }
        Ok(AvlTree::new(root, proof.root_height, config, hooks))
    }
}

fn rebuild(node: &ProofNode, labeler: &impl Labeler) -> NodeRef {
    match node {
        ProofNode::LabelOnly(label) => Rc::new(Node::LabelOnly(crate::node::LabelOnlyNode { label: *label })),
        ProofNode::Leaf {
            key,
            value,
            next_leaf_key,
        } => Rc::new(Node::Leaf(LeafNode::new(
            key.clone(),
            value.clone(),
            next_leaf_key.clone(),
            labeler,
        ))),
        ProofNode::Internal {
            balance,
            routing_key,
            left,
            right,
        } => {
            let left = rebuild(left, labeler);
            let right = rebuild(right, labeler);
            Rc::new(Node::Internal(InternalNode::new(*balance, routing_key.clone(), left, right, labeler)))
        }
    }
}

/// Re-opens `tree`'s current root as a proof covering only nodes
/// marked visited since the last reset — the verifier's side of
/// producing a new digest to hand back to the prover, or to re-prove
/// incrementally in a multi-round protocol.
pub fn reopen<L: Labeler, E>(tree: &AvlTree<VerifierHooks<L, E>>) -> Proof
where
    E: std::error::Error + Send + Sync + 'static,
{
    Proof::from_root(tree.root(), tree.root_height())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::key::Key;
    use crate::label::Blake3Labeler;
    use crate::node::new_leaf_ref;
    use crate::value::Value;
    use std::convert::Infallible;

    fn sample_root() -> NodeRef {
        let left = new_leaf_ref(
            Key::new(vec![0x00]),
            Value::new(vec![]),
            Key::new(vec![0x05]),
            &Blake3Labeler,
        );
        let right = new_leaf_ref(
            Key::new(vec![0x05]),
            Value::new(vec![9]),
            Key::new(vec![0xFF]),
            &Blake3Labeler,
        );
        left.mark_visited();
        right.mark_visited();
        let root = crate::node::new_internal_ref(0, Key::new(vec![0x05]), left, right, &Blake3Labeler);
        root.mark_visited();
        root
    }

    #[test]
    fn open_reconstructs_a_tree_matching_the_expected_digest() {
        let root = sample_root();
        let expected_digest = Digest::new(*root.label(), 1);
        let proof = Proof::from_root(&root, 1);

        let tree = ProofCursor::open::<_, Infallible>(&proof, expected_digest, AvlConfig::new(1, crate::config::ValueLength::Variable), Blake3Labeler)
            .expect("proof must open against its own digest");
        assert_eq!(tree.digest(), expected_digest);
    }

    #[test]
    fn open_rejects_a_mismatched_digest() {
        let root = sample_root();
        let wrong_digest = Digest::new(*root.label(), 2);
        let proof = Proof::from_root(&root, 1);

        let result = ProofCursor::open::<_, Infallible>(
            &proof,
            wrong_digest,
            AvlConfig::new(1, crate::config::ValueLength::Variable),
            Blake3Labeler,
        );
        assert_eq!(result.err(), Some(ProofMismatch));
    }
}
