use crate::config::AvlConfig;
use crate::digest::Digest;
use crate::error::Error;
use crate::label::Labeler;
use crate::operation::Operation;
use crate::proof::Proof;
use crate::tree::AvlTree;
use crate::value::Value;

use super::hooks::ProverHooks;

/// The prover side: a fully materialized tree plus the batch-operation
/// engine running over it. Thin wrapper around [`AvlTree`] adding
/// proof export — the one thing only a party holding the whole tree
/// can do.
pub struct InMemoryNodeStore<L: Labeler, E: std::error::Error + Send + Sync + 'static> {
    tree: AvlTree<ProverHooks<L, E>>,
}

impl<L: Labeler, E: std::error::Error + Send + Sync + 'static> InMemoryNodeStore<L, E> {
    pub fn new(config: AvlConfig, labeler: L) -> Self {
        InMemoryNodeStore {
            tree: AvlTree::empty(config, ProverHooks::new(labeler)),
        }
    }

    pub fn apply_one(&mut self, op: Operation<E>) -> Result<Option<Value>, Error<E>> {
        self.tree.apply_one(op)
    }

    pub fn digest(&self) -> Digest {
        self.tree.digest()
    }

    pub fn tree(&self) -> &AvlTree<ProverHooks<L, E>> {
        &self.tree
    }

    /// Serializes every node touched since the last [`Self::reset_visited`]
    /// into a [`Proof`] a verifier can open against the digest from
    /// before that batch.
    pub fn proof(&self) -> Proof {
        Proof::from_root(self.tree.root(), self.tree.root_height())
    }

    pub fn reset_visited(&self) {
        self.tree.reset_visited();
    }
}

#[cfg(all(test, feature = "verify"))]
mod tests {
    use super::*;
    use crate::config::ValueLength;
    use crate::key::Key;
    use crate::label::Blake3Labeler;
    use crate::proof::ProofNode;
    use std::convert::Infallible;

    fn store() -> InMemoryNodeStore<Blake3Labeler, Infallible> {
        InMemoryNodeStore::new(AvlConfig::new(2, ValueLength::Fixed(2)), Blake3Labeler)
    }

    #[test]
    fn proof_after_reset_only_opens_what_the_next_batch_touches() {
        let mut s = store();
        s.apply_one(Operation::upsert(Key::new(vec![1, 0]), Value::new(vec![9, 9])))
            .unwrap();
        s.apply_one(Operation::upsert(Key::new(vec![2, 0]), Value::new(vec![8, 8])))
            .unwrap();
        s.reset_visited();

        s.apply_one(Operation::upsert(Key::new(vec![1, 0]), Value::new(vec![7, 7])))
            .unwrap();
        let proof = s.proof();

        // The touched leaf opens in full; a node the update never
        // visited along the way collapses to its label.
        fn contains_leaf(node: &ProofNode, key: &Key) -> bool {
            match node {
                ProofNode::Leaf { key: k, .. } => k == key,
                ProofNode::Internal { left, right, .. } => contains_leaf(left, key) || contains_leaf(right, key),
                ProofNode::LabelOnly(_) => false,
            }
        }
        assert!(contains_leaf(&proof.tree, &Key::new(vec![1, 0])));
    }

    #[test]
    fn proof_root_height_matches_the_tree() {
        let mut s = store();
        s.apply_one(Operation::upsert(Key::new(vec![1, 0]), Value::new(vec![9, 9])))
            .unwrap();
        let proof = s.proof();
        assert_eq!(proof.root_height, s.tree().root_height());
    }
}
