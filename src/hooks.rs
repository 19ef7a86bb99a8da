use crate::error::Error;
use crate::key::Key;
use crate::label::Labeler;
use crate::node::{InternalNode, LeafNode, NodeRef};
use crate::value::Value;

/// The four operations the shared walk delegates to role-specific
/// code, plus the [`Labeler`] every node construction needs.
/// A prover and a verifier both implement this trait; the walk itself
/// (`crate::walk`) is generic over it and never cares which.
pub trait RoleHooks: Labeler {
    /// The error type the embedder's `update_fn`s may return.
    type UpdateError: std::error::Error + Send + Sync + 'static;

    /// Whether `key` belongs at `leaf` — the unique candidate slot the
    /// descent so far has identified. Role-specific because the
    /// verifier recomputes the answer from the proof rather than from
    /// a materialized tree.
    fn key_matches_leaf(&self, key: &Key, leaf: &LeafNode) -> bool;

    /// Whether descent from `inode` should go left. Must be
    /// deterministic and consistent with [`Self::key_matches_leaf`] so
    /// both roles make the same choice on the same input.
    fn next_direction_is_left(&self, key: &Key, inode: &InternalNode) -> bool;

    /// Builds a fresh two-leaf subtree replacing `existing_leaf` when
    /// inserting a strictly greater key. Must maintain the
    /// `next_leaf_key` linked list.
    fn make_leaf_pair(
        &self,
        existing_leaf: &LeafNode,
        new_key: &Key,
        new_value: &Value,
    ) -> Result<NodeRef, Error<Self::UpdateError>>;

    /// Deletion driver: yields the next sign of `key` vs. the current
    /// node's routing key that was observed during the modify walk.
    /// Returns a negative, zero, or positive `i32`; each call consumes
    /// one entry from the replayed sequence. Must reproduce the exact
    /// order `next_direction_is_left` was consulted on the descended
    /// path the modify walk descended — a mismatch is a
    /// [`Error::Protocol`] error.
    fn replay_comparison(&mut self) -> Result<i32, Error<Self::UpdateError>>;

    /// Lifecycle hook: called once at the start of each `apply_one`,
    /// before the modify walk begins. The default is a no-op; role
    /// implementations that record per-operation state (e.g. the
    /// comparison sequence `replay_comparison` replays) override it to
    /// reset that state.
    fn begin_operation(&mut self) {}
}
