use thiserror::Error;

/// Errors surfaced by the engine, generic over the embedder's
/// update-function error type `E`.
///
/// Propagation policy: the walks never swallow an error. Every variant
/// unwinds to [`crate::tree::AvlTree::apply_one`]'s caller untouched.
#[derive(Error, Debug)]
pub enum Error<E> {
    /// Sentinel key used, wrong key length, or wrong value length when
    /// fixed. The tree is left unchanged and no node is marked visited.
    #[error("precondition violated: {0}")]
    Precondition(&'static str),

    /// The embedder's `update_fn` returned `Err`. The tree is left
    /// unchanged.
    #[error("update function rejected operation: {0}")]
    UpdateRejected(#[source] E),

    /// A `LabelOnlyNode` was reached during a walk, or `replay_comparison`
    /// dissented from the comparisons made during the modify walk. Fatal:
    /// on the prover this is an implementation bug, on the verifier this
    /// is an invalid proof.
    #[error("protocol violation: {0}")]
    Protocol(&'static str),

    /// An AVL invariant failed to hold after rebalancing (e.g. `|balance|
    /// > 1`, `root_height` out of range). Indicates an implementation
    /// bug; the batch must be aborted.
    #[error("invariant violation: {0}")]
    Invariant(&'static str),
}

impl<E> Error<E> {
    /// Maps the embedder error type, useful when composing hooks from
    /// different sources that each carry their own error type.
    pub fn map_update_err<F, E2>(self, f: F) -> Error<E2>
    where
        F: FnOnce(E) -> E2,
    {
        match self {
            Error::Precondition(s) => Error::Precondition(s),
            Error::UpdateRejected(e) => Error::UpdateRejected(f(e)),
            Error::Protocol(s) => Error::Protocol(s),
            Error::Invariant(s) => Error::Invariant(s),
        }
    }
}
