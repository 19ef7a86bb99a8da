//! The verifier role: runs the same shared walk
//! as the prover, but over a tree reconstructed from a proof rather
//! than a fully materialized one. Gated behind the `verify` feature
//! since it pulls in the default `blake3`-based [`crate::label::Labeler`].

mod cursor;
mod hooks;

pub use cursor::{reopen, ProofCursor, ProofMismatch};
pub use hooks::VerifierHooks;
