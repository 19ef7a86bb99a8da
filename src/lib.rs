//! An authenticated AVL dictionary: a balanced binary search tree
//! whose nodes carry cryptographic labels, so the root label plus tree
//! height (a [`digest::Digest`]) commits to the entire key/value
//! mapping. A `prover` holding the whole tree and a `verifier` working
//! from only a digest and a proof apply the same batch of
//! lookup/insert/update/delete operations and must derive the same
//! resulting digest.
//!
//! The core abstraction is [`hooks::RoleHooks`]: a small set of
//! comparison and construction callbacks that the shared walk in
//! [`walk`] calls out to. [`prover::InMemoryNodeStore`] and
//! [`verifier::ProofCursor`] are the two bundled implementations; an
//! embedder can supply its own (a disk-backed store, a different hash
//! function) by implementing the trait directly.

mod basic_hooks;
pub mod config;
pub mod digest;
pub mod error;
pub mod hooks;
pub mod key;
pub mod label;
pub mod node;
pub mod operation;
pub mod proof;
#[cfg(feature = "full")]
pub mod prover;
pub mod tree;
pub mod value;
#[cfg(feature = "verify")]
pub mod verifier;
mod walk;

pub use config::{AvlConfig, ValueLength};
pub use digest::{Digest, DigestLengthError};
pub use error::Error;
pub use hooks::RoleHooks;
pub use key::Key;
pub use label::{Label, Labeler};
#[cfg(feature = "verify")]
pub use label::Blake3Labeler;
pub use operation::{OpKind, Operation, UpdateFn};
pub use proof::{Proof, ProofNode};
pub use tree::AvlTree;
pub use value::Value;

#[cfg(feature = "full")]
pub use prover::InMemoryNodeStore;
#[cfg(feature = "verify")]
pub use verifier::{ProofCursor, ProofMismatch};
