//! The prover role: holds the whole tree in
//! memory and runs the shared walk directly against it. Gated behind
//! the `full` feature.

mod hooks;
mod store;

#[cfg(feature = "full")]
pub mod visualize;

pub use hooks::ProverHooks;
pub use store::InMemoryNodeStore;
