//! The abstract tree walk: one recursive descent for
//! insert/update/lookup, one for deletion, sharing rotation
//! primitives. Every function here is generic over [`RoleHooks`] so
//! the exact same code runs the prover's materialized walk and the
//! verifier's proof-backed walk.

mod delete;
mod modify;
mod rotate;

pub(crate) use delete::{delete_helper, DeleteOutcome};
pub(crate) use modify::{modify_helper, ModifyOutcome, ModifyRequest};
