use std::fmt;

use crate::key::Key;
use crate::value::Value;

/// Width in bytes of a [`Label`]. Fixed at 32 to match the default
/// `blake3` implementation; a collaborator plugging in a different hash
/// function is expected to truncate or widen to this width, keeping the
/// digest format (`label ++ height_byte`) a constant size.
pub const LABEL_LEN: usize = 32;

/// A fixed-width cryptographic digest: a node's identity for
/// authentication purposes. The formula that produces one is owned by
/// the [`Labeler`] collaborator, not by this crate — label/hash
/// computation is deliberately out of this crate's scope.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Label(pub [u8; LABEL_LEN]);

impl Label {
    pub fn as_bytes(&self) -> &[u8; LABEL_LEN] {
        &self.0
    }
}

impl fmt::Debug for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for b in &self.0[..4] {
            write!(f, "{:02x}", b)?;
        }
        write!(f, "..")
    }
}

/// Computes node labels from node contents. Injected by the embedding;
/// the walks only ever call this through a [`crate::hooks::RoleHooks`]
/// implementation, never hardcode a hash function.
pub trait Labeler {
    /// Label of a leaf carrying `key`, `value`, and `next_leaf_key`.
    fn leaf_label(&self, key: &Key, value: &Value, next_leaf_key: &Key) -> Label;

    /// Label of an internal node with the given `balance`, `routing_key`,
    /// and child labels.
    fn internal_label(
        &self,
        balance: i8,
        routing_key: &Key,
        left_label: &Label,
        right_label: &Label,
    ) -> Label;
}

/// Reference [`Labeler`] built on `blake3`, used by the bundled
/// prover/verifier role implementations and by tests. Not normative —
/// any collision-resistant construction deriving a label purely from
/// node contents is a valid substitute.
#[cfg(feature = "verify")]
#[derive(Clone, Copy, Debug, Default)]
pub struct Blake3Labeler;

#[cfg(feature = "verify")]
impl Labeler for Blake3Labeler {
    fn leaf_label(&self, key: &Key, value: &Value, next_leaf_key: &Key) -> Label {
        let mut hasher = blake3::Hasher::new();
        hasher.update(&[0u8]); // leaf domain tag
        hasher.update(key.as_bytes());
        hasher.update(value.as_bytes());
        hasher.update(next_leaf_key.as_bytes());
        Label(*hasher.finalize().as_bytes())
    }

    fn internal_label(
        &self,
        balance: i8,
        routing_key: &Key,
        left_label: &Label,
        right_label: &Label,
    ) -> Label {
        let mut hasher = blake3::Hasher::new();
        hasher.update(&[1u8]); // internal domain tag
        hasher.update(&[balance as u8]);
        hasher.update(routing_key.as_bytes());
        hasher.update(&left_label.0);
        hasher.update(&right_label.0);
        Label(*hasher.finalize().as_bytes())
    }
}
