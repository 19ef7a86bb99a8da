use crate::label::{Label, LABEL_LEN};

/// The externally visible commitment to a tree: the root label
/// concatenated with the tree's height as an unsigned byte. Any
/// collaborator that serializes or compares digests must
/// agree on this layout.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Digest {
    pub label: Label,
    pub height: u8,
}

/// Length mismatch (height byte absent, or extra trailing bytes) is a
/// decoding error.
#[derive(thiserror::Error, Debug, PartialEq, Eq)]
#[error("digest must be exactly {expected} bytes, got {actual}")]
pub struct DigestLengthError {
    expected: usize,
    actual: usize,
}

impl Digest {
    pub const ENCODED_LEN: usize = LABEL_LEN + 1;

    pub fn new(label: Label, height: u8) -> Self {
        Digest { label, height }
    }

    /// `root.label ++ root_height` with `root_height` reinterpreted as
    /// an unsigned byte.
    pub fn to_bytes(&self) -> [u8; Self::ENCODED_LEN] {
        let mut out = [0u8; Self::ENCODED_LEN];
        out[..LABEL_LEN].copy_from_slice(&self.label.0);
        out[LABEL_LEN] = self.height;
        out
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, DigestLengthError> {
        if bytes.len() != Self::ENCODED_LEN {
            return Err(DigestLengthError {
                expected: Self::ENCODED_LEN,
                actual: bytes.len(),
            });
        }
        let mut label = [0u8; LABEL_LEN];
        label.copy_from_slice(&bytes[..LABEL_LEN]);
        Ok(Digest {
            label: Label(label),
            height: bytes[LABEL_LEN],
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_through_bytes() {
        let digest = Digest::new(Label([7u8; LABEL_LEN]), 200);
        let bytes = digest.to_bytes();
        assert_eq!(bytes.len(), Digest::ENCODED_LEN);
        let decoded = Digest::from_bytes(&bytes).expect("should decode");
        assert_eq!(decoded, digest);
    }

    #[test]
    fn rejects_wrong_length() {
        let err = Digest::from_bytes(&[0u8; 10]).unwrap_err();
        assert_eq!(err.expected, Digest::ENCODED_LEN);
        assert_eq!(err.actual, 10);
    }

    #[test]
    fn height_byte_is_reinterpreted_as_unsigned() {
        // 255 as a height already exceeds any feasible deployment, but
        // it must still decode losslessly as an unsigned byte.
        let digest = Digest::new(Label([0u8; LABEL_LEN]), 255);
        let decoded = Digest::from_bytes(&digest.to_bytes()).unwrap();
        assert_eq!(decoded.height, 255);
    }
}
