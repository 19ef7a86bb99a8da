use std::fmt;

/// A fixed-length immutable byte string, ordered byte-lexicographically.
///
/// Two values are reserved sentinels and must never be used as a real
/// user key: all-`0x00` bytes (`-infinity`) and all-`0xFF` bytes
/// (`+infinity`). They bracket the keyspace so every internal node's
/// routing key and every leaf's `next_leaf_key` has somewhere to point.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Key(Vec<u8>);

impl Key {
    /// Wraps `bytes` as a key with no length validation. Preconditions
    /// (length equals the instance's `key_length`, not a sentinel) are
    /// enforced by the tree at the operation boundary, not here.
    pub fn new(bytes: Vec<u8>) -> Self {
        Key(bytes)
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The `-infinity` sentinel of the given length: all `0x00` bytes.
    pub fn negative_infinity(key_length: usize) -> Self {
        Key(vec![0x00; key_length])
    }

    /// The `+infinity` sentinel of the given length: all `0xFF` bytes.
    pub fn positive_infinity(key_length: usize) -> Self {
        Key(vec![0xFF; key_length])
    }

    pub fn is_negative_infinity(&self) -> bool {
        !self.0.is_empty() && self.0.iter().all(|&b| b == 0x00)
    }

    pub fn is_positive_infinity(&self) -> bool {
        !self.0.is_empty() && self.0.iter().all(|&b| b == 0xFF)
    }
}

impl fmt::Debug for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Key({})", hex_like(&self.0))
    }
}

fn hex_like(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{:02x}", b)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sentinels_are_ordered_at_the_edges() {
        let neg = Key::negative_infinity(4);
        let pos = Key::positive_infinity(4);
        let mid = Key::new(vec![0x01, 0x02, 0x03, 0x04]);
        assert!(neg < mid);
        assert!(mid < pos);
        assert!(neg.is_negative_infinity());
        assert!(pos.is_positive_infinity());
        assert!(!mid.is_negative_infinity());
        assert!(!mid.is_positive_infinity());
    }

    #[test]
    fn ordering_is_byte_lexicographic() {
        let a = Key::new(vec![0x00, 0xFF]);
        let b = Key::new(vec![0x01, 0x00]);
        assert!(a < b);
    }
}
