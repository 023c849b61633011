//! Snapshot Hashing
//!
//! SHA-256 digests of simulation state, used to compare a live session
//! against its replay. Values are fed as fixed-width little-endian bytes;
//! floats by bit pattern, so `0.0` and `-0.0` hash differently.

use sha2::{Digest, Sha256};

use super::vec2::Vec2;

/// 32-byte SHA-256 digest.
pub type StateHash = [u8; 32];

/// Domain separator for snapshot digests.
pub const SNAPSHOT_DOMAIN: &[u8] = b"FARMSTEAD_SNAPSHOT_V1";

/// A value with a canonical byte encoding for hashing.
pub trait HashField {
    /// Feed the value's canonical bytes to `sha`.
    fn feed(&self, sha: &mut Sha256);
}

macro_rules! le_field {
    ($($ty:ty),*) => {
        $(impl HashField for $ty {
            #[inline]
            fn feed(&self, sha: &mut Sha256) {
                sha.update(self.to_le_bytes());
            }
        })*
    };
}

le_field!(u8, u32, u64, i64);

impl HashField for bool {
    #[inline]
    fn feed(&self, sha: &mut Sha256) {
        sha.update([*self as u8]);
    }
}

impl HashField for f32 {
    #[inline]
    fn feed(&self, sha: &mut Sha256) {
        sha.update(self.to_bits().to_le_bytes());
    }
}

impl HashField for Vec2 {
    #[inline]
    fn feed(&self, sha: &mut Sha256) {
        self.x.feed(sha);
        self.y.feed(sha);
    }
}

/// Fixed-width records; no length prefix since `N` is part of the type.
impl<T: HashField, const N: usize> HashField for [T; N] {
    #[inline]
    fn feed(&self, sha: &mut Sha256) {
        for field in self {
            field.feed(sha);
        }
    }
}

/// Ordered field-by-field hasher. Field order is part of the digest.
pub struct StateHasher {
    sha: Sha256,
}

impl StateHasher {
    /// Hasher seeded with a domain separator.
    pub fn new(domain: &[u8]) -> Self {
        let mut sha = Sha256::new();
        sha.update(domain);
        Self { sha }
    }

    /// Hasher for snapshot digests.
    pub fn for_snapshot() -> Self {
        Self::new(SNAPSHOT_DOMAIN)
    }

    /// Append one field.
    #[inline]
    pub fn write<T: HashField>(&mut self, value: T) -> &mut Self {
        value.feed(&mut self.sha);
        self
    }

    /// Append a length prefix followed by each item.
    pub fn write_all<T: HashField, I: IntoIterator<Item = T>>(&mut self, items: I) -> &mut Self
    where
        I::IntoIter: ExactSizeIterator,
    {
        let items = items.into_iter();
        self.write(items.len() as u64);
        for item in items {
            self.write(item);
        }
        self
    }

    /// Consume the hasher.
    pub fn finalize(self) -> StateHash {
        self.sha.finalize().into()
    }
}

/// Digest of the state at `step`; `fields` appends everything after the
/// step counter.
pub fn compute_state_hash<F>(step: u64, fields: F) -> StateHash
where
    F: FnOnce(&mut StateHasher),
{
    let mut hasher = StateHasher::for_snapshot();
    hasher.write(step);
    fields(&mut hasher);
    hasher.finalize()
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_fields_same_digest() {
        let digest = || {
            let mut hasher = StateHasher::for_snapshot();
            hasher.write(7u32).write(-3i64).write(Vec2::new(1.5, 2.0)).write(true);
            hasher.finalize()
        };
        assert_eq!(digest(), digest());
    }

    #[test]
    fn test_field_order_changes_digest() {
        let mut a = StateHasher::new(b"t");
        a.write(1u32).write(2u32);
        let mut b = StateHasher::new(b"t");
        b.write(2u32).write(1u32);
        assert_ne!(a.finalize(), b.finalize());
    }

    #[test]
    fn test_width_is_part_of_encoding() {
        let mut narrow = StateHasher::new(b"t");
        narrow.write(1u8);
        let mut wide = StateHasher::new(b"t");
        wide.write(1u32);
        assert_ne!(narrow.finalize(), wide.finalize());
    }

    #[test]
    fn test_signed_zero_differs() {
        let mut pos = StateHasher::new(b"t");
        pos.write(0.0f32);
        let mut neg = StateHasher::new(b"t");
        neg.write(-0.0f32);
        assert_ne!(pos.finalize(), neg.finalize());
    }

    #[test]
    fn test_length_prefix_separates_lists() {
        let mut split = StateHasher::new(b"t");
        split.write_all([1u8]).write_all([2u8]);
        let mut joined = StateHasher::new(b"t");
        joined.write_all([1u8, 2u8]).write_all(Vec::<u8>::new());
        assert_ne!(split.finalize(), joined.finalize());
    }

    #[test]
    fn test_array_matches_fields() {
        let mut record = StateHasher::new(b"t");
        record.write([3u64, 9u64]);
        let mut fields = StateHasher::new(b"t");
        fields.write(3u64).write(9u64);
        assert_eq!(record.finalize(), fields.finalize());
    }

    #[test]
    fn test_step_is_hashed() {
        let fields = |h: &mut StateHasher| {
            h.write(Vec2::new(5.0, 6.0));
        };
        assert_eq!(compute_state_hash(3, fields), compute_state_hash(3, fields));
        assert_ne!(compute_state_hash(3, fields), compute_state_hash(4, fields));
        assert_ne!(
            compute_state_hash(3, fields),
            StateHasher::new(b"other").finalize()
        );
    }
}
