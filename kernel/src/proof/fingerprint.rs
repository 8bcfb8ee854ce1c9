//! 64-bit rolling fingerprint for search-node identity.
//!
//! FNV-1a style: xor the value into the running checksum, then multiply by
//! the FNV prime. A `u64` is folded as two 32-bit halves (low half first) so
//! that values below 2^32 hash the same whether fed as `u32` or `u64`.
//!
//! Fingerprints are deduplication keys, not content commitments. Use
//! [`crate::proof::hash`] for anything that leaves the process.

/// Initial fingerprint value (FNV offset basis).
pub const START: u64 = 0xcbf2_9ce4_8422_2325;

/// Fingerprint multiplier (FNV prime).
pub const MUL: u64 = 0x0000_0100_0000_01b3;

/// A running 64-bit fingerprint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Fingerprint(u64);

impl Fingerprint {
    /// A fresh fingerprint at [`START`].
    #[must_use]
    pub const fn start() -> Self {
        Self(START)
    }

    /// Fold a 32-bit value.
    #[must_use]
    pub const fn update_u32(self, value: u32) -> Self {
        Self((self.0 ^ value as u64).wrapping_mul(MUL))
    }

    /// Fold a 64-bit value (low half, then high half).
    #[must_use]
    pub const fn update_u64(self, value: u64) -> Self {
        let low = (self.0 ^ (value & 0xffff_ffff)).wrapping_mul(MUL);
        Self((low ^ (value >> 32)).wrapping_mul(MUL))
    }

    /// Fold every value of a slice, in order.
    #[must_use]
    pub fn update_u32_slice(self, values: &[u32]) -> Self {
        values.iter().fold(self, |fp, &v| fp.update_u32(v))
    }

    /// The raw 64-bit value.
    #[must_use]
    pub const fn value(self) -> u64 {
        self.0
    }
}

impl Default for Fingerprint {
    fn default() -> Self {
        Self::start()
    }
}

impl From<Fingerprint> for u64 {
    fn from(fp: Fingerprint) -> Self {
        fp.0
    }
}
