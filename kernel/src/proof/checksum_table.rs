//! Checksum table: fingerprint → value store for visited-node bookkeeping.
//!
//! Keys are 64-bit fingerprints (see [`crate::proof::fingerprint`]); values
//! are solver-defined (visited marker, best cost, search depth). The table
//! holds at most one value per key and makes no ordering promise.

use std::collections::HashMap;

/// Capability of a checksum table.
///
/// `ChecksumTableNormal` is the in-memory backing; the four operations below
/// are the whole contract so that disk-backed or compressed tables remain a
/// pure swap.
pub trait ChecksumTable {
    /// Insert a new entry.
    ///
    /// # Panics
    ///
    /// Implementations panic if `key` is already present.
    fn add(&mut self, key: u64, value: u64);

    /// Replace the value of an existing entry.
    ///
    /// # Panics
    ///
    /// Implementations panic if `key` is absent.
    fn update(&mut self, key: u64, value: u64);

    /// The stored value, or `default` if `key` is absent.
    fn get(&self, key: u64, default: u64) -> u64;

    /// Number of stored entries.
    fn count(&self) -> u64;
}

/// In-memory checksum table.
#[derive(Debug, Clone, Default)]
pub struct ChecksumTableNormal {
    data: HashMap<u64, u64>,
}

impl ChecksumTableNormal {
    /// Create an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl ChecksumTable for ChecksumTableNormal {
    fn add(&mut self, key: u64, value: u64) {
        let previous = self.data.insert(key, value);
        assert!(previous.is_none(), "checksum {key:#018x} already present");
    }

    fn update(&mut self, key: u64, value: u64) {
        match self.data.get_mut(&key) {
            Some(slot) => *slot = value,
            None => panic!("checksum {key:#018x} not present"),
        }
    }

    fn get(&self, key: u64, default: u64) -> u64 {
        self.data.get(&key).copied().unwrap_or(default)
    }

    fn count(&self) -> u64 {
        self.data.len() as u64
    }
}
