//! SHA-256 content hashes under a typed domain separator.
//!
//! `canonical_hash` is the only digest function in the workspace; profile
//! artifacts, policies and bundles are all addressed through it.

use sha2::{Digest, Sha256};

pub use crate::proof::hash_domain::HashDomain;

const SHA256_PREFIX: &str = "sha256:";

/// A content address rendered as `"sha256:<64 lowercase hex digits>"`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ContentHash(String);

impl ContentHash {
    /// Parse a rendered content address.
    ///
    /// Only SHA-256 addresses with a full-length lowercase hex digest are
    /// accepted.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        let digest = s.strip_prefix(SHA256_PREFIX)?;
        let well_formed = digest.len() == 64
            && digest
                .bytes()
                .all(|b| b.is_ascii_digit() || (b'a'..=b'f').contains(&b));
        well_formed.then(|| Self(s.to_string()))
    }

    /// Always `"sha256"`.
    #[must_use]
    pub fn algorithm(&self) -> &str {
        &SHA256_PREFIX[..SHA256_PREFIX.len() - 1]
    }

    #[must_use]
    pub fn hex_digest(&self) -> &str {
        &self.0[SHA256_PREFIX.len()..]
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ContentHash {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// `SHA-256(domain separator || data)`.
#[must_use]
pub fn canonical_hash(domain: HashDomain, data: &[u8]) -> ContentHash {
    let digest = Sha256::new()
        .chain_update(domain.as_bytes())
        .chain_update(data)
        .finalize();
    ContentHash(format!("{SHA256_PREFIX}{}", hex::encode(digest)))
}
