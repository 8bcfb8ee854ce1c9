//! Proof module: fingerprints, checksum tables, canonical JSON and content hashing.
//!
//! Depends on nothing else in the kernel. `room` and downstream crates use it
//! for deduplication keys and artifact digests.

pub mod canon;
pub mod checksum_table;
pub mod fingerprint;
pub mod hash;
pub mod hash_domain;
