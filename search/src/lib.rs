//! Sokowahn Search: room profile generation.
//!
//! A room profile lists every way the room can be driven from its start
//! state to its end state through its portals: boxes pushed in, player
//! traversals, boxes pushed out. The search reads only kernel room stores and
//! does not depend on `sokowahn_harness`.
//!
//! # Crate dependency graph
//!
//! ```text
//! sokowahn_kernel  ←  sokowahn_search  ←  sokowahn_harness
//! (stores, rooms)     (profile walk)      (worlds, bundles)
//! ```
//!
//! # Key types
//!
//! - [`RoomProfileFilter`]: depth-first profile walk over one room
//! - [`ProfilePolicyV1`]: repeat bound and deduplication mode
//! - [`ProfileV1`]: emitted chains (normative bundle artifact)
//! - [`ProfileStatsV1`]: run counters (observational)
//! - [`ChainSink`]: streaming consumer of emitted chains

#![forbid(unsafe_code)]

pub mod error;
pub mod filter;
pub mod node;
pub mod policy;
pub mod profile;
pub mod sink;

pub use error::ProfileError;
pub use filter::RoomProfileFilter;
pub use policy::{DedupModeV1, ProfilePolicyV1};
pub use profile::{ProfileChainV1, ProfileStatsV1, ProfileStepV1, ProfileV1};
pub use sink::{ChainSink, CountingSink};
