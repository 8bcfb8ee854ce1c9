//! Harness runner: profiles a world's room and packages the result.
//!
//! The runner only orchestrates. Room construction belongs to the world,
//! the search to `sokowahn_search`, hashing to the kernel.
//!
//! # Pipeline
//!
//! ```text
//! build_room() → summary_json() → RoomProfileFilter::generate_profiles()
//!   → canonical JSON → digests → verification report → build_bundle()
//! ```

use std::fmt;

use sokowahn_kernel::proof::canon::canonical_json_bytes;
use sokowahn_kernel::proof::hash::{canonical_hash, HashDomain};
use sokowahn_kernel::room::RoomBuildError;
use sokowahn_search::{ProfileError, ProfilePolicyV1, ProfileV1, RoomProfileFilter};
use tracing::info;

use crate::bundle::{
    build_bundle, ArtifactBundleV1, BundleBuildError, PROFILE, REPORT, ROOM_SUMMARY, STATS,
};
use crate::contract::RoomWorldV1;

/// Error during a harness run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunError {
    /// The world could not build its room.
    World(RoomBuildError),
    /// Profile generation refused the room or the policy.
    Profile(ProfileError),
    /// Canonical JSON serialization failed.
    CanonFailed { detail: String },
    /// Bundle assembly failed.
    BundleFailed(BundleBuildError),
}

impl fmt::Display for RunError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::World(e) => write!(f, "room build failed: {e}"),
            Self::Profile(e) => write!(f, "{e}"),
            Self::CanonFailed { detail } => write!(f, "canonical JSON error: {detail}"),
            Self::BundleFailed(e) => write!(f, "bundle assembly failed: {e}"),
        }
    }
}

impl std::error::Error for RunError {}

/// Profile `world` with the default policy.
///
/// # Errors
///
/// Returns [`RunError`] at any pipeline step.
pub fn run(world: &dyn RoomWorldV1) -> Result<ArtifactBundleV1, RunError> {
    run_profile(world, &ProfilePolicyV1::default())
}

/// Profile `world` under `policy` and package the result.
///
/// Produces an [`ArtifactBundleV1`] containing:
/// - `room_summary.json` (normative): the room's states, swaps and variants
/// - `profile.json` (normative): policy, chain count and chains
/// - `stats.json` (observational): search counters
/// - `verification_report.json` (normative): world id and the digests that
///   bind the other artifacts together
///
/// # Errors
///
/// Returns [`RunError`] at any step. Fail-closed: no partial bundle.
pub fn run_profile(
    world: &dyn RoomWorldV1,
    policy: &ProfilePolicyV1,
) -> Result<ArtifactBundleV1, RunError> {
    let world_id = world.world_id();
    let room = world.build_room().map_err(RunError::World)?;
    let summary = canon(&room.summary_json())?;

    let filter = RoomProfileFilter::new(&room, policy.clone()).map_err(RunError::Profile)?;
    let profile = filter.generate_profiles().map_err(RunError::Profile)?;
    let profile_bytes = profile.to_canonical_json_bytes().map_err(|e| RunError::CanonFailed {
        detail: e.to_string(),
    })?;
    let stats = canon(&profile.stats.to_json_value())?;
    let report = verification_report(world_id, &summary, &profile, &profile_bytes)?;

    info!(
        world_id,
        chains = profile.stats.chains_emitted,
        steps = profile.stats.steps,
        "profile run packaged"
    );

    build_bundle(vec![
        (ROOM_SUMMARY.into(), summary, true),
        (PROFILE.into(), profile_bytes, true),
        (STATS.into(), stats, false),
        (REPORT.into(), report, true),
    ])
    .map_err(RunError::BundleFailed)
}

fn verification_report(
    world_id: &str,
    summary: &[u8],
    profile: &ProfileV1,
    profile_bytes: &[u8],
) -> Result<Vec<u8>, RunError> {
    let policy_digest = profile.policy.digest().map_err(|e| RunError::CanonFailed {
        detail: e.to_string(),
    })?;
    let report = serde_json::json!({
        "chain_count": profile.stats.chains_emitted,
        "policy_digest": policy_digest.as_str(),
        "profile_digest": canonical_hash(HashDomain::RoomProfile, profile_bytes).as_str(),
        "room_index": profile.room_index,
        "room_summary_digest": canonical_hash(HashDomain::RoomSummary, summary).as_str(),
        "schema_version": "verification_report.v1",
        "world_id": world_id,
    });
    canon(&report)
}

fn canon(value: &serde_json::Value) -> Result<Vec<u8>, RunError> {
    canonical_json_bytes(value).map_err(|e| RunError::CanonFailed {
        detail: e.to_string(),
    })
}
