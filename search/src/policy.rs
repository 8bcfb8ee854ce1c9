//! Profile generation policy.

use sokowahn_kernel::proof::canon::{canonical_json_bytes, CanonError};
use sokowahn_kernel::proof::hash::{canonical_hash, ContentHash, HashDomain};

use crate::error::ProfileError;

/// Knobs of a profile run.
///
/// The default reproduces the plain exhaustive walk: no cross-history
/// deduplication, each move fingerprint at most twice on one path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfilePolicyV1 {
    /// Cross-history deduplication mode.
    pub dedup: DedupModeV1,
    /// A candidate whose fingerprint already occurs this many times on the
    /// current root-to-top path is dropped. Must be at least 1.
    pub max_path_repeats: u32,
    /// Whether `generate_profiles` keeps the emitted chains. Statistics are
    /// collected either way.
    pub record_chains: bool,
}

impl ProfilePolicyV1 {
    /// Validate the policy before any search step.
    ///
    /// # Errors
    ///
    /// Returns [`ProfileError::InvalidPolicy`] if `max_path_repeats` is zero.
    pub fn validate(&self) -> Result<(), ProfileError> {
        if self.max_path_repeats == 0 {
            return Err(ProfileError::InvalidPolicy {
                detail: "max_path_repeats must be at least 1".into(),
            });
        }
        Ok(())
    }

    /// JSON form, embedded in profile artifacts.
    #[must_use]
    pub fn to_json_value(&self) -> serde_json::Value {
        serde_json::json!({
            "dedup": self.dedup.as_str(),
            "max_path_repeats": self.max_path_repeats,
            "record_chains": self.record_chains,
        })
    }

    /// Content digest of the policy.
    ///
    /// # Errors
    ///
    /// Propagates [`CanonError`] from canonical serialization.
    pub fn digest(&self) -> Result<ContentHash, CanonError> {
        let bytes = canonical_json_bytes(&self.to_json_value())?;
        Ok(canonical_hash(HashDomain::ProfilePolicy, &bytes))
    }
}

impl Default for ProfilePolicyV1 {
    fn default() -> Self {
        Self {
            dedup: DedupModeV1::None,
            max_path_repeats: 2,
            record_chains: true,
        }
    }
}

/// How revisits of the same room situation through different histories are treated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DedupModeV1 {
    /// Every history is explored. Default.
    #[default]
    None,
    /// A candidate is kept only if its situation (state, import and export
    /// counters, player position) was never reached, or is now reached with
    /// strictly fewer moves. Backed by a checksum table.
    VisitedCost,
}

impl DedupModeV1 {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::VisitedCost => "visited_cost",
        }
    }

    /// Parse the [`Self::as_str`] form.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "none" => Some(Self::None),
            "visited_cost" => Some(Self::VisitedCost),
            _ => None,
        }
    }
}
