//! Profile output types: chains, statistics and the profile artifact.
//!
//! A chain is one root-to-top path of the search that ended in the room's end
//! state. The profile of a room is the ordered list of its chains together
//! with the policy that produced them.

use std::collections::BTreeSet;
use std::fmt::Write as _;

use sokowahn_kernel::carrier::state_list::StateId;
use sokowahn_kernel::carrier::variant::{PortalIndex, VariantId};
use sokowahn_kernel::proof::canon::{canonical_json_bytes, CanonError};
use sokowahn_kernel::proof::hash::{canonical_hash, ContentHash, HashDomain};

use crate::policy::ProfilePolicyV1;

/// One transition of a chain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProfileStepV1 {
    /// A box pushed in through incoming portal `portal`, giving `state`.
    BoxSwap { portal: PortalIndex, state: StateId },
    /// A player traversal entered through `incoming`, giving `state`.
    Variant {
        variant: VariantId,
        incoming: PortalIndex,
        /// `None`: the player stays inside.
        outgoing: Option<PortalIndex>,
        /// Outgoing portals a box left through, one entry per box.
        box_portals: Vec<PortalIndex>,
        state: StateId,
    },
}

impl ProfileStepV1 {
    /// Room state after the step.
    #[must_use]
    pub fn state(&self) -> StateId {
        match self {
            Self::BoxSwap { state, .. } | Self::Variant { state, .. } => *state,
        }
    }

    fn to_json_value(&self) -> serde_json::Value {
        match self {
            Self::BoxSwap { portal, state } => serde_json::json!({
                "portal": portal,
                "state": state,
                "type": "box_swap",
            }),
            Self::Variant {
                variant,
                incoming,
                outgoing,
                box_portals,
                state,
            } => serde_json::json!({
                "box_portals": box_portals,
                "incoming": incoming,
                "outgoing": outgoing,
                "state": state,
                "type": "variant",
                "variant": variant,
            }),
        }
    }
}

/// A finished chain: start state, steps, and accumulated totals.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileChainV1 {
    pub start_state: StateId,
    pub end_state: StateId,
    pub moves: u64,
    pub pushes: u64,
    /// Boxes imported per incoming portal.
    pub imported: Vec<u32>,
    /// Boxes exported per outgoing portal.
    pub exported: Vec<u32>,
    pub steps: Vec<ProfileStepV1>,
}

impl ProfileChainV1 {
    /// Number of steps after the start state.
    #[must_use]
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Compact rendering: `"<moves>-<pushes>"` followed by, per step,
    /// `,bi<p>` for a box imported through `p`, or `,i<p>` for the player
    /// entering, `,bo<p>` for each portal a box left through and `,o<p>` for
    /// the player leaving.
    #[must_use]
    pub fn path_code(&self) -> String {
        let mut code = format!("{}-{}", self.moves, self.pushes);
        for step in &self.steps {
            match step {
                ProfileStepV1::BoxSwap { portal, .. } => {
                    let _ = write!(code, ",bi{portal}");
                }
                ProfileStepV1::Variant {
                    incoming,
                    outgoing,
                    box_portals,
                    ..
                } => {
                    let _ = write!(code, ",i{incoming}");
                    let exits: BTreeSet<PortalIndex> = box_portals.iter().copied().collect();
                    for portal in exits {
                        let _ = write!(code, ",bo{portal}");
                    }
                    if let Some(portal) = outgoing {
                        let _ = write!(code, ",o{portal}");
                    }
                }
            }
        }
        code
    }

    /// JSON form used inside [`ProfileV1`].
    #[must_use]
    pub fn to_json_value(&self) -> serde_json::Value {
        let steps: Vec<serde_json::Value> =
            self.steps.iter().map(ProfileStepV1::to_json_value).collect();
        serde_json::json!({
            "end_state": self.end_state,
            "exported": self.exported,
            "imported": self.imported,
            "moves": self.moves,
            "path_code": self.path_code(),
            "pushes": self.pushes,
            "start_state": self.start_state,
            "steps": steps,
        })
    }
}

/// Counters of one profile run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProfileStatsV1 {
    /// Loop iterations, backtrack pops included.
    pub steps: u64,
    /// Moves allocated, root included.
    pub moves_created: u64,
    pub swap_candidates: u64,
    pub variant_candidates: u64,
    /// Candidates dropped by the path-repeat guard.
    pub repeats_suppressed: u64,
    /// Candidates dropped by cross-history deduplication.
    pub dedup_suppressed: u64,
    pub chains_emitted: u64,
    pub stack_high_water: u64,
}

impl ProfileStatsV1 {
    #[must_use]
    pub fn to_json_value(&self) -> serde_json::Value {
        serde_json::json!({
            "chains_emitted": self.chains_emitted,
            "dedup_suppressed": self.dedup_suppressed,
            "moves_created": self.moves_created,
            "repeats_suppressed": self.repeats_suppressed,
            "stack_high_water": self.stack_high_water,
            "steps": self.steps,
            "swap_candidates": self.swap_candidates,
            "variant_candidates": self.variant_candidates,
        })
    }
}

/// The profile of one room.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileV1 {
    pub room_index: u32,
    pub start_state: StateId,
    pub end_state: StateId,
    pub policy: ProfilePolicyV1,
    /// Emitted chains in emission order (empty unless the policy records them).
    pub chains: Vec<ProfileChainV1>,
    pub stats: ProfileStatsV1,
}

impl ProfileV1 {
    /// JSON form of the profile. Statistics are left out; they describe the
    /// run, not the room.
    #[must_use]
    pub fn to_json_value(&self) -> serde_json::Value {
        let chains: Vec<serde_json::Value> =
            self.chains.iter().map(ProfileChainV1::to_json_value).collect();
        serde_json::json!({
            "chain_count": self.stats.chains_emitted,
            "chains": chains,
            "end_state": self.end_state,
            "policy": self.policy.to_json_value(),
            "room_index": self.room_index,
            "schema_version": "room_profile.v1",
            "start_state": self.start_state,
        })
    }

    /// Canonical JSON bytes of [`Self::to_json_value`].
    ///
    /// # Errors
    ///
    /// Propagates [`CanonError`].
    pub fn to_canonical_json_bytes(&self) -> Result<Vec<u8>, CanonError> {
        canonical_json_bytes(&self.to_json_value())
    }

    /// Content digest of the canonical JSON.
    ///
    /// # Errors
    ///
    /// Propagates [`CanonError`].
    pub fn digest(&self) -> Result<ContentHash, CanonError> {
        let bytes = self.to_canonical_json_bytes()?;
        Ok(canonical_hash(HashDomain::RoomProfile, &bytes))
    }
}
