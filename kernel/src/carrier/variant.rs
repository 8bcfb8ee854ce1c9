//! Variant catalog: complete player traversals through a room.
//!
//! A variant starts in a room state with the player entering through an
//! incoming portal, and ends in a new room state with the player either
//! leaving through an outgoing portal or staying inside (which only happens
//! when the last push finished the whole game). Boxes pushed out of the room
//! during the traversal are recorded per outgoing portal.
//!
//! Variants live in one list per room; each incoming portal owns a
//! [`VariantStateDict`] that maps a room state to the variants that can be
//! started from it through that portal.

use std::collections::BTreeMap;

use crate::carrier::state_list::{StateId, StateList};

/// Dense handle of a variant (0-based, insertion order).
pub type VariantId = u64;

/// Index of a portal within a room's incoming or outgoing portal list.
pub type PortalIndex = u32;

/// Highest portal count whose indices still fit a box-crossing bitmask.
/// Bit 63 is reserved.
pub const MAX_PORTALS: usize = 63;

/// One complete traversal of a room.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariantData {
    /// Room state before the traversal.
    pub old_state: StateId,
    /// Player steps counted inside the room and when leaving it.
    pub moves: u64,
    /// Box pushes counted inside the room and when leaving it.
    pub pushes: u64,
    /// Outgoing portals a box was pushed through, one entry per box.
    pub box_portals: Vec<PortalIndex>,
    /// Outgoing portal the player left through (`None`: stays inside, game finished).
    pub player_portal: Option<PortalIndex>,
    /// Room state after the traversal.
    pub new_state: StateId,
}

impl VariantData {
    /// Fold [`Self::box_portals`] into a bitmask (bit `p` set for portal `p`).
    ///
    /// # Panics
    ///
    /// Panics if a portal index does not fit below the reserved bit.
    #[must_use]
    pub fn box_portal_mask(&self) -> u64 {
        self.box_portals.iter().fold(0u64, |mask, &p| {
            assert!(
                (p as usize) < MAX_PORTALS,
                "portal index {p} does not fit the box-crossing bitmask"
            );
            mask | (1u64 << p)
        })
    }
}

/// Capability of a room's variant list.
pub trait VariantList {
    /// Number of stored variants.
    fn count(&self) -> u64;

    /// Append a variant and return its handle.
    ///
    /// # Panics
    ///
    /// Implementations panic if a state handle is out of range for `states`
    /// or a portal index is out of range for the room.
    fn add(&mut self, states: &dyn StateList, data: VariantData) -> VariantId;

    /// The data of `variant`.
    ///
    /// # Panics
    ///
    /// Implementations panic if `variant >= count()`.
    fn get(&self, variant: VariantId) -> &VariantData;
}

/// In-memory variant list.
#[derive(Debug, Clone)]
pub struct VariantListNormal {
    outgoing_portal_count: u32,
    data: Vec<VariantData>,
}

impl VariantListNormal {
    /// Create an empty list for a room with `outgoing_portal_count` outgoing portals.
    #[must_use]
    pub fn new(outgoing_portal_count: u32) -> Self {
        Self {
            outgoing_portal_count,
            data: Vec::new(),
        }
    }
}

impl VariantList for VariantListNormal {
    fn count(&self) -> u64 {
        self.data.len() as u64
    }

    fn add(&mut self, states: &dyn StateList, data: VariantData) -> VariantId {
        let count = states.count();
        assert!(data.old_state < count, "variant old state {} out of range", data.old_state);
        assert!(data.new_state < count, "variant new state {} out of range", data.new_state);
        let portals = self.outgoing_portal_count;
        assert!(
            data.box_portals.iter().all(|&p| p < portals),
            "variant box portal out of range ({portals} outgoing portals)"
        );
        if let Some(p) = data.player_portal {
            assert!(p < portals, "variant player portal {p} out of range");
        }

        let id = self.data.len() as VariantId;
        self.data.push(data);
        id
    }

    fn get(&self, variant: VariantId) -> &VariantData {
        let idx = usize::try_from(variant).unwrap_or(usize::MAX);
        assert!(idx < self.data.len(), "variant {variant} out of range");
        &self.data[idx]
    }
}

/// Capability of a per-portal state → variants directory.
pub trait VariantStateDict {
    /// Register `variant` as startable from `state`.
    ///
    /// # Panics
    ///
    /// Implementations panic if a handle is out of range or the pair is
    /// already registered.
    fn add(
        &mut self,
        states: &dyn StateList,
        variants: &dyn VariantList,
        state: StateId,
        variant: VariantId,
    );

    /// Variants startable from `state`, in registration order.
    fn get(&self, state: StateId) -> &[VariantId];

    /// Total number of registered (state, variant) pairs.
    fn count(&self) -> u64;
}

/// In-memory variant directory.
#[derive(Debug, Clone, Default)]
pub struct VariantStateDictNormal {
    data: BTreeMap<StateId, Vec<VariantId>>,
}

impl VariantStateDictNormal {
    /// Create an empty directory.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl VariantStateDict for VariantStateDictNormal {
    fn add(
        &mut self,
        states: &dyn StateList,
        variants: &dyn VariantList,
        state: StateId,
        variant: VariantId,
    ) {
        assert!(state < states.count(), "state {state} out of range");
        assert!(variant < variants.count(), "variant {variant} out of range");
        assert_eq!(
            variants.get(variant).old_state,
            state,
            "variant {variant} does not start in state {state}"
        );

        let list = self.data.entry(state).or_default();
        assert!(
            !list.contains(&variant),
            "variant {variant} registered twice for state {state}"
        );
        list.push(variant);
    }

    fn get(&self, state: StateId) -> &[VariantId] {
        self.data.get(&state).map_or(&[][..], Vec::as_slice)
    }

    fn count(&self) -> u64 {
        self.data.values().map(|v| v.len() as u64).sum()
    }
}
