//! The room model a profile search consumes.
//!
//! A [`Room`] is immutable once built. It owns its state catalog and variant
//! list; every incoming portal owns the box-swap index and the variant
//! directory for boxes and players entering through it.

use std::fmt;

use crate::carrier::box_swap::BoxSwap;
use crate::carrier::state_list::{FieldPos, StateId, StateList};
use crate::carrier::variant::{VariantData, VariantId, VariantList, VariantStateDict};

/// Handle of the state a room is in once the level is solved, by convention.
pub const DEFAULT_END_STATE: StateId = 0;

/// A connection between two neighbouring board cells.
///
/// For an incoming portal `from` lies outside the room and `to` inside; for
/// an outgoing portal it is the other way round.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PortalLink {
    pub from: FieldPos,
    pub to: FieldPos,
}

impl PortalLink {
    #[must_use]
    pub const fn new(from: FieldPos, to: FieldPos) -> Self {
        Self { from, to }
    }

    /// Signed step from `from` to `to` (board direction of travel).
    #[must_use]
    pub fn delta(&self) -> i64 {
        i64::from(self.to) - i64::from(self.from)
    }
}

impl fmt::Display for PortalLink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({} -> {})", self.from, self.to)
    }
}

/// An incoming portal and the per-portal stores it owns.
pub struct IncomingPortal {
    pub link: PortalLink,
    pub box_swap: Box<dyn BoxSwap>,
    pub variants: Box<dyn VariantStateDict>,
}

impl fmt::Debug for IncomingPortal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IncomingPortal")
            .field("link", &self.link)
            .field("box_swaps", &self.box_swap.count())
            .field("variants", &self.variants.count())
            .finish()
    }
}

/// A room: one partition of the board, with every store a profile search reads.
pub struct Room {
    pub(crate) room_index: u32,
    pub(crate) field_posis: Vec<FieldPos>,
    pub(crate) goal_posis: Vec<FieldPos>,
    pub(crate) state_list: Box<dyn StateList>,
    pub(crate) start_state: StateId,
    pub(crate) end_state: StateId,
    pub(crate) variant_list: Box<dyn VariantList>,
    pub(crate) start_variant_count: u64,
    pub(crate) incoming: Vec<IncomingPortal>,
    pub(crate) outgoing: Vec<PortalLink>,
}

impl Room {
    #[must_use]
    pub fn room_index(&self) -> u32 {
        self.room_index
    }

    /// Field positions of the room, ascending.
    #[must_use]
    pub fn field_posis(&self) -> &[FieldPos] {
        &self.field_posis
    }

    /// Goal positions of the room, ascending.
    #[must_use]
    pub fn goal_posis(&self) -> &[FieldPos] {
        &self.goal_posis
    }

    #[must_use]
    pub fn state_list(&self) -> &dyn StateList {
        self.state_list.as_ref()
    }

    #[must_use]
    pub fn start_state(&self) -> StateId {
        self.start_state
    }

    /// The state that completes a profile chain.
    #[must_use]
    pub fn end_state(&self) -> StateId {
        self.end_state
    }

    #[must_use]
    pub fn variant_list(&self) -> &dyn VariantList {
        self.variant_list.as_ref()
    }

    /// Number of variants that start with the player already inside the room.
    ///
    /// Start variants occupy the first handles of the variant list.
    #[must_use]
    pub fn start_variant_count(&self) -> u64 {
        self.start_variant_count
    }

    #[must_use]
    pub fn incoming_portals(&self) -> &[IncomingPortal] {
        &self.incoming
    }

    #[must_use]
    pub fn outgoing_portals(&self) -> &[PortalLink] {
        &self.outgoing
    }

    /// Deterministic JSON description of the room.
    ///
    /// Lists every state, box swap and variant, so two rooms with equal
    /// summaries behave identically under a profile search.
    #[must_use]
    pub fn summary_json(&self) -> serde_json::Value {
        let states: Vec<serde_json::Value> = self
            .state_list
            .states()
            .map(|(_, boxes)| serde_json::json!(boxes))
            .collect();

        let variants: Vec<serde_json::Value> = (0..self.variant_list.count())
            .map(|v| variant_json(self.variant_list.get(v)))
            .collect();

        let incoming: Vec<serde_json::Value> = self
            .incoming
            .iter()
            .map(|portal| {
                let swaps: Vec<[StateId; 2]> =
                    portal.box_swap.iter().map(|(pre, post)| [pre, post]).collect();
                let by_state: Vec<serde_json::Value> = (0..self.state_list.count())
                    .filter_map(|state| {
                        let list: &[VariantId] = portal.variants.get(state);
                        (!list.is_empty()).then(|| serde_json::json!([state, list]))
                    })
                    .collect();
                serde_json::json!({
                    "from": portal.link.from,
                    "to": portal.link.to,
                    "box_swaps": swaps,
                    "variants": by_state,
                })
            })
            .collect();

        let outgoing: Vec<serde_json::Value> = self
            .outgoing
            .iter()
            .map(|link| serde_json::json!({ "from": link.from, "to": link.to }))
            .collect();

        serde_json::json!({
            "schema_version": "room_summary.v1",
            "room_index": self.room_index,
            "field_posis": self.field_posis,
            "goal_posis": self.goal_posis,
            "start_state": self.start_state,
            "end_state": self.end_state,
            "start_variant_count": self.start_variant_count,
            "states": states,
            "variants": variants,
            "incoming": incoming,
            "outgoing": outgoing,
        })
    }
}

fn variant_json(data: &VariantData) -> serde_json::Value {
    serde_json::json!({
        "old_state": data.old_state,
        "moves": data.moves,
        "pushes": data.pushes,
        "box_portals": data.box_portals,
        "player_portal": data.player_portal,
        "new_state": data.new_state,
    })
}

impl fmt::Debug for Room {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Room")
            .field("room_index", &self.room_index)
            .field("field_posis", &self.field_posis)
            .field("states", &self.state_list.count())
            .field("start_state", &self.start_state)
            .field("end_state", &self.end_state)
            .field("variants", &self.variant_list.count())
            .field("incoming", &self.incoming)
            .field("outgoing", &self.outgoing)
            .finish_non_exhaustive()
    }
}
