//! `GoalCell`: one-cell goal rooms built by the single-cell constructor.
//!
//! Two layouts on cell 11:
//! - `dead_end`: reachable only from cell 10. A box pushed in can never be
//!   pushed on, so the only chain is the import itself.
//! - `corridor`: between cells 10 and 12. Boxes can pass through in either
//!   direction and the player can walk across, which makes for a large
//!   profile.

use sokowahn_kernel::room::single_cell::{
    build_single_cell, CellContext, CellKind, IncomingFacts, OutgoingFacts,
};
use sokowahn_kernel::room::{PortalLink, Room, RoomBuildError};

use crate::contract::RoomWorldV1;

const CELL: u32 = 11;

/// Empty goal cell with one or two open neighbours.
pub struct GoalCell {
    world_id: &'static str,
    neighbours: &'static [u32],
}

impl GoalCell {
    #[must_use]
    pub const fn dead_end() -> Self {
        Self {
            world_id: "goal_cell",
            neighbours: &[10],
        }
    }

    #[must_use]
    pub const fn corridor() -> Self {
        Self {
            world_id: "goal_corridor",
            neighbours: &[10, 12],
        }
    }

    fn context(&self) -> CellContext {
        CellContext {
            room_index: 3,
            pos: CELL,
            kind: CellKind::Goal,
            player: false,
            corner: false,
            incoming: self
                .neighbours
                .iter()
                .map(|&n| IncomingFacts {
                    link: PortalLink::new(n, CELL),
                    box_can_enter: true,
                })
                .collect(),
            outgoing: self
                .neighbours
                .iter()
                .map(|&n| OutgoingFacts {
                    link: PortalLink::new(CELL, n),
                    target_goal: false,
                    target_dead: false,
                    beyond_dead: false,
                })
                .collect(),
        }
    }
}

impl RoomWorldV1 for GoalCell {
    fn world_id(&self) -> &str {
        self.world_id
    }

    fn build_room(&self) -> Result<Room, RoomBuildError> {
        build_single_cell(&self.context())
    }
}
