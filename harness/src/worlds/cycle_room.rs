//! `CycleRoom`: two cells with walk-through loops.
//!
//! Cells 5 and 6, goal on 6, one portal pair with cell 4. A box imported onto
//! 5 is carried to the goal by a traversal. The empty and the solved state
//! each have a traversal back onto themselves, so without a repeat bound the
//! walk would never end.
//!
//! ```text
//! state 0: box on 6 (end)   state 1: empty (start)   state 2: box on 5
//!
//! swap  i0: 1 → 2
//! v0    i0: 2 → 0   2 moves, 1 push, leaves via o0
//! v1    i0: 1 → 1   2 moves, leaves via o0
//! v2    i0: 0 → 0   2 moves, leaves via o0
//! ```

use sokowahn_kernel::carrier::state_list::StateId;
use sokowahn_kernel::carrier::variant::VariantData;
use sokowahn_kernel::room::{PortalLink, Room, RoomBuildError, RoomBuilder};

use crate::contract::RoomWorldV1;

/// Repeat-guard fixture.
pub struct CycleRoom;

impl RoomWorldV1 for CycleRoom {
    #[allow(clippy::unnecessary_literal_bound)]
    fn world_id(&self) -> &str {
        "cycle_room"
    }

    fn build_room(&self) -> Result<Room, RoomBuildError> {
        let mut builder = RoomBuilder::new(
            2,
            &[5, 6],
            &[6],
            &[PortalLink::new(4, 5)],
            &[PortalLink::new(5, 4)],
        )?;
        let solved = builder.add_state(&[6])?;
        let empty = builder.add_state(&[])?;
        let entered = builder.add_state(&[5])?;
        builder.add_box_swap(0, empty, entered)?;
        builder.add_variant(0, round_trip(entered, 1, solved))?;
        builder.add_variant(0, round_trip(empty, 0, empty))?;
        builder.add_variant(0, round_trip(solved, 0, solved))?;
        builder.start_state(empty).build()
    }
}

fn round_trip(old_state: StateId, pushes: u64, new_state: StateId) -> VariantData {
    VariantData {
        old_state,
        moves: 2,
        pushes,
        box_portals: Vec::new(),
        player_portal: Some(0),
        new_state,
    }
}
