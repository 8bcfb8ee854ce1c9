//! `TrivialRoom`: one empty cell, no portals.
//!
//! Start and end state coincide, so the profile is a single empty chain.

use sokowahn_kernel::room::{Room, RoomBuildError, RoomBuilder};

use crate::contract::RoomWorldV1;

/// Smallest possible room.
pub struct TrivialRoom;

impl RoomWorldV1 for TrivialRoom {
    #[allow(clippy::unnecessary_literal_bound)]
    fn world_id(&self) -> &str {
        "trivial_room"
    }

    fn build_room(&self) -> Result<Room, RoomBuildError> {
        let mut builder = RoomBuilder::new(0, &[5], &[], &[], &[])?;
        builder.add_state(&[])?;
        builder.build()
    }
}
