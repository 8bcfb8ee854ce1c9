//! `SingleSwap`: an empty goal cell that is solved by one imported box.

use sokowahn_kernel::room::{PortalLink, Room, RoomBuildError, RoomBuilder};

use crate::contract::RoomWorldV1;

/// Goal cell 5 fed through portal 4 → 5. No traversals.
pub struct SingleSwap;

impl RoomWorldV1 for SingleSwap {
    #[allow(clippy::unnecessary_literal_bound)]
    fn world_id(&self) -> &str {
        "single_swap"
    }

    fn build_room(&self) -> Result<Room, RoomBuildError> {
        let mut builder = RoomBuilder::new(1, &[5], &[5], &[PortalLink::new(4, 5)], &[])?;
        let solved = builder.add_state(&[5])?;
        let empty = builder.add_state(&[])?;
        builder.add_box_swap(0, empty, solved)?;
        builder.start_state(empty).build()
    }
}
