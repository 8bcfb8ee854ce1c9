//! Fixture rooms for the harness runner.

pub mod cycle_room;
pub mod goal_cell;
pub mod single_swap;
pub mod trivial_room;

use crate::contract::RoomWorldV1;

/// Every fixture world, in a fixed order.
#[must_use]
pub fn all_worlds() -> Vec<Box<dyn RoomWorldV1>> {
    vec![
        Box::new(trivial_room::TrivialRoom),
        Box::new(single_swap::SingleSwap),
        Box::new(goal_cell::GoalCell::dead_end()),
        Box::new(goal_cell::GoalCell::corridor()),
        Box::new(cycle_room::CycleRoom),
    ]
}

/// Look a fixture world up by id.
#[must_use]
pub fn world_by_id(world_id: &str) -> Option<Box<dyn RoomWorldV1>> {
    all_worlds().into_iter().find(|w| w.world_id() == world_id)
}
