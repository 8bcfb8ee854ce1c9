//! Shared helpers for the sokowahn benchmark suites.

use sokowahn_harness::worlds::all_worlds;
use sokowahn_kernel::carrier::state_list::{FieldPos, StateList, StateListNormal};
use sokowahn_kernel::room::Room;
use sokowahn_search::{
    CountingSink, DedupModeV1, ProfilePolicyV1, ProfileStatsV1, RoomProfileFilter,
};

/// Every fixture room, built once, paired with its world id.
///
/// # Panics
///
/// Panics if a fixture world fails to build. Benchmark setup failures are fatal.
#[must_use]
pub fn fixture_rooms() -> Vec<(String, Room)> {
    all_worlds()
        .iter()
        .map(|w| {
            let room = w.build_room().expect("fixture room builds");
            (w.world_id().to_string(), room)
        })
        .collect()
}

/// The two dedup regimes with the default repeat bound.
#[must_use]
pub fn policy_regimes() -> [(&'static str, ProfilePolicyV1); 2] {
    [
        ("plain", ProfilePolicyV1::default()),
        (
            "visited_cost",
            ProfilePolicyV1 {
                dedup: DedupModeV1::VisitedCost,
                ..ProfilePolicyV1::default()
            },
        ),
    ]
}

/// Run the profile search into a [`CountingSink`], bypassing chain recording.
///
/// # Panics
///
/// Panics if the room or policy is refused. Benchmark runs are expected to succeed.
pub fn profile_counting(room: &Room, policy: &ProfilePolicyV1) -> (ProfileStatsV1, CountingSink) {
    let filter = RoomProfileFilter::new(room, policy.clone()).expect("valid policy");
    let mut sink = CountingSink::default();
    let stats = filter.generate_into(&mut sink).expect("profile search succeeds");
    (stats, sink)
}

/// A catalog over `width` field positions holding every box set of size
/// `boxes` or less.
#[must_use]
pub fn dense_catalog(width: u32, boxes: usize) -> StateListNormal {
    let field: Vec<FieldPos> = (0..width).collect();
    let mut list = StateListNormal::new(&field, &[]);
    let mut current = Vec::with_capacity(boxes);
    fill_subsets(&field, boxes, 0, &mut current, &mut list);
    list
}

fn fill_subsets(
    field: &[FieldPos],
    boxes: usize,
    from: usize,
    current: &mut Vec<FieldPos>,
    list: &mut StateListNormal,
) {
    list.add(current);
    if current.len() == boxes {
        return;
    }
    for i in from..field.len() {
        current.push(field[i]);
        fill_subsets(field, boxes, i + 1, current, list);
        current.pop();
    }
}
