//! Cross-history deduplication lock tests.
//!
//! `VisitedCost` keeps a candidate only if its situation (state, portal
//! counters, player side) is new or reached more cheaply than before.

use std::collections::BTreeMap;

use sokowahn_harness::contract::RoomWorldV1;
use sokowahn_harness::worlds::cycle_room::CycleRoom;
use sokowahn_harness::worlds::goal_cell::GoalCell;
use sokowahn_kernel::room::Room;
use sokowahn_search::{DedupModeV1, ProfilePolicyV1, ProfileV1, RoomProfileFilter};

fn profile(room: &Room, dedup: DedupModeV1) -> ProfileV1 {
    let policy = ProfilePolicyV1 {
        dedup,
        ..ProfilePolicyV1::default()
    };
    RoomProfileFilter::new(room, policy)
        .unwrap()
        .generate_profiles()
        .unwrap()
}

/// Cheapest moves per (imported, exported) outcome.
fn cheapest(p: &ProfileV1) -> BTreeMap<(Vec<u32>, Vec<u32>), u64> {
    let mut best = BTreeMap::new();
    for chain in &p.chains {
        let slot = best
            .entry((chain.imported.clone(), chain.exported.clone()))
            .or_insert(u64::MAX);
        *slot = (*slot).min(chain.moves);
    }
    best
}

#[test]
fn dedup_prunes_the_corridor() {
    let room = GoalCell::corridor().build_room().unwrap();
    let plain = profile(&room, DedupModeV1::None);
    let dedup = profile(&room, DedupModeV1::VisitedCost);
    assert!(dedup.stats.dedup_suppressed > 0);
    assert!(dedup.chains.len() < plain.chains.len());
    assert!(dedup.stats.steps < plain.stats.steps);
    assert_eq!(plain.stats.dedup_suppressed, 0);
}

#[test]
fn dedup_outcomes_are_a_subset_of_plain_outcomes() {
    let room = GoalCell::corridor().build_room().unwrap();
    let plain = cheapest(&profile(&room, DedupModeV1::None));
    let dedup = cheapest(&profile(&room, DedupModeV1::VisitedCost));
    assert!(!dedup.is_empty());
    for (outcome, moves) in &dedup {
        let best = plain.get(outcome).copied();
        assert!(best.is_some(), "outcome {outcome:?} only found with dedup");
        assert!(best <= Some(*moves));
    }
}

#[test]
fn dedup_keeps_the_cheapest_cycle_room_chain() {
    let room = CycleRoom.build_room().unwrap();
    let p = profile(&room, DedupModeV1::VisitedCost);
    assert_eq!(p.chains.len(), 1);
    assert_eq!(p.chains[0].moves, 3);
    assert_eq!(p.stats.dedup_suppressed, 2);
    assert_eq!(p.stats.steps, 6);
}

#[test]
fn policy_is_recorded_in_profile_json() {
    let room = CycleRoom.build_room().unwrap();
    let p = profile(&room, DedupModeV1::VisitedCost);
    let json = p.to_json_value();
    assert_eq!(json["policy"]["dedup"], "visited_cost");
    assert_eq!(json["policy"]["max_path_repeats"], 2);
    assert_eq!(json["chain_count"], 1);
}
