//! Profile filter lock tests: every emitted chain is a legal walk through
//! the room, totals match the steps, and runs are reproducible.

use sokowahn_harness::contract::RoomWorldV1;
use sokowahn_harness::worlds::all_worlds;
use sokowahn_harness::worlds::cycle_room::CycleRoom;
use sokowahn_harness::worlds::goal_cell::GoalCell;
use sokowahn_kernel::room::Room;
use sokowahn_search::{
    ChainSink, ProfileChainV1, ProfilePolicyV1, ProfileStepV1, ProfileV1, RoomProfileFilter,
};

fn profile(room: &Room, policy: ProfilePolicyV1) -> ProfileV1 {
    RoomProfileFilter::new(room, policy)
        .unwrap()
        .generate_profiles()
        .unwrap()
}

/// Replay a chain against the room's stores and recompute its totals.
fn assert_chain_is_legal(room: &Room, chain: &ProfileChainV1) {
    let mut state = chain.start_state;
    let (mut moves, mut pushes) = (0u64, 0u64);
    let mut imported = vec![0u32; room.incoming_portals().len()];
    let mut exported = vec![0u32; room.outgoing_portals().len()];

    for (i, step) in chain.steps.iter().enumerate() {
        let last = i + 1 == chain.steps.len();
        match step {
            ProfileStepV1::BoxSwap { portal, state: next } => {
                let swaps = &room.incoming_portals()[*portal as usize].box_swap;
                assert_eq!(swaps.get(state), *next, "swap from {state} in {}", chain.path_code());
                assert_ne!(*next, state);
                imported[*portal as usize] += 1;
                moves += 1;
                pushes += 1;
            }
            ProfileStepV1::Variant {
                variant,
                incoming,
                outgoing,
                box_portals,
                state: next,
            } => {
                let listed = room.incoming_portals()[*incoming as usize].variants.get(state);
                assert!(listed.contains(variant), "variant {variant} not startable from {state}");
                let data = room.variant_list().get(*variant);
                assert_eq!(data.new_state, *next);
                assert_eq!(data.player_portal, *outgoing);
                assert_eq!(&data.box_portals, box_portals);
                assert!(outgoing.is_some() || last, "player inside before the end of a chain");
                for &b in box_portals {
                    exported[b as usize] += 1;
                }
                moves += data.moves;
                pushes += data.pushes;
            }
        }
        state = step.state();
    }

    assert_eq!(state, room.end_state());
    assert_eq!(chain.end_state, room.end_state());
    assert_eq!((chain.moves, chain.pushes), (moves, pushes), "{}", chain.path_code());
    assert_eq!(chain.imported, imported);
    assert_eq!(chain.exported, exported);
}

#[test]
fn every_world_emits_only_legal_chains() {
    for world in all_worlds() {
        let room = world.build_room().unwrap();
        let p = profile(&room, ProfilePolicyV1::default());
        assert!(!p.chains.is_empty(), "{} has no chain", world.world_id());
        assert_eq!(p.stats.chains_emitted, p.chains.len() as u64);
        for chain in &p.chains {
            assert_eq!(chain.start_state, room.start_state());
            assert_chain_is_legal(&room, chain);
        }
    }
}

#[test]
fn dead_end_goal_is_solved_by_one_import() {
    let room = GoalCell::dead_end().build_room().unwrap();
    let p = profile(&room, ProfilePolicyV1::default());
    let codes: Vec<String> = p.chains.iter().map(ProfileChainV1::path_code).collect();
    assert_eq!(codes, vec!["1-1,bi0"]);
    assert_eq!(p.stats.steps, 4);
}

#[test]
fn cycle_room_statistics_are_pinned() {
    let room = CycleRoom.build_room().unwrap();
    let stats = profile(&room, ProfilePolicyV1::default()).stats;
    assert_eq!(stats.steps, 28);
    assert_eq!(stats.moves_created, 15);
    assert_eq!(stats.swap_candidates, 3);
    assert_eq!(stats.variant_candidates, 15);
    assert_eq!(stats.repeats_suppressed, 4);
    assert_eq!(stats.dedup_suppressed, 0);
    assert_eq!(stats.chains_emitted, 9);
    assert_eq!(stats.stack_high_water, 7);
}

#[test]
fn looser_repeat_bound_never_loses_chains() {
    let room = GoalCell::corridor().build_room().unwrap();
    let mut previous = 0;
    for max_path_repeats in 1..=2 {
        let p = profile(
            &room,
            ProfilePolicyV1 {
                max_path_repeats,
                ..ProfilePolicyV1::default()
            },
        );
        assert!(p.stats.chains_emitted >= previous);
        previous = p.stats.chains_emitted;
    }
}

#[test]
fn generation_is_reproducible() {
    let room = GoalCell::corridor().build_room().unwrap();
    let a = profile(&room, ProfilePolicyV1::default());
    let b = profile(&room, ProfilePolicyV1::default());
    assert_eq!(a, b);
    assert_eq!(a.digest().unwrap(), b.digest().unwrap());
}

/// Stops caring after the first chain but still sees every one.
struct FirstChain {
    first: Option<String>,
    seen: u64,
}

impl ChainSink for FirstChain {
    fn accept(&mut self, chain: &ProfileChainV1) {
        self.seen += 1;
        if self.first.is_none() {
            self.first = Some(chain.path_code());
        }
    }
}

#[test]
fn streaming_sink_matches_collected_profile() {
    let room = CycleRoom.build_room().unwrap();
    let collected = profile(&room, ProfilePolicyV1::default());
    let mut sink = FirstChain {
        first: None,
        seen: 0,
    };
    let stats = RoomProfileFilter::new(&room, ProfilePolicyV1::default())
        .unwrap()
        .generate_into(&mut sink)
        .unwrap();
    assert_eq!(stats, collected.stats);
    assert_eq!(sink.seen, collected.chains.len() as u64);
    assert_eq!(sink.first.as_deref(), Some("3-2,bi0,i0,o0"));
}
