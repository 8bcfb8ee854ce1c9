//! Room profile search: iterative depth-first walk over room-state chains.
//!
//! The walk starts at the room's start state with the player outside. At
//! every node where the player is outside, each incoming portal offers its
//! box swap and every variant registered for the current state. All
//! admitted candidates become one sibling chain pushed as a new stack level.
//! A node without candidates is replaced by its next sibling; an exhausted
//! level (empty slot) is popped and its parent advanced the same way.
//!
//! Whenever the top node is in the room's end state, the root-to-top path is
//! emitted as a chain and the walk continues below it.

use sokowahn_kernel::proof::checksum_table::{ChecksumTable, ChecksumTableNormal};
use sokowahn_kernel::room::Room;
use tracing::{debug, info, trace};

use crate::error::ProfileError;
use crate::node::{MoveArena, MoveId, MoveStep, ProfileMove};
use crate::policy::{DedupModeV1, ProfilePolicyV1};
use crate::profile::{ProfileChainV1, ProfileStatsV1, ProfileStepV1, ProfileV1};
use crate::sink::ChainSink;

/// Checksum-table value for "situation never reached". A path cost of
/// `u64::MAX` is therefore refused while deduplicating.
const NOT_VISITED: u64 = u64::MAX;

/// Profile generator for one room.
#[derive(Debug)]
pub struct RoomProfileFilter<'r> {
    room: &'r Room,
    policy: ProfilePolicyV1,
}

impl<'r> RoomProfileFilter<'r> {
    /// Bind a room and a policy.
    ///
    /// # Errors
    ///
    /// Returns [`ProfileError::InvalidPolicy`] if the policy does not validate.
    pub fn new(room: &'r Room, policy: ProfilePolicyV1) -> Result<Self, ProfileError> {
        policy.validate()?;
        Ok(Self { room, policy })
    }

    #[must_use]
    pub fn room(&self) -> &'r Room {
        self.room
    }

    #[must_use]
    pub fn policy(&self) -> &ProfilePolicyV1 {
        &self.policy
    }

    /// Run the search and collect the profile.
    ///
    /// Chains are kept when `policy.record_chains` is set.
    ///
    /// # Errors
    ///
    /// Returns [`ProfileError::StartVariantsUnsupported`] before any step if
    /// the room has start variants.
    ///
    /// # Panics
    ///
    /// Panics if the room's stores are inconsistent (dangling handles), if a
    /// path cost overflows `u64`, or if a path reaches cost `u64::MAX` under
    /// [`DedupModeV1::VisitedCost`].
    pub fn generate_profiles(&self) -> Result<ProfileV1, ProfileError> {
        let mut chains: Vec<ProfileChainV1> = Vec::new();
        let stats = if self.policy.record_chains {
            self.generate_into(&mut chains)?
        } else {
            self.generate_into(&mut |_: &ProfileChainV1| {})?
        };
        Ok(ProfileV1 {
            room_index: self.room.room_index(),
            start_state: self.room.start_state(),
            end_state: self.room.end_state(),
            policy: self.policy.clone(),
            chains,
            stats,
        })
    }

    /// Run the search, handing each finished chain to `sink`.
    ///
    /// # Errors
    ///
    /// Returns [`ProfileError::StartVariantsUnsupported`] before any step if
    /// the room has start variants.
    ///
    /// # Panics
    ///
    /// Panics if the room's stores are inconsistent (dangling handles), if a
    /// path cost overflows `u64`, or if a path reaches cost `u64::MAX` under
    /// [`DedupModeV1::VisitedCost`].
    pub fn generate_into(&self, sink: &mut dyn ChainSink) -> Result<ProfileStatsV1, ProfileError> {
        let room = self.room;
        if room.start_variant_count() > 0 {
            return Err(ProfileError::StartVariantsUnsupported {
                room_index: room.room_index(),
                start_variant_count: room.start_variant_count(),
            });
        }

        info!(
            room_index = room.room_index(),
            fields = room.field_posis().len(),
            states = room.state_list().count(),
            variants = room.variant_list().count(),
            incoming = room.incoming_portals().len(),
            outgoing = room.outgoing_portals().len(),
            dedup = self.policy.dedup.as_str(),
            "profile generation started"
        );

        let mut walk = ProfileWalk::new(room, &self.policy);
        walk.run(sink);
        let stats = walk.stats;

        info!(
            room_index = room.room_index(),
            steps = stats.steps,
            chains = stats.chains_emitted,
            moves_created = stats.moves_created,
            repeats_suppressed = stats.repeats_suppressed,
            dedup_suppressed = stats.dedup_suppressed,
            stack_high_water = stats.stack_high_water,
            "profile generation finished"
        );
        Ok(stats)
    }
}

/// Working memory of one search pass.
struct ProfileWalk<'a> {
    room: &'a Room,
    policy: &'a ProfilePolicyV1,
    arena: MoveArena,
    /// `None` marks an exhausted level awaiting its pop.
    stack: Vec<Option<MoveId>>,
    visited: Option<ChecksumTableNormal>,
    stats: ProfileStatsV1,
}

impl<'a> ProfileWalk<'a> {
    fn new(room: &'a Room, policy: &'a ProfilePolicyV1) -> Self {
        let root = ProfileMove::start(
            room.start_state(),
            room.incoming_portals().len(),
            room.outgoing_portals().len(),
        );
        let visited = match policy.dedup {
            DedupModeV1::None => None,
            DedupModeV1::VisitedCost => {
                let mut table = ChecksumTableNormal::new();
                table.add(root.situation_key(), root.moves);
                Some(table)
            }
        };
        let mut arena = MoveArena::new();
        let root = arena.alloc(root);
        Self {
            room,
            policy,
            arena,
            stack: vec![Some(root)],
            visited,
            stats: ProfileStatsV1 {
                moves_created: 1,
                stack_high_water: 1,
                ..ProfileStatsV1::default()
            },
        }
    }

    fn run(&mut self, sink: &mut dyn ChainSink) {
        while let Some(&slot) = self.stack.last() {
            self.stats.steps += 1;
            let Some(top) = slot else {
                self.stack.pop();
                self.advance_top();
                continue;
            };

            let current = self.arena.get(top).clone();
            trace!(
                depth = self.stack.len(),
                state = current.state,
                moves = current.moves,
                pushes = current.pushes,
                "visit"
            );

            if current.state == self.room.end_state() {
                let chain = self.chain();
                self.stats.chains_emitted += 1;
                debug!(
                    path = %chain.path_code(),
                    len = chain.len(),
                    "chain emitted"
                );
                sink.accept(&chain);
            }

            let candidates = if current.player_outside() {
                self.expand(&current)
            } else {
                Vec::new()
            };

            if let Some(&head) = candidates.first() {
                for pair in candidates.windows(2) {
                    self.arena.get_mut(pair[0]).next = Some(pair[1]);
                }
                self.stack.push(Some(head));
                let depth = self.stack.len() as u64;
                self.stats.stack_high_water = self.stats.stack_high_water.max(depth);
            } else {
                self.advance_top();
            }
        }
        debug_assert_eq!(self.arena.live(), 0, "every move is released by the end");
    }

    /// Candidates from `current`, in portal order: box swap first, then the
    /// variants registered for the state.
    fn expand(&mut self, current: &ProfileMove) -> Vec<MoveId> {
        let room = self.room;
        let mut admitted = Vec::new();
        for (portal, incoming) in (0..).zip(room.incoming_portals()) {
            let swapped = incoming.box_swap.get(current.state);
            if swapped != current.state {
                self.stats.swap_candidates += 1;
                if let Some(id) = self.admit(current.after_swap(portal, swapped)) {
                    admitted.push(id);
                }
            }
            for &variant in incoming.variants.get(current.state) {
                let data = room.variant_list().get(variant);
                self.stats.variant_candidates += 1;
                if let Some(id) = self.admit(current.after_variant(variant, portal, data)) {
                    admitted.push(id);
                }
            }
        }
        admitted
    }

    /// Apply the path-repeat guard and deduplication; store survivors.
    fn admit(&mut self, candidate: ProfileMove) -> Option<MoveId> {
        let fingerprint = candidate.fingerprint();
        let repeats = self
            .stack
            .iter()
            .flatten()
            .filter(|&&id| self.arena.get(id).fingerprint() == fingerprint)
            .count();
        if repeats >= self.policy.max_path_repeats as usize {
            self.stats.repeats_suppressed += 1;
            debug!(state = candidate.state, repeats, "candidate repeats on path");
            return None;
        }

        if let Some(table) = self.visited.as_mut() {
            assert!(
                candidate.moves != NOT_VISITED,
                "path cost u64::MAX is reserved while deduplicating"
            );
            let key = candidate.situation_key();
            let best = table.get(key, NOT_VISITED);
            if best == NOT_VISITED {
                table.add(key, candidate.moves);
            } else if candidate.moves < best {
                table.update(key, candidate.moves);
            } else {
                self.stats.dedup_suppressed += 1;
                debug!(
                    state = candidate.state,
                    moves = candidate.moves,
                    best,
                    "candidate reaches a known situation"
                );
                return None;
            }
        }

        self.stats.moves_created += 1;
        Some(self.arena.alloc(candidate))
    }

    /// Replace the top slot with its next sibling, releasing the old move.
    fn advance_top(&mut self) {
        if let Some(slot) = self.stack.last_mut() {
            if let Some(id) = *slot {
                *slot = self.arena.release(id);
            }
        }
    }

    /// The root-to-top path as a chain. Every slot is occupied here.
    fn chain(&self) -> ProfileChainV1 {
        let path: Vec<&ProfileMove> = self
            .stack
            .iter()
            .flatten()
            .map(|&id| self.arena.get(id))
            .collect();
        let (root, last) = (path[0], path[path.len() - 1]);
        let steps = path[1..]
            .iter()
            .map(|mv| match mv.step {
                MoveStep::BoxSwap { portal } => ProfileStepV1::BoxSwap {
                    portal,
                    state: mv.state,
                },
                MoveStep::Variant {
                    variant,
                    incoming,
                    outgoing,
                } => ProfileStepV1::Variant {
                    variant,
                    incoming,
                    outgoing,
                    box_portals: self.room.variant_list().get(variant).box_portals.clone(),
                    state: mv.state,
                },
                MoveStep::Start => unreachable!("start move above the stack root"),
            })
            .collect();
        ProfileChainV1 {
            start_state: root.state,
            end_state: last.state,
            moves: last.moves,
            pushes: last.pushes,
            imported: last.imported.clone(),
            exported: last.exported.clone(),
            steps,
        }
    }
}
