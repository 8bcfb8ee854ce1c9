//! Profile moves (search nodes) and the arena that owns them.
//!
//! The search keeps an explicit stack of move handles. Each stack slot holds
//! the alternative currently explored at that depth; its remaining
//! alternatives hang off it through the `next` sibling link. Replacing a
//! slot with its sibling releases the old move back to the arena.

use sokowahn_kernel::carrier::state_list::StateId;
use sokowahn_kernel::carrier::variant::{PortalIndex, VariantData, VariantId};
use sokowahn_kernel::proof::fingerprint::Fingerprint;

/// Handle of a move inside a [`MoveArena`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MoveId(usize);

/// How a move was reached from its parent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveStep {
    /// The root of the search: the room's start state.
    Start,
    /// A box was pushed into the room through `portal`.
    BoxSwap { portal: PortalIndex },
    /// The player traversed the room.
    Variant {
        variant: VariantId,
        incoming: PortalIndex,
        /// `None`: the player stays inside (the level was finished).
        outgoing: Option<PortalIndex>,
    },
}

/// One search node: a room state plus the cost and portal traffic of the
/// path that reached it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileMove {
    pub state: StateId,
    pub moves: u64,
    pub pushes: u64,
    /// Boxes imported so far, per incoming portal.
    pub imported: Vec<u32>,
    /// Boxes exported so far, per outgoing portal.
    pub exported: Vec<u32>,
    pub step: MoveStep,
    /// Next alternative at the same depth.
    pub next: Option<MoveId>,
    fingerprint: u64,
}

impl ProfileMove {
    /// The root move.
    #[must_use]
    pub fn start(state: StateId, incoming_portals: usize, outgoing_portals: usize) -> Self {
        Self::with_step(
            state,
            0,
            0,
            vec![0; incoming_portals],
            vec![0; outgoing_portals],
            MoveStep::Start,
        )
    }

    /// The move after a box was pushed in through `portal`.
    ///
    /// Costs one move and one push.
    ///
    /// # Panics
    ///
    /// Panics if `portal` is not an incoming portal of the room, or if a
    /// cost overflows `u64`.
    #[must_use]
    pub fn after_swap(&self, portal: PortalIndex, new_state: StateId) -> Self {
        let mut imported = self.imported.clone();
        imported[portal as usize] += 1;
        Self::with_step(
            new_state,
            add_cost(self.moves, 1),
            add_cost(self.pushes, 1),
            imported,
            self.exported.clone(),
            MoveStep::BoxSwap { portal },
        )
    }

    /// The move after traversal `variant`, entered through `incoming`.
    ///
    /// # Panics
    ///
    /// Panics if a box exit portal is not an outgoing portal of the room, or
    /// if a cost overflows `u64`.
    #[must_use]
    pub fn after_variant(
        &self,
        variant: VariantId,
        incoming: PortalIndex,
        data: &VariantData,
    ) -> Self {
        let mut exported = self.exported.clone();
        for &portal in &data.box_portals {
            exported[portal as usize] += 1;
        }
        Self::with_step(
            data.new_state,
            add_cost(self.moves, data.moves),
            add_cost(self.pushes, data.pushes),
            self.imported.clone(),
            exported,
            MoveStep::Variant {
                variant,
                incoming,
                outgoing: data.player_portal,
            },
        )
    }

    fn with_step(
        state: StateId,
        moves: u64,
        pushes: u64,
        imported: Vec<u32>,
        exported: Vec<u32>,
        step: MoveStep,
    ) -> Self {
        let (incoming, outgoing, variant) = match step {
            MoveStep::Start | MoveStep::BoxSwap { .. } => (None, None, None),
            MoveStep::Variant {
                variant,
                incoming,
                outgoing,
            } => (Some(incoming), outgoing, Some(variant)),
        };
        let fingerprint = Fingerprint::start()
            .update_u64(state)
            .update_u32(incoming.unwrap_or(u32::MAX))
            .update_u32(outgoing.unwrap_or(u32::MAX))
            .update_u64(variant.unwrap_or(u64::MAX))
            .value();
        Self {
            state,
            moves,
            pushes,
            imported,
            exported,
            step,
            next: None,
            fingerprint,
        }
    }

    /// Identity of the move for the path-repeat guard.
    ///
    /// Covers the state and the traversal that produced it, not the costs:
    /// a box swap through any portal into the same state has the same
    /// fingerprint as the root in that state.
    #[must_use]
    pub fn fingerprint(&self) -> u64 {
        self.fingerprint
    }

    /// Whether the player is outside the room after this move, so that new
    /// boxes or traversals can follow.
    #[must_use]
    pub fn player_outside(&self) -> bool {
        match self.step {
            MoveStep::Start | MoveStep::BoxSwap { .. } => true,
            MoveStep::Variant { outgoing, .. } => outgoing.is_some(),
        }
    }

    /// Key of the room situation for cross-history deduplication.
    #[must_use]
    pub fn situation_key(&self) -> u64 {
        Fingerprint::start()
            .update_u64(self.state)
            .update_u32_slice(&self.imported)
            .update_u32_slice(&self.exported)
            .update_u32(u32::from(self.player_outside()))
            .value()
    }
}

fn add_cost(total: u64, step: u64) -> u64 {
    total
        .checked_add(step)
        .unwrap_or_else(|| panic!("path cost overflows u64 ({total} + {step})"))
}

/// Slot storage for profile moves with handle reuse.
#[derive(Debug, Default)]
pub struct MoveArena {
    slots: Vec<Option<ProfileMove>>,
    free: Vec<usize>,
}

impl MoveArena {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a move and return its handle. Released slots are reused first.
    pub fn alloc(&mut self, mv: ProfileMove) -> MoveId {
        if let Some(index) = self.free.pop() {
            self.slots[index] = Some(mv);
            MoveId(index)
        } else {
            self.slots.push(Some(mv));
            MoveId(self.slots.len() - 1)
        }
    }

    /// Drop a move and return its sibling link.
    ///
    /// # Panics
    ///
    /// Panics if `id` was already released.
    pub fn release(&mut self, id: MoveId) -> Option<MoveId> {
        let Some(mv) = self.slots[id.0].take() else {
            panic!("move {} released twice", id.0);
        };
        self.free.push(id.0);
        mv.next
    }

    /// # Panics
    ///
    /// Panics if `id` was released.
    #[must_use]
    pub fn get(&self, id: MoveId) -> &ProfileMove {
        match &self.slots[id.0] {
            Some(mv) => mv,
            None => panic!("move {} used after release", id.0),
        }
    }

    /// # Panics
    ///
    /// Panics if `id` was released.
    pub fn get_mut(&mut self, id: MoveId) -> &mut ProfileMove {
        match &mut self.slots[id.0] {
            Some(mv) => mv,
            None => panic!("move {} used after release", id.0),
        }
    }

    /// Number of moves currently held.
    #[must_use]
    pub fn live(&self) -> usize {
        self.slots.len() - self.free.len()
    }

    /// Number of slots ever allocated.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }
}
