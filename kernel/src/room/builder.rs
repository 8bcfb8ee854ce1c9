//! Validating room builder.
//!
//! The carrier stores assert their invariants and panic on violation. The
//! builder checks the same invariants up front and reports a
//! [`RoomBuildError`] instead, so rooms assembled from external data never
//! reach a store assertion.

use std::collections::BTreeSet;

use crate::carrier::box_swap::BoxSwapNormal;
use crate::carrier::state_list::{
    symmetric_difference_len, FieldPos, StateId, StateList, StateListNormal,
};
use crate::carrier::variant::{
    PortalIndex, VariantData, VariantId, VariantList, VariantListNormal,
    VariantStateDictNormal, MAX_PORTALS,
};
use crate::room::error::{PortalSide, RoomBuildError};
use crate::room::model::{IncomingPortal, PortalLink, Room, DEFAULT_END_STATE};

/// Assembles a [`Room`] from explicit states, swaps and variants.
#[derive(Debug)]
pub struct RoomBuilder {
    room_index: u32,
    field_posis: BTreeSet<FieldPos>,
    goal_posis: BTreeSet<FieldPos>,
    states: StateListNormal,
    variants: VariantListNormal,
    start_variant_count: u64,
    incoming: Vec<IncomingPortal>,
    outgoing: Vec<PortalLink>,
    start_state: StateId,
    end_state: StateId,
}

impl RoomBuilder {
    /// Start a room with its fields, goals and portal lists.
    ///
    /// # Errors
    ///
    /// Returns [`RoomBuildError`] if a field position repeats, a goal lies
    /// outside the room, a portal list is longer than 63 entries, or a
    /// portal does not cross the room boundary (incoming: outside to inside,
    /// outgoing: inside to outside).
    pub fn new(
        room_index: u32,
        field_posis: &[FieldPos],
        goal_posis: &[FieldPos],
        incoming: &[PortalLink],
        outgoing: &[PortalLink],
    ) -> Result<Self, RoomBuildError> {
        let mut fields = BTreeSet::new();
        for &pos in field_posis {
            if !fields.insert(pos) {
                return Err(RoomBuildError::DuplicateFieldPosition { pos });
            }
        }
        let goals: BTreeSet<FieldPos> = goal_posis.iter().copied().collect();
        if let Some(&pos) = goals.iter().find(|pos| !fields.contains(pos)) {
            return Err(RoomBuildError::GoalOutsideRoom { pos });
        }

        for (side, links) in [
            (PortalSide::Incoming, incoming),
            (PortalSide::Outgoing, outgoing),
        ] {
            if links.len() > MAX_PORTALS {
                return Err(RoomBuildError::TooManyPortals {
                    side,
                    count: links.len(),
                });
            }
            for (index, link) in (0..).zip(links) {
                let crosses = match side {
                    PortalSide::Incoming => {
                        !fields.contains(&link.from) && fields.contains(&link.to)
                    }
                    PortalSide::Outgoing => {
                        fields.contains(&link.from) && !fields.contains(&link.to)
                    }
                };
                if !crosses {
                    return Err(RoomBuildError::PortalNotOnBoundary { side, index });
                }
            }
        }

        let outgoing_count =
            u32::try_from(outgoing.len()).map_err(|_| RoomBuildError::TooManyPortals {
                side: PortalSide::Outgoing,
                count: outgoing.len(),
            })?;

        Ok(Self {
            room_index,
            states: StateListNormal::new(field_posis, goal_posis),
            variants: VariantListNormal::new(outgoing_count),
            start_variant_count: 0,
            incoming: incoming
                .iter()
                .map(|&link| IncomingPortal {
                    link,
                    box_swap: Box::new(BoxSwapNormal::new()),
                    variants: Box::new(VariantStateDictNormal::new()),
                })
                .collect(),
            outgoing: outgoing.to_vec(),
            field_posis: fields,
            goal_posis: goals,
            start_state: 0,
            end_state: DEFAULT_END_STATE,
        })
    }

    /// Whether `pos` is a field position of the room.
    #[must_use]
    pub fn is_field(&self, pos: FieldPos) -> bool {
        self.field_posis.contains(&pos)
    }

    /// Whether `pos` is a goal position of the room.
    #[must_use]
    pub fn is_goal(&self, pos: FieldPos) -> bool {
        self.goal_posis.contains(&pos)
    }

    /// Number of states catalogued so far.
    #[must_use]
    pub fn state_count(&self) -> u64 {
        self.states.count()
    }

    /// Handle of an already catalogued box set.
    #[must_use]
    pub fn find_state(&self, box_posis: &[FieldPos]) -> Option<StateId> {
        self.states.find(box_posis)
    }

    /// Catalogue a box set; an existing set returns its handle.
    ///
    /// # Errors
    ///
    /// Returns [`RoomBuildError`] for positions outside the room or repeated
    /// positions.
    pub fn add_state(&mut self, box_posis: &[FieldPos]) -> Result<StateId, RoomBuildError> {
        let mut seen = BTreeSet::new();
        for &pos in box_posis {
            if !self.field_posis.contains(&pos) {
                return Err(RoomBuildError::PositionOutsideRoom { pos });
            }
            if !seen.insert(pos) {
                return Err(RoomBuildError::DuplicateBoxPosition { pos });
            }
        }
        Ok(self.states.add(box_posis))
    }

    /// Register the swap `pre -> post` on incoming portal `portal`.
    ///
    /// # Errors
    ///
    /// Returns [`RoomBuildError`] if the portal or a state is out of range,
    /// the edge does not add exactly one box, or the portal already has an
    /// edge for `pre`.
    pub fn add_box_swap(
        &mut self,
        portal: PortalIndex,
        pre: StateId,
        post: StateId,
    ) -> Result<(), RoomBuildError> {
        self.check_state(pre)?;
        self.check_state(post)?;
        let target = self.incoming_mut(portal)?;
        if target.box_swap.get(pre) != pre {
            return Err(RoomBuildError::SwapAlreadyRegistered { portal, pre });
        }

        let pre_boxes = self.states.get(pre);
        let post_boxes = self.states.get(post);
        let invalid = |detail: &str| RoomBuildError::InvalidSwap {
            portal,
            pre,
            post,
            detail: detail.to_string(),
        };
        if pre_boxes.len() + 1 != post_boxes.len() {
            return Err(invalid("box count must grow by exactly one"));
        }
        if symmetric_difference_len(pre_boxes, post_boxes) != 1 {
            return Err(invalid("states must differ in exactly one position"));
        }

        let states = &self.states;
        self.incoming[portal as usize].box_swap.add(states, pre, post);
        Ok(())
    }

    /// Append a start variant (player already inside the room).
    ///
    /// Start variants are not reachable through any incoming portal and must
    /// be added before every other variant.
    ///
    /// # Errors
    ///
    /// Returns [`RoomBuildError`] if regular variants exist already or the
    /// data references unknown states or portals.
    pub fn add_start_variant(&mut self, data: VariantData) -> Result<VariantId, RoomBuildError> {
        if self.variants.count() != self.start_variant_count {
            return Err(RoomBuildError::StartVariantAfterVariants);
        }
        self.check_variant(&data)?;
        let id = self.variants.add(&self.states, data);
        self.start_variant_count += 1;
        Ok(id)
    }

    /// Append a variant entered through incoming portal `portal`.
    ///
    /// # Errors
    ///
    /// Returns [`RoomBuildError`] if the portal, a state, or an outgoing
    /// portal referenced by the data is out of range.
    pub fn add_variant(
        &mut self,
        portal: PortalIndex,
        data: VariantData,
    ) -> Result<VariantId, RoomBuildError> {
        self.incoming_mut(portal)?;
        self.check_variant(&data)?;
        let state = data.old_state;
        let id = self.variants.add(&self.states, data);
        let states = &self.states;
        let variants = &self.variants;
        self.incoming[portal as usize]
            .variants
            .add(states, variants, state, id);
        Ok(id)
    }

    /// Set the start state (default: handle 0).
    #[must_use]
    pub fn start_state(mut self, state: StateId) -> Self {
        self.start_state = state;
        self
    }

    /// Set the end state (default: [`DEFAULT_END_STATE`]).
    #[must_use]
    pub fn end_state(mut self, state: StateId) -> Self {
        self.end_state = state;
        self
    }

    /// Freeze the room.
    ///
    /// # Errors
    ///
    /// Returns [`RoomBuildError::NoStates`] for an empty catalog and
    /// [`RoomBuildError::StateOutOfRange`] for a dangling start or end state.
    pub fn build(self) -> Result<Room, RoomBuildError> {
        if self.states.count() == 0 {
            return Err(RoomBuildError::NoStates);
        }
        self.check_state(self.start_state)?;
        self.check_state(self.end_state)?;
        Ok(Room {
            room_index: self.room_index,
            field_posis: self.field_posis.into_iter().collect(),
            goal_posis: self.goal_posis.into_iter().collect(),
            state_list: Box::new(self.states),
            start_state: self.start_state,
            end_state: self.end_state,
            variant_list: Box::new(self.variants),
            start_variant_count: self.start_variant_count,
            incoming: self.incoming,
            outgoing: self.outgoing,
        })
    }

    fn check_state(&self, state: StateId) -> Result<(), RoomBuildError> {
        let count = self.states.count();
        if state >= count {
            return Err(RoomBuildError::StateOutOfRange { state, count });
        }
        Ok(())
    }

    fn check_variant(&self, data: &VariantData) -> Result<(), RoomBuildError> {
        self.check_state(data.old_state)?;
        self.check_state(data.new_state)?;
        let outgoing = self.outgoing.len();
        for &index in data.box_portals.iter().chain(data.player_portal.iter()) {
            if index as usize >= outgoing {
                return Err(RoomBuildError::PortalOutOfRange {
                    side: PortalSide::Outgoing,
                    index,
                });
            }
        }
        Ok(())
    }

    fn incoming_mut(&mut self, portal: PortalIndex) -> Result<&mut IncomingPortal, RoomBuildError> {
        self.incoming
            .get_mut(portal as usize)
            .ok_or(RoomBuildError::PortalOutOfRange {
                side: PortalSide::Incoming,
                index: portal,
            })
    }
}
