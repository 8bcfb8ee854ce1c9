//! Rooms made of a single board cell.
//!
//! Every board starts out partitioned into one-cell rooms; larger rooms are
//! merged from these later. The geometry a one-cell room needs (dead
//! corners, which neighbours a box can be pushed from or to) is supplied
//! pre-evaluated as a [`CellContext`], so this module never reads a board.
//!
//! Incoming portal `i` and outgoing portal `i` must connect the cell with
//! the same neighbour.
//!
//! # States
//!
//! The end state is always handle 0:
//!
//! | cell          | handle 0  | handle 1                     | start |
//! |---------------|-----------|------------------------------|-------|
//! | floor         | empty     | box (unless a dead corner)   | 0     |
//! | goal          | box       | empty                        | 1     |
//! | box           | empty     | box                          | 1     |
//! | box on goal   | box       | empty (unless a dead corner) | 0     |

use crate::carrier::state_list::{FieldPos, StateId};
use crate::carrier::variant::{PortalIndex, VariantData};
use crate::room::builder::RoomBuilder;
use crate::room::error::RoomBuildError;
use crate::room::model::{PortalLink, Room};

/// Static content of a cell, without the player.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellKind {
    Floor,
    Goal,
    Box,
    BoxOnGoal,
}

impl CellKind {
    /// Decode a level character (`' '`, `'@'`, `'.'`, `'+'`, `'$'`, `'*'`).
    ///
    /// Returns the cell kind and whether the player stands on it.
    #[must_use]
    pub fn from_level_char(c: char) -> Option<(Self, bool)> {
        match c {
            ' ' => Some((Self::Floor, false)),
            '@' => Some((Self::Floor, true)),
            '.' => Some((Self::Goal, false)),
            '+' => Some((Self::Goal, true)),
            '$' => Some((Self::Box, false)),
            '*' => Some((Self::BoxOnGoal, false)),
            _ => None,
        }
    }

    #[must_use]
    pub fn is_goal(self) -> bool {
        matches!(self, Self::Goal | Self::BoxOnGoal)
    }
}

/// Board facts about an incoming portal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IncomingFacts {
    pub link: PortalLink,
    /// A box on `link.from` can be pushed into the cell: it does not stand
    /// in a dead corner and the player has room behind it.
    pub box_can_enter: bool,
}

/// Board facts about an outgoing portal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OutgoingFacts {
    pub link: PortalLink,
    /// `link.to` is a goal.
    pub target_goal: bool,
    /// A box pushed onto `link.to` is stuck there (dead corner, no goal).
    pub target_dead: bool,
    /// A box pushed one cell beyond `link.to` would be stuck there.
    pub beyond_dead: bool,
}

/// Everything needed to build a one-cell room.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CellContext {
    pub room_index: u32,
    pub pos: FieldPos,
    pub kind: CellKind,
    pub player: bool,
    /// The cell is a dead corner: a box on it can never leave.
    pub corner: bool,
    pub incoming: Vec<IncomingFacts>,
    pub outgoing: Vec<OutgoingFacts>,
}

/// Build the room of a single cell.
///
/// # Errors
///
/// Returns [`RoomBuildError::BoxOnDeadCell`] for a box (not on a goal) in a
/// dead corner, [`RoomBuildError::MismatchedPortals`] when the portal lists
/// do not pair up, [`RoomBuildError::AmbiguousBoxExit`] when a push through
/// one incoming portal could continue through two outgoing portals, and any
/// builder error for portals that do not touch the cell.
pub fn build_single_cell(ctx: &CellContext) -> Result<Room, RoomBuildError> {
    if ctx.incoming.len() != ctx.outgoing.len() {
        return Err(RoomBuildError::MismatchedPortals {
            incoming: ctx.incoming.len(),
            outgoing: ctx.outgoing.len(),
        });
    }
    if ctx.kind == CellKind::Box && ctx.corner {
        return Err(RoomBuildError::BoxOnDeadCell { pos: ctx.pos });
    }

    let cell = [ctx.pos];
    let goals: &[FieldPos] = if ctx.kind.is_goal() { &cell } else { &[] };
    let incoming: Vec<PortalLink> = ctx.incoming.iter().map(|f| f.link).collect();
    let outgoing: Vec<PortalLink> = ctx.outgoing.iter().map(|f| f.link).collect();
    let mut builder =
        RoomBuilder::new(ctx.room_index, &[ctx.pos], goals, &incoming, &outgoing)?;

    let box_allowed = ctx.kind.is_goal() || !ctx.corner;
    let (empty, boxed, start) = match ctx.kind {
        CellKind::Floor => {
            let empty = builder.add_state(&[])?;
            let boxed = if box_allowed {
                Some(builder.add_state(&cell)?)
            } else {
                None
            };
            (Some(empty), boxed, empty)
        }
        CellKind::Goal => {
            let boxed = builder.add_state(&cell)?;
            let empty = builder.add_state(&[])?;
            (Some(empty), Some(boxed), empty)
        }
        CellKind::Box => {
            let empty = builder.add_state(&[])?;
            let boxed = builder.add_state(&cell)?;
            (Some(empty), Some(boxed), boxed)
        }
        CellKind::BoxOnGoal => {
            let boxed = builder.add_state(&cell)?;
            let empty = if ctx.corner {
                None
            } else {
                Some(builder.add_state(&[])?)
            };
            (empty, Some(boxed), boxed)
        }
    };

    if ctx.player {
        for p in portal_range(ctx.incoming.len()) {
            builder.add_start_variant(VariantData {
                old_state: start,
                moves: 1,
                pushes: 0,
                box_portals: Vec::new(),
                player_portal: Some(p),
                new_state: start,
            })?;
        }
    }

    if let (Some(empty), Some(boxed)) = (empty, boxed) {
        for (i, facts) in portal_range(ctx.incoming.len()).zip(&ctx.incoming) {
            if facts.box_can_enter {
                builder.add_box_swap(i, empty, boxed)?;
            }
        }
    }

    for (i, facts) in portal_range(ctx.incoming.len()).zip(&ctx.incoming) {
        let box_exit = box_exit_portal(ctx, i, facts.link)?;
        let pushes_out: Vec<PortalIndex> = match box_exit {
            Some(b) if !ctx.corner => portal_range(ctx.outgoing.len())
                .filter(|&o| !(o == b && ctx.outgoing[o as usize].beyond_dead))
                .collect(),
            _ => Vec::new(),
        };
        let walks: Vec<PortalIndex> = portal_range(ctx.outgoing.len())
            .filter(|&o| o != i)
            .collect();

        let push_out = |builder: &mut RoomBuilder| -> Result<(), RoomBuildError> {
            if let (Some(empty), Some(boxed), Some(b)) = (empty, boxed, box_exit) {
                for &o in &pushes_out {
                    builder.add_variant(i, traversal(boxed, 1, 1, Some(b), Some(o), empty))?;
                }
            }
            Ok(())
        };

        if ctx.kind.is_goal() {
            push_out(&mut builder)?;
            if let Some(empty) = empty {
                for &o in &walks {
                    builder.add_variant(i, traversal(empty, 1, 0, None, Some(o), empty))?;
                }
            }
        } else {
            if let Some(empty) = empty {
                for &o in &walks {
                    builder.add_variant(i, traversal(empty, 1, 0, None, Some(o), empty))?;
                }
            }
            push_out(&mut builder)?;
            // Last push of the level: the box lands on a goal next door and
            // the player stays in the cell.
            if let (Some(empty), Some(boxed), Some(b)) = (empty, boxed, box_exit) {
                if ctx.outgoing[b as usize].target_goal {
                    builder.add_variant(i, traversal(boxed, 0, 1, Some(b), None, empty))?;
                }
            }
        }
    }

    builder.start_state(start).build()
}

/// The outgoing portal a box leaves through when pushed in via `link`.
fn box_exit_portal(
    ctx: &CellContext,
    incoming: PortalIndex,
    link: PortalLink,
) -> Result<Option<PortalIndex>, RoomBuildError> {
    let mut found = None;
    for (o, facts) in portal_range(ctx.outgoing.len()).zip(&ctx.outgoing) {
        if facts.link.delta() != link.delta() || facts.target_dead {
            continue;
        }
        if found.is_some() {
            return Err(RoomBuildError::AmbiguousBoxExit { portal: incoming });
        }
        found = Some(o);
    }
    Ok(found)
}

fn traversal(
    old_state: StateId,
    moves: u64,
    pushes: u64,
    box_portal: Option<PortalIndex>,
    player_portal: Option<PortalIndex>,
    new_state: StateId,
) -> VariantData {
    VariantData {
        old_state,
        moves,
        pushes,
        box_portals: box_portal.into_iter().collect(),
        player_portal,
        new_state,
    }
}

fn portal_range(count: usize) -> impl Iterator<Item = PortalIndex> + Clone {
    (0..count).filter_map(|i| PortalIndex::try_from(i).ok())
}
