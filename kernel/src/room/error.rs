//! Typed room construction errors.
//!
//! Builders validate their input and return these before any store is
//! touched. The stores themselves still assert their invariants, so a
//! `RoomBuildError` is the recoverable face of the same checks.

use crate::carrier::state_list::{FieldPos, StateId};
use crate::carrier::variant::PortalIndex;

/// Which portal list a portal error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PortalSide {
    Incoming,
    Outgoing,
}

impl std::fmt::Display for PortalSide {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Incoming => write!(f, "incoming"),
            Self::Outgoing => write!(f, "outgoing"),
        }
    }
}

/// Typed failure for room construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RoomBuildError {
    /// A field position was listed twice.
    DuplicateFieldPosition { pos: FieldPos },
    /// A goal position is not one of the room's field positions.
    GoalOutsideRoom { pos: FieldPos },
    /// More portals than fit the box-crossing bitmask.
    TooManyPortals { side: PortalSide, count: usize },
    /// A portal does not cross the room boundary in the expected direction.
    PortalNotOnBoundary { side: PortalSide, index: PortalIndex },
    /// A portal index is out of range.
    PortalOutOfRange { side: PortalSide, index: PortalIndex },
    /// A state uses a position outside the room.
    PositionOutsideRoom { pos: FieldPos },
    /// A state lists the same position twice.
    DuplicateBoxPosition { pos: FieldPos },
    /// A state handle is not catalogued.
    StateOutOfRange { state: StateId, count: u64 },
    /// A box-swap edge breaks the one-box-in rule.
    InvalidSwap {
        portal: PortalIndex,
        pre: StateId,
        post: StateId,
        detail: String,
    },
    /// A second swap edge for the same portal and pre-state.
    SwapAlreadyRegistered { portal: PortalIndex, pre: StateId },
    /// A start variant was added after regular variants.
    StartVariantAfterVariants,
    /// The room has no states.
    NoStates,
    /// A box stands on a cell it can never leave.
    BoxOnDeadCell { pos: FieldPos },
    /// More than one outgoing portal continues an incoming push.
    AmbiguousBoxExit { portal: PortalIndex },
    /// Paired portal lists have different lengths.
    MismatchedPortals { incoming: usize, outgoing: usize },
}

impl std::fmt::Display for RoomBuildError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DuplicateFieldPosition { pos } => {
                write!(f, "field position {pos} listed twice")
            }
            Self::GoalOutsideRoom { pos } => write!(f, "goal position {pos} is not in the room"),
            Self::TooManyPortals { side, count } => {
                write!(f, "{count} {side} portals exceed the limit of 63")
            }
            Self::PortalNotOnBoundary { side, index } => {
                write!(f, "{side} portal {index} does not cross the room boundary")
            }
            Self::PortalOutOfRange { side, index } => {
                write!(f, "{side} portal {index} out of range")
            }
            Self::PositionOutsideRoom { pos } => {
                write!(f, "box position {pos} is outside the room")
            }
            Self::DuplicateBoxPosition { pos } => write!(f, "box position {pos} listed twice"),
            Self::StateOutOfRange { state, count } => {
                write!(f, "state {state} out of range (count {count})")
            }
            Self::InvalidSwap {
                portal,
                pre,
                post,
                detail,
            } => write!(f, "invalid swap {pre} -> {post} on portal {portal}: {detail}"),
            Self::SwapAlreadyRegistered { portal, pre } => {
                write!(f, "portal {portal} already has a swap for state {pre}")
            }
            Self::StartVariantAfterVariants => {
                write!(f, "start variants must precede all other variants")
            }
            Self::NoStates => write!(f, "room has no states"),
            Self::BoxOnDeadCell { pos } => write!(f, "box on position {pos} can never be moved"),
            Self::AmbiguousBoxExit { portal } => {
                write!(f, "incoming portal {portal} continues through several outgoing portals")
            }
            Self::MismatchedPortals { incoming, outgoing } => write!(
                f,
                "{incoming} incoming portals do not pair with {outgoing} outgoing portals"
            ),
        }
    }
}

impl std::error::Error for RoomBuildError {}
