//! Room module: the immutable per-room input of a profile search.
//!
//! Depends on `carrier` for its stores. Rooms are built once, either from
//! explicit data ([`builder::RoomBuilder`]) or from a single board cell
//! ([`single_cell::build_single_cell`]), and are read-only afterwards.

pub mod builder;
pub mod error;
pub mod model;
pub mod single_cell;

pub use builder::RoomBuilder;
pub use error::{PortalSide, RoomBuildError};
pub use model::{IncomingPortal, PortalLink, Room, DEFAULT_END_STATE};
