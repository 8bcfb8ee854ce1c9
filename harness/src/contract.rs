//! Room world contract: the minimal trait a fixture room must implement.
//!
//! Worlds provide room data only. They may not run the profile search,
//! hash artifacts or assemble bundles; those are runner concerns.

use sokowahn_kernel::room::{Room, RoomBuildError};

/// A fixture room the runner can profile.
///
/// A world provides:
/// - A unique identifier
/// - A freshly built [`Room`]
///
/// Building must be deterministic: two calls produce rooms with identical
/// summaries.
pub trait RoomWorldV1 {
    /// Unique world identifier (e.g., `"cycle_room"`).
    fn world_id(&self) -> &str;

    /// Build the room.
    ///
    /// # Errors
    ///
    /// Returns [`RoomBuildError`] if the fixture data is inconsistent.
    fn build_room(&self) -> Result<Room, RoomBuildError>;
}
