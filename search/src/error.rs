//! Typed profile-generation errors.
//!
//! `ProfileError` represents pre-flight failures only. Once the first stack
//! step is taken, generation either runs to exhaustion or panics on a broken
//! room invariant; there is no partial result.

/// Typed failure for pre-flight profile validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProfileError {
    /// The room starts with the player inside it (start variants present).
    /// Profiles for that case are not implemented.
    StartVariantsUnsupported {
        room_index: u32,
        start_variant_count: u64,
    },
    /// The policy failed validation.
    InvalidPolicy { detail: String },
}

impl std::fmt::Display for ProfileError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::StartVariantsUnsupported {
                room_index,
                start_variant_count,
            } => write!(
                f,
                "profile generation failed for room {room_index}: \
                 {start_variant_count} start variants are not supported"
            ),
            Self::InvalidPolicy { detail } => write!(f, "invalid profile policy: {detail}"),
        }
    }
}

impl std::error::Error for ProfileError {}
