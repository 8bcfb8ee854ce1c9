//! Typed domain separators for content hashing.
//!
//! Every digest in the workspace is taken under exactly one [`HashDomain`].
//! Each domain is declared once below by its tag; the separator bytes
//! `SOKOWAHN::<TAG>::V1\0` are derived from the tag, so a new domain is a
//! one-line addition.

macro_rules! hash_domains {
    ($( $(#[$meta:meta])* $variant:ident = $tag:literal; )+) => {
        /// Domain separator prefixed to the input of
        /// [`super::hash::canonical_hash`].
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum HashDomain {
            $( $(#[$meta])* $variant, )+
        }

        impl HashDomain {
            /// Every domain, in declaration order.
            pub const ALL: &[HashDomain] = &[$( Self::$variant ),+];

            /// Short upper-case tag, e.g. `ROOM_PROFILE`.
            #[must_use]
            pub const fn tag(self) -> &'static str {
                match self {
                    $( Self::$variant => $tag, )+
                }
            }

            /// Separator bytes, null-terminated.
            #[must_use]
            pub const fn as_bytes(self) -> &'static [u8] {
                match self {
                    $( Self::$variant => concat!("SOKOWAHN::", $tag, "::V1\0").as_bytes(), )+
                }
            }
        }
    };
}

hash_domains! {
    /// Room summary: states, portals and variants of one room.
    RoomSummary = "ROOM_SUMMARY";
    /// Profile artifact of one room.
    RoomProfile = "ROOM_PROFILE";
    /// Profile policy snapshot.
    ProfilePolicy = "PROFILE_POLICY";
    /// Content of one bundle artifact.
    BundleArtifact = "BUNDLE_ARTIFACT";
    /// Bundle digest over the normative projection.
    BundleDigest = "BUNDLE_DIGEST";
}

impl std::fmt::Display for HashDomain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.tag())
    }
}
