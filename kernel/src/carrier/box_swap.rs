//! Box-swap index: state changes caused by pushing one box into a room.
//!
//! Each incoming portal owns one index. An entry `pre -> post` means that
//! while the room is in state `pre`, a box pushed in through the portal turns
//! it into state `post`, without any player traversal of the room.
//!
//! A lookup miss is not an error: [`BoxSwap::get`] returns the queried state
//! unchanged, which signals that the room cannot accept a box there.

use std::collections::BTreeMap;

use crate::carrier::state_list::{symmetric_difference_len, StateId, StateList};

/// Capability of a per-portal box-swap index.
pub trait BoxSwap {
    /// Number of registered swap edges.
    fn count(&self) -> u64;

    /// Register the edge `pre -> post`, validated against `states`.
    ///
    /// # Panics
    ///
    /// Implementations panic if either handle is out of range, if the two
    /// states are identical, if `post` does not hold exactly one box more
    /// than `pre`, if the two states differ in more than one position, or
    /// if an edge for `pre` already exists.
    fn add(&mut self, states: &dyn StateList, pre: StateId, post: StateId);

    /// The state after a box was pushed in, or `pre` itself if no edge exists.
    fn get(&self, pre: StateId) -> StateId;

    /// All pre-states that have a registered edge, ascending.
    fn keys(&self) -> Box<dyn Iterator<Item = StateId> + '_>;

    /// All `(pre, post)` edges, ascending by pre-state.
    fn iter(&self) -> Box<dyn Iterator<Item = (StateId, StateId)> + '_> {
        Box::new(self.keys().map(move |pre| (pre, self.get(pre))))
    }
}

/// In-memory box-swap index.
///
/// Uses a `BTreeMap` so that key enumeration is deterministic.
#[derive(Debug, Clone, Default)]
pub struct BoxSwapNormal {
    data: BTreeMap<StateId, StateId>,
}

impl BoxSwapNormal {
    /// Create an empty index.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl BoxSwap for BoxSwapNormal {
    fn count(&self) -> u64 {
        self.data.len() as u64
    }

    fn add(&mut self, states: &dyn StateList, pre: StateId, post: StateId) {
        let count = states.count();
        assert!(pre < count, "swap pre-state {pre} out of range (count {count})");
        assert!(post < count, "swap post-state {post} out of range (count {count})");
        assert_ne!(pre, post, "swap must change the room state");

        let pre_boxes = states.get(pre);
        let post_boxes = states.get(post);
        assert_eq!(
            pre_boxes.len() + 1,
            post_boxes.len(),
            "swap {pre} -> {post} must add exactly one box"
        );
        assert_eq!(
            symmetric_difference_len(pre_boxes, post_boxes),
            1,
            "swap {pre} -> {post} must differ in exactly one box position"
        );

        let previous = self.data.insert(pre, post);
        assert!(previous.is_none(), "swap edge for state {pre} registered twice");
    }

    fn get(&self, pre: StateId) -> StateId {
        self.data.get(&pre).copied().unwrap_or(pre)
    }

    fn keys(&self) -> Box<dyn Iterator<Item = StateId> + '_> {
        Box::new(self.data.keys().copied())
    }
}
