//! State catalog: the deduplicated list of box configurations a room can take.
//!
//! A room state is an unordered set of box positions restricted to the room's
//! field positions. The catalog assigns each distinct set a dense handle
//! ([`StateId`]) in insertion order; handles are never reused or renumbered,
//! so `count()` is the watermark for the next handle.
//!
//! # Equality semantics
//!
//! Two box-position sets are the same state iff they contain the same
//! positions. Insertion order within a set is irrelevant: the catalog stores
//! every set sorted ascending, and [`StateList::get`] returns that canonical
//! order.

use std::collections::{BTreeSet, HashMap};

/// Dense handle of a room state (0-based, insertion order).
pub type StateId = u64;

/// A field position on the board (row-major cell index).
pub type FieldPos = u32;

/// Capability of a room-state catalog.
///
/// `StateListNormal` is the in-memory backing. The boundary is kept to
/// `count` / `add` / `get` so that compressed or disk-backed catalogs remain
/// a pure swap.
pub trait StateList {
    /// Number of distinct states held.
    fn count(&self) -> u64;

    /// Register a box-position set and return its handle.
    ///
    /// A set that is already catalogued returns its existing handle.
    ///
    /// # Panics
    ///
    /// Implementations panic if a position is not a room field position or
    /// if the set contains a duplicate position.
    fn add(&mut self, box_posis: &[FieldPos]) -> StateId;

    /// The box positions of `state`, sorted ascending.
    ///
    /// # Panics
    ///
    /// Implementations panic if `state >= count()`.
    fn get(&self, state: StateId) -> &[FieldPos];

    /// Number of boxes in `state`.
    fn box_count(&self, state: StateId) -> usize {
        self.get(state).len()
    }
}

impl dyn StateList + '_ {
    /// Enumerate `(handle, positions)` pairs of a type-erased catalog.
    #[must_use]
    pub fn states(&self) -> States<'_> {
        States::new(self)
    }
}

/// Lazy, restartable enumeration over a catalog in handle order.
#[derive(Clone)]
pub struct States<'a> {
    list: &'a dyn StateList,
    next: StateId,
}

impl<'a> States<'a> {
    /// Start a new enumeration at handle 0.
    #[must_use]
    pub fn new(list: &'a dyn StateList) -> Self {
        Self { list, next: 0 }
    }
}

impl<'a> Iterator for States<'a> {
    type Item = (StateId, &'a [FieldPos]);

    fn next(&mut self) -> Option<Self::Item> {
        if self.next >= self.list.count() {
            return None;
        }
        let id = self.next;
        self.next += 1;
        Some((id, self.list.get(id)))
    }
}

/// In-memory state catalog.
#[derive(Debug, Clone)]
pub struct StateListNormal {
    /// Field positions that belong to the room.
    field_posis: BTreeSet<FieldPos>,
    /// Goal positions inside the room.
    goal_posis: BTreeSet<FieldPos>,
    /// States indexed by handle, each sorted ascending.
    states: Vec<Box<[FieldPos]>>,
    /// Reverse index for deduplication.
    index: HashMap<Box<[FieldPos]>, StateId>,
}

impl StateListNormal {
    /// Create an empty catalog for a room.
    ///
    /// # Panics
    ///
    /// Panics if a goal position is not one of the field positions.
    #[must_use]
    pub fn new(field_posis: &[FieldPos], goal_posis: &[FieldPos]) -> Self {
        let field_posis: BTreeSet<FieldPos> = field_posis.iter().copied().collect();
        let goal_posis: BTreeSet<FieldPos> = goal_posis.iter().copied().collect();
        assert!(
            goal_posis.is_subset(&field_posis),
            "goal positions must be room field positions"
        );
        Self {
            field_posis,
            goal_posis,
            states: Vec::new(),
            index: HashMap::new(),
        }
    }

    /// Handle of an already catalogued set, if present.
    #[must_use]
    pub fn find(&self, box_posis: &[FieldPos]) -> Option<StateId> {
        let mut key = box_posis.to_vec();
        key.sort_unstable();
        self.index.get(key.as_slice()).copied()
    }

    /// Number of boxes of `state` that stand on goal positions.
    #[must_use]
    pub fn goal_box_count(&self, state: StateId) -> usize {
        self.get(state)
            .iter()
            .filter(|pos| self.goal_posis.contains(pos))
            .count()
    }

    /// Enumerate `(handle, positions)` pairs in handle order.
    #[must_use]
    pub fn states(&self) -> States<'_> {
        States::new(self)
    }
}

impl StateList for StateListNormal {
    fn count(&self) -> u64 {
        self.states.len() as u64
    }

    fn add(&mut self, box_posis: &[FieldPos]) -> StateId {
        let mut key = box_posis.to_vec();
        key.sort_unstable();
        assert!(
            key.windows(2).all(|w| w[0] != w[1]),
            "duplicate box position in state {box_posis:?}"
        );
        assert!(
            key.iter().all(|pos| self.field_posis.contains(pos)),
            "box position outside room in state {box_posis:?}"
        );

        let key = key.into_boxed_slice();
        if let Some(&existing) = self.index.get(&key) {
            return existing;
        }
        let id = self.states.len() as StateId;
        self.index.insert(key.clone(), id);
        self.states.push(key);
        id
    }

    fn get(&self, state: StateId) -> &[FieldPos] {
        let idx = usize::try_from(state).unwrap_or(usize::MAX);
        assert!(
            idx < self.states.len(),
            "state {state} out of range (count {})",
            self.states.len()
        );
        &self.states[idx]
    }
}

/// Number of positions present in exactly one of two sorted sets.
#[must_use]
pub fn symmetric_difference_len(a: &[FieldPos], b: &[FieldPos]) -> usize {
    let (mut i, mut j, mut diff) = (0, 0, 0);
    while i < a.len() && j < b.len() {
        match a[i].cmp(&b[j]) {
            std::cmp::Ordering::Less => {
                diff += 1;
                i += 1;
            }
            std::cmp::Ordering::Greater => {
                diff += 1;
                j += 1;
            }
            std::cmp::Ordering::Equal => {
                i += 1;
                j += 1;
            }
        }
    }
    diff + (a.len() - i) + (b.len() - j)
}
