//! Player Identity
//!
//! Numeric player slots are small integers the engine hands out again as
//! soon as a connection ends. A [`StableId`] is assigned per connection and
//! is never handed out twice, so it is the only key that can be carried
//! across a deferred timer firing.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Highest player slot the server can hold (slots are 1-based).
pub const MAX_PLAYERS: u8 = 64;

/// Engine player slot (1..=[`MAX_PLAYERS`]). Reused across connections.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Slot(u8);

impl Slot {
    /// Create a slot, rejecting 0 and anything above [`MAX_PLAYERS`].
    pub fn new(index: u8) -> Result<Self, IdentityError> {
        if index == 0 || index > MAX_PLAYERS {
            return Err(IdentityError::SlotOutOfRange(index));
        }
        Ok(Self(index))
    }

    /// Raw 1-based slot index.
    #[inline]
    pub fn index(self) -> u8 {
        self.0
    }

    /// Iterate every valid slot in ascending order.
    pub fn all() -> impl Iterator<Item = Slot> {
        (1..=MAX_PLAYERS).map(Slot)
    }
}

/// Connection-lifetime identity token.
///
/// Assigned from a monotonic counter at connect; a reconnect on the same
/// slot always receives a fresh value.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct StableId(pub u32);

impl std::fmt::Display for StableId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Identity errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IdentityError {
    /// Slot index outside 1..=MAX_PLAYERS.
    #[error("slot {0} is out of range")]
    SlotOutOfRange(u8),

    /// A connection already occupies the slot.
    #[error("slot {} is already occupied by {occupant}", .slot.index())]
    SlotOccupied {
        /// The requested slot.
        slot: Slot,
        /// Current occupant.
        occupant: StableId,
    },

    /// Nobody occupies the slot.
    #[error("slot {} is empty", .0.index())]
    SlotEmpty(Slot),
}

/// Slot ↔ stable id table.
#[derive(Clone, Debug)]
pub struct SlotTable {
    occupants: [Option<StableId>; MAX_PLAYERS as usize],
    next_id: u32,
}

impl Default for SlotTable {
    fn default() -> Self {
        Self::new()
    }
}

impl SlotTable {
    /// Create an empty table. The first connection receives id 1.
    pub fn new() -> Self {
        Self {
            occupants: [None; MAX_PLAYERS as usize],
            next_id: 1,
        }
    }

    /// Occupy a slot and hand out a fresh stable id.
    pub fn occupy(&mut self, slot: Slot) -> Result<StableId, IdentityError> {
        let entry = &mut self.occupants[Self::offset(slot)];
        if let Some(occupant) = *entry {
            return Err(IdentityError::SlotOccupied { slot, occupant });
        }

        let id = StableId(self.next_id);
        self.next_id = self.next_id.wrapping_add(1).max(1);
        *entry = Some(id);
        Ok(id)
    }

    /// Vacate a slot, returning the id that held it.
    pub fn vacate(&mut self, slot: Slot) -> Result<StableId, IdentityError> {
        self.occupants[Self::offset(slot)]
            .take()
            .ok_or(IdentityError::SlotEmpty(slot))
    }

    /// Current occupant of a slot.
    #[inline]
    pub fn occupant(&self, slot: Slot) -> Option<StableId> {
        self.occupants[Self::offset(slot)]
    }

    /// True if `id` is the current occupant of `slot`.
    #[inline]
    pub fn holds(&self, slot: Slot, id: StableId) -> bool {
        self.occupant(slot) == Some(id)
    }

    /// Number of occupied slots.
    pub fn len(&self) -> usize {
        self.occupants.iter().filter(|o| o.is_some()).count()
    }

    /// True if no slot is occupied.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    #[inline]
    fn offset(slot: Slot) -> usize {
        slot.0 as usize - 1
    }
}
