//! Session Roster
//!
//! Owns every [`PlayerSession`], keyed by [`StableId`], plus the slot table
//! used to convert inbound engine slots. [`Roster::resolve`] is the guard
//! every deferred callback passes through before touching a session.

use std::collections::BTreeMap;

use crate::core::identity::{IdentityError, Slot, SlotTable, StableId};
use crate::game::session::PlayerSession;

/// Result of resolving a stable id.
#[derive(Debug)]
#[must_use]
pub enum Resolved<'a> {
    /// The connection is still live.
    Live(&'a mut PlayerSession),
    /// The connection ended or its slot now belongs to someone else.
    Stale,
}

impl<'a> Resolved<'a> {
    /// Convert into an `Option`.
    pub fn live(self) -> Option<&'a mut PlayerSession> {
        match self {
            Resolved::Live(session) => Some(session),
            Resolved::Stale => None,
        }
    }

    /// True for [`Resolved::Stale`].
    pub fn is_stale(&self) -> bool {
        matches!(self, Resolved::Stale)
    }
}

/// All connected players.
#[derive(Debug, Default)]
pub struct Roster {
    slots: SlotTable,
    sessions: BTreeMap<StableId, PlayerSession>,
}

impl Roster {
    /// Create an empty roster.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a session for a new connection.
    pub fn connect(&mut self, slot: Slot) -> Result<StableId, IdentityError> {
        let id = self.slots.occupy(slot)?;
        self.sessions.insert(id, PlayerSession::new(id, slot));
        Ok(id)
    }

    /// Remove the session occupying `slot`.
    ///
    /// The caller must cancel the returned session's timers.
    pub fn disconnect(&mut self, slot: Slot) -> Result<PlayerSession, IdentityError> {
        let id = self.slots.vacate(slot)?;
        self.sessions.remove(&id).ok_or(IdentityError::SlotEmpty(slot))
    }

    /// Stable id currently behind an engine slot.
    #[inline]
    pub fn stable_id(&self, slot: Slot) -> Option<StableId> {
        self.slots.occupant(slot)
    }

    /// Look up the live session for `id`.
    ///
    /// Pure lookup: never creates or repairs a session.
    pub fn resolve(&mut self, id: StableId) -> Resolved<'_> {
        match self.sessions.get_mut(&id) {
            Some(session) if self.slots.holds(session.slot, id) => Resolved::Live(session),
            _ => Resolved::Stale,
        }
    }

    /// Read-only lookup.
    pub fn get(&self, id: StableId) -> Option<&PlayerSession> {
        self.sessions
            .get(&id)
            .filter(|s| self.slots.holds(s.slot, id))
    }

    /// All live sessions in id order.
    pub fn iter(&self) -> impl Iterator<Item = &PlayerSession> {
        self.sessions.values()
    }

    /// All live sessions, mutable.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut PlayerSession> {
        self.sessions.values_mut()
    }

    /// Number of connected players.
    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    /// True if nobody is connected.
    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}
