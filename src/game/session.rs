//! Player Sessions
//!
//! Per-connection state: faction, class, skill lifecycle and the timer
//! handles the session owns.

use serde::{Deserialize, Serialize};

use crate::core::identity::{Slot, StableId};
use crate::core::timer::{TimerId, TimerService};
use crate::game::class::ClassId;

// =============================================================================
// FACTION
// =============================================================================

/// Which side a player is on.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Faction {
    /// Regular human.
    #[default]
    Human,
    /// Human-side special variant.
    Survivor,
    /// Regular infected.
    Infected,
    /// Elite infected (nemesis). Counts as infected.
    Elite,
}

impl Faction {
    /// True for both infected variants.
    #[inline]
    pub fn is_infected(self) -> bool {
        matches!(self, Faction::Infected | Faction::Elite)
    }
}

// =============================================================================
// TIMER SLOT
// =============================================================================

/// A timer handle owned by exactly one session field.
///
/// The handle leaves the field before the timer is cancelled, and the old
/// timer is cancelled before a replacement is scheduled.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TimerSlot(Option<TimerId>);

impl TimerSlot {
    /// Cancel the current timer (if any) and store a new one.
    pub fn replace<T, F>(&mut self, timers: &mut T, schedule: F) -> TimerId
    where
        T: TimerService + ?Sized,
        F: FnOnce(&mut T) -> TimerId,
    {
        self.clear(timers);
        let id = schedule(timers);
        self.0 = Some(id);
        id
    }

    /// Cancel and forget the current timer. Returns true if one was live.
    pub fn clear<T: TimerService + ?Sized>(&mut self, timers: &mut T) -> bool {
        match self.0.take() {
            Some(id) => timers.cancel(id),
            None => false,
        }
    }

    /// Current handle.
    #[inline]
    pub fn get(&self) -> Option<TimerId> {
        self.0
    }

    /// True if this slot owns `id`.
    #[inline]
    pub fn holds(&self, id: TimerId) -> bool {
        self.0 == Some(id)
    }
}

// =============================================================================
// SKILL STATE
// =============================================================================

/// Skill lifecycle. Each non-idle phase owns the timer that ends it.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SkillState {
    /// Ready (or never used).
    #[default]
    Idle,
    /// Active window open; `timer` is the one-shot that closes it.
    Active {
        /// Duration timer.
        timer: TimerId,
    },
    /// Cooling down; `timer` ticks once per second.
    Cooldown {
        /// Whole seconds left, always > 0.
        remaining: u32,
        /// Countdown timer.
        timer: TimerId,
    },
}

impl SkillState {
    /// Timer owned by the current phase.
    #[inline]
    pub fn timer(&self) -> Option<TimerId> {
        match *self {
            SkillState::Idle => None,
            SkillState::Active { timer } | SkillState::Cooldown { timer, .. } => Some(timer),
        }
    }
}

// =============================================================================
// PLAYER SESSION
// =============================================================================

/// State of one connected player.
#[derive(Clone, Debug)]
pub struct PlayerSession {
    /// Connection-lifetime id.
    pub stable_id: StableId,
    /// Slot the connection occupies.
    pub slot: Slot,
    /// Current side.
    pub faction: Faction,
    /// Current class.
    pub class: ClassId,
    skill: SkillState,
    regen: TimerSlot,
}

impl PlayerSession {
    /// Fresh session: human, default class, no timers.
    pub fn new(stable_id: StableId, slot: Slot) -> Self {
        Self {
            stable_id,
            slot,
            faction: Faction::Human,
            class: ClassId::default(),
            skill: SkillState::Idle,
            regen: TimerSlot::default(),
        }
    }

    /// True for both infected variants.
    #[inline]
    pub fn is_infected(&self) -> bool {
        self.faction.is_infected()
    }

    /// True for the elite infected variant.
    #[inline]
    pub fn is_elite(&self) -> bool {
        self.faction == Faction::Elite
    }

    /// True for the survivor variant.
    #[inline]
    pub fn is_survivor(&self) -> bool {
        self.faction == Faction::Survivor
    }

    /// Regeneration applies to plain infected only.
    #[inline]
    pub fn regen_eligible(&self) -> bool {
        self.faction == Faction::Infected
    }

    /// Current skill phase.
    #[inline]
    pub fn skill(&self) -> SkillState {
        self.skill
    }

    /// True while the active window is open.
    pub fn is_skill_active(&self) -> bool {
        matches!(self.skill, SkillState::Active { .. })
    }

    /// Seconds of cooldown left (0 = ready).
    pub fn cooldown_remaining(&self) -> u32 {
        match self.skill {
            SkillState::Cooldown { remaining, .. } => remaining,
            _ => 0,
        }
    }

    /// Live duration timer, if active.
    pub fn duration_timer(&self) -> Option<TimerId> {
        match self.skill {
            SkillState::Active { timer } => Some(timer),
            _ => None,
        }
    }

    /// Live countdown timer, if cooling down.
    pub fn countdown_timer(&self) -> Option<TimerId> {
        match self.skill {
            SkillState::Cooldown { timer, .. } => Some(timer),
            _ => None,
        }
    }

    /// Live regeneration timer.
    #[inline]
    pub fn regen_timer(&self) -> Option<TimerId> {
        self.regen.get()
    }

    /// Leave the current skill phase, cancelling its timer, then enter the
    /// phase built by `next`.
    pub fn replace_skill<T, F>(&mut self, timers: &mut T, next: F) -> SkillState
    where
        T: TimerService + ?Sized,
        F: FnOnce(&mut T) -> SkillState,
    {
        let old = std::mem::take(&mut self.skill);
        if let Some(timer) = old.timer() {
            timers.cancel(timer);
        }
        self.skill = next(timers);
        self.skill
    }

    /// Return to idle, cancelling the phase timer.
    pub fn reset_skill<T: TimerService + ?Sized>(&mut self, timers: &mut T) {
        self.replace_skill(timers, |_| SkillState::Idle);
    }

    /// Set the countdown value while keeping the current timer.
    ///
    /// Only meaningful in [`SkillState::Cooldown`]; a value of 0 is not
    /// stored (the caller moves to idle instead).
    pub(crate) fn set_cooldown_remaining(&mut self, value: u32) {
        if let SkillState::Cooldown { remaining, .. } = &mut self.skill {
            if value > 0 {
                *remaining = value;
            }
        }
    }

    /// Regeneration timer slot.
    #[inline]
    pub(crate) fn regen_slot(&mut self) -> &mut TimerSlot {
        &mut self.regen
    }

    /// Cancel every timer the session owns.
    pub fn cancel_all<T: TimerService + ?Sized>(&mut self, timers: &mut T) {
        self.regen.clear(timers);
        self.reset_skill(timers);
    }
}
