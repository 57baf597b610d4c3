//! Mutator Events
//!
//! Record of what the core did during a frame, returned to the host for
//! logging and replay.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::core::identity::StableId;
use crate::core::timer::TimerKind;

/// Why an activation did not start the skill.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum BlockReason {
    /// Player is human, survivor or elite.
    NotInfected,
    /// Class has no skill.
    NoSkill,
    /// Skill active or cooling down.
    Busy,
    /// Pre-activation hook said no.
    Vetoed,
}

/// Event payload.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEventData {
    /// Player connected.
    Connected,

    /// Player disconnected; `timers` live timers were cancelled.
    Disconnected {
        timers: usize,
    },

    /// Skill active window opened.
    SkillStarted {
        duration: Duration,
    },

    /// Activation refused.
    SkillBlocked {
        reason: BlockReason,
    },

    /// Active window closed; `cooldown` seconds before the next use.
    SkillEnded {
        cooldown: u32,
    },

    /// Cooldown finished.
    SkillReady,

    /// Health restored while stationary.
    HealthRegenerated {
        from: u32,
        to: u32,
    },

    /// Timer fired for an identity that is no longer live.
    StaleTimerDropped {
        kind: TimerKind,
    },
}

/// A mutator event with its scheduler time.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameEvent {
    /// Scheduler time.
    pub time: Duration,

    /// Player involved.
    pub player: StableId,

    /// Event data.
    pub data: GameEventData,
}

impl GameEvent {
    /// Create a new event.
    pub fn new(time: Duration, player: StableId, data: GameEventData) -> Self {
        Self { time, player, data }
    }

    /// Player connected.
    pub fn connected(time: Duration, player: StableId) -> Self {
        Self::new(time, player, GameEventData::Connected)
    }

    /// Skill started.
    pub fn skill_started(time: Duration, player: StableId, duration: Duration) -> Self {
        Self::new(time, player, GameEventData::SkillStarted { duration })
    }

    /// Activation refused.
    pub fn skill_blocked(time: Duration, player: StableId, reason: BlockReason) -> Self {
        Self::new(time, player, GameEventData::SkillBlocked { reason })
    }

    /// Skill ended.
    pub fn skill_ended(time: Duration, player: StableId, cooldown: u32) -> Self {
        Self::new(time, player, GameEventData::SkillEnded { cooldown })
    }

    /// Health regenerated.
    pub fn health_regenerated(time: Duration, player: StableId, from: u32, to: u32) -> Self {
        Self::new(time, player, GameEventData::HealthRegenerated { from, to })
    }

    /// Stale timer dropped.
    pub fn stale_timer(time: Duration, player: StableId, kind: TimerKind) -> Self {
        Self::new(time, player, GameEventData::StaleTimerDropped { kind })
    }
}

/// Result of one frame.
#[derive(Debug, Default)]
pub struct FrameResult {
    /// Events generated this frame.
    pub events: Vec<GameEvent>,
    /// Timer firings dispatched this frame.
    pub fired: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_serializes() {
        let event = GameEvent::health_regenerated(Duration::from_secs(2), StableId(4), 85, 95);
        let json = serde_json::to_string(&event).unwrap();
        let back: GameEvent = serde_json::from_str(&json).unwrap();
        assert_eq!(back, event);
        assert!(json.contains("HealthRegenerated"));
    }
}
