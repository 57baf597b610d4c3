//! Host Bindings
//!
//! Everything the core needs from the game engine and from other plugin
//! modules. Presentation hooks are fire-and-forget; only
//! [`Host::skill_used`] returns a value the core acts on.

use serde::{Deserialize, Serialize};

use crate::core::identity::StableId;

/// Player velocity in engine units per second.
#[derive(Clone, Copy, Debug, PartialEq, Default, Serialize, Deserialize)]
pub struct Velocity {
    /// Forward axis.
    pub x: f32,
    /// Side axis.
    pub y: f32,
    /// Vertical axis.
    pub z: f32,
}

impl Velocity {
    /// Create a velocity.
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    /// Speed on the ground plane. Vertical motion is ignored.
    pub fn horizontal_speed(&self) -> f32 {
        self.x.hypot(self.y)
    }

    /// True when the player does not move on the ground plane.
    pub fn is_stationary(&self) -> bool {
        self.horizontal_speed() == 0.0
    }
}

/// Answer of the pre-activation hook.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum SkillVerdict {
    /// Let the skill start.
    #[default]
    Allow,
    /// Block this activation.
    Block,
}

/// Player-facing hint text.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Hint {
    /// Cooldown finished.
    SkillReady,
    /// Seconds left on the cooldown.
    Countdown(u32),
}

/// Engine access and plugin hooks.
pub trait Host {
    /// Current health.
    fn health(&self, player: StableId) -> u32;

    /// Overwrite health.
    fn set_health(&mut self, player: StableId, health: u32);

    /// Current velocity.
    fn velocity(&self, player: StableId) -> Velocity;

    /// Called before a skill starts. [`SkillVerdict::Block`] vetoes it.
    fn skill_used(&mut self, _player: StableId) -> SkillVerdict {
        SkillVerdict::Allow
    }

    /// Called when a skill's active window ends.
    fn skill_over(&mut self, _player: StableId) {}

    /// Show hint text to a player.
    fn hint(&mut self, _player: StableId, _hint: Hint) {}

    /// Play the regeneration sound.
    fn regen_sound(&mut self, _player: StableId) {}

    /// Play the regeneration visual effect.
    fn regen_effect(&mut self, _player: StableId) {}

    /// True if the player's voice is muted by an admin or by themselves.
    fn is_voice_muted(&self, _player: StableId) -> bool {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vertical_motion_is_stationary() {
        assert!(Velocity::default().is_stationary());
        assert!(Velocity::new(0.0, 0.0, -300.0).is_stationary());
        assert!(!Velocity::new(0.5, 0.0, 0.0).is_stationary());
        assert_eq!(Velocity::new(3.0, 4.0, 9.0).horizontal_speed(), 5.0);
    }
}
