//! Game Logic Module
//!
//! Infected skill lifecycle, passive regeneration and the voice partition,
//! all driven by engine events and timer firings.
//!
//! ## Module Structure
//!
//! - `roster`: connected players keyed by stable id
//! - `session`: per-player faction, class, skill and regen state
//! - `class`: class catalog (skill and regen parameters)
//! - `ability`: drop-command routing and the Idle/Active/Cooldown machine
//! - `regen`: stationary health regeneration
//! - `voice`: infected/human voice partition
//! - `host`: engine callbacks
//! - `mutator`: owns everything and dispatches timer firings
//! - `events`: recorded game events

pub mod ability;
pub mod class;
pub mod events;
pub mod host;
pub mod mutator;
pub mod regen;
pub mod roster;
pub mod session;
pub mod voice;

#[cfg(test)]
pub(crate) mod test_support;

// Re-export key types
pub use ability::{ActivationOutcome, CommandAction, COUNTDOWN_INTERVAL};
pub use class::{ClassCatalog, ClassDef, ClassId, ClassTable};
pub use events::{BlockReason, FrameResult, GameEvent, GameEventData};
pub use host::{Hint, Host, SkillVerdict, Velocity};
pub use mutator::{Mutator, MutatorError};
pub use roster::{Resolved, Roster};
pub use session::{Faction, PlayerSession, SkillState, TimerSlot};
pub use voice::{Listen, VoiceOverride, VoiceState, VoiceUpdate};
