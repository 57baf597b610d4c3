//! # Plague Skills
//!
//! Infected skill and regeneration core for a zombie game mode.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                       PLAGUE SKILLS                          │
//! ├─────────────────────────────────────────────────────────────┤
//! │  core/           - Engine-independent primitives             │
//! │  ├── identity.rs - Slots and connection-lifetime ids         │
//! │  └── timer.rs    - Timer service and frame scheduler         │
//! │                                                              │
//! │  game/           - Mode logic                                │
//! │  ├── roster.rs   - Stable id -> session resolution           │
//! │  ├── session.rs  - Per-player skill and regen state          │
//! │  ├── class.rs    - Class catalog                             │
//! │  ├── ability.rs  - Drop command, skill state machine         │
//! │  ├── regen.rs    - Stationary regeneration                   │
//! │  ├── voice.rs    - Infected/human voice partition            │
//! │  ├── host.rs     - Engine callbacks                          │
//! │  ├── events.rs   - Recorded game events                      │
//! │  └── mutator.rs  - Owner and timer dispatch                  │
//! │                                                              │
//! │  config.rs       - JSON configuration                        │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Stale Timer Guarantee
//!
//! Timers carry the owner's [`StableId`], never a slot index. Every firing
//! resolves that id through the [`Roster`] first:
//! - A player who left (or whose slot was reused) resolves as stale
//! - Stale firings touch nothing and stop their timer
//! - Replacing a timer cancels the previous one in the same step
//!
//! A player therefore never owns two live timers of the same kind, and no
//! callback ever acts on a different occupant of the same slot.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]

pub mod config;
pub mod core;
pub mod game;

// Re-export commonly used types
pub use config::{ConfigError, MutatorConfig, VoiceConfig, MAX_TICK_RATE};
pub use crate::core::identity::{Slot, StableId};
pub use crate::core::timer::{FrameScheduler, TimerService};
pub use game::host::Host;
pub use game::mutator::{Mutator, MutatorError};
pub use game::roster::Roster;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default server frame rate (Hz)
pub const TICK_RATE: u32 = 64;
