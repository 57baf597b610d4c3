//! Core Primitives
//!
//! Identity and timer building blocks shared by the game modules.
//!
//! ## Module Structure
//!
//! - `identity`: player slots and connection-lifetime ids
//! - `timer`: timer service trait and the frame-driven scheduler

pub mod identity;
pub mod timer;

pub use identity::{IdentityError, Slot, SlotTable, StableId, MAX_PLAYERS};
pub use timer::{FrameScheduler, TimerAction, TimerFiring, TimerId, TimerKind, TimerService};
