//! Frame-Driven Timers
//!
//! One-shot and repeating timers examined once per server frame. A timer
//! carries the [`StableId`] it was scheduled for and a [`TimerKind`] that
//! selects the callback; it never carries a reference into player state.
//!
//! # Ordering
//!
//! Due timers are handed out one at a time in `(due, id)` order. A callback
//! that cancels another timer due in the same frame therefore prevents that
//! firing: a cancelled timer never fires.

use std::collections::{BTreeMap, BTreeSet};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::core::identity::StableId;

/// Shortest interval a repeating timer may use.
pub const MIN_TIMER_INTERVAL: Duration = Duration::from_millis(100);

/// Handle of a scheduled timer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TimerId(pub u64);

/// Callback a timer is routed to when it fires.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TimerKind {
    /// Passive health regeneration (repeating).
    Regen,
    /// End of a skill's active window (one-shot).
    SkillDuration,
    /// One second of skill cooldown (repeating).
    SkillCountdown,
}

/// What a callback wants done with the timer that fired it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TimerAction {
    /// Keep repeating.
    Continue,
    /// Destroy the timer.
    Stop,
}

/// A due timer handed to the dispatcher.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TimerFiring {
    /// Timer handle.
    pub id: TimerId,
    /// Callback selector.
    pub kind: TimerKind,
    /// Identity the timer was scheduled for.
    pub token: StableId,
    /// Scheduler time the firing was due at.
    pub due: Duration,
}

/// Host-provided timer runtime.
pub trait TimerService {
    /// Schedule a callback once after `delay`.
    fn schedule_once(&mut self, delay: Duration, kind: TimerKind, token: StableId) -> TimerId;

    /// Schedule a callback every `interval`.
    fn schedule_repeating(&mut self, interval: Duration, kind: TimerKind, token: StableId) -> TimerId;

    /// Cancel a pending timer. Returns false if it already fired or was cancelled.
    fn cancel(&mut self, id: TimerId) -> bool;

    /// True if the timer will still fire.
    fn is_pending(&self, id: TimerId) -> bool;

    /// Current runtime time.
    fn now(&self) -> Duration;
}

#[derive(Clone, Debug)]
struct TimerEntry {
    due: Duration,
    interval: Option<Duration>,
    kind: TimerKind,
    token: StableId,
}

/// Timer runtime driven by [`FrameScheduler::advance`].
#[derive(Clone, Debug, Default)]
pub struct FrameScheduler {
    now: Duration,
    next_id: u64,
    queue: BTreeSet<(Duration, TimerId)>,
    timers: BTreeMap<TimerId, TimerEntry>,
}

impl FrameScheduler {
    /// Create a scheduler at time zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of live timers.
    pub fn pending(&self) -> usize {
        self.timers.len()
    }

    /// Live timers of one kind scheduled for `token`.
    pub fn pending_for(&self, token: StableId, kind: TimerKind) -> usize {
        self.timers
            .values()
            .filter(|t| t.token == token && t.kind == kind)
            .count()
    }

    /// Move the clock forward by one frame.
    pub fn advance(&mut self, dt: Duration) {
        self.now += dt;
    }

    /// Take the next timer due at or before now.
    ///
    /// Repeating timers are rescheduled before they are returned, so the
    /// caller cancels them if the callback answers [`TimerAction::Stop`].
    pub fn pop_due(&mut self) -> Option<TimerFiring> {
        let &(due, id) = self.queue.first()?;
        if due > self.now {
            return None;
        }
        self.queue.remove(&(due, id));

        let entry = self.timers.get_mut(&id)?;
        let firing = TimerFiring {
            id,
            kind: entry.kind,
            token: entry.token,
            due,
        };

        match entry.interval {
            Some(interval) => {
                let next = due + interval;
                entry.due = next;
                self.queue.insert((next, id));
            }
            None => {
                self.timers.remove(&id);
            }
        }

        Some(firing)
    }

    fn insert(&mut self, delay: Duration, interval: Option<Duration>, kind: TimerKind, token: StableId) -> TimerId {
        self.next_id += 1;
        let id = TimerId(self.next_id);
        let due = self.now + delay;
        self.queue.insert((due, id));
        self.timers.insert(id, TimerEntry { due, interval, kind, token });
        id
    }
}

impl TimerService for FrameScheduler {
    fn schedule_once(&mut self, delay: Duration, kind: TimerKind, token: StableId) -> TimerId {
        self.insert(delay, None, kind, token)
    }

    fn schedule_repeating(&mut self, interval: Duration, kind: TimerKind, token: StableId) -> TimerId {
        let interval = interval.max(MIN_TIMER_INTERVAL);
        self.insert(interval, Some(interval), kind, token)
    }

    fn cancel(&mut self, id: TimerId) -> bool {
        match self.timers.remove(&id) {
            Some(entry) => {
                self.queue.remove(&(entry.due, id));
                true
            }
            None => false,
        }
    }

    fn is_pending(&self, id: TimerId) -> bool {
        self.timers.contains_key(&id)
    }

    fn now(&self) -> Duration {
        self.now
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECOND: Duration = Duration::from_secs(1);
    const PLAYER: StableId = StableId(1);

    fn drain(scheduler: &mut FrameScheduler) -> Vec<TimerFiring> {
        std::iter::from_fn(|| scheduler.pop_due()).collect()
    }

    #[test]
    fn test_once_fires_once() {
        let mut scheduler = FrameScheduler::new();
        let id = scheduler.schedule_once(2 * SECOND, TimerKind::SkillDuration, PLAYER);

        scheduler.advance(SECOND);
        assert!(drain(&mut scheduler).is_empty());

        scheduler.advance(SECOND);
        let fired = drain(&mut scheduler);
        assert_eq!(fired.len(), 1);
        assert_eq!(fired[0].id, id);
        assert_eq!(fired[0].token, PLAYER);
        assert!(!scheduler.is_pending(id));

        scheduler.advance(10 * SECOND);
        assert!(drain(&mut scheduler).is_empty());
    }

    #[test]
    fn test_repeating_catches_up() {
        let mut scheduler = FrameScheduler::new();
        let id = scheduler.schedule_repeating(SECOND, TimerKind::SkillCountdown, PLAYER);

        scheduler.advance(3 * SECOND);
        let fired = drain(&mut scheduler);
        assert_eq!(fired.len(), 3);
        assert_eq!(fired[2].due, 3 * SECOND);
        assert!(scheduler.is_pending(id));
    }

    #[test]
    fn test_cancelled_timer_never_fires() {
        let mut scheduler = FrameScheduler::new();
        let a = scheduler.schedule_once(SECOND, TimerKind::SkillDuration, PLAYER);
        let b = scheduler.schedule_once(SECOND, TimerKind::SkillDuration, StableId(2));

        scheduler.advance(SECOND);
        let first = scheduler.pop_due().unwrap();
        assert_eq!(first.id, a);

        // Cancelled by the first callback while already due.
        assert!(scheduler.cancel(b));
        assert!(scheduler.pop_due().is_none());
        assert!(!scheduler.cancel(b));
        assert_eq!(scheduler.pending(), 0);
    }

    #[test]
    fn test_zero_interval_is_clamped() {
        let mut scheduler = FrameScheduler::new();
        scheduler.schedule_repeating(Duration::ZERO, TimerKind::Regen, PLAYER);

        scheduler.advance(SECOND);
        assert_eq!(drain(&mut scheduler).len(), 10);
    }

    #[test]
    fn test_pending_for() {
        let mut scheduler = FrameScheduler::new();
        scheduler.schedule_repeating(SECOND, TimerKind::Regen, PLAYER);
        scheduler.schedule_once(SECOND, TimerKind::SkillDuration, PLAYER);
        scheduler.schedule_repeating(SECOND, TimerKind::Regen, StableId(9));

        assert_eq!(scheduler.pending_for(PLAYER, TimerKind::Regen), 1);
        assert_eq!(scheduler.pending_for(PLAYER, TimerKind::SkillCountdown), 0);
        assert_eq!(scheduler.pending(), 3);
    }
}
