//! Infected Skills
//!
//! Per-player skill lifecycle: `Idle → Active → Cooldown → Idle`.
//!
//! The drop command opens the active window; a one-shot timer closes it and
//! starts a one-second repeating countdown. Every timer callback resolves
//! its stable id first and does nothing to state if the player is gone.

use std::time::Duration;

use tracing::{debug, trace, warn};

use crate::core::identity::{Slot, StableId};
use crate::core::timer::{TimerAction, TimerFiring, TimerKind, TimerService};
use crate::game::class::ClassCatalog;
use crate::game::events::{BlockReason, GameEvent, GameEventData};
use crate::game::host::{Hint, Host, SkillVerdict};
use crate::game::mutator::Mutator;
use crate::game::session::{Faction, SkillState};

/// Countdown tick period.
pub const COUNTDOWN_INTERVAL: Duration = Duration::from_secs(1);

/// What the engine should do with the drop command.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CommandAction {
    /// Let the engine drop the weapon.
    Continue,
    /// Swallow the command.
    Handled,
}

/// Result of an activation attempt.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ActivationOutcome {
    /// Active window opened.
    Activated,
    /// Only plain infected use the class skill.
    NotInfected,
    /// Class has no skill.
    NoSkill,
    /// Already active or cooling down.
    Busy,
    /// Pre-activation hook blocked it.
    Vetoed,
    /// Player is not connected.
    Stale,
}

/// Route the drop command for the player on `slot`.
///
/// Plain infected always have the command swallowed, whether or not the
/// skill starts. Elite infected can never drop.
pub fn on_drop_command<C, T, H>(m: &mut Mutator<C, T>, host: &mut H, slot: Slot) -> CommandAction
where
    C: ClassCatalog,
    T: TimerService,
    H: Host + ?Sized,
{
    let Some(id) = m.roster.stable_id(slot) else {
        return CommandAction::Continue;
    };
    let Some(faction) = m.roster.get(id).map(|s| s.faction) else {
        return CommandAction::Continue;
    };

    match faction {
        Faction::Infected => {
            try_activate(m, host, id);
            CommandAction::Handled
        }
        Faction::Elite => CommandAction::Handled,
        Faction::Survivor if m.config.block_survivor_drop => CommandAction::Handled,
        Faction::Survivor | Faction::Human => CommandAction::Continue,
    }
}

/// Start `id`'s skill if they are plain infected, the class has one and it
/// is idle.
pub fn try_activate<C, T, H>(m: &mut Mutator<C, T>, host: &mut H, id: StableId) -> ActivationOutcome
where
    C: ClassCatalog,
    T: TimerService,
    H: Host + ?Sized,
{
    let now = m.timers.now();
    let Some(session) = m.roster.resolve(id).live() else {
        return ActivationOutcome::Stale;
    };

    let class = session.class;
    let blocked = if session.faction != Faction::Infected {
        Some(BlockReason::NotInfected)
    } else if !m.catalog.has_skill(class) {
        Some(BlockReason::NoSkill)
    } else if session.skill() != SkillState::Idle {
        Some(BlockReason::Busy)
    } else if host.skill_used(id) == SkillVerdict::Block {
        Some(BlockReason::Vetoed)
    } else {
        None
    };

    if let Some(reason) = blocked {
        trace!("Player {} skill blocked: {:?}", id, reason);
        m.events.push(GameEvent::skill_blocked(now, id, reason));
        return match reason {
            BlockReason::NotInfected => ActivationOutcome::NotInfected,
            BlockReason::NoSkill => ActivationOutcome::NoSkill,
            BlockReason::Busy => ActivationOutcome::Busy,
            BlockReason::Vetoed => ActivationOutcome::Vetoed,
        };
    }

    let duration = m.catalog.skill_duration(class);
    session.replace_skill(&mut m.timers, |timers| SkillState::Active {
        timer: timers.schedule_once(duration, TimerKind::SkillDuration, id),
    });

    debug!("Player {} skill started for {:?}", id, duration);
    m.events.push(GameEvent::skill_started(now, id, duration));
    ActivationOutcome::Activated
}

/// Active window closed.
pub fn on_duration_expire<C, T, H>(m: &mut Mutator<C, T>, host: &mut H, firing: TimerFiring) -> TimerAction
where
    C: ClassCatalog,
    T: TimerService,
    H: Host + ?Sized,
{
    let now = m.timers.now();
    let id = firing.token;
    let Some(session) = m.roster.resolve(id).live() else {
        trace!("Dropping duration timer of stale player {}", id);
        m.events.push(GameEvent::stale_timer(now, id, firing.kind));
        return TimerAction::Stop;
    };

    if session.duration_timer() != Some(firing.id) {
        warn!("Player {} got a duration timer it does not own", id);
        return TimerAction::Stop;
    }

    let cooldown = m.catalog.skill_cooldown(session.class);
    session.replace_skill(&mut m.timers, |timers| {
        if cooldown == 0 {
            SkillState::Idle
        } else {
            SkillState::Cooldown {
                remaining: cooldown,
                timer: timers.schedule_repeating(COUNTDOWN_INTERVAL, TimerKind::SkillCountdown, id),
            }
        }
    });

    host.skill_over(id);
    debug!("Player {} skill ended, cooldown {}s", id, cooldown);
    m.events.push(GameEvent::skill_ended(now, id, cooldown));
    TimerAction::Stop
}

/// One second of cooldown elapsed.
pub fn on_countdown_tick<C, T, H>(m: &mut Mutator<C, T>, host: &mut H, firing: TimerFiring) -> TimerAction
where
    C: ClassCatalog,
    T: TimerService,
    H: Host + ?Sized,
{
    let now = m.timers.now();
    let id = firing.token;
    let Some(session) = m.roster.resolve(id).live() else {
        trace!("Dropping countdown timer of stale player {}", id);
        m.events.push(GameEvent::stale_timer(now, id, firing.kind));
        return TimerAction::Stop;
    };

    let SkillState::Cooldown { remaining, timer } = session.skill() else {
        warn!("Player {} got a countdown tick outside cooldown", id);
        return TimerAction::Stop;
    };
    if timer != firing.id {
        warn!("Player {} got a countdown timer it does not own", id);
        return TimerAction::Stop;
    }

    let remaining = remaining.saturating_sub(1);
    if remaining == 0 {
        session.reset_skill(&mut m.timers);
        host.hint(id, Hint::SkillReady);
        debug!("Player {} skill ready", id);
        m.events.push(GameEvent::new(now, id, GameEventData::SkillReady));
        return TimerAction::Stop;
    }

    session.set_cooldown_remaining(remaining);
    host.hint(id, Hint::Countdown(remaining));
    trace!("Player {} skill cooldown {}s", id, remaining);
    TimerAction::Continue
}
