//! Health Regeneration
//!
//! Plain infected players heal on a repeating timer while they stand still.
//! Class parameters are read on every tick, so a class change applies from
//! the next tick without rescheduling.

use tracing::{debug, trace, warn};

use crate::core::identity::StableId;
use crate::core::timer::{TimerAction, TimerFiring, TimerKind, TimerService};
use crate::game::class::ClassCatalog;
use crate::game::events::GameEvent;
use crate::game::host::Host;
use crate::game::mutator::Mutator;

/// Start (or restart) regeneration for a freshly infected player.
///
/// Returns false when regeneration is disabled, the player is elite, or
/// the player is not connected. Any previous regen timer is cancelled in
/// every case.
pub fn on_infected<C, T>(m: &mut Mutator<C, T>, id: StableId, elite: bool) -> bool
where
    C: ClassCatalog,
    T: TimerService,
{
    let Some(session) = m.roster.resolve(id).live() else {
        return false;
    };

    if !m.config.regen_enabled || elite {
        session.regen_slot().clear(&mut m.timers);
        return false;
    }

    let interval = m.catalog.regen_interval(session.class);
    session.regen_slot().replace(&mut m.timers, |timers| {
        timers.schedule_repeating(interval, TimerKind::Regen, id)
    });
    true
}

/// One regeneration tick.
pub fn on_regen_tick<C, T, H>(m: &mut Mutator<C, T>, host: &mut H, firing: TimerFiring) -> TimerAction
where
    C: ClassCatalog,
    T: TimerService,
    H: Host + ?Sized,
{
    let now = m.timers.now();
    let id = firing.token;
    let Some(session) = m.roster.resolve(id).live() else {
        trace!("Dropping regen timer of stale player {}", id);
        m.events.push(GameEvent::stale_timer(now, id, firing.kind));
        return TimerAction::Stop;
    };

    if !session.regen_slot().holds(firing.id) {
        warn!("Player {} got a regen timer it does not own", id);
        return TimerAction::Stop;
    }

    if !session.regen_eligible() {
        session.regen_slot().clear(&mut m.timers);
        return TimerAction::Stop;
    }

    let class = session.class;
    let amount = m.catalog.regen_amount(class);
    if amount == 0 && m.catalog.regen_interval(class).is_zero() {
        debug!("Player {} class {:?} has no regeneration, stopping", id, class);
        session.regen_slot().clear(&mut m.timers);
        return TimerAction::Stop;
    }

    if !host.velocity(id).is_stationary() {
        return TimerAction::Continue;
    }

    let health = host.health(id);
    let max_health = m.catalog.max_health(class);
    if health >= max_health {
        return TimerAction::Continue;
    }

    let restored = health.saturating_add(amount).min(max_health);
    if restored > health {
        host.set_health(id, restored);
        host.regen_sound(id);
        host.regen_effect(id);
        trace!("Player {} regenerated {} -> {}", id, health, restored);
        m.events.push(GameEvent::health_regenerated(now, id, health, restored));
    }

    TimerAction::Continue
}
