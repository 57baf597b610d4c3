//! Mutator
//!
//! Owns the roster, the timer runtime and the class catalog, and routes
//! engine events, the drop command and timer firings to the skill and
//! regeneration modules.

use std::time::Duration;

use tracing::{debug, info};

use crate::config::MutatorConfig;
use crate::core::identity::{IdentityError, Slot, StableId};
use crate::core::timer::{FrameScheduler, TimerAction, TimerFiring, TimerKind, TimerService};
use crate::game::ability::{self, ActivationOutcome, CommandAction};
use crate::game::class::{ClassCatalog, ClassId};
use crate::game::events::{FrameResult, GameEvent, GameEventData};
use crate::game::host::Host;
use crate::game::regen;
use crate::game::roster::Roster;
use crate::game::session::{Faction, PlayerSession};
use crate::game::voice::{VoiceOverride, VoiceState, VoiceUpdate};

/// Mutator errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MutatorError {
    /// No live session for this id.
    #[error("player {0} is not connected")]
    UnknownPlayer(StableId),

    /// Slot bookkeeping failed.
    #[error(transparent)]
    Identity(#[from] IdentityError),
}

fn live(roster: &mut Roster, id: StableId) -> Result<&mut PlayerSession, MutatorError> {
    roster.resolve(id).live().ok_or(MutatorError::UnknownPlayer(id))
}

/// The skill and regeneration core.
pub struct Mutator<C, T = FrameScheduler> {
    pub(crate) config: MutatorConfig,
    pub(crate) catalog: C,
    pub(crate) timers: T,
    pub(crate) roster: Roster,
    pub(crate) events: Vec<GameEvent>,
    voice: VoiceState,
}

impl<C: ClassCatalog> Mutator<C, FrameScheduler> {
    /// Create a mutator driven by its own [`FrameScheduler`].
    pub fn with_scheduler(config: MutatorConfig, catalog: C) -> Self {
        Self::new(config, catalog, FrameScheduler::new())
    }

    /// Advance one frame and dispatch every timer that came due.
    pub fn run_frame<H: Host + ?Sized>(&mut self, host: &mut H, dt: Duration) -> FrameResult {
        self.timers.advance(dt);

        let mut fired = 0;
        while let Some(firing) = self.timers.pop_due() {
            fired += 1;
            if self.dispatch(host, firing) == TimerAction::Stop {
                self.timers.cancel(firing.id);
            }
        }

        FrameResult {
            events: self.take_events(),
            fired,
        }
    }
}

impl<C: ClassCatalog, T: TimerService> Mutator<C, T> {
    /// Create a mutator on a host-provided timer runtime.
    pub fn new(config: MutatorConfig, catalog: C, timers: T) -> Self {
        Self {
            config,
            catalog,
            timers,
            roster: Roster::new(),
            events: Vec::new(),
            voice: VoiceState::default(),
        }
    }

    /// Active configuration.
    pub fn config(&self) -> &MutatorConfig {
        &self.config
    }

    /// Class catalog.
    pub fn catalog(&self) -> &C {
        &self.catalog
    }

    /// Mutable class catalog (changes apply on the next timer tick).
    pub fn catalog_mut(&mut self) -> &mut C {
        &mut self.catalog
    }

    /// Timer runtime.
    pub fn timers(&self) -> &T {
        &self.timers
    }

    /// Mutable timer runtime, for hosts that advance it themselves and
    /// route firings through [`Mutator::dispatch`].
    pub fn timers_mut(&mut self) -> &mut T {
        &mut self.timers
    }

    /// Connected players.
    pub fn roster(&self) -> &Roster {
        &self.roster
    }

    /// Live session for `id`.
    pub fn session(&self, id: StableId) -> Option<&PlayerSession> {
        self.roster.get(id)
    }

    /// Drain recorded events.
    pub fn take_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    // =========================================================================
    // Connection lifecycle
    // =========================================================================

    /// A player took `slot`.
    pub fn connect(&mut self, slot: Slot) -> Result<StableId, MutatorError> {
        let id = self.roster.connect(slot)?;
        info!("Player {} connected on slot {}", id, slot.index());
        self.events.push(GameEvent::connected(self.timers.now(), id));
        Ok(id)
    }

    /// The player on `slot` left. Every timer they own is cancelled before
    /// the session is dropped.
    pub fn disconnect(&mut self, slot: Slot) -> Result<StableId, MutatorError> {
        let mut session = self.roster.disconnect(slot)?;
        let timers = usize::from(session.regen_timer().is_some())
            + usize::from(session.skill().timer().is_some());
        session.cancel_all(&mut self.timers);

        let id = session.stable_id;
        info!("Player {} disconnected from slot {} ({} timers cancelled)", id, slot.index(), timers);
        self.events.push(GameEvent::new(
            self.timers.now(),
            id,
            GameEventData::Disconnected { timers },
        ));
        Ok(id)
    }

    // =========================================================================
    // Faction / class events
    // =========================================================================

    /// Player became infected. Skill starts idle; regeneration starts
    /// unless `elite` or disabled.
    pub fn on_infected(&mut self, id: StableId, elite: bool) -> Result<(), MutatorError> {
        let session = live(&mut self.roster, id)?;
        session.faction = if elite { Faction::Elite } else { Faction::Infected };
        session.reset_skill(&mut self.timers);
        let regen = regen::on_infected(self, id, elite);
        info!("Player {} infected (elite: {}, regen: {})", id, elite, regen);
        Ok(())
    }

    /// Player lost infection (cured, respawned human or turned survivor).
    pub fn on_humanized(&mut self, id: StableId, survivor: bool) -> Result<(), MutatorError> {
        let session = live(&mut self.roster, id)?;
        session.faction = if survivor { Faction::Survivor } else { Faction::Human };
        session.cancel_all(&mut self.timers);
        debug!("Player {} humanized (survivor: {})", id, survivor);
        Ok(())
    }

    /// Player died.
    pub fn on_death(&mut self, id: StableId) -> Result<(), MutatorError> {
        live(&mut self.roster, id)?.cancel_all(&mut self.timers);
        debug!("Player {} died", id);
        Ok(())
    }

    /// Player switched class. The skill returns to idle; a running regen
    /// timer keeps going and uses the new class from its next tick.
    pub fn on_class_changed(&mut self, id: StableId, class: ClassId) -> Result<(), MutatorError> {
        let session = live(&mut self.roster, id)?;
        session.class = class;
        session.reset_skill(&mut self.timers);
        debug!("Player {} switched to class {:?}", id, class);
        Ok(())
    }

    /// Map is changing: no timer survives it.
    pub fn on_map_end(&mut self) {
        let mut cancelled = 0;
        for session in self.roster.iter_mut() {
            if session.regen_timer().is_some() || session.skill().timer().is_some() {
                cancelled += 1;
            }
            session.cancel_all(&mut self.timers);
        }
        info!("Map end: cleared timers of {} players", cancelled);
    }

    // =========================================================================
    // Commands
    // =========================================================================

    /// Inbound `drop` command from an engine slot.
    pub fn on_drop_command<H: Host + ?Sized>(&mut self, host: &mut H, slot: Slot) -> CommandAction {
        ability::on_drop_command(self, host, slot)
    }

    /// Try to start `id`'s skill directly.
    pub fn try_activate<H: Host + ?Sized>(&mut self, host: &mut H, id: StableId) -> ActivationOutcome {
        ability::try_activate(self, host, id)
    }

    // =========================================================================
    // Timers
    // =========================================================================

    /// Route a timer firing to its callback.
    ///
    /// Hosts with their own timer runtime call this and destroy the timer
    /// when it answers [`TimerAction::Stop`].
    pub fn dispatch<H: Host + ?Sized>(&mut self, host: &mut H, firing: TimerFiring) -> TimerAction {
        match firing.kind {
            TimerKind::Regen => regen::on_regen_tick(self, host, firing),
            TimerKind::SkillDuration => ability::on_duration_expire(self, host, firing),
            TimerKind::SkillCountdown => ability::on_countdown_tick(self, host, firing),
        }
    }

    // =========================================================================
    // Voice
    // =========================================================================

    /// Round is starting. Returns a reset when the voice switch flipped.
    pub fn on_round_start(&mut self) -> Option<Vec<VoiceOverride>> {
        self.voice.round_start(&self.config.voice, &self.roster)
    }

    /// Round is ending: everyone may talk to everyone.
    pub fn on_round_end<H: Host + ?Sized>(&self, host: &H) -> Vec<VoiceOverride> {
        self.voice.round_end(&self.roster, host)
    }

    /// Recompute `id`'s voice partition after a faction change.
    pub fn voice_update<H: Host + ?Sized>(&self, host: &H, id: StableId) -> Option<VoiceUpdate> {
        self.voice.client_update(&self.config.voice, &self.roster, host, id)
    }
}
