#![allow(dead_code)]

use std::collections::{BTreeMap, BTreeSet};
use std::time::Duration;

use plague_skills::core::timer::{TimerKind, TimerService};
use plague_skills::game::class::{ClassDef, ClassId, ClassTable};
use plague_skills::game::host::{Hint, SkillVerdict, Velocity};
use plague_skills::game::session::SkillState;
use plague_skills::{Host, Mutator, MutatorConfig, Slot, StableId};

pub const SECOND: Duration = Duration::from_secs(1);
pub const FRAME: Duration = Duration::from_millis(100);

/// 5 s skill, 10 s cooldown, 10 hp every 2 s, 100 hp cap.
pub const CLASSIC: ClassId = ClassId(1);
/// Skill without cooldown, fast regen.
pub const RUNNER: ClassId = ClassId(2);
/// No skill, no regen.
pub const INERT: ClassId = ClassId(3);

pub fn classes() -> ClassTable {
    ClassTable::new()
        .with(
            CLASSIC,
            ClassDef::new("classic", 100)
                .with_skill(5 * SECOND, 10)
                .with_regen(2 * SECOND, 10),
        )
        .with(
            RUNNER,
            ClassDef::new("runner", 80)
                .with_skill(3 * SECOND, 0)
                .with_regen(SECOND / 2, 4),
        )
        .with(INERT, ClassDef::new("inert", 150))
}

pub fn mutator(config: MutatorConfig) -> Mutator<ClassTable> {
    Mutator::with_scheduler(config, classes())
}

pub fn slot(index: u8) -> Slot {
    Slot::new(index).expect("valid slot")
}

/// Connect on `index`, pick `class` and infect.
pub fn spawn_zombie(m: &mut Mutator<ClassTable>, index: u8, class: ClassId) -> StableId {
    let id = m.connect(slot(index)).expect("slot free");
    m.on_class_changed(id, class).expect("live");
    m.on_infected(id, false).expect("live");
    id
}

/// Run frames of `FRAME` until `total` has elapsed.
pub fn run_for<H: Host>(m: &mut Mutator<ClassTable>, host: &mut H, total: Duration) {
    let frames = (total.as_millis() / FRAME.as_millis()) as u32;
    for _ in 0..frames {
        m.run_frame(host, FRAME);
    }
}

/// In-memory engine.
#[derive(Debug, Default)]
pub struct FakeHost {
    pub health: BTreeMap<StableId, u32>,
    pub velocity: BTreeMap<StableId, Velocity>,
    pub veto: BTreeSet<StableId>,
    pub muted: BTreeSet<StableId>,
    pub skill_used: Vec<StableId>,
    pub skill_over: Vec<StableId>,
    pub hints: Vec<(StableId, Hint)>,
    pub regen_sounds: Vec<StableId>,
    pub regen_effects: Vec<StableId>,
}

impl FakeHost {
    pub fn hints_for(&self, player: StableId) -> Vec<Hint> {
        self.hints
            .iter()
            .filter(|(p, _)| *p == player)
            .map(|(_, h)| *h)
            .collect()
    }

    /// Any feedback at all addressed to `player`.
    pub fn touched(&self, player: StableId) -> bool {
        self.skill_over.contains(&player)
            || self.skill_used.contains(&player)
            || self.hints.iter().any(|(p, _)| *p == player)
            || self.regen_sounds.contains(&player)
    }
}

impl Host for FakeHost {
    fn health(&self, player: StableId) -> u32 {
        self.health.get(&player).copied().unwrap_or(0)
    }

    fn set_health(&mut self, player: StableId, health: u32) {
        self.health.insert(player, health);
    }

    fn velocity(&self, player: StableId) -> Velocity {
        self.velocity.get(&player).copied().unwrap_or_default()
    }

    fn skill_used(&mut self, player: StableId) -> SkillVerdict {
        self.skill_used.push(player);
        if self.veto.contains(&player) {
            SkillVerdict::Block
        } else {
            SkillVerdict::Allow
        }
    }

    fn skill_over(&mut self, player: StableId) {
        self.skill_over.push(player);
    }

    fn hint(&mut self, player: StableId, hint: Hint) {
        self.hints.push((player, hint));
    }

    fn regen_sound(&mut self, player: StableId) {
        self.regen_sounds.push(player);
    }

    fn regen_effect(&mut self, player: StableId) {
        self.regen_effects.push(player);
    }

    fn is_voice_muted(&self, player: StableId) -> bool {
        self.muted.contains(&player)
    }
}

/// Every live timer belongs to exactly one session field, and every field
/// points at a live timer.
pub fn assert_timer_ownership(m: &Mutator<ClassTable>) {
    let timers = m.timers();
    let mut owned = 0;

    for session in m.roster().iter() {
        let id = session.stable_id;
        for kind in [TimerKind::Regen, TimerKind::SkillDuration, TimerKind::SkillCountdown] {
            assert!(
                timers.pending_for(id, kind) <= 1,
                "player {} has several {:?} timers",
                id,
                kind
            );
        }

        if let Some(timer) = session.regen_timer() {
            assert!(timers.is_pending(timer), "player {} regen handle is dead", id);
            assert!(session.regen_eligible(), "player {} regenerates while not plain infected", id);
            owned += 1;
        }

        match session.skill() {
            SkillState::Idle => {}
            SkillState::Active { timer } => {
                assert!(timers.is_pending(timer));
                assert_eq!(session.cooldown_remaining(), 0);
                owned += 1;
            }
            SkillState::Cooldown { remaining, timer } => {
                assert!(timers.is_pending(timer));
                assert!(remaining > 0);
                assert!(!session.is_skill_active());
                owned += 1;
            }
        }
    }

    assert_eq!(timers.pending(), owned, "orphaned timers in the scheduler");
}
