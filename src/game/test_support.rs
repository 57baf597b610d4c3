//! Recording host for unit tests.

use std::collections::{BTreeMap, BTreeSet};

use crate::core::identity::StableId;
use crate::game::host::{Hint, Host, SkillVerdict, Velocity};

#[derive(Debug, Default)]
pub struct TestHost {
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

impl TestHost {
    pub fn hints_for(&self, player: StableId) -> Vec<Hint> {
        self.hints
            .iter()
            .filter(|(p, _)| *p == player)
            .map(|(_, h)| *h)
            .collect()
    }
}

impl Host for TestHost {
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
