//! Infected Classes
//!
//! Read-only lookup of per-class skill and regeneration parameters.
//! Loading class definitions is the host's job; the core only consults them.

use std::collections::BTreeMap;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Class identifier as registered by the host.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
pub struct ClassId(pub u16);

/// Read-only class parameters.
///
/// Unknown classes answer zero for everything: no skill and no regeneration.
pub trait ClassCatalog {
    /// Length of the skill's active window.
    fn skill_duration(&self, class: ClassId) -> Duration;

    /// Cooldown after the active window, in whole seconds.
    fn skill_cooldown(&self, class: ClassId) -> u32;

    /// Delay between regeneration ticks.
    fn regen_interval(&self, class: ClassId) -> Duration;

    /// Health restored per regeneration tick.
    fn regen_amount(&self, class: ClassId) -> u32;

    /// Class health cap.
    fn max_health(&self, class: ClassId) -> u32;

    /// A class with neither duration nor cooldown has no skill.
    fn has_skill(&self, class: ClassId) -> bool {
        !self.skill_duration(class).is_zero() || self.skill_cooldown(class) != 0
    }
}

/// Parameters of one infected class.
#[derive(Clone, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ClassDef {
    /// Display name (logging only).
    pub name: String,
    /// Skill active window.
    pub skill_duration: Duration,
    /// Skill cooldown in seconds.
    pub skill_cooldown: u32,
    /// Regeneration tick interval.
    pub regen_interval: Duration,
    /// Health restored per tick.
    pub regen_amount: u32,
    /// Health cap.
    pub max_health: u32,
}

impl ClassDef {
    /// Create a class with no skill and no regeneration.
    pub fn new(name: impl Into<String>, max_health: u32) -> Self {
        Self {
            name: name.into(),
            max_health,
            ..Self::default()
        }
    }

    /// Set skill duration and cooldown.
    pub fn with_skill(mut self, duration: Duration, cooldown_secs: u32) -> Self {
        self.skill_duration = duration;
        self.skill_cooldown = cooldown_secs;
        self
    }

    /// Set regeneration interval and amount.
    pub fn with_regen(mut self, interval: Duration, amount: u32) -> Self {
        self.regen_interval = interval;
        self.regen_amount = amount;
        self
    }
}

/// In-memory class table.
#[derive(Clone, Debug, Default)]
pub struct ClassTable {
    classes: BTreeMap<ClassId, ClassDef>,
}

impl ClassTable {
    /// Create an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register or replace a class.
    pub fn insert(&mut self, id: ClassId, def: ClassDef) -> Option<ClassDef> {
        self.classes.insert(id, def)
    }

    /// Builder form of [`ClassTable::insert`].
    pub fn with(mut self, id: ClassId, def: ClassDef) -> Self {
        self.insert(id, def);
        self
    }

    /// Look up a class.
    pub fn get(&self, id: ClassId) -> Option<&ClassDef> {
        self.classes.get(&id)
    }

    /// Mutable access, for live tuning by the host.
    pub fn get_mut(&mut self, id: ClassId) -> Option<&mut ClassDef> {
        self.classes.get_mut(&id)
    }

    /// Number of registered classes.
    pub fn len(&self) -> usize {
        self.classes.len()
    }

    /// True if no class is registered.
    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }
}

impl ClassCatalog for ClassTable {
    fn skill_duration(&self, class: ClassId) -> Duration {
        self.get(class).map(|c| c.skill_duration).unwrap_or_default()
    }

    fn skill_cooldown(&self, class: ClassId) -> u32 {
        self.get(class).map(|c| c.skill_cooldown).unwrap_or(0)
    }

    fn regen_interval(&self, class: ClassId) -> Duration {
        self.get(class).map(|c| c.regen_interval).unwrap_or_default()
    }

    fn regen_amount(&self, class: ClassId) -> u32 {
        self.get(class).map(|c| c.regen_amount).unwrap_or(0)
    }

    fn max_health(&self, class: ClassId) -> u32 {
        self.get(class).map(|c| c.max_health).unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_class_is_inert() {
        let table = ClassTable::new();
        let class = ClassId(42);

        assert!(!table.has_skill(class));
        assert_eq!(table.regen_amount(class), 0);
        assert_eq!(table.regen_interval(class), Duration::ZERO);
        assert_eq!(table.max_health(class), 0);
    }

    #[test]
    fn test_has_skill() {
        let table = ClassTable::new()
            .with(ClassId(1), ClassDef::new("classic", 2000).with_skill(Duration::from_secs(5), 10))
            .with(ClassId(2), ClassDef::new("cooldown only", 2000).with_skill(Duration::ZERO, 3))
            .with(ClassId(3), ClassDef::new("plain", 2000));

        assert!(table.has_skill(ClassId(1)));
        assert!(table.has_skill(ClassId(2)));
        assert!(!table.has_skill(ClassId(3)));
        assert_eq!(table.len(), 3);
    }
}
