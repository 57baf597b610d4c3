//! Voice Partition
//!
//! Infected and humans only hear their own side while a round is running.
//! Everything here is recomputed from the roster on demand; the only state
//! kept is whether the partition was enabled for the current round.

use serde::{Deserialize, Serialize};

use crate::config::VoiceConfig;
use crate::core::identity::StableId;
use crate::game::host::Host;
use crate::game::roster::Roster;

/// Listen override between a receiver and a sender.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Listen {
    /// Engine default rules.
    Default,
    /// Receiver hears sender.
    Yes,
    /// Receiver does not hear sender.
    No,
}

/// One receiver/sender override.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoiceOverride {
    /// Player whose hearing changes.
    pub receiver: StableId,
    /// Player being heard (or not).
    pub sender: StableId,
    /// New rule for the pair.
    pub listen: Listen,
}

/// Overrides for one player after a faction change.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct VoiceUpdate {
    /// `Some(true)` mutes the player's listening entirely.
    pub mute_listening: Option<bool>,
    /// Pair overrides touching the player, both directions.
    pub overrides: Vec<VoiceOverride>,
}

/// Round-scoped voice switch.
#[derive(Clone, Debug, Default)]
pub struct VoiceState {
    enabled: bool,
}

impl VoiceState {
    /// Voice partition active this round.
    pub fn enabled(&self) -> bool {
        self.enabled
    }

    /// Latch the switch for the new round. When it flipped, every pair is
    /// reset: to everyone-hears-everyone under all-talk, otherwise to the
    /// engine's team rules.
    pub fn round_start(&mut self, config: &VoiceConfig, roster: &Roster) -> Option<Vec<VoiceOverride>> {
        let changed = self.enabled != config.enabled;
        self.enabled = config.enabled;
        if !changed {
            return None;
        }

        let listen = if config.alltalk { Listen::Yes } else { Listen::Default };
        Some(
            pairs(roster)
                .map(|(receiver, sender)| VoiceOverride {
                    receiver,
                    sender,
                    listen,
                })
                .collect(),
        )
    }

    /// Round over: everyone hears every unmuted sender.
    pub fn round_end<H: Host + ?Sized>(&self, roster: &Roster, host: &H) -> Vec<VoiceOverride> {
        if !self.enabled {
            return Vec::new();
        }

        pairs(roster)
            .filter(|&(_, sender)| !host.is_voice_muted(sender))
            .map(|(receiver, sender)| VoiceOverride {
                receiver,
                sender,
                listen: Listen::Yes,
            })
            .collect()
    }

    /// Restrict `id` to their own side. Muted senders are left untouched.
    pub fn client_update<H: Host + ?Sized>(
        &self,
        config: &VoiceConfig,
        roster: &Roster,
        host: &H,
        id: StableId,
    ) -> Option<VoiceUpdate> {
        if !self.enabled {
            return None;
        }
        let infected = roster.get(id)?.is_infected();

        let mut update = VoiceUpdate {
            mute_listening: config.zombies_mute.then_some(infected),
            overrides: Vec::new(),
        };

        for other in roster.iter().filter(|s| s.stable_id != id) {
            let listen = if other.is_infected() == infected { Listen::Yes } else { Listen::No };
            if !host.is_voice_muted(other.stable_id) {
                update.overrides.push(VoiceOverride { receiver: id, sender: other.stable_id, listen });
            }
            if !host.is_voice_muted(id) {
                update.overrides.push(VoiceOverride { receiver: other.stable_id, sender: id, listen });
            }
        }

        Some(update)
    }
}

/// Every ordered (receiver, sender) pair of distinct players.
fn pairs(roster: &Roster) -> impl Iterator<Item = (StableId, StableId)> + '_ {
    roster.iter().flat_map(move |receiver| {
        roster
            .iter()
            .filter(move |sender| sender.stable_id != receiver.stable_id)
            .map(move |sender| (receiver.stable_id, sender.stable_id))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::identity::Slot;
    use crate::game::session::Faction;
    use crate::game::test_support::TestHost;

    fn roster(factions: &[Faction]) -> (Roster, Vec<StableId>) {
        let mut roster = Roster::new();
        let ids = factions
            .iter()
            .enumerate()
            .map(|(i, faction)| {
                let id = roster.connect(Slot::new(i as u8 + 1).unwrap()).unwrap();
                roster.resolve(id).live().unwrap().faction = *faction;
                id
            })
            .collect();
        (roster, ids)
    }

    fn enabled() -> VoiceState {
        VoiceState { enabled: true }
    }

    #[test]
    fn test_round_start_resets_only_on_change() {
        let (roster, _) = roster(&[Faction::Human, Faction::Infected, Faction::Human]);
        let mut state = VoiceState::default();
        let config = VoiceConfig::default();

        let reset = state.round_start(&config, &roster).unwrap();
        assert_eq!(reset.len(), 6);
        assert!(reset.iter().all(|o| o.listen == Listen::Default));
        assert!(state.enabled());

        assert!(state.round_start(&config, &roster).is_none());
    }

    #[test]
    fn test_round_start_reset_follows_alltalk() {
        let (roster, _) = roster(&[Faction::Human, Faction::Infected]);
        let mut state = enabled();
        let config = VoiceConfig {
            enabled: false,
            alltalk: true,
            ..VoiceConfig::default()
        };

        let reset = state.round_start(&config, &roster).unwrap();
        assert_eq!(reset.len(), 2);
        assert!(reset.iter().all(|o| o.listen == Listen::Yes));
        assert!(!state.enabled());
    }

    #[test]
    fn test_round_end_all_talk_skips_muted() {
        let (roster, ids) = roster(&[Faction::Human, Faction::Infected, Faction::Elite]);
        let mut host = TestHost::default();
        host.muted.insert(ids[2]);

        let overrides = enabled().round_end(&roster, &host);
        assert_eq!(overrides.len(), 4);
        assert!(overrides.iter().all(|o| o.listen == Listen::Yes && o.sender != ids[2]));

        assert!(VoiceState::default().round_end(&roster, &host).is_empty());
    }

    #[test]
    fn test_client_update_partitions_by_side() {
        let (roster, ids) = roster(&[Faction::Infected, Faction::Elite, Faction::Human, Faction::Survivor]);
        let host = TestHost::default();
        let config = VoiceConfig {
            enabled: true,
            zombies_mute: true,
            alltalk: false,
        };

        let update = enabled().client_update(&config, &roster, &host, ids[0]).unwrap();
        assert_eq!(update.mute_listening, Some(true));
        assert_eq!(update.overrides.len(), 6);

        let hears = |sender| {
            update
                .overrides
                .iter()
                .find(|o| o.receiver == ids[0] && o.sender == sender)
                .map(|o| o.listen)
        };
        assert_eq!(hears(ids[1]), Some(Listen::Yes));
        assert_eq!(hears(ids[2]), Some(Listen::No));
        assert_eq!(hears(ids[3]), Some(Listen::No));
    }

    #[test]
    fn test_client_update_leaves_muted_sender() {
        let (roster, ids) = roster(&[Faction::Human, Faction::Infected]);
        let mut host = TestHost::default();
        host.muted.insert(ids[1]);

        let update = enabled()
            .client_update(&VoiceConfig::default(), &roster, &host, ids[0])
            .unwrap();
        assert_eq!(update.mute_listening, None);
        assert_eq!(
            update.overrides,
            vec![VoiceOverride {
                receiver: ids[1],
                sender: ids[0],
                listen: Listen::No,
            }]
        );
    }
}
