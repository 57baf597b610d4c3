//! Mutator Configuration
//!
//! Server-side switches for the skill and regeneration core, loadable from
//! JSON. Missing keys fall back to the defaults below.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::TICK_RATE;

/// Highest accepted frame rate (Hz). Keeps a frame at least 1 ms long.
pub const MAX_TICK_RATE: u32 = 1_000;

/// Voice partition settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct VoiceConfig {
    /// Split voice between infected and humans.
    pub enabled: bool,
    /// Infected players cannot hear anyone.
    pub zombies_mute: bool,
    /// Engine all-talk: a voice reset lets everyone hear everyone instead
    /// of falling back to team rules.
    pub alltalk: bool,
}

impl Default for VoiceConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            zombies_mute: false,
            alltalk: false,
        }
    }
}

/// Configuration for the mutator core.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MutatorConfig {
    /// Infected players regenerate health while stationary.
    pub regen_enabled: bool,
    /// Swallow the drop command for survivors.
    pub block_survivor_drop: bool,
    /// Server frames per second.
    pub tick_rate: u32,
    /// Voice partition settings.
    pub voice: VoiceConfig,
}

impl Default for MutatorConfig {
    fn default() -> Self {
        Self {
            regen_enabled: true,
            block_survivor_drop: false,
            tick_rate: TICK_RATE,
            voice: VoiceConfig::default(),
        }
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Config file could not be read.
    #[error("failed to read {}: {source}", .path.display())]
    Io {
        /// File that failed.
        path: PathBuf,
        /// Underlying error.
        source: std::io::Error,
    },

    /// Config is not valid JSON for [`MutatorConfig`].
    #[error("invalid config: {0}")]
    Parse(#[from] serde_json::Error),

    /// Tick rate outside 1..=[`MAX_TICK_RATE`].
    #[error("tick rate {0} must be between 1 and {max}", max = MAX_TICK_RATE)]
    InvalidTickRate(u32),
}

impl MutatorConfig {
    /// Parse from a JSON string.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Read and parse a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&json)
    }

    /// Check value ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.tick_rate == 0 || self.tick_rate > MAX_TICK_RATE {
            return Err(ConfigError::InvalidTickRate(self.tick_rate));
        }
        Ok(())
    }

    /// Length of one server frame.
    pub fn frame_duration(&self) -> Duration {
        Duration::from_micros(1_000_000 / self.tick_rate.clamp(1, MAX_TICK_RATE) as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = MutatorConfig::default();
        assert!(config.regen_enabled);
        assert!(!config.block_survivor_drop);
        assert_eq!(config.tick_rate, TICK_RATE);
        assert!(config.voice.enabled);
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config = MutatorConfig::from_json_str(
            r#"{ "regen_enabled": false, "voice": { "zombies_mute": true } }"#,
        )
        .unwrap();

        assert!(!config.regen_enabled);
        assert!(config.voice.zombies_mute);
        assert!(config.voice.enabled);
        assert_eq!(config.tick_rate, TICK_RATE);
    }

    #[test]
    fn test_invalid_config() {
        assert!(matches!(
            MutatorConfig::from_json_str(r#"{ "tick_rate": 0 }"#),
            Err(ConfigError::InvalidTickRate(0))
        ));
        assert!(matches!(
            MutatorConfig::from_json_str(r#"{ "tick_rate": 2000000 }"#),
            Err(ConfigError::InvalidTickRate(2_000_000))
        ));
        assert!(matches!(
            MutatorConfig::from_json_str("not json"),
            Err(ConfigError::Parse(_))
        ));
        assert!(matches!(
            MutatorConfig::load("/nonexistent/plague-skills.json"),
            Err(ConfigError::Io { .. })
        ));
    }

    #[test]
    fn test_frame_duration() {
        let config = MutatorConfig {
            tick_rate: 100,
            ..MutatorConfig::default()
        };
        assert_eq!(config.frame_duration(), Duration::from_millis(10));

        let fastest = MutatorConfig {
            tick_rate: MAX_TICK_RATE,
            ..MutatorConfig::default()
        };
        assert!(fastest.validate().is_ok());
        assert_eq!(fastest.frame_duration(), Duration::from_millis(1));
    }
}
