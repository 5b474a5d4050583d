//! Simulation configuration.
//!
//! Every field has a default so a config file only needs the keys it
//! changes. The headless runner applies CLI overrides on top.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::constants::*;
use crate::error::ConfigError;

/// What incoming damage does to a cast in progress
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CastInterruptPolicy {
    /// Casts always finish
    #[default]
    Never,
    /// Any damage that reaches the player cancels the cast
    OnDamage,
}

/// Combat tuning threaded through the damage path
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CombatRules {
    pub respawn_time: f32,
    pub cast_interrupt: CastInterruptPolicy,
}

impl Default for CombatRules {
    fn default() -> Self {
        Self {
            respawn_time: ENEMY_RESPAWN_TIME,
            cast_interrupt: CastInterruptPolicy::Never,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SimConfig {
    pub seed: u64,
    /// Largest step a single frame may simulate
    pub max_dt: f32,
    pub save_interval: f32,
    pub save_path: Option<PathBuf>,
    pub world_size: f32,
    pub cast_interrupt: CastInterruptPolicy,
    /// Nearby patrolling enemies join a fight on initial aggro
    pub group_pull: bool,
    pub enemy_respawn_time: f32,
    /// Directory of JSON definition files overriding the builtin content
    pub content_dir: Option<PathBuf>,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            seed: 1337,
            max_dt: MAX_FRAME_DT,
            save_interval: AUTOSAVE_INTERVAL,
            save_path: None,
            world_size: WORLD_SIZE,
            cast_interrupt: CastInterruptPolicy::Never,
            group_pull: true,
            enemy_respawn_time: ENEMY_RESPAWN_TIME,
            content_dir: None,
        }
    }
}

impl SimConfig {
    /// Read and validate a JSON config file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let raw = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config: SimConfig = serde_json::from_str(&raw)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let positive = [
            ("max_dt", self.max_dt),
            ("save_interval", self.save_interval),
            ("world_size", self.world_size),
            ("enemy_respawn_time", self.enemy_respawn_time),
        ];
        for (field, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                return Err(ConfigError::Invalid {
                    field,
                    reason: format!("must be positive, got {value}"),
                });
            }
        }
        Ok(())
    }

    pub fn combat_rules(&self) -> CombatRules {
        CombatRules {
            respawn_time: self.enemy_respawn_time,
            cast_interrupt: self.cast_interrupt,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sim.json");
        fs::write(&path, r#"{ "seed": 42, "castInterrupt": "onDamage" }"#).unwrap();

        let config = SimConfig::load(&path).unwrap();
        assert_eq!(config.seed, 42);
        assert_eq!(config.cast_interrupt, CastInterruptPolicy::OnDamage);
        assert_eq!(config.world_size, WORLD_SIZE);
        assert!(config.group_pull);
    }

    #[test]
    fn test_invalid_values_rejected() {
        let config = SimConfig {
            max_dt: 0.0,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Invalid { field: "max_dt", .. })
        ));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = SimConfig::load(&dir.path().join("absent.json"));
        assert!(matches!(result, Err(ConfigError::Io { .. })));
    }
}
