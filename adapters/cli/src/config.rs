//! Optional TOML configuration for unit strength and the boost search.

use std::{
    fs, io,
    path::{Path, PathBuf},
};

use serde::Deserialize;
use skirmish_core::{AttackPower, Faction, HitPoints, DEFAULT_ATTACK_POWER, DEFAULT_HIT_POINTS};
use thiserror::Error;

/// Errors raised while loading a configuration file.
#[derive(Debug, Error)]
pub(crate) enum ConfigError {
    /// The file could not be read.
    #[error("could not read {}", .path.display())]
    Read {
        /// File that was requested.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: io::Error,
    },
    /// The file is not valid configuration TOML.
    #[error("could not parse {}", .path.display())]
    Parse {
        /// File that was requested.
        path: PathBuf,
        /// Underlying parse failure.
        #[source]
        source: toml::de::Error,
    },
    /// A value parsed but cannot drive a battle.
    #[error("{field} must be greater than zero")]
    Zero {
        /// Offending key.
        field: &'static str,
    },
}

/// Settings applied to every battle the binary plays.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct SkirmishConfig {
    /// Starting hit points of every unit.
    pub(crate) hit_points: u32,
    /// Base attack power of every unit.
    pub(crate) attack_power: u32,
    /// Faction whose attack power the boost search raises.
    pub(crate) boosted_faction: Faction,
    /// Largest boost the search may try.
    pub(crate) boost_ceiling: Option<u32>,
}

impl Default for SkirmishConfig {
    fn default() -> Self {
        Self {
            hit_points: DEFAULT_HIT_POINTS.get(),
            attack_power: DEFAULT_ATTACK_POWER.get(),
            boosted_faction: Faction::Elf,
            boost_ceiling: None,
        }
    }
}

impl SkirmishConfig {
    /// Reads and validates the configuration stored at `path`.
    pub(crate) fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_owned(),
            source,
        })?;
        let config: Self = toml::from_str(&contents).map_err(|source| ConfigError::Parse {
            path: path.to_owned(),
            source,
        })?;
        config.validate()
    }

    fn validate(self) -> Result<Self, ConfigError> {
        if self.hit_points == 0 {
            return Err(ConfigError::Zero {
                field: "hit_points",
            });
        }
        if self.attack_power == 0 {
            return Err(ConfigError::Zero {
                field: "attack_power",
            });
        }
        Ok(self)
    }

    /// Starting hit points as a typed value.
    #[must_use]
    pub(crate) const fn hit_points(&self) -> HitPoints {
        HitPoints::new(self.hit_points)
    }

    /// Base attack power as a typed value.
    #[must_use]
    pub(crate) const fn attack_power(&self) -> AttackPower {
        AttackPower::new(self.attack_power)
    }
}
