//! Configuration errors.
//!
//! The simulation itself never fails at runtime; every error type here is
//! raised while loading or validating the static tables, before the first tick.

use std::path::PathBuf;

use thiserror::Error;

use crate::entities::EnemyKind;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("expected {expected} phases, found {found}")]
    PhaseCount { expected: usize, found: usize },

    #[error("phase {index} ({name}): {reason}")]
    InvalidPhase {
        index: usize,
        name: String,
        reason: &'static str,
    },

    #[error("phase {index} weights sum to {sum}, expected 1.0")]
    WeightSum { index: usize, sum: f32 },

    #[error("enemy template {kind:?}: {reason}")]
    InvalidTemplate {
        kind: EnemyKind,
        reason: &'static str,
    },

    #[error("item table: {0}")]
    InvalidItems(&'static str),

    #[error("upgrade catalog: {0}")]
    InvalidUpgrades(&'static str),

    #[error("boss spawn time {boss_time}s must fall inside the {match_duration}s match")]
    BossTime { boss_time: f32, match_duration: f32 },

    #[error("{name} = {value} is out of range")]
    OutOfRange { name: &'static str, value: f32 },
}

pub type ConfigResult<T> = Result<T, ConfigError>;
