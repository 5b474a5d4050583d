//! Error types for the fallible edges of the simulation.
//!
//! Gameplay validation (not enough mana, out of range, ...) is never an
//! error; those paths return outcome enums. These types cover loading
//! content, config and saves, and a tick that cannot proceed.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ContentError {
    #[error("failed to read content file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse content file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("duplicate {kind} id `{id}`")]
    DuplicateId { kind: &'static str, id: String },
}

#[derive(Debug, Error)]
pub enum SaveError {
    #[error("save file io error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("save payload is corrupt: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("no player entity to snapshot")]
    MissingPlayer,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid config value for `{field}`: {reason}")]
    Invalid { field: &'static str, reason: String },
}

#[derive(Debug, Error)]
pub enum SimError {
    #[error("player entity is missing required component `{0}`")]
    MissingPlayer(&'static str),
    #[error("simulation panicked: {0}")]
    Panicked(String),
}
