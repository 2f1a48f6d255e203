//! Error types for fallible loading paths.
//!
//! Gameplay never signals expected outcomes (cooldowns, empty pools,
//! unknown type ids) through these; they cover configuration, asset and
//! preference I/O only.

use thiserror::Error;

/// Failure to load or validate configuration tables.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("no weapons configured")]
    NoWeapons,

    #[error("duplicate weapon id `{0}`")]
    DuplicateWeapon(String),

    #[error("invalid value for {table}.{field}: {value}")]
    InvalidValue {
        table: String,
        field: &'static str,
        value: f32,
    },
}

/// Failure reported by an external asset or string-table loader.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("asset not found: {0}")]
    NotFound(String),

    #[error("asset I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("asset parse error: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Failure reading or writing the local preference store.
#[derive(Debug, Error)]
pub enum PreferenceError {
    #[error("preference I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("preference parse error: {0}")]
    Parse(#[from] serde_json::Error),
}
