//! Engine settings loaded from the environment.

use std::str::FromStr;
use std::time::Duration;

use whackbet_domain::MIN_PLAYERS;

pub const FIELD_SIZE_VAR: &str = "WHACKBET_FIELD_SIZE";
pub const MAX_PLAYERS_VAR: &str = "WHACKBET_MAX_PLAYERS";
pub const RELOCATION_INTERVAL_VAR: &str = "WHACKBET_RELOCATION_INTERVAL_MS";
pub const EVENT_CHANNEL_CAPACITY_VAR: &str = "WHACKBET_EVENT_CHANNEL_CAPACITY";

/// Settings errors.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum SettingsError {
    #[error("{key}={value:?} is invalid: {reason}")]
    Invalid {
        key: &'static str,
        value: String,
        reason: &'static str,
    },
}

/// Runtime tunables for the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineSettings {
    /// Cells per board.
    pub field_size: u32,
    /// Players needed before a match starts.
    pub max_players: u32,
    /// Pause between marked cell relocations.
    pub relocation_interval: Duration,
    /// Buffered events per bus subscriber.
    pub event_channel_capacity: usize,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            field_size: 9,
            max_players: MIN_PLAYERS,
            relocation_interval: Duration::from_millis(1500),
            event_channel_capacity: 256,
        }
    }
}

impl EngineSettings {
    /// Read settings from process environment variables.
    pub fn from_env() -> Result<Self, SettingsError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read settings through `lookup`; unset keys keep their defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, SettingsError> {
        let defaults = Self::default();

        let field_size = read(
            &lookup,
            FIELD_SIZE_VAR,
            defaults.field_size,
            |size| *size > 1,
            "must be an integer greater than 1",
        )?;
        let max_players = read(
            &lookup,
            MAX_PLAYERS_VAR,
            defaults.max_players,
            |players| *players >= MIN_PLAYERS,
            "must be an integer of at least 2",
        )?;
        let relocation_interval_ms = read(
            &lookup,
            RELOCATION_INTERVAL_VAR,
            defaults.relocation_interval.as_millis() as u64,
            |ms| *ms > 0,
            "must be a positive number of milliseconds",
        )?;
        let event_channel_capacity = read(
            &lookup,
            EVENT_CHANNEL_CAPACITY_VAR,
            defaults.event_channel_capacity,
            |capacity| *capacity > 0,
            "must be a positive integer",
        )?;

        Ok(Self {
            field_size,
            max_players,
            relocation_interval: Duration::from_millis(relocation_interval_ms),
            event_channel_capacity,
        })
    }
}

fn read<T: FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &'static str,
    default: T,
    valid: impl Fn(&T) -> bool,
    reason: &'static str,
) -> Result<T, SettingsError> {
    let Some(raw) = lookup(key) else {
        return Ok(default);
    };

    match raw.trim().parse::<T>() {
        Ok(value) if valid(&value) => Ok(value),
        _ => Err(SettingsError::Invalid {
            key,
            value: raw,
            reason,
        }),
    }
}
