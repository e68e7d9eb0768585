//! Engine configuration loaded from the environment.
//!
//! A `.env` file in the working directory is honored when present. Values
//! that fail to parse fall back to their defaults with a warning.

use std::str::FromStr;
use std::time::Duration;

const DEFAULT_DB_PATH: &str = "xregions.db";
const DEFAULT_TICK_INTERVAL_MS: u64 = 1000;
const DEFAULT_EVENT_BUFFER: usize = 256;
const DEFAULT_COMMAND_SPECIFIER: &str = "/";

/// Runtime settings for the policy engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineConfig {
    /// SQLite database file holding the policy tables.
    pub db_path: String,
    /// Minimum wall-clock spacing between two world-tick scans.
    pub tick_interval: Duration,
    /// Stop the world-tick scan after the first suppressed mob, as the
    /// earlier releases did. Off by default: every candidate is scanned.
    pub tick_stop_after_first_suppression: bool,
    /// Capacity of the host event channel.
    pub event_buffer: usize,
    /// Prefix shown in syntax hints (`/xregion help`).
    pub command_specifier: String,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            db_path: DEFAULT_DB_PATH.to_string(),
            tick_interval: Duration::from_millis(DEFAULT_TICK_INTERVAL_MS),
            tick_stop_after_first_suppression: false,
            event_buffer: DEFAULT_EVENT_BUFFER,
            command_specifier: DEFAULT_COMMAND_SPECIFIER.to_string(),
        }
    }
}

impl EngineConfig {
    /// Load from process environment (after reading `.env` if present).
    pub fn from_env() -> Self {
        if let Err(e) = dotenvy::dotenv() {
            tracing::debug!(error = %e, "No .env file loaded");
        }
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load using an arbitrary key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();

        let db_path = lookup("XREGIONS_DB")
            .filter(|v| !v.trim().is_empty())
            .unwrap_or(defaults.db_path);
        let tick_interval_ms = parse_or(
            &lookup,
            "XREGIONS_TICK_INTERVAL_MS",
            DEFAULT_TICK_INTERVAL_MS,
        );
        let tick_stop_after_first_suppression =
            parse_or(&lookup, "XREGIONS_TICK_STOP_AFTER_FIRST", false);
        let event_buffer = parse_or(&lookup, "XREGIONS_EVENT_BUFFER", DEFAULT_EVENT_BUFFER).max(1);
        let command_specifier = lookup("XREGIONS_COMMAND_SPECIFIER")
            .filter(|v| !v.is_empty())
            .unwrap_or(defaults.command_specifier);

        Self {
            db_path,
            tick_interval: Duration::from_millis(tick_interval_ms),
            tick_stop_after_first_suppression,
            event_buffer,
            command_specifier,
        }
    }
}

fn parse_or<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> T
where
    T: FromStr + Copy + std::fmt::Debug,
{
    match lookup(key) {
        None => default,
        Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
            tracing::warn!(key, value = %raw, default = ?default, "Invalid config value, using default");
            default
        }),
    }
}
