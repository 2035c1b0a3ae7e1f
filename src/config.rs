//! Environment configuration for terminal primitives and logging.

use std::env;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnvConfig {
    /// Route tracing output to this file instead of stderr.
    pub log_file: Option<String>,
    /// Read confirmation keys without entering raw mode.
    pub cooked_keys: bool,
}

impl EnvConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the config from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        Self {
            log_file: string_opt(lookup("AGENT_TERM_LOG_FILE")),
            cooked_keys: flag(lookup("AGENT_TERM_COOKED_KEYS")),
        }
    }
}

fn flag(value: Option<String>) -> bool {
    value.map(|value| value == "1").unwrap_or(false)
}

fn string_opt(value: Option<String>) -> Option<String> {
    value.and_then(|value| {
        if value.trim().is_empty() {
            None
        } else {
            Some(value)
        }
    })
}
