//! Environment-derived settings.

use std::env;
use std::path::PathBuf;
use std::time::Duration;
use tracing::warn;

/// Optional key for a language-model backed parser.
pub const API_KEY_VAR: &str = "GEMINI_API_KEY";

/// Explicit engine executable, checked before the search order.
pub const ENGINE_OVERRIDE_VAR: &str = "SMARTFILECMD_ENGINE";

/// Upper bound for one engine exchange, in whole seconds.
pub const TIMEOUT_VAR: &str = "SMARTFILECMD_TIMEOUT_SECS";

/// `tracing` filter directives for the CLI.
pub const LOG_FILTER_VAR: &str = "SMARTFILECMD_LOG";

pub const DEFAULT_ENGINE_TIMEOUT: Duration = Duration::from_secs(300);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub api_key: Option<String>,
    pub engine_override: Option<PathBuf>,
    pub engine_timeout: Duration,
    pub log_filter: Option<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_key: None,
            engine_override: None,
            engine_timeout: DEFAULT_ENGINE_TIMEOUT,
            log_filter: None,
        }
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|value| !value.trim().is_empty())
}

/// Log filter directives alone, so a subscriber can be installed before
/// the remaining settings are parsed and report on them.
pub fn log_filter_from_env() -> Option<String> {
    non_blank(env::var(LOG_FILTER_VAR).ok())
}

impl Settings {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds settings from an arbitrary variable lookup. Blank values count
    /// as unset.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |key: &str| non_blank(lookup(key));

        let engine_timeout = match read(TIMEOUT_VAR) {
            Some(raw) => match raw.trim().parse::<u64>() {
                Ok(secs) if secs > 0 => Duration::from_secs(secs),
                _ => {
                    warn!(value = %raw, "ignoring invalid {TIMEOUT_VAR}");
                    DEFAULT_ENGINE_TIMEOUT
                }
            },
            None => DEFAULT_ENGINE_TIMEOUT,
        };

        Self {
            api_key: read(API_KEY_VAR),
            engine_override: read(ENGINE_OVERRIDE_VAR).map(PathBuf::from),
            engine_timeout,
            log_filter: read(LOG_FILTER_VAR),
        }
    }
}
