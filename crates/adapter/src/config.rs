//! Environment configuration shared by the binaries
//!
//! | Variable | Default |
//! |----------|---------|
//! | `CASCADE_WIDTH` | 8 |
//! | `CASCADE_HEIGHT` | 8 |
//! | `CASCADE_BLOCKER_ROWS` | 4 |
//! | `CASCADE_MOVES` | 30 |
//! | `CASCADE_PALETTE` | 5 |
//! | `CASCADE_SEED` | 1 |
//! | `CASCADE_ADAPTER_LOG_PATH` | unset (no wire log) |
//!
//! Unparseable values fall back to their default. A combination that fails
//! [`SessionConfig::validate`] falls back to the default session entirely.

use std::str::FromStr;

use tracing::warn;

use crate::core::SessionConfig;

/// Adapter configuration
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AdapterConfig {
    pub session: SessionConfig,
    /// Append every line read and written to this file
    pub log_path: Option<String>,
}

impl AdapterConfig {
    /// Create from environment variables
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`from_env`](Self::from_env) with an explicit variable source
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let log_path = lookup("CASCADE_ADAPTER_LOG_PATH")
            .map(|s| s.trim().to_string())
            .and_then(|s| if s.is_empty() { None } else { Some(s) });

        Self {
            session: session_config_from_lookup(lookup),
            log_path,
        }
    }
}

/// Session parameters from `CASCADE_*` environment variables
pub fn session_config_from_env() -> SessionConfig {
    session_config_from_lookup(|key| std::env::var(key).ok())
}

pub fn session_config_from_lookup(lookup: impl Fn(&str) -> Option<String>) -> SessionConfig {
    fn parsed<T: FromStr>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> T {
        lookup(key)
            .and_then(|s| s.trim().parse().ok())
            .unwrap_or(default)
    }

    let d = SessionConfig::default();
    let config = SessionConfig {
        width: parsed(&lookup, "CASCADE_WIDTH", d.width),
        height: parsed(&lookup, "CASCADE_HEIGHT", d.height),
        blocker_rows: parsed(&lookup, "CASCADE_BLOCKER_ROWS", d.blocker_rows),
        move_budget: parsed(&lookup, "CASCADE_MOVES", d.move_budget),
        palette_size: parsed(&lookup, "CASCADE_PALETTE", d.palette_size),
        seed: parsed(&lookup, "CASCADE_SEED", d.seed),
    };

    match config.validate() {
        Ok(()) => config,
        Err(e) => {
            warn!(error = %e, "ignoring session overrides");
            d
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_without_variables() {
        let config = AdapterConfig::from_lookup(lookup(&[]));
        assert_eq!(config, AdapterConfig::default());
    }

    #[test]
    fn test_overrides_are_applied() {
        let config = session_config_from_lookup(lookup(&[
            ("CASCADE_WIDTH", "10"),
            ("CASCADE_MOVES", " 12 "),
            ("CASCADE_SEED", "99"),
        ]));
        assert_eq!(config.width, 10);
        assert_eq!(config.move_budget, 12);
        assert_eq!(config.seed, 99);
        assert_eq!(config.height, 8);
    }

    #[test]
    fn test_unparseable_value_keeps_default() {
        let config = session_config_from_lookup(lookup(&[("CASCADE_PALETTE", "lots")]));
        assert_eq!(config.palette_size, 5);
    }

    #[test]
    fn test_invalid_combination_falls_back() {
        let config = session_config_from_lookup(lookup(&[
            ("CASCADE_HEIGHT", "3"),
            ("CASCADE_BLOCKER_ROWS", "3"),
            ("CASCADE_SEED", "7"),
        ]));
        assert_eq!(config, SessionConfig::default());
    }

    #[test]
    fn test_blank_log_path_is_ignored() {
        let config = AdapterConfig::from_lookup(lookup(&[("CASCADE_ADAPTER_LOG_PATH", "  ")]));
        assert_eq!(config.log_path, None);
        let config =
            AdapterConfig::from_lookup(lookup(&[("CASCADE_ADAPTER_LOG_PATH", "/tmp/wire.log")]));
        assert_eq!(config.log_path.as_deref(), Some("/tmp/wire.log"));
    }
}
