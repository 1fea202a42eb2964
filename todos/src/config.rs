//! Configuration for the `todos` binary.
//!
//! Loads configuration from environment variables with sensible defaults.
//! Unparseable values fall back to the default.

use crate::view::ViewMode;
use serde::{Deserialize, Serialize};
use std::env;

/// Default log filter when neither `RUST_LOG` nor `TODOS_LOG` is set
pub const DEFAULT_LOG_FILTER: &str = "todos=info,todos_runtime=info";

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Log filter used when `RUST_LOG` is unset
    pub log_filter: String,
    /// View shown at startup
    pub default_view: ViewMode,
    /// Ask before deleting
    pub confirm_delete: bool,
    /// Install a Prometheus recorder for the `metrics` command
    pub metrics: bool,
}

impl Config {
    /// Load configuration from the process environment
    ///
    /// A `.env` file in the working directory is read first, if present.
    #[must_use]
    pub fn from_env() -> Self {
        // Missing .env is the normal case
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        Self {
            log_filter: lookup("TODOS_LOG").unwrap_or(defaults.log_filter),
            default_view: lookup("TODOS_DEFAULT_VIEW")
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.default_view),
            confirm_delete: lookup("TODOS_CONFIRM_DELETE")
                .and_then(|s| s.trim().parse().ok())
                .unwrap_or(defaults.confirm_delete),
            metrics: lookup("TODOS_METRICS")
                .and_then(|s| s.trim().parse().ok())
                .unwrap_or(defaults.metrics),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_filter: DEFAULT_LOG_FILTER.to_string(),
            default_view: ViewMode::All,
            confirm_delete: true,
            metrics: false,
        }
    }
}
