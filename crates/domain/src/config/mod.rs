mod logging;
mod scheduler;

pub use logging::*;
pub use scheduler::*;

use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::Result;

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Top-level config
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub scheduler: SchedulerConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Read `path` as TOML. A missing file yields the defaults.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::debug!(path = %path.display(), "config file not found, using defaults");
            return Ok(Self::default());
        }
        let raw = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&raw)?)
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Config validation
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Ten years; longer horizons are allowed but usually a typo.
const MAX_SENSIBLE_HORIZON_DAYS: u32 = 10 * 366;

/// Severity level for a configuration issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigSeverity {
    Error,
    Warning,
}

/// A single configuration validation issue.
#[derive(Debug, Clone)]
pub struct ConfigError {
    pub severity: ConfigSeverity,
    pub field: String,
    pub message: String,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tag = match self.severity {
            ConfigSeverity::Error => "ERROR",
            ConfigSeverity::Warning => "WARN",
        };
        write!(f, "[{tag}] {}: {}", self.field, self.message)
    }
}

impl Config {
    /// Validate the configuration and return a list of issues.
    ///
    /// Returns an empty vec when everything looks good.
    pub fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();

        if self.scheduler.search_horizon_days == 0 {
            errors.push(ConfigError {
                severity: ConfigSeverity::Error,
                field: "scheduler.search_horizon_days".into(),
                message: "search horizon must be at least 1 day".into(),
            });
        } else if self.scheduler.search_horizon_days > MAX_SENSIBLE_HORIZON_DAYS {
            errors.push(ConfigError {
                severity: ConfigSeverity::Warning,
                field: "scheduler.search_horizon_days".into(),
                message: format!(
                    "{} days is unusually long; unsatisfiable schedules will scan that far",
                    self.scheduler.search_horizon_days
                ),
            });
        }

        if let Err(message) = ck_cron::validate_timezone(&self.scheduler.default_timezone) {
            errors.push(ConfigError {
                severity: ConfigSeverity::Error,
                field: "scheduler.default_timezone".into(),
                message,
            });
        }

        if self.scheduler.preview_count == 0 {
            errors.push(ConfigError {
                severity: ConfigSeverity::Warning,
                field: "scheduler.preview_count".into(),
                message: "`cronkit next` will print nothing without --count".into(),
            });
        }

        if self.logging.filter.trim().is_empty() {
            errors.push(ConfigError {
                severity: ConfigSeverity::Warning,
                field: "logging.filter".into(),
                message: "empty filter disables all logging unless RUST_LOG is set".into(),
            });
        }

        errors
    }
}
