use serde::{Deserialize, Serialize};

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Scheduler
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Next-run computation settings shared by the scheduler and the CLI.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchedulerConfig {
    /// How far ahead (in days) the next-run search scans before giving up.
    #[serde(default = "d_search_horizon_days")]
    pub search_horizon_days: u32,
    /// IANA timezone used for tasks that do not name one.
    #[serde(default = "d_default_timezone")]
    pub default_timezone: String,
    /// Maximum catch-up runs fired per tick under the `catch_up` policy.
    #[serde(default = "d_max_catchup_runs")]
    pub max_catchup_runs: usize,
    /// Number of upcoming runs `cronkit next` prints by default.
    #[serde(default = "d_preview_count")]
    pub preview_count: usize,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            search_horizon_days: d_search_horizon_days(),
            default_timezone: d_default_timezone(),
            max_catchup_runs: d_max_catchup_runs(),
            preview_count: d_preview_count(),
        }
    }
}

impl SchedulerConfig {
    pub fn search_horizon(&self) -> chrono::Duration {
        chrono::Duration::days(i64::from(self.search_horizon_days))
    }

    /// The configured default timezone, or UTC if the name is unknown.
    pub fn default_tz(&self) -> chrono_tz::Tz {
        ck_cron::parse_tz(&self.default_timezone)
    }
}

fn d_search_horizon_days() -> u32 {
    ck_cron::DEFAULT_SEARCH_HORIZON_DAYS as u32
}

fn d_default_timezone() -> String {
    "UTC".into()
}

fn d_max_catchup_runs() -> usize {
    5
}

fn d_preview_count() -> usize {
    5
}
