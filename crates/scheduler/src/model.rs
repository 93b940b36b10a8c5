//! Task data model: the persisted record a caller stores per scheduled task.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Cron behaviour enums
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// What happens when the runner discovers a missed window.
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum MissedPolicy {
    /// Drop the missed run silently.
    Skip,
    /// Fire exactly once, no matter how many windows were missed.
    #[default]
    RunOnce,
    /// Fire once for every missed window (with back-off cap).
    CatchUp,
}

const MAX_COOLDOWN_MINUTES: u64 = 24 * 60;

/// Back-off after `consecutive_failures` failed runs: 2^(n-1) minutes,
/// capped at one day. Zero failures means no cooldown.
pub fn cooldown_minutes(consecutive_failures: u32) -> u64 {
    match consecutive_failures {
        0 => 0,
        n => 2u64.saturating_pow(n - 1).min(MAX_COOLDOWN_MINUTES),
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Task model
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

fn default_timezone() -> String {
    "UTC".into()
}

/// Scheduled task record. `status` is NOT stored; it is derived from
/// `enabled` + `consecutive_failures` via [`Task::computed_status`].
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Task {
    pub id: Uuid,
    pub name: String,
    /// Cron expression: "minute hour dom month dow" (5-field)
    pub schedule: String,
    /// IANA timezone the schedule is evaluated in.
    #[serde(default = "default_timezone")]
    pub timezone: String,
    pub enabled: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default)]
    pub last_run_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub next_run_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub missed_policy: MissedPolicy,

    // ── Error tracking ───────────────────────────────────────────────
    #[serde(default)]
    pub last_error: Option<String>,
    #[serde(default)]
    pub last_error_at: Option<DateTime<Utc>>,
    /// Number of consecutive failed runs (resets on success).
    #[serde(default)]
    pub consecutive_failures: u32,
    /// Task is in cooldown until this time (exponential back-off).
    #[serde(default)]
    pub cooldown_until: Option<DateTime<Utc>>,

    /// Total number of completed runs.
    #[serde(default)]
    pub total_runs: u64,
}

impl Task {
    /// A fresh, enabled task. `next_run_at` is filled in by the scheduler.
    pub fn new(
        name: impl Into<String>,
        schedule: impl Into<String>,
        timezone: impl Into<String>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            schedule: schedule.into(),
            timezone: timezone.into(),
            enabled: true,
            created_at: now,
            updated_at: now,
            last_run_at: None,
            next_run_at: None,
            missed_policy: MissedPolicy::default(),
            last_error: None,
            last_error_at: None,
            consecutive_failures: 0,
            cooldown_until: None,
            total_runs: 0,
        }
    }

    /// Derive status from persisted state. Never stored.
    pub fn computed_status(&self) -> TaskStatus {
        if !self.enabled {
            TaskStatus::Paused
        } else if self.consecutive_failures > 0 {
            TaskStatus::Error
        } else {
            TaskStatus::Active
        }
    }

    /// Build an API-facing view with computed `status`.
    pub fn to_view(&self) -> TaskView {
        TaskView {
            task: self.clone(),
            status: self.computed_status(),
            description: ck_cron::describe_cron(&self.schedule),
        }
    }
}

/// Response wrapper that includes the computed `status` and a friendly label.
#[derive(Clone, Debug, Serialize)]
pub struct TaskView {
    #[serde(flatten)]
    pub task: Task,
    pub status: TaskStatus,
    pub description: String,
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    Active,
    Paused,
    Error,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_task(enabled: bool, consecutive_failures: u32) -> Task {
        let mut t = Task::new("test", "0 * * * *", "UTC");
        t.enabled = enabled;
        t.consecutive_failures = consecutive_failures;
        t
    }

    #[test]
    fn computed_status_active() {
        assert_eq!(test_task(true, 0).computed_status(), TaskStatus::Active);
    }

    #[test]
    fn computed_status_paused() {
        assert_eq!(test_task(false, 0).computed_status(), TaskStatus::Paused);
    }

    #[test]
    fn computed_status_error() {
        assert_eq!(test_task(true, 3).computed_status(), TaskStatus::Error);
    }

    #[test]
    fn computed_status_paused_trumps_error() {
        assert_eq!(test_task(false, 5).computed_status(), TaskStatus::Paused);
    }

    #[test]
    fn view_includes_status_and_description() {
        let mut t = test_task(true, 0);
        t.schedule = "0 9 * * *".into();
        let view = serde_json::to_value(t.to_view()).unwrap();
        assert_eq!(view["status"], "active");
        assert_eq!(view["description"], "Daily at 9:00 AM");
        assert_eq!(view["schedule"], "0 9 * * *");
    }

    #[test]
    fn task_deserializes_with_only_required_fields() {
        let json = serde_json::json!({
            "id": Uuid::new_v4(),
            "name": "legacy",
            "schedule": "0 9 * * *",
            "enabled": true,
            "created_at": "2026-01-01T00:00:00Z",
            "updated_at": "2026-01-01T00:00:00Z",
        });
        let t: Task = serde_json::from_value(json).unwrap();
        assert_eq!(t.timezone, "UTC");
        assert_eq!(t.missed_policy, MissedPolicy::RunOnce);
        assert_eq!(t.consecutive_failures, 0);
        assert!(t.next_run_at.is_none());
        assert!(t.cooldown_until.is_none());
        assert_eq!(t.computed_status(), TaskStatus::Active);
    }

    #[test]
    fn missed_policy_uses_snake_case() {
        assert_eq!(serde_json::to_string(&MissedPolicy::CatchUp).unwrap(), "\"catch_up\"");
        let p: MissedPolicy = serde_json::from_str("\"skip\"").unwrap();
        assert_eq!(p, MissedPolicy::Skip);
    }

    #[test]
    fn cooldown_doubles_until_one_day() {
        let table = [
            (0, 0),
            (1, 1),
            (2, 2),
            (6, 32),
            (11, 1024),
            (12, 24 * 60),
            (64, 24 * 60),
            (u32::MAX, 24 * 60),
        ];
        for (failures, minutes) in table {
            assert_eq!(cooldown_minutes(failures), minutes, "{failures} failures");
        }
    }
}
