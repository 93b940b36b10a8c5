//! Task runner bookkeeping: next-run computation, due evaluation, missed-run
//! policy, and success/failure recording.

use chrono::{DateTime, Duration, Utc};

use ck_cron::CronExpression;
use ck_domain::config::SchedulerConfig;

use crate::activity::{ActivityEvent, ActivitySink};
use crate::model::{cooldown_minutes, MissedPolicy, Task};

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Missed-run calculation
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Count how many cron windows were missed between `last_run_at` and `now`.
/// Stops counting once it passes `max_catchup`.
pub fn missed_window_count(
    expr: &CronExpression,
    tz: chrono_tz::Tz,
    last_run_at: Option<DateTime<Utc>>,
    now: &DateTime<Utc>,
    max_catchup: usize,
    horizon: Duration,
) -> usize {
    let anchor = match last_run_at {
        Some(t) => t,
        None => return 1, // Never run: treat as one missed window.
    };
    let mut count = 0usize;
    let mut cursor = anchor;
    loop {
        match expr.next_after_tz_within(&cursor, tz, horizon) {
            Some(next) if next <= *now => {
                count += 1;
                cursor = next;
                if count > max_catchup {
                    break;
                }
            }
            _ => break,
        }
    }
    count
}

/// Determine how many runs to fire for `missed` windows under `policy`.
pub fn runs_for_policy(policy: MissedPolicy, missed: usize, max_catchup: usize) -> usize {
    match policy {
        MissedPolicy::Skip => {
            if missed > 1 {
                0
            } else {
                missed
            }
        }
        MissedPolicy::RunOnce => missed.min(1),
        MissedPolicy::CatchUp => missed.min(max_catchup),
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// TaskScheduler
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Applies cron schedules to [`Task`] records owned by the caller.
///
/// Holds no task state of its own; every method takes the task and the
/// current instant explicitly.
pub struct TaskScheduler<S> {
    config: SchedulerConfig,
    sink: S,
}

impl<S: ActivitySink> TaskScheduler<S> {
    pub fn new(config: SchedulerConfig, sink: S) -> Self {
        Self { config, sink }
    }

    pub fn config(&self) -> &SchedulerConfig {
        &self.config
    }

    /// Compute and store `next_run_at` for `task`. Disables the task if its
    /// schedule or timezone is invalid.
    pub fn schedule(&self, task: &mut Task, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
        let next = self.refresh_next_run(task, now);
        if task.enabled {
            self.sink.notify(ActivityEvent::TaskScheduled {
                task_id: task.id,
                next_run_at: next,
            });
        }
        next
    }

    /// Whether `task` should fire at `now`.
    pub fn is_due(&self, task: &Task, now: DateTime<Utc>) -> bool {
        task.enabled
            && task.next_run_at.is_some_and(|next| next <= now)
            && task.cooldown_until.map_or(true, |until| until <= now)
    }

    pub fn due<'t>(&self, tasks: &'t [Task], now: DateTime<Utc>) -> Vec<&'t Task> {
        tasks.iter().filter(|t| self.is_due(t, now)).collect()
    }

    /// How many runs to fire for `task` at `now`, per its missed policy.
    pub fn runs_to_fire(&self, task: &Task, now: DateTime<Utc>) -> usize {
        let (Ok(expr), Ok(tz)) = (CronExpression::parse(&task.schedule), self.tz_for(task)) else {
            return 0;
        };
        let max = self.config.max_catchup_runs;
        let missed = missed_window_count(
            &expr,
            tz,
            task.last_run_at,
            &now,
            max,
            self.config.search_horizon(),
        );
        runs_for_policy(task.missed_policy, missed, max)
    }

    /// Record a successful run at `now` and schedule the next one.
    pub fn record_success(&self, task: &mut Task, now: DateTime<Utc>) {
        task.last_run_at = Some(now);
        task.total_runs += 1;
        task.consecutive_failures = 0;
        task.last_error = None;
        task.last_error_at = None;
        task.cooldown_until = None;

        let next = self.refresh_next_run(task, now);
        if task.enabled {
            self.sink.notify(ActivityEvent::TaskSucceeded {
                task_id: task.id,
                ran_at: now,
                next_run_at: next,
            });
        }
    }

    /// Record a failed run at `now`: bump the failure count, start the
    /// exponential cooldown, and schedule the next run.
    pub fn record_failure(&self, task: &mut Task, now: DateTime<Utc>, error: impl Into<String>) {
        let error = error.into();
        task.last_run_at = Some(now);
        task.total_runs += 1;
        task.consecutive_failures = task.consecutive_failures.saturating_add(1);
        task.last_error = Some(error.clone());
        task.last_error_at = Some(now);
        let cooldown = cooldown_minutes(task.consecutive_failures) as i64;
        task.cooldown_until = Some(now + Duration::minutes(cooldown));

        self.refresh_next_run(task, now);
        if task.enabled {
            self.sink.notify(ActivityEvent::TaskFailed {
                task_id: task.id,
                error,
                consecutive_failures: task.consecutive_failures,
                cooldown_until: task.cooldown_until,
            });
        }
    }

    /// Pause or resume `task`. Resuming recomputes the next run.
    pub fn set_enabled(&self, task: &mut Task, enabled: bool, now: DateTime<Utc>) {
        if enabled {
            task.enabled = true;
            self.schedule(task, now);
        } else if task.enabled {
            task.enabled = false;
            task.next_run_at = None;
            task.updated_at = now;
            self.sink.notify(ActivityEvent::TaskDisabled {
                task_id: task.id,
                reason: "paused".into(),
            });
        }
    }

    fn refresh_next_run(&self, task: &mut Task, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
        task.updated_at = now;
        if !task.enabled {
            task.next_run_at = None;
            return None;
        }
        let expr = match CronExpression::parse(&task.schedule) {
            Ok(expr) => expr,
            Err(e) => {
                self.disable(task, now, format!("invalid schedule: {e}"));
                return None;
            }
        };
        let tz = match self.tz_for(task) {
            Ok(tz) => tz,
            Err(e) => {
                self.disable(task, now, e);
                return None;
            }
        };
        task.next_run_at = expr.next_after_tz_within(&now, tz, self.config.search_horizon());
        if task.next_run_at.is_none() {
            tracing::debug!(
                task_id = %task.id,
                schedule = %task.schedule,
                "no run within search horizon"
            );
        }
        task.next_run_at
    }

    fn tz_for(&self, task: &Task) -> Result<chrono_tz::Tz, String> {
        if task.timezone.is_empty() {
            return Ok(self.config.default_tz());
        }
        ck_cron::validate_timezone(&task.timezone)?;
        Ok(ck_cron::parse_tz(&task.timezone))
    }

    fn disable(&self, task: &mut Task, now: DateTime<Utc>, reason: String) {
        tracing::debug!(task_id = %task.id, schedule = %task.schedule, %reason, "disabling task");
        task.enabled = false;
        task.next_run_at = None;
        task.last_error = Some(reason.clone());
        task.last_error_at = Some(now);
        self.sink.notify(ActivityEvent::TaskDisabled {
            task_id: task.id,
            reason,
        });
    }
}
