//! `cronkit task`: run an expression through the task scheduler once.

use std::io::Write;

use chrono::{DateTime, Utc};
use serde::Serialize;

use ck_domain::config::SchedulerConfig;
use ck_scheduler::{ActivitySink, MissedPolicy, Task, TaskScheduler, TaskView};

use super::cron::parse_datetime;

#[derive(Debug, Serialize)]
struct TaskReport {
    #[serde(flatten)]
    view: TaskView,
    /// Runs owed at `now` under the missed-run policy.
    runs_to_fire: usize,
}

pub struct TaskArgs<'a> {
    pub expr: &'a str,
    pub tz: Option<&'a str>,
    pub last_run: Option<&'a str>,
    pub now: Option<&'a str>,
    pub policy: MissedPolicy,
}

fn utc_arg(raw: Option<&str>) -> anyhow::Result<Option<DateTime<Utc>>> {
    Ok(raw.map(parse_datetime).transpose()?.map(|t| t.and_utc()))
}

/// Build a throwaway task, schedule it at `now`, and print the resulting
/// view as JSON. An invalid schedule shows up as a paused task with
/// `last_error` set rather than as a command failure.
pub fn run(
    args: TaskArgs<'_>,
    config: &SchedulerConfig,
    sink: impl ActivitySink,
    out: &mut impl Write,
) -> anyhow::Result<()> {
    let now = utc_arg(args.now)?.unwrap_or_else(Utc::now);

    let mut task = Task::new(args.expr, args.expr, args.tz.unwrap_or_default());
    task.missed_policy = args.policy;
    task.last_run_at = utc_arg(args.last_run)?;

    let scheduler = TaskScheduler::new(config.clone(), sink);
    let runs_to_fire = scheduler.runs_to_fire(&task, now);
    scheduler.schedule(&mut task, now);

    let report = TaskReport {
        view: task.to_view(),
        runs_to_fire,
    };
    writeln!(out, "{}", serde_json::to_string_pretty(&report)?)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use ck_scheduler::TracingSink;

    fn report(args: TaskArgs<'_>) -> serde_json::Value {
        let mut out = Vec::new();
        run(args, &SchedulerConfig::default(), TracingSink, &mut out).unwrap();
        serde_json::from_slice(&out).unwrap()
    }

    #[test]
    fn reports_next_run_and_description() {
        let json = report(TaskArgs {
            expr: "0 9 * * *",
            tz: Some("Asia/Tokyo"),
            last_run: None,
            now: Some("2026-01-19T00:30"),
            policy: MissedPolicy::RunOnce,
        });
        assert_eq!(json["status"], "active");
        assert_eq!(json["description"], "Daily at 9:00 AM");
        assert_eq!(json["timezone"], "Asia/Tokyo");
        assert_eq!(json["next_run_at"], "2026-01-20T00:00:00Z");
        assert_eq!(json["runs_to_fire"], 1);
    }

    #[test]
    fn catch_up_counts_missed_windows() {
        let json = report(TaskArgs {
            expr: "0 * * * *",
            tz: None,
            last_run: Some("2026-01-19T10:00"),
            now: Some("2026-01-19T13:30"),
            policy: MissedPolicy::CatchUp,
        });
        assert_eq!(json["runs_to_fire"], 3);
        assert_eq!(json["missed_policy"], "catch_up");
    }

    #[test]
    fn invalid_schedule_reports_paused_task() {
        let json = report(TaskArgs {
            expr: "61 * * * *",
            tz: None,
            last_run: None,
            now: Some("2026-01-19T10:00"),
            policy: MissedPolicy::RunOnce,
        });
        assert_eq!(json["status"], "paused");
        assert_eq!(json["enabled"], false);
        assert!(json["last_error"].as_str().unwrap().contains("minute"));
        assert_eq!(json["runs_to_fire"], 0);
        assert_eq!(json["description"], "61 * * * *");
    }

    #[test]
    fn bad_now_is_an_error() {
        let mut out = Vec::new();
        let args = TaskArgs {
            expr: "0 * * * *",
            tz: None,
            last_run: None,
            now: Some("yesterday"),
            policy: MissedPolicy::Skip,
        };
        assert!(run(args, &SchedulerConfig::default(), TracingSink, &mut out).is_err());
    }
}
