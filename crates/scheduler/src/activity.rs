//! Activity notifications emitted whenever the scheduler changes a task.

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ActivityEvent {
    TaskScheduled {
        task_id: Uuid,
        next_run_at: Option<DateTime<Utc>>,
    },
    TaskSucceeded {
        task_id: Uuid,
        ran_at: DateTime<Utc>,
        next_run_at: Option<DateTime<Utc>>,
    },
    TaskFailed {
        task_id: Uuid,
        error: String,
        consecutive_failures: u32,
        cooldown_until: Option<DateTime<Utc>>,
    },
    TaskDisabled {
        task_id: Uuid,
        reason: String,
    },
}

/// Receiver for [`ActivityEvent`]s. Implementations must not block.
pub trait ActivitySink {
    fn notify(&self, event: ActivityEvent);
}

impl<S: ActivitySink + ?Sized> ActivitySink for &S {
    fn notify(&self, event: ActivityEvent) {
        (**self).notify(event)
    }
}

/// Forwards events to `tracing`: failures and disables at `warn`, the rest
/// at `info`.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl ActivitySink for TracingSink {
    fn notify(&self, event: ActivityEvent) {
        match &event {
            ActivityEvent::TaskScheduled {
                task_id,
                next_run_at,
            } => {
                tracing::info!(%task_id, next_run_at = ?next_run_at, "task scheduled");
            }
            ActivityEvent::TaskSucceeded {
                task_id,
                ran_at,
                next_run_at,
            } => {
                tracing::info!(%task_id, %ran_at, next_run_at = ?next_run_at, "task succeeded");
            }
            ActivityEvent::TaskFailed {
                task_id,
                error,
                consecutive_failures,
                cooldown_until,
            } => {
                tracing::warn!(
                    %task_id,
                    error = %error,
                    consecutive_failures,
                    cooldown_until = ?cooldown_until,
                    "task failed"
                );
            }
            ActivityEvent::TaskDisabled { task_id, reason } => {
                tracing::warn!(%task_id, reason = %reason, "task disabled");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn events_serialize_with_type_tag() {
        let id = Uuid::new_v4();
        let json = serde_json::to_value(ActivityEvent::TaskDisabled {
            task_id: id,
            reason: "bad".into(),
        })
        .unwrap();
        assert_eq!(json["type"], "task_disabled");
        assert_eq!(json["task_id"], id.to_string());
        assert_eq!(json["reason"], "bad");
    }

    #[test]
    fn tracing_sink_accepts_every_event() {
        let id = Uuid::new_v4();
        let now = Utc::now();
        let sink = TracingSink;
        sink.notify(ActivityEvent::TaskScheduled {
            task_id: id,
            next_run_at: Some(now),
        });
        sink.notify(ActivityEvent::TaskSucceeded {
            task_id: id,
            ran_at: now,
            next_run_at: None,
        });
        sink.notify(ActivityEvent::TaskFailed {
            task_id: id,
            error: "boom".into(),
            consecutive_failures: 1,
            cooldown_until: None,
        });
        (&sink).notify(ActivityEvent::TaskDisabled {
            task_id: id,
            reason: "x".into(),
        });
    }
}
