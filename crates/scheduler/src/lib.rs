//! Cron-driven task bookkeeping on top of `ck-cron`.
//!
//! The caller owns the [`Task`] records and the clock. [`TaskScheduler`]
//! computes next runs in each task's timezone, decides which tasks are due,
//! applies the missed-run policy, and records outcomes, reporting every
//! change through an [`ActivitySink`].

pub mod activity;
pub mod model;
pub mod runner;

pub use activity::{ActivityEvent, ActivitySink, TracingSink};
pub use model::{cooldown_minutes, MissedPolicy, Task, TaskStatus, TaskView};
pub use runner::{missed_window_count, runs_for_policy, TaskScheduler};
