//! Cron expression engine (5-field: min hour dom month dow).
//!
//! ```text
//! ┌───────────── minute (0-59)
//! │ ┌───────────── hour (0-23)
//! │ │ ┌───────────── day of month (1-31)
//! │ │ │ ┌───────────── month (1-12)
//! │ │ │ │ ┌───────────── day of week (0-6, 0 or 7 = Sunday)
//! │ │ │ │ │
//! * * * * *
//! ```
//!
//! Each field accepts `*`, `N`, `A-B`, `base/step` and comma lists of those.
//! When both day fields are restricted a timestamp matches if *either* does.
//!
//! Split into submodules:
//! - [`field`]: field bounds and token expansion
//! - [`expr`]: `CronExpression` parsing and matching
//! - [`next`]: next-occurrence search, civil and timezone-aware
//! - [`describe`]: human-readable labels
//! - [`validation`]: string-level validation for user input
//!
//! Everything here is pure: no I/O, no shared state.

pub mod describe;
pub mod error;
pub mod expr;
pub mod field;
pub mod next;
pub mod validation;

pub use describe::describe_cron;
pub use error::CronError;
pub use expr::{matches_cron, parse_cron, CronExpression};
pub use field::{CronField, Field};
pub use next::{default_search_horizon, get_next_run_time, parse_tz, DEFAULT_SEARCH_HORIZON_DAYS};
pub use validation::{validate_cron, validate_timezone};
