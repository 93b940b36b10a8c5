use crate::field::Field;

/// Why a cron expression was rejected.
///
/// Rejection is all-or-nothing: the first failing field aborts the parse and
/// no partially built expression is ever returned.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum CronError {
    #[error("expected 5 fields (minute hour day-of-month month day-of-week), got {0}")]
    FieldCount(usize),

    #[error("{field}: invalid token '{token}'")]
    InvalidToken { field: Field, token: String },

    #[error("{field}: value {value} out of range {min}..={max}")]
    OutOfRange {
        field: Field,
        value: u32,
        min: u32,
        max: u32,
    },

    #[error("{field}: range start {start} > end {end}")]
    InvertedRange { field: Field, start: u32, end: u32 },

    #[error("{field}: invalid step in '{token}', expected a positive number")]
    InvalidStep { field: Field, token: String },
}
