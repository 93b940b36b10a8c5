//! Parsed cron expressions and timestamp matching.

use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, NaiveDate, NaiveDateTime, Timelike};
use serde::Serialize;

use crate::error::CronError;
use crate::field::{CronField, Field};

/// A parsed 5-field cron expression (`minute hour day-of-month month day-of-week`).
///
/// Built once from a string and immutable afterwards.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct CronExpression {
    #[serde(rename = "expression")]
    source: String,
    minute: CronField,
    hour: CronField,
    day_of_month: CronField,
    month: CronField,
    day_of_week: CronField,
}

impl CronExpression {
    /// Parse `expression`. Any field failure rejects the whole expression.
    pub fn parse(expression: &str) -> Result<Self, CronError> {
        let parts: Vec<&str> = expression.split_whitespace().collect();
        let [minute, hour, day_of_month, month, day_of_week] = parts.as_slice() else {
            return Err(CronError::FieldCount(parts.len()));
        };

        Ok(Self {
            source: parts.join(" "),
            minute: CronField::parse(Field::Minute, minute)?,
            hour: CronField::parse(Field::Hour, hour)?,
            day_of_month: CronField::parse(Field::DayOfMonth, day_of_month)?,
            month: CronField::parse(Field::Month, month)?,
            day_of_week: CronField::parse(Field::DayOfWeek, day_of_week)?,
        })
    }

    /// Source text with whitespace normalized to single spaces.
    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn minute(&self) -> &CronField {
        &self.minute
    }

    pub fn hour(&self) -> &CronField {
        &self.hour
    }

    pub fn day_of_month(&self) -> &CronField {
        &self.day_of_month
    }

    pub fn month(&self) -> &CronField {
        &self.month
    }

    pub fn day_of_week(&self) -> &CronField {
        &self.day_of_week
    }

    pub fn field(&self, field: Field) -> &CronField {
        match field {
            Field::Minute => &self.minute,
            Field::Hour => &self.hour,
            Field::DayOfMonth => &self.day_of_month,
            Field::Month => &self.month,
            Field::DayOfWeek => &self.day_of_week,
        }
    }

    /// Check whether a civil timestamp satisfies the expression. Seconds are
    /// ignored.
    pub fn matches(&self, when: &NaiveDateTime) -> bool {
        self.minute.contains(when.minute())
            && self.hour.contains(when.hour())
            && self.month.contains(when.month())
            && self.day_matches(when.date())
    }

    /// Day-of-month and day-of-week are OR'd when both are restricted,
    /// AND'd (with `*` trivially true) otherwise.
    pub fn day_matches(&self, date: NaiveDate) -> bool {
        let dom = self.day_of_month.contains(date.day());
        let dow = self
            .day_of_week
            .contains(date.weekday().num_days_from_sunday());
        if self.day_of_month.is_wildcard() || self.day_of_week.is_wildcard() {
            dom && dow
        } else {
            dom || dow
        }
    }
}

impl FromStr for CronExpression {
    type Err = CronError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for CronExpression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

/// Parse a cron expression, returning `None` for malformed input.
pub fn parse_cron(expression: &str) -> Option<CronExpression> {
    CronExpression::parse(expression).ok()
}

/// Free-function form of [`CronExpression::matches`].
pub fn matches_cron(expr: &CronExpression, when: &NaiveDateTime) -> bool {
    expr.matches(when)
}
