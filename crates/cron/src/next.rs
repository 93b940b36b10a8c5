//! Next-occurrence search, in civil time or in an IANA timezone.

use chrono::{DateTime, Datelike, Duration, Local, NaiveDateTime, TimeZone, Timelike, Utc};

use crate::expr::CronExpression;

/// Default search horizon: four leap-years' worth of days past the reference
/// instant. Long enough to reach the next Feb 29.
pub const DEFAULT_SEARCH_HORIZON_DAYS: i64 = 4 * 366;

pub fn default_search_horizon() -> Duration {
    Duration::days(DEFAULT_SEARCH_HORIZON_DAYS)
}

/// Parse a timezone string into a `chrono_tz::Tz`, falling back to UTC.
pub fn parse_tz(tz: &str) -> chrono_tz::Tz {
    tz.parse::<chrono_tz::Tz>().unwrap_or(chrono_tz::UTC)
}

impl CronExpression {
    /// Next matching minute strictly after `from`, within the default horizon.
    pub fn next_after(&self, from: &NaiveDateTime) -> Option<NaiveDateTime> {
        self.next_after_within(from, default_search_horizon())
    }

    /// Next matching minute strictly after `from` and no later than
    /// `from + horizon`.
    ///
    /// Equivalent to testing every minute in turn; whole days and hours that
    /// cannot match are stepped over.
    pub fn next_after_within(
        &self,
        from: &NaiveDateTime,
        horizon: Duration,
    ) -> Option<NaiveDateTime> {
        let limit = from.checked_add_signed(horizon).unwrap_or(NaiveDateTime::MAX);
        let mut candidate = from
            .date()
            .and_hms_opt(from.hour(), from.minute(), 0)?
            .checked_add_signed(Duration::minutes(1))?;

        while candidate <= limit {
            let date = candidate.date();
            if !self.month().contains(candidate.month()) || !self.day_matches(date) {
                candidate = date.succ_opt()?.and_hms_opt(0, 0, 0)?;
                continue;
            }
            if !self.hour().contains(candidate.hour()) {
                candidate = date
                    .and_hms_opt(candidate.hour(), 0, 0)?
                    .checked_add_signed(Duration::hours(1))?;
                continue;
            }
            match self.minute().next_from(candidate.minute()) {
                Some(minute) => {
                    let hit = date.and_hms_opt(candidate.hour(), minute, 0)?;
                    return (hit <= limit).then_some(hit);
                }
                None => {
                    candidate = date
                        .and_hms_opt(candidate.hour(), 0, 0)?
                        .checked_add_signed(Duration::hours(1))?;
                }
            }
        }

        tracing::debug!(expression = %self, %from, "no occurrence within search horizon");
        None
    }

    /// Up to `n` successive occurrences after `after`, ascending.
    pub fn next_n(&self, after: &NaiveDateTime, n: usize) -> Vec<NaiveDateTime> {
        let mut results = Vec::with_capacity(n);
        let mut cursor = *after;
        for _ in 0..n {
            match self.next_after(&cursor) {
                Some(next) => {
                    results.push(next);
                    cursor = next;
                }
                None => break,
            }
        }
        results
    }

    /// Next occurrence after `after`, evaluated in the local time of `tz`.
    /// Returns a UTC `DateTime`.
    ///
    /// **DST handling:**
    /// - Spring-forward gaps: local times that don't exist are skipped.
    /// - Fall-back overlaps: the earliest mapping still after `after` is chosen.
    pub fn next_after_tz(&self, after: &DateTime<Utc>, tz: chrono_tz::Tz) -> Option<DateTime<Utc>> {
        self.next_after_tz_within(after, tz, default_search_horizon())
    }

    pub fn next_after_tz_within(
        &self,
        after: &DateTime<Utc>,
        tz: chrono_tz::Tz,
        horizon: Duration,
    ) -> Option<DateTime<Utc>> {
        let start = after.with_timezone(&tz).naive_local();
        let limit = start.checked_add_signed(horizon).unwrap_or(NaiveDateTime::MAX);
        let mut cursor = start;

        loop {
            let candidate = self.next_after_within(&cursor, limit - cursor)?;
            match tz.from_local_datetime(&candidate) {
                chrono::LocalResult::Single(dt) => {
                    let dt = dt.with_timezone(&Utc);
                    if dt > *after {
                        return Some(dt);
                    }
                }
                chrono::LocalResult::Ambiguous(earliest, latest) => {
                    let earliest = earliest.with_timezone(&Utc);
                    let latest = latest.with_timezone(&Utc);
                    if earliest > *after {
                        return Some(earliest);
                    }
                    if latest > *after {
                        return Some(latest);
                    }
                }
                chrono::LocalResult::None => {
                    // DST gap: this local minute doesn't exist.
                }
            }
            cursor = candidate;
        }
    }

    /// Up to `n` successive occurrences after `after` in `tz`, as UTC.
    pub fn next_n_tz(
        &self,
        after: &DateTime<Utc>,
        n: usize,
        tz: chrono_tz::Tz,
    ) -> Vec<DateTime<Utc>> {
        let mut results = Vec::with_capacity(n);
        let mut cursor = *after;
        for _ in 0..n {
            match self.next_after_tz(&cursor, tz) {
                Some(next) => {
                    results.push(next);
                    cursor = next;
                }
                None => break,
            }
        }
        results
    }
}

/// Parse `expression` and find its next run strictly after `from` (default:
/// the current local time). `None` when the expression is malformed or has no
/// occurrence within [`DEFAULT_SEARCH_HORIZON_DAYS`].
pub fn get_next_run_time(expression: &str, from: Option<NaiveDateTime>) -> Option<NaiveDateTime> {
    let expr = CronExpression::parse(expression).ok()?;
    let from = from.unwrap_or_else(|| Local::now().naive_local());
    expr.next_after(&from)
}
