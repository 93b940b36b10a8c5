//! Input validation for schedule fields (cron expressions, timezones).

use crate::expr::CronExpression;

/// Validate a 5-field cron expression. Returns `Ok(())` or an error message
/// naming the offending field.
pub fn validate_cron(cron: &str) -> Result<(), String> {
    CronExpression::parse(cron)
        .map(|_| ())
        .map_err(|e| e.to_string())
}

/// Validate an IANA timezone string.
pub fn validate_timezone(tz: &str) -> Result<(), String> {
    if tz.parse::<chrono_tz::Tz>().is_err() {
        Err(format!(
            "invalid timezone: '{}' (use IANA names like 'America/New_York' or 'UTC')",
            tz
        ))
    } else {
        Ok(())
    }
}
