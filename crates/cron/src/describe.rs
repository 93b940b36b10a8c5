//! Friendly labels for a few common schedule shapes.

use crate::expr::CronExpression;
use crate::field::parse_number;

/// Describe `expression` in words, or return it verbatim when it isn't one of
/// the recognized shapes:
///
/// - `M H * * *` → `Daily at 9:00 AM` (24-hour time appended when it reads
///   differently, e.g. `Daily at 2:30 PM (14:30)`)
/// - `0 */N * * *` → `Every N hours`
/// - `*/N * * * *` → `Every N minutes`
pub fn describe_cron(expression: &str) -> String {
    describe(expression).unwrap_or_else(|| expression.to_string())
}

fn describe(expression: &str) -> Option<String> {
    // Recognized shapes must also be valid expressions.
    CronExpression::parse(expression).ok()?;

    let fields: Vec<&str> = expression.split_whitespace().collect();
    let [minute, hour, "*", "*", "*"] = fields.as_slice() else {
        return None;
    };

    if *hour == "*" {
        return every(minute).map(|n| format!("Every {n} minutes"));
    }
    if *minute == "0" {
        if let Some(n) = every(hour) {
            return Some(format!("Every {n} hours"));
        }
    }
    Some(daily_at(parse_number(hour)?, parse_number(minute)?))
}

fn every(token: &str) -> Option<u32> {
    parse_number(token.strip_prefix("*/")?)
}

fn daily_at(hour: u32, minute: u32) -> String {
    let meridiem = if hour < 12 { "AM" } else { "PM" };
    let hour12 = match hour % 12 {
        0 => 12,
        h => h,
    };
    let mut label = format!("Daily at {hour12}:{minute:02} {meridiem}");
    if hour12 != hour {
        label.push_str(&format!(" ({hour}:{minute:02})"));
    }
    label
}
