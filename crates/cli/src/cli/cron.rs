//! Expression subcommands: `parse`, `matches`, `next`, `describe`, `validate`.

use std::io::Write;

use anyhow::Context;
use chrono::{DateTime, Local, NaiveDateTime, SecondsFormat, Utc};

use ck_cron::CronExpression;
use ck_domain::config::SchedulerConfig;

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
];

/// Parse a civil date-time given on the command line.
pub fn parse_datetime(raw: &str) -> anyhow::Result<NaiveDateTime> {
    let raw = raw.trim();
    DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .with_context(|| format!("invalid date-time '{raw}' (expected YYYY-MM-DDTHH:MM[:SS])"))
}

fn parse_expr(expr: &str) -> anyhow::Result<CronExpression> {
    CronExpression::parse(expr).with_context(|| format!("invalid cron expression '{expr}'"))
}

pub fn parse(expr: &str, out: &mut impl Write) -> anyhow::Result<()> {
    let parsed = parse_expr(expr)?;
    writeln!(out, "{}", serde_json::to_string_pretty(&parsed)?)?;
    Ok(())
}

pub fn matches(expr: &str, datetime: &str, out: &mut impl Write) -> anyhow::Result<()> {
    let parsed = parse_expr(expr)?;
    let when = parse_datetime(datetime)?;
    writeln!(out, "{}", parsed.matches(&when))?;
    Ok(())
}

/// Print up to `count` upcoming runs.
///
/// With `tz`, `from` is UTC and output is RFC 3339 UTC; otherwise both are
/// civil times.
pub fn next(
    expr: &str,
    from: Option<&str>,
    count: Option<usize>,
    tz: Option<&str>,
    config: &SchedulerConfig,
    out: &mut impl Write,
) -> anyhow::Result<()> {
    let parsed = parse_expr(expr)?;
    let from = from.map(parse_datetime).transpose()?;
    let count = count.unwrap_or(config.preview_count);
    let horizon = config.search_horizon();

    let mut printed = 0;
    match tz {
        Some(name) => {
            ck_cron::validate_timezone(name).map_err(anyhow::Error::msg)?;
            let tz = ck_cron::parse_tz(name);
            let mut cursor: DateTime<Utc> = from.map(|f| f.and_utc()).unwrap_or_else(Utc::now);
            while printed < count {
                let Some(run) = parsed.next_after_tz_within(&cursor, tz, horizon) else {
                    break;
                };
                writeln!(out, "{}", run.to_rfc3339_opts(SecondsFormat::Secs, true))?;
                cursor = run;
                printed += 1;
            }
        }
        None => {
            let mut cursor = from.unwrap_or_else(|| Local::now().naive_local());
            while printed < count {
                let Some(run) = parsed.next_after_within(&cursor, horizon) else {
                    break;
                };
                writeln!(out, "{}", run.format("%Y-%m-%dT%H:%M"))?;
                cursor = run;
                printed += 1;
            }
        }
    }

    if printed < count {
        tracing::info!(
            expr,
            printed,
            horizon_days = config.search_horizon_days,
            "no further runs within search horizon"
        );
    }
    Ok(())
}

pub fn describe(expr: &str, out: &mut impl Write) -> anyhow::Result<()> {
    writeln!(out, "{}", ck_cron::describe_cron(expr))?;
    Ok(())
}

/// Print `OK` or the validation message. Returns whether the expression is valid.
pub fn validate(expr: &str, out: &mut impl Write) -> anyhow::Result<bool> {
    match ck_cron::validate_cron(expr) {
        Ok(()) => {
            writeln!(out, "OK")?;
            Ok(true)
        }
        Err(message) => {
            writeln!(out, "{message}")?;
            Ok(false)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn capture(f: impl FnOnce(&mut Vec<u8>) -> anyhow::Result<()>) -> String {
        let mut out = Vec::new();
        f(&mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    // ── Date-time arguments ──────────────────────────────────────────

    #[test]
    fn parse_datetime_accepts_minutes_and_seconds() {
        let a = parse_datetime("2026-01-19T09:00").unwrap();
        let b = parse_datetime("2026-01-19T09:00:00").unwrap();
        let c = parse_datetime("2026-01-19 09:00").unwrap();
        assert_eq!(a, b);
        assert_eq!(a, c);
    }

    #[test]
    fn parse_datetime_rejects_garbage() {
        let err = parse_datetime("tomorrow").unwrap_err();
        assert!(err.to_string().contains("tomorrow"));
    }

    // ── Subcommands ──────────────────────────────────────────────────

    #[test]
    fn parse_prints_field_sets() {
        let text = capture(|out| parse("0 9 * * 1,3,5", out));
        let json: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(json["expression"], "0 9 * * 1,3,5");
        assert_eq!(json["hour"]["values"], serde_json::json!([9]));
        assert_eq!(json["day_of_week"]["values"], serde_json::json!([1, 3, 5]));
        assert_eq!(json["month"]["wildcard"], true);
    }

    #[test]
    fn parse_rejects_bad_expression() {
        let mut out = Vec::new();
        let err = parse("0 9 *", &mut out).unwrap_err();
        assert!(format!("{err:#}").contains("expected 5 fields"));
        assert!(out.is_empty());
    }

    #[test]
    fn matches_prints_bool() {
        assert_eq!(capture(|out| matches("0 9 * * *", "2026-01-19T09:00", out)), "true\n");
        assert_eq!(capture(|out| matches("0 9 * * *", "2026-01-19T09:30", out)), "false\n");
    }

    #[test]
    fn next_civil_times() {
        let cfg = SchedulerConfig::default();
        let text = capture(|out| {
            next("*/30 * * * *", Some("2026-01-19T08:30"), Some(3), None, &cfg, out)
        });
        assert_eq!(text, "2026-01-19T09:00\n2026-01-19T09:30\n2026-01-19T10:00\n");
    }

    #[test]
    fn next_uses_preview_count_by_default() {
        let cfg = SchedulerConfig {
            preview_count: 2,
            ..Default::default()
        };
        let text = capture(|out| next("0 9 * * *", Some("2026-01-19T08:30"), None, None, &cfg, out));
        assert_eq!(text.lines().count(), 2);
    }

    #[test]
    fn next_in_timezone_prints_utc() {
        let cfg = SchedulerConfig::default();
        let text = capture(|out| {
            next(
                "0 9 * * *",
                Some("2026-01-19T00:00"),
                Some(1),
                Some("America/New_York"),
                &cfg,
                out,
            )
        });
        assert_eq!(text, "2026-01-19T14:00:00Z\n");
    }

    #[test]
    fn next_rejects_unknown_timezone() {
        let cfg = SchedulerConfig::default();
        let mut out = Vec::new();
        let err = next("0 9 * * *", None, Some(1), Some("Mars/Base"), &cfg, &mut out).unwrap_err();
        assert!(err.to_string().contains("Mars/Base"));
    }

    #[test]
    fn next_unsatisfiable_prints_nothing() {
        let cfg = SchedulerConfig {
            search_horizon_days: 30,
            ..Default::default()
        };
        let text = capture(|out| next("0 0 30 2 *", Some("2026-01-19T00:00"), Some(3), None, &cfg, out));
        assert!(text.is_empty());
    }

    #[test]
    fn describe_prints_label() {
        assert_eq!(capture(|out| describe("0 */4 * * *", out)), "Every 4 hours\n");
        assert_eq!(capture(|out| describe("invalid", out)), "invalid\n");
    }

    #[test]
    fn validate_reports_message() {
        let mut out = Vec::new();
        assert!(validate("*/15 * * * *", &mut out).unwrap());
        assert_eq!(out, b"OK\n");

        let mut out = Vec::new();
        assert!(!validate("0 24 * * *", &mut out).unwrap());
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("hour"), "{text}");
    }
}
