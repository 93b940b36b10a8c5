//! Cron fields and the expansion of field tokens into value sets.

use std::collections::BTreeSet;
use std::fmt;

use serde::Serialize;

use crate::error::CronError;

/// One of the five positional fields of a cron expression.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Field {
    Minute,
    Hour,
    DayOfMonth,
    Month,
    DayOfWeek,
}

impl Field {
    /// Fields in source order.
    pub const ALL: [Field; 5] = [
        Field::Minute,
        Field::Hour,
        Field::DayOfMonth,
        Field::Month,
        Field::DayOfWeek,
    ];

    /// Inclusive bounds of the expanded value set.
    pub fn bounds(self) -> (u32, u32) {
        match self {
            Field::Minute => (0, 59),
            Field::Hour => (0, 23),
            Field::DayOfMonth => (1, 31),
            Field::Month => (1, 12),
            Field::DayOfWeek => (0, 6),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Field::Minute => "minute",
            Field::Hour => "hour",
            Field::DayOfMonth => "day-of-month",
            Field::Month => "month",
            Field::DayOfWeek => "day-of-week",
        }
    }

    /// Largest literal accepted in source. Day-of-week also takes 7 for Sunday.
    fn max_literal(self) -> u32 {
        match self {
            Field::DayOfWeek => 7,
            _ => self.bounds().1,
        }
    }

    fn normalize(self, value: u32) -> u32 {
        match (self, value) {
            (Field::DayOfWeek, 7) => 0,
            _ => value,
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Expanded value set of a single field.
///
/// `wildcard` is true only when the source token was exactly `*`. A field that
/// lists every value explicitly still counts as restricted, which matters for
/// the day-of-month / day-of-week OR rule.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct CronField {
    values: BTreeSet<u32>,
    wildcard: bool,
}

impl CronField {
    /// Expand `token` for `field`. Supports `*`, `N`, `A-B`, `base/step` and
    /// comma lists of those.
    pub fn parse(field: Field, token: &str) -> Result<Self, CronError> {
        if token == "*" {
            let (min, max) = field.bounds();
            return Ok(Self {
                values: (min..=max).collect(),
                wildcard: true,
            });
        }

        let mut values = BTreeSet::new();
        for part in token.split(',') {
            expand_part(field, part, &mut values)?;
        }
        Ok(Self {
            values,
            wildcard: false,
        })
    }

    pub fn contains(&self, value: u32) -> bool {
        self.values.contains(&value)
    }

    pub fn is_wildcard(&self) -> bool {
        self.wildcard
    }

    /// Values in ascending order.
    pub fn values(&self) -> impl Iterator<Item = u32> + '_ {
        self.values.iter().copied()
    }

    /// Smallest member that is `>= value`.
    pub fn next_from(&self, value: u32) -> Option<u32> {
        self.values.range(value..).next().copied()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

fn expand_part(field: Field, part: &str, out: &mut BTreeSet<u32>) -> Result<(), CronError> {
    let (base, step) = match part.split_once('/') {
        Some((base, step_s)) => {
            let step = parse_number(step_s)
                .filter(|n| *n > 0)
                .ok_or_else(|| CronError::InvalidStep {
                    field,
                    token: part.to_string(),
                })?;
            (base, Some(step))
        }
        None => (part, None),
    };

    let (start, end) = if base == "*" {
        field.bounds()
    } else if let Some((start_s, end_s)) = base.split_once('-') {
        let start = parse_value(field, start_s, part)?;
        let end = parse_value(field, end_s, part)?;
        if start > end {
            return Err(CronError::InvertedRange { field, start, end });
        }
        (start, end)
    } else {
        let value = parse_value(field, base, part)?;
        (value, value)
    };

    match step {
        // A stepped base only sets the starting value; stepping continues to
        // the top of the field's valid range.
        Some(step) => {
            let start = field.normalize(start);
            let (_, max) = field.bounds();
            out.extend((start..=max).step_by(step as usize));
        }
        None => {
            for value in start..=end {
                out.insert(field.normalize(value));
            }
        }
    }
    Ok(())
}

fn parse_value(field: Field, s: &str, token: &str) -> Result<u32, CronError> {
    let value = parse_number(s).ok_or_else(|| CronError::InvalidToken {
        field,
        token: token.to_string(),
    })?;
    let (min, _) = field.bounds();
    let max = field.max_literal();
    if value < min || value > max {
        return Err(CronError::OutOfRange {
            field,
            value,
            min,
            max,
        });
    }
    Ok(value)
}

/// Plain ASCII digits only; rejects signs, whitespace and empty input.
pub(crate) fn parse_number(s: &str) -> Option<u32> {
    if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    s.parse().ok()
}
