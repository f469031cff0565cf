use std::fmt::Display;

use anyhow::{anyhow, Result};
use chrono::{DateTime, Datelike, NaiveDate, NaiveTime, TimeZone, Utc};
use chrono_english::parse_date_string;
use clap::ValueEnum;

use super::clock::Clock;

const NOON: NaiveTime = match NaiveTime::from_hms_opt(12, 0, 0) {
    Some(v) => v,
    None => NaiveTime::MIN,
};

/// Order of day and month in dates typed by the user.
#[derive(Debug, Clone, Copy, ValueEnum, Default, PartialEq, Eq)]
pub enum DateStyle {
    /// day/month/year
    #[default]
    Uk,
    /// month/day/year
    Us,
}

impl From<DateStyle> for chrono_english::Dialect {
    fn from(value: DateStyle) -> Self {
        match value {
            DateStyle::Uk => Self::Uk,
            DateStyle::Us => Self::Us,
        }
    }
}

impl Display for DateStyle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DateStyle::Uk => write!(f, "uk"),
            DateStyle::Us => write!(f, "us"),
        }
    }
}

/// Parses human input such as "yesterday", "last monday" or "15/03/2025" into a calendar day,
/// relative to the clock's current local time.
pub fn parse_day(value: &str, clock: &dyn Clock, style: DateStyle) -> Result<NaiveDate> {
    let now = clock.local(clock.time());
    parse_date_string(value.trim(), now, style.into())
        .map(|v| v.date_naive())
        .map_err(|e| anyhow!("Can't parse \"{value}\" into a date: {e}"))
}

/// This is the standard way of presenting a day to the user in habitual, e.g.
/// "Monday, October 19th, 2026".
pub fn format_date(date: NaiveDate) -> String {
    format!(
        "{}, {} {}{}, {}",
        date.format("%A"),
        date.format("%B"),
        date.day(),
        ordinal_suffix(date.day()),
        date.year()
    )
}

fn ordinal_suffix(day: u32) -> &'static str {
    match (day % 10, day % 100) {
        (_, 11..=13) => "th",
        (1, _) => "st",
        (2, _) => "nd",
        (3, _) => "rd",
        _ => "th",
    }
}

/// Returns a moment that the clock places on `day`.
///
/// For today this is simply the current time. Other days get local noon, which keeps them on the
/// same calendar day even when the offset shifts by an hour in between.
pub fn moment_on(day: NaiveDate, clock: &dyn Clock) -> DateTime<Utc> {
    let now = clock.time();
    if clock.day_of(now) == day {
        return now;
    }
    let offset = *clock.local(now).offset();
    offset
        .from_local_datetime(&day.and_time(NOON))
        .single()
        .map(|v| v.to_utc())
        .unwrap_or_else(|| Utc.from_utc_datetime(&day.and_time(NaiveTime::MIN)))
}
