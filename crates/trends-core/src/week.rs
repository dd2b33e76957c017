//! ISO-8601 week bucketing for `YYYYMMDD` analytics dates.

use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

use chrono::{Datelike, Duration, NaiveDate};
use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::{Result, TrendsError};

// ── WeekKey ───────────────────────────────────────────────────────────────────

/// Identifies one ISO week: the ISO year that owns the week's Thursday plus
/// the 1-based week number within that year.
///
/// Displays (and serialises) as `"<iso-year>-<week>"` with the week number
/// not zero-padded, e.g. `"2023-1"` or `"2022-52"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct WeekKey {
    pub iso_year: i32,
    pub week: u32,
}

impl WeekKey {
    pub fn new(iso_year: i32, week: u32) -> Self {
        Self { iso_year, week }
    }
}

impl fmt::Display for WeekKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{}", self.iso_year, self.week)
    }
}

impl FromStr for WeekKey {
    type Err = TrendsError;

    fn from_str(s: &str) -> Result<Self> {
        let invalid = || TrendsError::Config(format!("invalid week key {s:?}"));
        let (year, week) = s.split_once('-').ok_or_else(invalid)?;
        let iso_year: i32 = year.parse().map_err(|_| invalid())?;
        let week: u32 = week.parse().map_err(|_| invalid())?;
        if !(1..=53).contains(&week) {
            return Err(invalid());
        }
        Ok(Self { iso_year, week })
    }
}

impl Serialize for WeekKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for WeekKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

// ── Date parsing ──────────────────────────────────────────────────────────────

fn date_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^([0-9]{4})([0-9]{2})([0-9]{2})$").expect("regex is valid"))
}

/// Parse an eight-digit `YYYYMMDD` string into a calendar date.
///
/// Anything that is not exactly eight ASCII digits, or that names a day that
/// does not exist (`20230230`), is rejected with
/// [`TrendsError::InvalidDateFormat`].
pub fn parse_yyyymmdd(s: &str) -> Result<NaiveDate> {
    let invalid = || TrendsError::InvalidDateFormat(s.to_string());
    let caps = date_pattern().captures(s).ok_or_else(invalid)?;

    let year: i32 = caps[1].parse().map_err(|_| invalid())?;
    let month: u32 = caps[2].parse().map_err(|_| invalid())?;
    let day: u32 = caps[3].parse().map_err(|_| invalid())?;

    NaiveDate::from_ymd_opt(year, month, day).ok_or_else(invalid)
}

// ── Week derivation ───────────────────────────────────────────────────────────

/// Compute the ISO week containing `date`.
///
/// The date is moved to the Thursday of its own Monday–Sunday week; the
/// calendar year of that Thursday is the ISO year, and the week number is
/// `ceil((days since Jan 1 + 1) / 7)` counted from that Thursday.
pub fn week_key_for_date(date: NaiveDate) -> WeekKey {
    let iso_weekday = i64::from(date.weekday().number_from_monday());
    let thursday = date + Duration::days(4 - iso_weekday);

    WeekKey {
        iso_year: thursday.year(),
        week: thursday.ordinal0() / 7 + 1,
    }
}

/// Derive the [`WeekKey`] for a `YYYYMMDD` date string.
pub fn week_key(date: &str) -> Result<WeekKey> {
    parse_yyyymmdd(date).map(week_key_for_date)
}

// ── Tests ─────────────────────────────────────────────────────────────────────
