//! Core data types shared by the fetch, aggregation and rendering layers.

use std::fmt;

use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};

use crate::error::{Result, TrendsError};
use crate::week::WeekKey;

// ── AccessToken ───────────────────────────────────────────────────────────────

/// Opaque credential issued by the identity provider.
///
/// Never inspected or validated here; `Debug` output is redacted so the token
/// does not leak into logs.
#[derive(Clone, PartialEq, Eq)]
pub struct AccessToken(String);

impl AccessToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// The raw token text, for attaching to outgoing requests.
    pub fn secret(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AccessToken(***)")
    }
}

// ── DailyActionRecord ─────────────────────────────────────────────────────────

/// Event count for one (date, action) pair as returned by the analytics API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyActionRecord {
    /// Date in `YYYYMMDD` form. Validated when the record is bucketed.
    pub date: String,
    /// Event action name.
    pub action: String,
    /// Number of events.
    pub count: u64,
}

impl DailyActionRecord {
    pub fn new(date: impl Into<String>, action: impl Into<String>, count: u64) -> Self {
        Self {
            date: date.into(),
            action: action.into(),
            count,
        }
    }

    /// Build a record from one `[date, action, count]` API row.
    ///
    /// The API reports counts as text; surrounding whitespace is tolerated
    /// but the value must be a non-negative integer.
    pub fn from_row(row: &[String]) -> Result<Self> {
        let [date, action, count] = row else {
            return Err(TrendsError::MalformedRow(format!(
                "expected 3 columns, got {}",
                row.len()
            )));
        };

        let count = count
            .trim()
            .parse::<u64>()
            .map_err(|_| TrendsError::InvalidCount(count.clone()))?;

        Ok(Self::new(date.clone(), action.clone(), count))
    }
}

// ── WeeklySeriesRecord ────────────────────────────────────────────────────────

/// One bar of the stacked chart: the per-action totals for a single ISO week.
///
/// Actions keep the order in which they were first added. An action with no
/// rows in this week is absent rather than zero.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WeeklySeriesRecord {
    pub week_number: WeekKey,
    series: Vec<(String, u64)>,
}

impl WeeklySeriesRecord {
    pub fn new(week_number: WeekKey) -> Self {
        Self {
            week_number,
            series: Vec::new(),
        }
    }

    /// Add `count` to the field named `action`, creating it on first use.
    ///
    /// Fails with [`TrendsError::CountOverflow`] instead of wrapping when the
    /// sum does not fit in a `u64`; the record is left unchanged.
    pub fn add(&mut self, action: &str, count: u64) -> Result<()> {
        let week = self.week_number;
        match self.series.iter_mut().find(|(name, _)| name == action) {
            Some((_, value)) => {
                *value = value.checked_add(count).ok_or_else(|| {
                    TrendsError::CountOverflow(format!(
                        "week {week}, action {action:?}"
                    ))
                })?;
            }
            None => self.series.push((action.to_string(), count)),
        }
        Ok(())
    }

    /// The value for `action`, or `None` when it had no rows this week.
    pub fn get(&self, action: &str) -> Option<u64> {
        self.series
            .iter()
            .find(|(name, _)| name == action)
            .map(|(_, value)| *value)
    }

    /// Action names in insertion order.
    pub fn actions(&self) -> impl Iterator<Item = &str> {
        self.series.iter().map(|(name, _)| name.as_str())
    }

    /// Height of the stacked bar: the sum of every field, saturating at
    /// `u64::MAX`. Reports built by the aggregator never reach it.
    pub fn total(&self) -> u64 {
        self.series
            .iter()
            .fold(0u64, |acc, (_, value)| acc.saturating_add(*value))
    }

    pub fn len(&self) -> usize {
        self.series.len()
    }

    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }
}

impl Serialize for WeeklySeriesRecord {
    /// Serialises as one flat object: `{"weekNumber": "2023-1", "click": 8}`.
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.series.len() + 1))?;
        map.serialize_entry("weekNumber", &self.week_number)?;
        for (action, value) in &self.series {
            map.serialize_entry(action, value)?;
        }
        map.end()
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn row(cols: &[&str]) -> Vec<String> {
        cols.iter().map(|c| c.to_string()).collect()
    }

    // ── AccessToken ───────────────────────────────────────────────────────────

    #[test]
    fn test_access_token_debug_is_redacted() {
        let token = AccessToken::new("ya29.secret");
        assert_eq!(format!("{token:?}"), "AccessToken(***)");
        assert_eq!(token.secret(), "ya29.secret");
    }

    // ── DailyActionRecord::from_row ───────────────────────────────────────────

    #[test]
    fn test_from_row_parses_count_text() {
        let record = DailyActionRecord::from_row(&row(&["20230102", "click", "5"])).unwrap();
        assert_eq!(record, DailyActionRecord::new("20230102", "click", 5));
    }

    #[test]
    fn test_from_row_trims_count() {
        let record = DailyActionRecord::from_row(&row(&["20230102", "click", " 12 "])).unwrap();
        assert_eq!(record.count, 12);
    }

    #[test]
    fn test_from_row_rejects_wrong_arity() {
        let err = DailyActionRecord::from_row(&row(&["20230102", "click"])).unwrap_err();
        assert!(matches!(err, TrendsError::MalformedRow(_)));

        let err =
            DailyActionRecord::from_row(&row(&["20230102", "click", "1", "extra"])).unwrap_err();
        assert!(matches!(err, TrendsError::MalformedRow(_)));
    }

    #[test]
    fn test_from_row_rejects_non_numeric_count() {
        for bad in ["", "abc", "-3", "1.5"] {
            let err = DailyActionRecord::from_row(&row(&["20230102", "click", bad])).unwrap_err();
            assert!(matches!(err, TrendsError::InvalidCount(_)), "{bad:?}");
        }
    }

    #[test]
    fn test_from_row_does_not_validate_date() {
        // Dates are validated when bucketed, so the aggregator owns that error.
        let record = DailyActionRecord::from_row(&row(&["garbage", "click", "1"])).unwrap();
        assert_eq!(record.date, "garbage");
    }

    // ── WeeklySeriesRecord ────────────────────────────────────────────────────

    #[test]
    fn test_add_sums_repeated_action() {
        let mut record = WeeklySeriesRecord::new(WeekKey::new(2023, 1));
        record.add("click", 5).unwrap();
        record.add("view", 2).unwrap();
        record.add("click", 3).unwrap();

        assert_eq!(record.get("click"), Some(8));
        assert_eq!(record.get("view"), Some(2));
        assert_eq!(record.len(), 2);
        assert_eq!(record.total(), 10);
    }

    #[test]
    fn test_absent_action_is_none_not_zero() {
        let mut record = WeeklySeriesRecord::new(WeekKey::new(2023, 1));
        record.add("click", 0).unwrap();
        assert_eq!(record.get("click"), Some(0));
        assert_eq!(record.get("view"), None);
    }

    #[test]
    fn test_actions_keep_insertion_order() {
        let mut record = WeeklySeriesRecord::new(WeekKey::new(2023, 1));
        record.add("zeta", 1).unwrap();
        record.add("alpha", 1).unwrap();
        record.add("zeta", 1).unwrap();
        let actions: Vec<&str> = record.actions().collect();
        assert_eq!(actions, vec!["zeta", "alpha"]);
    }

    #[test]
    fn test_serialises_as_flat_object() {
        let mut record = WeeklySeriesRecord::new(WeekKey::new(2023, 1));
        record.add("click", 8).unwrap();
        record.add("view", 2).unwrap();
        let json = serde_json::to_string(&record).unwrap();
        assert_eq!(json, r#"{"weekNumber":"2023-1","click":8,"view":2}"#);
    }

    #[test]
    fn test_add_overflow_is_an_error_not_a_wrap() {
        let mut record = WeeklySeriesRecord::new(WeekKey::new(2023, 1));
        record.add("click", u64::MAX).unwrap();
        let err = record.add("click", 1).unwrap_err();
        assert!(matches!(err, TrendsError::CountOverflow(_)));
        assert!(err.to_string().contains("2023-1"));
        assert_eq!(record.get("click"), Some(u64::MAX));
    }

    #[test]
    fn test_total_saturates_across_actions() {
        let mut record = WeeklySeriesRecord::new(WeekKey::new(2023, 1));
        record.add("click", u64::MAX).unwrap();
        record.add("view", 1).unwrap();
        assert_eq!(record.total(), u64::MAX);
    }

    #[test]
    fn test_empty_record() {
        let record = WeeklySeriesRecord::new(WeekKey::new(2023, 1));
        assert!(record.is_empty());
        assert_eq!(record.total(), 0);
    }
}
