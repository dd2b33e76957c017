//! Pivot of daily `(date, action, count)` rows into per-week chart series.

use std::collections::HashMap;
use std::str::FromStr;

use serde::Serialize;
use trends_core::models::{DailyActionRecord, WeeklySeriesRecord};
use trends_core::week::{week_key, WeekKey};
use trends_core::{Result, TrendsError};

// ── WeekOrder ─────────────────────────────────────────────────────────────────

/// Order of the weekly records produced by the aggregator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WeekOrder {
    /// Weeks in the order their first row appears in the input.
    #[default]
    FirstSeen,
    /// Weeks sorted by ISO year, then week number.
    Chronological,
}

impl FromStr for WeekOrder {
    type Err = TrendsError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "first-seen" => Ok(Self::FirstSeen),
            "chronological" => Ok(Self::Chronological),
            other => Err(TrendsError::Config(format!("unknown week order {other:?}"))),
        }
    }
}

// ── WeeklyAggregator ──────────────────────────────────────────────────────────

/// Stateless helper that groups daily rows by ISO week.
pub struct WeeklyAggregator;

impl WeeklyAggregator {
    /// Group `records` by ISO week, one [`WeeklySeriesRecord`] per distinct
    /// week, in first-seen order.
    ///
    /// Counts for the same action within one week are summed. A malformed
    /// date anywhere in the batch fails the whole call, as does a batch whose
    /// counts add up past `u64::MAX`. Every per-week, per-series and grand
    /// total of a successful result therefore fits in a `u64`.
    pub fn aggregate(records: &[DailyActionRecord]) -> Result<Vec<WeeklySeriesRecord>> {
        let mut index: HashMap<WeekKey, usize> = HashMap::new();
        let mut weeks: Vec<WeeklySeriesRecord> = Vec::new();
        let mut grand_total = 0u64;

        for record in records {
            let key = week_key(&record.date)?;
            grand_total = grand_total.checked_add(record.count).ok_or_else(|| {
                TrendsError::CountOverflow(format!(
                    "batch total passes u64::MAX at week {key}, action {:?}",
                    record.action
                ))
            })?;
            let slot = *index.entry(key).or_insert_with(|| {
                weeks.push(WeeklySeriesRecord::new(key));
                weeks.len() - 1
            });
            weeks[slot].add(&record.action, record.count)?;
        }

        tracing::debug!(
            rows = records.len(),
            weeks = weeks.len(),
            "aggregated daily rows into weeks"
        );
        Ok(weeks)
    }

    /// [`aggregate`](Self::aggregate) followed by the requested ordering.
    pub fn aggregate_ordered(
        records: &[DailyActionRecord],
        order: WeekOrder,
    ) -> Result<Vec<WeeklySeriesRecord>> {
        let mut weeks = Self::aggregate(records)?;
        if order == WeekOrder::Chronological {
            weeks.sort_by_key(|w| w.week_number);
        }
        Ok(weeks)
    }

    /// Distinct action names across `weeks`, in first-seen order.
    ///
    /// Walks the records in sequence and each record's fields in insertion
    /// order, so the result is stable for a given input and can drive colour
    /// assignment.
    pub fn series_keys(weeks: &[WeeklySeriesRecord]) -> Vec<String> {
        let mut keys: Vec<String> = Vec::new();
        for week in weeks {
            for action in week.actions() {
                if !keys.iter().any(|k| k == action) {
                    keys.push(action.to_string());
                }
            }
        }
        keys
    }

    /// Sum of each series across all weeks, in [`series_keys`](Self::series_keys) order.
    pub fn totals(weeks: &[WeeklySeriesRecord]) -> Vec<(String, u64)> {
        Self::series_keys(weeks)
            .into_iter()
            .map(|key| {
                let sum = weeks
                    .iter()
                    .filter_map(|w| w.get(&key))
                    .fold(0u64, u64::saturating_add);
                (key, sum)
            })
            .collect()
    }
}

// ── WeeklyReport ──────────────────────────────────────────────────────────────

/// Everything the renderer needs: the weekly records and their series keys.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WeeklyReport {
    pub weeks: Vec<WeeklySeriesRecord>,
    pub series_keys: Vec<String>,
}

impl WeeklyReport {
    pub fn build(records: &[DailyActionRecord], order: WeekOrder) -> Result<Self> {
        let weeks = WeeklyAggregator::aggregate_ordered(records, order)?;
        let series_keys = WeeklyAggregator::series_keys(&weeks);
        Ok(Self { weeks, series_keys })
    }

    pub fn is_empty(&self) -> bool {
        self.weeks.is_empty()
    }

    /// Tallest stacked bar, used to scale the y axis.
    pub fn max_week_total(&self) -> u64 {
        self.weeks.iter().map(|w| w.total()).max().unwrap_or(0)
    }

    /// Sum of every count in the report, saturating at `u64::MAX`.
    pub fn grand_total(&self) -> u64 {
        self.weeks
            .iter()
            .map(|w| w.total())
            .fold(0u64, u64::saturating_add)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn rec(date: &str, action: &str, count: u64) -> DailyActionRecord {
        DailyActionRecord::new(date, action, count)
    }

    fn labels(weeks: &[WeeklySeriesRecord]) -> Vec<String> {
        weeks.iter().map(|w| w.week_number.to_string()).collect()
    }

    // ── aggregate ─────────────────────────────────────────────────────────────

    #[test]
    fn test_same_week_rows_collapse_into_one_record() {
        let rows = vec![
            rec("20230102", "click", 5),
            rec("20230103", "click", 3),
            rec("20230104", "view", 2),
        ];
        let weeks = WeeklyAggregator::aggregate(&rows).unwrap();

        assert_eq!(weeks.len(), 1);
        assert_eq!(weeks[0].week_number.to_string(), "2023-1");
        assert_eq!(weeks[0].get("click"), Some(8));
        assert_eq!(weeks[0].get("view"), Some(2));
        assert_eq!(weeks[0].len(), 2);
    }

    #[test]
    fn test_dates_ten_days_apart_stay_separate() {
        let rows = vec![rec("20230102", "click", 1), rec("20230112", "click", 1)];
        let weeks = WeeklyAggregator::aggregate(&rows).unwrap();
        assert_eq!(labels(&weeks), vec!["2023-1", "2023-2"]);
    }

    #[test]
    fn test_first_seen_order_is_preserved() {
        let rows = vec![
            rec("20230320", "click", 1),
            rec("20230102", "click", 1),
            rec("20230321", "view", 1),
            rec("20230213", "click", 1),
        ];
        let weeks = WeeklyAggregator::aggregate(&rows).unwrap();
        assert_eq!(labels(&weeks), vec!["2023-12", "2023-1", "2023-7"]);
    }

    #[test]
    fn test_year_boundary_buckets() {
        let rows = vec![
            rec("20221231", "click", 1),
            rec("20230101", "click", 2),
            rec("20230102", "click", 4),
        ];
        let weeks = WeeklyAggregator::aggregate(&rows).unwrap();
        assert_eq!(labels(&weeks), vec!["2022-52", "2023-1"]);
        assert_eq!(weeks[0].get("click"), Some(3));
        assert_eq!(weeks[1].get("click"), Some(4));
    }

    #[test]
    fn test_action_absent_from_week_is_absent() {
        let rows = vec![
            rec("20230102", "click", 1),
            rec("20230109", "view", 1),
        ];
        let weeks = WeeklyAggregator::aggregate(&rows).unwrap();
        assert_eq!(weeks[0].get("view"), None);
        assert_eq!(weeks[1].get("click"), None);
    }

    #[test]
    fn test_every_count_attributed_once() {
        let rows = vec![
            rec("20230102", "click", 5),
            rec("20230110", "view", 7),
            rec("20230111", "click", 11),
            rec("20230301", "signup", 13),
        ];
        let weeks = WeeklyAggregator::aggregate(&rows).unwrap();
        let attributed: u64 = weeks.iter().map(|w| w.total()).sum();
        let input: u64 = rows.iter().map(|r| r.count).sum();
        assert_eq!(attributed, input);
    }

    #[test]
    fn test_empty_input() {
        let weeks = WeeklyAggregator::aggregate(&[]).unwrap();
        assert!(weeks.is_empty());
    }

    #[test]
    fn test_malformed_date_fails_whole_batch() {
        let rows = vec![
            rec("20230102", "click", 5),
            rec("2023-01-03", "click", 3),
        ];
        let err = WeeklyAggregator::aggregate(&rows).unwrap_err();
        assert!(matches!(err, TrendsError::InvalidDateFormat(ref d) if d == "2023-01-03"));
    }

    #[test]
    fn test_repeated_action_overflow_fails_batch() {
        let rows = vec![
            rec("20230102", "click", u64::MAX),
            rec("20230103", "click", 1),
        ];
        let err = WeeklyAggregator::aggregate(&rows).unwrap_err();
        assert!(matches!(err, TrendsError::CountOverflow(_)), "got {err:?}");
    }

    #[test]
    fn test_batch_total_overflow_fails_batch() {
        // Each cell fits on its own; only the grand total is too large.
        let rows = vec![
            rec("20230102", "click", u64::MAX),
            rec("20230109", "view", 1),
        ];
        let err = WeeklyAggregator::aggregate(&rows).unwrap_err();
        assert!(matches!(err, TrendsError::CountOverflow(_)), "got {err:?}");
        assert!(WeeklyReport::build(&rows, WeekOrder::FirstSeen).is_err());
    }

    #[test]
    fn test_max_count_alone_is_accepted() {
        let rows = vec![rec("20230102", "click", u64::MAX)];
        let report = WeeklyReport::build(&rows, WeekOrder::FirstSeen).unwrap();
        assert_eq!(report.grand_total(), u64::MAX);
        assert_eq!(report.max_week_total(), u64::MAX);
    }

    #[test]
    fn test_aggregate_is_idempotent() {
        let rows = vec![
            rec("20230102", "click", 5),
            rec("20230110", "view", 7),
            rec("20230103", "view", 1),
        ];
        let first = WeeklyAggregator::aggregate(&rows).unwrap();
        let second = WeeklyAggregator::aggregate(&rows).unwrap();
        assert_eq!(first, second);
    }

    // ── aggregate_ordered ─────────────────────────────────────────────────────

    #[test]
    fn test_chronological_order() {
        let rows = vec![
            rec("20230320", "click", 1),
            rec("20221226", "click", 1),
            rec("20230102", "click", 1),
        ];
        let weeks = WeeklyAggregator::aggregate_ordered(&rows, WeekOrder::Chronological).unwrap();
        assert_eq!(labels(&weeks), vec!["2022-52", "2023-1", "2023-12"]);

        let weeks = WeeklyAggregator::aggregate_ordered(&rows, WeekOrder::FirstSeen).unwrap();
        assert_eq!(labels(&weeks), vec!["2023-12", "2022-52", "2023-1"]);
    }

    #[test]
    fn test_week_order_from_str() {
        assert_eq!("first-seen".parse::<WeekOrder>().unwrap(), WeekOrder::FirstSeen);
        assert_eq!(
            "chronological".parse::<WeekOrder>().unwrap(),
            WeekOrder::Chronological
        );
        assert!("random".parse::<WeekOrder>().is_err());
    }

    // ── series_keys ───────────────────────────────────────────────────────────

    #[test]
    fn test_series_keys_first_seen_across_records() {
        let rows = vec![
            rec("20230102", "view", 1),
            rec("20230102", "click", 1),
            rec("20230109", "signup", 1),
            rec("20230109", "view", 1),
        ];
        let weeks = WeeklyAggregator::aggregate(&rows).unwrap();
        assert_eq!(
            WeeklyAggregator::series_keys(&weeks),
            vec!["view", "click", "signup"]
        );
    }

    #[test]
    fn test_series_keys_stable_across_runs() {
        let rows = vec![
            rec("20230109", "b", 1),
            rec("20230102", "a", 1),
            rec("20230102", "c", 1),
        ];
        let weeks = WeeklyAggregator::aggregate(&rows).unwrap();
        let first = WeeklyAggregator::series_keys(&weeks);
        let second = WeeklyAggregator::series_keys(&weeks);
        assert_eq!(first, second);
        assert_eq!(first, vec!["b", "a", "c"]);
    }

    #[test]
    fn test_series_keys_empty() {
        assert!(WeeklyAggregator::series_keys(&[]).is_empty());
    }

    // ── totals ────────────────────────────────────────────────────────────────

    #[test]
    fn test_totals_per_series() {
        let rows = vec![
            rec("20230102", "click", 5),
            rec("20230110", "click", 3),
            rec("20230110", "view", 2),
        ];
        let weeks = WeeklyAggregator::aggregate(&rows).unwrap();
        assert_eq!(
            WeeklyAggregator::totals(&weeks),
            vec![("click".to_string(), 8), ("view".to_string(), 2)]
        );
    }

    // ── WeeklyReport ──────────────────────────────────────────────────────────

    #[test]
    fn test_report_build() {
        let rows = vec![
            rec("20230102", "click", 5),
            rec("20230110", "click", 3),
            rec("20230110", "view", 9),
        ];
        let report = WeeklyReport::build(&rows, WeekOrder::FirstSeen).unwrap();
        assert_eq!(report.series_keys, vec!["click", "view"]);
        assert_eq!(report.weeks.len(), 2);
        assert_eq!(report.max_week_total(), 12);
        assert_eq!(report.grand_total(), 17);
        assert!(!report.is_empty());
    }

    #[test]
    fn test_report_serialises_weeks_as_flat_objects() {
        let rows = vec![rec("20230102", "click", 5)];
        let report = WeeklyReport::build(&rows, WeekOrder::FirstSeen).unwrap();
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["weeks"][0]["weekNumber"], "2023-1");
        assert_eq!(json["weeks"][0]["click"], 5);
        assert_eq!(json["series_keys"][0], "click");
    }

    #[test]
    fn test_empty_report() {
        let report = WeeklyReport::build(&[], WeekOrder::Chronological).unwrap();
        assert!(report.is_empty());
        assert_eq!(report.max_week_total(), 0);
    }
}
