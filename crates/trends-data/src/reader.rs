//! Decoding of analytics query responses into [`DailyActionRecord`]s.
//!
//! The endpoint answers with a JSON document whose `rows` field holds
//! `[date, action, count]` string triples. The field is omitted entirely when
//! the query matched nothing.

use serde::Deserialize;
use tracing::{debug, warn};
use trends_core::models::DailyActionRecord;
use trends_core::Result;

/// The subset of the Core Reporting response this crate consumes.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsResponse {
    #[serde(default)]
    pub rows: Option<Vec<Vec<String>>>,
    #[serde(default)]
    pub total_results: Option<u64>,
    #[serde(default)]
    pub contains_sampled_data: bool,
}

impl AnalyticsResponse {
    /// Convert every row into a record, failing on the first malformed row.
    pub fn into_records(self) -> Result<Vec<DailyActionRecord>> {
        if self.contains_sampled_data {
            warn!("analytics response is based on sampled data");
        }

        let rows = self.rows.unwrap_or_default();
        if let Some(total) = self.total_results {
            if total > rows.len() as u64 {
                warn!(
                    total,
                    returned = rows.len(),
                    "analytics response was truncated; later rows are missing"
                );
            }
        }

        records_from_rows(&rows)
    }
}

/// Parse a raw response body.
pub fn parse_response(body: &str) -> Result<Vec<DailyActionRecord>> {
    let response: AnalyticsResponse = serde_json::from_str(body)?;
    response.into_records()
}

/// Convert `[date, action, count]` rows into records, preserving order.
pub fn records_from_rows(rows: &[Vec<String>]) -> Result<Vec<DailyActionRecord>> {
    let records = rows
        .iter()
        .map(|row| DailyActionRecord::from_row(row))
        .collect::<Result<Vec<_>>>()?;
    debug!(rows = records.len(), "decoded analytics rows");
    Ok(records)
}

// ── Tests ─────────────────────────────────────────────────────────────────────
