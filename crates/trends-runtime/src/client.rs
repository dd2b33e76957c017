//! HTTP client for the analytics query endpoint.
//!
//! One request per run: a fixed 180-day window of daily event counts,
//! grouped by date and event action. No retries; a failure is reported to the
//! caller and the display stays empty.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use trends_core::models::{AccessToken, DailyActionRecord};
use trends_core::{Result, TrendsError};
use trends_data::reader::parse_response;

/// OAuth scope the access token must carry.
pub const ANALYTICS_SCOPE: &str = "https://www.googleapis.com/auth/analytics";
/// Start of the query window, relative to today.
pub const START_DATE: &str = "180daysAgo";
/// End of the query window, relative to today.
pub const END_DATE: &str = "yesterday";
/// The single metric requested.
pub const METRIC: &str = "ga:totalEvents";
/// Row grouping: one row per (date, event action).
pub const DIMENSIONS: &str = "ga:date,ga:eventAction";
/// Largest page the Core Reporting API will return.
pub const MAX_RESULTS: u32 = 10_000;

fn http_error(err: reqwest::Error) -> TrendsError {
    TrendsError::Http(err.to_string())
}

// ── EventSource ───────────────────────────────────────────────────────────────

/// Anything that can produce the daily `(date, action, count)` rows.
#[async_trait]
pub trait EventSource: Send + Sync {
    /// Fetch every row for the configured window, in response order.
    async fn fetch_rows(&self, token: &AccessToken) -> Result<Vec<DailyActionRecord>>;
}

// ── AnalyticsClient ───────────────────────────────────────────────────────────

/// Google Analytics Core Reporting client.
#[derive(Debug, Clone)]
pub struct AnalyticsClient {
    endpoint: String,
    view_id: String,
    http_client: Client,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    error: ApiErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ApiErrorDetail {
    message: String,
}

impl AnalyticsClient {
    pub fn new(endpoint: impl Into<String>, view_id: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            view_id: view_id.into(),
            http_client: Client::new(),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Query-string parameters sent with every request.
    pub fn query_params(&self) -> Vec<(&'static str, String)> {
        vec![
            ("ids", self.view_id.clone()),
            ("start-date", START_DATE.to_string()),
            ("end-date", END_DATE.to_string()),
            ("metrics", METRIC.to_string()),
            ("dimensions", DIMENSIONS.to_string()),
            ("max-results", MAX_RESULTS.to_string()),
        ]
    }
}

#[async_trait]
impl EventSource for AnalyticsClient {
    async fn fetch_rows(&self, token: &AccessToken) -> Result<Vec<DailyActionRecord>> {
        tracing::info!(endpoint = %self.endpoint, view = %self.view_id, "querying analytics");

        let response = self
            .http_client
            .get(&self.endpoint)
            .query(&self.query_params())
            .bearer_auth(token.secret())
            .send()
            .await
            .map_err(http_error)?;

        let status = response.status();
        let body = response.text().await.map_err(http_error)?;

        if !status.is_success() {
            return Err(TrendsError::Api {
                status: status.as_u16(),
                message: api_error_message(&body),
            });
        }

        let records = parse_response(&body)?;
        tracing::info!(rows = records.len(), "analytics query returned");
        Ok(records)
    }
}

/// Pull the human-readable message out of an API error body, falling back to
/// the raw body text.
fn api_error_message(body: &str) -> String {
    match serde_json::from_str::<ApiErrorBody>(body) {
        Ok(parsed) => parsed.error.message,
        Err(_) => body.trim().to_string(),
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
