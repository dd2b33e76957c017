//! Single-shot dashboard loader.
//!
//! Runs fetch → aggregate on a tokio task once the session is logged in and
//! hands the [`LoadOutcome`] to the UI through a oneshot channel, so the
//! terminal event loop never blocks on the network.

use std::sync::Arc;

use tokio::sync::oneshot;
use trends_core::models::AccessToken;
use trends_core::{Result, TrendsError};
use trends_data::aggregator::{WeekOrder, WeeklyReport};

use crate::client::EventSource;

// ── LoadOutcome ───────────────────────────────────────────────────────────────

/// Result of the one fetch a run performs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadOutcome {
    /// Rows were fetched and aggregated.
    Ready(WeeklyReport),
    /// The API rejected the access token; the session is logged out.
    Unauthorized(String),
    /// The request or the API failed; nothing is drawn.
    FetchFailed(String),
    /// The API answered but its rows could not be bucketed.
    InvalidData(String),
}

impl LoadOutcome {
    fn from_result(result: Result<WeeklyReport>) -> Self {
        match result {
            Ok(report) => Self::Ready(report),
            Err(e @ TrendsError::Api { status: 401, .. }) => {
                tracing::warn!(error = %e, "access token rejected");
                Self::Unauthorized(e.to_string())
            }
            Err(
                e @ (TrendsError::InvalidDateFormat(_)
                | TrendsError::InvalidCount(_)
                | TrendsError::CountOverflow(_)
                | TrendsError::MalformedRow(_)
                | TrendsError::JsonParse(_)),
            ) => {
                tracing::error!(error = %e, "analytics rows could not be aggregated");
                Self::InvalidData(e.to_string())
            }
            Err(e) => {
                tracing::warn!(error = %e, "analytics fetch failed");
                Self::FetchFailed(e.to_string())
            }
        }
    }
}

// ── DashboardLoader ───────────────────────────────────────────────────────────

/// Couples an [`EventSource`] with the aggregation settings.
#[derive(Clone)]
pub struct DashboardLoader {
    source: Arc<dyn EventSource>,
    order: WeekOrder,
}

impl DashboardLoader {
    pub fn new(source: Arc<dyn EventSource>, order: WeekOrder) -> Self {
        Self { source, order }
    }

    /// Fetch the rows and pivot them into a [`WeeklyReport`].
    ///
    /// Rows from the fetch are aggregated only after the fetch has fully
    /// completed, so a failure never yields a partial report.
    pub async fn fetch_report(&self, token: &AccessToken) -> Result<WeeklyReport> {
        let rows = self.source.fetch_rows(token).await?;
        let report = WeeklyReport::build(&rows, self.order)?;
        tracing::info!(
            weeks = report.weeks.len(),
            series = report.series_keys.len(),
            "weekly report ready"
        );
        Ok(report)
    }

    /// [`fetch_report`](Self::fetch_report), classified for display.
    pub async fn load(&self, token: &AccessToken) -> LoadOutcome {
        LoadOutcome::from_result(self.fetch_report(token).await)
    }

    /// Spawn the load on a tokio task.
    pub fn start(self, token: AccessToken) -> LoadHandle {
        let (tx, rx) = oneshot::channel();

        let handle = tokio::spawn(async move {
            let outcome = self.load(&token).await;
            if tx.send(outcome).is_err() {
                tracing::debug!("load finished after the receiver was dropped");
            }
        });

        LoadHandle { rx, handle }
    }
}

// ── LoadHandle ────────────────────────────────────────────────────────────────

/// Receiving end of a spawned load.
pub struct LoadHandle {
    rx: oneshot::Receiver<LoadOutcome>,
    handle: tokio::task::JoinHandle<()>,
}

impl LoadHandle {
    /// Non-blocking poll. `None` while the load is still running.
    pub fn try_take(&mut self) -> Option<LoadOutcome> {
        match self.rx.try_recv() {
            Ok(outcome) => Some(outcome),
            Err(oneshot::error::TryRecvError::Empty) => None,
            Err(oneshot::error::TryRecvError::Closed) => Some(LoadOutcome::FetchFailed(
                "load task ended without a result".to_string(),
            )),
        }
    }

    /// Wait for the load to finish.
    pub async fn wait(self) -> LoadOutcome {
        self.rx.await.unwrap_or_else(|_| {
            LoadOutcome::FetchFailed("load task ended without a result".to_string())
        })
    }

    /// Immediately abort the load.
    pub fn abort(&self) {
        self.handle.abort();
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
