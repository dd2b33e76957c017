use clap::Parser;

use crate::error::{Result, TrendsError};
use crate::models::AccessToken;

/// Default Google Analytics Core Reporting endpoint.
pub const DEFAULT_ENDPOINT: &str = "https://www.googleapis.com/analytics/v3/data/ga";

// ── Settings (CLI) ─────────────────────────────────────────────────────────────

/// Weekly event-action trends from Google Analytics, drawn as a stacked bar chart
#[derive(Parser, Debug, Clone)]
#[command(
    name = "event-trends",
    about = "Weekly event-action trends from Google Analytics, drawn as a stacked bar chart",
    version
)]
pub struct Settings {
    /// Analytics view id, e.g. "ga:123456"
    #[arg(long, env = "GA_VIEW_ID")]
    pub view_id: Option<String>,

    /// Chart title
    #[arg(long, env = "CHART_TITLE", default_value = "Events per week")]
    pub title: String,

    /// OAuth access token issued by the identity provider
    #[arg(long, env = "GA_ACCESS_TOKEN", hide_env_values = true)]
    pub access_token: Option<String>,

    /// Analytics query endpoint
    #[arg(long, env = "GA_ENDPOINT", default_value = DEFAULT_ENDPOINT)]
    pub endpoint: String,

    /// Output view
    #[arg(long, default_value = "chart", value_parser = ["chart", "table", "json"])]
    pub view: String,

    /// Week ordering: as first seen in the API response, or sorted by week
    #[arg(long, default_value = "first-seen", value_parser = ["first-seen", "chronological"])]
    pub order: String,

    /// Display theme
    #[arg(long, default_value = "auto", value_parser = ["light", "dark", "classic", "auto"])]
    pub theme: String,

    /// Logging level
    #[arg(long, default_value = "INFO", value_parser = ["DEBUG", "INFO", "WARNING", "ERROR"])]
    pub log_level: String,

    /// Enable debug logging
    #[arg(long)]
    pub debug: bool,
}

// ── Settings impl ──────────────────────────────────────────────────────────────

impl Settings {
    /// Parse the process arguments and apply the `--debug` override.
    pub fn load() -> Self {
        Self::resolve(Settings::parse())
    }

    /// Same as [`Settings::load`] but from an explicit argument list.
    pub fn load_from_args<I, T>(args: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        Self::resolve(Settings::parse_from(args))
    }

    fn resolve(mut settings: Settings) -> Settings {
        if settings.debug {
            settings.log_level = "DEBUG".to_string();
        }
        settings
    }

    /// The access token, if one was supplied. Empty strings count as absent.
    pub fn token(&self) -> Option<AccessToken> {
        self.access_token
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(AccessToken::new)
    }

    /// Check combinations clap cannot express on its own.
    pub fn validate(&self) -> Result<()> {
        let has_view_id = self
            .view_id
            .as_deref()
            .is_some_and(|v| !v.trim().is_empty());

        if self.token().is_some() && !has_view_id {
            return Err(TrendsError::Config(
                "an access token was given but no --view-id / GA_VIEW_ID".to_string(),
            ));
        }
        if self.view == "json" && self.token().is_none() {
            return Err(TrendsError::Config(
                "--view json needs an access token (--access-token / GA_ACCESS_TOKEN)"
                    .to_string(),
            ));
        }
        Ok(())
    }
}

// ── Tests ──────────────────────────────────────────────────────────────────────
