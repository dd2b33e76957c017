mod bootstrap;

use std::sync::Arc;

use anyhow::{anyhow, bail, Result};
use trends_core::settings::Settings;
use trends_data::aggregator::WeekOrder;
use trends_runtime::client::AnalyticsClient;
use trends_runtime::loader::DashboardLoader;
use trends_runtime::session::SessionState;
use trends_ui::app::{App, ViewMode};

/// Where the report goes.
#[derive(Debug, PartialEq, Eq)]
enum Output {
    Json,
    Tui(ViewMode),
}

/// Map `--view` to an [`Output`]. clap already limits the values; anything
/// else is an error rather than a silent exit.
fn output_for(view: &str) -> Result<Output> {
    match view {
        "json" => Ok(Output::Json),
        "chart" => Ok(Output::Tui(ViewMode::Chart)),
        "table" => Ok(Output::Tui(ViewMode::Table)),
        unknown => bail!("unknown view mode: {unknown}"),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let settings = Settings::load();

    bootstrap::setup_logging(&settings.log_level)?;
    settings.validate()?;

    tracing::info!("event-trends v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        "View: {}, Order: {}, Theme: {}",
        settings.view,
        settings.order,
        settings.theme
    );

    let order: WeekOrder = settings.order.parse()?;
    let view_id = settings.view_id.clone().unwrap_or_default();
    let client = AnalyticsClient::new(settings.endpoint.clone(), view_id);
    let loader = DashboardLoader::new(Arc::new(client), order);

    match output_for(&settings.view)? {
        Output::Json => {
            let token = settings
                .token()
                .ok_or_else(|| anyhow!("no access token"))?;
            let report = loader.fetch_report(&token).await?;
            println!("{}", serde_json::to_string_pretty(&report.weeks)?);
        }

        Output::Tui(view_mode) => {
            let session = SessionState::from_token(settings.token());
            tracing::info!(logged_in = session.is_logged_in(), "session ready");
            let app = App::new(
                &settings.theme,
                view_mode,
                settings.title.clone(),
                settings.view_id.clone(),
            );

            // The loop exits on 'q' / Ctrl+C inside the TUI. The OS-level
            // Ctrl+C handler covers signals that arrive outside raw mode.
            tokio::select! {
                result = app.run(session, loader) => {
                    result?;
                }
                _ = tokio::signal::ctrl_c() => {
                    tracing::info!("Ctrl+C received; shutting down");
                }
            }
        }
    }

    Ok(())
}

// ── Tests ──────────────────────────────────────────────────────────────────────
