//! Full-screen placeholder panels shown instead of the chart.

use ratatui::{
    layout::Rect,
    text::{Line, Span, Text},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

use trends_runtime::client::ANALYTICS_SCOPE;

use crate::themes::Theme;

const EXIT_HINT: &str = "Press 'q' or Ctrl+C to exit";

fn render_panel(frame: &mut Frame, area: Rect, title: &str, lines: Vec<Line<'static>>) {
    let paragraph = Paragraph::new(Text::from(lines))
        .wrap(Wrap { trim: true })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!(" {} ", title)),
        );
    frame.render_widget(paragraph, area);
}

/// Shown while no access token is available. `reason` explains why a
/// previously accepted token was dropped.
pub fn render_login_required(
    frame: &mut Frame,
    area: Rect,
    title: &str,
    reason: Option<&str>,
    theme: &Theme,
) {
    let mut lines = vec![
        Line::from(""),
        Line::from(Span::styled("Not logged in", theme.warning)),
    ];
    if let Some(reason) = reason {
        lines.push(Line::from(Span::styled(reason.to_string(), theme.error)));
    }
    lines.extend([
        Line::from(""),
        Line::from(Span::styled(
            "Sign in with your identity provider and pass the access token with",
            theme.text,
        )),
        Line::from(Span::styled(
            "--access-token or GA_ACCESS_TOKEN.",
            theme.text,
        )),
        Line::from(vec![
            Span::styled("Required scope: ", theme.label),
            Span::styled(ANALYTICS_SCOPE, theme.value),
        ]),
        Line::from(""),
        Line::from(Span::styled(EXIT_HINT, theme.dim)),
    ]);
    render_panel(frame, area, title, lines);
}

/// Shown while the single fetch is in flight.
pub fn render_loading(frame: &mut Frame, area: Rect, title: &str, theme: &Theme) {
    let lines = vec![
        Line::from(""),
        Line::from(Span::styled("Fetching analytics...", theme.info)),
        Line::from(""),
        Line::from(Span::styled(EXIT_HINT, theme.dim)),
    ];
    render_panel(frame, area, title, lines);
}

/// Shown when the fetch or the aggregation failed. Nothing is charted.
pub fn render_failed(
    frame: &mut Frame,
    area: Rect,
    title: &str,
    headline: &str,
    message: &str,
    theme: &Theme,
) {
    let lines = vec![
        Line::from(""),
        Line::from(Span::styled(headline.to_string(), theme.error)),
        Line::from(""),
        Line::from(Span::styled(message.to_string(), theme.text)),
        Line::from(""),
        Line::from(Span::styled(EXIT_HINT, theme.dim)),
    ];
    render_panel(frame, area, title, lines);
}

/// Shown when the query succeeded but returned no rows.
pub fn render_no_data(frame: &mut Frame, area: Rect, title: &str, theme: &Theme) {
    let lines = vec![
        Line::from(""),
        Line::from(Span::styled("No events recorded", theme.warning)),
        Line::from(""),
        Line::from(Span::styled(
            "The view returned no rows for the last 180 days.",
            theme.dim,
        )),
        Line::from(Span::styled(EXIT_HINT, theme.dim)),
    ];
    render_panel(frame, area, title, lines);
}

// ── Tests ──────────────────────────────────────────────────────────────────────
