//! Stacked weekly bar chart.
//!
//! One bar per [`WeeklySeriesRecord`], one coloured segment per series key,
//! stacked bottom-up in series-key order. A series absent from a week draws
//! nothing for that week.

use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Direction, Layout, Rect},
    widgets::{Block, Borders, Paragraph, Widget},
    Frame,
};
use unicode_width::UnicodeWidthStr;

use trends_core::formatting::format_compact;
use trends_core::models::WeeklySeriesRecord;
use trends_data::aggregator::WeeklyReport;

use crate::components::legend::Legend;
use crate::themes::{series_color, Theme};

/// Widest slot a single week may take, bar plus gap.
const MAX_SLOT: u16 = 9;
/// Legend never takes more than this many rows.
const MAX_LEGEND_ROWS: u16 = 6;

const BAR_SYMBOL: &str = "█";

// ── Layout helpers ────────────────────────────────────────────────────────────

/// Horizontal placement of the bars within the plot area.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BarLayout {
    /// Index of the first week drawn. Weeks before it do not fit.
    pub first_week: usize,
    /// Number of weeks drawn.
    pub visible: usize,
    /// Columns per week, bar plus gap.
    pub slot: u16,
    /// Columns of the bar itself.
    pub bar_width: u16,
}

/// Fit `weeks` bars into `plot_width` columns.
///
/// When there are more weeks than columns, the trailing (most recent) weeks
/// are kept.
pub fn bar_layout(weeks: usize, plot_width: u16) -> BarLayout {
    let visible = weeks.min(usize::from(plot_width));
    if visible == 0 {
        return BarLayout {
            first_week: weeks,
            visible: 0,
            slot: 0,
            bar_width: 0,
        };
    }

    let slot = (usize::from(plot_width) / visible).min(usize::from(MAX_SLOT)) as u16;
    let bar_width = if slot >= 2 { slot - 1 } else { 1 };

    BarLayout {
        first_week: weeks - visible,
        visible,
        slot,
        bar_width,
    }
}

/// Rows a value occupies when `scale_max` maps to `height` rows, rounded to
/// the nearest row.
fn scaled_rows(value: u64, scale_max: u64, height: u16) -> u16 {
    if scale_max == 0 {
        return 0;
    }
    let rows = (u128::from(value) * u128::from(height) + u128::from(scale_max) / 2)
        / u128::from(scale_max);
    rows.min(u128::from(height)) as u16
}

/// Segment heights for one bar as `(series index, rows)` pairs, bottom-up.
///
/// Heights come from rounding the running total, so the segments of a bar
/// always add up to the bar's own rounded height. Segments that round to
/// zero rows are dropped.
pub fn segment_rows(
    week: &WeeklySeriesRecord,
    series_keys: &[String],
    scale_max: u64,
    height: u16,
) -> Vec<(usize, u16)> {
    let mut segments = Vec::new();
    let mut running = 0u64;
    let mut drawn = 0u16;

    for (index, key) in series_keys.iter().enumerate() {
        let Some(value) = week.get(key) else {
            continue;
        };
        running = running.saturating_add(value);
        let top = scaled_rows(running, scale_max, height);
        if top > drawn {
            segments.push((index, top - drawn));
            drawn = top;
        }
    }
    segments
}

// ── StackedBarChart ───────────────────────────────────────────────────────────

/// Widget drawing the axes, bars and week labels of a [`WeeklyReport`].
pub struct StackedBarChart<'a> {
    report: &'a WeeklyReport,
    theme: &'a Theme,
}

impl<'a> StackedBarChart<'a> {
    pub fn new(report: &'a WeeklyReport, theme: &'a Theme) -> Self {
        Self { report, theme }
    }
}

impl Widget for StackedBarChart<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        // Axis label column, plot rows, x-axis row and week-label row.
        if area.height < 4 || area.width < 6 {
            return;
        }

        let scale_max = self.report.max_week_total();
        let top_label = format_compact(scale_max);
        let label_width = top_label.width().max(1) as u16;
        let axis_x = area.x + label_width;

        let plot = Rect {
            x: axis_x + 1,
            y: area.y,
            width: area.width.saturating_sub(label_width + 1),
            height: area.height - 2,
        };
        let axis_y = plot.bottom();
        let label_y = axis_y + 1;

        // Axes.
        for y in plot.top()..plot.bottom() {
            buf.set_string(axis_x, y, "│", self.theme.axis);
        }
        buf.set_string(axis_x, axis_y, "└", self.theme.axis);
        for x in plot.left()..plot.right() {
            buf.set_string(x, axis_y, "─", self.theme.axis);
        }

        // Y-axis ticks: max at the top, half-way, zero on the axis row.
        let tick = |value: u64, y: u16, buf: &mut Buffer| {
            let text = format_compact(value);
            let pad = label_width.saturating_sub(text.width() as u16);
            buf.set_stringn(area.x + pad, y, &text, usize::from(label_width), self.theme.axis_label);
        };
        tick(0, axis_y, buf);
        if scale_max > 0 {
            tick(scale_max, plot.top(), buf);
            if plot.height >= 6 {
                let half = scale_max / 2;
                let half_y = axis_y - scaled_rows(half, scale_max, plot.height).max(1);
                if half_y > plot.top() {
                    tick(half, half_y, buf);
                }
            }
        }

        // Bars.
        let weeks = &self.report.weeks;
        let layout = bar_layout(weeks.len(), plot.width);
        for (i, week) in weeks[layout.first_week..].iter().enumerate() {
            let x0 = plot.x + i as u16 * layout.slot;
            let mut y = axis_y;
            for (series, rows) in
                segment_rows(week, &self.report.series_keys, scale_max, plot.height)
            {
                let color = series_color(series);
                for _ in 0..rows {
                    y -= 1;
                    for dx in 0..layout.bar_width {
                        if let Some(cell) = buf.cell_mut((x0 + dx, y)) {
                            cell.set_symbol(BAR_SYMBOL).set_fg(color);
                        }
                    }
                }
            }
        }

        // Week labels, skipping some when they would overlap.
        if layout.visible == 0 {
            return;
        }
        let widest = weeks[layout.first_week..]
            .iter()
            .map(|w| w.week_number.to_string().width())
            .max()
            .unwrap_or(1) as u16;
        let stride = (widest + 1).div_ceil(layout.slot).max(1);
        for (i, week) in weeks[layout.first_week..]
            .iter()
            .enumerate()
            .step_by(usize::from(stride))
        {
            let x = plot.x + i as u16 * layout.slot;
            let room = usize::from(plot.right().saturating_sub(x));
            buf.set_stringn(
                x,
                label_y,
                week.week_number.to_string(),
                room,
                self.theme.axis_label,
            );
        }
    }
}

// ── View ──────────────────────────────────────────────────────────────────────

/// Render the chart and its legend inside a bordered block titled `title`.
pub fn render_chart_view(
    frame: &mut Frame,
    area: Rect,
    title: &str,
    report: &WeeklyReport,
    theme: &Theme,
) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title(format!(" {} ", title))
        .style(theme.text);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let legend = Legend::from_report(report, theme);
    let legend_lines = legend.to_lines(inner.width);
    let legend_rows = (legend_lines.len() as u16).min(MAX_LEGEND_ROWS);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(4),
            Constraint::Length(1),
            Constraint::Length(legend_rows),
        ])
        .split(inner);

    frame.render_widget(StackedBarChart::new(report, theme), chunks[0]);
    frame.render_widget(Paragraph::new(legend_lines), chunks[2]);
}

// ── Tests ──────────────────────────────────────────────────────────────────────
