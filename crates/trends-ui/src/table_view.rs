//! Weekly table view.
//!
//! Same data as the chart: one row per week, one column per series key in
//! series order, then a per-week total and a highlighted totals row.

use ratatui::{
    layout::{Constraint, Rect},
    widgets::{Block, Borders, Cell, Row, Table},
    Frame,
};
use unicode_width::UnicodeWidthStr;

use trends_core::formatting::{format_count, truncate_to_width};
use trends_data::aggregator::{WeeklyAggregator, WeeklyReport};

use crate::components::legend::MAX_LABEL_WIDTH;
use crate::themes::Theme;

const WEEK_COLUMN: &str = "Week";
const TOTAL_COLUMN: &str = "Total";
const TOTAL_ROW: &str = "TOTAL";

/// Header labels: week, one per series key, total.
pub fn header_labels(report: &WeeklyReport) -> Vec<String> {
    let mut labels = Vec::with_capacity(report.series_keys.len() + 2);
    labels.push(WEEK_COLUMN.to_string());
    labels.extend(
        report
            .series_keys
            .iter()
            .map(|k| truncate_to_width(k, MAX_LABEL_WIDTH)),
    );
    labels.push(TOTAL_COLUMN.to_string());
    labels
}

/// Cell text for each week. A series absent from a week is an empty cell,
/// not a zero.
pub fn week_rows(report: &WeeklyReport) -> Vec<Vec<String>> {
    report
        .weeks
        .iter()
        .map(|week| {
            let mut cells = Vec::with_capacity(report.series_keys.len() + 2);
            cells.push(week.week_number.to_string());
            cells.extend(
                report
                    .series_keys
                    .iter()
                    .map(|key| week.get(key).map(format_count).unwrap_or_default()),
            );
            cells.push(format_count(week.total()));
            cells
        })
        .collect()
}

/// Cell text for the totals row.
pub fn totals_row(report: &WeeklyReport) -> Vec<String> {
    let mut cells = vec![TOTAL_ROW.to_string()];
    cells.extend(
        WeeklyAggregator::totals(&report.weeks)
            .into_iter()
            .map(|(_, total)| format_count(total)),
    );
    cells.push(format_count(report.grand_total()));
    cells
}

/// Render the weekly table into `area` inside a bordered block.
pub fn render_table_view(
    frame: &mut Frame,
    area: Rect,
    title: &str,
    report: &WeeklyReport,
    theme: &Theme,
) {
    let labels = header_labels(report);
    let body = week_rows(report);
    let totals = totals_row(report);

    // Each column is as wide as its widest cell, plus one for spacing.
    let widths: Vec<Constraint> = (0..labels.len())
        .map(|col| {
            let widest = std::iter::once(&labels)
                .chain(body.iter())
                .chain(std::iter::once(&totals))
                .map(|row| row[col].width())
                .max()
                .unwrap_or(0);
            Constraint::Length(widest as u16 + 1)
        })
        .collect();

    let header = Row::new(
        labels
            .into_iter()
            .map(|l| Cell::from(l).style(theme.table_header)),
    )
    .height(1);

    let mut rows: Vec<Row> = body
        .into_iter()
        .enumerate()
        .map(|(i, cells)| {
            let style = if i % 2 == 0 {
                theme.table_row
            } else {
                theme.table_row_alt
            };
            Row::new(cells.into_iter().map(Cell::from)).style(style)
        })
        .collect();
    rows.push(Row::new(totals.into_iter().map(Cell::from)).style(theme.table_total));

    let table = Table::new(rows, widths)
        .header(header)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!(" {} ", title)),
        )
        .style(theme.text);

    frame.render_widget(table, area);
}

// ── Tests ──────────────────────────────────────────────────────────────────────
