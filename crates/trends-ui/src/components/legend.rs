use ratatui::text::{Line, Span};
use unicode_width::UnicodeWidthStr;

use trends_core::formatting::{format_count, percentage, truncate_to_width};
use trends_data::aggregator::{WeeklyAggregator, WeeklyReport};

use crate::themes::Theme;

/// Swatch drawn before each legend label.
pub const SWATCH: &str = "■ ";

/// Longest label shown before truncation, in terminal columns.
pub const MAX_LABEL_WIDTH: usize = 24;

/// Chart legend: one swatch + label + total per series, in series-key order
/// so each entry's colour matches its bar segments.
pub struct Legend<'a> {
    entries: Vec<(String, u64)>,
    grand_total: u64,
    theme: &'a Theme,
}

impl<'a> Legend<'a> {
    pub fn from_report(report: &WeeklyReport, theme: &'a Theme) -> Self {
        Self {
            entries: WeeklyAggregator::totals(&report.weeks),
            grand_total: report.grand_total(),
            theme,
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Spans for each entry, grouped so an entry is never split across lines.
    pub fn entry_spans(&self) -> Vec<Vec<Span<'static>>> {
        self.entries
            .iter()
            .enumerate()
            .map(|(i, (key, total))| {
                let pct = percentage(*total, self.grand_total, 1);
                vec![
                    Span::styled(SWATCH, self.theme.series_style(i)),
                    Span::styled(truncate_to_width(key, MAX_LABEL_WIDTH), self.theme.text),
                    Span::styled(
                        format!(" {} ({pct:.1}%)   ", format_count(*total)),
                        self.theme.dim,
                    ),
                ]
            })
            .collect()
    }

    /// Pack entries into lines no wider than `width` columns.
    pub fn to_lines(&self, width: u16) -> Vec<Line<'static>> {
        let width = usize::from(width).max(1);
        let mut lines: Vec<Line<'static>> = Vec::new();
        let mut current: Vec<Span<'static>> = Vec::new();
        let mut used = 0;

        for spans in self.entry_spans() {
            let entry_width: usize = spans.iter().map(|s| s.content.width()).sum();
            if used > 0 && used + entry_width > width {
                lines.push(Line::from(std::mem::take(&mut current)));
                used = 0;
            }
            used += entry_width;
            current.extend(spans);
        }
        if !current.is_empty() {
            lines.push(Line::from(current));
        }
        lines
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
