use crate::themes::Theme;
use ratatui::text::{Line, Span};

/// Dashboard header rendering three lines:
///
/// 1. The chart title.
/// 2. A separator as wide as the title line (at least 40 columns).
/// 3. Query information in `[ view | window | N weeks ]` format.
pub struct Header<'a> {
    /// Chart title shown on the first line.
    pub title: &'a str,
    /// Analytics view id, or `None` before one is configured.
    pub view_id: Option<&'a str>,
    /// Number of weeks on screen, or `None` while nothing is loaded.
    pub weeks: Option<usize>,
    /// Theme providing colour styles for each part of the header.
    pub theme: &'a Theme,
}

impl<'a> Header<'a> {
    pub fn new(title: &'a str, view_id: Option<&'a str>, theme: &'a Theme) -> Self {
        Self {
            title,
            view_id,
            weeks: None,
            theme,
        }
    }

    pub fn with_weeks(mut self, weeks: usize) -> Self {
        self.weeks = Some(weeks);
        self
    }

    /// Render the header as exactly three lines.
    pub fn to_lines(&self) -> Vec<Line<'a>> {
        let separator = "=".repeat(self.title.chars().count().max(40));

        let mut info = vec![
            Span::styled("[ ", self.theme.label),
            Span::styled(self.view_id.unwrap_or("no view"), self.theme.value),
            Span::styled(" | ", self.theme.label),
            Span::styled("last 180 days", self.theme.value),
        ];
        if let Some(weeks) = self.weeks {
            info.push(Span::styled(" | ", self.theme.label));
            info.push(Span::styled(
                format!("{weeks} week{}", if weeks == 1 { "" } else { "s" }),
                self.theme.value,
            ));
        }
        info.push(Span::styled(" ]", self.theme.label));

        vec![
            Line::from(Span::styled(self.title, self.theme.header)),
            Line::from(Span::styled(separator, self.theme.separator)),
            Line::from(info),
        ]
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn text(line: &Line) -> String {
        line.spans.iter().map(|s| s.content.as_ref()).collect()
    }

    #[test]
    fn test_header_line_count() {
        let theme = Theme::dark();
        let lines = Header::new("Events per week", Some("ga:1"), &theme).to_lines();
        assert_eq!(lines.len(), 3);
    }

    #[test]
    fn test_header_title_line() {
        let theme = Theme::dark();
        let lines = Header::new("Signups", None, &theme).to_lines();
        assert_eq!(text(&lines[0]), "Signups");
    }

    #[test]
    fn test_header_separator_min_width() {
        let theme = Theme::dark();
        let lines = Header::new("Short", None, &theme).to_lines();
        let sep = text(&lines[1]);
        assert_eq!(sep.chars().count(), 40);
        assert!(sep.chars().all(|c| c == '='));
    }

    #[test]
    fn test_header_info_without_weeks() {
        let theme = Theme::dark();
        let lines = Header::new("T", Some("ga:99"), &theme).to_lines();
        assert_eq!(text(&lines[2]), "[ ga:99 | last 180 days ]");
    }

    #[test]
    fn test_header_info_with_weeks() {
        let theme = Theme::dark();
        let lines = Header::new("T", None, &theme).with_weeks(26).to_lines();
        assert_eq!(text(&lines[2]), "[ no view | last 180 days | 26 weeks ]");

        let lines = Header::new("T", None, &theme).with_weeks(1).to_lines();
        assert!(text(&lines[2]).contains("1 week ]"));
    }
}
