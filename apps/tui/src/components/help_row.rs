//! Help row component for displaying the key hints of the current page.

use ratatui::{prelude::*, widgets::Paragraph};

/// Key hints shared by every record page.
pub const RECORD_HINTS: &[(&str, &str)] = &[
    ("↑↓", "select"),
    ("e", "edit"),
    ("n", "new"),
    ("d", "delete"),
    ("r", "reload"),
    ("←→ </>", "column"),
];

/// Key hints of the executions page.
pub const EXECUTION_HINTS: &[(&str, &str)] = &[
    ("f", "filters"),
    ("[ ]", "page"),
    ("{ }", "first/last"),
    ("+/-", "page size"),
    ("Enter", "expand"),
    ("o", "output"),
    ("a/A", "all"),
];

/// Renders a single row of `key description` pairs.
pub fn render_help_row(frame: &mut Frame, area: Rect, hints: &[(&str, &str)]) {
    let theme = crate::theme::get_theme();

    let mut spans = Vec::with_capacity(hints.len() * 3);
    for (index, (key, description)) in hints.iter().enumerate() {
        if index > 0 {
            spans.push(Span::styled(" • ", Style::default().fg(theme.text_dim)));
        }
        spans.push(Span::styled(*key, Style::default().fg(theme.secondary)));
        spans.push(Span::styled(format!(" {}", description), Style::default().fg(theme.text_muted)));
    }

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}
