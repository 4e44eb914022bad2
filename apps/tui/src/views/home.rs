//! Home page: backend summary and page directory.

use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Paragraph, Wrap},
};

use crate::navigation::Route;

pub fn render_home(frame: &mut Frame, area: Rect, base_url: &str) {
    let theme = crate::theme::get_theme();

    let mut lines = vec![
        Line::styled("Flowdesk console", Style::default().fg(theme.primary).add_modifier(Modifier::BOLD)),
        Line::raw(""),
        Line::from(vec![
            Span::styled("Backend  ", Style::default().fg(theme.text_muted)),
            Span::styled(base_url.to_string(), Style::default().fg(theme.text)),
        ]),
        Line::raw(""),
    ];
    for (index, route) in Route::ALL.iter().enumerate().skip(1) {
        lines.push(Line::from(vec![
            Span::styled(format!("  {}  ", index + 1), Style::default().fg(theme.secondary)),
            Span::styled(route.title(), Style::default().fg(theme.text)),
            Span::styled(format!("  {}", route.path()), Style::default().fg(theme.text_dim)),
        ]));
    }
    lines.push(Line::raw(""));
    lines.push(Line::styled(
        "Drag a column header edge with the mouse, or use ←/→ and </> to resize columns.",
        Style::default().fg(theme.text_muted),
    ));

    let block = Block::default().borders(Borders::ALL).border_style(Style::default().fg(theme.border));
    frame.render_widget(Paragraph::new(lines).wrap(Wrap { trim: false }).block(block), area);
}
