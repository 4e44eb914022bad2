//! Executions page renderer.

use ratatui::{prelude::*, widgets::Paragraph};

use crate::components::help_row::{EXECUTION_HINTS, render_help_row};
use crate::state::ExecutionsPage;
use crate::views::layout::GlobalLayout;

pub fn render_executions(frame: &mut Frame, area: Rect, page: &mut ExecutionsPage) {
    let theme = crate::theme::get_theme();
    let [status_area, body, hints_area] = GlobalLayout::page(area);

    let view = page.view();
    let pagination = view.pagination();
    let muted = Style::default().fg(theme.text_muted);
    let mut spans = vec![
        Span::styled(
            format!("Page {}/{}", pagination.page, pagination.total_pages),
            Style::default().fg(theme.text).add_modifier(Modifier::BOLD),
        ),
        Span::styled(format!(" • {} per page • ", pagination.page_size), muted),
        Span::styled(page.filter_summary(), Style::default().fg(theme.secondary)),
    ];
    if view.is_loading() {
        spans.push(Span::styled(" • Loading…", muted));
    }
    if let Some(error) = view.error() {
        spans.push(Span::styled(format!(" • ✗ {}", error), Style::default().fg(theme.error)));
    }
    frame.render_widget(Paragraph::new(Line::from(spans)), status_area);

    let lines = page.lines();
    page.table_mut().render(frame, body, "Executions", lines);

    render_help_row(frame, hints_area, EXECUTION_HINTS);
}
