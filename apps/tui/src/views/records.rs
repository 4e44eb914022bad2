//! Renderer shared by the record pages.

use ratatui::{prelude::*, widgets::Paragraph};

use crate::components::help_row::{RECORD_HINTS, render_help_row};
use crate::state::CrudPage;
use crate::views::layout::GlobalLayout;

/// Renders a record page: status line, table and key hints.
///
/// `context` is shown after the row count (the Steps filter, for instance).
pub fn render_record_page<P: CrudPage>(
    frame: &mut Frame,
    area: Rect,
    page: &mut P,
    context: Option<String>,
    extra_hints: &[(&str, &str)],
) {
    let theme = crate::theme::get_theme();
    let [status_area, body, hints_area] = GlobalLayout::page(area);

    let list = page.list();
    let status = if let Some(error) = list.error() {
        Line::styled(format!("✗ {}", error), Style::default().fg(theme.error))
    } else if list.is_loading() || !list.is_loaded() {
        Line::styled("Loading…", Style::default().fg(theme.text_muted))
    } else {
        let mut text = format!("{} records", page.visible().len());
        if let Some(context) = context {
            text.push_str(" • ");
            text.push_str(&context);
        }
        Line::styled(text, Style::default().fg(theme.text_muted))
    };
    frame.render_widget(Paragraph::new(status), status_area);

    let title = page.title();
    let lines = page.lines();
    page.table_mut().render(frame, body, title, lines);

    let mut hints: Vec<(&str, &str)> = RECORD_HINTS.to_vec();
    hints.extend_from_slice(extra_hints);
    render_help_row(frame, hints_area, &hints);
}
