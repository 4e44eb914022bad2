//! Sidebar listing every page of the console.

use ratatui::{
    prelude::*,
    widgets::{Block, Borders, List, ListItem},
};

use crate::navigation::Route;

/// Width of the sidebar column.
pub const SIDEBAR_WIDTH: u16 = 22;

pub fn render_sidebar(frame: &mut Frame, area: Rect, current: Route) {
    let theme = crate::theme::get_theme();

    let items: Vec<ListItem> = Route::ALL
        .iter()
        .enumerate()
        .map(|(index, route)| {
            let active = *route == current;
            let style = if active {
                Style::default().fg(theme.bg_primary).bg(theme.primary).add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(theme.text)
            };
            ListItem::new(Line::from(vec![
                Span::styled(format!(" {} ", index + 1), Style::default().fg(theme.text_dim)),
                Span::raw(route.title()),
            ]))
            .style(style)
        })
        .collect();

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.border))
        .title(Span::styled(" Flowdesk ", Style::default().fg(theme.primary).bold()));

    frame.render_widget(List::new(items).block(block), area);
}
