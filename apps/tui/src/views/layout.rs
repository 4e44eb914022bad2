//! Global layout structure for the TUI application.
//!
//! - Sidebar (fixed width): page list
//! - Main area (flexible): the current page
//! - Footer (fixed, height 1): global key hints

use ratatui::{
    layout::{Constraint, Layout, Rect},
    prelude::*,
};

use crate::components::SIDEBAR_WIDTH;

/// Global layout structure for the TUI
pub struct GlobalLayout;

impl GlobalLayout {
    /// Returns `[sidebar, main, footer]`.
    pub fn create(area: Rect) -> [Rect; 3] {
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(0), Constraint::Length(1)])
            .split(area);
        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Length(SIDEBAR_WIDTH), Constraint::Min(0)])
            .split(rows[0]);
        [columns[0], columns[1], rows[1]]
    }

    /// Splits a page into `[status line, body, hints]`.
    pub fn page(area: Rect) -> [Rect; 3] {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(1), Constraint::Min(3), Constraint::Length(1)])
            .split(area);
        [chunks[0], chunks[1], chunks[2]]
    }
}
