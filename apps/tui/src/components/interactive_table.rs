//! Interactive table component for record lists.
//!
//! Provides a table widget with keyboard selection, a column cursor for
//! keyboard resizing and pointer-drag resizing on header boundaries.
//! Detail lines under an expanded record span the full width and are
//! skipped by selection.

use flowdesk_core::columns::{ColumnWidths, DragHandle};
use ratatui::{
    prelude::*,
    widgets::{Block, Borders, HighlightSpacing, List, ListItem, ListState, Paragraph},
};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Selection marker drawn before every line.
const HIGHLIGHT_SYMBOL: &str = "▶ ";
/// Cells between two columns.
const COLUMN_SPACING: u16 = 1;
/// How far from a boundary a press still grabs it.
const GRAB_SLOP: u16 = 1;

/// One cell of a record row.
#[derive(Debug, Clone)]
pub struct TableCell {
    pub text: String,
    pub style: Style,
}

impl TableCell {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into(), style: Style::default() }
    }

    pub fn styled(text: impl Into<String>, style: Style) -> Self {
        Self { text: text.into(), style }
    }
}

impl From<String> for TableCell {
    fn from(text: String) -> Self {
        Self::new(text)
    }
}

impl From<&str> for TableCell {
    fn from(text: &str) -> Self {
        Self::new(text)
    }
}

#[derive(Debug, Clone)]
enum LineKind {
    Record(Vec<TableCell>),
    /// Free text spanning the whole table width
    Detail { text: String, style: Style },
}

/// One rendered line of the table.
#[derive(Debug, Clone)]
pub struct TableLine {
    kind: LineKind,
}

impl TableLine {
    /// A selectable record row.
    pub fn record(cells: Vec<TableCell>) -> Self {
        Self { kind: LineKind::Record(cells) }
    }

    /// A detail block shown under its record.
    pub fn detail(text: impl Into<String>, style: Style) -> Self {
        Self { kind: LineKind::Detail { text: text.into(), style } }
    }

    pub fn is_selectable(&self) -> bool {
        matches!(self.kind, LineKind::Record(_))
    }
}

/// Pads or cuts `text` to exactly `width` terminal cells.
fn fit(text: &str, width: u16) -> String {
    let width = usize::from(width);
    let flat = text.replace(['\n', '\r', '\t'], " ");
    if flat.width() <= width {
        return format!("{:<pad$}", flat, pad = width - flat.width() + flat.chars().count());
    }
    let mut out = String::new();
    let mut used = 0;
    for ch in flat.chars() {
        let w = ch.width().unwrap_or(0);
        if used + w + 1 > width {
            break;
        }
        out.push(ch);
        used += w;
    }
    out.push('…');
    used += 1;
    out.push_str(&" ".repeat(width.saturating_sub(used)));
    out
}

/// Interactive table component for displaying selectable records
#[derive(Debug)]
pub struct InteractiveTable {
    state: ListState,
    /// Index among selectable lines
    selected: usize,
    selectable_count: usize,
    headers: Vec<&'static str>,
    widths: ColumnWidths,
    /// Column targeted by `<` / `>`
    column_cursor: usize,
    drag: DragHandle,
    /// Header row of the last render, starting at the first column
    header_area: Option<Rect>,
}

impl InteractiveTable {
    /// Creates a table from `(key, header, default width)` triples.
    pub fn new(columns: &[(&'static str, &'static str, u16)], min_width: u16) -> Self {
        let defaults: Vec<(&'static str, u16)> = columns.iter().map(|(key, _, w)| (*key, *w)).collect();
        Self {
            state: ListState::default(),
            selected: 0,
            selectable_count: 0,
            headers: columns.iter().map(|(_, header, _)| *header).collect(),
            widths: ColumnWidths::new(&defaults, min_width),
            column_cursor: 0,
            drag: DragHandle::new(),
            header_area: None,
        }
    }

    pub fn widths(&self) -> &ColumnWidths {
        &self.widths
    }

    /// Updates the number of selectable lines and keeps the selection in range.
    pub fn set_selectable_count(&mut self, count: usize) {
        self.selectable_count = count;
        if self.selected >= count {
            self.selected = count.saturating_sub(1);
        }
    }

    pub fn previous(&mut self) {
        if self.selectable_count > 0 {
            self.selected = if self.selected == 0 { self.selectable_count - 1 } else { self.selected - 1 };
        }
    }

    pub fn next(&mut self) {
        if self.selectable_count > 0 {
            self.selected = (self.selected + 1) % self.selectable_count;
        }
    }

    /// Index of the selected line among selectable lines.
    pub fn selected(&self) -> Option<usize> {
        (self.selectable_count > 0).then_some(self.selected)
    }

    pub fn set_selected(&mut self, index: usize) {
        if index < self.selectable_count {
            self.selected = index;
        }
    }

    // Columns

    pub fn column_cursor(&self) -> usize {
        self.column_cursor
    }

    pub fn next_column(&mut self) {
        if !self.widths.is_empty() {
            self.column_cursor = (self.column_cursor + 1) % self.widths.len();
        }
    }

    pub fn previous_column(&mut self) {
        if !self.widths.is_empty() {
            self.column_cursor = (self.column_cursor + self.widths.len() - 1) % self.widths.len();
        }
    }

    /// Grows or shrinks the column under the cursor.
    pub fn resize_selected_column(&mut self, delta: i32) {
        let key = self.widths.keys().nth(self.column_cursor);
        if let Some(key) = key {
            self.widths.adjust(key, delta);
        }
    }

    // Pointer

    /// Starts a resize when the press lands on a header boundary.
    pub fn mouse_down(&mut self, x: u16, y: u16) -> bool {
        let Some(header) = self.header_area else {
            return false;
        };
        if y != header.y || x < header.x {
            return false;
        }
        match self.widths.boundary_at(header.x, COLUMN_SPACING, x, GRAB_SLOP) {
            Some(key) => {
                self.drag.press(key, x, self.widths.width(key));
                true
            }
            None => false,
        }
    }

    pub fn mouse_drag(&mut self, x: u16) -> bool {
        self.drag.drag(x, &mut self.widths).is_some()
    }

    pub fn mouse_up(&mut self) {
        self.drag.release();
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_active()
    }

    /// Renders the table with the given lines.
    pub fn render(&mut self, frame: &mut Frame, area: Rect, title: &str, lines: Vec<TableLine>) {
        let theme = crate::theme::get_theme();
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme.border))
            .title(Span::styled(format!(" {} ", title), Style::default().fg(theme.primary).bold()));
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let marker = HIGHLIGHT_SYMBOL.width() as u16;
        let header = Rect {
            x: inner.x + marker,
            y: inner.y,
            width: inner.width.saturating_sub(marker),
            height: 1.min(inner.height),
        };
        self.header_area = Some(header);

        let header_style = Style::default().fg(theme.primary).add_modifier(Modifier::BOLD);
        let mut header_spans = Vec::new();
        for (index, (header_text, key)) in self.headers.iter().zip(self.widths.keys()).enumerate() {
            if index > 0 {
                header_spans.push(Span::raw(" ".repeat(usize::from(COLUMN_SPACING))));
            }
            let style = if index == self.column_cursor {
                header_style.add_modifier(Modifier::UNDERLINED)
            } else {
                header_style
            };
            header_spans.push(Span::styled(fit(header_text, self.widths.width(key)), style));
        }
        frame.render_widget(Paragraph::new(Line::from(header_spans)), header);

        let body = Rect {
            x: inner.x,
            y: inner.y.saturating_add(1),
            width: inner.width,
            height: inner.height.saturating_sub(1),
        };

        if lines.is_empty() {
            let empty = Paragraph::new("No records")
                .style(Style::default().fg(theme.text_muted))
                .alignment(Alignment::Center);
            frame.render_widget(empty, body);
            self.set_selectable_count(0);
            self.state.select(None);
            return;
        }

        self.set_selectable_count(lines.iter().filter(|line| line.is_selectable()).count());
        let list_index = lines
            .iter()
            .enumerate()
            .filter(|(_, line)| line.is_selectable())
            .nth(self.selected)
            .map(|(index, _)| index);
        self.state.select(list_index);

        let detail_width = header.width.saturating_sub(2).max(8) as usize;
        let items: Vec<ListItem> = lines
            .into_iter()
            .map(|line| match line.kind {
                LineKind::Record(cells) => {
                    let mut spans = Vec::new();
                    for (index, key) in self.widths.keys().enumerate() {
                        if index > 0 {
                            spans.push(Span::raw(" ".repeat(usize::from(COLUMN_SPACING))));
                        }
                        let cell = cells.get(index).cloned().unwrap_or_else(|| TableCell::new(""));
                        spans.push(Span::styled(fit(&cell.text, self.widths.width(key)), cell.style));
                    }
                    ListItem::new(Line::from(spans)).style(Style::default().fg(theme.text))
                }
                LineKind::Detail { text, style } => {
                    let wrapped: Vec<Line> = text
                        .lines()
                        .flat_map(|paragraph| textwrap::wrap(paragraph, detail_width))
                        .map(|part| Line::styled(format!("  {}", part), style))
                        .collect();
                    ListItem::new(Text::from(wrapped))
                }
            })
            .collect();

        let list = List::new(items)
            .highlight_style(Style::default().bg(theme.bg_element).add_modifier(Modifier::BOLD))
            .highlight_symbol(HIGHLIGHT_SYMBOL)
            .highlight_spacing(HighlightSpacing::Always);

        frame.render_stateful_widget(list, body, &mut self.state);
    }
}
