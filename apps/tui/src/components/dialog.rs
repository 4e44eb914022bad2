//! Confirmation dialog shown before destructive actions.

use crossterm::event::KeyCode;
use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Clear, List, ListItem, Paragraph, Wrap},
};

/// Value returned when the operator confirms.
pub const CONFIRM: &str = "confirm";
/// Value returned when the operator backs out.
pub const CANCEL: &str = "cancel";

/// A choice in a dialog menu.
#[derive(Debug, Clone)]
pub struct DialogChoice {
    /// Display title
    pub title: String,
    /// Value to return when selected
    pub value: String,
}

impl DialogChoice {
    pub fn new(title: impl Into<String>, value: impl Into<String>) -> Self {
        Self { title: title.into(), value: value.into() }
    }
}

/// Dialog state.
#[derive(Debug, Clone)]
pub struct Dialog {
    /// Question shown above the choices
    pub message: String,
    pub choices: Vec<DialogChoice>,
    pub selected_index: usize,
}

impl Dialog {
    pub fn new(message: impl Into<String>, choices: Vec<DialogChoice>) -> Self {
        Self { message: message.into(), choices, selected_index: 0 }
    }

    /// Yes/no question with "Cancel" preselected.
    pub fn confirm(message: impl Into<String>, confirm_label: impl Into<String>) -> Self {
        let mut dialog = Self::new(
            message,
            vec![DialogChoice::new("Cancel", CANCEL), DialogChoice::new(confirm_label, CONFIRM)],
        );
        dialog.selected_index = 0;
        dialog
    }

    pub fn move_up(&mut self) {
        self.selected_index = self.selected_index.saturating_sub(1);
    }

    pub fn move_down(&mut self) {
        let max_index = self.choices.len().saturating_sub(1);
        self.selected_index = (self.selected_index + 1).min(max_index);
    }

    pub fn selected_value(&self) -> Option<String> {
        self.choices.get(self.selected_index).map(|choice| choice.value.clone())
    }
}

/// Dialog manager for handling dialog state.
#[derive(Debug, Default)]
pub struct DialogManager {
    current: Option<Dialog>,
}

impl DialogManager {
    pub fn new() -> Self {
        Self { current: None }
    }

    pub fn show(&mut self, dialog: Dialog) {
        self.current = Some(dialog);
    }

    pub fn close(&mut self) {
        self.current = None;
    }

    pub fn is_open(&self) -> bool {
        self.current.is_some()
    }

    pub fn current(&self) -> Option<&Dialog> {
        self.current.as_ref()
    }

    /// Handles keyboard input while a dialog is open.
    ///
    /// Returns the chosen value once the dialog closes: the selected value on
    /// Enter, `y` for [`CONFIRM`], Esc or `n` for [`CANCEL`].
    pub fn handle_key(&mut self, key: KeyCode) -> Option<String> {
        let dialog = self.current.as_mut()?;
        let value = match key {
            KeyCode::Up | KeyCode::Left | KeyCode::BackTab => {
                dialog.move_up();
                return None;
            }
            KeyCode::Down | KeyCode::Right | KeyCode::Tab => {
                dialog.move_down();
                return None;
            }
            KeyCode::Enter => dialog.selected_value(),
            KeyCode::Char('y' | 'Y') => Some(CONFIRM.to_string()),
            KeyCode::Esc | KeyCode::Char('n' | 'N') => Some(CANCEL.to_string()),
            _ => return None,
        };
        self.close();
        value
    }
}

/// Renders a dialog overlay centered in `area`.
pub fn render_dialog(frame: &mut Frame, area: Rect, dialog: &Dialog) {
    let theme = crate::theme::get_theme();

    let dialog_width = 50.min(area.width);
    let dialog_height = (dialog.choices.len() as u16 + 6).min(area.height);
    let dialog_area = Rect {
        x: area.x + area.width.saturating_sub(dialog_width) / 2,
        y: area.y + area.height.saturating_sub(dialog_height) / 3,
        width: dialog_width,
        height: dialog_height,
    };

    frame.render_widget(Clear, dialog_area);
    let border = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.error))
        .style(Style::default().bg(theme.bg_panel));
    let inner = border.inner(dialog_area);
    frame.render_widget(border, dialog_area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(2), Constraint::Min(1), Constraint::Length(1)])
        .split(inner);

    let message = Paragraph::new(format!("◆ {}", dialog.message))
        .style(Style::default().fg(theme.text))
        .wrap(Wrap { trim: true });
    frame.render_widget(message, chunks[0]);

    let items: Vec<ListItem> = dialog
        .choices
        .iter()
        .enumerate()
        .map(|(idx, choice)| {
            let is_selected = idx == dialog.selected_index;
            let style = if is_selected {
                Style::default().fg(theme.bg_primary).bg(theme.primary).add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(theme.text)
            };
            let prefix = if is_selected { "● " } else { "○ " };
            ListItem::new(format!("{}{}", prefix, choice.title)).style(style)
        })
        .collect();
    frame.render_widget(List::new(items), chunks[1]);

    let help = Paragraph::new("↑/↓ Navigate • Enter select • y/n • Esc cancel")
        .style(Style::default().fg(theme.text_muted));
    frame.render_widget(help, chunks[2]);
}
