//! Modal form used for record create/edit panels and the execution filter bar.
//!
//! The form edits plain text per field. Values are handed back to the owning
//! view only when the operator saves, so a half-typed number never reaches
//! the draft.

use std::collections::HashMap;

use crossterm::event::{KeyCode, KeyModifiers};
use flowdesk_core::models::{FieldKind, FormField};
use flowdesk_core::views::FormTarget;
use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
};

/// What the form edits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormPurpose {
    Record(FormTarget),
    Filters,
}

/// Result of a key press inside the form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormOutcome {
    Continue,
    Save,
    Cancel,
}

/// A selectable value of a reference field: `(value, label)`.
pub type FieldOption = (String, String);

#[derive(Debug, Clone)]
pub struct FormState {
    purpose: FormPurpose,
    title: String,
    fields: Vec<FormField>,
    focus: usize,
    /// Choices for fields picked from a list, keyed by field key
    options: HashMap<&'static str, Vec<FieldOption>>,
}

impl FormState {
    pub fn new(purpose: FormPurpose, title: impl Into<String>, fields: Vec<FormField>) -> Self {
        Self { purpose, title: title.into(), fields, focus: 0, options: HashMap::new() }
    }

    /// Attaches the choices of a field. An empty list leaves the field typed.
    pub fn with_options(mut self, key: &'static str, options: Vec<FieldOption>) -> Self {
        if !options.is_empty() {
            self.options.insert(key, options);
        }
        self
    }

    pub fn purpose(&self) -> FormPurpose {
        self.purpose
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn fields(&self) -> &[FormField] {
        &self.fields
    }

    pub fn focus(&self) -> usize {
        self.focus
    }

    /// Current text of every field, in form order.
    pub fn values(&self) -> Vec<(&'static str, String)> {
        self.fields.iter().map(|field| (field.key, field.value.clone())).collect()
    }

    pub fn value(&self, key: &str) -> Option<&str> {
        self.fields.iter().find(|field| field.key == key).map(|field| field.value.as_str())
    }

    fn focused_options(&self) -> Option<&Vec<FieldOption>> {
        self.fields.get(self.focus).and_then(|field| self.options.get(field.key))
    }

    pub fn next_field(&mut self) {
        if !self.fields.is_empty() {
            self.focus = (self.focus + 1) % self.fields.len();
        }
    }

    pub fn previous_field(&mut self) {
        if !self.fields.is_empty() {
            self.focus = (self.focus + self.fields.len() - 1) % self.fields.len();
        }
    }

    /// Steps the focused field through its options.
    pub fn cycle_option(&mut self, forward: bool) {
        let Some(options) = self.focused_options() else {
            return;
        };
        let Some(field) = self.fields.get(self.focus) else {
            return;
        };
        let len = options.len();
        let next = match options.iter().position(|(value, _)| *value == field.value) {
            Some(index) if forward => (index + 1) % len,
            Some(index) => (index + len - 1) % len,
            None => 0,
        };
        let value = options[next].0.clone();
        if let Some(field) = self.fields.get_mut(self.focus) {
            field.value = value;
        }
    }

    /// Handles keyboard input.
    pub fn handle_key(&mut self, key: KeyCode, modifiers: KeyModifiers) -> FormOutcome {
        if modifiers.contains(KeyModifiers::CONTROL) {
            return match key {
                KeyCode::Char('s') => FormOutcome::Save,
                _ => FormOutcome::Continue,
            };
        }

        let has_options = self.focused_options().is_some();
        let kind = self.fields.get(self.focus).map(|field| field.kind);

        match key {
            KeyCode::Esc => return FormOutcome::Cancel,
            KeyCode::Tab | KeyCode::Down => self.next_field(),
            KeyCode::BackTab | KeyCode::Up => self.previous_field(),
            KeyCode::Left if has_options => self.cycle_option(false),
            KeyCode::Right if has_options => self.cycle_option(true),
            KeyCode::Enter => match (self.purpose, kind) {
                (FormPurpose::Filters, _) => return FormOutcome::Save,
                (_, Some(FieldKind::Multiline)) => self.push('\n'),
                _ => self.next_field(),
            },
            KeyCode::Backspace if !has_options => {
                if let Some(field) = self.fields.get_mut(self.focus) {
                    field.value.pop();
                }
            }
            KeyCode::Char(c) if !has_options => self.push(c),
            _ => {}
        }
        FormOutcome::Continue
    }

    fn push(&mut self, c: char) {
        if let Some(field) = self.fields.get_mut(self.focus) {
            field.value.push(c);
        }
    }

    fn display_value(&self, field: &FormField) -> String {
        if let Some(options) = self.options.get(field.key) {
            return options
                .iter()
                .find(|(value, _)| *value == field.value)
                .map_or_else(|| field.value.clone(), |(_, label)| label.clone());
        }
        field.display_value()
    }
}

/// Renders the form as a centered overlay.
pub fn render_form(frame: &mut Frame, area: Rect, form: &FormState, error: Option<&str>) {
    let theme = crate::theme::get_theme();

    let width = 72.min(area.width);
    let height = (form.fields.len() as u16 * 2 + 6).min(area.height);
    let form_area = Rect {
        x: area.x + area.width.saturating_sub(width) / 2,
        y: area.y + area.height.saturating_sub(height) / 3,
        width,
        height,
    };

    frame.render_widget(Clear, form_area);
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.border_active))
        .style(Style::default().bg(theme.bg_panel))
        .title(Span::styled(format!(" {} ", form.title), Style::default().fg(theme.primary).bold()));
    let inner = block.inner(form_area);
    frame.render_widget(block, form_area);

    let mut lines = Vec::new();
    for (index, field) in form.fields.iter().enumerate() {
        let focused = index == form.focus;
        let label_style = if focused {
            Style::default().fg(theme.primary).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(theme.text_muted)
        };
        let hint = if form.options.contains_key(field.key) { "  ◀ ▶" } else { "" };
        lines.push(Line::from(vec![Span::styled(field.label, label_style), Span::styled(hint, Style::default().fg(theme.text_dim))]));

        let mut value = form.display_value(field).replace('\n', " ⏎ ");
        if focused {
            value.push('▏');
        }
        let value_style = if focused {
            Style::default().fg(theme.text).bg(theme.bg_element)
        } else {
            Style::default().fg(theme.text)
        };
        lines.push(Line::styled(format!("  {}", value), value_style));
    }

    lines.push(Line::raw(""));
    if let Some(message) = error {
        lines.push(Line::styled(message.to_string(), Style::default().fg(theme.error)));
    }
    let help = match form.purpose {
        FormPurpose::Filters => "Tab next • ◀/▶ status • Enter apply • Esc close",
        FormPurpose::Record(_) => "Tab next • Ctrl+S save • Esc cancel",
    };
    lines.push(Line::styled(help, Style::default().fg(theme.text_muted)));

    frame.render_widget(Paragraph::new(lines).wrap(Wrap { trim: false }), inner);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn agent_form() -> FormState {
        FormState::new(
            FormPurpose::Record(FormTarget::Create),
            "New agent",
            vec![
                FormField::new("Provider", "Provider", "", FieldKind::Text),
                FormField::new("Secret", "Secret", "", FieldKind::Secret),
            ],
        )
    }

    #[test]
    fn test_typing_and_tab() {
        let mut form = agent_form();
        for c in "openai".chars() {
            form.handle_key(KeyCode::Char(c), KeyModifiers::NONE);
        }
        form.handle_key(KeyCode::Tab, KeyModifiers::NONE);
        for c in "sk-x".chars() {
            form.handle_key(KeyCode::Char(c), KeyModifiers::NONE);
        }
        form.handle_key(KeyCode::Backspace, KeyModifiers::NONE);

        assert_eq!(form.value("Provider"), Some("openai"));
        assert_eq!(form.value("Secret"), Some("sk-"));
        assert_eq!(form.handle_key(KeyCode::Char('s'), KeyModifiers::CONTROL), FormOutcome::Save);
        assert_eq!(form.handle_key(KeyCode::Esc, KeyModifiers::NONE), FormOutcome::Cancel);
    }

    #[test]
    fn test_secret_is_masked_on_screen() {
        let mut form = agent_form();
        form.next_field();
        form.handle_key(KeyCode::Char('k'), KeyModifiers::NONE);
        let secret = &form.fields()[1];
        assert_ne!(form.display_value(secret), "k");
    }

    #[test]
    fn test_options_cycle_and_block_typing() {
        let mut form = FormState::new(
            FormPurpose::Filters,
            "Filters",
            vec![FormField::new("status", "Status", "", FieldKind::Reference { optional: true })],
        )
        .with_options(
            "status",
            vec![("".into(), "Any".into()), ("DONE".into(), "DONE".into()), ("ERROR".into(), "ERROR".into())],
        );

        form.handle_key(KeyCode::Right, KeyModifiers::NONE);
        assert_eq!(form.value("status"), Some("DONE"));
        form.handle_key(KeyCode::Char('x'), KeyModifiers::NONE);
        assert_eq!(form.value("status"), Some("DONE"));
        form.handle_key(KeyCode::Left, KeyModifiers::NONE);
        form.handle_key(KeyCode::Left, KeyModifiers::NONE);
        assert_eq!(form.value("status"), Some("ERROR"));
        assert_eq!(form.handle_key(KeyCode::Enter, KeyModifiers::NONE), FormOutcome::Save);
    }

    #[test]
    fn test_enter_in_multiline_inserts_newline() {
        let mut form = FormState::new(
            FormPurpose::Record(FormTarget::Edit),
            "Edit workflow",
            vec![
                FormField::new("Name", "Name", "wf", FieldKind::Text),
                FormField::new("Description", "Description", "a", FieldKind::Multiline),
            ],
        );
        form.handle_key(KeyCode::Enter, KeyModifiers::NONE);
        assert_eq!(form.focus(), 1);
        form.handle_key(KeyCode::Enter, KeyModifiers::NONE);
        form.handle_key(KeyCode::Char('b'), KeyModifiers::NONE);
        assert_eq!(form.value("Description"), Some("a\nb"));
    }
}
