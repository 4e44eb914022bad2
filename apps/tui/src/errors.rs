//! Error formatting and display for the TUI.
//!
//! Turns core errors into operator-facing notices with actionable guidance.

use flowdesk_core::ConsoleError;
use flowdesk_core::config::ENV_BASE_URL;
use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Paragraph, Wrap},
};

/// How a failure is presented to the operator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorNotice {
    pub title: String,
    pub message: String,
    pub suggestion: Option<String>,
    /// Shown as a toast rather than next to the form
    pub intrusive: bool,
}

impl ErrorNotice {
    /// Creates a generic notice.
    pub fn generic(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self { title: title.into(), message: message.into(), suggestion: None, intrusive: true }
    }

    /// Adds a suggestion to the notice.
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    /// One-line form used in toasts.
    pub fn summary(&self) -> String {
        match &self.suggestion {
            Some(suggestion) => format!("{}: {} ({})", self.title, self.message, suggestion),
            None => format!("{}: {}", self.title, self.message),
        }
    }

    /// Returns the message lines.
    pub fn message_lines(&self) -> Vec<String> {
        let mut lines = vec![self.message.clone()];
        if let Some(suggestion) = &self.suggestion {
            lines.push(String::new());
            lines.push(format!("ℹ {}", suggestion));
        }
        lines
    }
}

impl From<&ConsoleError> for ErrorNotice {
    fn from(err: &ConsoleError) -> Self {
        let notice = match err {
            ConsoleError::Transport(message) => Self::generic("Backend unreachable", message.clone())
                .with_suggestion(format!("Check {} and that the backend is running", ENV_BASE_URL)),
            ConsoleError::Decode(message) => Self::generic("Unexpected response", message.clone()),
            ConsoleError::Config(message) => Self::generic("Configuration error", message.clone()),
            ConsoleError::Io(io) => Self::generic("I/O error", io.to_string()),
            ConsoleError::Status { status: 401 | 403, message } => Self::generic("Not authorized", message.clone())
                .with_suggestion("Check the API token (FLOWDESK_API_TOKEN)"),
            ConsoleError::Status { status, message } => {
                Self::generic(format!("Request failed ({})", status), message.clone())
            }
            ConsoleError::Validation(message) => Self::generic("Invalid input", message.clone()),
        };
        Self { intrusive: err.is_unexpected(), ..notice }
    }
}

/// Renders a notice as a bordered box.
pub fn render_error_notice(frame: &mut Frame, area: Rect, notice: &ErrorNotice) {
    let theme = crate::theme::get_theme();
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.error))
        .title(Span::styled(
            format!(" ✗ {} ", notice.title),
            Style::default().fg(theme.error).add_modifier(Modifier::BOLD),
        ));

    let paragraph = Paragraph::new(notice.message_lines().join("\n"))
        .style(Style::default().fg(theme.text))
        .wrap(Wrap { trim: true })
        .block(block);
    frame.render_widget(paragraph, area);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transport_errors_are_intrusive_with_hint() {
        let notice = ErrorNotice::from(&ConsoleError::Transport("connection refused".to_string()));
        assert!(notice.intrusive);
        assert!(notice.summary().contains(ENV_BASE_URL));
    }

    #[test]
    fn test_status_errors_stay_local() {
        let err = ConsoleError::Status { status: 409, message: "workflow has steps".to_string() };
        let notice = ErrorNotice::from(&err);
        assert!(!notice.intrusive);
        assert_eq!(notice.title, "Request failed (409)");
        assert_eq!(notice.message_lines(), vec!["workflow has steps".to_string()]);
    }

    #[test]
    fn test_auth_failures_suggest_token() {
        let err = ConsoleError::Status { status: 401, message: "Unauthorized".to_string() };
        assert!(ErrorNotice::from(&err).suggestion.is_some());
    }
}
