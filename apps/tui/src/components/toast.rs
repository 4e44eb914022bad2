//! Toast notification component for non-intrusive feedback.

use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Clear, Paragraph},
};
use std::time::{Duration, Instant};

/// Toast notification variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastVariant {
    Success,
    Error,
    Info,
    Warning,
}

impl ToastVariant {
    /// Returns the color for this variant.
    pub fn color(&self) -> Color {
        let theme = crate::theme::get_theme();
        match self {
            Self::Success => theme.success,
            Self::Error => theme.error,
            Self::Info => theme.info,
            Self::Warning => theme.warning,
        }
    }

    /// How long a toast of this variant stays up; failures linger longer.
    pub fn default_duration(&self) -> Duration {
        match self {
            Self::Error | Self::Warning => Duration::from_secs(6),
            Self::Success | Self::Info => Duration::from_secs(3),
        }
    }

    /// Returns the icon for this variant.
    pub fn icon(&self) -> &'static str {
        match self {
            Self::Success => "✓",
            Self::Error => "✗",
            Self::Info => "ℹ",
            Self::Warning => "⚠",
        }
    }
}

/// A single toast notification.
#[derive(Debug, Clone)]
pub struct Toast {
    /// Toast variant
    pub variant: ToastVariant,
    /// Message text
    pub message: String,
    /// When this toast was created
    pub created_at: Instant,
    /// Duration before auto-dismiss
    pub duration: Duration,
}

impl Toast {
    /// Creates a new toast notification.
    pub fn new(variant: ToastVariant, message: String) -> Self {
        Self {
            variant,
            message,
            created_at: Instant::now(),
            duration: variant.default_duration(),
        }
    }

    /// Returns whether this toast should be dismissed.
    pub fn should_dismiss(&self) -> bool {
        self.created_at.elapsed() >= self.duration
    }
}

/// Toast manager for handling multiple toasts.
#[derive(Debug)]
pub struct ToastManager {
    /// Active toasts (newest first)
    toasts: Vec<Toast>,
    /// Maximum number of toasts to show
    max_toasts: usize,
}

impl Default for ToastManager {
    fn default() -> Self {
        Self::new()
    }
}

impl ToastManager {
    /// Creates a new toast manager.
    pub fn new() -> Self {
        Self {
            toasts: Vec::new(),
            max_toasts: 5,
        }
    }

    /// Shows a new toast notification.
    pub fn show(&mut self, toast: Toast) {
        self.toasts.insert(0, toast);
        // Keep only the most recent toasts
        if self.toasts.len() > self.max_toasts {
            self.toasts.truncate(self.max_toasts);
        }
    }

    /// Shows a success toast.
    pub fn success(&mut self, message: impl Into<String>) {
        self.show(Toast::new(ToastVariant::Success, message.into()));
    }

    /// Shows an error toast.
    pub fn error(&mut self, message: impl Into<String>) {
        self.show(Toast::new(ToastVariant::Error, message.into()));
    }

    /// Shows an info toast.
    pub fn info(&mut self, message: impl Into<String>) {
        self.show(Toast::new(ToastVariant::Info, message.into()));
    }

    /// Shows a warning toast.
    pub fn warning(&mut self, message: impl Into<String>) {
        self.show(Toast::new(ToastVariant::Warning, message.into()));
    }

    /// Updates the toast manager (removes expired toasts).
    pub fn update(&mut self) {
        self.toasts.retain(|toast| !toast.should_dismiss());
    }

    /// Returns a reference to active toasts.
    pub fn toasts(&self) -> &[Toast] {
        &self.toasts
    }

    /// Dismisses the newest toast.
    pub fn dismiss_latest(&mut self) {
        if !self.toasts.is_empty() {
            self.toasts.remove(0);
        }
    }
}

/// Renders toast notifications in the top-right corner.
pub fn render_toasts(frame: &mut Frame, area: Rect, manager: &ToastManager) {
    let toasts = manager.toasts();
    if toasts.is_empty() {
        return;
    }

    let theme = crate::theme::get_theme();
    let max_width = 50u16;
    let spacing = 1u16; // Space between toasts
    let toast_height = 3u16; // Height per toast (1 line text + 2 for borders/padding)

    // Calculate total height needed
    let total_height = (toasts.len() as u16 * (toast_height + spacing)).saturating_sub(spacing);
    
    // Position in top-right corner with some margin
    let margin = 2u16;
    let toast_area = Rect {
        x: area.x + area.width.saturating_sub(max_width + margin),
        y: area.y + margin,
        width: max_width.min(area.width.saturating_sub(margin * 2)),
        height: total_height.min(area.height.saturating_sub(margin * 2)),
    };

    let mut y_offset = 0u16;
    for toast in toasts {
        if y_offset >= toast_area.height {
            break;
        }

        let toast_rect = Rect {
            x: toast_area.x,
            y: toast_area.y + y_offset,
            width: toast_area.width,
            height: toast_height.min(toast_area.height.saturating_sub(y_offset)),
        };

        render_single_toast(frame, toast_rect, toast, &theme);
        y_offset += toast_height + spacing;
    }
}

/// Renders a single toast notification.
fn render_single_toast(frame: &mut Frame, area: Rect, toast: &Toast, theme: &crate::theme::FlowdeskTheme) {
    let variant_color = toast.variant.color();
    let icon = toast.variant.icon();

    let wrapped_lines: Vec<String> = textwrap::wrap(&toast.message, area.width.saturating_sub(6).max(1) as usize)
        .iter()
        .map(|s| s.to_string())
        .collect();

    // Create styled lines
    let lines: Vec<Line> = wrapped_lines
        .iter()
        .map(|line| {
            Line::from(vec![
                Span::styled(icon, Style::default().fg(variant_color)),
                Span::raw(" "),
                Span::styled(line.trim_start(), Style::default().fg(theme.text)),
            ])
        })
        .collect();

    frame.render_widget(Clear, area);
    let widget = Paragraph::new(lines)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(variant_color))
                .style(Style::default().bg(theme.bg_panel))
        )
        .wrap(ratatui::widgets::Wrap { trim: true });

    frame.render_widget(widget, area);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toast_creation() {
        let toast = Toast::new(ToastVariant::Success, "Workflow saved".to_string());
        assert_eq!(toast.variant, ToastVariant::Success);
        assert_eq!(toast.message, "Workflow saved");
        assert_eq!(toast.duration, Duration::from_secs(3));
    }

    #[test]
    fn test_newest_first_and_capped() {
        let mut manager = ToastManager::new();
        for i in 0..7 {
            manager.info(format!("toast {}", i));
        }
        assert_eq!(manager.toasts().len(), 5);
        assert_eq!(manager.toasts()[0].message, "toast 6");
        manager.dismiss_latest();
        assert_eq!(manager.toasts()[0].message, "toast 5");
    }

    #[test]
    fn test_failures_linger_longer() {
        let toast = Toast::new(ToastVariant::Error, "Backend not reachable".to_string());
        assert!(toast.duration > ToastVariant::Success.default_duration());
        assert!(!toast.should_dismiss());
    }

    #[test]
    fn test_toast_manager() {
        let mut manager = ToastManager::new();
        manager.success("Agent created");
        manager.error("Backend not reachable");
        assert_eq!(manager.toasts().len(), 2);

        manager.update();
        assert_eq!(manager.toasts().len(), 2); // Not expired yet

        manager.dismiss_latest();
        manager.dismiss_latest();
        assert!(manager.toasts().is_empty());
    }

    #[test]
    fn test_toast_variant_colors() {
        let theme = crate::theme::get_theme();
        assert_eq!(ToastVariant::Success.color(), theme.success);
        assert_eq!(ToastVariant::Error.color(), theme.error);
        assert_eq!(ToastVariant::Info.color(), theme.info);
        assert_eq!(ToastVariant::Warning.color(), theme.warning);
    }
}

