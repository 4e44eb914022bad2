//! Color theme system for Flowdesk TUI.

use std::sync::{Mutex, OnceLock};

use flowdesk_core::models::StatusTone;
use ratatui::style::Color;

use crate::config::ThemeConfig;

/// Flowdesk TUI color theme.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlowdeskTheme {
    // Primary brand colors
    pub primary: Color,
    pub secondary: Color,

    // Status colors
    pub success: Color,
    pub warning: Color,
    pub error: Color,
    pub info: Color,

    // Text colors
    pub text: Color,
    pub text_muted: Color,
    pub text_dim: Color,

    // Background colors
    pub bg_primary: Color,
    pub bg_panel: Color,
    pub bg_element: Color,

    // Border colors
    pub border: Color,
    pub border_active: Color,
}

impl Default for FlowdeskTheme {
    fn default() -> Self {
        Self::dark()
    }
}

impl FlowdeskTheme {
    /// Picks the preset named in the configuration; unknown names fall back to dark.
    pub fn from_config(config: &ThemeConfig) -> Self {
        match config.preset.as_str() {
            "light" => Self::light(),
            _ => Self::dark(),
        }
    }

    /// Creates the default dark theme.
    pub fn dark() -> Self {
        Self {
            primary: Color::Rgb(0, 217, 255),
            secondary: Color::Rgb(167, 139, 250),

            success: Color::Rgb(16, 185, 129), // Green
            warning: Color::Rgb(245, 158, 11), // Yellow
            error: Color::Rgb(239, 68, 68),    // Red
            info: Color::Rgb(6, 182, 212),     // Blue

            text: Color::Rgb(238, 238, 238),
            text_muted: Color::Rgb(128, 128, 128),
            text_dim: Color::Rgb(96, 96, 96),

            bg_primary: Color::Rgb(24, 29, 39),
            bg_panel: Color::Rgb(20, 20, 20),
            bg_element: Color::Rgb(30, 30, 30),

            border: Color::Rgb(72, 72, 72),
            border_active: Color::Rgb(0, 217, 255),
        }
    }

    /// Creates a light theme.
    pub fn light() -> Self {
        Self {
            primary: Color::Rgb(8, 145, 178),
            secondary: Color::Rgb(124, 58, 237),

            success: Color::Rgb(5, 150, 105),
            warning: Color::Rgb(217, 119, 6),
            error: Color::Rgb(220, 38, 38),
            info: Color::Rgb(14, 116, 144),

            text: Color::Rgb(26, 26, 26),
            text_muted: Color::Rgb(107, 114, 128),
            text_dim: Color::Rgb(156, 163, 175),

            bg_primary: Color::Rgb(255, 255, 255),
            bg_panel: Color::Rgb(250, 250, 250),
            bg_element: Color::Rgb(245, 245, 245),

            border: Color::Rgb(184, 184, 184),
            border_active: Color::Rgb(8, 145, 178),
        }
    }

    /// Color of a status badge.
    pub fn status_color(&self, tone: StatusTone) -> Color {
        match tone {
            StatusTone::Success => self.success,
            StatusTone::Danger => self.error,
            StatusTone::Pending => self.warning,
        }
    }
}

/// Global theme instance.
static THEME_INSTANCE: OnceLock<Mutex<FlowdeskTheme>> = OnceLock::new();

fn get_theme_instance() -> &'static Mutex<FlowdeskTheme> {
    THEME_INSTANCE.get_or_init(|| Mutex::new(FlowdeskTheme::default()))
}

/// Get the current theme (thread-safe).
pub fn get_theme() -> FlowdeskTheme {
    match get_theme_instance().lock() {
        Ok(theme) => theme.clone(),
        Err(poisoned) => poisoned.into_inner().clone(),
    }
}

/// Replace the global theme (called once the config is loaded).
pub fn update_theme(theme: FlowdeskTheme) {
    match get_theme_instance().lock() {
        Ok(mut current) => *current = theme,
        Err(poisoned) => *poisoned.into_inner() = theme,
    }
}
