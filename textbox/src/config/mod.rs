pub mod logger_config;
pub mod text_options;
pub mod textbox_config;

use serde::{Deserialize, Serialize};
use textbox_core::Color;

/// Everything a printer session needs, resolved from the engine-wide
/// [`TextBoxConfig`](textbox_config::TextBoxConfig) and the per-session
/// [`TextOptions`](text_options::TextOptions).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PrinterSettings {
    pub font: String,
    pub box_width: f32,
    /// Always at least 1.
    pub max_visible_lines: usize,
    pub line_height: f32,
    pub line_spacing: f32,
    /// Pixels per second.
    pub scroll_speed: f32,
    /// Seconds per character until a `{SPEED}` code changes it.
    pub char_delay: f32,
    pub text_color: Color,
    pub shadow_color: Color,
    pub background_color: Color,
    pub allow_speed_up: bool,
    pub auto_scroll: bool,
}

impl PrinterSettings {
    /// Distance one scroll step moves the text.
    pub fn scroll_distance(&self) -> f32 {
        self.line_height + self.line_spacing
    }
}

impl Default for PrinterSettings {
    fn default() -> Self {
        textbox_config::TextBoxConfig::default().resolve(&text_options::TextOptions::default())
    }
}
