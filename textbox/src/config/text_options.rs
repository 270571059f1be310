use serde::{Deserialize, Serialize};
use textbox_core::Color;

/// Per-session overrides passed to `show_text`. Unset fields fall back to the
/// engine-wide [`TextBoxConfig`](super::textbox_config::TextBoxConfig).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TextOptions {
    pub font: Option<String>,
    /// Seconds per character.
    pub char_delay: Option<f32>,
    pub background_color: Option<Color>,
    pub text_color: Option<Color>,
    pub shadow_color: Option<Color>,
    pub allow_speed_up: Option<bool>,
    /// Scroll on soft-wrap overflow without waiting for input.
    pub auto_scroll: bool,
}

impl TextOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_font(mut self, font: impl Into<String>) -> Self {
        self.font = Some(font.into());
        self
    }

    pub fn with_char_delay(mut self, seconds: f32) -> Self {
        self.char_delay = Some(seconds);
        self
    }

    pub fn with_background_color(mut self, color: Color) -> Self {
        self.background_color = Some(color);
        self
    }

    pub fn with_text_color(mut self, color: Color) -> Self {
        self.text_color = Some(color);
        self
    }

    pub fn with_shadow_color(mut self, color: Color) -> Self {
        self.shadow_color = Some(color);
        self
    }

    pub fn with_speed_up(mut self, allow: bool) -> Self {
        self.allow_speed_up = Some(allow);
        self
    }

    pub fn with_auto_scroll(mut self, auto_scroll: bool) -> Self {
        self.auto_scroll = auto_scroll;
        self
    }
}
