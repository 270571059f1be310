use std::{fs, path::Path};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use textbox_core::{Color, TextMetrics};

use super::{text_options::TextOptions, PrinterSettings};

/// Engine-wide text box configuration.
/// Please use [`TextBoxConfigBuilder`] if you want to build it from code.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TextBoxConfig {
    /// Inner width of the box in pixels.
    pub box_width: f32,
    pub max_visible_lines: usize,
    pub line_height: f32,
    pub line_spacing: f32,
    /// Scroll animation speed in pixels per second.
    pub scroll_speed: f32,
    /// Seconds per character.
    pub char_delay: f32,
    pub text_color: Color,
    pub shadow_color: Color,
    pub background_color: Color,
    pub font: String,
    pub allow_speed_up: bool,
}

impl Default for TextBoxConfig {
    fn default() -> Self {
        Self {
            box_width: 208.0,
            max_visible_lines: 2,
            line_height: 16.0,
            line_spacing: 0.0,
            scroll_speed: 128.0,
            char_delay: 0.05,
            text_color: Color::DARK_GRAY,
            shadow_color: Color::LIGHT_GRAY,
            background_color: Color::WHITE,
            font: "normal".to_string(),
            allow_speed_up: true,
        }
    }
}

impl TextBoxConfig {
    pub fn from_json_str(json: &str) -> Result<Self> {
        serde_json::from_str(json).context("parse text box config")
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = fs::read_to_string(path).with_context(|| format!("read {:?}", path))?;
        Self::from_json_str(&json).with_context(|| format!("load {:?}", path))
    }

    /// Takes the line height from `metrics` when it knows the default font.
    pub fn adopt_line_height(&mut self, metrics: &dyn TextMetrics) {
        if let Some(line_height) = metrics.line_height(&self.font) {
            self.line_height = line_height;
        }
    }

    /// Applies per-session overrides.
    pub fn resolve(&self, options: &TextOptions) -> PrinterSettings {
        PrinterSettings {
            font: options.font.clone().unwrap_or_else(|| self.font.clone()),
            box_width: self.box_width,
            max_visible_lines: self.max_visible_lines.max(1),
            line_height: self.line_height,
            line_spacing: self.line_spacing,
            scroll_speed: self.scroll_speed,
            char_delay: options.char_delay.unwrap_or(self.char_delay).max(0.0),
            text_color: options.text_color.unwrap_or(self.text_color),
            shadow_color: options.shadow_color.unwrap_or(self.shadow_color),
            background_color: options.background_color.unwrap_or(self.background_color),
            allow_speed_up: options.allow_speed_up.unwrap_or(self.allow_speed_up),
            auto_scroll: options.auto_scroll,
        }
    }
}

/// `TextBoxConfigBuilder` is a convenience builder to create a `TextBoxConfig` from code.
pub struct TextBoxConfigBuilder {
    config: TextBoxConfig,
}

impl Default for TextBoxConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl TextBoxConfigBuilder {
    pub fn new() -> Self {
        Self { config: Default::default() }
    }

    pub fn with_box_width(mut self, width: f32) -> Self {
        self.config.box_width = width;
        self
    }

    pub fn with_max_visible_lines(mut self, lines: usize) -> Self {
        self.config.max_visible_lines = lines;
        self
    }

    /// Sets the line height and the extra spacing between lines
    pub fn with_line_metrics(mut self, line_height: f32, line_spacing: f32) -> Self {
        self.config.line_height = line_height;
        self.config.line_spacing = line_spacing;
        self
    }

    pub fn with_scroll_speed(mut self, pixels_per_second: f32) -> Self {
        self.config.scroll_speed = pixels_per_second;
        self
    }

    pub fn with_char_delay(mut self, seconds: f32) -> Self {
        self.config.char_delay = seconds;
        self
    }

    pub fn with_colors(mut self, text: Color, shadow: Color, background: Color) -> Self {
        self.config.text_color = text;
        self.config.shadow_color = shadow;
        self.config.background_color = background;
        self
    }

    pub fn with_font(mut self, font: impl Into<String>) -> Self {
        self.config.font = font.into();
        self
    }

    pub fn with_speed_up(mut self, allow: bool) -> Self {
        self.config.allow_speed_up = allow;
        self
    }

    /// Retrieves the configuration built
    pub fn get(self) -> TextBoxConfig {
        self.config
    }
}
