use serde::{Deserialize, Serialize};

/// An RGBA color as used by the `{COLOR}` and `{SHADOW}` control codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Color {
    r: u8,
    g: u8,
    b: u8,
    a: u8,
}

impl Color {
    pub const WHITE: Color = Color::rgb(0xFF, 0xFF, 0xFF);
    pub const BLACK: Color = Color::rgb(0x00, 0x00, 0x00);
    pub const RED: Color = Color::rgb(0xE0, 0x30, 0x30);
    pub const GREEN: Color = Color::rgb(0x30, 0xB0, 0x40);
    pub const BLUE: Color = Color::rgb(0x30, 0x60, 0xE0);
    pub const YELLOW: Color = Color::rgb(0xF0, 0xD0, 0x30);
    pub const CYAN: Color = Color::rgb(0x30, 0xC8, 0xE0);
    pub const MAGENTA: Color = Color::rgb(0xD0, 0x40, 0xC8);
    pub const ORANGE: Color = Color::rgb(0xF0, 0x90, 0x30);
    pub const GRAY: Color = Color::rgb(0x80, 0x80, 0x80);
    pub const LIGHT_GRAY: Color = Color::rgb(0xD0, 0xD0, 0xC8);
    pub const DARK_GRAY: Color = Color::rgb(0x48, 0x48, 0x48);
    pub const TRANSPARENT: Color = Color::new(0, 0, 0, 0);

    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::new(r, g, b, 0xFF)
    }

    pub fn get_r(&self) -> u8 {
        self.r
    }

    pub fn get_g(&self) -> u8 {
        self.g
    }

    pub fn get_b(&self) -> u8 {
        self.b
    }

    pub fn get_a(&self) -> u8 {
        self.a
    }

    /// Palette lookup, case-insensitive. `GREY` is accepted as an alias of `GRAY`.
    pub fn from_name(name: &str) -> Option<Self> {
        let color = match name.to_ascii_uppercase().as_str() {
            "WHITE" => Self::WHITE,
            "BLACK" => Self::BLACK,
            "RED" => Self::RED,
            "GREEN" => Self::GREEN,
            "BLUE" => Self::BLUE,
            "YELLOW" => Self::YELLOW,
            "CYAN" => Self::CYAN,
            "MAGENTA" => Self::MAGENTA,
            "ORANGE" => Self::ORANGE,
            "GRAY" | "GREY" => Self::GRAY,
            "LIGHT_GRAY" | "LIGHT_GREY" => Self::LIGHT_GRAY,
            "DARK_GRAY" | "DARK_GREY" => Self::DARK_GRAY,
            "TRANSPARENT" => Self::TRANSPARENT,
            _ => return None,
        };
        Some(color)
    }

    /// Parses either a palette name or `#RRGGBB` / `#RRGGBBAA`.
    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim();
        match s.strip_prefix('#') {
            Some(hex) => Self::from_hex(hex),
            None => Self::from_name(s),
        }
    }

    fn from_hex(hex: &str) -> Option<Self> {
        if !hex.is_ascii() || !(hex.len() == 6 || hex.len() == 8) {
            return None;
        }
        let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
        let a = if hex.len() == 8 { channel(6)? } else { 0xFF };
        Some(Self::new(channel(0)?, channel(2)?, channel(4)?, a))
    }

    /// Renders the color as `#RRGGBBAA`, which [`Color::parse`] accepts back.
    pub fn to_hex(&self) -> String {
        format!("#{:02X}{:02X}{:02X}{:02X}", self.r, self.g, self.b, self.a)
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::WHITE
    }
}
