//! Named control-code parsers.
//!
//! Authored text addresses codes by name (`{COLOR:RED}`); the tokenizer looks the
//! name up here and lets the registered parser turn the argument into a token.

use std::collections::HashMap;

use strum::{EnumIter, EnumString, IntoEnumIterator, IntoStaticStr};

use crate::{color::Color, token::TokenKind};

/// Parses the optional `:args` part of a control code.
pub type ControlCodeParser = fn(Option<&str>) -> Result<TokenKind, String>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, EnumString, IntoStaticStr)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum ControlCode {
    Color,
    Shadow,
    Speed,
    Pause,
    PauseUntilPress,
    Reset,
    Clear,
    EffectStart,
    EffectEnd,
}

impl ControlCode {
    pub fn parser(self) -> ControlCodeParser {
        match self {
            ControlCode::Color => parse_color,
            ControlCode::Shadow => parse_shadow,
            ControlCode::Speed => parse_speed,
            ControlCode::Pause => parse_pause,
            ControlCode::PauseUntilPress => parse_pause_until_press,
            ControlCode::Reset => parse_reset,
            ControlCode::Clear => parse_clear,
            ControlCode::EffectStart => parse_effect_start,
            ControlCode::EffectEnd => parse_effect_end,
        }
    }
}

fn required<'a>(arg: Option<&'a str>, what: &str) -> Result<&'a str, String> {
    match arg.map(str::trim) {
        Some(a) if !a.is_empty() => Ok(a),
        _ => Err(format!("missing {what} argument")),
    }
}

fn no_argument(arg: Option<&str>) -> Result<(), String> {
    match arg {
        None => Ok(()),
        Some(a) => Err(format!("unexpected argument `{a}`")),
    }
}

fn color_arg(arg: Option<&str>) -> Result<Color, String> {
    let arg = required(arg, "color")?;
    Color::parse(arg).ok_or_else(|| format!("unknown color `{arg}`"))
}

fn frames_arg(arg: Option<&str>) -> Result<u32, String> {
    let arg = required(arg, "frame count")?;
    arg.parse::<u32>().map_err(|_| format!("invalid frame count `{arg}`"))
}

fn parse_color(arg: Option<&str>) -> Result<TokenKind, String> {
    color_arg(arg).map(TokenKind::Color)
}

fn parse_shadow(arg: Option<&str>) -> Result<TokenKind, String> {
    color_arg(arg).map(TokenKind::Shadow)
}

fn parse_speed(arg: Option<&str>) -> Result<TokenKind, String> {
    frames_arg(arg).map(TokenKind::Speed)
}

fn parse_pause(arg: Option<&str>) -> Result<TokenKind, String> {
    frames_arg(arg).map(TokenKind::Pause)
}

fn parse_pause_until_press(arg: Option<&str>) -> Result<TokenKind, String> {
    no_argument(arg).map(|_| TokenKind::PauseUntilPress)
}

fn parse_reset(arg: Option<&str>) -> Result<TokenKind, String> {
    no_argument(arg).map(|_| TokenKind::Reset)
}

fn parse_clear(arg: Option<&str>) -> Result<TokenKind, String> {
    no_argument(arg).map(|_| TokenKind::Clear)
}

fn parse_effect_start(arg: Option<&str>) -> Result<TokenKind, String> {
    required(arg, "effect id").map(|id| TokenKind::EffectStart(id.to_string()))
}

fn parse_effect_end(arg: Option<&str>) -> Result<TokenKind, String> {
    no_argument(arg).map(|_| TokenKind::EffectEnd)
}

/// A name -> parser table for `{NAME:args}` blocks.
#[derive(Clone, Default)]
pub struct ControlCodeRegistry {
    parsers: HashMap<String, ControlCodeParser>,
}

impl std::fmt::Debug for ControlCodeRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut names = self.names();
        names.sort_unstable();
        f.debug_struct("ControlCodeRegistry").field("codes", &names).finish()
    }
}

impl ControlCodeRegistry {
    /// An empty registry. Every `{...}` block is rejected until codes are registered.
    pub fn new() -> Self {
        Self::default()
    }

    /// The documented code set.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        for code in ControlCode::iter() {
            registry.register(code.into(), code.parser());
        }
        registry
    }

    /// Registers (or replaces) a parser. Names are matched exactly.
    pub fn register(&mut self, name: &str, parser: ControlCodeParser) {
        self.parsers.insert(name.to_string(), parser);
    }

    pub fn get(&self, name: &str) -> Option<ControlCodeParser> {
        self.parsers.get(name).copied()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.parsers.contains_key(name)
    }

    pub fn names(&self) -> Vec<&str> {
        self.parsers.keys().map(String::as_str).collect()
    }
}
