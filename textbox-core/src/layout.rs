//! Greedy character-level wrapping of a token stream into box-width lines.
//!
//! Lines are addressed by character-stream index: every printable character and
//! every break (`Newline`, `PageBreak`, `Scroll`) occupies one position, control
//! codes occupy none. A line that ends in a break includes the break in its range.

use std::ops::Range;

use crate::{
    color::Color,
    error::{Result, TextError},
    metrics::TextMetrics,
    token::{Token, TokenKind},
};

/// Style of one character, as set by the control codes in effect when it was
/// authored. `None` fields mean "session default".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CharAttributes {
    pub color: Option<Color>,
    pub shadow: Option<Color>,
    pub effect: Option<String>,
}

impl CharAttributes {
    pub fn is_plain(&self) -> bool {
        self.color.is_none() && self.shadow.is_none() && self.effect.is_none()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct WrappedLine {
    /// Characters on this line, without control codes or the terminating break.
    pub text: String,
    /// Half-open character-stream range, including a terminating break if any.
    pub range: Range<usize>,
    pub pixel_width: f32,
    /// One entry per character of `text`. Only present when a color, shadow or
    /// effect code was in effect somewhere on the line.
    pub attributes: Option<Vec<CharAttributes>>,
    char_count: usize,
}

impl WrappedLine {
    pub fn has_per_character_attributes(&self) -> bool {
        self.attributes.is_some()
    }

    pub fn char_count(&self) -> usize {
        self.char_count
    }

    /// Number of this line's characters revealed once `char_cursor` stream
    /// positions have been consumed.
    pub fn revealed_chars(&self, char_cursor: usize) -> usize {
        char_cursor.saturating_sub(self.range.start).min(self.char_count)
    }

    /// The first `n` characters of the line.
    pub fn prefix(&self, n: usize) -> &str {
        match self.text.char_indices().nth(n) {
            Some((idx, _)) => &self.text[..idx],
            None => &self.text,
        }
    }
}

struct LineBuilder {
    start: usize,
    text: String,
    width: f32,
    attributes: Vec<CharAttributes>,
    styled: bool,
}

impl LineBuilder {
    fn new(start: usize, current: &CharAttributes) -> Self {
        Self {
            start,
            text: String::new(),
            width: 0.0,
            attributes: Vec::new(),
            styled: !current.is_plain(),
        }
    }

    fn is_empty(&self) -> bool {
        self.attributes.is_empty()
    }

    fn push(&mut self, ch: char, width: f32, current: &CharAttributes) {
        self.text.push(ch);
        self.width += width;
        self.attributes.push(current.clone());
    }

    fn finish(self, end: usize) -> WrappedLine {
        let char_count = self.attributes.len();
        WrappedLine {
            text: self.text,
            range: self.start..end,
            pixel_width: self.width,
            attributes: (self.styled && char_count > 0).then_some(self.attributes),
            char_count,
        }
    }
}

fn glyph_width(metrics: &dyn TextMetrics, ch: char, font: &str) -> Result<f32> {
    let mut buf = [0u8; 4];
    metrics
        .measure(ch.encode_utf8(&mut buf), font)
        .ok_or_else(|| TextError::MetricsUnavailable { font: font.to_string() })
}

/// Lays `tokens` out into lines no wider than `max_pixel_width`.
///
/// A glyph wider than the box still gets a line of its own; characters are never
/// dropped.
pub fn wrap(
    tokens: &[Token],
    max_pixel_width: f32,
    metrics: &dyn TextMetrics,
    font: &str,
) -> Result<Vec<WrappedLine>> {
    if metrics.measure("", font).is_none() {
        return Err(TextError::MetricsUnavailable { font: font.to_string() });
    }

    let mut lines = Vec::new();
    let mut current = CharAttributes::default();
    let mut index = 0;
    let mut line = LineBuilder::new(0, &current);

    for token in tokens {
        match &token.kind {
            TokenKind::Char(ch) => {
                let width = glyph_width(metrics, *ch, font)?;
                if line.width + width > max_pixel_width && !line.is_empty() {
                    lines.push(std::mem::replace(&mut line, LineBuilder::new(index, &current)).finish(index));
                }
                line.push(*ch, width, &current);
                index += 1;
            }
            TokenKind::Newline | TokenKind::PageBreak | TokenKind::Scroll => {
                lines.push(std::mem::replace(&mut line, LineBuilder::new(index + 1, &current)).finish(index + 1));
                index += 1;
            }
            TokenKind::Clear => {
                if !line.is_empty() {
                    lines.push(std::mem::replace(&mut line, LineBuilder::new(index, &current)).finish(index));
                }
            }
            TokenKind::Color(c) => {
                current.color = Some(*c);
                line.styled = true;
            }
            TokenKind::Shadow(c) => {
                current.shadow = Some(*c);
                line.styled = true;
            }
            TokenKind::EffectStart(id) => {
                current.effect = Some(id.clone());
                line.styled = true;
            }
            TokenKind::EffectEnd => {
                current.effect = None;
                line.styled = true;
            }
            TokenKind::Reset => {
                current = CharAttributes::default();
                line.styled = true;
            }
            TokenKind::Pause(_) | TokenKind::PauseUntilPress | TokenKind::Speed(_) => {}
        }
    }

    if !line.is_empty() {
        lines.push(line.finish(index));
    }

    log::trace!("wrapped {} tokens into {} lines at {}px", tokens.len(), lines.len(), max_pixel_width);
    Ok(lines)
}
