use crate::{color::Color, registry::ControlCode};

/// Frame rate that `{SPEED}` and `{PAUSE}` frame counts are authored against.
pub const REFERENCE_FRAME_RATE: f32 = 60.0;

pub fn frames_to_seconds(frames: u32) -> f32 {
    frames as f32 / REFERENCE_FRAME_RATE
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TokenKind {
    Char(char),
    Newline,
    /// `\p`: wait, then clear the box.
    PageBreak,
    /// `\l`: wait, then scroll the box up by one line.
    Scroll,
    Color(Color),
    Shadow(Color),
    /// Frames per character.
    Speed(u32),
    /// Pause length in frames.
    Pause(u32),
    PauseUntilPress,
    Reset,
    Clear,
    EffectStart(String),
    EffectEnd,
}

impl TokenKind {
    /// Whether this token occupies a position in the character stream.
    pub fn is_stream(&self) -> bool {
        matches!(self, TokenKind::Char(_) | TokenKind::Newline | TokenKind::PageBreak | TokenKind::Scroll)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Token {
    pub kind: TokenKind,
    /// Byte offset of the token in the raw text.
    pub source_offset: usize,
}

impl Token {
    pub fn new(kind: TokenKind, source_offset: usize) -> Self {
        Self { kind, source_offset }
    }
}

fn push_code(out: &mut String, code: ControlCode, arg: Option<&str>) {
    let name: &'static str = code.into();
    out.push('{');
    out.push_str(name);
    if let Some(arg) = arg {
        out.push(':');
        out.push_str(arg);
    }
    out.push('}');
}

/// Renders tokens back into authored syntax.
///
/// Tokenizing the result yields the same token kinds again. Colors are written as
/// `#RRGGBBAA` rather than the palette name they may have come from.
pub fn to_source(tokens: &[Token]) -> String {
    let mut out = String::with_capacity(tokens.len());
    for token in tokens {
        match &token.kind {
            TokenKind::Char('{') => out.push_str("\\{"),
            TokenKind::Char(ch) => out.push(*ch),
            TokenKind::Newline => out.push_str("\\n"),
            TokenKind::PageBreak => out.push_str("\\p"),
            TokenKind::Scroll => out.push_str("\\l"),
            TokenKind::Color(c) => push_code(&mut out, ControlCode::Color, Some(&c.to_hex())),
            TokenKind::Shadow(c) => push_code(&mut out, ControlCode::Shadow, Some(&c.to_hex())),
            TokenKind::Speed(frames) => push_code(&mut out, ControlCode::Speed, Some(&frames.to_string())),
            TokenKind::Pause(frames) => push_code(&mut out, ControlCode::Pause, Some(&frames.to_string())),
            TokenKind::PauseUntilPress => push_code(&mut out, ControlCode::PauseUntilPress, None),
            TokenKind::Reset => push_code(&mut out, ControlCode::Reset, None),
            TokenKind::Clear => push_code(&mut out, ControlCode::Clear, None),
            TokenKind::EffectStart(id) => push_code(&mut out, ControlCode::EffectStart, Some(id)),
            TokenKind::EffectEnd => push_code(&mut out, ControlCode::EffectEnd, None),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_structural_tokens_as_escapes() {
        let tokens = vec![
            Token::new(TokenKind::Char('A'), 0),
            Token::new(TokenKind::PageBreak, 1),
            Token::new(TokenKind::Char('{'), 3),
            Token::new(TokenKind::Scroll, 5),
            Token::new(TokenKind::Speed(4), 7),
            Token::new(TokenKind::EffectStart("shake".into()), 16),
        ];
        assert_eq!(to_source(&tokens), "A\\p\\{\\l{SPEED:4}{EFFECT_START:shake}");
    }

    #[test]
    fn frames_convert_at_reference_rate() {
        assert_eq!(frames_to_seconds(60), 1.0);
        assert_eq!(frames_to_seconds(0), 0.0);
    }
}
