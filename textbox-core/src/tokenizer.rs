//! Authored text -> token stream.
//!
//! Syntax, in scanning priority:
//! - raw `\n`, `\r` or `\r\n`: one newline
//! - escapes: `\{` literal brace, `\n` / `\r` newline, `\p` page break, `\l` scroll.
//!   Any other backslash is kept as a literal character.
//! - `{NAME}` / `{NAME:args}`: control code, looked up in a [`ControlCodeRegistry`]
//! - anything else is a printable character

use crate::{
    error::{MalformedReason, Result, TextError},
    registry::ControlCodeRegistry,
    token::{Token, TokenKind},
};

lazy_static::lazy_static! {
    static ref DEFAULT_REGISTRY: ControlCodeRegistry = ControlCodeRegistry::with_defaults();
}

/// Tokenizes with the documented control-code set.
pub fn tokenize(raw: &str) -> Result<Vec<Token>> {
    tokenize_with(&DEFAULT_REGISTRY, raw)
}

pub fn tokenize_with(registry: &ControlCodeRegistry, raw: &str) -> Result<Vec<Token>> {
    let mut tokens = Vec::with_capacity(raw.len());
    let mut pos = 0;

    while let Some(ch) = raw[pos..].chars().next() {
        let offset = pos;
        pos += ch.len_utf8();

        match ch {
            '\r' => {
                if raw[pos..].starts_with('\n') {
                    pos += 1;
                }
                tokens.push(Token::new(TokenKind::Newline, offset));
            }
            '\n' => tokens.push(Token::new(TokenKind::Newline, offset)),
            '\\' => {
                // Every escape letter is ASCII, so a match consumes exactly one byte.
                let kind = match raw[pos..].chars().next() {
                    Some('{') => Some(TokenKind::Char('{')),
                    Some('n') => Some(TokenKind::Newline),
                    Some('r') => {
                        if raw[pos + 1..].starts_with("\\n") {
                            pos += 2;
                        }
                        Some(TokenKind::Newline)
                    }
                    Some('p') => Some(TokenKind::PageBreak),
                    Some('l') => Some(TokenKind::Scroll),
                    _ => None,
                };
                match kind {
                    Some(kind) => {
                        pos += 1;
                        tokens.push(Token::new(kind, offset));
                    }
                    None => tokens.push(Token::new(TokenKind::Char('\\'), offset)),
                }
            }
            '{' => {
                let Some(len) = raw[pos..].find('}') else {
                    return Err(TextError::MalformedControlCode {
                        body: raw[offset..].to_string(),
                        offset,
                        reason: MalformedReason::Unterminated,
                    });
                };
                let body = &raw[pos..pos + len];
                let kind = parse_control_code(registry, body, offset)?;
                tokens.push(Token::new(kind, offset));
                pos += len + 1;
            }
            _ => tokens.push(Token::new(TokenKind::Char(ch), offset)),
        }
    }

    Ok(tokens)
}

fn parse_control_code(registry: &ControlCodeRegistry, body: &str, offset: usize) -> Result<TokenKind> {
    let (name, arg) = match body.split_once(':') {
        Some((name, arg)) => (name, Some(arg)),
        None => (body, None),
    };

    let malformed = |reason| TextError::MalformedControlCode {
        body: format!("{{{body}}}"),
        offset,
        reason,
    };

    let parser = registry.get(name.trim()).ok_or_else(|| malformed(MalformedReason::UnknownCode))?;
    parser(arg).map_err(|msg| malformed(MalformedReason::InvalidArgument(msg)))
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::color::Color;

    fn kinds(raw: &str) -> Vec<TokenKind> {
        tokenize(raw).unwrap().into_iter().map(|t| t.kind).collect()
    }

    fn chars(s: &str) -> Vec<TokenKind> {
        s.chars().map(TokenKind::Char).collect()
    }

    #[test]
    fn hello_world() {
        let mut expected = chars("Hello");
        expected.push(TokenKind::Newline);
        expected.extend(chars("World"));
        assert_eq!(kinds("Hello\nWorld"), expected);
    }

    #[test]
    fn color_and_reset() {
        assert_eq!(
            kinds("{COLOR:RED}Hi{RESET}"),
            vec![
                TokenKind::Color(Color::RED),
                TokenKind::Char('H'),
                TokenKind::Char('i'),
                TokenKind::Reset,
            ]
        );
    }

    #[test]
    fn raw_line_endings_collapse() {
        assert_eq!(
            kinds("a\r\nb\rc\n\nd"),
            vec![
                TokenKind::Char('a'),
                TokenKind::Newline,
                TokenKind::Char('b'),
                TokenKind::Newline,
                TokenKind::Char('c'),
                TokenKind::Newline,
                TokenKind::Newline,
                TokenKind::Char('d'),
            ]
        );
    }

    #[test]
    fn escapes() {
        assert_eq!(
            kinds(r"\{A\pB\lC\r\nD\nE"),
            vec![
                TokenKind::Char('{'),
                TokenKind::Char('A'),
                TokenKind::PageBreak,
                TokenKind::Char('B'),
                TokenKind::Scroll,
                TokenKind::Char('C'),
                TokenKind::Newline,
                TokenKind::Char('D'),
                TokenKind::Newline,
                TokenKind::Char('E'),
            ]
        );
    }

    #[test]
    fn unknown_escape_keeps_backslash() {
        assert_eq!(kinds(r"\x"), chars(r"\x"));
        assert_eq!(kinds("\\"), chars("\\"));
        // the second backslash starts a real escape
        assert_eq!(kinds(r"\\p"), vec![TokenKind::Char('\\'), TokenKind::PageBreak]);
    }

    #[test]
    fn offsets_are_byte_offsets() {
        let tokens = tokenize("é{SPEED:2}x").unwrap();
        let offsets: Vec<usize> = tokens.iter().map(|t| t.source_offset).collect();
        assert_eq!(offsets, vec![0, 2, 11]);
    }

    #[test]
    fn every_default_code_parses() {
        assert_eq!(
            kinds("{SHADOW:#00000080}{SPEED:3}{PAUSE:30}{PAUSE_UNTIL_PRESS}{CLEAR}{EFFECT_START:shake}{EFFECT_END}"),
            vec![
                TokenKind::Shadow(Color::new(0, 0, 0, 0x80)),
                TokenKind::Speed(3),
                TokenKind::Pause(30),
                TokenKind::PauseUntilPress,
                TokenKind::Clear,
                TokenKind::EffectStart("shake".into()),
                TokenKind::EffectEnd,
            ]
        );
    }

    #[test]
    fn unterminated_code_is_rejected() {
        let err = tokenize("ab{COLOR:RED").unwrap_err();
        assert_eq!(
            err,
            TextError::MalformedControlCode {
                body: "{COLOR:RED".into(),
                offset: 2,
                reason: MalformedReason::Unterminated,
            }
        );
    }

    #[test]
    fn unknown_code_is_rejected() {
        let err = tokenize("x{WOBBLE}").unwrap_err();
        assert_eq!(
            err,
            TextError::MalformedControlCode {
                body: "{WOBBLE}".into(),
                offset: 1,
                reason: MalformedReason::UnknownCode,
            }
        );
    }

    #[test]
    fn bad_argument_is_rejected() {
        let err = tokenize("{SPEED:fast}").unwrap_err();
        assert!(matches!(
            err,
            TextError::MalformedControlCode { reason: MalformedReason::InvalidArgument(_), offset: 0, .. }
        ));
    }

    #[test]
    fn custom_registry() {
        let mut registry = ControlCodeRegistry::new();
        registry.register("WAIT", crate::registry::ControlCode::PauseUntilPress.parser());
        let tokens = tokenize_with(&registry, "a{WAIT}").unwrap();
        assert_eq!(tokens[1].kind, TokenKind::PauseUntilPress);
        assert!(tokenize_with(&registry, "{RESET}").is_err());
    }
}
