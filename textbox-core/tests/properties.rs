use rand::{rngs::SmallRng, Rng, SeedableRng};

use textbox_core::{to_source, tokenize, wrap, MonospaceMetrics, TextMetrics, Token, TokenKind};

/// Proportional widths: narrow `i`/`l`, wide `W`, and `@` wider than any test box.
struct Proportional;

impl TextMetrics for Proportional {
    fn measure(&self, text: &str, _font: &str) -> Option<f32> {
        Some(
            text.chars()
                .map(|c| match c {
                    'i' | 'l' | '.' => 3.0,
                    'W' | 'M' => 11.0,
                    '@' => 500.0,
                    _ => 7.0,
                })
                .sum(),
        )
    }
}

const PIECES: &[&str] = &[
    "a", "b", "i", "W", "M", "@", " ", ".", "é", "ポ", "\n", "\r\n", "\\n", "\\p", "\\l", "\\{", "\\x", "\\",
    "}", "{COLOR:RED}", "{COLOR:#11223344}", "{SHADOW:gray}", "{SPEED:0}", "{SPEED:4}", "{PAUSE:12}",
    "{PAUSE_UNTIL_PRESS}", "{RESET}", "{CLEAR}", "{EFFECT_START:shake}", "{EFFECT_END}",
];

fn random_text(rng: &mut SmallRng) -> String {
    let len = rng.gen_range(0..60);
    (0..len).map(|_| PIECES[rng.gen_range(0..PIECES.len())]).collect()
}

fn kinds(tokens: &[Token]) -> Vec<TokenKind> {
    tokens.iter().map(|t| t.kind.clone()).collect()
}

fn char_tokens(tokens: &[Token]) -> usize {
    tokens.iter().filter(|t| matches!(t.kind, TokenKind::Char(_))).count()
}

#[test]
fn tokenizing_rendered_source_is_idempotent() {
    let mut rng = SmallRng::seed_from_u64(0x7e47);
    for _ in 0..500 {
        let raw = random_text(&mut rng);
        let first = tokenize(&raw).unwrap();
        let second = tokenize(&to_source(&first)).unwrap();
        assert_eq!(kinds(&first), kinds(&second), "raw: {raw:?}");
        // deterministic
        assert_eq!(first, tokenize(&raw).unwrap());
    }
}

#[test]
fn lines_respect_the_box_width() {
    let mut rng = SmallRng::seed_from_u64(0xb0c5);
    for _ in 0..500 {
        let raw = random_text(&mut rng);
        let width = rng.gen_range(5.0..80.0);
        let tokens = tokenize(&raw).unwrap();
        for line in wrap(&tokens, width, &Proportional, "normal").unwrap() {
            assert!(
                line.pixel_width <= width || line.char_count() == 1,
                "line {:?} is {}px in a {}px box",
                line.text,
                line.pixel_width,
                width
            );
        }
    }
}

#[test]
fn wrapping_conserves_characters() {
    let mut rng = SmallRng::seed_from_u64(0xc4a2);
    let mono = MonospaceMetrics::new(6.0, 16.0);
    for _ in 0..500 {
        let raw = random_text(&mut rng);
        let tokens = tokenize(&raw).unwrap();
        for metrics in [&Proportional as &dyn TextMetrics, &mono] {
            let lines = wrap(&tokens, 40.0, metrics, "normal").unwrap();
            let total: usize = lines.iter().map(|l| l.text.chars().count()).sum();
            assert_eq!(total, char_tokens(&tokens), "raw: {raw:?}");
        }
    }
}

#[test]
fn line_ranges_tile_the_character_stream() {
    let mut rng = SmallRng::seed_from_u64(0x5eed);
    for _ in 0..300 {
        let raw = random_text(&mut rng);
        let tokens = tokenize(&raw).unwrap();
        let lines = wrap(&tokens, 30.0, &Proportional, "normal").unwrap();
        let stream = tokens.iter().filter(|t| t.kind.is_stream()).count();

        let mut expected_start = 0;
        for line in &lines {
            assert_eq!(line.range.start, expected_start, "raw: {raw:?}");
            assert!(line.range.end > line.range.start, "raw: {raw:?}");
            expected_start = line.range.end;
        }
        assert_eq!(expected_start, stream, "raw: {raw:?}");
    }
}

#[test]
fn oversized_glyph_gets_its_own_line() {
    let tokens = tokenize("a@b").unwrap();
    let lines = wrap(&tokens, 20.0, &Proportional, "normal").unwrap();
    let texts: Vec<&str> = lines.iter().map(|l| l.text.as_str()).collect();
    assert_eq!(texts, vec!["a", "@", "b"]);
}
