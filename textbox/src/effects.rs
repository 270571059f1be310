//! Observers that turn printer progress into per-character hooks.

use std::f32::consts::TAU;

use textbox_core::CharAttributes;

use crate::printer::Printer;

/// A printable character that appeared since the last poll.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RevealedChar {
    pub stream_index: usize,
    pub ch: char,
    /// Effect active on the character, for choosing a blip sound.
    pub effect: Option<String>,
}

/// Reports newly revealed characters. Line breaks are not reported.
#[derive(Debug, Default)]
pub struct RevealTracker {
    seen: usize,
}

impl RevealTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn poll(&mut self, printer: &Printer) -> Vec<RevealedChar> {
        let cursor = printer.char_cursor();
        if cursor < self.seen {
            // a new session started under us
            self.seen = 0;
        }
        let revealed = (self.seen..cursor)
            .filter_map(|pos| {
                printer.char_at(pos).map(|(ch, attrs)| RevealedChar {
                    stream_index: pos,
                    ch,
                    effect: attrs.and_then(|a| a.effect.clone()),
                })
            })
            .collect();
        self.seen = cursor;
        revealed
    }
}

/// Per-character jitter for text inside `{EFFECT_START:<effect_id>}`.
#[derive(Debug, Clone, PartialEq)]
pub struct ShakeEffect {
    pub effect_id: String,
    /// Pixels.
    pub amplitude: f32,
    /// Cycles per second.
    pub frequency: f32,
}

impl Default for ShakeEffect {
    fn default() -> Self {
        Self { effect_id: "shake".to_string(), amplitude: 1.0, frequency: 8.0 }
    }
}

impl ShakeEffect {
    /// Pixel offset of the `char_index`-th character of a line at `elapsed`
    /// seconds. Characters without the effect do not move.
    pub fn offset(&self, attrs: Option<&CharAttributes>, char_index: usize, elapsed: f32) -> (f32, f32) {
        let shaking = attrs.and_then(|a| a.effect.as_deref()) == Some(self.effect_id.as_str());
        if !shaking {
            return (0.0, 0.0);
        }
        // neighbouring characters get unrelated phases
        let phase = elapsed * self.frequency * TAU + char_index as f32 * 1.7;
        (self.amplitude * phase.sin(), self.amplitude * (phase * 1.3).cos())
    }
}
