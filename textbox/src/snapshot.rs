// ----------------------------
// Save/Load snapshots
// ----------------------------

use serde::{Deserialize, Serialize};
use textbox_core::{tokenize, wrap, Color, Result, TextError, TextMetrics};

use crate::{
    config::PrinterSettings,
    printer::{Printer, PrinterState},
};

/// Everything needed to resume a session mid-reveal.
///
/// Tokens and lines are not stored: the raw text is tokenized and wrapped again
/// on restore, which gives the same streams for the same text, settings and
/// metrics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PrinterSnapshotV1 {
    pub raw_text: String,
    pub settings: PrinterSettings,

    pub state: PrinterState,
    pub token_cursor: usize,
    pub char_cursor: usize,
    pub line_counter: usize,
    pub page_start_line: usize,

    pub delay_counter: f32,
    pub char_delay: f32,
    pub scroll_offset_pixels: f32,
    pub scroll_remaining_pixels: f32,

    pub text_color: Color,
    pub shadow_color: Color,
    pub active_effect_id: Option<String>,
    pub has_been_sped_up: bool,
}

impl Printer {
    pub fn capture_snapshot_v1(&self) -> PrinterSnapshotV1 {
        PrinterSnapshotV1 {
            raw_text: self.raw_text.clone(),
            settings: self.settings.clone(),
            state: self.state,
            token_cursor: self.token_cursor,
            char_cursor: self.char_cursor,
            line_counter: self.line_counter,
            page_start_line: self.page_start_line,
            delay_counter: self.delay_counter,
            char_delay: self.char_delay,
            scroll_offset_pixels: self.scroll_offset_pixels,
            scroll_remaining_pixels: self.scroll_remaining_pixels,
            text_color: self.text_color,
            shadow_color: self.shadow_color,
            active_effect_id: self.active_effect_id.clone(),
            has_been_sped_up: self.has_been_sped_up,
        }
    }

    /// Rebuilds a session from a snapshot. The held button state is not part of
    /// the snapshot; the next `on_advance_held` call re-establishes it.
    pub fn from_snapshot_v1(snap: &PrinterSnapshotV1, metrics: &dyn TextMetrics) -> Result<Self> {
        let tokens = tokenize(&snap.raw_text)?;
        let lines = wrap(&tokens, snap.settings.box_width, metrics, &snap.settings.font)?;
        let mut printer = Printer::from_parts(&snap.raw_text, snap.settings.clone(), tokens, lines);

        if snap.token_cursor > printer.tokens.len() {
            return Err(TextError::SnapshotMismatch(format!(
                "token cursor {} exceeds {} tokens",
                snap.token_cursor,
                printer.tokens.len()
            )));
        }
        let consumed = printer.tokens[..snap.token_cursor].iter().filter(|t| t.kind.is_stream()).count();
        if consumed != snap.char_cursor {
            return Err(TextError::SnapshotMismatch(format!(
                "character cursor {} does not match {} consumed characters",
                snap.char_cursor, consumed
            )));
        }
        if snap.line_counter > printer.lines.len() || snap.page_start_line > snap.line_counter {
            return Err(TextError::SnapshotMismatch(format!(
                "page {}..{} is outside {} lines",
                snap.page_start_line,
                snap.line_counter,
                printer.lines.len()
            )));
        }

        printer.state = snap.state;
        printer.token_cursor = snap.token_cursor;
        printer.char_cursor = snap.char_cursor;
        printer.line_counter = snap.line_counter;
        printer.page_start_line = snap.page_start_line;
        printer.delay_counter = snap.delay_counter;
        printer.char_delay = snap.char_delay;
        printer.text_color = snap.text_color;
        printer.shadow_color = snap.shadow_color;
        printer.active_effect_id = snap.active_effect_id.clone();
        printer.has_been_sped_up = snap.has_been_sped_up;

        if printer.state == PrinterState::Scrolling {
            printer.scroll_offset_pixels = snap.scroll_offset_pixels;
            printer.scroll_remaining_pixels = snap.scroll_remaining_pixels;
        }

        Ok(printer)
    }
}
