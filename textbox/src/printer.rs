//! The timed printing state machine.
//!
//! A [`Printer`] owns one session: the tokens and wrapped lines of a single text,
//! plus the cursors and timers that decide how much of it is visible. It is
//! driven from outside: [`Printer::on_advance_pressed`] / [`Printer::on_advance_held`]
//! from the input pass, then exactly one [`Printer::tick`] per frame.

use serde::{Deserialize, Serialize};
use strum::Display;
use textbox_core::{
    frames_to_seconds, tokenize, wrap, CharAttributes, Color, Result, TextMetrics, Token, TokenKind, WrappedLine,
};

use crate::config::PrinterSettings;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
pub enum PrinterState {
    /// Revealing text.
    HandleChar,
    /// Blocked on input; advancing clears the box.
    Wait,
    /// Blocked on input; advancing scrolls the box by one line if it is full.
    WaitForScroll,
    /// Animating a one-line scroll.
    Scrolling,
    /// Timed `{PAUSE}`.
    Paused,
    /// Every token consumed; advancing asks the owner to close the session.
    Finished,
    /// Inactive, nothing is processed or shown.
    Hidden,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrinterEvent {
    /// The token stream was exhausted on this tick.
    Finished,
}

/// What an advance press did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdvanceOutcome {
    Ignored,
    SpedUp,
    PageCleared,
    Resumed,
    ScrollStarted,
    /// The text is done; the owner should close the session.
    CloseRequested,
}

/// A line as it should be drawn right now.
#[derive(Debug, Clone, PartialEq)]
pub struct VisibleLine<'a> {
    /// Index into [`Printer::lines`].
    pub index: usize,
    /// The revealed part of the line.
    pub text: &'a str,
    pub attributes: Option<&'a [CharAttributes]>,
    /// Offset from the top of the box, scroll animation included.
    pub y: f32,
}

/// One text session.
///
/// Field validity by state:
/// - `delay_counter` counts down in `HandleChar` and `Paused`; it is left as is
///   while waiting.
/// - `scroll_offset_pixels` / `scroll_remaining_pixels` are non-zero only in
///   `Scrolling`.
/// - `has_been_sped_up` is cleared whenever a wait is advanced.
#[derive(Debug, Clone)]
pub struct Printer {
    pub(crate) raw_text: String,
    pub(crate) settings: PrinterSettings,
    pub(crate) tokens: Vec<Token>,
    pub(crate) lines: Vec<WrappedLine>,
    pub(crate) stream_len: usize,

    pub(crate) state: PrinterState,
    pub(crate) token_cursor: usize,
    pub(crate) char_cursor: usize,
    /// Wrapped line the next character goes on.
    pub(crate) line_counter: usize,
    /// First wrapped line inside the box.
    pub(crate) page_start_line: usize,

    pub(crate) delay_counter: f32,
    pub(crate) char_delay: f32,

    pub(crate) scroll_offset_pixels: f32,
    pub(crate) scroll_remaining_pixels: f32,

    pub(crate) text_color: Color,
    pub(crate) shadow_color: Color,
    pub(crate) active_effect_id: Option<String>,

    pub(crate) has_been_sped_up: bool,
    pub(crate) advance_held: bool,
}

impl Printer {
    /// Tokenizes and wraps `raw_text`. Nothing is created if either step fails.
    pub fn new(raw_text: &str, settings: PrinterSettings, metrics: &dyn TextMetrics) -> Result<Self> {
        let tokens = tokenize(raw_text)?;
        let lines = wrap(&tokens, settings.box_width, metrics, &settings.font)?;
        Ok(Self::from_parts(raw_text, settings, tokens, lines))
    }

    pub(crate) fn from_parts(
        raw_text: &str,
        settings: PrinterSettings,
        tokens: Vec<Token>,
        lines: Vec<WrappedLine>,
    ) -> Self {
        let stream_len = tokens.iter().filter(|t| t.kind.is_stream()).count();
        Self {
            raw_text: raw_text.to_string(),
            tokens,
            lines,
            stream_len,
            state: PrinterState::HandleChar,
            token_cursor: 0,
            char_cursor: 0,
            line_counter: 0,
            page_start_line: 0,
            delay_counter: 0.0,
            char_delay: settings.char_delay,
            scroll_offset_pixels: 0.0,
            scroll_remaining_pixels: 0.0,
            text_color: settings.text_color,
            shadow_color: settings.shadow_color,
            active_effect_id: None,
            has_been_sped_up: false,
            advance_held: false,
            settings,
        }
    }

    pub fn raw_text(&self) -> &str {
        &self.raw_text
    }

    pub fn settings(&self) -> &PrinterSettings {
        &self.settings
    }

    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    pub fn lines(&self) -> &[WrappedLine] {
        &self.lines
    }

    pub fn state(&self) -> PrinterState {
        self.state
    }

    pub fn token_cursor(&self) -> usize {
        self.token_cursor
    }

    pub fn char_cursor(&self) -> usize {
        self.char_cursor
    }

    pub fn line_counter(&self) -> usize {
        self.line_counter
    }

    pub fn page_start_line(&self) -> usize {
        self.page_start_line
    }

    pub fn delay_counter(&self) -> f32 {
        self.delay_counter
    }

    /// Current seconds per character.
    pub fn char_delay(&self) -> f32 {
        self.char_delay
    }

    pub fn scroll_offset_pixels(&self) -> f32 {
        self.scroll_offset_pixels
    }

    pub fn scroll_remaining_pixels(&self) -> f32 {
        self.scroll_remaining_pixels
    }

    pub fn text_color(&self) -> Color {
        self.text_color
    }

    pub fn shadow_color(&self) -> Color {
        self.shadow_color
    }

    pub fn background_color(&self) -> Color {
        self.settings.background_color
    }

    pub fn active_effect_id(&self) -> Option<&str> {
        self.active_effect_id.as_deref()
    }

    pub fn has_been_sped_up(&self) -> bool {
        self.has_been_sped_up
    }

    pub fn is_waiting_for_input(&self) -> bool {
        matches!(self.state, PrinterState::Wait | PrinterState::WaitForScroll | PrinterState::Finished)
    }

    pub fn is_finished(&self) -> bool {
        self.state == PrinterState::Finished
    }

    /// Lines printed since the page start.
    pub fn visible_line_count(&self) -> usize {
        self.line_counter.saturating_sub(self.page_start_line)
    }

    /// Stops all processing. The session shows nothing afterwards.
    pub fn hide(&mut self) {
        self.state = PrinterState::Hidden;
        self.scroll_offset_pixels = 0.0;
        self.scroll_remaining_pixels = 0.0;
    }

    /// Index of the wrapped line covering character-stream position `pos`.
    pub fn line_at(&self, pos: usize) -> Option<usize> {
        let idx = self.lines.partition_point(|l| l.range.end <= pos);
        self.lines.get(idx).filter(|l| l.range.start <= pos).map(|_| idx)
    }

    /// The printable character at stream position `pos` and its attributes.
    /// Breaks have no character.
    pub fn char_at(&self, pos: usize) -> Option<(char, Option<&CharAttributes>)> {
        let line = &self.lines[self.line_at(pos)?];
        let offset = pos - line.range.start;
        let ch = line.text.chars().nth(offset)?;
        Some((ch, line.attributes.as_ref().and_then(|a| a.get(offset))))
    }

    /// At most `max_visible_lines` lines, top to bottom.
    pub fn current_visible_lines(&self) -> Vec<VisibleLine<'_>> {
        if self.state == PrinterState::Hidden {
            return Vec::new();
        }
        let end = (self.line_counter + 1).min(self.lines.len());
        let start = self.page_start_line.min(end);
        let pitch = self.settings.scroll_distance();

        self.lines[start..end]
            .iter()
            .enumerate()
            .take_while(|(_, line)| self.char_cursor > line.range.start)
            .take(self.settings.max_visible_lines)
            .map(|(row, line)| {
                let n = line.revealed_chars(self.char_cursor);
                VisibleLine {
                    index: start + row,
                    text: line.prefix(n),
                    attributes: line.attributes.as_deref().map(|a| &a[..n]),
                    y: row as f32 * pitch - self.scroll_offset_pixels,
                }
            })
            .collect()
    }

    /// Advances one frame. At most one token is consumed.
    pub fn tick(&mut self, delta_seconds: f32) -> Option<PrinterEvent> {
        let dt = delta_seconds.max(0.0);
        match self.state {
            PrinterState::Wait | PrinterState::WaitForScroll | PrinterState::Finished | PrinterState::Hidden => None,
            PrinterState::Scrolling => {
                self.tick_scroll(dt);
                None
            }
            PrinterState::Paused => {
                self.delay_counter -= dt;
                if self.delay_counter <= 0.0 {
                    self.state = PrinterState::HandleChar;
                    // a button pressed during the pause speeds up what follows
                    if self.advance_held {
                        self.try_speed_up();
                    }
                }
                None
            }
            PrinterState::HandleChar => {
                if self.advance_held && self.has_been_sped_up {
                    self.delay_counter = 0.0;
                }
                self.delay_counter -= dt;
                if self.delay_counter <= 0.0 {
                    self.dispatch()
                } else {
                    None
                }
            }
        }
    }

    pub fn on_advance_pressed(&mut self) -> AdvanceOutcome {
        match self.state {
            PrinterState::HandleChar => {
                if self.try_speed_up() {
                    AdvanceOutcome::SpedUp
                } else {
                    AdvanceOutcome::Ignored
                }
            }
            PrinterState::Wait => {
                self.page_start_line = self.line_counter;
                self.has_been_sped_up = false;
                self.state = PrinterState::HandleChar;
                AdvanceOutcome::PageCleared
            }
            PrinterState::WaitForScroll => {
                self.has_been_sped_up = false;
                if self.visible_line_count() >= self.settings.max_visible_lines {
                    self.begin_scroll();
                    if self.state == PrinterState::Scrolling {
                        return AdvanceOutcome::ScrollStarted;
                    }
                } else {
                    self.state = PrinterState::HandleChar;
                }
                AdvanceOutcome::Resumed
            }
            PrinterState::Finished => AdvanceOutcome::CloseRequested,
            PrinterState::Scrolling | PrinterState::Paused | PrinterState::Hidden => AdvanceOutcome::Ignored,
        }
    }

    /// Continuous button state, polled every frame. A new press while printing,
    /// or a button still down when a `{PAUSE}` ends, speeds up like
    /// [`Printer::on_advance_pressed`]; keeping it held pins the delay to zero
    /// until the next wait.
    pub fn on_advance_held(&mut self, held: bool) {
        let pressed_now = held && !self.advance_held;
        self.advance_held = held;
        if pressed_now && self.state == PrinterState::HandleChar {
            self.try_speed_up();
        }
    }

    fn try_speed_up(&mut self) -> bool {
        if !self.settings.allow_speed_up || self.has_been_sped_up {
            return false;
        }
        self.delay_counter = 0.0;
        self.has_been_sped_up = true;
        true
    }

    fn reset_delay(&mut self) {
        self.delay_counter = self.char_delay;
    }

    fn consume_stream(&mut self) {
        self.token_cursor += 1;
        self.char_cursor += 1;
    }

    fn finish(&mut self) -> Option<PrinterEvent> {
        self.state = PrinterState::Finished;
        Some(PrinterEvent::Finished)
    }

    fn begin_scroll(&mut self) {
        let distance = self.settings.scroll_distance();
        if distance <= 0.0 || self.settings.scroll_speed <= 0.0 {
            self.complete_scroll();
            return;
        }
        self.scroll_offset_pixels = 0.0;
        self.scroll_remaining_pixels = distance;
        self.state = PrinterState::Scrolling;
    }

    fn tick_scroll(&mut self, dt: f32) {
        let step = (self.settings.scroll_speed * dt).min(self.scroll_remaining_pixels);
        self.scroll_remaining_pixels -= step;
        self.scroll_offset_pixels += step;
        if self.scroll_remaining_pixels <= 0.0 {
            self.complete_scroll();
        }
    }

    fn complete_scroll(&mut self) {
        self.page_start_line += 1;
        self.scroll_offset_pixels = 0.0;
        self.scroll_remaining_pixels = 0.0;
        self.state = PrinterState::HandleChar;
    }

    /// A character that opens a line the wrapper started (no break before it) may
    /// not fit in the box. Returns true when it has to wait for a scroll first.
    fn enters_overflowing_line(&mut self) -> bool {
        let Some(line) = self.line_at(self.char_cursor) else {
            return false;
        };
        if line <= self.line_counter {
            return false;
        }
        self.line_counter = line;
        if self.visible_line_count() < self.settings.max_visible_lines {
            return false;
        }
        if self.settings.auto_scroll {
            self.begin_scroll();
        } else {
            self.state = PrinterState::WaitForScroll;
        }
        true
    }

    fn dispatch(&mut self) -> Option<PrinterEvent> {
        let kind = match self.tokens.get(self.token_cursor) {
            Some(token) => token.kind.clone(),
            None => {
                if self.token_cursor > self.tokens.len() {
                    log::error!("token cursor {} is past {} tokens", self.token_cursor, self.tokens.len());
                }
                log::debug!("text finished: {} tokens, {} lines", self.tokens.len(), self.lines.len());
                return self.finish();
            }
        };

        if kind.is_stream() && self.char_cursor >= self.stream_len {
            log::error!(
                "character cursor {} is past the character stream ({}) at token {}",
                self.char_cursor,
                self.stream_len,
                self.token_cursor
            );
            return self.finish();
        }

        match kind {
            TokenKind::Char(_) => {
                if self.enters_overflowing_line() {
                    return None;
                }
                self.consume_stream();
                self.reset_delay();
            }
            TokenKind::Newline => {
                self.consume_stream();
                self.line_counter += 1;
                if self.visible_line_count() >= self.settings.max_visible_lines {
                    self.state = PrinterState::Wait;
                } else {
                    self.reset_delay();
                }
            }
            TokenKind::PageBreak => {
                self.consume_stream();
                self.line_counter += 1;
                self.state = PrinterState::Wait;
            }
            TokenKind::Scroll => {
                self.consume_stream();
                self.line_counter += 1;
                self.state = PrinterState::WaitForScroll;
            }
            TokenKind::Pause(frames) => {
                self.token_cursor += 1;
                self.delay_counter = frames_to_seconds(frames);
                self.state = PrinterState::Paused;
            }
            TokenKind::PauseUntilPress => {
                self.token_cursor += 1;
                self.state = PrinterState::Wait;
            }
            TokenKind::Color(color) => {
                self.token_cursor += 1;
                self.text_color = color;
                self.reset_delay();
            }
            TokenKind::Shadow(color) => {
                self.token_cursor += 1;
                self.shadow_color = color;
                self.reset_delay();
            }
            TokenKind::Speed(frames) => {
                self.token_cursor += 1;
                self.char_delay = frames_to_seconds(frames);
                self.reset_delay();
            }
            TokenKind::Clear => {
                self.token_cursor += 1;
                // Printing restarts at the top of the box with the line after the clear.
                let next = self.line_at(self.char_cursor).unwrap_or(self.lines.len());
                self.page_start_line = next;
                self.line_counter = next;
                self.reset_delay();
            }
            TokenKind::Reset => {
                self.token_cursor += 1;
                self.text_color = self.settings.text_color;
                self.shadow_color = self.settings.shadow_color;
                self.char_delay = self.settings.char_delay;
                self.active_effect_id = None;
                self.reset_delay();
            }
            TokenKind::EffectStart(id) => {
                self.token_cursor += 1;
                self.active_effect_id = Some(id);
                self.reset_delay();
            }
            TokenKind::EffectEnd => {
                self.token_cursor += 1;
                self.active_effect_id = None;
                self.reset_delay();
            }
        }
        None
    }

    /// Debug helper for HUD: one-line summary of the session.
    pub fn debug_line(&self) -> String {
        let mut preview = self.raw_text.replace('\n', " ");
        if preview.chars().count() > 60 {
            preview = preview.chars().take(60).collect();
            preview.push_str("...");
        }
        format!(
            "state={} token={}/{} char={}/{} line={} page={} lines={} delay={:.3} effect={} text=\"{}\"",
            self.state,
            self.token_cursor,
            self.tokens.len(),
            self.char_cursor,
            self.stream_len,
            self.line_counter,
            self.page_start_line,
            self.lines.len(),
            self.delay_counter,
            self.active_effect_id.as_deref().unwrap_or("-"),
            preview,
        )
    }
}
