use std::fmt;

use crossbeam_channel::{unbounded, Receiver, Sender};
use itertools::Itertools;
use serde::{Deserialize, Serialize};
use textbox_core::{Result, TextError, TextMetrics};

use crate::{
    config::{text_options::TextOptions, textbox_config::TextBoxConfig},
    printer::{AdvanceOutcome, Printer, PrinterEvent, PrinterState, VisibleLine},
    snapshot::PrinterSnapshotV1,
};

/// Identifies one `show_text` call. Handles are never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SessionHandle(u64);

impl SessionHandle {
    pub fn id(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for SessionHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextEvent {
    Started(SessionHandle),
    /// All text is out; the box waits for a last advance.
    Finished(SessionHandle),
    /// The player advanced a finished text. The owner decides when to `close`.
    CloseRequested(SessionHandle),
    Closed { handle: SessionHandle, superseded: bool },
}

/// Owns the single active text session.
///
/// Events go to an unbounded channel; owners that never read
/// [`TextBoxManager::events`] should drain it with [`TextBoxManager::drain_events`].
pub struct TextBoxManager {
    config: TextBoxConfig,
    metrics: Option<Box<dyn TextMetrics>>,
    session: Option<(SessionHandle, Printer)>,
    next_id: u64,
    event_sender: Sender<TextEvent>,
    event_receiver: Receiver<TextEvent>,
}

impl Default for TextBoxManager {
    fn default() -> Self {
        Self::new(TextBoxConfig::default())
    }
}

impl TextBoxManager {
    /// A manager without metrics; `show_text` fails until [`TextBoxManager::set_metrics`].
    pub fn new(config: TextBoxConfig) -> Self {
        let (event_sender, event_receiver) = unbounded();
        Self { config, metrics: None, session: None, next_id: 1, event_sender, event_receiver }
    }

    pub fn with_metrics(config: TextBoxConfig, metrics: impl TextMetrics + 'static) -> Self {
        let mut manager = Self::new(config);
        manager.set_metrics(metrics);
        manager
    }

    pub fn set_metrics(&mut self, metrics: impl TextMetrics + 'static) {
        self.metrics = Some(Box::new(metrics));
    }

    pub fn config(&self) -> &TextBoxConfig {
        &self.config
    }

    /// Applies to sessions started afterwards.
    pub fn set_config(&mut self, config: TextBoxConfig) {
        self.config = config;
    }

    /// Starts a new session, replacing the current one.
    ///
    /// The text is tokenized and wrapped before anything is torn down, so a
    /// malformed text leaves the running session untouched.
    pub fn show_text(&mut self, raw_text: &str, options: &TextOptions) -> Result<SessionHandle> {
        let settings = self.config.resolve(options);
        let metrics = self
            .metrics
            .as_deref()
            .ok_or_else(|| TextError::MetricsUnavailable { font: settings.font.clone() })?;
        let printer = Printer::new(raw_text, settings, metrics)?;
        log::debug!("show_text: {} tokens, {} lines", printer.tokens().len(), printer.lines().len());
        Ok(self.install(printer))
    }

    /// Resumes a captured session, replacing the current one.
    pub fn restore_snapshot_v1(&mut self, snap: &PrinterSnapshotV1) -> Result<SessionHandle> {
        let metrics = self
            .metrics
            .as_deref()
            .ok_or_else(|| TextError::MetricsUnavailable { font: snap.settings.font.clone() })?;
        let printer = Printer::from_snapshot_v1(snap, metrics)?;
        log::debug!("restored session at token {}/{}", printer.token_cursor(), printer.tokens().len());
        Ok(self.install(printer))
    }

    pub fn capture_snapshot_v1(&self) -> Option<PrinterSnapshotV1> {
        self.printer().map(Printer::capture_snapshot_v1)
    }

    fn install(&mut self, printer: Printer) -> SessionHandle {
        if let Some((old, _)) = self.session.take() {
            log::debug!("session {} superseded", old);
            self.emit(TextEvent::Closed { handle: old, superseded: true });
        }
        let handle = SessionHandle(self.next_id);
        self.next_id += 1;
        self.session = Some((handle, printer));
        self.emit(TextEvent::Started(handle));
        handle
    }

    /// Ends the session `handle`. Stale handles are ignored.
    pub fn close(&mut self, handle: SessionHandle) -> bool {
        match &self.session {
            Some((current, _)) if *current == handle => {
                self.session = None;
                log::debug!("session {} closed", handle);
                self.emit(TextEvent::Closed { handle, superseded: false });
                true
            }
            _ => {
                log::debug!("ignoring close of stale session {}", handle);
                false
            }
        }
    }

    pub fn tick(&mut self, delta_seconds: f32) {
        let Some((handle, printer)) = self.session.as_mut() else {
            return;
        };
        let handle = *handle;
        if let Some(PrinterEvent::Finished) = printer.tick(delta_seconds) {
            self.emit(TextEvent::Finished(handle));
        }
    }

    pub fn on_advance_pressed(&mut self) -> AdvanceOutcome {
        let Some((handle, printer)) = self.session.as_mut() else {
            return AdvanceOutcome::Ignored;
        };
        let handle = *handle;
        let outcome = printer.on_advance_pressed();
        if outcome == AdvanceOutcome::CloseRequested {
            self.emit(TextEvent::CloseRequested(handle));
        }
        outcome
    }

    pub fn on_advance_held(&mut self, held: bool) {
        if let Some((_, printer)) = self.session.as_mut() {
            printer.on_advance_held(held);
        }
    }

    pub fn current_handle(&self) -> Option<SessionHandle> {
        self.session.as_ref().map(|(handle, _)| *handle)
    }

    pub fn printer(&self) -> Option<&Printer> {
        self.session.as_ref().map(|(_, printer)| printer)
    }

    pub fn current_visible_lines(&self) -> Vec<VisibleLine<'_>> {
        self.printer().map(Printer::current_visible_lines).unwrap_or_default()
    }

    pub fn scroll_offset_pixels(&self) -> f32 {
        self.printer().map_or(0.0, Printer::scroll_offset_pixels)
    }

    /// `Hidden` when no session is active.
    pub fn current_state(&self) -> PrinterState {
        self.printer().map_or(PrinterState::Hidden, Printer::state)
    }

    pub fn is_waiting_for_input(&self) -> bool {
        self.printer().map_or(false, Printer::is_waiting_for_input)
    }

    pub fn is_finished(&self) -> bool {
        self.printer().map_or(false, Printer::is_finished)
    }

    pub fn events(&self) -> &Receiver<TextEvent> {
        &self.event_receiver
    }

    pub fn drain_events(&self) -> Vec<TextEvent> {
        self.event_receiver.try_iter().collect()
    }

    fn emit(&self, event: TextEvent) {
        // the receiver lives in self, so this cannot fail
        let _ = self.event_sender.send(event);
    }

    /// Debug helper for HUD: a summary line followed by the visible text.
    pub fn debug_lines(&self) -> Vec<String> {
        let Some((handle, printer)) = &self.session else {
            return vec!["textbox: idle".to_string()];
        };
        vec![
            format!("textbox {}: {}", handle, printer.debug_line()),
            format!("  visible: [{}]", printer.current_visible_lines().iter().map(|l| l.text).join(" | ")),
        ]
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use textbox_core::MonospaceMetrics;

    use super::*;
    use crate::config::textbox_config::TextBoxConfigBuilder;

    fn manager() -> TextBoxManager {
        let config = TextBoxConfigBuilder::new().with_char_delay(0.0).get();
        TextBoxManager::with_metrics(config, MonospaceMetrics::default())
    }

    #[test]
    fn missing_metrics() {
        let mut m = TextBoxManager::default();
        let err = m.show_text("hi", &TextOptions::default()).unwrap_err();
        assert_eq!(err, TextError::MetricsUnavailable { font: "normal".to_string() });
        assert_eq!(m.current_state(), PrinterState::Hidden);
    }

    #[test]
    fn superseding_closes_the_old_session() {
        let mut m = manager();
        let first = m.show_text("one", &TextOptions::default()).unwrap();
        let second = m.show_text("two", &TextOptions::default()).unwrap();
        assert!(second > first);
        assert!(!m.close(first));
        assert_eq!(m.current_handle(), Some(second));
        assert_eq!(
            m.drain_events(),
            vec![
                TextEvent::Started(first),
                TextEvent::Closed { handle: first, superseded: true },
                TextEvent::Started(second),
            ]
        );
    }

    #[test]
    fn bad_text_keeps_the_current_session() {
        let mut m = manager();
        let handle = m.show_text("fine", &TextOptions::default()).unwrap();
        m.tick(0.1);
        assert!(m.show_text("{NOPE}", &TextOptions::default()).is_err());
        assert_eq!(m.current_handle(), Some(handle));
        assert_eq!(m.printer().map(Printer::char_cursor), Some(1));
    }

    #[test]
    fn idle_manager() {
        let mut m = manager();
        m.tick(1.0);
        assert_eq!(m.on_advance_pressed(), AdvanceOutcome::Ignored);
        assert!(m.current_visible_lines().is_empty());
        assert!(!m.is_waiting_for_input());
        assert_eq!(m.debug_lines(), vec!["textbox: idle".to_string()]);
        assert!(m.capture_snapshot_v1().is_none());
    }

    #[test]
    fn debug_lines_show_visible_text() {
        let mut m = manager();
        m.show_text("ab\ncd", &TextOptions::default()).unwrap();
        for _ in 0..5 {
            m.tick(0.016);
        }
        let lines = m.debug_lines();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].contains("state=HandleChar"));
        assert_eq!(lines[1], "  visible: [ab | cd]");
    }
}
