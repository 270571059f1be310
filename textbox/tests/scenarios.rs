use pretty_assertions::assert_eq;

use textbox::{
    AdvanceOutcome, Color, MonospaceMetrics, PrinterState, TextBoxConfigBuilder, TextBoxManager, TextError, TextEvent,
    TextOptions,
};
use textbox_core::{tokenize, TokenKind};

const DELAY: f32 = 0.05;

fn manager(max_lines: usize) -> TextBoxManager {
    let config = TextBoxConfigBuilder::new()
        .with_box_width(120.0)
        .with_max_visible_lines(max_lines)
        .with_char_delay(DELAY)
        .with_colors(Color::DARK_GRAY, Color::LIGHT_GRAY, Color::WHITE)
        .get();
    TextBoxManager::with_metrics(config, MonospaceMetrics::new(6.0, 16.0))
}

fn visible(m: &TextBoxManager) -> Vec<String> {
    m.current_visible_lines().iter().map(|l| l.text.to_string()).collect()
}

fn run_until_waiting(m: &mut TextBoxManager, dt: f32) {
    for _ in 0..1000 {
        if m.is_waiting_for_input() {
            return;
        }
        m.tick(dt);
    }
    panic!("never waited: {:?}", m.debug_lines());
}

#[test]
fn hello_world_on_two_lines() {
    let tokens = tokenize("Hello\nWorld").unwrap();
    assert_eq!(tokens.len(), 11);
    assert_eq!(tokens[5].kind, TokenKind::Newline);

    let mut m = manager(2);
    m.show_text("Hello\nWorld", &TextOptions::default()).unwrap();
    let lines: Vec<&str> = m.printer().unwrap().lines().iter().map(|l| l.text.as_str()).collect();
    assert_eq!(lines, vec!["Hello", "World"]);

    run_until_waiting(&mut m, DELAY);
    assert_eq!(m.current_state(), PrinterState::Finished);
    assert_eq!(visible(&m), vec!["Hello", "World"]);
}

#[test]
fn reset_restores_the_session_colors() {
    let tokens = tokenize("{COLOR:RED}Hi{RESET}").unwrap();
    let kinds: Vec<TokenKind> = tokens.into_iter().map(|t| t.kind).collect();
    assert_eq!(
        kinds,
        vec![TokenKind::Color(Color::RED), TokenKind::Char('H'), TokenKind::Char('i'), TokenKind::Reset]
    );

    let mut m = manager(2);
    m.show_text("{COLOR:RED}Hi{RESET}", &TextOptions::default()).unwrap();
    m.tick(DELAY);
    assert_eq!(m.printer().unwrap().text_color(), Color::RED);
    run_until_waiting(&mut m, DELAY);
    assert_eq!(m.printer().unwrap().text_color(), Color::DARK_GRAY);

    let attrs = m.current_visible_lines()[0].attributes.unwrap().to_vec();
    assert!(attrs.iter().all(|a| a.color == Some(Color::RED)));
}

#[test]
fn page_break_clears_the_box() {
    let mut m = manager(1);
    m.show_text("A\\pB", &TextOptions::default()).unwrap();
    run_until_waiting(&mut m, DELAY);
    assert_eq!(m.current_state(), PrinterState::Wait);
    assert_eq!(visible(&m), vec!["A"]);
    assert_eq!(m.printer().unwrap().page_start_line(), 0);

    assert_eq!(m.on_advance_pressed(), AdvanceOutcome::PageCleared);
    assert_eq!(m.printer().unwrap().page_start_line(), 1);
    assert!(visible(&m).is_empty());
    m.tick(DELAY);
    assert_eq!(visible(&m), vec!["B"]);
}

#[test]
fn held_advance_reveals_one_character_per_tick() {
    let config = TextBoxConfigBuilder::new().with_char_delay(10.0).get();
    let mut m = TextBoxManager::with_metrics(config, MonospaceMetrics::default());
    m.show_text("Hello\\pWorld", &TextOptions::default()).unwrap();

    m.on_advance_held(true);
    for (i, dt) in [0.0, 0.001, 0.5, 0.0, 0.016].into_iter().enumerate() {
        m.tick(dt);
        m.on_advance_held(true);
        assert_eq!(m.printer().unwrap().char_cursor(), i + 1);
    }
    m.tick(0.0);
    assert_eq!(m.current_state(), PrinterState::Wait);
    m.tick(0.0);
    assert_eq!(m.printer().unwrap().char_cursor(), 6);

    // the page ends the speed-up even though the button is still down
    m.on_advance_pressed();
    m.tick(0.001);
    m.tick(0.001);
    m.tick(0.001);
    assert_eq!(visible(&m), vec!["W"]);

    // a fresh press speeds up again
    m.on_advance_held(false);
    m.on_advance_held(true);
    m.tick(0.001);
    m.tick(0.001);
    assert_eq!(visible(&m), vec!["Wor"]);
}

#[test]
fn malformed_text_creates_no_session() {
    let mut m = manager(2);
    let err = m.show_text("{COLOR:RED", &TextOptions::default()).unwrap_err();
    assert!(matches!(err, TextError::MalformedControlCode { offset: 0, .. }), "{err}");
    assert_eq!(m.current_handle(), None);
    assert_eq!(m.current_state(), PrinterState::Hidden);
    assert!(m.drain_events().is_empty());
}

#[test]
fn full_session_lifecycle() {
    let mut m = manager(2);
    let handle = m.show_text("ok", &TextOptions::default()).unwrap();
    run_until_waiting(&mut m, DELAY);
    assert!(m.is_finished());
    assert_eq!(m.on_advance_pressed(), AdvanceOutcome::CloseRequested);
    // never closes by itself
    assert!(m.is_finished());
    assert!(m.close(handle));
    assert!(!m.close(handle));
    assert_eq!(
        m.drain_events(),
        vec![
            TextEvent::Started(handle),
            TextEvent::Finished(handle),
            TextEvent::CloseRequested(handle),
            TextEvent::Closed { handle, superseded: false },
        ]
    );
    assert_eq!(m.current_state(), PrinterState::Hidden);
}

#[test]
fn long_text_scrolls_line_by_line() {
    // 20 characters per line
    let mut m = manager(2);
    let text = "aaaaaaaaaaaaaaaaaaaa".to_string() + "bbbbbbbbbbbbbbbbbbbb" + "cc";
    m.show_text(&text, &TextOptions::default()).unwrap();
    run_until_waiting(&mut m, DELAY);
    assert_eq!(m.current_state(), PrinterState::WaitForScroll);
    assert_eq!(visible(&m).len(), 2);

    assert_eq!(m.on_advance_pressed(), AdvanceOutcome::ScrollStarted);
    m.tick(0.0625);
    let offsets: Vec<f32> = m.current_visible_lines().iter().map(|l| l.y).collect();
    assert_eq!(offsets, vec![-8.0, 8.0]);
    m.tick(0.0625);
    assert_eq!(m.current_state(), PrinterState::HandleChar);

    run_until_waiting(&mut m, DELAY);
    assert!(m.is_finished());
    assert_eq!(visible(&m), vec!["bbbbbbbbbbbbbbbbbbbb", "cc"]);
}

#[test]
fn options_override_the_config() {
    let mut m = manager(2);
    let options = TextOptions::new().with_text_color(Color::BLUE).with_char_delay(0.0).with_speed_up(false);
    m.show_text("hey", &options).unwrap();
    let printer = m.printer().unwrap();
    assert_eq!(printer.text_color(), Color::BLUE);
    assert_eq!(printer.char_delay(), 0.0);
    m.tick(0.0);
    assert_eq!(m.on_advance_pressed(), AdvanceOutcome::Ignored);
}

#[test]
fn snapshot_through_the_manager() {
    let mut m = manager(2);
    m.show_text("{SPEED:3}first page\\psecond", &TextOptions::default()).unwrap();
    for _ in 0..5 {
        m.tick(DELAY);
    }
    let snap = m.capture_snapshot_v1().unwrap();

    let mut other = manager(2);
    let handle = other.restore_snapshot_v1(&snap).unwrap();
    assert_eq!(other.current_handle(), Some(handle));
    assert_eq!(visible(&other), visible(&m));
    assert_eq!(other.printer().unwrap().char_delay(), 0.05);
}
