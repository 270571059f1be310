use std::{fs, path::PathBuf};

use anyhow::{bail, Context, Result};
use clap::Parser as ClapParser;
use log::LevelFilter;
use textbox::{
    FontRegistry, LoggerConfig, MonospaceMetrics, RevealTracker, TextBoxConfig, TextBoxManager, TextEvent,
    TextOptions,
};

/// Plays a dialogue text file through the printer and prints every page the
/// box would show.
#[derive(ClapParser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Text file with control codes
    input: PathBuf,

    /// JSON text box config
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Box width in pixels
    #[arg(short, long)]
    width: Option<f32>,

    /// Visible lines
    #[arg(short, long)]
    lines: Option<usize>,

    /// Simulated frame rate
    #[arg(long, default_value_t = 60.0)]
    fps: f32,

    /// Load fonts from this directory instead of using fixed-width metrics
    #[arg(long)]
    font_dir: Option<PathBuf>,

    #[arg(long, default_value_t = 16.0)]
    font_size: f32,

    /// Advance of the fixed-width metrics
    #[arg(long, default_value_t = 6.0)]
    advance: f32,

    /// Scroll on soft-wrap overflow instead of waiting
    #[arg(long)]
    auto_scroll: bool,

    /// Only validate the control codes
    #[arg(long)]
    check: bool,

    #[arg(long, default_value_t = 100_000)]
    max_frames: u32,

    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let mut logger = LoggerConfig::default();
    if args.verbose {
        logger.app_level_filter = LevelFilter::Debug;
    }
    logger.init();

    let text = fs::read_to_string(&args.input).with_context(|| format!("read {:?}", args.input))?;

    if args.check {
        return check(&text);
    }

    let mut config = match &args.config {
        Some(path) => TextBoxConfig::load(path)?,
        None => TextBoxConfig::default(),
    };
    if let Some(width) = args.width {
        config.box_width = width;
    }
    if let Some(lines) = args.lines {
        config.max_visible_lines = lines;
    }

    let mut manager = match &args.font_dir {
        Some(dir) => {
            let mut fonts = FontRegistry::new();
            if fonts.load_dir(dir, args.font_size)? == 0 {
                bail!("no usable fonts in {:?}", dir);
            }
            fonts.set_default_font(&config.font);
            config.adopt_line_height(&fonts);
            TextBoxManager::with_metrics(config, fonts)
        }
        None => TextBoxManager::with_metrics(config.clone(), MonospaceMetrics::new(args.advance, config.line_height)),
    };

    let options = TextOptions::new().with_auto_scroll(args.auto_scroll);
    manager.show_text(&text, &options).with_context(|| format!("show {:?}", args.input))?;
    play(&mut manager, args.fps, args.max_frames)
}

fn check(text: &str) -> Result<()> {
    match textbox_core::tokenize(text) {
        Ok(tokens) => {
            println!("ok: {} tokens", tokens.len());
            Ok(())
        }
        Err(e) => bail!("{}", e),
    }
}

fn play(manager: &mut TextBoxManager, fps: f32, max_frames: u32) -> Result<()> {
    if fps <= 0.0 {
        bail!("fps must be positive");
    }
    let dt = 1.0 / fps;
    let mut tracker = RevealTracker::new();
    let mut revealed = 0usize;
    let mut page = 0usize;

    for frame in 0..max_frames {
        manager.tick(dt);
        if let Some(printer) = manager.printer() {
            revealed += tracker.poll(printer).len();
        }

        if manager.is_waiting_for_input() {
            page += 1;
            println!("--- page {} (frame {}) ---", page, frame);
            for line in manager.current_visible_lines() {
                println!("{}", line.text);
            }
            manager.on_advance_pressed();
        }

        for event in manager.drain_events() {
            log::debug!("{:?}", event);
            if let TextEvent::CloseRequested(handle) = event {
                manager.close(handle);
                println!("--- done: {} characters, {} frames ---", revealed, frame + 1);
                return Ok(());
            }
        }
    }

    bail!("text did not finish within {} frames", max_frames)
}
