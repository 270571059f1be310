//! Timed printing of dialogue text into a fixed-size box.
//!
//! [`TextBoxManager`] is the entry point: it turns authored text into a
//! [`Printer`] session, ticks it once per frame and forwards player input.

#![allow(clippy::uninlined_format_args)]

pub mod config;
pub mod effects;
pub mod fonts;
pub mod manager;
pub mod printer;
pub mod snapshot;

pub use config::{
    logger_config::LoggerConfig,
    textbox_config::{TextBoxConfig, TextBoxConfigBuilder},
    text_options::TextOptions,
    PrinterSettings,
};
pub use effects::{RevealTracker, RevealedChar, ShakeEffect};
pub use fonts::FontRegistry;
pub use manager::{SessionHandle, TextBoxManager, TextEvent};
pub use printer::{AdvanceOutcome, Printer, PrinterEvent, PrinterState, VisibleLine};
pub use snapshot::PrinterSnapshotV1;

// re-export for convenience
pub use textbox_core::{Color, MonospaceMetrics, TextError, TextMetrics};
