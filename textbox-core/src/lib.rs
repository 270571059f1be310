//! This crate implements the core functionality of the textbox engine
//!
//! This mostly includes control-code tokenizing, text metrics and line layouting.
//! Everything in here is pure: the stateful printer lives in the `textbox` crate.

#![allow(clippy::uninlined_format_args)]

pub mod color;
pub mod error;
pub mod layout;
pub mod metrics;
pub mod registry;
pub mod token;
pub mod tokenizer;

pub use color::Color;
pub use error::{MalformedReason, Result, TextError};
pub use layout::{wrap, CharAttributes, WrappedLine};
pub use metrics::{MonospaceMetrics, TextMetrics};
pub use registry::{ControlCode, ControlCodeParser, ControlCodeRegistry};
pub use token::{frames_to_seconds, to_source, Token, TokenKind, REFERENCE_FRAME_RATE};
pub use tokenizer::{tokenize, tokenize_with};
