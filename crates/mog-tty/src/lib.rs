#![forbid(unsafe_code)]

//! Crossterm terminal device for mog.
//!
//! [`TerminalSession`] owns raw mode and the alternate screen for the life of
//! the editor and implements the core [`Surface`](mog_core::surface::Surface)
//! and [`EventSource`](mog_core::surface::EventSource) contracts on top of
//! stdout and crossterm's event reader.

mod input;
pub mod terminal_session;

pub use terminal_session::{SessionOptions, TerminalSession};
