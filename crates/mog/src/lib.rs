#![forbid(unsafe_code)]

//! mog: a minimal terminal text editor.
//!
//! The binary is a thin shell around [`app::App`]; everything it does can be
//! driven from tests with an in-memory device.

pub mod app;
pub mod cli;
pub mod error;
pub mod logging;

pub use app::{App, Flow};
pub use error::Error;
