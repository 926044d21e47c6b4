#![forbid(unsafe_code)]

//! Core: text buffer, cursor movement, wrapped viewport layout, and file
//! session locking for the mog editor.
//!
//! Everything in this crate is synchronous and single-threaded. The terminal
//! itself lives behind the [`surface::Surface`] and [`surface::EventSource`]
//! traits so that the layout engine can be driven against an in-memory
//! [`surface::GridSurface`] in tests.

pub mod buffer;
pub mod controller;
pub mod cursor;
pub mod event;
pub mod geometry;
pub mod logging;
pub mod session;
pub mod surface;
pub mod viewport;

pub use buffer::{Line, TextBuffer};
pub use controller::{Controller, Direction};
pub use cursor::{Cursor, SimpleCursor};
pub use geometry::{BufferPos, ScreenPos, ScreenSize};
pub use session::{SessionError, SessionHandle};
pub use viewport::{Viewport, WrappedViewport};

// Re-export tracing macros at crate root for ergonomic use.
#[cfg(feature = "tracing")]
pub use logging::{debug, error, info, trace, warn};
