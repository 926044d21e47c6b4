#![forbid(unsafe_code)]

//! Cursor movement controller.
//!
//! [`Controller`] owns the [`TextBuffer`], a [`Cursor`] and a [`Viewport`]
//! and is the only place that mutates the cursor. Every operation keeps two
//! invariants:
//!
//! 1. `0 <= cursor.y < buffer.line_count()`.
//! 2. After each step the scroll offset moved by at most one line, toward
//!    the cursor row.
//!
//! The cursor `x` is allowed to exceed the current line length after a
//! vertical move into a shorter line. It is snapped to the end of the line
//! only when moving left or inserting.
//!
//! # Example
//!
//! ```
//! use mog_core::buffer::TextBuffer;
//! use mog_core::controller::{Controller, Direction};
//! use mog_core::cursor::Cursor;
//! use mog_core::geometry::ScreenSize;
//!
//! let buffer = TextBuffer::from_lines(["bb"]);
//! let mut ctl = Controller::new(buffer, ScreenSize::new(80, 24).unwrap());
//! ctl.insert_char('a');
//! assert_eq!(ctl.buffer().line(0).as_str(), "abb");
//! assert_eq!(ctl.cursor().x(), 1);
//!
//! ctl.move_cursor(Direction::Right);
//! ctl.move_cursor(Direction::Right);
//! ctl.move_cursor(Direction::Right); // already at end of line
//! assert_eq!(ctl.cursor().x(), 3);
//! ```

use std::io;

use crate::buffer::TextBuffer;
use crate::cursor::{Cursor, SimpleCursor};
use crate::geometry::{ScreenPos, ScreenSize};
use crate::surface::Surface;
use crate::viewport::{Viewport, WrappedViewport};

/// Cursor movement direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    /// One line up.
    Up,
    /// One line down.
    Down,
    /// One character left.
    Left,
    /// One character right.
    Right,
}

/// Owns buffer, cursor and viewport and keeps them consistent.
#[derive(Debug, Clone)]
pub struct Controller<C = SimpleCursor, V = WrappedViewport> {
    buffer: TextBuffer,
    cursor: C,
    viewport: V,
}

impl Controller {
    /// Controller with the cursor at the origin and the viewport scrolled to
    /// the top.
    #[must_use]
    pub fn new(buffer: TextBuffer, size: ScreenSize) -> Self {
        Self {
            buffer,
            cursor: SimpleCursor::new(),
            viewport: WrappedViewport::new(size),
        }
    }
}

impl<C: Cursor, V: Viewport> Controller<C, V> {
    /// Assemble a controller from existing parts.
    ///
    /// # Panics
    ///
    /// Panics if the cursor row is not a line of `buffer`.
    #[must_use]
    pub fn from_parts(buffer: TextBuffer, cursor: C, viewport: V) -> Self {
        assert!(
            cursor.y() < buffer.line_count(),
            "cursor row {} outside buffer (line count {})",
            cursor.y(),
            buffer.line_count()
        );
        Self {
            buffer,
            cursor,
            viewport,
        }
    }

    /// The document.
    #[must_use]
    pub fn buffer(&self) -> &TextBuffer {
        &self.buffer
    }

    /// The logical cursor.
    #[must_use]
    pub fn cursor(&self) -> &C {
        &self.cursor
    }

    /// The viewport.
    #[must_use]
    pub fn viewport(&self) -> &V {
        &self.viewport
    }

    /// Move the cursor one step and re-settle the scroll offset.
    pub fn move_cursor(&mut self, direction: Direction) {
        match direction {
            Direction::Up => {
                if self.cursor.y() > 0 {
                    self.cursor.move_up();
                }
            }
            Direction::Down => {
                if self.cursor.y() < self.buffer.line_count() - 1 {
                    self.cursor.move_down();
                }
            }
            Direction::Left => {
                self.snap_to_line_end();
                if self.cursor.x() > 0 {
                    self.cursor.move_left();
                }
            }
            Direction::Right => {
                if self.cursor.x() < self.current_line_len() {
                    self.cursor.move_right();
                }
            }
        }
        crate::debug!(
            ?direction,
            x = self.cursor.x(),
            y = self.cursor.y(),
            "cursor moved"
        );
        self.adjust_scroll();
    }

    /// Insert `ch` at the cursor and step right past it.
    ///
    /// A cursor beyond the end of the line is snapped to the end first, so
    /// typing there appends.
    pub fn insert_char(&mut self, ch: char) {
        self.snap_to_line_end();
        self.buffer.insert(self.cursor.y(), self.cursor.x(), ch);
        self.move_cursor(Direction::Right);
    }

    /// Scroll by one line toward the cursor row if it is outside the window.
    ///
    /// Runs after every movement and once after the initial render. At most
    /// one line per call: a cursor more than one row outside the window,
    /// which a shrinking resize can cause, comes back into view over
    /// repeated calls.
    pub fn adjust_scroll(&mut self) {
        let y = self.cursor.y();
        let offset = self.viewport.offset();
        let height = usize::from(self.viewport.size().height());
        if y >= offset + height {
            self.viewport.scroll_down();
            crate::debug!(offset = self.viewport.offset(), "scrolled down");
        } else if y < offset {
            self.viewport.scroll_up();
            crate::debug!(offset = self.viewport.offset(), "scrolled up");
        }
    }

    /// Apply new grid dimensions. The scroll offset is kept.
    pub fn resize(&mut self, size: ScreenSize) {
        crate::debug!(
            width = size.width(),
            height = size.height(),
            "viewport resized"
        );
        self.viewport.resize(size);
    }

    /// Screen cell of the glyph cursor.
    #[must_use]
    pub fn cursor_screen_pos(&self) -> ScreenPos {
        self.viewport.cursor_screen_pos(&self.buffer, &self.cursor)
    }

    /// Paint the current state to `surface`.
    ///
    /// # Errors
    ///
    /// Returns an error if the surface cannot be written.
    pub fn paint<S: Surface + ?Sized>(&self, surface: &mut S) -> io::Result<()> {
        self.viewport.paint(&self.buffer, &self.cursor, surface)
    }

    fn current_line_len(&self) -> usize {
        self.buffer.line_len(self.cursor.y())
    }

    fn snap_to_line_end(&mut self) {
        let len = self.current_line_len();
        if self.cursor.x() > len {
            self.cursor.move_to(len, self.cursor.y());
        }
    }
}
