#![forbid(unsafe_code)]

//! Logical cursor in buffer coordinates.
//!
//! A [`Cursor`] only stores a position and steps it by one in any direction.
//! It does not know the buffer: bounds checks and end-of-line clamping are
//! the job of [`crate::controller::Controller`].

use crate::geometry::BufferPos;

/// Capability set of a logical cursor.
pub trait Cursor {
    /// Character offset within the current line. May exceed the line length
    /// after a vertical move into a shorter line.
    fn x(&self) -> usize;

    /// Current line index.
    fn y(&self) -> usize;

    /// Step one character left. Saturates at column 0.
    fn move_left(&mut self);

    /// Step one character right.
    fn move_right(&mut self);

    /// Step one line up. Saturates at line 0.
    fn move_up(&mut self);

    /// Step one line down.
    fn move_down(&mut self);

    /// Place the cursor at an absolute position.
    fn move_to(&mut self, x: usize, y: usize);

    /// Current position as a [`BufferPos`].
    fn position(&self) -> BufferPos {
        BufferPos::new(self.x(), self.y())
    }
}

/// Plain (x, y) cursor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SimpleCursor {
    x: usize,
    y: usize,
}

impl SimpleCursor {
    /// Cursor at the origin.
    #[must_use]
    pub const fn new() -> Self {
        Self { x: 0, y: 0 }
    }

    /// Cursor at `(x, y)`.
    #[must_use]
    pub const fn at(x: usize, y: usize) -> Self {
        Self { x, y }
    }
}

impl Cursor for SimpleCursor {
    fn x(&self) -> usize {
        self.x
    }

    fn y(&self) -> usize {
        self.y
    }

    fn move_left(&mut self) {
        self.x = self.x.saturating_sub(1);
    }

    fn move_right(&mut self) {
        self.x += 1;
    }

    fn move_up(&mut self) {
        self.y = self.y.saturating_sub(1);
    }

    fn move_down(&mut self) {
        self.y += 1;
    }

    fn move_to(&mut self, x: usize, y: usize) {
        self.x = x;
        self.y = y;
    }
}
