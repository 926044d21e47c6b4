#![forbid(unsafe_code)]

//! Coordinate and size primitives.
//!
//! Buffer coordinates address a character by line index and in-line offset;
//! screen coordinates address a cell of the render grid. Both are 0-indexed.

use std::num::NonZeroU16;

/// A position in buffer coordinates: `x` is a character offset within line `y`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct BufferPos {
    /// Character offset within the line.
    pub x: usize,
    /// Line index.
    pub y: usize,
}

impl BufferPos {
    /// Create a new buffer position.
    #[must_use]
    pub const fn new(x: usize, y: usize) -> Self {
        Self { x, y }
    }
}

/// A cell position in screen coordinates: column `x`, row `y`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct ScreenPos {
    /// Column.
    pub x: usize,
    /// Row.
    pub y: usize,
}

impl ScreenPos {
    /// Create a new screen position.
    #[must_use]
    pub const fn new(x: usize, y: usize) -> Self {
        Self { x, y }
    }
}

/// Dimensions of the render grid.
///
/// Both dimensions are strictly positive. The wrap arithmetic divides by the
/// width, so a zero-sized grid is rejected here rather than inside the
/// layout engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ScreenSize {
    width: NonZeroU16,
    height: NonZeroU16,
}

impl ScreenSize {
    /// Create a screen size, or `None` if either dimension is zero.
    #[must_use]
    pub const fn new(width: u16, height: u16) -> Option<Self> {
        match (NonZeroU16::new(width), NonZeroU16::new(height)) {
            (Some(width), Some(height)) => Some(Self { width, height }),
            _ => None,
        }
    }

    /// Width in columns.
    #[inline]
    #[must_use]
    pub const fn width(&self) -> u16 {
        self.width.get()
    }

    /// Height in rows.
    #[inline]
    #[must_use]
    pub const fn height(&self) -> u16 {
        self.height.get()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn screen_size_rejects_zero_dimensions() {
        assert!(ScreenSize::new(0, 10).is_none());
        assert!(ScreenSize::new(10, 0).is_none());
        assert!(ScreenSize::new(0, 0).is_none());
    }

    #[test]
    fn screen_size_accessors() {
        let size = ScreenSize::new(80, 24).unwrap();
        assert_eq!(size.width(), 80);
        assert_eq!(size.height(), 24);
    }
}
