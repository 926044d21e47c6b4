#![forbid(unsafe_code)]

//! Render surface and event source contracts.
//!
//! The editor core never talks to a terminal directly. A [`Surface`] is a
//! fixed-size grid of single-glyph cells plus a hardware cursor; an
//! [`EventSource`] yields input events one at a time. `mog-tty` implements
//! both over crossterm, and [`GridSurface`] implements [`Surface`] in memory
//! for tests.
//!
//! # Frame protocol
//!
//! A frame is `clear()`, any number of `set_cell()` calls, one
//! `show_cursor()`, then `present()`. Nothing is guaranteed to be visible
//! before `present()` returns.

use std::io;

use crate::event::Event;

/// A grid of character cells with a hardware cursor.
pub trait Surface {
    /// Current grid dimensions as `(columns, rows)`.
    ///
    /// # Errors
    ///
    /// Returns an error if the size cannot be queried.
    fn size(&self) -> io::Result<(u16, u16)>;

    /// Blank every cell.
    ///
    /// # Errors
    ///
    /// Returns an error if the device cannot be written.
    fn clear(&mut self) -> io::Result<()>;

    /// Write one glyph at `(col, row)`. Cells outside the grid are ignored.
    ///
    /// # Errors
    ///
    /// Returns an error if the device cannot be written.
    fn set_cell(&mut self, col: u16, row: u16, glyph: char) -> io::Result<()>;

    /// Place the hardware cursor at `(col, row)` and make it visible.
    ///
    /// # Errors
    ///
    /// Returns an error if the device cannot be written.
    fn show_cursor(&mut self, col: u16, row: u16) -> io::Result<()>;

    /// Flush the frame.
    ///
    /// # Errors
    ///
    /// Returns an error if the device cannot be flushed.
    fn present(&mut self) -> io::Result<()>;
}

/// A blocking source of input events.
pub trait EventSource {
    /// Block until the next event.
    ///
    /// Returns `Ok(None)` for input that has no canonical [`Event`]
    /// representation (e.g. key releases or unsupported keys).
    ///
    /// # Errors
    ///
    /// Returns an error if reading from the device fails.
    fn next_event(&mut self) -> io::Result<Option<Event>>;
}

/// In-memory surface.
///
/// Cells are stored in row-major order: `index = y * width + x`. A fresh or
/// cleared grid is all spaces.
///
/// # Example
///
/// ```
/// use mog_core::surface::{GridSurface, Surface};
///
/// let mut grid = GridSurface::new(3, 2);
/// grid.set_cell(0, 0, 'a')?;
/// grid.set_cell(9, 9, 'z')?; // clipped
/// assert_eq!(grid.to_text(), "a  \n   ");
/// # Ok::<(), std::io::Error>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GridSurface {
    width: u16,
    height: u16,
    cells: Vec<char>,
    cursor: Option<(u16, u16)>,
    presents: usize,
}

impl GridSurface {
    /// Create a blank grid.
    #[must_use]
    pub fn new(width: u16, height: u16) -> Self {
        Self {
            width,
            height,
            cells: vec![' '; usize::from(width) * usize::from(height)],
            cursor: None,
            presents: 0,
        }
    }

    /// Glyph at `(col, row)`, or `None` outside the grid.
    #[must_use]
    pub fn cell(&self, col: u16, row: u16) -> Option<char> {
        self.index(col, row).map(|i| self.cells[i])
    }

    /// Row `row` as a string of exactly `width` glyphs.
    ///
    /// # Panics
    ///
    /// Panics if `row >= height`.
    #[must_use]
    pub fn row_text(&self, row: u16) -> String {
        assert!(row < self.height, "row {row} outside grid");
        let start = usize::from(row) * usize::from(self.width);
        self.cells[start..start + usize::from(self.width)]
            .iter()
            .collect()
    }

    /// All rows joined with `\n`.
    #[must_use]
    pub fn to_text(&self) -> String {
        (0..self.height)
            .map(|row| self.row_text(row))
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Where the hardware cursor was last shown.
    #[must_use]
    pub const fn cursor(&self) -> Option<(u16, u16)> {
        self.cursor
    }

    /// Number of presented frames.
    #[must_use]
    pub const fn presents(&self) -> usize {
        self.presents
    }

    fn index(&self, col: u16, row: u16) -> Option<usize> {
        if col < self.width && row < self.height {
            Some(usize::from(row) * usize::from(self.width) + usize::from(col))
        } else {
            None
        }
    }
}

impl Surface for GridSurface {
    fn size(&self) -> io::Result<(u16, u16)> {
        Ok((self.width, self.height))
    }

    fn clear(&mut self) -> io::Result<()> {
        self.cells.fill(' ');
        Ok(())
    }

    fn set_cell(&mut self, col: u16, row: u16, glyph: char) -> io::Result<()> {
        if let Some(i) = self.index(col, row) {
            self.cells[i] = glyph;
        }
        Ok(())
    }

    fn show_cursor(&mut self, col: u16, row: u16) -> io::Result<()> {
        self.cursor = Some((col, row));
        Ok(())
    }

    fn present(&mut self) -> io::Result<()> {
        self.presents += 1;
        Ok(())
    }
}
