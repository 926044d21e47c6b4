#![forbid(unsafe_code)]

//! Wrapped viewport layout.
//!
//! Maps buffer coordinates to screen coordinates for a grid of fixed width,
//! soft-wrapping long lines and starting at a vertical scroll offset (the
//! first buffer line shown on screen).
//!
//! # Wrap arithmetic
//!
//! A line of length `L` on a grid of width `w` occupies `L / w + 1` rows,
//! i.e. `ceil((L + 1) / w)`. The extra cell is room for the end-of-line
//! cursor position, so an empty line still takes one row and a line of
//! exactly `w` characters takes two.
//!
//! For a buffer position `(bx, by)` with `by >= offset`:
//!
//! ```text
//! screen_x = bx % w
//! screen_y = sum(rows(line i) for offset <= i < by) + bx / w
//! ```
//!
//! The sum is recomputed from the offset on every call; there is no cached
//! prefix table because the offset moves with the cursor.
//!
//! # Example
//!
//! ```
//! use mog_core::buffer::TextBuffer;
//! use mog_core::cursor::SimpleCursor;
//! use mog_core::geometry::ScreenSize;
//! use mog_core::surface::GridSurface;
//! use mog_core::viewport::{Viewport, WrappedViewport};
//!
//! let buffer = TextBuffer::from_lines(["abcde"]);
//! let viewport = WrappedViewport::new(ScreenSize::new(3, 3).unwrap());
//! let mut grid = GridSurface::new(3, 3);
//! viewport.paint(&buffer, &SimpleCursor::new(), &mut grid)?;
//! assert_eq!(grid.to_text(), "abc\nde \n~  ");
//! # Ok::<(), std::io::Error>(())
//! ```

use std::io;

use crate::buffer::TextBuffer;
use crate::cursor::Cursor;
use crate::geometry::{BufferPos, ScreenPos, ScreenSize};
use crate::surface::Surface;

/// Glyph written in column 0 of every screen row below the end of the
/// document.
pub const FILLER_GLYPH: char = '~';

/// Number of screen rows a line of `len` characters occupies at `width`.
#[inline]
#[must_use]
pub const fn wrapped_rows(len: usize, width: u16) -> usize {
    len / width as usize + 1
}

/// Capability set of a viewport: scroll state, coordinate mapping and
/// painting.
pub trait Viewport {
    /// Current grid dimensions.
    fn size(&self) -> ScreenSize;

    /// Replace the grid dimensions. The scroll offset is kept.
    fn resize(&mut self, size: ScreenSize);

    /// Index of the first buffer line on screen.
    fn offset(&self) -> usize;

    /// Scroll up by one buffer line. Saturates at 0.
    fn scroll_up(&mut self);

    /// Scroll down by one buffer line.
    fn scroll_down(&mut self);

    /// Map a buffer position to the screen cell it occupies.
    ///
    /// # Panics
    ///
    /// Panics if a line between the offset and `pos.y` does not exist.
    fn buffer_pos_to_screen_pos(&self, buffer: &TextBuffer, pos: BufferPos) -> ScreenPos;

    /// Clear `surface`, draw the visible lines and filler rows, place the
    /// hardware cursor and present the frame.
    ///
    /// # Errors
    ///
    /// Returns an error if the surface cannot be written.
    fn paint<C, S>(&self, buffer: &TextBuffer, cursor: &C, surface: &mut S) -> io::Result<()>
    where
        C: Cursor + ?Sized,
        S: Surface + ?Sized;

    /// Screen cell for the glyph cursor.
    ///
    /// A logical `x` past the end of the line is shown on the last real
    /// character (`len - 1`), or column 0 for an empty line.
    fn cursor_screen_pos<C>(&self, buffer: &TextBuffer, cursor: &C) -> ScreenPos
    where
        C: Cursor + ?Sized,
    {
        let len = buffer.line_len(cursor.y());
        let x = if cursor.x() > len {
            len.saturating_sub(1)
        } else {
            cursor.x()
        };
        self.buffer_pos_to_screen_pos(buffer, BufferPos::new(x, cursor.y()))
    }
}

/// Soft-wrapping viewport with a vertical scroll offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WrappedViewport {
    offset: usize,
    size: ScreenSize,
}

impl WrappedViewport {
    /// Viewport of `size` scrolled to the top.
    #[must_use]
    pub const fn new(size: ScreenSize) -> Self {
        Self { offset: 0, size }
    }

    /// Viewport of `size` starting at buffer line `offset`.
    #[must_use]
    pub const fn with_offset(size: ScreenSize, offset: usize) -> Self {
        Self { offset, size }
    }

    fn rows_for_line(&self, buffer: &TextBuffer, y: usize) -> usize {
        wrapped_rows(buffer.line_len(y), self.size.width())
    }
}

impl Viewport for WrappedViewport {
    fn size(&self) -> ScreenSize {
        self.size
    }

    fn resize(&mut self, size: ScreenSize) {
        self.size = size;
    }

    fn offset(&self) -> usize {
        self.offset
    }

    fn scroll_up(&mut self) {
        self.offset = self.offset.saturating_sub(1);
    }

    fn scroll_down(&mut self) {
        self.offset += 1;
    }

    fn buffer_pos_to_screen_pos(&self, buffer: &TextBuffer, pos: BufferPos) -> ScreenPos {
        let width = usize::from(self.size.width());
        let rows_above: usize = (self.offset..pos.y)
            .map(|y| self.rows_for_line(buffer, y))
            .sum();
        ScreenPos::new(pos.x % width, rows_above + pos.x / width)
    }

    fn paint<C, S>(&self, buffer: &TextBuffer, cursor: &C, surface: &mut S) -> io::Result<()>
    where
        C: Cursor + ?Sized,
        S: Surface + ?Sized,
    {
        let height = usize::from(self.size.height());
        surface.clear()?;

        // Lines in [offset, offset + h] are drawn; anything landing below the
        // grid is clipped.
        let mut used_rows = 0;
        if self.offset < buffer.line_count() {
            let last = (self.offset + height).min(buffer.line_count() - 1);
            for y in self.offset..=last {
                for (x, glyph) in buffer.line(y).chars().enumerate() {
                    let pos = self.buffer_pos_to_screen_pos(buffer, BufferPos::new(x, y));
                    if pos.y < height {
                        surface.set_cell(to_cell(pos.x), to_cell(pos.y), glyph)?;
                    }
                }
                used_rows += self.rows_for_line(buffer, y);
            }
        }

        for row in used_rows..height {
            surface.set_cell(0, to_cell(row), FILLER_GLYPH)?;
        }

        let cursor_pos = self.cursor_screen_pos(buffer, cursor);
        surface.show_cursor(to_cell(cursor_pos.x), to_cell(cursor_pos.y))?;
        crate::trace!(
            offset = self.offset,
            cursor_x = cursor_pos.x,
            cursor_y = cursor_pos.y,
            "painted frame"
        );
        surface.present()
    }
}

fn to_cell(n: usize) -> u16 {
    u16::try_from(n).unwrap_or(u16::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cursor::SimpleCursor;
    use crate::surface::GridSurface;

    fn size(w: u16, h: u16) -> ScreenSize {
        ScreenSize::new(w, h).unwrap()
    }

    fn painted(lines: &[&str], cursor: SimpleCursor, w: u16, h: u16, offset: usize) -> GridSurface {
        let buffer = TextBuffer::from_lines(lines);
        let viewport = WrappedViewport::with_offset(size(w, h), offset);
        let mut grid = GridSurface::new(w, h);
        viewport.paint(&buffer, &cursor, &mut grid).unwrap();
        grid
    }

    #[test]
    fn wrapped_rows_reserves_end_of_line_cell() {
        assert_eq!(wrapped_rows(0, 3), 1);
        assert_eq!(wrapped_rows(2, 3), 1);
        assert_eq!(wrapped_rows(3, 3), 2);
        assert_eq!(wrapped_rows(5, 3), 2);
        assert_eq!(wrapped_rows(6, 3), 3);
    }

    #[test]
    fn maps_unwrapped_positions_directly() {
        let buffer = TextBuffer::from_lines(["ab", "cd"]);
        let viewport = WrappedViewport::new(size(5, 5));
        assert_eq!(
            viewport.buffer_pos_to_screen_pos(&buffer, BufferPos::new(1, 1)),
            ScreenPos::new(1, 1)
        );
    }

    #[test]
    fn maps_positions_after_wrapped_line() {
        let buffer = TextBuffer::from_lines(["abcdefg", "xy"]);
        let viewport = WrappedViewport::new(size(3, 10));
        // "abcdefg" takes 3 rows at width 3.
        assert_eq!(
            viewport.buffer_pos_to_screen_pos(&buffer, BufferPos::new(4, 0)),
            ScreenPos::new(1, 1)
        );
        assert_eq!(
            viewport.buffer_pos_to_screen_pos(&buffer, BufferPos::new(1, 1)),
            ScreenPos::new(1, 3)
        );
    }

    #[test]
    fn mapping_is_relative_to_offset() {
        let buffer = TextBuffer::from_lines(["a", "b", "c"]);
        let viewport = WrappedViewport::with_offset(size(3, 3), 1);
        assert_eq!(
            viewport.buffer_pos_to_screen_pos(&buffer, BufferPos::new(0, 2)),
            ScreenPos::new(0, 1)
        );
    }

    #[test]
    fn paints_empty_buffer_with_filler_rows() {
        let grid = painted(&[""], SimpleCursor::new(), 15, 3, 0);
        assert_eq!(grid.row_text(0), " ".repeat(15));
        assert_eq!(grid.row_text(1), format!("~{}", " ".repeat(14)));
        assert_eq!(grid.row_text(2), format!("~{}", " ".repeat(14)));
    }

    #[test]
    fn paints_wrapped_line() {
        let grid = painted(&["abcde"], SimpleCursor::new(), 3, 3, 0);
        assert_eq!(grid.to_text(), "abc\nde \n~  ");
    }

    #[test]
    fn paints_from_offset() {
        let grid = painted(&["a", "b", "c"], SimpleCursor::at(0, 1), 3, 3, 1);
        assert_eq!(grid.to_text(), "b  \nc  \n~  ");
    }

    #[test]
    fn paint_clips_lines_below_grid() {
        let grid = painted(&["a", "b", "c", "d", "e"], SimpleCursor::new(), 2, 2, 0);
        assert_eq!(grid.to_text(), "a \nb ");
    }

    #[test]
    fn paint_with_line_exactly_filling_width_reserves_cursor_row() {
        let grid = painted(&["abc", "d"], SimpleCursor::new(), 3, 4, 0);
        assert_eq!(grid.to_text(), "abc\n   \nd  \n~  ");
    }

    #[test]
    fn paint_places_cursor_and_presents() {
        let grid = painted(&["ab", "cd"], SimpleCursor::at(1, 1), 5, 5, 0);
        assert_eq!(grid.cursor(), Some((1, 1)));
        assert_eq!(grid.presents(), 1);
    }

    #[test]
    fn cursor_at_end_of_line_is_shown_past_last_char() {
        let grid = painted(&["ab"], SimpleCursor::at(2, 0), 5, 2, 0);
        assert_eq!(grid.cursor(), Some((2, 0)));
    }

    #[test]
    fn cursor_past_end_of_line_is_shown_on_last_char() {
        let grid = painted(&["ab", "cd"], SimpleCursor::at(10, 0), 5, 5, 0);
        assert_eq!(grid.cursor(), Some((1, 0)));
    }

    #[test]
    fn cursor_past_end_of_empty_line_is_shown_at_column_zero() {
        let grid = painted(&["abc", ""], SimpleCursor::at(3, 1), 5, 5, 0);
        assert_eq!(grid.cursor(), Some((0, 1)));
    }

    #[test]
    fn cursor_on_wrapped_segment() {
        let grid = painted(&["abcde"], SimpleCursor::at(4, 0), 3, 3, 0);
        assert_eq!(grid.cursor(), Some((1, 1)));
    }

    #[test]
    fn paint_overwrites_previous_frame() {
        let viewport = WrappedViewport::new(size(3, 2));
        let mut grid = GridSurface::new(3, 2);
        let long = TextBuffer::from_lines(["abc", "def"]);
        viewport.paint(&long, &SimpleCursor::new(), &mut grid).unwrap();
        let short = TextBuffer::from_lines(["x"]);
        viewport.paint(&short, &SimpleCursor::new(), &mut grid).unwrap();
        assert_eq!(grid.to_text(), "x  \n~  ");
    }

    #[test]
    fn offset_past_document_is_all_filler() {
        let grid = painted(&["a"], SimpleCursor::new(), 2, 2, 5);
        assert_eq!(grid.to_text(), "~ \n~ ");
    }

    #[test]
    fn scroll_up_saturates() {
        let mut viewport = WrappedViewport::new(size(3, 3));
        viewport.scroll_up();
        assert_eq!(viewport.offset(), 0);
        viewport.scroll_down();
        viewport.scroll_down();
        viewport.scroll_up();
        assert_eq!(viewport.offset(), 1);
    }

    #[test]
    fn resize_keeps_offset() {
        let mut viewport = WrappedViewport::with_offset(size(3, 3), 2);
        viewport.resize(size(10, 4));
        assert_eq!(viewport.offset(), 2);
        assert_eq!(viewport.size(), size(10, 4));
    }
}
