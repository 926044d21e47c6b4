#![forbid(unsafe_code)]

//! Line-oriented text storage.
//!
//! [`TextBuffer`] owns the ordered lines of the document. It knows nothing
//! about the screen: wrapping and scrolling live in [`crate::viewport`].
//!
//! # Invariants
//!
//! 1. A buffer always holds at least one [`Line`]. An empty document is a
//!    single empty line, never zero lines.
//! 2. Lines never contain a line-feed.
//! 3. Offsets within a line count characters (Unicode scalar values), not
//!    bytes.
//!
//! # Example
//!
//! ```
//! use mog_core::buffer::TextBuffer;
//!
//! let mut buf = TextBuffer::load(b"bb\ncd").unwrap();
//! buf.insert(0, 0, 'a');
//! assert_eq!(buf.line(0).as_str(), "abb");
//! assert_eq!(buf.to_bytes(), b"abb\ncd");
//! ```

use std::fmt;
use std::str::Utf8Error;

/// A single line of text without its line terminator.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Line {
    text: String,
    /// Length in characters.
    len: usize,
}

impl Line {
    /// Create a line from text. The text must not contain a line-feed.
    #[must_use]
    pub fn new(text: &str) -> Self {
        debug_assert!(!text.contains('\n'), "line text must not contain '\\n'");
        Self {
            text: text.to_owned(),
            len: text.chars().count(),
        }
    }

    /// The line contents.
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// Length in characters.
    #[inline]
    #[must_use]
    pub const fn len(&self) -> usize {
        self.len
    }

    /// Whether the line has no characters.
    #[inline]
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Iterate over the characters of the line.
    pub fn chars(&self) -> std::str::Chars<'_> {
        self.text.chars()
    }

    fn insert(&mut self, x: usize, ch: char) {
        assert!(
            x <= self.len,
            "insert offset {x} past end of line (len {})",
            self.len
        );
        let byte = self
            .text
            .char_indices()
            .nth(x)
            .map_or(self.text.len(), |(i, _)| i);
        self.text.insert(byte, ch);
        self.len += 1;
    }
}

impl fmt::Display for Line {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

/// The ordered lines of a document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextBuffer {
    lines: Vec<Line>,
}

impl Default for TextBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl TextBuffer {
    /// Create an empty document: one empty line.
    #[must_use]
    pub fn new() -> Self {
        Self {
            lines: vec![Line::default()],
        }
    }

    /// Build a buffer from raw file bytes by splitting on line-feed.
    ///
    /// A trailing line-feed produces a trailing empty line, so
    /// `load(b)?.to_bytes() == b`.
    ///
    /// # Errors
    ///
    /// Returns [`Utf8Error`] if `raw` is not valid UTF-8. Nothing is
    /// replaced, so a loaded buffer always saves back the bytes it read.
    pub fn load(raw: &[u8]) -> Result<Self, Utf8Error> {
        let text = std::str::from_utf8(raw)?;
        // `split` yields at least one item, even for empty input.
        let lines = text.split('\n').map(Line::new).collect();
        Ok(Self { lines })
    }

    /// Build a buffer from individual lines. No lines yields one empty line.
    #[must_use]
    pub fn from_lines<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut lines: Vec<Line> = lines.into_iter().map(|s| Line::new(s.as_ref())).collect();
        if lines.is_empty() {
            lines.push(Line::default());
        }
        Self { lines }
    }

    /// Number of lines (always at least 1).
    #[inline]
    #[must_use]
    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    /// Line `y`.
    ///
    /// # Panics
    ///
    /// Panics if `y >= line_count()`.
    #[must_use]
    pub fn line(&self, y: usize) -> &Line {
        &self.lines[y]
    }

    /// Length in characters of line `y`.
    ///
    /// # Panics
    ///
    /// Panics if `y >= line_count()`.
    #[must_use]
    pub fn line_len(&self, y: usize) -> usize {
        self.lines[y].len()
    }

    /// Iterate over all lines in document order.
    pub fn lines(&self) -> impl ExactSizeIterator<Item = &Line> {
        self.lines.iter()
    }

    /// Insert `ch` immediately before character offset `x` of line `y`.
    ///
    /// The buffer does not clamp: the caller snaps `x` to the end of the
    /// line first. Only line `y` changes and it grows by one character.
    ///
    /// # Panics
    ///
    /// Panics if `y >= line_count()` or `x > line_len(y)`.
    pub fn insert(&mut self, y: usize, x: usize, ch: char) {
        let count = self.lines.len();
        let line = self
            .lines
            .get_mut(y)
            .unwrap_or_else(|| panic!("insert row {y} out of range (line count {count})"));
        line.insert(x, ch);
    }

    /// Serialize back to raw bytes: lines joined by a single line-feed.
    #[must_use]
    pub fn to_bytes(&self) -> Vec<u8> {
        let capacity = self.lines.iter().map(|l| l.text.len() + 1).sum();
        let mut out = Vec::with_capacity(capacity);
        for (i, line) in self.lines.iter().enumerate() {
            if i > 0 {
                out.push(b'\n');
            }
            out.extend_from_slice(line.text.as_bytes());
        }
        out
    }
}
