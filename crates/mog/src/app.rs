#![forbid(unsafe_code)]

//! The editor event loop.
//!
//! [`App`] ties a [`Controller`] to a terminal device and, when a file is
//! open, to its [`SessionHandle`]. Each iteration paints a frame, blocks on
//! the next event and applies it.
//!
//! | Input | Effect |
//! |-------|--------|
//! | Arrow keys | Move the cursor |
//! | Printable char (no Ctrl/Alt) | Insert at the cursor |
//! | Ctrl+S | Save; failures are logged and editing continues |
//! | Esc, Ctrl+Q | Quit |
//! | Resize | Resize the viewport; zero-sized frames are skipped |

use std::io;
use std::path::Path;

use mog_core::buffer::TextBuffer;
use mog_core::controller::{Controller, Direction};
use mog_core::cursor::Cursor;
use mog_core::event::{Event, KeyCode, KeyEvent};
use mog_core::geometry::ScreenSize;
use mog_core::session::{SessionError, SessionHandle};
use mog_core::surface::{EventSource, Surface};

/// Viewport size used until the device reports a usable one.
pub const FALLBACK_SIZE: ScreenSize = match ScreenSize::new(80, 24) {
    Some(size) => size,
    None => panic!("fallback size must be non-zero"),
};

/// Load the document to edit.
///
/// With a path, the file is locked and read; without one, the document is a
/// single empty line and nothing is locked. A file that is not UTF-8 is
/// refused and its lock released, since saving it back would rewrite bytes
/// the editor cannot show.
///
/// # Errors
///
/// Returns [`SessionError`] if the file is locked by another session or
/// cannot be read. Non-UTF-8 contents are reported as
/// [`SessionError::Io`] with [`io::ErrorKind::InvalidData`].
pub fn open_document(path: Option<&Path>) -> Result<(TextBuffer, Option<SessionHandle>), SessionError> {
    match path {
        Some(path) => {
            let (handle, contents) = SessionHandle::acquire(path)?;
            match TextBuffer::load(&contents) {
                Ok(buffer) => Ok((buffer, Some(handle))),
                Err(e) => {
                    tracing::warn!(path = %path.display(), error = %e, "refusing non-UTF-8 file");
                    handle.release()?;
                    Err(SessionError::Io {
                        path: path.to_path_buf(),
                        source: io::Error::new(io::ErrorKind::InvalidData, e),
                    })
                }
            }
        }
        None => {
            tracing::info!("scratch document, saving disabled");
            Ok((TextBuffer::new(), None))
        }
    }
}

/// Whether the loop keeps running after an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    /// Wait for the next event.
    Continue,
    /// Leave the loop.
    Quit,
}

/// Editor state plus the device it draws on.
#[derive(Debug)]
pub struct App<D> {
    controller: Controller,
    session: Option<SessionHandle>,
    device: D,
}

impl<D: Surface + EventSource> App<D> {
    /// Create the editor with the viewport sized to the device.
    ///
    /// # Errors
    ///
    /// Returns an error if the device size cannot be queried.
    pub fn new(buffer: TextBuffer, session: Option<SessionHandle>, device: D) -> io::Result<Self> {
        let (width, height) = device.size()?;
        let size = ScreenSize::new(width, height).unwrap_or(FALLBACK_SIZE);
        tracing::debug!(width, height, lines = buffer.line_count(), "editor created");
        Ok(Self {
            controller: Controller::new(buffer, size),
            session,
            device,
        })
    }

    /// The editor state.
    pub fn controller(&self) -> &Controller {
        &self.controller
    }

    /// The device.
    pub fn device(&self) -> &D {
        &self.device
    }

    /// The open session, if a file is being edited.
    pub fn session(&self) -> Option<&SessionHandle> {
        self.session.as_ref()
    }

    /// Run until the user quits.
    ///
    /// # Errors
    ///
    /// Returns an error if the device fails to read input or draw.
    pub fn run(&mut self) -> io::Result<()> {
        self.controller.adjust_scroll();
        loop {
            self.paint()?;
            let Some(event) = self.device.next_event()? else {
                continue;
            };
            if self.handle_event(event) == Flow::Quit {
                tracing::info!("quit requested");
                return Ok(());
            }
        }
    }

    /// Apply one event.
    pub fn handle_event(&mut self, event: Event) -> Flow {
        match event {
            Event::Key(key) => self.handle_key(key),
            Event::Resize { width, height } => {
                match ScreenSize::new(width, height) {
                    Some(size) => self.controller.resize(size),
                    None => tracing::debug!(width, height, "ignoring zero-sized resize"),
                }
                Flow::Continue
            }
        }
    }

    /// Restore the device, then release the session lock.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError`] if the sentinel could not be removed.
    pub fn finish(self) -> Result<(), SessionError> {
        let Self {
            device, session, ..
        } = self;
        drop(device);
        session.map_or(Ok(()), SessionHandle::release)
    }

    fn handle_key(&mut self, key: KeyEvent) -> Flow {
        if key.code == KeyCode::Escape || key.is_ctrl_char('q') {
            return Flow::Quit;
        }
        if key.is_ctrl_char('s') {
            self.save();
            return Flow::Continue;
        }
        match key.code {
            KeyCode::Up => self.controller.move_cursor(Direction::Up),
            KeyCode::Down => self.controller.move_cursor(Direction::Down),
            KeyCode::Left => self.controller.move_cursor(Direction::Left),
            KeyCode::Right => self.controller.move_cursor(Direction::Right),
            KeyCode::Char(ch) if !key.ctrl() && !key.alt() && !ch.is_control() => {
                self.controller.insert_char(ch);
            }
            _ => tracing::trace!(?key, "unbound key"),
        }
        Flow::Continue
    }

    fn save(&self) {
        let Some(session) = &self.session else {
            tracing::warn!("save requested for scratch document");
            return;
        };
        if let Err(e) = session.save(&self.controller.buffer().to_bytes()) {
            tracing::error!(error = %e, "save failed");
        }
    }

    fn paint(&mut self) -> io::Result<()> {
        let (width, height) = self.device.size()?;
        if width == 0 || height == 0 {
            tracing::trace!("skipping frame for zero-sized device");
            return Ok(());
        }
        self.controller.paint(&mut self.device)?;
        let cursor = self.controller.cursor();
        tracing::trace!(x = cursor.x(), y = cursor.y(), "frame presented");
        Ok(())
    }
}
