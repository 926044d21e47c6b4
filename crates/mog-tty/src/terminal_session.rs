#![forbid(unsafe_code)]

//! Terminal session lifecycle guard.
//!
//! [`TerminalSession`] enters raw mode on construction and restores the
//! terminal when dropped, including on panic (through a one-time panic hook)
//! and, on unix, on `SIGINT`/`SIGTERM`.
//!
//! # Cleanup Order
//!
//! On drop, cleanup happens in reverse order of enabling:
//! 1. Show cursor (always)
//! 2. Leave alternate screen (if enabled)
//! 3. Exit raw mode (always)
//! 4. Flush stdout
//!
//! # Usage
//!
//! ```no_run
//! use mog_core::surface::Surface;
//! use mog_tty::{SessionOptions, TerminalSession};
//!
//! let mut session = TerminalSession::new(SessionOptions {
//!     alternate_screen: true,
//! })?;
//! session.clear()?;
//! session.set_cell(0, 0, '~')?;
//! session.show_cursor(0, 0)?;
//! session.present()?;
//! // Terminal is restored when `session` is dropped.
//! # Ok::<(), std::io::Error>(())
//! ```

use std::io::{self, BufWriter, Stdout, Write};
use std::sync::OnceLock;

use crossterm::{cursor, queue, style, terminal};
use mog_core::event::Event;
use mog_core::surface::{EventSource, Surface};

use crate::input::map_crossterm_event;

#[cfg(unix)]
use signal_hook::consts::signal::{SIGINT, SIGTERM};
#[cfg(unix)]
use signal_hook::iterator::Signals;

/// Terminal session configuration options.
///
/// All options default to `false`.
#[derive(Debug, Clone, Default)]
pub struct SessionOptions {
    /// Enable the alternate screen buffer (`CSI ? 1049 h`).
    ///
    /// The original screen and scrollback are restored on exit.
    pub alternate_screen: bool,
}

/// A terminal in raw mode, drawn through a buffered stdout writer.
///
/// Frames are queued and only reach the terminal on
/// [`Surface::present`].
#[derive(Debug)]
pub struct TerminalSession {
    options: SessionOptions,
    out: BufWriter<Stdout>,
    alternate_screen_enabled: bool,
    #[cfg(unix)]
    signal_guard: Option<SignalGuard>,
}

impl TerminalSession {
    /// Enter raw mode and optionally the alternate screen.
    ///
    /// # Errors
    ///
    /// Returns an error if raw mode cannot be enabled or the terminal cannot
    /// be written.
    pub fn new(options: SessionOptions) -> io::Result<Self> {
        install_panic_hook();

        terminal::enable_raw_mode()?;
        #[cfg(feature = "tracing")]
        tracing::info!("terminal raw mode enabled");

        // From here on, an early return drops the session and restores raw mode.
        let mut session = Self {
            options: options.clone(),
            out: BufWriter::new(io::stdout()),
            alternate_screen_enabled: false,
            #[cfg(unix)]
            signal_guard: None,
        };

        #[cfg(unix)]
        {
            session.signal_guard = Some(SignalGuard::new()?);
        }

        if options.alternate_screen {
            crossterm::execute!(session.out, terminal::EnterAlternateScreen)?;
            session.alternate_screen_enabled = true;
            #[cfg(feature = "tracing")]
            tracing::info!("alternate screen enabled");
        }

        Ok(session)
    }

    /// Get the session options.
    pub fn options(&self) -> &SessionOptions {
        &self.options
    }

    fn cleanup(&mut self) {
        #[cfg(unix)]
        let _ = self.signal_guard.take();

        // Flush any queued frame bytes before restoring.
        let _ = self.out.flush();
        let mut stdout = io::stdout();

        let _ = crossterm::execute!(stdout, cursor::Show);

        if self.alternate_screen_enabled {
            let _ = crossterm::execute!(stdout, terminal::LeaveAlternateScreen);
            self.alternate_screen_enabled = false;
            #[cfg(feature = "tracing")]
            tracing::info!("alternate screen disabled");
        }

        let _ = terminal::disable_raw_mode();
        #[cfg(feature = "tracing")]
        tracing::info!("terminal raw mode disabled");

        let _ = stdout.flush();
    }
}

impl Drop for TerminalSession {
    fn drop(&mut self) {
        self.cleanup();
    }
}

impl Surface for TerminalSession {
    fn size(&self) -> io::Result<(u16, u16)> {
        terminal::size()
    }

    fn clear(&mut self) -> io::Result<()> {
        queue!(self.out, cursor::Hide, terminal::Clear(terminal::ClearType::All))
    }

    fn set_cell(&mut self, col: u16, row: u16, glyph: char) -> io::Result<()> {
        queue!(self.out, cursor::MoveTo(col, row), style::Print(glyph))
    }

    fn show_cursor(&mut self, col: u16, row: u16) -> io::Result<()> {
        queue!(self.out, cursor::MoveTo(col, row), cursor::Show)
    }

    fn present(&mut self) -> io::Result<()> {
        self.out.flush()
    }
}

impl EventSource for TerminalSession {
    fn next_event(&mut self) -> io::Result<Option<Event>> {
        let event = crossterm::event::read()?;
        Ok(map_crossterm_event(event))
    }
}

fn install_panic_hook() {
    static HOOK: OnceLock<()> = OnceLock::new();
    HOOK.get_or_init(|| {
        let previous = std::panic::take_hook();
        std::panic::set_hook(Box::new(move |info| {
            best_effort_cleanup();
            previous(info);
        }));
    });
}

fn best_effort_cleanup() {
    let mut stdout = io::stdout();

    let _ = crossterm::execute!(stdout, cursor::Show);
    let _ = crossterm::execute!(stdout, terminal::LeaveAlternateScreen);
    let _ = terminal::disable_raw_mode();
    let _ = stdout.flush();
}

/// Restores the terminal and exits when a termination signal arrives.
///
/// Raw mode turns Ctrl+C into an ordinary key, so `SIGINT` only arrives when
/// sent from outside the terminal.
#[cfg(unix)]
#[derive(Debug)]
struct SignalGuard {
    handle: signal_hook::iterator::Handle,
    thread: Option<std::thread::JoinHandle<()>>,
}

#[cfg(unix)]
impl SignalGuard {
    fn new() -> io::Result<Self> {
        let mut signals = Signals::new([SIGINT, SIGTERM]).map_err(io::Error::other)?;
        let handle = signals.handle();
        let thread = std::thread::spawn(move || {
            if let Some(signal) = signals.forever().next() {
                #[cfg(feature = "tracing")]
                tracing::warn!(signal, "termination signal received, restoring terminal");
                best_effort_cleanup();
                std::process::exit(128 + signal);
            }
        });
        Ok(Self {
            handle,
            thread: Some(thread),
        })
    }
}

#[cfg(unix)]
impl Drop for SignalGuard {
    fn drop(&mut self) {
        self.handle.close();
        if let Some(thread) = self.thread.take() {
            let _ = thread.join();
        }
    }
}
