#![forbid(unsafe_code)]

//! mog binary entry point.

use std::process::ExitCode;

use mog::app::{self, App};
use mog::cli::Opts;
use mog::{Error, logging};
use mog_tty::{SessionOptions, TerminalSession};

fn run(opts: &Opts) -> Result<(), Error> {
    logging::init(opts)?;

    // Lock and read the file before touching the terminal, so a conflict is
    // reported on a normal screen.
    let (buffer, session) = app::open_document(opts.file.as_deref())?;

    let terminal = TerminalSession::new(SessionOptions {
        alternate_screen: opts.alternate_screen,
    })?;
    tracing::info!(options = ?terminal.options(), "terminal session started");

    let mut editor = App::new(buffer, session, terminal)?;
    let result = editor.run();
    // Restores the terminal and releases the lock even when the loop failed.
    let released = editor.finish();
    result?;
    released?;
    Ok(())
}

fn main() -> ExitCode {
    let opts = Opts::parse();
    match run(&opts) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "exiting with failure");
            eprintln!("mog: {e}");
            ExitCode::FAILURE
        }
    }
}
