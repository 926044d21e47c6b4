#![forbid(unsafe_code)]

//! Command-line argument parsing.
//!
//! Parses args manually (no external dependencies) to keep the binary lean.
//! Supports environment variable overrides via the `MOG_*` prefix.

use std::env;
use std::ffi::OsString;
use std::fmt;
use std::path::PathBuf;
use std::process;

/// Crate version reported by `--version`.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default log filter when `MOG_LOG` is unset.
pub const DEFAULT_LOG_FILTER: &str = "info";

/// Text printed by `--help`.
pub const HELP_TEXT: &str = "\
mog - a minimal terminal text editor

USAGE:
    mog [OPTIONS] [FILE]

Without FILE, mog opens an empty scratch document that cannot be saved.
While FILE is open, a lock file named .#FILE sits next to it and other mog
instances refuse to open the same file.

OPTIONS:
    --no-alt-screen      Draw on the main screen instead of the alternate one
    --help, -h           Show this help message
    --version, -V        Show version

KEYBINDINGS:
    Arrow keys           Move the cursor
    Printable keys       Insert at the cursor
    Ctrl+S               Save
    Esc / Ctrl+Q         Quit

ENVIRONMENT VARIABLES:
    MOG_ALT_SCREEN       Set to 0 to disable the alternate screen
    MOG_LOG              Log filter, e.g. debug or mog_core=trace (default: info)
    MOG_LOG_FILE         Write logs to this file (logging is off when unset)";

/// Parsed command-line options.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Opts {
    /// File to edit, or `None` for a scratch document.
    pub file: Option<PathBuf>,
    /// Whether to draw on the alternate screen.
    pub alternate_screen: bool,
    /// `tracing` filter directive.
    pub log_filter: String,
    /// Log destination. Logging is disabled when `None`.
    pub log_file: Option<PathBuf>,
}

impl Default for Opts {
    fn default() -> Self {
        Self {
            file: None,
            alternate_screen: true,
            log_filter: DEFAULT_LOG_FILTER.into(),
            log_file: None,
        }
    }
}

/// What the command line asks for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Start the editor.
    Run(Opts),
    /// Print [`HELP_TEXT`].
    Help,
    /// Print the version.
    Version,
}

/// Invalid command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CliError {
    /// An option mog does not know.
    UnknownOption(String),
    /// A second positional argument.
    UnexpectedArgument(PathBuf),
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownOption(opt) => write!(f, "unknown option: {opt}"),
            Self::UnexpectedArgument(arg) => write!(
                f,
                "unexpected argument: {} (mog edits one file at a time)",
                arg.display()
            ),
        }
    }
}

impl std::error::Error for CliError {}

/// Exit status for an invalid command line.
pub const USAGE_EXIT_CODE: i32 = 2;

fn env_flag_disabled(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "0" | "false" | "no" | "off"
    )
}

impl Opts {
    /// Parse the process arguments and environment.
    ///
    /// `--help` and `--version` print and exit with status 0; an invalid
    /// command line prints a diagnostic and exits with status 2.
    pub fn parse() -> Self {
        match Self::parse_from(env::args_os().skip(1), |key| env::var(key).ok()) {
            Ok(Command::Run(opts)) => opts,
            Ok(Command::Help) => {
                println!("{HELP_TEXT}");
                process::exit(0);
            }
            Ok(Command::Version) => {
                println!("mog {VERSION}");
                process::exit(0);
            }
            Err(e) => {
                eprintln!("mog: {e}");
                eprintln!("Run with --help for usage information.");
                process::exit(USAGE_EXIT_CODE);
            }
        }
    }

    /// Parse `args` (without the program name), reading environment
    /// variables through `var`.
    ///
    /// Environment variables take precedence over defaults but are
    /// overridden by explicit command-line flags. A lone `--` ends option
    /// parsing, so files whose names start with `-` can be opened.
    ///
    /// # Errors
    ///
    /// Returns [`CliError`] for unknown options or more than one file.
    pub fn parse_from<I, S, F>(args: I, var: F) -> Result<Command, CliError>
    where
        I: IntoIterator<Item = S>,
        S: Into<OsString>,
        F: Fn(&str) -> Option<String>,
    {
        let mut opts = Self::default();

        // Apply environment variable defaults first
        if let Some(val) = var("MOG_ALT_SCREEN") {
            opts.alternate_screen = !env_flag_disabled(&val);
        }
        if let Some(val) = var("MOG_LOG")
            && !val.trim().is_empty()
        {
            opts.log_filter = val;
        }
        if let Some(val) = var("MOG_LOG_FILE")
            && !val.is_empty()
        {
            opts.log_file = Some(PathBuf::from(val));
        }

        let mut options_done = false;
        for arg in args {
            let arg: OsString = arg.into();
            if !options_done {
                match arg.to_str() {
                    Some("--help" | "-h") => return Ok(Command::Help),
                    Some("--version" | "-V") => return Ok(Command::Version),
                    Some("--no-alt-screen") => {
                        opts.alternate_screen = false;
                        continue;
                    }
                    Some("--") => {
                        options_done = true;
                        continue;
                    }
                    Some(other) if other.starts_with('-') && other != "-" => {
                        return Err(CliError::UnknownOption(other.to_owned()));
                    }
                    _ => {}
                }
            }
            if opts.file.is_some() {
                return Err(CliError::UnexpectedArgument(PathBuf::from(arg)));
            }
            opts.file = Some(PathBuf::from(arg));
        }

        Ok(Command::Run(opts))
    }
}
