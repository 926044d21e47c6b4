#![forbid(unsafe_code)]

//! Single-writer file session lock.
//!
//! Opening a file for editing creates an empty sentinel file next to it,
//! named after the target with a `.#` prefix (`notes.txt` → `.#notes.txt`).
//! While the sentinel exists, other editor instances refuse to open the same
//! file.
//!
//! The lock is advisory. It does not stop other programs from writing the
//! target, and a process killed without releasing leaves the sentinel
//! behind; it has to be removed by hand. There is no heartbeat, PID check
//! or expiry: existence is the whole signal.
//!
//! # Error Handling
//!
//! | Error | Cause | Effect |
//! |-------|-------|--------|
//! | [`SessionError::Conflict`] | Sentinel already present | Target not read, nothing created |
//! | [`SessionError::InvalidPath`] | Path has no file name | Nothing touched |
//! | [`SessionError::Io`] | Read, create, write or delete failed | Surfaced as-is, no retry; a failed save leaves the target unchanged |

use std::ffi::OsString;
use std::fmt;
use std::fs::{self, OpenOptions};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

/// Prefix added to the target file name to form the sentinel name.
pub const SENTINEL_PREFIX: &str = ".#";

/// Suffix of the file a save is staged in before it replaces the target.
pub const SAVE_SUFFIX: &str = ".mog-save";

/// Errors from acquiring, using or releasing a session.
#[derive(Debug)]
pub enum SessionError {
    /// The sentinel already exists: the file is open in another session.
    Conflict {
        /// File that was requested.
        target: PathBuf,
        /// Sentinel that signalled the conflict.
        sentinel: PathBuf,
    },
    /// The path does not name a file.
    InvalidPath(PathBuf),
    /// Filesystem failure on `path`.
    Io {
        /// Path the operation failed on.
        path: PathBuf,
        /// Underlying error.
        source: io::Error,
    },
}

impl SessionError {
    fn io(path: &Path, source: io::Error) -> Self {
        Self::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

impl fmt::Display for SessionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Conflict { target, sentinel } => write!(
                f,
                "file open in another session: {} (lock file {})",
                target.display(),
                sentinel.display()
            ),
            Self::InvalidPath(path) => write!(f, "not a file path: {}", path.display()),
            Self::Io { path, source } => write!(f, "{}: {source}", path.display()),
        }
    }
}

impl std::error::Error for SessionError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Conflict { .. } | Self::InvalidPath(_) => None,
        }
    }
}

/// Result alias for session operations.
pub type SessionResult<T> = Result<T, SessionError>;

/// Sentinel path for `target`: same directory, file name prefixed with
/// [`SENTINEL_PREFIX`].
///
/// # Errors
///
/// Returns [`SessionError::InvalidPath`] if `target` has no file name
/// (e.g. `/` or a path ending in `..`).
pub fn sentinel_path_of(target: &Path) -> SessionResult<PathBuf> {
    let file_name = target
        .file_name()
        .ok_or_else(|| SessionError::InvalidPath(target.to_path_buf()))?;
    let mut name = OsString::from(SENTINEL_PREFIX);
    name.push(file_name);
    Ok(target.with_file_name(name))
}

/// Sibling path a save is written to before it replaces `target`: the
/// target's name with a `.mog-save` suffix.
///
/// # Errors
///
/// Returns [`SessionError::InvalidPath`] if `target` has no file name.
pub fn save_path_of(target: &Path) -> SessionResult<PathBuf> {
    let file_name = target
        .file_name()
        .ok_or_else(|| SessionError::InvalidPath(target.to_path_buf()))?;
    let mut name = file_name.to_os_string();
    name.push(SAVE_SUFFIX);
    Ok(target.with_file_name(name))
}

/// An open editing session on one file.
///
/// Dropping a handle that is still held removes the sentinel on a best-effort
/// basis; call [`SessionHandle::release`] to observe failures.
#[derive(Debug)]
pub struct SessionHandle {
    target: PathBuf,
    sentinel: PathBuf,
    held: bool,
}

impl SessionHandle {
    /// Open `target` for editing and return the handle with the file
    /// contents.
    ///
    /// The sentinel is checked first; on conflict the target is not read.
    /// The sentinel is created only after the target was read successfully,
    /// using create-if-absent so a concurrent acquirer sees a conflict.
    ///
    /// # Errors
    ///
    /// - [`SessionError::Conflict`] if the sentinel already exists.
    /// - [`SessionError::InvalidPath`] if `target` has no file name.
    /// - [`SessionError::Io`] if the target cannot be read or the sentinel
    ///   cannot be created.
    pub fn acquire(target: impl AsRef<Path>) -> SessionResult<(Self, Vec<u8>)> {
        let target = target.as_ref();
        let sentinel = sentinel_path_of(target)?;

        let conflict = || SessionError::Conflict {
            target: target.to_path_buf(),
            sentinel: sentinel.clone(),
        };

        match fs::symlink_metadata(&sentinel) {
            Ok(_) => {
                crate::warn!(sentinel = %sentinel.display(), "session conflict");
                return Err(conflict());
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => return Err(SessionError::io(&sentinel, e)),
        }

        let contents = fs::read(target).map_err(|e| SessionError::io(target, e))?;

        match OpenOptions::new().write(true).create_new(true).open(&sentinel) {
            Ok(_) => {}
            Err(e) if e.kind() == io::ErrorKind::AlreadyExists => {
                crate::warn!(sentinel = %sentinel.display(), "session conflict on create");
                return Err(conflict());
            }
            Err(e) => return Err(SessionError::io(&sentinel, e)),
        }

        crate::info!(
            target = %target.display(),
            bytes = contents.len(),
            "session acquired"
        );
        Ok((
            Self {
                target: target.to_path_buf(),
                sentinel,
                held: true,
            },
            contents,
        ))
    }

    /// The file being edited.
    #[must_use]
    pub fn target(&self) -> &Path {
        &self.target
    }

    /// The sentinel file guarding [`Self::target`].
    #[must_use]
    pub fn sentinel(&self) -> &Path {
        &self.sentinel
    }

    /// Whether this handle still owns the sentinel.
    #[must_use]
    pub const fn is_held(&self) -> bool {
        self.held
    }

    /// Replace the target's contents with `bytes`.
    ///
    /// The bytes go to a sibling file (see [`save_path_of`]) which is synced
    /// and then renamed over the target, so a failed save leaves the target
    /// as it was. The target's permissions carry over when they can be read.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Io`] if the file cannot be written.
    pub fn save(&self, bytes: &[u8]) -> SessionResult<()> {
        let tmp_path = save_path_of(&self.target)?;
        let write = || -> io::Result<()> {
            {
                let file = fs::File::create(&tmp_path)?;
                let mut writer = BufWriter::new(file);
                writer.write_all(bytes)?;
                writer.flush()?;
                writer.get_ref().sync_all()?;
            }
            if let Ok(meta) = fs::metadata(&self.target) {
                let _ = fs::set_permissions(&tmp_path, meta.permissions());
            }
            fs::rename(&tmp_path, &self.target)
        };
        if let Err(e) = write() {
            let _ = fs::remove_file(&tmp_path);
            return Err(SessionError::io(&self.target, e));
        }
        crate::info!(
            target = %self.target.display(),
            bytes = bytes.len(),
            "saved"
        );
        Ok(())
    }

    /// End the session by deleting the sentinel.
    ///
    /// Not idempotent: a sentinel that has already disappeared is reported
    /// as an error.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Io`] if the sentinel cannot be deleted.
    pub fn release(mut self) -> SessionResult<()> {
        self.held = false;
        fs::remove_file(&self.sentinel).map_err(|e| SessionError::io(&self.sentinel, e))?;
        crate::info!(target = %self.target.display(), "session released");
        Ok(())
    }
}

impl Drop for SessionHandle {
    fn drop(&mut self) {
        if !self.held {
            return;
        }
        self.held = false;
        match fs::remove_file(&self.sentinel) {
            Ok(()) => {
                crate::warn!(sentinel = %self.sentinel.display(), "session dropped without release");
            }
            Err(_e) => {
                crate::error!(
                    sentinel = %self.sentinel.display(),
                    error = %_e,
                    "failed to remove sentinel on drop"
                );
            }
        }
    }
}
