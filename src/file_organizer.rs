//! Conflict-safe file moves into category folders.
//!
//! A file is moved to `<destination>/<file name>`. When that path is already
//! taken, a single alternative `<stem>_<YYYYMMDD_HHMMSS><.ext>` is derived from
//! the injected [`Clock`]. The alternative is not re-checked: two same-named
//! files landing in one folder within the same second race on the underlying
//! rename, which may fail or overwrite depending on the platform.

use chrono::{Local, NaiveDateTime};
use std::ffi::OsString;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info, warn};

/// `chrono` format of the collision suffix, e.g. `20240305_140709`.
pub const COLLISION_TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";

/// Source of the local time used for collision suffixes.
pub trait Clock {
    /// Current local wall-clock time.
    fn now(&self) -> NaiveDateTime;
}

/// Reads the system's local time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        Local::now().naive_local()
    }
}

/// Always returns the same instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub NaiveDateTime);

impl Clock for FixedClock {
    fn now(&self) -> NaiveDateTime {
        self.0
    }
}

/// Errors that can occur while moving a single file.
#[derive(Debug, Error)]
pub enum OrganizeError {
    /// Failed to create a category directory.
    #[error("Failed to create directory {}: {source}", .path.display())]
    DirectoryCreationFailed { path: PathBuf, source: io::Error },

    /// The source file vanished or never existed.
    #[error("Source file not found: {}", .0.display())]
    SourceNotFound(PathBuf),

    /// The source path ends in `..` or is a root.
    #[error("{} has no file name component", .0.display())]
    MissingFileName(PathBuf),

    /// The underlying rename (or copy fallback) failed.
    #[error("Failed to move {} to {}: {source}", .from.display(), .to.display())]
    FileMoveFailure {
        from: PathBuf,
        to: PathBuf,
        source: io::Error,
    },
}

/// Result type for file organization operations.
pub type OrganizeResult<T> = Result<T, OrganizeError>;

/// The result of one move attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MoveOutcome {
    /// The file now lives at this path.
    Moved(PathBuf),
    /// Nothing was moved; the message describes why.
    Failed(String),
}

impl MoveOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, MoveOutcome::Moved(_))
    }

    /// Final path of a successful move.
    pub fn destination(&self) -> Option<&Path> {
        match self {
            MoveOutcome::Moved(path) => Some(path),
            MoveOutcome::Failed(_) => None,
        }
    }
}

/// Moves files into destination folders without clobbering existing entries.
#[derive(Debug, Clone, Default)]
pub struct FileOrganizer<C = SystemClock> {
    clock: C,
}

impl FileOrganizer<SystemClock> {
    /// Creates an organizer that stamps collisions with the local system time.
    pub fn new() -> Self {
        Self { clock: SystemClock }
    }
}

impl<C: Clock> FileOrganizer<C> {
    /// Creates an organizer that reads collision timestamps from `clock`.
    pub fn with_clock(clock: C) -> Self {
        Self { clock }
    }

    /// Moves `source_file` into `destination_folder`.
    ///
    /// The folder must already exist. Every failure is reported through
    /// [`MoveOutcome::Failed`]; this never panics or returns an error.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use dltidy::file_organizer::{FileOrganizer, MoveOutcome};
    /// use std::path::Path;
    ///
    /// let organizer = FileOrganizer::new();
    /// match organizer.move_file(
    ///     Path::new("/home/user/Downloads/photo.jpg"),
    ///     Path::new("/home/user/Downloads/Organized/Images"),
    /// ) {
    ///     MoveOutcome::Moved(path) => println!("Moved to {}", path.display()),
    ///     MoveOutcome::Failed(reason) => eprintln!("Move failed: {}", reason),
    /// }
    /// ```
    pub fn move_file(&self, source_file: &Path, destination_folder: &Path) -> MoveOutcome {
        match self.try_move_file(source_file, destination_folder) {
            Ok(destination) => MoveOutcome::Moved(destination),
            Err(e) => {
                warn!(source = %source_file.display(), error = %e, "move failed");
                MoveOutcome::Failed(e.to_string())
            }
        }
    }

    fn try_move_file(&self, source_file: &Path, destination_folder: &Path) -> OrganizeResult<PathBuf> {
        if fs::symlink_metadata(source_file).is_err() {
            return Err(OrganizeError::SourceNotFound(source_file.to_path_buf()));
        }

        let destination = self.resolve_destination(source_file, destination_folder)?;
        relocate(source_file, &destination)?;

        debug!(
            source = %source_file.display(),
            destination = %destination.display(),
            "moved file"
        );
        Ok(destination)
    }

    /// Chooses where `source_file` will land inside `destination_folder`.
    ///
    /// Returns `<folder>/<name>` when free, otherwise a single timestamped
    /// alternative. The alternative is not checked for existence.
    pub fn resolve_destination(
        &self,
        source_file: &Path,
        destination_folder: &Path,
    ) -> OrganizeResult<PathBuf> {
        let file_name = source_file
            .file_name()
            .ok_or_else(|| OrganizeError::MissingFileName(source_file.to_path_buf()))?;

        let candidate = destination_folder.join(file_name);
        if !entry_exists(&candidate) {
            return Ok(candidate);
        }

        let timestamp = self.clock.now().format(COLLISION_TIMESTAMP_FORMAT).to_string();
        let name = Path::new(file_name);
        let mut renamed = OsString::from(name.file_stem().unwrap_or(file_name));
        renamed.push("_");
        renamed.push(&timestamp);
        if let Some(ext) = name.extension() {
            renamed.push(".");
            renamed.push(ext);
        }

        let resolved = destination_folder.join(renamed);
        info!(
            existing = %candidate.display(),
            renamed = %resolved.display(),
            "name collision, using timestamped name"
        );
        Ok(resolved)
    }
}

/// True when anything, including a dangling symlink, occupies `path`.
fn entry_exists(path: &Path) -> bool {
    fs::symlink_metadata(path).is_ok()
}

/// Renames `from` to `to`, copying across filesystems when rename cannot.
fn relocate(from: &Path, to: &Path) -> OrganizeResult<()> {
    let move_failure = |source: io::Error| OrganizeError::FileMoveFailure {
        from: from.to_path_buf(),
        to: to.to_path_buf(),
        source,
    };

    match fs::rename(from, to) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == io::ErrorKind::CrossesDevices => {
            warn!(source = %from.display(), "cross-device move, copying instead");
            copy_then_remove(from, to)
        }
        Err(e) => Err(move_failure(e)),
    }
}

/// Copies `from` to `to`, then deletes `from`.
///
/// On failure the file is left only at `from`. A `to` that existed before the
/// call is not deleted when the copy itself fails.
fn copy_then_remove(from: &Path, to: &Path) -> OrganizeResult<()> {
    let move_failure = |source: io::Error| OrganizeError::FileMoveFailure {
        from: from.to_path_buf(),
        to: to.to_path_buf(),
        source,
    };

    let target_was_free = !entry_exists(to);
    if let Err(e) = fs::copy(from, to) {
        if target_was_free {
            let _ = fs::remove_file(to);
        }
        return Err(move_failure(e));
    }

    // Never leave the file in both places.
    if let Err(e) = fs::remove_file(from) {
        let _ = fs::remove_file(to);
        return Err(move_failure(e));
    }
    Ok(())
}
