//! Organization run orchestration.
//!
//! This module ties the pieces together:
//! - Resolving the source directory (the user's downloads folder by default)
//! - Creating `Organized/<Category>/` folders
//! - Listing and filtering eligible files
//! - Classifying and moving each file, tallying the outcome
//! - Printing the per-file lines and the final report
//!
//! Processing is sequential, in file-name order. A failed move is counted
//! and the run continues with the next file.

use crate::config::{CompiledFilters, ConfigError, FilterConfig};
use crate::file_category::{Category, CategoryTable};
use crate::file_organizer::{Clock, FileOrganizer, MoveOutcome, OrganizeError, SystemClock};
use crate::output::OutputFormatter;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info, warn};

/// Folder created inside the source directory to hold the category folders.
pub const ORGANIZED_DIR: &str = "Organized";

/// What a run should do with the files it finds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrganizeCommand {
    /// Create folders and move files.
    Organize,
    /// Classify and report only; nothing on disk changes.
    DryRun,
}

/// Failures that abort a run before or between files.
#[derive(Debug, Error)]
pub enum RunError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Organize(#[from] OrganizeError),

    #[error("Error reading directory {}: {source}", .path.display())]
    ReadDir {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Could not determine the downloads directory; pass one explicitly")]
    NoDownloadsDir,
}

/// A file that could not be moved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoveFailure {
    pub file: PathBuf,
    pub reason: String,
}

/// Counts accumulated over one run.
///
/// `per_category` is keyed by category label, so iteration is alphabetical.
/// In a real run it counts successful moves; in a dry run, planned moves.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OrganizeReport {
    pub processed: usize,
    pub succeeded: usize,
    pub failed: usize,
    pub per_category: BTreeMap<String, usize>,
    pub failures: Vec<MoveFailure>,
}

impl OrganizeReport {
    fn record(&mut self, file: &Path, category: Category, outcome: &MoveOutcome) {
        self.processed += 1;
        match outcome {
            MoveOutcome::Moved(_) => {
                self.succeeded += 1;
                self.tally(category);
            }
            MoveOutcome::Failed(reason) => {
                self.failed += 1;
                self.failures.push(MoveFailure {
                    file: file.to_path_buf(),
                    reason: reason.clone(),
                });
            }
        }
    }

    fn tally(&mut self, category: Category) {
        *self
            .per_category
            .entry(category.label().to_string())
            .or_insert(0) += 1;
    }

    /// Number of files counted under `category`.
    pub fn count_for(&self, category: Category) -> usize {
        self.per_category
            .get(category.label())
            .copied()
            .unwrap_or(0)
    }
}

/// How a run ended. None of these are errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    /// The source directory does not exist; nothing was touched.
    SourceMissing(PathBuf),
    /// The source directory has no eligible files.
    NoFilesFound(PathBuf),
    /// Files were processed.
    Completed(OrganizeReport),
    /// Dry run: files were classified but not moved.
    Planned(OrganizeReport),
}

/// The user's downloads directory, or `~/Downloads` when the platform has none.
pub fn default_source_dir() -> Option<PathBuf> {
    dirs::download_dir().or_else(|| dirs::home_dir().map(|home| home.join("Downloads")))
}

/// Sorts the files of one directory into category folders.
pub struct Organizer<C = SystemClock> {
    source_dir: PathBuf,
    table: CategoryTable,
    filters: CompiledFilters,
    mover: FileOrganizer<C>,
}

impl Organizer<SystemClock> {
    /// Creates an organizer for `source_dir` with the standard table and default filters.
    pub fn new(source_dir: impl Into<PathBuf>) -> Self {
        Self {
            source_dir: source_dir.into(),
            table: CategoryTable::standard(),
            filters: CompiledFilters::default(),
            mover: FileOrganizer::new(),
        }
    }
}

impl<C: Clock> Organizer<C> {
    /// Replaces the clock used for collision timestamps.
    pub fn with_clock<D: Clock>(self, clock: D) -> Organizer<D> {
        Organizer {
            source_dir: self.source_dir,
            table: self.table,
            filters: self.filters,
            mover: FileOrganizer::with_clock(clock),
        }
    }

    /// Replaces the file filters.
    pub fn with_filters(mut self, filters: CompiledFilters) -> Self {
        self.filters = filters;
        self
    }

    /// `<source>/Organized`.
    pub fn organized_root(&self) -> PathBuf {
        self.source_dir.join(ORGANIZED_DIR)
    }

    /// `<source>/Organized/<Label>`.
    pub fn category_folder(&self, category: Category) -> PathBuf {
        self.organized_root().join(category.label())
    }

    /// Creates one folder per category, fallback included. Safe to repeat.
    pub fn ensure_category_folders(&self) -> Result<PathBuf, RunError> {
        for category in self.table.destinations() {
            let folder = self.category_folder(category);
            fs::create_dir_all(&folder).map_err(|source| {
                OrganizeError::DirectoryCreationFailed {
                    path: folder.clone(),
                    source,
                }
            })?;
        }
        debug!(root = %self.organized_root().display(), "category folders ready");
        Ok(self.organized_root())
    }

    /// Regular files directly inside the source directory that pass the filters,
    /// sorted by name. Directories are skipped. Symlinks are not followed, so a
    /// link to a regular file is skipped too. Entries that cannot be read are
    /// logged and skipped.
    pub fn list_files(&self) -> Result<Vec<PathBuf>, RunError> {
        let entries = fs::read_dir(&self.source_dir).map_err(|source| RunError::ReadDir {
            path: self.source_dir.clone(),
            source,
        })?;

        let mut files: Vec<PathBuf> = Vec::new();
        for entry in entries {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    warn!(dir = %self.source_dir.display(), error = %e, "skipping unreadable entry");
                    continue;
                }
            };
            let path = entry.path();
            let file_type = match entry.file_type() {
                Ok(file_type) => file_type,
                Err(e) => {
                    warn!(file = %path.display(), error = %e, "skipping entry of unknown type");
                    continue;
                }
            };
            if !file_type.is_file() {
                debug!(entry = %path.display(), "not a regular file");
                continue;
            }
            if self.filters.should_include(&path) {
                files.push(path);
            } else {
                debug!(file = %path.display(), "excluded by filters");
            }
        }
        files.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
        Ok(files)
    }

    /// Runs one pass over the source directory.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use dltidy::cli::{OrganizeCommand, Organizer, RunOutcome};
    ///
    /// let organizer = Organizer::new("/home/user/Downloads");
    /// if let Ok(RunOutcome::Completed(report)) = organizer.run(OrganizeCommand::Organize) {
    ///     println!("{} moved, {} failed", report.succeeded, report.failed);
    /// }
    /// ```
    pub fn run(&self, command: OrganizeCommand) -> Result<RunOutcome, RunError> {
        if !self.source_dir.is_dir() {
            info!(path = %self.source_dir.display(), "source directory missing");
            OutputFormatter::source_missing(&self.source_dir);
            return Ok(RunOutcome::SourceMissing(self.source_dir.clone()));
        }

        match command {
            OrganizeCommand::Organize => self.organize(),
            OrganizeCommand::DryRun => self.plan(),
        }
    }

    fn organize(&self) -> Result<RunOutcome, RunError> {
        OutputFormatter::info(&format!(
            "Organizing contents of: {}",
            self.source_dir.display()
        ));
        self.ensure_category_folders()?;

        let files = self.list_files()?;
        if files.is_empty() {
            OutputFormatter::no_files_found(&self.source_dir);
            return Ok(RunOutcome::NoFilesFound(self.source_dir.clone()));
        }
        info!(count = files.len(), "organizing files");

        OutputFormatter::header("Files found and organizing:");
        let progress = OutputFormatter::create_progress_bar(files.len() as u64);
        let mut report = OrganizeReport::default();

        for file in &files {
            let name = display_name(file);
            let category = self.table.classify(file);
            progress.set_message(name.clone());
            progress.suspend(|| OutputFormatter::file_line(&name, category.label()));

            let outcome = self.mover.move_file(file, &self.category_folder(category));
            progress.suspend(|| match &outcome {
                MoveOutcome::Moved(destination) => OutputFormatter::success(&format!(
                    "  Moved to {}",
                    self.relative(destination).display()
                )),
                MoveOutcome::Failed(reason) => {
                    OutputFormatter::error(&format!("  Error: {}", reason))
                }
            });

            report.record(file, category, &outcome);
            progress.inc(1);
        }
        progress.finish_and_clear();

        OutputFormatter::summary_table(
            &report.per_category,
            report.processed,
            report.succeeded,
            report.failed,
        );
        if report.failed > 0 {
            OutputFormatter::warning("Some files could not be organized. Please review errors above.");
        }
        info!(
            succeeded = report.succeeded,
            failed = report.failed,
            "organization complete"
        );
        Ok(RunOutcome::Completed(report))
    }

    fn plan(&self) -> Result<RunOutcome, RunError> {
        OutputFormatter::dry_run_notice(&format!(
            "Analyzing contents of: {}",
            self.source_dir.display()
        ));

        let files = self.list_files()?;
        if files.is_empty() {
            OutputFormatter::no_files_found(&self.source_dir);
            return Ok(RunOutcome::NoFilesFound(self.source_dir.clone()));
        }

        OutputFormatter::header("Files would be organized as follows:");
        let mut report = OrganizeReport::default();
        for file in &files {
            let category = self.table.classify(file);
            OutputFormatter::file_line(&display_name(file), category.label());
            report.processed += 1;
            report.tally(category);
        }

        OutputFormatter::summary_table(&report.per_category, report.processed, 0, 0);
        OutputFormatter::dry_run_notice("No files were modified.");
        Ok(RunOutcome::Planned(report))
    }

    fn relative<'a>(&self, path: &'a Path) -> &'a Path {
        path.strip_prefix(&self.source_dir).unwrap_or(path)
    }
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| path.display().to_string())
}

/// Loads filters, then runs `command` against `dir_path`.
///
/// `dir_path` defaults to the user's downloads directory; `config_path`
/// follows [`FilterConfig::load`].
pub fn run_cli(
    command: OrganizeCommand,
    dir_path: Option<&Path>,
    config_path: Option<&Path>,
) -> Result<RunOutcome, RunError> {
    let source_dir = match dir_path {
        Some(path) => path.to_path_buf(),
        None => default_source_dir().ok_or(RunError::NoDownloadsDir)?,
    };
    // A missing source is reported before any configuration is read.
    if !source_dir.is_dir() {
        return Organizer::new(source_dir).run(command);
    }
    let filters = FilterConfig::load(config_path)?.compile()?;

    Organizer::new(source_dir).with_filters(filters).run(command)
}
