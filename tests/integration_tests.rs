use dltidy::cli::{OrganizeCommand, OrganizeReport, Organizer, RunOutcome, run_cli};
use dltidy::file_category::Category;
use dltidy::file_organizer::FixedClock;
/// Integration tests for dltidy
///
/// These tests run complete organization passes over temporary directories.
///
/// Test categories:
/// 1. Basic organization workflows
/// 2. Name collisions
/// 3. Terminal no-op outcomes
/// 4. Repeated runs
/// 5. Filtering and dry runs
use chrono::NaiveDate;
use regex::Regex;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

// ============================================================================
// Test Utilities
// ============================================================================

/// A temporary source directory with helpers for building and checking layouts.
struct TestFixture {
    temp_dir: TempDir,
}

impl TestFixture {
    fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        TestFixture { temp_dir }
    }

    fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    fn create_text_file(&self, rel_path: &str, content: &str) {
        let file_path = self.path().join(rel_path);
        if let Some(parent) = file_path.parent() {
            fs::create_dir_all(parent).expect("Failed to create parent directory");
        }
        fs::write(&file_path, content).expect("Failed to write file");
    }

    fn read(&self, rel_path: &str) -> String {
        fs::read_to_string(self.path().join(rel_path)).expect("Failed to read file")
    }

    fn assert_dir_exists(&self, rel_path: &str) {
        let path = self.path().join(rel_path);
        assert!(path.is_dir(), "Directory should exist: {}", path.display());
    }

    fn assert_file_exists(&self, rel_path: &str) {
        let path = self.path().join(rel_path);
        assert!(path.is_file(), "File should exist: {}", path.display());
    }

    fn assert_file_not_exists(&self, rel_path: &str) {
        let path = self.path().join(rel_path);
        assert!(!path.exists(), "File should not exist: {}", path.display());
    }

    /// File names inside `Organized/<label>`, sorted.
    fn files_in_category(&self, label: &str) -> Vec<String> {
        let mut names: Vec<String> = fs::read_dir(self.path().join("Organized").join(label))
            .expect("Failed to read category folder")
            .flatten()
            .map(|e| e.file_name().to_string_lossy().to_string())
            .collect();
        names.sort();
        names
    }

    fn organizer(&self) -> Organizer {
        Organizer::new(self.path())
    }
}

fn fixed_clock() -> FixedClock {
    FixedClock(
        NaiveDate::from_ymd_opt(2024, 11, 30)
            .and_then(|d| d.and_hms_opt(23, 59, 1))
            .expect("valid timestamp"),
    )
}

fn completed(outcome: RunOutcome) -> OrganizeReport {
    match outcome {
        RunOutcome::Completed(report) => report,
        other => panic!("expected a completed run, got {:?}", other),
    }
}

// ============================================================================
// Test Suite 1: Basic Organization
// ============================================================================

#[test]
fn test_organize_single_document() {
    let fixture = TestFixture::new();
    fixture.create_text_file("notes.txt", "remember the milk");

    let report = completed(fixture.organizer().run(OrganizeCommand::Organize).unwrap());

    fixture.assert_file_not_exists("notes.txt");
    assert_eq!(fixture.read("Organized/Documents/notes.txt"), "remember the milk");
    assert_eq!(report.succeeded, 1);
    assert_eq!(report.failed, 0);
}

#[test]
fn test_all_category_folders_created_up_front() {
    let fixture = TestFixture::new();
    fixture.create_text_file("only.pdf", "pdf");

    fixture.organizer().run(OrganizeCommand::Organize).unwrap();

    for label in [
        "Images",
        "Documents",
        "Spreadsheets",
        "Presentations",
        "Videos",
        "Audios",
        "Archives",
        "Executables",
        "Code",
        "Others",
    ] {
        fixture.assert_dir_exists(&format!("Organized/{}", label));
    }
}

#[test]
fn test_organize_mixed_file_types() {
    let fixture = TestFixture::new();
    let files = [
        ("holiday.jpeg", "Images"),
        ("budget.xlsx", "Spreadsheets"),
        ("pitch.key", "Presentations"),
        ("clip.MKV", "Videos"),
        ("track.m4a", "Audios"),
        ("source.7z", "Archives"),
        ("installer.msi", "Executables"),
        ("script.rb", "Code"),
        ("README", "Others"),
    ];
    for (name, _) in &files {
        fixture.create_text_file(name, name);
    }

    let report = completed(fixture.organizer().run(OrganizeCommand::Organize).unwrap());

    for (name, label) in &files {
        fixture.assert_file_not_exists(name);
        assert_eq!(fixture.read(&format!("Organized/{}/{}", label, name)), *name);
    }
    assert_eq!(report.processed, files.len());
    assert_eq!(report.succeeded, files.len());
    assert_eq!(report.per_category.len(), files.len());
}

#[test]
fn test_per_category_tally_is_alphabetical() {
    let fixture = TestFixture::new();
    fixture.create_text_file("z.zip", "z");
    fixture.create_text_file("a.mp3", "a");
    fixture.create_text_file("c.css", "c");
    fixture.create_text_file("d.css", "d");

    let report = completed(fixture.organizer().run(OrganizeCommand::Organize).unwrap());

    let tally: Vec<(&str, usize)> = report
        .per_category
        .iter()
        .map(|(label, count)| (label.as_str(), *count))
        .collect();
    assert_eq!(tally, vec![("Archives", 1), ("Audios", 1), ("Code", 2)]);
}

// ============================================================================
// Test Suite 2: Name Collisions
// ============================================================================

#[test]
fn test_end_to_end_scenario_with_collision() {
    let fixture = TestFixture::new();
    fixture.create_text_file("photo.JPG", "new photo");
    fixture.create_text_file("notes.txt", "notes");
    fixture.create_text_file("archive.unknownext", "???");
    fixture.create_text_file("Organized/Images/photo.JPG", "old photo");

    let organizer = fixture.organizer().with_clock(fixed_clock());
    let report = completed(organizer.run(OrganizeCommand::Organize).unwrap());

    assert_eq!(fixture.read("Organized/Images/photo_20241130_235901.JPG"), "new photo");
    assert_eq!(fixture.read("Organized/Images/photo.JPG"), "old photo");
    assert_eq!(fixture.read("Organized/Documents/notes.txt"), "notes");
    assert_eq!(fixture.read("Organized/Others/archive.unknownext"), "???");

    assert_eq!(report.succeeded, 3);
    assert_eq!(report.failed, 0);
    assert_eq!(report.count_for(Category::Images), 1);
    assert_eq!(report.count_for(Category::Documents), 1);
    assert_eq!(report.count_for(Category::Others), 1);
    assert_eq!(report.per_category.len(), 3);
}

#[test]
fn test_collision_with_system_clock_matches_timestamp_pattern() {
    let fixture = TestFixture::new();
    fixture.create_text_file("data.csv", "fresh");
    fixture.create_text_file("Organized/Spreadsheets/data.csv", "stale");

    completed(fixture.organizer().run(OrganizeCommand::Organize).unwrap());

    let names = fixture.files_in_category("Spreadsheets");
    assert_eq!(names.len(), 2, "both files must survive: {:?}", names);
    assert!(names.contains(&"data.csv".to_string()));
    let pattern = Regex::new(r"^data_\d{8}_\d{6}\.csv$").unwrap();
    let renamed = names
        .iter()
        .find(|name| pattern.is_match(name))
        .expect("renamed file should match stem_YYYYMMDD_HHMMSS.ext");
    assert_eq!(fixture.read(&format!("Organized/Spreadsheets/{}", renamed)), "fresh");
    assert_eq!(fixture.read("Organized/Spreadsheets/data.csv"), "stale");
}

// ============================================================================
// Test Suite 3: Terminal No-op Outcomes
// ============================================================================

#[test]
fn test_missing_source_creates_nothing() {
    let fixture = TestFixture::new();
    let missing = fixture.path().join("Downloads");

    let outcome = Organizer::new(&missing)
        .run(OrganizeCommand::Organize)
        .unwrap();

    assert_eq!(outcome, RunOutcome::SourceMissing(missing.clone()));
    assert!(!missing.exists());
}

#[test]
fn test_empty_directory_reports_no_files() {
    let fixture = TestFixture::new();

    let outcome = fixture.organizer().run(OrganizeCommand::Organize).unwrap();

    assert_eq!(outcome, RunOutcome::NoFilesFound(fixture.path().to_path_buf()));
}

#[test]
fn test_only_metadata_files_reports_no_files() {
    let fixture = TestFixture::new();
    fixture.create_text_file("desktop.ini", "[.ShellClassInfo]");
    fixture.create_text_file(".DS_Store", "");

    let outcome = fixture.organizer().run(OrganizeCommand::Organize).unwrap();

    assert!(matches!(outcome, RunOutcome::NoFilesFound(_)));
    fixture.assert_file_exists("desktop.ini");
    fixture.assert_file_exists(".DS_Store");
}

// ============================================================================
// Test Suite 4: Repeated Runs
// ============================================================================

#[test]
fn test_second_run_with_leftover_file() {
    let fixture = TestFixture::new();
    fixture.create_text_file("first.png", "1");
    completed(fixture.organizer().run(OrganizeCommand::Organize).unwrap());

    fixture.create_text_file("second.png", "2");
    let report = completed(fixture.organizer().run(OrganizeCommand::Organize).unwrap());

    assert_eq!(report.processed, 1);
    assert_eq!(report.succeeded, 1);
    assert_eq!(
        fixture.files_in_category("Images"),
        vec!["first.png".to_string(), "second.png".to_string()]
    );
}

#[test]
fn test_subdirectories_are_left_alone() {
    let fixture = TestFixture::new();
    fixture.create_text_file("projects/app.py", "print()");
    fixture.create_text_file("top.py", "print()");

    let report = completed(fixture.organizer().run(OrganizeCommand::Organize).unwrap());

    assert_eq!(report.processed, 1);
    fixture.assert_file_exists("projects/app.py");
    fixture.assert_file_exists("Organized/Code/top.py");
}

#[cfg(unix)]
#[test]
fn test_move_failure_does_not_stop_the_run() {
    use std::os::unix::fs::PermissionsExt;

    let fixture = TestFixture::new();
    fixture.create_text_file("a.mp4", "video");
    fixture.create_text_file("b.txt", "text");
    let organizer = fixture.organizer();
    organizer.ensure_category_folders().unwrap();

    let videos = organizer.category_folder(Category::Videos);
    fs::set_permissions(&videos, fs::Permissions::from_mode(0o555)).unwrap();
    // Root ignores directory permissions.
    let canary = videos.join("canary");
    if fs::write(&canary, "").is_ok() {
        fs::remove_file(&canary).ok();
        fs::set_permissions(&videos, fs::Permissions::from_mode(0o755)).unwrap();
        return;
    }

    let report = completed(organizer.run(OrganizeCommand::Organize).unwrap());
    fs::set_permissions(&videos, fs::Permissions::from_mode(0o755)).unwrap();

    assert_eq!(report.processed, 2);
    assert_eq!(report.failed, 1);
    assert_eq!(report.succeeded, 1);
    assert_eq!(report.failures[0].file, fixture.path().join("a.mp4"));
    fixture.assert_file_exists("a.mp4");
    fixture.assert_file_exists("Organized/Documents/b.txt");
}

// ============================================================================
// Test Suite 5: Filtering and Dry Runs
// ============================================================================

#[test]
fn test_dry_run_moves_nothing() {
    let fixture = TestFixture::new();
    fixture.create_text_file("movie.avi", "m");
    fixture.create_text_file("paper.pdf", "p");

    let outcome = fixture.organizer().run(OrganizeCommand::DryRun).unwrap();

    let report = match outcome {
        RunOutcome::Planned(report) => report,
        other => panic!("expected a planned run, got {:?}", other),
    };
    assert_eq!(report.processed, 2);
    assert_eq!(report.count_for(Category::Videos), 1);
    assert_eq!(report.count_for(Category::Documents), 1);
    fixture.assert_file_exists("movie.avi");
    fixture.assert_file_exists("paper.pdf");
    fixture.assert_file_not_exists("Organized");
}

#[test]
fn test_run_cli_applies_config_exclusions() {
    let fixture = TestFixture::new();
    let config_dir = TempDir::new().unwrap();
    let config_path: PathBuf = config_dir.path().join("config.toml");
    fs::write(
        &config_path,
        "[filters.exclude]\nextensions = [\"crdownload\"]\npatterns = [\"*.part\"]\n",
    )
    .unwrap();
    fixture.create_text_file("big.iso.crdownload", "partial");
    fixture.create_text_file("movie.mp4.part", "partial");
    fixture.create_text_file("done.zip", "zip");

    let report = completed(
        run_cli(
            OrganizeCommand::Organize,
            Some(fixture.path()),
            Some(&config_path),
        )
        .unwrap(),
    );

    assert_eq!(report.processed, 1);
    fixture.assert_file_exists("big.iso.crdownload");
    fixture.assert_file_exists("movie.mp4.part");
    fixture.assert_file_exists("Organized/Archives/done.zip");
}

#[test]
fn test_run_cli_rejects_invalid_config() {
    let fixture = TestFixture::new();
    let config_dir = TempDir::new().unwrap();
    let config_path = config_dir.path().join("config.toml");
    fs::write(&config_path, "[filters.exclude]\nregex = [\"(unclosed\"]\n").unwrap();
    fixture.create_text_file("keep.txt", "k");

    let result = run_cli(
        OrganizeCommand::Organize,
        Some(fixture.path()),
        Some(&config_path),
    );

    assert!(result.is_err());
    fixture.assert_file_exists("keep.txt");
}

#[test]
fn test_config_file_inside_source_stays_put() {
    let fixture = TestFixture::new();
    fixture.create_text_file(".dltidyrc.toml", "[filters.exclude]\nextensions = [\"tmp\"]\n");
    fixture.create_text_file("scratch.tmp", "t");
    fixture.create_text_file("photo.png", "p");
    let config_path = fixture.path().join(".dltidyrc.toml");

    for _ in 0..2 {
        run_cli(
            OrganizeCommand::Organize,
            Some(fixture.path()),
            Some(&config_path),
        )
        .unwrap();
    }

    fixture.assert_file_exists(".dltidyrc.toml");
    fixture.assert_file_exists("scratch.tmp");
    fixture.assert_file_exists("Organized/Images/photo.png");
    assert!(fixture.files_in_category("Others").is_empty());
}

#[test]
fn test_custom_filenames_keep_metadata_exclusions() {
    let fixture = TestFixture::new();
    let config_dir = TempDir::new().unwrap();
    let config_path = config_dir.path().join("config.toml");
    fs::write(&config_path, "[filters.exclude]\nfilenames = [\"keep.me\"]\n").unwrap();
    fixture.create_text_file("keep.me", "k");
    fixture.create_text_file("desktop.ini", "[.ShellClassInfo]");
    fixture.create_text_file("Thumbs.db", "");
    fixture.create_text_file("tune.flac", "f");

    let report = completed(
        run_cli(
            OrganizeCommand::Organize,
            Some(fixture.path()),
            Some(&config_path),
        )
        .unwrap(),
    );

    assert_eq!(report.processed, 1);
    fixture.assert_file_exists("keep.me");
    fixture.assert_file_exists("desktop.ini");
    fixture.assert_file_exists("Thumbs.db");
    fixture.assert_file_exists("Organized/Audios/tune.flac");
}

#[test]
fn test_missing_source_reported_before_config_is_read() {
    let fixture = TestFixture::new();
    let missing = fixture.path().join("Downloads");
    let config_path = fixture.path().join("config.toml");
    fs::write(&config_path, "[filters.exclude]\nregex = [\"(unclosed\"]\n").unwrap();

    let outcome = run_cli(OrganizeCommand::Organize, Some(&missing), Some(&config_path)).unwrap();

    assert_eq!(outcome, RunOutcome::SourceMissing(missing.clone()));
    assert!(!missing.exists());
}
