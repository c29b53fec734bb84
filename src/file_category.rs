//! Extension-based file categorization.
//!
//! This module maps a file name's extension to one of a fixed set of
//! categories (e.g., "Images", "Documents"). Classification only looks at the
//! name; file contents are never read.
//!
//! # Examples
//!
//! ```
//! use dltidy::file_category::{Category, classify};
//!
//! assert_eq!(classify("photo.JPG"), Category::Images);
//! assert_eq!(classify("notes.txt"), Category::Documents);
//! assert_eq!(classify("archive.unknownext"), Category::Others);
//! ```

use std::fmt;
use std::path::Path;

/// A classification outcome.
///
/// Every variant except [`Category::Others`] corresponds to one row of the
/// [`CategoryTable`]; `Others` is the fallback for unmatched names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    /// Raster and vector images (JPG, PNG, SVG, etc.)
    Images,
    /// Text and word-processor documents (PDF, DOCX, TXT, etc.)
    Documents,
    /// Spreadsheets (XLSX, CSV, ODS, etc.)
    Spreadsheets,
    /// Slide decks (PPTX, ODP, KEY, etc.)
    Presentations,
    /// Video files (MP4, MKV, MOV, etc.)
    Videos,
    /// Audio files (MP3, FLAC, WAV, etc.)
    Audios,
    /// Compressed archives (ZIP, RAR, 7Z, etc.)
    Archives,
    /// Installers and executables (EXE, MSI, DEB, etc.)
    Executables,
    /// Source code (PY, JS, HTML, etc.)
    Code,
    /// Anything the table does not recognize, including files without an extension.
    Others,
}

impl Category {
    /// Every category, fallback last.
    pub const ALL: [Category; 10] = [
        Category::Images,
        Category::Documents,
        Category::Spreadsheets,
        Category::Presentations,
        Category::Videos,
        Category::Audios,
        Category::Archives,
        Category::Executables,
        Category::Code,
        Category::Others,
    ];

    /// Returns the label of this category, which is also its folder name.
    ///
    /// # Examples
    ///
    /// ```
    /// use dltidy::file_category::Category;
    ///
    /// assert_eq!(Category::Images.label(), "Images");
    /// assert_eq!(Category::Others.label(), "Others");
    /// ```
    pub fn label(&self) -> &'static str {
        match self {
            Category::Images => "Images",
            Category::Documents => "Documents",
            Category::Spreadsheets => "Spreadsheets",
            Category::Presentations => "Presentations",
            Category::Videos => "Videos",
            Category::Audios => "Audios",
            Category::Archives => "Archives",
            Category::Executables => "Executables",
            Category::Code => "Code",
            Category::Others => "Others",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One table row: a category and the extensions (lowercase, dot included) it claims.
pub type CategoryEntry = (Category, &'static [&'static str]);

const STANDARD_ENTRIES: &[CategoryEntry] = &[
    (
        Category::Images,
        &[".jpg", ".jpeg", ".png", ".gif", ".bmp", ".svg", ".webp", ".tiff"],
    ),
    (
        Category::Documents,
        &[".pdf", ".doc", ".docx", ".txt", ".rtf", ".odt", ".pages"],
    ),
    (Category::Spreadsheets, &[".xls", ".xlsx", ".csv", ".ods"]),
    (Category::Presentations, &[".ppt", ".pptx", ".odp", ".key"]),
    (
        Category::Videos,
        &[".mp4", ".avi", ".mkv", ".mov", ".wmv", ".flv", ".webm", ".m4v"],
    ),
    (
        Category::Audios,
        &[".mp3", ".wav", ".flac", ".aac", ".ogg", ".wma", ".m4a"],
    ),
    (
        Category::Archives,
        &[".zip", ".rar", ".7z", ".tar", ".gz", ".bz2"],
    ),
    (
        Category::Executables,
        &[".exe", ".msi", ".deb", ".rpm", ".dmg", ".pkg"],
    ),
    (
        Category::Code,
        &[".py", ".js", ".html", ".css", ".cpp", ".java", ".php", ".rb"],
    ),
];

/// An ordered, immutable mapping from category to extensions.
///
/// Lookup is a linear scan in declaration order and the first row containing
/// the extension wins. Duplicate extensions across rows are not rejected.
#[derive(Debug, Clone, Copy)]
pub struct CategoryTable {
    entries: &'static [CategoryEntry],
}

impl CategoryTable {
    /// Creates a table over the given rows, preserving their order.
    pub const fn new(entries: &'static [CategoryEntry]) -> Self {
        Self { entries }
    }

    /// The built-in table used by the organizer.
    pub const fn standard() -> Self {
        Self::new(STANDARD_ENTRIES)
    }

    /// Categories in table order, without the fallback.
    pub fn categories(&self) -> impl Iterator<Item = Category> + '_ {
        self.entries.iter().map(|(category, _)| *category)
    }

    /// Every category a run can produce: the table rows followed by the fallback.
    pub fn destinations(&self) -> Vec<Category> {
        let mut categories: Vec<Category> = Vec::with_capacity(self.entries.len() + 1);
        for category in self.categories().chain(std::iter::once(Category::Others)) {
            if !categories.contains(&category) {
                categories.push(category);
            }
        }
        categories
    }

    /// Maps an extension such as `".JPG"` to its category, if any row claims it.
    pub fn category_for_extension(&self, extension: &str) -> Option<Category> {
        let extension = extension.to_lowercase();
        self.entries
            .iter()
            .find(|(_, extensions)| extensions.iter().any(|known| *known == extension))
            .map(|(category, _)| *category)
    }

    /// Classifies a file name or path by its extension.
    ///
    /// Names without an extension, and extensions no row claims, classify as
    /// [`Category::Others`].
    pub fn classify(&self, file_name: impl AsRef<Path>) -> Category {
        extension_key(file_name.as_ref())
            .and_then(|ext| self.category_for_extension(&ext))
            .unwrap_or(Category::Others)
    }
}

impl Default for CategoryTable {
    fn default() -> Self {
        Self::standard()
    }
}

/// Returns the lowercased extension of `path` with its leading dot, e.g. `".jpg"`.
///
/// Dotfiles such as `.bashrc` have no extension.
pub fn extension_key(path: &Path) -> Option<String> {
    path.extension()
        .map(|ext| format!(".{}", ext.to_string_lossy().to_lowercase()))
}

/// Classifies a file name or path against the standard table.
pub fn classify(file_name: impl AsRef<Path>) -> Category {
    CategoryTable::standard().classify(file_name)
}
