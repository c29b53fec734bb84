//! Output formatting and styling module.
//!
//! All user-facing console output goes through [`OutputFormatter`] so the
//! report layout stays in one place. Diagnostics use `tracing` instead.

use colored::*;
use indicatif::{ProgressBar, ProgressStyle};
use std::collections::BTreeMap;
use std::path::Path;

/// Manages all CLI output with consistent styling and formatting.
pub struct OutputFormatter;

impl OutputFormatter {
    /// Prints a success message in green with a checkmark.
    pub fn success(message: &str) {
        println!("{} {}", "✓".green(), message);
    }

    /// Prints an error message in red with an X mark.
    pub fn error(message: &str) {
        eprintln!("{} {}", "✗".red(), message);
    }

    /// Prints a warning message in yellow with a warning symbol.
    pub fn warning(message: &str) {
        println!("{} {}", "⚠".yellow(), message);
    }

    /// Prints an info message in cyan.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use dltidy::output::OutputFormatter;
    /// OutputFormatter::info("Organizing directory: /home/user/Downloads");
    /// ```
    pub fn info(message: &str) {
        println!("{}", message.cyan());
    }

    /// Prints a section header.
    pub fn header(header: &str) {
        println!("\n{}", header.bold());
    }

    /// Prints the per-file line: source name and resolved category.
    pub fn file_line(file_name: &str, category: &str) {
        println!(" - {} {} {}", file_name, "→".dimmed(), category.cyan());
    }

    /// Reports that the source directory does not exist.
    pub fn source_missing(path: &Path) {
        Self::warning(&format!(
            "Source directory does not exist: {}",
            path.display()
        ));
    }

    /// Reports that the source directory holds nothing to organize.
    pub fn no_files_found(path: &Path) {
        Self::info(&format!("No files found to organize in {}", path.display()));
    }

    /// Creates a progress bar for `total` files.
    ///
    /// Hidden automatically when stderr is not a terminal.
    pub fn create_progress_bar(total: u64) -> ProgressBar {
        let style = ProgressStyle::default_bar()
            .template("{spinner:.cyan} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("█▓░");
        let pb = ProgressBar::new(total);
        pb.set_style(style);
        pb
    }

    /// Prints the final report: move counts and a per-category table sorted by label.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use dltidy::output::OutputFormatter;
    /// use std::collections::BTreeMap;
    ///
    /// let mut counts = BTreeMap::new();
    /// counts.insert("Documents".to_string(), 15);
    /// counts.insert("Images".to_string(), 8);
    /// OutputFormatter::summary_table(&counts, 23, 23, 0);
    /// ```
    pub fn summary_table(
        category_counts: &BTreeMap<String, usize>,
        processed: usize,
        succeeded: usize,
        failed: usize,
    ) {
        Self::header("SUMMARY");
        println!("Processed: {}", processed);
        println!("Succeeded: {}", succeeded.to_string().green());
        if failed > 0 {
            println!("Failed:    {}", failed.to_string().red());
        } else {
            println!("Failed:    {}", failed);
        }

        if category_counts.is_empty() {
            return;
        }

        let max_category_len = category_counts
            .keys()
            .map(|name| name.len())
            .max()
            .unwrap_or(0)
            .max(8); // "Category"

        println!();
        println!(
            "{:<width$} | {}",
            "Category".bold(),
            "Files".bold(),
            width = max_category_len
        );
        println!("{}", "-".repeat(max_category_len + 10));

        for (category, count) in category_counts {
            println!(
                "{:<width$} | {} {}",
                category,
                count.to_string().green(),
                plural_files(*count),
                width = max_category_len
            );
        }
    }

    /// Prints a dry-run notice message.
    pub fn dry_run_notice(message: &str) {
        println!("{}", format!("[DRY RUN] {}", message).yellow());
    }
}

fn plural_files(count: usize) -> &'static str {
    if count == 1 { "file" } else { "files" }
}
