//! Run reports for jrewrite
//!
//! Each file ends up clean, pending (check mode), written (fix mode) or
//! failed. Text output lists the import declarations that come and go per
//! file, `diff` prints a patch and `json` dumps the whole report at the end.

use colored::*;
use serde::Serialize;
use similar::{ChangeTag, TextDiff};
use std::path::Path;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
    Diff,
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            "diff" => Ok(OutputFormat::Diff),
            _ => Err(format!("Invalid output format '{}'. Valid options: text, json, diff", s)),
        }
    }
}

/// Where one edit of an import session lands in the original file
#[derive(Debug, Clone, Serialize)]
pub struct EditSite {
    pub line: usize,
    pub column: usize,
    pub message: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FileStatus {
    Clean,
    /// Changes found, file left alone
    Pending,
    Written,
    Failed,
}

#[derive(Debug, Clone, Serialize)]
pub struct FileReport {
    pub path: String,
    pub status: FileStatus,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub added: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub removed: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub edits: Vec<EditSite>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl FileReport {
    fn new(path: &Path, status: FileStatus) -> Self {
        Self {
            path: path.display().to_string(),
            status,
            added: Vec::new(),
            removed: Vec::new(),
            edits: Vec::new(),
            error: None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Totals {
    pub files: usize,
    pub changed: usize,
    pub imports_added: usize,
    pub imports_removed: usize,
    pub failed: usize,
}

#[derive(Debug, Serialize)]
struct JsonReport<'r> {
    version: &'static str,
    /// RFC 3339 time the run finished
    generated_at: String,
    totals: Totals,
    files: &'r [FileReport],
}

/// Per-file results of one run, printed as they arrive in text and diff mode
pub struct Report {
    format: OutputFormat,
    verbose: bool,
    files: Vec<FileReport>,
}

impl Report {
    pub fn new(format: OutputFormat, verbose: bool) -> Self {
        Self {
            format,
            verbose,
            files: Vec::new(),
        }
    }

    pub fn clean(&mut self, path: &Path) {
        if self.verbose && self.format == OutputFormat::Text {
            println!("{} {}", "=".dimmed(), path.display());
        }
        self.files.push(FileReport::new(path, FileStatus::Clean));
    }

    /// A file whose import block changes; `written` in fix mode
    pub fn changed(&mut self, path: &Path, edits: Vec<EditSite>, old: &str, new: &str, written: bool) {
        let status = if written { FileStatus::Written } else { FileStatus::Pending };
        let mut file = FileReport::new(path, status);
        (file.added, file.removed) = import_changes(old, new);
        file.edits = edits;

        match self.format {
            OutputFormat::Text => self.print_changed(&file),
            OutputFormat::Diff if !written => print!("{}", unified_diff(path, old, new)),
            _ => {}
        }
        self.files.push(file);
    }

    pub fn failed(&mut self, path: &Path, error: &str) {
        if self.format != OutputFormat::Json {
            eprintln!("{} {}: {}", "!".red().bold(), path.display(), error);
        }
        let mut file = FileReport::new(path, FileStatus::Failed);
        file.error = Some(error.to_string());
        self.files.push(file);
    }

    pub fn totals(&self) -> Totals {
        let mut totals = Totals {
            files: self.files.len(),
            ..Totals::default()
        };
        for file in &self.files {
            match file.status {
                FileStatus::Pending | FileStatus::Written => totals.changed += 1,
                FileStatus::Failed => totals.failed += 1,
                FileStatus::Clean => {}
            }
            totals.imports_added += file.added.len();
            totals.imports_removed += file.removed.len();
        }
        totals
    }

    /// Whether some file still has changes to apply
    pub fn has_pending(&self) -> bool {
        self.files.iter().any(|f| f.status == FileStatus::Pending)
    }

    pub fn finish(self) -> anyhow::Result<()> {
        let totals = self.totals();
        match self.format {
            OutputFormat::Text => {
                println!(
                    "{} {} file(s), {} changed ({} {}), {} failed",
                    "jrewrite:".bold(),
                    totals.files,
                    totals.changed,
                    format!("+{}", totals.imports_added).green(),
                    format!("-{}", totals.imports_removed).red(),
                    totals.failed
                );
                if self.has_pending() {
                    println!("{}", "Run with --fix to apply changes".yellow());
                }
            }
            OutputFormat::Json => {
                let report = JsonReport {
                    version: env!("CARGO_PKG_VERSION"),
                    generated_at: chrono::Local::now().to_rfc3339(),
                    totals,
                    files: &self.files,
                };
                println!("{}", serde_json::to_string_pretty(&report)?);
            }
            OutputFormat::Diff => {}
        }
        Ok(())
    }

    fn print_changed(&self, file: &FileReport) {
        let verb = match file.status {
            FileStatus::Written => "updated".green(),
            _ => "would update".yellow(),
        };
        println!("{} {}", file.path.bold(), verb);
        for name in &file.added {
            println!("  {} {}", "+".green(), name);
        }
        for name in &file.removed {
            println!("  {} {}", "-".red(), name);
        }
        if self.verbose {
            for edit in &file.edits {
                println!("  {}:{} {}", edit.line, edit.column, edit.message.dimmed());
            }
        }
    }
}

/// Import declarations present only in `new` and only in `old`.
///
/// Declarations that merely moved (regrouped or re-sorted) are in neither.
fn import_changes(old: &str, new: &str) -> (Vec<String>, Vec<String>) {
    let diff = TextDiff::from_lines(old, new);
    let mut added = Vec::new();
    let mut removed = Vec::new();
    for change in diff.iter_all_changes() {
        let line = change.value().trim();
        if !line.starts_with("import ") {
            continue;
        }
        let declaration = line.split_once(';').map_or(line, |(d, _)| d).to_string();
        match change.tag() {
            ChangeTag::Insert => added.push(declaration),
            ChangeTag::Delete => removed.push(declaration),
            ChangeTag::Equal => {}
        }
    }
    let moved: Vec<String> = added.iter().filter(|a| removed.contains(a)).cloned().collect();
    added.retain(|a| !moved.contains(a));
    removed.retain(|r| !moved.contains(r));
    (added, removed)
}

/// `diff -u` style patch of one file
fn unified_diff(path: &Path, old: &str, new: &str) -> String {
    let name = path.display().to_string();
    let diff = TextDiff::from_lines(old, new);
    let mut unified = diff.unified_diff();
    unified
        .context_radius(3)
        .header(&format!("a/{}", name), &format!("b/{}", name));
    unified.to_string()
}
