//! Check command.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use rayon::prelude::*;
use walkdir::WalkDir;
use xtform_syntax::{parse, Diagnostic};

use super::{report, DOCUMENT_EXTENSION};

/// Diagnostics for one document.
#[derive(Debug)]
pub struct FileReport {
    pub path: PathBuf,
    pub diagnostics: Vec<Diagnostic>,
}

impl FileReport {
    pub fn error_count(&self) -> usize {
        self.diagnostics.iter().filter(|d| d.is_error()).count()
    }
}

/// Run the check command.
pub async fn run(paths: Vec<PathBuf>) -> Result<()> {
    let files = collect_documents(&paths);
    tracing::debug!("Checking {} documents", files.len());

    let reports = tokio::task::spawn_blocking(move || check_all(&files))
        .await
        .context("Check task failed")?;

    let mut errors = 0;
    let mut warnings = 0;
    for file_report in &reports {
        report(&file_report.path, &file_report.diagnostics);
        errors += file_report.error_count();
        warnings += file_report.diagnostics.len() - file_report.error_count();
    }

    tracing::info!(
        "Checked {} documents: {} errors, {} warnings",
        reports.len(),
        errors,
        warnings
    );

    if errors > 0 {
        anyhow::bail!("{} error(s) found", errors);
    }
    Ok(())
}

/// Parse every document in parallel.
///
/// A file that cannot be read gets a report with a single error instead of
/// stopping the run.
pub fn check_all(files: &[PathBuf]) -> Vec<FileReport> {
    files
        .par_iter()
        .map(|path| {
            check_file(path).unwrap_or_else(|e| FileReport {
                path: path.clone(),
                diagnostics: vec![Diagnostic::error(format!("{e:#}"))],
            })
        })
        .collect()
}

/// Parse one document and return its diagnostics.
pub fn check_file(path: &Path) -> Result<FileReport> {
    let source =
        fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))?;

    Ok(FileReport {
        path: path.to_path_buf(),
        diagnostics: parse(&source).diagnostics,
    })
}

/// Expand directories into the `.xtform` files below them.
pub fn collect_documents(paths: &[PathBuf]) -> Vec<PathBuf> {
    let mut files = Vec::new();

    for path in paths {
        if path.is_file() {
            files.push(path.clone());
            continue;
        }

        for entry in WalkDir::new(path)
            .follow_links(true)
            .into_iter()
            .filter_map(|e| e.ok())
        {
            if entry.file_type().is_file() && is_document(entry.path()) {
                files.push(entry.into_path());
            }
        }
    }

    files.sort();
    files
}

pub fn is_document(path: &Path) -> bool {
    path.extension().and_then(|e| e.to_str()) == Some(DOCUMENT_EXTENSION)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn collects_only_documents() {
        let temp = tempdir().unwrap();
        let nested = temp.path().join("forms/nested");
        fs::create_dir_all(&nested).unwrap();
        fs::write(temp.path().join("forms/a.xtform"), "A").unwrap();
        fs::write(nested.join("b.xtform"), "B").unwrap();
        fs::write(nested.join("notes.md"), "# no").unwrap();

        let files = collect_documents(&[temp.path().to_path_buf()]);

        assert_eq!(files.len(), 2);
        assert!(files.iter().all(|f| is_document(f)));
    }

    #[test]
    fn reports_diagnostics_per_file() {
        let temp = tempdir().unwrap();
        let good = temp.path().join("good.xtform");
        let bad = temp.path().join("bad.xtform");
        fs::write(&good, "---\ntitle: Ok\n---\n[% TextInput name=\"a\" /%]").unwrap();
        fs::write(&bad, "---\noops\n---\n[%  /%]").unwrap();

        let reports = check_all(&collect_documents(&[temp.path().to_path_buf()]));

        assert_eq!(reports.len(), 2);
        let bad_report = reports.iter().find(|r| r.path == bad).unwrap();
        assert_eq!(bad_report.diagnostics.len(), 2);
        assert_eq!(bad_report.error_count(), 1);
        let good_report = reports.iter().find(|r| r.path == good).unwrap();
        assert!(good_report.diagnostics.is_empty());
    }

    #[test]
    fn unreadable_file_does_not_stop_the_run() {
        let temp = tempdir().unwrap();
        let missing = temp.path().join("gone.xtform");
        let good = temp.path().join("good.xtform");
        fs::write(&good, "---\ntitle: Ok\n---\nBody").unwrap();

        let reports = check_all(&[missing.clone(), good.clone()]);

        assert_eq!(reports.len(), 2);
        assert_eq!(reports[0].path, missing);
        assert_eq!(reports[0].error_count(), 1);
        assert!(reports[0].diagnostics[0].message.contains("Failed to read"));
        assert_eq!(reports[1].path, good);
        assert!(reports[1].diagnostics.is_empty());
    }

    #[test]
    fn explicit_files_are_kept() {
        let temp = tempdir().unwrap();
        let file = temp.path().join("form.txt");
        fs::write(&file, "body").unwrap();

        assert_eq!(collect_documents(&[file.clone()]), vec![file]);
    }
}
