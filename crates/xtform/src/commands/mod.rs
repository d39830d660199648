//! Subcommand implementations.

use std::path::Path;

use anyhow::{Context, Result};
use xtform_syntax::{Diagnostic, Severity};

pub mod body;
pub mod check;
pub mod fmt;
pub mod insert;
pub mod palette;
pub mod parse;
pub mod set;
pub mod watch;

/// File extension of form documents.
pub const DOCUMENT_EXTENSION: &str = "xtform";

/// Read a document from disk.
pub async fn read_document(path: &Path) -> Result<String> {
    tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read {}", path.display()))
}

/// Write a document back to disk.
pub async fn write_document(path: &Path, content: &str) -> Result<()> {
    tokio::fs::write(path, content)
        .await
        .with_context(|| format!("Failed to write {}", path.display()))
}

/// Log each diagnostic against its file.
pub fn report(path: &Path, diagnostics: &[Diagnostic]) {
    for diagnostic in diagnostics {
        match diagnostic.severity {
            Severity::Error => tracing::error!("{}: {}", path.display(), diagnostic),
            Severity::Warning => tracing::warn!("{}: {}", path.display(), diagnostic),
        }
    }
}
