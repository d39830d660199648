//! Format command.

use std::path::Path;

use anyhow::Result;
use xtform_syntax::{parse, serialize};

use super::{read_document, report, write_document};

/// Run the fmt command.
///
/// Documents with error diagnostics are left alone, since serializing them
/// would drop the malformed parts.
pub async fn run(file: &Path, check: bool) -> Result<()> {
    let source = read_document(file).await?;
    let result = parse(&source);
    report(file, &result.diagnostics);

    let ast = result.into_result()?;
    let formatted = serialize(&ast);

    if formatted == source {
        tracing::info!("{} is already formatted", file.display());
        return Ok(());
    }

    if check {
        anyhow::bail!("{} is not formatted", file.display());
    }

    write_document(file, &formatted).await?;
    tracing::info!("Formatted {}", file.display());
    Ok(())
}
