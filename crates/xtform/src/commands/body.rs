//! Body command.

use std::path::Path;

use anyhow::Result;
use xtform_syntax::{parse, serialize_body};

use super::{read_document, report};

/// Print the document body as it would appear in a plain text editor.
pub async fn run(file: &Path) -> Result<()> {
    let source = read_document(file).await?;
    let result = parse(&source);

    println!("{}", serialize_body(&result.ast.body));

    report(file, &result.diagnostics);
    Ok(())
}
