//! Set command.

use std::path::Path;

use anyhow::{Context, Result};
use serde_json::Value;
use xtform_syntax::update_field;

use super::{read_document, write_document};

/// Run the set command.
pub async fn run(file: &Path, field: &str, raw: String) -> Result<()> {
    let source = read_document(file).await?;
    let value = parse_value(raw);

    tracing::debug!("Setting {} = {}", field, value);
    let updated = update_field(&source, field, value)
        .with_context(|| format!("Refusing to update {}", file.display()))?;
    write_document(file, &updated).await?;
    tracing::info!("Updated {} in {}", field, file.display());
    Ok(())
}

/// Read a command line value as JSON, falling back to plain text.
fn parse_value(raw: String) -> Value {
    serde_json::from_str(&raw).unwrap_or(Value::String(raw))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn refused_update_leaves_file_untouched() {
        let temp = tempfile::tempdir().unwrap();
        let file = temp.path().join("broken.xtform");
        let source = "---\ntitle: T\n---\nIntro [% Broken p=1\nmore user text\n";
        std::fs::write(&file, source).unwrap();

        let err = run(&file, "a", "2".into()).await.unwrap_err();

        assert!(format!("{err:#}").contains("Unterminated component tag"));
        assert_eq!(std::fs::read_to_string(&file).unwrap(), source);
    }

    #[tokio::test]
    async fn writes_field_into_data_section() {
        let temp = tempfile::tempdir().unwrap();
        let file = temp.path().join("form.xtform");
        std::fs::write(&file, "---\ntitle: T\n---\nBody\n").unwrap();

        run(&file, "age", "36".into()).await.unwrap();

        let written = std::fs::read_to_string(&file).unwrap();
        assert_eq!(xtform_syntax::parse(&written).ast.data["age"], json!(36));
    }

    #[test]
    fn reads_json_or_text() {
        assert_eq!(parse_value("42".into()), json!(42));
        assert_eq!(parse_value("true".into()), json!(true));
        assert_eq!(parse_value("null".into()), json!(null));
        assert_eq!(parse_value("[1,2]".into()), json!([1, 2]));
        assert_eq!(parse_value("\"7\"".into()), json!("7"));
        assert_eq!(parse_value("Ada Lovelace".into()), json!("Ada Lovelace"));
    }
}
