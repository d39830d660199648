//! Whole-document edits a host performs in response to form input.
//!
//! Each edit is a pure text-to-text function; scheduling and debouncing
//! are left to the caller.

use std::sync::LazyLock;

use regex::Regex;
use serde_json::Value;

use crate::ast::Position;
use crate::frontmatter::split;
use crate::parser::{parse, ParseError};
use crate::serializer::serialize;
use crate::tokenizer::tokenize;

static DATA_SECTION_START_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\n---\r?\ndata:").expect("Invalid data section start regex"));

/// Reasons a document cannot be rewritten without losing content.
#[derive(Debug, thiserror::Error)]
pub enum EditError {
    #[error(transparent)]
    Invalid(#[from] ParseError),

    #[error(
        "Unterminated component tag at line {}, column {}",
        .0.line,
        .0.column
    )]
    UnterminatedComponent(Position),

    #[error("Document has no metadata block, so a data section would not be read back")]
    MissingMetadata,
}

/// Set one form field and re-serialize the document.
///
/// Refuses documents that re-serializing would damage: ones with error
/// diagnostics, an unterminated component tag, or no metadata to anchor the
/// data section.
pub fn update_field(source: &str, name: &str, value: Value) -> Result<String, EditError> {
    let body = split(source).body;
    if let Some(token) = tokenize(&body).iter().find(|t| t.is_unterminated()) {
        return Err(EditError::UnterminatedComponent(token.position));
    }

    let mut ast = parse(source).into_result()?;
    if ast.metadata.is_empty() {
        return Err(EditError::MissingMetadata);
    }

    ast.data.insert(name.to_string(), value);
    Ok(serialize(&ast))
}

/// Insert a component template at the end of the body, before any data section.
pub fn insert_component(source: &str, template: &str) -> String {
    match DATA_SECTION_START_RE.find(source) {
        Some(m) => {
            let (before, after) = source.split_at(m.start());
            format!("{before}\n\n{template}\n{after}")
        }
        None => format!("{}\n\n{template}\n", source.trim_end()),
    }
}
