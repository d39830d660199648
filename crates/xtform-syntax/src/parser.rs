//! The full parse pipeline: split, tokenize, build.

use serde::Serialize;

use crate::ast::XtformAst;
use crate::builder::build;
use crate::diagnostic::Diagnostic;
use crate::frontmatter::split;
use crate::tokenizer::tokenize;

/// A parsed document with every diagnostic raised along the way.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParseResult {
    pub ast: XtformAst,

    /// Splitter diagnostics first, then builder diagnostics.
    pub diagnostics: Vec<Diagnostic>,
}

impl ParseResult {
    pub fn has_errors(&self) -> bool {
        self.diagnostics.iter().any(Diagnostic::is_error)
    }

    /// The AST, or an error when any error-severity diagnostic was raised.
    /// Warnings are dropped.
    pub fn into_result(self) -> Result<XtformAst, ParseError> {
        if self.has_errors() {
            let errors = self
                .diagnostics
                .into_iter()
                .filter(Diagnostic::is_error)
                .collect();
            return Err(ParseError::Invalid(errors));
        }
        Ok(self.ast)
    }
}

/// Errors for callers that refuse documents with error diagnostics.
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    #[error("Document has {} error(s): {}", .0.len(), summarize(.0))]
    Invalid(Vec<Diagnostic>),
}

fn summarize(diagnostics: &[Diagnostic]) -> String {
    diagnostics
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// Parse a `.xtform` document.
///
/// Never fails on malformed content; problems come back as diagnostics.
pub fn parse(source: &str) -> ParseResult {
    let split = split(source);
    let tokens = tokenize(&split.body);
    let (body, build_diagnostics) = build(&tokens);

    let mut diagnostics = split.diagnostics;
    diagnostics.extend(build_diagnostics);

    ParseResult {
        ast: XtformAst {
            metadata: split.metadata,
            body,
            data: split.data,
        },
        diagnostics,
    }
}
