//! Parser and serializer for `.xtform` form documents.
//!
//! A document has three regions: a `---` delimited metadata block, a
//! markdown-like body with embedded `[% Component prop="v" /%]` tags, and a
//! trailing `data:` block holding the current form field values. This crate
//! turns that text into an [`XtformAst`] plus diagnostics and back again.

pub mod ast;
pub mod builder;
pub mod diagnostic;
pub mod edit;
pub mod frontmatter;
pub mod parser;
pub mod scalar;
pub mod serializer;
pub mod tokenizer;

pub use ast::{
    Block, Component, Data, Document, Heading, Inline, Metadata, NodeRef, Paragraph, Position,
    PropValue, Props, Text, XtformAst,
};
pub use builder::{build, AstBuilder};
pub use diagnostic::{Diagnostic, Severity};
pub use edit::{insert_component, update_field, EditError};
pub use frontmatter::{split, Split};
pub use parser::{parse, ParseError, ParseResult};
pub use scalar::Scalar;
pub use serializer::{serialize, serialize_body};
pub use tokenizer::{tokenize, Token, TokenKind, Tokenizer};
