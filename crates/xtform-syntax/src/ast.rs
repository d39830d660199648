//! Document tree types.
//!
//! Block-level and inline nodes are closed sum types, so every consumer
//! (builder, serializer, renderers) has to match all of them.

use indexmap::IndexMap;
use serde::Serialize;

use crate::scalar::Scalar;

/// Metadata from the leading `---` block, in source order.
pub type Metadata = IndexMap<String, Scalar>;

/// Form field values from the trailing `data:` block, in source order.
///
/// Parsing only produces scalars and `null`; hosts may store arrays or objects,
/// which serialize as JSON.
pub type Data = IndexMap<String, serde_json::Value>;

/// Component props, in source order.
pub type Props = IndexMap<String, PropValue>;

/// A 1-based line/column pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Position {
    pub line: usize,
    pub column: usize,
}

impl Position {
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }
}

impl Default for Position {
    fn default() -> Self {
        Self { line: 1, column: 1 }
    }
}

/// A parsed `.xtform` document.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct XtformAst {
    pub metadata: Metadata,
    pub body: Document,
    pub data: Data,
}

/// Root of the body tree.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(tag = "type")]
pub struct Document {
    pub children: Vec<Block>,
}

impl Document {
    /// Every component in the document, including ones nested inline.
    pub fn components(&self) -> impl Iterator<Item = &Component> {
        self.children.iter().flat_map(|block| {
            let (top, inline): (Option<&Component>, &[Inline]) = match block {
                Block::Component(component) => (Some(component), &[]),
                Block::Heading(heading) => (None, &heading.children),
                Block::Paragraph(paragraph) => (None, &paragraph.children),
            };
            top.into_iter().chain(inline.iter().filter_map(|node| match node {
                Inline::Component(component) => Some(component),
                Inline::Text(_) => None,
            }))
        })
    }
}

/// A top-level node of the document body.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Block {
    Heading(Heading),
    Paragraph(Paragraph),
    Component(Component),
}

/// A node that may appear inside a heading or paragraph.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Inline {
    Text(Text),
    Component(Component),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type")]
pub struct Heading {
    /// Always within 1..=6.
    pub level: u8,
    pub children: Vec<Inline>,
    #[serde(flatten)]
    pub position: Position,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type")]
pub struct Paragraph {
    pub children: Vec<Inline>,
    #[serde(flatten)]
    pub position: Position,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type")]
pub struct Text {
    /// Verbatim source text; paragraph lines keep their trailing newline.
    pub value: String,
    #[serde(flatten)]
    pub position: Position,
}

impl Text {
    pub fn new(value: impl Into<String>, position: Position) -> Self {
        Self {
            value: value.into(),
            position,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type")]
pub struct Component {
    pub name: String,

    /// `None` when the tag carried no recognised props; never an empty map.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub props: Option<Props>,

    #[serde(flatten)]
    pub position: Position,
}

impl Component {
    pub fn new(name: impl Into<String>, props: Option<Props>, position: Position) -> Self {
        Self {
            name: name.into(),
            props: props.filter(|props| !props.is_empty()),
            position,
        }
    }

    pub fn prop(&self, key: &str) -> Option<&PropValue> {
        self.props.as_ref()?.get(key)
    }
}

/// A component prop value.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum PropValue {
    String(String),
    Number(f64),
    Boolean(bool),
}

impl PropValue {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            PropValue::String(s) => Some(s),
            _ => None,
        }
    }
}

impl From<&str> for PropValue {
    fn from(value: &str) -> Self {
        PropValue::String(value.to_string())
    }
}

impl From<String> for PropValue {
    fn from(value: String) -> Self {
        PropValue::String(value)
    }
}

impl From<f64> for PropValue {
    fn from(value: f64) -> Self {
        PropValue::Number(value)
    }
}

impl From<bool> for PropValue {
    fn from(value: bool) -> Self {
        PropValue::Boolean(value)
    }
}

/// Borrowed view over any node kind, used by [`crate::serialize_body`].
#[derive(Debug, Clone, Copy)]
pub enum NodeRef<'a> {
    Document(&'a Document),
    Heading(&'a Heading),
    Paragraph(&'a Paragraph),
    Text(&'a Text),
    Component(&'a Component),
}

impl<'a> From<&'a Document> for NodeRef<'a> {
    fn from(node: &'a Document) -> Self {
        NodeRef::Document(node)
    }
}

impl<'a> From<&'a Heading> for NodeRef<'a> {
    fn from(node: &'a Heading) -> Self {
        NodeRef::Heading(node)
    }
}

impl<'a> From<&'a Paragraph> for NodeRef<'a> {
    fn from(node: &'a Paragraph) -> Self {
        NodeRef::Paragraph(node)
    }
}

impl<'a> From<&'a Text> for NodeRef<'a> {
    fn from(node: &'a Text) -> Self {
        NodeRef::Text(node)
    }
}

impl<'a> From<&'a Component> for NodeRef<'a> {
    fn from(node: &'a Component) -> Self {
        NodeRef::Component(node)
    }
}

impl<'a> From<&'a Block> for NodeRef<'a> {
    fn from(node: &'a Block) -> Self {
        match node {
            Block::Heading(heading) => NodeRef::Heading(heading),
            Block::Paragraph(paragraph) => NodeRef::Paragraph(paragraph),
            Block::Component(component) => NodeRef::Component(component),
        }
    }
}

impl<'a> From<&'a Inline> for NodeRef<'a> {
    fn from(node: &'a Inline) -> Self {
        match node {
            Inline::Text(text) => NodeRef::Text(text),
            Inline::Component(component) => NodeRef::Component(component),
        }
    }
}
