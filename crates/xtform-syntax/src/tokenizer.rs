//! Body tokenizer.
//!
//! Splits body text into text runs and `[% ... /%]` component tags. Every
//! token keeps its exact source slice in `raw`, so joining the raw slices
//! gives back the input.

use crate::ast::Position;

const COMPONENT_OPEN: &str = "[%";
const COMPONENT_CLOSE: &str = "/%";

/// Token classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    Text,
    ComponentSelfClosing,
    Eof,
}

/// A token borrowed from the body text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token<'a> {
    pub kind: TokenKind,

    /// Text runs: the text itself. Components: the trimmed tag content
    /// between the markers.
    pub value: &'a str,

    /// The exact source slice, markers included.
    pub raw: &'a str,

    pub position: Position,
}

impl Token<'_> {
    /// A component tag that ran to the end of input without its `/%` marker.
    pub fn is_unterminated(&self) -> bool {
        self.kind == TokenKind::ComponentSelfClosing && !self.raw.contains(COMPONENT_CLOSE)
    }
}

/// Character scanner over a body string.
pub struct Tokenizer<'a> {
    input: &'a str,
    pos: usize,
    line: usize,
    column: usize,
}

impl<'a> Tokenizer<'a> {
    pub fn new(input: &'a str) -> Self {
        Self {
            input,
            pos: 0,
            line: 1,
            column: 1,
        }
    }

    /// Scan the next token. Returns an `Eof` token once the input is used up.
    pub fn next_token(&mut self) -> Token<'a> {
        if self.is_at_end() {
            return Token {
                kind: TokenKind::Eof,
                value: "",
                raw: "",
                position: self.current_position(),
            };
        }

        if self.starts_with(COMPONENT_OPEN) {
            self.read_component()
        } else {
            self.read_text()
        }
    }

    /// Read `[% content /%]`.
    ///
    /// An unterminated tag swallows the rest of the input.
    fn read_component(&mut self) -> Token<'a> {
        let start = self.pos;
        let position = self.current_position();

        self.advance_by(COMPONENT_OPEN.len());
        self.skip_whitespace();

        let content_start = self.pos;
        while !self.is_at_end() && !self.starts_with(COMPONENT_CLOSE) {
            self.advance();
        }
        let content_end = self.pos;

        if self.starts_with(COMPONENT_CLOSE) {
            self.advance_by(COMPONENT_CLOSE.len());
            if self.starts_with("]") {
                self.advance();
            }
        }

        Token {
            kind: TokenKind::ComponentSelfClosing,
            value: self.input[content_start..content_end].trim(),
            raw: &self.input[start..self.pos],
            position,
        }
    }

    /// Read text up to the next component marker or the end of input.
    fn read_text(&mut self) -> Token<'a> {
        let start = self.pos;
        let position = self.current_position();

        while !self.is_at_end() && !self.starts_with(COMPONENT_OPEN) {
            self.advance();
        }

        let text = &self.input[start..self.pos];
        Token {
            kind: TokenKind::Text,
            value: text,
            raw: text,
            position,
        }
    }

    fn skip_whitespace(&mut self) {
        while self.peek().is_some_and(char::is_whitespace) {
            self.advance();
        }
    }

    fn advance_by(&mut self, chars: usize) {
        for _ in 0..chars {
            self.advance();
        }
    }

    fn advance(&mut self) {
        if let Some(ch) = self.peek() {
            self.pos += ch.len_utf8();
            if ch == '\n' {
                self.line += 1;
                self.column = 1;
            } else {
                self.column += 1;
            }
        }
    }

    fn peek(&self) -> Option<char> {
        self.input[self.pos..].chars().next()
    }

    fn starts_with(&self, marker: &str) -> bool {
        self.input[self.pos..].starts_with(marker)
    }

    fn is_at_end(&self) -> bool {
        self.pos >= self.input.len()
    }

    fn current_position(&self) -> Position {
        Position::new(self.line, self.column)
    }
}

impl<'a> Iterator for Tokenizer<'a> {
    type Item = Token<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let token = self.next_token();
        (token.kind != TokenKind::Eof).then_some(token)
    }
}

/// Tokenize a whole body. The terminating `Eof` is not included.
pub fn tokenize(input: &str) -> Vec<Token<'_>> {
    Tokenizer::new(input).collect()
}
