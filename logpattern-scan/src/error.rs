//! Error types for the scanner.

use std::fmt;

/// Failure while lexing free-form text. Fatal to the current line: the
/// caller drops it and continues with the next.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LexError {
    /// A quoted string's closing quote was never found on this line.
    UnterminatedQuote { start: usize },
}

impl fmt::Display for LexError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LexError::UnterminatedQuote { start } => {
                write!(f, "unterminated quoted string starting at byte {}", start)
            }
        }
    }
}

impl std::error::Error for LexError {}

/// A JSON state-machine transition that isn't in the table in §4.1.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JsonErrorKind {
    ExpectedObjectOpen,
    ExpectedStringKey,
    ExpectedColonOrQuote,
    ExpectedValueTerminator,
    UnbalancedBraces,
    UnbalancedBrackets,
    ExpectedArrayTerminator,
}

impl fmt::Display for JsonErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let msg = match self {
            JsonErrorKind::ExpectedObjectOpen => "expected '{' to start the document",
            JsonErrorKind::ExpectedStringKey => "expected a quoted string key",
            JsonErrorKind::ExpectedColonOrQuote => "expected ':' or the end of a key",
            JsonErrorKind::ExpectedValueTerminator => "expected '}', ',' or the end of a value",
            JsonErrorKind::UnbalancedBraces => "too many '}' characters",
            JsonErrorKind::UnbalancedBrackets => "mismatched ']' or '}' characters",
            JsonErrorKind::ExpectedArrayTerminator => "expected ']', ',' or the end of an element",
        };
        f.write_str(msg)
    }
}

/// Failure while flattening a JSON envelope. Fatal to the current line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JsonError {
    pub kind: JsonErrorKind,
    pub position: usize,
}

impl JsonError {
    pub fn new(kind: JsonErrorKind, position: usize) -> Self {
        JsonError { kind, position }
    }
}

impl fmt::Display for JsonError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid JSON at byte {}: {}", self.position, self.kind)
    }
}

impl std::error::Error for JsonError {}
