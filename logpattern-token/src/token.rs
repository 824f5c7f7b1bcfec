use serde::{Deserialize, Serialize};

use crate::tag::TagType;

/// Lexical category assigned to a token by the scanner.
///
/// This is a closed enumeration: new categories are added only by editing
/// this list, never by extension traits or downcasting. `Literal`, `Other`,
/// `Quote`, `Comma` and `Equals` are the "scaffolding" categories whose
/// value is preserved verbatim on pattern emission; every other variant is
/// a "typed" category whose value is replaced by a placeholder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TokenType {
    Literal,
    String,
    IPv4,
    IPv6,
    Integer,
    Float,
    Hex,
    MacAddress,
    Time,
    Uri,
    Email,
    Quote,
    Comma,
    Equals,
    Other,
}

impl TokenType {
    /// Whether this category's value is scaffolding (preserved verbatim)
    /// rather than a domain-varying value (replaced by a placeholder).
    pub fn is_scaffolding(self) -> bool {
        matches!(
            self,
            TokenType::Literal
                | TokenType::Other
                | TokenType::Quote
                | TokenType::Comma
                | TokenType::Equals
        )
    }

    /// Whether this category should be substituted by a placeholder when a
    /// [`crate::Sequence`] is rendered as a pattern string.
    pub fn is_typed(self) -> bool {
        !self.is_scaffolding()
    }
}

/// An immutable lexical unit extracted from a log line.
///
/// When `token_type.is_scaffolding()`, `value` is the exact matched text and
/// is emitted verbatim on rendering. Otherwise `value` is the matched
/// lexeme and is replaced by a placeholder derived from `(token_type, tag)`
/// at render time; the lexeme itself is retained so the Parser can bind it
/// into a field map.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Token {
    pub token_type: TokenType,
    pub tag: TagType,
    pub value: String,
    pub is_key: bool,
    pub is_value: bool,
    pub space_before: bool,
}

impl Token {
    pub fn new(token_type: TokenType, tag: TagType, value: impl Into<String>) -> Self {
        Token {
            token_type,
            tag,
            value: value.into(),
            is_key: false,
            is_value: false,
            space_before: false,
        }
    }

    /// A scaffolding token whose tag is always `Unknown` (literals don't
    /// carry domain semantics — only typed tokens do).
    pub fn literal(value: impl Into<String>) -> Self {
        Token::new(TokenType::Literal, TagType::Unknown, value)
    }

    pub fn with_space_before(mut self, space_before: bool) -> Self {
        self.space_before = space_before;
        self
    }

    pub fn as_key(mut self) -> Self {
        self.is_key = true;
        self
    }

    pub fn as_value(mut self) -> Self {
        self.is_value = true;
        self
    }

    pub fn with_tag(mut self, tag: TagType) -> Self {
        self.tag = tag;
        self
    }

    /// Lowercased exact text, used as the literal half of a trie/graph
    /// discriminator. Only meaningful for scaffolding tokens.
    pub fn lowered_value(&self) -> String {
        self.value.to_lowercase()
    }

    pub fn is_typed(&self) -> bool {
        self.token_type.is_typed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn literal_tokens_default_to_unknown_tag() {
        let tok = Token::literal("Failed");
        assert_eq!(tok.tag, TagType::Unknown);
        assert!(!tok.is_typed());
    }

    #[test]
    fn typed_tokens_are_substitutable() {
        let tok = Token::new(TokenType::IPv4, TagType::SrcIp, "10.0.0.1");
        assert!(tok.is_typed());
    }

    #[test]
    fn lowered_value_does_not_mutate_original() {
        let tok = Token::literal("GET");
        assert_eq!(tok.lowered_value(), "get");
        assert_eq!(tok.value, "GET");
    }

    #[test]
    fn token_round_trips_through_json() {
        let tok = Token::new(TokenType::IPv4, TagType::SrcIp, "10.0.0.1").with_space_before(true);
        let json = serde_json::to_string(&tok).unwrap();
        let back: Token = serde_json::from_str(&json).unwrap();
        assert_eq!(tok, back);
    }
}
