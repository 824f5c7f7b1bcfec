use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseError {
    /// The exact rendered pattern string is already registered.
    DuplicatePattern,
    /// Adding this pattern would give some trie node two typed edges whose
    /// token type matches but whose tag differs — the second edge could
    /// never be reached, since matching dispatches on token type alone.
    AmbiguousPattern,
    /// No registered pattern matches the given sequence.
    NoMatch,
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let msg = match self {
            ParseError::DuplicatePattern => "pattern already registered",
            ParseError::AmbiguousPattern => {
                "pattern would create two typed edges of the same type at one trie node"
            }
            ParseError::NoMatch => "no registered pattern matches this sequence",
        };
        f.write_str(msg)
    }
}

impl std::error::Error for ParseError {}
