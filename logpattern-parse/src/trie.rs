use std::collections::HashMap;

use logpattern_token::{Config, Pattern, Sequence, TagType, Token, TokenType};

use crate::error::ParseError;

/// One matched pattern, with each of its typed tokens bound to the concrete
/// value that matched it. Keys are tag base names, numerically suffixed
/// (`string`, `string1`, ...) in order of first appearance within the
/// pattern — the same scheme used when rendering a pattern string.
#[derive(Debug, Clone, PartialEq)]
pub struct Matched {
    pub pattern: Pattern,
    pub fields: HashMap<String, String>,
}

#[derive(Debug, Default)]
struct ParserNode {
    literal_children: HashMap<String, ParserNode>,
    typed_children: HashMap<TokenType, TypedEdge>,
    terminal: Option<Pattern>,
}

#[derive(Debug)]
struct TypedEdge {
    tag: TagType,
    field_key: String,
    child: ParserNode,
}

impl ParserNode {
    fn new() -> Self {
        ParserNode::default()
    }
}

/// Maintains the set of known patterns and answers whether an incoming
/// token sequence matches one of them.
///
/// Patterns share a trie keyed, at each position, by a discriminator: a
/// lowercased literal value for scaffolding tokens, or `(TokenType, TagType)`
/// for typed ones. The `add`-time invariant that makes matching
/// deterministic without backtracking is that no node may carry two typed
/// edges of the same `TokenType` but different `TagType` — matching
/// dispatches on type alone, so a second such edge could never be reached.
#[derive(Debug)]
pub struct Parser {
    root: ParserNode,
    config: Config,
}

impl Parser {
    pub fn new(config: Config) -> Self {
        Parser {
            root: ParserNode::new(),
            config,
        }
    }

    /// Register a pattern sequence. Errors with [`ParseError::DuplicatePattern`]
    /// if its rendered form is already known, or
    /// [`ParseError::AmbiguousPattern`] if it would create an unreachable
    /// typed edge (see struct docs).
    pub fn add(&mut self, sequence: Sequence) -> Result<(), ParseError> {
        let pattern = Pattern::new(sequence.clone(), &self.config);
        let field_keys = assign_field_keys(&sequence);

        let mut node = &mut self.root;
        for (token, field_key) in sequence.iter().zip(field_keys) {
            node = descend_or_create(node, token, field_key)?;
        }

        if node.terminal.is_some() {
            return Err(ParseError::DuplicatePattern);
        }
        node.terminal = Some(pattern);
        Ok(())
    }

    /// Match `sequence` against the known pattern set, returning the
    /// matched pattern and its bound field map, or [`ParseError::NoMatch`].
    pub fn parse(&self, sequence: &[Token]) -> Result<Matched, ParseError> {
        let mut node = &self.root;
        let mut fields = HashMap::new();

        for token in sequence {
            if !token.is_typed() {
                if let Some(next) = node.literal_children.get(&token.lowered_value()) {
                    node = next;
                    continue;
                }
            }
            if let Some(edge) = node.typed_children.get(&token.token_type) {
                fields.insert(edge.field_key.clone(), token.value.clone());
                node = &edge.child;
                continue;
            }
            return Err(ParseError::NoMatch);
        }

        match &node.terminal {
            Some(pattern) => Ok(Matched {
                pattern: pattern.clone(),
                fields,
            }),
            None => Err(ParseError::NoMatch),
        }
    }

    pub fn len(&self) -> usize {
        count_terminals(&self.root)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn count_terminals(node: &ParserNode) -> usize {
    let mut n = if node.terminal.is_some() { 1 } else { 0 };
    n += node.literal_children.values().map(count_terminals).sum::<usize>();
    n += node
        .typed_children
        .values()
        .map(|e| count_terminals(&e.child))
        .sum::<usize>();
    n
}

fn descend_or_create<'a>(
    node: &'a mut ParserNode,
    token: &Token,
    field_key: Option<String>,
) -> Result<&'a mut ParserNode, ParseError> {
    if !token.is_typed() {
        let key = token.lowered_value();
        return Ok(node.literal_children.entry(key).or_insert_with(ParserNode::new));
    }

    if let Some(existing) = node.typed_children.get(&token.token_type) {
        if existing.tag != token.tag {
            return Err(ParseError::AmbiguousPattern);
        }
    } else {
        node.typed_children.insert(
            token.token_type,
            TypedEdge {
                tag: token.tag.clone(),
                field_key: field_key.unwrap_or_else(|| token.tag.base_name()),
                child: ParserNode::new(),
            },
        );
    }
    Ok(&mut node.typed_children.get_mut(&token.token_type).unwrap().child)
}

/// For each typed token in `sequence`, the field key it binds to when
/// matched: its tag's base name, numerically suffixed in order of first
/// appearance so repeated tags stay distinct (`string`, `string1`, ...).
fn assign_field_keys(sequence: &[Token]) -> Vec<Option<String>> {
    let mut seen: HashMap<String, usize> = HashMap::new();
    sequence
        .iter()
        .map(|token| {
            if !token.is_typed() {
                return None;
            }
            let base = token.tag.base_name();
            let count = seen.entry(base.clone()).or_insert(0);
            let suffix = *count;
            *count += 1;
            Some(if suffix == 0 {
                base
            } else {
                format!("{}{}", base, suffix)
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn seq(tokens: Vec<Token>) -> Sequence {
        tokens
    }

    #[test]
    fn matches_exact_literal_sequence() {
        let mut parser = Parser::new(Config::default());
        parser
            .add(seq(vec![Token::literal("Failed"), Token::literal("password")]))
            .unwrap();
        let matched = parser
            .parse(&[Token::literal("Failed"), Token::literal("password")])
            .unwrap();
        assert_eq!(matched.pattern.rendered(), "Failedpassword");
    }

    #[test]
    fn binds_typed_tokens_into_field_map() {
        let mut parser = Parser::new(Config::default());
        parser
            .add(seq(vec![
                Token::literal("from"),
                Token::new(TokenType::IPv4, TagType::SrcIp, "0.0.0.0").with_space_before(true),
            ]))
            .unwrap();
        let matched = parser
            .parse(&[
                Token::literal("from"),
                Token::new(TokenType::IPv4, TagType::SrcIp, "218.161.81.238").with_space_before(true),
            ])
            .unwrap();
        assert_eq!(matched.fields.get("srcip"), Some(&"218.161.81.238".to_string()));
    }

    #[test]
    fn repeated_tag_gets_numeric_suffix_in_field_map() {
        let mut parser = Parser::new(Config::default());
        parser
            .add(seq(vec![
                Token::new(TokenType::String, TagType::String, "a"),
                Token::literal(","),
                Token::new(TokenType::String, TagType::String, "b"),
            ]))
            .unwrap();
        let matched = parser
            .parse(&[
                Token::new(TokenType::String, TagType::String, "x"),
                Token::literal(","),
                Token::new(TokenType::String, TagType::String, "y"),
            ])
            .unwrap();
        assert_eq!(matched.fields.get("string"), Some(&"x".to_string()));
        assert_eq!(matched.fields.get("string1"), Some(&"y".to_string()));
    }

    #[test]
    fn duplicate_pattern_is_rejected() {
        let mut parser = Parser::new(Config::default());
        parser.add(seq(vec![Token::literal("ok")])).unwrap();
        assert_eq!(
            parser.add(seq(vec![Token::literal("ok")])),
            Err(ParseError::DuplicatePattern)
        );
    }

    #[test]
    fn conflicting_tag_on_same_type_at_same_node_is_ambiguous() {
        let mut parser = Parser::new(Config::default());
        parser
            .add(seq(vec![Token::new(TokenType::IPv4, TagType::SrcIp, "0.0.0.0")]))
            .unwrap();
        let result = parser.add(seq(vec![Token::new(TokenType::IPv4, TagType::DstIp, "0.0.0.0")]));
        assert_eq!(result, Err(ParseError::AmbiguousPattern));
    }

    #[test]
    fn literal_edge_is_preferred_over_a_typed_edge_at_the_same_node() {
        let mut parser = Parser::new(Config::default());
        parser.add(seq(vec![Token::literal("restart")])).unwrap();
        parser
            .add(seq(vec![Token::new(TokenType::String, TagType::Object, "x")]))
            .unwrap();
        let matched = parser.parse(&[Token::literal("restart")]).unwrap();
        assert_eq!(matched.pattern.rendered(), "restart");
    }

    #[rstest]
    #[case(vec![Token::literal("nope")])]
    #[case(vec![Token::literal("a")])]
    #[case(vec![Token::literal("a"), Token::literal("b"), Token::literal("c")])]
    fn sequences_outside_the_known_pattern_set_are_no_match(#[case] input: Vec<Token>) {
        let mut parser = Parser::new(Config::default());
        parser.add(seq(vec![Token::literal("ok")])).unwrap();
        parser
            .add(seq(vec![Token::literal("a"), Token::literal("b")]))
            .unwrap();
        assert_eq!(parser.parse(&input), Err(ParseError::NoMatch));
    }
}
