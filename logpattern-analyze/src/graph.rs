use std::collections::{HashMap, HashSet};

use logpattern_token::{Config, Pattern, Sequence, TagType, Token, TokenType};

use crate::error::AnalyzerError;

/// The discriminator a token contributes to its position's column: the
/// lowercased text for scaffolding tokens, or the lexical type for typed
/// ones. Two sequences agree at a position iff their discriminators there
/// are equal.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
enum Discriminator {
    Literal(String),
    Typed(TokenType),
}

fn discriminator(token: &Token) -> Discriminator {
    if token.is_typed() {
        Discriminator::Typed(token.token_type)
    } else {
        Discriminator::Literal(token.lowered_value())
    }
}

#[derive(Default)]
struct Column {
    /// Example text for a literal discriminator, keyed by the discriminator
    /// itself so the first-seen original casing survives even though
    /// matching happens on the lowercased form.
    literal_text: HashMap<String, String>,
    counts: HashMap<Discriminator, usize>,
}

/// What an emitted pattern should carry at one position, decided once at
/// `finalize` from the full corpus seen at that position.
#[derive(Debug, Clone, PartialEq)]
enum ColumnDecision {
    Literal(String),
    Typed(TokenType),
    Generic,
}

/// Type priority used when a column's divergent alternatives don't all
/// share one `TokenType` but are all drawn from this compatible set: the
/// most specific type observed wins.
const TYPE_PRIORITY: [TokenType; 4] = [
    TokenType::IPv4,
    TokenType::MacAddress,
    TokenType::Integer,
    TokenType::String,
];

/// Key-name → domain tag table used by the post-`finalize` tag-assignment
/// pass: a typed placeholder immediately preceded by one of these literal
/// words is retagged, provided the tag's own default type matches the
/// placeholder's actual type.
const KEY_NAME_TAGS: &[(&str, TagType)] = &[
    ("src", TagType::SrcIp),
    ("from", TagType::SrcIp),
    ("sport", TagType::SrcPort),
    ("port", TagType::SrcPort),
    ("user", TagType::SrcUser),
    ("proto", TagType::Protocol),
    ("method", TagType::Method),
];

/// Ingests a corpus of token sequences and, once finalized, generalizes any
/// previously-added sequence into a minimal pattern.
///
/// Internally this is a set of per-position columns rather than a branching
/// trie: the generalization rule in §4.3 only ever asks "what did every
/// sequence carry at position *i*", a question answered by that position's
/// marginal distribution, not by the path taken to reach it.
pub struct Analyzer {
    config: Config,
    columns: Vec<Column>,
    added_paths: HashSet<Vec<Discriminator>>,
    decisions: Option<Vec<ColumnDecision>>,
}

impl Analyzer {
    pub fn new(config: Config) -> Self {
        Analyzer {
            config,
            columns: Vec::new(),
            added_paths: HashSet::new(),
            decisions: None,
        }
    }

    pub fn add(&mut self, sequence: Sequence) -> Result<(), AnalyzerError> {
        if self.decisions.is_some() {
            return Err(AnalyzerError::AnalyzerFrozen);
        }
        if self.columns.len() < sequence.len() {
            self.columns.resize_with(sequence.len(), Column::default);
        }
        let mut path = Vec::with_capacity(sequence.len());
        for (i, token) in sequence.iter().enumerate() {
            let disc = discriminator(token);
            let column = &mut self.columns[i];
            *column.counts.entry(disc.clone()).or_insert(0) += 1;
            if let Discriminator::Literal(lowered) = &disc {
                column
                    .literal_text
                    .entry(lowered.clone())
                    .or_insert_with(|| token.value.clone());
            }
            path.push(disc);
        }
        self.added_paths.insert(path);
        Ok(())
    }

    pub fn finalize(&mut self) {
        let decisions = self.columns.iter().map(decide_column).collect();
        self.decisions = Some(decisions);
    }

    pub fn analyze(&self, sequence: &[Token]) -> Result<Pattern, AnalyzerError> {
        let decisions = self.decisions.as_ref().ok_or(AnalyzerError::NotFinalized)?;

        let path: Vec<Discriminator> = sequence.iter().map(discriminator).collect();
        if !self.added_paths.contains(&path) {
            return Err(AnalyzerError::NotInCorpus);
        }

        let mut generalized: Sequence = sequence
            .iter()
            .enumerate()
            .map(|(i, token)| render_decision(&decisions[i], token))
            .collect();

        assign_domain_tags(&mut generalized);

        Ok(Pattern::new(generalized, &self.config))
    }
}

fn decide_column(column: &Column) -> ColumnDecision {
    if column.counts.len() == 1 {
        if let Discriminator::Literal(lowered) = column.counts.keys().next().unwrap() {
            let text = column.literal_text.get(lowered).cloned().unwrap_or_else(|| lowered.clone());
            return ColumnDecision::Literal(text);
        }
    }

    let types: HashSet<TokenType> = column
        .counts
        .keys()
        .map(|d| match d {
            Discriminator::Literal(_) => TokenType::Literal,
            Discriminator::Typed(t) => *t,
        })
        .collect();

    if types.contains(&TokenType::Literal) {
        // Divergent literal values, or a mix of literal and typed
        // alternatives: neither generalizes to a placeholder type.
        return ColumnDecision::Generic;
    }

    if types.len() == 1 {
        return ColumnDecision::Typed(*types.iter().next().unwrap());
    }

    if types.iter().all(|t| TYPE_PRIORITY.contains(t)) {
        for candidate in TYPE_PRIORITY {
            if types.contains(&candidate) {
                return ColumnDecision::Typed(candidate);
            }
        }
    }

    ColumnDecision::Generic
}

fn render_decision(decision: &ColumnDecision, original: &Token) -> Token {
    match decision {
        ColumnDecision::Literal(text) => Token::literal(text.clone()).with_space_before(original.space_before),
        ColumnDecision::Typed(token_type) => {
            Token::new(*token_type, TagType::Unknown, original.value.clone())
                .with_space_before(original.space_before)
        }
        ColumnDecision::Generic => {
            Token::new(TokenType::String, TagType::Unknown, original.value.clone())
                .with_space_before(original.space_before)
        }
    }
}

fn assign_domain_tags(sequence: &mut Sequence) {
    for i in 1..sequence.len() {
        if !sequence[i].is_typed() {
            continue;
        }
        let preceding_word = sequence[i - 1].lowered_value();
        let current_type = sequence[i].token_type;
        if let Some((_, tag)) = KEY_NAME_TAGS
            .iter()
            .find(|(word, tag)| *word == preceding_word && tag.default_token_type() == current_type)
        {
            sequence[i].tag = tag.clone();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use logpattern_token::TokenType;

    fn line(words: &[&str]) -> Sequence {
        let mut seq = Vec::new();
        for (i, w) in words.iter().enumerate() {
            seq.push(classify_word(w).with_space_before(i > 0));
        }
        seq
    }

    fn classify_word(w: &str) -> Token {
        if w.parse::<i64>().is_ok() {
            Token::new(TokenType::Integer, TagType::Unknown, w)
        } else if w.split('.').count() == 4 && w.split('.').all(|p| p.parse::<u8>().is_ok()) {
            Token::new(TokenType::IPv4, TagType::Unknown, w)
        } else {
            Token::literal(w)
        }
    }

    #[test]
    fn unanimous_literal_column_stays_literal() {
        let mut analyzer = Analyzer::new(Config::default());
        analyzer.add(line(&["restart", "ok"])).unwrap();
        analyzer.add(line(&["restart", "ok"])).unwrap();
        analyzer.finalize();
        let pattern = analyzer.analyze(&line(&["restart", "ok"])).unwrap();
        assert_eq!(pattern.rendered(), "restart ok");
    }

    #[test]
    fn divergent_same_type_column_becomes_placeholder() {
        let mut analyzer = Analyzer::new(Config::default());
        analyzer.add(line(&["from", "10"])).unwrap();
        analyzer.add(line(&["from", "20"])).unwrap();
        analyzer.finalize();
        let pattern = analyzer.analyze(&line(&["from", "10"])).unwrap();
        assert_eq!(pattern.rendered(), "from %integer%");
    }

    #[test]
    fn divergent_literal_values_become_generic_string() {
        let mut analyzer = Analyzer::new(Config::default());
        analyzer.add(line(&["user", "alice"])).unwrap();
        analyzer.add(line(&["user", "bob"])).unwrap();
        analyzer.finalize();
        let pattern = analyzer.analyze(&line(&["user", "alice"])).unwrap();
        assert_eq!(pattern.rendered(), "user %string%");
    }

    #[test]
    fn mixed_ipv4_and_integer_prefers_ipv4() {
        let mut analyzer = Analyzer::new(Config::default());
        analyzer.add(line(&["from", "10.0.0.1"])).unwrap();
        analyzer.add(line(&["from", "4228"])).unwrap();
        analyzer.finalize();
        let pattern = analyzer.analyze(&line(&["from", "10.0.0.1"])).unwrap();
        assert_eq!(pattern.rendered(), "from %ipv4%");
    }

    #[test]
    fn key_name_preceding_a_placeholder_assigns_a_domain_tag() {
        let mut analyzer = Analyzer::new(Config::default());
        analyzer.add(line(&["src", "10.0.0.1"])).unwrap();
        analyzer.add(line(&["src", "10.0.0.2"])).unwrap();
        analyzer.finalize();
        let pattern = analyzer.analyze(&line(&["src", "10.0.0.1"])).unwrap();
        assert_eq!(pattern.rendered(), "src %srcip%");
    }

    #[test]
    fn add_after_finalize_is_frozen() {
        let mut analyzer = Analyzer::new(Config::default());
        analyzer.add(line(&["a"])).unwrap();
        analyzer.finalize();
        assert_eq!(analyzer.add(line(&["b"])), Err(AnalyzerError::AnalyzerFrozen));
    }

    #[test]
    fn unseen_sequence_is_not_in_corpus() {
        let mut analyzer = Analyzer::new(Config::default());
        analyzer.add(line(&["a"])).unwrap();
        analyzer.finalize();
        assert_eq!(analyzer.analyze(&line(&["z"])), Err(AnalyzerError::NotInCorpus));
    }

    #[test]
    fn analyze_before_finalize_is_rejected() {
        let mut analyzer = Analyzer::new(Config::default());
        analyzer.add(line(&["a"])).unwrap();
        assert_eq!(analyzer.analyze(&line(&["a"])), Err(AnalyzerError::NotFinalized));
    }

    proptest::proptest! {
        #[test]
        fn any_two_distinct_integers_in_the_same_column_generalize_to_integer(a in 0i64..100_000, b in 0i64..100_000) {
            proptest::prop_assume!(a != b);
            let mut analyzer = Analyzer::new(Config::default());
            analyzer.add(line(&["count", &a.to_string()])).unwrap();
            analyzer.add(line(&["count", &b.to_string()])).unwrap();
            analyzer.finalize();
            let pattern = analyzer.analyze(&line(&["count", &a.to_string()])).unwrap();
            proptest::prop_assert_eq!(pattern.rendered(), "count %integer%");
        }
    }
}
