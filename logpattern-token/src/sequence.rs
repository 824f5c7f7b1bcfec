use std::collections::HashMap;
use std::fmt;
use std::hash::{Hash, Hasher};

use crate::config::{Config, PlaceholderSyntax};
use crate::tag::TagType;
use crate::token::{Token, TokenType};

/// An ordered, possibly empty list of tokens produced by a scan of one log
/// line. Valid only until the next `scan*` call on the Scanner that
/// produced it, per the Scanner's buffer-reuse contract — callers that need
/// to keep it around (e.g. to feed both the Parser and the Analyzer) must
/// clone it first.
pub type Sequence = Vec<Token>;

/// A `Sequence` used as a prototype for matching or rendering. Equality is
/// defined as equality of the rendered pattern string, not of the
/// underlying tokens — two differently-tokenized sequences that render
/// identically are the same pattern.
#[derive(Debug, Clone)]
pub struct Pattern {
    pub sequence: Sequence,
    rendered: String,
}

impl Pattern {
    pub fn new(sequence: Sequence, config: &Config) -> Self {
        let rendered = render(&sequence, config);
        Pattern { sequence, rendered }
    }

    pub fn rendered(&self) -> &str {
        &self.rendered
    }
}

impl PartialEq for Pattern {
    fn eq(&self, other: &Self) -> bool {
        self.rendered == other.rendered
    }
}

impl Eq for Pattern {}

impl Hash for Pattern {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.rendered.hash(state);
    }
}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.rendered)
    }
}

/// Render a `Sequence` to its pattern string: literals verbatim, typed
/// tokens replaced by a `%tag%` or `%{TYPE:tag}` placeholder depending on
/// `config.placeholder_syntax`. A single space is inserted before any token
/// (literal or placeholder) whose `space_before` is set. Pure function of
/// its inputs — the same sequence and config always render identically.
pub fn render(sequence: &[Token], config: &Config) -> String {
    let suffixes = assign_tag_suffixes(sequence);
    let mut out = String::new();

    for (i, token) in sequence.iter().enumerate() {
        if token.space_before && !out.is_empty() {
            out.push(' ');
        }
        if token.is_typed() {
            let name = tag_display_name(token, suffixes[i]);
            match config.placeholder_syntax {
                PlaceholderSyntax::Seq => {
                    out.push('%');
                    out.push_str(&name);
                    out.push('%');
                }
                PlaceholderSyntax::Grok => {
                    out.push_str("%{");
                    out.push_str(grok_type(token));
                    out.push(':');
                    out.push_str(&name);
                    out.push('}');
                }
            }
        } else {
            out.push_str(&token.value);
        }
    }

    out
}

/// Base tag name a token should render under, ignoring numeric
/// disambiguation. Tokens tagged `Unknown` (the common case for a token
/// fresh off the Scanner, before the Parser or Analyzer has attached a
/// domain tag) fall back to a name derived from their lexical type.
fn effective_tag_name(token: &Token) -> String {
    match &token.tag {
        TagType::Unknown => fallback_name_for_type(token.token_type).to_string(),
        tag => tag.base_name(),
    }
}

fn fallback_name_for_type(token_type: TokenType) -> &'static str {
    match token_type {
        TokenType::String => "string",
        TokenType::IPv4 => "ipv4",
        TokenType::IPv6 => "ipv6",
        TokenType::Integer => "integer",
        TokenType::Float => "float",
        TokenType::Hex => "hex",
        TokenType::MacAddress => "mac",
        TokenType::Time => "time",
        TokenType::Uri => "uri",
        TokenType::Email => "email",
        TokenType::Literal | TokenType::Quote | TokenType::Comma | TokenType::Equals
        | TokenType::Other => "string",
    }
}

/// For each token position, the numeric suffix (0 = no suffix) to append to
/// its base tag name so that repeated tags within one sequence get distinct
/// rendered names (`string`, `string1`, `string2`, ...), assigned in order
/// of first appearance.
fn assign_tag_suffixes(sequence: &[Token]) -> Vec<usize> {
    let mut seen: HashMap<String, usize> = HashMap::new();
    sequence
        .iter()
        .map(|token| {
            if !token.is_typed() {
                return 0;
            }
            let name = effective_tag_name(token);
            let count = seen.entry(name).or_insert(0);
            let suffix = *count;
            *count += 1;
            suffix
        })
        .collect()
}

fn tag_display_name(token: &Token, suffix: usize) -> String {
    let base = effective_tag_name(token);
    if suffix == 0 {
        base
    } else {
        format!("{}{}", base, suffix)
    }
}

/// Grok `TYPE` for a typed token. Domain host tags always render as
/// `HOSTNAME` regardless of lexical type (a hostname lexes as a generic
/// string, but its role is unambiguous). A tag name the toolchain doesn't
/// recognize (`TagType::Custom`) is assumed to be an open-ended remainder
/// field and renders as `GREEDYDATA`; a recognized generic tag (`object`,
/// `string`, or an untagged token) renders as the bounded `DATA`. All other
/// lexical types map onto their natural Grok counterpart.
fn grok_type(token: &Token) -> &'static str {
    match &token.tag {
        TagType::SrcHost | TagType::DstHost => "HOSTNAME",
        TagType::Custom(_) => "GREEDYDATA",
        _ => match token.token_type {
            TokenType::IPv4 | TokenType::IPv6 => "IP",
            TokenType::MacAddress => "MAC",
            TokenType::Integer => "INT",
            TokenType::Float => "NUMBER",
            TokenType::Time => "TIMESTAMP",
            TokenType::Email => "EMAIL",
            TokenType::Uri => "URIPATH",
            TokenType::Hex => "BASE16NUM",
            _ => "DATA",
        },
    }
}
