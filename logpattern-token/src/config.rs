use std::collections::{HashMap, HashSet};

use crate::tag::TagType;
use crate::token::TokenType;

/// Pattern-rendering syntax. `Seq` is the toolchain's native `%tag%` form;
/// `Grok` is the `%{TYPE:tag}` form consumed by Grok-based tools downstream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaceholderSyntax {
    Seq,
    Grok,
}

/// Minimum example count an `AnalyzerResult` must reach before it is worth
/// emitting downstream. `Relative` is evaluated against the total number of
/// records processed in the run that produced the count.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ThresholdPolicy {
    Absolute(usize),
    Relative(f64),
}

impl ThresholdPolicy {
    /// The minimum example count required, given the total number of
    /// records seen in this run.
    pub fn threshold(&self, total_records: usize) -> usize {
        match self {
            ThresholdPolicy::Absolute(n) => *n,
            ThresholdPolicy::Relative(fraction) => {
                ((total_records as f64) * fraction).ceil() as usize
            }
        }
    }

    pub fn clears(&self, count: usize, total_records: usize) -> bool {
        count >= self.threshold(total_records).max(1)
    }
}

/// Process-wide, read-only-after-construction configuration threaded
/// through every Scanner/Parser/Analyzer constructor. Built once, normally
/// by `logpattern-config`'s layered TOML loader; the `Default` impl here
/// supplies the same values as the toolchain's built-in defaults file so
/// library consumers that don't need file-based config can skip it.
#[derive(Debug, Clone)]
pub struct Config {
    pub mark_spaces: bool,
    pub placeholder_syntax: PlaceholderSyntax,
    pub tag_type_map: HashMap<String, TokenType>,
    pub threshold_policy: ThresholdPolicy,
    pub http_methods: HashSet<String>,
}

impl Config {
    /// Resolve the lexical type a `%tag%` placeholder should carry: an
    /// explicit `tagTypeMap` entry wins, otherwise fall back to the tag's
    /// own built-in default.
    pub fn token_type_for_tag(&self, tag: &TagType) -> TokenType {
        self.tag_type_map
            .get(&tag.base_name())
            .copied()
            .unwrap_or_else(|| tag.default_token_type())
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            mark_spaces: true,
            placeholder_syntax: PlaceholderSyntax::Seq,
            tag_type_map: default_tag_type_map(),
            threshold_policy: ThresholdPolicy::Absolute(1),
            http_methods: default_http_methods(),
        }
    }
}

fn default_tag_type_map() -> HashMap<String, TokenType> {
    use TokenType::*;
    [
        ("srcip", IPv4),
        ("dstip", IPv4),
        ("ipv6", IPv6),
        ("srcmac", MacAddress),
        ("dstmac", MacAddress),
        ("srcport", Integer),
        ("dstport", Integer),
        ("integer", Integer),
        ("size", Integer),
        ("float", Float),
        ("duration", Float),
        ("time", Time),
        ("uri", Uri),
        ("string", String),
        ("object", String),
        ("srchost", String),
        ("dsthost", String),
        ("protocol", String),
        ("method", String),
        ("action", String),
        ("status", String),
        ("srcuser", String),
        ("dstuser", String),
    ]
    .into_iter()
    .map(|(k, v)| (k.to_string(), v))
    .collect()
}

fn default_http_methods() -> HashSet<String> {
    [
        "GET", "POST", "PUT", "DELETE", "HEAD", "OPTIONS", "PATCH", "CONNECT", "TRACE",
    ]
    .into_iter()
    .map(String::from)
    .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absolute_threshold_ignores_total() {
        let policy = ThresholdPolicy::Absolute(5);
        assert_eq!(policy.threshold(1_000_000), 5);
        assert!(policy.clears(5, 1));
        assert!(!policy.clears(4, 1_000_000));
    }

    #[test]
    fn relative_threshold_scales_with_total() {
        let policy = ThresholdPolicy::Relative(0.1);
        assert_eq!(policy.threshold(100), 10);
        assert_eq!(policy.threshold(5), 1);
    }

    #[test]
    fn tag_type_map_overrides_builtin_default() {
        let mut config = Config::default();
        assert_eq!(
            config.token_type_for_tag(&TagType::Custom("multiline".into())),
            TokenType::String
        );
        config
            .tag_type_map
            .insert("multiline".to_string(), TokenType::Other);
        assert_eq!(
            config.token_type_for_tag(&TagType::Custom("multiline".into())),
            TokenType::Other
        );
    }
}
