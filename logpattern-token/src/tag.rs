use serde::{Deserialize, Serialize};

use crate::token::TokenType;

/// Semantic role a token plays in the record, independent of how it lexes.
///
/// The spec calls this a closed enumeration, but the persisted pattern file
/// format (`%tag%`) lets an author write any tag name they like (e.g. the
/// house style `%multiline%` seen in the original tool's config tests). We
/// resolve that tension the idiomatic way: the well-known domain roles are
/// real variants, and anything else falls into `Custom`, so matching on
/// `TagType` stays exhaustive without silently mapping unknown names onto
/// `Unknown` (which would make `%srchost%` and `%bogus%` indistinguishable).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TagType {
    Unknown,
    Object,
    Action,
    Status,
    SrcIp,
    DstIp,
    Ipv6,
    SrcPort,
    DstPort,
    SrcUser,
    DstUser,
    SrcHost,
    DstHost,
    SrcMac,
    DstMac,
    Protocol,
    Method,
    Uri,
    Size,
    Duration,
    String,
    Integer,
    Float,
    Time,
    Custom(String),
}

impl TagType {
    /// Resolve a tag name (as written in a `%tag%` placeholder or produced
    /// by the analyzer's key-name heuristic) to a `TagType` variant.
    pub fn from_name(name: &str) -> TagType {
        match name.to_lowercase().as_str() {
            "unknown" => TagType::Unknown,
            "object" => TagType::Object,
            "action" => TagType::Action,
            "status" => TagType::Status,
            "srcip" => TagType::SrcIp,
            "dstip" => TagType::DstIp,
            "ipv6" => TagType::Ipv6,
            "srcport" => TagType::SrcPort,
            "dstport" => TagType::DstPort,
            "srcuser" => TagType::SrcUser,
            "dstuser" => TagType::DstUser,
            "srchost" => TagType::SrcHost,
            "dsthost" => TagType::DstHost,
            "srcmac" => TagType::SrcMac,
            "dstmac" => TagType::DstMac,
            "protocol" | "proto" => TagType::Protocol,
            "method" => TagType::Method,
            "uri" | "url" => TagType::Uri,
            "size" => TagType::Size,
            "duration" => TagType::Duration,
            "string" => TagType::String,
            "integer" => TagType::Integer,
            "float" => TagType::Float,
            "time" => TagType::Time,
            _ => TagType::Custom(name.to_string()),
        }
    }

    /// The rendered, lowercase tag name used in `%tag%` / `%{TYPE:tag}`
    /// output. This is the base name *before* numeric disambiguation
    /// (`string`, not `string1`) — see [`crate::sequence::render`].
    pub fn base_name(&self) -> String {
        match self {
            TagType::Unknown => "unknown".to_string(),
            TagType::Object => "object".to_string(),
            TagType::Action => "action".to_string(),
            TagType::Status => "status".to_string(),
            TagType::SrcIp => "srcip".to_string(),
            TagType::DstIp => "dstip".to_string(),
            TagType::Ipv6 => "ipv6".to_string(),
            TagType::SrcPort => "srcport".to_string(),
            TagType::DstPort => "dstport".to_string(),
            TagType::SrcUser => "srcuser".to_string(),
            TagType::DstUser => "dstuser".to_string(),
            TagType::SrcHost => "srchost".to_string(),
            TagType::DstHost => "dsthost".to_string(),
            TagType::SrcMac => "srcmac".to_string(),
            TagType::DstMac => "dstmac".to_string(),
            TagType::Protocol => "protocol".to_string(),
            TagType::Method => "method".to_string(),
            TagType::Uri => "uri".to_string(),
            TagType::Size => "size".to_string(),
            TagType::Duration => "duration".to_string(),
            TagType::String => "string".to_string(),
            TagType::Integer => "integer".to_string(),
            TagType::Float => "float".to_string(),
            TagType::Time => "time".to_string(),
            TagType::Custom(name) => name.to_lowercase(),
        }
    }

    /// Built-in fallback lexical type for a tag name, used when the
    /// `tagTypeMap` config option has no explicit entry for it. Mirrors the
    /// examples in the spec (`srcip` -> IPv4, `integer` -> Integer,
    /// `srchost` -> a String host name, unknown tags -> String).
    pub fn default_token_type(&self) -> TokenType {
        match self {
            TagType::SrcIp | TagType::DstIp => TokenType::IPv4,
            TagType::Ipv6 => TokenType::IPv6,
            TagType::SrcMac | TagType::DstMac => TokenType::MacAddress,
            TagType::SrcPort | TagType::DstPort | TagType::Integer | TagType::Size => {
                TokenType::Integer
            }
            TagType::Float | TagType::Duration => TokenType::Float,
            TagType::Uri => TokenType::Uri,
            TagType::Time => TokenType::Time,
            _ => TokenType::String,
        }
    }
}
