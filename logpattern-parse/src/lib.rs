//! Trie-based pattern store.
//!
//! A [`Parser`] holds a set of known pattern [`logpattern_token::Sequence`]s
//! in a discriminator-keyed trie and answers, for an incoming sequence,
//! whether it matches a known pattern and with what fields bound. See
//! [`trie::Parser`] for the matching algorithm and its invariants.

mod error;
mod trie;

pub use error::ParseError;
pub use trie::{Matched, Parser};
