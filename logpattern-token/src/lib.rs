//! Shared token, tag and sequence model for the logpattern toolchain.
//!
//! This crate has no notion of *how* a [`Token`] was produced (that's
//! `logpattern-scan`), how a [`Sequence`] is matched against known shapes
//! (`logpattern-parse`), or how new patterns are synthesized from a corpus
//! (`logpattern-analyze`). It only defines the vocabulary those three crates
//! share: the closed [`TokenType`]/[`TagType`] enumerations, the [`Token`]
//! and [`Sequence`]/[`Pattern`] records, and the runtime [`Config`] threaded
//! through every constructor in the toolchain.

mod config;
mod sequence;
mod tag;
mod token;

pub use config::{Config, PlaceholderSyntax, ThresholdPolicy};
pub use sequence::{render, Pattern, Sequence};
pub use tag::TagType;
pub use token::{Token, TokenType};
