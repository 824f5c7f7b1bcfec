//! Inductive pattern synthesis over a corpus of token sequences.
//!
//! An [`Analyzer`] ingests [`logpattern_token::Sequence`]s that the
//! [`logpattern_parse::Parser`] couldn't match, then — once [`Analyzer::finalize`]
//! closes the corpus — generalizes any previously-added sequence into a
//! minimal pattern by replacing positions that vary across the corpus with
//! typed placeholders. See [`graph`] for the generalization rule.

mod error;
mod graph;
mod result;

pub use error::AnalyzerError;
pub use graph::Analyzer;
pub use result::{AnalyzerResult, LogRecord};
