//! Hand-written, regex-free sequential scanner.
//!
//! [`Scanner`] converts a raw log line, or a JSON log envelope, into a
//! [`Sequence`] of [`logpattern_token::Token`]s in one left-to-right pass
//! with O(1) lookahead. Lexical category detection is a flat priority chain
//! of `try_*` functions (see [`classify`] and [`timestamp`]), never a
//! generated state machine or a regex engine — this is the one place in the
//! toolchain where dispatch order is itself part of the public contract.

mod classify;
mod error;
mod json;
mod text;
mod timestamp;

pub use error::{JsonError, JsonErrorKind, LexError};

use logpattern_token::{Config, Sequence};

/// Per-consumer, non-shared tokenizer. Each `scan*` call clears and refills
/// an internal scratch buffer, then returns an owned clone of it — the
/// buffer is retained across calls purely to amortize allocation, not as
/// part of the public contract, so passing a `Sequence` to another thread
/// after the call returns is always safe.
pub struct Scanner {
    config: Config,
    buffer: Sequence,
}

impl Scanner {
    pub fn new(config: Config) -> Self {
        Scanner {
            config,
            buffer: Vec::new(),
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Tokenize one line of free-form text.
    ///
    /// `is_pattern` recognizes `%tag%` placeholders instead of lexing their
    /// contents; `anchors` are byte offsets that force a token boundary.
    pub fn scan(
        &mut self,
        line: &str,
        is_pattern: bool,
        anchors: &[usize],
    ) -> Result<Sequence, LexError> {
        self.buffer.clear();
        text::scan_into(&mut self.buffer, line, is_pattern, anchors, &self.config)?;
        Ok(self.buffer.clone())
    }

    /// Flatten a JSON object into `key=value` token pairs.
    pub fn scan_json(&mut self, line: &str) -> Result<Sequence, JsonError> {
        self.buffer.clear();
        json::scan_json_into(&mut self.buffer, line, &self.config)?;
        Ok(self.buffer.clone())
    }

    /// Flatten a JSON object the same way as [`Scanner::scan_json`], but
    /// retain `{ } [ ] " , :` as literal punctuation tokens.
    pub fn scan_json_preserve(&mut self, line: &str) -> Result<Sequence, JsonError> {
        self.buffer.clear();
        json::scan_json_preserve_into(&mut self.buffer, line, &self.config)?;
        Ok(self.buffer.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn successive_scans_do_not_leak_tokens_across_calls() {
        let mut scanner = Scanner::new(Config::default());
        let first = scanner.scan("alpha beta", false, &[]).unwrap();
        let second = scanner.scan("gamma", false, &[]).unwrap();
        assert_eq!(first.len(), 2);
        assert_eq!(second.len(), 1);
    }

    #[test]
    fn scan_json_round_trips_a_simple_envelope() {
        let mut scanner = Scanner::new(Config::default());
        let seq = scanner.scan_json(r#"{"user":"alice","retries":3}"#).unwrap();
        assert_eq!(seq[0].value, "user");
        assert_eq!(seq[4].value, "retries");
    }
}
