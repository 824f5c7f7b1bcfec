use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnalyzerError {
    /// `add` called after `finalize`.
    AnalyzerFrozen,
    /// `analyze` called before `finalize`.
    NotFinalized,
    /// The given sequence has no corresponding path in the corpus.
    NotInCorpus,
}

impl fmt::Display for AnalyzerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let msg = match self {
            AnalyzerError::AnalyzerFrozen => "analyzer is finalized; no further sequences can be added",
            AnalyzerError::NotFinalized => "analyzer must be finalized before analyze() is called",
            AnalyzerError::NotInCorpus => "sequence was never added to this analyzer's corpus",
        };
        f.write_str(msg)
    }
}

impl std::error::Error for AnalyzerError {}
