//! Reader/writer for the persisted pattern file.

use std::fmt;
use std::fs;
use std::io::{self, Write};
use std::path::Path;

use logpattern_parse::{ParseError, Parser};
use logpattern_scan::{LexError, Scanner};
use logpattern_token::{Config, Pattern};

/// Failure loading a pattern file. Carries the offending line number so a
/// caller can point the user at the bad entry.
#[derive(Debug)]
pub enum LoadError {
    Io(io::Error),
    Lex { line: usize, source: LexError },
    Parse { line: usize, source: ParseError },
}

impl fmt::Display for LoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoadError::Io(e) => write!(f, "{}", e),
            LoadError::Lex { line, source } => write!(f, "line {}: {}", line, source),
            LoadError::Parse { line, source } => write!(f, "line {}: {}", line, source),
        }
    }
}

impl std::error::Error for LoadError {}

impl From<io::Error> for LoadError {
    fn from(e: io::Error) -> Self {
        LoadError::Io(e)
    }
}

/// One block to emit to the pattern file: the rendered pattern plus the
/// stats the driver accumulated for it this run.
pub struct PatternFileEntry {
    pub pattern: String,
    pub example_count: usize,
    pub example: String,
}

/// Load a pattern file into a fresh [`Parser`], skipping blank lines and
/// `#`-prefixed comments. Every remaining line is scanned in pattern mode
/// (recognizing `%tag%` placeholders) and registered with the parser.
pub fn load_patterns(path: impl AsRef<Path>, config: Config) -> Result<(Parser, Vec<Pattern>), LoadError> {
    let text = fs::read_to_string(path)?;
    let mut scanner = Scanner::new(config.clone());
    let mut parser = Parser::new(config);
    let mut patterns = Vec::new();

    for (i, line) in text.lines().enumerate() {
        let line_no = i + 1;
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        let sequence = scanner
            .scan(line, true, &[])
            .map_err(|source| LoadError::Lex { line: line_no, source })?;
        let pattern = Pattern::new(sequence.clone(), scanner.config());
        parser
            .add(sequence)
            .map_err(|source| LoadError::Parse { line: line_no, source })?;
        patterns.push(pattern);
    }

    Ok((parser, patterns))
}

/// Overwrite `path` with one three-line block per entry: the rendered
/// pattern, a `# N log messages matched` comment, and a `# <example>`
/// comment, separated by blank lines.
pub fn write_patterns(path: impl AsRef<Path>, entries: &[PatternFileEntry]) -> io::Result<()> {
    let mut file = fs::File::create(path)?;
    for entry in entries {
        writeln!(file, "{}", entry.pattern)?;
        writeln!(file, "# {} log messages matched", entry.example_count)?;
        writeln!(file, "# {}", entry.example)?;
        writeln!(file)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_lines_and_comments_are_skipped() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "# a comment\n\nFailed password for %srcuser%\n").unwrap();
        let (parser, patterns) = load_patterns(file.path(), Config::default()).unwrap();
        assert_eq!(patterns.len(), 1);
        assert_eq!(parser.len(), 1);
    }

    #[test]
    fn duplicate_pattern_reports_its_line_number() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "Failed password\nFailed password\n").unwrap();
        let err = load_patterns(file.path(), Config::default()).unwrap_err();
        match err {
            LoadError::Parse { line, source } => {
                assert_eq!(line, 2);
                assert_eq!(source, ParseError::DuplicatePattern);
            }
            other => panic!("expected a Parse error, got {:?}", other),
        }
    }

    #[test]
    fn write_patterns_emits_the_three_line_block() {
        let file = tempfile::NamedTempFile::new().unwrap();
        let entries = vec![PatternFileEntry {
            pattern: "Failed password for %srcuser%".to_string(),
            example_count: 7,
            example: "Failed password for root".to_string(),
        }];
        write_patterns(file.path(), &entries).unwrap();
        let written = fs::read_to_string(file.path()).unwrap();
        assert_eq!(
            written,
            "Failed password for %srcuser%\n# 7 log messages matched\n# Failed password for root\n\n"
        );
    }
}
