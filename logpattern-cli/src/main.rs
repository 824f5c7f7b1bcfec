//! Command-line driver wiring the scanner, parser, and analyzer over real
//! files. Contains no matching or synthesis logic of its own — see
//! `logpattern-scan`, `logpattern-parse`, and `logpattern-analyze` for that.

mod patterns;
mod records;

use std::collections::HashMap;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser as ClapParser, Subcommand};
use logpattern_analyze::{Analyzer, AnalyzerResult, LogRecord};
use logpattern_config::Loader;
use logpattern_parse::Parser;
use logpattern_scan::Scanner;
use logpattern_token::{Config, Sequence};

use patterns::{load_patterns, write_patterns, PatternFileEntry};
use records::{read_records, InputFormat};

#[derive(Debug, ClapParser)]
#[command(name = "logpattern", about = "Mine recurring patterns out of log records")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Scan a batch of log records, match them against known patterns, and
    /// synthesize patterns for whatever doesn't match.
    Learn {
        /// Line-delimited log file to learn from.
        #[arg(long)]
        input: PathBuf,
        /// Framing of the input file.
        #[arg(long, value_enum, default_value = "text")]
        format: InputFormat,
        /// Existing pattern file to load before learning (optional).
        #[arg(long)]
        patterns: Option<PathBuf>,
        /// Where to write the updated pattern file.
        #[arg(long)]
        output: PathBuf,
        /// Optional layered TOML config file.
        #[arg(long)]
        config: Option<PathBuf>,
        /// Service tag applied to every text record.
        #[arg(long, default_value = "unknown")]
        service: String,
        /// JSON field holding the per-record service tag.
        #[arg(long, default_value = "service")]
        service_field: String,
    },
    /// Parse a single line against a pattern file.
    Parse {
        /// Line to parse.
        line: String,
        /// Pattern file to match against.
        #[arg(long)]
        patterns: PathBuf,
        /// Framing of `line`.
        #[arg(long, value_enum, default_value = "text")]
        format: InputFormat,
        /// Optional layered TOML config file.
        #[arg(long)]
        config: Option<PathBuf>,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Learn {
            input,
            format,
            patterns,
            output,
            config,
            service,
            service_field,
        } => run_learn(&input, format, patterns.as_deref(), &output, config.as_deref(), &service, &service_field),
        Commands::Parse {
            line,
            patterns,
            format,
            config,
        } => run_parse(&line, &patterns, format, config.as_deref()),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            eprintln!("error: {}", message);
            ExitCode::FAILURE
        }
    }
}

fn load_config(path: Option<&std::path::Path>) -> Result<Config, String> {
    let mut loader = Loader::new();
    if let Some(path) = path {
        loader = loader.with_file(path);
    }
    loader.build().map_err(|e| e.to_string())
}

fn scan_record(scanner: &mut Scanner, line: &str, format: InputFormat) -> Result<Sequence, String> {
    match format {
        InputFormat::Text => scanner.scan(line, false, &[]).map_err(|e| e.to_string()),
        InputFormat::Json => scanner.scan_json(line).map_err(|e| e.to_string()),
    }
}

/// Accumulates the count and capped example list for one rendered pattern
/// on the way to an [`AnalyzerResult`]. `cap` bounds `examples` at the
/// configured threshold (§3: "examples: ordered list of LogRecord (≤
/// threshold)") rather than keeping every match — the threshold already
/// establishes how many examples are enough to justify emitting a pattern,
/// and further ones duplicate the same shape.
struct PatternBucket {
    count: usize,
    examples: Vec<LogRecord>,
    service: String,
}

impl PatternBucket {
    fn new(service: &str) -> Self {
        PatternBucket {
            count: 0,
            examples: Vec::new(),
            service: service.to_string(),
        }
    }

    fn record(&mut self, record: &LogRecord, cap: usize) {
        self.count += 1;
        if self.examples.len() < cap {
            self.examples.push(record.clone());
        }
    }

    fn into_result(self, pattern: String) -> AnalyzerResult {
        AnalyzerResult::new(pattern, self.count, self.examples, self.service)
    }
}

/// Reduce an [`AnalyzerResult`] to the one example the persisted pattern
/// file format (§4.4) carries: the first of its capped examples.
fn result_to_entry(result: AnalyzerResult) -> PatternFileEntry {
    PatternFileEntry {
        pattern: result.pattern,
        example_count: result.example_count,
        example: result.examples.first().map(|r| r.line.clone()).unwrap_or_default(),
    }
}

fn run_learn(
    input: &std::path::Path,
    format: InputFormat,
    existing_patterns: Option<&std::path::Path>,
    output: &std::path::Path,
    config_path: Option<&std::path::Path>,
    default_service: &str,
    service_field: &str,
) -> Result<(), String> {
    let config = load_config(config_path)?;
    let mut scanner = Scanner::new(config.clone());

    let mut parser = match existing_patterns {
        Some(path) => load_patterns(path, config.clone()).map_err(|e| e.to_string())?.0,
        None => Parser::new(config.clone()),
    };
    let mut analyzer = Analyzer::new(config.clone());

    let records = read_records(input, format, default_service, service_field).map_err(|e| e.to_string())?;

    let mut sequences = Vec::with_capacity(records.len());
    for record in &records {
        let sequence = scan_record(&mut scanner, &record.line, format)?;
        if parser.parse(&sequence).is_err() {
            analyzer.add(sequence.clone()).map_err(|e| e.to_string())?;
        }
        sequences.push(sequence);
    }
    analyzer.finalize();

    let total = records.len();
    let cap = config.threshold_policy.threshold(total).max(1);

    let mut known: HashMap<String, PatternBucket> = HashMap::new();
    let mut discovered: HashMap<String, PatternBucket> = HashMap::new();

    for (record, sequence) in records.iter().zip(&sequences) {
        match parser.parse(sequence) {
            Ok(matched) => known
                .entry(matched.pattern.rendered().to_string())
                .or_insert_with(|| PatternBucket::new(&record.service))
                .record(record, cap),
            Err(_) => match analyzer.analyze(sequence) {
                Ok(pattern) => discovered
                    .entry(pattern.rendered().to_string())
                    .or_insert_with(|| PatternBucket::new(&record.service))
                    .record(record, cap),
                Err(e) => eprintln!("warning: {}: {}", e, record.line),
            },
        }
    }

    let mut entries: Vec<PatternFileEntry> = known
        .into_iter()
        .map(|(pattern, bucket)| result_to_entry(bucket.into_result(pattern)))
        .collect();

    let mut accepted_new = 0usize;
    for (pattern, bucket) in discovered {
        if config.threshold_policy.clears(bucket.count, total) {
            accepted_new += 1;
            let result = bucket.into_result(pattern);
            println!(
                "discovered [{}] service={} examples={}: {}",
                result.pattern_id, result.service, result.example_count, result.pattern
            );
            entries.push(result_to_entry(result));
        }
    }
    entries.sort_by(|a, b| a.pattern.cmp(&b.pattern));

    write_patterns(output, &entries).map_err(|e| e.to_string())?;

    println!(
        "{} records processed, {} known patterns, {} new patterns discovered",
        total,
        entries.len() - accepted_new,
        accepted_new
    );
    Ok(())
}

fn run_parse(
    line: &str,
    patterns_path: &std::path::Path,
    format: InputFormat,
    config_path: Option<&std::path::Path>,
) -> Result<(), String> {
    let config = load_config(config_path)?;
    let (parser, _) = load_patterns(patterns_path, config.clone()).map_err(|e| e.to_string())?;
    let mut scanner = Scanner::new(config);
    let sequence = scan_record(&mut scanner, line, format)?;

    match parser.parse(&sequence) {
        Ok(matched) => {
            println!("{}", matched.pattern.rendered());
            let mut fields: Vec<_> = matched.fields.into_iter().collect();
            fields.sort_by(|a, b| a.0.cmp(&b.0));
            for (key, value) in fields {
                println!("  {} = {}", key, value);
            }
        }
        Err(_) => println!("NoMatch"),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn learn_then_parse_round_trips_a_new_pattern() {
        let mut input = tempfile::NamedTempFile::new().unwrap();
        writeln!(input, "Failed password for root").unwrap();
        writeln!(input, "Failed password for admin").unwrap();
        let output = tempfile::NamedTempFile::new().unwrap();

        run_learn(
            input.path(),
            InputFormat::Text,
            None,
            output.path(),
            None,
            "sshd",
            "service",
        )
        .unwrap();

        let written = std::fs::read_to_string(output.path()).unwrap();
        assert!(written.contains("log messages matched"));
    }

    #[test]
    fn scan_record_dispatches_on_format() {
        let mut scanner = Scanner::new(Config::default());
        let text_seq = scan_record(&mut scanner, "hello world", InputFormat::Text).unwrap();
        assert_eq!(text_seq.len(), 2);
        let json_seq = scan_record(&mut scanner, r#"{"a":"b"}"#, InputFormat::Json).unwrap();
        assert!(!json_seq.is_empty());
    }

    #[test]
    fn pattern_bucket_counts_every_match_but_caps_stored_examples() {
        let mut bucket = PatternBucket::new("sshd");
        bucket.record(&LogRecord::new("first", "sshd"), 1);
        bucket.record(&LogRecord::new("second", "sshd"), 1);
        assert_eq!(bucket.count, 2);
        assert_eq!(bucket.examples.len(), 1);
        assert_eq!(bucket.examples[0].line, "first");

        let result = bucket.into_result("pattern".to_string());
        assert_eq!(result.example_count, 2);
        assert_eq!(result.examples.len(), 1);
        assert_eq!(result.service, "sshd");
    }
}
