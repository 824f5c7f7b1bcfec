//! Line-delimited record readers feeding the `learn` driver.

use std::fs;
use std::io;
use std::path::Path;

use logpattern_analyze::LogRecord;

/// Input framing. Text records carry a caller-supplied service tag for
/// every line; JSON records derive their tag from a field in the envelope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
#[clap(rename_all = "lowercase")]
pub enum InputFormat {
    Text,
    Json,
}

/// Read every non-blank line of `path` into a [`LogRecord`].
///
/// Text mode tags every record with `default_service`. JSON mode parses
/// each line as a JSON object and reads `service_field` out of it, falling
/// back to `default_service` when the field is absent or not a string.
pub fn read_records(
    path: impl AsRef<Path>,
    format: InputFormat,
    default_service: &str,
    service_field: &str,
) -> io::Result<Vec<LogRecord>> {
    let text = fs::read_to_string(path)?;
    let records = text
        .lines()
        .filter(|line| !line.trim().is_empty())
        .map(|line| match format {
            InputFormat::Text => LogRecord::new(line.to_string(), default_service.to_string()),
            InputFormat::Json => {
                let service = serde_json::from_str::<serde_json::Value>(line)
                    .ok()
                    .and_then(|value| value.get(service_field)?.as_str().map(str::to_string))
                    .unwrap_or_else(|| default_service.to_string());
                LogRecord::new(line.to_string(), service)
            }
        })
        .collect();
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn text_records_all_share_the_default_service() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "first line\n\nsecond line").unwrap();
        let records = read_records(file.path(), InputFormat::Text, "sshd", "service").unwrap();
        assert_eq!(records.len(), 2);
        assert!(records.iter().all(|r| r.service == "sshd"));
    }

    #[test]
    fn json_records_read_the_service_field() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, r#"{{"service":"httpd","msg":"ok"}}"#).unwrap();
        writeln!(file, r#"{{"msg":"no service field"}}"#).unwrap();
        let records = read_records(file.path(), InputFormat::Json, "unknown", "service").unwrap();
        assert_eq!(records[0].service, "httpd");
        assert_eq!(records[1].service, "unknown");
    }
}
