//! Layered configuration loader for the logpattern toolchain.
//!
//! `defaults/logpattern.default.toml` is embedded into every binary so docs
//! and runtime behavior stay in sync. Applications layer an optional
//! user file and CLI overrides on top of those defaults via [`Loader`]
//! before converting the result into [`logpattern_token::Config`].

use std::collections::{HashMap, HashSet};
use std::path::Path;

use config::builder::DefaultState;
use config::{ConfigBuilder, ConfigError, File, FileFormat, ValueKind};
use logpattern_token::{Config, PlaceholderSyntax, ThresholdPolicy, TokenType};
use serde::Deserialize;

const DEFAULT_TOML: &str = include_str!("../defaults/logpattern.default.toml");

#[derive(Debug, Deserialize)]
struct RawConfig {
    scanner: RawScanner,
    threshold: RawThreshold,
    tag_type_map: HashMap<String, TokenType>,
}

#[derive(Debug, Deserialize)]
struct RawScanner {
    mark_spaces: bool,
    placeholder_syntax: RawPlaceholderSyntax,
    http_methods: Vec<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "lowercase")]
enum RawPlaceholderSyntax {
    Seq,
    Grok,
}

#[derive(Debug, Deserialize)]
struct RawThreshold {
    policy: RawThresholdPolicy,
    absolute: usize,
    relative: f64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "lowercase")]
enum RawThresholdPolicy {
    Absolute,
    Relative,
}

impl From<RawConfig> for Config {
    fn from(raw: RawConfig) -> Self {
        Config {
            mark_spaces: raw.scanner.mark_spaces,
            placeholder_syntax: match raw.scanner.placeholder_syntax {
                RawPlaceholderSyntax::Seq => PlaceholderSyntax::Seq,
                RawPlaceholderSyntax::Grok => PlaceholderSyntax::Grok,
            },
            tag_type_map: raw.tag_type_map,
            threshold_policy: match raw.threshold.policy {
                RawThresholdPolicy::Absolute => ThresholdPolicy::Absolute(raw.threshold.absolute),
                RawThresholdPolicy::Relative => ThresholdPolicy::Relative(raw.threshold.relative),
            },
            http_methods: raw.scanner.http_methods.into_iter().collect::<HashSet<_>>(),
        }
    }
}

/// Builds a [`Config`] by layering sources over the embedded defaults, the
/// same shape as the teacher toolchain's own configuration loader: defaults
/// first, then an optional user file, then individual CLI overrides.
#[derive(Debug, Clone)]
pub struct Loader {
    builder: ConfigBuilder<DefaultState>,
}

impl Loader {
    pub fn new() -> Self {
        let builder = config::Config::builder().add_source(File::from_str(DEFAULT_TOML, FileFormat::Toml));
        Loader { builder }
    }

    /// Layer a configuration file. Missing files are an error.
    pub fn with_file(mut self, path: impl AsRef<Path>) -> Self {
        let source = File::from(path.as_ref()).format(FileFormat::Toml).required(true);
        self.builder = self.builder.add_source(source);
        self
    }

    /// Layer an optional configuration file (ignored if absent).
    pub fn with_optional_file(mut self, path: impl AsRef<Path>) -> Self {
        let source = File::from(path.as_ref()).format(FileFormat::Toml).required(false);
        self.builder = self.builder.add_source(source);
        self
    }

    pub fn set_override<I>(mut self, key: &str, value: I) -> Result<Self, ConfigError>
    where
        I: Into<ValueKind>,
    {
        self.builder = self.builder.set_override(key, value)?;
        Ok(self)
    }

    pub fn build(self) -> Result<Config, ConfigError> {
        let raw: RawConfig = self.builder.build()?.try_deserialize()?;
        Ok(raw.into())
    }
}

impl Default for Loader {
    fn default() -> Self {
        Self::new()
    }
}

/// Convenience helper for callers that only need the built-in defaults.
pub fn load_defaults() -> Result<Config, ConfigError> {
    Loader::new().build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn loads_built_in_defaults() {
        let config = load_defaults().expect("defaults to deserialize");
        assert!(config.mark_spaces);
        assert_eq!(config.placeholder_syntax, PlaceholderSyntax::Seq);
        assert_eq!(config.threshold_policy, ThresholdPolicy::Absolute(1));
        assert_eq!(config.token_type_for_tag(&logpattern_token::TagType::SrcIp), TokenType::IPv4);
    }

    #[test]
    fn user_file_overrides_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[scanner]\nmark_spaces = false\nplaceholder_syntax = \"grok\"\nhttp_methods = [\"GET\"]\n").unwrap();
        writeln!(file, "[threshold]\npolicy = \"relative\"\nabsolute = 1\nrelative = 0.1\n").unwrap();
        let config = Loader::new()
            .with_file(file.path())
            .build()
            .expect("layered config to build");
        assert!(!config.mark_spaces);
        assert_eq!(config.placeholder_syntax, PlaceholderSyntax::Grok);
        assert_eq!(config.threshold_policy, ThresholdPolicy::Relative(0.1));
        assert!(config.http_methods.contains("GET"));
        assert!(!config.http_methods.contains("POST"));
    }

    #[test]
    fn missing_optional_file_is_ignored() {
        let config = Loader::new()
            .with_optional_file("/nonexistent/logpattern.toml")
            .build()
            .expect("missing optional file should not error");
        assert!(config.mark_spaces);
    }

    #[test]
    fn override_sets_a_single_key() {
        let config = Loader::new()
            .set_override("scanner.mark_spaces", false)
            .unwrap()
            .build()
            .unwrap();
        assert!(!config.mark_spaces);
    }
}
