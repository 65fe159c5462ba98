//! Configuration
//!
//!     Settings come in three sections: `parser` feeds [`ParseOptions`], `input` drives
//!     [`prepare_source`](crate::yapl::source::prepare_source), and `output` picks how the
//!     binary prints trees and token streams.
//!
//!     Resolution order, lowest first:
//!
//!         defaults/yapl.default.toml     compiled in, always present
//!         --config FILE                  any subset of keys
//!         command-line flags             single-key overrides (--format, --no-locations)

use config::builder::DefaultState;
use config::{Config, ConfigBuilder, ConfigError, File, FileFormat, ValueKind};
use serde::Deserialize;
use std::path::Path;

use crate::yapl::parsing::ParseOptions;

const DEFAULT_TOML: &str = include_str!("../../defaults/yapl.default.toml");

#[derive(Debug, Clone, Deserialize)]
pub struct YaplConfig {
    pub parser: ParserConfig,
    pub input: InputConfig,
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ParserConfig {
    pub capture_locations: bool,
}

/// How raw source is prepared before it reaches the lexer.
#[derive(Debug, Clone, Deserialize)]
pub struct InputConfig {
    pub eof_marker: String,
    pub strip_blank_lines: bool,
    pub normalize_line_endings: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    pub format: OutputFormat,
    pub pretty: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OutputFormat {
    Json,
    Yaml,
    Debug,
}

impl From<&ParserConfig> for ParseOptions {
    fn from(config: &ParserConfig) -> Self {
        ParseOptions {
            capture_locations: config.capture_locations,
        }
    }
}

/// Resolves a [`YaplConfig`], one layer at a time.
#[derive(Debug, Clone)]
pub struct Loader {
    builder: ConfigBuilder<DefaultState>,
}

impl Loader {
    pub fn new() -> Self {
        let builder = Config::builder().add_source(File::from_str(DEFAULT_TOML, FileFormat::Toml));
        Self { builder }
    }

    /// Add a TOML file on top of what is already layered. The file must exist.
    pub fn with_file(mut self, path: impl AsRef<Path>) -> Self {
        let source = File::from(path.as_ref())
            .format(FileFormat::Toml)
            .required(true);
        self.builder = self.builder.add_source(source);
        self
    }

    /// Like [`with_file`](Self::with_file), but a missing file is skipped.
    pub fn with_optional_file(mut self, path: impl AsRef<Path>) -> Self {
        let source = File::from(path.as_ref())
            .format(FileFormat::Toml)
            .required(false);
        self.builder = self.builder.add_source(source);
        self
    }

    /// Set one dotted key, e.g. `output.format`. Wins over every file.
    pub fn set_override<I>(mut self, key: &str, value: I) -> Result<Self, ConfigError>
    where
        I: Into<ValueKind>,
    {
        self.builder = self.builder.set_override(key, value)?;
        Ok(self)
    }

    /// Merge the layers; unknown keys are ignored, bad values are errors.
    pub fn build(self) -> Result<YaplConfig, ConfigError> {
        self.builder.build()?.try_deserialize()
    }
}

impl Default for Loader {
    fn default() -> Self {
        Self::new()
    }
}

pub fn load_defaults() -> Result<YaplConfig, ConfigError> {
    Loader::new().build()
}
