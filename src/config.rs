//! Dump options and their layered loader.
//!
//! `defaults/yamlet.default.toml` is embedded into the library so that the
//! documented defaults and [`DumpOptions::default`] stay in sync. Callers layer
//! their own files and overrides on top via [`Loader`] before deserializing.

use crate::model::{FlowStyle, ScalarStyle, Version};
use config::builder::DefaultState;
use config::{Config, ConfigBuilder, ConfigError, File, FileFormat, ValueKind};
use serde::Deserialize;
use std::path::Path;

const DEFAULT_TOML: &str = include_str!("../defaults/yamlet.default.toml");

/// Everything that controls how a value becomes text.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct DumpOptions {
    pub default_scalar_style: ScalarStyle,
    pub default_flow_style: FlowStyle,
    pub line_width: i64,
    pub indent: usize,
    pub indicator_indent: usize,
    pub indent_with_indicator: bool,
    pub canonical: bool,
    pub pretty_flow: bool,
    pub anchor_naming: AnchorNaming,
    pub process_comments: bool,
    pub allow_unicode: bool,
    pub strict: bool,
    pub explicit_start: bool,
    pub explicit_end: bool,
    pub line_break: LineBreak,
    pub max_simple_key_length: usize,
    pub dereference_aliases: bool,
    #[serde(default)]
    pub version: Option<String>,
}

/// Built-in anchor naming strategies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AnchorNaming {
    Sequential,
    Preserve,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LineBreak {
    Unix,
    Windows,
    Mac,
}

impl LineBreak {
    pub fn as_str(self) -> &'static str {
        match self {
            LineBreak::Unix => "\n",
            LineBreak::Windows => "\r\n",
            LineBreak::Mac => "\r",
        }
    }
}

impl Default for DumpOptions {
    fn default() -> Self {
        DumpOptions {
            default_scalar_style: ScalarStyle::Plain,
            default_flow_style: FlowStyle::Auto,
            line_width: 80,
            indent: 2,
            indicator_indent: 0,
            indent_with_indicator: false,
            canonical: false,
            pretty_flow: false,
            anchor_naming: AnchorNaming::Sequential,
            process_comments: false,
            allow_unicode: true,
            strict: false,
            explicit_start: false,
            explicit_end: false,
            line_break: LineBreak::Unix,
            max_simple_key_length: 128,
            dereference_aliases: false,
            version: None,
        }
    }
}

impl DumpOptions {
    /// Check value ranges the type system does not capture.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(1..=10).contains(&self.indent) {
            return Err(ConfigError::Message(format!(
                "indent must be between 1 and 10, got {}",
                self.indent
            )));
        }
        if self.indicator_indent >= self.indent {
            return Err(ConfigError::Message(format!(
                "indicator_indent ({}) must be smaller than indent ({})",
                self.indicator_indent, self.indent
            )));
        }
        if self.max_simple_key_length == 0 || self.max_simple_key_length > 1024 {
            return Err(ConfigError::Message(format!(
                "max_simple_key_length must be between 1 and 1024, got {}",
                self.max_simple_key_length
            )));
        }
        self.yaml_version()?;
        Ok(())
    }

    /// The `%YAML` directive to write, parsed from `version`.
    pub fn yaml_version(&self) -> Result<Option<Version>, ConfigError> {
        let Some(text) = self.version.as_deref() else {
            return Ok(None);
        };
        let invalid = || ConfigError::Message(format!("invalid YAML version {:?}", text));
        let (major, minor) = text.split_once('.').ok_or_else(invalid)?;
        let major = major.parse::<u8>().map_err(|_| invalid())?;
        let minor = minor.parse::<u8>().map_err(|_| invalid())?;
        if major != 1 {
            return Err(ConfigError::Message(format!(
                "unsupported YAML version {}",
                text
            )));
        }
        Ok(Some(Version { major, minor }))
    }

    /// Folding is enabled for positive widths only.
    pub fn split_lines(&self) -> bool {
        self.line_width > 0
    }
}

/// Helper for layering user overrides over the built-in defaults.
#[derive(Debug, Clone)]
pub struct Loader {
    builder: ConfigBuilder<DefaultState>,
}

impl Loader {
    /// Start a loader seeded with the embedded defaults.
    pub fn new() -> Self {
        let builder = Config::builder().add_source(File::from_str(DEFAULT_TOML, FileFormat::Toml));
        Self { builder }
    }

    /// Layer a configuration file. Missing files trigger an error.
    pub fn with_file(mut self, path: impl AsRef<Path>) -> Self {
        let source = File::from(path.as_ref())
            .format(FileFormat::Toml)
            .required(true);
        self.builder = self.builder.add_source(source);
        self
    }

    /// Layer an optional configuration file (ignored if the file is absent).
    pub fn with_optional_file(mut self, path: impl AsRef<Path>) -> Self {
        let source = File::from(path.as_ref())
            .format(FileFormat::Toml)
            .required(false);
        self.builder = self.builder.add_source(source);
        self
    }

    /// Layer configuration text, e.g. read from stdin or an environment variable.
    pub fn with_toml(mut self, text: &str) -> Self {
        self.builder = self
            .builder
            .add_source(File::from_str(text, FileFormat::Toml));
        self
    }

    /// Apply a single key/value override (useful for CLI settings).
    pub fn set_override<I>(mut self, key: &str, value: I) -> Result<Self, ConfigError>
    where
        I: Into<ValueKind>,
    {
        self.builder = self.builder.set_override(key, value)?;
        Ok(self)
    }

    /// Finalize the builder, deserialize and validate the options.
    pub fn build(self) -> Result<DumpOptions, ConfigError> {
        let options: DumpOptions = self.builder.build()?.try_deserialize()?;
        options.validate()?;
        Ok(options)
    }
}

impl Default for Loader {
    fn default() -> Self {
        Self::new()
    }
}

/// Convenience helper for callers that only need the defaults.
pub fn load_defaults() -> Result<DumpOptions, ConfigError> {
    Loader::new().build()
}
