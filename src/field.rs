//! Value records and the source kinds they are tagged with.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;

/// Possible kinds of configuration sources.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConfigSource {
    /// Values passed explicitly to the builder.
    Init,
    /// Process environment variables.
    EnvVar,
    /// One selected entry of a map document.
    Map,
    /// Configuration files.
    File,
    /// Defaults declared by the schema.
    ClassDefault,
}

impl ConfigSource {
    /// Default priority, highest first.
    pub const DEFAULT_PRIORITY: [ConfigSource; 5] = [
        ConfigSource::Init,
        ConfigSource::EnvVar,
        ConfigSource::Map,
        ConfigSource::File,
        ConfigSource::ClassDefault,
    ];

    /// The literal label of the source kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Init => "init",
            Self::EnvVar => "env_var",
            Self::Map => "map",
            Self::File => "file",
            Self::ClassDefault => "class_default",
        }
    }
}

impl fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where a value was found.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SourceLocation {
    /// A file on disk, or the source file of a schema or call site.
    Path(PathBuf),
    /// A key in a flat namespace, such as an environment variable name.
    Key(String),
}

impl fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Path(path) => write!(f, "{}", path.display()),
            Self::Key(key) => f.write_str(key),
        }
    }
}

impl From<PathBuf> for SourceLocation {
    fn from(path: PathBuf) -> Self {
        Self::Path(path)
    }
}

/// A single configuration value with its provenance.
///
/// `origin_value` is the value exactly as the source returned it and `value`
/// is what gets handed to deserialization. They only differ when a string was
/// parsed into a structured literal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfigField {
    /// Field name.
    pub name: String,
    /// Converted value.
    pub value: Value,
    /// Value as retrieved from the source.
    pub origin_value: Value,
    /// Display label of the source.
    pub source_name: String,
    /// Source kind.
    pub source_type: ConfigSource,
    /// Where the value was found.
    pub source_location: SourceLocation,
}

impl ConfigField {
    /// Create a record whose origin value equals its value.
    pub fn new(
        name: impl Into<String>,
        value: Value,
        source_type: ConfigSource,
        source_name: impl Into<String>,
        source_location: SourceLocation,
    ) -> Self {
        Self {
            name: name.into(),
            origin_value: value.clone(),
            value,
            source_name: source_name.into(),
            source_type,
            source_location,
        }
    }

    /// Set the unconverted value.
    pub fn with_origin(mut self, origin_value: Value) -> Self {
        self.origin_value = origin_value;
        self
    }
}

/// Field name to record.
pub type FieldMap = BTreeMap<String, ConfigField>;

/// Source kind to per-field records, before prioritization.
pub type SourceFieldMap = BTreeMap<ConfigSource, FieldMap>;
