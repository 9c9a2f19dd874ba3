//! Per-instance source metadata and the options it is assembled from.

use crate::error::{ConfigError, Result};
use crate::field::ConfigSource;
use crate::format;
use crate::schema::SchemaInfo;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};

/// Missing files are skipped unless told otherwise.
pub const IGNORE_MISSING_FILES_DEFAULT: bool = true;

/// A map document, inline or on disk.
///
/// The top level maps entry names to either an inline field mapping or a
/// string path to a document holding that mapping.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ConfigMap {
    /// Path to a JSON or YAML map document.
    Path(PathBuf),
    /// Inline map document.
    Inline(Map<String, Value>),
}

impl ConfigMap {
    /// Build from a dynamic value: strings are paths, objects are inline maps.
    ///
    /// # Errors
    ///
    /// Returns a configuration error for any other value.
    pub fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::String(path) => Ok(Self::Path(PathBuf::from(path))),
            Value::Object(map) => Ok(Self::Inline(map)),
            other => Err(ConfigError::configuration(format!(
                "`config_map` has to be a path or a mapping, got {other}"
            ))),
        }
    }
}

impl From<PathBuf> for ConfigMap {
    fn from(path: PathBuf) -> Self {
        Self::Path(path)
    }
}

impl From<&Path> for ConfigMap {
    fn from(path: &Path) -> Self {
        Self::Path(path.to_path_buf())
    }
}

impl From<&str> for ConfigMap {
    fn from(path: &str) -> Self {
        Self::Path(PathBuf::from(path))
    }
}

impl From<Map<String, Value>> for ConfigMap {
    fn from(map: Map<String, Value>) -> Self {
        Self::Inline(map)
    }
}

/// Source options declared on a schema or passed per call.
///
/// Every option is optional; unset options fall through to the next tier
/// (per-call, then schema, then library default).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConfigOptions {
    /// Files to load, in order.
    pub files: Option<Vec<PathBuf>>,
    /// Skip files that do not exist.
    pub ignore_missing_files: Option<bool>,
    /// Map entry to load.
    pub map_name: Option<String>,
    /// Field whose value names the map entry.
    pub map_field: Option<String>,
    /// Map document.
    pub config_map: Option<ConfigMap>,
    /// Source priority, highest first.
    pub source_priority: Option<Vec<ConfigSource>>,
    /// External specs document. Takes precedence over inline options.
    pub specs_path: Option<PathBuf>,
    /// Prebuilt specs. Takes precedence over everything else.
    #[serde(skip)]
    pub specs: Option<ConfigSpecs>,
}

impl ConfigOptions {
    /// Fill every unset option from `fallback`.
    pub fn or(self, fallback: ConfigOptions) -> ConfigOptions {
        ConfigOptions {
            files: self.files.or(fallback.files),
            ignore_missing_files: self.ignore_missing_files.or(fallback.ignore_missing_files),
            map_name: self.map_name.or(fallback.map_name),
            map_field: self.map_field.or(fallback.map_field),
            config_map: self.config_map.or(fallback.config_map),
            source_priority: self.source_priority.or(fallback.source_priority),
            specs_path: self.specs_path.or(fallback.specs_path),
            specs: self.specs.or(fallback.specs),
        }
    }

    /// Whether any inline source option is set.
    pub(crate) fn has_inline_sources(&self) -> bool {
        self.files.is_some()
            || self.ignore_missing_files.is_some()
            || self.map_name.is_some()
            || self.map_field.is_some()
            || self.config_map.is_some()
    }
}

/// Metadata about where a configuration object takes its values from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConfigSpecs {
    /// Document these specs were loaded from.
    pub specs_path: Option<PathBuf>,
    /// Files to load, in order. Later files override earlier ones.
    pub files: Vec<PathBuf>,
    /// Skip files that do not exist.
    pub ignore_missing_files: bool,
    /// Map entry to load.
    pub map_name: Option<String>,
    /// Field whose value names the map entry.
    pub map_field: Option<String>,
    /// Entry the map source actually loaded. Written out but never read
    /// back, so a reloaded document resolves the entry again.
    #[serde(skip_deserializing)]
    pub resolved_map_name: Option<String>,
    /// Map document.
    pub config_map: Option<ConfigMap>,
    /// Source file of the schema.
    pub class_path: Option<PathBuf>,
    /// Call site that built the configuration object.
    pub creation_path: Option<PathBuf>,
    /// Source priority, highest first.
    pub source_priority: Vec<ConfigSource>,
}

impl Default for ConfigSpecs {
    fn default() -> Self {
        Self {
            specs_path: None,
            files: Vec::new(),
            ignore_missing_files: IGNORE_MISSING_FILES_DEFAULT,
            map_name: None,
            map_field: None,
            resolved_map_name: None,
            config_map: None,
            class_path: None,
            creation_path: None,
            source_priority: ConfigSource::DEFAULT_PRIORITY.to_vec(),
        }
    }
}

impl ConfigSpecs {
    /// Load specs from a JSON or YAML document.
    ///
    /// Fields missing from the document take their defaults and unknown keys
    /// are ignored. The provenance paths are only filled in when the document
    /// does not set them.
    ///
    /// # Errors
    ///
    /// Returns an error if the document is missing, has an unsupported
    /// extension or cannot be decoded.
    pub fn from_path(
        path: impl AsRef<Path>,
        class_path: Option<PathBuf>,
        creation_path: Option<PathBuf>,
    ) -> Result<Self> {
        let path = path.as_ref();
        let specs = format::read_document::<ConfigSpecs>(path)?.unwrap_or_default();
        tracing::debug!(path = %path.display(), "loaded specs document");
        Ok(specs
            .with_specs_path(path.to_path_buf())
            .with_provenance(class_path, creation_path))
    }

    /// Assemble specs from per-call options, schema options and defaults, in
    /// that precedence.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the map selector is declared both
    /// explicitly and on a schema field, or on more than one schema field.
    pub fn from_options(
        schema: &SchemaInfo,
        overrides: ConfigOptions,
        declared: ConfigOptions,
        class_path: Option<PathBuf>,
        creation_path: Option<PathBuf>,
    ) -> Result<Self> {
        let options = overrides.or(declared);
        let map_field = resolve_map_field(schema, options.map_field)?;

        Ok(Self {
            specs_path: None,
            files: options.files.unwrap_or_default(),
            ignore_missing_files: options
                .ignore_missing_files
                .unwrap_or(IGNORE_MISSING_FILES_DEFAULT),
            map_name: options.map_name,
            map_field,
            resolved_map_name: None,
            config_map: options.config_map,
            class_path,
            creation_path,
            source_priority: options
                .source_priority
                .unwrap_or_else(|| ConfigSource::DEFAULT_PRIORITY.to_vec()),
        })
    }

    /// Write the specs to a JSON or YAML document.
    ///
    /// # Errors
    ///
    /// Returns an error on unsupported extensions or IO failure.
    pub fn write_to(&self, path: impl AsRef<Path>) -> Result<()> {
        format::write_document(path.as_ref(), self)
    }

    pub(crate) fn with_specs_path(mut self, path: PathBuf) -> Self {
        self.specs_path = Some(path);
        self
    }

    pub(crate) fn with_provenance(
        mut self,
        class_path: Option<PathBuf>,
        creation_path: Option<PathBuf>,
    ) -> Self {
        self.class_path = self.class_path.or(class_path);
        self.creation_path = self.creation_path.or(creation_path);
        self
    }

    pub(crate) fn with_source_priority(mut self, priority: Option<Vec<ConfigSource>>) -> Self {
        if let Some(priority) = priority {
            self.source_priority = priority;
        }
        self
    }
}

/// Pick the map selector field from an explicit option or a flagged schema field.
fn resolve_map_field(schema: &SchemaInfo, explicit: Option<String>) -> Result<Option<String>> {
    let flagged = schema.map_selectors();
    match (explicit, flagged.as_slice()) {
        (explicit, []) => Ok(explicit),
        (Some(_), _) => Err(ConfigError::configuration(format!(
            "Cannot have both explicit `map_field` and also a map selector field in {} declaration",
            schema.name()
        ))),
        (None, [single]) => Ok(Some((*single).to_string())),
        (None, _) => Err(ConfigError::configuration(format!(
            "Cannot have more then one map selector field in {} declaration",
            schema.name()
        ))),
    }
}
