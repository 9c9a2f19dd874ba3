//! Builder for constructing Confident instances.

use crate::core::{Confident, LoaderManager};
use crate::error::{ConfigError, Result, ValidationError};
use crate::field::ConfigSource;
use crate::schema::{Schema, SchemaInfo};
use crate::specs::{ConfigMap, ConfigOptions, ConfigSpecs};
use serde_json::{Map, Value};
use std::any::Any;
use std::env;
use std::panic::Location;
use std::path::PathBuf;
use std::sync::Arc;

/// Type alias for any-based validator functions used during building.
type AnyValidator =
    Arc<dyn Fn(&dyn Any) -> std::result::Result<(), ValidationError> + Send + Sync>;

/// Builder for constructing a [`Confident`] instance.
///
/// Collects explicit init values and per-call source options. Per-call
/// options override the options declared by the schema.
///
/// # Examples
///
/// ```rust,no_run
/// use confident::prelude::*;
/// use serde::Deserialize;
///
/// #[derive(Debug, Deserialize)]
/// struct AppConfig {
///     port: u16,
/// }
///
/// impl Schema for AppConfig {
///     fn fields() -> Vec<FieldSpec> {
///         vec![FieldSpec::optional("port", FieldKind::Integer, 8080)]
///     }
/// }
///
/// # fn example() -> Result<()> {
/// let config = Confident::builder()
///     .with_file("config/default.yaml")
///     .with_file("config/production.yaml")
///     .build::<AppConfig>()?;
/// # Ok(())
/// # }
/// ```
#[derive(Default)]
pub struct ConfidentBuilder {
    options: ConfigOptions,
    values: Map<String, Value>,
    validator: Option<AnyValidator>,
}

impl ConfidentBuilder {
    /// Create a new builder with no values and no per-call options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a configuration file. Later files override earlier ones.
    ///
    /// Supported formats: JSON (.json), YAML (.yaml, .yml)
    pub fn with_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.options
            .files
            .get_or_insert_with(Vec::new)
            .push(path.into());
        self
    }

    /// Add several configuration files, in order.
    pub fn with_files<I, P>(mut self, paths: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        self.options
            .files
            .get_or_insert_with(Vec::new)
            .extend(paths.into_iter().map(Into::into));
        self
    }

    /// Skip missing files instead of failing.
    pub fn ignore_missing_files(mut self, ignore: bool) -> Self {
        self.options.ignore_missing_files = Some(ignore);
        self
    }

    /// Load the named entry of the map document.
    pub fn map_name(mut self, name: impl Into<String>) -> Self {
        self.options.map_name = Some(name.into());
        self
    }

    /// Select the map entry by the value of this field.
    pub fn map_field(mut self, field: impl Into<String>) -> Self {
        self.options.map_field = Some(field.into());
        self
    }

    /// Set the map document, inline or as a path.
    pub fn config_map(mut self, config_map: impl Into<ConfigMap>) -> Self {
        self.options.config_map = Some(config_map.into());
        self
    }

    /// Load the specs from a document instead of assembling them.
    pub fn specs_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.options.specs_path = Some(path.into());
        self
    }

    /// Set the source priority, highest first.
    pub fn source_priority<I>(mut self, priority: I) -> Self
    where
        I: IntoIterator<Item = ConfigSource>,
    {
        self.options.source_priority = Some(priority.into_iter().collect());
        self
    }

    /// Replace every per-call option at once.
    pub fn with_options(mut self, options: ConfigOptions) -> Self {
        self.options = options;
        self
    }

    /// Set an explicit value for a field.
    ///
    /// Explicit values are taken as given, with no conversion.
    pub fn with_value(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.values.insert(name.into(), value.into());
        self
    }

    /// Set several explicit values.
    pub fn with_values(mut self, values: Map<String, Value>) -> Self {
        self.values.extend(values);
        self
    }

    /// Add a validation function that must pass before the object is returned.
    ///
    /// # Examples
    ///
    /// ```rust,no_run
    /// use confident::prelude::*;
    /// use serde::Deserialize;
    ///
    /// #[derive(Debug, Deserialize)]
    /// struct AppConfig {
    ///     port: u16,
    /// }
    ///
    /// impl Schema for AppConfig {
    ///     fn fields() -> Vec<FieldSpec> {
    ///         vec![FieldSpec::required("port", FieldKind::Integer)]
    ///     }
    /// }
    ///
    /// # fn example() -> Result<()> {
    /// let config = Confident::builder()
    ///     .with_file("config.yaml")
    ///     .with_validation(|config: &AppConfig| {
    ///         if config.port < 1024 {
    ///             return Err(ValidationError::invalid_field(
    ///                 "port",
    ///                 "must be >= 1024"
    ///             ));
    ///         }
    ///         Ok(())
    ///     })
    ///     .build::<AppConfig>()?;
    /// # Ok(())
    /// # }
    /// ```
    pub fn with_validation<F, T>(mut self, validator: F) -> Self
    where
        F: Fn(&T) -> std::result::Result<(), ValidationError> + Send + Sync + 'static,
        T: 'static,
    {
        self.validator = Some(Arc::new(move |config: &dyn Any| {
            let typed_config = config
                .downcast_ref::<T>()
                .ok_or_else(|| ValidationError::custom("Type mismatch in validator"))?;
            validator(typed_config)
        }));
        self
    }

    /// Build the configuration object.
    ///
    /// Resolves the specs, runs every source in the priority list, merges
    /// their fields and deserializes the result into `T`. The calling file
    /// is recorded as the creation path.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The source options are inconsistent
    /// - A source fails to load
    /// - Deserialization fails
    /// - Validation fails
    #[track_caller]
    pub fn build<T>(self) -> Result<Confident<T>>
    where
        T: Schema + 'static,
    {
        let creation_path = Some(PathBuf::from(Location::caller().file()));
        let class_path = T::class_path().or_else(|| env::current_dir().ok());
        let schema = SchemaInfo::of::<T>();

        let mut specs = resolve_specs(
            &schema,
            self.options,
            T::options(),
            class_path,
            creation_path,
        )?;

        let mut manager = LoaderManager::with_standard_loaders(&specs.source_priority, self.values);
        manager.load_all(&schema, &mut specs)?;

        // Declared defaults still apply when no listed source set the field.
        // They only feed deserialization and stay out of the field records.
        let mut values = manager.values();
        for spec in schema.fields() {
            if let Some(default) = &spec.default {
                values
                    .entry(spec.name.clone())
                    .or_insert_with(|| default.clone());
            }
        }

        let config: T = serde_json::from_value(Value::Object(values)).map_err(|e| {
            ConfigError::DeserializationError(format!("{}: {e}", schema.name()))
        })?;

        config.validate()?;
        if let Some(validator) = &self.validator {
            validator(&config as &dyn Any)?;
        }

        tracing::debug!(
            schema = %schema.name(),
            fields = manager.full_fields().len(),
            "built configuration"
        );

        let (full_fields, all_loaded_fields) = manager.into_parts();
        Ok(Confident::from_parts(config, specs, full_fields, all_loaded_fields))
    }
}

/// Pick the specs: prebuilt, then from a document, then assembled inline.
fn resolve_specs(
    schema: &SchemaInfo,
    overrides: ConfigOptions,
    declared: ConfigOptions,
    class_path: Option<PathBuf>,
    creation_path: Option<PathBuf>,
) -> Result<ConfigSpecs> {
    let priority = overrides.source_priority.clone();

    if let Some(specs) = overrides.specs.clone().or_else(|| declared.specs.clone()) {
        return Ok(specs
            .with_provenance(class_path, creation_path)
            .with_source_priority(priority));
    }

    if let Some(path) = overrides
        .specs_path
        .clone()
        .or_else(|| declared.specs_path.clone())
    {
        if overrides.has_inline_sources() {
            tracing::warn!(
                specs_path = %path.display(),
                "per-call source options are ignored when a specs document is used"
            );
        }
        return Ok(ConfigSpecs::from_path(&path, class_path, creation_path)?
            .with_source_priority(priority));
    }

    ConfigSpecs::from_options(schema, overrides, declared, class_path, creation_path)
}

impl Confident<()> {
    /// Create a new builder for constructing a configuration object.
    pub fn builder() -> ConfidentBuilder {
        ConfidentBuilder::new()
    }

    /// Builder preset with configuration files.
    pub fn from_files<I, P>(files: I) -> ConfidentBuilder
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        ConfidentBuilder::new().with_files(files)
    }

    /// Builder preset with a map document.
    ///
    /// Pick the entry with [`ConfidentBuilder::map_name`] or
    /// [`ConfidentBuilder::map_field`], or declare a selector field on the
    /// schema.
    pub fn from_map(config_map: impl Into<ConfigMap>) -> ConfidentBuilder {
        ConfidentBuilder::new().config_map(config_map)
    }

    /// Builder preset with a specs document.
    pub fn from_specs(specs_path: impl Into<PathBuf>) -> ConfidentBuilder {
        ConfidentBuilder::new().specs_path(specs_path)
    }

    /// Builder preset with any mixture of source options.
    pub fn from_sources(options: ConfigOptions) -> ConfidentBuilder {
        ConfidentBuilder::new().with_options(options)
    }
}
