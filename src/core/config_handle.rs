//! The configuration object returned by the builder.

use crate::field::{ConfigSource, FieldMap, SourceFieldMap};
use crate::specs::ConfigSpecs;
use std::ops::Deref;

/// A configuration value together with where each field came from.
///
/// Dereferences to the inner configuration type. The accessors for the
/// metadata return copies, so callers cannot alter the recorded provenance.
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
/// let config = Confident::from_files(["config.yaml"]).build::<AppConfig>()?;
///
/// println!("Port: {}", config.port);
/// println!("Port set by: {}", config.full_fields()["port"].source_location);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct Confident<T> {
    config: T,
    specs: ConfigSpecs,
    full_fields: FieldMap,
    all_loaded_fields: SourceFieldMap,
}

impl<T> Confident<T> {
    pub(crate) fn from_parts(
        config: T,
        specs: ConfigSpecs,
        full_fields: FieldMap,
        all_loaded_fields: SourceFieldMap,
    ) -> Self {
        Self {
            config,
            specs,
            full_fields,
            all_loaded_fields,
        }
    }

    /// Borrow the configuration value.
    pub fn get(&self) -> &T {
        &self.config
    }

    /// Take the configuration value, dropping the metadata.
    pub fn into_inner(self) -> T {
        self.config
    }

    /// The specs the object was built from.
    ///
    /// After a map source ran, `resolved_map_name` holds the entry that was loaded.
    pub fn specs(&self) -> ConfigSpecs {
        self.specs.clone()
    }

    /// The winning record of every field that was set by some source.
    pub fn full_fields(&self) -> FieldMap {
        self.full_fields.clone()
    }

    /// Every record each source produced, before prioritization.
    pub fn all_loaded_fields(&self) -> SourceFieldMap {
        self.all_loaded_fields.clone()
    }

    /// Source priority, highest first.
    pub fn source_priority(&self) -> Vec<ConfigSource> {
        self.specs.source_priority.clone()
    }
}

impl<T> Deref for Confident<T> {
    type Target = T;

    fn deref(&self) -> &T {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::{ConfigField, SourceLocation};
    use serde_json::json;

    fn handle() -> Confident<u16> {
        let mut full_fields = FieldMap::new();
        full_fields.insert(
            "port".to_string(),
            ConfigField::new(
                "port",
                json!(42),
                ConfigSource::Init,
                "init",
                SourceLocation::Key("init".to_string()),
            ),
        );
        let mut all_loaded_fields = SourceFieldMap::new();
        all_loaded_fields.insert(ConfigSource::Init, full_fields.clone());

        Confident::from_parts(42, ConfigSpecs::default(), full_fields, all_loaded_fields)
    }

    #[test]
    fn test_access() {
        let config = handle();
        assert_eq!(*config.get(), 42);
        assert_eq!(*config + 1, 43);
        assert_eq!(config.source_priority(), ConfigSource::DEFAULT_PRIORITY.to_vec());
        assert_eq!(config.into_inner(), 42);
    }

    #[test]
    fn test_metadata_is_copied() {
        let config = handle();

        let mut fields = config.full_fields();
        fields.clear();
        let mut specs = config.specs();
        specs.source_priority.clear();

        assert_eq!(config.full_fields().len(), 1);
        assert_eq!(config.all_loaded_fields()[&ConfigSource::Init].len(), 1);
        assert!(!config.source_priority().is_empty());
    }
}
