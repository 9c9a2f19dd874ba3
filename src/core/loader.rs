//! Loader manager that runs the source loaders and merges their fields.

use crate::error::{ConfigError, Result};
use crate::field::{ConfigSource, FieldMap, SourceFieldMap};
use crate::schema::SchemaInfo;
use crate::sources::{
    DefaultSource, EnvSource, FileSource, InitSource, LoadContext, MapSource, SourceLoader,
};
use crate::specs::ConfigSpecs;
use serde_json::{Map, Value};

/// Runs source loaders in priority order and merges their output.
///
/// Loaders run from the highest priority source to the lowest, except the
/// map source, which always runs last because its selector may come from
/// any other source. The merged map is then built from the lowest priority
/// source up, so each field ends up with the record of the highest priority
/// source that produced one.
pub struct LoaderManager {
    source_priority: Vec<ConfigSource>,
    loaders: Vec<Box<dyn SourceLoader>>,
    all_loaded_fields: SourceFieldMap,
    full_fields: FieldMap,
}

impl LoaderManager {
    /// Create a manager without loaders.
    ///
    /// Repeated sources in `source_priority` are kept at their first
    /// position only.
    pub fn new(source_priority: &[ConfigSource]) -> Self {
        let mut deduped = Vec::with_capacity(source_priority.len());
        for source in source_priority {
            if !deduped.contains(source) {
                deduped.push(*source);
            }
        }

        Self {
            source_priority: deduped,
            loaders: Vec::new(),
            all_loaded_fields: SourceFieldMap::new(),
            full_fields: FieldMap::new(),
        }
    }

    /// Create a manager with the five standard loaders.
    ///
    /// `init_values` are the explicit values for the init source. The
    /// environment loader reads the process environment.
    pub fn with_standard_loaders(
        source_priority: &[ConfigSource],
        init_values: Map<String, Value>,
    ) -> Self {
        let mut manager = Self::new(source_priority);
        manager.add_loader(Box::new(InitSource::new(init_values)));
        manager.add_loader(Box::new(EnvSource::new()));
        manager.add_loader(Box::new(MapSource::new()));
        manager.add_loader(Box::new(FileSource::new()));
        manager.add_loader(Box::new(DefaultSource::new()));
        manager
    }

    /// Register a loader, replacing any loader for the same source.
    pub fn add_loader(&mut self, loader: Box<dyn SourceLoader>) {
        let source = loader.source();
        self.loaders.retain(|existing| existing.source() != source);
        self.loaders.push(loader);
    }

    /// Run every prioritized loader and merge the results.
    ///
    /// # Errors
    ///
    /// Returns an error if a prioritized source has no registered loader, or
    /// the first error raised by a loader.
    pub fn load_all(&mut self, schema: &SchemaInfo, specs: &mut ConfigSpecs) -> Result<()> {
        let map_last = self
            .source_priority
            .contains(&ConfigSource::Map)
            .then_some(ConfigSource::Map);
        let order: Vec<ConfigSource> = self
            .source_priority
            .iter()
            .copied()
            .filter(|source| *source != ConfigSource::Map)
            .chain(map_last)
            .collect();

        for source in order {
            let loader = self
                .loaders
                .iter()
                .find(|loader| loader.source() == source)
                .ok_or_else(|| {
                    ConfigError::configuration(format!(
                        "No loader registered for source '{source}'"
                    ))
                })?;

            let records = {
                let mut ctx = LoadContext {
                    schema,
                    specs: &mut *specs,
                    loaded: &self.all_loaded_fields,
                };
                loader.load_fields(&mut ctx)?
            };
            tracing::debug!(source = %loader.name(), fields = records.len(), "loaded source");

            let fields: FieldMap = records
                .into_iter()
                .map(|record| (record.name.clone(), record))
                .collect();
            self.all_loaded_fields.insert(source, fields);
        }

        self.full_fields = FieldMap::new();
        for source in self.source_priority.iter().rev() {
            if let Some(fields) = self.all_loaded_fields.get(source) {
                for (name, field) in fields {
                    self.full_fields.insert(name.clone(), field.clone());
                }
            }
        }

        for field in self.full_fields.values() {
            tracing::trace!(
                field = %field.name,
                source = %field.source_type,
                location = %field.source_location,
                "selected field"
            );
        }
        Ok(())
    }

    /// Effective source priority, highest first, without repeats.
    pub fn source_priority(&self) -> &[ConfigSource] {
        &self.source_priority
    }

    /// Fields loaded by each source, before prioritization.
    pub fn all_loaded_fields(&self) -> &SourceFieldMap {
        &self.all_loaded_fields
    }

    /// The winning record of every field.
    pub fn full_fields(&self) -> &FieldMap {
        &self.full_fields
    }

    /// The merged `{field: value}` projection handed to deserialization.
    pub fn values(&self) -> Map<String, Value> {
        self.full_fields
            .iter()
            .map(|(name, field)| (name.clone(), field.value.clone()))
            .collect()
    }

    /// Split into the merged map and the per-source maps.
    pub fn into_parts(self) -> (FieldMap, SourceFieldMap) {
        (self.full_fields, self.all_loaded_fields)
    }
}
