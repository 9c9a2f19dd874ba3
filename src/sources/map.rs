//! Map document configuration source.
//!
//! A map document is keyed by entry name (typically a deployment name such as
//! `dev` or `prod`). Exactly one entry is selected, either by an explicit
//! `map_name` or by reading the value of the `map_field` from the sources that
//! already loaded. The selected entry is an inline mapping or a path to a
//! document holding one.

use super::source_loader::{LoadContext, SourceLoader, path_location};
use crate::error::{ConfigError, Result};
use crate::field::{ConfigField, ConfigSource, SourceLocation};
use crate::format::load_file;
use crate::specs::ConfigMap;
use serde_json::{Map, Value};
use std::path::Path;

/// Map document configuration source.
///
/// Must run after every other source, since the selector field may come
/// from any of them.
#[derive(Debug, Clone, Copy, Default)]
pub struct MapSource;

impl MapSource {
    /// Create a map source.
    pub fn new() -> Self {
        Self
    }
}

impl SourceLoader for MapSource {
    fn source(&self) -> ConfigSource {
        ConfigSource::Map
    }

    fn load_fields(&self, ctx: &mut LoadContext<'_>) -> Result<Vec<ConfigField>> {
        let map_field = ctx.specs.map_field.clone();
        let map_name = match (&map_field, &ctx.specs.map_name) {
            (None, None) => return Ok(Vec::new()),
            (Some(_), Some(_)) => {
                return Err(ConfigError::configuration(
                    "Cannot have both `map_field` and `map_name`. Only one can be used.",
                ));
            }
            (None, Some(name)) => Some(name.clone()),
            (Some(_), None) => None,
        };

        let (document, location) = match &ctx.specs.config_map {
            None => return Err(ConfigError::configuration("No `config_map` was provided.")),
            Some(ConfigMap::Inline(map)) => (
                map.clone(),
                path_location(ctx.specs.creation_path.as_ref(), ConfigSource::Map),
            ),
            Some(ConfigMap::Path(path)) => (load_file(path)?, SourceLocation::Path(path.clone())),
        };

        let map_name = match (map_name, &map_field) {
            (Some(name), _) => name,
            (None, Some(field)) => resolve_selector(field, ctx)?,
            (None, None) => return Ok(Vec::new()),
        };

        let entry = select_entry(&document, &map_name)?;
        tracing::debug!(map_name = %map_name, location = %location, "resolved map entry");

        let mut fields = Vec::with_capacity(entry.len());
        for (key, origin) in entry {
            if map_field.as_deref() == Some(key.as_str()) {
                return Err(ConfigError::configuration(format!(
                    "map_field='{key}' cannot appear in the map config key '{map_name}'. \
                     Look for map_location='{location}' at '{map_name}'. \
                     Remove '{key}' key or change the map field."
                )));
            }
            let value = ctx.schema.convert(&key, &origin);
            fields.push(
                ConfigField::new(
                    key,
                    value,
                    ConfigSource::Map,
                    map_name.clone(),
                    location.clone(),
                )
                .with_origin(origin),
            );
        }

        ctx.specs.resolved_map_name = Some(map_name);
        Ok(fields)
    }
}

/// Read the selector value from the highest-priority source that has it.
fn resolve_selector(field: &str, ctx: &LoadContext<'_>) -> Result<String> {
    let found = ctx
        .specs
        .source_priority
        .iter()
        .filter(|source| **source != ConfigSource::Map)
        .find_map(|source| ctx.loaded.get(source).and_then(|fields| fields.get(field)));

    match found.map(|record| &record.value) {
        Some(Value::String(name)) => Ok(name.clone()),
        Some(other) => Err(ConfigError::InvalidSelector {
            field: field.to_string(),
            value: other.to_string(),
            type_name: json_type_name(other),
        }),
        None => Err(ConfigError::configuration(format!(
            "map_field='{field}' has no value in any of the sources {:?}",
            ctx.specs
                .source_priority
                .iter()
                .map(ConfigSource::as_str)
                .collect::<Vec<_>>()
        ))),
    }
}

/// Look up the entry and load it if it is a path.
fn select_entry(document: &Map<String, Value>, map_name: &str) -> Result<Map<String, Value>> {
    match document.get(map_name) {
        None | Some(Value::Null) => Err(ConfigError::MapEntryNotFound {
            map_name: map_name.to_string(),
        }),
        Some(Value::Object(entry)) => Ok(entry.clone()),
        Some(Value::String(path)) => load_file(Path::new(path)),
        Some(other) => Err(ConfigError::configuration(format!(
            "map config key '{map_name}' has to be a mapping or a path, not {}",
            json_type_name(other)
        ))),
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
