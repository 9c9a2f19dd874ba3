//! Values passed explicitly at construction time.

use super::source_loader::{LoadContext, SourceLoader, path_location};
use crate::error::Result;
use crate::field::{ConfigField, ConfigSource};
use serde_json::{Map, Value};

/// Explicit init-time values.
///
/// Values are taken as given, with no conversion, and are attributed to the
/// call site recorded in the specs.
#[derive(Debug, Clone, Default)]
pub struct InitSource {
    values: Map<String, Value>,
}

impl InitSource {
    /// Create an init source over `values`.
    pub fn new(values: Map<String, Value>) -> Self {
        Self { values }
    }
}

impl SourceLoader for InitSource {
    fn source(&self) -> ConfigSource {
        ConfigSource::Init
    }

    fn load_fields(&self, ctx: &mut LoadContext<'_>) -> Result<Vec<ConfigField>> {
        let location = path_location(ctx.specs.creation_path.as_ref(), ConfigSource::Init);
        Ok(self
            .values
            .iter()
            .map(|(name, value)| {
                ConfigField::new(
                    name,
                    value.clone(),
                    ConfigSource::Init,
                    ConfigSource::Init.as_str(),
                    location.clone(),
                )
            })
            .collect())
    }
}
