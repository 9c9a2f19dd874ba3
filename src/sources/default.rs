//! Defaults declared by the schema.

use super::source_loader::{LoadContext, SourceLoader, path_location};
use crate::error::Result;
use crate::field::{ConfigField, ConfigSource};

/// Declared default values.
///
/// Required fields have no default and produce nothing here.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultSource;

impl DefaultSource {
    /// Create a default source.
    pub fn new() -> Self {
        Self
    }
}

impl SourceLoader for DefaultSource {
    fn source(&self) -> ConfigSource {
        ConfigSource::ClassDefault
    }

    fn load_fields(&self, ctx: &mut LoadContext<'_>) -> Result<Vec<ConfigField>> {
        let location = path_location(ctx.specs.class_path.as_ref(), ConfigSource::ClassDefault);
        Ok(ctx
            .schema
            .fields()
            .iter()
            .filter_map(|spec| {
                let default = spec.default.clone()?;
                Some(ConfigField::new(
                    &spec.name,
                    default,
                    ConfigSource::ClassDefault,
                    ctx.schema.name(),
                    location.clone(),
                ))
            })
            .collect())
    }
}
