//! File-based configuration source.

use super::source_loader::{LoadContext, SourceLoader};
use crate::error::Result;
use crate::field::{ConfigField, ConfigSource, FieldMap, SourceLocation};
use crate::format::load_file;

/// File-based configuration source.
///
/// Loads the files listed in the specs, in order, with automatic format
/// detection from the extension (`.json`, `.yaml`, `.yml`). Top-level keys of
/// later files override earlier ones. Only keys that match a declared field
/// are returned.
///
/// A missing file is skipped while `ignore_missing_files` is set and is an
/// error otherwise.
#[derive(Debug, Clone, Copy, Default)]
pub struct FileSource;

impl FileSource {
    /// Create a file source.
    pub fn new() -> Self {
        Self
    }
}

impl SourceLoader for FileSource {
    fn source(&self) -> ConfigSource {
        ConfigSource::File
    }

    fn load_fields(&self, ctx: &mut LoadContext<'_>) -> Result<Vec<ConfigField>> {
        let mut fields = FieldMap::new();

        for path in &ctx.specs.files {
            if !path.is_file() && ctx.specs.ignore_missing_files {
                tracing::debug!(path = %path.display(), "skipping missing configuration file");
                continue;
            }
            let document = load_file(path)?;
            let source_name = path
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
                .unwrap_or_else(|| path.display().to_string());

            for (key, origin) in document {
                let value = ctx.schema.convert(&key, &origin);
                let field = ConfigField::new(
                    key.clone(),
                    value,
                    ConfigSource::File,
                    source_name.clone(),
                    SourceLocation::Path(path.clone()),
                )
                .with_origin(origin);
                fields.insert(key, field);
            }
        }

        fields.retain(|name, _| ctx.schema.contains(name));
        Ok(fields.into_values().collect())
    }
}
