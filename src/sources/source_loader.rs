//! Source loader trait.

use crate::error::Result;
use crate::field::{ConfigField, ConfigSource, SourceFieldMap, SourceLocation};
use crate::schema::SchemaInfo;
use crate::specs::ConfigSpecs;
use std::path::PathBuf;

/// Everything a loader may read while producing its fields.
///
/// `loaded` holds the output of the loaders that already ran, keyed by
/// source. `specs` is mutable so a loader can record what it resolved.
pub struct LoadContext<'a> {
    /// Declarations of the target type.
    pub schema: &'a SchemaInfo,
    /// Specs of the object being built.
    pub specs: &'a mut ConfigSpecs,
    /// Fields loaded so far.
    pub loaded: &'a SourceFieldMap,
}

/// Trait for configuration source loaders.
///
/// Each loader produces the records of exactly one [`ConfigSource`] kind.
/// The loader manager decides when a loader runs and how its output is
/// merged.
pub trait SourceLoader: Send + Sync {
    /// The source kind this loader produces.
    fn source(&self) -> ConfigSource;

    /// Load the fields this source provides.
    ///
    /// # Errors
    ///
    /// Returns an error if the source is misconfigured or cannot be read.
    fn load_fields(&self, ctx: &mut LoadContext<'_>) -> Result<Vec<ConfigField>>;

    /// Human-readable name for logging.
    fn name(&self) -> String {
        self.source().to_string()
    }
}

/// Location for values attributed to a provenance path, if known.
pub(crate) fn path_location(path: Option<&PathBuf>, source: ConfigSource) -> SourceLocation {
    match path {
        Some(path) => SourceLocation::Path(path.clone()),
        None => SourceLocation::Key(source.to_string()),
    }
}
