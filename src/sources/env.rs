//! Environment variable configuration source.

use super::source_loader::{LoadContext, SourceLoader};
use crate::error::Result;
use crate::field::{ConfigField, ConfigSource, SourceLocation};
use serde_json::Value;
use std::collections::HashMap;
use std::env::{self, VarError};

/// Environment variable configuration source.
///
/// Every declared field is looked up by its exact name, then by its
/// upper-cased name. Values go through the usual string conversion, so
/// `port=5001` loads as a number and `paths='["/a", "/b"]'` as a list.
///
/// # Examples
///
/// ```rust
/// use confident::sources::EnvSource;
///
/// // Reads the process environment.
/// let source = EnvSource::new();
///
/// // Reads a fixed snapshot.
/// let source = EnvSource::from_vars([("port", "5001")]);
/// ```
#[derive(Debug, Clone, Default)]
pub struct EnvSource {
    vars: Option<HashMap<String, String>>,
}

impl EnvSource {
    /// Create a source over the process environment.
    pub fn new() -> Self {
        Self { vars: None }
    }

    /// Create a source over a fixed set of variables.
    pub fn from_vars<I, K, V>(vars: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            vars: Some(
                vars.into_iter()
                    .map(|(k, v)| (k.into(), v.into()))
                    .collect(),
            ),
        }
    }

    fn lookup(&self, key: &str) -> Option<String> {
        if let Some(vars) = &self.vars {
            return vars.get(key).cloned();
        }
        match env::var(key) {
            Ok(value) => Some(value),
            Err(VarError::NotPresent) => None,
            Err(VarError::NotUnicode(_)) => {
                tracing::warn!(
                    variable = key,
                    "skipping environment variable with non UTF-8 value"
                );
                None
            }
        }
    }

    /// Find the variable for `field`, returning the name it was found under.
    fn find(&self, field: &str) -> Option<(String, String)> {
        if let Some(value) = self.lookup(field) {
            return Some((field.to_string(), value));
        }
        let upper = field.to_uppercase();
        if upper == field {
            return None;
        }
        self.lookup(&upper).map(|value| (upper, value))
    }
}

impl SourceLoader for EnvSource {
    fn source(&self) -> ConfigSource {
        ConfigSource::EnvVar
    }

    fn load_fields(&self, ctx: &mut LoadContext<'_>) -> Result<Vec<ConfigField>> {
        let schema = ctx.schema;
        let fields = schema
            .fields()
            .iter()
            .filter_map(|spec| {
                let (variable, raw) = self.find(&spec.name)?;
                let origin = Value::String(raw);
                let value = schema.convert(&spec.name, &origin);
                Some(
                    ConfigField::new(
                        &spec.name,
                        value,
                        ConfigSource::EnvVar,
                        &spec.name,
                        SourceLocation::Key(variable),
                    )
                    .with_origin(origin),
                )
            })
            .collect();
        Ok(fields)
    }

    fn name(&self) -> String {
        match self.vars {
            Some(_) => "env:snapshot".to_string(),
            None => "env".to_string(),
        }
    }
}
