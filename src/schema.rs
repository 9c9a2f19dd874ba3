//! The schema collaborator: what a configuration type declares about its fields.
//!
//! Final type coercion is left to serde. The engine only needs the field
//! names, their declared kinds (for best-effort string conversion), their
//! defaults and which field, if any, selects the map entry.

use crate::error::ValidationError;
use crate::specs::ConfigOptions;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::path::PathBuf;

/// Declared kind of a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// Text.
    String,
    /// Whole number.
    Integer,
    /// Floating point number.
    Float,
    /// Boolean.
    Bool,
    /// Sequence.
    Array,
    /// Nested mapping or struct.
    Object,
    /// Anything. String values are always offered to the literal parser.
    Any,
}

impl FieldKind {
    /// Whether `value` is already an instance of this kind.
    pub fn matches(&self, value: &Value) -> bool {
        match (self, value) {
            (Self::String, Value::String(_)) => true,
            (Self::Integer, Value::Number(n)) => n.is_i64() || n.is_u64(),
            (Self::Float, Value::Number(n)) => n.is_f64(),
            (Self::Bool, Value::Bool(_)) => true,
            (Self::Array, Value::Array(_)) => true,
            (Self::Object, Value::Object(_)) => true,
            _ => false,
        }
    }
}

/// Declaration of a single field.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldSpec {
    /// Field name as it appears in the deserialized struct.
    pub name: String,
    /// Declared kind.
    pub kind: FieldKind,
    /// Default value. `None` marks the field as required.
    pub default: Option<Value>,
    /// Whether this field names the map entry to load.
    pub map_selector: bool,
}

impl FieldSpec {
    /// A field without a default.
    pub fn required(name: impl Into<String>, kind: FieldKind) -> Self {
        Self {
            name: name.into(),
            kind,
            default: None,
            map_selector: false,
        }
    }

    /// A field with a default value.
    ///
    /// ```rust
    /// use confident::schema::{FieldKind, FieldSpec};
    ///
    /// let port = FieldSpec::optional("port", FieldKind::Integer, 8080);
    /// assert!(!port.is_required());
    /// ```
    pub fn optional(name: impl Into<String>, kind: FieldKind, default: impl Into<Value>) -> Self {
        Self {
            name: name.into(),
            kind,
            default: Some(default.into()),
            map_selector: false,
        }
    }

    /// Mark this field as the map selector.
    pub fn map_selector(mut self) -> Self {
        self.map_selector = true;
        self
    }

    /// Whether the field has no default.
    pub fn is_required(&self) -> bool {
        self.default.is_none()
    }
}

/// A configuration type that can be built by the engine.
///
/// # Examples
///
/// ```rust
/// use confident::prelude::*;
/// use serde::Deserialize;
///
/// #[derive(Debug, Deserialize)]
/// struct ServerConfig {
///     host: String,
///     port: u16,
/// }
///
/// impl Schema for ServerConfig {
///     fn fields() -> Vec<FieldSpec> {
///         vec![
///             FieldSpec::required("host", FieldKind::String),
///             FieldSpec::optional("port", FieldKind::Integer, 8080),
///         ]
///     }
/// }
/// ```
pub trait Schema: DeserializeOwned {
    /// Declared fields.
    fn fields() -> Vec<FieldSpec>;

    /// Display name, used as the source name of default values.
    fn schema_name() -> String {
        let full = std::any::type_name::<Self>();
        let base = full.split('<').next().unwrap_or(full);
        base.rsplit("::").next().unwrap_or(base).to_string()
    }

    /// Class-level source options. Per-call options override these.
    fn options() -> ConfigOptions {
        ConfigOptions::default()
    }

    /// Source file declaring the type. Default values are tagged with it.
    fn class_path() -> Option<PathBuf> {
        None
    }

    /// Type-specific validation, run after deserialization.
    ///
    /// # Errors
    ///
    /// Return a `ValidationError` describing what failed.
    fn validate(&self) -> Result<(), ValidationError> {
        Ok(())
    }
}

/// Object-safe snapshot of a schema, handed to the loaders.
#[derive(Debug, Clone, PartialEq)]
pub struct SchemaInfo {
    name: String,
    fields: Vec<FieldSpec>,
}

impl SchemaInfo {
    /// Build from explicit parts.
    pub fn new(name: impl Into<String>, fields: Vec<FieldSpec>) -> Self {
        Self {
            name: name.into(),
            fields,
        }
    }

    /// Snapshot the declarations of `T`.
    pub fn of<T: Schema>() -> Self {
        Self::new(T::schema_name(), T::fields())
    }

    /// Schema display name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// All declared fields, in declaration order.
    pub fn fields(&self) -> &[FieldSpec] {
        &self.fields
    }

    /// Look up a declared field.
    pub fn field(&self, name: &str) -> Option<&FieldSpec> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Whether a field with this name is declared.
    pub fn contains(&self, name: &str) -> bool {
        self.field(name).is_some()
    }

    /// Names of fields flagged as map selector.
    pub fn map_selectors(&self) -> Vec<&str> {
        self.fields
            .iter()
            .filter(|f| f.map_selector)
            .map(|f| f.name.as_str())
            .collect()
    }

    /// Best-effort conversion of a raw source value for `field_name`.
    ///
    /// Values that already match the declared kind are kept. Strings are then
    /// offered to the JSON literal parser (numbers, booleans, null, arrays,
    /// objects). Anything else, including parse failures, passes through and
    /// is left for deserialization to accept or reject.
    pub fn convert(&self, field_name: &str, origin_value: &Value) -> Value {
        let declared = self.field(field_name).map(|f| f.kind);
        if declared.is_some_and(|kind| kind.matches(origin_value)) {
            return origin_value.clone();
        }
        if let Value::String(raw) = origin_value {
            if let Ok(parsed) = serde_json::from_str::<Value>(raw) {
                return parsed;
            }
        }
        origin_value.clone()
    }
}
