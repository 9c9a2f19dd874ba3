//! # confident
//!
//! Typed configuration objects assembled from several sources, with a record
//! of where every value came from.
//!
//! ## Overview
//!
//! A configuration type declares its fields through the [`Schema`] trait.
//! Building it gathers candidate values from five sources:
//! - explicit init values passed to the builder
//! - environment variables named after the fields
//! - one entry of a map document (for example one per deployment)
//! - JSON and YAML files
//! - defaults declared by the schema
//!
//! The highest-priority source that produced a value for a field wins. The
//! priority list is configurable per type and per call, and sources missing
//! from the list are not consulted at all.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use confident::prelude::*;
//! use serde::Deserialize;
//!
//! #[derive(Debug, Deserialize)]
//! struct AppConfig {
//!     host: String,
//!     port: u16,
//! }
//!
//! impl Schema for AppConfig {
//!     fn fields() -> Vec<FieldSpec> {
//!         vec![
//!             FieldSpec::required("host", FieldKind::String),
//!             FieldSpec::optional("port", FieldKind::Integer, 8080),
//!         ]
//!     }
//! }
//!
//! # fn example() -> confident::error::Result<()> {
//! let config = Confident::builder()
//!     .with_file("config/default.yaml")
//!     .with_file("config/production.yaml")
//!     .build::<AppConfig>()?;
//!
//! println!("Server port: {}", config.port);
//! for (name, field) in config.full_fields() {
//!     println!("{name} = {} ({} at {})", field.value, field.source_type, field.source_location);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Value conversion
//!
//! Values read from the environment, files and map documents are converted
//! before merging. A value that already matches the declared [`FieldKind`]
//! is kept; a string is otherwise parsed as a JSON literal, so `"5001"`
//! becomes a number and `"[1, 2]"` a list. Explicit init values and declared
//! defaults are never converted.
//!
//! [`Schema`]: crate::schema::Schema
//! [`FieldKind`]: crate::schema::FieldKind

#![warn(missing_docs, rust_2024_compatibility)]
#![deny(unsafe_code)]

pub mod core;
pub mod error;
pub mod field;
pub mod format;
pub mod schema;
pub mod sources;
pub mod specs;

/// Convenient re-exports for common usage patterns.
pub mod prelude {
    pub use crate::core::{Confident, ConfidentBuilder};
    pub use crate::error::{ConfigError, Result, ValidationError};
    pub use crate::field::{ConfigField, ConfigSource, SourceLocation};
    pub use crate::schema::{FieldKind, FieldSpec, Schema};
    pub use crate::specs::{ConfigMap, ConfigOptions, ConfigSpecs};
}
