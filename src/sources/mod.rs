//! Configuration source loaders.
//!
//! One loader exists per [`ConfigSource`](crate::field::ConfigSource) kind.
//! Custom loaders implement [`SourceLoader`] and are registered on a
//! [`LoaderManager`](crate::core::LoaderManager).

mod default;
mod env;
mod file;
mod init;
mod map;
mod source_loader;

pub use default::DefaultSource;
pub use env::EnvSource;
pub use file::FileSource;
pub use init::InitSource;
pub use map::MapSource;
pub use source_loader::{LoadContext, SourceLoader};
