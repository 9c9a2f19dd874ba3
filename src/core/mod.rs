//! Construction of configuration objects.

mod builder;
mod config_handle;
mod loader;

pub use builder::ConfidentBuilder;
pub use config_handle::Confident;
pub use loader::LoaderManager;
