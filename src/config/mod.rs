//! Persistent state: the runtime registry and user settings

pub mod registry;
mod settings;

pub use registry::{JsonFileStore, Registry, RegistryStore};
pub use settings::Settings;
