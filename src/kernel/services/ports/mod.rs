//! Service ports: traits + data contracts.

pub mod config;
pub mod kv;
pub mod settings;

pub use config::WorkspaceConfig;
pub use kv::KvStore;
pub use settings::Settings;
