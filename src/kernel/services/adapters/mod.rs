//! Service adapters: OS specific implementations (paths, files).

pub mod kv;
pub mod paths;
pub mod settings;

pub use kv::{JsonFileKv, MemoryKv};
pub use paths::{ensure_log_dir, get_log_dir, get_session_file_path};
pub use settings::{
    ensure_settings_file, get_settings_path, load_settings, load_settings_from,
    write_default_settings,
};
