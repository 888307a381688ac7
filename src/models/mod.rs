//! 数据模型层

pub mod edit_buffer;
pub mod file_name;
pub mod file_store;

pub use edit_buffer::{slice_to_cow, EditBuffer};
pub use file_name::{extension_of, NameError, NameValidator, DEFAULT_EXTENSIONS};
pub use file_store::{FileStore, FileStoreError};
