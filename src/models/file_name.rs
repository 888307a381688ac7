//! 文件名校验
//!
//! 规则（按顺序检查，返回第一个失败项）：
//! - 非空
//! - 含扩展名分隔符 `.`
//! - 扩展名（小写）在允许集合内

use rustc_hash::FxHashSet;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NameError {
    EmptyName,
    MissingExtension,
    InvalidExtension,
}

impl fmt::Display for NameError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NameError::EmptyName => write!(f, "Name required"),
            NameError::MissingExtension => write!(f, "Please include a file extension."),
            NameError::InvalidExtension => write!(f, "Unsupported file type!"),
        }
    }
}

impl std::error::Error for NameError {}

/// Decides whether a candidate file name may be committed to the store.
#[derive(Debug, Clone)]
pub struct NameValidator {
    allowed: FxHashSet<String>,
}

impl NameValidator {
    pub fn new<I, S>(allowed_extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let allowed = allowed_extensions
            .into_iter()
            .map(|ext| ext.as_ref().trim().trim_start_matches('.').to_ascii_lowercase())
            .filter(|ext| !ext.is_empty())
            .collect();
        Self { allowed }
    }

    pub fn validate(&self, name: &str) -> Result<(), NameError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(NameError::EmptyName);
        }
        let Some(ext) = extension_of(name) else {
            return Err(NameError::MissingExtension);
        };
        if !self.allowed.contains(&ext.to_ascii_lowercase()) {
            return Err(NameError::InvalidExtension);
        }
        Ok(())
    }

    pub fn is_acceptable(&self, name: &str) -> bool {
        self.validate(name).is_ok()
    }

    pub fn allows_extension(&self, ext: &str) -> bool {
        self.allowed.contains(&ext.to_ascii_lowercase())
    }
}

impl Default for NameValidator {
    fn default() -> Self {
        Self::new(DEFAULT_EXTENSIONS)
    }
}

pub const DEFAULT_EXTENSIONS: [&str; 4] = ["txt", "html", "css", "js"];

/// Suffix after the last `.`; `None` when the name has no separator.
pub fn extension_of(name: &str) -> Option<&str> {
    name.rsplit_once('.').map(|(_, ext)| ext)
}

#[cfg(test)]
#[path = "../../tests/unit/models/file_name.rs"]
mod tests;
