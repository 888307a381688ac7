//! 虚拟文件存储：名称 → 内容
//!
//! 名称唯一且即身份；所有存在性判断都以此为准。

use super::file_name::{NameError, NameValidator};
use std::collections::BTreeMap;
use std::fmt;

pub type Result<T> = std::result::Result<T, FileStoreError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileStoreError {
    Name(NameError),
    DuplicateName,
    NotFound,
}

impl fmt::Display for FileStoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FileStoreError::Name(e) => write!(f, "{}", e),
            FileStoreError::DuplicateName => write!(f, "File already exists!"),
            FileStoreError::NotFound => write!(f, "File not found"),
        }
    }
}

impl std::error::Error for FileStoreError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            FileStoreError::Name(e) => Some(e),
            _ => None,
        }
    }
}

impl From<NameError> for FileStoreError {
    fn from(e: NameError) -> Self {
        FileStoreError::Name(e)
    }
}

#[derive(Debug, Clone, Default)]
pub struct FileStore {
    files: BTreeMap<String, String>,
    validator: NameValidator,
}

impl FileStore {
    pub fn new(validator: NameValidator) -> Self {
        Self {
            files: BTreeMap::new(),
            validator,
        }
    }

    /// Rebuilds a store from persisted entries. Names are trusted as stored.
    pub fn from_entries<I>(validator: NameValidator, entries: I) -> Self
    where
        I: IntoIterator<Item = (String, String)>,
    {
        Self {
            files: entries.into_iter().collect(),
            validator,
        }
    }

    pub fn validator(&self) -> &NameValidator {
        &self.validator
    }

    /// Surrounding whitespace is not part of a name; the trimmed form is stored.
    pub fn create(&mut self, name: &str, content: &str) -> Result<()> {
        let name = name.trim();
        if self.files.contains_key(name) {
            return Err(FileStoreError::DuplicateName);
        }
        self.validator.validate(name)?;
        self.files.insert(name.to_string(), content.to_string());
        Ok(())
    }

    pub fn rename(&mut self, old: &str, new: &str) -> Result<()> {
        let new = new.trim();
        if !self.files.contains_key(old) {
            return Err(FileStoreError::NotFound);
        }
        if self.files.contains_key(new) {
            return Err(FileStoreError::DuplicateName);
        }
        self.validator.validate(new)?;

        // All checks passed; the move below cannot fail halfway.
        if let Some(content) = self.files.remove(old) {
            self.files.insert(new.to_string(), content);
        }
        Ok(())
    }

    pub fn delete(&mut self, name: &str) -> Result<String> {
        self.files.remove(name).ok_or(FileStoreError::NotFound)
    }

    /// Overwrites the content of an existing file. Never inserts.
    pub fn write(&mut self, name: &str, content: &str) -> bool {
        match self.files.get_mut(name) {
            Some(slot) => {
                if slot.as_str() != content {
                    slot.clear();
                    slot.push_str(content);
                }
                true
            }
            None => false,
        }
    }

    pub fn read(&self, name: &str) -> Option<&str> {
        self.files.get(name).map(String::as_str)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.files.contains_key(name)
    }

    /// Names in sorted order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.files.keys().map(String::as_str)
    }

    pub fn entries(&self) -> impl Iterator<Item = (&str, &str)> {
        self.files.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/models/file_store.rs"]
mod tests;
