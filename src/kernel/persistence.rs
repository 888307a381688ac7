//! Session snapshots: capture, restore and the gateway writing them into a
//! [`KvStore`].

use crate::kernel::editor::{EditorState, PaneId};
use crate::kernel::services::ports::KvStore;
use crate::models::{FileStore, NameValidator};
use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::{fmt, io};

pub const SESSION_KEY: &str = "zpad.session";
/// Key of the bare `{name: content}` map written by older builds.
pub const LEGACY_FILES_KEY: &str = "editorFiles";
pub const SNAPSHOT_VERSION: u32 = 1;

#[derive(Debug)]
pub enum PersistenceError {
    Unavailable(io::Error),
    Corrupt(serde_json::Error),
    UnsupportedVersion(u32),
}

impl fmt::Display for PersistenceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PersistenceError::Unavailable(e) => write!(f, "storage unavailable: {}", e),
            PersistenceError::Corrupt(e) => write!(f, "corrupt session snapshot: {}", e),
            PersistenceError::UnsupportedVersion(v) => {
                write!(f, "unsupported session snapshot version: {}", v)
            }
        }
    }
}

impl std::error::Error for PersistenceError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            PersistenceError::Unavailable(e) => Some(e),
            PersistenceError::Corrupt(e) => Some(e),
            PersistenceError::UnsupportedVersion(_) => None,
        }
    }
}

impl From<io::Error> for PersistenceError {
    fn from(e: io::Error) -> Self {
        PersistenceError::Unavailable(e)
    }
}

impl From<serde_json::Error> for PersistenceError {
    fn from(e: serde_json::Error) -> Self {
        PersistenceError::Corrupt(e)
    }
}

fn default_version() -> u32 {
    SNAPSHOT_VERSION
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSnapshot {
    #[serde(default = "default_version")]
    pub version: u32,
    #[serde(default)]
    pub files: BTreeMap<String, String>,
    #[serde(default)]
    pub open_files: BTreeMap<String, Vec<String>>,
    #[serde(default)]
    pub current_files: BTreeMap<String, Option<String>>,
}

impl SessionSnapshot {
    pub fn empty() -> Self {
        Self {
            version: SNAPSHOT_VERSION,
            files: BTreeMap::new(),
            open_files: BTreeMap::new(),
            current_files: BTreeMap::new(),
        }
    }

    /// Full snapshot of the store and every pane. Live buffers are not read;
    /// callers flush them first.
    pub fn capture(files: &FileStore, editor: &EditorState) -> Self {
        let mut snapshot = Self::empty();
        snapshot.files = files
            .entries()
            .map(|(name, content)| (name.to_string(), content.to_string()))
            .collect();
        for pane in editor.panes() {
            let key = pane.id.to_string();
            snapshot.open_files.insert(key.clone(), pane.tabs().to_vec());
            snapshot
                .current_files
                .insert(key, pane.active().map(str::to_string));
        }
        snapshot
    }

    /// Rebuilds the store and panes. Dangling or conflicting references are
    /// dropped instead of failing the load.
    pub fn restore(self, validator: NameValidator) -> (FileStore, EditorState) {
        let mut files = FileStore::from_entries(validator, self.files);
        let mut editor = EditorState::new();
        let mut seen: FxHashSet<String> = FxHashSet::default();

        for (key, tabs) in &self.open_files {
            let Some(pane) = PaneId::parse(key) else {
                tracing::warn!(pane = %key, "dropping tabs of unknown pane");
                continue;
            };
            for name in tabs {
                if !files.contains(name) {
                    tracing::warn!(name = %name, pane = %pane, "dropping tab for missing file");
                    continue;
                }
                if !seen.insert(name.clone()) {
                    tracing::warn!(name = %name, pane = %pane, "dropping duplicate tab");
                    continue;
                }
                editor.open_in_pane(&mut files, pane, name, false);
            }
        }

        // `open_in_pane` left each pane on its last tab; apply the saved pointer.
        for pane in PaneId::ALL {
            let current = self
                .current_files
                .get(&pane.to_string())
                .cloned()
                .flatten();
            match current {
                Some(name) if editor.pane(pane).contains(&name) => {
                    editor.open_in_pane(&mut files, pane, &name, false);
                }
                Some(name) => {
                    tracing::warn!(name = %name, pane = %pane, "dropping active file not open in pane");
                }
                None => {}
            }
        }

        (files, editor)
    }
}

/// Reads and writes [`SessionSnapshot`]s through a key-value substrate.
pub struct PersistenceGateway {
    kv: Box<dyn KvStore>,
}

impl PersistenceGateway {
    pub fn new(kv: Box<dyn KvStore>) -> Self {
        Self { kv }
    }

    pub fn kv(&self) -> &dyn KvStore {
        self.kv.as_ref()
    }

    pub fn save(&mut self, snapshot: &SessionSnapshot) -> Result<(), PersistenceError> {
        let data = serde_json::to_string(snapshot)?;
        self.kv.set(SESSION_KEY, &data)?;
        tracing::debug!(
            substrate = self.kv.name(),
            files = snapshot.files.len(),
            "session snapshot written"
        );
        Ok(())
    }

    /// `Ok(None)` when nothing has been stored yet.
    pub fn load(&self) -> Result<Option<SessionSnapshot>, PersistenceError> {
        if let Some(data) = self.kv.get(SESSION_KEY)? {
            let snapshot: SessionSnapshot = serde_json::from_str(&data)?;
            if snapshot.version > SNAPSHOT_VERSION {
                return Err(PersistenceError::UnsupportedVersion(snapshot.version));
            }
            return Ok(Some(snapshot));
        }

        let Some(data) = self.kv.get(LEGACY_FILES_KEY)? else {
            return Ok(None);
        };
        let files: BTreeMap<String, String> = serde_json::from_str(&data)?;
        tracing::info!(files = files.len(), "importing legacy file map");
        let mut snapshot = SessionSnapshot::empty();
        snapshot.files = files;
        Ok(Some(snapshot))
    }
}

impl fmt::Debug for PersistenceGateway {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PersistenceGateway")
            .field("substrate", &self.kv.name())
            .finish()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/kernel/persistence.rs"]
mod tests;
