use crate::models::{EditBuffer, FileStore};
use std::fmt;

/// Number of editor panes. Pane 2 is collapsed whenever its tab list is empty.
pub const PANE_COUNT: usize = 2;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PaneId(u8);

impl PaneId {
    pub const PRIMARY: Self = Self(1);
    pub const SECONDARY: Self = Self(2);
    pub const ALL: [Self; PANE_COUNT] = [Self::PRIMARY, Self::SECONDARY];

    pub const fn new(raw: u8) -> Option<Self> {
        if raw >= 1 && raw as usize <= PANE_COUNT {
            Some(Self(raw))
        } else {
            None
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        value.trim().parse::<u8>().ok().and_then(Self::new)
    }

    pub const fn raw(self) -> u8 {
        self.0
    }

    pub(crate) const fn index(self) -> usize {
        self.0 as usize - 1
    }
}

impl Default for PaneId {
    fn default() -> Self {
        Self::PRIMARY
    }
}

impl fmt::Display for PaneId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone)]
pub struct EditorPaneState {
    pub id: PaneId,
    pub(super) tabs: Vec<String>,
    pub(super) active: Option<String>,
    pub(super) buffer: Option<EditBuffer>,
}

impl EditorPaneState {
    pub fn new(id: PaneId) -> Self {
        Self {
            id,
            tabs: Vec::new(),
            active: None,
            buffer: None,
        }
    }

    pub fn tabs(&self) -> &[String] {
        &self.tabs
    }

    pub fn active(&self) -> Option<&str> {
        self.active.as_deref()
    }

    /// Live edit buffer of the active file.
    pub fn buffer(&self) -> Option<&EditBuffer> {
        self.buffer.as_ref()
    }

    pub fn buffer_mut(&mut self) -> Option<&mut EditBuffer> {
        self.buffer.as_mut()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.position(name).is_some()
    }

    pub fn position(&self, name: &str) -> Option<usize> {
        self.tabs.iter().position(|t| t == name)
    }

    pub fn is_collapsed(&self) -> bool {
        self.tabs.is_empty()
    }

    pub(super) fn push_tab(&mut self, name: &str) -> bool {
        if self.contains(name) {
            return false;
        }
        self.tabs.push(name.to_string());
        true
    }

    /// Makes `name` active and loads its text into the live buffer.
    pub(super) fn activate(&mut self, name: &str, files: &FileStore) -> bool {
        if self.active.as_deref() == Some(name) {
            return false;
        }
        self.active = Some(name.to_string());
        self.buffer = files
            .read(name)
            .map(|content| EditBuffer::from_text(name, content));
        true
    }

    /// Removes a tab. When it was active, the last remaining tab (insertion
    /// order) takes over, or the pane collapses.
    pub(super) fn remove_tab(&mut self, name: &str, files: &FileStore) -> bool {
        let Some(index) = self.position(name) else {
            return false;
        };
        self.tabs.remove(index);

        if self.active.as_deref() == Some(name) {
            self.active = None;
            self.buffer = None;
            if let Some(last) = self.tabs.last().cloned() {
                self.activate(&last, files);
            }
        }
        true
    }

    pub(super) fn rename_tab(&mut self, old: &str, new: &str) -> bool {
        let Some(index) = self.position(old) else {
            return false;
        };
        self.tabs[index] = new.to_string();
        if self.active.as_deref() == Some(old) {
            self.active = Some(new.to_string());
            if let Some(buffer) = self.buffer.as_mut() {
                buffer.set_name(new);
            }
        }
        true
    }

    /// Commits the live buffer into the store.
    pub(super) fn flush(&mut self, files: &mut FileStore) -> bool {
        let Some(buffer) = self.buffer.as_mut() else {
            return false;
        };
        if !buffer.is_dirty() {
            return false;
        }
        let written = files.write(buffer.name(), &buffer.text());
        buffer.mark_clean();
        written
    }
}

#[derive(Debug, Clone)]
pub struct EditorState {
    pub(super) panes: Vec<EditorPaneState>,
    pub(super) focused: PaneId,
}

impl EditorState {
    pub fn new() -> Self {
        Self {
            panes: PaneId::ALL.iter().map(|&id| EditorPaneState::new(id)).collect(),
            focused: PaneId::PRIMARY,
        }
    }

    pub fn pane(&self, pane: PaneId) -> &EditorPaneState {
        &self.panes[pane.index()]
    }

    pub fn pane_mut(&mut self, pane: PaneId) -> &mut EditorPaneState {
        &mut self.panes[pane.index()]
    }

    pub fn panes(&self) -> &[EditorPaneState] {
        &self.panes
    }

    pub fn focused_pane(&self) -> PaneId {
        self.focused
    }

    /// Pane currently holding `name`, if any.
    pub fn pane_of(&self, name: &str) -> Option<PaneId> {
        self.panes.iter().find(|p| p.contains(name)).map(|p| p.id)
    }

    /// The live buffer for `name` when it is active somewhere.
    pub fn live_buffer(&self, name: &str) -> Option<&EditBuffer> {
        self.panes
            .iter()
            .filter_map(|p| p.buffer.as_ref())
            .find(|b| b.name() == name)
    }
}

impl Default for EditorState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[path = "../../../tests/unit/kernel/editor/state.rs"]
mod tests;
