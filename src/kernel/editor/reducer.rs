use crate::models::{FileStore, FileStoreError};

use super::state::{EditorState, PaneId};

impl EditorState {
    /// Opens `name` in `pane`, moving it out of any other pane first.
    ///
    /// Every pane's live buffer is flushed before anything else changes.
    /// Returns whether the store or the session changed.
    pub fn open_in_pane(
        &mut self,
        files: &mut FileStore,
        pane: PaneId,
        name: &str,
        focus: bool,
    ) -> bool {
        if !files.contains(name) {
            return false;
        }

        let mut changed = self.flush_all(files);

        for other in self.panes.iter_mut().filter(|p| p.id != pane) {
            if other.remove_tab(name, files) {
                tracing::debug!(name, from = %other.id, to = %pane, "move tab between panes");
                changed = true;
            }
        }

        let target = self.pane_mut(pane);
        changed |= target.push_tab(name);
        changed |= target.activate(name, files);

        if focus && self.focused != pane {
            self.focused = pane;
            changed = true;
        }

        changed
    }

    pub fn close_tab(&mut self, files: &mut FileStore, pane: PaneId, name: &str) -> bool {
        let pane_state = self.pane_mut(pane);
        if !pane_state.contains(name) {
            return false;
        }
        pane_state.flush(files);
        let changed = pane_state.remove_tab(name, files);
        if pane_state.is_collapsed() {
            tracing::debug!(pane = %pane, "pane collapsed");
        }
        changed
    }

    /// Rewrites references to `old` after the store renamed it.
    pub fn rename_propagate(&mut self, old: &str, new: &str) -> bool {
        let mut changed = false;
        for pane in &mut self.panes {
            changed |= pane.rename_tab(old, new);
        }
        changed
    }

    /// Drops every reference to `name` after the store deleted it.
    pub fn delete_cascade(&mut self, files: &FileStore, name: &str) -> bool {
        let mut changed = false;
        for pane in &mut self.panes {
            // The deleted file's buffer is discarded with its tab, never flushed.
            changed |= pane.remove_tab(name, files);
        }
        changed
    }

    pub fn create_and_open(
        &mut self,
        files: &mut FileStore,
        pane: PaneId,
        name: &str,
    ) -> Result<(), FileStoreError> {
        let name = name.trim();
        files.create(name, "")?;
        self.open_in_pane(files, pane, name, true);
        Ok(())
    }

    /// Renames in the store and, on success, across all panes.
    pub fn rename_file(
        &mut self,
        files: &mut FileStore,
        old: &str,
        new: &str,
    ) -> Result<(), FileStoreError> {
        let new = new.trim();
        files.rename(old, new)?;
        self.rename_propagate(old, new);
        Ok(())
    }

    /// Deletes from the store and, on success, cascades across all panes.
    pub fn delete_file(&mut self, files: &mut FileStore, name: &str) -> Result<(), FileStoreError> {
        files.delete(name)?;
        self.delete_cascade(files, name);
        Ok(())
    }

    pub fn focus_pane(&mut self, pane: PaneId) -> bool {
        if self.focused == pane {
            return false;
        }
        self.focused = pane;
        true
    }

    pub fn flush_all(&mut self, files: &mut FileStore) -> bool {
        let mut changed = false;
        for pane in &mut self.panes {
            changed |= pane.flush(files);
        }
        changed
    }

    pub fn set_buffer_text(&mut self, pane: PaneId, text: &str) -> bool {
        self.pane_mut(pane)
            .buffer_mut()
            .is_some_and(|buffer| buffer.set_text(text))
    }

    pub fn replace_buffer_range(
        &mut self,
        pane: PaneId,
        start_char: usize,
        end_char: usize,
        text: &str,
    ) -> bool {
        self.pane_mut(pane)
            .buffer_mut()
            .is_some_and(|buffer| buffer.replace_chars(start_char, end_char, text))
    }
}

#[cfg(test)]
#[path = "../../../tests/unit/kernel/editor/reducer.rs"]
mod tests;
