use crate::kernel::persistence::{PersistenceError, PersistenceGateway, SessionSnapshot};
use crate::kernel::services::ports::WorkspaceConfig;
use crate::models::FileStoreError;
use std::borrow::Cow;
use std::fmt;

use super::editor::PaneId;
use super::state::{
    ConfirmDialogState, NameEditOutcome, NameEditState, PendingAction, SidebarRow,
};
use super::{Action, AppState};

mod name_edit;

#[derive(Debug)]
pub enum DispatchError {
    File(FileStoreError),
    Persistence(PersistenceError),
}

impl fmt::Display for DispatchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DispatchError::File(e) => write!(f, "{}", e),
            DispatchError::Persistence(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for DispatchError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            DispatchError::File(e) => Some(e),
            DispatchError::Persistence(e) => Some(e),
        }
    }
}

impl From<FileStoreError> for DispatchError {
    fn from(e: FileStoreError) -> Self {
        DispatchError::File(e)
    }
}

impl From<PersistenceError> for DispatchError {
    fn from(e: PersistenceError) -> Self {
        DispatchError::Persistence(e)
    }
}

#[derive(Debug)]
pub struct DispatchResult {
    pub state_changed: bool,
    pub error: Option<DispatchError>,
}

impl DispatchResult {
    fn changed(state_changed: bool) -> Self {
        Self {
            state_changed,
            error: None,
        }
    }

    fn failed(error: impl Into<DispatchError>) -> Self {
        Self {
            state_changed: false,
            error: Some(error.into()),
        }
    }

    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }
}

/// The editing session: file registry, panes and inline UI state, plus the
/// gateway every mutation is persisted through.
#[derive(Debug)]
pub struct Store {
    state: AppState,
    gateway: PersistenceGateway,
    dirty: bool,
}

impl Store {
    pub fn new(config: WorkspaceConfig, gateway: PersistenceGateway) -> Self {
        Self {
            state: AppState::new(config),
            gateway,
            dirty: false,
        }
    }

    /// Loads the last snapshot from `gateway`, or starts empty when none exists.
    pub fn restore(
        config: WorkspaceConfig,
        gateway: PersistenceGateway,
    ) -> Result<Self, PersistenceError> {
        let Some(snapshot) = gateway.load()? else {
            return Ok(Self::new(config, gateway));
        };
        let (files, editor) = snapshot.restore(config.validator());
        tracing::info!(files = files.len(), "session restored");
        Ok(Self {
            state: AppState::from_parts(config, files, editor),
            gateway,
            dirty: false,
        })
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn gateway(&self) -> &PersistenceGateway {
        &self.gateway
    }

    /// True while the last snapshot write failed and memory is ahead of storage.
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn dispatch(&mut self, action: Action) -> DispatchResult {
        tracing::debug!(?action, "dispatch");
        let name_commit = matches!(action, Action::NameEditConfirm | Action::NameEditBlur);
        let persisted = action.is_persisted();

        let mut result = match action {
            Action::Open { pane, name } => {
                let pane = pane.unwrap_or(self.state.editor.focused_pane());
                let state = &mut self.state;
                DispatchResult::changed(state.editor.open_in_pane(
                    &mut state.files,
                    pane,
                    &name,
                    true,
                ))
            }
            Action::Create { name, pane } => {
                let pane = pane.unwrap_or(self.state.editor.focused_pane());
                self.create_file(pane, &name)
            }
            Action::Rename { from, to } => self.rename_file(&from, &to),
            Action::Delete { name } => self.delete_file(&name),
            Action::Close { pane, name } => {
                let state = &mut self.state;
                DispatchResult::changed(state.editor.close_tab(&mut state.files, pane, &name))
            }
            Action::FocusPane { pane } => {
                DispatchResult::changed(self.state.editor.focus_pane(pane))
            }
            Action::BufferSetText { pane, text } => {
                let changed = self.state.editor.set_buffer_text(pane, &text);
                self.commit_buffers(changed)
            }
            Action::BufferReplaceRange {
                pane,
                start_char,
                end_char,
                text,
            } => {
                let changed = self
                    .state
                    .editor
                    .replace_buffer_range(pane, start_char, end_char, &text);
                self.commit_buffers(changed)
            }
            Action::DeleteRequest { name } => self.request_delete(name),
            Action::DeleteConfirm => {
                let pending = self.state.ui.confirm_dialog.on_confirm.take();
                self.state.ui.confirm_dialog.reset();
                match pending {
                    Some(PendingAction::DeleteFile { name }) => self.delete_file(&name),
                    None => DispatchResult::changed(false),
                }
            }
            Action::DeleteCancel => {
                let was_visible = self.state.ui.confirm_dialog.visible;
                self.state.ui.confirm_dialog.reset();
                DispatchResult::changed(was_visible)
            }
            Action::NameEditBeginCreate
            | Action::NameEditBeginRename { .. }
            | Action::NameEditAppend(_)
            | Action::NameEditBackspace
            | Action::NameEditCursorLeft
            | Action::NameEditCursorRight
            | Action::NameEditSetValue(_)
            | Action::NameEditConfirm
            | Action::NameEditBlur
            | Action::NameEditCancel => self.reduce_name_edit_action(action),
        };

        let committed =
            name_commit && self.state.ui.name_edit.last_outcome == Some(NameEditOutcome::Committed);
        if (persisted || committed) && (result.state_changed || self.dirty) {
            if let Err(e) = self.persist() {
                if result.error.is_none() {
                    result.error = Some(e.into());
                }
            }
        }
        result
    }

    /// Retries a snapshot that failed earlier. No-op when storage is current.
    pub fn flush_pending(&mut self) -> Result<(), PersistenceError> {
        if !self.dirty {
            return Ok(());
        }
        self.persist()
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot::capture(&self.state.files, &self.state.editor)
    }

    fn persist(&mut self) -> Result<(), PersistenceError> {
        let state = &mut self.state;
        state.editor.flush_all(&mut state.files);
        let snapshot = self.snapshot();
        match self.gateway.save(&snapshot) {
            Ok(()) => {
                self.dirty = false;
                Ok(())
            }
            Err(e) => {
                tracing::warn!(error = %e, "session snapshot not written; will retry");
                self.dirty = true;
                Err(e)
            }
        }
    }

    fn commit_buffers(&mut self, changed: bool) -> DispatchResult {
        if changed {
            let state = &mut self.state;
            state.editor.flush_all(&mut state.files);
        }
        DispatchResult::changed(changed)
    }

    fn create_file(&mut self, pane: PaneId, name: &str) -> DispatchResult {
        let state = &mut self.state;
        match state.editor.create_and_open(&mut state.files, pane, name) {
            Ok(()) => {
                tracing::info!(name = name.trim(), pane = %pane, "file created");
                DispatchResult::changed(true)
            }
            Err(e) => DispatchResult::failed(e),
        }
    }

    fn rename_file(&mut self, from: &str, to: &str) -> DispatchResult {
        let state = &mut self.state;
        match state.editor.rename_file(&mut state.files, from, to) {
            Ok(()) => {
                tracing::info!(from, to = to.trim(), "file renamed");
                DispatchResult::changed(true)
            }
            Err(e) => DispatchResult::failed(e),
        }
    }

    fn delete_file(&mut self, name: &str) -> DispatchResult {
        let state = &mut self.state;
        match state.editor.delete_file(&mut state.files, name) {
            Ok(()) => {
                tracing::info!(name, "file deleted");
                DispatchResult::changed(true)
            }
            Err(e) => DispatchResult::failed(e),
        }
    }

    fn request_delete(&mut self, name: String) -> DispatchResult {
        if !self.state.files.contains(&name) {
            return DispatchResult::failed(FileStoreError::NotFound);
        }
        let dialog = &mut self.state.ui.confirm_dialog;
        dialog.visible = true;
        dialog.message = format!("Are you sure you want to delete \"{}\"?", name);
        dialog.on_confirm = Some(PendingAction::DeleteFile { name });
        DispatchResult::changed(true)
    }

    pub fn list_files(&self) -> Vec<&str> {
        self.state.files.names().collect()
    }

    pub fn tabs(&self, pane: PaneId) -> &[String] {
        self.state.editor.pane(pane).tabs()
    }

    pub fn active(&self, pane: PaneId) -> Option<&str> {
        self.state.editor.pane(pane).active()
    }

    /// Current text of `name`, including edits still held in a live buffer.
    pub fn content(&self, name: &str) -> Option<Cow<'_, str>> {
        if let Some(buffer) = self.state.editor.live_buffer(name) {
            return Some(buffer.text());
        }
        self.state.files.read(name).map(Cow::Borrowed)
    }

    pub fn focused_pane(&self) -> PaneId {
        self.state.editor.focused_pane()
    }

    pub fn is_collapsed(&self, pane: PaneId) -> bool {
        self.state.editor.pane(pane).is_collapsed()
    }

    /// No files at all; the collaborator shows its empty-state message.
    pub fn is_empty(&self) -> bool {
        self.state.files.is_empty()
    }

    pub fn name_edit(&self) -> &NameEditState {
        &self.state.ui.name_edit
    }

    pub fn confirm_dialog(&self) -> &ConfirmDialogState {
        &self.state.ui.confirm_dialog
    }

    pub fn sidebar_rows(&self) -> Vec<SidebarRow> {
        self.state.sidebar_rows()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/kernel/store.rs"]
mod tests;
