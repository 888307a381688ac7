use crate::kernel::state::{NameEditKind, NameEditOutcome};
use crate::kernel::Action;
use crate::models::FileStoreError;

use super::DispatchResult;

impl super::Store {
    pub(super) fn reduce_name_edit_action(&mut self, action: Action) -> DispatchResult {
        match action {
            Action::NameEditBeginCreate => {
                self.cancel_open_name_edit();
                let placeholder = self.state.config.new_file_placeholder.clone();
                self.state
                    .ui
                    .name_edit
                    .begin(NameEditKind::Create, placeholder);
                DispatchResult::changed(true)
            }
            Action::NameEditBeginRename { name } => {
                if !self.state.files.contains(&name) {
                    return DispatchResult::failed(FileStoreError::NotFound);
                }
                self.cancel_open_name_edit();
                self.state
                    .ui
                    .name_edit
                    .begin(NameEditKind::Rename { from: name.clone() }, name);
                DispatchResult::changed(true)
            }
            Action::NameEditAppend(ch) => {
                let edit = &mut self.state.ui.name_edit;
                if !edit.is_editing() {
                    return DispatchResult::changed(false);
                }

                edit.error = None;
                if edit.cursor > edit.value.len() {
                    edit.cursor = edit.value.len();
                }
                edit.value.insert(edit.cursor, ch);
                edit.cursor += ch.len_utf8();
                DispatchResult::changed(true)
            }
            Action::NameEditBackspace => {
                let edit = &mut self.state.ui.name_edit;
                if !edit.is_editing() || edit.cursor == 0 {
                    return DispatchResult::changed(false);
                }

                edit.error = None;
                let prev = edit.value[..edit.cursor]
                    .char_indices()
                    .last()
                    .map(|(i, _)| i)
                    .unwrap_or(0);
                edit.value.drain(prev..edit.cursor);
                edit.cursor = prev;
                DispatchResult::changed(true)
            }
            Action::NameEditCursorLeft => {
                let edit = &mut self.state.ui.name_edit;
                if !edit.is_editing() || edit.cursor == 0 {
                    return DispatchResult::changed(false);
                }

                let prev = edit.value[..edit.cursor]
                    .char_indices()
                    .last()
                    .map(|(i, _)| i)
                    .unwrap_or(0);
                let changed = prev != edit.cursor;
                edit.cursor = prev;
                DispatchResult::changed(changed)
            }
            Action::NameEditCursorRight => {
                let edit = &mut self.state.ui.name_edit;
                if !edit.is_editing() || edit.cursor >= edit.value.len() {
                    return DispatchResult::changed(false);
                }

                let next = edit.value[edit.cursor..]
                    .chars()
                    .next()
                    .map(|ch| edit.cursor + ch.len_utf8())
                    .unwrap_or(edit.value.len());
                let changed = next != edit.cursor;
                edit.cursor = next;
                DispatchResult::changed(changed)
            }
            Action::NameEditSetValue(value) => {
                let edit = &mut self.state.ui.name_edit;
                if !edit.is_editing() {
                    return DispatchResult::changed(false);
                }
                edit.error = None;
                edit.cursor = value.len();
                edit.value = value;
                DispatchResult::changed(true)
            }
            // Losing focus commits exactly like Enter does.
            Action::NameEditConfirm | Action::NameEditBlur => self.commit_name_edit(),
            Action::NameEditCancel => {
                if !self.state.ui.name_edit.is_editing() {
                    return DispatchResult::changed(false);
                }
                self.state.ui.name_edit.finish(NameEditOutcome::Cancelled);
                DispatchResult::changed(true)
            }
            _ => unreachable!("non-name-edit action passed to reduce_name_edit_action"),
        }
    }

    fn cancel_open_name_edit(&mut self) {
        let edit = &mut self.state.ui.name_edit;
        if edit.is_editing() {
            tracing::debug!(value = %edit.value, "replacing unfinished name edit");
            edit.finish(NameEditOutcome::Cancelled);
        }
    }

    fn commit_name_edit(&mut self) -> DispatchResult {
        let edit = &self.state.ui.name_edit;
        let Some(kind) = edit.kind.clone() else {
            return DispatchResult::changed(false);
        };

        let value = edit.value.trim().to_string();
        if value.is_empty() || kind.prior_name() == Some(value.as_str()) {
            self.state.ui.name_edit.finish(NameEditOutcome::Cancelled);
            return DispatchResult::changed(true);
        }

        let checked = self
            .state
            .files
            .validator()
            .validate(&value)
            .map_err(FileStoreError::from)
            .and_then(|()| {
                if self.state.files.contains(&value) {
                    Err(FileStoreError::DuplicateName)
                } else {
                    Ok(())
                }
            });

        let applied = checked.and_then(|()| {
            let state = &mut self.state;
            match &kind {
                NameEditKind::Create => {
                    let pane = state.editor.focused_pane();
                    state.editor.create_and_open(&mut state.files, pane, &value)
                }
                NameEditKind::Rename { from } => {
                    state.editor.rename_file(&mut state.files, from, &value)
                }
            }
        });

        match applied {
            Ok(()) => {
                tracing::info!(name = %value, prior = ?kind.prior_name(), "name edit committed");
                self.state.ui.name_edit.finish(NameEditOutcome::Committed);
                DispatchResult::changed(true)
            }
            Err(e) => {
                // stay in editing so the user can correct the name
                let edit = &mut self.state.ui.name_edit;
                let prev = edit.error.replace(e.to_string());
                DispatchResult {
                    state_changed: prev != edit.error,
                    error: Some(e.into()),
                }
            }
        }
    }
}
