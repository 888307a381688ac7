use crate::kernel::editor::PaneId;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// `pane: None` targets the focused pane (a sidebar click).
    Open {
        pane: Option<PaneId>,
        name: String,
    },
    Create {
        name: String,
        pane: Option<PaneId>,
    },
    Rename {
        from: String,
        to: String,
    },
    /// Deletes without asking; the collaborator already confirmed.
    Delete {
        name: String,
    },
    Close {
        pane: PaneId,
        name: String,
    },
    FocusPane {
        pane: PaneId,
    },
    BufferSetText {
        pane: PaneId,
        text: String,
    },
    BufferReplaceRange {
        pane: PaneId,
        start_char: usize,
        end_char: usize,
        text: String,
    },
    NameEditBeginCreate,
    NameEditBeginRename {
        name: String,
    },
    NameEditAppend(char),
    NameEditBackspace,
    NameEditCursorLeft,
    NameEditCursorRight,
    NameEditSetValue(String),
    NameEditConfirm,
    NameEditBlur,
    NameEditCancel,
    DeleteRequest {
        name: String,
    },
    DeleteConfirm,
    DeleteCancel,
}

impl Action {
    /// Whether a dispatch that changed state must write a snapshot. Name-edit
    /// commits are decided by their outcome instead.
    pub fn is_persisted(&self) -> bool {
        matches!(
            self,
            Action::Open { .. }
                | Action::Create { .. }
                | Action::Rename { .. }
                | Action::Delete { .. }
                | Action::Close { .. }
                | Action::BufferSetText { .. }
                | Action::BufferReplaceRange { .. }
                | Action::DeleteConfirm
        )
    }
}
