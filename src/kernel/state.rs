use crate::kernel::editor::{EditorState, PaneId};
use crate::kernel::services::ports::WorkspaceConfig;
use crate::models::FileStore;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NameEditKind {
    Create,
    Rename { from: String },
}

impl NameEditKind {
    pub fn prior_name(&self) -> Option<&str> {
        match self {
            NameEditKind::Create => None,
            NameEditKind::Rename { from } => Some(from),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NameEditOutcome {
    Committed,
    Cancelled,
}

/// Inline filename field used by the "new file" and "rename" flows.
///
/// `kind == None` is the idle state.
#[derive(Debug, Clone, Default)]
pub struct NameEditState {
    pub kind: Option<NameEditKind>,
    pub value: String,
    pub cursor: usize,
    pub error: Option<String>,
    pub last_outcome: Option<NameEditOutcome>,
}

impl NameEditState {
    pub fn is_editing(&self) -> bool {
        self.kind.is_some()
    }

    pub(crate) fn begin(&mut self, kind: NameEditKind, value: String) {
        self.cursor = value.len();
        self.value = value;
        self.kind = Some(kind);
        self.error = None;
        self.last_outcome = None;
    }

    pub(crate) fn finish(&mut self, outcome: NameEditOutcome) {
        *self = Self {
            last_outcome: Some(outcome),
            ..Self::default()
        };
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PendingAction {
    DeleteFile { name: String },
}

#[derive(Debug, Clone, Default)]
pub struct ConfirmDialogState {
    pub visible: bool,
    pub message: String,
    pub on_confirm: Option<PendingAction>,
}

impl ConfirmDialogState {
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

#[derive(Debug, Clone, Default)]
pub struct UiState {
    pub name_edit: NameEditState,
    pub confirm_dialog: ConfirmDialogState,
}

/// One sidebar entry as the file list should display it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SidebarRow {
    pub label: String,
    /// `None` for the placeholder row of an in-progress create.
    pub name: Option<String>,
    pub editing: bool,
    pub active_in: Option<PaneId>,
}

#[derive(Debug)]
pub struct AppState {
    pub config: WorkspaceConfig,
    pub files: FileStore,
    pub editor: EditorState,
    pub ui: UiState,
}

impl AppState {
    pub fn new(config: WorkspaceConfig) -> Self {
        let files = FileStore::new(config.validator());
        Self::from_parts(config, files, EditorState::new())
    }

    pub fn from_parts(config: WorkspaceConfig, files: FileStore, editor: EditorState) -> Self {
        Self {
            config,
            files,
            editor,
            ui: UiState::default(),
        }
    }

    pub fn sidebar_rows(&self) -> Vec<SidebarRow> {
        let edit = &self.ui.name_edit;
        let renaming = match &edit.kind {
            Some(NameEditKind::Rename { from }) => Some(from.as_str()),
            _ => None,
        };

        let mut rows: Vec<SidebarRow> = self
            .files
            .names()
            .map(|name| {
                let editing = renaming == Some(name);
                SidebarRow {
                    label: if editing {
                        edit.value.clone()
                    } else {
                        name.to_string()
                    },
                    name: Some(name.to_string()),
                    editing,
                    active_in: self
                        .editor
                        .panes()
                        .iter()
                        .find(|p| p.active() == Some(name))
                        .map(|p| p.id),
                }
            })
            .collect();

        if edit.kind == Some(NameEditKind::Create) {
            rows.push(SidebarRow {
                label: edit.value.clone(),
                name: None,
                editing: true,
                active_in: None,
            });
        }
        rows
    }
}
