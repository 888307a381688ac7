//! Headless application core (state/action/store).

pub mod action;
pub mod editor;
pub mod persistence;
pub mod services;
pub mod state;
pub mod store;

pub use action::Action;
pub use editor::{EditorPaneState, EditorState, PaneId};
pub use persistence::{PersistenceError, PersistenceGateway, SessionSnapshot};
pub use state::{
    AppState, ConfirmDialogState, NameEditKind, NameEditOutcome, NameEditState, PendingAction,
    SidebarRow, UiState,
};
pub use store::{DispatchError, DispatchResult, Store};
