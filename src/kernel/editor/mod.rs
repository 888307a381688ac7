//! Editor domain: panes, tabs, active files and live buffers.

mod reducer;
mod state;

pub use state::{EditorPaneState, EditorState, PaneId, PANE_COUNT};
