use super::*;
use crate::kernel::persistence::SESSION_KEY;
use crate::kernel::services::adapters::MemoryKv;
use crate::kernel::services::ports::KvStore;
use crate::kernel::state::NameEditKind;
use crate::models::NameError;
use std::cell::Cell;
use std::io;
use std::rc::Rc;

const P1: PaneId = PaneId::PRIMARY;
const P2: PaneId = PaneId::SECONDARY;

fn new_store() -> Store {
    Store::new(
        WorkspaceConfig::default(),
        PersistenceGateway::new(Box::new(MemoryKv::new())),
    )
}

/// Substrate that counts writes and can be switched offline.
#[derive(Clone, Default)]
struct FlakyKv {
    inner: MemoryKv,
    writes: Rc<Cell<usize>>,
    offline: Rc<Cell<bool>>,
}

impl KvStore for FlakyKv {
    fn name(&self) -> &'static str {
        "flaky"
    }

    fn get(&self, key: &str) -> io::Result<Option<String>> {
        self.inner.get(key)
    }

    fn set(&mut self, key: &str, value: &str) -> io::Result<()> {
        if self.offline.get() {
            return Err(io::Error::new(io::ErrorKind::Other, "offline"));
        }
        self.writes.set(self.writes.get() + 1);
        self.inner.set(key, value)
    }
}

fn flaky_store() -> (Store, Rc<Cell<usize>>, Rc<Cell<bool>>) {
    let kv = FlakyKv::default();
    let writes = kv.writes.clone();
    let offline = kv.offline.clone();
    let store = Store::new(
        WorkspaceConfig::default(),
        PersistenceGateway::new(Box::new(kv)),
    );
    (store, writes, offline)
}

fn create(store: &mut Store, name: &str, content: &str) {
    let result = store.dispatch(Action::Create {
        name: name.to_string(),
        pane: Some(P1),
    });
    assert!(result.is_ok(), "{:?}", result.error);
    if !content.is_empty() {
        store.dispatch(Action::BufferSetText {
            pane: P1,
            text: content.to_string(),
        });
    }
}

fn open(store: &mut Store, pane: PaneId, name: &str) -> DispatchResult {
    store.dispatch(Action::Open {
        pane: Some(pane),
        name: name.to_string(),
    })
}

fn tabs(store: &Store, pane: PaneId) -> Vec<&str> {
    store.tabs(pane).iter().map(String::as_str).collect()
}

fn saved(store: &Store) -> SessionSnapshot {
    store.gateway().load().unwrap().unwrap()
}

fn type_name(store: &mut Store, value: &str) {
    store.dispatch(Action::NameEditSetValue(value.to_string()));
}

#[test]
fn scenario_create_then_open() {
    let mut store = new_store();
    create(&mut store, "a.txt", "hi");
    open(&mut store, P1, "a.txt");

    assert_eq!(tabs(&store, P1), vec!["a.txt"]);
    assert_eq!(store.active(P1), Some("a.txt"));
    assert_eq!(store.content("a.txt").as_deref(), Some("hi"));
}

#[test]
fn scenario_open_in_second_pane_moves_tab() {
    let mut store = new_store();
    create(&mut store, "a.txt", "hi");

    assert!(open(&mut store, P2, "a.txt").state_changed);
    assert!(tabs(&store, P1).is_empty());
    assert_eq!(store.active(P1), None);
    assert!(store.is_collapsed(P1));
    assert_eq!(tabs(&store, P2), vec!["a.txt"]);
    assert_eq!(store.active(P2), Some("a.txt"));
    assert_eq!(store.focused_pane(), P2);
}

#[test]
fn scenario_rename_updates_tabs() {
    let mut store = new_store();
    create(&mut store, "a.txt", "hi");

    let result = store.dispatch(Action::Rename {
        from: "a.txt".to_string(),
        to: "b.txt".to_string(),
    });
    assert!(result.is_ok());
    assert_eq!(store.list_files(), vec!["b.txt"]);
    assert_eq!(store.content("b.txt").as_deref(), Some("hi"));
    assert_eq!(tabs(&store, P1), vec!["b.txt"]);
    assert_eq!(store.active(P1), Some("b.txt"));
}

#[test]
fn scenario_close_active_tab() {
    let mut store = new_store();
    create(&mut store, "x.txt", "");
    create(&mut store, "y.txt", "");
    assert_eq!(tabs(&store, P1), vec!["x.txt", "y.txt"]);
    assert_eq!(store.active(P1), Some("y.txt"));

    store.dispatch(Action::Close {
        pane: P1,
        name: "y.txt".to_string(),
    });
    assert_eq!(store.active(P1), Some("x.txt"));
    assert!(store.list_files().contains(&"y.txt"));
}

#[test]
fn scenario_duplicate_create_fails() {
    let mut store = new_store();
    create(&mut store, "dup.txt", "one");
    let before = store.snapshot();

    let result = store.dispatch(Action::Create {
        name: "dup.txt".to_string(),
        pane: None,
    });
    assert!(!result.state_changed);
    assert!(matches!(
        result.error,
        Some(DispatchError::File(FileStoreError::DuplicateName))
    ));
    assert_eq!(store.snapshot(), before);
}

#[test]
fn scenario_invalid_names_fail() {
    let mut store = new_store();
    let result = store.dispatch(Action::Create {
        name: "noext".to_string(),
        pane: None,
    });
    assert!(matches!(
        result.error,
        Some(DispatchError::File(FileStoreError::Name(
            NameError::MissingExtension
        )))
    ));

    let result = store.dispatch(Action::Create {
        name: "file.exe".to_string(),
        pane: None,
    });
    assert!(matches!(
        result.error,
        Some(DispatchError::File(FileStoreError::Name(
            NameError::InvalidExtension
        )))
    ));
    assert!(store.is_empty());
}

#[test]
fn padded_names_collapse_to_one_file() {
    let mut store = new_store();
    create(&mut store, "a.txt", "");

    let result = store.dispatch(Action::Create {
        name: "a.txt ".to_string(),
        pane: None,
    });
    assert!(matches!(
        result.error,
        Some(DispatchError::File(FileStoreError::DuplicateName))
    ));

    let result = store.dispatch(Action::Rename {
        from: "a.txt".to_string(),
        to: " b.txt".to_string(),
    });
    assert!(result.is_ok());
    assert_eq!(store.list_files(), vec!["b.txt"]);
    assert_eq!(tabs(&store, P1), vec!["b.txt"]);
    assert_eq!(store.active(P1), Some("b.txt"));

    let result = store.dispatch(Action::Create {
        name: " c.txt ".to_string(),
        pane: Some(P2),
    });
    assert!(result.is_ok());
    assert_eq!(store.list_files(), vec!["b.txt", "c.txt"]);
    assert_eq!(tabs(&store, P2), vec!["c.txt"]);
    assert!(saved(&store).files.contains_key("c.txt"));
}

#[test]
fn open_without_pane_uses_focused_pane() {
    let mut store = new_store();
    create(&mut store, "a.txt", "");
    create(&mut store, "b.txt", "");
    store.dispatch(Action::FocusPane { pane: P2 });

    store.dispatch(Action::Open {
        pane: None,
        name: "a.txt".to_string(),
    });
    assert_eq!(tabs(&store, P2), vec!["a.txt"]);
    assert_eq!(tabs(&store, P1), vec!["b.txt"]);
}

#[test]
fn open_missing_file_is_noop() {
    let mut store = new_store();
    let result = open(&mut store, P1, "ghost.txt");
    assert!(!result.state_changed);
    assert!(result.is_ok());
    assert!(store.is_collapsed(P1));
}

#[test]
fn delete_cascades_and_persists() {
    let mut store = new_store();
    create(&mut store, "a.txt", "");
    create(&mut store, "b.txt", "");
    open(&mut store, P2, "a.txt");

    let result = store.dispatch(Action::Delete {
        name: "a.txt".to_string(),
    });
    assert!(result.is_ok());
    assert_eq!(store.list_files(), vec!["b.txt"]);
    assert!(store.is_collapsed(P2));
    assert_eq!(store.active(P2), None);
    assert_eq!(store.content("a.txt"), None);

    let saved = saved(&store);
    assert!(!saved.files.contains_key("a.txt"));
    assert_eq!(saved.open_files["2"], Vec::<String>::new());
}

#[test]
fn delete_requires_confirmation_when_requested() {
    let mut store = new_store();
    create(&mut store, "a.txt", "");

    store.dispatch(Action::DeleteRequest {
        name: "a.txt".to_string(),
    });
    assert!(store.confirm_dialog().visible);
    assert_eq!(
        store.confirm_dialog().message,
        "Are you sure you want to delete \"a.txt\"?"
    );
    assert!(store.list_files().contains(&"a.txt"));

    store.dispatch(Action::DeleteCancel);
    assert!(!store.confirm_dialog().visible);
    assert!(store.list_files().contains(&"a.txt"));

    store.dispatch(Action::DeleteRequest {
        name: "a.txt".to_string(),
    });
    let result = store.dispatch(Action::DeleteConfirm);
    assert!(result.state_changed);
    assert!(store.is_empty());
    assert!(!store.confirm_dialog().visible);
}

#[test]
fn delete_request_for_missing_file_fails() {
    let mut store = new_store();
    let result = store.dispatch(Action::DeleteRequest {
        name: "ghost.txt".to_string(),
    });
    assert!(matches!(
        result.error,
        Some(DispatchError::File(FileStoreError::NotFound))
    ));
    assert!(!store.confirm_dialog().visible);
}

#[test]
fn buffer_edits_are_committed_and_persisted() {
    let mut store = new_store();
    create(&mut store, "a.txt", "");

    store.dispatch(Action::BufferSetText {
        pane: P1,
        text: "hello world".to_string(),
    });
    store.dispatch(Action::BufferReplaceRange {
        pane: P1,
        start_char: 0,
        end_char: 5,
        text: "goodbye".to_string(),
    });

    assert_eq!(store.content("a.txt").as_deref(), Some("goodbye world"));
    assert_eq!(saved(&store).files["a.txt"], "goodbye world");
}

#[test]
fn every_mutation_writes_a_snapshot() {
    let (mut store, writes, _offline) = flaky_store();

    create(&mut store, "a.txt", "");
    assert_eq!(writes.get(), 1);
    open(&mut store, P2, "a.txt");
    assert_eq!(writes.get(), 2);
    store.dispatch(Action::Rename {
        from: "a.txt".to_string(),
        to: "b.txt".to_string(),
    });
    assert_eq!(writes.get(), 3);
    store.dispatch(Action::Close {
        pane: P2,
        name: "b.txt".to_string(),
    });
    assert_eq!(writes.get(), 4);

    // no state change, nothing to write
    open(&mut store, P1, "ghost.txt");
    store.dispatch(Action::FocusPane { pane: P1 });
    store.dispatch(Action::NameEditBeginCreate);
    store.dispatch(Action::NameEditAppend('x'));
    assert_eq!(writes.get(), 4);
}

#[test]
fn failed_snapshot_is_retried_on_next_mutation() {
    let (mut store, writes, offline) = flaky_store();
    create(&mut store, "a.txt", "");

    offline.set(true);
    let result = store.dispatch(Action::Create {
        name: "b.txt".to_string(),
        pane: Some(P2),
    });
    assert!(result.state_changed);
    assert!(matches!(
        result.error,
        Some(DispatchError::Persistence(PersistenceError::Unavailable(_)))
    ));
    assert!(store.is_dirty());
    // memory stays authoritative
    assert_eq!(store.list_files(), vec!["a.txt", "b.txt"]);

    offline.set(false);
    // an unchanged open still retries the pending snapshot
    let result = open(&mut store, P2, "b.txt");
    assert!(result.is_ok());
    assert!(!store.is_dirty());
    assert_eq!(writes.get(), 2);
    assert!(saved(&store).files.contains_key("b.txt"));
}

#[test]
fn flush_pending_retries_explicitly() {
    let (mut store, writes, offline) = flaky_store();
    offline.set(true);
    create(&mut store, "a.txt", "");
    assert!(store.is_dirty());
    assert!(store.flush_pending().is_err());

    offline.set(false);
    store.flush_pending().unwrap();
    assert!(!store.is_dirty());
    assert_eq!(writes.get(), 1);
    store.flush_pending().unwrap();
    assert_eq!(writes.get(), 1);
}

#[test]
fn restore_reproduces_saved_session() {
    let mut store = new_store();
    create(&mut store, "a.txt", "alpha");
    create(&mut store, "b.js", "beta");
    open(&mut store, P2, "a.txt");
    let raw = store.gateway().kv().get(SESSION_KEY).unwrap().unwrap();

    let kv = MemoryKv::new().with_entry(SESSION_KEY, &raw);
    let restored = Store::restore(
        WorkspaceConfig::default(),
        PersistenceGateway::new(Box::new(kv)),
    )
    .unwrap();
    assert_eq!(restored.snapshot(), store.snapshot());
    assert_eq!(restored.list_files(), vec!["a.txt", "b.js"]);
    assert_eq!(restored.tabs(P1), ["b.js".to_string()]);
    assert_eq!(restored.active(P2), Some("a.txt"));
    assert_eq!(restored.content("b.js").as_deref(), Some("beta"));
    assert!(!restored.is_dirty());
}

#[test]
fn restore_without_snapshot_starts_empty() {
    let restored = Store::restore(
        WorkspaceConfig::default(),
        PersistenceGateway::new(Box::new(MemoryKv::new())),
    )
    .unwrap();
    assert!(restored.is_empty());
    assert!(restored.is_collapsed(P1));
    assert!(restored.is_collapsed(P2));
}

#[test]
fn restore_fails_on_corrupt_storage() {
    let kv = MemoryKv::new().with_entry(SESSION_KEY, "not json");
    let result = Store::restore(
        WorkspaceConfig::default(),
        PersistenceGateway::new(Box::new(kv)),
    );
    assert!(matches!(result, Err(PersistenceError::Corrupt(_))));
}

#[test]
fn name_edit_create_flow_commits_into_focused_pane() {
    let mut store = new_store();
    store.dispatch(Action::FocusPane { pane: P2 });

    store.dispatch(Action::NameEditBeginCreate);
    let edit = store.name_edit();
    assert_eq!(edit.kind, Some(NameEditKind::Create));
    assert_eq!(edit.value, "newfile.txt");
    assert_eq!(store.sidebar_rows().last().unwrap().name, None);

    type_name(&mut store, "notes.txt");
    let result = store.dispatch(Action::NameEditConfirm);
    assert!(result.is_ok());
    assert!(!store.name_edit().is_editing());
    assert_eq!(
        store.name_edit().last_outcome,
        Some(NameEditOutcome::Committed)
    );
    assert_eq!(tabs(&store, P2), vec!["notes.txt"]);
    assert!(saved(&store).files.contains_key("notes.txt"));
}

#[test]
fn name_edit_errors_keep_editing_in_order() {
    let mut store = new_store();
    create(&mut store, "taken.txt", "");
    store.dispatch(Action::NameEditBeginCreate);

    type_name(&mut store, "noext");
    store.dispatch(Action::NameEditConfirm);
    assert!(store.name_edit().is_editing());
    assert_eq!(
        store.name_edit().error.as_deref(),
        Some("Please include a file extension.")
    );

    type_name(&mut store, "bad.exe");
    assert_eq!(store.name_edit().error, None);
    store.dispatch(Action::NameEditConfirm);
    assert_eq!(
        store.name_edit().error.as_deref(),
        Some("Unsupported file type!")
    );

    type_name(&mut store, "taken.txt");
    let result = store.dispatch(Action::NameEditBlur);
    assert!(matches!(
        result.error,
        Some(DispatchError::File(FileStoreError::DuplicateName))
    ));
    assert_eq!(
        store.name_edit().error.as_deref(),
        Some("File already exists!")
    );
    assert!(store.name_edit().is_editing());
    assert_eq!(store.list_files(), vec!["taken.txt"]);
}

#[test]
fn name_edit_empty_value_cancels_silently() {
    let mut store = new_store();
    store.dispatch(Action::NameEditBeginCreate);
    type_name(&mut store, "   ");

    let result = store.dispatch(Action::NameEditConfirm);
    assert!(result.is_ok());
    assert!(!store.name_edit().is_editing());
    assert_eq!(
        store.name_edit().last_outcome,
        Some(NameEditOutcome::Cancelled)
    );
    assert!(store.is_empty());
    assert!(store.sidebar_rows().is_empty());
}

#[test]
fn name_edit_cancel_discards_create() {
    let mut store = new_store();
    store.dispatch(Action::NameEditBeginCreate);
    store.dispatch(Action::NameEditCancel);
    assert!(!store.name_edit().is_editing());
    assert!(store.is_empty());
    assert!(store.gateway().load().unwrap().is_none());
}

#[test]
fn name_edit_rename_flow() {
    let mut store = new_store();
    create(&mut store, "a.txt", "body");

    store.dispatch(Action::NameEditBeginRename {
        name: "a.txt".to_string(),
    });
    let rows = store.sidebar_rows();
    assert_eq!(rows.len(), 1);
    assert!(rows[0].editing);
    assert_eq!(rows[0].label, "a.txt");

    store.dispatch(Action::NameEditBackspace);
    store.dispatch(Action::NameEditBackspace);
    store.dispatch(Action::NameEditBackspace);
    store.dispatch(Action::NameEditAppend('j'));
    store.dispatch(Action::NameEditAppend('s'));
    assert_eq!(store.name_edit().value, "a.js");
    assert_eq!(store.sidebar_rows()[0].label, "a.js");

    store.dispatch(Action::NameEditConfirm);
    assert_eq!(store.list_files(), vec!["a.js"]);
    assert_eq!(store.active(P1), Some("a.js"));
    assert_eq!(store.content("a.js").as_deref(), Some("body"));
    let rows = store.sidebar_rows();
    assert_eq!(rows[0].label, "a.js");
    assert_eq!(rows[0].active_in, Some(P1));
}

#[test]
fn name_edit_rename_without_change_cancels() {
    let (mut store, writes, _offline) = flaky_store();
    create(&mut store, "a.txt", "");
    store.dispatch(Action::NameEditBeginRename {
        name: "a.txt".to_string(),
    });

    store.dispatch(Action::NameEditBlur);
    assert_eq!(
        store.name_edit().last_outcome,
        Some(NameEditOutcome::Cancelled)
    );
    assert_eq!(store.list_files(), vec!["a.txt"]);
    assert_eq!(writes.get(), 1);
}

#[test]
fn name_edit_rename_of_missing_file_is_rejected() {
    let mut store = new_store();
    let result = store.dispatch(Action::NameEditBeginRename {
        name: "ghost.txt".to_string(),
    });
    assert!(!result.is_ok());
    assert!(!store.name_edit().is_editing());
}

#[test]
fn name_edit_cursor_moves_over_multibyte_chars() {
    let mut store = new_store();
    store.dispatch(Action::NameEditBeginCreate);
    type_name(&mut store, "笔记.txt");

    for _ in 0..4 {
        store.dispatch(Action::NameEditCursorLeft);
    }
    store.dispatch(Action::NameEditBackspace);
    assert_eq!(store.name_edit().value, "笔.txt");
    store.dispatch(Action::NameEditCursorRight);
    store.dispatch(Action::NameEditAppend('x'));
    assert_eq!(store.name_edit().value, "笔.xtxt");
}

#[test]
fn beginning_a_new_edit_replaces_the_old_one() {
    let mut store = new_store();
    create(&mut store, "a.txt", "");
    store.dispatch(Action::NameEditBeginCreate);
    store.dispatch(Action::NameEditBeginRename {
        name: "a.txt".to_string(),
    });
    assert_eq!(
        store.name_edit().kind,
        Some(NameEditKind::Rename {
            from: "a.txt".to_string()
        })
    );
    assert_eq!(store.sidebar_rows().len(), 1);
}

#[test]
fn single_occupancy_through_dispatch() {
    let mut store = new_store();
    for name in ["a.txt", "b.txt", "c.txt"] {
        create(&mut store, name, "");
    }
    for (pane, name) in [
        (P2, "a.txt"),
        (P1, "a.txt"),
        (P2, "b.txt"),
        (P2, "c.txt"),
        (P1, "c.txt"),
    ] {
        open(&mut store, pane, name);
        for name in tabs(&store, P1) {
            assert!(!store.tabs(P2).iter().any(|t| t == name));
        }
    }
    assert_eq!(tabs(&store, P1), vec!["a.txt", "c.txt"]);
    assert_eq!(tabs(&store, P2), vec!["b.txt"]);
}
