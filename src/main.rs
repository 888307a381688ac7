//zpad/src/main.rs
use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use zpad::kernel::services::adapters::{
    ensure_settings_file, get_session_file_path, load_settings, JsonFileKv, MemoryKv,
};
use zpad::kernel::services::ports::{KvStore, Settings, WorkspaceConfig};
use zpad::kernel::{Action, PaneId, PersistenceGateway, Store};

mod logging;

const HELP: &str = "\
commands:
  ls                       list files
  tabs                     show both panes
  cat <name>               print file content
  open <name> [pane]       open in pane (default: focused)
  new <name> [pane]        create and open
  mv <from> <to>           rename
  rm <name>                delete (asks y/n)
  close <pane> <name>      close a tab
  focus <pane>             focus pane 1 or 2
  write <pane> <text>      replace the active buffer of a pane
  quit";

enum Command {
    Help,
    List,
    Tabs,
    Show(String),
    Dispatch(Action),
    Quit,
}

fn main() -> io::Result<()> {
    let _logging = logging::init();

    let session_override = std::env::args().nth(1).map(PathBuf::from);
    let mut store = open_store(session_override);

    let stdin = io::stdin();
    let mut stdout = io::stdout();
    print_tabs(&store, &mut stdout)?;

    for line in stdin.lock().lines() {
        let line = line?;
        let command = match parse_command(&line) {
            Ok(Some(command)) => command,
            Ok(None) => continue,
            Err(msg) => {
                writeln!(stdout, "error: {}", msg)?;
                continue;
            }
        };

        match command {
            Command::Help => writeln!(stdout, "{}", HELP)?,
            Command::List => print_files(&store, &mut stdout)?,
            Command::Tabs => print_tabs(&store, &mut stdout)?,
            Command::Show(name) => match store.content(&name) {
                Some(text) => writeln!(stdout, "{}", text)?,
                None => writeln!(stdout, "error: no such file: {}", name)?,
            },
            Command::Dispatch(action) => {
                let result = store.dispatch(action);
                if let Some(e) = result.error {
                    writeln!(stdout, "error: {}", e)?;
                }
                let dialog = store.confirm_dialog();
                if dialog.visible {
                    writeln!(stdout, "{} [y/n]", dialog.message)?;
                } else if result.state_changed {
                    print_tabs(&store, &mut stdout)?;
                }
            }
            Command::Quit => break,
        }
        stdout.flush()?;
    }

    if let Err(e) = store.flush_pending() {
        tracing::error!(error = %e, "session not saved on exit");
        eprintln!("warning: session not saved: {}", e);
    }
    Ok(())
}

fn open_store(session_override: Option<PathBuf>) -> Store {
    if let Err(e) = ensure_settings_file() {
        tracing::warn!(error = %e, "cannot create settings file");
    }
    let settings = load_settings().unwrap_or_default();
    let config = settings.workspace_config();

    let kv = open_kv(session_override, &settings);
    tracing::info!(substrate = kv.name(), "opening session");
    match Store::restore(config.clone(), PersistenceGateway::new(kv)) {
        Ok(store) => store,
        Err(e) => {
            tracing::warn!(error = %e, "session not restored; starting empty");
            eprintln!("warning: session not restored: {}", e);
            start_empty(config)
        }
    }
}

fn open_kv(session_override: Option<PathBuf>, settings: &Settings) -> Box<dyn KvStore> {
    let path = session_override
        .or_else(|| settings.session_file.clone())
        .or_else(get_session_file_path);
    let Some(path) = path else {
        tracing::warn!("no data directory; session kept in memory");
        return Box::new(MemoryKv::new());
    };

    match JsonFileKv::open(&path) {
        Ok(kv) => Box::new(kv),
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "session file unusable");
            Box::new(MemoryKv::new())
        }
    }
}

fn start_empty(config: WorkspaceConfig) -> Store {
    Store::new(config, PersistenceGateway::new(Box::new(MemoryKv::new())))
}

fn parse_pane(value: &str) -> Result<PaneId, String> {
    PaneId::parse(value).ok_or_else(|| format!("unknown pane: {}", value))
}

fn parse_command(line: &str) -> Result<Option<Command>, String> {
    let line = line.trim();
    let (head, rest) = line.split_once(char::is_whitespace).unwrap_or((line, ""));
    let rest = rest.trim_start();
    let args: Vec<&str> = rest.split_whitespace().collect();

    let command = match (head, args.as_slice()) {
        ("", _) => return Ok(None),
        ("help", _) => Command::Help,
        ("ls", _) => Command::List,
        ("tabs", _) => Command::Tabs,
        ("cat", [name]) => Command::Show(name.to_string()),
        ("open", [name]) => Command::Dispatch(Action::Open {
            pane: None,
            name: name.to_string(),
        }),
        ("open", [name, pane]) => Command::Dispatch(Action::Open {
            pane: Some(parse_pane(pane)?),
            name: name.to_string(),
        }),
        ("new", [name]) => Command::Dispatch(Action::Create {
            name: name.to_string(),
            pane: None,
        }),
        ("new", [name, pane]) => Command::Dispatch(Action::Create {
            name: name.to_string(),
            pane: Some(parse_pane(pane)?),
        }),
        ("mv", [from, to]) => Command::Dispatch(Action::Rename {
            from: from.to_string(),
            to: to.to_string(),
        }),
        ("rm", [name]) => Command::Dispatch(Action::DeleteRequest {
            name: name.to_string(),
        }),
        ("y", []) => Command::Dispatch(Action::DeleteConfirm),
        ("n", []) => Command::Dispatch(Action::DeleteCancel),
        ("close", [pane, name]) => Command::Dispatch(Action::Close {
            pane: parse_pane(pane)?,
            name: name.to_string(),
        }),
        ("focus", [pane]) => Command::Dispatch(Action::FocusPane {
            pane: parse_pane(pane)?,
        }),
        ("write", [pane, ..]) => {
            let pane = parse_pane(pane)?;
            let text = rest[pane_arg_len(rest)..].trim_start();
            Command::Dispatch(Action::BufferSetText {
                pane,
                text: text.replace("\\n", "\n"),
            })
        }
        ("quit" | "exit", _) => Command::Quit,
        _ => return Err(format!("bad command: {} (try `help`)", line)),
    };
    Ok(Some(command))
}

fn pane_arg_len(rest: &str) -> usize {
    rest.find(char::is_whitespace).unwrap_or(rest.len())
}

fn print_files(store: &Store, out: &mut impl Write) -> io::Result<()> {
    if store.is_empty() {
        return writeln!(out, "No files yet. Create one with `new <name>`.");
    }
    for row in store.sidebar_rows() {
        match row.active_in {
            Some(pane) => writeln!(out, "  {} ({})", row.label, pane)?,
            None => writeln!(out, "  {}", row.label)?,
        }
    }
    Ok(())
}

fn print_tabs(store: &Store, out: &mut impl Write) -> io::Result<()> {
    for pane in PaneId::ALL {
        let marker = if store.focused_pane() == pane { '*' } else { ' ' };
        if store.is_collapsed(pane) {
            writeln!(out, "{}[{}] -", marker, pane)?;
            continue;
        }
        let tabs: Vec<String> = store
            .tabs(pane)
            .iter()
            .map(|tab| {
                if store.active(pane) == Some(tab.as_str()) {
                    format!("<{}>", tab)
                } else {
                    tab.clone()
                }
            })
            .collect();
        writeln!(out, "{}[{}] {}", marker, pane, tabs.join(" "))?;
    }
    Ok(())
}
