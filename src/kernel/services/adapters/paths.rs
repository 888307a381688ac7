//! 数据目录管理
//!
//! 跨平台的数据文件路径：
//! - macOS: ~/Library/Application Support/zpad/
//! - Windows: %APPDATA%\zpad\
//! - 其他: $XDG_DATA_HOME/zpad/ 或 ~/.local/share/zpad/

use std::path::PathBuf;

const APP_NAME: &str = "zpad";
const LOG_DIR: &str = "logs";
const SESSION_FILE: &str = "session.json";

/// 获取应用数据目录
fn get_app_data_dir() -> Option<PathBuf> {
    let base = if cfg!(target_os = "windows") {
        env_dir("APPDATA")?
    } else if cfg!(target_os = "macos") {
        home_dir()?.join("Library/Application Support")
    } else {
        env_dir("XDG_DATA_HOME").or_else(|| Some(home_dir()?.join(".local/share")))?
    };
    Some(base.join(APP_NAME))
}

pub(super) fn home_dir() -> Option<PathBuf> {
    env_dir("HOME")
}

/// 非空环境变量作为目录
pub(super) fn env_dir(var: &str) -> Option<PathBuf> {
    std::env::var_os(var)
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
}

/// 获取日志目录路径
pub fn get_log_dir() -> Option<PathBuf> {
    get_app_data_dir().map(|p| p.join(LOG_DIR))
}

/// 获取会话快照文件路径
pub fn get_session_file_path() -> Option<PathBuf> {
    get_app_data_dir().map(|p| p.join(SESSION_FILE))
}

/// 确保日志目录存在
pub fn ensure_log_dir() -> std::io::Result<PathBuf> {
    let dir = get_log_dir().ok_or_else(|| {
        std::io::Error::new(
            std::io::ErrorKind::NotFound,
            "Cannot determine log directory",
        )
    })?;

    if !dir.exists() {
        std::fs::create_dir_all(&dir)?;
    }

    Ok(dir)
}

#[cfg(test)]
#[path = "../../../../tests/unit/kernel/services/adapters/paths.rs"]
mod tests;
