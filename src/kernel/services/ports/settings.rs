use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use super::config::WorkspaceConfig;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub allowed_extensions: Vec<String>,
    pub new_file_placeholder: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session_file: Option<PathBuf>,
}

impl Default for Settings {
    fn default() -> Self {
        let config = WorkspaceConfig::default();
        Self {
            allowed_extensions: config.allowed_extensions,
            new_file_placeholder: config.new_file_placeholder,
            session_file: None,
        }
    }
}

impl Settings {
    pub fn workspace_config(&self) -> WorkspaceConfig {
        let defaults = WorkspaceConfig::default();
        let placeholder = self.new_file_placeholder.trim();
        WorkspaceConfig {
            allowed_extensions: if self.allowed_extensions.is_empty() {
                defaults.allowed_extensions
            } else {
                self.allowed_extensions.clone()
            },
            new_file_placeholder: if placeholder.is_empty() {
                defaults.new_file_placeholder
            } else {
                placeholder.to_string()
            },
        }
    }
}
