use crate::models::{NameValidator, DEFAULT_EXTENSIONS};

#[derive(Clone, Debug)]
pub struct WorkspaceConfig {
    pub allowed_extensions: Vec<String>,
    pub new_file_placeholder: String,
}

impl Default for WorkspaceConfig {
    fn default() -> Self {
        Self {
            allowed_extensions: DEFAULT_EXTENSIONS.iter().map(|s| s.to_string()).collect(),
            new_file_placeholder: "newfile.txt".to_string(),
        }
    }
}

impl WorkspaceConfig {
    pub fn validator(&self) -> NameValidator {
        NameValidator::new(&self.allowed_extensions)
    }
}
