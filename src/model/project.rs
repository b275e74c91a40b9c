//! Project model.
//!
//! A project names a folder whose `project-store` file is the permanent
//! home of its entries.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// File name of the permanent store inside a project folder.
pub const STORE_FILE_NAME: &str = "project-store";

/// Name given to the project row of a temporary store.
pub const PLACEHOLDER_NAME: &str = "untitled";

/// A project row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    /// Row ID
    pub id: i64,

    /// Display name
    pub name: String,

    /// Folder holding the permanent store
    pub folder_path: String,

    /// Document language recorded at the last ingestion
    pub language: Option<String>,
}

impl Project {
    /// Location of the permanent store for a project folder.
    #[must_use]
    pub fn store_path_for(folder: &Path) -> PathBuf {
        folder.join(STORE_FILE_NAME)
    }

    /// Location of this project's permanent store.
    #[must_use]
    pub fn store_path(&self) -> PathBuf {
        Self::store_path_for(Path::new(&self.folder_path))
    }

    /// Whether this is the placeholder row of a temporary store.
    #[must_use]
    pub fn is_placeholder(&self) -> bool {
        self.folder_path.is_empty()
    }
}
