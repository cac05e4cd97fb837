//! Platform-aware data storage directory management
//!
//! Resolution order: `BODEGA_DATA_DIR` env override, then the platform data
//! directory, then a `.bodega` folder in the user's home as a last resort.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use directories::{BaseDirs, ProjectDirs};

use super::config::AppConfig;
use super::constants::{APP_DOT_FOLDER, APP_NAME_LOWER, ENV_DATA_DIR};

/// Application storage directories
#[derive(Debug, Clone)]
pub struct AppStorage {
    data_dir: PathBuf,
}

impl AppStorage {
    /// Resolve and create the data directory tree
    pub async fn init(config: &AppConfig) -> Result<Self> {
        let data_dir = config
            .data_dir
            .clone()
            .unwrap_or_else(Self::resolve_data_dir);

        let storage = Self { data_dir };
        tokio::fs::create_dir_all(storage.sqlite_dir())
            .await
            .with_context(|| {
                format!(
                    "Failed to create data directory: {}",
                    storage.data_dir.display()
                )
            })?;

        tracing::debug!(path = %storage.data_dir.display(), "Storage initialized");
        Ok(storage)
    }

    /// Resolve the data directory without creating it
    pub fn resolve_data_dir() -> PathBuf {
        if let Ok(dir) = std::env::var(ENV_DATA_DIR)
            && !dir.is_empty()
        {
            return PathBuf::from(dir);
        }

        if let Some(dirs) = ProjectDirs::from("", "", APP_NAME_LOWER) {
            return dirs.data_dir().to_path_buf();
        }

        match BaseDirs::new() {
            Some(base) => base.home_dir().join(APP_DOT_FOLDER),
            None => PathBuf::from(APP_DOT_FOLDER),
        }
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// Directory holding the SQLite database files
    pub fn sqlite_dir(&self) -> PathBuf {
        self.data_dir.join("sqlite")
    }

    /// Create storage rooted at an explicit path (for tests)
    #[cfg(test)]
    pub fn init_for_test(data_dir: PathBuf) -> Self {
        Self { data_dir }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sqlite_dir_is_under_data_dir() {
        let storage = AppStorage::init_for_test(PathBuf::from("/tmp/bodega-test"));
        assert_eq!(
            storage.sqlite_dir(),
            PathBuf::from("/tmp/bodega-test/sqlite")
        );
    }
}
