//! Workspace anchoring module
//!
//! A workspace is a plain directory holding the `.rcaloop/` data
//! directory: the SQLite database and the TOML configuration.

mod config;

pub use config::AppConfig;

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

/// A governance workspace rooted at a directory
pub struct Workspace {
    /// Workspace root path
    root: PathBuf,
    /// Workspace configuration
    config: AppConfig,
}

impl Workspace {
    /// Open a workspace at the given path
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let root = path.as_ref().to_path_buf();
        if !root.is_dir() {
            anyhow::bail!("Workspace path is not a directory: {:?}", root);
        }

        let config = AppConfig::load_or_default(&root)?;

        Ok(Self { root, config })
    }

    /// Get the workspace root path
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Get the path to the .rcaloop data directory
    pub fn data_dir(&self) -> PathBuf {
        self.root.join(".rcaloop")
    }

    /// Initialize the .rcaloop directory if it doesn't exist
    pub fn init_data_dir(&self) -> Result<PathBuf> {
        let data_dir = self.data_dir();
        if !data_dir.exists() {
            std::fs::create_dir_all(&data_dir)
                .with_context(|| format!("Failed to create {:?}", data_dir))?;
        }
        Ok(data_dir)
    }

    /// Path to the workspace database
    pub fn db_path(&self) -> PathBuf {
        self.data_dir().join("rcaloop.db")
    }

    /// Whether the workspace has been initialized
    pub fn is_initialized(&self) -> bool {
        self.data_dir().exists()
    }

    /// Get the workspace configuration
    pub fn config(&self) -> &AppConfig {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_and_init() {
        let dir = tempfile::tempdir().unwrap();
        let workspace = Workspace::open(dir.path()).unwrap();

        assert!(!workspace.is_initialized());
        workspace.init_data_dir().unwrap();
        assert!(workspace.is_initialized());
        assert!(workspace.db_path().starts_with(dir.path()));
    }

    #[test]
    fn test_open_rejects_missing_dir() {
        assert!(Workspace::open("/nonexistent/workspace/path").is_err());
    }
}
