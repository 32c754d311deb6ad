//! Project management
//!
//! Handles workspace initialization and provides access to stores.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use thiserror::Error;

use super::config::WORKSPACE_DIR;
use super::{Config, MatchStore};

#[derive(Debug, Error)]
pub enum ProjectError {
    #[error("Not in a scorebook project. Run 'scorebook init' first.")]
    NotInProject,
}

const DEFAULT_CONFIG: &str = r#"# scorebook configuration

# Overs per innings when a roster file does not set them
default_overs = 20

# Commentary lines shown by 'match show' and 'match commentary'
commentary_limit = 12

[scorer]
# Recorded as the author of every saved version.
# Defaults to $SCOREBOOK_SCORER, then $USER.
# name = "scorer"
"#;

/// A scorebook workspace
pub struct Project {
    root: PathBuf,
    config: Config,
}

impl Project {
    /// Opens an existing project at the given path
    pub fn open(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();

        if !root.join(WORKSPACE_DIR).is_dir() {
            return Err(ProjectError::NotInProject.into());
        }

        let config = Config::for_project(&root)?;

        Ok(Self { root, config })
    }

    /// Opens the project at the current directory or a parent
    pub fn open_current() -> Result<Self> {
        let root = Config::find_project_root().ok_or(ProjectError::NotInProject)?;

        Self::open(root)
    }

    /// Initializes a new project at the given path
    pub fn init(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        let workspace = root.join(WORKSPACE_DIR);

        let matches_dir = workspace.join("matches");
        fs::create_dir_all(&matches_dir).with_context(|| {
            format!(
                "Failed to create matches directory: {}",
                matches_dir.display()
            )
        })?;

        let config_path = workspace.join("config.toml");
        if !config_path.exists() {
            fs::write(&config_path, DEFAULT_CONFIG)
                .with_context(|| format!("Failed to write config: {}", config_path.display()))?;
        }

        tracing::debug!(root = %root.display(), "workspace initialized");
        Self::open(root)
    }

    /// Returns the project root path
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Returns the .scorebook directory path
    pub fn workspace_dir(&self) -> PathBuf {
        self.root.join(WORKSPACE_DIR)
    }

    /// Returns the configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Name recorded on saved versions
    pub fn scorer(&self) -> String {
        self.config.project.scorer.effective_name()
    }

    /// Returns the match store
    pub fn match_store(&self) -> MatchStore {
        MatchStore::for_project(&self.root)
    }
}
