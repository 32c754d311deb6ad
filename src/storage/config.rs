//! Configuration handling for scorebook
//!
//! Configuration is stored in `.scorebook/config.toml` (project) and
//! `~/.config/scorebook/config.toml` (global).

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::MAX_OVERS_PER_INNINGS;

/// Name of the per-project workspace directory
pub const WORKSPACE_DIR: &str = ".scorebook";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid configuration: {0}")]
    Invalid(String),

    #[error("Failed to parse configuration: {0}")]
    Parse(String),
}

/// Who is recorded as the author of saved versions
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ScorerConfig {
    /// Scorer name (defaults to $SCOREBOOK_SCORER, then $USER)
    pub name: Option<String>,
}

impl ScorerConfig {
    /// Gets the effective scorer name from config, environment, or defaults
    pub fn effective_name(&self) -> String {
        self.name
            .clone()
            .or_else(|| std::env::var("SCOREBOOK_SCORER").ok())
            .or_else(|| std::env::var("USER").ok())
            .filter(|name| !name.trim().is_empty())
            .unwrap_or_else(|| "anonymous".to_string())
    }
}

/// Project-level configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectConfig {
    /// Overs per innings when a roster file does not set them
    pub default_overs: u32,

    /// Commentary lines shown by `match show` and `match commentary`
    pub commentary_limit: usize,

    pub scorer: ScorerConfig,
}

impl Default for ProjectConfig {
    fn default() -> Self {
        Self {
            default_overs: 20,
            commentary_limit: 12,
            scorer: ScorerConfig::default(),
        }
    }
}

impl ProjectConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.default_overs == 0 {
            return Err(ConfigError::Invalid(
                "default_overs must be at least 1".to_string(),
            ));
        }
        if self.default_overs > MAX_OVERS_PER_INNINGS {
            return Err(ConfigError::Invalid(format!(
                "default_overs must be at most {}",
                MAX_OVERS_PER_INNINGS
            )));
        }
        Ok(())
    }
}

/// Global user configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct GlobalConfig {
    /// Default output format (text or json)
    pub default_format: OutputFormat,
}

/// Output format for commands
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Combined configuration (global + project)
#[derive(Debug, Clone)]
pub struct Config {
    pub project: ProjectConfig,
    pub global: GlobalConfig,
    pub project_root: Option<PathBuf>,
}

impl Config {
    /// Loads configuration for a specific project
    pub fn for_project(project_root: &Path) -> Result<Self> {
        let global = Self::load_global()?;
        let project = Self::load_project_config(project_root)?;

        Ok(Self {
            project,
            global,
            project_root: Some(project_root.to_path_buf()),
        })
    }

    /// Returns the global config directory
    pub fn global_config_dir() -> Option<PathBuf> {
        ProjectDirs::from("dev", "scorebook", "scorebook")
            .map(|dirs| dirs.config_dir().to_path_buf())
    }

    /// Loads global configuration
    pub fn load_global() -> Result<GlobalConfig> {
        let config_dir = match Self::global_config_dir() {
            Some(dir) => dir,
            None => return Ok(GlobalConfig::default()),
        };

        let config_path = config_dir.join("config.toml");
        if !config_path.exists() {
            return Ok(GlobalConfig::default());
        }

        let content = fs::read_to_string(&config_path)
            .with_context(|| format!("Failed to read global config: {}", config_path.display()))?;

        toml::from_str(&content)
            .map_err(|e| ConfigError::Parse(e.to_string()))
            .context("Failed to parse global config")
    }

    /// Loads project configuration from a specific root
    fn load_project_config(project_root: &Path) -> Result<ProjectConfig> {
        let config_path = project_root.join(WORKSPACE_DIR).join("config.toml");

        if !config_path.exists() {
            return Ok(ProjectConfig::default());
        }

        let content = fs::read_to_string(&config_path)
            .with_context(|| format!("Failed to read project config: {}", config_path.display()))?;

        let config: ProjectConfig = toml::from_str(&content)
            .map_err(|e| ConfigError::Parse(e.to_string()))
            .context("Failed to parse project config")?;
        config.validate()?;
        Ok(config)
    }

    /// Finds the project root by looking for `.scorebook/` from the current directory up
    pub fn find_project_root() -> Option<PathBuf> {
        let current = std::env::current_dir().ok()?;
        Self::find_project_root_from(&current)
    }

    /// Finds the project root by looking for `.scorebook/` from `start` up
    pub fn find_project_root_from(start: &Path) -> Option<PathBuf> {
        start
            .ancestors()
            .find(|dir| dir.join(WORKSPACE_DIR).is_dir())
            .map(Path::to_path_buf)
    }

    /// Returns the project root, or an error if not in a project
    pub fn require_project_root(&self) -> Result<&Path> {
        self.project_root
            .as_deref()
            .ok_or_else(|| anyhow::anyhow!("Not in a scorebook project. Run 'scorebook init' first."))
    }

    /// Saves the project configuration
    pub fn save_project(&self) -> Result<()> {
        let root = self.require_project_root()?;
        let config_path = root.join(WORKSPACE_DIR).join("config.toml");

        let content =
            toml::to_string_pretty(&self.project).context("Failed to serialize project config")?;

        fs::write(&config_path, content)
            .with_context(|| format!("Failed to write project config: {}", config_path.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn default_config() {
        let config = Config {
            project: ProjectConfig::default(),
            global: GlobalConfig::default(),
            project_root: None,
        };

        assert_eq!(config.project.default_overs, 20);
        assert_eq!(config.project.commentary_limit, 12);
        assert_eq!(config.global.default_format, OutputFormat::Text);
    }

    #[test]
    fn parse_project_config() {
        let toml = r#"
default_overs = 5

[scorer]
name = "pavilion"
"#;

        let config: ProjectConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.default_overs, 5);
        assert_eq!(config.commentary_limit, 12);
        assert_eq!(config.scorer.effective_name(), "pavilion");
    }

    #[test]
    fn zero_overs_is_invalid() {
        let config: ProjectConfig = toml::from_str("default_overs = 0").unwrap();
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn oversized_default_overs_is_invalid() {
        let config: ProjectConfig = toml::from_str("default_overs = 51").unwrap();
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn parse_global_config() {
        let config: GlobalConfig = toml::from_str(r#"default_format = "json""#).unwrap();
        assert_eq!(config.default_format, OutputFormat::Json);
    }

    #[test]
    fn find_project_root_from_subdir() {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join(WORKSPACE_DIR)).unwrap();

        let sub_dir = dir.path().join("sub").join("dir");
        fs::create_dir_all(&sub_dir).unwrap();

        let root = Config::find_project_root_from(&sub_dir);
        assert_eq!(root.as_deref(), Some(dir.path()));
    }

    #[test]
    fn project_config_roundtrips_through_disk() {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join(WORKSPACE_DIR)).unwrap();

        let mut config = Config::for_project(dir.path()).unwrap();
        config.project.default_overs = 10;
        config.save_project().unwrap();

        let reloaded = Config::for_project(dir.path()).unwrap();
        assert_eq!(reloaded.project.default_overs, 10);
    }

    #[test]
    fn config_not_in_project() {
        let config = Config {
            project: ProjectConfig::default(),
            global: GlobalConfig::default(),
            project_root: None,
        };

        assert!(config.require_project_root().is_err());
    }
}
