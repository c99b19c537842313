// Configuration file loading

use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Form engine configuration structure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct FormsConfig {
    /// Auto-save settings
    #[serde(default)]
    pub autosave: AutoSaveConfig,
    /// Draft storage settings
    #[serde(default)]
    pub drafts: DraftsConfig,
    /// Smart-assist settings
    #[serde(default)]
    pub assist: AssistConfig,
}

/// Auto-save configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AutoSaveConfig {
    /// Arm the periodic save timer when a session starts
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Seconds between auto-save ticks
    #[serde(rename = "intervalSecs", alias = "interval_secs", default = "default_interval_secs")]
    pub interval_secs: u64,
}

fn default_true() -> bool { true }
fn default_interval_secs() -> u64 { 30 }

impl AutoSaveConfig {
    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_secs)
    }
}

impl Default for AutoSaveConfig {
    fn default() -> Self {
        Self {
            enabled: default_true(),
            interval_secs: default_interval_secs(),
        }
    }
}

/// Draft storage configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct DraftsConfig {
    /// Overrides `<project>/.rfq-forms/drafts`
    #[serde(default)]
    pub dir: Option<String>,
}

/// Smart-assist configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssistConfig {
    /// Notify the smart-assist hook of the active section
    #[serde(default = "default_true")]
    pub enabled: bool,
}

impl Default for AssistConfig {
    fn default() -> Self {
        Self {
            enabled: default_true(),
        }
    }
}

/// Config loader
pub struct ConfigLoader {
    /// Global config path
    global_path: Option<PathBuf>,
    /// Project config path
    project_path: Option<PathBuf>,
}

impl ConfigLoader {
    /// Create a new config loader
    pub fn new() -> Self {
        Self {
            global_path: Self::get_global_config_path(),
            project_path: None,
        }
    }

    /// Set the project path
    pub fn with_project_path(mut self, path: &Path) -> Self {
        self.project_path = Some(crate::utils::config_path(path));
        self
    }

    /// Get the global config path
    fn get_global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("rfq-forms").join("config.toml"))
    }

    /// Load global config
    pub fn load_global(&self) -> Result<Option<FormsConfig>> {
        match self.global_path {
            Some(ref path) => self.load_from_path(path),
            None => Ok(None),
        }
    }

    /// Load project config
    pub fn load_project(&self) -> Result<Option<FormsConfig>> {
        match self.project_path {
            Some(ref path) => self.load_from_path(path),
            None => Ok(None),
        }
    }

    /// Load config from a specific path
    pub fn load_from_path(&self, path: &Path) -> Result<Option<FormsConfig>> {
        if !path.exists() {
            return Ok(None);
        }

        let contents = fs::read_to_string(path)
            .map_err(|e| anyhow!("Failed to read config file '{}': {}", path.display(), e))?;

        let config: FormsConfig = toml::from_str(&contents)
            .map_err(|e| anyhow!("Failed to parse config file '{}': {}", path.display(), e))?;

        validate_config(&config)?;

        Ok(Some(config))
    }

    /// Get the global config path
    pub fn global_config_path(&self) -> Option<&Path> {
        self.global_path.as_deref()
    }

    /// Get the project config path
    pub fn project_config_path(&self) -> Option<&Path> {
        self.project_path.as_deref()
    }

    /// Save config to project path
    pub fn save_project(&self, config: &FormsConfig) -> Result<()> {
        match self.project_path {
            Some(ref path) => self.save_to_path(path, config),
            None => Err(anyhow!("No project config path available")),
        }
    }

    /// Save config to a specific path
    pub fn save_to_path(&self, path: &Path, config: &FormsConfig) -> Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.exists() {
                fs::create_dir_all(parent).map_err(|e| {
                    anyhow!("Failed to create config directory '{}': {}", parent.display(), e)
                })?;
            }
        }

        validate_config(config)?;

        let contents = toml::to_string_pretty(config)
            .map_err(|e| anyhow!("Failed to serialize config: {}", e))?;

        fs::write(path, contents)
            .map_err(|e| anyhow!("Failed to write config file '{}': {}", path.display(), e))?;

        log::info!("Saved config to: {}", path.display());
        Ok(())
    }
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

/// Validate config values
pub fn validate_config(config: &FormsConfig) -> Result<()> {
    if config.autosave.interval_secs == 0 {
        return Err(anyhow!("autosave intervalSecs must be greater than 0"));
    }
    if let Some(dir) = &config.drafts.dir {
        if dir.trim().is_empty() {
            return Err(anyhow!("drafts dir cannot be empty"));
        }
    }
    Ok(())
}
