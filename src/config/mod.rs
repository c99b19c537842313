// Layered configuration system

pub mod loader;
pub mod merger;

pub use loader::{
    validate_config, AssistConfig, AutoSaveConfig, ConfigLoader, DraftsConfig, FormsConfig,
};
pub use merger::{
    ConfigMerger, PartialAssistConfig, PartialAutoSaveConfig, PartialConfig, PartialDraftsConfig,
};

use anyhow::Result;
use std::path::{Path, PathBuf};

/// Load and merge configuration from all sources
/// Priority: overrides -> Project -> Global -> Defaults
///
/// Unreadable or invalid config files are logged and skipped.
pub fn load_merged_config(
    project_path: Option<&Path>,
    overrides: Option<PartialConfig>,
) -> Result<FormsConfig> {
    let loader = match project_path {
        Some(path) => ConfigLoader::new().with_project_path(path),
        None => ConfigLoader::new(),
    };

    let global = loader.load_global().unwrap_or_else(|e| {
        log::warn!("[Config] Ignoring global config: {}", e);
        None
    });
    let project = loader.load_project().unwrap_or_else(|e| {
        log::warn!("[Config] Ignoring project config: {}", e);
        None
    });

    let config = ConfigMerger::new()
        .with_global(global)
        .with_project(project)
        .with_overrides(overrides)
        .merge();

    validate_config(&config)?;
    Ok(config)
}

/// Directory drafts are written to: the configured override or `<project>/.rfq-forms/drafts`
pub fn resolve_drafts_dir(config: &FormsConfig, project_path: &Path) -> PathBuf {
    match &config.drafts.dir {
        Some(dir) => PathBuf::from(dir),
        None => crate::utils::drafts_dir(project_path),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_load_merged_config_with_project() {
        let temp_dir = TempDir::new().unwrap();
        let config_dir = temp_dir.path().join(".rfq-forms");
        fs::create_dir_all(&config_dir).unwrap();
        fs::write(config_dir.join("config.toml"), "[autosave]\nintervalSecs = 12\n").unwrap();

        let config = load_merged_config(Some(temp_dir.path()), None).unwrap();
        assert_eq!(config.autosave.interval_secs, 12);
    }

    #[test]
    fn test_invalid_project_config_falls_back() {
        let temp_dir = TempDir::new().unwrap();
        let config_dir = temp_dir.path().join(".rfq-forms");
        fs::create_dir_all(&config_dir).unwrap();
        fs::write(config_dir.join("config.toml"), "[autosave]\nintervalSecs = 0\n").unwrap();

        let overrides = PartialConfig {
            autosave: Some(PartialAutoSaveConfig {
                interval_secs: Some(7),
                ..Default::default()
            }),
            ..Default::default()
        };
        let config = load_merged_config(Some(temp_dir.path()), Some(overrides)).unwrap();
        assert_eq!(config.autosave.interval_secs, 7);
    }

    #[test]
    fn test_resolve_drafts_dir() {
        let project = Path::new("/work/acme");
        let mut config = FormsConfig::default();
        assert_eq!(
            resolve_drafts_dir(&config, project),
            PathBuf::from("/work/acme/.rfq-forms/drafts")
        );

        config.drafts.dir = Some("/var/drafts".to_string());
        assert_eq!(resolve_drafts_dir(&config, project), PathBuf::from("/var/drafts"));
    }
}
