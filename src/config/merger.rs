// Configuration merging with priority

use crate::config::loader::{AssistConfig, AutoSaveConfig, DraftsConfig, FormsConfig};
use serde::{Deserialize, Serialize};

/// Partial configuration for merging
/// Uses Option<T> for all fields to support partial overrides
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct PartialConfig {
    #[serde(default)]
    pub autosave: Option<PartialAutoSaveConfig>,
    #[serde(default)]
    pub drafts: Option<PartialDraftsConfig>,
    #[serde(default)]
    pub assist: Option<PartialAssistConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct PartialAutoSaveConfig {
    pub enabled: Option<bool>,
    pub interval_secs: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct PartialDraftsConfig {
    pub dir: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct PartialAssistConfig {
    pub enabled: Option<bool>,
}

/// Configuration merger
/// Priority order: overrides -> Project -> Global -> Defaults
pub struct ConfigMerger {
    defaults: FormsConfig,
    global: Option<FormsConfig>,
    project: Option<FormsConfig>,
    overrides: Option<PartialConfig>,
}

impl ConfigMerger {
    /// Create a new config merger with defaults
    pub fn new() -> Self {
        Self {
            defaults: FormsConfig::default(),
            global: None,
            project: None,
            overrides: None,
        }
    }

    /// Set global config
    pub fn with_global(mut self, config: Option<FormsConfig>) -> Self {
        self.global = config;
        self
    }

    /// Set project config
    pub fn with_project(mut self, config: Option<FormsConfig>) -> Self {
        self.project = config;
        self
    }

    /// Set explicit overrides
    pub fn with_overrides(mut self, config: Option<PartialConfig>) -> Self {
        self.overrides = config;
        self
    }

    /// Merge all configs with priority
    pub fn merge(&self) -> FormsConfig {
        let mut result = self.defaults.clone();

        if let Some(ref global) = self.global {
            result = self.merge_full(&result, global);
        }

        // Project overrides global
        if let Some(ref project) = self.project {
            result = self.merge_full(&result, project);
        }

        // Explicit overrides win
        if let Some(ref overrides) = self.overrides {
            result = self.merge_partial(&result, overrides);
        }

        result
    }

    fn merge_full(&self, base: &FormsConfig, over: &FormsConfig) -> FormsConfig {
        FormsConfig {
            autosave: over.autosave.clone(),
            drafts: DraftsConfig {
                dir: over.drafts.dir.clone().or_else(|| base.drafts.dir.clone()),
            },
            assist: over.assist.clone(),
        }
    }

    fn merge_partial(&self, base: &FormsConfig, partial: &PartialConfig) -> FormsConfig {
        FormsConfig {
            autosave: partial
                .autosave
                .as_ref()
                .map(|p| AutoSaveConfig {
                    enabled: p.enabled.unwrap_or(base.autosave.enabled),
                    // A zero override would disable ticking entirely; keep the base value
                    interval_secs: p
                        .interval_secs
                        .filter(|secs| *secs > 0)
                        .unwrap_or(base.autosave.interval_secs),
                })
                .unwrap_or_else(|| base.autosave.clone()),
            drafts: partial
                .drafts
                .as_ref()
                .map(|p| DraftsConfig {
                    dir: p.dir.clone().or_else(|| base.drafts.dir.clone()),
                })
                .unwrap_or_else(|| base.drafts.clone()),
            assist: partial
                .assist
                .as_ref()
                .map(|p| AssistConfig {
                    enabled: p.enabled.unwrap_or(base.assist.enabled),
                })
                .unwrap_or_else(|| base.assist.clone()),
        }
    }
}

impl Default for ConfigMerger {
    fn default() -> Self {
        Self::new()
    }
}
