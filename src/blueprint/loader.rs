//! Blueprint loading
//!
//! Components are decoded one at a time so a single malformed entry is logged
//! and skipped instead of rejecting the whole form.

use super::model::{Component, ComponentType, FormBlueprint, Section};
use serde::Deserialize;
use std::collections::HashSet;
use std::fs;
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum BlueprintError {
    #[error("Failed to read blueprint {path}: {message}")]
    Io { path: String, message: String },

    #[error("Failed to parse blueprint: {0}")]
    Parse(String),

    #[error("Duplicate section id: {0}")]
    DuplicateSectionId(String),

    #[error("Duplicate component id '{id}' in section '{section_id}'")]
    DuplicateComponentId { id: String, section_id: String },

    #[error("Section '{0}' has an empty component id")]
    EmptyComponentId(String),

    #[error("Blueprint has a section with an empty id")]
    EmptySectionId,
}

/// Source document format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlueprintFormat {
    Json,
    Yaml,
}

impl BlueprintFormat {
    /// Guess the format from a file extension, defaulting to JSON
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some("yaml") | Some("yml") => BlueprintFormat::Yaml,
            _ => BlueprintFormat::Json,
        }
    }
}

/// A component that was dropped while loading
#[derive(Debug, Clone, PartialEq)]
pub struct SkippedComponent {
    pub section_id: String,
    pub id: Option<String>,
    pub reason: String,
}

/// What happened while loading, besides the blueprint itself
#[derive(Debug, Clone, Default)]
pub struct LoadReport {
    pub skipped: Vec<SkippedComponent>,
    /// Ids of components whose `componentType` is not recognized
    pub unsupported: Vec<String>,
}

impl LoadReport {
    pub fn is_clean(&self) -> bool {
        self.skipped.is_empty() && self.unsupported.is_empty()
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawBlueprint {
    form_title: String,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    sections: Vec<RawSection>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawSection {
    section_id: String,
    section_title: String,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    components: Vec<serde_json::Value>,
}

/// Parse a blueprint from a string
pub fn parse_blueprint(
    content: &str,
    format: BlueprintFormat,
) -> Result<(FormBlueprint, LoadReport), BlueprintError> {
    let raw: RawBlueprint = match format {
        BlueprintFormat::Json => {
            serde_json::from_str(content).map_err(|e| BlueprintError::Parse(e.to_string()))?
        }
        BlueprintFormat::Yaml => {
            // Go through serde_json::Value so both formats share one component path
            let value: serde_json::Value =
                serde_yaml::from_str(content).map_err(|e| BlueprintError::Parse(e.to_string()))?;
            serde_json::from_value(value).map_err(|e| BlueprintError::Parse(e.to_string()))?
        }
    };

    build_blueprint(raw)
}

/// Load a blueprint file, picking the format from its extension
pub fn load_blueprint_file(path: &Path) -> Result<(FormBlueprint, LoadReport), BlueprintError> {
    let content = fs::read_to_string(path).map_err(|e| BlueprintError::Io {
        path: path.display().to_string(),
        message: e.to_string(),
    })?;

    let (blueprint, report) = parse_blueprint(&content, BlueprintFormat::from_path(path))?;
    log::info!(
        "[Blueprint] Loaded blueprint '{}' from {:?}: {} sections, {} skipped components",
        blueprint.form_title,
        path,
        blueprint.sections.len(),
        report.skipped.len()
    );
    Ok((blueprint, report))
}

fn build_blueprint(raw: RawBlueprint) -> Result<(FormBlueprint, LoadReport), BlueprintError> {
    let mut report = LoadReport::default();
    let mut section_ids = HashSet::new();
    let mut component_ids = HashSet::new();
    let mut sections = Vec::with_capacity(raw.sections.len());

    for raw_section in raw.sections {
        if raw_section.section_id.trim().is_empty() {
            return Err(BlueprintError::EmptySectionId);
        }
        if !section_ids.insert(raw_section.section_id.clone()) {
            return Err(BlueprintError::DuplicateSectionId(raw_section.section_id));
        }

        let mut components = Vec::with_capacity(raw_section.components.len());
        for value in raw_section.components {
            let declared_id = value
                .get("id")
                .and_then(|v| v.as_str())
                .map(|s| s.to_string());
            let declared_type = value
                .get("componentType")
                .and_then(|v| v.as_str())
                .unwrap_or("<missing>")
                .to_string();

            let component: Component = match serde_json::from_value(value) {
                Ok(c) => c,
                Err(e) => {
                    log::warn!(
                        "[Blueprint] Skipping malformed {} component {:?} in section '{}': {}",
                        declared_type,
                        declared_id,
                        raw_section.section_id,
                        e
                    );
                    report.skipped.push(SkippedComponent {
                        section_id: raw_section.section_id.clone(),
                        id: declared_id,
                        reason: e.to_string(),
                    });
                    continue;
                }
            };

            if component.id.trim().is_empty() {
                return Err(BlueprintError::EmptyComponentId(raw_section.section_id));
            }
            if !component_ids.insert(component.id.clone()) {
                return Err(BlueprintError::DuplicateComponentId {
                    id: component.id,
                    section_id: raw_section.section_id,
                });
            }
            if component.component_type() == ComponentType::Unsupported {
                log::warn!(
                    "[Blueprint] Component '{}' has unrecognized type '{}'; it will not be rendered",
                    component.id,
                    declared_type
                );
                report.unsupported.push(component.id.clone());
            }

            components.push(component);
        }

        sections.push(Section {
            section_id: raw_section.section_id,
            section_title: raw_section.section_title,
            description: raw_section.description,
            components,
        });
    }

    Ok((
        FormBlueprint {
            form_title: raw.form_title,
            description: raw.description,
            sections,
        },
        report,
    ))
}
