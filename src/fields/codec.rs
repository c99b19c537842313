//! Field codec contract
//!
//! One codec per component type supplies the default value, the
//! merge-on-edit function and the advisory checks for that type.

use crate::answers::FieldValue;
use crate::blueprint::{Component, ComponentType, ValidationRules};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A partial change to one field's value.
///
/// Codecs accept `Replace`/`Clear` plus the edits that make sense for their
/// own value shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FieldEdit {
    /// Overwrite the whole value (direct input or a smart-assist suggestion)
    Replace { value: FieldValue },
    /// Reset to the codec default
    Clear,

    // KeyValueTable
    SetCell { label: String, value: String },

    // QuestionList
    SetAnswer { question_id: String, answer: FieldValue },
    ToggleOption { question_id: String, option: String },
    SetQuantity { question_id: String, option: String, number: Option<f64> },

    // DynamicList
    AddItem { value: String },
    UpdateItem { item_id: String, value: String },
    RemoveItem { item_id: String },

    // DynamicKeyValueTable
    AddRow { key: String, value: f64 },
    UpdateRowKey { row_id: String, key: String },
    UpdateRowValue { row_id: String, value: f64 },
    RemoveRow { row_id: String },

    // WeightedCriteriaList
    AddCriterion { criterion: String },
    RenameCriterion { criterion_id: String, criterion: String },
    SetWeight { criterion_id: String, weight: f64 },
    RemoveCriterion { criterion_id: String },

    // NumberRangeInput
    SetMin { min: Option<f64> },
    SetMax { max: Option<f64> },

    // DatePicker
    SetDate { date: Option<String> },
}

impl FieldEdit {
    pub fn replace(value: impl Into<FieldValue>) -> Self {
        FieldEdit::Replace {
            value: value.into(),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            FieldEdit::Replace { .. } => "replace",
            FieldEdit::Clear => "clear",
            FieldEdit::SetCell { .. } => "set_cell",
            FieldEdit::SetAnswer { .. } => "set_answer",
            FieldEdit::ToggleOption { .. } => "toggle_option",
            FieldEdit::SetQuantity { .. } => "set_quantity",
            FieldEdit::AddItem { .. } => "add_item",
            FieldEdit::UpdateItem { .. } => "update_item",
            FieldEdit::RemoveItem { .. } => "remove_item",
            FieldEdit::AddRow { .. } => "add_row",
            FieldEdit::UpdateRowKey { .. } => "update_row_key",
            FieldEdit::UpdateRowValue { .. } => "update_row_value",
            FieldEdit::RemoveRow { .. } => "remove_row",
            FieldEdit::AddCriterion { .. } => "add_criterion",
            FieldEdit::RenameCriterion { .. } => "rename_criterion",
            FieldEdit::SetWeight { .. } => "set_weight",
            FieldEdit::RemoveCriterion { .. } => "remove_criterion",
            FieldEdit::SetMin { .. } => "set_min",
            FieldEdit::SetMax { .. } => "set_max",
            FieldEdit::SetDate { .. } => "set_date",
        }
    }
}

/// Why an edit could not be applied. The stored value is left as it was.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FieldError {
    #[error("{component_type} fields do not accept '{edit}' edits")]
    UnsupportedEdit {
        component_type: ComponentType,
        edit: &'static str,
    },

    #[error("No row with id '{0}'")]
    UnknownRow(String),

    #[error("No question with id '{0}'")]
    UnknownQuestion(String),

    #[error("List already holds the maximum of {0} items")]
    ListFull(usize),

    #[error("List must keep at least {0} items")]
    ListAtMinimum(usize),
}

impl FieldError {
    pub fn unsupported(component_type: ComponentType, edit: &FieldEdit) -> Self {
        FieldError::UnsupportedEdit {
            component_type,
            edit: edit.name(),
        }
    }
}

/// Category of an inline advisory
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AdvisoryKind {
    Required,
    WeightTotal,
    RangeOrder,
    ListLength,
    InvalidDate,
    DateOutOfBounds,
    Pattern,
    Length,
    UnknownOption,
}

/// A non-blocking validation message shown next to a field
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Advisory {
    pub field_id: String,
    /// Row label / question id / option the message refers to
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub_key: Option<String>,
    pub kind: AdvisoryKind,
    pub message: String,
}

impl Advisory {
    pub fn new(field_id: &str, kind: AdvisoryKind, message: impl Into<String>) -> Self {
        Self {
            field_id: field_id.to_string(),
            sub_key: None,
            kind,
            message: message.into(),
        }
    }

    pub fn at(mut self, sub_key: impl Into<String>) -> Self {
        self.sub_key = Some(sub_key.into());
        self
    }
}

/// Behaviour of one component type
pub trait FieldCodec: Send + Sync {
    /// The component type this codec handles
    fn component_type(&self) -> ComponentType;

    /// Value used when nothing is stored. `None` for display-only components.
    fn default_value(&self, component: &Component) -> Option<FieldValue>;

    /// Read a stored value through the component definition.
    ///
    /// Stale or mismatched shapes degrade to the default rather than failing.
    fn normalize(&self, component: &Component, stored: Option<&FieldValue>) -> Option<FieldValue>;

    /// Value a partial edit is merged into. Defaults to the normalized value;
    /// map-shaped components hand back the stored map so sub-keys the edit
    /// does not touch are written back exactly as they were.
    fn edit_base(&self, component: &Component, stored: Option<&FieldValue>) -> Option<FieldValue> {
        self.normalize(component, stored)
    }

    /// Apply a partial edit to the value from [`FieldCodec::edit_base`] and
    /// return the complete new value for the component id.
    fn merge(
        &self,
        component: &Component,
        current: FieldValue,
        edit: FieldEdit,
    ) -> Result<FieldValue, FieldError>;

    /// Advisory checks; never used to reject an edit
    fn validate(&self, component: &Component, value: &FieldValue) -> Vec<Advisory>;
}

/// Stored sub-key map as-is, or the normalized value for anything else
pub(crate) fn stored_map_or(
    codec: &dyn FieldCodec,
    component: &Component,
    stored: Option<&FieldValue>,
) -> Option<FieldValue> {
    match stored {
        Some(FieldValue::Map(map)) => Some(FieldValue::Map(map.clone())),
        _ => codec.normalize(component, stored),
    }
}

/// Check free text against a component's length/pattern rules
pub(crate) fn check_text_rules(
    field_id: &str,
    sub_key: Option<&str>,
    text: &str,
    rules: Option<&ValidationRules>,
) -> Vec<Advisory> {
    let mut advisories = Vec::new();
    let Some(rules) = rules else {
        return advisories;
    };
    if text.is_empty() {
        return advisories;
    }

    let with_sub = |a: Advisory| match sub_key {
        Some(key) => a.at(key),
        None => a,
    };
    let len = text.chars().count();

    if let Some(min) = rules.min_length {
        if len < min {
            let message = rules
                .message
                .clone()
                .unwrap_or_else(|| format!("Must be at least {} characters", min));
            advisories.push(with_sub(Advisory::new(field_id, AdvisoryKind::Length, message)));
        }
    }
    if let Some(max) = rules.max_length {
        if len > max {
            let message = rules
                .message
                .clone()
                .unwrap_or_else(|| format!("Must be at most {} characters", max));
            advisories.push(with_sub(Advisory::new(field_id, AdvisoryKind::Length, message)));
        }
    }
    if let Some(pattern) = &rules.pattern {
        match regex::Regex::new(pattern) {
            Ok(re) => {
                if !re.is_match(text) {
                    let message = rules
                        .message
                        .clone()
                        .unwrap_or_else(|| "Value has an unexpected format".to_string());
                    advisories.push(with_sub(Advisory::new(field_id, AdvisoryKind::Pattern, message)));
                }
            }
            Err(e) => {
                log::warn!("[Registry] Invalid validation pattern on '{}': {}", field_id, e);
            }
        }
    }

    advisories
}
