//! Blueprint model
//!
//! The declarative form schema: ordered sections, each an ordered list of typed
//! components. Blueprints are read-only once a session holds them.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A complete form definition
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormBlueprint {
    pub form_title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub sections: Vec<Section>,
}

impl FormBlueprint {
    pub fn section(&self, section_id: &str) -> Option<&Section> {
        self.sections.iter().find(|s| s.section_id == section_id)
    }

    pub fn section_at(&self, index: usize) -> Option<&Section> {
        self.sections.get(index)
    }

    pub fn section_index(&self, section_id: &str) -> Option<usize> {
        self.sections.iter().position(|s| s.section_id == section_id)
    }

    pub fn section_count(&self) -> usize {
        self.sections.len()
    }

    /// Look up a component anywhere in the blueprint
    pub fn component(&self, id: &str) -> Option<&Component> {
        self.components().find(|c| c.id == id)
    }

    /// Section that declares the given component id
    pub fn section_of(&self, component_id: &str) -> Option<&Section> {
        self.sections
            .iter()
            .find(|s| s.components.iter().any(|c| c.id == component_id))
    }

    /// All components in display order
    pub fn components(&self) -> impl Iterator<Item = &Component> {
        self.sections.iter().flat_map(|s| s.components.iter())
    }
}

/// An ordered group of components shown together
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Section {
    pub section_id: String,
    pub section_title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub components: Vec<Component>,
}

impl Section {
    /// Components that store an answer (everything but display-only text)
    pub fn input_components(&self) -> impl Iterator<Item = &Component> {
        self.components.iter().filter(|c| c.stores_answer())
    }
}

/// Discriminant of [`ComponentKind`], used as the registry key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ComponentType {
    InstructionalText,
    KeyValueTable,
    QuestionList,
    DynamicList,
    DynamicKeyValueTable,
    WeightedCriteriaList,
    NumberRangeInput,
    DatePicker,
    /// Any tag this engine does not know
    Unsupported,
}

impl ComponentType {
    /// All known types, in registration order
    pub fn all() -> &'static [ComponentType] {
        &[
            ComponentType::InstructionalText,
            ComponentType::KeyValueTable,
            ComponentType::QuestionList,
            ComponentType::DynamicList,
            ComponentType::DynamicKeyValueTable,
            ComponentType::WeightedCriteriaList,
            ComponentType::NumberRangeInput,
            ComponentType::DatePicker,
        ]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ComponentType::InstructionalText => "InstructionalText",
            ComponentType::KeyValueTable => "KeyValueTable",
            ComponentType::QuestionList => "QuestionList",
            ComponentType::DynamicList => "DynamicList",
            ComponentType::DynamicKeyValueTable => "DynamicKeyValueTable",
            ComponentType::WeightedCriteriaList => "WeightedCriteriaList",
            ComponentType::NumberRangeInput => "NumberRangeInput",
            ComponentType::DatePicker => "DatePicker",
            ComponentType::Unsupported => "Unsupported",
        }
    }
}

impl std::fmt::Display for ComponentType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Text constraints shared by every component that holds free text
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationRules {
    #[serde(default)]
    pub min_length: Option<usize>,
    #[serde(default)]
    pub max_length: Option<usize>,
    /// Regular expression a non-empty text value must match
    #[serde(default)]
    pub pattern: Option<String>,
    /// Message shown instead of the generated one
    #[serde(default)]
    pub message: Option<String>,
}

/// One field of a section
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Component {
    /// Unique across the blueprint; the answer store key
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default)]
    pub required: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub help_text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub validation: Option<ValidationRules>,
    #[serde(flatten)]
    pub kind: ComponentKind,
}

impl Component {
    pub fn new(id: impl Into<String>, kind: ComponentKind) -> Self {
        Self {
            id: id.into(),
            label: None,
            required: false,
            help_text: None,
            validation: None,
            kind,
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn with_required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }

    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.help_text = Some(help.into());
        self
    }

    pub fn with_validation(mut self, rules: ValidationRules) -> Self {
        self.validation = Some(rules);
        self
    }

    pub fn component_type(&self) -> ComponentType {
        self.kind.component_type()
    }

    /// Display-only components never appear in the answer store
    pub fn stores_answer(&self) -> bool {
        !matches!(
            self.kind,
            ComponentKind::InstructionalText(_) | ComponentKind::Unsupported
        )
    }

    /// Label to show, falling back to the id
    pub fn display_label(&self) -> &str {
        self.label.as_deref().unwrap_or(&self.id)
    }
}

/// Variant-specific component configuration, tagged by `componentType`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "componentType")]
pub enum ComponentKind {
    InstructionalText(InstructionalTextSpec),
    KeyValueTable(KeyValueTableSpec),
    QuestionList(QuestionListSpec),
    DynamicList(DynamicListSpec),
    DynamicKeyValueTable(DynamicKeyValueTableSpec),
    WeightedCriteriaList(WeightedCriteriaListSpec),
    NumberRangeInput(NumberRangeSpec),
    DatePicker(DatePickerSpec),
    #[serde(other)]
    Unsupported,
}

impl ComponentKind {
    pub fn component_type(&self) -> ComponentType {
        match self {
            ComponentKind::InstructionalText(_) => ComponentType::InstructionalText,
            ComponentKind::KeyValueTable(_) => ComponentType::KeyValueTable,
            ComponentKind::QuestionList(_) => ComponentType::QuestionList,
            ComponentKind::DynamicList(_) => ComponentType::DynamicList,
            ComponentKind::DynamicKeyValueTable(_) => ComponentType::DynamicKeyValueTable,
            ComponentKind::WeightedCriteriaList(_) => ComponentType::WeightedCriteriaList,
            ComponentKind::NumberRangeInput(_) => ComponentType::NumberRangeInput,
            ComponentKind::DatePicker(_) => ComponentType::DatePicker,
            ComponentKind::Unsupported => ComponentType::Unsupported,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InstructionalTextSpec {
    pub content: String,
}

/// Fixed two-column table: one text cell per declared row label
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KeyValueTableSpec {
    pub rows: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionListSpec {
    pub questions: Vec<Question>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum QuestionInputType {
    Text,
    Textarea,
    Radio,
    #[serde(alias = "checkbox")]
    CheckboxSet,
    #[serde(alias = "checkboxWithQuantity", alias = "checkbox-with-quantity")]
    CheckboxSetWithQuantity,
}

impl Default for QuestionInputType {
    fn default() -> Self {
        QuestionInputType::Text
    }
}

/// A single question inside a `QuestionList`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    pub id: String,
    pub question: String,
    #[serde(default)]
    pub input_type: QuestionInputType,
    #[serde(default)]
    pub options: Vec<String>,
    #[serde(default)]
    pub required: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
}

impl Question {
    pub fn new(id: impl Into<String>, question: impl Into<String>, input_type: QuestionInputType) -> Self {
        Self {
            id: id.into(),
            question: question.into(),
            input_type,
            ..Default::default()
        }
    }

    pub fn with_options<I, S>(mut self, options: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.options = options.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DynamicListSpec {
    #[serde(default)]
    pub min_items: Option<usize>,
    #[serde(default)]
    pub max_items: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DynamicKeyValueTableSpec {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key_label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value_label: Option<String>,
    /// Keep every row's percentage derived from its share of the total
    #[serde(default)]
    pub calculate_percentage: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeightedCriteriaListSpec {
    /// Criteria pre-filled with equal weights when nothing is stored yet
    #[serde(default)]
    pub default_criteria: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NumberRangeSpec {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_label: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DatePickerSpec {
    #[serde(default)]
    pub min_date: Option<NaiveDate>,
    #[serde(default)]
    pub max_date: Option<NaiveDate>,
}
