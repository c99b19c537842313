use crate::answers::{AnswerStore, FieldPath, FieldValue};
use crate::blueprint::{Component, ComponentType, Section};
use crate::fields::codec::{Advisory, FieldCodec, FieldEdit, FieldError};
use crate::fields::codecs::{
    DatePickerCodec, DynamicKeyValueTableCodec, DynamicListCodec, InstructionalTextCodec,
    KeyValueTableCodec, NumberRangeCodec, QuestionListCodec, WeightedCriteriaCodec,
};
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;

/// A component bound to its current value, ready for the UI layer
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldView {
    pub id: String,
    pub component_type: ComponentType,
    pub label: String,
    pub help_text: Option<String>,
    pub required: bool,
    /// `None` for display-only components
    pub value: Option<FieldValue>,
    pub advisories: Vec<Advisory>,
    /// Full component definition (options, rows, bounds, ...)
    pub component: Component,
}

/// All rendered fields of one section
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SectionView {
    pub section_id: String,
    pub section_title: String,
    pub description: Option<String>,
    pub fields: Vec<FieldView>,
}

/// Registry of field codecs keyed by component type
pub struct FieldRegistry {
    codecs: HashMap<ComponentType, Arc<dyn FieldCodec>>,
}

impl FieldRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self {
            codecs: HashMap::new(),
        }
    }

    /// Registry with a codec for every known component type
    pub fn with_builtin_codecs() -> Self {
        let mut registry = Self::new();
        registry.register(Box::new(InstructionalTextCodec));
        registry.register(Box::new(KeyValueTableCodec));
        registry.register(Box::new(QuestionListCodec));
        registry.register(Box::new(DynamicListCodec));
        registry.register(Box::new(DynamicKeyValueTableCodec));
        registry.register(Box::new(WeightedCriteriaCodec));
        registry.register(Box::new(NumberRangeCodec));
        registry.register(Box::new(DatePickerCodec));
        registry
    }

    /// Register a codec, replacing any previous codec for the same type
    pub fn register(&mut self, codec: Box<dyn FieldCodec>) -> Option<Arc<dyn FieldCodec>> {
        let codec: Arc<dyn FieldCodec> = Arc::from(codec);
        self.codecs.insert(codec.component_type(), codec)
    }

    /// Get a codec by type
    pub fn get(&self, component_type: ComponentType) -> Option<Arc<dyn FieldCodec>> {
        self.codecs.get(&component_type).cloned()
    }

    pub fn registered_types(&self) -> Vec<ComponentType> {
        ComponentType::all()
            .iter()
            .copied()
            .filter(|t| self.codecs.contains_key(t))
            .collect()
    }

    fn codec_for(&self, component: &Component) -> Option<Arc<dyn FieldCodec>> {
        let codec = self.get(component.component_type());
        if codec.is_none() {
            log::warn!(
                "[Registry] No codec for component '{}' of type {}",
                component.id,
                component.component_type()
            );
        }
        codec
    }

    /// Current value of a component read through its codec, or its default.
    /// `None` for display-only or unsupported components.
    pub fn value_of(&self, component: &Component, stored: Option<&FieldValue>) -> Option<FieldValue> {
        self.get(component.component_type())
            .and_then(|codec| codec.normalize(component, stored))
    }

    /// Merge an edit into the value stored under `path` and return the new
    /// value. The store is only written when the codec accepts the edit.
    pub fn apply_edit(
        &self,
        component: &Component,
        store: &mut AnswerStore,
        path: &FieldPath,
        edit: FieldEdit,
    ) -> Result<FieldValue, FieldError> {
        let codec = self
            .codec_for(component)
            .ok_or_else(|| FieldError::unsupported(component.component_type(), &edit))?;

        let current = codec
            .edit_base(component, store.get_path(path))
            .ok_or_else(|| FieldError::unsupported(component.component_type(), &edit))?;
        let updated = codec.merge(component, current, edit)?;

        store.set_path(path, updated.clone());
        Ok(updated)
    }

    /// Advisories for one component given its stored value
    pub fn validate(&self, component: &Component, stored: Option<&FieldValue>) -> Vec<Advisory> {
        match self.get(component.component_type()) {
            Some(codec) => match codec.normalize(component, stored) {
                Some(value) => codec.validate(component, &value),
                None => Vec::new(),
            },
            None => Vec::new(),
        }
    }

    /// Bind a component to its value. Unsupported types render nothing.
    pub fn render(&self, component: &Component, stored: Option<&FieldValue>) -> Option<FieldView> {
        if component.component_type() == ComponentType::Unsupported {
            log::warn!(
                "[Registry] Skipping component '{}' with unrecognized type",
                component.id
            );
            return None;
        }
        let codec = self.codec_for(component)?;
        let value = codec.normalize(component, stored);
        let advisories = value
            .as_ref()
            .map(|v| codec.validate(component, v))
            .unwrap_or_default();

        Some(FieldView {
            id: component.id.clone(),
            component_type: component.component_type(),
            label: component.display_label().to_string(),
            help_text: component.help_text.clone(),
            required: component.required,
            value,
            advisories,
            component: component.clone(),
        })
    }

    /// Render every component of a section against a store keyed by component id
    pub fn render_section(&self, section: &Section, store: &AnswerStore) -> SectionView {
        SectionView {
            section_id: section.section_id.clone(),
            section_title: section.section_title.clone(),
            description: section.description.clone(),
            fields: section
                .components
                .iter()
                .filter_map(|c| self.render(c, store.get(&c.id)))
                .collect(),
        }
    }
}

impl Default for FieldRegistry {
    fn default() -> Self {
        Self::with_builtin_codecs()
    }
}
