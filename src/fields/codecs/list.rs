//! DynamicList: an ordered, growable list of text entries

use crate::answers::{FieldValue, ListItem};
use crate::blueprint::{Component, ComponentKind, ComponentType, DynamicListSpec};
use crate::fields::codec::{check_text_rules, Advisory, AdvisoryKind, FieldCodec, FieldEdit, FieldError};

pub struct DynamicListCodec;

fn spec(component: &Component) -> DynamicListSpec {
    match &component.kind {
        ComponentKind::DynamicList(spec) => spec.clone(),
        _ => DynamicListSpec::default(),
    }
}

/// Deterministic ids for rows created without user action, so repeated reads
/// of an unanswered field agree with each other
fn seeded_id(component: &Component, index: usize) -> String {
    format!("{}-{}", component.id, index + 1)
}

fn items_of(component: &Component, value: &FieldValue) -> Option<Vec<ListItem>> {
    match value {
        FieldValue::List(items) => Some(items.clone()),
        FieldValue::Choices(values) => Some(
            values
                .iter()
                .enumerate()
                .map(|(i, v)| ListItem {
                    id: seeded_id(component, i),
                    value: v.clone(),
                })
                .collect(),
        ),
        v if v.is_empty_collection() => Some(Vec::new()),
        _ => None,
    }
}

impl FieldCodec for DynamicListCodec {
    fn component_type(&self) -> ComponentType {
        ComponentType::DynamicList
    }

    fn default_value(&self, component: &Component) -> Option<FieldValue> {
        let min = spec(component).min_items.unwrap_or(0);
        Some(FieldValue::List(
            (0..min)
                .map(|i| ListItem {
                    id: seeded_id(component, i),
                    value: String::new(),
                })
                .collect(),
        ))
    }

    fn normalize(&self, component: &Component, stored: Option<&FieldValue>) -> Option<FieldValue> {
        match stored.and_then(|v| items_of(component, v)) {
            Some(items) if !items.is_empty() => Some(FieldValue::List(items)),
            _ => self.default_value(component),
        }
    }

    fn merge(
        &self,
        component: &Component,
        current: FieldValue,
        edit: FieldEdit,
    ) -> Result<FieldValue, FieldError> {
        let bounds = spec(component);
        let mut items = items_of(component, &current).unwrap_or_default();

        match edit {
            FieldEdit::Replace { value } => return Ok(value),
            FieldEdit::Clear => return Ok(self.default_value(component).unwrap_or_default()),
            FieldEdit::AddItem { value } => {
                if let Some(max) = bounds.max_items {
                    if items.len() >= max {
                        return Err(FieldError::ListFull(max));
                    }
                }
                items.push(ListItem::new(value));
            }
            FieldEdit::UpdateItem { item_id, value } => {
                let item = items
                    .iter_mut()
                    .find(|i| i.id == item_id)
                    .ok_or(FieldError::UnknownRow(item_id))?;
                item.value = value;
            }
            FieldEdit::RemoveItem { item_id } => {
                if let Some(min) = bounds.min_items {
                    if items.len() <= min {
                        return Err(FieldError::ListAtMinimum(min));
                    }
                }
                let index = items
                    .iter()
                    .position(|i| i.id == item_id)
                    .ok_or(FieldError::UnknownRow(item_id))?;
                items.remove(index);
            }
            other => return Err(FieldError::unsupported(self.component_type(), &other)),
        }

        Ok(FieldValue::List(items))
    }

    fn validate(&self, component: &Component, value: &FieldValue) -> Vec<Advisory> {
        let mut advisories = Vec::new();
        let bounds = spec(component);
        let items = items_of(component, value).unwrap_or_default();
        let filled: Vec<&ListItem> = items.iter().filter(|i| !i.value.trim().is_empty()).collect();

        if component.required && filled.is_empty() {
            advisories.push(Advisory::new(&component.id, AdvisoryKind::Required, "Add at least one entry"));
        }
        if let Some(min) = bounds.min_items {
            if items.len() < min {
                advisories.push(Advisory::new(
                    &component.id,
                    AdvisoryKind::ListLength,
                    format!("At least {} entries are expected", min),
                ));
            }
        }
        if let Some(max) = bounds.max_items {
            if items.len() > max {
                advisories.push(Advisory::new(
                    &component.id,
                    AdvisoryKind::ListLength,
                    format!("No more than {} entries are allowed", max),
                ));
            }
        }
        for item in filled {
            advisories.extend(check_text_rules(
                &component.id,
                Some(&item.id),
                &item.value,
                component.validation.as_ref(),
            ));
        }
        advisories
    }
}
