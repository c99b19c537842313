//! KeyValueTable: one free-text cell per declared row label

use crate::answers::FieldValue;
use crate::blueprint::{Component, ComponentKind, ComponentType, KeyValueTableSpec};
use crate::fields::codec::{
    check_text_rules, stored_map_or, Advisory, AdvisoryKind, FieldCodec, FieldEdit, FieldError,
};
use std::collections::BTreeMap;

pub struct KeyValueTableCodec;

fn spec(component: &Component) -> Option<&KeyValueTableSpec> {
    match &component.kind {
        ComponentKind::KeyValueTable(spec) => Some(spec),
        _ => None,
    }
}

fn cell_text(value: &FieldValue) -> Option<String> {
    match value {
        FieldValue::Text(s) => Some(s.clone()),
        FieldValue::Number(n) => Some(n.to_string()),
        FieldValue::Null => Some(String::new()),
        _ => None,
    }
}

impl FieldCodec for KeyValueTableCodec {
    fn component_type(&self) -> ComponentType {
        ComponentType::KeyValueTable
    }

    fn default_value(&self, component: &Component) -> Option<FieldValue> {
        let cells = spec(component)
            .map(|s| {
                s.rows
                    .iter()
                    .map(|label| (label.clone(), FieldValue::Text(String::new())))
                    .collect()
            })
            .unwrap_or_default();
        Some(FieldValue::Map(cells))
    }

    fn normalize(&self, component: &Component, stored: Option<&FieldValue>) -> Option<FieldValue> {
        let mut cells: BTreeMap<String, FieldValue> = match stored {
            Some(FieldValue::Map(map)) => map
                .iter()
                .filter_map(|(k, v)| cell_text(v).map(|t| (k.clone(), FieldValue::Text(t))))
                .collect(),
            _ => BTreeMap::new(),
        };

        // Fill declared rows that have never been answered; stored cells win
        if let Some(spec) = spec(component) {
            for label in &spec.rows {
                cells
                    .entry(label.clone())
                    .or_insert_with(|| FieldValue::Text(String::new()));
            }
        }
        Some(FieldValue::Map(cells))
    }

    fn edit_base(&self, component: &Component, stored: Option<&FieldValue>) -> Option<FieldValue> {
        stored_map_or(self, component, stored)
    }

    fn merge(
        &self,
        component: &Component,
        current: FieldValue,
        edit: FieldEdit,
    ) -> Result<FieldValue, FieldError> {
        match edit {
            FieldEdit::Replace { value } => Ok(value),
            FieldEdit::Clear => Ok(self.default_value(component).unwrap_or_default()),
            FieldEdit::SetCell { label, value } => {
                let mut cells = match current {
                    FieldValue::Map(map) => map,
                    _ => BTreeMap::new(),
                };
                cells.insert(label, FieldValue::Text(value));
                Ok(FieldValue::Map(cells))
            }
            other => Err(FieldError::unsupported(self.component_type(), &other)),
        }
    }

    fn validate(&self, component: &Component, value: &FieldValue) -> Vec<Advisory> {
        let mut advisories = Vec::new();
        let Some(cells) = value.as_map() else {
            return advisories;
        };
        let rows = spec(component).map(|s| s.rows.as_slice()).unwrap_or(&[]);

        for label in rows {
            let text = cells.get(label).and_then(|v| v.as_text()).unwrap_or("");
            if component.required && text.trim().is_empty() {
                advisories.push(
                    Advisory::new(&component.id, AdvisoryKind::Required, format!("{} is required", label))
                        .at(label.clone()),
                );
            }
            advisories.extend(check_text_rules(
                &component.id,
                Some(label),
                text,
                component.validation.as_ref(),
            ));
        }
        advisories
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn component() -> Component {
        Component::new(
            "company_info",
            ComponentKind::KeyValueTable(KeyValueTableSpec {
                rows: vec!["Company Name".to_string(), "Industry".to_string(), "Employees".to_string()],
                placeholder: None,
            }),
        )
    }

    fn text(s: &str) -> FieldValue {
        FieldValue::Text(s.to_string())
    }

    #[test]
    fn test_default_has_one_cell_per_row() {
        let value = KeyValueTableCodec.default_value(&component()).unwrap();
        assert_eq!(value.as_map().unwrap().len(), 3);
    }

    #[test]
    fn test_set_cell_leaves_other_cells_unchanged() {
        let codec = KeyValueTableCodec;
        let c = component();
        let mut current = codec.normalize(&c, None).unwrap();
        current = codec
            .merge(&c, current, FieldEdit::SetCell { label: "Industry".into(), value: "Retail".into() })
            .unwrap();
        let before = current.as_map().unwrap().clone();

        let after = codec
            .merge(&c, current, FieldEdit::SetCell { label: "Company Name".into(), value: "Acme".into() })
            .unwrap();
        let after = after.as_map().unwrap();

        assert_eq!(after["Company Name"], text("Acme"));
        for (label, value) in &before {
            if label != "Company Name" {
                assert_eq!(&after[label], value);
            }
        }
    }

    #[test]
    fn test_normalize_keeps_unknown_cells_and_drops_bad_shapes() {
        let mut stored = BTreeMap::new();
        stored.insert("Legacy Row".to_string(), text("kept"));
        stored.insert("Industry".to_string(), FieldValue::Choices(vec!["x".into()]));
        let value = KeyValueTableCodec
            .normalize(&component(), Some(&FieldValue::Map(stored)))
            .unwrap();
        let cells = value.as_map().unwrap();
        assert_eq!(cells["Legacy Row"], text("kept"));
        assert_eq!(cells["Industry"], text(""));
    }

    #[test]
    fn test_required_rows_advise() {
        let c = component().with_required(true);
        let value = KeyValueTableCodec.default_value(&c).unwrap();
        let advisories = KeyValueTableCodec.validate(&c, &value);
        assert_eq!(advisories.len(), 3);
        assert!(advisories.iter().all(|a| a.kind == AdvisoryKind::Required));
    }
}
