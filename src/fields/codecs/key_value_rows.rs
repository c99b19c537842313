//! DynamicKeyValueTable: user-managed rows of label + amount, optionally with
//! derived percentages

use crate::answers::{FieldValue, KeyValueRow};
use crate::blueprint::{Component, ComponentKind, ComponentType};
use crate::fields::codec::{Advisory, AdvisoryKind, FieldCodec, FieldEdit, FieldError};
use crate::fields::derive::recompute_percentages;

pub struct DynamicKeyValueTableCodec;

fn calculates_percentage(component: &Component) -> bool {
    matches!(&component.kind, ComponentKind::DynamicKeyValueTable(spec) if spec.calculate_percentage)
}

fn rows_of(value: &FieldValue) -> Vec<KeyValueRow> {
    match value {
        FieldValue::KeyValueRows(rows) => rows.clone(),
        _ => Vec::new(),
    }
}

fn find_row<'a>(rows: &'a mut [KeyValueRow], row_id: &str) -> Result<&'a mut KeyValueRow, FieldError> {
    rows.iter_mut()
        .find(|r| r.id == row_id)
        .ok_or_else(|| FieldError::UnknownRow(row_id.to_string()))
}

impl FieldCodec for DynamicKeyValueTableCodec {
    fn component_type(&self) -> ComponentType {
        ComponentType::DynamicKeyValueTable
    }

    fn default_value(&self, _component: &Component) -> Option<FieldValue> {
        Some(FieldValue::KeyValueRows(Vec::new()))
    }

    fn normalize(&self, component: &Component, stored: Option<&FieldValue>) -> Option<FieldValue> {
        match stored {
            Some(FieldValue::KeyValueRows(rows)) => Some(FieldValue::KeyValueRows(rows.clone())),
            _ => self.default_value(component),
        }
    }

    fn merge(
        &self,
        component: &Component,
        current: FieldValue,
        edit: FieldEdit,
    ) -> Result<FieldValue, FieldError> {
        let mut rows = match edit {
            FieldEdit::Replace { value } => match value {
                FieldValue::KeyValueRows(rows) => rows,
                // Not a row list: stored as given, nothing to derive
                other => return Ok(other),
            },
            FieldEdit::Clear => Vec::new(),
            FieldEdit::AddRow { key, value } => {
                let mut rows = rows_of(&current);
                rows.push(KeyValueRow::new(key, value));
                rows
            }
            FieldEdit::UpdateRowKey { row_id, key } => {
                let mut rows = rows_of(&current);
                find_row(&mut rows, &row_id)?.key = key;
                rows
            }
            FieldEdit::UpdateRowValue { row_id, value } => {
                let mut rows = rows_of(&current);
                find_row(&mut rows, &row_id)?.value = value;
                rows
            }
            FieldEdit::RemoveRow { row_id } => {
                let mut rows = rows_of(&current);
                let index = rows
                    .iter()
                    .position(|r| r.id == row_id)
                    .ok_or(FieldError::UnknownRow(row_id))?;
                rows.remove(index);
                rows
            }
            other => return Err(FieldError::unsupported(self.component_type(), &other)),
        };

        if calculates_percentage(component) {
            recompute_percentages(&mut rows);
        }
        Ok(FieldValue::KeyValueRows(rows))
    }

    fn validate(&self, component: &Component, value: &FieldValue) -> Vec<Advisory> {
        let mut advisories = Vec::new();
        let rows = rows_of(value);

        if component.required && rows.is_empty() {
            advisories.push(Advisory::new(&component.id, AdvisoryKind::Required, "Add at least one row"));
        }
        for row in rows.iter().filter(|r| r.key.trim().is_empty()) {
            advisories.push(
                Advisory::new(&component.id, AdvisoryKind::Required, "Each row needs a label").at(row.id.clone()),
            );
        }
        advisories
    }
}
