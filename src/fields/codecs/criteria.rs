//! WeightedCriteriaList: evaluation criteria whose weights should total 100

use crate::answers::{FieldValue, WeightedCriterion};
use crate::blueprint::{Component, ComponentKind, ComponentType};
use crate::fields::codec::{Advisory, AdvisoryKind, FieldCodec, FieldEdit, FieldError};
use crate::fields::derive::{equal_weights, redistribute_weights, weight_total, weights_balanced};

pub struct WeightedCriteriaCodec;

fn criteria_of(value: &FieldValue) -> Vec<WeightedCriterion> {
    match value {
        FieldValue::Criteria(criteria) => criteria.clone(),
        _ => Vec::new(),
    }
}

fn find_criterion<'a>(
    criteria: &'a mut [WeightedCriterion],
    criterion_id: &str,
) -> Result<&'a mut WeightedCriterion, FieldError> {
    criteria
        .iter_mut()
        .find(|c| c.id == criterion_id)
        .ok_or_else(|| FieldError::UnknownRow(criterion_id.to_string()))
}

impl FieldCodec for WeightedCriteriaCodec {
    fn component_type(&self) -> ComponentType {
        ComponentType::WeightedCriteriaList
    }

    fn default_value(&self, component: &Component) -> Option<FieldValue> {
        let names: &[String] = match &component.kind {
            ComponentKind::WeightedCriteriaList(spec) => &spec.default_criteria,
            _ => &[],
        };
        let weights = equal_weights(names.len());
        Some(FieldValue::Criteria(
            names
                .iter()
                .zip(weights)
                .enumerate()
                .map(|(i, (name, weight))| WeightedCriterion {
                    id: format!("{}-{}", component.id, i + 1),
                    criterion: name.clone(),
                    weight,
                })
                .collect(),
        ))
    }

    fn normalize(&self, component: &Component, stored: Option<&FieldValue>) -> Option<FieldValue> {
        match stored {
            Some(FieldValue::Criteria(criteria)) => Some(FieldValue::Criteria(criteria.clone())),
            // `[]` reads back as an empty choice list; the user removed every criterion
            Some(v) if v.is_empty_collection() => Some(FieldValue::Criteria(Vec::new())),
            _ => self.default_value(component),
        }
    }

    fn merge(
        &self,
        component: &Component,
        current: FieldValue,
        edit: FieldEdit,
    ) -> Result<FieldValue, FieldError> {
        let mut criteria = criteria_of(&current);

        match edit {
            // Replacing the list is a manual edit: weights are kept as given
            FieldEdit::Replace { value } => return Ok(value),
            FieldEdit::Clear => return Ok(self.default_value(component).unwrap_or_default()),
            FieldEdit::AddCriterion { criterion } => {
                criteria.push(WeightedCriterion::new(criterion, 0.0));
                redistribute_weights(&mut criteria);
            }
            FieldEdit::RemoveCriterion { criterion_id } => {
                let index = criteria
                    .iter()
                    .position(|c| c.id == criterion_id)
                    .ok_or(FieldError::UnknownRow(criterion_id))?;
                criteria.remove(index);
                redistribute_weights(&mut criteria);
            }
            FieldEdit::RenameCriterion {
                criterion_id,
                criterion,
            } => {
                find_criterion(&mut criteria, &criterion_id)?.criterion = criterion;
            }
            FieldEdit::SetWeight {
                criterion_id,
                weight,
            } => {
                // No redistribution on manual weight edits
                find_criterion(&mut criteria, &criterion_id)?.weight = weight;
            }
            other => return Err(FieldError::unsupported(self.component_type(), &other)),
        }

        Ok(FieldValue::Criteria(criteria))
    }

    fn validate(&self, component: &Component, value: &FieldValue) -> Vec<Advisory> {
        let mut advisories = Vec::new();
        let criteria = criteria_of(value);

        if criteria.is_empty() {
            if component.required {
                advisories.push(Advisory::new(
                    &component.id,
                    AdvisoryKind::Required,
                    "Add at least one criterion",
                ));
            }
            return advisories;
        }

        if !weights_balanced(&criteria) {
            advisories.push(Advisory::new(
                &component.id,
                AdvisoryKind::WeightTotal,
                format!("Weights must total 100% (currently {}%)", weight_total(&criteria)),
            ));
        }
        for c in criteria.iter().filter(|c| c.criterion.trim().is_empty()) {
            advisories.push(
                Advisory::new(&component.id, AdvisoryKind::Required, "Each criterion needs a name").at(c.id.clone()),
            );
        }
        advisories
    }
}
