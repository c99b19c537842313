//! NumberRangeInput: optional lower and upper numbers

use crate::answers::{FieldValue, NumberRange};
use crate::blueprint::{Component, ComponentType};
use crate::fields::codec::{Advisory, AdvisoryKind, FieldCodec, FieldEdit, FieldError};

pub struct NumberRangeCodec;

fn range_of(value: &FieldValue) -> Option<NumberRange> {
    match value {
        FieldValue::Range(range) => Some(*range),
        // A map with only min/max keys that failed the strict shape (e.g. numeric strings)
        FieldValue::Map(map) if map.keys().all(|k| k == "min" || k == "max") => Some(NumberRange {
            min: map.get("min").and_then(|v| v.as_number()),
            max: map.get("max").and_then(|v| v.as_number()),
        }),
        _ => None,
    }
}

impl FieldCodec for NumberRangeCodec {
    fn component_type(&self) -> ComponentType {
        ComponentType::NumberRangeInput
    }

    fn default_value(&self, _component: &Component) -> Option<FieldValue> {
        Some(FieldValue::Range(NumberRange::default()))
    }

    fn normalize(&self, component: &Component, stored: Option<&FieldValue>) -> Option<FieldValue> {
        match stored.and_then(range_of) {
            Some(range) => Some(FieldValue::Range(range)),
            None => self.default_value(component),
        }
    }

    fn merge(
        &self,
        component: &Component,
        current: FieldValue,
        edit: FieldEdit,
    ) -> Result<FieldValue, FieldError> {
        let mut range = range_of(&current).unwrap_or_default();
        match edit {
            FieldEdit::Replace { value } => return Ok(value),
            FieldEdit::Clear => return Ok(self.default_value(component).unwrap_or_default()),
            FieldEdit::SetMin { min } => range.min = min,
            FieldEdit::SetMax { max } => range.max = max,
            other => return Err(FieldError::unsupported(self.component_type(), &other)),
        }
        Ok(FieldValue::Range(range))
    }

    fn validate(&self, component: &Component, value: &FieldValue) -> Vec<Advisory> {
        let mut advisories = Vec::new();
        let range = range_of(value).unwrap_or_default();

        if component.required && range.min.is_none() && range.max.is_none() {
            advisories.push(Advisory::new(&component.id, AdvisoryKind::Required, "Enter a range"));
        }
        // Warn only: the user may still be typing the other bound
        if let (Some(min), Some(max)) = (range.min, range.max) {
            if min > max {
                advisories.push(Advisory::new(
                    &component.id,
                    AdvisoryKind::RangeOrder,
                    "Minimum is greater than maximum",
                ));
            }
        }
        advisories
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::blueprint::{ComponentKind, NumberRangeSpec};
    use std::collections::BTreeMap;

    fn component() -> Component {
        Component::new("budget_range", ComponentKind::NumberRangeInput(NumberRangeSpec::default()))
    }

    #[test]
    fn test_min_greater_than_max_is_stored_and_advised() {
        let codec = NumberRangeCodec;
        let c = component();
        let value = codec.normalize(&c, None).unwrap();
        let value = codec.merge(&c, value, FieldEdit::SetMax { max: Some(10.0) }).unwrap();
        let value = codec.merge(&c, value, FieldEdit::SetMin { min: Some(50.0) }).unwrap();

        assert_eq!(
            value,
            FieldValue::Range(NumberRange {
                min: Some(50.0),
                max: Some(10.0)
            })
        );
        let advisories = codec.validate(&c, &value);
        assert_eq!(advisories.len(), 1);
        assert_eq!(advisories[0].kind, AdvisoryKind::RangeOrder);
    }

    #[test]
    fn test_loose_map_is_read_as_range() {
        let mut map = BTreeMap::new();
        map.insert("min".to_string(), FieldValue::Text("5".to_string()));
        let value = NumberRangeCodec
            .normalize(&component(), Some(&FieldValue::Map(map)))
            .unwrap();
        assert_eq!(
            value,
            FieldValue::Range(NumberRange {
                min: Some(5.0),
                max: None
            })
        );
    }
}
