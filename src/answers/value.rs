//! Answer value shapes
//!
//! Every component id maps to one [`FieldValue`]. The enum is untagged so the
//! persisted answer document reads like plain JSON; the shape stored under an id
//! is never trusted on its own. Codecs re-read values through the component
//! definition and fall back to their defaults when the stored shape is stale.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One entry of a `DynamicList`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListItem {
    pub id: String,
    pub value: String,
}

impl ListItem {
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            id: new_row_id(),
            value: value.into(),
        }
    }
}

/// One row of a `DynamicKeyValueTable`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeyValueRow {
    pub id: String,
    pub key: String,
    pub value: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub percentage: Option<f64>,
}

impl KeyValueRow {
    pub fn new(key: impl Into<String>, value: f64) -> Self {
        Self {
            id: new_row_id(),
            key: key.into(),
            value,
            percentage: None,
        }
    }
}

/// One row of a `WeightedCriteriaList`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeightedCriterion {
    pub id: String,
    pub criterion: String,
    pub weight: f64,
}

impl WeightedCriterion {
    pub fn new(criterion: impl Into<String>, weight: f64) -> Self {
        Self {
            id: new_row_id(),
            criterion: criterion.into(),
            weight,
        }
    }
}

/// One option of a checkbox-with-quantity question
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuantityChoice {
    pub label: String,
    pub checked: bool,
    #[serde(default)]
    pub number: Option<f64>,
}

/// Value of a `NumberRangeInput`
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NumberRange {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,
}

/// A stored answer
///
/// Variant order matters for deserialization: more specific object shapes are
/// tried before the generic map.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Null,
    Number(f64),
    Text(String),
    Choices(Vec<String>),
    KeyValueRows(Vec<KeyValueRow>),
    Criteria(Vec<WeightedCriterion>),
    Quantities(Vec<QuantityChoice>),
    List(Vec<ListItem>),
    Range(NumberRange),
    /// Key/value tables, question answers and wizard step sub-trees
    Map(BTreeMap<String, FieldValue>),
}

impl Default for FieldValue {
    fn default() -> Self {
        FieldValue::Null
    }
}

impl FieldValue {
    /// Short name of the stored shape, used in log lines and errors
    pub fn shape_name(&self) -> &'static str {
        match self {
            FieldValue::Null => "null",
            FieldValue::Number(_) => "number",
            FieldValue::Text(_) => "text",
            FieldValue::Choices(_) => "choices",
            FieldValue::KeyValueRows(_) => "key_value_rows",
            FieldValue::Criteria(_) => "criteria",
            FieldValue::Quantities(_) => "quantities",
            FieldValue::List(_) => "list",
            FieldValue::Range(_) => "range",
            FieldValue::Map(_) => "map",
        }
    }

    /// True for values that count as "not answered"
    pub fn is_blank(&self) -> bool {
        match self {
            FieldValue::Null => true,
            FieldValue::Number(_) => false,
            FieldValue::Text(s) => s.trim().is_empty(),
            FieldValue::Choices(v) => v.is_empty(),
            FieldValue::KeyValueRows(v) => v.is_empty(),
            FieldValue::Criteria(v) => v.is_empty(),
            FieldValue::Quantities(v) => !v.iter().any(|q| q.checked),
            FieldValue::List(v) => v.iter().all(|item| item.value.trim().is_empty()),
            FieldValue::Range(r) => r.min.is_none() && r.max.is_none(),
            FieldValue::Map(m) => m.values().all(|v| v.is_blank()),
        }
    }

    /// An empty array or object deserializes into whichever variant is tried
    /// first, so codecs treat any empty collection as "nothing stored yet".
    pub fn is_empty_collection(&self) -> bool {
        match self {
            FieldValue::Choices(v) => v.is_empty(),
            FieldValue::KeyValueRows(v) => v.is_empty(),
            FieldValue::Criteria(v) => v.is_empty(),
            FieldValue::Quantities(v) => v.is_empty(),
            FieldValue::List(v) => v.is_empty(),
            FieldValue::Map(m) => m.is_empty(),
            FieldValue::Range(r) => r.min.is_none() && r.max.is_none(),
            _ => false,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            FieldValue::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            FieldValue::Number(n) => Some(*n),
            FieldValue::Text(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&BTreeMap<String, FieldValue>> {
        match self {
            FieldValue::Map(m) => Some(m),
            _ => None,
        }
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::Text(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::Text(value)
    }
}

impl From<f64> for FieldValue {
    fn from(value: f64) -> Self {
        FieldValue::Number(value)
    }
}

impl From<Vec<String>> for FieldValue {
    fn from(value: Vec<String>) -> Self {
        FieldValue::Choices(value)
    }
}

/// Generate an id for a new list/table row
pub fn new_row_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn parse(value: serde_json::Value) -> FieldValue {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_untagged_shapes_resolve() {
        assert_eq!(parse(json!(null)), FieldValue::Null);
        assert_eq!(parse(json!("hello")), FieldValue::Text("hello".to_string()));
        assert_eq!(parse(json!(12.5)), FieldValue::Number(12.5));
        assert!(matches!(parse(json!(["a", "b"])), FieldValue::Choices(_)));
        assert!(matches!(
            parse(json!([{"id": "r1", "key": "Licenses", "value": 30}])),
            FieldValue::KeyValueRows(_)
        ));
        assert!(matches!(
            parse(json!([{"id": "c1", "criterion": "Cost", "weight": 40}])),
            FieldValue::Criteria(_)
        ));
        assert!(matches!(
            parse(json!([{"label": "SSO", "checked": true, "number": 3}])),
            FieldValue::Quantities(_)
        ));
        assert!(matches!(
            parse(json!([{"id": "i1", "value": "Salesforce"}])),
            FieldValue::List(_)
        ));
        assert_eq!(
            parse(json!({"min": 10, "max": 50})),
            FieldValue::Range(NumberRange {
                min: Some(10.0),
                max: Some(50.0)
            })
        );
        assert!(matches!(
            parse(json!({"Company": "Acme", "Region": "EU"})),
            FieldValue::Map(_)
        ));
    }

    #[test]
    fn test_range_with_extra_keys_is_a_map() {
        let value = parse(json!({"min": 1, "note": "x"}));
        assert!(matches!(value, FieldValue::Map(_)));
    }

    #[test]
    fn test_blank_detection() {
        assert!(FieldValue::Null.is_blank());
        assert!(FieldValue::Text("  ".to_string()).is_blank());
        assert!(!FieldValue::Number(0.0).is_blank());
        assert!(FieldValue::Quantities(vec![QuantityChoice {
            label: "A".to_string(),
            checked: false,
            number: Some(2.0),
        }])
        .is_blank());
        assert!(!FieldValue::Choices(vec!["A".to_string()]).is_blank());
    }

    #[test]
    fn test_key_value_row_omits_missing_percentage() {
        let row = KeyValueRow {
            id: "r1".to_string(),
            key: "Support".to_string(),
            value: 10.0,
            percentage: None,
        };
        let json = serde_json::to_value(&row).unwrap();
        assert!(json.get("percentage").is_none());
    }
}
