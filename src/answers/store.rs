//! Answer store
//!
//! A flat mapping from component id (or wizard step key) to its current value.
//! Writes are synchronous and always succeed; validity is only ever reported as
//! an advisory by the field codecs.

use super::value::FieldValue;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// The submitted/persisted answer document
pub type FormData = BTreeMap<String, FieldValue>;

/// Address of a value: either a top-level id or `stepKey.fieldId`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FieldPath {
    pub root: String,
    pub sub_key: Option<String>,
}

impl FieldPath {
    /// Parse `id` or `root.subKey`. Only the first dot separates the parts.
    pub fn parse(path: &str) -> Self {
        match path.split_once('.') {
            Some((root, sub)) if !root.is_empty() && !sub.is_empty() => Self {
                root: root.to_string(),
                sub_key: Some(sub.to_string()),
            },
            _ => Self {
                root: path.to_string(),
                sub_key: None,
            },
        }
    }

    /// Top-level id taken verbatim, dots included
    pub fn top(id: &str) -> Self {
        Self {
            root: id.to_string(),
            sub_key: None,
        }
    }

    pub fn nested(root: &str, sub_key: &str) -> Self {
        Self {
            root: root.to_string(),
            sub_key: Some(sub_key.to_string()),
        }
    }
}

impl std::fmt::Display for FieldPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.sub_key {
            Some(sub) => write!(f, "{}.{}", self.root, sub),
            None => write!(f, "{}", self.root),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AnswerStore {
    values: FormData,
}

impl AnswerStore {
    pub fn new() -> Self {
        Self {
            values: FormData::new(),
        }
    }

    /// Restore a store from a previously saved document
    pub fn from_form_data(values: FormData) -> Self {
        Self { values }
    }

    /// Raw stored value, if any
    pub fn get(&self, id: &str) -> Option<&FieldValue> {
        self.values.get(id)
    }

    /// Stored value or the supplied default
    pub fn get_or(&self, id: &str, default: FieldValue) -> FieldValue {
        self.values.get(id).cloned().unwrap_or(default)
    }

    /// Value at a compound path (`stepKey.fieldId` reads one level into a map)
    pub fn get_path(&self, path: &FieldPath) -> Option<&FieldValue> {
        let root = self.values.get(&path.root)?;
        match &path.sub_key {
            None => Some(root),
            Some(sub) => root.as_map().and_then(|m| m.get(sub)),
        }
    }

    /// Overwrite the value for an id
    pub fn set(&mut self, id: &str, value: FieldValue) {
        self.values.insert(id.to_string(), value);
    }

    /// Set one sub-key of a composite value, leaving its siblings untouched.
    ///
    /// Merges exactly one level deep. A stale non-map value under `id` is
    /// replaced by a fresh map.
    pub fn merge_nested(&mut self, id: &str, sub_key: &str, value: FieldValue) {
        let entry = self
            .values
            .entry(id.to_string())
            .or_insert_with(|| FieldValue::Map(BTreeMap::new()));

        if !matches!(entry, FieldValue::Map(_)) {
            if !entry.is_empty_collection() && *entry != FieldValue::Null {
                log::warn!(
                    "[AnswerStore] Replacing {} value under '{}' with a map to set '{}'",
                    entry.shape_name(),
                    id,
                    sub_key
                );
            }
            *entry = FieldValue::Map(BTreeMap::new());
        }

        if let FieldValue::Map(map) = entry {
            map.insert(sub_key.to_string(), value);
        }
    }

    /// Write through a path: plain `set` for top-level ids, `merge_nested` otherwise
    pub fn set_path(&mut self, path: &FieldPath, value: FieldValue) {
        match &path.sub_key {
            None => self.set(&path.root, value),
            Some(sub) => self.merge_nested(&path.root, sub, value),
        }
    }

    pub fn remove(&mut self, id: &str) -> Option<FieldValue> {
        self.values.remove(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.values.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn ids(&self) -> impl Iterator<Item = &String> {
        self.values.keys()
    }

    /// Borrow the full document
    pub fn form_data(&self) -> &FormData {
        &self.values
    }

    /// Copy of the full document, exactly as stored
    pub fn snapshot(&self) -> FormData {
        self.values.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(s: &str) -> FieldValue {
        FieldValue::Text(s.to_string())
    }

    #[test]
    fn test_field_path_parse() {
        let path = FieldPath::parse("currentProcess.cp_04");
        assert_eq!(path.root, "currentProcess");
        assert_eq!(path.sub_key.as_deref(), Some("cp_04"));
        assert_eq!(path.to_string(), "currentProcess.cp_04");

        let plain = FieldPath::parse("company_name");
        assert_eq!(plain.root, "company_name");
        assert!(plain.sub_key.is_none());

        // A trailing dot is not a compound path
        assert!(FieldPath::parse("odd.").sub_key.is_none());
    }

    #[test]
    fn test_merge_nested_preserves_siblings() {
        let mut store = AnswerStore::new();
        store.merge_nested("company_info", "Company Name", text("Acme"));
        store.merge_nested("company_info", "Region", text("EU"));
        store.merge_nested("company_info", "Company Name", text("Acme Corp"));

        let map = store.get("company_info").and_then(|v| v.as_map()).unwrap();
        assert_eq!(map.len(), 2);
        assert_eq!(map["Region"], text("EU"));
        assert_eq!(map["Company Name"], text("Acme Corp"));
    }

    #[test]
    fn test_merge_nested_is_idempotent() {
        let mut once = AnswerStore::new();
        once.merge_nested("q", "a", text("x"));

        let mut twice = once.clone();
        twice.merge_nested("q", "a", text("x"));

        assert_eq!(once, twice);
    }

    #[test]
    fn test_merge_nested_replaces_stale_shape() {
        let mut store = AnswerStore::new();
        store.set("q", text("not a map"));
        store.merge_nested("q", "a", text("x"));
        assert_eq!(store.get_path(&FieldPath::parse("q.a")), Some(&text("x")));
    }

    #[test]
    fn test_get_or_default() {
        let store = AnswerStore::new();
        assert_eq!(store.get_or("missing", FieldValue::Null), FieldValue::Null);
    }

    #[test]
    fn test_unknown_keys_survive_roundtrip() {
        let json = r#"{"legacy_field":"kept","budget":{"min":1,"max":2}}"#;
        let store: AnswerStore = serde_json::from_str(json).unwrap();
        assert!(store.contains("legacy_field"));
        let back = serde_json::to_value(&store).unwrap();
        assert_eq!(back["legacy_field"], "kept");
    }
}
