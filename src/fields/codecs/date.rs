//! DatePicker: an ISO-8601 date string, or nothing

use crate::answers::FieldValue;
use crate::blueprint::{Component, ComponentKind, ComponentType, DatePickerSpec};
use crate::fields::codec::{Advisory, AdvisoryKind, FieldCodec, FieldEdit, FieldError};
use chrono::{DateTime, NaiveDate};

pub struct DatePickerCodec;

/// Parse `YYYY-MM-DD`, also accepting a full RFC 3339 timestamp
pub fn parse_iso_date(text: &str) -> Option<NaiveDate> {
    let text = text.trim();
    NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .ok()
        .or_else(|| DateTime::parse_from_rfc3339(text).ok().map(|dt| dt.date_naive()))
}

fn bounds(component: &Component) -> DatePickerSpec {
    match &component.kind {
        ComponentKind::DatePicker(spec) => spec.clone(),
        _ => DatePickerSpec::default(),
    }
}

impl FieldCodec for DatePickerCodec {
    fn component_type(&self) -> ComponentType {
        ComponentType::DatePicker
    }

    fn default_value(&self, _component: &Component) -> Option<FieldValue> {
        Some(FieldValue::Null)
    }

    fn normalize(&self, component: &Component, stored: Option<&FieldValue>) -> Option<FieldValue> {
        match stored {
            Some(FieldValue::Text(text)) if !text.trim().is_empty() => Some(FieldValue::Text(text.clone())),
            _ => self.default_value(component),
        }
    }

    fn merge(
        &self,
        component: &Component,
        _current: FieldValue,
        edit: FieldEdit,
    ) -> Result<FieldValue, FieldError> {
        match edit {
            FieldEdit::Replace { value } => Ok(value),
            FieldEdit::Clear | FieldEdit::SetDate { date: None } => {
                Ok(self.default_value(component).unwrap_or_default())
            }
            // Stored as typed; an unparsable date only raises an advisory
            FieldEdit::SetDate { date: Some(date) } => Ok(FieldValue::Text(date)),
            other => Err(FieldError::unsupported(self.component_type(), &other)),
        }
    }

    fn validate(&self, component: &Component, value: &FieldValue) -> Vec<Advisory> {
        let mut advisories = Vec::new();
        let text = match value {
            FieldValue::Text(text) if !text.trim().is_empty() => text,
            _ => {
                if component.required {
                    advisories.push(Advisory::new(&component.id, AdvisoryKind::Required, "Pick a date"));
                }
                return advisories;
            }
        };

        let Some(date) = parse_iso_date(text) else {
            advisories.push(Advisory::new(
                &component.id,
                AdvisoryKind::InvalidDate,
                format!("'{}' is not a valid date (expected YYYY-MM-DD)", text),
            ));
            return advisories;
        };

        let spec = bounds(component);
        if let Some(min) = spec.min_date {
            if date < min {
                advisories.push(Advisory::new(
                    &component.id,
                    AdvisoryKind::DateOutOfBounds,
                    format!("Date must be on or after {}", min),
                ));
            }
        }
        if let Some(max) = spec.max_date {
            if date > max {
                advisories.push(Advisory::new(
                    &component.id,
                    AdvisoryKind::DateOutOfBounds,
                    format!("Date must be on or before {}", max),
                ));
            }
        }
        advisories
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn component() -> Component {
        Component::new(
            "go_live",
            ComponentKind::DatePicker(DatePickerSpec {
                min_date: NaiveDate::from_ymd_opt(2026, 1, 1),
                max_date: NaiveDate::from_ymd_opt(2026, 12, 31),
            }),
        )
    }

    fn set(date: Option<&str>) -> FieldValue {
        DatePickerCodec
            .merge(
                &component(),
                FieldValue::Null,
                FieldEdit::SetDate {
                    date: date.map(|d| d.to_string()),
                },
            )
            .unwrap()
    }

    #[test]
    fn test_parse_iso_date() {
        assert_eq!(parse_iso_date("2026-03-15"), NaiveDate::from_ymd_opt(2026, 3, 15));
        assert_eq!(
            parse_iso_date("2026-03-15T10:00:00Z"),
            NaiveDate::from_ymd_opt(2026, 3, 15)
        );
        assert_eq!(parse_iso_date("15/03/2026"), None);
    }

    #[test]
    fn test_date_bounds_advise() {
        let c = component();
        assert!(DatePickerCodec.validate(&c, &set(Some("2026-06-01"))).is_empty());

        let early = DatePickerCodec.validate(&c, &set(Some("2025-12-31")));
        assert_eq!(early[0].kind, AdvisoryKind::DateOutOfBounds);

        let garbage = set(Some("next tuesday"));
        assert_eq!(garbage, FieldValue::Text("next tuesday".to_string()));
        assert_eq!(DatePickerCodec.validate(&c, &garbage)[0].kind, AdvisoryKind::InvalidDate);
    }

    #[test]
    fn test_clearing_date() {
        assert_eq!(set(None), FieldValue::Null);
    }
}
