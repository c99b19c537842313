//! Smart suggestions for the wizard
//!
//! Plain local computations over answers already given. Each produces a
//! complete field value that is applied through the normal edit path, so
//! derived-value invariants (percentages, weight totals) hold exactly as if
//! the user had typed it.

use super::steps::{
    WizardStep, BUDGET_BREAKDOWN_ID, BUDGET_ID, COMPANY_NAME_QUESTION, CRITERIA_ID,
    PROJECT_NAME_ROW, PROJECT_SUMMARY_ID, RESPONSE_DEADLINE_ID, RFQ_TITLE_QUESTION,
};
use crate::answers::{FieldValue, FormData, WeightedCriterion};
use crate::fields::derive::proportional_rows;
use chrono::{Datelike, Duration, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};

/// Default split of a software budget
pub const BUDGET_SHARES: &[(&str, f64)] = &[
    ("Software Licenses", 40.0),
    ("Implementation", 30.0),
    ("Support & Maintenance", 20.0),
    ("Training", 10.0),
];

/// Preset scoring criteria; the weights add up to 100
pub const PRESET_CRITERIA: &[(&str, f64)] = &[
    ("Functionality", 30.0),
    ("Cost", 25.0),
    ("Support", 20.0),
    ("Integration", 15.0),
    ("Security", 10.0),
];

/// Days vendors get to respond
pub const RESPONSE_WINDOW_DAYS: i64 = 21;

/// A value proposed for one wizard field
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Suggestion {
    /// `stepKey.fieldId` or `stepKey.questionId`
    pub path: String,
    pub label: String,
    pub value: FieldValue,
}

fn path(step: WizardStep, id: &str) -> String {
    format!("{}.{}", step.key(), id)
}

fn sub_value<'a>(data: &'a FormData, step: WizardStep, id: &str) -> Option<&'a FieldValue> {
    data.get(step.key())
        .and_then(|v| v.as_map())
        .and_then(|m| m.get(id))
}

fn non_blank_text(value: Option<&FieldValue>) -> Option<&str> {
    value
        .and_then(|v| v.as_text())
        .map(str::trim)
        .filter(|s| !s.is_empty())
}

/// Total budget entered in the project scope: the range maximum, else its minimum
pub fn budget_total(budget: Option<&FieldValue>) -> Option<f64> {
    let total = match budget? {
        FieldValue::Range(range) => range.max.or(range.min),
        FieldValue::Map(map) => map
            .get("max")
            .and_then(|v| v.as_number())
            .or_else(|| map.get("min").and_then(|v| v.as_number())),
        other => other.as_number(),
    }?;
    (total.is_finite() && total > 0.0).then_some(total)
}

/// Budget rows proportional to `total`
pub fn suggest_budget_breakdown(total: f64) -> Option<Suggestion> {
    if !total.is_finite() || total <= 0.0 {
        return None;
    }
    Some(Suggestion {
        path: path(WizardStep::ProjectScope, BUDGET_BREAKDOWN_ID),
        label: "Split the budget into typical categories".to_string(),
        value: FieldValue::KeyValueRows(proportional_rows(total, BUDGET_SHARES)),
    })
}

pub fn suggest_evaluation_criteria() -> Suggestion {
    Suggestion {
        path: path(WizardStep::EvaluationCriteria, CRITERIA_ID),
        label: "Use standard software evaluation criteria".to_string(),
        value: FieldValue::Criteria(
            PRESET_CRITERIA
                .iter()
                .map(|(name, weight)| WeightedCriterion::new(*name, *weight))
                .collect(),
        ),
    }
}

/// Three weeks from `today`, moved to the following Monday when that lands on a weekend
pub fn response_deadline(today: NaiveDate) -> NaiveDate {
    let deadline = today + Duration::days(RESPONSE_WINDOW_DAYS);
    match deadline.weekday() {
        Weekday::Sat => deadline + Duration::days(2),
        Weekday::Sun => deadline + Duration::days(1),
        _ => deadline,
    }
}

pub fn suggest_response_deadline(today: NaiveDate) -> Suggestion {
    Suggestion {
        path: path(WizardStep::BudgetTimeline, RESPONSE_DEADLINE_ID),
        label: format!("Give vendors {} days to respond", RESPONSE_WINDOW_DAYS),
        value: FieldValue::Text(response_deadline(today).format("%Y-%m-%d").to_string()),
    }
}

pub fn suggest_rfq_title(company: Option<&str>, project: Option<&str>) -> Option<Suggestion> {
    let title = match (company, project) {
        (Some(company), Some(project)) => format!("{}: {} RFQ", company, project),
        (None, Some(project)) => format!("{} RFQ", project),
        (Some(company), None) => format!("{} Software RFQ", company),
        (None, None) => return None,
    };
    Some(Suggestion {
        path: path(WizardStep::GeneralInfo, RFQ_TITLE_QUESTION),
        label: "Name the RFQ after the project".to_string(),
        value: FieldValue::Text(title),
    })
}

/// Suggestions available on `step` given the answers so far
pub fn suggestions_for(step: WizardStep, data: &FormData, today: NaiveDate) -> Vec<Suggestion> {
    match step {
        WizardStep::GeneralInfo => {
            let company = non_blank_text(sub_value(data, WizardStep::GeneralInfo, COMPANY_NAME_QUESTION));
            let project = sub_value(data, WizardStep::ProjectScope, PROJECT_SUMMARY_ID)
                .and_then(|v| v.as_map())
                .and_then(|m| non_blank_text(m.get(PROJECT_NAME_ROW)));
            suggest_rfq_title(company, project).into_iter().collect()
        }
        WizardStep::ProjectScope => budget_total(sub_value(data, WizardStep::ProjectScope, BUDGET_ID))
            .and_then(suggest_budget_breakdown)
            .into_iter()
            .collect(),
        WizardStep::BudgetTimeline => vec![suggest_response_deadline(today)],
        WizardStep::EvaluationCriteria => vec![suggest_evaluation_criteria()],
        WizardStep::CurrentProcess | WizardStep::AdditionalProcess | WizardStep::Review => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::answers::NumberRange;
    use crate::fields::derive::weights_balanced;
    use std::collections::BTreeMap;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_budget_breakdown_is_proportional() {
        let suggestion = suggest_budget_breakdown(100_000.0).unwrap();
        let FieldValue::KeyValueRows(rows) = suggestion.value else {
            panic!("expected rows");
        };
        let values: Vec<f64> = rows.iter().map(|r| r.value).collect();
        assert_eq!(values, vec![40_000.0, 30_000.0, 20_000.0, 10_000.0]);
        let percentages: Vec<Option<f64>> = rows.iter().map(|r| r.percentage).collect();
        assert_eq!(percentages, vec![Some(40.0), Some(30.0), Some(20.0), Some(10.0)]);
        assert_eq!(suggestion.path, "projectScope.ps_budget_breakdown");
    }

    #[test]
    fn test_no_breakdown_without_budget() {
        assert!(suggest_budget_breakdown(0.0).is_none());
        assert!(budget_total(None).is_none());
        let empty = FieldValue::Range(NumberRange { min: None, max: None });
        assert!(budget_total(Some(&empty)).is_none());
    }

    #[test]
    fn test_budget_total_prefers_max() {
        let range = FieldValue::Range(NumberRange {
            min: Some(50_000.0),
            max: Some(80_000.0),
        });
        assert_eq!(budget_total(Some(&range)), Some(80_000.0));
        assert_eq!(budget_total(Some(&FieldValue::from("25000"))), Some(25_000.0));
    }

    #[test]
    fn test_preset_criteria_total_100() {
        let FieldValue::Criteria(criteria) = suggest_evaluation_criteria().value else {
            panic!("expected criteria");
        };
        assert_eq!(criteria.len(), 5);
        assert!(weights_balanced(&criteria));
    }

    #[test]
    fn test_response_deadline_skips_weekends() {
        // 2026-10-19 is a Monday; three weeks later is a Monday too
        assert_eq!(response_deadline(date(2026, 10, 19)), date(2026, 11, 9));
        // Saturday + 21 days is a Saturday, pushed to Monday
        assert_eq!(response_deadline(date(2026, 10, 17)), date(2026, 11, 9));
        // Sunday + 21 days is a Sunday, pushed to Monday
        assert_eq!(response_deadline(date(2026, 10, 18)), date(2026, 11, 9));
    }

    #[test]
    fn test_rfq_title() {
        let title = suggest_rfq_title(Some("Acme"), Some("CRM Replacement")).unwrap();
        assert_eq!(title.value, FieldValue::from("Acme: CRM Replacement RFQ"));
        assert_eq!(title.path, "generalInfo.gi_01");
        assert!(suggest_rfq_title(None, None).is_none());
    }

    #[test]
    fn test_suggestions_read_other_steps() {
        let mut general = BTreeMap::new();
        general.insert("gi_02".to_string(), FieldValue::from("Acme"));
        let mut summary = BTreeMap::new();
        summary.insert("Project Name".to_string(), FieldValue::from("  "));
        let mut scope = BTreeMap::new();
        scope.insert("ps_summary".to_string(), FieldValue::Map(summary));

        let mut data = FormData::new();
        data.insert("generalInfo".to_string(), FieldValue::Map(general));
        data.insert("projectScope".to_string(), FieldValue::Map(scope));

        let suggestions = suggestions_for(WizardStep::GeneralInfo, &data, date(2026, 10, 19));
        assert_eq!(suggestions.len(), 1);
        assert_eq!(suggestions[0].value, FieldValue::from("Acme Software RFQ"));

        assert!(suggestions_for(WizardStep::ProjectScope, &data, date(2026, 10, 19)).is_empty());
        assert!(suggestions_for(WizardStep::Review, &data, date(2026, 10, 19)).is_empty());
    }
}
