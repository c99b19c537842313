//! The fixed RFQ authoring steps
//!
//! Each step owns `formData.<stepKey>`. Questionnaire steps are a single
//! QuestionList whose id is the step key, so their answers sit directly in
//! the step sub-tree (`formData.currentProcess.cp_04`). Other steps hold
//! several components stored under `formData.<stepKey>.<componentId>`.

use crate::blueprint::{
    Component, ComponentKind, DatePickerSpec, DynamicKeyValueTableSpec, DynamicListSpec,
    FormBlueprint, InstructionalTextSpec, KeyValueTableSpec, NumberRangeSpec, Question,
    QuestionInputType, QuestionListSpec, Section, WeightedCriteriaListSpec,
};
use serde::{Deserialize, Serialize};

/// Title of the generated wizard blueprint
pub const WIZARD_TITLE: &str = "Create RFQ";

// Component ids referenced by suggestions
pub const PROJECT_SUMMARY_ID: &str = "ps_summary";
pub const BUDGET_ID: &str = "ps_budget";
pub const BUDGET_BREAKDOWN_ID: &str = "ps_budget_breakdown";
pub const RESPONSE_DEADLINE_ID: &str = "bt_response_deadline";
pub const CRITERIA_ID: &str = "ec_criteria";

// Question ids in the general info step
pub const RFQ_TITLE_QUESTION: &str = "gi_01";
pub const COMPANY_NAME_QUESTION: &str = "gi_02";

/// Row label of the project name in the project summary table
pub const PROJECT_NAME_ROW: &str = "Project Name";

/// Wizard steps in order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum WizardStep {
    GeneralInfo,
    ProjectScope,
    CurrentProcess,
    AdditionalProcess,
    BudgetTimeline,
    EvaluationCriteria,
    Review,
}

impl WizardStep {
    /// Get all steps in order
    pub fn all() -> &'static [WizardStep] {
        &[
            WizardStep::GeneralInfo,
            WizardStep::ProjectScope,
            WizardStep::CurrentProcess,
            WizardStep::AdditionalProcess,
            WizardStep::BudgetTimeline,
            WizardStep::EvaluationCriteria,
            WizardStep::Review,
        ]
    }

    /// Answer store key of the step's sub-tree
    pub fn key(&self) -> &'static str {
        match self {
            WizardStep::GeneralInfo => "generalInfo",
            WizardStep::ProjectScope => "projectScope",
            WizardStep::CurrentProcess => "currentProcess",
            WizardStep::AdditionalProcess => "additionalProcess",
            WizardStep::BudgetTimeline => "budgetTimeline",
            WizardStep::EvaluationCriteria => "evaluationCriteria",
            WizardStep::Review => "review",
        }
    }

    pub fn from_key(key: &str) -> Option<WizardStep> {
        Self::all().iter().copied().find(|s| s.key() == key)
    }

    /// Get the step index (0-based)
    pub fn index(&self) -> usize {
        match self {
            WizardStep::GeneralInfo => 0,
            WizardStep::ProjectScope => 1,
            WizardStep::CurrentProcess => 2,
            WizardStep::AdditionalProcess => 3,
            WizardStep::BudgetTimeline => 4,
            WizardStep::EvaluationCriteria => 5,
            WizardStep::Review => 6,
        }
    }

    /// Get the next step, if any
    pub fn next(&self) -> Option<WizardStep> {
        Self::all().get(self.index() + 1).copied()
    }

    /// Get the previous step, if any
    pub fn previous(&self) -> Option<WizardStep> {
        self.index().checked_sub(1).map(|i| Self::all()[i])
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            WizardStep::GeneralInfo => "General Information",
            WizardStep::ProjectScope => "Project Scope",
            WizardStep::CurrentProcess => "Current Process",
            WizardStep::AdditionalProcess => "Additional Requirements",
            WizardStep::BudgetTimeline => "Budget & Timeline",
            WizardStep::EvaluationCriteria => "Evaluation Criteria",
            WizardStep::Review => "Review",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            WizardStep::GeneralInfo => "Who is buying and what the RFQ is called",
            WizardStep::ProjectScope => "What the software must cover and the budget for it",
            WizardStep::CurrentProcess => "How the work is done today",
            WizardStep::AdditionalProcess => "Integrations, migration and compliance",
            WizardStep::BudgetTimeline => "Deadlines and contract length",
            WizardStep::EvaluationCriteria => "How vendor responses will be scored",
            WizardStep::Review => "Check everything before publishing",
        }
    }

    /// The step as a blueprint section
    pub fn section(&self) -> Section {
        Section {
            section_id: self.key().to_string(),
            section_title: self.display_name().to_string(),
            description: Some(self.description().to_string()),
            components: self.components(),
        }
    }

    fn components(&self) -> Vec<Component> {
        match self {
            WizardStep::GeneralInfo => vec![questionnaire(
                *self,
                vec![
                    Question::new(RFQ_TITLE_QUESTION, "RFQ title", QuestionInputType::Text)
                        .with_required(true),
                    Question::new(COMPANY_NAME_QUESTION, "Company name", QuestionInputType::Text)
                        .with_required(true),
                    Question::new("gi_03", "Industry", QuestionInputType::Radio).with_options([
                        "Manufacturing",
                        "Healthcare",
                        "Financial Services",
                        "Retail",
                        "Technology",
                        "Other",
                    ]),
                    Question::new("gi_04", "Company size", QuestionInputType::Radio)
                        .with_options(["1-50", "51-200", "201-1000", "1000+"]),
                    Question::new("gi_05", "Primary contact email", QuestionInputType::Text)
                        .with_required(true),
                ],
            )],
            WizardStep::ProjectScope => vec![
                Component::new(
                    PROJECT_SUMMARY_ID,
                    ComponentKind::KeyValueTable(KeyValueTableSpec {
                        rows: vec![
                            PROJECT_NAME_ROW.to_string(),
                            "Business Objective".to_string(),
                            "Expected Users".to_string(),
                        ],
                        placeholder: None,
                    }),
                )
                .with_label("Project summary")
                .with_required(true),
                Component::new(
                    "ps_modules",
                    ComponentKind::DynamicList(DynamicListSpec {
                        min_items: Some(1),
                        max_items: Some(20),
                        placeholder: Some("e.g. Inventory tracking".to_string()),
                    }),
                )
                .with_label("Required modules"),
                Component::new(
                    BUDGET_ID,
                    ComponentKind::NumberRangeInput(NumberRangeSpec {
                        unit: Some("USD".to_string()),
                        min_label: Some("Minimum".to_string()),
                        max_label: Some("Maximum".to_string()),
                    }),
                )
                .with_label("Total budget")
                .with_required(true),
                Component::new(
                    BUDGET_BREAKDOWN_ID,
                    ComponentKind::DynamicKeyValueTable(DynamicKeyValueTableSpec {
                        key_label: Some("Category".to_string()),
                        value_label: Some("Amount (USD)".to_string()),
                        calculate_percentage: true,
                    }),
                )
                .with_label("Budget breakdown")
                .with_help("Percentages follow the amounts you enter"),
            ],
            WizardStep::CurrentProcess => vec![questionnaire(
                *self,
                vec![
                    Question::new("cp_01", "Which system do you use today?", QuestionInputType::Text)
                        .with_required(true),
                    Question::new("cp_02", "How is the process managed today?", QuestionInputType::Radio)
                        .with_options([
                            "Spreadsheets",
                            "Legacy software",
                            "Paper-based",
                            "No formal process",
                        ]),
                    Question::new("cp_03", "What are the main pain points?", QuestionInputType::Textarea),
                    Question::new(
                        "cp_04",
                        "Which capabilities must the new solution cover?",
                        QuestionInputType::CheckboxSet,
                    )
                    .with_options([
                        "User Management",
                        "Reporting & Analytics",
                        "Workflow Automation",
                        "Integrations",
                        "Mobile Access",
                    ])
                    .with_required(true),
                    Question::new(
                        "cp_05",
                        "How many licenses do you need?",
                        QuestionInputType::CheckboxSetWithQuantity,
                    )
                    .with_options(["Administrator", "Standard User", "Read-only User"]),
                ],
            )],
            WizardStep::AdditionalProcess => vec![questionnaire(
                *self,
                vec![
                    Question::new("ap_01", "Which systems must it integrate with?", QuestionInputType::Textarea),
                    Question::new("ap_02", "Do you need data migration?", QuestionInputType::Radio)
                        .with_options(["Yes", "No", "Not sure"]),
                    Question::new("ap_03", "Compliance requirements", QuestionInputType::CheckboxSet)
                        .with_options(["GDPR", "SOC 2", "HIPAA", "ISO 27001"]),
                    Question::new("ap_04", "Preferred hosting", QuestionInputType::Radio)
                        .with_options(["Cloud", "On-premise", "Hybrid"]),
                ],
            )],
            WizardStep::BudgetTimeline => vec![
                Component::new(RESPONSE_DEADLINE_ID, ComponentKind::DatePicker(DatePickerSpec::default()))
                    .with_label("Vendor response deadline")
                    .with_required(true),
                Component::new("bt_decision_date", ComponentKind::DatePicker(DatePickerSpec::default()))
                    .with_label("Decision date"),
                Component::new("bt_go_live", ComponentKind::DatePicker(DatePickerSpec::default()))
                    .with_label("Target go-live"),
                Component::new(
                    "bt_contract_length",
                    ComponentKind::NumberRangeInput(NumberRangeSpec {
                        unit: Some("months".to_string()),
                        min_label: None,
                        max_label: None,
                    }),
                )
                .with_label("Contract length"),
            ],
            WizardStep::EvaluationCriteria => vec![
                Component::new(
                    CRITERIA_ID,
                    ComponentKind::WeightedCriteriaList(WeightedCriteriaListSpec {
                        default_criteria: vec![
                            "Functionality".to_string(),
                            "Cost".to_string(),
                            "Support".to_string(),
                            "Integration".to_string(),
                        ],
                    }),
                )
                .with_label("Scoring criteria")
                .with_required(true),
                Component::new(
                    "ec_must_haves",
                    ComponentKind::DynamicList(DynamicListSpec {
                        min_items: None,
                        max_items: Some(10),
                        placeholder: None,
                    }),
                )
                .with_label("Must-have requirements"),
            ],
            WizardStep::Review => vec![Component::new(
                "rv_intro",
                ComponentKind::InstructionalText(InstructionalTextSpec {
                    content: "Check your answers before sending the RFQ to vendors.".to_string(),
                }),
            )],
        }
    }
}

impl Default for WizardStep {
    fn default() -> Self {
        WizardStep::GeneralInfo
    }
}

impl std::fmt::Display for WizardStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.key())
    }
}

fn questionnaire(step: WizardStep, questions: Vec<Question>) -> Component {
    Component::new(step.key(), ComponentKind::QuestionList(QuestionListSpec { questions }))
        .with_label(step.display_name())
}

/// All steps as one blueprint, one section per step
pub fn wizard_blueprint() -> FormBlueprint {
    FormBlueprint {
        form_title: WIZARD_TITLE.to_string(),
        description: None,
        sections: WizardStep::all().iter().map(|s| s.section()).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_step_order() {
        assert_eq!(WizardStep::GeneralInfo.previous(), None);
        assert_eq!(WizardStep::GeneralInfo.next(), Some(WizardStep::ProjectScope));
        assert_eq!(WizardStep::Review.next(), None);
        for (i, step) in WizardStep::all().iter().enumerate() {
            assert_eq!(step.index(), i);
            assert_eq!(WizardStep::from_key(step.key()), Some(*step));
        }
    }

    #[test]
    fn test_step_serializes_as_key() {
        assert_eq!(
            serde_json::to_string(&WizardStep::CurrentProcess).unwrap(),
            "\"currentProcess\""
        );
    }

    #[test]
    fn test_component_ids_unique() {
        let blueprint = wizard_blueprint();
        let mut seen = HashSet::new();
        for component in blueprint.components() {
            assert!(seen.insert(component.id.clone()), "duplicate {}", component.id);
        }
        assert_eq!(blueprint.section_count(), WizardStep::all().len());
    }

    #[test]
    fn test_current_process_owns_its_subtree() {
        let section = WizardStep::CurrentProcess.section();
        assert_eq!(section.components.len(), 1);
        assert_eq!(section.components[0].id, "currentProcess");
        match &section.components[0].kind {
            ComponentKind::QuestionList(spec) => {
                let cp_04 = spec.questions.iter().find(|q| q.id == "cp_04").unwrap();
                assert_eq!(cp_04.input_type, QuestionInputType::CheckboxSet);
            }
            other => panic!("unexpected {:?}", other),
        }
    }
}
