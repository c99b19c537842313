//! Smart-assist hook surface
//!
//! An external assistant learns which section is active through
//! [`SmartAssistHook`] and writes back through `apply_suggestion` on the
//! session, which goes down the same merge path as user input.

use crate::blueprint::{ComponentKind, Section};
use serde::{Deserialize, Serialize};

/// Where the active context comes from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContextScope {
    Section,
    WizardStep,
}

/// What the user is currently looking at
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActiveContext {
    pub session_id: String,
    pub scope: ContextScope,
    /// Section id or wizard step key
    pub id: String,
    pub title: String,
    /// Ids of answer-bearing fields, addressable through `apply_suggestion`
    pub field_ids: Vec<String>,
    /// Ids of the questions inside QuestionList fields
    pub question_ids: Vec<String>,
}

impl ActiveContext {
    /// Build the context for a section. `prefix` turns ids into compound
    /// `stepKey.fieldId` paths for wizard steps.
    pub fn for_section(
        session_id: &str,
        scope: ContextScope,
        section: &Section,
        prefix: Option<&str>,
    ) -> Self {
        let qualify = |id: &str| match prefix {
            Some(p) if p != id => format!("{}.{}", p, id),
            _ => id.to_string(),
        };

        let mut field_ids = Vec::new();
        let mut question_ids = Vec::new();
        for component in section.input_components() {
            field_ids.push(qualify(&component.id));
            if let ComponentKind::QuestionList(spec) = &component.kind {
                question_ids.extend(spec.questions.iter().map(|q| q.id.clone()));
            }
        }

        Self {
            session_id: session_id.to_string(),
            scope,
            id: section.section_id.clone(),
            title: section.section_title.clone(),
            field_ids,
            question_ids,
        }
    }
}

/// Receives active-context notifications on every section or step change
pub trait SmartAssistHook: Send + Sync {
    fn on_active_context(&self, context: &ActiveContext);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::blueprint::{
        Component, InstructionalTextSpec, Question, QuestionInputType, QuestionListSpec,
    };

    fn section() -> Section {
        Section {
            section_id: "currentProcess".to_string(),
            section_title: "Current Process".to_string(),
            description: None,
            components: vec![
                Component::new(
                    "intro",
                    ComponentKind::InstructionalText(InstructionalTextSpec {
                        content: "Tell us how you work today".to_string(),
                    }),
                ),
                Component::new(
                    "currentProcess",
                    ComponentKind::QuestionList(QuestionListSpec {
                        questions: vec![
                            Question::new("cp_01", "Current system", QuestionInputType::Text),
                            Question::new("cp_04", "Capabilities", QuestionInputType::CheckboxSet),
                        ],
                    }),
                ),
            ],
        }
    }

    #[test]
    fn test_context_skips_display_only_components() {
        let ctx = ActiveContext::for_section("s1", ContextScope::Section, &section(), None);
        assert_eq!(ctx.field_ids, vec!["currentProcess"]);
        assert_eq!(ctx.question_ids, vec!["cp_01", "cp_04"]);
    }

    #[test]
    fn test_context_qualifies_wizard_fields() {
        let mut section = section();
        section.components.push(Component::new(
            "notes",
            ComponentKind::QuestionList(QuestionListSpec::default()),
        ));
        let ctx = ActiveContext::for_section(
            "s1",
            ContextScope::WizardStep,
            &section,
            Some("currentProcess"),
        );
        // The component owning the whole step sub-tree keeps the bare step key
        assert_eq!(ctx.field_ids, vec!["currentProcess", "currentProcess.notes"]);
    }
}
