use super::steps::{wizard_blueprint, WizardStep};
use super::suggestions::{suggestions_for, Suggestion};
use crate::answers::{FieldPath, FieldValue, FormData};
use crate::blueprint::{Component, ComponentKind, Section};
use crate::error::{FormError, FormResult};
use crate::events::{WizardStepChangedPayload, EVENT_WIZARD_STEP_CHANGED};
use crate::fields::codecs::questions::default_answer;
use crate::fields::{Advisory, FieldEdit, FieldRegistry, SectionView};
use crate::session::{
    ActiveContext, ContextScope, PathMode, SaveStatus, SectionProgress, SessionCore,
    SessionOptions,
};
use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::sync::Arc;

/// Status of a wizard step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepStatus {
    NotStarted,
    InProgress,
    Complete,
}

/// A wizard path resolved to the component that stores it
struct Target<'a> {
    component: &'a Component,
    path: FieldPath,
    /// Set when the path names a question inside the step's questionnaire
    question_id: Option<String>,
}

/// The RFQ authoring wizard.
///
/// Steps run in a fixed order and share one answer document; each step
/// reads and writes `formData.<stepKey>`. Fields are addressed as
/// `stepKey.fieldId`, or `stepKey.questionId` on questionnaire steps.
pub struct WizardSession {
    core: SessionCore,
    current: WizardStep,
    visited: HashSet<WizardStep>,
}

impl WizardSession {
    pub fn start(registry: Arc<FieldRegistry>, options: SessionOptions) -> Self {
        let core = SessionCore::new(
            Arc::new(wizard_blueprint()),
            registry,
            options,
            PathMode::StepScoped,
        );
        let current = WizardStep::default();
        let session = Self {
            core,
            current,
            visited: HashSet::from([current]),
        };
        session.core.notify_assist(&session.active_context());
        session
    }

    pub fn id(&self) -> &str {
        self.core.id()
    }

    // Navigation

    pub fn current_step(&self) -> WizardStep {
        self.current
    }

    /// Disabled on the first step
    pub fn can_go_previous(&self) -> bool {
        self.current.previous().is_some()
    }

    /// Disabled on the last step
    pub fn can_go_next(&self) -> bool {
        self.current.next().is_some()
    }

    /// Advance one step, returning the new step
    pub fn next(&mut self) -> Option<WizardStep> {
        let next = self.current.next()?;
        self.go_to(next);
        Some(next)
    }

    /// Go back one step, returning the new step
    pub fn previous(&mut self) -> Option<WizardStep> {
        let previous = self.current.previous()?;
        self.go_to(previous);
        Some(previous)
    }

    /// Jump to any step; answers never block navigation
    pub fn go_to(&mut self, step: WizardStep) {
        if step == self.current {
            return;
        }
        let from = self.current;
        self.current = step;
        self.visited.insert(step);
        log::debug!("[Wizard] Step {} -> {}", from, step);

        self.core.shared.emit(
            EVENT_WIZARD_STEP_CHANGED,
            WizardStepChangedPayload {
                session_id: self.core.id().to_string(),
                from_step: from.key().to_string(),
                to_step: step.key().to_string(),
                can_go_previous: self.can_go_previous(),
                can_go_next: self.can_go_next(),
            },
        );
        self.core.notify_assist(&self.active_context());
    }

    fn section(&self, step: WizardStep) -> &Section {
        &self.core.blueprint.sections[step.index()]
    }

    // Progress

    pub fn step_progress(&self, step: WizardStep) -> SectionProgress {
        self.core.section_progress(self.section(step))
    }

    pub fn step_status(&self, step: WizardStep) -> StepStatus {
        let progress = self.step_progress(step);
        if progress.total == 0 {
            // Review has no inputs of its own
            let others_complete = WizardStep::all()
                .iter()
                .filter(|s| **s != step && self.step_progress(**s).total > 0)
                .all(|s| self.step_status(*s) == StepStatus::Complete);
            return if others_complete {
                StepStatus::Complete
            } else if self.visited.contains(&step) {
                StepStatus::InProgress
            } else {
                StepStatus::NotStarted
            };
        }

        if progress.is_complete() {
            StepStatus::Complete
        } else if progress.is_started() || step == self.current {
            StepStatus::InProgress
        } else {
            StepStatus::NotStarted
        }
    }

    pub fn step_statuses(&self) -> Vec<(WizardStep, StepStatus)> {
        WizardStep::all()
            .iter()
            .map(|s| (*s, self.step_status(*s)))
            .collect()
    }

    /// Share of complete steps
    pub fn completion_percentage(&self) -> u8 {
        let total = WizardStep::all().len();
        let complete = self
            .step_statuses()
            .iter()
            .filter(|(_, status)| *status == StepStatus::Complete)
            .count();
        ((complete as f32 / total as f32) * 100.0) as u8
    }

    // Answers

    fn resolve(&self, path: &str) -> FormResult<Target<'_>> {
        let unknown = || FormError::UnknownField(path.to_string());
        let parsed = FieldPath::parse(path);
        let step = WizardStep::from_key(&parsed.root).ok_or_else(unknown)?;
        let section = self.section(step);

        // The questionnaire owning the whole step sub-tree, if any
        let owner = section.components.iter().find(|c| c.id == section.section_id);

        let Some(sub_key) = parsed.sub_key.as_deref() else {
            return owner
                .map(|component| Target {
                    component,
                    path: FieldPath::top(step.key()),
                    question_id: None,
                })
                .ok_or_else(unknown);
        };

        if let Some(component) = section.input_components().find(|c| c.id == sub_key) {
            return Ok(Target {
                component,
                path: FieldPath::nested(step.key(), sub_key),
                question_id: None,
            });
        }

        let owner = owner.ok_or_else(unknown)?;
        match &owner.kind {
            ComponentKind::QuestionList(spec) if spec.questions.iter().any(|q| q.id == sub_key) => {
                Ok(Target {
                    component: owner,
                    path: FieldPath::top(step.key()),
                    question_id: Some(sub_key.to_string()),
                })
            }
            _ => Err(unknown()),
        }
    }

    /// Current value at `path`, or the codec default
    pub fn get(&self, path: &str) -> Option<FieldValue> {
        let target = self.resolve(path).ok()?;
        let value = self.core.value(target.component, &target.path)?;
        match target.question_id {
            Some(question_id) => value.as_map().and_then(|m| m.get(&question_id)).cloned(),
            None => Some(value),
        }
    }

    /// Apply an edit. Whole-value edits on a question path replace or reset
    /// just that question's answer.
    pub fn edit(&self, path: &str, edit: FieldEdit) -> FormResult<FieldValue> {
        let target = self.resolve(path)?;

        let edit = match (&target.question_id, edit) {
            (Some(question_id), FieldEdit::Replace { value }) => FieldEdit::SetAnswer {
                question_id: question_id.clone(),
                answer: value,
            },
            (Some(question_id), FieldEdit::Clear) => {
                let answer = match &target.component.kind {
                    ComponentKind::QuestionList(spec) => spec
                        .questions
                        .iter()
                        .find(|q| &q.id == question_id)
                        .map(default_answer)
                        .unwrap_or_default(),
                    _ => FieldValue::Null,
                };
                FieldEdit::SetAnswer {
                    question_id: question_id.clone(),
                    answer,
                }
            }
            (_, edit) => edit,
        };

        let updated = self.core.edit(target.component, &target.path, edit)?;
        Ok(match target.question_id {
            Some(question_id) => updated
                .as_map()
                .and_then(|m| m.get(&question_id))
                .cloned()
                .unwrap_or_default(),
            None => updated,
        })
    }

    pub fn set_value(&self, path: &str, value: FieldValue) -> FormResult<FieldValue> {
        self.edit(path, FieldEdit::Replace { value })
    }

    /// Toggle one checkbox option of the question at `stepKey.questionId`
    pub fn toggle_option(&self, path: &str, option: &str) -> FormResult<FieldValue> {
        let question_id = self
            .resolve(path)?
            .question_id
            .ok_or_else(|| FormError::UnknownField(path.to_string()))?;
        self.edit(
            path,
            FieldEdit::ToggleOption {
                question_id,
                option: option.to_string(),
            },
        )
    }

    /// Smart-assist entry point; identical in effect to the user entering `value`
    pub fn apply_suggestion(&self, path: &str, value: FieldValue) -> FormResult<FieldValue> {
        log::debug!("[Wizard] Applying suggestion to {}", path);
        self.set_value(path, value)
    }

    /// Smart suggestions for the current step
    pub fn suggestions(&self) -> Vec<Suggestion> {
        self.suggestions_on(Utc::now().date_naive())
    }

    pub fn suggestions_on(&self, today: NaiveDate) -> Vec<Suggestion> {
        suggestions_for(self.current, &self.core.snapshot(), today)
    }

    pub fn apply(&self, suggestion: &Suggestion) -> FormResult<FieldValue> {
        self.apply_suggestion(&suggestion.path, suggestion.value.clone())
    }

    pub fn form_data(&self) -> FormData {
        self.core.snapshot()
    }

    // Views

    pub fn render_current_step(&self) -> SectionView {
        self.core.render_section(self.section(self.current))
    }

    pub fn active_context(&self) -> ActiveContext {
        self.core
            .context_for(self.section(self.current), ContextScope::WizardStep)
    }

    pub fn advisories(&self) -> Vec<Advisory> {
        self.core.advisories()
    }

    // Lifecycle

    pub fn status(&self) -> SaveStatus {
        self.core.status()
    }

    pub fn autosave_running(&self) -> bool {
        self.core.autosave_running()
    }

    pub async fn save_now(&self) -> FormResult<bool> {
        self.core.save_now().await
    }

    pub async fn submit(&self) -> FormResult<()> {
        self.core.submit().await
    }

    pub fn close(&mut self) {
        self.core.close();
    }
}
