use super::assist::{ActiveContext, ContextScope};
use super::engine::{PathMode, SectionProgress, SessionCore, SessionOptions};
use super::state::SaveStatus;
use crate::answers::{FieldPath, FieldValue, FormData};
use crate::blueprint::{ComponentKind, FormBlueprint, Section};
use crate::error::{FormError, FormResult};
use crate::events::{SectionChangedPayload, EVENT_SECTION_CHANGED};
use crate::fields::{Advisory, FieldEdit, FieldRegistry, SectionView};
use std::sync::Arc;

/// A user filling in one blueprint-driven form.
///
/// Navigation is unguarded: any section can be shown at any time regardless
/// of advisories. Edits are synchronous; only saving and submitting await.
pub struct FormSession {
    core: SessionCore,
    current_section: usize,
}

impl FormSession {
    pub fn start(
        blueprint: Arc<FormBlueprint>,
        registry: Arc<FieldRegistry>,
        options: SessionOptions,
    ) -> Self {
        let session = Self {
            core: SessionCore::new(blueprint, registry, options, PathMode::TopLevel),
            current_section: 0,
        };
        if let Some(context) = session.active_context() {
            session.core.notify_assist(&context);
        }
        session
    }

    pub fn id(&self) -> &str {
        self.core.id()
    }

    pub fn blueprint(&self) -> &FormBlueprint {
        &self.core.blueprint
    }

    // Navigation

    pub fn current_section_index(&self) -> usize {
        self.current_section
    }

    pub fn current_section(&self) -> Option<&Section> {
        self.core.blueprint.section_at(self.current_section)
    }

    /// Show section `index`. Selecting the current section does nothing.
    pub fn set_section(&mut self, index: usize) -> FormResult<()> {
        let len = self.core.blueprint.section_count();
        if index >= len {
            return Err(FormError::SectionOutOfRange { index, len });
        }
        if index == self.current_section {
            return Ok(());
        }

        let from_index = self.current_section;
        self.current_section = index;
        let section_id = self.core.blueprint.sections[index].section_id.clone();
        log::debug!(
            "[FormSession] Section {} -> {} ({})",
            from_index,
            index,
            section_id
        );

        self.core.shared.emit(
            EVENT_SECTION_CHANGED,
            SectionChangedPayload {
                session_id: self.core.id().to_string(),
                from_index,
                to_index: index,
                section_id,
            },
        );
        if let Some(context) = self.active_context() {
            self.core.notify_assist(&context);
        }
        Ok(())
    }

    pub fn go_to_section(&mut self, section_id: &str) -> FormResult<()> {
        let index = self
            .core
            .blueprint
            .section_index(section_id)
            .ok_or_else(|| FormError::UnknownSection(section_id.to_string()))?;
        self.set_section(index)
    }

    pub fn can_go_previous(&self) -> bool {
        self.current_section > 0
    }

    pub fn can_go_next(&self) -> bool {
        self.current_section + 1 < self.core.blueprint.section_count()
    }

    /// Move forward one section; `false` on the last one
    pub fn next_section(&mut self) -> FormResult<bool> {
        if !self.can_go_next() {
            return Ok(false);
        }
        self.set_section(self.current_section + 1)?;
        Ok(true)
    }

    /// Move back one section; `false` on the first one
    pub fn previous_section(&mut self) -> FormResult<bool> {
        if !self.can_go_previous() {
            return Ok(false);
        }
        self.set_section(self.current_section - 1)?;
        Ok(true)
    }

    // Answers

    /// Current value of a field, or its codec default. Ids unknown to the
    /// blueprint return whatever is stored under them.
    pub fn get(&self, field_id: &str) -> Option<FieldValue> {
        match self.core.blueprint.component(field_id) {
            Some(component) => self.core.value(component, &FieldPath::top(field_id)),
            None => self.core.stored(&FieldPath::top(field_id)),
        }
    }

    pub fn edit(&self, field_id: &str, edit: FieldEdit) -> FormResult<FieldValue> {
        let component = self
            .core
            .blueprint
            .component(field_id)
            .ok_or_else(|| FormError::UnknownField(field_id.to_string()))?;
        self.core.edit(component, &FieldPath::top(field_id), edit)
    }

    pub fn set_value(&self, field_id: &str, value: FieldValue) -> FormResult<FieldValue> {
        self.edit(field_id, FieldEdit::Replace { value })
    }

    /// Smart-assist entry point; identical in effect to the user entering `value`.
    ///
    /// `componentId.questionId` targets one answer of a question list and
    /// returns just that answer.
    pub fn apply_suggestion(&self, target: &str, value: FieldValue) -> FormResult<FieldValue> {
        log::debug!("[FormSession] Applying suggestion to {}", target);
        if self.core.blueprint.component(target).is_some() {
            return self.set_value(target, value);
        }
        let (component_id, question_id) = self
            .question_target(target)
            .ok_or_else(|| FormError::UnknownField(target.to_string()))?;
        let updated = self.edit(
            component_id,
            FieldEdit::SetAnswer {
                question_id: question_id.to_string(),
                answer: value,
            },
        )?;
        Ok(updated
            .as_map()
            .and_then(|m| m.get(question_id))
            .cloned()
            .unwrap_or_default())
    }

    /// Split `componentId.questionId` at the dot after a question list that
    /// declares the question. Component ids may contain dots of their own.
    fn question_target<'a>(&self, target: &'a str) -> Option<(&'a str, &'a str)> {
        target
            .match_indices('.')
            .map(|(i, _)| (&target[..i], &target[i + 1..]))
            .find(|(component_id, question_id)| {
                matches!(
                    self.core.blueprint.component(component_id).map(|c| &c.kind),
                    Some(ComponentKind::QuestionList(spec))
                        if spec.questions.iter().any(|q| q.id == *question_id)
                )
            })
    }

    pub fn form_data(&self) -> FormData {
        self.core.snapshot()
    }

    // Views

    pub fn render_current_section(&self) -> Option<SectionView> {
        self.render_section(self.current_section)
    }

    pub fn render_section(&self, index: usize) -> Option<SectionView> {
        self.core
            .blueprint
            .section_at(index)
            .map(|s| self.core.render_section(s))
    }

    /// Active section and its field/question ids, for the smart-assist collaborator
    pub fn active_context(&self) -> Option<ActiveContext> {
        self.current_section()
            .map(|s| self.core.context_for(s, ContextScope::Section))
    }

    pub fn advisories(&self) -> Vec<Advisory> {
        self.core.advisories()
    }

    pub fn progress(&self) -> Vec<SectionProgress> {
        self.core.progress()
    }

    pub fn completion_percentage(&self) -> u8 {
        self.core.completion_percentage()
    }

    // Lifecycle

    pub fn status(&self) -> SaveStatus {
        self.core.status()
    }

    pub fn autosave_running(&self) -> bool {
        self.core.autosave_running()
    }

    /// "Save Progress": writes even when nothing changed
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
