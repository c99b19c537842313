//! Machinery shared by form and wizard sessions: answer state, the edit
//! path, saving, submission and smart-assist notification.

use super::assist::{ActiveContext, ContextScope, SmartAssistHook};
use super::autosave::AutoSaveTimer;
use super::sinks::{AutoSaveSink, SubmissionSink};
use super::state::{SaveStatus, SessionPhase, SessionState};
use crate::answers::{AnswerStore, FieldPath, FieldValue, FormData};
use crate::blueprint::{Component, ComponentKind, FormBlueprint, Section};
use crate::config::FormsConfig;
use crate::error::{FormError, FormResult};
use crate::events::{
    FieldChangedPayload, FormEvent, FormObserver, NoopObserver, SavePayload, SubmitPayload,
    EVENT_AUTOSAVE_COMPLETED, EVENT_AUTOSAVE_FAILED, EVENT_AUTOSAVE_STARTED, EVENT_FIELD_CHANGED,
    EVENT_SUBMITTED, EVENT_SUBMIT_FAILED, EVENT_SUBMIT_STARTED,
};
use crate::fields::{Advisory, FieldEdit, FieldRegistry, FieldView, SectionView};
use crate::storage::FileDraftSink;
use crate::utils::{lock_mutex_recover, timestamp_now};
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex};

/// Collaborators and settings for a new session
#[derive(Clone, Default)]
pub struct SessionOptions {
    pub session_id: Option<String>,
    pub config: FormsConfig,
    pub initial_data: Option<FormData>,
    pub autosave_sink: Option<Arc<dyn AutoSaveSink>>,
    pub submission_sink: Option<Arc<dyn SubmissionSink>>,
    pub observer: Option<Arc<dyn FormObserver>>,
    pub assist: Option<Arc<dyn SmartAssistHook>>,
}

impl SessionOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_session_id(mut self, id: impl Into<String>) -> Self {
        self.session_id = Some(id.into());
        self
    }

    pub fn with_config(mut self, config: FormsConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_initial_data(mut self, data: FormData) -> Self {
        self.initial_data = Some(data);
        self
    }

    pub fn with_autosave_sink(mut self, sink: Arc<dyn AutoSaveSink>) -> Self {
        self.autosave_sink = Some(sink);
        self
    }

    pub fn with_submission_sink(mut self, sink: Arc<dyn SubmissionSink>) -> Self {
        self.submission_sink = Some(sink);
        self
    }

    pub fn with_observer(mut self, observer: Arc<dyn FormObserver>) -> Self {
        self.observer = Some(observer);
        self
    }

    pub fn with_assist(mut self, hook: Arc<dyn SmartAssistHook>) -> Self {
        self.assist = Some(hook);
        self
    }

    /// Auto-save into draft files, resuming from the existing draft when
    /// no initial data was given
    pub fn with_file_drafts(mut self, sink: FileDraftSink) -> Self {
        if self.initial_data.is_none() {
            match sink.load() {
                Ok(Some(data)) => {
                    log::info!("[FormSession] Resuming from draft {:?}", sink.path());
                    self.initial_data = Some(data);
                }
                Ok(None) => {}
                Err(e) => log::warn!("[FormSession] Ignoring unreadable draft: {}", e),
            }
        }
        self.autosave_sink = Some(Arc::new(sink));
        self
    }
}

/// How component ids map onto answer store paths
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum PathMode {
    /// Blueprint forms: every component is a top-level id
    TopLevel,
    /// Wizard: components live under their step key, except one whose id
    /// equals the step key, which owns the whole sub-tree
    StepScoped,
}

/// Answered/required counts for one section or step
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SectionProgress {
    pub section_id: String,
    pub total: usize,
    pub answered: usize,
    pub required: usize,
    pub required_answered: usize,
}

impl SectionProgress {
    pub fn is_started(&self) -> bool {
        self.answered > 0
    }

    pub fn is_complete(&self) -> bool {
        self.required_answered == self.required && (self.required > 0 || self.answered > 0)
    }
}

/// State reachable from the auto-save task
pub(crate) struct SessionShared {
    pub(crate) id: String,
    pub(crate) state: Mutex<SessionState>,
    autosave_sink: Option<Arc<dyn AutoSaveSink>>,
    observer: Arc<dyn FormObserver>,
}

impl SessionShared {
    pub(crate) fn emit(&self, event_type: &str, payload: impl Serialize) {
        self.observer.on_event(&FormEvent::new(event_type, payload));
    }

    pub(crate) fn is_finished(&self) -> bool {
        lock_mutex_recover(&self.state).phase.is_finished()
    }

    /// Save the current answers. Timer saves skip a clean store; manual saves
    /// always write. Returns whether anything was handed to the sink.
    pub(crate) async fn save(&self, automatic: bool) -> FormResult<bool> {
        let Some(sink) = self.autosave_sink.as_ref() else {
            return Ok(false);
        };

        let pending = {
            let mut state = lock_mutex_recover(&self.state);
            match state.begin_save(!automatic) {
                Some(pending) => pending,
                None => return Ok(false),
            }
        };

        self.emit(
            EVENT_AUTOSAVE_STARTED,
            SavePayload {
                session_id: self.id.clone(),
                revision: pending.revision,
                automatic,
                saved_at: None,
                error: None,
            },
        );

        // No lock is held across the sink call; edits keep flowing
        let result = sink.save(&pending.data).await;

        match result {
            Ok(()) => {
                let saved_at = {
                    let mut state = lock_mutex_recover(&self.state);
                    state.finish_save(pending.revision, Ok(()));
                    state.last_saved_at
                };
                log::debug!(
                    "[AutoSave] Saved session {} at revision {}",
                    self.id,
                    pending.revision
                );
                self.emit(
                    EVENT_AUTOSAVE_COMPLETED,
                    SavePayload {
                        session_id: self.id.clone(),
                        revision: pending.revision,
                        automatic,
                        saved_at: saved_at.map(|t| t.to_rfc3339()),
                        error: None,
                    },
                );
                Ok(true)
            }
            Err(e) => {
                let message = e.to_string();
                lock_mutex_recover(&self.state).finish_save(pending.revision, Err(message.clone()));
                log::warn!(
                    "[AutoSave] Saving session {} failed, will retry on the next tick: {}",
                    self.id,
                    message
                );
                self.emit(
                    EVENT_AUTOSAVE_FAILED,
                    SavePayload {
                        session_id: self.id.clone(),
                        revision: pending.revision,
                        automatic,
                        saved_at: None,
                        error: Some(message.clone()),
                    },
                );
                Err(FormError::Storage(message))
            }
        }
    }
}

pub(crate) struct SessionCore {
    pub(crate) shared: Arc<SessionShared>,
    pub(crate) blueprint: Arc<FormBlueprint>,
    pub(crate) registry: Arc<FieldRegistry>,
    pub(crate) config: FormsConfig,
    path_mode: PathMode,
    submission_sink: Option<Arc<dyn SubmissionSink>>,
    assist: Option<Arc<dyn SmartAssistHook>>,
    timer: Option<AutoSaveTimer>,
}

impl SessionCore {
    pub(crate) fn new(
        blueprint: Arc<FormBlueprint>,
        registry: Arc<FieldRegistry>,
        options: SessionOptions,
        path_mode: PathMode,
    ) -> Self {
        let id = options
            .session_id
            .unwrap_or_else(|| uuid::Uuid::new_v4().to_string());
        let answers = AnswerStore::from_form_data(options.initial_data.unwrap_or_default());

        let shared = Arc::new(SessionShared {
            id,
            state: Mutex::new(SessionState::new(answers)),
            autosave_sink: options.autosave_sink,
            observer: options.observer.unwrap_or_else(|| Arc::new(NoopObserver)),
        });

        let timer = if options.config.autosave.enabled && shared.autosave_sink.is_some() {
            AutoSaveTimer::start(shared.clone(), options.config.autosave.interval())
        } else {
            None
        };

        log::info!(
            "[FormSession] Started session {} for '{}' ({} sections, auto-save {})",
            shared.id,
            blueprint.form_title,
            blueprint.section_count(),
            if timer.is_some() { "on" } else { "off" }
        );

        Self {
            shared,
            blueprint,
            registry,
            config: options.config,
            path_mode,
            submission_sink: options.submission_sink,
            assist: options.assist,
            timer,
        }
    }

    pub(crate) fn id(&self) -> &str {
        &self.shared.id
    }

    /// Answer store path of a component within its section
    pub(crate) fn path_for(&self, section: &Section, component: &Component) -> FieldPath {
        match self.path_mode {
            PathMode::TopLevel => FieldPath::top(&component.id),
            PathMode::StepScoped if component.id == section.section_id => {
                FieldPath::top(&component.id)
            }
            PathMode::StepScoped => FieldPath::nested(&section.section_id, &component.id),
        }
    }

    /// Merge an edit into the store through the component's codec
    pub(crate) fn edit(
        &self,
        component: &Component,
        path: &FieldPath,
        edit: FieldEdit,
    ) -> FormResult<FieldValue> {
        let (updated, revision) = {
            let mut state = lock_mutex_recover(&self.shared.state);
            if !state.phase.accepts_edits() {
                return Err(FormError::SessionClosed);
            }
            let updated = self
                .registry
                .apply_edit(component, &mut state.answers, path, edit)?;
            (updated, state.record_edit())
        };

        self.shared.emit(
            EVENT_FIELD_CHANGED,
            FieldChangedPayload {
                session_id: self.shared.id.clone(),
                path: path.to_string(),
                value: serde_json::to_value(&updated).unwrap_or(serde_json::Value::Null),
                revision,
            },
        );
        Ok(updated)
    }

    pub(crate) fn stored(&self, path: &FieldPath) -> Option<FieldValue> {
        lock_mutex_recover(&self.shared.state)
            .answers
            .get_path(path)
            .cloned()
    }

    /// Value read through the codec, or its default when nothing is stored
    pub(crate) fn value(&self, component: &Component, path: &FieldPath) -> Option<FieldValue> {
        let stored = self.stored(path);
        self.registry.value_of(component, stored.as_ref())
    }

    pub(crate) fn snapshot(&self) -> FormData {
        lock_mutex_recover(&self.shared.state).answers.snapshot()
    }

    pub(crate) fn status(&self) -> SaveStatus {
        lock_mutex_recover(&self.shared.state).status()
    }

    pub(crate) fn render_section(&self, section: &Section) -> SectionView {
        let state = lock_mutex_recover(&self.shared.state);
        let fields: Vec<FieldView> = section
            .components
            .iter()
            .filter_map(|c| {
                let path = self.path_for(section, c);
                self.registry.render(c, state.answers.get_path(&path))
            })
            .collect();

        SectionView {
            section_id: section.section_id.clone(),
            section_title: section.section_title.clone(),
            description: section.description.clone(),
            fields,
        }
    }

    pub(crate) fn advisories(&self) -> Vec<Advisory> {
        let state = lock_mutex_recover(&self.shared.state);
        let mut advisories = Vec::new();
        for section in &self.blueprint.sections {
            for component in section.input_components() {
                let path = self.path_for(section, component);
                advisories.extend(
                    self.registry
                        .validate(component, state.answers.get_path(&path)),
                );
            }
        }
        advisories
    }

    pub(crate) fn section_progress(&self, section: &Section) -> SectionProgress {
        let state = lock_mutex_recover(&self.shared.state);
        let mut progress = SectionProgress {
            section_id: section.section_id.clone(),
            total: 0,
            answered: 0,
            required: 0,
            required_answered: 0,
        };

        let mut count = |required: bool, answered: bool| {
            progress.total += 1;
            if answered {
                progress.answered += 1;
            }
            if required {
                progress.required += 1;
                if answered {
                    progress.required_answered += 1;
                }
            }
        };

        for component in section.input_components() {
            let stored = state.answers.get_path(&self.path_for(section, component));
            match &component.kind {
                // Each question counts on its own
                ComponentKind::QuestionList(spec) => {
                    let answers = stored.and_then(|v| v.as_map());
                    for question in &spec.questions {
                        let answered = answers
                            .and_then(|m| m.get(&question.id))
                            .map_or(false, |v| !v.is_blank());
                        count(component.required || question.required, answered);
                    }
                }
                _ => {
                    let answered = stored.map_or(false, |v| !v.is_blank());
                    count(component.required, answered);
                }
            }
        }
        progress
    }

    pub(crate) fn progress(&self) -> Vec<SectionProgress> {
        self.blueprint
            .sections
            .iter()
            .map(|s| self.section_progress(s))
            .collect()
    }

    /// Share of required answers given, or of all answers when nothing is required
    pub(crate) fn completion_percentage(&self) -> u8 {
        let progress = self.progress();
        let required: usize = progress.iter().map(|p| p.required).sum();
        let (done, total) = if required > 0 {
            (progress.iter().map(|p| p.required_answered).sum::<usize>(), required)
        } else {
            (
                progress.iter().map(|p| p.answered).sum::<usize>(),
                progress.iter().map(|p| p.total).sum::<usize>(),
            )
        };
        if total == 0 {
            return 0;
        }
        ((done as f32 / total as f32) * 100.0) as u8
    }

    pub(crate) fn context_for(&self, section: &Section, scope: ContextScope) -> ActiveContext {
        let prefix = match self.path_mode {
            PathMode::TopLevel => None,
            PathMode::StepScoped => Some(section.section_id.as_str()),
        };
        ActiveContext::for_section(&self.shared.id, scope, section, prefix)
    }

    /// Tell the smart-assist collaborator what is on screen
    pub(crate) fn notify_assist(&self, context: &ActiveContext) {
        if !self.config.assist.enabled {
            return;
        }
        if let Some(hook) = &self.assist {
            hook.on_active_context(context);
        }
    }

    pub(crate) async fn save_now(&self) -> FormResult<bool> {
        if self.shared.is_finished() {
            return Err(FormError::SessionClosed);
        }
        self.shared.save(false).await
    }

    /// Hand the complete store to the submission sink. Success is terminal;
    /// on failure the answers stay as they were and the session remains open.
    pub(crate) async fn submit(&self) -> FormResult<()> {
        let sink = self
            .submission_sink
            .clone()
            .ok_or_else(|| FormError::Submission("no submission sink configured".to_string()))?;

        let data = {
            let mut state = lock_mutex_recover(&self.shared.state);
            match state.phase {
                SessionPhase::Submitted | SessionPhase::Closed => {
                    return Err(FormError::SessionClosed)
                }
                SessionPhase::Submitting => {
                    return Err(FormError::Submission(
                        "a submission is already in progress".to_string(),
                    ))
                }
                SessionPhase::Editing => {}
            }
            state.phase = SessionPhase::Submitting;
            state.answers.snapshot()
        };
        let field_count = data.len();

        self.shared.emit(
            EVENT_SUBMIT_STARTED,
            SubmitPayload {
                session_id: self.shared.id.clone(),
                field_count,
                error: None,
                timestamp: timestamp_now(),
            },
        );

        match sink.submit(&data).await {
            Ok(()) => {
                {
                    let mut state = lock_mutex_recover(&self.shared.state);
                    state.phase = SessionPhase::Submitted;
                    state.last_submit_error = None;
                }
                log::info!("[FormSession] Session {} submitted", self.shared.id);
                self.shared.emit(
                    EVENT_SUBMITTED,
                    SubmitPayload {
                        session_id: self.shared.id.clone(),
                        field_count,
                        error: None,
                        timestamp: timestamp_now(),
                    },
                );
                Ok(())
            }
            Err(e) => {
                let message = e.to_string();
                {
                    let mut state = lock_mutex_recover(&self.shared.state);
                    state.phase = SessionPhase::Editing;
                    state.last_submit_error = Some(message.clone());
                }
                log::warn!(
                    "[FormSession] Submitting session {} failed: {}",
                    self.shared.id,
                    message
                );
                self.shared.emit(
                    EVENT_SUBMIT_FAILED,
                    SubmitPayload {
                        session_id: self.shared.id.clone(),
                        field_count,
                        error: Some(message.clone()),
                        timestamp: timestamp_now(),
                    },
                );
                Err(FormError::Submission(message))
            }
        }
    }

    pub(crate) fn autosave_running(&self) -> bool {
        self.timer.as_ref().map_or(false, |t| t.is_running())
    }

    /// Stop the timer and refuse further edits. Idempotent.
    pub(crate) fn close(&mut self) {
        if let Some(mut timer) = self.timer.take() {
            timer.stop();
        }
        let mut state = lock_mutex_recover(&self.shared.state);
        if state.phase != SessionPhase::Submitted && state.phase != SessionPhase::Closed {
            state.phase = SessionPhase::Closed;
            log::info!("[FormSession] Closed session {}", self.shared.id);
        }
    }
}

impl Drop for SessionCore {
    fn drop(&mut self) {
        if let Some(mut timer) = self.timer.take() {
            timer.stop();
        }
    }
}
