//! Ephemeral session state: answers plus saving/submission bookkeeping.
//! None of this except the answers is ever persisted.

use crate::answers::{AnswerStore, FormData};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Lifecycle of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionPhase {
    Editing,
    Submitting,
    /// Terminal
    Submitted,
    /// Terminal
    Closed,
}

impl SessionPhase {
    /// Edits keep flowing while a submission is in flight
    pub fn accepts_edits(&self) -> bool {
        matches!(self, SessionPhase::Editing | SessionPhase::Submitting)
    }

    pub fn is_finished(&self) -> bool {
        matches!(self, SessionPhase::Submitted | SessionPhase::Closed)
    }
}

/// Snapshot of the saving state for the UI ("Saving...", "Saved at ...")
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveStatus {
    pub phase: SessionPhase,
    pub is_dirty: bool,
    pub is_saving: bool,
    pub revision: u64,
    pub last_saved_at: Option<DateTime<Utc>>,
    pub last_save_error: Option<String>,
    pub last_submit_error: Option<String>,
}

/// A save that has been handed a snapshot and not yet finished
#[derive(Debug, Clone)]
pub struct PendingSave {
    pub data: FormData,
    pub revision: u64,
}

#[derive(Debug)]
pub struct SessionState {
    pub answers: AnswerStore,
    pub phase: SessionPhase,
    pub is_dirty: bool,
    pub is_saving: bool,
    /// Bumped on every accepted edit
    pub revision: u64,
    pub last_saved_at: Option<DateTime<Utc>>,
    pub last_save_error: Option<String>,
    pub last_submit_error: Option<String>,
}

impl SessionState {
    pub fn new(answers: AnswerStore) -> Self {
        Self {
            answers,
            phase: SessionPhase::Editing,
            is_dirty: false,
            is_saving: false,
            revision: 0,
            last_saved_at: None,
            last_save_error: None,
            last_submit_error: None,
        }
    }

    pub fn record_edit(&mut self) -> u64 {
        self.revision += 1;
        self.is_dirty = true;
        self.revision
    }

    /// Start a save unless one is already running. Without `force` a clean
    /// store is not saved again.
    pub fn begin_save(&mut self, force: bool) -> Option<PendingSave> {
        if self.is_saving || !self.phase.accepts_edits() {
            return None;
        }
        if !force && !self.is_dirty {
            return None;
        }
        self.is_saving = true;
        Some(PendingSave {
            data: self.answers.snapshot(),
            revision: self.revision,
        })
    }

    /// Record the outcome of a save. Edits made while it was in flight keep
    /// the store dirty; a failure always does.
    pub fn finish_save(&mut self, saved_revision: u64, outcome: Result<(), String>) {
        self.is_saving = false;
        match outcome {
            Ok(()) => {
                self.last_saved_at = Some(Utc::now());
                self.last_save_error = None;
                if self.revision == saved_revision {
                    self.is_dirty = false;
                }
            }
            Err(message) => {
                self.last_save_error = Some(message);
            }
        }
    }

    pub fn status(&self) -> SaveStatus {
        SaveStatus {
            phase: self.phase,
            is_dirty: self.is_dirty,
            is_saving: self.is_saving,
            revision: self.revision,
            last_saved_at: self.last_saved_at,
            last_save_error: self.last_save_error.clone(),
            last_submit_error: self.last_submit_error.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::answers::FieldValue;

    fn dirty_state() -> SessionState {
        let mut state = SessionState::new(AnswerStore::new());
        state.answers.set("title", FieldValue::from("CRM"));
        state.record_edit();
        state
    }

    #[test]
    fn test_clean_state_skips_timer_save() {
        let mut state = SessionState::new(AnswerStore::new());
        assert!(state.begin_save(false).is_none());
        // Manual save always goes through
        assert!(state.begin_save(true).is_some());
    }

    #[test]
    fn test_single_save_in_flight() {
        let mut state = dirty_state();
        let pending = state.begin_save(false).unwrap();
        assert!(state.is_saving);
        assert!(state.begin_save(true).is_none());

        state.finish_save(pending.revision, Ok(()));
        assert!(!state.is_saving);
        assert!(!state.is_dirty);
        assert!(state.last_saved_at.is_some());
    }

    #[test]
    fn test_edit_during_save_keeps_dirty() {
        let mut state = dirty_state();
        let pending = state.begin_save(false).unwrap();
        state.answers.set("title", FieldValue::from("ERP"));
        state.record_edit();

        state.finish_save(pending.revision, Ok(()));
        assert!(state.is_dirty);
        assert_eq!(pending.data.get("title"), Some(&FieldValue::from("CRM")));
    }

    #[test]
    fn test_failed_save_keeps_dirty() {
        let mut state = dirty_state();
        let pending = state.begin_save(false).unwrap();
        state.finish_save(pending.revision, Err("offline".to_string()));

        assert!(state.is_dirty);
        assert!(!state.is_saving);
        assert_eq!(state.status().last_save_error.as_deref(), Some("offline"));
        assert!(state.begin_save(false).is_some());
    }

    #[test]
    fn test_finished_session_does_not_save() {
        let mut state = dirty_state();
        state.phase = SessionPhase::Submitted;
        assert!(state.begin_save(true).is_none());
        assert!(!state.phase.accepts_edits());
    }
}
