// Event types and payload structures for form session updates
// Hosts subscribe through an EventBroadcaster or their own FormObserver

use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

// Event name constants
pub const EVENT_SECTION_CHANGED: &str = "form:section_changed";
pub const EVENT_FIELD_CHANGED: &str = "form:field_changed";

// Auto-save / manual save events
pub const EVENT_AUTOSAVE_STARTED: &str = "form:autosave_started";
pub const EVENT_AUTOSAVE_COMPLETED: &str = "form:autosave_completed";
pub const EVENT_AUTOSAVE_FAILED: &str = "form:autosave_failed";

// Submission events
pub const EVENT_SUBMIT_STARTED: &str = "form:submit_started";
pub const EVENT_SUBMITTED: &str = "form:submitted";
pub const EVENT_SUBMIT_FAILED: &str = "form:submit_failed";

// Wizard events
pub const EVENT_WIZARD_STEP_CHANGED: &str = "wizard:step_changed";

/// An event as delivered to observers
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FormEvent {
    pub event: String,
    pub payload: serde_json::Value,
}

impl FormEvent {
    pub fn new(event_type: &str, payload: impl Serialize) -> Self {
        Self {
            event: event_type.to_string(),
            payload: serde_json::to_value(payload).unwrap_or(serde_json::Value::Null),
        }
    }
}

/// Payload for section change events
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SectionChangedPayload {
    pub session_id: String,
    pub from_index: usize,
    pub to_index: usize,
    pub section_id: String,
}

/// Payload for field change events (user edits and applied suggestions alike)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldChangedPayload {
    pub session_id: String,
    /// `fieldId` or `stepKey.fieldId`
    pub path: String,
    pub value: serde_json::Value,
    pub revision: u64,
}

/// Payload for save lifecycle events
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavePayload {
    pub session_id: String,
    pub revision: u64,
    /// True when triggered by the timer, false for "Save Progress"
    pub automatic: bool,
    pub saved_at: Option<String>,
    pub error: Option<String>,
}

/// Payload for submission events
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitPayload {
    pub session_id: String,
    pub field_count: usize,
    pub error: Option<String>,
    pub timestamp: String,
}

/// Payload for wizard step change events
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WizardStepChangedPayload {
    pub session_id: String,
    pub from_step: String,
    pub to_step: String,
    pub can_go_previous: bool,
    pub can_go_next: bool,
}

/// Receiver of session events
pub trait FormObserver: Send + Sync {
    fn on_event(&self, event: &FormEvent);
}

/// Observer that drops every event
pub struct NoopObserver;

impl FormObserver for NoopObserver {
    fn on_event(&self, _event: &FormEvent) {}
}

/// Fans events out to any number of subscribers
#[derive(Clone)]
pub struct EventBroadcaster {
    tx: broadcast::Sender<FormEvent>,
}

impl EventBroadcaster {
    /// Create a new event broadcaster with a channel capacity of 256 events
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(256);
        Self { tx }
    }

    /// Broadcast an event to all subscribers
    pub fn broadcast(&self, event_type: &str, payload: impl Serialize) {
        // Ignore send errors (no receivers)
        let _ = self.tx.send(FormEvent::new(event_type, payload));
    }

    /// Subscribe to events (returns a receiver)
    pub fn subscribe(&self) -> broadcast::Receiver<FormEvent> {
        self.tx.subscribe()
    }
}

impl Default for EventBroadcaster {
    fn default() -> Self {
        Self::new()
    }
}

impl FormObserver for EventBroadcaster {
    fn on_event(&self, event: &FormEvent) {
        let _ = self.tx.send(event.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_payload_serializes_camel_case() {
        let event = FormEvent::new(
            EVENT_SECTION_CHANGED,
            SectionChangedPayload {
                session_id: "s1".to_string(),
                from_index: 0,
                to_index: 2,
                section_id: "budget".to_string(),
            },
        );
        assert_eq!(event.event, "form:section_changed");
        assert_eq!(event.payload["toIndex"], 2);
        assert_eq!(event.payload["sectionId"], "budget");
    }

    #[test]
    fn test_broadcaster_delivers_to_subscribers() {
        let broadcaster = EventBroadcaster::new();
        let mut rx = broadcaster.subscribe();

        broadcaster.broadcast(EVENT_SUBMITTED, serde_json::json!({ "ok": true }));

        let event = rx.try_recv().unwrap();
        assert_eq!(event.event, EVENT_SUBMITTED);
        assert_eq!(event.payload["ok"], true);
    }

    #[test]
    fn test_broadcast_without_subscribers_is_ignored() {
        let broadcaster = EventBroadcaster::new();
        broadcaster.on_event(&FormEvent::new(EVENT_FIELD_CHANGED, ()));
    }
}
