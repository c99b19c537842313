//! Form sessions
//!
//! A session owns the answer store for one user filling one form, the
//! navigation position, the auto-save timer and the collaborator seams
//! (auto-save sink, submission sink, smart-assist hook, event observer).

pub mod assist;
pub mod autosave;
mod engine;
pub mod form;
pub mod sinks;
pub mod state;

pub use assist::{ActiveContext, ContextScope, SmartAssistHook};
pub use autosave::AutoSaveTimer;
pub use self::engine::{SectionProgress, SessionOptions};
pub(crate) use self::engine::{PathMode, SessionCore};
pub use form::FormSession;
pub use sinks::{AutoSaveSink, MemorySink, SubmissionSink};
pub use state::{SaveStatus, SessionPhase, SessionState};
