//! Collaborator seams for persisting and submitting answers

use crate::answers::FormData;
use crate::utils::lock_mutex_recover;
use anyhow::{anyhow, Result};
use async_trait::async_trait;
use std::sync::Mutex;

/// Receives periodic snapshots of the answer store. Saving the same
/// snapshot twice must be harmless.
#[async_trait]
pub trait AutoSaveSink: Send + Sync {
    async fn save(&self, data: &FormData) -> Result<()>;
}

/// Receives the complete answer store on submit
#[async_trait]
pub trait SubmissionSink: Send + Sync {
    async fn submit(&self, data: &FormData) -> Result<()>;
}

/// In-memory sink that records every snapshot it receives.
/// Useful for previews and for hosts that persist elsewhere.
#[derive(Default)]
pub struct MemorySink {
    saved: Mutex<Vec<FormData>>,
    fail_next: Mutex<usize>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make the next `count` calls fail
    pub fn fail_next(&self, count: usize) {
        *lock_mutex_recover(&self.fail_next) = count;
    }

    pub fn snapshots(&self) -> Vec<FormData> {
        lock_mutex_recover(&self.saved).clone()
    }

    pub fn last(&self) -> Option<FormData> {
        lock_mutex_recover(&self.saved).last().cloned()
    }

    pub fn count(&self) -> usize {
        lock_mutex_recover(&self.saved).len()
    }

    fn record(&self, data: &FormData) -> Result<()> {
        {
            let mut remaining = lock_mutex_recover(&self.fail_next);
            if *remaining > 0 {
                *remaining -= 1;
                return Err(anyhow!("sink unavailable"));
            }
        }
        lock_mutex_recover(&self.saved).push(data.clone());
        Ok(())
    }
}

#[async_trait]
impl AutoSaveSink for MemorySink {
    async fn save(&self, data: &FormData) -> Result<()> {
        self.record(data)
    }
}

#[async_trait]
impl SubmissionSink for MemorySink {
    async fn submit(&self, data: &FormData) -> Result<()> {
        self.record(data)
    }
}
