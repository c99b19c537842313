//! Session-owned auto-save timer
//!
//! Armed once when a session starts and never reset by edits. Each tick
//! saves the current answers if they changed since the last successful save.

use super::engine::SessionShared;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};

pub struct AutoSaveTimer {
    handle: JoinHandle<()>,
    shutdown_tx: Option<mpsc::Sender<()>>,
}

impl AutoSaveTimer {
    /// Spawn the tick loop on the current tokio runtime. Returns `None`
    /// outside a runtime; manual saves still work in that case.
    pub(crate) fn start(shared: Arc<SessionShared>, period: Duration) -> Option<Self> {
        let runtime = match tokio::runtime::Handle::try_current() {
            Ok(handle) => handle,
            Err(_) => {
                log::warn!(
                    "[AutoSave] No async runtime, auto-save disabled for session {}",
                    shared.id
                );
                return None;
            }
        };

        let (shutdown_tx, mut shutdown_rx) = mpsc::channel::<()>(1);
        let handle = runtime.spawn(async move {
            let mut ticker = interval_at(Instant::now() + period, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                tokio::select! {
                    _ = ticker.tick() => {
                        if shared.is_finished() {
                            log::debug!("[AutoSave] Session {} finished, stopping timer", shared.id);
                            break;
                        }
                        // Failures are logged and retried on the next tick
                        let _ = shared.save(true).await;
                    }
                    _ = shutdown_rx.recv() => {
                        log::debug!("[AutoSave] Timer for session {} shutting down", shared.id);
                        break;
                    }
                }
            }
        });

        log::debug!("[AutoSave] Armed with a {:?} interval", period);
        Some(Self {
            handle,
            shutdown_tx: Some(shutdown_tx),
        })
    }

    /// Stop ticking. A save already running completes first.
    pub fn stop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.try_send(());
        }
    }

    pub fn is_running(&self) -> bool {
        self.shutdown_tx.is_some() && !self.handle.is_finished()
    }
}

impl Drop for AutoSaveTimer {
    fn drop(&mut self) {
        self.stop();
    }
}
