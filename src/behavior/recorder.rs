use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use serde::Serialize;
use tokio::sync::mpsc::{self, error::TrySendError};
use tokio::task::JoinHandle;
use tracing::{debug, trace, warn};

use super::{BehaviorEvent, BehaviorType};
use crate::api::ApiClient;
use crate::config::BehaviorConfig;
use crate::storage::SessionManager;

/// Delivery counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct BehaviorStats {
    /// Accepted onto the queue.
    pub queued: u64,
    /// Delivered successfully.
    pub sent: u64,
    /// Delivery attempted and failed.
    pub failed: u64,
    /// Never queued (queue full, closed or disabled).
    pub dropped: u64,
}

#[derive(Debug, Default)]
struct Counters {
    queued: AtomicU64,
    sent: AtomicU64,
    failed: AtomicU64,
    dropped: AtomicU64,
}

impl Counters {
    fn snapshot(&self) -> BehaviorStats {
        BehaviorStats {
            queued: self.queued.load(Ordering::Relaxed),
            sent: self.sent.load(Ordering::Relaxed),
            failed: self.failed.load(Ordering::Relaxed),
            dropped: self.dropped.load(Ordering::Relaxed),
        }
    }
}

/// Fire-and-forget behavior logger backed by a bounded queue.
pub struct BehaviorRecorder {
    session: Arc<SessionManager>,
    sender: Mutex<Option<mpsc::Sender<BehaviorEvent>>>,
    worker: Mutex<Option<JoinHandle<()>>>,
    counters: Arc<Counters>,
}

impl BehaviorRecorder {
    /// Start the delivery worker. Must be called inside a Tokio runtime.
    ///
    /// When telemetry is disabled no worker is started and every event is
    /// counted as dropped.
    pub fn spawn(client: ApiClient, config: &BehaviorConfig) -> Self {
        let session = client.session().clone();
        let counters = Arc::new(Counters::default());

        if !config.enabled {
            debug!("Behavior telemetry disabled");
            return Self {
                session,
                sender: Mutex::new(None),
                worker: Mutex::new(None),
                counters,
            };
        }

        let (sender, receiver) = mpsc::channel(config.queue_capacity.max(1));
        let worker = tokio::spawn(run_worker(client, receiver, counters.clone()));

        Self {
            session,
            sender: Mutex::new(Some(sender)),
            worker: Mutex::new(Some(worker)),
            counters,
        }
    }

    /// Record a user action. Returns immediately and never fails.
    ///
    /// A no-op when the session is not logged in.
    pub fn record(&self, behavior_type: impl Into<BehaviorType>, details: serde_json::Value) {
        if !self.session.is_logged_in() {
            trace!("Not logged in; behavior not recorded");
            return;
        }

        let event = BehaviorEvent::new(behavior_type, details);
        let guard = self.sender.lock().unwrap_or_else(|e| e.into_inner());
        let Some(sender) = guard.as_ref() else {
            self.counters.dropped.fetch_add(1, Ordering::Relaxed);
            trace!(behavior_type = %event.behavior_type, "Behavior recorder inactive; event dropped");
            return;
        };

        match sender.try_send(event) {
            Ok(()) => {
                self.counters.queued.fetch_add(1, Ordering::Relaxed);
            }
            Err(TrySendError::Full(event)) => {
                self.counters.dropped.fetch_add(1, Ordering::Relaxed);
                warn!(
                    event_id = %event.id,
                    behavior_type = %event.behavior_type,
                    "Behavior queue full; event dropped"
                );
            }
            Err(TrySendError::Closed(event)) => {
                self.counters.dropped.fetch_add(1, Ordering::Relaxed);
                warn!(
                    event_id = %event.id,
                    behavior_type = %event.behavior_type,
                    "Behavior worker stopped; event dropped"
                );
            }
        }
    }

    /// Current delivery counters.
    pub fn stats(&self) -> BehaviorStats {
        self.counters.snapshot()
    }

    /// Close the queue and wait until already-queued events are delivered.
    ///
    /// Events recorded afterwards are dropped.
    pub async fn shutdown(&self) {
        let sender = self.sender.lock().unwrap_or_else(|e| e.into_inner()).take();
        drop(sender);

        let worker = self.worker.lock().unwrap_or_else(|e| e.into_inner()).take();
        if let Some(handle) = worker {
            if let Err(e) = handle.await {
                warn!(error = %e, "Behavior worker terminated abnormally");
            }
        }
    }
}

async fn run_worker(
    client: ApiClient,
    mut receiver: mpsc::Receiver<BehaviorEvent>,
    counters: Arc<Counters>,
) {
    while let Some(event) = receiver.recv().await {
        match client.post_behavior(&event).await {
            Ok(_) => {
                counters.sent.fetch_add(1, Ordering::Relaxed);
                debug!(
                    event_id = %event.id,
                    behavior_type = %event.behavior_type,
                    "Behavior recorded"
                );
            }
            Err(e) => {
                counters.failed.fetch_add(1, Ordering::Relaxed);
                warn!(
                    event_id = %event.id,
                    behavior_type = %event.behavior_type,
                    error = %e,
                    "Failed to record behavior; event dropped"
                );
            }
        }
    }

    debug!("Behavior worker stopped");
}
