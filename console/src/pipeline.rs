//! Pump from the event source into the store.
//!
//! The pipeline owns a subscription to the [`EventSource`], translates each
//! event into a ticket action, and sends it through the store. Events for
//! one ticket are sent in arrival order from a single task, so the store
//! applies them in order; a later event overwrites an earlier one rather
//! than being rejected.

use std::sync::Arc;
use std::time::Duration;

use futures::StreamExt;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use crate::app::{AppAction, ConsoleStore};
use crate::event::EventSource;

const DEFAULT_RESUBSCRIBE_DELAY: Duration = Duration::from_secs(1);

/// Pumps ticket events from an [`EventSource`] into the store
pub struct EventPipeline {
    source: Arc<dyn EventSource>,
    store: ConsoleStore,
    resubscribe_delay: Duration,
}

/// Handle to a running pipeline task
pub struct PipelineHandle {
    task: JoinHandle<()>,
    shutdown: watch::Sender<bool>,
}

impl PipelineHandle {
    /// Signals the pipeline to stop and waits for its task to finish
    pub async fn shutdown(self) {
        let _ = self.shutdown.send(true);
        if let Err(e) = self.task.await {
            error!(error = %e, "pipeline task panicked");
        }
    }
}

impl EventPipeline {
    /// Creates a pipeline over a source and store
    #[must_use]
    pub fn new(source: Arc<dyn EventSource>, store: ConsoleStore) -> Self {
        Self {
            source,
            store,
            resubscribe_delay: DEFAULT_RESUBSCRIBE_DELAY,
        }
    }

    /// Sets the delay before resubscribing after the event stream ends
    #[must_use]
    pub const fn with_resubscribe_delay(mut self, delay: Duration) -> Self {
        self.resubscribe_delay = delay;
        self
    }

    /// Spawns the pump task.
    ///
    /// The task resubscribes after the stream ends and runs until shut down
    /// through the returned handle.
    #[must_use]
    pub fn spawn(self) -> PipelineHandle {
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let task = tokio::spawn(self.run(shutdown_rx));
        PipelineHandle {
            task,
            shutdown: shutdown_tx,
        }
    }

    async fn run(self, mut shutdown: watch::Receiver<bool>) {
        info!("event pipeline started");
        loop {
            let mut stream = self.source.subscribe();
            loop {
                tokio::select! {
                    changed = shutdown.changed() => {
                        if changed.is_err() || *shutdown.borrow() {
                            info!("event pipeline stopping");
                            return;
                        }
                    }
                    event = stream.next() => {
                        let Some(event) = event else { break };
                        let kind = event.kind();
                        let ticket_id = event.ticket_id();
                        debug!(kind, %ticket_id, "event received");
                        match self.store.send(AppAction::Tickets(event.into_action())).await {
                            Ok(mut handle) => handle.wait().await,
                            Err(e) => {
                                warn!(kind, %ticket_id, error = %e, "store rejected event");
                            }
                        }
                    }
                }
            }

            warn!(delay = ?self.resubscribe_delay, "event stream ended, resubscribing");
            tokio::select! {
                changed = shutdown.changed() => {
                    if changed.is_err() || *shutdown.borrow() {
                        info!("event pipeline stopping");
                        return;
                    }
                }
                () = tokio::time::sleep(self.resubscribe_delay) => {}
            }
        }
    }
}
