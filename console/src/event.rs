//! Real-time ticket events and their transport boundary.
//!
//! Events arrive from outside the process (a push feed in production, an
//! in-memory broadcast in tests and the demo) and are translated into store
//! actions by the pipeline. Events carry full payloads, never ids alone, so
//! the store can apply them without a follow-up fetch.

use async_stream::stream;
use chrono::{DateTime, Utc};
use futures::stream::{BoxStream, StreamExt};
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

use crate::tickets::TicketAction;
use crate::types::{Message, TicketId, TicketStatus, User};

/// A real-time event about a ticket, pushed from the backend
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TicketEvent {
    /// A message was appended to a ticket thread
    NewMessage {
        /// Target ticket
        ticket_id: TicketId,
        /// The appended message, full payload
        message: Message,
    },

    /// A ticket's status changed
    StatusUpdate {
        /// Target ticket
        ticket_id: TicketId,
        /// The new status
        status: TicketStatus,
        /// When the change happened upstream, if the feed carries it
        #[serde(default, skip_serializing_if = "Option::is_none")]
        occurred_at: Option<DateTime<Utc>>,
    },

    /// A ticket was assigned or unassigned
    Assignment {
        /// Target ticket
        ticket_id: TicketId,
        /// The new assignee, `None` for unassignment
        assignee: Option<User>,
        /// When the change happened upstream, if the feed carries it
        #[serde(default, skip_serializing_if = "Option::is_none")]
        occurred_at: Option<DateTime<Utc>>,
    },
}

impl TicketEvent {
    /// Short label for logging and metrics
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::NewMessage { .. } => "new_message",
            Self::StatusUpdate { .. } => "status_update",
            Self::Assignment { .. } => "assignment",
        }
    }

    /// The ticket this event targets
    #[must_use]
    pub const fn ticket_id(&self) -> TicketId {
        match self {
            Self::NewMessage { ticket_id, .. }
            | Self::StatusUpdate { ticket_id, .. }
            | Self::Assignment { ticket_id, .. } => *ticket_id,
        }
    }

    /// Translates the event into the store action that applies it
    #[must_use]
    pub fn into_action(self) -> TicketAction {
        match self {
            Self::NewMessage { ticket_id, message } => TicketAction::MessageReceived {
                ticket_id,
                message,
            },
            Self::StatusUpdate {
                ticket_id,
                status,
                occurred_at,
            } => TicketAction::StatusChanged {
                ticket_id,
                status,
                occurred_at,
            },
            Self::Assignment {
                ticket_id,
                assignee,
                occurred_at,
            } => TicketAction::Reassigned {
                ticket_id,
                assignee,
                occurred_at,
            },
        }
    }
}

/// Source of real-time ticket events.
///
/// Each call to [`subscribe`](EventSource::subscribe) opens an independent
/// stream starting at the current position of the feed. The stream ends when
/// the source shuts down; the pipeline handles resubscription.
pub trait EventSource: Send + Sync {
    /// Opens a new event stream
    fn subscribe(&self) -> BoxStream<'static, TicketEvent>;
}

/// In-process [`EventSource`] over a broadcast channel.
///
/// Backs the demo binary and the integration tests. Subscribers that fall
/// behind the channel capacity skip the overwritten events and keep going.
pub struct InMemoryEventSource {
    tx: broadcast::Sender<TicketEvent>,
}

impl InMemoryEventSource {
    /// Creates a source with the given channel capacity
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self { tx }
    }

    /// Publishes an event to all current subscribers.
    ///
    /// Returns the number of subscribers that will observe it; zero when
    /// nobody is listening, which is not an error.
    pub fn publish(&self, event: TicketEvent) -> usize {
        self.tx.send(event).unwrap_or(0)
    }
}

impl Default for InMemoryEventSource {
    fn default() -> Self {
        Self::new(256)
    }
}

impl EventSource for InMemoryEventSource {
    fn subscribe(&self) -> BoxStream<'static, TicketEvent> {
        let mut rx = self.tx.subscribe();
        stream! {
            loop {
                match rx.recv().await {
                    Ok(event) => yield event,
                    Err(broadcast::error::RecvError::Lagged(skipped)) => {
                        tracing::warn!(skipped, "event subscriber lagged, skipping");
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                }
            }
        }
        .boxed()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::panic)] // Test code
mod tests {
    use super::*;

    #[tokio::test]
    async fn subscriber_receives_published_events() {
        let source = InMemoryEventSource::new(8);
        let mut stream = source.subscribe();

        let event = TicketEvent::StatusUpdate {
            ticket_id: TicketId::new(),
            status: TicketStatus::Resolved,
            occurred_at: None,
        };
        assert_eq!(source.publish(event.clone()), 1);
        assert_eq!(stream.next().await.unwrap(), event);
    }

    #[tokio::test]
    async fn publish_without_subscribers_reaches_nobody() {
        let source = InMemoryEventSource::new(8);
        let event = TicketEvent::StatusUpdate {
            ticket_id: TicketId::new(),
            status: TicketStatus::Open,
            occurred_at: None,
        };
        assert_eq!(source.publish(event), 0);
    }

    #[test]
    fn event_translates_to_matching_action() {
        let id = TicketId::new();
        let event = TicketEvent::StatusUpdate {
            ticket_id: id,
            status: TicketStatus::Closed,
            occurred_at: None,
        };
        match event.into_action() {
            TicketAction::StatusChanged {
                ticket_id, status, ..
            } => {
                assert_eq!(ticket_id, id);
                assert_eq!(status, TicketStatus::Closed);
            }
            other => panic!("unexpected action: {other:?}"),
        }
    }

    #[test]
    fn events_tag_by_type_in_serde() {
        let event = TicketEvent::Assignment {
            ticket_id: TicketId::new(),
            assignee: None,
            occurred_at: None,
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "assignment");
    }
}
