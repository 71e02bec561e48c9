//! Notification feature: state, actions, and reducer.
//!
//! Notifications are derived downstream of the ticket store; nothing here
//! talks to a backend. The unread counter is maintained incrementally and
//! always equals the number of unread entries in the list.

use supportdesk_core::{Effects, Reducer, smallvec};
use tracing::debug;

use crate::environment::ConsoleEnv;
use crate::types::{Notification, NotificationId, NotificationKind, TicketId};

/// State of the notification feature
#[derive(Clone, Debug, Default)]
pub struct NotificationsState {
    /// Notifications, newest first
    pub notifications: Vec<Notification>,
    /// Count of unread entries; always consistent with the list
    pub unread_count: usize,
}

impl NotificationsState {
    /// Looks up a notification by id
    #[must_use]
    pub fn notification(&self, id: NotificationId) -> Option<&Notification> {
        self.notifications.iter().find(|n| n.id == id)
    }
}

/// Every way the notification state can change
#[derive(Clone, Debug)]
pub enum NotificationAction {
    /// Record a new notification, unread, at the head of the list
    Record {
        /// Display text
        message: String,
        /// Severity/kind
        kind: NotificationKind,
        /// Ticket the notification points back to
        ticket_id: Option<TicketId>,
    },
    /// Mark one notification read
    MarkRead {
        /// Target notification
        id: NotificationId,
    },
    /// Mark every notification read
    MarkAllRead,
    /// Remove one notification
    Remove {
        /// Target notification
        id: NotificationId,
    },
    /// Remove every notification
    ClearAll,
}

/// Applies [`NotificationAction`]s to [`NotificationsState`].
///
/// Every transition adjusts `unread_count` in the same reducer run that
/// changes the list, so the counter never drifts.
#[derive(Clone, Copy, Debug, Default)]
pub struct NotificationsReducer;

impl Reducer for NotificationsReducer {
    type State = NotificationsState;
    type Action = NotificationAction;
    type Environment = ConsoleEnv;

    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        env: &Self::Environment,
    ) -> Effects<Self::Action> {
        match action {
            NotificationAction::Record {
                message,
                kind,
                ticket_id,
            } => {
                let notification = Notification {
                    id: NotificationId::from_uuid(env.ids().next_id()),
                    message,
                    kind,
                    read: false,
                    timestamp: env.clock().now(),
                    ticket_id,
                };
                debug!(id = %notification.id, "recording notification");
                state.notifications.insert(0, notification);
                state.unread_count += 1;
            }
            NotificationAction::MarkRead { id } => {
                // Counter moves only on the unread-to-read edge, so marking
                // twice is harmless.
                if let Some(n) = state.notifications.iter_mut().find(|n| n.id == id)
                    && !n.read
                {
                    n.read = true;
                    state.unread_count = state.unread_count.saturating_sub(1);
                }
            }
            NotificationAction::MarkAllRead => {
                for n in &mut state.notifications {
                    n.read = true;
                }
                state.unread_count = 0;
            }
            NotificationAction::Remove { id } => {
                if let Some(pos) = state.notifications.iter().position(|n| n.id == id) {
                    let removed = state.notifications.remove(pos);
                    if !removed.read {
                        state.unread_count = state.unread_count.saturating_sub(1);
                    }
                }
            }
            NotificationAction::ClearAll => {
                state.notifications.clear();
                state.unread_count = 0;
            }
        }
        smallvec![]
    }
}
