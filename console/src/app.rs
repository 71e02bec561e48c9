//! Application composition: the root state, action, and reducer.
//!
//! The app reducer owns the coupling between the two features: after every
//! ticket action it drains the record of the last accepted real-time event
//! and turns it into a notification, in the same reducer run and therefore
//! under the same state lock. Local command mutations leave no record, so
//! they never notify.

use supportdesk_core::{Effects, Reducer};
use supportdesk_runtime::Store;

use crate::environment::ConsoleEnv;
use crate::notifications::{NotificationAction, NotificationsReducer, NotificationsState};
use crate::tickets::{AppliedChange, AppliedEvent, TicketAction, TicketsReducer, TicketsState};
use crate::types::{NotificationKind, User};

/// Root application state
#[derive(Clone, Debug, Default)]
pub struct AppState {
    /// Ticket feature state
    pub tickets: TicketsState,
    /// Notification feature state
    pub notifications: NotificationsState,
}

/// Root application action
#[derive(Clone, Debug)]
pub enum AppAction {
    /// An action for the ticket feature
    Tickets(TicketAction),
    /// An action for the notification feature
    Notifications(NotificationAction),
}

impl From<TicketAction> for AppAction {
    fn from(action: TicketAction) -> Self {
        Self::Tickets(action)
    }
}

impl From<NotificationAction> for AppAction {
    fn from(action: NotificationAction) -> Self {
        Self::Notifications(action)
    }
}

/// Composes the feature reducers and derives notifications from accepted
/// real-time events
#[derive(Clone, Copy, Debug, Default)]
pub struct AppReducer {
    tickets: TicketsReducer,
    notifications: NotificationsReducer,
}

fn derive_record(applied: AppliedEvent, current_user: &User) -> NotificationAction {
    let AppliedEvent {
        ticket_id,
        title,
        change,
    } = applied;

    let (message, kind) = match change {
        AppliedChange::Message => (
            format!("New message on ticket: {title}"),
            NotificationKind::Info,
        ),
        AppliedChange::Status(status) => (
            format!("Status updated to {status} for ticket: {title}"),
            NotificationKind::Success,
        ),
        AppliedChange::Assignment(Some(assignee)) if assignee.id == current_user.id => (
            format!("Ticket assigned to you: {title}"),
            NotificationKind::Warning,
        ),
        AppliedChange::Assignment(Some(assignee)) => (
            format!("Ticket assigned to {}: {title}", assignee.name),
            NotificationKind::Info,
        ),
        AppliedChange::Assignment(None) => (
            format!("Ticket unassigned: {title}"),
            NotificationKind::Info,
        ),
    };

    NotificationAction::Record {
        message,
        kind,
        ticket_id: Some(ticket_id),
    }
}

impl Reducer for AppReducer {
    type State = AppState;
    type Action = AppAction;
    type Environment = ConsoleEnv;

    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        env: &Self::Environment,
    ) -> Effects<Self::Action> {
        match action {
            AppAction::Tickets(action) => {
                let mut effects: Effects<Self::Action> = self
                    .tickets
                    .reduce(&mut state.tickets, action, env)
                    .into_iter()
                    .map(|e| e.map(AppAction::Tickets))
                    .collect();

                if let Some(applied) = state.tickets.take_last_applied() {
                    let record = derive_record(applied, env.current_user());
                    let derived = self
                        .notifications
                        .reduce(&mut state.notifications, record, env);
                    effects.extend(derived.into_iter().map(|e| e.map(AppAction::Notifications)));
                }

                effects
            }
            AppAction::Notifications(action) => self
                .notifications
                .reduce(&mut state.notifications, action, env)
                .into_iter()
                .map(|e| e.map(AppAction::Notifications))
                .collect(),
        }
    }
}

/// The console's store type
pub type ConsoleStore = Store<AppState, AppAction, ConsoleEnv, AppReducer>;
