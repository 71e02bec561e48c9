//! The ticket reducer.

use supportdesk_core::{Effect, Effects, Reducer, smallvec};
use tracing::{debug, warn};

use crate::environment::ConsoleEnv;
use crate::tickets::actions::TicketAction;
use crate::tickets::state::{AppliedChange, AppliedEvent, EventOutcome, TicketsState};
use crate::types::{Message, Ticket, TicketDraft, TicketId};

/// Applies [`TicketAction`]s to [`TicketsState`].
///
/// Commands mutate optimistically and return one service-call effect each.
/// Rejected creates roll back; rejected updates and posts keep the
/// optimistic state and surface the error. The next authoritative copy of
/// the ticket reconciles either way.
#[derive(Clone, Copy, Debug, Default)]
pub struct TicketsReducer;

impl TicketsReducer {
    fn build_ticket(draft: TicketDraft, env: &ConsoleEnv) -> Ticket {
        let now = env.clock().now();
        Ticket {
            id: TicketId::from_uuid(env.ids().next_id()),
            title: draft.title,
            description: draft.description,
            status: crate::types::TicketStatus::Open,
            priority: draft.priority,
            created_at: now,
            updated_at: now,
            created_by: env.current_user().clone(),
            assigned_to: None,
            tags: draft.tags,
            messages: Vec::new(),
        }
    }

    fn build_message(content: String, env: &ConsoleEnv) -> Message {
        Message {
            id: crate::types::MessageId::from_uuid(env.ids().next_id()),
            content,
            created_at: env.clock().now(),
            sender: env.current_user().clone(),
            attachments: Vec::new(),
        }
    }
}

impl Reducer for TicketsReducer {
    type State = TicketsState;
    type Action = TicketAction;
    type Environment = ConsoleEnv;

    #[allow(clippy::too_many_lines)]
    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        env: &Self::Environment,
    ) -> Effects<Self::Action> {
        match action {
            TicketAction::LoadPage { query } => {
                state.loading = true;
                state.last_error = None;
                let service = env.service();
                smallvec![Effect::Future(Box::pin(async move {
                    Some(match service.list_tickets(query).await {
                        Ok(page) => TicketAction::PageLoaded { page },
                        Err(e) => TicketAction::LoadFailed {
                            error: e.to_string(),
                        },
                    })
                }))]
            }
            TicketAction::PageLoaded { page } => {
                state.replace_all(page);
                state.loading = false;
                smallvec![]
            }
            TicketAction::LoadFailed { error } => {
                warn!(error, "page load failed");
                state.loading = false;
                state.last_error = Some(error);
                smallvec![]
            }

            TicketAction::Select { id } => {
                state.pending_selection = Some(id);
                state.loading = true;
                state.last_error = None;
                let service = env.service();
                smallvec![Effect::Future(Box::pin(async move {
                    Some(match service.get_ticket(id).await {
                        Ok(ticket) => TicketAction::Selected { ticket },
                        Err(e) => TicketAction::SelectFailed {
                            id,
                            error: e.to_string(),
                        },
                    })
                }))]
            }
            TicketAction::Selected { ticket } => {
                // A resolution for any id other than the pending one lost a
                // race with a newer Select. Its payload still refreshes the
                // collection copy, but it must not steal the selection.
                if state.pending_selection == Some(ticket.id) {
                    state.pending_selection = None;
                    state.loading = false;
                    state.merge_authoritative(&ticket);
                    state.selected = Some(ticket);
                } else {
                    debug!(ticket_id = %ticket.id, "stale selection resolution");
                    state.merge_authoritative(&ticket);
                }
                smallvec![]
            }
            TicketAction::SelectFailed { id, error } => {
                warn!(ticket_id = %id, error, "selection fetch failed");
                if state.pending_selection == Some(id) {
                    state.pending_selection = None;
                    state.loading = false;
                    state.last_error = Some(error);
                }
                smallvec![]
            }
            TicketAction::ClearSelection => {
                state.selected = None;
                state.pending_selection = None;
                smallvec![]
            }

            TicketAction::Create { draft } => {
                let ticket = Self::build_ticket(draft, env);
                let local_id = ticket.id;
                state.tickets.insert(0, ticket.clone());
                state.total += 1;
                state.loading = true;
                state.last_error = None;
                let service = env.service();
                smallvec![Effect::Future(Box::pin(async move {
                    Some(match service.create_ticket(ticket).await {
                        Ok(ticket) => TicketAction::CreateAccepted { local_id, ticket },
                        Err(e) => TicketAction::CreateFailed {
                            local_id,
                            error: e.to_string(),
                        },
                    })
                }))]
            }
            TicketAction::CreateAccepted { local_id, ticket } => {
                debug!(ticket_id = %local_id, "create accepted");
                state.loading = false;
                state.merge_authoritative(&ticket);
                smallvec![]
            }
            TicketAction::CreateFailed { local_id, error } => {
                warn!(ticket_id = %local_id, error, "create rejected, rolling back");
                if state.remove(local_id) {
                    state.total = state.total.saturating_sub(1);
                }
                state.loading = false;
                state.last_error = Some(error);
                smallvec![]
            }

            TicketAction::Update { id, patch } => {
                let now = env.clock().now();
                if !state.apply_patch(id, &patch, now) {
                    warn!(ticket_id = %id, "update target not loaded, skipping");
                    return smallvec![];
                }
                state.last_error = None;
                let service = env.service();
                smallvec![Effect::Future(Box::pin(async move {
                    Some(match service.update_ticket(id, patch).await {
                        Ok(ticket) => TicketAction::UpdateAccepted { ticket },
                        Err(e) => TicketAction::UpdateFailed {
                            id,
                            error: e.to_string(),
                        },
                    })
                }))]
            }
            TicketAction::UpdateAccepted { ticket } => {
                state.merge_authoritative(&ticket);
                smallvec![]
            }
            TicketAction::UpdateFailed { id, error } => {
                // Optimistic state stands; the next authoritative copy of
                // this ticket reconciles it.
                warn!(ticket_id = %id, error, "update rejected, keeping optimistic state");
                state.last_error = Some(error);
                smallvec![]
            }

            TicketAction::PostMessage { ticket_id, content } => {
                let message = Self::build_message(content, env);
                match state.apply_message(ticket_id, &message) {
                    EventOutcome::UnknownTarget => {
                        warn!(ticket_id = %ticket_id, "post target not loaded, skipping");
                        smallvec![]
                    }
                    EventOutcome::Applied { .. } | EventOutcome::Duplicate => {
                        state.last_error = None;
                        let service = env.service();
                        smallvec![Effect::Future(Box::pin(async move {
                            Some(match service.post_message(ticket_id, message).await {
                                Ok(message) => TicketAction::MessagePosted { ticket_id, message },
                                Err(e) => TicketAction::PostFailed {
                                    ticket_id,
                                    error: e.to_string(),
                                },
                            })
                        }))]
                    }
                }
            }
            TicketAction::MessagePosted { ticket_id, message } => {
                // Usually a duplicate of the optimistic append; the
                // idempotent apply makes redelivery harmless.
                state.apply_message(ticket_id, &message);
                smallvec![]
            }
            TicketAction::PostFailed { ticket_id, error } => {
                warn!(ticket_id = %ticket_id, error, "message post rejected");
                state.last_error = Some(error);
                smallvec![]
            }

            TicketAction::MessageReceived { ticket_id, message } => {
                match state.apply_message(ticket_id, &message) {
                    EventOutcome::Applied { title } => {
                        state.record_applied(AppliedEvent {
                            ticket_id,
                            title,
                            change: AppliedChange::Message,
                        });
                    }
                    EventOutcome::Duplicate => {
                        debug!(ticket_id = %ticket_id, message_id = %message.id, "duplicate message event");
                    }
                    EventOutcome::UnknownTarget => {
                        state.dropped_events += 1;
                        debug!(ticket_id = %ticket_id, "message event for unloaded ticket, dropping");
                    }
                }
                smallvec![]
            }
            TicketAction::StatusChanged {
                ticket_id,
                status,
                occurred_at,
            } => {
                let now = env.clock().now();
                match state.apply_status(ticket_id, status, occurred_at, now) {
                    EventOutcome::Applied { title } => {
                        state.record_applied(AppliedEvent {
                            ticket_id,
                            title,
                            change: AppliedChange::Status(status),
                        });
                    }
                    EventOutcome::Duplicate => {}
                    EventOutcome::UnknownTarget => {
                        state.dropped_events += 1;
                        debug!(ticket_id = %ticket_id, "status event for unloaded ticket, dropping");
                    }
                }
                smallvec![]
            }
            TicketAction::Reassigned {
                ticket_id,
                assignee,
                occurred_at,
            } => {
                let now = env.clock().now();
                match state.apply_assignment(ticket_id, assignee.as_ref(), occurred_at, now) {
                    EventOutcome::Applied { title } => {
                        state.record_applied(AppliedEvent {
                            ticket_id,
                            title,
                            change: AppliedChange::Assignment(assignee),
                        });
                    }
                    EventOutcome::Duplicate => {}
                    EventOutcome::UnknownTarget => {
                        state.dropped_events += 1;
                        debug!(ticket_id = %ticket_id, "assignment event for unloaded ticket, dropping");
                    }
                }
                smallvec![]
            }
        }
    }
}
