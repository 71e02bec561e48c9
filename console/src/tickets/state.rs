//! Ticket state and the dual-write application helpers.

use chrono::{DateTime, Utc};

use crate::types::{Message, Ticket, TicketId, TicketPage, TicketStatus, User};

/// Outcome of applying a real-time event to the ticket state
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum EventOutcome {
    /// The event mutated the state; carries the target's title for display
    Applied {
        /// Title of the target ticket at application time
        title: String,
    },
    /// The event had already been applied; nothing changed
    Duplicate,
    /// No ticket with the event's target id is loaded; nothing changed
    UnknownTarget,
}

/// What kind of change an accepted event made
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AppliedChange {
    /// A message was appended
    Message,
    /// Status changed to this value
    Status(TicketStatus),
    /// Assignment changed to this assignee
    Assignment(Option<User>),
}

/// Record of the most recent accepted real-time event, consumed by the
/// notification layer after each reducer run
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AppliedEvent {
    /// The ticket the event mutated
    pub ticket_id: TicketId,
    /// Its title at application time
    pub title: String,
    /// What changed
    pub change: AppliedChange,
}

/// State of the ticket feature.
///
/// `tickets` is the loaded page of the collection and `selected` is the
/// detail projection; when both hold a copy of the same ticket, every
/// mutation lands on both before the reducer returns.
#[derive(Clone, Debug, Default)]
pub struct TicketsState {
    /// Currently loaded page of the ticket collection
    pub tickets: Vec<Ticket>,
    /// Detail projection, an independent copy of one ticket
    pub selected: Option<Ticket>,
    /// Selection fetch in flight; a resolution for any other id is stale
    pub pending_selection: Option<TicketId>,
    /// A command or fetch is in flight
    pub loading: bool,
    /// Most recent command failure, cleared when a new command starts
    pub last_error: Option<String>,
    /// Total matching tickets across all pages
    pub total: usize,
    /// 1-based page number of the loaded page
    pub page: usize,
    /// Total number of pages
    pub total_pages: usize,
    /// Count of real-time events dropped for targeting unloaded tickets
    pub dropped_events: u64,
    last_applied: Option<AppliedEvent>,
}

impl TicketsState {
    /// Looks up a ticket in the collection projection
    #[must_use]
    pub fn ticket(&self, id: TicketId) -> Option<&Ticket> {
        self.tickets.iter().find(|t| t.id == id)
    }

    /// Whether the selection detail currently shows this ticket
    #[must_use]
    pub fn is_selected(&self, id: TicketId) -> bool {
        self.selected.as_ref().is_some_and(|t| t.id == id)
    }

    /// Takes the record of the last accepted event, if any.
    ///
    /// Set only by real-time event application, never by local commands, so
    /// downstream consumers derive notifications from remote changes alone.
    pub fn take_last_applied(&mut self) -> Option<AppliedEvent> {
        self.last_applied.take()
    }

    pub(crate) fn record_applied(&mut self, applied: AppliedEvent) {
        self.last_applied = Some(applied);
    }

    /// Replaces the collection projection with a freshly loaded page.
    ///
    /// The selection detail is left alone; it refreshes through its own
    /// fetch, not through page loads.
    pub fn replace_all(&mut self, page: TicketPage) {
        self.tickets = page.items;
        self.total = page.total;
        self.page = page.page;
        self.total_pages = page.total_pages;
    }

    fn for_each_copy(&mut self, id: TicketId, mut apply: impl FnMut(&mut Ticket)) -> bool {
        let mut found = false;
        if let Some(ticket) = self.tickets.iter_mut().find(|t| t.id == id) {
            apply(ticket);
            found = true;
        }
        if let Some(selected) = self.selected.as_mut()
            && selected.id == id
        {
            apply(selected);
            found = true;
        }
        found
    }

    /// Appends a message to every loaded copy of the target ticket.
    ///
    /// Idempotent per copy: a copy that already holds the message id is left
    /// untouched, so redelivery and the select-then-event race are no-ops.
    /// Reports `Duplicate` only when no copy changed.
    pub fn apply_message(&mut self, ticket_id: TicketId, message: &Message) -> EventOutcome {
        let mut appended = false;
        let mut title = None;
        let found = self.for_each_copy(ticket_id, |ticket| {
            title.get_or_insert_with(|| ticket.title.clone());
            if !ticket.has_message(message.id) {
                ticket.messages.push(message.clone());
                // An out-of-order message must never move updated_at backwards
                ticket.updated_at = ticket.updated_at.max(message.created_at);
                appended = true;
            }
        });

        match (found, appended, title) {
            (true, true, Some(title)) => EventOutcome::Applied { title },
            (true, _, _) => EventOutcome::Duplicate,
            (false, _, _) => EventOutcome::UnknownTarget,
        }
    }

    /// Sets the status on every loaded copy of the target ticket.
    ///
    /// `updated_at` takes the upstream change time when the event carries
    /// one, the local clock otherwise. Last processed wins.
    pub fn apply_status(
        &mut self,
        ticket_id: TicketId,
        status: TicketStatus,
        occurred_at: Option<DateTime<Utc>>,
        now: DateTime<Utc>,
    ) -> EventOutcome {
        let stamp = occurred_at.unwrap_or(now);
        let mut title = None;
        let found = self.for_each_copy(ticket_id, |ticket| {
            title.get_or_insert_with(|| ticket.title.clone());
            ticket.status = status;
            ticket.updated_at = stamp;
        });

        match title {
            Some(title) if found => EventOutcome::Applied { title },
            _ => EventOutcome::UnknownTarget,
        }
    }

    /// Sets the assignee on every loaded copy of the target ticket
    pub fn apply_assignment(
        &mut self,
        ticket_id: TicketId,
        assignee: Option<&User>,
        occurred_at: Option<DateTime<Utc>>,
        now: DateTime<Utc>,
    ) -> EventOutcome {
        let stamp = occurred_at.unwrap_or(now);
        let mut title = None;
        let found = self.for_each_copy(ticket_id, |ticket| {
            title.get_or_insert_with(|| ticket.title.clone());
            ticket.assigned_to = assignee.cloned();
            ticket.updated_at = stamp;
        });

        match title {
            Some(title) if found => EventOutcome::Applied { title },
            _ => EventOutcome::UnknownTarget,
        }
    }

    /// Merges an authoritative server copy into every loaded projection
    pub fn merge_authoritative(&mut self, server: &Ticket) {
        self.for_each_copy(server.id, |ticket| {
            ticket.merge_authoritative(server.clone());
        });
    }

    /// Applies an edit patch to every loaded copy, stamping `updated_at`
    pub fn apply_patch(
        &mut self,
        ticket_id: TicketId,
        patch: &crate::types::TicketPatch,
        now: DateTime<Utc>,
    ) -> bool {
        self.for_each_copy(ticket_id, |ticket| {
            ticket.apply_patch(patch);
            ticket.updated_at = now;
        })
    }

    /// Removes a ticket from the collection projection, for rolling back a
    /// rejected optimistic create. Returns whether anything was removed.
    pub fn remove(&mut self, ticket_id: TicketId) -> bool {
        let before = self.tickets.len();
        self.tickets.retain(|t| t.id != ticket_id);
        if self.is_selected(ticket_id) {
            self.selected = None;
        }
        self.tickets.len() != before
    }
}
