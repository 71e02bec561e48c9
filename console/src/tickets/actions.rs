//! Actions the ticket reducer handles.

use chrono::{DateTime, Utc};

use crate::types::{
    Message, Ticket, TicketDraft, TicketId, TicketPage, TicketPatch, TicketQuery, TicketStatus,
    User,
};

/// Every way the ticket state can change.
///
/// Three groups: user commands, their asynchronous resolutions, and
/// real-time events translated by the pipeline. Commands apply optimistic
/// mutations and return effects; resolutions reconcile; events apply
/// directly.
#[derive(Clone, Debug)]
pub enum TicketAction {
    /// Load a page of the ticket collection
    LoadPage {
        /// Filter, sort, and pagination parameters
        query: TicketQuery,
    },
    /// A page load resolved successfully
    PageLoaded {
        /// The loaded page
        page: TicketPage,
    },
    /// A page load failed
    LoadFailed {
        /// Failure description
        error: String,
    },

    /// Fetch a ticket into the selection detail
    Select {
        /// Target ticket
        id: TicketId,
    },
    /// A selection fetch resolved successfully
    Selected {
        /// The fetched ticket
        ticket: Ticket,
    },
    /// A selection fetch failed
    SelectFailed {
        /// The ticket the fetch was for
        id: TicketId,
        /// Failure description
        error: String,
    },
    /// Drop the selection detail
    ClearSelection,

    /// Create a ticket optimistically
    Create {
        /// The draft to create from
        draft: TicketDraft,
    },
    /// The backend accepted a created ticket
    CreateAccepted {
        /// Id the optimistic copy was inserted under
        local_id: TicketId,
        /// Authoritative server copy
        ticket: Ticket,
    },
    /// The backend rejected a created ticket
    CreateFailed {
        /// Id of the optimistic copy to roll back
        local_id: TicketId,
        /// Failure description
        error: String,
    },

    /// Edit a ticket optimistically
    Update {
        /// Target ticket
        id: TicketId,
        /// Fields to change
        patch: TicketPatch,
    },
    /// The backend accepted a ticket edit
    UpdateAccepted {
        /// Authoritative server copy
        ticket: Ticket,
    },
    /// The backend rejected a ticket edit; the optimistic state stands
    UpdateFailed {
        /// Target ticket
        id: TicketId,
        /// Failure description
        error: String,
    },

    /// Post a message to a ticket thread optimistically
    PostMessage {
        /// Target ticket
        ticket_id: TicketId,
        /// Message body
        content: String,
    },
    /// The backend accepted a posted message
    MessagePosted {
        /// Target ticket
        ticket_id: TicketId,
        /// Accepted message
        message: Message,
    },
    /// The backend rejected a posted message
    PostFailed {
        /// Target ticket
        ticket_id: TicketId,
        /// Failure description
        error: String,
    },

    /// Real-time event: a message arrived on a ticket
    MessageReceived {
        /// Target ticket
        ticket_id: TicketId,
        /// The message, full payload
        message: Message,
    },
    /// Real-time event: a ticket's status changed
    StatusChanged {
        /// Target ticket
        ticket_id: TicketId,
        /// The new status
        status: TicketStatus,
        /// Upstream change time, if the feed carries it
        occurred_at: Option<DateTime<Utc>>,
    },
    /// Real-time event: a ticket was assigned or unassigned
    Reassigned {
        /// Target ticket
        ticket_id: TicketId,
        /// New assignee, `None` for unassignment
        assignee: Option<User>,
        /// Upstream change time, if the feed carries it
        occurred_at: Option<DateTime<Utc>>,
    },
}
