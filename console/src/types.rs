//! Domain types for the support console.
//!
//! Users are value types embedded by copy into tickets and messages; there is
//! no foreign-key indirection in this core. Timestamps are `DateTime<Utc>`
//! and serialize as ISO-8601. Status, priority, and role enums serialize in
//! the upstream SCREAMING_SNAKE_CASE vocabulary.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

macro_rules! id_type {
    ($(#[$doc:meta])* $name:ident) => {
        $(#[$doc])*
        #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub struct $name(Uuid);

        impl $name {
            /// Creates a new random id
            #[must_use]
            pub fn new() -> Self {
                Self(Uuid::new_v4())
            }

            /// Creates an id from a UUID
            #[must_use]
            pub const fn from_uuid(id: Uuid) -> Self {
                Self(id)
            }

            /// Returns the inner UUID
            #[must_use]
            pub const fn as_uuid(&self) -> &Uuid {
                &self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

id_type!(
    /// Unique identifier for a ticket
    TicketId
);
id_type!(
    /// Unique identifier for a message within a ticket thread
    MessageId
);
id_type!(
    /// Unique identifier for a user
    UserId
);
id_type!(
    /// Unique identifier for a notification
    NotificationId
);

/// Role of a user within the support system
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UserRole {
    /// End user filing tickets
    Customer,
    /// Support agent working tickets
    Agent,
    /// Administrator
    Admin,
}

/// A user, embedded by copy into tickets and messages
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Unique identifier
    pub id: UserId,
    /// Display name
    pub name: String,
    /// Email address
    pub email: String,
    /// Role within the support system
    pub role: UserRole,
    /// Optional avatar image URL
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
}

/// Lifecycle status of a ticket.
///
/// The ordering follows the lifecycle (open sorts before closed), which the
/// query surface uses for status-sorted views.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TicketStatus {
    /// Newly filed, not yet worked
    Open,
    /// An agent is working the ticket
    InProgress,
    /// Fixed, awaiting confirmation
    Resolved,
    /// Final state
    Closed,
}

impl std::fmt::Display for TicketStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Open => "OPEN",
            Self::InProgress => "IN_PROGRESS",
            Self::Resolved => "RESOLVED",
            Self::Closed => "CLOSED",
        };
        f.write_str(s)
    }
}

/// Priority of a ticket, ordered from least to most urgent
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TicketPriority {
    /// Can wait
    Low,
    /// Default priority
    Medium,
    /// Needs prompt attention
    High,
    /// Drop everything
    Critical,
}

impl std::fmt::Display for TicketPriority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Low => "LOW",
            Self::Medium => "MEDIUM",
            Self::High => "HIGH",
            Self::Critical => "CRITICAL",
        };
        f.write_str(s)
    }
}

/// A file attached to a message
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attachment {
    /// Unique identifier
    pub id: Uuid,
    /// Original file name
    pub file_name: String,
    /// Size in bytes
    pub file_size: u64,
    /// MIME type
    pub file_type: String,
    /// Download URL
    pub url: String,
}

/// A message within a ticket thread. Immutable once appended.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    /// Unique identifier
    pub id: MessageId,
    /// Message body
    pub content: String,
    /// When the message was created
    pub created_at: DateTime<Utc>,
    /// Who sent the message
    pub sender: User,
    /// Attached files
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub attachments: Vec<Attachment>,
}

/// A support ticket.
///
/// `messages` is append-only and ordered by arrival time: entries are never
/// reordered or deleted. `created_by` is immutable after creation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ticket {
    /// Stable identity, externally assigned or locally generated at creation
    pub id: TicketId,
    /// Short summary
    pub title: String,
    /// Full description
    pub description: String,
    /// Lifecycle status
    pub status: TicketStatus,
    /// Priority
    pub priority: TicketPriority,
    /// When the ticket was created
    pub created_at: DateTime<Utc>,
    /// Last mutation time; always `>= created_at`
    pub updated_at: DateTime<Utc>,
    /// Who filed the ticket
    pub created_by: User,
    /// Assigned agent, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assigned_to: Option<User>,
    /// Tags; order-insignificant for membership, display order preserved
    #[serde(default)]
    pub tags: Vec<String>,
    /// Conversation thread, append-only
    #[serde(default)]
    pub messages: Vec<Message>,
}

impl Ticket {
    /// Case-insensitive tag membership
    #[must_use]
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t.eq_ignore_ascii_case(tag))
    }

    /// Whether the thread already contains a message with this id
    #[must_use]
    pub fn has_message(&self, id: MessageId) -> bool {
        self.messages.iter().any(|m| m.id == id)
    }

    /// Apply an edit patch in place. Fields absent from the patch are left
    /// untouched; `updated_at` is the caller's responsibility.
    pub fn apply_patch(&mut self, patch: &TicketPatch) {
        if let Some(title) = &patch.title {
            self.title.clone_from(title);
        }
        if let Some(description) = &patch.description {
            self.description.clone_from(description);
        }
        if let Some(status) = patch.status {
            self.status = status;
        }
        if let Some(priority) = patch.priority {
            self.priority = priority;
        }
        if let Some(tags) = &patch.tags {
            self.tags.clone_from(tags);
        }
    }

    /// Merge an authoritative server copy over this local one.
    ///
    /// Scalar fields take the server's values. The thread stays grow-only: a
    /// message applied locally while the request was in flight is never
    /// dropped, and server messages unknown locally are appended in order.
    pub fn merge_authoritative(&mut self, server: Ticket) {
        let Ticket {
            id: _,
            title,
            description,
            status,
            priority,
            created_at,
            updated_at,
            created_by,
            assigned_to,
            tags,
            messages,
        } = server;

        self.title = title;
        self.description = description;
        self.status = status;
        self.priority = priority;
        self.created_at = created_at;
        self.updated_at = updated_at;
        self.created_by = created_by;
        self.assigned_to = assigned_to;
        self.tags = tags;

        for message in messages {
            if !self.has_message(message.id) {
                self.messages.push(message);
            }
        }
    }
}

/// Input for creating a ticket
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TicketDraft {
    /// Short summary
    pub title: String,
    /// Full description
    pub description: String,
    /// Priority
    pub priority: TicketPriority,
    /// Initial tags
    #[serde(default)]
    pub tags: Vec<String>,
}

/// Partial edit of a ticket's user-editable fields.
///
/// Assignment changes arrive as events, not edits, so the patch deliberately
/// has no `assigned_to` field.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TicketPatch {
    /// New title
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// New description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// New status
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<TicketStatus>,
    /// New priority
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<TicketPriority>,
    /// Replacement tag set
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
}

/// Severity/kind of a user-facing notification
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
    /// Positive outcome
    Success,
    /// Failure the user should see
    Error,
    /// Needs attention
    Warning,
    /// Informational
    Info,
}

/// A user-facing notification derived from an accepted store mutation
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    /// Unique identifier
    pub id: NotificationId,
    /// Display text
    pub message: String,
    /// Severity/kind
    pub kind: NotificationKind,
    /// Whether the user has read it; false at creation
    pub read: bool,
    /// When the notification was recorded
    pub timestamp: DateTime<Utc>,
    /// Back-reference to the ticket that triggered it (lookup, not ownership)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ticket_id: Option<TicketId>,
}

/// Field to sort a ticket listing by
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortField {
    /// Creation time
    CreatedAt,
    /// Last update time
    UpdatedAt,
    /// Priority order
    Priority,
    /// Status lifecycle order
    Status,
    /// Lexicographic title
    Title,
}

/// Sort direction
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    /// Ascending
    Asc,
    /// Descending
    #[default]
    Desc,
}

/// Filter, sort, and pagination parameters for a ticket listing
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TicketQuery {
    /// Status equality filter
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<TicketStatus>,
    /// Priority equality filter
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<TicketPriority>,
    /// Assignee identity filter
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assignee: Option<UserId>,
    /// Tag membership filter (case-insensitive)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tag: Option<String>,
    /// Case-insensitive substring search over title and description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
    /// 1-based page number
    pub page: usize,
    /// Page size
    pub page_size: usize,
    /// Sort field; unsorted (collection order) when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sort: Option<SortField>,
    /// Sort direction
    #[serde(default)]
    pub order: SortOrder,
}

impl Default for TicketQuery {
    fn default() -> Self {
        Self {
            status: None,
            priority: None,
            assignee: None,
            tag: None,
            search: None,
            page: 1,
            page_size: 10,
            sort: None,
            order: SortOrder::Desc,
        }
    }
}

/// One page of a filtered ticket listing
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TicketPage {
    /// Tickets on this page
    pub items: Vec<Ticket>,
    /// Total matching tickets across all pages
    pub total: usize,
    /// 1-based page number
    pub page: usize,
    /// Page size the listing was computed with
    pub page_size: usize,
    /// Total number of pages
    pub total_pages: usize,
}
