//! Backend boundary for ticket commands and listings.
//!
//! The store never talks to a backend directly; commands produce effects that
//! call through a [`TicketService`]. The in-memory implementation backs the
//! demo binary and the integration tests.

use std::sync::Arc;

use async_trait::async_trait;
use supportdesk_core::Clock;
use thiserror::Error;
use tokio::sync::RwLock;

use crate::queries;
use crate::types::{Message, Ticket, TicketId, TicketPage, TicketPatch, TicketQuery};

/// Errors from backend ticket operations
#[derive(Debug, Error)]
pub enum ServiceError {
    /// No ticket with this id exists
    #[error("ticket not found: {0}")]
    NotFound(TicketId),

    /// The backend rejected or failed the request
    #[error("request failed: {0}")]
    RequestFailed(String),
}

/// Backend operations the command layer depends on.
///
/// Implementations must be safe to call concurrently; every command effect
/// holds its own `Arc` clone.
#[async_trait]
pub trait TicketService: Send + Sync {
    /// Lists tickets matching a query, paginated
    async fn list_tickets(&self, query: TicketQuery) -> Result<TicketPage, ServiceError>;

    /// Fetches a single ticket by id
    async fn get_ticket(&self, id: TicketId) -> Result<Ticket, ServiceError>;

    /// Persists a locally-built ticket, returning the accepted copy
    async fn create_ticket(&self, ticket: Ticket) -> Result<Ticket, ServiceError>;

    /// Applies a patch to a ticket, returning the updated copy
    async fn update_ticket(
        &self,
        id: TicketId,
        patch: TicketPatch,
    ) -> Result<Ticket, ServiceError>;

    /// Appends a message to a ticket thread, returning the accepted message
    async fn post_message(
        &self,
        ticket_id: TicketId,
        message: Message,
    ) -> Result<Message, ServiceError>;
}

/// In-memory [`TicketService`] over a shared ticket table.
///
/// Honors client-assigned ids, so optimistic local copies and accepted server
/// copies agree on identity.
pub struct InMemoryTicketService {
    tickets: RwLock<Vec<Ticket>>,
    clock: Arc<dyn Clock>,
}

impl InMemoryTicketService {
    /// Creates a service seeded with an initial ticket table
    #[must_use]
    pub fn new(seed: Vec<Ticket>, clock: Arc<dyn Clock>) -> Self {
        Self {
            tickets: RwLock::new(seed),
            clock,
        }
    }

    /// Snapshot of the full ticket table, for test assertions
    pub async fn snapshot(&self) -> Vec<Ticket> {
        self.tickets.read().await.clone()
    }
}

#[async_trait]
impl TicketService for InMemoryTicketService {
    async fn list_tickets(&self, query: TicketQuery) -> Result<TicketPage, ServiceError> {
        let tickets = self.tickets.read().await;
        Ok(queries::query_page(&tickets, &query))
    }

    async fn get_ticket(&self, id: TicketId) -> Result<Ticket, ServiceError> {
        let tickets = self.tickets.read().await;
        tickets
            .iter()
            .find(|t| t.id == id)
            .cloned()
            .ok_or(ServiceError::NotFound(id))
    }

    async fn create_ticket(&self, ticket: Ticket) -> Result<Ticket, ServiceError> {
        let mut tickets = self.tickets.write().await;
        if tickets.iter().any(|t| t.id == ticket.id) {
            return Err(ServiceError::RequestFailed(format!(
                "duplicate ticket id: {}",
                ticket.id
            )));
        }
        tickets.insert(0, ticket.clone());
        Ok(ticket)
    }

    async fn update_ticket(
        &self,
        id: TicketId,
        patch: TicketPatch,
    ) -> Result<Ticket, ServiceError> {
        let mut tickets = self.tickets.write().await;
        let ticket = tickets
            .iter_mut()
            .find(|t| t.id == id)
            .ok_or(ServiceError::NotFound(id))?;
        ticket.apply_patch(&patch);
        ticket.updated_at = self.clock.now();
        Ok(ticket.clone())
    }

    async fn post_message(
        &self,
        ticket_id: TicketId,
        message: Message,
    ) -> Result<Message, ServiceError> {
        let mut tickets = self.tickets.write().await;
        let ticket = tickets
            .iter_mut()
            .find(|t| t.id == ticket_id)
            .ok_or(ServiceError::NotFound(ticket_id))?;
        if !ticket.has_message(message.id) {
            ticket.messages.push(message.clone());
            ticket.updated_at = ticket.updated_at.max(message.created_at);
        }
        Ok(message)
    }
}

/// A service that fails every call, for exercising failure resolutions
pub struct FailingTicketService {
    reason: String,
}

impl FailingTicketService {
    /// Creates a service that fails with the given reason
    #[must_use]
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }

    fn err(&self) -> ServiceError {
        ServiceError::RequestFailed(self.reason.clone())
    }
}

#[async_trait]
impl TicketService for FailingTicketService {
    async fn list_tickets(&self, _query: TicketQuery) -> Result<TicketPage, ServiceError> {
        Err(self.err())
    }

    async fn get_ticket(&self, _id: TicketId) -> Result<Ticket, ServiceError> {
        Err(self.err())
    }

    async fn create_ticket(&self, _ticket: Ticket) -> Result<Ticket, ServiceError> {
        Err(self.err())
    }

    async fn update_ticket(
        &self,
        _id: TicketId,
        _patch: TicketPatch,
    ) -> Result<Ticket, ServiceError> {
        Err(self.err())
    }

    async fn post_message(
        &self,
        _ticket_id: TicketId,
        _message: Message,
    ) -> Result<Message, ServiceError> {
        Err(self.err())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)] // Test code
mod tests {
    use super::*;
    use crate::types::{TicketPriority, TicketStatus, User, UserId, UserRole};
    use chrono::Utc;

    fn ticket(title: &str) -> Ticket {
        let now = Utc::now();
        Ticket {
            id: TicketId::new(),
            title: title.to_string(),
            description: String::new(),
            status: TicketStatus::Open,
            priority: TicketPriority::Medium,
            created_at: now,
            updated_at: now,
            created_by: User {
                id: UserId::new(),
                name: "Customer".to_string(),
                email: "c@example.com".to_string(),
                role: UserRole::Customer,
                avatar_url: None,
            },
            assigned_to: None,
            tags: Vec::new(),
            messages: Vec::new(),
        }
    }

    fn service(seed: Vec<Ticket>) -> InMemoryTicketService {
        InMemoryTicketService::new(seed, Arc::new(supportdesk_core::SystemClock))
    }

    #[tokio::test]
    async fn create_honors_client_assigned_id() {
        let svc = service(Vec::new());
        let t = ticket("first");
        let accepted = svc.create_ticket(t.clone()).await.unwrap();
        assert_eq!(accepted.id, t.id);
        assert_eq!(svc.get_ticket(t.id).await.unwrap().title, "first");
    }

    #[tokio::test]
    async fn create_rejects_duplicate_id() {
        let svc = service(Vec::new());
        let t = ticket("first");
        svc.create_ticket(t.clone()).await.unwrap();
        let err = svc.create_ticket(t).await.unwrap_err();
        assert!(matches!(err, ServiceError::RequestFailed(_)));
    }

    #[tokio::test]
    async fn update_missing_ticket_is_not_found() {
        let svc = service(Vec::new());
        let err = svc
            .update_ticket(TicketId::new(), TicketPatch::default())
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::NotFound(_)));
    }

    #[tokio::test]
    async fn post_message_is_idempotent_per_id() {
        let svc = service(vec![ticket("thread")]);
        let id = svc.snapshot().await[0].id;
        let msg = Message {
            id: crate::types::MessageId::new(),
            content: "hi".to_string(),
            created_at: Utc::now(),
            sender: User {
                id: UserId::new(),
                name: "Agent".to_string(),
                email: "a@example.com".to_string(),
                role: UserRole::Agent,
                avatar_url: None,
            },
            attachments: Vec::new(),
        };
        svc.post_message(id, msg.clone()).await.unwrap();
        svc.post_message(id, msg).await.unwrap();
        assert_eq!(svc.snapshot().await[0].messages.len(), 1);
    }
}
