//! Pure query and projection functions over the ticket collection.
//!
//! Everything here is a read: filtering, sorting, pagination, and the
//! dashboard rollup. All sorts are stable, so equal keys keep collection
//! order and repeated queries over an unchanged collection return identical
//! pages.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::types::{
    SortField, SortOrder, Ticket, TicketPage, TicketPriority, TicketQuery, TicketStatus,
};

/// Whether a ticket matches every filter present in the query.
///
/// Absent filters match everything; filters combine with AND.
#[must_use]
pub fn matches(ticket: &Ticket, query: &TicketQuery) -> bool {
    if let Some(status) = query.status
        && ticket.status != status
    {
        return false;
    }
    if let Some(priority) = query.priority
        && ticket.priority != priority
    {
        return false;
    }
    if let Some(assignee) = query.assignee
        && ticket.assigned_to.as_ref().map(|u| u.id) != Some(assignee)
    {
        return false;
    }
    if let Some(tag) = &query.tag
        && !ticket.has_tag(tag)
    {
        return false;
    }
    if let Some(search) = &query.search {
        let needle = search.to_lowercase();
        let in_title = ticket.title.to_lowercase().contains(&needle);
        let in_description = ticket.description.to_lowercase().contains(&needle);
        if !in_title && !in_description {
            return false;
        }
    }
    true
}

fn compare(a: &Ticket, b: &Ticket, field: SortField) -> Ordering {
    match field {
        SortField::CreatedAt => a.created_at.cmp(&b.created_at),
        SortField::UpdatedAt => a.updated_at.cmp(&b.updated_at),
        SortField::Priority => a.priority.cmp(&b.priority),
        SortField::Status => a.status.cmp(&b.status),
        SortField::Title => a.title.cmp(&b.title),
    }
}

/// Filters, sorts, and paginates a ticket collection.
///
/// Pages are 1-based; a page beyond the end yields an empty item list with
/// the correct totals. A zero page size yields no items and zero pages.
#[must_use]
pub fn query_page(tickets: &[Ticket], query: &TicketQuery) -> TicketPage {
    let mut matched: Vec<&Ticket> = tickets.iter().filter(|t| matches(t, query)).collect();

    if let Some(field) = query.sort {
        matched.sort_by(|a, b| {
            let ord = compare(a, b, field);
            match query.order {
                SortOrder::Asc => ord,
                SortOrder::Desc => ord.reverse(),
            }
        });
    }

    let total = matched.len();
    let page = query.page.max(1);
    let (items, total_pages) = if query.page_size == 0 {
        (Vec::new(), 0)
    } else {
        let start = page.saturating_sub(1).saturating_mul(query.page_size);
        let items = matched
            .into_iter()
            .skip(start)
            .take(query.page_size)
            .cloned()
            .collect();
        (items, total.div_ceil(query.page_size))
    };

    TicketPage {
        items,
        total,
        page,
        page_size: query.page_size,
        total_pages,
    }
}

/// Ticket counts per status
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusCounts {
    /// Open tickets
    pub open: usize,
    /// Tickets being worked
    pub in_progress: usize,
    /// Resolved tickets
    pub resolved: usize,
    /// Closed tickets
    pub closed: usize,
}

/// Ticket counts per priority
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriorityCounts {
    /// Low priority tickets
    pub low: usize,
    /// Medium priority tickets
    pub medium: usize,
    /// High priority tickets
    pub high: usize,
    /// Critical tickets
    pub critical: usize,
}

/// Aggregate view for the dashboard
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DashboardStats {
    /// Total tickets in the collection
    pub total: usize,
    /// Counts per status
    pub by_status: StatusCounts,
    /// Counts per priority
    pub by_priority: PriorityCounts,
    /// Most recently updated tickets, newest first, at most five
    pub recent: Vec<Ticket>,
}

/// Computes the dashboard rollup over the full collection
#[must_use]
pub fn dashboard(tickets: &[Ticket]) -> DashboardStats {
    let mut by_status = StatusCounts::default();
    let mut by_priority = PriorityCounts::default();

    for t in tickets {
        match t.status {
            TicketStatus::Open => by_status.open += 1,
            TicketStatus::InProgress => by_status.in_progress += 1,
            TicketStatus::Resolved => by_status.resolved += 1,
            TicketStatus::Closed => by_status.closed += 1,
        }
        match t.priority {
            TicketPriority::Low => by_priority.low += 1,
            TicketPriority::Medium => by_priority.medium += 1,
            TicketPriority::High => by_priority.high += 1,
            TicketPriority::Critical => by_priority.critical += 1,
        }
    }

    let mut recent: Vec<&Ticket> = tickets.iter().collect();
    recent.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));

    DashboardStats {
        total: tickets.len(),
        by_status,
        by_priority,
        recent: recent.into_iter().take(5).cloned().collect(),
    }
}
