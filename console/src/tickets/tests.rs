#![allow(clippy::unwrap_used)] // Test code

use std::sync::Arc;

use chrono::{Duration, Utc};
use supportdesk_core::Clock;
use supportdesk_testing::{ReducerTest, SequentialIds, assertions, test_clock};

use crate::environment::ConsoleEnv;
use crate::service::InMemoryTicketService;
use crate::tickets::{AppliedChange, TicketAction, TicketsReducer, TicketsState};
use crate::types::{
    Message, MessageId, Ticket, TicketDraft, TicketId, TicketPage, TicketPatch, TicketPriority,
    TicketQuery, TicketStatus, User, UserId, UserRole,
};

fn agent() -> User {
    User {
        id: UserId::from_uuid(uuid::Uuid::from_u64_pair(1, 1)),
        name: "Agent Pat".to_string(),
        email: "pat@example.com".to_string(),
        role: UserRole::Agent,
        avatar_url: None,
    }
}

fn test_env() -> ConsoleEnv {
    let clock = Arc::new(test_clock());
    ConsoleEnv::new(
        clock.clone(),
        Arc::new(SequentialIds::new()),
        Arc::new(InMemoryTicketService::new(Vec::new(), clock)),
        agent(),
    )
}

fn ticket(title: &str) -> Ticket {
    let now = test_clock().now();
    Ticket {
        id: TicketId::new(),
        title: title.to_string(),
        description: String::new(),
        status: TicketStatus::Open,
        priority: TicketPriority::Medium,
        created_at: now,
        updated_at: now,
        created_by: agent(),
        assigned_to: None,
        tags: Vec::new(),
        messages: Vec::new(),
    }
}

fn message(content: &str) -> Message {
    Message {
        id: MessageId::new(),
        content: content.to_string(),
        created_at: test_clock().now(),
        sender: agent(),
        attachments: Vec::new(),
    }
}

fn state_with(tickets: Vec<Ticket>) -> TicketsState {
    let mut state = TicketsState::default();
    state.total = tickets.len();
    state.tickets = tickets;
    state.page = 1;
    state.total_pages = 1;
    state
}

#[test]
fn load_page_sets_loading_and_fetches() {
    ReducerTest::new(TicketsReducer)
        .with_env(test_env())
        .given_state(TicketsState::default())
        .when_action(TicketAction::LoadPage {
            query: TicketQuery::default(),
        })
        .then_state(|s| {
            assert!(s.loading);
            assert!(s.last_error.is_none());
        })
        .then_effects(assertions::assert_has_future_effect)
        .run();
}

#[test]
fn page_loaded_replaces_collection_and_totals() {
    let page = TicketPage {
        items: vec![ticket("a"), ticket("b")],
        total: 12,
        page: 2,
        page_size: 2,
        total_pages: 6,
    };
    ReducerTest::new(TicketsReducer)
        .with_env(test_env())
        .given_state(state_with(vec![ticket("old")]))
        .when_action(TicketAction::PageLoaded { page })
        .then_state(|s| {
            assert_eq!(s.tickets.len(), 2);
            assert_eq!(s.total, 12);
            assert_eq!(s.page, 2);
            assert_eq!(s.total_pages, 6);
            assert!(!s.loading);
        })
        .then_effects(assertions::assert_no_effects)
        .run();
}

#[test]
fn page_loaded_leaves_selection_alone() {
    let selected = ticket("detail");
    let mut initial = state_with(vec![selected.clone()]);
    initial.selected = Some(selected.clone());

    let page = TicketPage {
        items: vec![ticket("other")],
        total: 1,
        page: 1,
        page_size: 10,
        total_pages: 1,
    };
    ReducerTest::new(TicketsReducer)
        .with_env(test_env())
        .given_state(initial)
        .when_action(TicketAction::PageLoaded { page })
        .then_state(move |s| {
            assert!(s.is_selected(selected.id));
        })
        .run();
}

#[test]
fn selected_resolution_fills_detail_when_pending() {
    let t = ticket("detail");
    let id = t.id;
    ReducerTest::new(TicketsReducer)
        .with_env(test_env())
        .given_state(state_with(vec![t.clone()]))
        .when_action(TicketAction::Select { id })
        .when_action(TicketAction::Selected { ticket: t })
        .then_state(move |s| {
            assert!(s.is_selected(id));
            assert!(s.pending_selection.is_none());
            assert!(!s.loading);
        })
        .run();
}

#[test]
fn stale_selected_resolution_does_not_steal_selection() {
    let first = ticket("first");
    let second = ticket("second");
    let first_id = first.id;
    let second_id = second.id;

    ReducerTest::new(TicketsReducer)
        .with_env(test_env())
        .given_state(state_with(vec![first.clone(), second.clone()]))
        .when_action(TicketAction::Select { id: first_id })
        .when_action(TicketAction::Select { id: second_id })
        .when_action(TicketAction::Selected { ticket: first })
        .when_action(TicketAction::Selected { ticket: second })
        .then_state(move |s| {
            assert!(s.is_selected(second_id));
            assert!(s.pending_selection.is_none());
        })
        .run();
}

#[test]
fn select_failed_clears_pending_and_records_error() {
    let id = TicketId::new();
    ReducerTest::new(TicketsReducer)
        .with_env(test_env())
        .given_state(TicketsState::default())
        .when_action(TicketAction::Select { id })
        .when_action(TicketAction::SelectFailed {
            id,
            error: "ticket not found".to_string(),
        })
        .then_state(|s| {
            assert!(s.pending_selection.is_none());
            assert!(!s.loading);
            assert_eq!(s.last_error.as_deref(), Some("ticket not found"));
        })
        .run();
}

#[test]
fn create_inserts_optimistic_copy_at_head() {
    ReducerTest::new(TicketsReducer)
        .with_env(test_env())
        .given_state(state_with(vec![ticket("existing")]))
        .when_action(TicketAction::Create {
            draft: TicketDraft {
                title: "New issue".to_string(),
                description: "details".to_string(),
                priority: TicketPriority::High,
                tags: vec!["new".to_string()],
            },
        })
        .then_state(|s| {
            assert_eq!(s.tickets.len(), 2);
            assert_eq!(s.tickets[0].title, "New issue");
            assert_eq!(s.tickets[0].status, TicketStatus::Open);
            assert_eq!(s.tickets[0].created_by.name, "Agent Pat");
            assert_eq!(s.total, 2);
        })
        .then_effects(assertions::assert_has_future_effect)
        .run();
}

#[test]
fn create_failed_rolls_back_optimistic_copy() {
    let t = ticket("optimistic");
    let local_id = t.id;
    ReducerTest::new(TicketsReducer)
        .with_env(test_env())
        .given_state(state_with(vec![t]))
        .when_action(TicketAction::CreateFailed {
            local_id,
            error: "rejected".to_string(),
        })
        .then_state(|s| {
            assert!(s.tickets.is_empty());
            assert_eq!(s.total, 0);
            assert_eq!(s.last_error.as_deref(), Some("rejected"));
        })
        .run();
}

#[test]
fn update_patches_both_projections() {
    let t = ticket("both");
    let id = t.id;
    let mut initial = state_with(vec![t.clone()]);
    initial.selected = Some(t);

    ReducerTest::new(TicketsReducer)
        .with_env(test_env())
        .given_state(initial)
        .when_action(TicketAction::Update {
            id,
            patch: TicketPatch {
                status: Some(TicketStatus::InProgress),
                ..TicketPatch::default()
            },
        })
        .then_state(|s| {
            assert_eq!(s.tickets[0].status, TicketStatus::InProgress);
            assert_eq!(
                s.selected.as_ref().unwrap().status,
                TicketStatus::InProgress
            );
        })
        .then_effects(assertions::assert_has_future_effect)
        .run();
}

#[test]
fn update_failed_keeps_optimistic_state() {
    let mut t = ticket("kept");
    t.status = TicketStatus::Resolved;
    let id = t.id;
    ReducerTest::new(TicketsReducer)
        .with_env(test_env())
        .given_state(state_with(vec![t]))
        .when_action(TicketAction::UpdateFailed {
            id,
            error: "backend down".to_string(),
        })
        .then_state(|s| {
            assert_eq!(s.tickets[0].status, TicketStatus::Resolved);
            assert_eq!(s.last_error.as_deref(), Some("backend down"));
        })
        .then_effects(assertions::assert_no_effects)
        .run();
}

#[test]
fn update_for_unloaded_ticket_is_skipped() {
    ReducerTest::new(TicketsReducer)
        .with_env(test_env())
        .given_state(TicketsState::default())
        .when_action(TicketAction::Update {
            id: TicketId::new(),
            patch: TicketPatch::default(),
        })
        .then_effects(assertions::assert_no_effects)
        .run();
}

#[test]
fn post_message_appends_optimistically() {
    let t = ticket("thread");
    let id = t.id;
    ReducerTest::new(TicketsReducer)
        .with_env(test_env())
        .given_state(state_with(vec![t]))
        .when_action(TicketAction::PostMessage {
            ticket_id: id,
            content: "on it".to_string(),
        })
        .then_state(|s| {
            assert_eq!(s.tickets[0].messages.len(), 1);
            assert_eq!(s.tickets[0].messages[0].content, "on it");
            assert_eq!(s.tickets[0].messages[0].sender.name, "Agent Pat");
        })
        .then_effects(assertions::assert_has_future_effect)
        .run();
}

#[test]
fn post_message_to_unloaded_ticket_emits_no_effect() {
    ReducerTest::new(TicketsReducer)
        .with_env(test_env())
        .given_state(TicketsState::default())
        .when_action(TicketAction::PostMessage {
            ticket_id: TicketId::new(),
            content: "lost".to_string(),
        })
        .then_effects(assertions::assert_no_effects)
        .run();
}

#[test]
fn message_posted_resolution_is_idempotent() {
    let t = ticket("thread");
    let id = t.id;
    let msg = message("hi");
    ReducerTest::new(TicketsReducer)
        .with_env(test_env())
        .given_state(state_with(vec![t]))
        .when_action(TicketAction::MessagePosted {
            ticket_id: id,
            message: msg.clone(),
        })
        .when_action(TicketAction::MessagePosted {
            ticket_id: id,
            message: msg,
        })
        .then_state(|s| assert_eq!(s.tickets[0].messages.len(), 1))
        .run();
}

#[test]
fn message_event_applies_to_both_projections() {
    let t = ticket("watched");
    let id = t.id;
    let mut initial = state_with(vec![t.clone()]);
    initial.selected = Some(t);

    ReducerTest::new(TicketsReducer)
        .with_env(test_env())
        .given_state(initial)
        .when_action(TicketAction::MessageReceived {
            ticket_id: id,
            message: message("incoming"),
        })
        .then_state(|s| {
            assert_eq!(s.tickets[0].messages.len(), 1);
            assert_eq!(s.selected.as_ref().unwrap().messages.len(), 1);
        })
        .run();
}

#[test]
fn duplicate_message_event_is_dropped() {
    let t = ticket("watched");
    let id = t.id;
    let msg = message("once");
    ReducerTest::new(TicketsReducer)
        .with_env(test_env())
        .given_state(state_with(vec![t]))
        .when_action(TicketAction::MessageReceived {
            ticket_id: id,
            message: msg.clone(),
        })
        .when_action(TicketAction::MessageReceived {
            ticket_id: id,
            message: msg,
        })
        .then_state(|s| {
            assert_eq!(s.tickets[0].messages.len(), 1);
            assert_eq!(s.dropped_events, 0);
        })
        .run();
}

#[test]
fn out_of_order_message_never_moves_updated_at_backwards() {
    let t = ticket("old thread");
    let id = t.id;
    let updated_at = t.updated_at;
    let mut late = message("delayed");
    late.created_at = updated_at - Duration::days(1);

    ReducerTest::new(TicketsReducer)
        .with_env(test_env())
        .given_state(state_with(vec![t]))
        .when_action(TicketAction::MessageReceived {
            ticket_id: id,
            message: late,
        })
        .then_state(move |s| {
            assert_eq!(s.tickets[0].messages.len(), 1);
            assert_eq!(s.tickets[0].updated_at, updated_at);
            assert!(s.tickets[0].updated_at >= s.tickets[0].created_at);
        })
        .run();
}

#[test]
fn status_event_stamps_upstream_time_when_present() {
    let t = ticket("stamped");
    let id = t.id;
    let occurred = test_clock().now() + Duration::hours(2);
    ReducerTest::new(TicketsReducer)
        .with_env(test_env())
        .given_state(state_with(vec![t]))
        .when_action(TicketAction::StatusChanged {
            ticket_id: id,
            status: TicketStatus::Resolved,
            occurred_at: Some(occurred),
        })
        .then_state(move |s| {
            assert_eq!(s.tickets[0].status, TicketStatus::Resolved);
            assert_eq!(s.tickets[0].updated_at, occurred);
        })
        .run();
}

#[test]
fn status_event_falls_back_to_local_clock() {
    let mut t = ticket("stamped");
    t.updated_at = Utc::now() - Duration::days(30);
    let id = t.id;
    ReducerTest::new(TicketsReducer)
        .with_env(test_env())
        .given_state(state_with(vec![t]))
        .when_action(TicketAction::StatusChanged {
            ticket_id: id,
            status: TicketStatus::Closed,
            occurred_at: None,
        })
        .then_state(|s| {
            assert_eq!(s.tickets[0].updated_at, test_clock().now());
        })
        .run();
}

#[test]
fn assignment_event_sets_and_clears_assignee() {
    let t = ticket("handed off");
    let id = t.id;
    ReducerTest::new(TicketsReducer)
        .with_env(test_env())
        .given_state(state_with(vec![t]))
        .when_action(TicketAction::Reassigned {
            ticket_id: id,
            assignee: Some(agent()),
            occurred_at: None,
        })
        .then_state(|s| {
            assert_eq!(s.tickets[0].assigned_to.as_ref().unwrap().name, "Agent Pat");
        })
        .run();

    let mut assigned = ticket("handed back");
    assigned.assigned_to = Some(agent());
    let id = assigned.id;
    ReducerTest::new(TicketsReducer)
        .with_env(test_env())
        .given_state(state_with(vec![assigned]))
        .when_action(TicketAction::Reassigned {
            ticket_id: id,
            assignee: None,
            occurred_at: None,
        })
        .then_state(|s| assert!(s.tickets[0].assigned_to.is_none()))
        .run();
}

#[test]
fn event_for_unloaded_ticket_increments_dropped_counter() {
    ReducerTest::new(TicketsReducer)
        .with_env(test_env())
        .given_state(TicketsState::default())
        .when_action(TicketAction::StatusChanged {
            ticket_id: TicketId::new(),
            status: TicketStatus::Open,
            occurred_at: None,
        })
        .then_state(|s| assert_eq!(s.dropped_events, 1))
        .run();
}

#[test]
fn accepted_event_records_applied_change() {
    let t = ticket("noticed");
    let id = t.id;
    let env = test_env();
    let mut state = state_with(vec![t]);

    let _ = supportdesk_core::Reducer::reduce(
        &TicketsReducer,
        &mut state,
        TicketAction::StatusChanged {
            ticket_id: id,
            status: TicketStatus::Resolved,
            occurred_at: None,
        },
        &env,
    );

    let applied = state.take_last_applied().unwrap();
    assert_eq!(applied.ticket_id, id);
    assert_eq!(applied.title, "noticed");
    assert_eq!(applied.change, AppliedChange::Status(TicketStatus::Resolved));
    assert!(state.take_last_applied().is_none());
}

#[test]
fn local_command_does_not_record_applied_change() {
    let t = ticket("quiet");
    let id = t.id;
    let env = test_env();
    let mut state = state_with(vec![t]);

    let _ = supportdesk_core::Reducer::reduce(
        &TicketsReducer,
        &mut state,
        TicketAction::PostMessage {
            ticket_id: id,
            content: "local".to_string(),
        },
        &env,
    );

    assert!(state.take_last_applied().is_none());
}
