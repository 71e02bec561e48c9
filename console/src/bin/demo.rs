//! Support Console Demo
//!
//! Scripted walk through the console's event pipeline:
//! - Loading a page of tickets and selecting one
//! - Optimistic create, edit, and message posting
//! - Real-time events flowing through the pipeline into the store
//! - Notifications derived from accepted events
//!
//! # Usage
//!
//! ```bash
//! cargo run --bin demo
//! ```

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use supportdesk_console::{
    AppAction, ConsoleEnv, ConsoleStore, EventPipeline, InMemoryEventSource,
    InMemoryTicketService, TicketEvent,
    app::{AppReducer, AppState},
    queries,
    tickets::TicketAction,
    types::{
        Message, MessageId, Ticket, TicketDraft, TicketId, TicketPriority, TicketQuery,
        TicketStatus, User, UserId, UserRole,
    },
};
use supportdesk_core::SystemClock;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const WAIT: Duration = Duration::from_secs(2);

fn user(name: &str, role: UserRole) -> User {
    User {
        id: UserId::new(),
        name: name.to_string(),
        email: format!("{}@example.com", name.to_lowercase().replace(' ', ".")),
        role,
        avatar_url: None,
    }
}

fn seed_ticket(title: &str, description: &str, priority: TicketPriority, by: &User) -> Ticket {
    let now = Utc::now();
    Ticket {
        id: TicketId::new(),
        title: title.to_string(),
        description: description.to_string(),
        status: TicketStatus::Open,
        priority,
        created_at: now,
        updated_at: now,
        created_by: by.clone(),
        assigned_to: None,
        tags: Vec::new(),
        messages: Vec::new(),
    }
}

#[tokio::main]
#[allow(clippy::too_many_lines)]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,supportdesk_console=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    println!("\n🎧 ============================================");
    println!("   Support Console - Live Demo");
    println!("============================================\n");

    let agent = user("Agent Pat", UserRole::Agent);
    let customer = user("Casey Customer", UserRole::Customer);

    let seed = vec![
        seed_ticket(
            "Login broken after update",
            "Cannot sign in since this morning",
            TicketPriority::High,
            &customer,
        ),
        seed_ticket(
            "Billing page 500s",
            "Invoice download returns an error",
            TicketPriority::Critical,
            &customer,
        ),
        seed_ticket(
            "Dark mode request",
            "Would love a dark theme",
            TicketPriority::Low,
            &customer,
        ),
    ];
    let watched_id = seed[0].id;

    let service = Arc::new(InMemoryTicketService::new(seed, Arc::new(SystemClock)));
    let env = ConsoleEnv::live(service, agent.clone());
    let store = ConsoleStore::new(AppState::default(), AppReducer::default(), env);

    let source = Arc::new(InMemoryEventSource::default());
    let pipeline = EventPipeline::new(source.clone(), store.clone()).spawn();
    println!("✓ Store and event pipeline started\n");

    // Step 1: Load the first page
    println!("1️⃣  Loading tickets...");
    store
        .send_and_wait_for(
            AppAction::Tickets(TicketAction::LoadPage {
                query: TicketQuery::default(),
            }),
            |a| matches!(a, AppAction::Tickets(TicketAction::PageLoaded { .. })),
            WAIT,
        )
        .await?;
    let (count, total) = store
        .state(|s| (s.tickets.tickets.len(), s.tickets.total))
        .await;
    println!("   ✓ Loaded {count} of {total} tickets\n");

    // Step 2: Select a ticket
    println!("2️⃣  Opening ticket detail...");
    store
        .send_and_wait_for(
            AppAction::Tickets(TicketAction::Select { id: watched_id }),
            |a| matches!(a, AppAction::Tickets(TicketAction::Selected { .. })),
            WAIT,
        )
        .await?;
    let selected = store
        .state(|s| s.tickets.selected.as_ref().map(|t| t.title.clone()))
        .await;
    println!("   ✓ Selected: {}\n", selected.unwrap_or_default());

    // Step 3: Create a ticket optimistically
    println!("3️⃣  Creating a ticket...");
    store
        .send_and_wait_for(
            AppAction::Tickets(TicketAction::Create {
                draft: TicketDraft {
                    title: "Export times out".to_string(),
                    description: "CSV export hangs on large accounts".to_string(),
                    priority: TicketPriority::Medium,
                    tags: vec!["export".to_string()],
                },
            }),
            |a| matches!(a, AppAction::Tickets(TicketAction::CreateAccepted { .. })),
            WAIT,
        )
        .await?;
    println!("   ✓ Ticket created and accepted by the backend\n");

    // Step 4: Post a message on the selected ticket
    println!("4️⃣  Replying on the selected ticket...");
    store
        .send_and_wait_for(
            AppAction::Tickets(TicketAction::PostMessage {
                ticket_id: watched_id,
                content: "Looking into this now.".to_string(),
            }),
            |a| matches!(a, AppAction::Tickets(TicketAction::MessagePosted { .. })),
            WAIT,
        )
        .await?;
    println!("   ✓ Message posted\n");

    // Step 5: Real-time events arrive
    println!("5️⃣  Real-time events arriving...");
    source.publish(TicketEvent::NewMessage {
        ticket_id: watched_id,
        message: Message {
            id: MessageId::new(),
            content: "It fails on mobile too.".to_string(),
            created_at: Utc::now(),
            sender: customer.clone(),
            attachments: Vec::new(),
        },
    });
    source.publish(TicketEvent::StatusUpdate {
        ticket_id: watched_id,
        status: TicketStatus::InProgress,
        occurred_at: Some(Utc::now()),
    });
    source.publish(TicketEvent::Assignment {
        ticket_id: watched_id,
        assignee: Some(agent),
        occurred_at: None,
    });
    // Events for tickets outside the loaded page are dropped and counted
    source.publish(TicketEvent::StatusUpdate {
        ticket_id: TicketId::new(),
        status: TicketStatus::Closed,
        occurred_at: None,
    });

    tokio::time::sleep(Duration::from_millis(300)).await;

    let (status, messages, dropped) = store
        .state(|s| {
            let selected = s.tickets.selected.as_ref();
            (
                selected.map(|t| t.status),
                selected.map_or(0, |t| t.messages.len()),
                s.tickets.dropped_events,
            )
        })
        .await;
    println!("   ✓ Selected ticket status: {}", status.map_or_else(String::new, |s| s.to_string()));
    println!("   ✓ Messages in thread: {messages}");
    println!("   ✓ Events dropped (unknown target): {dropped}\n");

    // Step 6: Notifications
    println!("6️⃣  Notifications:");
    store
        .state(|s| {
            for n in &s.notifications.notifications {
                let marker = if n.read { " " } else { "●" };
                println!("   {marker} [{:?}] {}", n.kind, n.message);
            }
            println!("   Unread: {}", s.notifications.unread_count);
        })
        .await;

    // Step 7: Dashboard rollup
    println!("\n7️⃣  Dashboard:");
    store
        .state(|s| {
            let stats = queries::dashboard(&s.tickets.tickets);
            println!("   Total: {}", stats.total);
            println!(
                "   Open: {}  In progress: {}  Resolved: {}  Closed: {}",
                stats.by_status.open,
                stats.by_status.in_progress,
                stats.by_status.resolved,
                stats.by_status.closed
            );
            if let Some(recent) = stats.recent.first() {
                println!("   Most recently updated: {}", recent.title);
            }
        })
        .await;

    println!("\n🛑 Shutting down...");
    pipeline.shutdown().await;
    store.shutdown(Duration::from_secs(5)).await?;
    println!("✨ Demo completed successfully!");

    Ok(())
}
