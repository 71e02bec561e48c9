//! Real-time support ticket console.
//!
//! A unidirectional event pipeline for a support ticketing console: user
//! commands and pushed backend events both flow through a single store,
//! which keeps the ticket collection, the selection detail, and the derived
//! notification feed consistent with each other.
//!
//! # Architecture
//!
//! - [`tickets`]: the ticket collection and selection detail, mutated by
//!   optimistic commands and real-time events
//! - [`notifications`]: the notification feed, derived from accepted
//!   real-time events
//! - [`app`]: composes the features into one reducer and one store
//! - [`pipeline`]: pumps events from an [`event::EventSource`] into the store
//! - [`queries`]: pure filtering, sorting, pagination, and dashboard rollups
//! - [`service`]: the backend boundary commands call through
//!
//! All cross-feature coupling lives in [`app::AppReducer`]; the features
//! themselves do not know about each other.

pub mod app;
pub mod environment;
pub mod event;
pub mod notifications;
pub mod pipeline;
pub mod queries;
pub mod service;
pub mod tickets;
pub mod types;

pub use app::{AppAction, AppReducer, AppState, ConsoleStore};
pub use environment::ConsoleEnv;
pub use event::{EventSource, InMemoryEventSource, TicketEvent};
pub use pipeline::{EventPipeline, PipelineHandle};
pub use service::{InMemoryTicketService, ServiceError, TicketService};
