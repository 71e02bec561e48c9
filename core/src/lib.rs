//! # Supportdesk Core
//!
//! Core traits and types for the supportdesk architecture.
//!
//! The console is built as an event-driven state machine: all state lives in a
//! single value, every input is an [`reducer::Reducer`] action, and every side
//! effect is described as a value ([`effect::Effect`]) executed by the store
//! runtime rather than performed inline.
//!
//! ## Core concepts
//!
//! - **State**: owned domain state for a feature, `Clone + Debug`
//! - **Action**: a closed sum of all inputs (user commands, async resolutions,
//!   remote events), matched exhaustively
//! - **Reducer**: `(State, Action, Environment) -> (State, Effects)`
//! - **Effect**: a description of a side effect; may resolve to a follow-up
//!   action that is fed back into the reducer
//! - **Environment**: injected dependencies behind traits ([`environment::Clock`],
//!   [`environment::IdGenerator`], domain services)
//!
//! ## Architecture principles
//!
//! - Functional core, imperative shell
//! - Unidirectional data flow
//! - Explicit effects (no hidden I/O in reducers)
//! - Dependency injection via the environment

pub use chrono::{DateTime, Utc};
pub use serde::{Deserialize, Serialize};
pub use smallvec::{SmallVec, smallvec};

pub mod effect;
pub mod environment;
pub mod reducer;

pub use effect::{Effect, Effects};
pub use environment::{Clock, IdGenerator, RandomIds, SystemClock};
pub use reducer::Reducer;
