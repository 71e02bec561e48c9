//! Ticket feature: state, actions, and reducer.
//!
//! Holds the dual projection of the ticket collection (the visible page plus
//! the selection detail) and applies commands, command resolutions, and
//! real-time events to it. Both projections mutate inside a single reducer
//! run, so observers never see them disagree.

mod actions;
mod reducer;
mod state;

pub use actions::TicketAction;
pub use reducer::TicketsReducer;
pub use state::{AppliedChange, AppliedEvent, EventOutcome, TicketsState};

#[cfg(test)]
mod tests;
