//! The core trait for business logic.
//!
//! Reducers are pure functions: `(State, Action, Environment) -> (State, Effects)`.
//! They contain all business logic, are deterministic given an environment, and
//! never perform I/O themselves.

use crate::effect::Effects;

/// The Reducer trait - core abstraction for business logic.
///
/// # Type Parameters
///
/// - `State`: the domain state this reducer operates on
/// - `Action`: the closed set of inputs this reducer processes
/// - `Environment`: the injected dependencies this reducer needs
///
/// # Example
///
/// ```ignore
/// impl Reducer for TicketsReducer {
///     type State = TicketsState;
///     type Action = TicketAction;
///     type Environment = ConsoleEnv;
///
///     fn reduce(
///         &self,
///         state: &mut TicketsState,
///         action: TicketAction,
///         env: &ConsoleEnv,
///     ) -> Effects<TicketAction> {
///         match action {
///             TicketAction::ClearSelection => {
///                 state.selected = None;
///                 Effects::new()
///             }
///             // ...
///         }
///     }
/// }
/// ```
pub trait Reducer {
    /// The state type this reducer operates on
    type State;

    /// The action type this reducer processes
    type Action;

    /// The environment type with injected dependencies
    type Environment;

    /// Reduce an action into state changes and effects.
    ///
    /// This is a pure function that:
    /// 1. Validates the action against the current state
    /// 2. Updates state in place
    /// 3. Returns effect descriptions for the runtime to execute
    ///
    /// A reducer run is atomic from any reader's point of view: the runtime
    /// holds the state write lock for the whole call, so multi-projection
    /// writes (e.g. collection + selection) can never be observed half-done.
    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        env: &Self::Environment,
    ) -> Effects<Self::Action>;
}
