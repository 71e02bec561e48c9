//! Environment for the console reducers.
//!
//! All side-effecting dependencies live here behind trait objects, so tests
//! substitute fixed clocks, sequential ids, and scripted services without
//! touching the reducers.

use std::sync::Arc;

use supportdesk_core::{Clock, IdGenerator, RandomIds, SystemClock};

use crate::service::TicketService;
use crate::types::User;

/// Dependencies shared by every console reducer
#[derive(Clone)]
pub struct ConsoleEnv {
    clock: Arc<dyn Clock>,
    ids: Arc<dyn IdGenerator>,
    service: Arc<dyn TicketService>,
    current_user: User,
}

impl ConsoleEnv {
    /// Creates an environment with explicit dependencies
    #[must_use]
    pub fn new(
        clock: Arc<dyn Clock>,
        ids: Arc<dyn IdGenerator>,
        service: Arc<dyn TicketService>,
        current_user: User,
    ) -> Self {
        Self {
            clock,
            ids,
            service,
            current_user,
        }
    }

    /// Creates an environment with the system clock and random ids
    #[must_use]
    pub fn live(service: Arc<dyn TicketService>, current_user: User) -> Self {
        Self::new(Arc::new(SystemClock), Arc::new(RandomIds), service, current_user)
    }

    /// The clock
    #[must_use]
    pub fn clock(&self) -> &dyn Clock {
        self.clock.as_ref()
    }

    /// The id generator
    #[must_use]
    pub fn ids(&self) -> &dyn IdGenerator {
        self.ids.as_ref()
    }

    /// A shared handle to the ticket service, for moving into effects
    #[must_use]
    pub fn service(&self) -> Arc<dyn TicketService> {
        Arc::clone(&self.service)
    }

    /// The signed-in user on whose behalf commands run
    #[must_use]
    pub const fn current_user(&self) -> &User {
        &self.current_user
    }
}

impl std::fmt::Debug for ConsoleEnv {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConsoleEnv")
            .field("current_user", &self.current_user.name)
            .finish_non_exhaustive()
    }
}
