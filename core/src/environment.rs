//! Dependency injection traits.
//!
//! All external dependencies are abstracted behind traits and injected via the
//! Environment parameter of a reducer, so production wires real
//! implementations while tests substitute deterministic ones.

use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Clock trait - abstracts time operations for testability.
///
/// Production uses [`SystemClock`]; tests use a fixed clock so that
/// timestamps are reproducible.
pub trait Clock: Send + Sync {
    /// Get the current time
    fn now(&self) -> DateTime<Utc>;
}

/// Production clock backed by the system time
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Identifier generation for locally created entities.
///
/// Optimistic creates assign an id before the backend ever sees the entity,
/// so id generation has to be an injected dependency: production draws random
/// UUIDs, tests draw a predictable sequence.
pub trait IdGenerator: Send + Sync {
    /// Generate the next unique identifier
    fn next_id(&self) -> Uuid;
}

/// Production id generator - random v4 UUIDs
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomIds;

impl IdGenerator for RandomIds {
    fn next_id(&self) -> Uuid {
        Uuid::new_v4()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn system_clock_is_monotonic_enough() {
        let clock = SystemClock;
        let a = clock.now();
        let b = clock.now();
        assert!(b >= a);
    }

    #[test]
    fn random_ids_are_unique() {
        let ids = RandomIds;
        assert_ne!(ids.next_id(), ids.next_id());
    }
}
