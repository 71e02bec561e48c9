//! # Supportdesk Testing
//!
//! Testing utilities and helpers for the supportdesk architecture:
//!
//! - deterministic mock implementations of environment traits
//!   ([`FixedClock`], [`SequentialIds`])
//! - the fluent [`ReducerTest`] given/when/then harness
//! - assertion helpers for effects
//!
//! ## Example
//!
//! ```ignore
//! ReducerTest::new(TicketsReducer::new())
//!     .with_env(test_env())
//!     .given_state(TicketsState::default())
//!     .when_action(TicketAction::ClearSelection)
//!     .then_state(|state| assert!(state.selected.is_none()))
//!     .then_effects(assertions::assert_no_effects)
//!     .run();
//! ```

use chrono::{DateTime, Utc};
use supportdesk_core::environment::{Clock, IdGenerator};


pub use reducer_test::{ReducerTest, assertions};

/// Deterministic mock implementations of environment traits.
pub mod mocks {
    use super::{Clock, DateTime, IdGenerator, Utc};
    use std::sync::atomic::{AtomicU64, Ordering};
    use uuid::Uuid;

    /// Fixed clock for deterministic tests.
    ///
    /// Always returns the same time, making timestamps reproducible.
    #[derive(Debug, Clone)]
    pub struct FixedClock {
        time: DateTime<Utc>,
    }

    impl FixedClock {
        /// Create a new fixed clock with the given time
        #[must_use]
        pub const fn new(time: DateTime<Utc>) -> Self {
            Self { time }
        }
    }

    impl Clock for FixedClock {
        fn now(&self) -> DateTime<Utc> {
            self.time
        }
    }

    /// Create a default fixed clock for tests (2025-01-01 00:00:00 UTC).
    ///
    /// # Panics
    ///
    /// Panics if the hardcoded timestamp fails to parse, which cannot happen.
    #[must_use]
    #[allow(clippy::expect_used)]
    pub fn test_clock() -> FixedClock {
        FixedClock::new(
            DateTime::parse_from_rfc3339("2025-01-01T00:00:00Z")
                .expect("hardcoded timestamp should always parse")
                .with_timezone(&Utc),
        )
    }

    /// Predictable id generator: UUIDs carrying an incrementing counter.
    ///
    /// The first id generated is `...0001`, the second `...0002`, and so on,
    /// so test assertions can name the ids an operation will draw.
    #[derive(Debug, Default)]
    pub struct SequentialIds {
        next: AtomicU64,
    }

    impl SequentialIds {
        /// Create a generator starting at 1
        #[must_use]
        pub fn new() -> Self {
            Self::default()
        }
    }

    impl IdGenerator for SequentialIds {
        fn next_id(&self) -> Uuid {
            let n = self.next.fetch_add(1, Ordering::Relaxed) + 1;
            Uuid::from_u64_pair(0, n)
        }
    }
}

pub use mocks::{FixedClock, SequentialIds, test_clock};
