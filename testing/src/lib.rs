//! # Todos Testing
//!
//! Testing utilities and helpers for reducers built on `todos-core`.
//!
//! This crate provides:
//! - Mock implementations of Environment traits
//! - A Given-When-Then builder for reducer tests
//! - Assertion helpers for effects
//!
//! ## Example
//!
//! ```ignore
//! use todos_testing::{test_clock, ReducerTest};
//!
//! ReducerTest::new(TodoReducer::new())
//!     .with_env(TodoEnvironment::new(Arc::new(test_clock())))
//!     .given_state(TodoState::new())
//!     .when_action(TodoAction::CreateTodo { text: "Buy milk".into() })
//!     .then_state(|state| assert_eq!(state.count(), 1))
//!     .run();
//! ```

use chrono::{DateTime, Utc};
use todos_core::environment::Clock;

/// Given-When-Then builder for reducers
pub mod reducer_test;

/// Mock implementations for testing.
pub mod mocks {
    use super::{Clock, DateTime, Utc};

    /// Fixed clock for deterministic tests
    ///
    /// Always returns the same time, making tests reproducible.
    ///
    /// # Example
    ///
    /// ```
    /// use todos_testing::mocks::FixedClock;
    /// use todos_core::environment::Clock;
    /// use chrono::Utc;
    ///
    /// let clock = FixedClock::new(Utc::now());
    /// let time1 = clock.now();
    /// let time2 = clock.now();
    /// assert_eq!(time1, time2); // Always the same!
    /// ```
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

    /// Create a default fixed clock for tests (2025-01-01 00:00:00 UTC)
    ///
    /// # Panics
    ///
    /// This function will panic if the hardcoded timestamp fails to parse,
    /// which should never happen in practice.
    #[must_use]
    #[allow(clippy::expect_used)]
    pub fn test_clock() -> FixedClock {
        FixedClock::new(
            DateTime::parse_from_rfc3339("2025-01-01T00:00:00Z")
                .expect("hardcoded timestamp should always parse")
                .with_timezone(&Utc),
        )
    }
}

/// Helpers for driving reducers outside the Given-When-Then builder
pub mod helpers {
    use todos_core::{effect::Effect, reducer::Reducer};

    /// Reduce every action in order, returning all effects produced
    ///
    /// Useful for property tests that check an invariant after a sequence of
    /// actions rather than after a single one.
    pub fn reduce_all<R, I>(
        reducer: &R,
        state: &mut R::State,
        actions: I,
        env: &R::Environment,
    ) -> Vec<Effect<R::Action>>
    where
        R: Reducer,
        I: IntoIterator<Item = R::Action>,
    {
        let mut effects = Vec::new();
        for action in actions {
            effects.extend(reducer.reduce(state, action, env));
        }
        effects
    }
}

// Re-export commonly used items
pub use helpers::reduce_all;
pub use mocks::{test_clock, FixedClock};
pub use reducer_test::{assertions, ReducerTest};
