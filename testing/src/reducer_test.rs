//! Given-When-Then builder for reducer tests.
//!
//! The builder reduces every action synchronously and hands back the effects
//! without running them, so assertions see exactly what the reducer decided.

#![allow(clippy::module_name_repetitions)] // ReducerTest is the natural name

use todos_core::{effect::Effect, reducer::Reducer};

/// Type alias for state assertion functions
type StateAssertion<S> = Box<dyn FnOnce(&S)>;

/// Type alias for effect assertion functions
type EffectAssertion<A> = Box<dyn FnOnce(&[Effect<A>])>;

/// Fluent API for testing reducers with Given-When-Then syntax
///
/// Several `when_action` calls are applied in order; effect assertions see
/// the effects of all of them.
///
/// # Example
///
/// ```ignore
/// use todos_testing::ReducerTest;
///
/// ReducerTest::new(TodoReducer::new())
///     .with_env(test_environment())
///     .given_state(TodoState::new())
///     .when_action(TodoAction::CreateTodo { text: "Walk dog".into() })
///     .then_state(|state| {
///         assert_eq!(state.count(), 1);
///     })
///     .then_effects(assertions::assert_no_effects)
///     .run();
/// ```
pub struct ReducerTest<R, S, A, E>
where
    R: Reducer<State = S, Action = A, Environment = E>,
{
    reducer: R,
    environment: Option<E>,
    initial_state: Option<S>,
    actions: Vec<A>,
    state_assertions: Vec<StateAssertion<S>>,
    effect_assertions: Vec<EffectAssertion<A>>,
}

impl<R, S, A, E> ReducerTest<R, S, A, E>
where
    R: Reducer<State = S, Action = A, Environment = E>,
{
    /// Create a new reducer test with the given reducer
    #[must_use]
    pub const fn new(reducer: R) -> Self {
        Self {
            reducer,
            environment: None,
            initial_state: None,
            actions: Vec::new(),
            state_assertions: Vec::new(),
            effect_assertions: Vec::new(),
        }
    }

    /// Set the environment for the test
    #[must_use]
    pub fn with_env(mut self, env: E) -> Self {
        self.environment = Some(env);
        self
    }

    /// Set the initial state (Given)
    #[must_use]
    pub fn given_state(mut self, state: S) -> Self {
        self.initial_state = Some(state);
        self
    }

    /// Add an action to apply (When)
    #[must_use]
    pub fn when_action(mut self, action: A) -> Self {
        self.actions.push(action);
        self
    }

    /// Add several actions to apply in order (When)
    #[must_use]
    pub fn when_actions<I>(mut self, actions: I) -> Self
    where
        I: IntoIterator<Item = A>,
    {
        self.actions.extend(actions);
        self
    }

    /// Add an assertion about the resulting state (Then)
    #[must_use]
    pub fn then_state<F>(mut self, assertion: F) -> Self
    where
        F: FnOnce(&S) + 'static,
    {
        self.state_assertions.push(Box::new(assertion));
        self
    }

    /// Add an assertion about the resulting effects (Then)
    #[must_use]
    pub fn then_effects<F>(mut self, assertion: F) -> Self
    where
        F: FnOnce(&[Effect<A>]) + 'static,
    {
        self.effect_assertions.push(Box::new(assertion));
        self
    }

    /// Run the test and execute all assertions
    ///
    /// # Panics
    ///
    /// Panics if initial state, environment, or at least one action is not set,
    /// or if any assertions fail.
    #[allow(clippy::panic)] // Test code can panic
    #[allow(clippy::expect_used)] // Test code can use expect
    pub fn run(self) {
        let mut state = self
            .initial_state
            .expect("Initial state must be set with given_state()");

        assert!(
            !self.actions.is_empty(),
            "At least one action must be set with when_action()"
        );

        let env = self
            .environment
            .expect("Environment must be set with with_env()");

        // Execute reducer
        let effects = crate::reduce_all(&self.reducer, &mut state, self.actions, &env);

        // Run state assertions
        for assertion in self.state_assertions {
            assertion(&state);
        }

        // Run effect assertions
        for assertion in self.effect_assertions {
            assertion(&effects);
        }
    }
}

/// Helper assertions for effects
pub mod assertions {
    use todos_core::effect::Effect;

    /// Assert that there are no effects
    ///
    /// # Panics
    ///
    /// Panics if any effect would do something when executed.
    #[allow(clippy::panic)] // Test assertion
    pub fn assert_no_effects<A: std::fmt::Debug>(effects: &[Effect<A>]) {
        assert!(
            effects.iter().all(Effect::is_none),
            "Expected no effects, but found {}: {:?}",
            effects.len(),
            effects
        );
    }

    /// Assert the number of effects
    ///
    /// # Panics
    ///
    /// Panics if the number of effects doesn't match expected.
    #[allow(clippy::panic)] // Test assertion
    pub fn assert_effects_count<A>(effects: &[Effect<A>], expected: usize) {
        assert_eq!(
            effects.len(),
            expected,
            "Expected {} effects, but found {}",
            expected,
            effects.len()
        );
    }

    /// Assert that effects contain at least one Future effect
    ///
    /// # Panics
    ///
    /// Panics if no Future effect is found.
    #[allow(clippy::panic)] // Test assertion
    pub fn assert_has_future_effect<A>(effects: &[Effect<A>]) {
        assert!(
            effects.iter().any(|e| matches!(e, Effect::Future(_))),
            "Expected at least one Future effect, but none found"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mocks::{test_clock, FixedClock};
    use chrono::{DateTime, Utc};
    use smallvec::{smallvec, SmallVec};
    use todos_core::effect::Effect;
    use todos_core::environment::Clock;
    use todos_core::reducer::Reducer;

    /// A checklist: items are added, then checked off front to back
    #[derive(Clone, Debug, Default)]
    struct Checklist {
        items: Vec<(String, DateTime<Utc>)>,
        checked: usize,
    }

    #[derive(Clone, Debug)]
    enum ChecklistAction {
        Add(String),
        CheckNext,
        CheckNextLater,
    }

    struct ChecklistReducer;

    impl Reducer for ChecklistReducer {
        type State = Checklist;
        type Action = ChecklistAction;
        type Environment = FixedClock;

        fn reduce(
            &self,
            state: &mut Self::State,
            action: Self::Action,
            clock: &Self::Environment,
        ) -> SmallVec<[Effect<Self::Action>; 4]> {
            match action {
                ChecklistAction::Add(item) => {
                    state.items.push((item, clock.now()));
                    smallvec![Effect::None]
                },
                ChecklistAction::CheckNext => {
                    if state.checked < state.items.len() {
                        state.checked += 1;
                    }
                    SmallVec::new()
                },
                ChecklistAction::CheckNextLater => {
                    smallvec![Effect::future(async { Some(ChecklistAction::CheckNext) })]
                },
            }
        }
    }

    #[test]
    fn test_add_item_uses_environment_clock() {
        ReducerTest::new(ChecklistReducer)
            .with_env(test_clock())
            .given_state(Checklist::default())
            .when_action(ChecklistAction::Add("pack bags".to_string()))
            .then_state(|state| {
                assert_eq!(state.items.len(), 1);
                assert_eq!(state.items[0].1, test_clock().now());
            })
            .then_effects(assertions::assert_no_effects)
            .run();
    }

    #[test]
    fn test_action_sequence_applies_in_order() {
        ReducerTest::new(ChecklistReducer)
            .with_env(test_clock())
            .given_state(Checklist::default())
            .when_actions([
                ChecklistAction::CheckNext,
                ChecklistAction::Add("pack bags".to_string()),
            ])
            .when_action(ChecklistAction::CheckNext)
            .then_state(|state| {
                // The first check had nothing to check off
                assert_eq!(state.checked, 1);
            })
            .then_effects(|effects| assertions::assert_effects_count(effects, 1))
            .run();
    }

    #[test]
    fn test_future_effect_is_returned_not_run() {
        ReducerTest::new(ChecklistReducer)
            .with_env(test_clock())
            .given_state(Checklist {
                items: vec![("pack bags".to_string(), test_clock().now())],
                checked: 0,
            })
            .when_action(ChecklistAction::CheckNextLater)
            .then_state(|state| assert_eq!(state.checked, 0))
            .then_effects(assertions::assert_has_future_effect)
            .run();
    }

    #[test]
    fn test_assertions_no_effects() {
        assertions::assert_no_effects::<ChecklistAction>(&[Effect::None]);
        assertions::assert_no_effects::<ChecklistAction>(&[]);
        assertions::assert_no_effects::<ChecklistAction>(&[Effect::merge(vec![Effect::None])]);
    }

    #[test]
    #[should_panic(expected = "Expected no effects")]
    fn test_assert_no_effects_rejects_future() {
        assertions::assert_no_effects(&[Effect::future(async { Some(ChecklistAction::CheckNext) })]);
    }

    #[test]
    #[should_panic(expected = "At least one action")]
    fn test_run_without_action_panics() {
        ReducerTest::new(ChecklistReducer)
            .with_env(test_clock())
            .given_state(Checklist::default())
            .run();
    }
}
