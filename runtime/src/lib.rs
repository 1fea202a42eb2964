//! # Todos Runtime
//!
//! The Store runtime that coordinates reducer execution and effect handling.
//!
//! ## Core Components
//!
//! - **Store**: Owns the state, runs the reducer and executes effects
//! - **Effect Executor**: Executes effect descriptions and feeds actions back to the reducer
//!
//! ## Example
//!
//! ```ignore
//! use todos_runtime::Store;
//!
//! let store = Store::new(initial_state, my_reducer, environment);
//!
//! // Send an action
//! store.send(Action::DoSomething).await?;
//!
//! // Read state
//! let value = store.state(|s| s.some_field).await;
//! ```

use futures::future::{join_all, BoxFuture, FutureExt};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;
use todos_core::{effect::Effect, reducer::Reducer};
use tokio::sync::RwLock;

/// Metric names recorded by the store
pub mod metrics;

/// Error types for the Store runtime
pub mod error {
    use thiserror::Error;

    /// Errors that can occur during Store operations
    #[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
    pub enum StoreError {
        /// Store is shutting down and not accepting new actions
        ///
        /// This error is returned when `send()` is called after `shutdown()`.
        #[error("Store is shutting down")]
        ShutdownInProgress,
    }
}

pub use error::StoreError;

/// The Store - runtime for a reducer
///
/// The store owns the state behind a lock. Every call to [`Store::send`] runs
/// the reducer while holding the write lock, so actions are applied one at a
/// time and in the order they acquire the lock. Effects returned by the reducer
/// are executed before `send` returns, and any action they produce is reduced
/// in the same call.
///
/// # Type Parameters
///
/// - `S`: State type
/// - `A`: Action type
/// - `E`: Environment type
/// - `R`: Reducer implementation
pub struct Store<S, A, E, R>
where
    R: Reducer<State = S, Action = A, Environment = E>,
{
    state: Arc<RwLock<S>>,
    reducer: Arc<R>,
    environment: Arc<E>,
    shutdown: Arc<AtomicBool>,
}

impl<S, A, E, R> Store<S, A, E, R>
where
    R: Reducer<State = S, Action = A, Environment = E> + Send + Sync + 'static,
    A: Send + 'static,
    S: Send + Sync + 'static,
    E: Send + Sync + 'static,
{
    /// Create a new store with initial state, reducer, and environment
    #[must_use]
    pub fn new(initial_state: S, reducer: R, environment: E) -> Self {
        Self {
            state: Arc::new(RwLock::new(initial_state)),
            reducer: Arc::new(reducer),
            environment: Arc::new(environment),
            shutdown: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Send an action to the store
    ///
    /// 1. Acquires the write lock on state
    /// 2. Calls the reducer with (state, action, environment)
    /// 3. Releases the lock and executes the returned effects
    /// 4. Reduces every action the effects produced, in order
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::ShutdownInProgress`] if the store is shutting down.
    ///
    /// # Panics
    ///
    /// If the reducer panics, the panic will propagate.
    /// Reducers should be pure functions that do not panic.
    #[tracing::instrument(skip(self, action), name = "store_send")]
    pub async fn send(&self, action: A) -> Result<(), StoreError> {
        if self.shutdown.load(Ordering::Acquire) {
            tracing::warn!("Rejecting action: store is shutting down");
            metrics::counter!(metrics::ACTIONS_REJECTED).increment(1);
            return Err(StoreError::ShutdownInProgress);
        }

        let mut pending = VecDeque::from([action]);

        while let Some(action) = pending.pop_front() {
            let effects = {
                let mut state = self.state.write().await;
                let started = Instant::now();
                let effects = self.reducer.reduce(&mut *state, action, &self.environment);
                metrics::histogram!(metrics::REDUCER_DURATION)
                    .record(started.elapsed().as_secs_f64());
                metrics::counter!(metrics::ACTIONS_PROCESSED).increment(1);
                effects
            };

            tracing::trace!(effects = effects.len(), "Reducer returned");

            for effect in effects {
                pending.extend(execute_effect(effect).await);
            }
        }

        Ok(())
    }

    /// Read current state via a closure
    ///
    /// Access state through a closure to ensure the lock is released promptly:
    ///
    /// ```ignore
    /// let count = store.state(|s| s.todos.len()).await;
    /// ```
    pub async fn state<F, T>(&self, f: F) -> T
    where
        F: FnOnce(&S) -> T,
    {
        let state = self.state.read().await;
        f(&*state)
    }

    /// Stop accepting new actions
    ///
    /// Actions already inside `send` finish normally. Every later `send`
    /// returns [`StoreError::ShutdownInProgress`].
    pub fn shutdown(&self) {
        tracing::info!("Store shutting down");
        self.shutdown.store(true, Ordering::Release);
    }

    /// Returns true once [`Store::shutdown`] has been called
    #[must_use]
    pub fn is_shutting_down(&self) -> bool {
        self.shutdown.load(Ordering::Acquire)
    }
}

impl<S, A, E, R> Clone for Store<S, A, E, R>
where
    R: Reducer<State = S, Action = A, Environment = E>,
{
    fn clone(&self) -> Self {
        Self {
            state: Arc::clone(&self.state),
            reducer: Arc::clone(&self.reducer),
            environment: Arc::clone(&self.environment),
            shutdown: Arc::clone(&self.shutdown),
        }
    }
}

/// Execute an effect, returning the actions it produced
///
/// - `None`: no-op
/// - `Future`: awaited; its action (if any) is returned
/// - `Parallel`: all children run concurrently, actions returned in child order
/// - `Sequential`: children run one after another
fn execute_effect<A: Send + 'static>(effect: Effect<A>) -> BoxFuture<'static, Vec<A>> {
    async move {
        match effect {
            Effect::None => {
                metrics::counter!(metrics::EFFECTS_EXECUTED, "type" => "none").increment(1);
                Vec::new()
            },
            Effect::Future(fut) => {
                metrics::counter!(metrics::EFFECTS_EXECUTED, "type" => "future").increment(1);
                let action = fut.await;
                if action.is_none() {
                    tracing::trace!("Effect::Future completed with no action");
                }
                action.into_iter().collect()
            },
            Effect::Parallel(effects) => {
                metrics::counter!(metrics::EFFECTS_EXECUTED, "type" => "parallel").increment(1);
                join_all(effects.into_iter().map(execute_effect))
                    .await
                    .into_iter()
                    .flatten()
                    .collect()
            },
            Effect::Sequential(effects) => {
                metrics::counter!(metrics::EFFECTS_EXECUTED, "type" => "sequential").increment(1);
                let mut produced = Vec::new();
                for effect in effects {
                    produced.extend(execute_effect(effect).await);
                }
                produced
            },
        }
    }
    .boxed()
}
