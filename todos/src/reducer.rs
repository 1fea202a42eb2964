//! Reducer logic for the todo list.
//!
//! Commands are validated, turned into a single event, and the event is
//! applied. Events are applied with the same guards when replayed, so no input
//! can leave a liked or saved id behind for a todo that is gone.

use crate::error::TodoError;
use crate::types::{TodoAction, TodoId, TodoItem, TodoState};
use std::sync::Arc;
use todos_core::{effect::Effect, environment::Clock, reducer::Reducer, SmallVec};

/// Environment dependencies for the todo reducer
#[derive(Clone)]
pub struct TodoEnvironment {
    /// Clock for creation timestamps
    pub clock: Arc<dyn Clock>,
}

impl TodoEnvironment {
    /// Creates a new `TodoEnvironment`
    #[must_use]
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self { clock }
    }
}

/// Reducer for the todo list
#[derive(Clone, Debug, Default)]
pub struct TodoReducer;

impl TodoReducer {
    /// Creates a new `TodoReducer`
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Pure form of [`Reducer::reduce`]: returns the next state, leaving
    /// `state` untouched
    #[must_use]
    pub fn apply(
        &self,
        state: &TodoState,
        action: TodoAction,
        env: &TodoEnvironment,
    ) -> TodoState {
        let mut next = state.clone();
        // Todo actions never produce effects
        let _ = self.reduce(&mut next, action, env);
        next
    }

    fn validate_text(text: &str) -> Result<(), TodoError> {
        if text.trim().is_empty() {
            return Err(TodoError::EmptyText);
        }
        Ok(())
    }

    fn validate_exists(state: &TodoState, id: TodoId) -> Result<(), TodoError> {
        if !state.exists(id) {
            return Err(TodoError::NotFound(id));
        }
        Ok(())
    }

    /// Validates a command and returns the event it becomes
    fn decide(
        state: &mut TodoState,
        command: TodoAction,
        env: &TodoEnvironment,
    ) -> Result<TodoAction, TodoError> {
        match command {
            TodoAction::CreateTodo { text } => {
                Self::validate_text(&text)?;
                Ok(TodoAction::TodoCreated {
                    id: state.allocate_id()?,
                    text,
                    created_at: env.clock.now(),
                })
            }
            TodoAction::ToggleLiked { id } => {
                Self::validate_exists(state, id)?;
                Ok(if state.is_liked(id) {
                    TodoAction::TodoUnliked { id }
                } else {
                    TodoAction::TodoLiked { id }
                })
            }
            TodoAction::ToggleSaved { id } => {
                Self::validate_exists(state, id)?;
                Ok(if state.is_saved(id) {
                    TodoAction::TodoUnsaved { id }
                } else {
                    TodoAction::TodoSaved { id }
                })
            }
            TodoAction::DeleteTodo { id } => {
                Self::validate_exists(state, id)?;
                Ok(TodoAction::TodoDeleted { id })
            }
            TodoAction::EditTodo { id, text } => {
                Self::validate_exists(state, id)?;
                Self::validate_text(&text)?;
                Ok(TodoAction::TodoEdited { id, text })
            }
            event => Ok(event),
        }
    }

    /// Applies an event to state, returning whether anything changed
    fn apply_event(state: &mut TodoState, event: TodoAction) -> bool {
        match event {
            TodoAction::TodoCreated {
                id,
                text,
                created_at,
            } => {
                if state.exists(id) || text.trim().is_empty() {
                    return false;
                }
                state.next_id = state.next_id.max(id.as_u64().saturating_add(1));
                state.todos.push(TodoItem::new(id, text, created_at));
                true
            }
            TodoAction::TodoLiked { id } => state.exists(id) && state.liked.insert(id),
            TodoAction::TodoUnliked { id } => state.liked.remove(&id),
            TodoAction::TodoSaved { id } => state.exists(id) && state.saved.insert(id),
            TodoAction::TodoUnsaved { id } => state.saved.remove(&id),
            TodoAction::TodoDeleted { id } => {
                let Some(index) = state.position(id) else {
                    return false;
                };
                state.todos.remove(index);
                state.liked.remove(&id);
                state.saved.remove(&id);
                true
            }
            TodoAction::TodoEdited { id, text } => {
                if text.trim().is_empty() {
                    return false;
                }
                match state.todos.iter_mut().find(|todo| todo.id == id) {
                    Some(todo) if todo.text != text => {
                        todo.text = text;
                        true
                    }
                    _ => false,
                }
            }
            // Commands are not applied to state
            TodoAction::CreateTodo { .. }
            | TodoAction::ToggleLiked { .. }
            | TodoAction::ToggleSaved { .. }
            | TodoAction::DeleteTodo { .. }
            | TodoAction::EditTodo { .. } => false,
        }
    }
}

impl Reducer for TodoReducer {
    type State = TodoState;
    type Action = TodoAction;
    type Environment = TodoEnvironment;

    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        env: &Self::Environment,
    ) -> SmallVec<[Effect<Self::Action>; 4]> {
        let is_command = action.is_command();

        let event = match Self::decide(state, action, env) {
            Ok(event) => event,
            Err(error) => {
                tracing::debug!(%error, "Rejected todo command");
                return SmallVec::new();
            }
        };

        let event_type = event.event_type();
        if Self::apply_event(state, event) {
            state.bump_revision();
            tracing::trace!(event_type, revision = state.revision(), "Applied todo event");
        } else if !is_command {
            tracing::debug!(event_type, "Ignored todo event with no effect on state");
        }

        SmallVec::new()
    }
}
