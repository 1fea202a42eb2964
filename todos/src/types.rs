//! Domain types for the todo list.
//!
//! A todo list is an ordered sequence of items plus two independent tag sets,
//! liked and saved, keyed by item id. Both sets only ever contain ids of items
//! that are still in the list.

use crate::error::TodoError;
use crate::view::ViewMode;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use todos_macros::{Action, State};

/// Unique identifier for a todo item
///
/// Allocated from a counter held in [`TodoState`], so ids are never reused
/// within one list, no matter how quickly items are created.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TodoId(u64);

impl TodoId {
    /// Creates a `TodoId` from its raw value
    #[must_use]
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// Returns the raw value
    #[must_use]
    pub const fn as_u64(self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for TodoId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A single todo item
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TodoItem {
    /// Unique identifier
    pub id: TodoId,
    /// Text of the todo, never empty
    pub text: String,
    /// When the todo was created
    pub created_at: DateTime<Utc>,
}

impl TodoItem {
    /// Creates a new todo item
    #[must_use]
    pub const fn new(id: TodoId, text: String, created_at: DateTime<Utc>) -> Self {
        Self {
            id,
            text,
            created_at,
        }
    }
}

/// State of the todo list
#[derive(State, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TodoState {
    /// All todos in insertion order
    pub todos: Vec<TodoItem>,
    /// Ids of liked todos
    pub liked: BTreeSet<TodoId>,
    /// Ids of saved todos
    pub saved: BTreeSet<TodoId>,
    /// Next id to hand out; greater than every id in `todos`
    pub next_id: u64,
    /// Accepted changes so far
    #[revision]
    pub revision: u64,
}

impl TodoState {
    /// Creates a new empty todo state
    #[must_use]
    pub const fn new() -> Self {
        Self {
            todos: Vec::new(),
            liked: BTreeSet::new(),
            saved: BTreeSet::new(),
            next_id: 1,
            revision: 0,
        }
    }

    /// Returns the number of todos
    #[must_use]
    pub fn count(&self) -> usize {
        self.todos.len()
    }

    /// Returns the number of liked todos
    #[must_use]
    pub fn liked_count(&self) -> usize {
        self.liked.len()
    }

    /// Returns the number of saved todos
    #[must_use]
    pub fn saved_count(&self) -> usize {
        self.saved.len()
    }

    /// Returns a todo by ID
    #[must_use]
    pub fn get(&self, id: TodoId) -> Option<&TodoItem> {
        self.todos.iter().find(|todo| todo.id == id)
    }

    /// Returns the index of a todo in insertion order
    #[must_use]
    pub fn position(&self, id: TodoId) -> Option<usize> {
        self.todos.iter().position(|todo| todo.id == id)
    }

    /// Checks if a todo exists
    #[must_use]
    pub fn exists(&self, id: TodoId) -> bool {
        self.position(id).is_some()
    }

    /// Checks if a todo is liked
    #[must_use]
    pub fn is_liked(&self, id: TodoId) -> bool {
        self.liked.contains(&id)
    }

    /// Checks if a todo is saved
    #[must_use]
    pub fn is_saved(&self, id: TodoId) -> bool {
        self.saved.contains(&id)
    }

    /// Todos shown under `mode`, in insertion order
    #[must_use]
    pub fn visible(&self, mode: ViewMode) -> Vec<&TodoItem> {
        self.todos
            .iter()
            .filter(|todo| mode.includes(self, todo.id))
            .collect()
    }

    /// Hands out the next unused id
    ///
    /// Starts past every id already in the list, so a stale `next_id` (for
    /// example from a loaded snapshot) never hands out an id that is taken.
    ///
    /// # Errors
    ///
    /// Returns [`TodoError::IdsExhausted`] when no id above the current ones
    /// is left.
    pub(crate) fn allocate_id(&mut self) -> Result<TodoId, TodoError> {
        let floor = match self.todos.iter().map(|todo| todo.id.as_u64()).max() {
            Some(max) => max.checked_add(1).ok_or(TodoError::IdsExhausted)?,
            None => 1,
        };
        let id = self.next_id.max(floor);
        self.next_id = id.checked_add(1).ok_or(TodoError::IdsExhausted)?;
        Ok(TodoId(id))
    }
}

impl Default for TodoState {
    fn default() -> Self {
        Self::new()
    }
}

/// Actions representing commands and events for the todo list
///
/// Commands come from the user and are validated by the reducer. A valid
/// command becomes exactly one event, which is then applied. Events can also
/// be sent directly to replay a recorded history.
#[derive(Action, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TodoAction {
    // ========== Commands ==========
    /// Command: Append a new todo
    #[command]
    CreateTodo {
        /// Text of the todo
        text: String,
    },

    /// Command: Like the todo, or unlike it if already liked
    #[command]
    ToggleLiked {
        /// Todo to toggle
        id: TodoId,
    },

    /// Command: Save the todo, or unsave it if already saved
    #[command]
    ToggleSaved {
        /// Todo to toggle
        id: TodoId,
    },

    /// Command: Delete a todo and drop it from the liked and saved sets
    #[command]
    DeleteTodo {
        /// Todo to delete
        id: TodoId,
    },

    /// Command: Replace the text of a todo
    #[command]
    EditTodo {
        /// Todo to edit
        id: TodoId,
        /// New text
        text: String,
    },

    // ========== Events ==========
    /// Event: Todo was created
    #[event]
    TodoCreated {
        /// Todo identifier
        id: TodoId,
        /// Text of the todo
        text: String,
        /// When the todo was created
        created_at: DateTime<Utc>,
    },

    /// Event: Todo was liked
    #[event]
    TodoLiked {
        /// Todo identifier
        id: TodoId,
    },

    /// Event: Todo was unliked
    #[event]
    TodoUnliked {
        /// Todo identifier
        id: TodoId,
    },

    /// Event: Todo was saved
    #[event]
    TodoSaved {
        /// Todo identifier
        id: TodoId,
    },

    /// Event: Todo was unsaved
    #[event]
    TodoUnsaved {
        /// Todo identifier
        id: TodoId,
    },

    /// Event: Todo was deleted
    #[event]
    TodoDeleted {
        /// Todo identifier
        id: TodoId,
    },

    /// Event: Todo text was replaced
    #[event]
    TodoEdited {
        /// Todo identifier
        id: TodoId,
        /// New text
        text: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use todos_testing::test_clock;
    use todos_core::environment::Clock;

    fn item(raw: u64, text: &str) -> TodoItem {
        TodoItem::new(TodoId::new(raw), text.to_string(), test_clock().now())
    }

    #[test]
    fn todo_id_display() {
        assert_eq!(TodoId::new(42).to_string(), "42");
    }

    #[test]
    fn allocate_id_is_monotonic() {
        let mut state = TodoState::new();
        assert_eq!(state.allocate_id(), Ok(TodoId::new(1)));
        assert_eq!(state.allocate_id(), Ok(TodoId::new(2)));
        assert_eq!(state.next_id, 3);
    }

    #[test]
    fn allocate_id_skips_ids_in_use() {
        let mut state = TodoState::new();
        state.todos.push(item(1, "Buy milk"));
        state.todos.push(item(5, "Walk dog"));
        state.next_id = 2;

        assert_eq!(state.allocate_id(), Ok(TodoId::new(6)));
        assert_eq!(state.next_id, 7);
    }

    #[test]
    fn allocate_id_reports_exhaustion() {
        let mut state = TodoState::new();
        state.todos.push(item(u64::MAX, "Last"));
        state.next_id = u64::MAX;

        assert_eq!(state.allocate_id(), Err(TodoError::IdsExhausted));
        assert_eq!(state.next_id, u64::MAX);

        state.todos.clear();
        assert_eq!(state.allocate_id(), Err(TodoError::IdsExhausted));
    }

    #[test]
    fn todo_state_lookups() {
        let mut state = TodoState::new();
        state.todos.push(item(1, "Buy milk"));
        state.todos.push(item(2, "Walk dog"));
        state.liked.insert(TodoId::new(2));

        assert_eq!(state.count(), 2);
        assert_eq!(state.liked_count(), 1);
        assert_eq!(state.saved_count(), 0);
        assert_eq!(state.position(TodoId::new(2)), Some(1));
        assert_eq!(
            state.get(TodoId::new(1)).map(|t| t.text.as_str()),
            Some("Buy milk")
        );
        assert!(state.is_liked(TodoId::new(2)));
        assert!(!state.is_saved(TodoId::new(2)));
        assert!(!state.exists(TodoId::new(3)));
    }

    #[test]
    fn visible_keeps_insertion_order() {
        let mut state = TodoState::new();
        for raw in 1..=5 {
            state.todos.push(item(raw, &format!("todo {raw}")));
        }
        // Insert in reverse to show set order does not leak into the view
        state.liked.insert(TodoId::new(4));
        state.liked.insert(TodoId::new(2));
        state.saved.insert(TodoId::new(5));

        let liked: Vec<_> = state.visible(ViewMode::Liked).iter().map(|t| t.id).collect();
        assert_eq!(liked, vec![TodoId::new(2), TodoId::new(4)]);

        let saved: Vec<_> = state.visible(ViewMode::Saved).iter().map(|t| t.id).collect();
        assert_eq!(saved, vec![TodoId::new(5)]);

        assert_eq!(state.visible(ViewMode::All).len(), 5);
    }

    #[test]
    fn todo_action_is_command() {
        let action = TodoAction::CreateTodo {
            text: "Test".to_string(),
        };
        assert!(action.is_command());
        assert!(!action.is_event());
    }

    #[test]
    fn todo_action_is_event() {
        let action = TodoAction::TodoLiked { id: TodoId::new(1) };
        assert!(action.is_event());
        assert!(!action.is_command());
        assert_eq!(action.event_type(), "TodoLiked.v1");
    }
}
