//! Confirmation and edit dialogs.
//!
//! A dialog remembers which todo a pending delete or edit refers to until the
//! user confirms or cancels. Confirming yields exactly one [`TodoAction`]; the
//! reducer never sees the dialog itself.

use crate::types::{TodoAction, TodoId, TodoState};
use serde::{Deserialize, Serialize};

/// Operation waiting for the user's answer
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum PendingOperation {
    /// No dialog is open
    #[default]
    None,
    /// "Are you sure you want to delete this todo?"
    PendingDelete(TodoId),
    /// Edit field prefilled with the todo's current text
    PendingEdit {
        /// Todo being edited
        id: TodoId,
        /// Text currently in the edit field
        draft: String,
    },
}

/// Dialog state owned by the front end
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Dialog {
    pending: PendingOperation,
}

impl Dialog {
    /// Creates a closed dialog
    #[must_use]
    pub const fn new() -> Self {
        Self {
            pending: PendingOperation::None,
        }
    }

    /// The operation currently awaiting an answer
    #[must_use]
    pub const fn pending(&self) -> &PendingOperation {
        &self.pending
    }

    /// Returns true while a dialog is open
    #[must_use]
    pub const fn is_open(&self) -> bool {
        !matches!(self.pending, PendingOperation::None)
    }

    /// Opens the delete confirmation for `id`, replacing any open dialog
    pub fn request_delete(&mut self, id: TodoId) {
        self.pending = PendingOperation::PendingDelete(id);
    }

    /// Opens the edit dialog for `id` with its current text as the draft
    ///
    /// Returns false, leaving the dialog unchanged, if `id` is not in `state`.
    pub fn request_edit(&mut self, state: &TodoState, id: TodoId) -> bool {
        let Some(todo) = state.get(id) else {
            return false;
        };
        self.pending = PendingOperation::PendingEdit {
            id,
            draft: todo.text.clone(),
        };
        true
    }

    /// Replaces the draft of an open edit dialog
    ///
    /// Returns false if no edit dialog is open.
    pub fn set_draft(&mut self, text: impl Into<String>) -> bool {
        match &mut self.pending {
            PendingOperation::PendingEdit { draft, .. } => {
                *draft = text.into();
                true
            },
            _ => false,
        }
    }

    /// Closes the dialog and returns the action to dispatch
    pub fn confirm(&mut self) -> Option<TodoAction> {
        match std::mem::take(&mut self.pending) {
            PendingOperation::None => None,
            PendingOperation::PendingDelete(id) => Some(TodoAction::DeleteTodo { id }),
            PendingOperation::PendingEdit { id, draft } => {
                Some(TodoAction::EditTodo { id, text: draft })
            },
        }
    }

    /// Closes the dialog without dispatching anything
    pub fn cancel(&mut self) {
        self.pending = PendingOperation::None;
    }
}
