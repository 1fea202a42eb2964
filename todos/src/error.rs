//! Error types for the todo list.

use crate::types::TodoId;
use thiserror::Error;

/// Reasons a command is rejected by the reducer
///
/// Rejections are logged and leave the state untouched; they never reach the
/// caller of `send`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TodoError {
    /// Create or edit with empty or whitespace-only text
    #[error("todo text cannot be empty")]
    EmptyText,

    /// Command references an id that is not in the list
    #[error("todo {0} not found")]
    NotFound(TodoId),

    /// Every id above the current todos is taken
    #[error("no todo ids left")]
    IdsExhausted,
}

/// A view mode name that is not `all`, `liked` or `saved`
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown view `{0}` (expected all, liked or saved)")]
pub struct ParseViewModeError(pub String);
