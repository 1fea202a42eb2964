//! In-memory todo list with liked and saved views.
//!
//! The whole list lives in one [`TodoState`], changed only by sending a
//! [`TodoAction`] through the [`TodoReducer`]:
//!
//! - create, edit and delete todos
//! - like / save todos, tracked as sets of [`TodoId`]
//! - filter the list by [`ViewMode`] at render time
//! - confirm deletes and edits through a [`Dialog`]
//!
//! # Quick Start
//!
//! ```no_run
//! use todos::{TodoAction, TodoEnvironment, TodoReducer, TodoState, ViewMode};
//! use todos_core::environment::SystemClock;
//! use todos_runtime::Store;
//! use std::sync::Arc;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let env = TodoEnvironment::new(Arc::new(SystemClock));
//! let store = Store::new(TodoState::new(), TodoReducer::new(), env);
//!
//! store.send(TodoAction::CreateTodo { text: "Buy milk".to_string() }).await?;
//!
//! let id = store.state(|s| s.todos[0].id).await;
//! store.send(TodoAction::ToggleLiked { id }).await?;
//!
//! let liked = store.state(|s| s.visible(ViewMode::Liked).len()).await;
//! println!("Liked todos: {liked}");
//! # Ok(())
//! # }
//! ```

pub mod cli;
pub mod config;
pub mod dialog;
pub mod error;
pub mod reducer;
pub mod types;
pub mod view;

// Re-export commonly used types
pub use config::Config;
pub use dialog::{Dialog, PendingOperation};
pub use error::{ParseViewModeError, TodoError};
pub use reducer::{TodoEnvironment, TodoReducer};
pub use types::{TodoAction, TodoId, TodoItem, TodoState};
pub use view::ViewMode;
