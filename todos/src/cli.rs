//! Line-oriented terminal front end.
//!
//! Each input line is one gesture. Gestures that need an answer (delete
//! confirmation, new text for an edit) open a [`Dialog`], and the next line
//! answers it. Items are addressed by their 1-based position in the current
//! view, the same numbers [`render`] prints.

use crate::config::Config;
use crate::dialog::{Dialog, PendingOperation};
use crate::error::ParseViewModeError;
use crate::reducer::{TodoEnvironment, TodoReducer};
use crate::types::{TodoAction, TodoId, TodoState};
use crate::view::ViewMode;
use thiserror::Error;
use todos_runtime::metrics::PrometheusHandle;
use todos_runtime::Store;

/// Store specialised for the todo list
pub type TodoStore = Store<TodoState, TodoAction, TodoEnvironment, TodoReducer>;

/// Help text printed by `help`
pub const HELP: &str = "\
Commands:
  add <text>              add a todo
  like <n>                like or unlike item n
  save <n>                save or unsave item n
  edit <n>                change the text of item n
  delete <n>              delete item n
  view all|liked|saved    switch view
  list                    show the current view
  dump                    print the full state as JSON
  metrics                 print store metrics (needs TODOS_METRICS=true)
  help                    show this help
  quit                    exit";

/// Errors in a line of user input
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CliError {
    /// First word is not a known command
    #[error("unknown command `{0}` (type `help`)")]
    UnknownCommand(String),

    /// Command needs an argument that was not given
    #[error("missing {0}")]
    MissingArgument(&'static str),

    /// Item number is not a positive integer
    #[error("`{0}` is not an item number")]
    InvalidIndex(String),

    /// View name is not recognised
    #[error(transparent)]
    InvalidView(#[from] ParseViewModeError),

    /// Item number is past the end of the current view
    #[error("no item {0} in this view")]
    NoSuchItem(usize),
}

/// One parsed line of input
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Gesture {
    /// `add <text>`
    Add(String),
    /// `like <n>`
    Like(usize),
    /// `save <n>`
    Save(usize),
    /// `delete <n>`
    Delete(usize),
    /// `edit <n>`
    Edit(usize),
    /// `view <mode>`
    View(ViewMode),
    /// `list`
    List,
    /// `dump`
    Dump,
    /// `metrics`
    Metrics,
    /// `help`
    Help,
    /// `quit` / `exit`
    Quit,
}

impl Gesture {
    /// Parse one line; blank lines yield `None`
    ///
    /// # Errors
    ///
    /// Returns a [`CliError`] describing why the line is not a gesture.
    pub fn parse(line: &str) -> Result<Option<Self>, CliError> {
        let line = line.trim();
        if line.is_empty() {
            return Ok(None);
        }

        let (command, rest) = line
            .split_once(char::is_whitespace)
            .map_or((line, ""), |(command, rest)| (command, rest.trim()));

        let gesture = match command.to_ascii_lowercase().as_str() {
            "add" => {
                if rest.is_empty() {
                    return Err(CliError::MissingArgument("todo text"));
                }
                Self::Add(rest.to_string())
            },
            "like" => Self::Like(parse_index(rest)?),
            "save" => Self::Save(parse_index(rest)?),
            "delete" | "rm" => Self::Delete(parse_index(rest)?),
            "edit" => Self::Edit(parse_index(rest)?),
            "view" => {
                if rest.is_empty() {
                    return Err(CliError::MissingArgument("view name"));
                }
                Self::View(rest.parse()?)
            },
            "list" | "ls" => Self::List,
            "dump" => Self::Dump,
            "metrics" | "stats" => Self::Metrics,
            "help" | "?" => Self::Help,
            "quit" | "exit" => Self::Quit,
            _ => return Err(CliError::UnknownCommand(command.to_string())),
        };

        Ok(Some(gesture))
    }
}

fn parse_index(arg: &str) -> Result<usize, CliError> {
    if arg.is_empty() {
        return Err(CliError::MissingArgument("item number"));
    }
    match arg.parse::<usize>() {
        Ok(n) if n > 0 => Ok(n),
        _ => Err(CliError::InvalidIndex(arg.to_string())),
    }
}

/// Render the todos visible under `view`, numbered from 1
#[must_use]
pub fn render(state: &TodoState, view: ViewMode) -> String {
    let mut out = format!(
        "[{view}] {} todos, {} liked, {} saved",
        state.count(),
        state.liked_count(),
        state.saved_count()
    );

    let visible = state.visible(view);
    if visible.is_empty() {
        out.push_str("\n(nothing to show)");
    }

    for (index, todo) in visible.iter().enumerate() {
        out.push_str(&format!("\n{}. {}", index + 1, todo.text));
        if state.is_liked(todo.id) {
            out.push_str(" ♥");
        }
        if state.is_saved(todo.id) {
            out.push_str(" ★");
        }
    }

    out
}

/// What the front end should do after a line
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Reply {
    /// Print this and read the next line
    Text(String),
    /// Exit the loop
    Quit,
}

/// One interactive session over a store
pub struct Session {
    store: TodoStore,
    view: ViewMode,
    dialog: Dialog,
    confirm_delete: bool,
    metrics: Option<PrometheusHandle>,
}

impl Session {
    /// Start a session using the startup settings from `config`
    #[must_use]
    pub fn new(store: TodoStore, config: &Config) -> Self {
        Self {
            store,
            view: config.default_view,
            dialog: Dialog::new(),
            confirm_delete: config.confirm_delete,
            metrics: None,
        }
    }

    /// Render store metrics from `handle` for the `metrics` command
    #[must_use]
    pub fn with_metrics(mut self, handle: PrometheusHandle) -> Self {
        self.metrics = Some(handle);
        self
    }

    /// The active view
    #[must_use]
    pub const fn view(&self) -> ViewMode {
        self.view
    }

    /// The dialog state
    #[must_use]
    pub const fn dialog(&self) -> &Dialog {
        &self.dialog
    }

    /// The store backing this session
    #[must_use]
    pub const fn store(&self) -> &TodoStore {
        &self.store
    }

    /// Prompt to show before reading the next line
    #[must_use]
    pub fn prompt(&self) -> &'static str {
        match self.dialog.pending() {
            PendingOperation::None => "> ",
            PendingOperation::PendingDelete(_) => "delete? [y/N] ",
            PendingOperation::PendingEdit { .. } => "new text: ",
        }
    }

    /// Handle one line of input
    ///
    /// Input mistakes are reported in the reply, not as errors.
    ///
    /// # Errors
    ///
    /// Returns an error if the store rejects an action (it is shutting down)
    /// or the state cannot be serialized for `dump`.
    pub async fn handle_line(&mut self, line: &str) -> anyhow::Result<Reply> {
        if self.dialog.is_open() {
            return self.answer_dialog(line).await;
        }

        let gesture = match Gesture::parse(line) {
            Ok(Some(gesture)) => gesture,
            Ok(None) => return Ok(Reply::Text(String::new())),
            Err(error) => return Ok(Reply::Text(format!("error: {error}"))),
        };

        tracing::debug!(?gesture, "Handling gesture");

        match self.handle_gesture(gesture).await {
            Ok(reply) => Ok(reply),
            Err(GestureError::Input(error)) => Ok(Reply::Text(format!("error: {error}"))),
            Err(GestureError::Other(error)) => Err(error),
        }
    }

    async fn handle_gesture(&mut self, gesture: Gesture) -> Result<Reply, GestureError> {
        match gesture {
            Gesture::Add(text) => {
                self.dispatch(TodoAction::CreateTodo { text }).await?;
            },
            Gesture::Like(n) => {
                let id = self.resolve(n).await?;
                self.dispatch(TodoAction::ToggleLiked { id }).await?;
            },
            Gesture::Save(n) => {
                let id = self.resolve(n).await?;
                self.dispatch(TodoAction::ToggleSaved { id }).await?;
            },
            Gesture::Delete(n) => {
                let id = self.resolve(n).await?;
                if !self.confirm_delete {
                    self.dispatch(TodoAction::DeleteTodo { id }).await?;
                    return Ok(Reply::Text(self.render().await));
                }
                self.dialog.request_delete(id);
                let text = self.text_of(id).await;
                return Ok(Reply::Text(format!(
                    "Are you sure you want to delete \"{text}\"?"
                )));
            },
            Gesture::Edit(n) => {
                let id = self.resolve(n).await?;
                let dialog = &mut self.dialog;
                if !self.store.state(|s| dialog.request_edit(s, id)).await {
                    return Err(CliError::NoSuchItem(n).into());
                }
                let text = self.text_of(id).await;
                return Ok(Reply::Text(format!(
                    "Editing \"{text}\" (empty line cancels)"
                )));
            },
            Gesture::View(mode) => self.view = mode,
            Gesture::List => {},
            Gesture::Dump => {
                let json = self
                    .store
                    .state(serde_json::to_string_pretty)
                    .await
                    .map_err(anyhow::Error::from)?;
                return Ok(Reply::Text(json));
            },
            Gesture::Metrics => {
                let text = self.metrics.as_ref().map_or_else(
                    || "metrics are off (set TODOS_METRICS=true)".to_string(),
                    |handle| handle.render().trim_end().to_string(),
                );
                return Ok(Reply::Text(text));
            },
            Gesture::Help => return Ok(Reply::Text(HELP.to_string())),
            Gesture::Quit => return Ok(Reply::Quit),
        }

        Ok(Reply::Text(self.render().await))
    }

    async fn answer_dialog(&mut self, line: &str) -> anyhow::Result<Reply> {
        let answer = line.trim();

        let confirmed = match self.dialog.pending().clone() {
            PendingOperation::None => false,
            PendingOperation::PendingDelete(_) => {
                matches!(answer.to_ascii_lowercase().as_str(), "y" | "yes")
            },
            PendingOperation::PendingEdit { .. } => {
                !answer.is_empty() && self.dialog.set_draft(answer)
            },
        };

        if !confirmed {
            self.dialog.cancel();
            return Ok(Reply::Text("Cancelled.".to_string()));
        }

        if let Some(action) = self.dialog.confirm() {
            self.dispatch(action).await?;
        }
        Ok(Reply::Text(self.render().await))
    }

    async fn dispatch(&self, action: TodoAction) -> anyhow::Result<()> {
        self.store.send(action).await?;
        Ok(())
    }

    async fn resolve(&self, n: usize) -> Result<TodoId, CliError> {
        let view = self.view;
        self.store
            .state(|s| s.visible(view).get(n - 1).map(|todo| todo.id))
            .await
            .ok_or(CliError::NoSuchItem(n))
    }

    async fn text_of(&self, id: TodoId) -> String {
        self.store
            .state(|s| s.get(id).map(|todo| todo.text.clone()))
            .await
            .unwrap_or_default()
    }

    async fn render(&self) -> String {
        let view = self.view;
        self.store.state(|s| render(s, view)).await
    }
}

/// Failure while handling a gesture: bad input is shown, anything else propagates
enum GestureError {
    Input(CliError),
    Other(anyhow::Error),
}

impl From<CliError> for GestureError {
    fn from(error: CliError) -> Self {
        Self::Input(error)
    }
}

impl From<anyhow::Error> for GestureError {
    fn from(error: anyhow::Error) -> Self {
        Self::Other(error)
    }
}
