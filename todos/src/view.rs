//! View modes: which todos the front end shows.

use crate::error::ParseViewModeError;
use crate::types::{TodoId, TodoState};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The active filter, applied only when rendering
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ViewMode {
    /// Every todo
    #[default]
    All,
    /// Only liked todos
    Liked,
    /// Only saved todos
    Saved,
}

impl ViewMode {
    /// Every mode, in the order a front end lists them
    pub const ALL_MODES: [Self; 3] = [Self::All, Self::Liked, Self::Saved];

    /// Whether the todo with `id` is shown under this mode
    #[must_use]
    pub fn includes(self, state: &TodoState, id: TodoId) -> bool {
        match self {
            Self::All => true,
            Self::Liked => state.is_liked(id),
            Self::Saved => state.is_saved(id),
        }
    }

    /// Lowercase name, as accepted by [`FromStr`]
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Liked => "liked",
            Self::Saved => "saved",
        }
    }
}

impl fmt::Display for ViewMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ViewMode {
    type Err = ParseViewModeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim();
        Self::ALL_MODES
            .into_iter()
            .find(|mode| mode.as_str().eq_ignore_ascii_case(name))
            .ok_or_else(|| ParseViewModeError(name.to_string()))
    }
}
