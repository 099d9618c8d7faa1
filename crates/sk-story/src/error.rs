//! Error types for the story engine.

use sk_core::{CoreError, PassageId};
use sk_script::ScriptError;
use thiserror::Error;

/// Result type for story operations.
pub type StoryResult<T> = Result<T, StoryError>;

/// How a published story error affects play.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// A passage failed to render and the transition was aborted. The story
    /// is stuck on the previous passage until it is restarted.
    Transition,
    /// A link named a missing passage. The passage was still shown.
    Link,
}

/// Errors that can occur while driving a story.
#[derive(Debug, Error)]
pub enum StoryError {
    /// No passage has this name.
    #[error("Couldn't find passage with name \"{0}\"")]
    PassageNotFound(String),

    /// A link in passage text names a passage that does not exist.
    #[error("Couldn't find any passage with the name \"{0}\"")]
    LinkTargetNotFound(String),

    /// No catalog item has this tag.
    #[error("Couldn't find item with tag \"{0}\"")]
    ItemNotFound(String),

    /// No catalog stat has this name.
    #[error("Couldn't find stat with name \"{0}\"")]
    StatNotFound(String),

    /// The story file contains no passages.
    #[error("story has no passages")]
    EmptyStory,

    /// A passage kept redirecting to other passages.
    #[error("too many redirects, last target was \"{0}\"")]
    TooManyRedirects(String),

    /// The current passage has no loot panel.
    #[error("there is nothing to loot here")]
    NoLoot,

    /// A passage id that is not part of the story.
    #[error("unknown passage {0}")]
    UnknownPassage(PassageId),

    /// Data model error.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// Template compilation or execution error.
    #[error(transparent)]
    Script(#[from] ScriptError),
}

impl From<StoryError> for ScriptError {
    fn from(err: StoryError) -> Self {
        match err {
            StoryError::Script(inner) => inner,
            other => ScriptError::Host(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_messages() {
        assert_eq!(
            StoryError::PassageNotFound("Cave".into()).to_string(),
            "Couldn't find passage with name \"Cave\""
        );
        assert_eq!(
            StoryError::LinkTargetNotFound("missing".into()).to_string(),
            "Couldn't find any passage with the name \"missing\""
        );
        assert_eq!(
            StoryError::ItemNotFound("sword".into()).to_string(),
            "Couldn't find item with tag \"sword\""
        );
        assert_eq!(
            StoryError::StatNotFound("mana".into()).to_string(),
            "Couldn't find stat with name \"mana\""
        );
    }

    #[test]
    fn story_errors_become_host_errors_in_scripts() {
        let err: ScriptError = StoryError::ItemNotFound("gem".into()).into();
        assert_eq!(err.to_string(), "Couldn't find item with tag \"gem\"");
    }
}
