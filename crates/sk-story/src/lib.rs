//! Story engine for Skein.
//!
//! A [`Story`] drives the player through authored passages. Showing a
//! passage runs its template, turns its `[[links]]` into [`Choice`]s,
//! renders the remaining markdown, and publishes the result together with
//! the loot and shop panels the template set up.

/// Choices offered after a passage is shown.
pub mod choice;
/// Error types for the story engine.
pub mod error;
/// Link token discovery.
pub mod link;
/// Markdown rendering.
pub mod markdown;
mod scope;
/// The story engine.
pub mod story;

pub use choice::{Choice, ChoiceId, ChoiceKind};
pub use error::{ErrorKind, StoryError, StoryResult};
pub use story::{MAX_REDIRECTS, SlotRef, Story};
