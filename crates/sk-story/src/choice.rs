//! Choices offered to the player after a passage is shown.

use std::rc::Rc;

use sk_core::Passage;

/// Identifies a choice within one published set of choices.
///
/// Every transition publishes a new generation, so an id kept from an
/// earlier passage no longer matches anything.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ChoiceId {
    generation: u64,
    index: usize,
}

impl ChoiceId {
    pub(crate) fn new(generation: u64, index: usize) -> Self {
        Self { generation, index }
    }

    /// Position of the choice in its set.
    pub fn index(&self) -> usize {
        self.index
    }

    /// Transition count at which the choice was published.
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

/// What choosing does besides moving to the target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChoiceKind {
    /// An ordinary link.
    Link,
    /// The single choice offered to a dead character. Choosing it ends the
    /// story.
    Death,
}

/// A way out of the current passage.
#[derive(Debug, Clone)]
pub struct Choice {
    id: ChoiceId,
    target: Rc<Passage>,
    label: String,
    text: String,
    kind: ChoiceKind,
}

impl Choice {
    pub(crate) fn new(
        id: ChoiceId,
        target: Rc<Passage>,
        label: impl Into<String>,
        text: impl Into<String>,
        kind: ChoiceKind,
    ) -> Self {
        Self {
            id,
            target,
            label: label.into(),
            text: text.into(),
            kind,
        }
    }

    /// Handle to pass back to [`crate::Story::choose`].
    pub fn id(&self) -> ChoiceId {
        self.id
    }

    /// The passage this choice leads to.
    pub fn target(&self) -> &Rc<Passage> {
        &self.target
    }

    /// Label as written in the link.
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Label rendered as HTML.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// What kind of choice this is.
    pub fn kind(&self) -> ChoiceKind {
        self.kind
    }

    /// Returns true for the death choice.
    pub fn is_death(&self) -> bool {
        self.kind == ChoiceKind::Death
    }

    /// Button theme taken from the target's `button-*` tag, or `default`.
    pub fn theme<'a>(&'a self, default: &'a str) -> &'a str {
        self.target.button_theme(default)
    }
}
