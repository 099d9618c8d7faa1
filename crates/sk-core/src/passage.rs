//! Authored passages.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::theme;

/// Unique numeric identifier of a passage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PassageId(pub u32);

impl fmt::Display for PassageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// An authored unit of story text. Never mutated once loaded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Passage {
    /// Unique identifier.
    pub pid: PassageId,
    /// Unique name, referenced by links and `story.show`.
    pub name: String,
    /// Tags, mostly used for theming.
    #[serde(default)]
    pub tags: Vec<String>,
    /// Raw templated markup.
    #[serde(default)]
    pub content: String,
}

impl Passage {
    /// Create a passage without tags.
    pub fn new(pid: u32, name: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            pid: PassageId(pid),
            name: name.into(),
            tags: Vec::new(),
            content: content.into(),
        }
    }

    /// Add a tag. Duplicate tags are ignored.
    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        let tag = tag.into();
        if !self.tags.contains(&tag) {
            self.tags.push(tag);
        }
        self
    }

    /// Check whether the passage carries a tag.
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }

    /// Panel theme selected by a `theme-*` tag, or `default`.
    pub fn theme<'a>(&'a self, default: &'a str) -> &'a str {
        theme::from_tags(&self.tags, theme::PANEL_PREFIX).unwrap_or(default)
    }

    /// Button theme selected by a `button-*` tag, or `default`.
    pub fn button_theme<'a>(&'a self, default: &'a str) -> &'a str {
        theme::from_tags(&self.tags, theme::BUTTON_PREFIX).unwrap_or(default)
    }
}

impl fmt::Display for Passage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn themes_fall_back_to_default() {
        let passage = Passage::new(1, "Cellar", "Dark.");
        assert_eq!(passage.theme("parchment"), "parchment");
        assert_eq!(passage.button_theme("metal-blue"), "metal-blue");

        let passage = passage.with_tag("theme-rock").with_tag("button-red");
        assert_eq!(passage.theme("parchment"), "rock");
        assert_eq!(passage.button_theme("metal-blue"), "red");
    }

    #[test]
    fn duplicate_tags_are_ignored() {
        let passage = Passage::new(1, "Cellar", "").with_tag("dark").with_tag("dark");
        assert_eq!(passage.tags.len(), 1);
        assert!(passage.has_tag("dark"));
    }

    #[test]
    fn deserializes_from_host_record() {
        let passage: Passage =
            serde_json::from_str(r#"{"pid": 3, "name": "Gate", "tags": ["theme-rock"], "content": "Hi"}"#)
                .unwrap();
        assert_eq!(passage.pid, PassageId(3));
        assert_eq!(passage.theme("black"), "rock");
    }
}
