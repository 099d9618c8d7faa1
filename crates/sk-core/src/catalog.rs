//! Static catalog entries defined by the story configuration.

use std::fmt;

use serde::{Deserialize, Serialize};

/// An item definition. Items are immutable and shared by reference wherever
/// they are held.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    /// Unique tag used by scripts to refer to the item.
    pub tag: String,
    /// Display name.
    pub name: String,
    /// Sprite/theme class used by the presentation layer.
    #[serde(default)]
    pub theme: String,
    /// Nominal value of the item.
    #[serde(default)]
    pub value: i64,
}

impl Item {
    /// Create an item whose name equals its tag.
    pub fn new(tag: impl Into<String>) -> Self {
        let tag = tag.into();
        Self {
            name: tag.clone(),
            tag,
            theme: String::new(),
            value: 0,
        }
    }

    /// Set the display name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Set the theme.
    pub fn with_theme(mut self, theme: impl Into<String>) -> Self {
        self.theme = theme.into();
        self
    }

    /// Set the nominal value.
    pub fn with_value(mut self, value: i64) -> Self {
        self.value = value;
        self
    }
}

impl fmt::Display for Item {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// A stat definition, such as health or gold.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stat {
    /// Unique stat name.
    pub name: String,
    /// Value a fresh character starts with.
    #[serde(default)]
    pub initial: i64,
    /// Optional theme for the character panel.
    #[serde(default)]
    pub theme: Option<String>,
}

impl Stat {
    /// Create a stat with a starting value.
    pub fn new(name: impl Into<String>, initial: i64) -> Self {
        Self {
            name: name.into(),
            initial,
            theme: None,
        }
    }

    /// Set the theme.
    pub fn with_theme(mut self, theme: impl Into<String>) -> Self {
        self.theme = Some(theme.into());
        self
    }
}

impl fmt::Display for Stat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn item_defaults_name_to_tag() {
        let item = Item::new("sword");
        assert_eq!(item.name, "sword");
        assert_eq!(item.value, 0);

        let item = Item::new("sword").with_name("Rusty Sword").with_value(3);
        assert_eq!(item.to_string(), "Rusty Sword");
        assert_eq!(item.value, 3);
    }

    #[test]
    fn item_deserializes_with_missing_fields() {
        let item: Item = serde_json::from_str(r#"{"tag": "key", "name": "Old Key"}"#).unwrap();
        assert_eq!(item.tag, "key");
        assert!(item.theme.is_empty());
    }

    #[test]
    fn stat_builder() {
        let stat = Stat::new("health", 10).with_theme("red");
        assert_eq!(stat.initial, 10);
        assert_eq!(stat.theme.as_deref(), Some("red"));
    }
}
