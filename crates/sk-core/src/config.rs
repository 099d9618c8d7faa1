//! Story configuration.
//!
//! Every field has a default, so a story file only needs to list the options
//! it changes.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::catalog::{Item, Stat};
use crate::error::{CoreError, CoreResult};
use crate::theme;

/// Options recognized in a story's configuration block.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StoryConfig {
    /// Text of the single choice offered once the character is dead.
    pub dead_message: String,
    /// Whether the presentation layer shows the character panel.
    pub display_character_panel: bool,
    /// Default panel theme for passages.
    pub passage_theme: String,
    /// Default theme for choice buttons.
    pub button_theme: String,
    /// Theme of the loot panel.
    pub chest_theme: String,
    /// Item catalog.
    pub items: Vec<Item>,
    /// Stat catalog.
    pub stats: Vec<Stat>,
    /// Stat whose exhaustion kills the character.
    pub health_stat: String,
    /// Stat spent in shops.
    pub currency_stat: String,
    /// Slots in the character's inventory.
    pub inventory_capacity: usize,
    /// Slots in a passage's loot inventory.
    pub loot_capacity: usize,
    /// Passage reached through the death choice. When unset, a built-in
    /// terminal passage is used.
    pub death_passage: Option<String>,
    /// Seed for script randomness.
    pub seed: u64,
}

impl Default for StoryConfig {
    fn default() -> Self {
        Self {
            dead_message: "You are dead".to_string(),
            display_character_panel: true,
            passage_theme: "parchment".to_string(),
            button_theme: "metal-blue".to_string(),
            chest_theme: "chest".to_string(),
            items: Vec::new(),
            stats: Vec::new(),
            health_stat: "health".to_string(),
            currency_stat: "gold".to_string(),
            inventory_capacity: 8,
            loot_capacity: 6,
            death_passage: None,
            seed: 42,
        }
    }
}

impl StoryConfig {
    /// Set the death choice text.
    pub fn with_dead_message(mut self, message: impl Into<String>) -> Self {
        self.dead_message = message.into();
        self
    }

    /// Add an item to the catalog.
    pub fn with_item(mut self, item: Item) -> Self {
        self.items.push(item);
        self
    }

    /// Add a stat to the catalog.
    pub fn with_stat(mut self, stat: Stat) -> Self {
        self.stats.push(stat);
        self
    }

    /// Set the character inventory size.
    pub fn with_inventory_capacity(mut self, capacity: usize) -> Self {
        self.inventory_capacity = capacity;
        self
    }

    /// Set the loot inventory size.
    pub fn with_loot_capacity(mut self, capacity: usize) -> Self {
        self.loot_capacity = capacity;
        self
    }

    /// Route the death choice to an authored passage.
    pub fn with_death_passage(mut self, name: impl Into<String>) -> Self {
        self.death_passage = Some(name.into());
        self
    }

    /// Set the script randomness seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Check theme names and catalog uniqueness.
    pub fn validate(&self) -> CoreResult<()> {
        for name in [&self.passage_theme, &self.button_theme, &self.chest_theme] {
            if !theme::is_theme(name) {
                return Err(CoreError::UnknownTheme(name.clone()));
            }
        }

        let mut tags = HashSet::new();
        for item in &self.items {
            if !tags.insert(item.tag.as_str()) {
                return Err(CoreError::Duplicate {
                    kind: "item",
                    key: item.tag.clone(),
                });
            }
        }

        let mut names = HashSet::new();
        for stat in &self.stats {
            if !names.insert(stat.name.as_str()) {
                return Err(CoreError::Duplicate {
                    kind: "stat",
                    key: stat.name.clone(),
                });
            }
        }

        Ok(())
    }
}
