//! The player character.

use std::collections::BTreeMap;
use std::rc::Rc;

use crate::catalog::{Item, Stat};
use crate::config::StoryConfig;
use crate::inventory::Inventory;

/// Mutable player state: stats, an inventory, and a derived death condition.
#[derive(Debug, Clone, PartialEq)]
pub struct Character {
    /// Items carried by the player.
    pub inventory: Inventory,
    stats: BTreeMap<String, i64>,
    health_stat: String,
    currency_stat: String,
}

impl Character {
    /// Create a character with every catalog stat at its initial value.
    pub fn new(config: &StoryConfig) -> Self {
        Self::from_stats(
            &config.stats,
            config.inventory_capacity,
            &config.health_stat,
            &config.currency_stat,
        )
    }

    /// Create a character from an explicit stat list.
    pub fn from_stats(stats: &[Stat], capacity: usize, health_stat: &str, currency_stat: &str) -> Self {
        Self {
            inventory: Inventory::new(capacity),
            stats: stats.iter().map(|s| (s.name.clone(), s.initial)).collect(),
            health_stat: health_stat.to_string(),
            currency_stat: currency_stat.to_string(),
        }
    }

    /// Current value of a stat, if the character has it.
    pub fn stat(&self, name: &str) -> Option<i64> {
        self.stats.get(name).copied()
    }

    /// All stats in name order.
    pub fn stats(&self) -> impl Iterator<Item = (&str, i64)> {
        self.stats.iter().map(|(k, v)| (k.as_str(), *v))
    }

    /// Set a stat, creating it if needed.
    pub fn set_stat(&mut self, name: impl Into<String>, value: i64) {
        self.stats.insert(name.into(), value);
    }

    /// Add a delta to a stat (missing stats start at 0). Returns the new value.
    pub fn adjust_stat(&mut self, name: &str, delta: i64) -> i64 {
        let value = self.stats.entry(name.to_string()).or_insert(0);
        *value = value.saturating_add(delta);
        *value
    }

    /// Name of the stat whose exhaustion kills the character.
    pub fn health_stat(&self) -> &str {
        &self.health_stat
    }

    /// Name of the stat spent in shops.
    pub fn currency_stat(&self) -> &str {
        &self.currency_stat
    }

    /// Current amount of currency (0 when the stat is missing).
    pub fn currency(&self) -> i64 {
        self.stat(&self.currency_stat).unwrap_or(0)
    }

    /// True once the health stat has dropped to zero or below.
    ///
    /// A character without a health stat cannot die.
    pub fn is_dead(&self) -> bool {
        self.stat(&self.health_stat).is_some_and(|hp| hp <= 0)
    }

    /// Returns true if the inventory holds an item with this tag.
    pub fn has_item(&self, tag: &str) -> bool {
        self.inventory.contains(tag)
    }

    /// Put an item in the first free inventory slot.
    pub fn give(&mut self, item: Rc<Item>) -> bool {
        self.inventory.add(item)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn character() -> Character {
        Character::from_stats(&[Stat::new("health", 3), Stat::new("gold", 10)], 2, "health", "gold")
    }

    #[test]
    fn stats_start_at_initial_values() {
        let c = character();
        assert_eq!(c.stat("health"), Some(3));
        assert_eq!(c.currency(), 10);
        assert_eq!(c.stat("mana"), None);
        assert_eq!(c.inventory.capacity(), 2);
    }

    #[test]
    fn dies_when_health_reaches_zero() {
        let mut c = character();
        assert!(!c.is_dead());
        c.adjust_stat("health", -3);
        assert!(c.is_dead());
        c.set_stat("health", -4);
        assert!(c.is_dead());
    }

    #[test]
    fn no_health_stat_means_immortal() {
        let c = Character::from_stats(&[Stat::new("gold", 0)], 1, "health", "gold");
        assert!(!c.is_dead());
    }

    #[test]
    fn adjust_creates_missing_stat() {
        let mut c = character();
        assert_eq!(c.adjust_stat("xp", 5), 5);
        assert_eq!(c.stats().count(), 3);
    }

    #[test]
    fn from_config() {
        let config = StoryConfig::default()
            .with_stat(Stat::new("health", 7))
            .with_inventory_capacity(4);
        let c = Character::new(&config);
        assert_eq!(c.stat("health"), Some(7));
        assert_eq!(c.inventory.capacity(), 4);
        assert_eq!(c.currency_stat(), "gold");
    }
}
