//! Priced item catalogs.
//!
//! A shop is created for a single passage. Buying moves the item into the
//! character's inventory and spends the character's currency stat.

use std::rc::Rc;

use crate::catalog::Item;
use crate::character::Character;
use crate::error::{CoreError, CoreResult};
use crate::inventory::Inventory;

/// One purchasable item.
#[derive(Debug, Clone, PartialEq)]
pub struct ShopEntry {
    item: Rc<Item>,
    price: i64,
    bought: bool,
}

impl ShopEntry {
    /// Create an unbought entry. Prices below zero are rejected.
    pub fn new(item: Rc<Item>, price: i64) -> CoreResult<Self> {
        if price < 0 {
            return Err(CoreError::NegativePrice {
                tag: item.tag.clone(),
                price,
            });
        }
        Ok(Self {
            item,
            price,
            bought: false,
        })
    }

    /// The item on sale.
    pub fn item(&self) -> &Rc<Item> {
        &self.item
    }

    /// Price in units of the currency stat. Never negative.
    pub fn price(&self) -> i64 {
        self.price
    }

    /// Set once the entry has been bought; it cannot be bought again.
    pub fn is_bought(&self) -> bool {
        self.bought
    }
}

/// An ordered list of shop entries.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Shop {
    entries: Vec<ShopEntry>,
}

impl Shop {
    /// Create an empty shop.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a new, unbought entry.
    pub fn add_item(&mut self, item: Rc<Item>, price: i64) -> CoreResult<()> {
        self.push(ShopEntry::new(item, price)?);
        Ok(())
    }

    /// Append an already validated entry.
    pub fn push(&mut self, entry: ShopEntry) {
        self.entries.push(entry);
    }

    /// All entries in order.
    pub fn entries(&self) -> &[ShopEntry] {
        &self.entries
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if the shop has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Inventory view for rendering: slot `i` holds entry `i`'s item until
    /// the entry is bought.
    pub fn inventory(&self) -> Inventory {
        let mut view = Inventory::new(self.entries.len());
        for (index, entry) in self.entries.iter().enumerate() {
            if !entry.bought {
                // Capacity equals the entry count, so the index is in range.
                let _ = view.set_slot(index, Some(Rc::clone(&entry.item)));
            }
        }
        view
    }

    /// True if the entry exists, is unbought, and the character can afford it.
    pub fn can_buy(&self, index: usize, character: &Character) -> bool {
        self.entries
            .get(index)
            .is_some_and(|e| !e.bought && character.currency() >= e.price)
    }

    /// Buy an entry for the character.
    ///
    /// Affordability is checked again at call time. The purchase fails with
    /// no state change when it is not affordable or when the character's
    /// inventory has no free slot.
    pub fn buy(&mut self, index: usize, character: &mut Character) -> bool {
        if !self.can_buy(index, character) {
            return false;
        }
        let entry = &mut self.entries[index];
        if !character.give(Rc::clone(&entry.item)) {
            return false;
        }
        let remaining = character.currency().saturating_sub(entry.price);
        let currency = character.currency_stat().to_string();
        character.set_stat(currency, remaining);
        entry.bought = true;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Stat;

    fn buyer(gold: i64, capacity: usize) -> Character {
        Character::from_stats(&[Stat::new("gold", gold)], capacity, "health", "gold")
    }

    fn potion_shop() -> Shop {
        let mut shop = Shop::new();
        shop.add_item(Rc::new(Item::new("potion")), 5).unwrap();
        shop
    }

    #[test]
    fn add_item_appends_unbought_entry() {
        let shop = potion_shop();
        assert_eq!(shop.len(), 1);
        assert_eq!(shop.entries()[0].price(), 5);
        assert!(!shop.entries()[0].is_bought());
    }

    #[test]
    fn can_buy_requires_currency() {
        let shop = potion_shop();
        assert!(shop.can_buy(0, &buyer(5, 1)));
        assert!(!shop.can_buy(0, &buyer(4, 1)));
        assert!(!shop.can_buy(1, &buyer(100, 1)));
    }

    #[test]
    fn buy_without_enough_currency_changes_nothing() {
        let mut shop = potion_shop();
        let mut c = buyer(4, 1);

        assert!(!shop.buy(0, &mut c));
        assert_eq!(c.currency(), 4);
        assert!(!shop.entries()[0].is_bought());
        assert!(c.inventory.is_empty());
    }

    #[test]
    fn buy_moves_item_and_deducts_price() {
        let mut shop = potion_shop();
        let mut c = buyer(12, 1);

        assert!(shop.buy(0, &mut c));
        assert_eq!(c.currency(), 7);
        assert!(shop.entries()[0].is_bought());
        assert!(c.has_item("potion"));
    }

    #[test]
    fn bought_entry_cannot_be_bought_again() {
        let mut shop = potion_shop();
        let mut c = buyer(20, 2);

        assert!(shop.buy(0, &mut c));
        assert!(!shop.can_buy(0, &c));
        assert!(!shop.buy(0, &mut c));
        assert_eq!(c.currency(), 15);
        assert_eq!(c.inventory.count(), 1);
    }

    #[test]
    fn full_inventory_blocks_purchase() {
        let mut shop = potion_shop();
        let mut c = buyer(20, 1);
        c.give(Rc::new(Item::new("rock")));

        assert!(!shop.buy(0, &mut c));
        assert_eq!(c.currency(), 20);
        assert!(!shop.entries()[0].is_bought());
    }

    #[test]
    fn inventory_view_hides_bought_entries() {
        let mut shop = potion_shop();
        shop.add_item(Rc::new(Item::new("map")), 1).unwrap();
        let mut c = buyer(1, 2);
        assert!(shop.buy(1, &mut c));

        let view = shop.inventory();
        assert_eq!(view.capacity(), 2);
        assert!(view.contains("potion"));
        assert!(view.get(1).is_none());
    }

    #[test]
    fn negative_price_is_rejected() {
        let mut shop = Shop::new();
        let err = shop.add_item(Rc::new(Item::new("sword")), -50).unwrap_err();
        assert!(matches!(err, CoreError::NegativePrice { price: -50, .. }));
        assert!(err.to_string().contains("\"sword\""));
        assert!(shop.is_empty());

        assert!(ShopEntry::new(Rc::new(Item::new("sword")), i64::MIN).is_err());
    }

    #[test]
    fn free_items_can_be_bought_without_currency() {
        let mut shop = Shop::new();
        shop.add_item(Rc::new(Item::new("leaflet")), 0).unwrap();
        let mut c = buyer(0, 1);

        assert!(shop.buy(0, &mut c));
        assert_eq!(c.currency(), 0);
        assert!(c.has_item("leaflet"));
    }

    #[test]
    fn largest_price_is_spent_without_overflow() {
        let mut shop = Shop::new();
        shop.add_item(Rc::new(Item::new("crown")), i64::MAX).unwrap();
        let mut c = buyer(i64::MAX, 1);

        assert!(shop.buy(0, &mut c));
        assert_eq!(c.currency(), 0);
    }
}
