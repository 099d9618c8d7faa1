//! Fixed-capacity item containers.
//!
//! An inventory is a row of slots, each empty or holding a shared item
//! reference. The slot vector is allocated at creation and never grows, so
//! its length is always the capacity.

use std::rc::Rc;

use crate::catalog::Item;
use crate::error::{CoreError, CoreResult};

/// An ordered, fixed-capacity sequence of item slots.
#[derive(Debug, Clone, PartialEq)]
pub struct Inventory {
    slots: Vec<Option<Rc<Item>>>,
}

impl Inventory {
    /// Create an empty inventory with `capacity` slots.
    pub fn new(capacity: usize) -> Self {
        Self {
            slots: vec![None; capacity],
        }
    }

    /// Number of slots.
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Number of occupied slots.
    pub fn count(&self) -> usize {
        self.slots.iter().filter(|s| s.is_some()).count()
    }

    /// Returns true if no slot is empty.
    pub fn is_full(&self) -> bool {
        self.slots.iter().all(Option::is_some)
    }

    /// Returns true if every slot is empty.
    pub fn is_empty(&self) -> bool {
        self.slots.iter().all(Option::is_none)
    }

    /// All slots in order.
    pub fn slots(&self) -> &[Option<Rc<Item>>] {
        &self.slots
    }

    /// The occupied slots' items in order.
    pub fn items(&self) -> impl Iterator<Item = &Rc<Item>> {
        self.slots.iter().flatten()
    }

    /// The item in a slot, if the slot exists and is occupied.
    pub fn get(&self, index: usize) -> Option<&Rc<Item>> {
        self.slots.get(index).and_then(Option::as_ref)
    }

    /// Place an item in the lowest-index empty slot.
    ///
    /// Returns false, leaving every slot untouched, when the inventory is full.
    pub fn add(&mut self, item: Rc<Item>) -> bool {
        match self.slots.iter_mut().find(|s| s.is_none()) {
            Some(slot) => {
                *slot = Some(item);
                true
            }
            None => false,
        }
    }

    /// Assign a slot directly, overwriting whatever it held.
    ///
    /// Returns the previous content of the slot.
    pub fn set_slot(&mut self, index: usize, item: Option<Rc<Item>>) -> CoreResult<Option<Rc<Item>>> {
        let capacity = self.capacity();
        let slot = self
            .slots
            .get_mut(index)
            .ok_or(CoreError::SlotOutOfRange { index, capacity })?;
        Ok(std::mem::replace(slot, item))
    }

    /// Empty a slot and return what it held.
    pub fn take(&mut self, index: usize) -> CoreResult<Option<Rc<Item>>> {
        self.set_slot(index, None)
    }

    /// Swap two slots of this inventory.
    pub fn swap_slots(&mut self, a: usize, b: usize) -> CoreResult<()> {
        self.check_index(a)?;
        self.check_index(b)?;
        self.slots.swap(a, b);
        Ok(())
    }

    /// Returns true if any slot holds an item with this tag.
    pub fn contains(&self, tag: &str) -> bool {
        self.position(tag).is_some()
    }

    /// Index of the first slot holding an item with this tag.
    pub fn position(&self, tag: &str) -> Option<usize> {
        self.slots
            .iter()
            .position(|s| s.as_ref().is_some_and(|item| item.tag == tag))
    }

    /// Remove the first item with this tag.
    pub fn remove(&mut self, tag: &str) -> Option<Rc<Item>> {
        let index = self.position(tag)?;
        self.slots[index].take()
    }

    fn check_index(&self, index: usize) -> CoreResult<()> {
        if index < self.capacity() {
            Ok(())
        } else {
            Err(CoreError::SlotOutOfRange {
                index,
                capacity: self.capacity(),
            })
        }
    }
}

/// Exchange a slot of one inventory with a slot of another.
///
/// Both slots are read before either is written, so nothing is lost when
/// both hold items. Fails without mutating anything if an index is out of
/// range.
pub fn swap(a: &mut Inventory, index_a: usize, b: &mut Inventory, index_b: usize) -> CoreResult<()> {
    a.check_index(index_a)?;
    b.check_index(index_b)?;
    let from_a = a.slots[index_a].clone();
    let from_b = b.slots[index_b].clone();
    a.slots[index_a] = from_b;
    b.slots[index_b] = from_a;
    Ok(())
}
