//! Backpack storage: the bounded, ordered item list.
//!
//! The [`Inventory`] owns the items together with the state that the sort and
//! search passes depend on: whether the list is currently ordered by name and
//! how many comparisons the last pass performed. Sorting lives in
//! [`crate::sort`], binary search in [`crate::search`].
use tracing::{info, warn};

use crate::error::InventoryError;

/// Maximum number of items the backpack holds.
pub const CAPACITY: usize = 10;

pub const MIN_PRIORITY: u8 = 1;
pub const MAX_PRIORITY: u8 = 5;

/// A single backpack entry.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Item {
    pub id: u32,
    pub name: String,
    /// Item category ("type" in the menu).
    pub kind: String,
    pub quantity: u32,
    /// Always within `MIN_PRIORITY..=MAX_PRIORITY`.
    pub priority: u8,
}

/// Clamp a raw priority into `MIN_PRIORITY..=MAX_PRIORITY`.
pub fn clamp_priority(raw: i64) -> u8 {
    raw.clamp(MIN_PRIORITY as i64, MAX_PRIORITY as i64) as u8
}

#[derive(Clone, Debug)]
pub struct Inventory {
    pub(crate) items: Vec<Item>,
    pub(crate) sorted_by_name: bool,
    pub(crate) comparisons: usize,
    /// Id handed to the next insert; never goes back down.
    next_id: u32,
}

impl Inventory {
    pub fn new() -> Self {
        Self {
            items: Vec::with_capacity(CAPACITY),
            sorted_by_name: false,
            comparisons: 0,
            next_id: 1,
        }
    }

    /// Append a new item and return its id.
    ///
    /// Ids start at 1 and increase by one per insert, so they equal `len + 1`
    /// until something is removed. Removed ids are not handed out again and
    /// survivors keep theirs. `priority` is clamped to 1..=5.
    pub fn insert(
        &mut self,
        name: impl Into<String>,
        kind: impl Into<String>,
        quantity: u32,
        priority: i64,
    ) -> Result<u32, InventoryError> {
        if self.is_full() {
            warn!(capacity = CAPACITY, "insert rejected: backpack full");
            return Err(InventoryError::Full);
        }
        let id = self.next_id;
        let item = Item {
            id,
            name: name.into(),
            kind: kind.into(),
            quantity,
            priority: clamp_priority(priority),
        };
        info!(id, name = %item.name, kind = %item.kind, quantity, priority = item.priority, "item added");
        self.items.push(item);
        self.next_id += 1;
        self.sorted_by_name = false;
        Ok(id)
    }

    /// Remove the first item whose name matches `name` exactly.
    ///
    /// Survivors keep their relative order. Returns the removed item.
    pub fn remove(&mut self, name: &str) -> Result<Item, InventoryError> {
        if self.items.is_empty() {
            warn!(item = name, "remove rejected: backpack empty");
            return Err(InventoryError::Empty);
        }
        let Some(pos) = self.items.iter().position(|it| it.name == name) else {
            warn!(item = name, "remove rejected: no such item");
            return Err(InventoryError::NotFound(name.to_string()));
        };
        let removed = self.items.remove(pos);
        self.sorted_by_name = false;
        info!(id = removed.id, item = name, remaining = self.items.len(), "item removed");
        Ok(removed)
    }

    /// Items in their current order. Empty when nothing has been added.
    pub fn list(&self) -> &[Item] {
        &self.items
    }

    pub fn get(&self, index: usize) -> Option<&Item> {
        self.items.get(index)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.items.len() >= CAPACITY
    }

    pub fn capacity(&self) -> usize {
        CAPACITY
    }

    /// True only while the list is known to be ordered by name, which is
    /// what [`Inventory::search_by_name`] requires.
    pub fn is_sorted_by_name(&self) -> bool {
        self.sorted_by_name
    }

    /// Comparisons performed by the most recent sort or search pass.
    pub fn comparisons(&self) -> usize {
        self.comparisons
    }
}

impl Default for Inventory {
    fn default() -> Self {
        Self::new()
    }
}
