//! Insertion sort over the backpack with a selectable key.
//!
//! Every pass counts its comparisons on the inventory so the UI can show how
//! much work a sort did. Sorting by name is the only way to enable binary
//! search; any other key clears that state again.
use std::fmt::{Display, Formatter};
use std::str::FromStr;

use tracing::{debug, info};

use crate::error::InventoryError;
use crate::inventory::{Inventory, Item};

/// Field used to order the backpack.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum SortKey {
    /// Alphabetical by name.
    Name,
    /// Alphabetical by type.
    Type,
    /// Highest priority first.
    Priority,
}

impl SortKey {
    pub const ALL: [SortKey; 3] = [SortKey::Name, SortKey::Type, SortKey::Priority];

    pub fn label(self) -> &'static str {
        match self {
            SortKey::Name => "Name",
            SortKey::Type => "Type",
            SortKey::Priority => "Priority",
        }
    }

    /// Whether `held` has to move in front of `prev`.
    fn goes_before(self, held: &Item, prev: &Item) -> bool {
        match self {
            SortKey::Name => prev.name.as_bytes() > held.name.as_bytes(),
            SortKey::Type => prev.kind.as_bytes() > held.kind.as_bytes(),
            SortKey::Priority => prev.priority < held.priority,
        }
    }
}

impl Display for SortKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Menu numbering: 1 = name, 2 = type, 3 = priority.
impl TryFrom<u8> for SortKey {
    type Error = InventoryError;

    fn try_from(v: u8) -> Result<Self, Self::Error> {
        match v {
            1 => Ok(SortKey::Name),
            2 => Ok(SortKey::Type),
            3 => Ok(SortKey::Priority),
            other => Err(InventoryError::InvalidCriterion(other.to_string())),
        }
    }
}

impl FromStr for SortKey {
    type Err = InventoryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "name" => Ok(SortKey::Name),
            "type" => Ok(SortKey::Type),
            "priority" => Ok(SortKey::Priority),
            _ => Err(InventoryError::InvalidCriterion(s.to_string())),
        }
    }
}

impl Inventory {
    /// Sort the items in place by `key` and return the comparison count.
    ///
    /// Each backward comparison counts once, including the one that stops the
    /// scan. Leaves the list flagged as name-sorted only for [`SortKey::Name`].
    pub fn sort(&mut self, key: SortKey) -> usize {
        self.comparisons = 0;
        let items = &mut self.items;
        for i in 1..items.len() {
            let mut j = i;
            while j > 0 {
                self.comparisons += 1;
                if !key.goes_before(&items[j], &items[j - 1]) {
                    break;
                }
                items.swap(j, j - 1);
                j -= 1;
            }
            debug!(%key, index = i, slot = j, "placed item");
        }
        self.sorted_by_name = key == SortKey::Name;
        info!(%key, comparisons = self.comparisons, items = self.items.len(), "sorted backpack");
        self.comparisons
    }
}
