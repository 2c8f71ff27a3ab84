use std::cmp::Ordering;

use tracing::{debug, info, warn};

use crate::error::InventoryError;
use crate::inventory::{Inventory, Item};

impl Inventory {
    /// Binary search for an exact (case-sensitive) name.
    ///
    /// Only allowed while the list is sorted by name; otherwise fails with
    /// [`InventoryError::NotSorted`] without comparing anything. The comparison counter
    /// restarts for each search that passes the guard, so after a miss
    /// [`Inventory::comparisons`] still reports the comparisons made.
    pub fn search_by_name(&mut self, target: &str) -> Result<(&Item, usize), InventoryError> {
        let (index, comparisons) = self.search_index_by_name(target)?;
        Ok((&self.items[index], comparisons))
    }

    /// Same as [`Inventory::search_by_name`], returning the position of the
    /// hit instead of the item.
    pub fn search_index_by_name(&mut self, target: &str) -> Result<(usize, usize), InventoryError> {
        if !self.sorted_by_name {
            warn!(wanted = target, "search rejected: not sorted by name");
            return Err(InventoryError::NotSorted);
        }
        self.comparisons = 0;

        // Signed bounds so `mid - 1` can go below zero and end the loop.
        let mut low: isize = 0;
        let mut high: isize = self.items.len() as isize - 1;
        while low <= high {
            let mid = (low + high) / 2;
            self.comparisons += 1;
            let candidate = &self.items[mid as usize];
            debug!(wanted = target, mid, candidate = %candidate.name, "compare");
            match target.as_bytes().cmp(candidate.name.as_bytes()) {
                Ordering::Equal => {
                    info!(wanted = target, comparisons = self.comparisons, "item found");
                    return Ok((mid as usize, self.comparisons));
                }
                Ordering::Less => high = mid - 1,
                Ordering::Greater => low = mid + 1,
            }
        }
        info!(wanted = target, comparisons = self.comparisons, "item not found");
        Err(InventoryError::NotFound(target.to_string()))
    }
}
