//! Inventory
//!
//! A fixed number of slots split into rows of `ROW_LEN`. One row is active
//! (the hotbar) and a cursor selects a slot within it. Stackable items merge
//! into an existing stack anywhere in the inventory; new entries only ever
//! land in the active row, and when that row is full the add is dropped.

use serde::{Serialize, Deserialize};
use tracing::{debug, warn};

use crate::error::{SimError, SimResult};
use crate::game::action::SlotIndex;
use crate::game::item::{Item, ItemId};
use crate::{INVENTORY_ROWS, ROW_LEN};

/// Counted group of one stackable item. `count` is at least 1 while the
/// stack sits in a slot.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemStack {
    /// Stacked item
    pub item: ItemId,
    /// Items in the stack
    pub count: u32,
}

impl ItemStack {
    /// New stack.
    pub fn new(item: ItemId, count: u32) -> Self {
        Self { item, count }
    }

    /// Add to the stack.
    pub fn add(&mut self, count: u32) {
        self.count = self.count.saturating_add(count);
    }

    /// Remove up to `count`; returns how many were removed.
    pub fn remove(&mut self, count: u32) -> u32 {
        let removed = count.min(self.count);
        self.count -= removed;
        removed
    }
}

/// Contents of an occupied slot.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Slot {
    /// Non-stackable item
    Single(ItemId),
    /// Stack of a stackable item
    Stack(ItemStack),
}

impl Slot {
    /// Item held in the slot.
    pub fn item(&self) -> ItemId {
        match self {
            Slot::Single(item) => *item,
            Slot::Stack(stack) => stack.item,
        }
    }

    /// Quantity held (1 for a single item).
    pub fn count(&self) -> u32 {
        match self {
            Slot::Single(_) => 1,
            Slot::Stack(stack) => stack.count,
        }
    }
}

/// Result of an add.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AddOutcome {
    /// Merged into the stack at this slot
    Stacked(usize),
    /// Placed in this previously empty slot
    Placed(usize),
    /// No room in the active row; nothing changed
    Dropped,
}

/// Slot storage, stacking rules and selection cursor.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct InventoryManager {
    slots: Vec<Option<Slot>>,
    active_row: usize,
    slot_selection: usize,
}

impl Default for InventoryManager {
    fn default() -> Self {
        Self::new()
    }
}

impl InventoryManager {
    /// Empty inventory with `INVENTORY_ROWS` rows.
    pub fn new() -> Self {
        Self::with_rows(INVENTORY_ROWS)
    }

    /// Empty inventory with `rows` rows (at least one).
    pub fn with_rows(rows: usize) -> Self {
        Self {
            slots: vec![None; rows.max(1) * ROW_LEN],
            active_row: 0,
            slot_selection: 0,
        }
    }

    /// Number of rows.
    pub fn rows(&self) -> usize {
        self.slots.len() / ROW_LEN
    }

    /// Every slot, row-major.
    pub fn slots(&self) -> &[Option<Slot>] {
        &self.slots
    }

    /// Active row index.
    pub fn active_row(&self) -> usize {
        self.active_row
    }

    /// Switch the active row.
    pub fn set_active_row(&mut self, row: usize) -> SimResult<()> {
        if row >= self.rows() {
            return Err(SimError::InvalidArgument(format!(
                "inventory row must be in [0, {}] (got {})",
                self.rows() - 1,
                row
            )));
        }
        self.active_row = row;
        Ok(())
    }

    /// Cursor within the active row, in `[0, ROW_LEN)`.
    pub fn slot_selection(&self) -> usize {
        self.slot_selection
    }

    /// Move the cursor (the index is range-checked by construction).
    pub fn select(&mut self, selection: SlotIndex) {
        self.slot_selection = selection.get();
    }

    /// The `ROW_LEN` slots of the active row.
    pub fn current_items(&self) -> &[Option<Slot>] {
        let start = self.row_start();
        &self.slots[start..start + ROW_LEN]
    }

    /// Slot under the cursor.
    pub fn selected(&self) -> Option<&Slot> {
        self.slots[self.row_start() + self.slot_selection].as_ref()
    }

    /// Add one `item`, picking the slot automatically or using `slot`
    /// (an absolute slot index).
    pub fn add_item(&mut self, item: &Item, slot: Option<usize>) -> AddOutcome {
        let outcome = match slot {
            Some(index) => self.add_at(item, index),
            None => self.add_auto(item),
        };

        match outcome {
            AddOutcome::Dropped => {
                warn!("Inventory row {} full, dropped `{}`", self.active_row, item.name);
            }
            AddOutcome::Stacked(index) | AddOutcome::Placed(index) => {
                debug!("Added `{}` to slot {}", item.name, index);
            }
        }
        outcome
    }

    fn add_auto(&mut self, item: &Item) -> AddOutcome {
        if item.stackable {
            let existing = self.slots.iter_mut().enumerate().find_map(|(i, slot)| match slot {
                Some(Slot::Stack(stack)) if stack.item == item.id => Some((i, stack)),
                _ => None,
            });
            if let Some((index, stack)) = existing {
                stack.add(1);
                return AddOutcome::Stacked(index);
            }
        }

        let start = self.row_start();
        match self.slots[start..start + ROW_LEN].iter().position(Option::is_none) {
            Some(offset) => {
                let index = start + offset;
                self.slots[index] = Some(Self::fresh_slot(item));
                AddOutcome::Placed(index)
            }
            None => AddOutcome::Dropped,
        }
    }

    fn add_at(&mut self, item: &Item, index: usize) -> AddOutcome {
        match self.slots.get_mut(index) {
            Some(slot @ None) => {
                *slot = Some(Self::fresh_slot(item));
                AddOutcome::Placed(index)
            }
            Some(Some(Slot::Stack(stack))) if item.stackable && stack.item == item.id => {
                stack.add(1);
                AddOutcome::Stacked(index)
            }
            _ => AddOutcome::Dropped,
        }
    }

    fn fresh_slot(item: &Item) -> Slot {
        if item.stackable {
            Slot::Stack(ItemStack::new(item.id, 1))
        } else {
            Slot::Single(item.id)
        }
    }

    /// Remove up to `count` of `item` across all slots; returns how many
    /// were removed. Slots that reach zero are emptied immediately.
    pub fn remove_item(&mut self, item: ItemId, count: u32) -> u32 {
        let mut remaining = count;
        for slot in self.slots.iter_mut() {
            if remaining == 0 {
                break;
            }
            match slot {
                Some(Slot::Stack(stack)) if stack.item == item => {
                    remaining -= stack.remove(remaining);
                    if stack.count == 0 {
                        *slot = None;
                    }
                }
                Some(Slot::Single(single)) if *single == item => {
                    remaining -= 1;
                    *slot = None;
                }
                _ => {}
            }
        }
        count - remaining
    }

    /// Total quantity of `item` held.
    pub fn count_of(&self, item: ItemId) -> u32 {
        self.slots
            .iter()
            .flatten()
            .filter(|slot| slot.item() == item)
            .map(Slot::count)
            .sum()
    }

    #[inline]
    fn row_start(&self) -> usize {
        self.active_row * ROW_LEN
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::item::ItemKind;

    fn item(id: u32, stackable: bool) -> Item {
        Item {
            id: ItemId(id),
            name: format!("item-{}", id),
            kind: ItemKind::Sword,
            stackable,
            render_pos: "0".to_string(),
        }
    }

    #[test]
    fn test_non_stackable_fills_active_row() {
        let mut inventory = InventoryManager::new();
        let sword = item(1, false);

        assert_eq!(inventory.add_item(&sword, None), AddOutcome::Placed(0));
        assert_eq!(inventory.add_item(&sword, None), AddOutcome::Placed(1));
        assert_eq!(inventory.current_items()[0], Some(Slot::Single(ItemId(1))));
        assert_eq!(inventory.count_of(ItemId(1)), 2);
    }

    #[test]
    fn test_stackable_merges() {
        let mut inventory = InventoryManager::new();
        let seeds = item(2, true);

        assert_eq!(inventory.add_item(&seeds, None), AddOutcome::Placed(0));
        assert_eq!(inventory.add_item(&seeds, None), AddOutcome::Stacked(0));
        assert_eq!(inventory.add_item(&seeds, None), AddOutcome::Stacked(0));

        assert_eq!(
            inventory.current_items()[0],
            Some(Slot::Stack(ItemStack::new(ItemId(2), 3)))
        );
        assert_eq!(inventory.current_items()[1], None);
    }

    #[test]
    fn test_stack_found_outside_active_row() {
        let mut inventory = InventoryManager::new();
        let seeds = item(2, true);

        inventory.set_active_row(1).unwrap();
        assert_eq!(inventory.add_item(&seeds, None), AddOutcome::Placed(ROW_LEN));

        inventory.set_active_row(0).unwrap();
        assert_eq!(inventory.add_item(&seeds, None), AddOutcome::Stacked(ROW_LEN));
        assert!(inventory.current_items().iter().all(Option::is_none));
        assert_eq!(inventory.count_of(ItemId(2)), 2);
    }

    #[test]
    fn test_full_row_drops_silently() {
        let mut inventory = InventoryManager::new();
        for id in 0..ROW_LEN as u32 {
            inventory.add_item(&item(id, false), None);
        }
        let before = inventory.clone();

        assert_eq!(inventory.add_item(&item(50, false), None), AddOutcome::Dropped);
        assert_eq!(inventory.add_item(&item(51, true), None), AddOutcome::Dropped);
        assert_eq!(inventory, before);
    }

    #[test]
    fn test_full_row_still_stacks() {
        let mut inventory = InventoryManager::new();
        let seeds = item(2, true);
        inventory.add_item(&seeds, None);
        for id in 10..10 + ROW_LEN as u32 - 1 {
            inventory.add_item(&item(id, false), None);
        }

        assert_eq!(inventory.add_item(&seeds, None), AddOutcome::Stacked(0));
    }

    #[test]
    fn test_explicit_slot() {
        let mut inventory = InventoryManager::new();
        let seeds = item(2, true);
        let sword = item(1, false);

        assert_eq!(inventory.add_item(&seeds, Some(5)), AddOutcome::Placed(5));
        assert_eq!(inventory.add_item(&seeds, Some(5)), AddOutcome::Stacked(5));
        assert_eq!(inventory.add_item(&sword, Some(5)), AddOutcome::Dropped);
        assert_eq!(inventory.add_item(&sword, Some(999)), AddOutcome::Dropped);
    }

    #[test]
    fn test_selection_and_selected() {
        let mut inventory = InventoryManager::new();
        inventory.add_item(&item(1, false), None);

        assert_eq!(inventory.selected(), Some(&Slot::Single(ItemId(1))));

        inventory.select(SlotIndex::new(3).unwrap());
        assert_eq!(inventory.slot_selection(), 3);
        assert_eq!(inventory.selected(), None);
    }

    #[test]
    fn test_remove_prunes_empty_stacks() {
        let mut inventory = InventoryManager::new();
        let seeds = item(2, true);
        inventory.add_item(&seeds, None);
        inventory.add_item(&seeds, None);

        assert_eq!(inventory.remove_item(ItemId(2), 1), 1);
        assert_eq!(inventory.count_of(ItemId(2)), 1);

        assert_eq!(inventory.remove_item(ItemId(2), 5), 1);
        assert_eq!(inventory.current_items()[0], None);

        // Freed slot is reusable
        assert_eq!(inventory.add_item(&item(1, false), None), AddOutcome::Placed(0));
    }

    #[test]
    fn test_active_row_bounds() {
        let mut inventory = InventoryManager::new();
        assert_eq!(inventory.rows(), INVENTORY_ROWS);
        assert!(inventory.set_active_row(INVENTORY_ROWS - 1).is_ok());
        assert!(matches!(
            inventory.set_active_row(INVENTORY_ROWS),
            Err(SimError::InvalidArgument(_))
        ));
        assert_eq!(inventory.current_items().len(), ROW_LEN);
    }
}
