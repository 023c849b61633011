//! Input Aggregation
//!
//! Turns held and pressed keys into a frame's actions. Device capture lives
//! outside the crate; the host forwards press and release events and asks
//! for the actions once per frame.
//!
//! Opposing keys resolve by recency: holding Left, then pressing Right,
//! walks right until Right is released. One-shot keys (use item, next day,
//! hotbar slots) are consumed when read and ignored until released.

use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet};

use serde::{Serialize, Deserialize};

use crate::game::action::Action;
use crate::game::item::ItemKind;
use crate::game::step::Simulation;
use crate::ROW_LEN;

// =============================================================================
// KEY STACK
// =============================================================================

/// Held keys ordered by press time.
#[derive(Clone, Debug)]
pub struct KeyStack<K: Ord + Copy> {
    /// Key -> press sequence number (higher is more recent)
    held: BTreeMap<K, u64>,
    /// Consumed keys that must be released before they count again
    awaiting_release: BTreeSet<K>,
    sequence: u64,
}

impl<K: Ord + Copy> Default for KeyStack<K> {
    fn default() -> Self {
        Self {
            held: BTreeMap::new(),
            awaiting_release: BTreeSet::new(),
            sequence: 0,
        }
    }
}

impl<K: Ord + Copy> KeyStack<K> {
    /// Empty stack.
    pub fn new() -> Self {
        Self::default()
    }

    /// Key went down. Ignored while the key awaits release.
    pub fn append(&mut self, key: K) {
        if self.awaiting_release.contains(&key) {
            return;
        }
        self.sequence += 1;
        self.held.insert(key, self.sequence);
    }

    /// Key went up.
    pub fn remove(&mut self, key: K) {
        self.held.remove(&key);
        self.awaiting_release.remove(&key);
    }

    /// True if the key is held and not consumed.
    pub fn has(&self, key: K) -> bool {
        self.held.contains_key(&key)
    }

    /// Take a held key; it stays inactive until released.
    pub fn consume(&mut self, key: K) -> bool {
        if self.held.remove(&key).is_some() {
            self.awaiting_release.insert(key);
            true
        } else {
            false
        }
    }

    /// 1 if `a` was pressed more recently than `b`, -1 if `b` was, 0 if
    /// neither is held. A key that is not held loses to one that is.
    pub fn compare(&self, a: K, b: K) -> i32 {
        match (self.held.get(&a), self.held.get(&b)) {
            (None, None) => 0,
            (Some(_), None) => 1,
            (None, Some(_)) => -1,
            (Some(sa), Some(sb)) => match sa.cmp(sb) {
                Ordering::Greater => 1,
                Ordering::Less => -1,
                Ordering::Equal => 0,
            },
        }
    }

    /// Most recently pressed of `keys`, if any is held.
    pub fn highest(&self, keys: &[K]) -> Option<K> {
        keys.iter()
            .filter_map(|key| self.held.get(key).map(|seq| (*seq, *key)))
            .max_by_key(|(seq, _)| *seq)
            .map(|(_, key)| key)
    }

    /// Like [`KeyStack::highest`], consuming every held key of the set.
    pub fn highest_consume_all(&mut self, keys: &[K]) -> Option<K> {
        let highest = self.highest(keys);
        for key in keys {
            self.consume(*key);
        }
        highest
    }
}

// =============================================================================
// CONTROLS
// =============================================================================

/// Logical game keys.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Key {
    /// Walk up
    Up,
    /// Walk down
    Down,
    /// Walk left
    Left,
    /// Walk right
    Right,
    /// Hotbar slot key, `0..ROW_LEN`
    Slot(u8),
    /// Use the selected item on the tile under the character
    UseItem,
    /// Skip to the next day
    NextDay,
}

/// Key state plus the mapping from keys to actions.
#[derive(Clone, Debug, Default)]
pub struct Controls {
    keys: KeyStack<Key>,
}

impl Controls {
    /// No keys held.
    pub fn new() -> Self {
        Self::default()
    }

    /// Forward a key press.
    pub fn press(&mut self, key: Key) {
        self.keys.append(key);
    }

    /// Forward a key release.
    pub fn release(&mut self, key: Key) {
        self.keys.remove(key);
    }

    /// Underlying key stack.
    pub fn keys(&self) -> &KeyStack<Key> {
        &self.keys
    }

    /// Actions for this frame, given the current simulation state.
    pub fn frame_actions(&mut self, sim: &Simulation) -> Vec<Action> {
        let mut actions = Vec::new();

        let x = self.keys.compare(Key::Right, Key::Left);
        let y = self.keys.compare(Key::Down, Key::Up);
        if let Ok(action) = Action::move_character(x, y) {
            actions.push(action);
        }

        let slot_keys: Vec<Key> = (0..ROW_LEN as u8).map(Key::Slot).collect();
        if let Some(Key::Slot(index)) = self.keys.highest_consume_all(&slot_keys) {
            if let Ok(action) = Action::change_inventory_selection(index as usize) {
                actions.push(action);
            }
        }

        if self.keys.consume(Key::UseItem) {
            if let Some(action) = Self::use_selected_item(sim) {
                actions.push(action);
            }
        }

        if self.keys.consume(Key::NextDay) {
            actions.push(Action::increment_day());
        }

        actions
    }

    fn use_selected_item(sim: &Simulation) -> Option<Action> {
        let world = sim.world();
        let slot = world.inventory().selected()?;
        let item = world.catalog().get(slot.item())?;
        let pos = sim.character().closest_tile();

        match item.kind {
            ItemKind::Hoe => Some(Action::hoe_ground(pos)),
            ItemKind::Seed { .. } => Action::plant_seed(pos, item).ok(),
            ItemKind::Sword | ItemKind::Crop { .. } => None,
        }
    }
}
