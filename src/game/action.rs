//! Actions
//!
//! Validated intents to change simulation state. Payloads that have a
//! restricted domain are wrapped in newtypes whose only constructors check
//! the domain, so an out-of-range action can never reach the queue.

use std::fmt;
use serde::{Serialize, Deserialize};

use crate::core::vec2::Vec2;
use crate::error::{SimError, SimResult};
use crate::game::item::{Item, ItemId};
use crate::game::world::Coord;
use crate::ROW_LEN;

// =============================================================================
// PAYLOADS
// =============================================================================

/// Movement input: each axis in {-1, 0, 1}, never both zero.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "(i32, i32)", into = "(i32, i32)")]
pub struct MoveInput {
    x: i8,
    y: i8,
}

impl MoveInput {
    /// Validate a movement vector.
    ///
    /// Fails with `InvalidArgument` if either component is outside
    /// {-1, 0, 1} or if both are zero.
    pub fn new(x: i32, y: i32) -> SimResult<Self> {
        let allowed = -1..=1;
        if !allowed.contains(&x) || !allowed.contains(&y) {
            return Err(SimError::InvalidArgument(format!(
                "movement components must be -1, 0 or 1 (got {}, {})",
                x, y
            )));
        }
        if x == 0 && y == 0 {
            return Err(SimError::InvalidArgument(
                "movement vector must not be zero".to_string(),
            ));
        }
        Ok(Self { x: x as i8, y: y as i8 })
    }

    /// Horizontal component (-1 left, 1 right).
    #[inline]
    pub fn x(self) -> i8 {
        self.x
    }

    /// Vertical component (-1 up, 1 down).
    #[inline]
    pub fn y(self) -> i8 {
        self.y
    }

    /// Raw (unnormalized) vector.
    #[inline]
    pub fn to_vec2(self) -> Vec2 {
        Vec2::new(self.x as f32, self.y as f32)
    }
}

impl TryFrom<(i32, i32)> for MoveInput {
    type Error = SimError;

    fn try_from((x, y): (i32, i32)) -> SimResult<Self> {
        Self::new(x, y)
    }
}

impl From<MoveInput> for (i32, i32) {
    fn from(input: MoveInput) -> Self {
        (input.x as i32, input.y as i32)
    }
}

/// Hotbar slot index in `[0, ROW_LEN)`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "usize", into = "usize")]
pub struct SlotIndex(u8);

impl SlotIndex {
    /// Validate a slot index.
    pub fn new(index: usize) -> SimResult<Self> {
        if index >= ROW_LEN {
            return Err(SimError::InvalidArgument(format!(
                "inventory selection must be in [0, {}] (got {})",
                ROW_LEN - 1,
                index
            )));
        }
        Ok(Self(index as u8))
    }

    /// Index within the active row.
    #[inline]
    pub fn get(self) -> usize {
        self.0 as usize
    }
}

impl TryFrom<usize> for SlotIndex {
    type Error = SimError;

    fn try_from(index: usize) -> SimResult<Self> {
        Self::new(index)
    }
}

impl From<SlotIndex> for usize {
    fn from(index: SlotIndex) -> Self {
        index.get()
    }
}

// =============================================================================
// ACTION
// =============================================================================

/// A discrete, validated intent, consumed exactly once by a simulation step.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Action {
    /// Adjust the coin counter (negative spends)
    AddCoins(i64),
    /// Walk one frame in a direction
    MoveCharacter(MoveInput),
    /// Till, un-till, or harvest a tile
    HoeGround(Coord),
    /// Plant a seed on tilled dirt
    PlantSeed {
        /// Target tile
        pos: Coord,
        /// Seed item (checked to be a seed at construction)
        seed: ItemId,
    },
    /// Move the hotbar cursor
    ChangeInventorySelection(SlotIndex),
    /// Put one item into the inventory
    AddItem(ItemId),
    /// Advance every crop by one day
    IncrementDay,
}

impl Action {
    /// Coin adjustment.
    pub fn add_coins(amount: i64) -> Self {
        Action::AddCoins(amount)
    }

    /// Movement action; see [`MoveInput::new`].
    pub fn move_character(x: i32, y: i32) -> SimResult<Self> {
        Ok(Action::MoveCharacter(MoveInput::new(x, y)?))
    }

    /// Hoe the tile at `pos`.
    pub fn hoe_ground(pos: Coord) -> Self {
        Action::HoeGround(pos)
    }

    /// Plant `seed` at `pos`. Fails with `InvalidArgument` if the item is
    /// not a seed.
    pub fn plant_seed(pos: Coord, seed: &Item) -> SimResult<Self> {
        if seed.plants().is_none() {
            return Err(SimError::InvalidArgument(format!(
                "`{}` is not a seed",
                seed.name
            )));
        }
        Ok(Action::PlantSeed { pos, seed: seed.id })
    }

    /// Hotbar selection; see [`SlotIndex::new`].
    pub fn change_inventory_selection(selection: usize) -> SimResult<Self> {
        Ok(Action::ChangeInventorySelection(SlotIndex::new(selection)?))
    }

    /// Give one `item`.
    pub fn add_item(item: ItemId) -> Self {
        Action::AddItem(item)
    }

    /// Advance one day.
    pub fn increment_day() -> Self {
        Action::IncrementDay
    }

    /// True for actions handled by the character rather than the world.
    #[inline]
    pub fn is_movement(&self) -> bool {
        matches!(self, Action::MoveCharacter(_))
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::AddCoins(amount) => write!(f, "AddCoins({})", amount),
            Action::MoveCharacter(input) => write!(f, "MoveCharacter({}, {})", input.x, input.y),
            Action::HoeGround(pos) => write!(f, "HoeGround{}", pos),
            Action::PlantSeed { pos, seed } => write!(f, "PlantSeed{} {}", pos, seed),
            Action::ChangeInventorySelection(slot) => {
                write!(f, "ChangeInventorySelection({})", slot.get())
            }
            Action::AddItem(item) => write!(f, "AddItem({})", item),
            Action::IncrementDay => write!(f, "IncrementDay"),
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::item::ItemKind;

    fn seed_item() -> Item {
        Item {
            id: ItemId(2),
            name: "Parsnip Seeds".to_string(),
            kind: ItemKind::Seed { plants: ItemId(3) },
            stackable: true,
            render_pos: "0".to_string(),
        }
    }

    #[test]
    fn test_move_input_domain() {
        for x in -1..=1 {
            for y in -1..=1 {
                let result = MoveInput::new(x, y);
                if x == 0 && y == 0 {
                    assert!(result.is_err());
                } else {
                    let input = result.unwrap();
                    assert_eq!((input.x() as i32, input.y() as i32), (x, y));
                }
            }
        }

        assert!(matches!(MoveInput::new(2, 0), Err(SimError::InvalidArgument(_))));
        assert!(matches!(MoveInput::new(0, -5), Err(SimError::InvalidArgument(_))));
        assert!(matches!(Action::move_character(1, 2), Err(SimError::InvalidArgument(_))));
    }

    #[test]
    fn test_selection_domain() {
        let action = Action::change_inventory_selection(3).unwrap();
        assert_eq!(action, Action::ChangeInventorySelection(SlotIndex(3)));
        assert!(Action::change_inventory_selection(11).is_ok());
        assert!(matches!(
            Action::change_inventory_selection(12),
            Err(SimError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_plant_seed_requires_seed() {
        let seed = seed_item();
        let pos = Coord::new(4, 5);
        assert_eq!(
            Action::plant_seed(pos, &seed).unwrap(),
            Action::PlantSeed { pos, seed: ItemId(2) }
        );

        let hoe = Item {
            id: ItemId(0),
            name: "Hoe".to_string(),
            kind: ItemKind::Hoe,
            stackable: false,
            render_pos: "0".to_string(),
        };
        assert!(matches!(Action::plant_seed(pos, &hoe), Err(SimError::InvalidArgument(_))));
    }

    #[test]
    fn test_deserialize_validates() {
        let ok: Action = serde_json::from_str(r#"{"MoveCharacter":[1,-1]}"#).unwrap();
        assert_eq!(ok, Action::move_character(1, -1).unwrap());

        let bad = serde_json::from_str::<Action>(r#"{"MoveCharacter":[3,0]}"#);
        assert!(bad.is_err());

        let bad = serde_json::from_str::<Action>(r#"{"ChangeInventorySelection":12}"#);
        assert!(bad.is_err());
    }

    #[test]
    fn test_is_movement() {
        assert!(Action::move_character(0, 1).unwrap().is_movement());
        assert!(!Action::increment_day().is_movement());
    }
}
