//! Simulation Events
//!
//! Events generated while a step runs, for logging, presentation and replay
//! comparison. Events carry the step they were produced in and are emitted
//! in application order.

use serde::{Serialize, Deserialize};

use crate::core::vec2::Vec2;
use crate::game::character::Direction;
use crate::game::item::ItemId;
use crate::game::world::Coord;

/// Event payload.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum SimEventData {
    /// Character moved (or turned) this step
    CharacterMoved {
        /// Position before the step
        from: Vec2,
        /// Position after the step
        to: Vec2,
        /// Facing after the step
        direction: Direction,
    },

    /// Empty ground was tilled
    GroundTilled {
        /// Tilled tile
        pos: Coord,
    },

    /// Tilled ground reverted to empty
    GroundUntilled {
        /// Reverted tile
        pos: Coord,
    },

    /// Seed planted on tilled ground
    SeedPlanted {
        /// Planted tile
        pos: Coord,
        /// Crop that will grow
        crop: ItemId,
    },

    /// Mature crop harvested; the produce arrives next step
    CropHarvested {
        /// Harvested tile
        pos: Coord,
        /// Produce granted
        crop: ItemId,
    },

    /// Item went into an inventory slot
    ItemAdded {
        /// Added item
        item: ItemId,
        /// Flat slot index across all rows
        slot: usize,
    },

    /// Active row had no room
    ItemDropped {
        /// Item that was lost
        item: ItemId,
    },

    /// Coin counter changed
    CoinsChanged {
        /// Requested change
        delta: i64,
        /// Balance afterwards
        total: i64,
    },

    /// Day advanced; crops aged
    DayAdvanced {
        /// New day number
        day: u32,
        /// Crops that aged this day
        crops_grown: u32,
    },

    /// Hotbar cursor moved
    SelectionChanged {
        /// New hotbar slot
        selection: usize,
    },
}

/// A simulation event tagged with its step.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SimEvent {
    /// Step when the event occurred
    pub step: u64,

    /// Event data
    pub data: SimEventData,
}

impl SimEvent {
    /// Create a new event.
    pub fn new(step: u64, data: SimEventData) -> Self {
        Self { step, data }
    }

    /// Create character moved event.
    pub fn character_moved(step: u64, from: Vec2, to: Vec2, direction: Direction) -> Self {
        Self::new(step, SimEventData::CharacterMoved { from, to, direction })
    }

    /// Create ground tilled event.
    pub fn ground_tilled(step: u64, pos: Coord) -> Self {
        Self::new(step, SimEventData::GroundTilled { pos })
    }

    /// Create ground untilled event.
    pub fn ground_untilled(step: u64, pos: Coord) -> Self {
        Self::new(step, SimEventData::GroundUntilled { pos })
    }

    /// Create seed planted event.
    pub fn seed_planted(step: u64, pos: Coord, crop: ItemId) -> Self {
        Self::new(step, SimEventData::SeedPlanted { pos, crop })
    }

    /// Create crop harvested event.
    pub fn crop_harvested(step: u64, pos: Coord, crop: ItemId) -> Self {
        Self::new(step, SimEventData::CropHarvested { pos, crop })
    }

    /// Create item added event.
    pub fn item_added(step: u64, item: ItemId, slot: usize) -> Self {
        Self::new(step, SimEventData::ItemAdded { item, slot })
    }

    /// Create item dropped event.
    pub fn item_dropped(step: u64, item: ItemId) -> Self {
        Self::new(step, SimEventData::ItemDropped { item })
    }

    /// Create coins changed event.
    pub fn coins_changed(step: u64, delta: i64, total: i64) -> Self {
        Self::new(step, SimEventData::CoinsChanged { delta, total })
    }

    /// Create day advanced event.
    pub fn day_advanced(step: u64, day: u32, crops_grown: u32) -> Self {
        Self::new(step, SimEventData::DayAdvanced { day, crops_grown })
    }

    /// Create selection changed event.
    pub fn selection_changed(step: u64, selection: usize) -> Self {
        Self::new(step, SimEventData::SelectionChanged { selection })
    }

    /// True for events that change the tile grid.
    pub fn touches_grid(&self) -> bool {
        matches!(
            self.data,
            SimEventData::GroundTilled { .. }
                | SimEventData::GroundUntilled { .. }
                | SimEventData::SeedPlanted { .. }
                | SimEventData::CropHarvested { .. }
                | SimEventData::DayAdvanced { .. }
        )
    }
}
