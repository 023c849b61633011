//! World State
//!
//! The tile grid plus everything else a world action can touch: inventory,
//! coins and the day counter. All mutation goes through
//! [`WorldState::apply_action`].
//!
//! Tile transitions:
//!
//! ```text
//! Empty      --hoe-->   TilledDirt
//! TilledDirt --hoe-->   Empty
//! TilledDirt --plant--> Crop(0)
//! Crop(age)  --day-->   Crop(min(age + 1, matures))
//! Crop(ripe) --hoe-->   TilledDirt   (+ AddItem(crop) next step)
//! ```

use std::fmt;
use std::sync::Arc;

use serde::{Serialize, Deserialize};
use tracing::{debug, info, warn};

use crate::error::{SimError, SimResult};
use crate::game::action::Action;
use crate::game::events::SimEvent;
use crate::game::inventory::{AddOutcome, InventoryManager};
use crate::game::item::{ItemCatalog, ItemId};
use crate::game::queue::ActionQueue;
use crate::{GRID_HEIGHT, GRID_WIDTH};

// =============================================================================
// COORD / TILE
// =============================================================================

/// Tile index on the grid (not a pixel position).
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Coord {
    /// Column, `0..GRID_WIDTH`
    pub x: u32,
    /// Row, `0..GRID_HEIGHT`
    pub y: u32,
}

impl Coord {
    /// Create a coordinate.
    #[inline]
    pub const fn new(x: u32, y: u32) -> Self {
        Self { x, y }
    }

    /// True if the coordinate lies on the grid.
    #[inline]
    pub fn in_grid(self) -> bool {
        self.x < GRID_WIDTH && self.y < GRID_HEIGHT
    }
}

impl fmt::Display for Coord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// State of one grid cell.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Tile {
    /// Untouched ground
    #[default]
    Empty,
    /// Hoed ground, ready for seeds
    TilledDirt,
    /// Something growing
    Crop {
        /// Days grown, never above the crop's maturity age
        age: u8,
        /// Crop item growing here
        crop: ItemId,
    },
}

// =============================================================================
// GRID
// =============================================================================

/// Row-major `GRID_WIDTH x GRID_HEIGHT` tile storage.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Grid {
    tiles: Vec<Tile>,
}

impl Default for Grid {
    fn default() -> Self {
        Self::new()
    }
}

impl Grid {
    /// All-empty grid.
    pub fn new() -> Self {
        Self {
            tiles: vec![Tile::Empty; (GRID_WIDTH * GRID_HEIGHT) as usize],
        }
    }

    #[inline]
    fn index(pos: Coord) -> Option<usize> {
        pos.in_grid()
            .then(|| (pos.y * GRID_WIDTH + pos.x) as usize)
    }

    /// Tile at `pos`, or `None` off the grid.
    #[inline]
    pub fn get(&self, pos: Coord) -> Option<&Tile> {
        Self::index(pos).map(|i| &self.tiles[i])
    }

    /// Tile at `pos`.
    ///
    /// # Panics
    ///
    /// Panics if `pos` is off the grid. Use [`Grid::get`] for untrusted
    /// coordinates.
    pub fn tile_at(&self, pos: Coord) -> Tile {
        match self.get(pos) {
            Some(tile) => *tile,
            None => panic!("tile {} is outside the {}x{} grid", pos, GRID_WIDTH, GRID_HEIGHT),
        }
    }

    fn slot_mut(&mut self, pos: Coord) -> SimResult<&mut Tile> {
        match Self::index(pos) {
            Some(i) => Ok(&mut self.tiles[i]),
            None => Err(SimError::MissingReference(format!(
                "tile {} is outside the {}x{} grid",
                pos, GRID_WIDTH, GRID_HEIGHT
            ))),
        }
    }

    /// Overwrite the tile at `pos`.
    pub fn set(&mut self, pos: Coord, tile: Tile) -> SimResult<()> {
        *self.slot_mut(pos)? = tile;
        Ok(())
    }

    /// Non-empty tiles with their coordinates, row-major.
    pub fn occupied(&self) -> impl Iterator<Item = (Coord, Tile)> + '_ {
        self.tiles.iter().enumerate().filter_map(|(i, tile)| {
            (*tile != Tile::Empty).then(|| {
                let i = i as u32;
                (Coord::new(i % GRID_WIDTH, i / GRID_WIDTH), *tile)
            })
        })
    }

    fn tiles_mut(&mut self) -> impl Iterator<Item = &mut Tile> {
        self.tiles.iter_mut()
    }
}

// =============================================================================
// WORLD STATE
// =============================================================================

/// Everything besides the character that actions mutate.
#[derive(Clone, Debug)]
pub struct WorldState {
    grid: Grid,
    inventory: InventoryManager,
    coins: i64,
    day: u32,
    catalog: Arc<ItemCatalog>,
}

impl WorldState {
    /// Fresh world: empty grid, empty inventory, no coins, day 0.
    pub fn new(catalog: Arc<ItemCatalog>) -> Self {
        Self {
            grid: Grid::new(),
            inventory: InventoryManager::new(),
            coins: 0,
            day: 0,
            catalog,
        }
    }

    /// Tile grid.
    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    /// Tile at `pos`; panics off the grid (see [`Grid::tile_at`]).
    pub fn tile_at(&self, pos: Coord) -> Tile {
        self.grid.tile_at(pos)
    }

    /// Inventory.
    pub fn inventory(&self) -> &InventoryManager {
        &self.inventory
    }

    /// Mutable inventory, for setup outside the action pipeline.
    pub fn inventory_mut(&mut self) -> &mut InventoryManager {
        &mut self.inventory
    }

    /// Coin counter.
    pub fn coins(&self) -> i64 {
        self.coins
    }

    /// Days elapsed.
    pub fn day(&self) -> u32 {
        self.day
    }

    /// Item catalog.
    pub fn catalog(&self) -> &Arc<ItemCatalog> {
        &self.catalog
    }

    /// Apply one world action.
    ///
    /// Follow-up actions go into `queue` and are drained by the next step.
    /// Events for whatever changed are appended to `events` tagged with
    /// `step`. Movement actions are ignored here; the character handles them.
    pub fn apply_action(
        &mut self,
        step: u64,
        action: &Action,
        queue: &mut ActionQueue,
        events: &mut Vec<SimEvent>,
    ) -> SimResult<()> {
        match action {
            Action::MoveCharacter(_) => {}

            Action::AddCoins(amount) => {
                self.coins = self.coins.saturating_add(*amount);
                debug!("Coins {:+} -> {}", amount, self.coins);
                events.push(SimEvent::coins_changed(step, *amount, self.coins));
            }

            Action::HoeGround(pos) => self.hoe_ground(step, *pos, queue, events)?,

            Action::PlantSeed { pos, seed } => self.plant_seed(step, *pos, *seed, events)?,

            Action::ChangeInventorySelection(selection) => {
                self.inventory.select(*selection);
                events.push(SimEvent::selection_changed(step, selection.get()));
            }

            Action::AddItem(id) => {
                let item = self.catalog.require(*id)?;
                match self.inventory.add_item(item, None) {
                    AddOutcome::Stacked(slot) | AddOutcome::Placed(slot) => {
                        events.push(SimEvent::item_added(step, *id, slot));
                    }
                    AddOutcome::Dropped => events.push(SimEvent::item_dropped(step, *id)),
                }
            }

            Action::IncrementDay => self.increment_day(step, events),
        }
        Ok(())
    }

    fn hoe_ground(
        &mut self,
        step: u64,
        pos: Coord,
        queue: &mut ActionQueue,
        events: &mut Vec<SimEvent>,
    ) -> SimResult<()> {
        let tile = self.grid.slot_mut(pos).map_err(|e| {
            warn!("Rejected HoeGround{}: off the grid", pos);
            e
        })?;

        match *tile {
            Tile::Empty => {
                *tile = Tile::TilledDirt;
                debug!("Tilled {}", pos);
                events.push(SimEvent::ground_tilled(step, pos));
            }
            Tile::TilledDirt => {
                *tile = Tile::Empty;
                debug!("Untilled {}", pos);
                events.push(SimEvent::ground_untilled(step, pos));
            }
            Tile::Crop { age, crop } => {
                let matures = self.catalog.require(crop)?.matures().unwrap_or(0);
                if age >= matures {
                    *tile = Tile::TilledDirt;
                    queue.enqueue(Action::add_item(crop));
                    info!("Harvested crop {} at {}", crop, pos);
                    events.push(SimEvent::crop_harvested(step, pos, crop));
                } else {
                    debug!("Crop at {} not ready ({}/{})", pos, age, matures);
                }
            }
        }
        Ok(())
    }

    fn plant_seed(
        &mut self,
        step: u64,
        pos: Coord,
        seed: ItemId,
        events: &mut Vec<SimEvent>,
    ) -> SimResult<()> {
        let crop = self.catalog.crop_for_seed(seed)?.id;
        let tile = self.grid.slot_mut(pos).map_err(|e| {
            warn!("Rejected PlantSeed{}: off the grid", pos);
            e
        })?;

        if *tile == Tile::TilledDirt {
            *tile = Tile::Crop { age: 0, crop };
            debug!("Planted {} at {}", crop, pos);
            events.push(SimEvent::seed_planted(step, pos, crop));
        } else {
            debug!("Cannot plant at {}: {:?}", pos, tile);
        }
        Ok(())
    }

    fn increment_day(&mut self, step: u64, events: &mut Vec<SimEvent>) {
        let catalog = &self.catalog;
        let mut grown = 0;
        for tile in self.grid.tiles_mut() {
            if let Tile::Crop { age, crop } = tile {
                let matures = catalog.get(*crop).and_then(|item| item.matures()).unwrap_or(0);
                if *age < matures {
                    *age += 1;
                    grown += 1;
                }
            }
        }

        self.day = self.day.saturating_add(1);
        info!("Day {} begins, {} crops grew", self.day, grown);
        events.push(SimEvent::day_advanced(step, self.day, grown));
    }
}

// =============================================================================
// TESTS
// =============================================================================
