//! Game Logic Module
//!
//! Everything that knows the rules of the farm.
//!
//! ## Module Structure
//!
//! - `action`: Validated actions and their payload newtypes
//! - `queue`: FIFO feeding actions into the step
//! - `controls`: Key precedence and key-to-action mapping
//! - `character`: Character state and animation clock
//! - `movement`: Time-scaled movement with axis-separated collision
//! - `world`: Tile grid and the world action state machine
//! - `inventory`: Slots, stacking and selection
//! - `item`: Item definitions and the catalog
//! - `step`: Per-frame orchestration
//! - `snapshot`: Read-only view and state hash
//! - `replay`: Session recording and replay
//! - `events`: Per-step events

pub mod action;
pub mod queue;
pub mod controls;
pub mod character;
pub mod movement;
pub mod world;
pub mod inventory;
pub mod item;
pub mod step;
pub mod snapshot;
pub mod replay;
pub mod events;

// Re-export key types
pub use action::{Action, MoveInput, SlotIndex};
pub use queue::ActionQueue;
pub use controls::{Controls, Key, KeyStack};
pub use character::{Character, Direction, MotionState};
pub use movement::{MovementResolver, ResolvedMove};
pub use world::{Coord, Grid, Tile, WorldState};
pub use inventory::{AddOutcome, InventoryManager, ItemStack, Slot};
pub use item::{Item, ItemCatalog, ItemId, ItemKind, ItemType};
pub use step::{Simulation, StepResult};
pub use snapshot::{CharacterView, Snapshot};
pub use replay::{replay, Recording, RecordedFrame};
pub use events::{SimEvent, SimEventData};
