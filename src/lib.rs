//! # Farmstead Simulation Core
//!
//! Frame-stepped simulation for a small top-down farming game.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                    FARMSTEAD SIM                             │
//! ├─────────────────────────────────────────────────────────────┤
//! │  core/            - Rule-free primitives                     │
//! │  ├── vec2.rs      - 2D float vector (pixel space)            │
//! │  ├── geometry.rs  - Rects, polygons, overlap test            │
//! │  └── hash.rs      - Snapshot hashing                         │
//! │                                                              │
//! │  game/            - Farm rules                               │
//! │  ├── action.rs    - Validated actions                        │
//! │  ├── queue.rs     - Action FIFO                              │
//! │  ├── controls.rs  - Keys to actions                          │
//! │  ├── character.rs - Position, facing, animation              │
//! │  ├── movement.rs  - Axis-separated collision                 │
//! │  ├── world.rs     - Tile state machine, coins, day           │
//! │  ├── inventory.rs - Slots and stacks                         │
//! │  ├── item.rs      - Item catalog                             │
//! │  ├── step.rs      - Per-frame orchestration                  │
//! │  ├── snapshot.rs  - Read-only view                           │
//! │  └── replay.rs    - Recording and replay                     │
//! │                                                              │
//! │  config.rs        - Session tunables                         │
//! │  error.rs         - Error type                               │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Frame Model
//!
//! The host collects actions for a frame, submits them, then calls
//! [`Simulation::step`] with the frame time:
//! - Every pending action is drained at the start of the step
//! - Movement applies to the character before anything touches the world
//! - Actions produced during a step (harvest rewards) run next step
//!
//! Given the same inputs and frame times the simulation produces the same
//! state, so a [`Recording`](game::Recording) can be replayed and its
//! snapshot hash compared with the live session's.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]

pub mod config;
pub mod core;
pub mod error;
pub mod game;

// Re-export commonly used types
pub use config::SimConfig;
pub use crate::core::geometry::{CollisionGeometry, Polygon, Rect};
pub use crate::core::vec2::Vec2;
pub use error::{SimError, SimResult};
pub use game::action::Action;
pub use game::step::{Simulation, StepResult};
pub use game::snapshot::Snapshot;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Side of one grid cell, in pixels
pub const CELL_SIZE: f32 = 16.0;

/// Grid width in cells
pub const GRID_WIDTH: u32 = 40;

/// Grid height in cells
pub const GRID_HEIGHT: u32 = 30;

/// World width in pixels
pub const WORLD_WIDTH: f32 = GRID_WIDTH as f32 * CELL_SIZE;

/// World height in pixels
pub const WORLD_HEIGHT: f32 = GRID_HEIGHT as f32 * CELL_SIZE;

/// Slots per inventory row (the hotbar width)
pub const ROW_LEN: usize = 12;

/// Inventory rows
pub const INVENTORY_ROWS: usize = 3;

/// Frame rate the demo driver targets
pub const TARGET_FPS: u32 = 120;
