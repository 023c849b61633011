//! Character State
//!
//! The player character: position, facing, motion state and the animation
//! clock. Position is the sprite's top-left corner; the sprite covers one
//! cell horizontally and two vertically.

use serde::{Serialize, Deserialize};

use crate::core::geometry::Rect;
use crate::core::vec2::Vec2;
use crate::game::action::MoveInput;
use crate::game::world::Coord;
use crate::{CELL_SIZE, GRID_HEIGHT, GRID_WIDTH, WORLD_HEIGHT, WORLD_WIDTH};

/// Number of frames in a walk cycle.
pub const ANIMATION_FRAMES: u8 = 4;

/// Offset of the hitbox center from the sprite's top-left (the feet).
pub const HITBOX_ANCHOR: Vec2 = Vec2::new(CELL_SIZE / 2.0, CELL_SIZE * 1.5);

// =============================================================================
// DIRECTION
// =============================================================================

/// Facing direction. Discriminants are animation row indices.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
#[derive(Default)]
pub enum Direction {
    /// Facing the camera
    #[default]
    Down = 0,
    /// Facing right
    Right = 1,
    /// Facing away
    Up = 2,
    /// Facing left
    Left = 3,
}

impl Direction {
    /// Derive facing from a movement input.
    ///
    /// The vertical axis is read first and the horizontal axis overrides it,
    /// so diagonal movement faces sideways.
    pub fn from_input(current: Direction, input: MoveInput) -> Direction {
        let mut direction = current;
        match input.y() {
            -1 => direction = Direction::Up,
            1 => direction = Direction::Down,
            _ => {}
        }
        match input.x() {
            -1 => direction = Direction::Left,
            1 => direction = Direction::Right,
            _ => {}
        }
        direction
    }

    /// Animation row index.
    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    /// Get direction from index (0-3).
    pub fn from_index(index: u8) -> Option<Direction> {
        match index {
            0 => Some(Direction::Down),
            1 => Some(Direction::Right),
            2 => Some(Direction::Up),
            3 => Some(Direction::Left),
            _ => None,
        }
    }
}

/// What the character is doing this step.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
#[derive(Default)]
pub enum MotionState {
    /// No movement this step
    #[default]
    Standing = 0,
    /// Moved this step
    Walking = 1,
    /// Reserved; never produced by the simulation
    Sitting = 2,
}

// =============================================================================
// CHARACTER
// =============================================================================

/// The player character.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Character {
    /// Sprite top-left in world pixels
    pub position: Vec2,
    /// Facing direction
    pub direction: Direction,
    /// Standing or walking this step
    pub motion: MotionState,
    /// Walk-cycle frame in `0..ANIMATION_FRAMES`
    pub animation_tick: u8,
    /// Nanoseconds accumulated toward the next animation frame
    pub accumulated_ns: u64,
}

impl Character {
    /// Spawn a character at `position`, clamped to the world.
    pub fn new(position: Vec2) -> Self {
        Self {
            position: position.clamp(Vec2::ZERO, Self::max_position()),
            direction: Direction::Down,
            motion: MotionState::Standing,
            animation_tick: 0,
            accumulated_ns: 0,
        }
    }

    /// Largest valid sprite position (the sprite is 1x2 cells).
    #[inline]
    pub fn max_position() -> Vec2 {
        Vec2::new(WORLD_WIDTH - CELL_SIZE, WORLD_HEIGHT - 2.0 * CELL_SIZE)
    }

    /// Check the world-bounds invariant.
    #[inline]
    pub fn in_bounds(&self) -> bool {
        self.position.is_within(Vec2::ZERO, Self::max_position())
    }

    /// Hitbox probe for a sprite at `position`.
    pub fn hitbox_at(position: Vec2, size: f32) -> Rect {
        Rect::from_center(position + HITBOX_ANCHOR, size, size)
    }

    /// Tile under the character's feet.
    pub fn closest_tile(&self) -> Coord {
        let anchor = self.position + HITBOX_ANCHOR;
        let x = (anchor.x / CELL_SIZE).floor().clamp(0.0, (GRID_WIDTH - 1) as f32);
        let y = (anchor.y / CELL_SIZE).floor().clamp(0.0, (GRID_HEIGHT - 1) as f32);
        Coord::new(x as u32, y as u32)
    }

    /// Advance the animation clock.
    ///
    /// Each full interval the accumulator crosses advances the frame; the
    /// remainder is carried into the next call. An accumulator exactly equal
    /// to the interval does not advance.
    pub fn advance_animation(&mut self, elapsed_ns: u64, interval_ns: u64) {
        if interval_ns == 0 {
            return;
        }
        self.accumulated_ns = self.accumulated_ns.saturating_add(elapsed_ns);
        if self.accumulated_ns <= interval_ns {
            return;
        }
        // Frames to advance so that interval_ns >= remainder > 0
        let frames = (self.accumulated_ns - 1) / interval_ns;
        self.accumulated_ns -= frames * interval_ns;
        let step = (frames % ANIMATION_FRAMES as u64) as u8;
        self.animation_tick = (self.animation_tick + step) % ANIMATION_FRAMES;
    }

    /// Sprite sheet cell `(row, column)` for the current pose.
    pub fn sprite_frame(&self) -> (usize, usize) {
        let row = self.direction.index();
        match self.motion {
            MotionState::Walking => (row, self.animation_tick as usize),
            MotionState::Standing | MotionState::Sitting => (row, 0),
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================
