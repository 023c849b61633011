//! Movement Resolution
//!
//! Frame-rate independent walking with axis-separated collision.
//!
//! The displacement for one movement input is `speed * dt` along the input
//! direction. Each axis is then tried on its own: clamped to the world, probed
//! against every obstacle, and dropped if it would push the hitbox into an
//! obstacle it was not already touching. Dropping axes independently is what
//! lets the character slide along a wall when walking diagonally into it.

use std::sync::Arc;

use crate::core::geometry::CollisionGeometry;
use crate::core::vec2::Vec2;
use crate::game::action::MoveInput;
use crate::game::character::{Character, Direction, MotionState};
use crate::{WORLD_HEIGHT, WORLD_WIDTH};

/// Longest displacement a single input can produce. No move inside the
/// world is longer, and it keeps `speed * dt` finite for any finite `dt`.
pub const MAX_STEP_LENGTH: f32 = WORLD_WIDTH + WORLD_HEIGHT;

/// Outcome of resolving one movement input.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ResolvedMove {
    /// Position after the move
    pub position: Vec2,
    /// Delta actually applied (after clamping and collision)
    pub delta: Vec2,
    /// Horizontal component was cancelled by an obstacle
    pub blocked_x: bool,
    /// Vertical component was cancelled by an obstacle
    pub blocked_y: bool,
}

/// Resolves movement against world bounds and collision geometry.
#[derive(Clone, Debug)]
pub struct MovementResolver {
    geometry: Arc<CollisionGeometry>,
    speed: f32,
    hitbox_size: f32,
}

impl MovementResolver {
    /// Create a resolver.
    pub fn new(geometry: Arc<CollisionGeometry>, speed: f32, hitbox_size: f32) -> Self {
        Self {
            geometry,
            speed,
            hitbox_size,
        }
    }

    /// Shared obstacle set.
    pub fn geometry(&self) -> &Arc<CollisionGeometry> {
        &self.geometry
    }

    /// Walking speed in pixels per second.
    pub fn speed(&self) -> f32 {
        self.speed
    }

    /// Resolve a move from `origin`; pure, touches no state.
    pub fn resolve(&self, origin: Vec2, input: MoveInput, elapsed_secs: f32) -> ResolvedMove {
        let length = (self.speed * elapsed_secs.max(0.0)).min(MAX_STEP_LENGTH);
        let scaled = input.to_vec2().scale_to_length(length);
        let max = Character::max_position();

        // Clamp each axis by rewriting its delta
        let target_x = (origin.x + scaled.x).clamp(0.0, max.x);
        let target_y = (origin.y + scaled.y).clamp(0.0, max.y);
        let mut delta = Vec2::new(target_x - origin.x, target_y - origin.y);

        let horizontal = Vec2::new(target_x, origin.y);
        let vertical = Vec2::new(origin.x, target_y);

        let origin_probe = Character::hitbox_at(origin, self.hitbox_size);
        let horizontal_probe = Character::hitbox_at(horizontal, self.hitbox_size);
        let vertical_probe = Character::hitbox_at(vertical, self.hitbox_size);

        let mut blocked_x = false;
        let mut blocked_y = false;
        for obstacle in self.geometry.obstacles() {
            if obstacle.intersects(&origin_probe) {
                continue;
            }
            if !blocked_x && delta.x != 0.0 && obstacle.intersects(&horizontal_probe) {
                delta.x = 0.0;
                blocked_x = true;
            }
            if !blocked_y && delta.y != 0.0 && obstacle.intersects(&vertical_probe) {
                delta.y = 0.0;
                blocked_y = true;
            }
        }

        // Take surviving axes from the clamped targets so rounding in the
        // delta can never leave the world bounds.
        let position = Vec2::new(
            if blocked_x { origin.x } else { target_x },
            if blocked_y { origin.y } else { target_y },
        );

        ResolvedMove {
            position,
            delta,
            blocked_x,
            blocked_y,
        }
    }

    /// Move `character` one input's worth, update facing, mark it walking.
    pub fn apply(&self, character: &mut Character, input: MoveInput, elapsed_secs: f32) -> ResolvedMove {
        let resolved = self.resolve(character.position, input, elapsed_secs);
        character.position = resolved.position;
        character.direction = Direction::from_input(character.direction, input);
        character.motion = MotionState::Walking;
        resolved
    }
}

// =============================================================================
// TESTS
// =============================================================================
