//! Core primitives.
//!
//! Value types shared by the simulation: world-space vectors, collision
//! shapes, and snapshot hashing. Nothing here knows about game rules.

pub mod vec2;
pub mod geometry;
pub mod hash;

// Re-export core types
pub use vec2::Vec2;
pub use geometry::{CollisionGeometry, Polygon, Rect};
pub use hash::{HashField, StateHash, StateHasher, compute_state_hash};
