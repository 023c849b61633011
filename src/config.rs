//! Simulation configuration.

use serde::{Serialize, Deserialize};

use crate::core::vec2::Vec2;
use crate::error::SimResult;
use crate::{CELL_SIZE, WORLD_HEIGHT, WORLD_WIDTH};

/// Tunables for a simulation session.
///
/// Every field has a default; a JSON document only needs the fields it
/// overrides.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    /// Walking speed in pixels per second
    pub character_speed: f32,
    /// Time per animation frame, in nanoseconds
    pub animation_interval_ns: u64,
    /// Hitbox shrink on each side relative to one cell (pixels)
    pub hitbox_inset: f32,
    /// Character spawn (sprite top-left, pixels)
    pub spawn: Vec2,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            character_speed: 150.0,
            animation_interval_ns: 250_000_000, // 4 frames per second
            hitbox_inset: 1.0,
            spawn: Vec2::new(WORLD_WIDTH / 2.0, WORLD_HEIGHT / 2.0),
        }
    }
}

impl SimConfig {
    /// Parse a (possibly partial) JSON config.
    pub fn from_json(json: &str) -> SimResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Hitbox side length in pixels.
    #[inline]
    pub fn hitbox_size(&self) -> f32 {
        (CELL_SIZE - 2.0 * self.hitbox_inset).max(1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SimError;

    #[test]
    fn test_default_config() {
        let config = SimConfig::default();
        assert_eq!(config.character_speed, 150.0);
        assert_eq!(config.animation_interval_ns, 250_000_000);
        assert_eq!(config.spawn, Vec2::new(320.0, 240.0));
        assert_eq!(config.hitbox_size(), 14.0);
    }

    #[test]
    fn test_partial_json_override() {
        let config = SimConfig::from_json(r#"{ "character_speed": 90.0 }"#).unwrap();
        assert_eq!(config.character_speed, 90.0);
        assert_eq!(config.animation_interval_ns, 250_000_000);

        let config = SimConfig::from_json(r#"{ "spawn": { "x": 100.0, "y": 100.0 } }"#).unwrap();
        assert_eq!(config.spawn, Vec2::new(100.0, 100.0));
    }

    #[test]
    fn test_malformed_json() {
        let result = SimConfig::from_json("{ character_speed: ");
        assert!(matches!(result, Err(SimError::MalformedData(_))));
    }
}
