use bevy::math::Vec3;
use serde::{Deserialize, Serialize};

use crate::constants::DEFAULT_SHIP_HEIGHT_SCALE;
use crate::water::WaterHeight;

fn default_height_scale() -> f32 {
    DEFAULT_SHIP_HEIGHT_SCALE
}

/// A hull that rides the sea surface, keeping its horizontal position.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Ship {
    pub position: Vec3,
    /// Exaggerates the wave height felt by the ship
    #[serde(default = "default_height_scale")]
    pub height_scale: f32,
}

impl Ship {
    pub fn new(position: Vec3) -> Self {
        Self {
            position,
            height_scale: DEFAULT_SHIP_HEIGHT_SCALE,
        }
    }

    pub fn with_height_scale(mut self, height_scale: f32) -> Self {
        self.height_scale = height_scale;
        self
    }

    pub fn float_on(&mut self, water: &impl WaterHeight) {
        self.position.y = water.height_at(self.position) * self.height_scale;
    }
}
