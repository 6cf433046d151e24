//! Ballistic bullets integrated with explicit Euler steps.

use bevy::math::{Quat, Vec3};
use bevy::transform::components::Transform;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::constants::{DEFAULT_BULLET_GRAVITY, DEFAULT_BULLET_LIFETIME};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct BulletId(pub u64);

impl fmt::Display for BulletId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "bullet#{}", self.0)
    }
}

/// Shared by every bullet a gun fires.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BulletSettings {
    /// Downward acceleration (m/s²)
    pub gravity: f32,
    /// Seconds before the bullet is removed
    pub lifetime: f32,
}

impl Default for BulletSettings {
    fn default() -> Self {
        Self {
            gravity: DEFAULT_BULLET_GRAVITY,
            lifetime: DEFAULT_BULLET_LIFETIME,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bullet {
    pub position: Vec3,
    pub velocity: Vec3,
    /// Looks along the velocity
    pub rotation: Quat,
    pub gravity: f32,
    pub lifetime: f32,
    age: f32,
}

/// Rotation whose forward (-Z) points along `direction`, `None` for a zero vector.
pub fn look_rotation(direction: Vec3) -> Option<Quat> {
    let direction = direction.try_normalize()?;
    Some(Transform::IDENTITY.looking_to(direction, Vec3::Y).rotation)
}

impl Bullet {
    pub fn new(position: Vec3, velocity: Vec3, settings: &BulletSettings) -> Self {
        Self {
            position,
            velocity,
            rotation: look_rotation(velocity).unwrap_or(Quat::IDENTITY),
            gravity: settings.gravity,
            lifetime: settings.lifetime,
            age: 0.0,
        }
    }

    pub fn age(&self) -> f32 {
        self.age
    }

    pub fn forward(&self) -> Vec3 {
        self.rotation * Vec3::NEG_Z
    }

    /// Applies gravity, moves, re-aims along the new velocity and ages the bullet.
    pub fn integrate(&mut self, delta: f32) {
        self.velocity += Vec3::NEG_Y * self.gravity * delta;
        self.position += self.velocity * delta;
        if let Some(rotation) = look_rotation(self.velocity) {
            self.rotation = rotation;
        }
        self.age += delta;
    }

    pub fn is_expired(&self) -> bool {
        self.age >= self.lifetime
    }
}
