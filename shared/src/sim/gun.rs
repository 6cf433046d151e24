use bevy::color::LinearRgba;
use bevy::math::{EulerRot, Quat, Vec3};
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::constants::{GUN_MAX_INITIAL_DELAY, GUN_SPREAD_DEGREES};
use crate::sim::projectile::{Bullet, BulletSettings};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GunSettings {
    pub position: Vec3,
    pub rotation: Quat,
    /// Seconds between shots
    pub cooldown: f32,
    pub muzzle_velocity: f32,
    /// Trajectory preview color
    pub color: LinearRgba,
}

impl Default for GunSettings {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            cooldown: 1.0,
            muzzle_velocity: 20.0,
            color: LinearRgba::WHITE,
        }
    }
}

/// Fires a bullet every `cooldown` seconds with a small random spread.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Gun {
    pub position: Vec3,
    pub rotation: Quat,
    pub cooldown: f32,
    pub muzzle_velocity: f32,
    pub color: LinearRgba,
    last_fire: f32,
}

impl Gun {
    /// The first shot is staggered by a random delay.
    pub fn new(settings: &GunSettings, rng: &mut impl Rng) -> Self {
        Self::with_last_fire(settings, rng.gen_range(0.0..GUN_MAX_INITIAL_DELAY))
    }

    pub fn with_last_fire(settings: &GunSettings, last_fire: f32) -> Self {
        Self {
            position: settings.position,
            rotation: settings.rotation,
            cooldown: settings.cooldown,
            muzzle_velocity: settings.muzzle_velocity,
            color: settings.color,
            last_fire,
        }
    }

    pub fn last_fire(&self) -> f32 {
        self.last_fire
    }

    pub fn forward(&self) -> Vec3 {
        self.rotation * Vec3::NEG_Z
    }

    pub fn is_ready(&self, now: f32) -> bool {
        now - self.last_fire > self.cooldown
    }

    pub fn fire_if_ready(
        &mut self,
        now: f32,
        rng: &mut impl Rng,
        bullet: &BulletSettings,
    ) -> Option<Bullet> {
        if !self.is_ready(now) {
            return None;
        }

        let velocity = muzzle_jitter(rng) * self.forward() * self.muzzle_velocity;
        self.last_fire = now;
        Some(Bullet::new(self.position, velocity, bullet))
    }

    /// Coarse ballistic preview: `steps` one-second segments without spread.
    pub fn trajectory_preview(&self, gravity: f32, steps: usize) -> Vec<(Vec3, Vec3)> {
        let mut position = self.position;
        let mut velocity = self.forward() * self.muzzle_velocity;
        let mut segments = Vec::with_capacity(steps);

        for _ in 0..steps {
            segments.push((position, position + velocity));
            position += velocity;
            velocity += Vec3::NEG_Y * gravity;
        }
        segments
    }
}

/// Random rotation with every Euler angle in `[-GUN_SPREAD_DEGREES, GUN_SPREAD_DEGREES]`.
pub fn muzzle_jitter(rng: &mut impl Rng) -> Quat {
    let mut angle = || {
        rng.gen_range(-GUN_SPREAD_DEGREES..=GUN_SPREAD_DEGREES)
            .to_radians()
    };
    let (x, y, z) = (angle(), angle(), angle());
    Quat::from_euler(EulerRot::YXZ, y, x, z)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, SeedableRng};

    fn settings() -> GunSettings {
        GunSettings {
            position: Vec3::new(0.0, 2.0, 0.0),
            cooldown: 0.5,
            muzzle_velocity: 30.0,
            ..Default::default()
        }
    }

    #[test]
    fn test_initial_delay_in_range() {
        let mut rng = StdRng::seed_from_u64(3);
        for _ in 0..50 {
            let gun = Gun::new(&settings(), &mut rng);
            assert!((0.0..GUN_MAX_INITIAL_DELAY).contains(&gun.last_fire()));
        }
    }

    #[test]
    fn test_respects_cooldown() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut gun = Gun::with_last_fire(&settings(), 0.0);
        let bullet = BulletSettings::default();

        assert!(gun.fire_if_ready(0.5, &mut rng, &bullet).is_none());
        assert!(gun.fire_if_ready(0.51, &mut rng, &bullet).is_some());
        assert_eq!(gun.last_fire(), 0.51);
        assert!(gun.fire_if_ready(0.9, &mut rng, &bullet).is_none());
        assert!(gun.fire_if_ready(1.2, &mut rng, &bullet).is_some());
    }

    #[test]
    fn test_spread_stays_small() {
        let mut rng = StdRng::seed_from_u64(9);
        let mut gun = Gun::with_last_fire(&settings(), -10.0);
        let bullet_settings = BulletSettings::default();
        for shot in 0..40 {
            let now = shot as f32;
            let bullet = gun
                .fire_if_ready(now, &mut rng, &bullet_settings)
                .unwrap();
            assert_eq!(bullet.position, Vec3::new(0.0, 2.0, 0.0));
            assert!((bullet.velocity.length() - 30.0).abs() < 1e-3);
            // three 5° rotations can't deviate by more than 15°
            let angle = bullet.velocity.angle_between(Vec3::NEG_Z).to_degrees();
            assert!(angle <= 15.0, "spread {angle}");
        }
    }

    #[test]
    fn test_trajectory_preview() {
        let gun = Gun::with_last_fire(&settings(), 0.0);
        let segments = gun.trajectory_preview(10.0, 3);
        assert_eq!(segments.len(), 3);
        assert_eq!(segments[0], (Vec3::new(0.0, 2.0, 0.0), Vec3::new(0.0, 2.0, -30.0)));
        assert_eq!(segments[1].0, segments[0].1);
        assert_eq!(segments[1].1, Vec3::new(0.0, -8.0, -60.0));
        assert_eq!(segments[2].1, Vec3::new(0.0, -28.0, -90.0));
    }
}
