//! Scene geometry the depth probe and the bullets can hit.

use bevy::math::{
    bounding::{Aabb3d, RayCast3d},
    Dir3, Vec2, Vec3, Vec3A,
};
use noiz::prelude::*;
use serde::{Deserialize, Serialize};

use crate::water::depth::RayQuery;

/// Refinement steps once a marched ray crosses the seabed.
const BISECTION_STEPS: u32 = 12;

/// Axis-aligned box as it appears in the sea configuration.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ObstacleBox {
    pub center: Vec3,
    pub half_size: Vec3,
}

impl ObstacleBox {
    pub fn new(center: Vec3, half_size: Vec3) -> Self {
        Self { center, half_size }
    }

    pub fn aabb(&self) -> Aabb3d {
        Aabb3d::new(self.center, self.half_size.abs())
    }
}

/// Islands, rocks and hulls approximated by boxes.
#[derive(Debug, Clone, Default)]
pub struct ObstacleScene {
    boxes: Vec<Aabb3d>,
}

impl ObstacleScene {
    pub fn new(obstacles: &[ObstacleBox]) -> Self {
        Self {
            boxes: obstacles.iter().map(ObstacleBox::aabb).collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.boxes.is_empty()
    }

    pub fn contains(&self, point: Vec3) -> bool {
        let point = Vec3A::from(point);
        self.boxes
            .iter()
            .any(|aabb| point.cmpge(aabb.min).all() && point.cmple(aabb.max).all())
    }
}

impl RayQuery for ObstacleScene {
    fn cast_ray(&self, origin: Vec3, direction: Dir3, max_distance: f32) -> Option<f32> {
        let ray = RayCast3d::new(origin, direction, max_distance);
        self.boxes
            .iter()
            .filter_map(|aabb| ray.aabb_intersection_at(aabb))
            .min_by(|a, b| a.total_cmp(b))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SeabedSettings {
    /// Mean seabed height, negative is below the water line
    pub base_height: f32,
    pub amplitude: f32,
    /// Horizontal noise frequency
    pub scale: f32,
    /// Ray march step length
    pub march_step: f32,
}

impl Default for SeabedSettings {
    fn default() -> Self {
        Self {
            base_height: -8.0,
            amplitude: 12.0,
            scale: 0.04,
            march_step: 0.5,
        }
    }
}

/// Rolling seabed made of Perlin noise; peaks above zero become islands.
pub struct NoiseSeabed {
    perlin: Noise<common_noise::Perlin>,
    settings: SeabedSettings,
}

impl NoiseSeabed {
    pub fn new(settings: SeabedSettings, seed: u32) -> Self {
        let mut perlin = Noise::<common_noise::Perlin>::default();
        perlin.set_seed(seed);
        Self { perlin, settings }
    }

    pub fn settings(&self) -> &SeabedSettings {
        &self.settings
    }

    pub fn height_at(&self, x: f32, z: f32) -> f32 {
        if self.settings.amplitude == 0.0 {
            return self.settings.base_height;
        }
        let sample_pos = Vec2::new(x * self.settings.scale, z * self.settings.scale);
        let noise = self.perlin.sample_for::<f32>(sample_pos);
        self.settings.base_height + self.settings.amplitude * noise
    }

    pub fn is_below(&self, point: Vec3) -> bool {
        point.y <= self.height_at(point.x, point.z)
    }
}

impl RayQuery for NoiseSeabed {
    fn cast_ray(&self, origin: Vec3, direction: Dir3, max_distance: f32) -> Option<f32> {
        let below = |t: f32| self.is_below(origin + direction * t);
        if below(0.0) {
            return Some(0.0);
        }

        let step = self.settings.march_step.max(0.01);
        let mut previous = 0.0;
        while previous < max_distance {
            let t = (previous + step).min(max_distance);
            if below(t) {
                let (mut lo, mut hi) = (previous, t);
                for _ in 0..BISECTION_STEPS {
                    let mid = 0.5 * (lo + hi);
                    if below(mid) {
                        hi = mid;
                    } else {
                        lo = mid;
                    }
                }
                return Some(hi);
            }
            previous = t;
        }
        None
    }
}

/// All collidable geometry of the sea: boxes plus an optional seabed.
#[derive(Default)]
pub struct SeaScene {
    pub obstacles: ObstacleScene,
    pub seabed: Option<NoiseSeabed>,
}

impl SeaScene {
    pub fn new(obstacles: ObstacleScene, seabed: Option<NoiseSeabed>) -> Self {
        Self { obstacles, seabed }
    }

    /// Whether `point` is inside solid geometry.
    pub fn collides(&self, point: Vec3) -> bool {
        self.obstacles.contains(point)
            || self
                .seabed
                .as_ref()
                .is_some_and(|seabed| seabed.is_below(point))
    }
}

impl RayQuery for SeaScene {
    fn cast_ray(&self, origin: Vec3, direction: Dir3, max_distance: f32) -> Option<f32> {
        let boxes = self.obstacles.cast_ray(origin, direction, max_distance);
        let seabed = self
            .seabed
            .as_ref()
            .and_then(|seabed| seabed.cast_ray(origin, direction, max_distance));

        match (boxes, seabed) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (hit, None) | (None, hit) => hit,
        }
    }
}
