//! Depth-colored variant of the sea mesh.
//!
//! Every cell corner is probed with a downward ray against the scene. The
//! resulting depth goes into the second UV component and is mapped through a
//! color gradient into the vertex color.

use bevy::color::{ColorToComponents, LinearRgba};
use bevy::math::{Dir3, Vec3};
use log::debug;

use crate::constants::PROBE_HEIGHT;
use crate::water::gradient::ColorGradient;
use crate::water::mesh::{build_sea_mesh_with, WaterMeshData};

/// Ray intersection against scene geometry.
pub trait RayQuery {
    /// Distance along `direction` to the first surface within `max_distance`.
    fn cast_ray(&self, origin: Vec3, direction: Dir3, max_distance: f32) -> Option<f32>;
}

impl<Q: RayQuery + ?Sized> RayQuery for &Q {
    fn cast_ray(&self, origin: Vec3, direction: Dir3, max_distance: f32) -> Option<f32> {
        (**self).cast_ray(origin, direction, max_distance)
    }
}

impl<Q: RayQuery + ?Sized> RayQuery for Box<Q> {
    fn cast_ray(&self, origin: Vec3, direction: Dir3, max_distance: f32) -> Option<f32> {
        (**self).cast_ray(origin, direction, max_distance)
    }
}

/// Scene with no geometry at all, everything is open water.
#[derive(Debug, Clone, Copy, Default)]
pub struct OpenWater;

impl RayQuery for OpenWater {
    fn cast_ray(&self, _origin: Vec3, _direction: Dir3, _max_distance: f32) -> Option<f32> {
        None
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DepthProbe {
    pub max_water_depth: f32,
}

impl DepthProbe {
    pub fn new(max_water_depth: f32) -> Self {
        Self { max_water_depth }
    }

    /// Depth below `vertex`, or `None` when the ray found no bottom.
    pub fn sample(&self, query: &impl RayQuery, vertex: Vec3) -> Option<f32> {
        let origin = vertex + Vec3::Y * PROBE_HEIGHT;
        query
            .cast_ray(origin, Dir3::NEG_Y, self.max_water_depth + PROBE_HEIGHT)
            .map(|distance| (distance - PROBE_HEIGHT).max(0.0))
    }

    /// Positive water depth below `vertex`. A miss counts as the deepest water.
    pub fn depth_at(&self, query: &impl RayQuery, vertex: Vec3) -> f32 {
        self.sample(query, vertex).unwrap_or(self.max_water_depth)
    }

    /// A non-positive max depth has no scale, every depth gets the deepest color.
    pub fn color_for_depth(&self, gradient: &impl ColorGradient, depth: f32) -> LinearRgba {
        if self.max_water_depth.is_nan() || self.max_water_depth <= 0.0 {
            return gradient.evaluate(1.0);
        }
        gradient.evaluate(depth / self.max_water_depth)
    }
}

/// Builds the low-poly sea with depth in `uv.y` and a depth-mapped vertex color.
pub fn build_sea_mesh_with_depth(
    seg_x: i32,
    seg_z: i32,
    quad_size: f32,
    query: &impl RayQuery,
    gradient: &impl ColorGradient,
    max_water_depth: f32,
) -> WaterMeshData {
    let probe = DepthProbe::new(max_water_depth);
    let mut misses = 0usize;

    let data = build_sea_mesh_with(seg_x, seg_z, quad_size, |corner| {
        let depth = probe.sample(query, *corner).unwrap_or_else(|| {
            misses += 1;
            max_water_depth
        });
        let color = probe.color_for_depth(gradient, depth);
        ([0.0, depth], color.to_f32_array())
    });

    debug!(
        "Built depth sea mesh: {} quads, {} of {} corner probes hit open water",
        data.quad_count(),
        misses,
        data.quad_count() * 4
    );
    data
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::water::gradient::{DepthGradient, GradientKey, GradientMode};

    /// Flat floor at a fixed height, hit only by downward rays.
    struct Floor(f32);

    impl RayQuery for Floor {
        fn cast_ray(&self, origin: Vec3, direction: Dir3, max_distance: f32) -> Option<f32> {
            if direction.y >= 0.0 || origin.y < self.0 {
                return None;
            }
            let distance = (origin.y - self.0) / -direction.y;
            (distance <= max_distance).then_some(distance)
        }
    }

    /// Returns the same distance for every ray.
    struct FixedHit(f32);

    impl RayQuery for FixedHit {
        fn cast_ray(&self, _origin: Vec3, _direction: Dir3, _max_distance: f32) -> Option<f32> {
            Some(self.0)
        }
    }

    fn grey_ramp() -> DepthGradient {
        DepthGradient::new(
            vec![
                GradientKey::new(0.0, LinearRgba::WHITE),
                GradientKey::new(1.0, LinearRgba::BLACK),
            ],
            GradientMode::Blend,
        )
        .unwrap()
    }

    #[test]
    fn test_hit_subtracts_probe_height() {
        let probe = DepthProbe::new(50.0);
        assert_eq!(probe.depth_at(&FixedHit(112.5), Vec3::ZERO), 12.5);
        assert_eq!(probe.depth_at(&Floor(-8.0), Vec3::ZERO), 8.0);
    }

    #[test]
    fn test_hit_above_vertex_is_zero_depth() {
        let probe = DepthProbe::new(50.0);
        assert_eq!(probe.depth_at(&FixedHit(60.0), Vec3::ZERO), 0.0);
        assert_eq!(probe.depth_at(&Floor(3.0), Vec3::ZERO), 0.0);
    }

    #[test]
    fn test_miss_is_max_depth() {
        let probe = DepthProbe::new(30.0);
        assert_eq!(probe.depth_at(&OpenWater, Vec3::new(4.0, 0.0, 2.0)), 30.0);
        // floor deeper than the probe range
        assert_eq!(probe.depth_at(&Floor(-45.0), Vec3::ZERO), 30.0);
    }

    #[test]
    fn test_depth_mesh_layout_matches_flat_mesh() {
        let flat = crate::water::mesh::build_sea_mesh(3, 2, 1.5);
        let deep = build_sea_mesh_with_depth(3, 2, 1.5, &OpenWater, &grey_ramp(), 10.0);
        assert_eq!(flat.positions, deep.positions);
        assert_eq!(flat.indices, deep.indices);
        assert_eq!(deep.uvs.len(), deep.positions.len());
        assert_eq!(deep.colors.len(), deep.positions.len());
    }

    #[test]
    fn test_depth_is_stored_in_uv_and_color() {
        let data = build_sea_mesh_with_depth(2, 2, 1.0, &Floor(-5.0), &grey_ramp(), 10.0);
        for (uv, color) in data.uvs.iter().zip(&data.colors) {
            assert_eq!(uv[0], 0.0);
            assert!((uv[1] - 5.0).abs() < 1e-4);
            assert!((color[0] - 0.5).abs() < 1e-4);
        }
    }

    #[test]
    fn test_open_water_is_darkest() {
        let data = build_sea_mesh_with_depth(1, 1, 1.0, &OpenWater, &grey_ramp(), 10.0);
        assert!(data.uvs.iter().all(|uv| uv[1] == 10.0));
        assert!(data.colors.iter().all(|c| c[0] == 0.0 && c[3] == 1.0));
    }

    #[test]
    fn test_zero_max_depth_uses_deepest_color() {
        let probe = DepthProbe::new(0.0);
        assert_eq!(probe.color_for_depth(&grey_ramp(), 0.0), LinearRgba::BLACK);

        let data = build_sea_mesh_with_depth(1, 1, 1.0, &OpenWater, &grey_ramp(), 0.0);
        assert!(data.uvs.iter().all(|uv| uv[1] == 0.0));
        assert!(data.colors.iter().all(|c| c[0] == 0.0 && c[3] == 1.0));
    }

    #[test]
    fn test_empty_depth_mesh() {
        let data = build_sea_mesh_with_depth(0, 3, 1.0, &OpenWater, &grey_ramp(), 10.0);
        assert!(data.is_empty());
        assert!(data.colors.is_empty());
    }
}
