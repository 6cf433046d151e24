//! Gerstner wave height field for the sea surface.
//!
//! The surface is the sum of up to three Gerstner components. Each component
//! produces a full 3D displacement, but only the vertical sum is exposed as a
//! height; the horizontal terms are kept exactly as computed (`cos f` on both
//! x and z, not projected on the wave direction).
//!
//! ## Usage
//!
//! ```rust
//! use shared::water::{SeaSurface, WaveComponent, WaterHeight};
//! use bevy::math::Vec3;
//!
//! let surface = SeaSurface::new(vec![WaveComponent::new(1.0, 0.0, 0.5, 8.0)]);
//! let height = surface.at(1.5).height_at(Vec3::new(10.0, 0.0, 5.0));
//! ```

use bevy::math::{Vec2, Vec3, Vec4};
use log::warn;
use serde::{Deserialize, Serialize};
use std::f32::consts::{PI, TAU};

use crate::constants::{MAX_WAVE_COMPONENTS, WAVE_GRAVITY};

/// A single Gerstner wave, the 4-tuple `(dir.x, dir.y, steepness, wavelength)`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WaveComponent {
    /// Travel direction in the XZ plane, normalized on use
    pub direction: Vec2,
    /// Should stay well below the wavelength, otherwise crests loop over themselves
    pub steepness: f32,
    /// Wavelength in world units, must be nonzero
    pub wavelength: f32,
}

impl WaveComponent {
    pub const fn new(dir_x: f32, dir_y: f32, steepness: f32, wavelength: f32) -> Self {
        Self {
            direction: Vec2::new(dir_x, dir_y),
            steepness,
            wavelength,
        }
    }

    pub fn from_vec4(wave: Vec4) -> Self {
        Self::new(wave.x, wave.y, wave.z, wave.w)
    }

    /// Wave number (k = 2π / wavelength)
    #[inline]
    pub fn wave_number(&self) -> f32 {
        2.0 * PI / self.wavelength
    }

    /// Phase speed from the deep water dispersion relation
    #[inline]
    pub fn phase_speed(&self) -> f32 {
        (WAVE_GRAVITY / self.wave_number()).sqrt()
    }

    /// Time after which the component repeats at a fixed position.
    pub fn period(&self) -> f32 {
        wave_period(self.wavelength)
    }
}

/// Temporal period of a deep water wave: the phase advances by `k * c * t`,
/// so it wraps after `2π / sqrt(g * k) = sqrt(2π * wavelength / g)`.
pub fn wave_period(wavelength: f32) -> f32 {
    (TAU * wavelength / WAVE_GRAVITY).sqrt()
}

/// Displacement of a single component at `position` (only x and z are read).
pub fn gerstner_wave(wave: &WaveComponent, position: Vec3, time: f32) -> Vec3 {
    let k = wave.wave_number();
    let d = wave.direction.normalize_or_zero();
    let f = k * (d.dot(Vec2::new(position.x, position.z)) - wave.phase_speed() * time);
    let cos_f = f.cos();

    Vec3::new(cos_f, f.sin(), cos_f) * (wave.steepness / k)
}

/// Something that can report the water level at a horizontal position.
pub trait WaterHeight {
    fn height_at(&self, position: Vec3) -> f32;
}

/// Still water at a constant level.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FlatWater(pub f32);

impl WaterHeight for FlatWater {
    fn height_at(&self, _position: Vec3) -> f32 {
        self.0
    }
}

/// The configured wave components of the sea.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SeaSurface {
    waves: Vec<WaveComponent>,
}

impl SeaSurface {
    /// Extra components past [`MAX_WAVE_COMPONENTS`] are dropped.
    pub fn new(mut waves: Vec<WaveComponent>) -> Self {
        if waves.len() > MAX_WAVE_COMPONENTS {
            warn!(
                "Sea surface supports {} wave components, ignoring {}",
                MAX_WAVE_COMPONENTS,
                waves.len() - MAX_WAVE_COMPONENTS
            );
            waves.truncate(MAX_WAVE_COMPONENTS);
        }
        Self { waves }
    }

    pub fn calm() -> Self {
        Self::default()
    }

    pub fn waves(&self) -> &[WaveComponent] {
        &self.waves
    }

    /// Summed displacement of every component.
    pub fn displacement_at(&self, position: Vec3, time: f32) -> Vec3 {
        self.waves
            .iter()
            .map(|wave| gerstner_wave(wave, position, time))
            .sum()
    }

    /// Vertical displacement only.
    pub fn height_at(&self, position: Vec3, time: f32) -> f32 {
        self.displacement_at(position, time).y
    }

    /// Binds the surface to a clock value.
    pub fn at(&self, time: f32) -> SeaSnapshot<'_> {
        SeaSnapshot {
            surface: self,
            time,
        }
    }
}

/// A sea surface frozen at one point in time.
#[derive(Debug, Clone, Copy)]
pub struct SeaSnapshot<'a> {
    pub surface: &'a SeaSurface,
    pub time: f32,
}

impl WaterHeight for SeaSnapshot<'_> {
    fn height_at(&self, position: Vec3) -> f32 {
        self.surface.height_at(position, self.time)
    }
}

/// Monotonic simulation clock driving the waves.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SeaClock {
    elapsed: f32,
}

impl SeaClock {
    pub fn starting_at(elapsed: f32) -> Self {
        Self {
            elapsed: elapsed.max(0.0),
        }
    }

    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    /// Negative or non-finite deltas are ignored so time never runs backwards.
    pub fn advance(&mut self, delta: f32) {
        if delta.is_finite() && delta > 0.0 {
            self.elapsed += delta;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn single(wave: WaveComponent) -> SeaSurface {
        SeaSurface::new(vec![wave])
    }

    #[test]
    fn test_height_at_origin_is_zero_at_start() {
        let surface = single(WaveComponent::new(1.0, 0.0, 0.5, 4.0 * PI));
        let height = surface.height_at(Vec3::ZERO, 0.0);
        assert!(height.abs() < 1e-6, "sin(0) should give zero height");
    }

    #[test]
    fn test_height_is_periodic_in_time() {
        let wave = WaveComponent::new(0.6, 0.8, 0.3, 7.0);
        let surface = single(wave);
        let position = Vec3::new(3.2, 0.0, -1.7);
        let period = wave.period();

        for t in [0.0, 0.4, 2.5] {
            let h1 = surface.height_at(position, t);
            let h2 = surface.height_at(position, t + period);
            assert!((h1 - h2).abs() < 1e-3, "h({t})={h1}, h({t}+T)={h2}");
        }
    }

    #[test]
    fn test_height_ignores_vertical_position() {
        let surface = single(WaveComponent::new(1.0, 0.0, 0.4, 5.0));
        let low = surface.height_at(Vec3::new(2.0, -30.0, 1.0), 1.2);
        let high = surface.height_at(Vec3::new(2.0, 50.0, 1.0), 1.2);
        assert_eq!(low, high);
    }

    #[test]
    fn test_height_is_deterministic() {
        let surface = SeaSurface::new(vec![
            WaveComponent::new(1.0, 0.0, 0.05, 8.0),
            WaveComponent::new(0.6, 0.8, 0.04, 5.0),
            WaveComponent::new(-0.3, 1.0, 0.03, 3.0),
        ]);
        let position = Vec3::new(12.5, 0.0, 4.25);
        assert_eq!(
            surface.height_at(position, 3.75),
            surface.height_at(position, 3.75)
        );
    }

    #[test]
    fn test_components_sum() {
        let a = WaveComponent::new(1.0, 0.0, 0.2, 6.0);
        let b = WaveComponent::new(0.0, 1.0, 0.1, 3.0);
        let position = Vec3::new(1.0, 0.0, 2.0);
        let sum = single(a).height_at(position, 0.7) + single(b).height_at(position, 0.7);
        let both = SeaSurface::new(vec![a, b]).height_at(position, 0.7);
        assert!((sum - both).abs() < 1e-6);
    }

    #[test]
    fn test_horizontal_terms_match_cosine() {
        let wave = WaveComponent::new(1.0, 0.0, 0.5, 4.0 * PI);
        let displacement = gerstner_wave(&wave, Vec3::ZERO, 0.0);
        let amplitude = wave.steepness / wave.wave_number();
        assert!((displacement.x - amplitude).abs() < 1e-6);
        assert!((displacement.z - amplitude).abs() < 1e-6);
    }

    #[test]
    fn test_zero_direction_is_stationary_in_space() {
        let surface = single(WaveComponent::new(0.0, 0.0, 0.3, 4.0));
        let h1 = surface.height_at(Vec3::new(0.0, 0.0, 0.0), 1.0);
        let h2 = surface.height_at(Vec3::new(7.0, 0.0, -3.0), 1.0);
        assert!(h1.is_finite());
        assert!((h1 - h2).abs() < 1e-6);
    }

    #[test]
    fn test_extra_components_are_dropped() {
        let waves = vec![WaveComponent::new(1.0, 0.0, 0.1, 2.0); 5];
        assert_eq!(SeaSurface::new(waves).waves().len(), MAX_WAVE_COMPONENTS);
    }

    #[test]
    fn test_calm_sea_is_flat() {
        let calm = SeaSurface::calm();
        let snapshot = calm.at(10.0);
        assert_eq!(snapshot.height_at(Vec3::new(4.0, 0.0, 4.0)), 0.0);
    }

    #[test]
    fn test_clock_never_runs_backwards() {
        let mut clock = SeaClock::default();
        clock.advance(0.5);
        clock.advance(-1.0);
        clock.advance(f32::NAN);
        assert_eq!(clock.elapsed(), 0.5);
    }
}
