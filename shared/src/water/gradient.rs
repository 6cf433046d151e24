//! Color ramps evaluated on a normalized water depth.

use bevy::color::{LinearRgba, Mix};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::constants::MAX_GRADIENT_KEYS;

/// Maps a fraction in `[0, 1]` to a color.
pub trait ColorGradient {
    fn evaluate(&self, t: f32) -> LinearRgba;
}

impl<G: ColorGradient + ?Sized> ColorGradient for &G {
    fn evaluate(&self, t: f32) -> LinearRgba {
        (**self).evaluate(t)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GradientKey {
    pub time: f32,
    pub color: LinearRgba,
}

impl GradientKey {
    pub const fn new(time: f32, color: LinearRgba) -> Self {
        Self { time, color }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum GradientMode {
    /// Linear interpolation between the surrounding keys
    #[default]
    Blend,
    /// Color of the first key at or after `t`, no interpolation
    Fixed,
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum GradientError {
    #[error("a gradient needs at least one key")]
    Empty,
    #[error("a gradient supports at most {max} keys, got {count}")]
    TooManyKeys { count: usize, max: usize },
    #[error("gradient key {index} has a non-finite time")]
    NonFiniteTime { index: usize },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct GradientDefinition {
    keys: Vec<GradientKey>,
    #[serde(default)]
    mode: GradientMode,
}

/// Ordered set of color keys over the depth fraction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "GradientDefinition", into = "GradientDefinition")]
pub struct DepthGradient {
    keys: Vec<GradientKey>,
    mode: GradientMode,
}

impl DepthGradient {
    /// Key times are clamped into `[0, 1]` and sorted.
    pub fn new(mut keys: Vec<GradientKey>, mode: GradientMode) -> Result<Self, GradientError> {
        if keys.is_empty() {
            return Err(GradientError::Empty);
        }
        if keys.len() > MAX_GRADIENT_KEYS {
            return Err(GradientError::TooManyKeys {
                count: keys.len(),
                max: MAX_GRADIENT_KEYS,
            });
        }
        if let Some(index) = keys.iter().position(|key| !key.time.is_finite()) {
            return Err(GradientError::NonFiniteTime { index });
        }

        for key in &mut keys {
            key.time = key.time.clamp(0.0, 1.0);
        }
        keys.sort_by(|a, b| a.time.total_cmp(&b.time));
        Ok(Self { keys, mode })
    }

    pub fn solid(color: LinearRgba) -> Self {
        Self {
            keys: vec![GradientKey::new(0.0, color)],
            mode: GradientMode::Fixed,
        }
    }

    pub fn keys(&self) -> &[GradientKey] {
        &self.keys
    }

    pub fn mode(&self) -> GradientMode {
        self.mode
    }
}

impl Default for DepthGradient {
    /// Turquoise shallows fading to a deep navy.
    fn default() -> Self {
        Self {
            keys: vec![
                GradientKey::new(0.0, LinearRgba::new(0.25, 0.85, 0.8, 1.0)),
                GradientKey::new(0.35, LinearRgba::new(0.05, 0.45, 0.6, 1.0)),
                GradientKey::new(1.0, LinearRgba::new(0.01, 0.08, 0.25, 1.0)),
            ],
            mode: GradientMode::Blend,
        }
    }
}

impl ColorGradient for DepthGradient {
    fn evaluate(&self, t: f32) -> LinearRgba {
        let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };
        let first = self.keys[0];
        let last = self.keys[self.keys.len() - 1];

        if t <= first.time {
            return first.color;
        }
        if t >= last.time {
            return last.color;
        }

        match self.mode {
            GradientMode::Fixed => self
                .keys
                .iter()
                .find(|key| key.time >= t)
                .map_or(last.color, |key| key.color),
            GradientMode::Blend => {
                for pair in self.keys.windows(2) {
                    let (from, to) = (pair[0], pair[1]);
                    if t <= to.time {
                        let span = to.time - from.time;
                        let factor = if span > 0.0 { (t - from.time) / span } else { 1.0 };
                        return from.color.mix(&to.color, factor);
                    }
                }
                last.color
            }
        }
    }
}

impl TryFrom<GradientDefinition> for DepthGradient {
    type Error = GradientError;

    fn try_from(definition: GradientDefinition) -> Result<Self, Self::Error> {
        Self::new(definition.keys, definition.mode)
    }
}

impl From<DepthGradient> for GradientDefinition {
    fn from(gradient: DepthGradient) -> Self {
        Self {
            keys: gradient.keys,
            mode: gradient.mode,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn black_to_white(mode: GradientMode) -> DepthGradient {
        DepthGradient::new(
            vec![
                GradientKey::new(1.0, LinearRgba::WHITE),
                GradientKey::new(0.0, LinearRgba::BLACK),
            ],
            mode,
        )
        .unwrap()
    }

    #[test]
    fn test_keys_are_sorted() {
        let gradient = black_to_white(GradientMode::Blend);
        assert_eq!(gradient.keys()[0].color, LinearRgba::BLACK);
        assert_eq!(gradient.keys()[1].color, LinearRgba::WHITE);
    }

    #[test]
    fn test_blend_interpolates() {
        let gradient = black_to_white(GradientMode::Blend);
        let mid = gradient.evaluate(0.25);
        assert!((mid.red - 0.25).abs() < 1e-6);
        assert!((mid.alpha - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_fixed_picks_next_key() {
        let gradient = black_to_white(GradientMode::Fixed);
        assert_eq!(gradient.evaluate(0.0), LinearRgba::BLACK);
        assert_eq!(gradient.evaluate(0.1), LinearRgba::WHITE);
    }

    #[test]
    fn test_out_of_range_is_clamped() {
        let gradient = black_to_white(GradientMode::Blend);
        assert_eq!(gradient.evaluate(-3.0), LinearRgba::BLACK);
        assert_eq!(gradient.evaluate(7.0), LinearRgba::WHITE);
        assert_eq!(gradient.evaluate(f32::NAN), LinearRgba::BLACK);
    }

    #[test]
    fn test_boundary_keys_hold_outside_range() {
        let gradient = DepthGradient::new(
            vec![
                GradientKey::new(0.2, LinearRgba::RED),
                GradientKey::new(0.8, LinearRgba::BLUE),
            ],
            GradientMode::Blend,
        )
        .unwrap();
        assert_eq!(gradient.evaluate(0.1), LinearRgba::RED);
        assert_eq!(gradient.evaluate(0.9), LinearRgba::BLUE);
    }

    #[test]
    fn test_invalid_gradients_are_rejected() {
        assert_eq!(
            DepthGradient::new(Vec::new(), GradientMode::Blend),
            Err(GradientError::Empty)
        );
        let too_many = vec![GradientKey::new(0.5, LinearRgba::WHITE); MAX_GRADIENT_KEYS + 1];
        assert!(matches!(
            DepthGradient::new(too_many, GradientMode::Blend),
            Err(GradientError::TooManyKeys { .. })
        ));
    }
}
