//! Sea configuration stored as RON.
//!
//! Everything the sea scene exposes as tunable fields lives here: grid
//! size, depth coloring, wave components, bullets, guns, ships and obstacles.

use bevy::color::LinearRgba;
use bevy::math::{EulerRot, Quat, Vec3};
use bevy_ecs::resource::Resource;
use bevy_log::info;
use ron::ser::PrettyConfig;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::constants::{DEFAULT_MAX_WATER_DEPTH, MAX_WAVE_COMPONENTS};
use crate::sim::{BulletSettings, GunSettings, Ship};
use crate::water::{
    build_sea_mesh, build_sea_mesh_with_depth, DepthGradient, NoiseSeabed, ObstacleBox,
    ObstacleScene, RayQuery, SeaScene, SeaSurface, SeabedSettings, WaterMeshData, WaveComponent,
};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("could not write {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("could not parse {}: {message}", .path.display())]
    Parse { path: PathBuf, message: String },
    #[error("could not serialize configuration: {0}")]
    Serialize(String),
    #[error("quad size must be positive and finite, got {0}")]
    InvalidQuadSize(f32),
    #[error("maximum water depth must be positive and finite, got {0}")]
    InvalidMaxDepth(f32),
    #[error("at most {max} wave components are supported, got {count}")]
    TooManyWaves { count: usize, max: usize },
    #[error("wave {index} has an invalid wavelength {wavelength}")]
    InvalidWavelength { index: usize, wavelength: f32 },
    #[error("bullet lifetime must be non-negative, got {0}")]
    InvalidLifetime(f32),
    #[error("gun {index} has an invalid cooldown {cooldown}")]
    InvalidCooldown { index: usize, cooldown: f32 },
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridSettings {
    /// Quads along X
    pub x: i32,
    /// Quads along Z
    pub z: i32,
    pub quad_size: f32,
}

impl Default for GridSettings {
    fn default() -> Self {
        Self {
            x: 64,
            z: 64,
            quad_size: 1.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DepthSettings {
    /// Set to false for the plain deep-sea mesh without depth probing
    pub enabled: bool,
    pub max_water_depth: f32,
    pub gradient: DepthGradient,
    pub seabed: Option<SeabedSettings>,
}

impl Default for DepthSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            max_water_depth: DEFAULT_MAX_WATER_DEPTH,
            gradient: DepthGradient::default(),
            seabed: Some(SeabedSettings::default()),
        }
    }
}

#[derive(Resource, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SeaConfig {
    pub seed: u64,
    pub grid: GridSettings,
    pub depth: DepthSettings,
    pub waves: Vec<WaveComponent>,
    pub bullet: BulletSettings,
    pub guns: Vec<GunSettings>,
    pub ships: Vec<Ship>,
    pub obstacles: Vec<ObstacleBox>,
}

impl Default for SeaConfig {
    fn default() -> Self {
        let center = Vec3::new(32.0, 0.0, 32.0);
        Self {
            seed: 0,
            grid: GridSettings::default(),
            depth: DepthSettings::default(),
            waves: vec![
                WaveComponent::new(1.0, 0.0, 0.05, 8.0),
                WaveComponent::new(0.6, 0.8, 0.04, 5.0),
                WaveComponent::new(-0.3, 1.0, 0.03, 3.0),
            ],
            bullet: BulletSettings::default(),
            guns: vec![
                GunSettings {
                    position: center + Vec3::new(-8.0, 1.5, 0.0),
                    rotation: Quat::from_euler(EulerRot::YXZ, -0.6, 0.35, 0.0),
                    color: LinearRgba::RED,
                    ..Default::default()
                },
                GunSettings {
                    position: center + Vec3::new(8.0, 1.5, 0.0),
                    rotation: Quat::from_euler(EulerRot::YXZ, 0.6, 0.35, 0.0),
                    cooldown: 1.4,
                    color: LinearRgba::GREEN,
                    ..Default::default()
                },
            ],
            ships: vec![
                Ship::new(center + Vec3::new(-8.0, 0.0, 0.0)),
                Ship::new(center + Vec3::new(8.0, 0.0, 0.0)),
            ],
            obstacles: vec![ObstacleBox::new(
                center + Vec3::new(0.0, 0.0, -20.0),
                Vec3::new(4.0, 3.0, 4.0),
            )],
        }
    }
}

impl SeaConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        let quad_size = self.grid.quad_size;
        if !(quad_size.is_finite() && quad_size > 0.0) {
            return Err(ConfigError::InvalidQuadSize(quad_size));
        }

        let max_depth = self.depth.max_water_depth;
        if !(max_depth.is_finite() && max_depth > 0.0) {
            return Err(ConfigError::InvalidMaxDepth(max_depth));
        }

        if self.waves.len() > MAX_WAVE_COMPONENTS {
            return Err(ConfigError::TooManyWaves {
                count: self.waves.len(),
                max: MAX_WAVE_COMPONENTS,
            });
        }
        for (index, wave) in self.waves.iter().enumerate() {
            if wave.wavelength == 0.0 || !wave.wavelength.is_finite() {
                return Err(ConfigError::InvalidWavelength {
                    index,
                    wavelength: wave.wavelength,
                });
            }
        }

        if self.bullet.lifetime < 0.0 || self.bullet.lifetime.is_nan() {
            return Err(ConfigError::InvalidLifetime(self.bullet.lifetime));
        }
        for (index, gun) in self.guns.iter().enumerate() {
            if gun.cooldown < 0.0 || gun.cooldown.is_nan() {
                return Err(ConfigError::InvalidCooldown {
                    index,
                    cooldown: gun.cooldown,
                });
            }
        }

        Ok(())
    }

    pub fn surface(&self) -> SeaSurface {
        SeaSurface::new(self.waves.clone())
    }

    /// Obstacles plus the seabed, seeded from the configuration seed.
    pub fn build_scene(&self) -> SeaScene {
        let seabed = self
            .depth
            .seabed
            .map(|settings| NoiseSeabed::new(settings, self.seed as u32));
        SeaScene::new(ObstacleScene::new(&self.obstacles), seabed)
    }

    /// The water grid, depth-colored against `query` unless depth is disabled.
    pub fn build_water_mesh(&self, query: &impl RayQuery) -> WaterMeshData {
        let grid = &self.grid;
        if !self.depth.enabled {
            return build_sea_mesh(grid.x, grid.z, grid.quad_size);
        }
        build_sea_mesh_with_depth(
            grid.x,
            grid.z,
            grid.quad_size,
            query,
            &self.depth.gradient,
            self.depth.max_water_depth,
        )
    }
}

/// Loads and validates a configuration, falling back to the default one when the file is missing.
pub fn load_sea_config(path: &Path) -> Result<SeaConfig, ConfigError> {
    if !path.exists() {
        info!(
            "Sea configuration not found: {}. Using default sea.",
            path.display()
        );
        return Ok(SeaConfig::default());
    }

    let contents = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let config = parse_sea_config(&contents).map_err(|err| match err {
        ConfigError::Parse { message, .. } => ConfigError::Parse {
            path: path.to_path_buf(),
            message,
        },
        other => other,
    })?;

    info!("Loaded sea configuration from {}", path.display());
    Ok(config)
}

pub fn parse_sea_config(contents: &str) -> Result<SeaConfig, ConfigError> {
    let config: SeaConfig = ron::de::from_str(contents).map_err(|err| ConfigError::Parse {
        path: PathBuf::new(),
        message: err.to_string(),
    })?;
    config.validate()?;
    Ok(config)
}

pub fn sea_config_to_string(config: &SeaConfig) -> Result<String, ConfigError> {
    let pretty_config = PrettyConfig::new()
        .with_depth_limit(4)
        .with_separate_tuple_members(true);

    ron::ser::to_string_pretty(config, pretty_config)
        .map_err(|err| ConfigError::Serialize(err.to_string()))
}

pub fn save_sea_config(config: &SeaConfig, path: &Path) -> Result<(), ConfigError> {
    let serialized = sea_config_to_string(config)?;
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|source| ConfigError::Write {
            path: path.to_path_buf(),
            source,
        })?;
    }
    fs::write(path, serialized).map_err(|source| ConfigError::Write {
        path: path.to_path_buf(),
        source,
    })?;
    info!("Sea configuration saved to {}", path.display());
    Ok(())
}
