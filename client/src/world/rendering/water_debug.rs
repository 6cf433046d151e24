//! Gizmo overlay for guns and obstacles.
//!
//! Toggle with F8 to draw each gun's coarse trajectory preview in its own color
//! and the outline of every obstacle box.

use bevy::prelude::*;
use shared::constants::TRAJECTORY_PREVIEW_STEPS;
use shared::sim::SeaWorld;
use shared::SeaConfig;

#[derive(Resource)]
pub struct SeaDebugSettings {
    pub enabled: bool,
}

impl Default for SeaDebugSettings {
    fn default() -> Self {
        Self { enabled: true }
    }
}

impl SeaDebugSettings {
    pub fn toggle(&mut self) {
        self.enabled = !self.enabled;
        info!(
            "Sea debug overlay: {}",
            if self.enabled { "ON" } else { "OFF" }
        );
    }
}

pub fn toggle_sea_debug_system(
    keyboard_input: Res<ButtonInput<KeyCode>>,
    mut settings: ResMut<SeaDebugSettings>,
) {
    if keyboard_input.just_pressed(KeyCode::F8) {
        settings.toggle();
    }
}

pub fn draw_gun_trajectories(
    world: Res<SeaWorld>,
    settings: Res<SeaDebugSettings>,
    mut gizmos: Gizmos,
) {
    if !settings.enabled {
        return;
    }

    let gravity = world.bullet_settings.gravity;
    for gun in &world.guns {
        let color = Color::from(gun.color);
        for (start, end) in gun.trajectory_preview(gravity, TRAJECTORY_PREVIEW_STEPS) {
            gizmos.line(start, end, color);
        }
        gizmos.sphere(Isometry3d::from_translation(gun.position), 0.3, color);
    }
}

pub fn draw_obstacles(config: Res<SeaConfig>, settings: Res<SeaDebugSettings>, mut gizmos: Gizmos) {
    if !settings.enabled {
        return;
    }

    for obstacle in &config.obstacles {
        gizmos.cuboid(
            Transform::from_translation(obstacle.center).with_scale(obstacle.half_size * 2.0),
            Color::srgb(0.9, 0.8, 0.3),
        );
    }
}
