use bevy::prelude::*;
use shared::SeaConfig;

/// Camera circling the middle of the sea grid.
#[derive(Component)]
pub struct OrbitCamera {
    pub target: Vec3,
    pub yaw: f32,
    pub pitch: f32,
    pub distance: f32,
}

impl OrbitCamera {
    pub fn transform(&self) -> Transform {
        let offset = Quat::from_euler(EulerRot::YXZ, self.yaw, -self.pitch, 0.0) * Vec3::Z;
        Transform::from_translation(self.target + offset * self.distance)
            .looking_at(self.target, Vec3::Y)
    }
}

pub fn spawn_camera(mut commands: Commands, config: Res<SeaConfig>) {
    let grid = &config.grid;
    let target = Vec3::new(
        grid.x as f32 * grid.quad_size * 0.5,
        0.0,
        grid.z as f32 * grid.quad_size * 0.5,
    );
    let orbit = OrbitCamera {
        target,
        yaw: 0.0,
        pitch: 0.6,
        distance: (grid.x.max(grid.z) as f32 * grid.quad_size).max(10.0),
    };

    commands.spawn((Camera3d::default(), orbit.transform(), orbit));
    commands.spawn((
        DirectionalLight {
            illuminance: 8000.0,
            shadows_enabled: false,
            ..default()
        },
        Transform::from_xyz(0.0, 50.0, 0.0).looking_at(Vec3::new(0.4, 0.0, 0.8), Vec3::Y),
    ));
}

pub fn orbit_camera_system(
    keyboard_input: Res<ButtonInput<KeyCode>>,
    time: Res<Time>,
    mut cameras: Query<(&mut OrbitCamera, &mut Transform)>,
) {
    let Ok((mut orbit, mut transform)) = cameras.single_mut() else {
        debug!("Camera not found");
        return;
    };

    let delta = time.delta_secs();
    if keyboard_input.pressed(KeyCode::ArrowLeft) {
        orbit.yaw -= delta;
    }
    if keyboard_input.pressed(KeyCode::ArrowRight) {
        orbit.yaw += delta;
    }
    if keyboard_input.pressed(KeyCode::ArrowUp) {
        orbit.pitch = (orbit.pitch + delta).min(1.5);
    }
    if keyboard_input.pressed(KeyCode::ArrowDown) {
        orbit.pitch = (orbit.pitch - delta).max(0.05);
    }
    if keyboard_input.pressed(KeyCode::PageUp) {
        orbit.distance = (orbit.distance - 20.0 * delta).max(5.0);
    }
    if keyboard_input.pressed(KeyCode::PageDown) {
        orbit.distance += 20.0 * delta;
    }

    *transform = orbit.transform();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_orbit_keeps_distance_and_faces_target() {
        let orbit = OrbitCamera {
            target: Vec3::new(10.0, 0.0, 10.0),
            yaw: 0.7,
            pitch: 0.4,
            distance: 25.0,
        };
        let transform = orbit.transform();
        assert!((transform.translation.distance(orbit.target) - 25.0).abs() < 1e-3);
        assert!(transform.translation.y > 0.0);
        let to_target = (orbit.target - transform.translation).normalize();
        assert!((transform.forward().as_vec3() - to_target).length() < 1e-4);
    }
}
