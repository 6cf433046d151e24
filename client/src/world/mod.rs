pub mod entities;
pub mod rendering;

pub use entities::*;
pub use rendering::*;

use bevy::prelude::*;

pub fn sea_world_plugin(app: &mut App) {
    app.init_resource::<BulletEntities>()
        .init_resource::<SeaMeshBase>()
        .init_resource::<SeaDebugSettings>()
        .add_systems(Startup, (setup_water_surface, setup_entities))
        .add_systems(
            Update,
            (
                (rebuild_water_surface_system, animate_water_surface).chain(),
                toggle_sea_debug_system,
                draw_gun_trajectories,
                draw_obstacles,
                (spawn_bullets, despawn_bullets, sync_bullets).chain(),
                sync_ships,
            ),
        );
}
