//! Ship and bullet entities mirroring the simulation.

use bevy::prelude::*;
use shared::sim::{BulletId, SeaWorld};
use shared::{BulletDespawned, BulletSpawned};
use std::collections::HashMap;

#[derive(Component)]
pub struct ShipMarker(pub usize);

#[derive(Component)]
pub struct BulletMarker(pub BulletId);

/// Render entities of the bullets currently in flight
#[derive(Resource, Default)]
pub struct BulletEntities {
    pub entities: HashMap<BulletId, Entity>,
}

#[derive(Resource)]
pub struct BulletAssets {
    pub mesh: Handle<Mesh>,
    pub material: Handle<StandardMaterial>,
}

pub fn setup_entities(
    mut commands: Commands,
    world: Res<SeaWorld>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    let hull = meshes.add(Cuboid::new(2.0, 1.0, 4.0));
    let paint = materials.add(Color::srgb(0.55, 0.35, 0.2));
    for (index, ship) in world.ships.iter().enumerate() {
        commands.spawn((
            ShipMarker(index),
            Mesh3d(hull.clone()),
            MeshMaterial3d(paint.clone()),
            Transform::from_translation(ship.position),
        ));
    }

    commands.insert_resource(BulletAssets {
        mesh: meshes.add(Sphere::new(0.25)),
        material: materials.add(StandardMaterial {
            base_color: Color::srgb(0.15, 0.15, 0.15),
            metallic: 0.8,
            ..default()
        }),
    });
}

pub fn sync_ships(world: Res<SeaWorld>, mut ships: Query<(&ShipMarker, &mut Transform)>) {
    for (marker, mut transform) in &mut ships {
        if let Some(ship) = world.ships.get(marker.0) {
            transform.translation = ship.position;
        }
    }
}

pub fn spawn_bullets(
    mut commands: Commands,
    mut events: EventReader<BulletSpawned>,
    assets: Res<BulletAssets>,
    mut bullets: ResMut<BulletEntities>,
) {
    for event in events.read() {
        let entity = commands
            .spawn((
                BulletMarker(event.id),
                Mesh3d(assets.mesh.clone()),
                MeshMaterial3d(assets.material.clone()),
                Transform::from_translation(event.position),
            ))
            .id();
        bullets.entities.insert(event.id, entity);
    }
}

pub fn despawn_bullets(
    mut commands: Commands,
    mut events: EventReader<BulletDespawned>,
    mut bullets: ResMut<BulletEntities>,
) {
    for event in events.read() {
        if let Some(entity) = bullets.entities.remove(&event.id) {
            debug!("Despawning {} ({:?})", event.id, event.reason);
            commands.entity(entity).despawn();
        }
    }
}

pub fn sync_bullets(world: Res<SeaWorld>, mut bullets: Query<(&BulletMarker, &mut Transform)>) {
    for (marker, mut transform) in &mut bullets {
        if let Some(bullet) = world.bullet(marker.0) {
            transform.translation = bullet.position;
            transform.rotation = bullet.rotation;
        }
    }
}
