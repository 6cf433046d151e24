//! Bevy plugin driving the sea world from the fixed schedule.

use bevy::prelude::*;
use bevy_log::info;

use crate::config::SeaConfig;
use crate::sim::{BulletId, DespawnReason, SeaWorld, SimEvent};
use crate::water::SeaScene;

/// Solid geometry bullets collide with.
#[derive(Resource, Default)]
pub struct SeaColliders(pub SeaScene);

#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct BulletCollision(pub BulletId);

#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub struct BulletSpawned {
    pub id: BulletId,
    pub position: Vec3,
    pub velocity: Vec3,
}

#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct BulletDespawned {
    pub id: BulletId,
    pub reason: DespawnReason,
}

/// Plugin that adds the sea simulation to an app.
///
/// This plugin:
/// - Builds the `SeaWorld` and its colliders from the configuration
/// - Detects bullets inside solid geometry
/// - Steps the world every fixed tick and reports bullet spawns and removals
pub struct SeaSimPlugin {
    pub config: SeaConfig,
}

impl SeaSimPlugin {
    pub fn new(config: SeaConfig) -> Self {
        Self { config }
    }
}

impl Plugin for SeaSimPlugin {
    fn build(&self, app: &mut App) {
        info!(
            "Sea simulation: {} ships, {} guns, {} wave components",
            self.config.ships.len(),
            self.config.guns.len(),
            self.config.waves.len()
        );

        app.insert_resource(SeaWorld::from_config(&self.config))
            .insert_resource(SeaColliders(self.config.build_scene()))
            .insert_resource(self.config.clone())
            .add_event::<BulletCollision>()
            .add_event::<BulletSpawned>()
            .add_event::<BulletDespawned>()
            .add_systems(
                FixedUpdate,
                (detect_bullet_collisions, step_sea_world).chain(),
            );
    }
}

/// Reports every bullet that ended the previous tick inside solid geometry.
pub fn detect_bullet_collisions(
    world: Res<SeaWorld>,
    colliders: Res<SeaColliders>,
    mut collisions: EventWriter<BulletCollision>,
) {
    for event in world.collisions(|position| colliders.0.collides(position)) {
        let SimEvent::Collision(id) = event;
        collisions.write(BulletCollision(id));
    }
}

/// Advances the sea world by one fixed tick.
pub fn step_sea_world(
    mut world: ResMut<SeaWorld>,
    time: Res<Time<Fixed>>,
    mut collisions: EventReader<BulletCollision>,
    mut spawned: EventWriter<BulletSpawned>,
    mut despawned: EventWriter<BulletDespawned>,
) {
    let events: Vec<SimEvent> = collisions
        .read()
        .map(|collision| SimEvent::Collision(collision.0))
        .collect();

    let report = world.step(time.delta_secs(), &events);

    for id in report.spawned {
        if let Some(bullet) = world.bullet(id) {
            spawned.write(BulletSpawned {
                id,
                position: bullet.position,
                velocity: bullet.velocity,
            });
        }
    }
    for (id, reason) in report.despawned {
        despawned.write(BulletDespawned { id, reason });
    }
}
