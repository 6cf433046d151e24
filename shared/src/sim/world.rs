//! The sea simulation advanced one explicit step at a time.
//!
//! A host loop (Bevy's fixed schedule, the headless runner or a test) calls
//! [`SeaWorld::step`] with the elapsed time and the collisions it detected.

use bevy::math::Vec3;
use bevy_ecs::resource::Resource;
use log::debug;
use rand::{rngs::StdRng, SeedableRng};
use std::collections::BTreeMap;

use crate::config::SeaConfig;
use crate::sim::{Bullet, BulletId, BulletSettings, Gun, GunSettings, Ship};
use crate::water::{SeaClock, SeaSnapshot, SeaSurface};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SimEvent {
    /// The bullet touched solid geometry and has to go
    Collision(BulletId),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DespawnReason {
    Expired,
    Collision,
}

/// What changed during one step.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StepReport {
    pub spawned: Vec<BulletId>,
    pub despawned: Vec<(BulletId, DespawnReason)>,
}

impl StepReport {
    pub fn is_empty(&self) -> bool {
        self.spawned.is_empty() && self.despawned.is_empty()
    }
}

#[derive(Resource)]
pub struct SeaWorld {
    clock: SeaClock,
    pub surface: SeaSurface,
    pub ships: Vec<Ship>,
    pub guns: Vec<Gun>,
    pub bullet_settings: BulletSettings,
    bullets: BTreeMap<BulletId, Bullet>,
    next_bullet_id: u64,
    rng: StdRng,
}

impl SeaWorld {
    pub fn new(surface: SeaSurface, bullet_settings: BulletSettings, seed: u64) -> Self {
        Self {
            clock: SeaClock::default(),
            surface,
            ships: Vec::new(),
            guns: Vec::new(),
            bullet_settings,
            bullets: BTreeMap::new(),
            next_bullet_id: 0,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn from_config(config: &SeaConfig) -> Self {
        let mut world = Self::new(config.surface(), config.bullet, config.seed);
        world.ships = config.ships.clone();
        for gun in &config.guns {
            world.add_gun(gun);
        }
        world
    }

    pub fn add_gun(&mut self, settings: &GunSettings) {
        let gun = Gun::new(settings, &mut self.rng);
        self.guns.push(gun);
    }

    pub fn time(&self) -> f32 {
        self.clock.elapsed()
    }

    /// The sea surface at the current clock value.
    pub fn snapshot(&self) -> SeaSnapshot<'_> {
        self.surface.at(self.clock.elapsed())
    }

    pub fn bullet(&self, id: BulletId) -> Option<&Bullet> {
        self.bullets.get(&id)
    }

    pub fn bullets(&self) -> impl Iterator<Item = (BulletId, &Bullet)> {
        self.bullets.iter().map(|(id, bullet)| (*id, bullet))
    }

    pub fn bullet_count(&self) -> usize {
        self.bullets.len()
    }

    pub fn spawn_bullet(&mut self, bullet: Bullet) -> BulletId {
        let id = BulletId(self.next_bullet_id);
        self.next_bullet_id += 1;
        self.bullets.insert(id, bullet);
        id
    }

    /// Bullets whose position satisfies `hit`, reported as collisions for the next step.
    pub fn collisions(&self, mut hit: impl FnMut(Vec3) -> bool) -> Vec<SimEvent> {
        self.bullets
            .iter()
            .filter(|(_, bullet)| hit(bullet.position))
            .map(|(id, _)| SimEvent::Collision(*id))
            .collect()
    }

    /// Advances the simulation by `delta` seconds.
    ///
    /// Order: collisions from the previous frame, clock, guns, bullets, ships.
    pub fn step(&mut self, delta: f32, events: &[SimEvent]) -> StepReport {
        let mut report = StepReport::default();

        for event in events {
            match event {
                SimEvent::Collision(id) => {
                    if self.bullets.remove(id).is_some() {
                        report.despawned.push((*id, DespawnReason::Collision));
                    }
                }
            }
        }

        self.clock.advance(delta);
        let now = self.clock.elapsed();

        let settings = self.bullet_settings;
        let fired: Vec<Bullet> = self
            .guns
            .iter_mut()
            .filter_map(|gun| gun.fire_if_ready(now, &mut self.rng, &settings))
            .collect();
        for bullet in fired {
            report.spawned.push(self.spawn_bullet(bullet));
        }

        let delta = delta.max(0.0);
        for (id, bullet) in self.bullets.iter_mut() {
            bullet.integrate(delta);
            if bullet.is_expired() {
                report.despawned.push((*id, DespawnReason::Expired));
            }
        }
        for (id, reason) in &report.despawned {
            if *reason == DespawnReason::Expired {
                self.bullets.remove(id);
            }
        }

        let water = self.surface.at(now);
        for ship in &mut self.ships {
            ship.float_on(&water);
        }

        if !report.is_empty() {
            debug!(
                "t={:.2}s: {} bullets spawned, {} despawned, {} alive",
                now,
                report.spawned.len(),
                report.despawned.len(),
                self.bullets.len()
            );
        }
        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::water::{WaterHeight, WaveComponent};

    fn quiet_world() -> SeaWorld {
        SeaWorld::new(
            SeaSurface::new(vec![WaveComponent::new(1.0, 0.0, 0.1, 6.0)]),
            BulletSettings {
                gravity: 9.8,
                lifetime: 1.0,
            },
            11,
        )
    }

    fn gun(cooldown: f32) -> GunSettings {
        GunSettings {
            position: Vec3::new(0.0, 5.0, 0.0),
            cooldown,
            muzzle_velocity: 25.0,
            ..Default::default()
        }
    }

    #[test]
    fn test_clock_advances() {
        let mut world = quiet_world();
        world.step(0.25, &[]);
        world.step(0.25, &[]);
        assert!((world.time() - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_ships_float_on_current_surface() {
        let mut world = quiet_world();
        world.ships.push(Ship::new(Vec3::new(2.0, 0.0, 3.0)));
        world.step(0.7, &[]);

        let expected = world.snapshot().height_at(Vec3::new(2.0, 0.0, 3.0)) * 10.0;
        assert!((world.ships[0].position.y - expected).abs() < 1e-5);
    }

    #[test]
    fn test_guns_fire_and_bullets_expire() {
        let mut world = quiet_world();
        world.add_gun(&gun(0.5));

        let mut spawned = 0;
        let mut expired = 0;
        for _ in 0..200 {
            let report = world.step(0.05, &[]);
            spawned += report.spawned.len();
            expired += report
                .despawned
                .iter()
                .filter(|(_, reason)| *reason == DespawnReason::Expired)
                .count();
        }

        // 10 simulated seconds with a 0.5s cooldown
        assert!(spawned >= 12, "spawned {spawned}");
        assert_eq!(spawned, expired + world.bullet_count());
        assert!(world.bullets().all(|(_, bullet)| bullet.age() < 1.0));
    }

    #[test]
    fn test_collision_event_removes_bullet() {
        let mut world = quiet_world();
        let id = world.spawn_bullet(Bullet::new(
            Vec3::ZERO,
            Vec3::X,
            &BulletSettings::default(),
        ));

        let report = world.step(0.1, &[SimEvent::Collision(id)]);
        assert_eq!(report.despawned, vec![(id, DespawnReason::Collision)]);
        assert!(world.bullet(id).is_none());

        // a second collision for the same bullet is ignored
        let report = world.step(0.1, &[SimEvent::Collision(id)]);
        assert!(report.despawned.is_empty());
    }

    #[test]
    fn test_collisions_query() {
        let mut world = quiet_world();
        let low = world.spawn_bullet(Bullet::new(
            Vec3::new(0.0, -3.0, 0.0),
            Vec3::ZERO,
            &BulletSettings::default(),
        ));
        world.spawn_bullet(Bullet::new(
            Vec3::new(0.0, 3.0, 0.0),
            Vec3::ZERO,
            &BulletSettings::default(),
        ));

        let events = world.collisions(|position| position.y < 0.0);
        assert_eq!(events, vec![SimEvent::Collision(low)]);
    }

    #[test]
    fn test_same_seed_same_history() {
        let run = || {
            let mut world = quiet_world();
            world.add_gun(&gun(0.3));
            for _ in 0..40 {
                world.step(0.05, &[]);
            }
            world
                .bullets()
                .map(|(_, bullet)| bullet.position)
                .collect::<Vec<_>>()
        };
        assert_eq!(run(), run());
    }
}
