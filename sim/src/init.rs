use bevy::prelude::*;
use bevy::time::TimeUpdateStrategy;
use bevy_app::ScheduleRunnerPlugin;
use bevy_log::{info, LogPlugin};
use shared::{step_sea_world, SeaConfig, SeaSimPlugin, DEFAULT_TICKS_PER_SECOND};
use std::time::Duration;

use crate::report::{log_water_mesh, report_progress, WaterMeshSummary};

/// How the headless runner drives the fixed schedule.
#[derive(Resource, Debug, Clone, Copy, PartialEq)]
pub struct RunSettings {
    /// Stop after this many fixed ticks, run forever when `None`
    pub ticks: Option<u64>,
    pub tick_rate: f64,
    /// Advance virtual time by exactly one tick per frame instead of waiting for the wall clock
    pub fast: bool,
}

impl Default for RunSettings {
    fn default() -> Self {
        Self {
            ticks: None,
            tick_rate: DEFAULT_TICKS_PER_SECOND,
            fast: false,
        }
    }
}

impl RunSettings {
    pub fn tick_duration(&self) -> Duration {
        Duration::from_secs_f64(1.0 / self.tick_rate)
    }
}

/// Fixed ticks executed so far.
#[derive(Resource, Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SimTicks(pub u64);

fn count_ticks(mut ticks: ResMut<SimTicks>) {
    ticks.0 += 1;
}

fn exit_after_ticks(
    ticks: Res<SimTicks>,
    settings: Res<RunSettings>,
    mut exit: EventWriter<AppExit>,
) {
    let Some(limit) = settings.ticks else {
        return;
    };
    if ticks.0 >= limit {
        info!("Reached {} ticks, stopping", ticks.0);
        exit.write(AppExit::Success);
    }
}

/// Registers the sea simulation and the runner systems on `app`.
///
/// Window-less and logger-less so tests can drive it with `app.update()`.
pub fn configure_app(app: &mut App, config: SeaConfig, settings: RunSettings) {
    app.insert_resource(Time::<Fixed>::from_hz(settings.tick_rate));
    if settings.fast {
        app.insert_resource(TimeUpdateStrategy::ManualDuration(settings.tick_duration()));
    }

    app.add_plugins(SeaSimPlugin::new(config));

    app.insert_resource(settings)
        .init_resource::<SimTicks>()
        .init_resource::<WaterMeshSummary>()
        .add_systems(Startup, log_water_mesh)
        .add_systems(FixedUpdate, count_ticks.after(step_sea_world))
        .add_systems(Update, (report_progress, exit_after_ticks).chain());
}

pub fn init(config: SeaConfig, settings: RunSettings) {
    let mut app = App::new();
    let frame = if settings.fast {
        Duration::ZERO
    } else {
        settings.tick_duration()
    };
    app.add_plugins(MinimalPlugins.set(ScheduleRunnerPlugin::run_loop(frame)));
    app.add_plugins(LogPlugin::default());

    info!(
        "Starting sea simulation at {} ticks/s{}",
        settings.tick_rate,
        if settings.fast { " (fast)" } else { "" }
    );

    configure_app(&mut app, config, settings);
    app.run();
}
