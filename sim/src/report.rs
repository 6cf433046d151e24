//! Log output of the headless runner.

use bevy::prelude::*;
use bevy_log::info;
use shared::sim::SeaWorld;
use shared::water::{IndexFormat, WaterMeshData};
use shared::{SeaColliders, SeaConfig};

#[derive(Resource, Debug, Default, Clone, Copy, PartialEq)]
pub struct WaterMeshSummary {
    pub quads: usize,
    pub vertices: usize,
    pub index_format: IndexFormat,
    /// Average probed depth, `None` for a mesh built without depth
    pub mean_depth: Option<f32>,
}

impl WaterMeshSummary {
    pub fn of(data: &WaterMeshData) -> Self {
        let mean_depth = (!data.uvs.is_empty())
            .then(|| data.uvs.iter().map(|uv| uv[1]).sum::<f32>() / data.uvs.len() as f32);
        Self {
            quads: data.quad_count(),
            vertices: data.vertex_count(),
            index_format: data.index_format(),
            mean_depth,
        }
    }
}

/// Builds the water mesh once so a headless run reports what a client would render.
pub fn log_water_mesh(
    config: Res<SeaConfig>,
    colliders: Res<SeaColliders>,
    mut summary: ResMut<WaterMeshSummary>,
) {
    let data = config.build_water_mesh(&colliders.0);
    *summary = WaterMeshSummary::of(&data);

    match summary.mean_depth {
        Some(depth) => info!(
            "Water mesh: {} quads, {} vertices, {:?} indices, mean depth {:.2}m",
            summary.quads, summary.vertices, summary.index_format, depth
        ),
        None => info!(
            "Water mesh: {} quads, {} vertices, {:?} indices, no depth",
            summary.quads, summary.vertices, summary.index_format
        ),
    }
}

/// Logs ship heights and live bullets once per simulated second.
pub fn report_progress(world: Res<SeaWorld>, mut last_second: Local<u32>) {
    let second = world.time().floor() as u32;
    if second <= *last_second {
        return;
    }
    *last_second = second;

    let heights: Vec<String> = world
        .ships
        .iter()
        .map(|ship| format!("{:.2}", ship.position.y))
        .collect();
    info!(
        "t={}s ships at [{}], {} bullets in flight",
        second,
        heights.join(", "),
        world.bullet_count()
    );
}
