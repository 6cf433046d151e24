//! Sea mesh upload and animation.
//!
//! The grid is generated once from the sea configuration and kept as a base copy.
//! Every frame the base copy is displaced by the current sea surface and written
//! back into the mesh asset. `R` regenerates the base copy, re-probing depth.

use bevy::{
    prelude::*,
    render::mesh::{Indices, Mesh, PrimitiveTopology},
};
use shared::sim::SeaWorld;
use shared::water::WaterMeshData;
use shared::{SeaColliders, SeaConfig};

/// Marker component for the sea surface entity
#[derive(Component)]
pub struct WaterSurface;

/// Undisplaced mesh data the animation starts from each frame.
#[derive(Resource, Default)]
pub struct SeaMeshBase {
    pub data: WaterMeshData,
    pub mesh: Handle<Mesh>,
}

/// Converts generated data into a Bevy mesh, `None` for an empty grid.
pub fn into_mesh(data: WaterMeshData) -> Option<Mesh> {
    if data.is_empty() {
        return None;
    }

    let indices = match data.indices_u16() {
        Some(indices) => Indices::U16(indices),
        None => Indices::U32(data.indices),
    };

    let mut mesh = Mesh::new(PrimitiveTopology::TriangleList, Default::default());
    mesh.insert_attribute(Mesh::ATTRIBUTE_POSITION, data.positions);
    mesh.insert_attribute(Mesh::ATTRIBUTE_NORMAL, data.normals);
    if !data.uvs.is_empty() {
        mesh.insert_attribute(Mesh::ATTRIBUTE_UV_0, data.uvs);
    }
    if !data.colors.is_empty() {
        mesh.insert_attribute(Mesh::ATTRIBUTE_COLOR, data.colors);
    }
    mesh.insert_indices(indices);
    Some(mesh)
}

fn generate(config: &SeaConfig, colliders: &SeaColliders) -> WaterMeshData {
    let data = config.build_water_mesh(&colliders.0);
    info!(
        "Generated sea mesh: {} quads, {:?} indices",
        data.quad_count(),
        data.index_format()
    );
    data
}

pub fn setup_water_surface(
    mut commands: Commands,
    config: Res<SeaConfig>,
    colliders: Res<SeaColliders>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    let data = generate(&config, &colliders);
    let Some(mesh) = into_mesh(data.clone()) else {
        warn!("Sea grid is empty, nothing to render");
        return;
    };
    let mesh = meshes.add(mesh);

    // Vertex colors multiply the base color, so depth-shaded meshes keep a white base
    let base_color = if config.depth.enabled {
        Color::WHITE
    } else {
        Color::srgb(0.1, 0.3, 0.6)
    };
    let material = materials.add(StandardMaterial {
        base_color,
        perceptual_roughness: 0.6,
        cull_mode: None,
        ..default()
    });

    commands.spawn((
        WaterSurface,
        Mesh3d(mesh.clone()),
        MeshMaterial3d(material),
        Transform::IDENTITY,
    ));
    commands.insert_resource(SeaMeshBase { data, mesh });
}

/// Moves the surface vertices to the sea state of the current tick.
pub fn animate_water_surface(
    base: Res<SeaMeshBase>,
    world: Res<SeaWorld>,
    mut meshes: ResMut<Assets<Mesh>>,
) {
    let Some(mesh) = meshes.get_mut(&base.mesh) else {
        return;
    };

    let mut data = base.data.clone();
    data.apply_surface(&world.snapshot());
    mesh.insert_attribute(Mesh::ATTRIBUTE_POSITION, data.positions);
    mesh.insert_attribute(Mesh::ATTRIBUTE_NORMAL, data.normals);
}

pub fn rebuild_water_surface_system(
    keyboard_input: Res<ButtonInput<KeyCode>>,
    config: Res<SeaConfig>,
    colliders: Res<SeaColliders>,
    mut base: ResMut<SeaMeshBase>,
    mut meshes: ResMut<Assets<Mesh>>,
) {
    if !keyboard_input.just_pressed(KeyCode::KeyR) {
        return;
    }

    let data = generate(&config, &colliders);
    if let Some(mesh) = into_mesh(data.clone()) {
        if let Some(existing) = meshes.get_mut(&base.mesh) {
            *existing = mesh;
        }
    }
    base.data = data;
}
