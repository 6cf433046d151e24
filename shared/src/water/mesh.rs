//! Low-poly water mesh tessellation.
//!
//! Builds a regular grid of quads in the XZ plane. Every quad gets six
//! vertices of its own (two triangles, nothing shared with the neighbours) so
//! each face can carry its own flat normal.
//!
//! ## Mesh Structure
//! - Cell `(i, j)` occupies vertex slots `(i * seg_z + j) * 6 .. + 6`
//! - Triangles are `(v00, v01, v11)` and `(v00, v11, v10)`, both facing +Y
//! - The index buffer is the identity sequence
//! - UVs and colors stay empty unless a depth pass fills them

use bevy::math::Vec3;
use log::debug;

use crate::constants::{U16_VERTEX_LIMIT, VERTICES_PER_QUAD};
use crate::water::waves::WaterHeight;

/// Order in which the four cell corners `[v00, v01, v10, v11]` are emitted.
pub const CELL_CORNER_ORDER: [usize; VERTICES_PER_QUAD] = [0, 1, 3, 0, 3, 2];

/// Width of the index buffer a renderer should use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum IndexFormat {
    #[default]
    U16,
    U32,
}

impl IndexFormat {
    pub fn for_vertex_count(vertex_count: usize) -> Self {
        if vertex_count >= U16_VERTEX_LIMIT {
            Self::U32
        } else {
            Self::U16
        }
    }
}

/// Generated water mesh data ready for upload.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct WaterMeshData {
    pub positions: Vec<[f32; 3]>,
    /// One flat normal per face, repeated on its three vertices
    pub normals: Vec<[f32; 3]>,
    /// Only the second component is used, it stores the water depth
    pub uvs: Vec<[f32; 2]>,
    pub colors: Vec<[f32; 4]>,
    pub indices: Vec<u32>,
}

impl WaterMeshData {
    pub fn new() -> Self {
        Self::default()
    }

    fn with_quad_capacity(quads: usize) -> Self {
        let vertices = quads * VERTICES_PER_QUAD;
        Self {
            positions: Vec::with_capacity(vertices),
            normals: Vec::with_capacity(vertices),
            uvs: Vec::new(),
            colors: Vec::new(),
            indices: Vec::with_capacity(vertices),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    pub fn quad_count(&self) -> usize {
        self.positions.len() / VERTICES_PER_QUAD
    }

    pub fn index_format(&self) -> IndexFormat {
        IndexFormat::for_vertex_count(self.vertex_count())
    }

    /// Indices narrowed to 16 bits, `None` when the mesh needs 32-bit indices.
    pub fn indices_u16(&self) -> Option<Vec<u16>> {
        match self.index_format() {
            IndexFormat::U16 => Some(self.indices.iter().map(|&i| i as u16).collect()),
            IndexFormat::U32 => None,
        }
    }

    /// Appends the six vertices of one quad given its corners `[v00, v01, v10, v11]`.
    fn push_cell(&mut self, corners: &[Vec3; 4]) {
        for corner in CELL_CORNER_ORDER {
            let index = self.positions.len() as u32;
            self.positions.push(corners[corner].to_array());
            self.indices.push(index);
        }
    }

    /// Recomputes one normal per triangle from its winding.
    pub fn recompute_flat_normals(&mut self) {
        self.normals.clear();
        self.normals.reserve(self.positions.len());

        for triangle in self.indices.chunks_exact(3) {
            let a = Vec3::from_array(self.positions[triangle[0] as usize]);
            let b = Vec3::from_array(self.positions[triangle[1] as usize]);
            let c = Vec3::from_array(self.positions[triangle[2] as usize]);
            let normal = (b - a).cross(c - a).normalize_or(Vec3::Y).to_array();
            self.normals.extend_from_slice(&[normal, normal, normal]);
        }
    }

    /// Moves every vertex to the water level at its XZ position.
    pub fn apply_surface(&mut self, water: &impl WaterHeight) {
        for position in &mut self.positions {
            position[1] = water.height_at(Vec3::from_array(*position));
        }
        self.recompute_flat_normals();
    }
}

/// Corners `[v00, v01, v10, v11]` of cell `(i, j)`.
pub fn cell_corners(i: usize, j: usize, quad_size: f32) -> [Vec3; 4] {
    let x0 = i as f32 * quad_size;
    let x1 = (i + 1) as f32 * quad_size;
    let z0 = j as f32 * quad_size;
    let z1 = (j + 1) as f32 * quad_size;

    [
        Vec3::new(x0, 0.0, z0),
        Vec3::new(x0, 0.0, z1),
        Vec3::new(x1, 0.0, z0),
        Vec3::new(x1, 0.0, z1),
    ]
}

/// Clamps signed grid dimensions, negative counts build nothing.
pub(crate) fn grid_dimensions(seg_x: i32, seg_z: i32) -> (usize, usize) {
    (
        usize::try_from(seg_x).unwrap_or(0),
        usize::try_from(seg_z).unwrap_or(0),
    )
}

/// Visits the corners of every cell in emission order.
pub(crate) fn for_each_cell(
    seg_x: usize,
    seg_z: usize,
    quad_size: f32,
    mut visit: impl FnMut(&[Vec3; 4]),
) {
    for i in 0..seg_x {
        for j in 0..seg_z {
            visit(&cell_corners(i, j, quad_size));
        }
    }
}

/// Builds a flat low-poly sea covering `[0, seg_x * quad_size] x [0, seg_z * quad_size]`.
pub fn build_sea_mesh(seg_x: i32, seg_z: i32, quad_size: f32) -> WaterMeshData {
    let (seg_x, seg_z) = grid_dimensions(seg_x, seg_z);
    let mut data = WaterMeshData::with_quad_capacity(seg_x * seg_z);

    for_each_cell(seg_x, seg_z, quad_size, |corners| data.push_cell(corners));
    data.recompute_flat_normals();

    debug!(
        "Built sea mesh: {} quads, {} vertices, {:?} indices",
        data.quad_count(),
        data.vertex_count(),
        data.index_format()
    );
    data
}

/// Same grid as [`build_sea_mesh`], with a per-corner hook filling UVs and colors.
pub(crate) fn build_sea_mesh_with(
    seg_x: i32,
    seg_z: i32,
    quad_size: f32,
    mut shade: impl FnMut(&Vec3) -> ([f32; 2], [f32; 4]),
) -> WaterMeshData {
    let (seg_x, seg_z) = grid_dimensions(seg_x, seg_z);
    let mut data = WaterMeshData::with_quad_capacity(seg_x * seg_z);
    data.uvs.reserve(data.positions.capacity());
    data.colors.reserve(data.positions.capacity());

    for_each_cell(seg_x, seg_z, quad_size, |corners| {
        data.push_cell(corners);
        let shaded = corners.each_ref().map(&mut shade);
        for corner in CELL_CORNER_ORDER {
            let (uv, color) = shaded[corner];
            data.uvs.push(uv);
            data.colors.push(color);
        }
    });
    data.recompute_flat_normals();
    data
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::water::waves::FlatWater;

    #[test]
    fn test_vertex_and_index_counts() {
        for (seg_x, seg_z) in [(1, 1), (3, 2), (7, 5)] {
            let data = build_sea_mesh(seg_x, seg_z, 2.0);
            let expected = (seg_x * seg_z) as usize * 6;
            assert_eq!(data.positions.len(), expected);
            assert_eq!(data.indices.len(), data.positions.len());
            assert_eq!(data.normals.len(), data.positions.len());
            assert!(data
                .indices
                .iter()
                .enumerate()
                .all(|(i, &index)| index as usize == i));
        }
    }

    #[test]
    fn test_empty_grid() {
        for (seg_x, seg_z) in [(0, 0), (0, 4), (4, 0), (-2, 3)] {
            let data = build_sea_mesh(seg_x, seg_z, 1.0);
            assert!(data.is_empty());
            assert!(data.indices.is_empty());
        }
    }

    #[test]
    fn test_two_by_one_layout() {
        let data = build_sea_mesh(2, 1, 1.0);
        assert_eq!(data.positions.len(), 12);
        assert_eq!(data.indices, (0..12).collect::<Vec<u32>>());
        assert_eq!(
            &data.positions[..6],
            &[
                [0.0, 0.0, 0.0],
                [0.0, 0.0, 1.0],
                [1.0, 0.0, 1.0],
                [0.0, 0.0, 0.0],
                [1.0, 0.0, 1.0],
                [1.0, 0.0, 0.0],
            ]
        );
        // second cell is i = 1
        assert_eq!(data.positions[6], [1.0, 0.0, 0.0]);
        assert_eq!(data.positions[11], [2.0, 0.0, 0.0]);
    }

    #[test]
    fn test_quad_size_scales_extent() {
        let data = build_sea_mesh(3, 4, 2.5);
        let max_x = data.positions.iter().map(|p| p[0]).fold(0.0, f32::max);
        let max_z = data.positions.iter().map(|p| p[2]).fold(0.0, f32::max);
        assert_eq!(max_x, 7.5);
        assert_eq!(max_z, 10.0);
    }

    #[test]
    fn test_flat_normals_face_up() {
        let data = build_sea_mesh(2, 2, 1.0);
        assert!(data.normals.iter().all(|n| *n == [0.0, 1.0, 0.0]));
    }

    #[test]
    fn test_index_format_threshold() {
        assert_eq!(IndexFormat::for_vertex_count(0), IndexFormat::U16);
        assert_eq!(IndexFormat::for_vertex_count(65_535), IndexFormat::U16);
        assert_eq!(IndexFormat::for_vertex_count(65_536), IndexFormat::U32);

        // 10922 quads = 65532 vertices, 10923 quads = 65538 vertices
        assert_eq!(build_sea_mesh(10_922, 1, 1.0).index_format(), IndexFormat::U16);
        let large = build_sea_mesh(10_923, 1, 1.0);
        assert_eq!(large.index_format(), IndexFormat::U32);
        assert!(large.indices_u16().is_none());
    }

    #[test]
    fn test_apply_surface_lifts_vertices() {
        let mut data = build_sea_mesh(2, 2, 1.0);
        data.apply_surface(&FlatWater(1.5));
        assert!(data.positions.iter().all(|p| p[1] == 1.5));
        assert_eq!(data.normals.len(), data.positions.len());
    }
}
