pub mod water_debug;
pub mod water_mesh;

pub use water_debug::*;
pub use water_mesh::*;
