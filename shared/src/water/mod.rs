pub mod depth;
pub mod gradient;
pub mod mesh;
pub mod scene;
pub mod waves;

pub use depth::*;
pub use gradient::*;
pub use mesh::*;
pub use scene::*;
pub use waves::*;
