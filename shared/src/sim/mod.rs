pub mod gun;
pub mod projectile;
pub mod ship;
pub mod world;

pub use gun::*;
pub use projectile::*;
pub use ship::*;
pub use world::*;
