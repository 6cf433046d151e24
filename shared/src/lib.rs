pub mod config;
pub mod constants;
pub mod plugin;
pub mod sim;
pub mod water;

pub use config::*;
pub use constants::*;
pub use plugin::*;
