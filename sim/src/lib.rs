pub mod init;
pub mod report;

pub use init::*;
