//! CLI command implementations

pub mod generate;
pub mod info;
pub mod init;
pub mod sample;
pub mod zone;
