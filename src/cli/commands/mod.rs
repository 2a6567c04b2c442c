//! CLI command implementations

pub mod analyze;
pub mod frameworks;
pub mod init;
pub mod validate;
