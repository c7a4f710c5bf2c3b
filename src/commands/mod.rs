//! CLI command implementations.

pub mod aggregate;
pub mod init;
pub mod run;
pub mod sources;
