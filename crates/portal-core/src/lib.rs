//! Ambient plumbing shared by portal binaries: config loading and
//! tracing setup.

pub mod config;
pub mod tracing;
