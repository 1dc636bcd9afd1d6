//! memcube: Memory Cube Configuration Management
//!
//! Typed configuration records for memory cubes, and the merge that upgrades an existing
//! cube's record to a newer default template while keeping the cube's identity and its
//! deployment-specific graph-database settings.

pub mod cli;
pub mod config;
pub mod cube;
pub mod error;
pub mod logging;
pub mod merge;
pub mod repo;

pub use cube::MemCubeConfig;
pub use error::CubeError;
pub use merge::{merge_config_with_default, ConfigMerger};
pub use repo::fetch_repository;
