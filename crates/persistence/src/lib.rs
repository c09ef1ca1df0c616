//! Persistence layer for the Quizdeck backend.
//!
//! This crate contains:
//! - The shared database handle with its connect/disconnect lifecycle
//! - Entity definitions (database row mappings)
//! - Repository implementations

pub mod db;
pub mod entities;
pub mod metrics;
pub mod repositories;
