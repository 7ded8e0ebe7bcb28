//! CLI command implementations.

pub mod config;
pub mod group;
pub mod reconcile;
