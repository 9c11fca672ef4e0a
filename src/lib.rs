//! Brisk - a YAML-described build engine
//!
//! Brisk runs named targets in dependency order, sequentially or
//! concurrently. Target conditions and task settings may contain `${...}`
//! expressions over a project-wide property store, and tasks can select files
//! with Ant-style include/exclude patterns.

pub mod cli;
pub mod config;
pub mod error;
pub mod expr;
pub mod fileset;
pub mod logging;
pub mod property;
pub mod runner;
pub mod tasks;

pub use error::{BriskError, Result};

/// Current version of Brisk
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
