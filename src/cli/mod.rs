//! CLI interface and argument parsing
//!
//! This module handles command-line parsing, target listing and shell
//! completion.

pub mod app;

pub use app::*;
