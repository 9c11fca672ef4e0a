//! Build file parsing, validation and loading
//!
//! This module handles brisk.yml files: locating them, deserializing them,
//! checking them, and turning them into a [`Project`](crate::runner::Project).

pub mod load;
pub mod parse;
pub mod schema;
pub mod types;

pub use load::*;
pub use parse::*;
pub use schema::*;
pub use types::*;
