//! Build-wide property store
//!
//! Properties are named text values shared by every target of a build.
//! A property may be read-only (later assignments are ignored) or dynamic
//! (its raw text is re-expanded on every read).

pub mod name;
pub mod store;

// Re-export main types
pub use name::*;
pub use store::*;
