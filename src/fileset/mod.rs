//! Filesets: include/exclude pattern resolution against a directory tree

pub mod defaults;
pub mod pattern;
pub mod scanner;

// Re-export main types
pub use defaults::{DefaultExcludes, BUILTIN_DEFAULT_EXCLUDES};
pub use pattern::{normalize_path, path_components, Pattern};
pub use scanner::{FileSet, ScannedPaths};
