//! Build execution engine
//!
//! This module resolves the target graph, evaluates each target's gate and
//! runs its tasks, sequentially or on worker threads.

pub mod context;
pub mod gate;
pub mod graph;
pub mod project;
pub mod scheduler;
pub mod target;
pub mod task;

// Re-export main types
pub use context::*;
pub use gate::*;
pub use graph::*;
pub use project::*;
pub use scheduler::*;
pub use target::*;
pub use task::*;
