//! Targets: named, gated groups of tasks

use crate::runner::task::Task;
use std::fmt;

/// A named step of the build
pub struct Target {
    /// Target name
    pub name: String,

    /// Description shown by `--list`
    pub description: Option<String>,

    /// Targets that must complete first, in order
    pub depends: Vec<String>,

    /// Run only if this expands to true
    pub if_expr: Option<String>,

    /// Skip if this expands to true
    pub unless_expr: Option<String>,

    /// Tasks, executed in order
    pub tasks: Vec<Box<dyn Task>>,
}

impl Target {
    /// Create a target with no dependencies, conditions or tasks
    pub fn new(name: impl Into<String>) -> Self {
        Target {
            name: name.into(),
            description: None,
            depends: Vec::new(),
            if_expr: None,
            unless_expr: None,
            tasks: Vec::new(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Add a dependency; listing one twice has no effect
    pub fn depends_on(mut self, target: impl Into<String>) -> Self {
        let target = target.into();
        if !self.depends.contains(&target) {
            self.depends.push(target);
        }
        self
    }

    pub fn with_if(mut self, condition: impl Into<String>) -> Self {
        self.if_expr = Some(condition.into());
        self
    }

    pub fn with_unless(mut self, condition: impl Into<String>) -> Self {
        self.unless_expr = Some(condition.into());
        self
    }

    pub fn with_task(mut self, task: Box<dyn Task>) -> Self {
        self.tasks.push(task);
        self
    }
}

impl fmt::Debug for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Target")
            .field("name", &self.name)
            .field("depends", &self.depends)
            .field("if_expr", &self.if_expr)
            .field("unless_expr", &self.unless_expr)
            .field("tasks", &self.tasks.len())
            .finish()
    }
}

/// Execution state of a target within one build
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetState {
    Pending,
    Skipped,
    Running,
    Succeeded,
    Failed,
}

impl TargetState {
    /// Check if dependents may proceed
    pub fn is_done(self) -> bool {
        matches!(self, TargetState::Skipped | TargetState::Succeeded)
    }
}

impl fmt::Display for TargetState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            TargetState::Pending => "pending",
            TargetState::Skipped => "skipped",
            TargetState::Running => "running",
            TargetState::Succeeded => "succeeded",
            TargetState::Failed => "failed",
        };
        f.write_str(text)
    }
}
