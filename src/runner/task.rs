//! Tasks and the task registry
//!
//! A task is an opaque unit of work inside a target. Tasks are built from
//! their YAML configuration by factories registered under the task's name.

use crate::error::{ConfigError, ConfigResult, ExpressionResult, ScanResult, TaskResult};
use crate::expr::{BuildInfo, Evaluator};
use crate::fileset::{normalize_path, FileSet, ScannedPaths};
use crate::property::PropertyStore;
use crate::runner::context::BuildOptions;
use crate::runner::project::Project;
use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};

/// A unit of work executed as part of a target
pub trait Task: Send + Sync + fmt::Debug {
    /// Task type name, as written in the build file
    fn name(&self) -> &str;

    /// Run the task
    fn execute(&self, ctx: &TaskContext<'_>) -> TaskResult<()>;
}

/// Everything a task can reach while it executes
pub struct TaskContext<'a> {
    project: &'a Project,
    target: &'a str,
    options: &'a BuildOptions,
    evaluator: Evaluator<'a>,
}

impl<'a> TaskContext<'a> {
    /// Create a context for a task of `target`
    pub fn new(
        project: &'a Project,
        target: &'a str,
        options: &'a BuildOptions,
        build: &'a dyn BuildInfo,
    ) -> Self {
        let evaluator = project.evaluator().with_build(build);
        TaskContext {
            project,
            target,
            options,
            evaluator,
        }
    }

    /// Name of the target the task belongs to
    pub fn target_name(&self) -> &str {
        self.target
    }

    pub fn project(&self) -> &'a Project {
        self.project
    }

    pub fn options(&self) -> &'a BuildOptions {
        self.options
    }

    pub fn properties(&self) -> &'a PropertyStore {
        self.project.properties()
    }

    pub fn evaluator(&self) -> &Evaluator<'a> {
        &self.evaluator
    }

    /// Expand all `${...}` spans in `text`
    pub fn expand(&self, text: &str) -> ExpressionResult<String> {
        self.evaluator.expand(text)
    }

    /// Expand `text` as a boolean
    pub fn expand_bool(&self, text: &str) -> ExpressionResult<bool> {
        self.evaluator.expand_bool(text)
    }

    /// Expand a path and resolve it against the project base directory
    pub fn resolve_path(&self, text: &str) -> ExpressionResult<PathBuf> {
        let expanded = self.expand(text)?;
        Ok(self.resolve(Path::new(&expanded)))
    }

    /// Resolve an already expanded path against the project base directory
    pub fn resolve(&self, path: &Path) -> PathBuf {
        normalize_path(&self.project.base_dir().join(path))
    }

    /// Scan the filesystem
    pub fn scan(&self, fileset: &FileSet) -> ScanResult<ScannedPaths> {
        fileset.scan()
    }
}

/// Builds a task from its YAML configuration
pub type TaskFactory = fn(&serde_yaml::Value) -> ConfigResult<Box<dyn Task>>;

/// Task factories keyed by task name
#[derive(Clone, Default)]
pub struct TaskRegistry {
    factories: HashMap<String, TaskFactory>,
}

impl TaskRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry holding the built-in tasks
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        crate::tasks::register_builtins(&mut registry);
        registry
    }

    /// Register a factory, replacing any previous one with the same name
    pub fn register(&mut self, name: &str, factory: TaskFactory) {
        self.factories.insert(name.to_string(), factory);
    }

    pub fn contains(&self, name: &str) -> bool {
        self.factories.contains_key(name)
    }

    /// Build a task of type `name`
    pub fn create(&self, name: &str, config: &serde_yaml::Value) -> ConfigResult<Box<dyn Task>> {
        let factory = self
            .factories
            .get(name)
            .ok_or_else(|| ConfigError::UnknownTask(name.to_string()))?;
        factory(config)
    }

    /// Registered task names, sorted
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.factories.keys().cloned().collect();
        names.sort();
        names
    }
}

impl fmt::Debug for TaskRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TaskRegistry")
            .field("tasks", &self.names())
            .finish()
    }
}

/// Deserialize a task's configuration into `T`, naming the task on failure
pub fn task_config<T: serde::de::DeserializeOwned>(
    task: &str,
    config: &serde_yaml::Value,
) -> ConfigResult<T> {
    serde_yaml::from_value(config.clone()).map_err(|e| ConfigError::TaskConfig {
        task: task.to_string(),
        error: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TaskError;

    #[derive(Debug)]
    struct Noop;

    impl Task for Noop {
        fn name(&self) -> &str {
            "noop"
        }

        fn execute(&self, _ctx: &TaskContext<'_>) -> TaskResult<()> {
            Ok(())
        }
    }

    fn noop(_: &serde_yaml::Value) -> ConfigResult<Box<dyn Task>> {
        Ok(Box::new(Noop))
    }

    #[test]
    fn test_register_and_create() {
        let mut registry = TaskRegistry::new();
        registry.register("noop", noop);

        assert!(registry.contains("noop"));
        let task = registry.create("noop", &serde_yaml::Value::Null).unwrap();
        assert_eq!(task.name(), "noop");
    }

    #[test]
    fn test_unknown_task() {
        let registry = TaskRegistry::new();
        assert!(matches!(
            registry.create("nope", &serde_yaml::Value::Null),
            Err(ConfigError::UnknownTask(name)) if name == "nope"
        ));
    }

    #[test]
    fn test_builtins_registered() {
        let names = TaskRegistry::with_builtins().names();
        for name in ["echo", "exec", "fail", "fileset", "property", "sleep"] {
            assert!(names.iter().any(|n| n == name), "{name}");
        }
    }

    #[test]
    fn test_task_config_names_task() {
        #[derive(Debug, serde::Deserialize)]
        struct Config {
            #[allow(dead_code)]
            count: u32,
        }

        let value: serde_yaml::Value = serde_yaml::from_str("count: lots").unwrap();
        match task_config::<Config>("demo", &value) {
            Err(ConfigError::TaskConfig { task, .. }) => assert_eq!(task, "demo"),
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn test_task_error_display() {
        let err = TaskError::Failed("boom".to_string());
        assert_eq!(err.to_string(), "boom");
    }
}
