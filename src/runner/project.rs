//! Projects
//!
//! A project owns everything one build needs: the target graph, the
//! property store and the function registry.

use crate::error::{BuildResult, PropertyResult};
use crate::expr::{Evaluator, FunctionRegistry};
use crate::property::PropertyStore;
use crate::runner::context::BuildOptions;
use crate::runner::graph::TargetGraph;
use crate::runner::scheduler::{BuildReport, Executor};
use crate::runner::target::Target;
use std::path::{Path, PathBuf};

/// A loaded build description
#[derive(Debug)]
pub struct Project {
    name: String,
    base_dir: PathBuf,
    graph: TargetGraph,
    properties: PropertyStore,
    functions: FunctionRegistry,
}

impl Project {
    /// Create an empty project and define its built-in read-only properties
    pub fn new(name: impl Into<String>, base_dir: impl Into<PathBuf>) -> PropertyResult<Self> {
        let project = Project {
            name: name.into(),
            base_dir: base_dir.into(),
            graph: TargetGraph::new(),
            properties: PropertyStore::new(),
            functions: FunctionRegistry::with_builtins(),
        };

        project.properties.set_read_only("project.name", &project.name)?;
        project
            .properties
            .set_read_only("project.basedir", project.base_dir.to_string_lossy())?;
        project
            .properties
            .set_read_only("brisk.version", env!("CARGO_PKG_VERSION"))?;

        Ok(project)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Directory relative paths resolve against
    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    pub fn graph(&self) -> &TargetGraph {
        &self.graph
    }

    pub fn graph_mut(&mut self) -> &mut TargetGraph {
        &mut self.graph
    }

    pub fn properties(&self) -> &PropertyStore {
        &self.properties
    }

    pub fn functions(&self) -> &FunctionRegistry {
        &self.functions
    }

    pub fn functions_mut(&mut self) -> &mut FunctionRegistry {
        &mut self.functions
    }

    pub fn add_target(&mut self, target: Target) {
        self.graph.add(target);
    }

    pub fn default_target(&self) -> Option<&str> {
        self.graph.default_target()
    }

    /// Set the default target and expose it as `project.default`
    pub fn set_default_target(&mut self, name: impl Into<String>) -> PropertyResult<()> {
        let name = name.into();
        self.properties.set_read_only("project.default", &name)?;
        self.graph.set_default_target(Some(name));
        Ok(())
    }

    /// Evaluator over this project's properties and functions
    pub fn evaluator(&self) -> Evaluator<'_> {
        Evaluator::new(&self.properties, &self.functions).with_base_dir(&self.base_dir)
    }

    /// Run `targets`, or the default target when none are given
    pub fn build(&self, targets: &[String], options: &BuildOptions) -> BuildResult<BuildReport> {
        Executor::new(self, options).run(targets)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_properties() {
        let mut project = Project::new("demo", "/work/demo").unwrap();
        project.set_default_target("build").unwrap();

        let props = project.properties();
        assert_eq!(props.raw("project.name").unwrap().text(), "demo");
        assert_eq!(props.raw("project.basedir").unwrap().text(), "/work/demo");
        assert_eq!(props.raw("project.default").unwrap().text(), "build");
        assert!(props.is_read_only("brisk.version"));

        // read-only: later assignments are ignored
        props.set("project.name", "other").unwrap();
        assert_eq!(props.raw("project.name").unwrap().text(), "demo");
    }

    #[test]
    fn test_evaluator_uses_base_dir() {
        let project = Project::new("demo", "/work/demo").unwrap();
        assert_eq!(
            project.evaluator().expand("${project::get-base-directory()}").unwrap(),
            "/work/demo"
        );
    }
}
