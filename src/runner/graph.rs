//! Target graph and execution planning

use crate::error::{GraphError, GraphResult};
use crate::runner::target::Target;
use std::collections::{BTreeMap, HashMap};

/// All targets of a project plus the default target
#[derive(Debug, Default)]
pub struct TargetGraph {
    targets: BTreeMap<String, Target>,
    default_target: Option<String>,
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Mark {
    Visiting,
    Done,
}

impl TargetGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a target, replacing any target with the same name
    pub fn add(&mut self, target: Target) {
        self.targets.insert(target.name.clone(), target);
    }

    pub fn get(&self, name: &str) -> Option<&Target> {
        self.targets.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.targets.contains_key(name)
    }

    /// Targets sorted by name
    pub fn targets(&self) -> impl Iterator<Item = &Target> {
        self.targets.values()
    }

    pub fn len(&self) -> usize {
        self.targets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }

    pub fn default_target(&self) -> Option<&str> {
        self.default_target.as_deref()
    }

    pub fn set_default_target(&mut self, name: Option<String>) {
        self.default_target = name;
    }

    /// Compute the execution plan for `requested`, or for the default target
    /// when nothing is requested.
    ///
    /// The plan lists every target in the dependency closure exactly once,
    /// each after all of its dependencies, visiting dependencies depth-first
    /// in the order they are listed.
    pub fn resolve(&self, requested: &[String]) -> GraphResult<Vec<String>> {
        let roots: Vec<&str> = if requested.is_empty() {
            vec![self.default_target().ok_or(GraphError::NoDefaultTarget)?]
        } else {
            requested.iter().map(String::as_str).collect()
        };

        if let Some(unknown) = roots.iter().find(|r| !self.contains(r)) {
            return Err(GraphError::UnknownTarget(unknown.to_string()));
        }

        let mut marks = HashMap::new();
        let mut path = Vec::new();
        let mut plan = Vec::new();
        for root in roots {
            self.visit(root, &mut marks, &mut path, &mut plan)?;
        }
        Ok(plan)
    }

    /// Check the whole graph for undefined dependencies and cycles
    pub fn validate(&self) -> GraphResult<()> {
        if let Some(default) = self.default_target() {
            if !self.contains(default) {
                return Err(GraphError::UnknownTarget(default.to_string()));
            }
        }

        let mut marks = HashMap::new();
        let mut path = Vec::new();
        let mut plan = Vec::new();
        for name in self.targets.keys() {
            self.visit(name, &mut marks, &mut path, &mut plan)?;
        }
        Ok(())
    }

    fn visit<'g>(
        &'g self,
        name: &'g str,
        marks: &mut HashMap<&'g str, Mark>,
        path: &mut Vec<&'g str>,
        plan: &mut Vec<String>,
    ) -> GraphResult<()> {
        match marks.get(name) {
            Some(Mark::Done) => return Ok(()),
            Some(Mark::Visiting) => {
                let start = path.iter().position(|n| *n == name).unwrap_or(0);
                let mut cycle: Vec<&str> = path[start..].to_vec();
                cycle.push(name);
                return Err(GraphError::Cycle(cycle.join(" -> ")));
            }
            None => {}
        }

        let target = self
            .targets
            .get(name)
            .ok_or_else(|| GraphError::UnknownTarget(name.to_string()))?;

        marks.insert(name, Mark::Visiting);
        path.push(name);

        for dependency in &target.depends {
            if !self.contains(dependency) {
                return Err(GraphError::UnknownDependency {
                    target: name.to_string(),
                    dependency: dependency.clone(),
                });
            }
            self.visit(dependency, marks, path, plan)?;
        }

        path.pop();
        marks.insert(name, Mark::Done);
        plan.push(name.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn graph(edges: &[(&str, &[&str])]) -> TargetGraph {
        let mut graph = TargetGraph::new();
        for (name, depends) in edges {
            let mut target = Target::new(*name);
            for dep in *depends {
                target = target.depends_on(*dep);
            }
            graph.add(target);
        }
        graph
    }

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_dependencies_first_in_listed_order() {
        let g = graph(&[
            ("build", &["init", "compile"]),
            ("compile", &["init"]),
            ("init", &[]),
        ]);
        assert_eq!(
            g.resolve(&names(&["build"])).unwrap(),
            names(&["init", "compile", "build"])
        );
    }

    #[test]
    fn test_diamond_runs_shared_dependency_once() {
        let g = graph(&[
            ("a", &["b", "c"]),
            ("b", &["d"]),
            ("c", &["d"]),
            ("d", &[]),
        ]);
        assert_eq!(
            g.resolve(&names(&["a"])).unwrap(),
            names(&["d", "b", "c", "a"])
        );
    }

    #[test]
    fn test_multiple_requested_targets_share_plan() {
        let g = graph(&[("x", &["common"]), ("y", &["common"]), ("common", &[])]);
        assert_eq!(
            g.resolve(&names(&["x", "y", "x"])).unwrap(),
            names(&["common", "x", "y"])
        );
    }

    #[test]
    fn test_default_target() {
        let mut g = graph(&[("main", &[])]);
        assert_eq!(g.resolve(&[]), Err(GraphError::NoDefaultTarget));

        g.set_default_target(Some("main".to_string()));
        assert_eq!(g.resolve(&[]).unwrap(), names(&["main"]));
    }

    #[test]
    fn test_cycle_names_path() {
        let g = graph(&[("a", &["b"]), ("b", &["c"]), ("c", &["a"])]);
        assert_eq!(
            g.resolve(&names(&["a"])),
            Err(GraphError::Cycle("a -> b -> c -> a".to_string()))
        );
    }

    #[test]
    fn test_self_dependency_is_a_cycle() {
        let g = graph(&[("a", &["a"])]);
        assert_eq!(
            g.resolve(&names(&["a"])),
            Err(GraphError::Cycle("a -> a".to_string()))
        );
    }

    #[test]
    fn test_unknown_targets() {
        let g = graph(&[("a", &["missing"])]);
        assert_eq!(
            g.resolve(&names(&["nope"])),
            Err(GraphError::UnknownTarget("nope".to_string()))
        );
        assert_eq!(
            g.resolve(&names(&["a"])),
            Err(GraphError::UnknownDependency {
                target: "a".to_string(),
                dependency: "missing".to_string(),
            })
        );
    }

    #[test]
    fn test_validate_finds_unreachable_cycle() {
        let g = graph(&[("ok", &[]), ("p", &["q"]), ("q", &["p"])]);
        assert!(g.resolve(&names(&["ok"])).is_ok());
        assert_eq!(g.validate(), Err(GraphError::Cycle("p -> q -> p".to_string())));
    }
}
