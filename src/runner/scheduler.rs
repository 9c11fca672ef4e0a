//! Build execution
//!
//! Sequential builds run the plan in order on the calling thread. Parallel
//! builds start every target whose dependencies are done on its own scoped
//! thread and collect completions over a channel; after the first failure no
//! new target starts, running ones finish, and the first error is returned.

use crate::error::{BuildError, BuildResult, GraphError};
use crate::expr::BuildInfo;
use crate::runner::context::BuildOptions;
use crate::runner::gate::evaluate_gate;
use crate::runner::project::Project;
use crate::runner::target::TargetState;
use crate::runner::task::TaskContext;
use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::{mpsc, Mutex, MutexGuard, PoisonError};
use std::thread;
use std::time::{Duration, Instant};
use tracing::{debug, error};

/// Summary of a finished build
#[derive(Debug, Clone)]
pub struct BuildReport {
    /// Every planned target with its final state, in plan order
    pub targets: Vec<(String, TargetState)>,

    /// Targets in the order they finished (succeeded or skipped)
    pub completed: Vec<String>,

    pub duration: Duration,
}

impl BuildReport {
    pub fn state(&self, name: &str) -> Option<TargetState> {
        self.targets
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, state)| *state)
    }

    /// Targets whose tasks ran, in completion order
    pub fn executed(&self) -> Vec<&str> {
        self.completed
            .iter()
            .filter(|name| self.state(name) == Some(TargetState::Succeeded))
            .map(String::as_str)
            .collect()
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Runs one build of a project
pub struct Executor<'p> {
    project: &'p Project,
    options: &'p BuildOptions,
    states: Mutex<HashMap<String, TargetState>>,
    completed: Mutex<Vec<String>>,
}

impl<'p> Executor<'p> {
    pub fn new(project: &'p Project, options: &'p BuildOptions) -> Self {
        Executor {
            project,
            options,
            states: Mutex::new(HashMap::new()),
            completed: Mutex::new(Vec::new()),
        }
    }

    /// Run `requested`, or the default target when empty
    pub fn run(&self, requested: &[String]) -> BuildResult<BuildReport> {
        let started = Instant::now();
        let plan = self.project.graph().resolve(requested)?;

        {
            let mut states = lock(&self.states);
            for name in &plan {
                states.insert(name.clone(), TargetState::Pending);
            }
        }

        debug!(
            project = self.project.name(),
            targets = ?plan,
            parallel = self.options.parallel,
            "Starting build"
        );

        if self.options.parallel && plan.len() > 1 {
            self.run_concurrent(&plan)?;
        } else {
            for name in &plan {
                self.run_target(name)?;
            }
        }

        let report = BuildReport {
            targets: plan
                .iter()
                .map(|name| (name.clone(), self.state(name).unwrap_or(TargetState::Pending)))
                .collect(),
            completed: lock(&self.completed).clone(),
            duration: started.elapsed(),
        };
        debug!(elapsed_ms = report.duration.as_millis() as u64, "Build finished");
        Ok(report)
    }

    /// Current state of a target, if it is part of this build
    pub fn state(&self, name: &str) -> Option<TargetState> {
        lock(&self.states).get(name).copied()
    }

    fn set_state(&self, name: &str, state: TargetState) {
        lock(&self.states).insert(name.to_string(), state);
    }

    fn finish(&self, name: &str, state: TargetState) {
        self.set_state(name, state);
        lock(&self.completed).push(name.to_string());
    }

    fn run_target(&self, name: &str) -> BuildResult<()> {
        let target = self
            .project
            .graph()
            .get(name)
            .ok_or_else(|| GraphError::UnknownTarget(name.to_string()))?;

        let view = TargetView {
            executor: self,
            current: name,
        };
        let ctx = TaskContext::new(self.project, name, self.options, &view);

        let decision = match evaluate_gate(target, ctx.evaluator()) {
            Ok(decision) => decision,
            Err(source) => {
                self.set_state(name, TargetState::Failed);
                return Err(BuildError::Gate {
                    target: name.to_string(),
                    source,
                });
            }
        };

        if let Some(reason) = decision.reason() {
            debug!(target_name = name, %reason, "Skipping target");
            self.options.print_target_skip(name, &reason);
            self.finish(name, TargetState::Skipped);
            return Ok(());
        }

        self.set_state(name, TargetState::Running);
        self.options.print_target_start(name);
        let started = Instant::now();

        for task in &target.tasks {
            debug!(target_name = name, task = task.name(), "Executing task");
            if let Err(source) = task.execute(&ctx) {
                self.set_state(name, TargetState::Failed);
                return Err(BuildError::TargetFailed {
                    target: name.to_string(),
                    source,
                });
            }
        }

        debug!(
            target_name = name,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Target finished"
        );
        self.finish(name, TargetState::Succeeded);
        Ok(())
    }

    fn run_concurrent(&self, plan: &[String]) -> BuildResult<()> {
        let graph = self.project.graph();
        let mut pending: HashMap<&str, usize> = HashMap::new();
        let mut dependents: HashMap<&str, Vec<&str>> = HashMap::new();

        for name in plan {
            let target = graph
                .get(name)
                .ok_or_else(|| GraphError::UnknownTarget(name.clone()))?;
            let depends: HashSet<&str> = target.depends.iter().map(String::as_str).collect();
            pending.insert(name.as_str(), depends.len());
            for dependency in depends {
                dependents.entry(dependency).or_default().push(name.as_str());
            }
        }

        let mut ready: VecDeque<&str> = plan
            .iter()
            .map(String::as_str)
            .filter(|name| pending.get(name) == Some(&0))
            .collect();
        let limit = self.options.job_limit();

        thread::scope(|scope| {
            let (tx, rx) = mpsc::channel::<(&str, BuildResult<()>)>();
            let mut running = 0usize;
            let mut first_error: Option<BuildError> = None;

            loop {
                while first_error.is_none() && running < limit {
                    let Some(name) = ready.pop_front() else {
                        break;
                    };
                    running += 1;
                    debug!(target_name = name, running, "Starting target on worker thread");

                    let tx = tx.clone();
                    scope.spawn(move || {
                        let result = self.run_target(name);
                        // the receiver outlives every worker
                        let _ = tx.send((name, result));
                    });
                }

                if running == 0 {
                    break;
                }

                let Ok((name, result)) = rx.recv() else {
                    break;
                };
                running -= 1;

                match result {
                    Ok(()) if first_error.is_none() => {
                        for child in dependents.get(name).into_iter().flatten() {
                            if let Some(count) = pending.get_mut(child) {
                                *count -= 1;
                                if *count == 0 {
                                    ready.push_back(*child);
                                }
                            }
                        }
                    }
                    Ok(()) => {}
                    Err(err) if first_error.is_none() => first_error = Some(err),
                    Err(err) => error!(error = %err, "Additional target failure"),
                }
            }

            match first_error {
                Some(err) => Err(err),
                None => Ok(()),
            }
        })
    }
}

/// What the expression functions see of the running build
struct TargetView<'e, 'p> {
    executor: &'e Executor<'p>,
    current: &'e str,
}

impl BuildInfo for TargetView<'_, '_> {
    fn project_name(&self) -> &str {
        self.executor.project.name()
    }

    fn default_target(&self) -> Option<&str> {
        self.executor.project.default_target()
    }

    fn has_target(&self, name: &str) -> bool {
        self.executor.project.graph().contains(name)
    }

    fn has_executed(&self, name: &str) -> bool {
        self.executor.state(name).is_some_and(TargetState::is_done)
    }

    fn current_target(&self) -> Option<&str> {
        Some(self.current)
    }
}
