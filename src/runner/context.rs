//! Build options and console output
//!
//! The options are fixed for the duration of a build and shared by every
//! target, including targets running on worker threads.

use colored::Colorize;
use std::time::Duration;

/// Verbosity levels for console output
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Verbosity {
    Silent = 0,
    Quiet = 1,
    Normal = 2,
    Verbose = 3,
}

/// Options controlling how a build executes
#[derive(Debug, Clone)]
pub struct BuildOptions {
    /// Run independent targets concurrently
    pub parallel: bool,

    /// Maximum number of targets running at once in parallel mode
    pub jobs: Option<usize>,

    /// Verbosity level
    pub verbosity: Verbosity,
}

impl BuildOptions {
    /// Create options for a sequential build with normal output
    pub fn new() -> Self {
        BuildOptions {
            parallel: false,
            jobs: None,
            verbosity: Verbosity::Normal,
        }
    }

    /// Enable or disable concurrent execution
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Limit the number of concurrently running targets
    pub fn with_jobs(mut self, jobs: usize) -> Self {
        self.jobs = Some(jobs.max(1));
        self
    }

    /// Set verbosity level
    pub fn with_verbosity(mut self, verbosity: Verbosity) -> Self {
        self.verbosity = verbosity;
        self
    }

    /// Effective job limit
    pub fn job_limit(&self) -> usize {
        self.jobs.unwrap_or(usize::MAX).max(1)
    }

    /// Print the header shown before a target's tasks run
    pub fn print_target_start(&self, target: &str) {
        if self.verbosity >= Verbosity::Normal {
            println!("\n{}:", target.bold());
        }
    }

    /// Print a note that a target was skipped
    pub fn print_target_skip(&self, target: &str, reason: &str) {
        if self.verbosity >= Verbosity::Verbose {
            println!("\n{}: {}", target.bold(), format!("skipped ({})", reason).dimmed());
        }
    }

    /// Print a message on behalf of a task, e.g. `[echo] hello`
    pub fn print_task_message(&self, task: &str, message: &str) {
        if self.verbosity >= Verbosity::Quiet {
            for line in message.lines() {
                println!("{} {}", format!("{:>10}", format!("[{}]", task)).cyan(), line);
            }
        }
    }

    /// Print the final build result
    pub fn print_result(&self, succeeded: bool, elapsed: Duration) {
        if self.verbosity == Verbosity::Silent {
            return;
        }
        if succeeded {
            println!("\n{}", "BUILD SUCCEEDED".green().bold());
        } else {
            println!("\n{}", "BUILD FAILED".red().bold());
        }
        println!("\nTotal time: {:.2} seconds", elapsed.as_secs_f64());
    }
}

impl Default for BuildOptions {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_options_new() {
        let options = BuildOptions::new();
        assert!(!options.parallel);
        assert_eq!(options.jobs, None);
        assert_eq!(options.verbosity, Verbosity::Normal);
        assert_eq!(options.job_limit(), usize::MAX);
    }

    #[test]
    fn test_with_jobs_is_at_least_one() {
        let options = BuildOptions::new().with_parallel(true).with_jobs(0);
        assert!(options.parallel);
        assert_eq!(options.jobs, Some(1));
        assert_eq!(options.job_limit(), 1);
    }

    #[test]
    fn test_verbosity_levels() {
        assert!(Verbosity::Verbose > Verbosity::Normal);
        assert!(Verbosity::Normal > Verbosity::Quiet);
        assert!(Verbosity::Quiet > Verbosity::Silent);
    }

    #[test]
    fn test_with_verbosity() {
        let options = BuildOptions::new().with_verbosity(Verbosity::Verbose);
        assert_eq!(options.verbosity, Verbosity::Verbose);
    }
}
