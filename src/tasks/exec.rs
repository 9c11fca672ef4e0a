//! `exec`: run a shell command
//!
//! The command line is expanded and handed to an interpreter (`sh -c` by
//! default). A non-zero exit status fails the task.

use crate::error::{ConfigError, ConfigResult, TaskError, TaskResult};
use crate::runner::{task_config, Task, TaskContext, Verbosity};
use serde::Deserialize;
use std::process::{Command as StdCommand, Stdio};
use tracing::debug;

const DEFAULT_INTERPRETER: &[&str] = &["sh", "-c"];

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ExecConfig {
    Simple(String),
    Detailed {
        command: String,
        dir: Option<String>,
        interpreter: Option<Vec<String>>,
        output: Option<String>,
        #[serde(default)]
        quiet: bool,
    },
}

#[derive(Debug, Clone)]
pub struct ExecTask {
    /// Command line, before expansion
    pub command: String,

    /// Working directory, relative to the project base directory
    pub dir: Option<String>,

    /// Interpreter and its arguments; the command is appended
    pub interpreter: Vec<String>,

    /// Property receiving the trimmed standard output
    pub output: Option<String>,

    /// Don't echo the command line
    pub quiet: bool,
}

impl ExecTask {
    pub fn new(command: impl Into<String>) -> Self {
        ExecTask {
            command: command.into(),
            dir: None,
            interpreter: DEFAULT_INTERPRETER.iter().map(|s| s.to_string()).collect(),
            output: None,
            quiet: false,
        }
    }
}

pub fn create(config: &serde_yaml::Value) -> ConfigResult<Box<dyn Task>> {
    let task = match task_config::<ExecConfig>("exec", config)? {
        ExecConfig::Simple(command) => ExecTask::new(command),
        ExecConfig::Detailed {
            command,
            dir,
            interpreter,
            output,
            quiet,
        } => {
            let mut task = ExecTask::new(command);
            task.dir = dir;
            task.output = output;
            task.quiet = quiet;
            if let Some(interpreter) = interpreter {
                if interpreter.is_empty() {
                    return Err(ConfigError::TaskConfig {
                        task: "exec".to_string(),
                        error: "interpreter must not be empty".to_string(),
                    });
                }
                task.interpreter = interpreter;
            }
            task
        }
    };
    Ok(Box::new(task))
}

impl Task for ExecTask {
    fn name(&self) -> &str {
        "exec"
    }

    fn execute(&self, ctx: &TaskContext<'_>) -> TaskResult<()> {
        let command_line = ctx.expand(&self.command)?;

        if !self.quiet && ctx.options().verbosity >= Verbosity::Normal {
            ctx.options().print_task_message("exec", &command_line);
        }

        let working_dir = match &self.dir {
            Some(dir) => ctx.resolve_path(dir)?,
            None => ctx.project().base_dir().to_path_buf(),
        };

        let (program, args) = self
            .interpreter
            .split_first()
            .ok_or_else(|| TaskError::Failed("no interpreter configured".to_string()))?;

        let mut command = StdCommand::new(program);
        command.args(args);
        command.arg(&command_line);
        command.current_dir(&working_dir);
        command.stdin(Stdio::inherit());
        command.stderr(Stdio::inherit());

        debug!(
            target_name = ctx.target_name(),
            command = %command_line,
            dir = %working_dir.display(),
            "Running command"
        );

        let status = match &self.output {
            Some(property) => {
                command.stdout(Stdio::piped());
                let output = command.output()?;
                if output.status.success() {
                    let text = String::from_utf8_lossy(&output.stdout);
                    ctx.properties().set(property, text.trim())?;
                }
                output.status
            }
            None => {
                command.stdout(Stdio::inherit());
                command.status()?
            }
        };

        if !status.success() {
            return Err(TaskError::CommandFailed(status.code()));
        }

        Ok(())
    }
}
