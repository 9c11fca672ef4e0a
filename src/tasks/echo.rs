//! `echo`: print a message

use crate::error::{ConfigResult, TaskResult};
use crate::runner::{task_config, Task, TaskContext, Verbosity};
use serde::Deserialize;
use tracing::{error, warn};

/// Message importance
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    Debug,
    #[default]
    Info,
    #[serde(alias = "warn")]
    Warning,
    Error,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum EchoConfig {
    Simple(String),
    Detailed {
        message: String,
        #[serde(default)]
        level: Level,
    },
}

#[derive(Debug, Clone)]
pub struct EchoTask {
    pub message: String,
    pub level: Level,
}

pub fn create(config: &serde_yaml::Value) -> ConfigResult<Box<dyn Task>> {
    let task = match task_config::<EchoConfig>("echo", config)? {
        EchoConfig::Simple(message) => EchoTask {
            message,
            level: Level::Info,
        },
        EchoConfig::Detailed { message, level } => EchoTask { message, level },
    };
    Ok(Box::new(task))
}

impl Task for EchoTask {
    fn name(&self) -> &str {
        "echo"
    }

    fn execute(&self, ctx: &TaskContext<'_>) -> TaskResult<()> {
        let message = ctx.expand(&self.message)?;
        let options = ctx.options();

        match self.level {
            Level::Debug if options.verbosity < Verbosity::Verbose => {}
            Level::Warning => {
                warn!(target_name = ctx.target_name(), "{}", message);
                options.print_task_message("echo", &message);
            }
            Level::Error => {
                error!(target_name = ctx.target_name(), "{}", message);
                options.print_task_message("echo", &message);
            }
            _ => options.print_task_message("echo", &message),
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{ExpressionError, TaskError};
    use crate::tasks::test_support::{project, quiet, Standalone};
    use tempfile::TempDir;

    #[test]
    fn test_config_forms() {
        let simple: serde_yaml::Value = serde_yaml::from_str("hello").unwrap();
        assert!(create(&simple).is_ok());

        let detailed: serde_yaml::Value =
            serde_yaml::from_str("{ message: careful, level: warn }").unwrap();
        let task = create(&detailed).unwrap();
        assert_eq!(task.name(), "echo");

        let bad: serde_yaml::Value = serde_yaml::from_str("{ level: info }").unwrap();
        assert!(create(&bad).is_err());
    }

    #[test]
    fn test_undefined_property_fails() {
        let temp = TempDir::new().unwrap();
        let project = project(temp.path());
        let options = quiet();
        let ctx = TaskContext::new(&project, "test", &options, &Standalone);

        let task = EchoTask {
            message: "value: ${missing}".to_string(),
            level: Level::Info,
        };
        match task.execute(&ctx) {
            Err(TaskError::Expression(err)) => assert_eq!(
                err.root_cause(),
                &ExpressionError::UndefinedProperty("missing".to_string())
            ),
            other => panic!("unexpected result: {other:?}"),
        }
    }
}
