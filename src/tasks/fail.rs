//! `fail`: stop the build with a message

use crate::error::{ConfigResult, TaskError, TaskResult};
use crate::runner::{task_config, Task, TaskContext};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum FailConfig {
    Simple(String),
    Detailed { message: String },
}

#[derive(Debug, Clone)]
pub struct FailTask {
    pub message: String,
}

pub fn create(config: &serde_yaml::Value) -> ConfigResult<Box<dyn Task>> {
    let message = match task_config::<FailConfig>("fail", config)? {
        FailConfig::Simple(message) | FailConfig::Detailed { message } => message,
    };
    Ok(Box::new(FailTask { message }))
}

impl Task for FailTask {
    fn name(&self) -> &str {
        "fail"
    }

    fn execute(&self, ctx: &TaskContext<'_>) -> TaskResult<()> {
        Err(TaskError::Failed(ctx.expand(&self.message)?))
    }
}
