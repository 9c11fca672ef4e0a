//! `sleep`: pause the current target

use crate::error::{ConfigResult, TaskResult};
use crate::runner::{task_config, Task, TaskContext};
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum SleepConfig {
    Milliseconds(u64),
    Detailed {
        #[serde(default)]
        milliseconds: u64,
        #[serde(default)]
        seconds: u64,
    },
}

#[derive(Debug, Clone)]
pub struct SleepTask {
    pub duration: Duration,
}

pub fn create(config: &serde_yaml::Value) -> ConfigResult<Box<dyn Task>> {
    let duration = match task_config::<SleepConfig>("sleep", config)? {
        SleepConfig::Milliseconds(ms) => Duration::from_millis(ms),
        SleepConfig::Detailed {
            milliseconds,
            seconds,
        } => Duration::from_secs(seconds) + Duration::from_millis(milliseconds),
    };
    Ok(Box::new(SleepTask { duration }))
}

impl Task for SleepTask {
    fn name(&self) -> &str {
        "sleep"
    }

    fn execute(&self, ctx: &TaskContext<'_>) -> TaskResult<()> {
        debug!(
            target_name = ctx.target_name(),
            ms = self.duration.as_millis() as u64,
            "Sleeping"
        );
        std::thread::sleep(self.duration);
        Ok(())
    }
}
