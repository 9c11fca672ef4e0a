//! `property`: define or assign a property
//!
//! Values are expanded before being stored, except for dynamic properties,
//! which keep their raw text and are expanded on every read.

use crate::config::optional_scalar;
use crate::error::{ConfigResult, TaskResult};
use crate::property::PropertyOptions;
use crate::runner::{task_config, Task, TaskContext};
use serde::Deserialize;
use tracing::debug;

#[derive(Debug, Clone, Deserialize)]
pub struct PropertyTask {
    pub name: String,

    /// `None` when the build file gives an explicit null
    #[serde(default, deserialize_with = "optional_scalar")]
    pub value: Option<String>,

    #[serde(default, alias = "read-only")]
    pub readonly: bool,

    #[serde(default)]
    pub dynamic: bool,

    #[serde(default = "default_overwrite")]
    pub overwrite: bool,
}

fn default_overwrite() -> bool {
    true
}

pub fn create(config: &serde_yaml::Value) -> ConfigResult<Box<dyn Task>> {
    Ok(Box::new(task_config::<PropertyTask>("property", config)?))
}

impl Task for PropertyTask {
    fn name(&self) -> &str {
        "property"
    }

    fn execute(&self, ctx: &TaskContext<'_>) -> TaskResult<()> {
        let name = ctx.expand(&self.name)?;
        let value = match &self.value {
            Some(text) if !self.dynamic => Some(ctx.expand(text)?),
            other => other.clone(),
        };

        let options = PropertyOptions {
            read_only: self.readonly,
            dynamic: self.dynamic,
            overwrite: self.overwrite,
        };
        let assigned = ctx.properties().define(&name, value.as_deref(), options)?;

        debug!(
            target_name = ctx.target_name(),
            property = %name,
            assigned,
            "Property task"
        );
        Ok(())
    }
}
