//! Core configuration types
//!
//! This module defines the data structures that represent a brisk.yml build file.

use serde::{Deserialize, Deserializer};
use std::collections::BTreeMap;

/// Top-level build file structure
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Project name (defaults to the build file's directory name)
    #[serde(default)]
    pub name: Option<String>,

    /// Project description
    #[serde(default)]
    pub description: Option<String>,

    /// Target run when none is requested
    #[serde(default)]
    pub default: Option<String>,

    /// Base directory, relative to the build file
    #[serde(default)]
    pub basedir: Option<String>,

    /// Properties, defined in order before any target runs
    #[serde(default)]
    pub properties: Vec<PropertyDef>,

    /// Targets keyed by name
    #[serde(default)]
    pub targets: BTreeMap<String, TargetDef>,
}

/// A property declaration
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PropertyDef {
    pub name: String,

    /// Property value; numbers and booleans are taken as text
    #[serde(default, deserialize_with = "optional_scalar")]
    pub value: Option<String>,

    /// Reject later assignments
    #[serde(default, alias = "read-only")]
    pub readonly: bool,

    /// Expand the value on every read instead of once
    #[serde(default)]
    pub dynamic: bool,

    /// Replace an already defined value
    #[serde(default = "default_true")]
    pub overwrite: bool,
}

/// A target definition
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TargetDef {
    /// Description shown by `--list`
    #[serde(default)]
    pub description: Option<String>,

    /// Targets that must run first
    #[serde(default, deserialize_with = "deserialize_depends")]
    pub depends: Vec<String>,

    /// Run only if this expands to true
    #[serde(default, rename = "if")]
    pub if_expr: Option<String>,

    /// Skip if this expands to true
    #[serde(default, rename = "unless")]
    pub unless_expr: Option<String>,

    /// Tasks, each a single-key mapping from task name to its configuration
    #[serde(default, deserialize_with = "deserialize_tasks")]
    pub tasks: Vec<TaskDef>,
}

/// A task invocation as written in the build file
#[derive(Debug, Clone, PartialEq)]
pub struct TaskDef {
    /// Task type name
    pub name: String,

    /// The task's own configuration, interpreted by its factory
    pub config: serde_yaml::Value,
}

fn default_true() -> bool {
    true
}

/// Render a YAML scalar as text
pub fn scalar_to_string(value: &serde_yaml::Value) -> Option<String> {
    use serde_yaml::Value;

    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Deserialize an optional scalar (string, number or bool) as text
pub fn optional_scalar<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error;
    use serde_yaml::Value;

    let value = Value::deserialize(deserializer)?;
    match value {
        Value::Null => Ok(None),
        other => scalar_to_string(&other)
            .map(Some)
            .ok_or_else(|| D::Error::custom("value must be a string, number or boolean")),
    }
}

/// Custom deserializer for dependencies: a list, or a comma separated string
fn deserialize_depends<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error;
    use serde_yaml::Value;

    let value = Value::deserialize(deserializer)?;

    match value {
        Value::String(s) => Ok(s
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect()),
        Value::Sequence(seq) => seq
            .into_iter()
            .map(|item| match item {
                Value::String(s) => Ok(s),
                _ => Err(D::Error::custom("dependency names must be strings")),
            })
            .collect(),
        Value::Null => Ok(Vec::new()),
        _ => Err(D::Error::custom("depends must be a string or array")),
    }
}

/// Custom deserializer for the task list
fn deserialize_tasks<'de, D>(deserializer: D) -> Result<Vec<TaskDef>, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error;
    use serde_yaml::Value;

    let value = Value::deserialize(deserializer)?;

    let items = match value {
        Value::Sequence(seq) => seq,
        Value::Null => return Ok(Vec::new()),
        _ => return Err(D::Error::custom("tasks must be an array")),
    };

    items
        .into_iter()
        .map(|item| match item {
            // a bare name is a task without configuration
            Value::String(name) => Ok(TaskDef {
                name,
                config: Value::Null,
            }),
            Value::Mapping(map) if map.len() == 1 => {
                let (key, config) = map
                    .into_iter()
                    .next()
                    .ok_or_else(|| D::Error::custom("empty task entry"))?;
                match key {
                    Value::String(name) => Ok(TaskDef { name, config }),
                    _ => Err(D::Error::custom("task names must be strings")),
                }
            }
            _ => Err(D::Error::custom(
                "each task must be a mapping with exactly one key, the task name",
            )),
        })
        .collect()
}
