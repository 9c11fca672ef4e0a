//! Build file validation
//!
//! These checks need only the parsed file. Dependency and default-target
//! checks run on the assembled [`TargetGraph`](crate::runner::TargetGraph)
//! while the project is loaded.

use crate::config::types::Config;
use crate::error::{ConfigError, ConfigResult};
use crate::property::validate_property_name;
use crate::runner::TaskRegistry;

/// Validate the parts of a build file that do not depend on the target graph
pub fn validate_config(config: &Config) -> ConfigResult<()> {
    for property in &config.properties {
        validate_property_name(&property.name)?;
    }
    Ok(())
}

/// Check that every task type named in the build file is registered
pub fn validate_tasks(config: &Config, registry: &TaskRegistry) -> ConfigResult<()> {
    for target in config.targets.values() {
        for task in &target.tasks {
            if !registry.contains(&task.name) {
                return Err(ConfigError::UnknownTask(task.name.clone()));
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::parse_config;
    use crate::error::PropertyError;

    fn config(yaml: &str) -> Config {
        parse_config(yaml).unwrap()
    }

    #[test]
    fn test_valid_config() {
        let config = config(
            r#"
default: all
properties:
  - name: build.dir
    value: out
targets:
  all:
    depends: [compile]
  compile: {}
"#,
        );
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_invalid_property_name() {
        let config = config("properties:\n  - name: 'bad name'\n    value: x\n");
        assert!(matches!(
            validate_config(&config),
            Err(ConfigError::Property(PropertyError::InvalidName(_)))
        ));
    }

    #[test]
    fn test_reserved_property_name() {
        let config = config("properties:\n  - name: 'true'\n    value: x\n");
        assert!(matches!(
            validate_config(&config),
            Err(ConfigError::Property(PropertyError::InvalidName(name))) if name == "true"
        ));
    }

    #[test]
    fn test_unknown_task_type() {
        let config = config("targets:\n  a:\n    tasks:\n      - compile: x\n");
        let registry = TaskRegistry::with_builtins();
        assert!(matches!(
            validate_tasks(&config, &registry),
            Err(ConfigError::UnknownTask(name)) if name == "compile"
        ));
    }
}
