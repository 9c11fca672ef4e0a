//! Build file discovery and parsing

use crate::config::types::Config;
use crate::error::{BriskError, ConfigError, ConfigResult};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

/// Build file names to search for, in order of preference
pub const CONFIG_FILE_NAMES: &[&str] = &["brisk.yml", "brisk.yaml"];

/// Find the build file by searching the current and parent directories
pub fn find_config_file() -> ConfigResult<PathBuf> {
    find_config_file_from(env::current_dir().map_err(|e| {
        ConfigError::Invalid(format!("Failed to get current directory: {}", e))
    })?)
}

/// Find the build file starting from a specific directory
pub fn find_config_file_from(start_dir: PathBuf) -> ConfigResult<PathBuf> {
    let mut current_dir = start_dir;
    let mut searched_paths = Vec::new();

    loop {
        for file_name in CONFIG_FILE_NAMES {
            let config_path = current_dir.join(file_name);
            if config_path.is_file() {
                return Ok(config_path);
            }
            searched_paths.push(config_path.display().to_string());
        }

        match current_dir.parent() {
            Some(parent) => current_dir = parent.to_path_buf(),
            None => return Err(ConfigError::NotFound(searched_paths.join(", "))),
        }
    }
}

/// Parse a build file from a path
pub fn parse_config_file(path: &Path) -> Result<Config, BriskError> {
    let contents = fs::read_to_string(path).map_err(|e| {
        ConfigError::Invalid(format!("Failed to read '{}': {}", path.display(), e))
    })?;

    parse_config(&contents)
}

/// Parse a build file from a string
pub fn parse_config(yaml: &str) -> Result<Config, BriskError> {
    // an empty document is a project with nothing in it
    if yaml.trim().is_empty() {
        return Ok(serde_yaml::from_str("{}")?);
    }
    Ok(serde_yaml::from_str(yaml)?)
}

/// Parse a build file with automatic discovery
pub fn parse_config_auto() -> Result<(Config, PathBuf), BriskError> {
    let config_path = find_config_file()?;
    let config = parse_config_file(&config_path)?;
    Ok((config, config_path))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    const SIMPLE: &str = r#"
targets:
  test:
    tasks:
      - echo: test
"#;

    #[test]
    fn test_parse_simple_config() {
        let config = parse_config(SIMPLE).unwrap();
        assert_eq!(config.targets.len(), 1);
        assert!(config.targets.contains_key("test"));
    }

    #[test]
    fn test_parse_empty_config() {
        let config = parse_config("").unwrap();
        assert!(config.targets.is_empty());
        assert!(config.properties.is_empty());
    }

    #[test]
    fn test_parse_invalid_yaml() {
        assert!(matches!(
            parse_config("targets: [unclosed"),
            Err(BriskError::Yaml(_))
        ));
    }

    #[test]
    fn test_find_config_in_current_dir() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("brisk.yml");
        fs::write(&config_path, SIMPLE).unwrap();

        let found = find_config_file_from(temp_dir.path().to_path_buf()).unwrap();
        assert_eq!(found, config_path);
    }

    #[test]
    fn test_find_yaml_extension() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("brisk.yaml");
        fs::write(&config_path, SIMPLE).unwrap();

        let found = find_config_file_from(temp_dir.path().to_path_buf()).unwrap();
        assert_eq!(found, config_path);
    }

    #[test]
    fn test_find_config_in_parent_dir() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("brisk.yml");
        let sub_dir = temp_dir.path().join("a").join("b");

        fs::create_dir_all(&sub_dir).unwrap();
        fs::write(&config_path, SIMPLE).unwrap();

        let found = find_config_file_from(sub_dir).unwrap();
        assert_eq!(found, config_path);
    }

    #[test]
    fn test_parse_config_file() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("brisk.yml");
        fs::write(&config_path, "name: demo\n").unwrap();

        let config = parse_config_file(&config_path).unwrap();
        assert_eq!(config.name.as_deref(), Some("demo"));

        let missing = parse_config_file(&temp_dir.path().join("nope.yml"));
        assert!(matches!(
            missing,
            Err(BriskError::Config(ConfigError::Invalid(_)))
        ));
    }
}
