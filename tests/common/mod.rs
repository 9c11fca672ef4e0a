//! Common test utilities

#![allow(dead_code)]

use brisk::config::{build_project, parse_config, LoadOptions};
use brisk::runner::{BuildOptions, Project, TaskRegistry, Verbosity};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Create a temporary directory with a brisk.yml file
pub fn create_test_config(content: &str) -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("brisk.yml");
    fs::write(&config_path, content).unwrap();
    (temp_dir, config_path)
}

/// Create a test config with an empty subdirectory next to it
pub fn create_test_config_in_subdir(content: &str) -> (TempDir, PathBuf, PathBuf) {
    let (temp_dir, config_path) = create_test_config(content);
    let sub_dir = temp_dir.path().join("subdir");
    fs::create_dir(&sub_dir).unwrap();
    (temp_dir, config_path, sub_dir)
}

/// Load a project from YAML, rooted at `dir`, without per-user properties
pub fn project_in(dir: &Path, yaml: &str) -> Project {
    project_with(dir, yaml, &[])
}

/// Like [`project_in`], with command-line style definitions
pub fn project_with(dir: &Path, yaml: &str, defines: &[(&str, &str)]) -> Project {
    let config = parse_config(yaml).unwrap();
    let options = LoadOptions {
        file: None,
        defines: defines
            .iter()
            .map(|(n, v)| (n.to_string(), v.to_string()))
            .collect(),
        global: false,
    };
    build_project(&config, dir, &options, &TaskRegistry::with_builtins()).unwrap()
}

/// Sequential build options that print nothing
pub fn silent() -> BuildOptions {
    BuildOptions::new().with_verbosity(Verbosity::Silent)
}

/// Concurrent build options that print nothing
pub fn silent_parallel() -> BuildOptions {
    silent().with_parallel(true)
}

/// Create files (and their parent directories) under `root`
pub fn touch(root: &Path, paths: &[&str]) {
    for path in paths {
        let full = root.join(path);
        fs::create_dir_all(full.parent().unwrap()).unwrap();
        fs::write(full, "").unwrap();
    }
}

/// Expand `${name}` against a project's properties
pub fn property(project: &Project, name: &str) -> String {
    project.evaluator().expand(&format!("${{{}}}", name)).unwrap()
}

pub fn targets(names: &[&str]) -> Vec<String> {
    names.iter().map(|n| n.to_string()).collect()
}
