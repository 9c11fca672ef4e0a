//! Integration tests for build file parsing

mod common;

use brisk::config::{
    find_config_file_from, load_project, parse_config, parse_config_file, validate_config,
    LoadOptions,
};
use brisk::error::{BriskError, ConfigError, GraphError};
use brisk::runner::TaskRegistry;
use common::{create_test_config, create_test_config_in_subdir, property};

const COMPLETE: &str = r#"
name: my-app
description: A complete build
default: build
basedir: .

properties:
  - name: version
    value: "1.0"
  - name: out
    value: "${project.basedir}/out"
    dynamic: true

targets:
  init:
    description: Prepare the output directory
    tasks:
      - echo: "initializing ${version}"

  build:
    description: Compile
    depends: init
    if: "${property::exists('version')}"
    unless: "false"
    tasks:
      - echo: { message: "building", level: debug }
      - exec: { command: "true", dir: "." }

  clean:
    tasks:
      - fail: "not supported"
"#;

#[test]
fn test_parse_complete_config() {
    let config = parse_config(COMPLETE).unwrap();
    validate_config(&config).unwrap();

    assert_eq!(config.name.as_deref(), Some("my-app"));
    assert_eq!(config.description.as_deref(), Some("A complete build"));
    assert_eq!(config.default.as_deref(), Some("build"));
    assert_eq!(config.properties.len(), 2);
    assert!(config.properties[1].dynamic);
    assert_eq!(config.targets.len(), 3);

    let build = &config.targets["build"];
    assert_eq!(build.depends, vec!["init"]);
    assert_eq!(build.tasks.len(), 2);
    assert_eq!(build.tasks[0].name, "echo");
    assert_eq!(build.tasks[1].name, "exec");
}

#[test]
fn test_load_complete_project() {
    let (_temp, path) = create_test_config(COMPLETE);
    let options = LoadOptions {
        file: Some(path),
        global: false,
        ..LoadOptions::default()
    };

    let project = load_project(&options, &TaskRegistry::with_builtins()).unwrap();
    assert_eq!(project.name(), "my-app");
    assert_eq!(project.default_target(), Some("build"));
    assert_eq!(project.graph().len(), 3);
    assert_eq!(property(&project, "version"), "1.0");
    assert!(property(&project, "out").ends_with("/out"));
    assert!(project.properties().is_dynamic("out"));
}

#[test]
fn test_parse_from_file_and_discover() {
    let (_temp, path, sub_dir) = create_test_config_in_subdir(COMPLETE);

    let config = parse_config_file(&path).unwrap();
    assert_eq!(config.targets.len(), 3);

    assert_eq!(find_config_file_from(sub_dir).unwrap(), path);
}

#[test]
fn test_invalid_yaml_is_reported() {
    let result = parse_config("targets:\n  a: [\n");
    assert!(matches!(result, Err(BriskError::Yaml(_))));
}

#[test]
fn test_task_entry_must_be_single_key() {
    let yaml = r#"
targets:
  a:
    tasks:
      - echo: one
        exec: two
"#;
    assert!(parse_config(yaml).is_err());
}

fn load(yaml: &str) -> Result<brisk::runner::Project, BriskError> {
    let (_temp, path) = create_test_config(yaml);
    let options = LoadOptions {
        file: Some(path),
        global: false,
        ..LoadOptions::default()
    };
    load_project(&options, &TaskRegistry::with_builtins())
}

#[test]
fn test_loading_rejects_cycles() {
    let yaml = r#"
targets:
  a:
    depends: [b]
  b:
    depends: [a]
"#;
    match load(yaml) {
        Err(BriskError::Config(ConfigError::Graph(GraphError::Cycle(path)))) => {
            assert_eq!(path, "a -> b -> a")
        }
        other => panic!("unexpected result: {other:?}"),
    }
}

#[test]
fn test_loading_rejects_unknown_dependency() {
    assert!(matches!(
        load("targets:\n  a:\n    depends: [ghost]\n"),
        Err(BriskError::Config(ConfigError::Graph(GraphError::UnknownDependency { dependency, .. })))
            if dependency == "ghost"
    ));
}

#[test]
fn test_unknown_task_type_fails_loading() {
    let (_temp, path) = create_test_config("targets:\n  a:\n    tasks:\n      - javac: src\n");
    let options = LoadOptions {
        file: Some(path),
        global: false,
        ..LoadOptions::default()
    };

    let result = load_project(&options, &TaskRegistry::with_builtins());
    assert!(matches!(
        result,
        Err(BriskError::Config(ConfigError::UnknownTask(name))) if name == "javac"
    ));
}
