//! Turning a parsed build file into a runnable project

use crate::config::parse::{find_config_file, parse_config_file};
use crate::config::schema::{validate_config, validate_tasks};
use crate::config::types::{scalar_to_string, Config, PropertyDef};
use crate::error::{BriskError, ConfigError, ConfigResult};
use crate::property::PropertyOptions;
use crate::runner::{Project, Target, TaskRegistry};
use directories::ProjectDirs;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Name of the per-user properties file inside the config directory
pub const GLOBAL_PROPERTIES_FILE: &str = "properties.yml";

/// How to locate and prepare a project
#[derive(Debug, Clone)]
pub struct LoadOptions {
    /// Explicit build file; searched for when `None`
    pub file: Option<PathBuf>,

    /// Command-line properties, applied read-only before anything else
    pub defines: Vec<(String, String)>,

    /// Read the per-user properties file
    pub global: bool,
}

impl Default for LoadOptions {
    fn default() -> Self {
        LoadOptions {
            file: None,
            defines: Vec::new(),
            global: true,
        }
    }
}

/// Parse a `NAME=VALUE` command-line definition
pub fn parse_define(s: &str) -> Result<(String, String), String> {
    match s.split_once('=') {
        Some((name, value)) if !name.trim().is_empty() => {
            Ok((name.trim().to_string(), value.to_string()))
        }
        _ => Err(format!("'{}' is not of the form NAME=VALUE", s)),
    }
}

/// Location of the per-user properties file, if the platform has one
pub fn global_properties_path() -> Option<PathBuf> {
    ProjectDirs::from("", "", "brisk").map(|dirs| dirs.config_dir().join(GLOBAL_PROPERTIES_FILE))
}

/// Find, parse and prepare the project described by `options`
pub fn load_project(options: &LoadOptions, registry: &TaskRegistry) -> Result<Project, BriskError> {
    let path = match &options.file {
        Some(file) => file.clone(),
        None => find_config_file()?,
    };
    debug!(path = %path.display(), "Loading build file");

    let config = parse_config_file(&path)?;
    let config_dir = path
        .parent()
        .filter(|dir| !dir.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));

    Ok(build_project(&config, config_dir, options, registry)?)
}

/// Prepare a project from an already parsed build file.
///
/// The target graph is assembled and checked first, so a build file with a
/// cycle or a dangling dependency is rejected before anything else happens.
/// Properties are then applied in this order: command-line definitions
/// (read-only), the per-user properties file, then the build file's own
/// declarations.
pub fn build_project(
    config: &Config,
    config_dir: &Path,
    options: &LoadOptions,
    registry: &TaskRegistry,
) -> ConfigResult<Project> {
    validate_config(config)?;
    validate_tasks(config, registry)?;

    let canonical_dir = fs::canonicalize(config_dir).unwrap_or_else(|_| config_dir.to_path_buf());
    let base_dir = match &config.basedir {
        Some(dir) => canonical_dir.join(dir),
        None => canonical_dir.clone(),
    };
    let name = config
        .name
        .clone()
        .or_else(|| {
            canonical_dir
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
        })
        .unwrap_or_else(|| "brisk".to_string());

    let mut project = Project::new(name, base_dir)?;

    for (name, def) in &config.targets {
        let mut target = Target::new(name.clone());
        target.description = def.description.clone();
        target.if_expr = def.if_expr.clone();
        target.unless_expr = def.unless_expr.clone();
        for dependency in &def.depends {
            target = target.depends_on(dependency.clone());
        }
        for task in &def.tasks {
            target = target.with_task(registry.create(&task.name, &task.config)?);
        }
        project.add_target(target);
    }

    if let Some(default) = &config.default {
        project.set_default_target(default)?;
    }

    project.graph().validate()?;

    load_dotenv(config_dir)?;

    for (name, value) in &options.defines {
        project.properties().set_read_only(name, value)?;
    }

    if options.global {
        if let Some(path) = global_properties_path() {
            load_global_properties(&project, &path)?;
        }
    }

    for property in &config.properties {
        define_property(&project, property)?;
    }

    debug!(
        project = project.name(),
        targets = project.graph().len(),
        "Loaded project"
    );

    Ok(project)
}

fn load_dotenv(config_dir: &Path) -> ConfigResult<()> {
    let path = config_dir.join(".env");
    if !path.is_file() {
        return Ok(());
    }

    dotenvy::from_path(&path).map_err(|e| ConfigError::PropertyFile {
        path: path.clone(),
        error: e.to_string(),
    })?;
    debug!(path = %path.display(), "Loaded environment file");
    Ok(())
}

/// Define ordinary properties from a `name: value` YAML file; a missing file is skipped
pub fn load_global_properties(project: &Project, path: &Path) -> ConfigResult<()> {
    let contents = match fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(()),
        Err(e) => {
            return Err(ConfigError::PropertyFile {
                path: path.to_path_buf(),
                error: e.to_string(),
            })
        }
    };

    let file_error = |error: String| ConfigError::PropertyFile {
        path: path.to_path_buf(),
        error,
    };

    let entries: BTreeMap<String, serde_yaml::Value> = if contents.trim().is_empty() {
        BTreeMap::new()
    } else {
        serde_yaml::from_str(&contents).map_err(|e| file_error(e.to_string()))?
    };

    for (name, value) in &entries {
        let value = scalar_to_string(value)
            .ok_or_else(|| file_error(format!("value of '{}' must be a scalar", name)))?;
        project
            .properties()
            .define(name, Some(&value), PropertyOptions::default())?;
    }

    debug!(path = %path.display(), count = entries.len(), "Loaded global properties");
    Ok(())
}

fn define_property(project: &Project, def: &PropertyDef) -> ConfigResult<()> {
    let properties = project.properties();

    // an assignment that will be ignored must not fail on its expansion
    if properties.is_read_only(&def.name) || (!def.overwrite && properties.contains(&def.name)) {
        debug!(property = %def.name, "Keeping existing property value");
        return Ok(());
    }

    let value = match &def.value {
        Some(text) if !def.dynamic => Some(project.evaluator().expand(text)?),
        other => other.clone(),
    };

    properties.define(
        &def.name,
        value.as_deref(),
        PropertyOptions {
            read_only: def.readonly,
            dynamic: def.dynamic,
            overwrite: def.overwrite,
        },
    )?;
    Ok(())
}
