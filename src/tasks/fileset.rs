//! `fileset`: scan the filesystem and store the matches in a property

use crate::error::{ConfigResult, TaskError, TaskResult};
use crate::fileset::FileSet;
use crate::runner::{task_config, Task, TaskContext};
use serde::Deserialize;
use tracing::debug;

#[derive(Debug, Clone, Deserialize)]
pub struct FileSetTask {
    /// Scan root, relative to the project base directory
    #[serde(default = "default_basedir")]
    pub basedir: String,

    #[serde(default)]
    pub include: Vec<String>,

    #[serde(default)]
    pub exclude: Vec<String>,

    #[serde(default = "default_true")]
    pub defaultexcludes: bool,

    #[serde(default = "default_true")]
    pub casesensitive: bool,

    /// Property receiving the joined paths
    pub property: String,

    #[serde(default = "default_separator")]
    pub separator: String,

    /// Store matched directories instead of files
    #[serde(default)]
    pub directories: bool,

    /// Fail when nothing matches
    #[serde(default)]
    pub failonempty: bool,
}

fn default_basedir() -> String {
    ".".to_string()
}

fn default_true() -> bool {
    true
}

fn default_separator() -> String {
    "\n".to_string()
}

pub fn create(config: &serde_yaml::Value) -> ConfigResult<Box<dyn Task>> {
    Ok(Box::new(task_config::<FileSetTask>("fileset", config)?))
}

impl FileSetTask {
    /// Build the scan request, expanding every pattern
    fn fileset(&self, ctx: &TaskContext<'_>) -> TaskResult<FileSet> {
        let base_dir = ctx.resolve_path(&self.basedir)?;
        let mut fileset = FileSet::new(base_dir).case_sensitive(self.casesensitive);
        if !self.defaultexcludes {
            fileset = fileset.without_default_excludes();
        }
        for pattern in &self.include {
            fileset = fileset.include(ctx.expand(pattern)?);
        }
        for pattern in &self.exclude {
            fileset = fileset.exclude(ctx.expand(pattern)?);
        }
        Ok(fileset)
    }
}

impl Task for FileSetTask {
    fn name(&self) -> &str {
        "fileset"
    }

    fn execute(&self, ctx: &TaskContext<'_>) -> TaskResult<()> {
        let fileset = self.fileset(ctx)?;
        let scanned = ctx.scan(&fileset)?;

        let paths = if self.directories {
            &scanned.directories
        } else {
            &scanned.files
        };

        if paths.is_empty() && self.failonempty {
            return Err(TaskError::EmptyFileSet(format!(
                "{} in {}",
                self.include.join(", "),
                fileset.base_dir().display()
            )));
        }

        let joined = paths
            .iter()
            .map(|p| p.to_string_lossy())
            .collect::<Vec<_>>()
            .join(&self.separator);
        ctx.properties().set(&self.property, joined)?;

        debug!(
            target_name = ctx.target_name(),
            property = %self.property,
            matches = paths.len(),
            "Fileset stored"
        );
        Ok(())
    }
}
