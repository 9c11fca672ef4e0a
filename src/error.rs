//! Error types for Brisk

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for Brisk operations
pub type Result<T> = std::result::Result<T, BriskError>;

/// Main error type for Brisk
#[derive(Error, Debug)]
pub enum BriskError {
    /// Build-file related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Target graph and execution errors
    #[error("Build error: {0}")]
    Build(#[from] BuildError),

    /// Expression and interpolation errors
    #[error("Expression error: {0}")]
    Expression(#[from] ExpressionError),

    /// Property store errors
    #[error("Property error: {0}")]
    Property(#[from] PropertyError),

    /// Fileset scanning errors
    #[error("Scan error: {0}")]
    Scan(#[from] ScanError),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// YAML parsing errors
    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// Build file parsing and validation errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to find build file (searched: {0})")]
    NotFound(String),

    #[error("Invalid configuration: {0}")]
    Invalid(String),

    #[error("Unknown task type '{0}'")]
    UnknownTask(String),

    #[error("Invalid configuration for task '{task}': {error}")]
    TaskConfig { task: String, error: String },

    #[error("Failed to read property file '{path}': {error}")]
    PropertyFile { path: PathBuf, error: String },

    #[error(transparent)]
    Graph(#[from] GraphError),

    #[error(transparent)]
    Property(#[from] PropertyError),

    #[error(transparent)]
    Expression(#[from] ExpressionError),
}

/// Target graph resolution errors, always raised before any task runs
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GraphError {
    #[error("Target '{0}' does not exist")]
    UnknownTarget(String),

    #[error("Target '{target}' depends on '{dependency}', which does not exist")]
    UnknownDependency { target: String, dependency: String },

    #[error("No target was requested and the project has no default target")]
    NoDefaultTarget,

    #[error("Circular dependency: {0}")]
    Cycle(String),
}

/// Expression tokenizing, parsing and evaluation errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ExpressionError {
    #[error("Unexpected input at position {position}: {message}")]
    Tokenize { position: usize, message: String },

    #[error("Syntax error at position {position}: {message}")]
    Parse { position: usize, message: String },

    #[error("Property '{0}' has not been set")]
    UndefinedProperty(String),

    #[error("Unknown function '{0}'")]
    UnknownFunction(String),

    #[error("Function '{function}' expects {expected} argument(s), got {actual}")]
    Arity {
        function: String,
        expected: String,
        actual: usize,
    },

    #[error("{0}")]
    Type(String),

    #[error("Attempted to divide by zero")]
    DivisionByZero,

    #[error("Circular property reference: {0}")]
    CircularProperty(String),

    #[error("Function '{function}' failed: {message}")]
    Function { function: String, message: String },

    #[error("Unterminated expression in '{0}'")]
    Unterminated(String),

    #[error("Error evaluating '${{{expression}}}': {source}")]
    Interpolation {
        expression: String,
        #[source]
        source: Box<ExpressionError>,
    },
}

impl ExpressionError {
    /// The error behind any `${...}` wrappers
    pub fn root_cause(&self) -> &ExpressionError {
        match self {
            ExpressionError::Interpolation { source, .. } => source.root_cause(),
            other => other,
        }
    }
}

/// Property store errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PropertyError {
    #[error("Property '{0}' cannot be assigned a null value")]
    NullValue(String),

    #[error("'{0}' is not a valid property name")]
    InvalidName(String),
}

/// Fileset scanning errors
#[derive(Error, Debug)]
pub enum ScanError {
    #[error("Base directory '{0}' does not exist")]
    MissingBaseDirectory(PathBuf),

    #[error("Invalid pattern '{pattern}': {message}")]
    InvalidPattern { pattern: String, message: String },

    #[error("Failed to resolve the base directory: {0}")]
    Io(#[from] io::Error),

    #[error("Failed to scan '{path}': {source}")]
    Walk {
        path: PathBuf,
        #[source]
        source: walkdir::Error,
    },
}

/// Failures surfaced from a task's execution
#[derive(Error, Debug)]
pub enum TaskError {
    #[error("{0}")]
    Failed(String),

    #[error("Command failed with exit code {0:?}")]
    CommandFailed(Option<i32>),

    #[error("Fileset matched no files: {0}")]
    EmptyFileSet(String),

    #[error(transparent)]
    Expression(#[from] ExpressionError),

    #[error(transparent)]
    Property(#[from] PropertyError),

    #[error(transparent)]
    Scan(#[from] ScanError),

    #[error(transparent)]
    Io(#[from] io::Error),
}

/// Errors that abort a build
#[derive(Error, Debug)]
pub enum BuildError {
    #[error(transparent)]
    Graph(#[from] GraphError),

    #[error("Target '{target}': failed to evaluate condition: {source}")]
    Gate {
        target: String,
        #[source]
        source: ExpressionError,
    },

    #[error("Target '{target}' failed: {source}")]
    TargetFailed {
        target: String,
        #[source]
        source: TaskError,
    },
}

impl BuildError {
    /// Name of the target the error originated in, if any
    pub fn target(&self) -> Option<&str> {
        match self {
            BuildError::Graph(_) => None,
            BuildError::Gate { target, .. } | BuildError::TargetFailed { target, .. } => {
                Some(target)
            }
        }
    }
}

/// Specialized result type for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Specialized result type for graph resolution
pub type GraphResult<T> = std::result::Result<T, GraphError>;

/// Specialized result type for expression operations
pub type ExpressionResult<T> = std::result::Result<T, ExpressionError>;

/// Specialized result type for property store operations
pub type PropertyResult<T> = std::result::Result<T, PropertyError>;

/// Specialized result type for fileset scanning
pub type ScanResult<T> = std::result::Result<T, ScanError>;

/// Specialized result type for task execution
pub type TaskResult<T> = std::result::Result<T, TaskError>;

/// Specialized result type for build execution
pub type BuildResult<T> = std::result::Result<T, BuildError>;

/// Wrap an error raised inside a `${...}` span with the span's text
pub fn in_expression(expression: &str, source: ExpressionError) -> ExpressionError {
    match source {
        // keep the innermost span, which is the one that actually failed
        err @ ExpressionError::Interpolation { .. } => err,
        other => ExpressionError::Interpolation {
            expression: expression.to_string(),
            source: Box::new(other),
        },
    }
}
