//! `file::`, `directory::` and `path::` functions. Relative paths resolve
//! against the evaluator's base directory.

use super::{failure, text_arg, Arity, FunctionRegistry};
use crate::error::ExpressionResult;
use crate::expr::eval::Evaluator;
use crate::expr::value::Value;
use crate::fileset::normalize_path;
use std::path::{Path, PathBuf};

pub(super) fn register(registry: &mut FunctionRegistry) {
    registry.register("file", "exists", Arity::Exact(1), file_exists);
    registry.register("file", "get-length", Arity::Exact(1), file_length);
    registry.register("directory", "exists", Arity::Exact(1), directory_exists);
    registry.register(
        "directory",
        "get-current-directory",
        Arity::Exact(0),
        current_directory,
    );
    registry.register("path", "combine", Arity::Exact(2), combine);
    registry.register("path", "get-file-name", Arity::Exact(1), file_name);
    registry.register(
        "path",
        "get-file-name-without-extension",
        Arity::Exact(1),
        file_stem,
    );
    registry.register("path", "get-extension", Arity::Exact(1), extension);
    registry.register("path", "get-directory-name", Arity::Exact(1), directory_name);
    registry.register("path", "get-full-path", Arity::Exact(1), full_path);
}

fn resolve(evaluator: &Evaluator<'_>, path: &str) -> PathBuf {
    evaluator.base_dir().join(path)
}

fn render(path: &Path) -> Value {
    Value::String(path.to_string_lossy().into_owned())
}

fn file_exists(evaluator: &Evaluator<'_>, args: &[Value]) -> ExpressionResult<Value> {
    Ok(Value::Boolean(resolve(evaluator, &text_arg(args, 0)).is_file()))
}

fn file_length(evaluator: &Evaluator<'_>, args: &[Value]) -> ExpressionResult<Value> {
    let path = resolve(evaluator, &text_arg(args, 0));
    let metadata = std::fs::metadata(&path)
        .map_err(|e| failure("file::get-length", format!("{}: {}", path.display(), e)))?;
    Ok(Value::Integer(metadata.len() as i64))
}

fn directory_exists(evaluator: &Evaluator<'_>, args: &[Value]) -> ExpressionResult<Value> {
    Ok(Value::Boolean(resolve(evaluator, &text_arg(args, 0)).is_dir()))
}

fn current_directory(_: &Evaluator<'_>, _: &[Value]) -> ExpressionResult<Value> {
    std::env::current_dir()
        .map(|dir| render(&dir))
        .map_err(|e| failure("directory::get-current-directory", e.to_string()))
}

fn combine(_: &Evaluator<'_>, args: &[Value]) -> ExpressionResult<Value> {
    Ok(render(&Path::new(&*text_arg(args, 0)).join(&*text_arg(args, 1))))
}

fn file_name(_: &Evaluator<'_>, args: &[Value]) -> ExpressionResult<Value> {
    let path = text_arg(args, 0);
    Ok(Path::new(&*path)
        .file_name()
        .map(|n| Value::String(n.to_string_lossy().into_owned()))
        .unwrap_or_else(|| Value::from("")))
}

fn file_stem(_: &Evaluator<'_>, args: &[Value]) -> ExpressionResult<Value> {
    let path = text_arg(args, 0);
    Ok(Path::new(&*path)
        .file_stem()
        .map(|n| Value::String(n.to_string_lossy().into_owned()))
        .unwrap_or_else(|| Value::from("")))
}

/// Extension including the leading dot, or empty
fn extension(_: &Evaluator<'_>, args: &[Value]) -> ExpressionResult<Value> {
    let path = text_arg(args, 0);
    Ok(Path::new(&*path)
        .extension()
        .map(|e| Value::String(format!(".{}", e.to_string_lossy())))
        .unwrap_or_else(|| Value::from("")))
}

fn directory_name(_: &Evaluator<'_>, args: &[Value]) -> ExpressionResult<Value> {
    let path = text_arg(args, 0);
    Ok(Path::new(&*path)
        .parent()
        .map(render)
        .unwrap_or_else(|| Value::from("")))
}

fn full_path(evaluator: &Evaluator<'_>, args: &[Value]) -> ExpressionResult<Value> {
    let mut path = resolve(evaluator, &text_arg(args, 0));
    if path.is_relative() {
        let cwd = std::env::current_dir()
            .map_err(|e| failure("path::get-full-path", e.to_string()))?;
        path = cwd.join(path);
    }
    Ok(render(&normalize_path(&path)))
}
