//! `property::`, `environment::`, `project::` and `target::` functions

use super::{failure, text_arg, Arity, FunctionRegistry};
use crate::error::ExpressionResult;
use crate::expr::eval::{BuildInfo, Evaluator};
use crate::expr::value::Value;

pub(super) fn register(registry: &mut FunctionRegistry) {
    registry.register("property", "exists", Arity::Exact(1), property_exists);
    registry.register("property", "is-readonly", Arity::Exact(1), property_is_readonly);
    registry.register("property", "is-dynamic", Arity::Exact(1), property_is_dynamic);
    registry.register("property", "get-value", Arity::Exact(1), property_value);

    registry.register("environment", "variable-exists", Arity::Exact(1), variable_exists);
    registry.register("environment", "get-variable", Arity::Exact(1), variable);

    registry.register("project", "get-name", Arity::Exact(0), project_name);
    registry.register("project", "get-base-directory", Arity::Exact(0), project_base_directory);
    registry.register("project", "get-default-target", Arity::Exact(0), project_default_target);

    registry.register("target", "exists", Arity::Exact(1), target_exists);
    registry.register("target", "has-executed", Arity::Exact(1), target_has_executed);
    registry.register("target", "get-current-target", Arity::Exact(0), current_target);
}

fn build<'a>(evaluator: &Evaluator<'a>, function: &str) -> ExpressionResult<&'a dyn BuildInfo> {
    evaluator
        .build()
        .ok_or_else(|| failure(function, "no build is running"))
}

fn property_exists(evaluator: &Evaluator<'_>, args: &[Value]) -> ExpressionResult<Value> {
    Ok(Value::Boolean(evaluator.properties().contains(&text_arg(args, 0))))
}

fn property_is_readonly(evaluator: &Evaluator<'_>, args: &[Value]) -> ExpressionResult<Value> {
    Ok(Value::Boolean(evaluator.properties().is_read_only(&text_arg(args, 0))))
}

fn property_is_dynamic(evaluator: &Evaluator<'_>, args: &[Value]) -> ExpressionResult<Value> {
    Ok(Value::Boolean(evaluator.properties().is_dynamic(&text_arg(args, 0))))
}

fn property_value(evaluator: &Evaluator<'_>, args: &[Value]) -> ExpressionResult<Value> {
    evaluator.property(&text_arg(args, 0)).map(Value::String)
}

fn variable_exists(_: &Evaluator<'_>, args: &[Value]) -> ExpressionResult<Value> {
    Ok(Value::Boolean(std::env::var_os(&*text_arg(args, 0)).is_some()))
}

fn variable(_: &Evaluator<'_>, args: &[Value]) -> ExpressionResult<Value> {
    let name = text_arg(args, 0);
    std::env::var(&*name)
        .map(Value::String)
        .map_err(|e| failure("environment::get-variable", format!("{}: {}", name, e)))
}

fn project_name(evaluator: &Evaluator<'_>, _: &[Value]) -> ExpressionResult<Value> {
    Ok(Value::from(build(evaluator, "project::get-name")?.project_name()))
}

fn project_base_directory(evaluator: &Evaluator<'_>, _: &[Value]) -> ExpressionResult<Value> {
    Ok(Value::String(evaluator.base_dir().to_string_lossy().into_owned()))
}

fn project_default_target(evaluator: &Evaluator<'_>, _: &[Value]) -> ExpressionResult<Value> {
    const NAME: &str = "project::get-default-target";
    build(evaluator, NAME)?
        .default_target()
        .map(Value::from)
        .ok_or_else(|| failure(NAME, "the project has no default target"))
}

fn target_exists(evaluator: &Evaluator<'_>, args: &[Value]) -> ExpressionResult<Value> {
    let info = build(evaluator, "target::exists")?;
    Ok(Value::Boolean(info.has_target(&text_arg(args, 0))))
}

fn target_has_executed(evaluator: &Evaluator<'_>, args: &[Value]) -> ExpressionResult<Value> {
    const NAME: &str = "target::has-executed";
    let info = build(evaluator, NAME)?;
    let target = text_arg(args, 0);
    if !info.has_target(&target) {
        return Err(failure(NAME, format!("target '{}' does not exist", target)));
    }
    Ok(Value::Boolean(info.has_executed(&target)))
}

fn current_target(evaluator: &Evaluator<'_>, _: &[Value]) -> ExpressionResult<Value> {
    const NAME: &str = "target::get-current-target";
    build(evaluator, NAME)?
        .current_target()
        .map(Value::from)
        .ok_or_else(|| failure(NAME, "no target is executing"))
}
