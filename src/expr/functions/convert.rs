//! `convert::` functions

use super::{failure, Arity, FunctionRegistry};
use crate::error::ExpressionResult;
use crate::expr::eval::Evaluator;
use crate::expr::value::Value;

pub(super) fn register(registry: &mut FunctionRegistry) {
    registry.register("convert", "to-int", Arity::Exact(1), to_int);
    registry.register("convert", "to-double", Arity::Exact(1), to_double);
    registry.register("convert", "to-string", Arity::Exact(1), to_string);
    registry.register("convert", "to-boolean", Arity::Exact(1), to_boolean);
}

fn to_int(_: &Evaluator<'_>, args: &[Value]) -> ExpressionResult<Value> {
    args[0]
        .to_int()
        .map(Value::Integer)
        .map_err(|e| failure("convert::to-int", e.to_string()))
}

fn to_double(_: &Evaluator<'_>, args: &[Value]) -> ExpressionResult<Value> {
    args[0]
        .to_double()
        .map(Value::Double)
        .map_err(|e| failure("convert::to-double", e.to_string()))
}

fn to_string(_: &Evaluator<'_>, args: &[Value]) -> ExpressionResult<Value> {
    Ok(Value::String(args[0].to_string()))
}

fn to_boolean(_: &Evaluator<'_>, args: &[Value]) -> ExpressionResult<Value> {
    args[0]
        .to_bool()
        .map(Value::Boolean)
        .map_err(|e| failure("convert::to-boolean", e.to_string()))
}
