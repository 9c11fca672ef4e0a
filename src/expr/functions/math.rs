//! `math::` functions

use super::{double_arg, failure, Arity, FunctionRegistry};
use crate::error::ExpressionResult;
use crate::expr::eval::Evaluator;
use crate::expr::value::Value;

pub(super) fn register(registry: &mut FunctionRegistry) {
    registry.register("math", "abs", Arity::Exact(1), abs);
    registry.register("math", "min", Arity::Exact(2), min);
    registry.register("math", "max", Arity::Exact(2), max);
    registry.register("math", "floor", Arity::Exact(1), floor);
    registry.register("math", "ceiling", Arity::Exact(1), ceiling);
    registry.register("math", "round", Arity::Exact(1), round);
}

/// Read a numeric argument, keeping ints as ints
fn number(function: &str, args: &[Value], index: usize) -> ExpressionResult<Value> {
    match args.get(index) {
        Some(Value::Integer(i)) => Ok(Value::Integer(*i)),
        Some(Value::String(s)) => match s.trim().parse::<i64>() {
            Ok(i) => Ok(Value::Integer(i)),
            Err(_) => double_arg(function, args, index).map(Value::Double),
        },
        _ => double_arg(function, args, index).map(Value::Double),
    }
}

fn abs(_: &Evaluator<'_>, args: &[Value]) -> ExpressionResult<Value> {
    match number("math::abs", args, 0)? {
        Value::Integer(i) => i
            .checked_abs()
            .map(Value::Integer)
            .ok_or_else(|| failure("math::abs", "integer overflow")),
        other => Ok(Value::Double(other.to_double()?.abs())),
    }
}

fn pick(function: &str, args: &[Value], want_max: bool) -> ExpressionResult<Value> {
    let a = number(function, args, 0)?;
    let b = number(function, args, 1)?;
    match (a, b) {
        (Value::Integer(a), Value::Integer(b)) => {
            Ok(Value::Integer(if want_max { a.max(b) } else { a.min(b) }))
        }
        (a, b) => {
            let (a, b) = (a.to_double()?, b.to_double()?);
            Ok(Value::Double(if want_max { a.max(b) } else { a.min(b) }))
        }
    }
}

fn min(_: &Evaluator<'_>, args: &[Value]) -> ExpressionResult<Value> {
    pick("math::min", args, false)
}

fn max(_: &Evaluator<'_>, args: &[Value]) -> ExpressionResult<Value> {
    pick("math::max", args, true)
}

fn floor(_: &Evaluator<'_>, args: &[Value]) -> ExpressionResult<Value> {
    Ok(Value::Double(double_arg("math::floor", args, 0)?.floor()))
}

fn ceiling(_: &Evaluator<'_>, args: &[Value]) -> ExpressionResult<Value> {
    Ok(Value::Double(double_arg("math::ceiling", args, 0)?.ceil()))
}

fn round(_: &Evaluator<'_>, args: &[Value]) -> ExpressionResult<Value> {
    Ok(Value::Double(double_arg("math::round", args, 0)?.round()))
}

#[cfg(test)]
mod tests {
    use crate::expr::{Evaluator, FunctionRegistry, Value};
    use crate::property::PropertyStore;

    fn eval(expression: &str) -> Value {
        let store = PropertyStore::new();
        store.set("count", "5").unwrap();
        let functions = FunctionRegistry::with_builtins();
        Evaluator::new(&store, &functions)
            .evaluate_str(expression)
            .unwrap()
    }

    #[test]
    fn test_abs() {
        assert_eq!(eval("math::abs(-3)"), Value::Integer(3));
        assert_eq!(eval("math::abs(-2.5)"), Value::Double(2.5));
    }

    #[test]
    fn test_min_max_keep_integers() {
        assert_eq!(eval("math::max(count, 3)"), Value::Integer(5));
        assert_eq!(eval("math::min(2, 3)"), Value::Integer(2));
        assert_eq!(eval("math::max(2, 3.5)"), Value::Double(3.5));
    }

    #[test]
    fn test_rounding() {
        assert_eq!(eval("math::floor(2.7)"), Value::Double(2.0));
        assert_eq!(eval("math::ceiling(2.1)"), Value::Double(3.0));
        assert_eq!(eval("math::round(2.5)"), Value::Double(3.0));
        assert_eq!(eval("math::round(2.5)").to_string(), "3");
    }
}
