//! `string::` functions. Indexes and lengths count characters.

use super::{failure, int_arg, text_arg, Arity, FunctionRegistry};
use crate::error::ExpressionResult;
use crate::expr::eval::Evaluator;
use crate::expr::value::Value;

pub(super) fn register(registry: &mut FunctionRegistry) {
    registry.register("string", "length", Arity::Exact(1), length);
    registry.register("string", "substring", Arity::Range(2, 3), substring);
    registry.register("string", "contains", Arity::Exact(2), contains);
    registry.register("string", "starts-with", Arity::Exact(2), starts_with);
    registry.register("string", "ends-with", Arity::Exact(2), ends_with);
    registry.register("string", "index-of", Arity::Exact(2), index_of);
    registry.register("string", "last-index-of", Arity::Exact(2), last_index_of);
    registry.register("string", "to-upper", Arity::Exact(1), to_upper);
    registry.register("string", "to-lower", Arity::Exact(1), to_lower);
    registry.register("string", "trim", Arity::Exact(1), trim);
    registry.register("string", "trim-start", Arity::Exact(1), trim_start);
    registry.register("string", "trim-end", Arity::Exact(1), trim_end);
    registry.register("string", "replace", Arity::Exact(3), replace);
    registry.register("string", "pad-left", Arity::Range(2, 3), pad_left);
    registry.register("string", "pad-right", Arity::Range(2, 3), pad_right);
}

fn length(_: &Evaluator<'_>, args: &[Value]) -> ExpressionResult<Value> {
    Ok(Value::Integer(text_arg(args, 0).chars().count() as i64))
}

fn substring(_: &Evaluator<'_>, args: &[Value]) -> ExpressionResult<Value> {
    const NAME: &str = "string::substring";
    let text = text_arg(args, 0);
    let total = text.chars().count() as i64;
    let start = int_arg(NAME, args, 1)?;
    let count = if args.len() > 2 {
        int_arg(NAME, args, 2)?
    } else {
        total - start
    };

    if start < 0 || count < 0 || start + count > total {
        return Err(failure(
            NAME,
            format!(
                "range {}..{} is outside a string of length {}",
                start,
                start + count,
                total
            ),
        ));
    }

    Ok(Value::String(
        text.chars().skip(start as usize).take(count as usize).collect(),
    ))
}

fn contains(_: &Evaluator<'_>, args: &[Value]) -> ExpressionResult<Value> {
    Ok(Value::Boolean(text_arg(args, 0).contains(&*text_arg(args, 1))))
}

fn starts_with(_: &Evaluator<'_>, args: &[Value]) -> ExpressionResult<Value> {
    Ok(Value::Boolean(text_arg(args, 0).starts_with(&*text_arg(args, 1))))
}

fn ends_with(_: &Evaluator<'_>, args: &[Value]) -> ExpressionResult<Value> {
    Ok(Value::Boolean(text_arg(args, 0).ends_with(&*text_arg(args, 1))))
}

/// Convert a byte offset into a character index
fn char_index(text: &str, byte: Option<usize>) -> Value {
    match byte {
        Some(b) => Value::Integer(text[..b].chars().count() as i64),
        None => Value::Integer(-1),
    }
}

fn index_of(_: &Evaluator<'_>, args: &[Value]) -> ExpressionResult<Value> {
    let text = text_arg(args, 0);
    Ok(char_index(&text, text.find(&*text_arg(args, 1))))
}

fn last_index_of(_: &Evaluator<'_>, args: &[Value]) -> ExpressionResult<Value> {
    let text = text_arg(args, 0);
    Ok(char_index(&text, text.rfind(&*text_arg(args, 1))))
}

fn to_upper(_: &Evaluator<'_>, args: &[Value]) -> ExpressionResult<Value> {
    Ok(Value::String(text_arg(args, 0).to_uppercase()))
}

fn to_lower(_: &Evaluator<'_>, args: &[Value]) -> ExpressionResult<Value> {
    Ok(Value::String(text_arg(args, 0).to_lowercase()))
}

fn trim(_: &Evaluator<'_>, args: &[Value]) -> ExpressionResult<Value> {
    Ok(Value::from(text_arg(args, 0).trim()))
}

fn trim_start(_: &Evaluator<'_>, args: &[Value]) -> ExpressionResult<Value> {
    Ok(Value::from(text_arg(args, 0).trim_start()))
}

fn trim_end(_: &Evaluator<'_>, args: &[Value]) -> ExpressionResult<Value> {
    Ok(Value::from(text_arg(args, 0).trim_end()))
}

fn replace(_: &Evaluator<'_>, args: &[Value]) -> ExpressionResult<Value> {
    let from = text_arg(args, 1);
    if from.is_empty() {
        return Err(failure("string::replace", "search string must not be empty"));
    }
    Ok(Value::String(
        text_arg(args, 0).replace(&*from, &text_arg(args, 2)),
    ))
}

/// Width and fill character for the padding functions
fn padding(function: &str, args: &[Value]) -> ExpressionResult<(usize, char)> {
    let width = int_arg(function, args, 1)?;
    let width = usize::try_from(width)
        .map_err(|_| failure(function, format!("width must not be negative, got {}", width)))?;

    let fill = if args.len() > 2 {
        let fill = text_arg(args, 2);
        let mut chars = fill.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => c,
            _ => {
                return Err(failure(
                    function,
                    format!("padding must be a single character, got '{}'", fill),
                ))
            }
        }
    } else {
        ' '
    };

    Ok((width, fill))
}

fn pad_left(_: &Evaluator<'_>, args: &[Value]) -> ExpressionResult<Value> {
    let (width, fill) = padding("string::pad-left", args)?;
    let text = text_arg(args, 0);
    let missing = width.saturating_sub(text.chars().count());
    let mut result: String = std::iter::repeat(fill).take(missing).collect();
    result.push_str(&text);
    Ok(Value::String(result))
}

fn pad_right(_: &Evaluator<'_>, args: &[Value]) -> ExpressionResult<Value> {
    let (width, fill) = padding("string::pad-right", args)?;
    let mut result = text_arg(args, 0).into_owned();
    let missing = width.saturating_sub(result.chars().count());
    result.extend(std::iter::repeat(fill).take(missing));
    Ok(Value::String(result))
}

#[cfg(test)]
mod tests {
    use crate::error::ExpressionError;
    use crate::expr::{Evaluator, FunctionRegistry, Value};
    use crate::property::PropertyStore;

    fn eval(expression: &str) -> Result<Value, ExpressionError> {
        let store = PropertyStore::new();
        store.set("greeting", "Hello World").unwrap();
        let functions = FunctionRegistry::with_builtins();
        Evaluator::new(&store, &functions).evaluate_str(expression)
    }

    fn text(s: &str) -> Result<Value, ExpressionError> {
        Ok(Value::from(s))
    }

    #[test]
    fn test_length_and_substring() {
        assert_eq!(eval("string::length(greeting)"), Ok(Value::Integer(11)));
        assert_eq!(eval("string::length('héllo')"), Ok(Value::Integer(5)));
        assert_eq!(eval("string::substring(greeting, 6)"), text("World"));
        assert_eq!(eval("string::substring(greeting, 0, 5)"), text("Hello"));
        assert!(eval("string::substring('abc', 2, 5)").is_err());
    }

    #[test]
    fn test_search() {
        assert_eq!(eval("string::contains(greeting, 'lo W')"), Ok(Value::Boolean(true)));
        assert_eq!(eval("string::starts-with(greeting, 'Hell')"), Ok(Value::Boolean(true)));
        assert_eq!(eval("string::ends-with(greeting, 'x')"), Ok(Value::Boolean(false)));
        assert_eq!(eval("string::index-of(greeting, 'o')"), Ok(Value::Integer(4)));
        assert_eq!(eval("string::last-index-of(greeting, 'o')"), Ok(Value::Integer(7)));
        assert_eq!(eval("string::index-of(greeting, 'z')"), Ok(Value::Integer(-1)));
    }

    #[test]
    fn test_case_and_trim() {
        assert_eq!(eval("string::to-upper('abc')"), text("ABC"));
        assert_eq!(eval("string::to-lower('ABC')"), text("abc"));
        assert_eq!(eval("string::trim('  x  ')"), text("x"));
        assert_eq!(eval("string::trim-start('  x  ')"), text("x  "));
        assert_eq!(eval("string::trim-end('  x  ')"), text("  x"));
    }

    #[test]
    fn test_replace_and_pad() {
        assert_eq!(eval("string::replace('a-b-c', '-', '.')"), text("a.b.c"));
        assert_eq!(eval("string::pad-left('7', 3, '0')"), text("007"));
        assert_eq!(eval("string::pad-right('ab', 4)"), text("ab  "));
        assert_eq!(eval("string::pad-left('abcd', 2)"), text("abcd"));
        assert!(eval("string::pad-left('a', 3, 'xy')").is_err());
    }

    #[test]
    fn test_non_string_arguments_are_rendered() {
        assert_eq!(eval("string::length(12345)"), Ok(Value::Integer(5)));
        assert_eq!(eval("string::to-upper(true)"), text("TRUE"));
    }
}
