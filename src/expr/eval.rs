//! Expression evaluation
//!
//! Integer arithmetic stays integral (division truncates toward zero); any
//! double operand makes the result a double. Equality and ordering require
//! operands of the same type, except that ints and doubles compare
//! numerically.

use crate::error::{ExpressionError, ExpressionResult};
use crate::expr::functions::FunctionRegistry;
use crate::expr::interpolate::interpolate;
use crate::expr::parser::{parse, BinaryOp, Expr, UnaryOp};
use crate::expr::value::{parse_bool, Value};
use crate::property::{PropertyStore, PropertyValue};
use std::cell::RefCell;
use std::cmp::Ordering;
use std::path::Path;

/// Read-only view of the running build, used by the `project::` and
/// `target::` functions
pub trait BuildInfo {
    /// Project name
    fn project_name(&self) -> &str;

    /// Default target, if the project has one
    fn default_target(&self) -> Option<&str>;

    /// Check if a target is defined
    fn has_target(&self, name: &str) -> bool;

    /// Check if a target has finished (succeeded or was skipped)
    fn has_executed(&self, name: &str) -> bool;

    /// The target whose tasks are being evaluated, if any
    fn current_target(&self) -> Option<&str>;
}

/// Evaluates expressions against a property store and a function registry
pub struct Evaluator<'a> {
    properties: &'a PropertyStore,
    functions: &'a FunctionRegistry,
    base_dir: &'a Path,
    build: Option<&'a dyn BuildInfo>,

    /// Dynamic properties currently being expanded, outermost first
    resolving: RefCell<Vec<String>>,
}

impl<'a> Evaluator<'a> {
    /// Create an evaluator resolving relative paths against the current directory
    pub fn new(properties: &'a PropertyStore, functions: &'a FunctionRegistry) -> Self {
        Evaluator {
            properties,
            functions,
            base_dir: Path::new("."),
            build: None,
            resolving: RefCell::new(Vec::new()),
        }
    }

    /// Set the directory relative paths resolve against
    pub fn with_base_dir(mut self, base_dir: &'a Path) -> Self {
        self.base_dir = base_dir;
        self
    }

    /// Attach the running build
    pub fn with_build(mut self, build: &'a dyn BuildInfo) -> Self {
        self.build = Some(build);
        self
    }

    /// The property store
    pub fn properties(&self) -> &'a PropertyStore {
        self.properties
    }

    /// The base directory for relative paths
    pub fn base_dir(&self) -> &'a Path {
        self.base_dir
    }

    /// The running build, if attached
    pub fn build(&self) -> Option<&'a dyn BuildInfo> {
        self.build
    }

    /// Expand all `${...}` spans in `text`
    pub fn expand(&self, text: &str) -> ExpressionResult<String> {
        interpolate(text, self)
    }

    /// Expand `text` and read the result as a boolean
    pub fn expand_bool(&self, text: &str) -> ExpressionResult<bool> {
        let expanded = self.expand(text)?;
        parse_bool(&expanded).ok_or_else(|| {
            ExpressionError::Type(format!("'{}' is not a valid boolean", expanded))
        })
    }

    /// Parse and evaluate a bare expression (without `${}`)
    pub fn evaluate_str(&self, expression: &str) -> ExpressionResult<Value> {
        let expr = parse(expression)?;
        self.evaluate(&expr)
    }

    /// Resolve a property, expanding dynamic values against the current store
    pub fn property(&self, name: &str) -> ExpressionResult<String> {
        match self.properties.raw(name) {
            None => Err(ExpressionError::UndefinedProperty(name.to_string())),
            Some(PropertyValue::Static(value)) => Ok(value),
            Some(PropertyValue::Dynamic(text)) => {
                {
                    let mut resolving = self.resolving.borrow_mut();
                    if resolving.iter().any(|n| n == name) {
                        let mut chain = resolving.clone();
                        chain.push(name.to_string());
                        return Err(ExpressionError::CircularProperty(chain.join(" -> ")));
                    }
                    resolving.push(name.to_string());
                }

                let result = self.expand(&text);
                self.resolving.borrow_mut().pop();
                result
            }
        }
    }

    /// Evaluate a parsed expression
    pub fn evaluate(&self, expr: &Expr) -> ExpressionResult<Value> {
        match expr {
            Expr::Literal(value) => Ok(value.clone()),
            Expr::Property(name) => self.property(name).map(Value::String),
            Expr::Unary { op, operand } => {
                let value = self.evaluate(operand)?;
                unary(*op, value)
            }
            Expr::Binary { op, left, right } => self.binary(*op, left, right),
            Expr::Call {
                namespace,
                name,
                args,
            } => {
                let function = self.functions.resolve(namespace, name, args.len())?;
                let values = args
                    .iter()
                    .map(|arg| self.evaluate(arg))
                    .collect::<ExpressionResult<Vec<Value>>>()?;
                (function.call)(self, &values)
            }
            Expr::Conditional {
                condition,
                then_branch,
                else_branch,
            } => {
                if self.evaluate(condition)?.to_bool()? {
                    self.evaluate(then_branch)
                } else {
                    self.evaluate(else_branch)
                }
            }
        }
    }

    fn binary(&self, op: BinaryOp, left: &Expr, right: &Expr) -> ExpressionResult<Value> {
        match op {
            BinaryOp::And => {
                if !self.evaluate(left)?.to_bool()? {
                    return Ok(Value::Boolean(false));
                }
                return Ok(Value::Boolean(self.evaluate(right)?.to_bool()?));
            }
            BinaryOp::Or => {
                if self.evaluate(left)?.to_bool()? {
                    return Ok(Value::Boolean(true));
                }
                return Ok(Value::Boolean(self.evaluate(right)?.to_bool()?));
            }
            _ => {}
        }

        let left = self.evaluate(left)?;
        let right = self.evaluate(right)?;

        match op {
            BinaryOp::Equal => Ok(Value::Boolean(
                compare(op, &left, &right)? == Some(Ordering::Equal),
            )),
            BinaryOp::NotEqual => Ok(Value::Boolean(
                compare(op, &left, &right)? != Some(Ordering::Equal),
            )),
            BinaryOp::Less => Ok(Value::Boolean(
                compare(op, &left, &right)? == Some(Ordering::Less),
            )),
            BinaryOp::LessEqual => Ok(Value::Boolean(matches!(
                compare(op, &left, &right)?,
                Some(Ordering::Less | Ordering::Equal)
            ))),
            BinaryOp::Greater => Ok(Value::Boolean(
                compare(op, &left, &right)? == Some(Ordering::Greater),
            )),
            BinaryOp::GreaterEqual => Ok(Value::Boolean(matches!(
                compare(op, &left, &right)?,
                Some(Ordering::Greater | Ordering::Equal)
            ))),
            _ => arithmetic(op, &left, &right),
        }
    }
}

fn type_mismatch(op: BinaryOp, left: &Value, right: &Value) -> ExpressionError {
    ExpressionError::Type(format!(
        "operator '{}' cannot be applied to {} and {}",
        op.symbol(),
        left.type_name(),
        right.type_name()
    ))
}

fn unary(op: UnaryOp, value: Value) -> ExpressionResult<Value> {
    match (op, value) {
        (UnaryOp::Not, value) => Ok(Value::Boolean(!value.to_bool()?)),
        (UnaryOp::Negate, Value::Integer(i)) => i
            .checked_neg()
            .map(Value::Integer)
            .ok_or_else(|| ExpressionError::Type("integer overflow".to_string())),
        (UnaryOp::Negate, Value::Double(d)) => Ok(Value::Double(-d)),
        (UnaryOp::Negate, other) => Err(ExpressionError::Type(format!(
            "operator '-' cannot be applied to {}",
            other.type_name()
        ))),
    }
}

/// Order two values of compatible types; `None` means unordered (NaN)
fn compare(op: BinaryOp, left: &Value, right: &Value) -> ExpressionResult<Option<Ordering>> {
    match (left, right) {
        (Value::Integer(a), Value::Integer(b)) => Ok(Some(a.cmp(b))),
        (a, b) if a.is_numeric() && b.is_numeric() => {
            Ok(a.to_double()?.partial_cmp(&b.to_double()?))
        }
        (Value::String(a), Value::String(b)) => Ok(Some(a.cmp(b))),
        (Value::Boolean(a), Value::Boolean(b)) => Ok(Some(a.cmp(b))),
        _ => Err(type_mismatch(op, left, right)),
    }
}

fn arithmetic(op: BinaryOp, left: &Value, right: &Value) -> ExpressionResult<Value> {
    match (left, right) {
        (Value::String(a), Value::String(b)) if op == BinaryOp::Add => {
            Ok(Value::String(format!("{}{}", a, b)))
        }
        (Value::Integer(a), Value::Integer(b)) => integer_arithmetic(op, *a, *b, left, right),
        (a, b) if a.is_numeric() && b.is_numeric() => {
            double_arithmetic(op, a.to_double()?, b.to_double()?, left, right)
        }
        _ => Err(type_mismatch(op, left, right)),
    }
}

fn integer_arithmetic(
    op: BinaryOp,
    a: i64,
    b: i64,
    left: &Value,
    right: &Value,
) -> ExpressionResult<Value> {
    let result = match op {
        BinaryOp::Add => a.checked_add(b),
        BinaryOp::Subtract => a.checked_sub(b),
        BinaryOp::Multiply => a.checked_mul(b),
        BinaryOp::Divide | BinaryOp::Remainder if b == 0 => {
            return Err(ExpressionError::DivisionByZero)
        }
        BinaryOp::Divide => a.checked_div(b),
        BinaryOp::Remainder => a.checked_rem(b),
        _ => return Err(type_mismatch(op, left, right)),
    };

    result
        .map(Value::Integer)
        .ok_or_else(|| ExpressionError::Type(format!("integer overflow in {} {} {}", a, op.symbol(), b)))
}

fn double_arithmetic(
    op: BinaryOp,
    a: f64,
    b: f64,
    left: &Value,
    right: &Value,
) -> ExpressionResult<Value> {
    let result = match op {
        BinaryOp::Add => a + b,
        BinaryOp::Subtract => a - b,
        BinaryOp::Multiply => a * b,
        BinaryOp::Divide | BinaryOp::Remainder if b == 0.0 => {
            return Err(ExpressionError::DivisionByZero)
        }
        BinaryOp::Divide => a / b,
        BinaryOp::Remainder => a % b,
        _ => return Err(type_mismatch(op, left, right)),
    };

    Ok(Value::Double(result))
}
