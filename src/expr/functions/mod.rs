//! Built-in expression functions
//!
//! Functions live in namespaces and are called as `namespace::name(args)`.
//! Each one declares its arity, which is checked before any argument is
//! evaluated.

mod build;
mod convert;
mod fs;
mod math;
mod string;

use crate::error::{ExpressionError, ExpressionResult};
use crate::expr::eval::Evaluator;
use crate::expr::value::Value;
use std::borrow::Cow;
use std::collections::HashMap;
use std::fmt;

/// Signature shared by every function implementation
pub type FunctionImpl = fn(&Evaluator<'_>, &[Value]) -> ExpressionResult<Value>;

/// Number of arguments a function accepts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arity {
    Exact(usize),
    /// Inclusive range
    Range(usize, usize),
}

impl Arity {
    /// Check if `count` arguments are accepted
    pub fn accepts(self, count: usize) -> bool {
        match self {
            Arity::Exact(n) => count == n,
            Arity::Range(min, max) => (min..=max).contains(&count),
        }
    }
}

impl fmt::Display for Arity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Arity::Exact(n) => write!(f, "{}", n),
            Arity::Range(min, max) => write!(f, "{} to {}", min, max),
        }
    }
}

/// A registered function
#[derive(Clone, Copy)]
pub struct FunctionDef {
    pub arity: Arity,
    pub call: FunctionImpl,
}

/// Functions callable from expressions, keyed by `namespace::name`
#[derive(Clone, Default)]
pub struct FunctionRegistry {
    functions: HashMap<String, FunctionDef>,
}

impl FunctionRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry holding every built-in function
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        string::register(&mut registry);
        math::register(&mut registry);
        convert::register(&mut registry);
        fs::register(&mut registry);
        build::register(&mut registry);
        registry
    }

    /// Register a function, replacing any previous one with the same name
    pub fn register(&mut self, namespace: &str, name: &str, arity: Arity, call: FunctionImpl) {
        self.functions
            .insert(format!("{}::{}", namespace, name), FunctionDef { arity, call });
    }

    /// Look up a function by namespace and name
    pub fn lookup(&self, namespace: &str, name: &str) -> Option<&FunctionDef> {
        self.functions.get(&format!("{}::{}", namespace, name))
    }

    /// Look up a function and check it accepts `argc` arguments
    pub fn resolve(&self, namespace: &str, name: &str, argc: usize) -> ExpressionResult<&FunctionDef> {
        let qualified = format!("{}::{}", namespace, name);
        let def = self
            .functions
            .get(&qualified)
            .ok_or_else(|| ExpressionError::UnknownFunction(qualified.clone()))?;

        if !def.arity.accepts(argc) {
            return Err(ExpressionError::Arity {
                function: qualified,
                expected: def.arity.to_string(),
                actual: argc,
            });
        }
        Ok(def)
    }

    /// Qualified names of all registered functions, sorted
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.functions.keys().cloned().collect();
        names.sort();
        names
    }
}

impl fmt::Debug for FunctionRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FunctionRegistry")
            .field("functions", &self.names())
            .finish()
    }
}

/// Build a `Function` error for `function`
pub(crate) fn failure(function: &str, message: impl Into<String>) -> ExpressionError {
    ExpressionError::Function {
        function: function.to_string(),
        message: message.into(),
    }
}

/// Argument `index` as text; non-string values are rendered
pub(crate) fn text_arg<'v>(args: &'v [Value], index: usize) -> Cow<'v, str> {
    match args.get(index) {
        Some(value) => match value.as_str() {
            Some(s) => Cow::Borrowed(s),
            None => Cow::Owned(value.to_string()),
        },
        None => Cow::Borrowed(""),
    }
}

/// Argument `index` as an integer, parsing strings
pub(crate) fn int_arg(function: &str, args: &[Value], index: usize) -> ExpressionResult<i64> {
    args.get(index)
        .ok_or_else(|| failure(function, format!("missing argument {}", index + 1)))?
        .to_int()
        .map_err(|e| failure(function, e.to_string()))
}

/// Argument `index` as a double, parsing strings
pub(crate) fn double_arg(function: &str, args: &[Value], index: usize) -> ExpressionResult<f64> {
    args.get(index)
        .ok_or_else(|| failure(function, format!("missing argument {}", index + 1)))?
        .to_double()
        .map_err(|e| failure(function, e.to_string()))
}
