//! The `${...}` expression language
//!
//! Text is tokenized, parsed into an [`Expr`] tree and evaluated by an
//! [`Evaluator`] against a property store and a [`FunctionRegistry`].

pub mod eval;
pub mod functions;
pub mod interpolate;
pub mod parser;
pub mod token;
pub mod value;

// Re-export main types
pub use eval::{BuildInfo, Evaluator};
pub use functions::{Arity, FunctionDef, FunctionImpl, FunctionRegistry};
pub use interpolate::{has_expressions, interpolate, interpolate_list, split_fragments, Fragment};
pub use parser::{parse, BinaryOp, Expr, UnaryOp};
pub use token::{tokenize, Token, TokenKind};
pub use value::{parse_bool, Value};
