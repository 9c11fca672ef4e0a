//! Property expansion in configuration strings
//!
//! A string may contain any number of `${expression}` spans mixed with
//! literal text. Each span is evaluated on its own and its rendered value is
//! substituted in place.

use crate::error::{in_expression, ExpressionError, ExpressionResult};
use crate::expr::Evaluator;

/// A piece of an interpolated string
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fragment<'a> {
    /// Literal text, copied as-is
    Text(&'a str),

    /// The body of a `${...}` span
    Expression(&'a str),
}

/// Check if a string contains any `${...}` span
pub fn has_expressions(s: &str) -> bool {
    s.contains("${")
}

/// Split a string into literal text and expression spans.
///
/// A `}` inside a quoted string literal does not close the span.
pub fn split_fragments(s: &str) -> ExpressionResult<Vec<Fragment<'_>>> {
    let mut fragments = Vec::new();
    let mut rest = s;

    while let Some(start) = rest.find("${") {
        if start > 0 {
            fragments.push(Fragment::Text(&rest[..start]));
        }

        let body = &rest[start + 2..];
        let end = find_closing_brace(body).ok_or_else(|| ExpressionError::Unterminated(s.to_string()))?;
        fragments.push(Fragment::Expression(&body[..end]));
        rest = &body[end + 1..];
    }

    if !rest.is_empty() {
        fragments.push(Fragment::Text(rest));
    }

    Ok(fragments)
}

fn find_closing_brace(body: &str) -> Option<usize> {
    let mut in_string = false;
    for (i, c) in body.char_indices() {
        match c {
            // an escaped quote ('') toggles twice and leaves the state unchanged
            '\'' => in_string = !in_string,
            '}' if !in_string => return Some(i),
            _ => {}
        }
    }
    None
}

/// Expand every `${...}` span in `s`.
///
/// The first failing span aborts the expansion; its error is wrapped with
/// the span's expression text.
pub fn interpolate(s: &str, evaluator: &Evaluator<'_>) -> ExpressionResult<String> {
    if !has_expressions(s) {
        return Ok(s.to_string());
    }

    let mut result = String::with_capacity(s.len());
    for fragment in split_fragments(s)? {
        match fragment {
            Fragment::Text(text) => result.push_str(text),
            Fragment::Expression(expression) => {
                let value = evaluator
                    .evaluate_str(expression)
                    .map_err(|e| in_expression(expression, e))?;
                result.push_str(&value.to_string());
            }
        }
    }

    Ok(result)
}

/// Interpolate a list of strings
pub fn interpolate_list(
    list: &[String],
    evaluator: &Evaluator<'_>,
) -> ExpressionResult<Vec<String>> {
    list.iter()
        .map(|s| interpolate(s, evaluator))
        .collect::<ExpressionResult<Vec<String>>>()
}
