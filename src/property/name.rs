//! Property name validation

use crate::error::{PropertyError, PropertyResult};

/// Words the expression tokenizer reads as literals or operators
pub const RESERVED_NAMES: &[&str] = &["true", "false", "not", "and", "or", "if"];

/// Check that `name` can be stored and later referenced from an expression.
///
/// A valid name starts with a letter or `_`, continues with letters, digits,
/// `_`, `-` or `.`, does not end with `-` or `.`, and is not a reserved word.
pub fn validate_property_name(name: &str) -> PropertyResult<()> {
    if RESERVED_NAMES.contains(&name) {
        return Err(PropertyError::InvalidName(name.to_string()));
    }

    let mut chars = name.chars();

    let valid_start = matches!(chars.next(), Some(c) if c.is_alphabetic() || c == '_');
    let valid_body = chars.all(|c| c.is_alphanumeric() || matches!(c, '_' | '-' | '.'));
    let valid_end = !name.ends_with(|c: char| c == '-' || c == '.');

    if valid_start && valid_body && valid_end {
        Ok(())
    } else {
        Err(PropertyError::InvalidName(name.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_names() {
        for name in [
            "a", "foo", "_x", "project.name", "a-b", "a_b.c-d", "v2", "True", "android", "order",
            "notes",
        ] {
            assert!(validate_property_name(name).is_ok(), "{name}");
        }
    }

    #[test]
    fn test_invalid_names() {
        for name in [
            "", "1abc", "abc.", "abc-", "a b", "-a", "a$b", "true", "false", "not", "and", "or",
            "if",
        ] {
            assert_eq!(
                validate_property_name(name),
                Err(PropertyError::InvalidName(name.to_string())),
                "{name}"
            );
        }
    }
}
