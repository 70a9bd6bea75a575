//! Argument validation for primitives.
//!
//! Every builtin runs these checks before touching its arguments:
//! arity first, then types, then preconditions. The first failure
//! short-circuits, so a failing call never does partial work.

use crate::builtins::Context;
use crate::error::{BuiltinError, Result};
use crate::value::{Tag, Value};

/// Check that the argument count is exactly `expected`.
pub fn expect_argc(ctx: &Context, expected: usize, actual: usize) -> Result<()> {
    if actual != expected {
        return Err(BuiltinError::arity(ctx, expected, actual));
    }
    Ok(())
}

/// Check that the argument count is at least `min`.
pub fn expect_argc_at_least(ctx: &Context, min: usize, actual: usize) -> Result<()> {
    if actual < min {
        return Err(BuiltinError::arity_at_least(ctx, min, actual));
    }
    Ok(())
}

/// Check that the value carries the given tag.
pub fn expect_type(ctx: &Context, value: &Value, tag: Tag) -> Result<()> {
    if value.tag() != tag {
        return Err(BuiltinError::type_error(ctx, &[tag], value.tag()));
    }
    Ok(())
}

/// Check that the value's tag is one of an explicit set.
pub fn expect_type_in(ctx: &Context, value: &Value, tags: &[Tag]) -> Result<()> {
    if !tags.contains(&value.tag()) {
        return Err(BuiltinError::type_error(ctx, tags, value.tag()));
    }
    Ok(())
}

/// Check a semantic precondition on type-correct input.
pub fn expect_condition(ctx: &Context, condition: bool, message: &str) -> Result<()> {
    if !condition {
        return Err(BuiltinError::precondition(ctx, message));
    }
    Ok(())
}

// ============================================================================
// Typed Payload Extraction
// ============================================================================

// Single-tag expectation fused with payload access. These carry the
// same TypeError contract as `expect_type`.

pub fn expect_number(ctx: &Context, value: &Value) -> Result<f64> {
    value
        .as_number()
        .ok_or_else(|| BuiltinError::type_error(ctx, &[Tag::Number], value.tag()))
}

pub fn expect_string<'a>(ctx: &Context, value: &'a Value) -> Result<&'a str> {
    value
        .as_str()
        .ok_or_else(|| BuiltinError::type_error(ctx, &[Tag::String], value.tag()))
}

pub fn expect_boolean(ctx: &Context, value: &Value) -> Result<bool> {
    value
        .as_bool()
        .ok_or_else(|| BuiltinError::type_error(ctx, &[Tag::Boolean], value.tag()))
}

pub fn expect_list<'a>(ctx: &Context, value: &'a Value) -> Result<&'a [Value]> {
    value
        .as_slice()
        .ok_or_else(|| BuiltinError::type_error(ctx, &[Tag::List], value.tag()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn argc_mismatch_is_arity_error() {
        let ctx = Context::new("car");
        assert!(expect_argc(&ctx, 1, 1).is_ok());
        let err = expect_argc(&ctx, 1, 3).unwrap_err();
        assert_eq!(err.to_string(), "car: expected 1 argument(s), got 3");
    }

    #[test]
    fn argc_at_least_accepts_more() {
        let ctx = Context::new("format");
        assert!(expect_argc_at_least(&ctx, 1, 4).is_ok());
        let err = expect_argc_at_least(&ctx, 1, 0).unwrap_err();
        assert_eq!(err.to_string(), "format: expected at least 1 argument(s), got 0");
    }

    #[test]
    fn type_set_renders_alternatives() {
        let ctx = Context::new("length");
        let err = expect_type_in(&ctx, &Value::number(1.0), &[Tag::List, Tag::String]).unwrap_err();
        assert_eq!(err.to_string(), "length: expected list or string, got number");
    }

    #[test]
    fn extraction_checks_the_tag() {
        let ctx = Context::new("+");
        assert_eq!(expect_number(&ctx, &Value::number(2.5)).unwrap(), 2.5);
        let err = expect_number(&ctx, &Value::string("2.5")).unwrap_err();
        assert_eq!(err.to_string(), "+: expected number, got string");
    }

    #[test]
    fn condition_failure_is_precondition_error() {
        let ctx = Context::new("car");
        let err = expect_condition(&ctx, false, "car of empty list").unwrap_err();
        assert_eq!(err.to_string(), "car: car of empty list");
    }
}
