//! Error taxonomy for primitive calls.
//!
//! Every failure a builtin can produce is one of three validation
//! errors (arity, type, precondition) or an I/O fault from the print
//! primitives. Validation runs before any computation, so a failed
//! call has no observable effect.

use thiserror::Error;

use crate::builtins::Context;
use crate::value::Tag;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BuiltinError {
    #[error("{name}: expected {expected} argument(s), got {actual}")]
    Arity {
        name: String,
        expected: usize,
        actual: usize,
    },

    #[error("{name}: expected at least {min} argument(s), got {actual}")]
    ArityAtLeast {
        name: String,
        min: usize,
        actual: usize,
    },

    #[error("{name}: expected {expected}, got {actual}")]
    Type {
        name: String,
        expected: String,
        actual: &'static str,
    },

    #[error("{name}: {message}")]
    Precondition { name: String, message: String },

    #[error("I/O error: {0}")]
    Io(String),
}

pub type Result<T> = std::result::Result<T, BuiltinError>;

impl BuiltinError {
    pub fn arity(ctx: &Context, expected: usize, actual: usize) -> Self {
        BuiltinError::Arity {
            name: ctx.name().to_string(),
            expected,
            actual,
        }
    }

    pub fn arity_at_least(ctx: &Context, min: usize, actual: usize) -> Self {
        BuiltinError::ArityAtLeast {
            name: ctx.name().to_string(),
            min,
            actual,
        }
    }

    /// Type error against a set of permitted tags, rendered as
    /// "number or string" style prose.
    pub fn type_error(ctx: &Context, allowed: &[Tag], actual: Tag) -> Self {
        let expected = allowed
            .iter()
            .map(|t| t.name())
            .collect::<Vec<_>>()
            .join(" or ");
        BuiltinError::Type {
            name: ctx.name().to_string(),
            expected,
            actual: actual.name(),
        }
    }

    pub fn precondition(ctx: &Context, message: impl Into<String>) -> Self {
        BuiltinError::Precondition {
            name: ctx.name().to_string(),
            message: message.into(),
        }
    }
}
