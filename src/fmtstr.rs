//! Printf-style template rendering for the `format` primitive.
//!
//! Recognized directives: `%s` substitutes any fill value, `%d` the
//! integer rendering of a number, `%f` the fixed-point rendering, and
//! `%%` a literal percent sign. Fill values that are strings
//! contribute their raw character payload; every other value
//! contributes its textual representation.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::builtins::Context;
use crate::error::{BuiltinError, Result};
use crate::value::{Tag, Value};

// `(?s)` so a directive character can be any byte, newline included;
// the trailing `?` catches a lone `%` at the end of the template.
static DIRECTIVE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?s)%.?").expect("directive pattern"));

/// Flatten a value to the text that `print` and `%s` substitute:
/// the raw payload for strings, the display representation otherwise.
pub(crate) fn display_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Render `template`, consuming one fill value per substituting
/// directive. Surplus fill values are ignored; running out of them is
/// a precondition failure.
pub(crate) fn render(ctx: &Context, template: &str, fills: &[Value]) -> Result<String> {
    let mut out = String::with_capacity(template.len());
    let mut rest = fills.iter();
    let mut next_fill = || {
        rest.next()
            .ok_or_else(|| BuiltinError::precondition(ctx, "not enough values for template"))
    };

    let mut last = 0;
    for m in DIRECTIVE.find_iter(template) {
        out.push_str(&template[last..m.start()]);
        match &m.as_str()[1..] {
            "%" => out.push('%'),
            "s" => out.push_str(&display_text(next_fill()?)),
            "d" => {
                let value = next_fill()?;
                let n = value
                    .as_number()
                    .ok_or_else(|| BuiltinError::type_error(ctx, &[Tag::Number], value.tag()))?;
                out.push_str(&format!("{}", n.trunc() as i64));
            }
            "f" => {
                let value = next_fill()?;
                let n = value
                    .as_number()
                    .ok_or_else(|| BuiltinError::type_error(ctx, &[Tag::Number], value.tag()))?;
                out.push_str(&format!("{n:.6}"));
            }
            "" => {
                return Err(BuiltinError::precondition(ctx, "incomplete format directive"));
            }
            other => {
                return Err(BuiltinError::precondition(
                    ctx,
                    format!("unrecognized format directive '%{other}'"),
                ));
            }
        }
        last = m.end();
    }
    out.push_str(&template[last..]);
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx() -> Context<'static> {
        Context::new("format")
    }

    #[test]
    fn substitutes_strings_and_numbers() {
        let out = render(
            &ctx(),
            "%s has %d items",
            &[Value::string("cart"), Value::number(3.0)],
        )
        .unwrap();
        assert_eq!(out, "cart has 3 items");
    }

    #[test]
    fn s_directive_takes_any_value() {
        let out = render(
            &ctx(),
            "%s %s %s",
            &[
                Value::boolean(true),
                Value::list(vec![Value::number(1.0), Value::number(2.0)]),
                Value::character('x'),
            ],
        )
        .unwrap();
        assert_eq!(out, "true (1 2) #\\x");
    }

    #[test]
    fn d_truncates_toward_zero() {
        let out = render(&ctx(), "%d/%d", &[Value::number(3.9), Value::number(-2.9)]).unwrap();
        assert_eq!(out, "3/-2");
    }

    #[test]
    fn f_renders_six_decimals() {
        let out = render(&ctx(), "%f", &[Value::number(2.5)]).unwrap();
        assert_eq!(out, "2.500000");
    }

    #[test]
    fn percent_escapes_itself() {
        let out = render(&ctx(), "100%% sure", &[]).unwrap();
        assert_eq!(out, "100% sure");
    }

    #[test]
    fn d_rejects_non_numbers() {
        let err = render(&ctx(), "%d", &[Value::string("3")]).unwrap_err();
        assert_eq!(err.to_string(), "format: expected number, got string");
    }

    #[test]
    fn missing_fill_is_a_precondition_error() {
        let err = render(&ctx(), "%s and %s", &[Value::string("one")]).unwrap_err();
        assert!(matches!(err, BuiltinError::Precondition { .. }));
    }

    #[test]
    fn surplus_fills_are_ignored() {
        let out = render(&ctx(), "done", &[Value::number(1.0)]).unwrap();
        assert_eq!(out, "done");
    }

    #[test]
    fn unknown_directive_fails() {
        let err = render(&ctx(), "%q", &[]).unwrap_err();
        assert!(matches!(err, BuiltinError::Precondition { .. }));
    }

    #[test]
    fn trailing_percent_fails() {
        let err = render(&ctx(), "half %", &[]).unwrap_err();
        assert!(matches!(err, BuiltinError::Precondition { .. }));
    }
}
