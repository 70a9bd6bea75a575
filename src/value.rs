use std::fmt;
use std::sync::Arc;

use crate::builtins::Context;
use crate::error::Result;
use crate::interner::Symbol;

// ============================================================================
// Core Type System
// ============================================================================

/// Discriminant identifying which of the seven value kinds a datum is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tag {
    Atom,
    List,
    Number,
    String,
    Boolean,
    Character,
    Function,
}

impl Tag {
    /// The lowercase tag name, as reported by the `type` primitive.
    pub fn name(self) -> &'static str {
        match self {
            Tag::Atom => "atom",
            Tag::List => "list",
            Tag::Number => "number",
            Tag::String => "string",
            Tag::Boolean => "boolean",
            Tag::Character => "character",
            Tag::Function => "function",
        }
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Native function type - primitives and host-wrapped closures
/// callable with a context and an ordered argument list.
pub type NativeFn = Arc<dyn Fn(&Context, &[Value]) -> Result<Value> + Send + Sync>;

/// A tagged runtime value.
///
/// Values are immutable once constructed; list primitives always build
/// new lists. Sharing is by `Arc`, so clones are cheap and the model is
/// safe for concurrent readers.
#[derive(Clone)]
pub enum Value {
    Atom(Symbol),
    List(Arc<Vec<Value>>),
    Number(f64),
    String(String),
    Boolean(bool),
    Character(char),
    Function(NativeFn),
}

// ============================================================================
// Constructors
// ============================================================================

impl Value {
    pub fn atom(name: &str) -> Value {
        Value::Atom(Symbol::intern(name))
    }

    pub fn list(items: Vec<Value>) -> Value {
        Value::List(Arc::new(items))
    }

    pub fn empty_list() -> Value {
        Value::List(Arc::new(Vec::new()))
    }

    pub fn number(n: f64) -> Value {
        Value::Number(n)
    }

    pub fn string(s: impl Into<String>) -> Value {
        Value::String(s.into())
    }

    pub fn boolean(b: bool) -> Value {
        Value::Boolean(b)
    }

    pub fn character(c: char) -> Value {
        Value::Character(c)
    }

    pub fn function(f: NativeFn) -> Value {
        Value::Function(f)
    }
}

// ============================================================================
// Accessors
// ============================================================================

impl Value {
    /// The value's type tag. Always matches the payload shape.
    pub fn tag(&self) -> Tag {
        match self {
            Value::Atom(_) => Tag::Atom,
            Value::List(_) => Tag::List,
            Value::Number(_) => Tag::Number,
            Value::String(_) => Tag::String,
            Value::Boolean(_) => Tag::Boolean,
            Value::Character(_) => Tag::Character,
            Value::Function(_) => Tag::Function,
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_char(&self) -> Option<char> {
        match self {
            Value::Character(c) => Some(*c),
            _ => None,
        }
    }

    pub fn as_slice(&self) -> Option<&[Value]> {
        match self {
            Value::List(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_symbol(&self) -> Option<Symbol> {
        match self {
            Value::Atom(sym) => Some(*sym),
            _ => None,
        }
    }

    pub fn as_function(&self) -> Option<&NativeFn> {
        match self {
            Value::Function(f) => Some(f),
            _ => None,
        }
    }
}

// ============================================================================
// Equality
// ============================================================================

// Manual PartialEq because function values compare by identity.
// This is Rust-level structural equality; the `=` primitive layers its
// own tag validation on top (see builtins).
impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Atom(a), Value::Atom(b)) => a == b,
            (Value::List(a), Value::List(b)) => a == b,
            (Value::Number(a), Value::Number(b)) => a == b,
            (Value::String(a), Value::String(b)) => a == b,
            (Value::Boolean(a), Value::Boolean(b)) => a == b,
            (Value::Character(a), Value::Character(b)) => a == b,
            (Value::Function(a), Value::Function(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}

// Manual Debug since NativeFn carries no Debug impl.
impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Atom(sym) => f.debug_tuple("Atom").field(sym).finish(),
            Value::List(items) => f.debug_tuple("List").field(items).finish(),
            Value::Number(n) => f.debug_tuple("Number").field(n).finish(),
            Value::String(s) => f.debug_tuple("String").field(s).finish(),
            Value::Boolean(b) => f.debug_tuple("Boolean").field(b).finish(),
            Value::Character(c) => f.debug_tuple("Character").field(c).finish(),
            Value::Function(_) => f.debug_tuple("Function").field(&"<function>").finish(),
        }
    }
}

// ============================================================================
// Display Implementation
// ============================================================================

fn escape_string(s: &str) -> String {
    let mut result = String::new();
    for c in s.chars() {
        match c {
            '\n' => result.push_str("\\n"),
            '\t' => result.push_str("\\t"),
            '\r' => result.push_str("\\r"),
            '\\' => result.push_str("\\\\"),
            '"' => result.push_str("\\\""),
            c => result.push(c),
        }
    }
    result
}

/// The externally-visible textual representation, as returned by the
/// `to-string` primitive.
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Value::Atom(sym) => write!(f, "{sym}"),
            Value::Number(n) => write!(f, "{n}"),
            Value::String(s) => write!(f, "\"{}\"", escape_string(s)),
            Value::Boolean(b) => write!(f, "{b}"),
            Value::Character(' ') => write!(f, "#\\space"),
            Value::Character('\n') => write!(f, "#\\newline"),
            Value::Character('\t') => write!(f, "#\\tab"),
            Value::Character(c) => write!(f, "#\\{c}"),
            Value::List(items) => {
                write!(f, "(")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, " ")?;
                    }
                    write!(f, "{item}")?;
                }
                write!(f, ")")
            }
            Value::Function(_) => write!(f, "<function>"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tag_matches_payload() {
        assert_eq!(Value::number(3.0).tag(), Tag::Number);
        assert_eq!(Value::string("x").tag(), Tag::String);
        assert_eq!(Value::boolean(true).tag(), Tag::Boolean);
        assert_eq!(Value::character('q').tag(), Tag::Character);
        assert_eq!(Value::atom("foo").tag(), Tag::Atom);
        assert_eq!(Value::empty_list().tag(), Tag::List);
    }

    #[test]
    fn accessors_return_payloads_for_matching_tags_only() {
        assert_eq!(Value::number(2.5).as_number(), Some(2.5));
        assert_eq!(Value::number(2.5).as_str(), None);
        assert_eq!(Value::string("hi").as_str(), Some("hi"));
        assert_eq!(Value::boolean(true).as_bool(), Some(true));
        assert_eq!(Value::character('q').as_char(), Some('q'));
        assert_eq!(Value::atom("x").as_symbol(), Some(Symbol::intern("x")));
        let l = Value::list(vec![Value::number(1.0)]);
        assert_eq!(l.as_slice().map(<[Value]>::len), Some(1));
        let f: NativeFn = Arc::new(|_ctx, _args| Ok(Value::empty_list()));
        assert!(Value::function(f).as_function().is_some());
        assert!(Value::empty_list().as_function().is_none());
    }

    #[test]
    fn numbers_display_without_trailing_zero() {
        assert_eq!(Value::number(3.0).to_string(), "3");
        assert_eq!(Value::number(2.5).to_string(), "2.5");
    }

    #[test]
    fn strings_display_quoted_and_escaped() {
        assert_eq!(Value::string("hi").to_string(), "\"hi\"");
        assert_eq!(Value::string("a\nb").to_string(), "\"a\\nb\"");
        assert_eq!(Value::string("say \"hi\"").to_string(), "\"say \\\"hi\\\"\"");
    }

    #[test]
    fn characters_display_scheme_style() {
        assert_eq!(Value::character('a').to_string(), "#\\a");
        assert_eq!(Value::character(' ').to_string(), "#\\space");
        assert_eq!(Value::character('\n').to_string(), "#\\newline");
    }

    #[test]
    fn lists_display_parenthesised() {
        let l = Value::list(vec![
            Value::number(1.0),
            Value::list(vec![Value::number(2.0)]),
            Value::string("x"),
        ]);
        assert_eq!(l.to_string(), "(1 (2) \"x\")");
        assert_eq!(Value::empty_list().to_string(), "()");
    }

    #[test]
    fn nested_lists_compare_structurally() {
        let a = Value::list(vec![Value::number(1.0), Value::list(vec![Value::number(2.0)])]);
        let b = Value::list(vec![Value::number(1.0), Value::list(vec![Value::number(2.0)])]);
        assert_eq!(a, b);
    }

    #[test]
    fn functions_compare_by_identity() {
        let f: NativeFn = Arc::new(|_ctx, _args| Ok(Value::empty_list()));
        let g: NativeFn = Arc::new(|_ctx, _args| Ok(Value::empty_list()));
        assert_eq!(Value::Function(f.clone()), Value::Function(f.clone()));
        // same body, different allocation: not the same function
        assert_ne!(Value::Function(f), Value::Function(g));
    }
}
